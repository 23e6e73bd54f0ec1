use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_SCHEME: &str = "http";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to read config file {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to parse config file {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// This struct represents the `scrape-target.toml` configuration. All
/// properties are optional so that the user only specifies the ones that they
/// want in that file. The same struct is used for values coming from the
/// command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScrapeTargetConfig {
    /// Comma separated list of `host:port` targets.
    pub targets: Option<String>,

    /// Either `http` or `https`.
    pub scheme: Option<String>,

    /// PEM encoded CA certificate used to verify the targets.
    pub tls_ca_cert: Option<String>,

    /// Server name used to verify the hostname of the targets.
    pub tls_server_name: Option<String>,

    pub tls_insecure_skip_verify: Option<bool>,
}

impl ScrapeTargetConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }
}

/// The raw options a scrape job is assembled from, with defaults applied.
///
/// These are not validated, see [`crate::scrape::evaluate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeTargetOptions {
    pub targets: String,
    pub scheme: String,
    pub tls_ca_cert: String,
    pub tls_server_name: String,
    pub tls_insecure_skip_verify: bool,
}

impl Default for ScrapeTargetOptions {
    fn default() -> Self {
        Self {
            targets: String::new(),
            scheme: DEFAULT_SCHEME.to_string(),
            tls_ca_cert: String::new(),
            tls_server_name: String::new(),
            tls_insecure_skip_verify: false,
        }
    }
}

impl ScrapeTargetOptions {
    /// If the user specified a value using args, then use that. Otherwise use
    /// the value from the config file, and fall back to the default if
    /// neither are set.
    pub fn from_first_input(args: ScrapeTargetConfig, config: ScrapeTargetConfig) -> Self {
        let defaults = Self::default();

        Self {
            targets: args
                .targets
                .or(config.targets)
                .unwrap_or(defaults.targets),
            scheme: args.scheme.or(config.scheme).unwrap_or(defaults.scheme),
            tls_ca_cert: args
                .tls_ca_cert
                .or(config.tls_ca_cert)
                .unwrap_or(defaults.tls_ca_cert),
            tls_server_name: args
                .tls_server_name
                .or(config.tls_server_name)
                .unwrap_or(defaults.tls_server_name),
            tls_insecure_skip_verify: args
                .tls_insecure_skip_verify
                .or(config.tls_insecure_skip_verify)
                .unwrap_or(defaults.tls_insecure_skip_verify),
        }
    }
}

impl From<ScrapeTargetConfig> for ScrapeTargetOptions {
    fn from(config: ScrapeTargetConfig) -> Self {
        Self::from_first_input(ScrapeTargetConfig::default(), config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn defaults() {
        let options: ScrapeTargetOptions = ScrapeTargetConfig::default().into();
        assert_eq!("", options.targets);
        assert_eq!("http", options.scheme);
        assert_eq!("", options.tls_ca_cert);
        assert_eq!("", options.tls_server_name);
        assert!(!options.tls_insecure_skip_verify);
    }

    #[test]
    fn args_take_precedence_over_config() {
        let args = ScrapeTargetConfig {
            targets: Some("foo:1234".to_string()),
            tls_insecure_skip_verify: Some(false),
            ..Default::default()
        };
        let config = ScrapeTargetConfig {
            targets: Some("bar:5678".to_string()),
            scheme: Some("https".to_string()),
            tls_insecure_skip_verify: Some(true),
            ..Default::default()
        };

        let options = ScrapeTargetOptions::from_first_input(args, config);

        assert_eq!(
            ScrapeTargetOptions {
                targets: "foo:1234".to_string(),
                scheme: "https".to_string(),
                tls_insecure_skip_verify: false,
                ..Default::default()
            },
            options
        );
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
targets = "foo:1234, bar:5678"
scheme = "https"
tls_server_name = "foo.local"
tls_insecure_skip_verify = true
"#
        )
        .unwrap();

        let config = ScrapeTargetConfig::load(file.path()).expect("expected no error");

        assert_eq!(
            ScrapeTargetConfig {
                targets: Some("foo:1234, bar:5678".to_string()),
                scheme: Some("https".to_string()),
                tls_ca_cert: None,
                tls_server_name: Some("foo.local".to_string()),
                tls_insecure_skip_verify: Some(true),
            },
            config
        );
    }

    #[test]
    fn load_rejects_unknown_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"target = "foo:1234""#).unwrap();

        let err = ScrapeTargetConfig::load(file.path()).expect_err("expected a error");
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn load_missing_file() {
        let err = ScrapeTargetConfig::load(Path::new("/nonexistent/scrape-target.toml"))
            .expect_err("expected a error");
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
