use crate::config::ScrapeTargetOptions;
use crate::parser::validate_address;
use crate::prometheus::{Scheme, ScrapeJob, StaticScrapeConfig, TlsConfig};
use crate::status::Status;
use crate::tls::check_ca_certificate;
use tracing::{debug, error, warn};


/// Everything learned while validating the options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOutcome {
    /// Valid targets, in input order. Duplicates are kept.
    pub valid_targets: Vec<String>,
    /// Rejected targets, as they were given (trimmed).
    pub invalid_targets: Vec<String>,
    pub scheme_valid: bool,
    /// `true` when no CA certificate was given.
    pub ca_valid: bool,
}

/// The result of evaluating a set of options: the job to publish, if any, and
/// the outcome used to report the status.
///
/// A job is present as soon as there is at least one valid target, even if
/// other targets, the scheme or the certificate are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub job: Option<ScrapeJob>,
    pub outcome: ValidationOutcome,
}

impl Evaluation {
    /// The jobs in the shape they are published in, which is a list.
    pub fn scrape_jobs(&self) -> &[ScrapeJob] {
        match &self.job {
            Some(job) => std::slice::from_ref(job),
            None => &[],
        }
    }

    pub fn status(&self) -> Status {
        Status::from_outcome(&self.outcome)
    }
}

/// Splits a comma separated list of targets, trimming every element.
///
/// A blank list has no elements at all. Blank elements inside a list are
/// kept, and will be rejected by the validation.
pub fn split_targets(raw: &str) -> Vec<&str> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    raw.split(',').map(str::trim).collect()
}

/// Validates the options and assembles the scrape job.
///
/// This never fails: invalid input is left out of the job and reported in the
/// [`ValidationOutcome`] instead. The same options always produce the same
/// evaluation.
pub fn evaluate(options: &ScrapeTargetOptions) -> Evaluation {
    let mut outcome = ValidationOutcome {
        scheme_valid: true,
        ca_valid: true,
        ..Default::default()
    };

    for target in split_targets(&options.targets) {
        match validate_address(target) {
            Ok(target) => outcome.valid_targets.push(target),
            Err(err) => {
                error!(
                    %err,
                    "Invalid target: '{target}'. Targets must be specified in host:port format"
                );
                outcome.invalid_targets.push(target.to_owned());
            }
        }
    }

    let scheme = match options.scheme.parse::<Scheme>() {
        Ok(scheme) => Some(scheme),
        Err(err) => {
            warn!("{err}");
            outcome.scheme_valid = false;
            None
        }
    };

    if !options.tls_ca_cert.is_empty() {
        if let Err(err) = check_ca_certificate(&options.tls_ca_cert) {
            warn!(?err, "Invalid certificate provided for tls_ca_cert");
            outcome.ca_valid = false;
        }
    }

    let job = if outcome.valid_targets.is_empty() {
        None
    } else {
        Some(assemble_job(options, outcome.valid_targets.clone(), scheme))
    };

    debug!(?job, ?outcome, "Evaluated scrape target options");

    Evaluation { job, outcome }
}

/// Builds the job for the given targets. A TLS config is only attached when
/// the scheme is `https`.
fn assemble_job(
    options: &ScrapeTargetOptions,
    targets: Vec<String>,
    scheme: Option<Scheme>,
) -> ScrapeJob {
    let static_configs = vec![StaticScrapeConfig { targets }];

    match scheme {
        Some(Scheme::Https) => ScrapeJob {
            static_configs,
            scheme: Some(Scheme::Https),
            tls_config: Some(TlsConfig {
                insecure_skip_verify: options.tls_insecure_skip_verify,
                ca: non_empty(&options.tls_ca_cert),
                server_name: non_empty(&options.tls_server_name),
            }),
        },
        Some(Scheme::Http) | None => ScrapeJob {
            static_configs,
            scheme: None,
            tls_config: None,
        },
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_owned())
}
