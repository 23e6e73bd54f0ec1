use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use parca_scrape_target::config::{ScrapeTargetConfig, ScrapeTargetOptions};
use parca_scrape_target::relation::{update, MemoryHost, RELATION_NAME};
use parca_scrape_target::status::Status;
use parca_scrape_target::topology::{Topology, DEFAULT_CHARM_NAME};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

#[derive(Parser, Clone)]
pub struct Arguments {
    /// Path to a `scrape-target.toml` file. Options given on the command line
    /// take precedence over the ones in this file.
    #[clap(short, long, env = "SCRAPE_TARGET_CONFIG")]
    config: Option<PathBuf>,

    /// Comma separated list of targets to scrape, in the `host:port` format.
    /// Defaults to no targets.
    #[clap(long, env = "SCRAPE_TARGET_TARGETS")]
    targets: Option<String>,

    /// The scheme used to scrape the targets, `http` or `https`. Defaults to
    /// `http`.
    #[clap(long, env = "SCRAPE_TARGET_SCHEME")]
    scheme: Option<String>,

    /// PEM encoded CA certificate used to verify the targets. Only used with
    /// the `https` scheme.
    #[clap(
        long,
        env = "SCRAPE_TARGET_TLS_CA_CERT",
        conflicts_with = "tls_ca_cert_file"
    )]
    tls_ca_cert: Option<String>,

    /// Read the CA certificate from this file instead.
    #[clap(long, env = "SCRAPE_TARGET_TLS_CA_CERT_FILE")]
    tls_ca_cert_file: Option<PathBuf>,

    /// Server name used to verify the hostname of the targets.
    #[clap(long, env = "SCRAPE_TARGET_TLS_SERVER_NAME")]
    tls_server_name: Option<String>,

    /// Skip the verification of the certificates of the targets.
    #[clap(long, env = "SCRAPE_TARGET_TLS_INSECURE_SKIP_VERIFY")]
    tls_insecure_skip_verify: Option<bool>,

    /// Whether this unit is the leader. Only the leader publishes relation
    /// data.
    #[clap(
        long,
        env = "SCRAPE_TARGET_LEADER",
        default_value_t = true,
        action = ArgAction::Set
    )]
    leader: bool,

    /// Name of the model the unit is deployed in.
    #[clap(long, env = "JUJU_MODEL_NAME", default_value = "")]
    model: String,

    /// UUID of the model the unit is deployed in.
    #[clap(long, env = "JUJU_MODEL_UUID", default_value = "")]
    model_uuid: String,

    /// Name of the unit, `<application>/<number>`.
    #[clap(long, env = "JUJU_UNIT_NAME", default_value = "parca-scrape-target/0")]
    unit: String,

    #[clap(long, default_value = DEFAULT_CHARM_NAME)]
    charm_name: String,

    /// Format of the printed relation data.
    #[clap(short, long, value_enum, default_value_t = OutputFormat::Json)]
    output: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

pub fn handle_command(args: Arguments) -> Result<()> {
    let config = match &args.config {
        Some(path) => ScrapeTargetConfig::load(path)?,
        None => ScrapeTargetConfig::default(),
    };

    let tls_ca_cert = match (args.tls_ca_cert, &args.tls_ca_cert_file) {
        (Some(cert), _) => Some(cert),
        (None, Some(path)) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("Unable to read CA certificate {}", path.display()))?,
        ),
        (None, None) => None,
    };

    let options = ScrapeTargetOptions::from_first_input(
        ScrapeTargetConfig {
            targets: args.targets,
            scheme: args.scheme,
            tls_ca_cert,
            tls_server_name: args.tls_server_name,
            tls_insecure_skip_verify: args.tls_insecure_skip_verify,
        },
        config,
    );

    let topology = Topology::new(args.model, args.model_uuid, args.unit, args.charm_name);

    let mut host = MemoryHost::new(args.leader);
    let relation = host.add_relation(RELATION_NAME);

    let evaluation = update(&mut host, &options, &topology)?;
    debug!(
        valid = evaluation.outcome.valid_targets.len(),
        invalid = evaluation.outcome.invalid_targets.len(),
        "Evaluated targets"
    );

    match host.status() {
        Some(Status::Active) | None => info!("Unit is active"),
        Some(status) => warn!("Unit is {status}"),
    }

    let data = host.app_data(relation).cloned().unwrap_or_default();
    let output = match args.output {
        OutputFormat::Json => serde_json::to_string_pretty(&data)?,
        OutputFormat::Yaml => serde_yaml::to_string(&data)?,
    };

    println!("{output}");

    Ok(())
}
