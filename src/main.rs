//! Binary entry point for the `vultr-provision` CLI.

use std::io::{self, Write};
use std::process;

use clap::Parser;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use vultr_provision::{
    ConfigError, HttpTransport, Instance, InstanceEnvelope, Provisioner, Transport, VultrClient,
    VultrConfig, VultrError,
};

mod cli;

use cli::Cli;

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Vultr(#[from] VultrError),
    #[error("failed to write instance record: {0}")]
    Output(String),
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();
    let exit_code = match run(cli).await {
        Ok(()) => 0,
        Err(err) => {
            report_error(&err);
            1
        }
    };

    process::exit(exit_code);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = apply_overrides(VultrConfig::load_without_cli_args()?, &cli);
    config.validate()?;

    let request = config
        .request_builder()
        .label(cli.name)
        .ssh_key_name(cli.ssh)
        .build()?;

    let transport =
        HttpTransport::new(&config.base_url, config.credential(), config.http_timeout())?;
    let client = VultrClient::new(transport);
    probe_credentials(&client).await;
    let provisioner = Provisioner::new(client).with_poll_policy(config.poll_policy());
    let instance = provisioner
        .create_instance_until(&request, shutdown_signal())
        .await?;

    write_instance(io::stdout(), instance)
}

fn apply_overrides(mut config: VultrConfig, cli: &Cli) -> VultrConfig {
    if let Some(api) = &cli.api {
        config.api_key = Some(api.clone());
    }
    if let Some(city) = &cli.city {
        config.default_city.clone_from(city);
    }
    if let Some(plan) = &cli.plan {
        config.default_plan.clone_from(plan);
    }
    if let Some(os) = &cli.os {
        config.default_os.clone_from(os);
    }
    if let Some(seconds) = cli.wait_timeout {
        config.wait_timeout_secs = seconds;
    }
    config
}

/// Checks the credential against `/account`. A failure is logged and the run
/// continues; the API rejects later calls if the key really is bad.
async fn probe_credentials<T: Transport>(client: &VultrClient<T>) -> bool {
    match client.auth().await {
        Ok(account) => {
            info!(account = %account.email, "authenticated");
            true
        }
        Err(err) => {
            error!(error = %err, "credential check failed");
            false
        }
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // Without a signal handler the wait can only end by convergence or timeout.
        std::future::pending::<()>().await;
    }
}

fn write_instance(mut target: impl Write, instance: Instance) -> Result<(), CliError> {
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    InstanceEnvelope { instance }
        .serialize(&mut serializer)
        .map_err(|err| CliError::Output(err.to_string()))?;
    buffer.push(b'\n');
    target
        .write_all(&buffer)
        .map_err(|err| CliError::Output(err.to_string()))
}

fn report_error(err: &CliError) {
    write_error(io::stderr(), err);
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "{err}").ok();
}
