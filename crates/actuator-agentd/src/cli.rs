use std::path::PathBuf;

use clap::Parser;

pub const DEFAULT_CONFIG_FILE: &str = "/etc/actuator/actuator.yml";
pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0:9942";

/// Run reactions in response to Alertmanager webhook notifications.
#[derive(Debug, Parser)]
#[command(name = "actuator-agentd")]
#[command(version)]
pub struct Cli {
    /// Actuator config file location.
    #[arg(
        short = 'c',
        long = "config.file",
        env = "ACTUATOR_CONFIG_FILE",
        default_value = DEFAULT_CONFIG_FILE
    )]
    pub config_file: PathBuf,

    /// ip:port to serve webhooks, health and metrics on.
    #[arg(
        short = 'a',
        long = "server.address",
        env = "ACTUATOR_SERVER_ADDRESS",
        default_value = DEFAULT_SERVER_ADDRESS
    )]
    pub server_address: String,
}
