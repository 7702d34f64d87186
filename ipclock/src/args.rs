use std::{path::PathBuf, time::Duration};

use clap::Parser;
use ipclock_config_file::{IpClockConfigToml, Provider};

use crate::{
    ip_clock::{IpClock, IpClockBuilder},
    parser::TimeApiIoParser,
};

/// Print the current time as reported by a remote time API
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// IP address to get the time for (defaults to this machine's public IP)
    #[arg(long)]
    pub ip: Option<String>,

    /// Time API URL; `{ip}` is replaced with the IP address
    #[arg(long)]
    pub api_url: Option<String>,

    /// Response format of the time API (`worldtimeapi` or `timeapi-io`)
    #[arg(long)]
    pub provider: Option<Provider>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// TOML config file; command line flags take precedence
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Merges the flags over `config` into a clock builder.
    pub fn builder(&self, config: IpClockConfigToml) -> IpClockBuilder {
        let mut builder = IpClock::builder();
        if let Some(ip) = self.ip.clone().or(config.ip) {
            builder = builder.ip(ip);
        }
        if let Some(api_url) = self.api_url.clone().or(config.api_url) {
            builder = builder.api_url(api_url);
        }
        if let Some(secs) = self.timeout.or(config.timeout_secs) {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        match self.provider.unwrap_or(config.provider) {
            Provider::Worldtimeapi => builder,
            Provider::TimeapiIo => builder.parser(TimeApiIoParser),
        }
    }
}
