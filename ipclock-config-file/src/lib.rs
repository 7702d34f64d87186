use std::{path::Path, str::FromStr};

use serde::Deserialize;
use thiserror::Error;

/// Which response shape the time API speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provider {
    #[default]
    Worldtimeapi,
    TimeapiIo,
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "worldtimeapi" => Ok(Provider::Worldtimeapi),
            "timeapi-io" => Ok(Provider::TimeapiIo),
            _ => Err(format!(
                "unknown provider `{}` (expected `worldtimeapi` or `timeapi-io`)",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IpClockConfigToml {
    pub ip: Option<String>,
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub provider: Provider,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
}

impl IpClockConfigToml {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }
}
