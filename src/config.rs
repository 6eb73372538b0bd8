use crate::mac;
use crate::wol;
use serde::Deserialize;
use std::io;
use std::net::IpAddr;
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("wake_on_lan: MAC must be specified")]
    MissingMac,
    #[error("wake_on_lan: {0}")]
    InvalidMac(#[from] mac::ParseError),
    #[error("wake_on_lan: IP must be specified")]
    MissingHost,
    #[error("wake_on_lan: invalid IP/host {host:?}: {source}")]
    InvalidHost {
        host: String,
        source: wol::SendError,
    },
    #[error("wake_on_lan: invalid port {0}")]
    PortRange(i64),
    #[error("could not read config file: {0}")]
    Read(#[from] io::Error),
    #[error("could not parse config file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Target settings as the user wrote them. Nothing is checked until
/// `validate` is called.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WakeConfig {
    pub mac: String,
    pub ip: String,
    pub port: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTarget {
    pub mac: String,
    pub host: String,
    pub port: u16,
}

impl WakeConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Command line values win over the ones read from a file.
    pub fn merge(mut self, mac: Option<String>, ip: Option<String>, port: Option<i64>) -> Self {
        if let Some(mac) = mac {
            self.mac = mac;
        }
        if let Some(ip) = ip {
            self.ip = ip;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    /// Checks the settings the same way a send would, so mistakes show up at
    /// startup. Hostnames are resolved once here and again on every send.
    pub fn validate(&self) -> Result<ValidatedTarget, ConfigError> {
        if self.mac.is_empty() {
            return Err(ConfigError::MissingMac);
        }
        mac::parse(&self.mac)?;
        if self.ip.is_empty() {
            return Err(ConfigError::MissingHost);
        }
        let port = u16::try_from(self.port).map_err(|_| ConfigError::PortRange(self.port))?;
        let port = wol::port_or_default(port);
        if wol::host_literal(&self.ip).parse::<IpAddr>().is_err() {
            wol::resolve(&self.ip, port).map_err(|source| ConfigError::InvalidHost {
                host: self.ip.clone(),
                source,
            })?;
        }
        Ok(ValidatedTarget {
            mac: self.mac.clone(),
            host: self.ip.clone(),
            port,
        })
    }
}
