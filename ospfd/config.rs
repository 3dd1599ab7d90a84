use std::{collections::BTreeSet, fs, net::Ipv4Addr, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    constant::HelloInterval, error::ConfigError, interface::Interface, log, log_debug,
    util::ip2hex,
};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Defaults to the highest interface address when absent.
    pub router_id: Option<Ipv4Addr>,
    pub area_id: u32,
    /// Interface indices the protocol never runs on.
    pub exclusions: BTreeSet<u32>,
    /// Seconds between discovery sweeps.
    pub hello_interval: u64,
    /// Interface names to run on; empty means all of them.
    pub interfaces: Vec<String>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            router_id: None,
            area_id: 0,
            exclusions: BTreeSet::new(),
            hello_interval: HelloInterval,
            interfaces: Vec::new(),
        }
    }
}

impl RouterConfig {
    /// Reads the config file at `path`. A missing file gives the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            log!("no config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if config.hello_interval == 0 {
            return Err(ConfigError::ZeroHelloInterval(path.to_path_buf()));
        }
        log!("loaded configuration from {}", path.display());
        log_debug!("config: {:?}", config);
        Ok(config)
    }

    pub fn router_id(&self, interfaces: &[Interface]) -> Option<u32> {
        if let Some(id) = self.router_id {
            return Some(ip2hex(id));
        }
        interfaces
            .iter()
            .filter(|i| !i.loopback)
            .flat_map(|i| i.active_addresses())
            .map(|a| a.local)
            .max()
            .map(ip2hex)
    }
}
