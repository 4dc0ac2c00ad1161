//! Runtime configuration, loadable from JSON.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fixture::{Fixture, FixtureLayout};
use crate::protocols::artnet::layout::ARTNET_PORT;
use crate::protocols::artnet::{ArtNetError, PortAddress};
use crate::universe::UniverseError;

pub const DEFAULT_FIXTURES: [u16; 2] = [10, 20];
pub const DEFAULT_BRIGHTNESS: u8 = 40;
pub const DEFAULT_STEP_DELAY_MS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no fixtures configured")]
    NoFixtures,
    #[error("fixture at base {base} does not fit the universe: {source}")]
    Fixture {
        base: u16,
        #[source]
        source: UniverseError,
    },
    #[error(transparent)]
    PortAddress(#[from] ArtNetError),
}

/// Controller settings. Every field has a default, so `{}` is a valid file.
///
/// # Examples
/// ```
/// use artfade_core::Config;
///
/// let config = Config::from_json_str(r#"{ "node": "10.0.0.50", "fixtures": [1] }"#)?;
/// assert_eq!(config.destination().to_string(), "10.0.0.50:6454");
/// assert_eq!(config.default_brightness, 40);
/// # Ok::<(), artfade_core::ConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Art-Net node address.
    pub node: Ipv4Addr,
    /// UDP destination port.
    pub port: u16,
    pub port_address: PortAddress,
    /// Base channel of each fixture.
    pub fixtures: Vec<u16>,
    /// Value written to every fixture base channel on reset.
    pub default_brightness: u8,
    /// Delay between single-unit fade steps.
    pub step_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            node: Ipv4Addr::LOCALHOST,
            port: ARTNET_PORT,
            port_address: PortAddress::default(),
            fixtures: DEFAULT_FIXTURES.to_vec(),
            default_brightness: DEFAULT_BRIGHTNESS,
            step_delay_ms: DEFAULT_STEP_DELAY_MS,
        }
    }
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check ranges and build the fixture layout.
    pub fn validate(&self) -> Result<FixtureLayout, ConfigError> {
        if self.fixtures.is_empty() {
            return Err(ConfigError::NoFixtures);
        }
        self.port_address.validate()?;
        let fixtures = self
            .fixtures
            .iter()
            .map(|&base| Fixture::new(base).map_err(|source| ConfigError::Fixture { base, source }))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(FixtureLayout::from_fixtures(fixtures))
    }

    pub fn destination(&self) -> SocketAddr {
        SocketAddr::new(IpAddr::V4(self.node), self.port)
    }

    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }
}
