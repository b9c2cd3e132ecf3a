use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    str::FromStr,
};

use spots::index::DEFAULT_CELL_DEGREES;

pub const DEFAULT_PORT: u16 = 3001;

/// Server settings, read from the environment once at start-up.
#[derive(Debug, Clone, PartialEq)]
pub struct WebConfig {
    pub bind_address: IpAddr,
    pub port: u16,
    pub grid_cell_degrees: f64,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            grid_cell_degrees: DEFAULT_CELL_DEGREES,
        }
    }
}

impl WebConfig {
    /// Reads `BIND_ADDRESS`, `PORT` and `SPOT_GRID_CELL_DEGREES`. Unset or
    /// unparsable variables keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default = Self::default();
        Self {
            bind_address: parse_or(&lookup, "BIND_ADDRESS", default.bind_address),
            port: parse_or(&lookup, "PORT", default.port),
            grid_cell_degrees: parse_or(
                &lookup,
                "SPOT_GRID_CELL_DEGREES",
                default.grid_cell_degrees,
            ),
        }
    }

    pub fn socket_address(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    match lookup(key) {
        None => default,
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            log::warn!("ignoring invalid value '{}' for {}", value, key);
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> WebConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        WebConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]);
        assert_eq!(config, WebConfig::default());
        assert_eq!(config.socket_address().to_string(), "0.0.0.0:3001");
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("BIND_ADDRESS", "127.0.0.1"),
            ("PORT", "8080"),
            ("SPOT_GRID_CELL_DEGREES", "0.5"),
        ]);
        assert_eq!(config.socket_address().to_string(), "127.0.0.1:8080");
        assert_eq!(config.grid_cell_degrees, 0.5);
    }

    #[test]
    fn invalid_values_keep_defaults() {
        let config = config(&[("PORT", "eighty"), ("BIND_ADDRESS", "localhost")]);
        assert_eq!(config, WebConfig::default());
    }
}
