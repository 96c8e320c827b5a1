//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

pub const ADDR_VAR: &str = "ARC3D_ADDR";
pub const DATA_DIR_VAR: &str = "ARC3D_DATA_DIR";
pub const DEFAULT_ADDR: &str = "0.0.0.0:3030";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Project directory; the platform data directory when unset.
    pub data_dir: Option<PathBuf>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let addr_text = get(ADDR_VAR).unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr_text
            .trim()
            .parse()
            .map_err(|e| format!("Invalid {} '{}': {}", ADDR_VAR, addr_text, e))?;
        Ok(Self {
            addr,
            data_dir: get(DATA_DIR_VAR).map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.addr, "0.0.0.0:3030".parse::<SocketAddr>().unwrap());
        assert_eq!(config.data_dir, None);
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            (ADDR_VAR, "127.0.0.1:8080"),
            (DATA_DIR_VAR, "/var/lib/arc3d"),
        ]))
        .unwrap();
        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.data_dir, Some(PathBuf::from("/var/lib/arc3d")));
    }

    #[test]
    fn test_bad_addr() {
        let err = ServerConfig::from_lookup(lookup(&[(ADDR_VAR, "nope")])).unwrap_err();
        assert!(err.contains(ADDR_VAR));
    }
}
