use serde::Deserialize;
use std::fmt::{Debug, Formatter};

/// Connection settings for a [`RulerClient`](crate::RulerClient)
///
/// Usually loaded from YAML:
///
/// ```rust
/// use ruler_api::Config;
///
/// let config: Config = serde_yaml::from_str(
///     "address: http://ruler:8080\nid: tenant-a\nkey: secret\n",
/// )
/// .unwrap();
/// assert_eq!(config.id, "tenant-a");
/// ```
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Shared secret for basic auth; empty disables auth
    #[serde(default)]
    pub key: String,

    /// Absolute base URL of the ruler API
    pub address: String,

    /// Tenant id, sent as `X-Scope-OrgID` on every request
    pub id: String,
}

impl Config {
    /// Create a config without credentials
    pub fn new(address: &str, id: &str) -> Self {
        Self {
            key: String::new(),
            address: address.to_string(),
            id: id.to_string(),
        }
    }

    /// Set the basic auth secret
    pub fn with_key(mut self, key: &str) -> Self {
        self.key = key.to_string();
        self
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("key", &if self.key.is_empty() { "" } else { "<redacted>" })
            .field("address", &self.address)
            .field("id", &self.id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_yaml() {
        let config: Config = serde_yaml::from_str(
            "key: s3cr3t\naddress: http://r.example/\nid: t1\n",
        )
        .unwrap();

        assert_eq!(config, Config::new("http://r.example/", "t1").with_key("s3cr3t"));
    }

    #[test]
    fn test_config_key_optional() {
        let config: Config = serde_yaml::from_str("address: http://r.example/\nid: t1\n").unwrap();
        assert!(config.key.is_empty());
    }

    #[test]
    fn test_config_requires_address_and_id() {
        assert!(serde_yaml::from_str::<Config>("id: t1\n").is_err());
        assert!(serde_yaml::from_str::<Config>("address: http://r.example/\n").is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = Config::new("http://r.example/", "t1").with_key("s3cr3t");
        let debug = format!("{config:?}");
        assert!(!debug.contains("s3cr3t"));
        assert!(debug.contains("<redacted>"));
        assert!(debug.contains("t1"));
    }
}
