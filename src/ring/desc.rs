use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use super::tokens::Tokens;

/// Lifecycle state of an instance in the ring
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstanceState {
    #[default]
    Active,
    Leaving,
    Pending,
    /// Present in the ring but not yet serving
    Joining,
    Left,
}

impl Display for InstanceState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            InstanceState::Active => write!(f, "ACTIVE"),
            InstanceState::Leaving => write!(f, "LEAVING"),
            InstanceState::Pending => write!(f, "PENDING"),
            InstanceState::Joining => write!(f, "JOINING"),
            InstanceState::Left => write!(f, "LEFT"),
        }
    }
}

/// Ring entry for a single instance
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstanceDesc {
    /// Address other ring members reach the instance on
    pub addr: String,
    pub state: InstanceState,
    /// Tokens owned by the instance
    pub tokens: Tokens,

    /// Availability zone, empty when zone awareness is off
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub zone: String,

    /// Last heartbeat
    pub timestamp: DateTime<Utc>,

    /// When the instance first registered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registered_timestamp: Option<DateTime<Utc>>,
}

impl InstanceDesc {
    /// Create an entry with a fresh heartbeat timestamp
    pub fn new(addr: &str, state: InstanceState, tokens: Tokens) -> Self {
        Self {
            addr: addr.to_string(),
            state,
            tokens,
            zone: String::new(),
            timestamp: Utc::now(),
            registered_timestamp: None,
        }
    }

    /// Set the availability zone
    pub fn with_zone(mut self, zone: &str) -> Self {
        self.zone = zone.to_string();
        self
    }
}

/// The ring descriptor: every known instance keyed by instance id
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Desc {
    /// Ring entries keyed by instance id
    #[serde(default)]
    pub instances: BTreeMap<String, InstanceDesc>,
}

impl Desc {
    /// Create an empty ring
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an instance, stamping its registration time if unset
    pub fn add_instance(&mut self, id: &str, mut instance: InstanceDesc) -> &InstanceDesc {
        if instance.registered_timestamp.is_none() {
            instance.registered_timestamp = Some(Utc::now());
        }
        self.instances.insert(id.to_string(), instance);
        &self.instances[id]
    }

    /// Look up an instance by id
    pub fn get_instance(&self, id: &str) -> Option<&InstanceDesc> {
        self.instances.get(id)
    }

    /// All tokens in the ring, sorted
    pub fn get_tokens(&self) -> Tokens {
        let mut tokens: Tokens = self
            .instances
            .values()
            .flat_map(|instance| instance.tokens.iter().copied())
            .collect();
        tokens.sort();
        tokens
    }

    /// Tokens owned by `id` and every token taken in the ring, including
    /// those owned by `id`
    pub fn tokens_for(&self, id: &str) -> (Tokens, Tokens) {
        let mine = self
            .instances
            .get(id)
            .map(|instance| instance.tokens.clone())
            .unwrap_or_default();
        (mine, self.get_tokens())
    }
}
