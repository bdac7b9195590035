//! # Ruler API
//!
//! A Rust client library for managing Prometheus rule groups through a
//! multi-tenant ruler API (Cortex/Mimir style), plus the hash-ring join policy
//! used by multi-tenant alertmanager instances.
//!
//! ## Features
//!
//! - Create, fetch, list and delete rule groups per namespace
//! - Tenant header (`X-Scope-OrgID`) on every request, optional basic auth
//! - YAML wire format in Prometheus rule-file layout
//! - Typed errors with a distinct not-found variant
//! - Ring registration hooks that always join in `JOINING` state
//!
//! ## Example
//!
//! ```rust,no_run
//! use ruler_api::{Config, Rule, RuleGroup, RulerClient, RulerError};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::new("http://localhost:8080", "tenant-a").with_key("secret");
//!     let client = RulerClient::new(config, Duration::from_secs(10))?;
//!
//!     let group = RuleGroup::new("availability")
//!         .with_interval("1m")
//!         .with_rule(
//!             Rule::alerting("InstanceDown", "up == 0")
//!                 .with_for("5m")
//!                 .with_label("severity", "critical")
//!                 .with_annotation("summary", "Instance is down"),
//!         );
//!
//!     client.create_rule_group("alerts", &group).await?;
//!
//!     match client.get_rule_group("alerts", "availability").await {
//!         Ok(group) => println!("{} rules", group.rules.len()),
//!         Err(RulerError::NotFound) => println!("not there yet"),
//!         Err(err) => return Err(err.into()),
//!     }
//!
//!     for (namespace, rules) in client.list_rules("").await? {
//!         println!("{namespace}: {} groups", rules.groups.len());
//!     }
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod errors;
pub mod ring;
mod types;

pub use client::RulerClient;
pub use config::Config;
pub use errors::{Result, RulerError};
pub use types::{Rule, RuleGroup, RuleNamespace, RuleSet};
