use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rules of every namespace returned by a list call, keyed by namespace name
pub type RuleSet = BTreeMap<String, RuleNamespace>;

/// A single alerting or recording rule in Prometheus rule format
///
/// Exactly one of `alert` and `record` is expected to be set. The expression
/// is carried as-is; the ruler validates it.
///
/// # Example
///
/// ```rust
/// use ruler_api::Rule;
///
/// let rule = Rule::alerting("HighErrorRate", "rate(errors_total[5m]) > 1")
///     .with_for("10m")
///     .with_label("severity", "page")
///     .with_annotation("summary", "Error rate is high");
/// assert!(rule.is_alerting());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rule {
    /// Name of the series produced by a recording rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<String>,

    /// Name of the alert produced by an alerting rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert: Option<String>,

    /// PromQL expression
    pub expr: String,

    /// Pending duration before an alert fires (Prometheus duration, e.g. `5m`)
    #[serde(default, rename = "for", skip_serializing_if = "Option::is_none")]
    pub for_duration: Option<String>,

    /// Labels added to the produced series or alert
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    /// Annotations attached to the alert
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,

    /// Rule fields not modelled above (e.g. `keep_firing_for`), kept verbatim
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl Rule {
    /// Create an alerting rule
    pub fn alerting(alert: &str, expr: &str) -> Self {
        Self {
            alert: Some(alert.to_string()),
            expr: expr.to_string(),
            ..Self::default()
        }
    }

    /// Create a recording rule
    pub fn recording(record: &str, expr: &str) -> Self {
        Self {
            record: Some(record.to_string()),
            expr: expr.to_string(),
            ..Self::default()
        }
    }

    /// Set how long the condition must hold before the alert fires
    pub fn with_for(mut self, duration: &str) -> Self {
        self.for_duration = Some(duration.to_string());
        self
    }

    /// Add a label
    pub fn with_label(mut self, key: &str, value: &str) -> Self {
        self.labels.insert(key.to_string(), value.to_string());
        self
    }

    /// Add an annotation
    pub fn with_annotation(mut self, key: &str, value: &str) -> Self {
        self.annotations.insert(key.to_string(), value.to_string());
        self
    }

    /// Whether this is an alerting rule
    pub fn is_alerting(&self) -> bool {
        self.alert.is_some()
    }

    /// Alert or record name, whichever is set
    pub fn name(&self) -> Option<&str> {
        self.alert.as_deref().or(self.record.as_deref())
    }
}

/// A named set of rules evaluated together
///
/// Identity within a namespace is its `name`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleGroup {
    /// Group name, unique within its namespace
    pub name: String,

    /// Evaluation interval override (Prometheus duration)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,

    /// Rules evaluated together, in order
    #[serde(default)]
    pub rules: Vec<Rule>,

    /// Group fields not modelled above (e.g. `limit`, `source_tenants`),
    /// kept verbatim
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl RuleGroup {
    /// Create an empty rule group
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Set the evaluation interval
    pub fn with_interval(mut self, interval: &str) -> Self {
        self.interval = Some(interval.to_string());
        self
    }

    /// Append a rule
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }
}

/// A tenant-scoped bucket of rule groups
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleNamespace {
    /// Namespace name
    pub namespace: String,

    /// Rule groups in this namespace
    #[serde(default)]
    pub groups: Vec<RuleGroup>,
}
