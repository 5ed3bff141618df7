//! Configuration for Make Guardian rules
//!
//! Architecture: Anti-Corruption Layer - Configuration translates external YAML formats
//! - Raw YAML mappings become per-rule option maps of raw strings
//! - Rule defaults live in the rules themselves, never in the configuration
//! - Absence of an option always means "use the rule's built-in default"

use crate::domain::violations::{GuardianError, GuardianResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Option that switches a rule off for a run
pub const DISABLED_OPTION: &str = "disabled";

/// Per-rule option overrides, keyed by option name with raw string values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, RawOption>", into = "BTreeMap<String, String>")]
pub struct RuleConfig {
    options: BTreeMap<String, String>,
}

/// YAML values accepted for an option; all are kept as raw strings
#[derive(Deserialize)]
#[serde(untagged)]
enum RawOption {
    Empty(()),
    Text(String),
    Flag(bool),
    Integer(i64),
    Float(f64),
    List(Vec<String>),
}

impl From<BTreeMap<String, RawOption>> for RuleConfig {
    fn from(raw: BTreeMap<String, RawOption>) -> Self {
        raw.into_iter()
            .map(|(key, value)| {
                let value = match value {
                    RawOption::Empty(()) => String::new(),
                    RawOption::Text(text) => text,
                    RawOption::Flag(flag) => flag.to_string(),
                    RawOption::Integer(number) => number.to_string(),
                    RawOption::Float(number) => number.to_string(),
                    RawOption::List(items) => items.join(","),
                };
                (key, value)
            })
            .collect()
    }
}

impl From<RuleConfig> for BTreeMap<String, String> {
    fn from(config: RuleConfig) -> Self {
        config.options
    }
}

impl RuleConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set an option, replacing any previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.options.insert(key.into(), value.into());
    }

    /// Raw value of an option
    pub fn get(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Parse an option as a comma-separated list.
    ///
    /// Pieces are trimmed and empty pieces dropped, so `"foo, bar"`, `"foo,bar"`
    /// and `",foo,,bar, "` all yield `["foo", "bar"]`. A present but empty value
    /// yields an empty list; only an absent key yields `None`.
    pub fn get_list(&self, key: &str) -> Option<Vec<String>> {
        self.get(key).map(parse_list)
    }

    /// Parse an option as a boolean; unrecognized values read as `None`
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)?.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        }
    }

    /// Iterate options in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.options.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RuleConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            options: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}

/// Configuration for a whole lint run: one option map per rule name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintConfig {
    /// Configuration format version
    pub version: String,
    /// Per-rule overrides keyed by rule name
    #[serde(default)]
    pub rules: BTreeMap<String, RuleConfig>,
}

impl LintConfig {
    /// Load configuration from YAML text
    pub fn load_from_str(content: &str) -> GuardianResult<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| GuardianError::config(format!("Failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration for consistency
    pub fn validate(&self) -> GuardianResult<()> {
        if !["1.0"].contains(&self.version.as_str()) {
            return Err(GuardianError::config(format!(
                "Unsupported configuration version: {}. Supported versions: 1.0",
                self.version
            )));
        }

        for (rule_name, rule_config) in &self.rules {
            if let Some(raw) = rule_config.get(DISABLED_OPTION) {
                if rule_config.get_bool(DISABLED_OPTION).is_none() {
                    return Err(GuardianError::config(format!(
                        "Option '{DISABLED_OPTION}' of rule '{rule_name}' must be a boolean, got '{raw}'"
                    )));
                }
            }
        }

        Ok(())
    }

    /// Options for a rule; empty when the rule has no section
    pub fn rule_config(&self, rule_name: &str) -> RuleConfig {
        self.rules.get(rule_name).cloned().unwrap_or_default()
    }

    /// Whether the rule has been switched off with `disabled: "true"`
    pub fn is_rule_disabled(&self, rule_name: &str) -> bool {
        self.rules
            .get(rule_name)
            .and_then(|c| c.get_bool(DISABLED_OPTION))
            .unwrap_or(false)
    }

    /// Convert to JSON for serialization
    pub fn to_json(&self) -> GuardianResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| GuardianError::config(format!("Failed to serialize config: {e}")))
    }
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            rules: BTreeMap::new(),
        }
    }
}

/// Configuration builder for programmatic construction
pub struct ConfigBuilder {
    config: LintConfig,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: LintConfig::default(),
        }
    }

    /// Set one option for a rule
    pub fn rule_option(
        mut self,
        rule_name: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.config
            .rules
            .entry(rule_name.into())
            .or_default()
            .insert(key, value);
        self
    }

    /// Switch a rule off
    pub fn disable_rule(self, rule_name: impl Into<String>) -> Self {
        self.rule_option(rule_name, DISABLED_OPTION, "true")
    }

    /// Build the final configuration
    pub fn build(self) -> GuardianResult<LintConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
