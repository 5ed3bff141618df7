//! Core domain models for lint violations and aggregated reports
//!
//! Architecture: Rich Domain Models - a Violation is the uniform output every rule produces
//! - Rules return ordered ViolationLists; order is caller-visible and reproducible
//! - LintReport acts as an aggregate root over the lists produced in one run

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Numeric stand-in for "no source line" when a violation crosses the wire
pub const NO_LINE_SENTINEL: i64 = -1;

/// One reported instance of a document failing a rule's policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Name of the rule that produced this violation
    #[serde(rename = "rule")]
    pub rule_id: String,
    /// Human-readable description of the violation
    #[serde(rename = "violation")]
    pub message: String,
    /// Name of the document the violation was found in
    pub file_name: String,
    /// Source line (1-indexed), `None` when the check is document-global
    #[serde(with = "line_sentinel")]
    pub line_number: Option<u32>,
}

/// Ordered sequence of violations as returned by a single rule evaluation
pub type ViolationList = Vec<Violation>;

impl Violation {
    /// Create a violation that is not attributable to a specific line
    pub fn new(
        rule_id: impl Into<String>,
        file_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            message: message.into(),
            file_name: file_name.into(),
            line_number: None,
        }
    }

    /// Attach a source line
    pub fn with_line(mut self, line: u32) -> Self {
        self.line_number = Some(line);
        self
    }

    /// Line number with `-1` standing in for "not attributable"
    pub fn line_number_or_sentinel(&self) -> i64 {
        self.line_number.map(i64::from).unwrap_or(NO_LINE_SENTINEL)
    }

    /// Format violation for display
    pub fn format_display(&self) -> String {
        match self.line_number {
            Some(line) => {
                format!("{}:{} [{}] {}", self.file_name, line, self.rule_id, self.message)
            }
            None => format!("{} [{}] {}", self.file_name, self.rule_id, self.message),
        }
    }
}

mod line_sentinel {
    use super::NO_LINE_SENTINEL;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(line: &Option<u32>, serializer: S) -> Result<S::Ok, S::Error> {
        match line {
            Some(line) => serializer.serialize_i64(i64::from(*line)),
            None => serializer.serialize_i64(NO_LINE_SENTINEL),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<u32>, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        if raw < 0 {
            return Ok(None);
        }
        u32::try_from(raw)
            .map(Some)
            .map_err(<D::Error as serde::de::Error>::custom)
    }
}

/// Summary statistics for a lint run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintSummary {
    /// Number of documents evaluated
    pub documents_checked: usize,
    /// Number of rule evaluations performed (rules x documents)
    pub rules_run: usize,
    /// Violation counts keyed by rule name
    pub violations_by_rule: BTreeMap<String, usize>,
}

impl LintSummary {
    /// Total number of violations across all rules
    pub fn total(&self) -> usize {
        self.violations_by_rule.values().sum()
    }
}

/// Aggregated result of running a set of rules over one or more documents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintReport {
    /// All violations in evaluation order
    pub violations: ViolationList,
    /// Summary statistics
    pub summary: LintSummary,
}

impl LintReport {
    /// Create a new empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a violation to the report
    pub fn add_violation(&mut self, violation: Violation) {
        *self
            .summary
            .violations_by_rule
            .entry(violation.rule_id.clone())
            .or_insert(0) += 1;
        self.violations.push(violation);
    }

    /// Add every violation of a rule's list, preserving its order
    pub fn extend(&mut self, violations: ViolationList) {
        for violation in violations {
            self.add_violation(violation);
        }
    }

    /// Whether the report contains any violations
    pub fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Violations produced by a specific rule
    pub fn violations_for_rule<'a>(
        &'a self,
        rule_id: &'a str,
    ) -> impl Iterator<Item = &'a Violation> + 'a {
        self.violations.iter().filter(move |v| v.rule_id == rule_id)
    }

    pub fn record_document(&mut self, rules_run: usize) {
        self.summary.documents_checked += 1;
        self.summary.rules_run += rules_run;
    }

    /// Merge another report into this one, appending its violations
    pub fn merge(&mut self, other: LintReport) {
        self.extend(other.violations);
        self.summary.documents_checked += other.summary.documents_checked;
        self.summary.rules_run += other.summary.rules_run;
    }

    /// Serialize the report as pretty JSON
    pub fn to_json(&self) -> GuardianResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| GuardianError::serialization(format!("Failed to serialize report: {e}")))
    }
}

/// Error types raised around rule evaluation (never by it)
#[derive(Debug, thiserror::Error)]
pub enum GuardianError {
    /// Configuration could not be parsed or is inconsistent
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Rule registration failed
    #[error("Registry error: {message}")]
    Registry { message: String },

    /// A pre-parsed document could not be decoded
    #[error("Document error: {message}")]
    Document { message: String },

    /// Output could not be serialized
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl GuardianError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a registry error
    pub fn registry(message: impl Into<String>) -> Self {
        Self::Registry {
            message: message.into(),
        }
    }

    /// Create a document error
    pub fn document(message: impl Into<String>) -> Self {
        Self::Document {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}

/// Result type for Guardian operations
pub type GuardianResult<T> = Result<T, GuardianError>;
