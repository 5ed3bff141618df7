//! Make Guardian - pluggable lint-rule engine for parsed Makefiles
//!
//! Architecture: Clean Architecture - Library interface serves as the application layer
//! - Documents arrive already parsed; rules never read raw build-file text
//! - Every rule shares one contract and returns an ordered list of violations
//! - Rendering and exit codes belong to whoever consumes the LintReport

pub mod config;
pub mod domain;
pub mod rules;

// Re-export main types for convenient access
pub use domain::makefile::{BuildRule, Makefile, Variable};
pub use domain::violations::{
    GuardianError, GuardianResult, LintReport, LintSummary, Violation, ViolationList,
};

pub use config::{ConfigBuilder, LintConfig, RuleConfig};

pub use rules::{MinPhony, Rule, RuleRegistry};

use rayon::prelude::*;

/// Runs a registry of rules over documents under one configuration
pub struct MakeGuardian {
    registry: RuleRegistry,
    config: LintConfig,
}

impl MakeGuardian {
    /// Built-in rules with an empty configuration
    pub fn new() -> Self {
        Self {
            registry: RuleRegistry::with_defaults(),
            config: LintConfig::default(),
        }
    }

    /// Create a guardian using YAML configuration text
    pub fn from_config_str(content: &str) -> GuardianResult<Self> {
        Ok(Self::new().with_config(LintConfig::load_from_str(content)?))
    }

    /// Replace the configuration
    pub fn with_config(mut self, config: LintConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the rule registry
    pub fn with_registry(mut self, registry: RuleRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn config(&self) -> &LintConfig {
        &self.config
    }

    /// Validate a single document
    pub fn validate(&self, makefile: &Makefile) -> LintReport {
        let mut report = LintReport::new();
        report.extend(self.registry.run(makefile, &self.config));
        let rules_run = self
            .registry
            .names()
            .into_iter()
            .filter(|name| !self.config.is_rule_disabled(name))
            .count();
        report.record_document(rules_run);

        tracing::debug!(
            "Validated {} with {} violation(s)",
            makefile.file_name,
            report.violations.len()
        );
        report
    }

    /// Validate many documents in parallel; violations keep input order
    pub fn validate_all(&self, makefiles: &[Makefile]) -> LintReport {
        makefiles
            .par_iter()
            .map(|makefile| self.validate(makefile))
            .collect::<Vec<_>>()
            .into_iter()
            .fold(LintReport::new(), |mut acc, report| {
                acc.merge(report);
                acc
            })
    }
}

impl Default for MakeGuardian {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function to validate a document with built-in rules and defaults
pub fn validate(makefile: &Makefile) -> LintReport {
    MakeGuardian::new().validate(makefile)
}
