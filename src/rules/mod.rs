//! Rule contract and the ordered registry that drives it
//!
//! Architecture: Strategy Pattern - every lint rule implements the Rule trait
//! - A rule is identified by a stable name used for config lookup and reporting
//! - Evaluation is a pure function of (document, options, built-in defaults)
//! - The registry evaluates rules in registration order, serially or with rayon

pub mod minphony;

pub use minphony::MinPhony;

use crate::config::{LintConfig, RuleConfig};
use crate::domain::makefile::Makefile;
use crate::domain::violations::{GuardianError, GuardianResult, ViolationList};
use rayon::prelude::*;

/// Uniform contract every lint rule satisfies
pub trait Rule: Send + Sync {
    /// Stable machine-readable identity, e.g. `"minphony"`
    fn name(&self) -> &str;

    /// Human-readable summary reflecting the rule's current parameters
    fn description(&self) -> String;

    /// Evaluate a document. Never fails: degenerate input maps to a
    /// well-defined (possibly empty) list of violations.
    fn run(&self, makefile: &Makefile, config: &RuleConfig) -> ViolationList;
}

/// Ordered collection of rules with unique names
#[derive(Default)]
pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in rule with its default parameters
    pub fn with_defaults() -> Self {
        Self {
            rules: vec![Box::new(MinPhony::default())],
        }
    }

    /// Add a rule after all previously registered ones
    pub fn register(&mut self, rule: Box<dyn Rule>) -> GuardianResult<()> {
        if self.get(rule.name()).is_some() {
            return Err(GuardianError::registry(format!(
                "Rule '{}' is already registered",
                rule.name()
            )));
        }

        tracing::debug!("Registered rule '{}'", rule.name());
        self.rules.push(rule);
        Ok(())
    }

    /// Builder-style register
    pub fn with_rule(mut self, rule: Box<dyn Rule>) -> GuardianResult<Self> {
        self.register(rule)?;
        Ok(self)
    }

    /// Look up a rule by name
    pub fn get(&self, name: &str) -> Option<&dyn Rule> {
        self.rules.iter().find(|r| r.name() == name).map(|r| r.as_ref())
    }

    /// Rule names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// `(name, description)` pairs in registration order
    pub fn describe(&self) -> Vec<(String, String)> {
        self.rules
            .iter()
            .map(|r| (r.name().to_string(), r.description()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules that the configuration leaves enabled, in registration order
    pub fn enabled_rules<'a>(
        &'a self,
        config: &'a LintConfig,
    ) -> impl Iterator<Item = &'a dyn Rule> + 'a {
        self.rules.iter().map(|r| -> &'a dyn Rule { r.as_ref() }).filter(move |rule| {
            let disabled = config.is_rule_disabled(rule.name());
            if disabled {
                tracing::warn!("Skipping disabled rule '{}'", rule.name());
            }
            !disabled
        })
    }

    /// Evaluate every enabled rule in registration order
    pub fn run(&self, makefile: &Makefile, config: &LintConfig) -> ViolationList {
        self.enabled_rules(config)
            .flat_map(|rule| run_rule(rule, makefile, config))
            .collect()
    }

    /// Evaluate every enabled rule on the rayon pool; output keeps registration order
    pub fn run_parallel(&self, makefile: &Makefile, config: &LintConfig) -> ViolationList {
        let enabled: Vec<&dyn Rule> = self.enabled_rules(config).collect();

        enabled
            .par_iter()
            .map(|rule| run_rule(*rule, makefile, config))
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect()
    }
}

fn run_rule(rule: &dyn Rule, makefile: &Makefile, config: &LintConfig) -> ViolationList {
    let violations = rule.run(makefile, &config.rule_config(rule.name()));
    tracing::debug!(
        "Rule '{}' produced {} violation(s) for {}",
        rule.name(),
        violations.len(),
        makefile.file_name
    );
    violations
}
