//! Parsed build-file document model
//!
//! Documents arrive already parsed; this module only describes their shape
//! and decodes them from the structured formats a parser may emit.

use crate::domain::violations::{GuardianError, GuardianResult};
use serde::{Deserialize, Serialize};

/// A build rule declared in the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRule {
    pub target: String,
}

/// A variable assignment with its raw right-hand side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub assignment: String,
}

/// An already-parsed Makefile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Makefile {
    /// Name the document was loaded from, copied into every violation
    pub file_name: String,
    /// Build rules in declaration order
    #[serde(default)]
    pub rules: Vec<BuildRule>,
    /// Variable assignments in declaration order
    #[serde(default)]
    pub variables: Vec<Variable>,
}

impl Makefile {
    /// Create an empty document
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            rules: Vec::new(),
            variables: Vec::new(),
        }
    }

    /// Append a build rule
    pub fn with_rule(mut self, target: impl Into<String>) -> Self {
        self.rules.push(BuildRule {
            target: target.into(),
        });
        self
    }

    /// Append a variable assignment
    pub fn with_variable(mut self, name: impl Into<String>, assignment: impl Into<String>) -> Self {
        self.variables.push(Variable {
            name: name.into(),
            assignment: assignment.into(),
        });
        self
    }

    /// Decode a document emitted as JSON by an external parser
    pub fn from_json(content: &str) -> GuardianResult<Self> {
        serde_json::from_str(content)
            .map_err(|e| GuardianError::document(format!("Failed to decode JSON document: {e}")))
    }

    /// Decode a document emitted as YAML by an external parser
    pub fn from_yaml(content: &str) -> GuardianResult<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| GuardianError::document(format!("Failed to decode YAML document: {e}")))
    }

    /// Every variable with exactly this name, in document order
    pub fn variables_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Variable> + 'a {
        self.variables.iter().filter(move |v| v.name == name)
    }

    /// Targets of all build rules, in document order
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.target.as_str())
    }
}
