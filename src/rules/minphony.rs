//! Rule requiring a minimum set of declared phony targets

use crate::config::RuleConfig;
use crate::domain::makefile::Makefile;
use crate::domain::violations::{Violation, ViolationList};
use crate::rules::Rule;
use std::collections::HashSet;

/// Variable holding the declared phony targets
const PHONY_VARIABLE: &str = "PHONY";

/// Option overriding the required target list
const REQUIRED_OPTION: &str = "required";

/// Checks that every required target name is declared phony
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinPhony {
    required: Vec<String>,
}

impl MinPhony {
    pub const NAME: &'static str = "minphony";

    /// Create the rule with its own built-in required list
    pub fn new<I, S>(required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required: required.into_iter().map(Into::into).collect(),
        }
    }

    /// The built-in required list, unaffected by any per-run override
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Required list in effect for one run. An override replaces the
    /// built-in list outright and is never written back.
    fn effective_required(&self, config: &RuleConfig) -> Vec<String> {
        config
            .get_list(REQUIRED_OPTION)
            .unwrap_or_else(|| self.required.clone())
    }
}

impl Default for MinPhony {
    fn default() -> Self {
        Self::new(["all", "clean", "test"])
    }
}

/// Union of the whitespace-separated names of every PHONY assignment
fn declared_phony(makefile: &Makefile) -> HashSet<&str> {
    makefile
        .variables_named(PHONY_VARIABLE)
        .flat_map(|v| v.assignment.split_whitespace())
        .collect()
}

impl Rule for MinPhony {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> String {
        format!(
            "Minimum required phony targets must be present ({})",
            self.required.join(",")
        )
    }

    fn run(&self, makefile: &Makefile, config: &RuleConfig) -> ViolationList {
        let required = self.effective_required(config);
        let declared = declared_phony(makefile);

        tracing::debug!(
            "Checking {} required phony targets against {} declared in {}",
            required.len(),
            declared.len(),
            makefile.file_name
        );

        required
            .iter()
            .filter(|target| !declared.contains(target.as_str()))
            .map(|target| {
                Violation::new(
                    Self::NAME,
                    makefile.file_name.as_str(),
                    format!("Missing required phony target \"{target}\""),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn missing(file_name: &str, target: &str) -> Violation {
        Violation {
            rule_id: "minphony".to_string(),
            message: format!("Missing required phony target \"{target}\""),
            file_name: file_name.to_string(),
            line_number: None,
        }
    }

    fn kleen_awl_toast() -> MinPhony {
        MinPhony::new(["kleen", "awl", "toast"])
    }

    #[test]
    fn test_new() {
        let rule = MinPhony::new(["oh", "hai"]);

        assert_eq!(rule.required(), ["oh", "hai"]);
        assert_eq!(rule.name(), "minphony");
        assert_eq!(
            rule.description(),
            "Minimum required phony targets must be present (oh,hai)"
        );
    }

    #[test]
    fn test_default_required() {
        let rule = MinPhony::default();
        assert_eq!(rule.required(), ["all", "clean", "test"]);
        assert_eq!(
            rule.description(),
            "Minimum required phony targets must be present (all,clean,test)"
        );
    }

    #[test]
    fn test_reports_every_missing_target_in_order() {
        let makefile = Makefile::new("green-eggs.mk")
            .with_rule("green-eggs")
            .with_rule("ham")
            .with_variable("PHONY", "green-eggs ham");

        let violations = kleen_awl_toast().run(&makefile, &RuleConfig::new());

        assert_eq!(
            violations,
            vec![
                missing("green-eggs.mk", "kleen"),
                missing("green-eggs.mk", "awl"),
                missing("green-eggs.mk", "toast"),
            ]
        );
    }

    #[test]
    fn test_reports_only_missing_target() {
        let makefile = Makefile::new("kleen.mk")
            .with_rule("awl")
            .with_rule("distkleen")
            .with_rule("kleen")
            .with_variable("PHONY", "awl kleen distkleen");

        let violations = kleen_awl_toast().run(&makefile, &RuleConfig::new());

        assert_eq!(violations, vec![missing("kleen.mk", "toast")]);
    }

    #[test]
    fn test_config_override_replaces_defaults() {
        let rule = MinPhony::new(Vec::<String>::new());
        let makefile = Makefile::new("test.mk")
            .with_rule("clone")
            .with_rule("toast")
            .with_variable("PHONY", "clone toast");

        let config = RuleConfig::new().with("required", "foo, bar");
        assert_eq!(
            rule.run(&makefile, &config),
            vec![missing("test.mk", "foo"), missing("test.mk", "bar")]
        );

        let config = RuleConfig::new().with("required", "");
        assert_eq!(rule.run(&makefile, &config), Vec::<Violation>::new());
    }

    #[test]
    fn test_override_does_not_leak_into_rule() {
        let rule = kleen_awl_toast();
        let makefile = Makefile::new("leak.mk");

        let overridden = rule.run(&makefile, &RuleConfig::new().with("required", "foo"));
        assert_eq!(overridden, vec![missing("leak.mk", "foo")]);

        assert_eq!(rule.required(), ["kleen", "awl", "toast"]);
        assert_eq!(rule.run(&makefile, &RuleConfig::new()).len(), 3);
    }

    #[test]
    fn test_override_does_not_merge_with_defaults() {
        let rule = kleen_awl_toast();
        let makefile = Makefile::new("merge.mk").with_variable("PHONY", "kleen");

        let violations = rule.run(&makefile, &RuleConfig::new().with("required", "awl"));
        assert_eq!(violations, vec![missing("merge.mk", "awl")]);
    }

    #[test]
    fn test_missing_phony_variable_reports_all_required() {
        let makefile = Makefile::new("nophony.mk")
            .with_rule("kleen")
            .with_variable("CC", "gcc");

        let violations = kleen_awl_toast().run(&makefile, &RuleConfig::new());
        let targets: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();

        assert_eq!(
            targets,
            vec![
                "Missing required phony target \"kleen\"",
                "Missing required phony target \"awl\"",
                "Missing required phony target \"toast\"",
            ]
        );
        assert!(violations.iter().all(|v| v.line_number.is_none()));
    }

    #[test]
    fn test_phony_name_is_case_sensitive() {
        let makefile = Makefile::new("case.mk").with_variable("phony", "kleen awl toast");
        assert_eq!(kleen_awl_toast().run(&makefile, &RuleConfig::new()).len(), 3);
    }

    #[test]
    fn test_repeated_phony_variables_are_unioned() {
        let makefile = Makefile::new("split.mk")
            .with_variable("PHONY", "kleen")
            .with_variable("CC", "cc")
            .with_variable("PHONY", "awl\ttoast");

        assert!(kleen_awl_toast().run(&makefile, &RuleConfig::new()).is_empty());
    }

    #[test]
    fn test_order_follows_required_not_document() {
        let makefile = Makefile::new("order.mk").with_variable("PHONY", "unrelated");
        let config = RuleConfig::new().with("required", "zeta,alpha,mid");

        let violations = MinPhony::default().run(&makefile, &config);
        let messages: Vec<_> = violations.iter().map(|v| v.message.clone()).collect();

        assert_eq!(
            messages,
            vec![
                "Missing required phony target \"zeta\"",
                "Missing required phony target \"alpha\"",
                "Missing required phony target \"mid\"",
            ]
        );
    }

    #[test]
    fn test_duplicate_required_entries_repeat() {
        let rule = MinPhony::new(["all", "all"]);
        let violations = rule.run(&Makefile::new("dup.mk"), &RuleConfig::new());
        assert_eq!(violations, vec![missing("dup.mk", "all"), missing("dup.mk", "all")]);
    }

    #[rstest]
    #[case("foo, bar")]
    #[case("foo,bar")]
    #[case(" foo ,bar ,")]
    fn test_override_format_tolerance(#[case] raw: &str) {
        let makefile = Makefile::new("fmt.mk");
        let config = RuleConfig::new().with("required", raw);
        let violations = MinPhony::default().run(&makefile, &config);

        assert_eq!(violations, vec![missing("fmt.mk", "foo"), missing("fmt.mk", "bar")]);
    }

    #[test]
    fn test_run_is_idempotent() {
        let rule = MinPhony::default();
        let makefile = Makefile::new("Makefile").with_variable("PHONY", "all");
        let config = RuleConfig::new();

        assert_eq!(rule.run(&makefile, &config), rule.run(&makefile, &config));
    }

    #[test]
    fn test_concurrent_runs_share_one_instance() {
        let rule = kleen_awl_toast();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let rule = &rule;
                    scope.spawn(move || {
                        let makefile = Makefile::new(format!("{i}.mk"));
                        let config = RuleConfig::new().with("required", format!("t{i}"));
                        rule.run(&makefile, &config)
                    })
                })
                .collect();

            for (i, handle) in handles.into_iter().enumerate() {
                let violations = handle.join().unwrap();
                assert_eq!(violations, vec![missing(&format!("{i}.mk"), &format!("t{i}"))]);
            }
        });

        assert_eq!(rule.required(), ["kleen", "awl", "toast"]);
    }
}
