//! Test suites
//!
//! A [`Suite`] is the pre-loaded mapping of module path to module tree that
//! the runner consumes. Modules are registered in order; that order is the
//! discovery order of the run.

mod tree;

pub use test::{Done, Outcome, Test, TestFn};
pub use tree::{flatten, TestNode, DEFAULT_KEY, SEPARATOR};

use std::collections::HashSet;

use crate::models::{CaseId, Directives, RunError};

/// A flattened case ready for scheduling
#[derive(Clone, Debug)]
pub struct Case {
    pub id: CaseId,
    pub test: Test,
    /// Registration metadata merged with the tags parsed from the name
    pub directives: Directives,
}

/// Ordered collection of test modules
#[derive(Clone, Debug, Default)]
pub struct Suite {
    modules: Vec<(String, TestNode)>,
}

impl Suite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module tree under its path
    pub fn module(mut self, path: impl Into<String>, node: impl Into<TestNode>) -> Self {
        self.modules.push((path.into(), node.into()));
        self
    }

    /// Register a module that failed to load
    ///
    /// It shows up as a single failing case with an empty name.
    pub fn broken(self, path: impl Into<String>, err: impl Into<anyhow::Error>) -> Self {
        self.module(path, TestNode::broken(err))
    }

    /// Keep only modules whose path contains one of the filters
    pub fn filter<S: AsRef<str>>(mut self, filters: &[S]) -> Self {
        if !filters.is_empty() {
            self.modules
                .retain(|(path, _)| filters.iter().any(|f| path.contains(f.as_ref())));
        }
        self
    }

    pub fn modules(&self) -> impl Iterator<Item = (&str, &TestNode)> {
        self.modules.iter().map(|(path, node)| (path.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Reject suites that register the same module path twice
    pub fn validate(&self) -> Result<(), RunError> {
        let mut seen = HashSet::new();
        for (path, _) in &self.modules {
            if !seen.insert(path.as_str()) {
                return Err(RunError::DuplicateModule(path.clone()));
            }
        }
        Ok(())
    }

    /// Flatten every module, in module order then flattening order
    pub fn cases(&self) -> Vec<Case> {
        self.modules
            .iter()
            .flat_map(|(path, node)| {
                flatten(node, "").into_iter().map(move |(name, test)| {
                    let directives = test.directives().merge(Directives::parse(&name));
                    Case {
                        id: CaseId::new(path.clone(), name),
                        test,
                        directives,
                    }
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Test {
        Test::sync(|| Ok(()))
    }

    #[test]
    fn test_cases_in_discovery_order() {
        let suite = Suite::new()
            .module("b.rs", TestNode::map().entry("y", noop()).entry("x", noop()))
            .module("a.rs", TestNode::map().entry("z", noop()));

        let ids: Vec<String> = suite.cases().iter().map(|c| c.id.to_string()).collect();
        assert_eq!(ids, vec!["b.rs y", "b.rs x", "a.rs z"]);
    }

    #[test]
    fn test_same_name_in_different_modules() {
        let suite = Suite::new()
            .module("a.rs", TestNode::map().entry("t", noop()))
            .module("b.rs", TestNode::map().entry("t", noop()));
        assert_eq!(suite.cases().len(), 2);
        assert!(suite.validate().is_ok());
    }

    #[test]
    fn test_duplicate_module_rejected() {
        let suite = Suite::new()
            .module("a.rs", noop())
            .module("a.rs", noop());
        assert!(matches!(suite.validate(), Err(RunError::DuplicateModule(p)) if p == "a.rs"));
    }

    #[test]
    fn test_directives_merged() {
        let suite = Suite::new().module(
            "a.rs",
            TestNode::map()
                .entry("tagged #times=3", noop())
                .entry("registered", noop().only()),
        );
        let cases = suite.cases();
        assert_eq!(cases[0].directives.times, 3);
        assert!(cases[1].directives.only);
    }

    #[test]
    fn test_broken_module() {
        let suite = Suite::new().broken("bad.rs", anyhow::anyhow!("syntax error"));
        let cases = suite.cases();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].id.name, "");
        assert!(matches!(cases[0].test.func(), TestFn::Broken(_)));
    }

    #[test]
    fn test_filter_modules() {
        let suite = Suite::new()
            .module("tests/http.rs", noop())
            .module("tests/codec.rs", noop())
            .module("tests/http_tls.rs", noop());

        assert_eq!(suite.clone().filter(&["http"]).len(), 2);
        assert_eq!(suite.clone().filter::<&str>(&[]).len(), 3);
        assert!(suite.filter(&["missing"]).is_empty());
    }
}
