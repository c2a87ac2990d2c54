//! Reporting hooks
//!
//! A [`Reporter`] is told when each executed case starts and ends. Both
//! hooks are awaited before the run moves on, and an error from either one
//! aborts the whole run.

mod console;

pub use console::ConsoleReporter;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::CaseResult;

/// Per-case reporting hooks
#[async_trait]
pub trait Reporter: Send {
    /// Called before the case executes
    async fn on_test_start(&mut self, _case: &CaseResult) -> Result<()> {
        Ok(())
    }

    /// Called after the case executed, with `duration` and `error` filled in
    async fn on_test_end(&mut self, _case: &CaseResult) -> Result<()> {
        Ok(())
    }
}

/// Reporter that ignores every event
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopReporter;

impl Reporter for NoopReporter {}

type HookFn = Box<dyn FnMut(&CaseResult) -> Result<()> + Send>;

/// Reporter built from optional closures
#[derive(Default)]
pub struct Hooks {
    on_test_start: Option<HookFn>,
    on_test_end: Option<HookFn>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Closure run before each executed case
    pub fn with_test_start<F>(mut self, f: F) -> Self
    where
        F: FnMut(&CaseResult) -> Result<()> + Send + 'static,
    {
        self.on_test_start = Some(Box::new(f));
        self
    }

    /// Closure run after each executed case
    pub fn with_test_end<F>(mut self, f: F) -> Self
    where
        F: FnMut(&CaseResult) -> Result<()> + Send + 'static,
    {
        self.on_test_end = Some(Box::new(f));
        self
    }
}

#[async_trait]
impl Reporter for Hooks {
    async fn on_test_start(&mut self, case: &CaseResult) -> Result<()> {
        match self.on_test_start.as_mut() {
            Some(hook) => hook(case),
            None => Ok(()),
        }
    }

    async fn on_test_end(&mut self, case: &CaseResult) -> Result<()> {
        match self.on_test_end.as_mut() {
            Some(hook) => hook(case),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CaseId;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_hooks_fire_closures() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let start = seen.clone();
        let mut hooks = Hooks::new().with_test_start(move |case| {
            start.lock().unwrap().push(case.name.clone());
            Ok(())
        });

        let case = CaseResult::new(CaseId::new("m.rs", "first"));
        tokio_test::block_on(hooks.on_test_start(&case)).unwrap();
        tokio_test::block_on(hooks.on_test_end(&case)).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["first".to_string()]);
    }

    #[test]
    fn test_hook_error_propagates() {
        let mut hooks = Hooks::new().with_test_end(|_| anyhow::bail!("sink closed"));
        let case = CaseResult::new(CaseId::new("m.rs", "x"));
        let err = tokio_test::block_on(hooks.on_test_end(&case)).unwrap_err();
        assert_eq!(err.to_string(), "sink closed");
    }

    #[tokio::test]
    async fn test_hooks_called_with_method_syntax() {
        let mut hooks = Hooks::new()
            .with_test_start(|case| {
                anyhow::ensure!(case.error.is_none(), "started with error");
                Ok(())
            })
            .with_test_end(|case| {
                anyhow::ensure!(case.duration.is_some(), "no duration");
                Ok(())
            });

        let mut case = CaseResult::new(CaseId::new("m.rs", "timed"));
        hooks.on_test_start(&case).await.unwrap();
        assert!(hooks.on_test_end(&case).await.is_err());

        case.duration = Some("0.001".to_string());
        hooks.on_test_end(&case).await.unwrap();
    }

    #[test]
    fn test_noop_reporter() {
        let case = CaseResult::new(CaseId::new("m.rs", "x"));
        assert!(tokio_test::block_on(NoopReporter.on_test_start(&case)).is_ok());
    }
}
