//! Case selection and ordering
//!
//! Builds the directive sets once, then partitions cases into the run-list
//! and the pre-skipped list before anything executes.

use std::collections::HashSet;
use std::fmt;

use crate::models::{CaseId, CaseResult};
use crate::suite::{Case, Test};

/// Case identities grouped by selection directive
#[derive(Debug, Default)]
pub struct DirectiveSets {
    pub always: HashSet<CaseId>,
    pub only: HashSet<CaseId>,
    pub skip: HashSet<CaseId>,
}

impl DirectiveSets {
    pub fn extract(cases: &[Case]) -> Self {
        let mut sets = Self::default();
        for case in cases {
            if case.directives.always {
                sets.always.insert(case.id.clone());
            }
            if case.directives.only {
                sets.only.insert(case.id.clone());
            }
            if case.directives.skip {
                sets.skip.insert(case.id.clone());
            }
        }
        sets
    }

    /// Selection rule: skip beats everything, then the only filter applies
    pub fn select(&self, id: &CaseId) -> Selection {
        if self.skip.contains(id) {
            Selection::Skip(SkipReason::Directive)
        } else if !self.only.is_empty() && !self.always.contains(id) && !self.only.contains(id) {
            Selection::Skip(SkipReason::NotOnly)
        } else {
            Selection::Run
        }
    }
}

/// Planned status of a case
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    Run,
    Skip(SkipReason),
}

/// Why a case was left out of the run-list
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    Directive,
    NotOnly,
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::Run => write!(f, "run"),
            Selection::Skip(SkipReason::Directive) => write!(f, "skip"),
            Selection::Skip(SkipReason::NotOnly) => write!(f, "skip (only)"),
        }
    }
}

/// A case selected to run
#[derive(Debug)]
pub struct Scheduled {
    pub test: Test,
    pub times: u32,
    pub result: CaseResult,
}

/// Run-list plus the cases filtered out up front
#[derive(Debug, Default)]
pub struct Schedule {
    pub run_list: Vec<Scheduled>,
    pub skipped: Vec<CaseResult>,
}

/// Planned status of every case, in discovery order
pub fn plan(cases: &[Case]) -> Vec<Selection> {
    let sets = DirectiveSets::extract(cases);
    cases.iter().map(|case| sets.select(&case.id)).collect()
}

/// Partition cases into the run-list and the skipped list
///
/// Selected cases get sequential 1-based indexes; once the run-list is final
/// every entry learns its total length.
pub fn schedule(cases: Vec<Case>) -> Schedule {
    let selections = plan(&cases);
    let mut schedule = Schedule::default();

    for (case, selection) in cases.into_iter().zip(selections) {
        let mut result = CaseResult::new(case.id);
        match selection {
            Selection::Skip(_) => schedule.skipped.push(result),
            Selection::Run => {
                result.index = Some(schedule.run_list.len() + 1);
                schedule.run_list.push(Scheduled {
                    test: case.test,
                    times: case.directives.times,
                    result,
                });
            }
        }
    }

    let length = schedule.run_list.len();
    for scheduled in &mut schedule.run_list {
        scheduled.result.length = Some(length);
    }

    schedule
}
