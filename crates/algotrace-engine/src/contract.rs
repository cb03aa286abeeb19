//! The contract every algorithm implements.
//!
//! An algorithm is metadata ([`Descriptor`]), a pure validator, and a
//! suspendable procedure. The procedure is an `async` body: each `.await` on a
//! [`Tracer`] emission is a suspension point that hands one event to the
//! engine, and awaiting a nested async procedure forwards its suspension
//! points outward as if they were the caller's own.

use std::fmt;

use futures::future::LocalBoxFuture;
use serde::Serialize;

use crate::error::RunResult;
use crate::input::{Input, InputShape};
use crate::params::{ParamSpec, Params};
use crate::tracer::Tracer;

/// A running procedure, polled one suspension at a time.
pub type Procedure = LocalBoxFuture<'static, RunResult>;

/// Fixed taxonomy used by catalog views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Sorting,
    Searching,
    Arrays,
    Strings,
    Stacks,
    Queues,
    LinkedLists,
    Recursion,
    Backtracking,
    Trees,
    Dp,
    Hashing,
}

impl Category {
    pub const ALL: [Category; 12] = [
        Category::Sorting,
        Category::Searching,
        Category::Arrays,
        Category::Strings,
        Category::Stacks,
        Category::Queues,
        Category::LinkedLists,
        Category::Recursion,
        Category::Backtracking,
        Category::Trees,
        Category::Dp,
        Category::Hashing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Sorting => "sorting",
            Category::Searching => "searching",
            Category::Arrays => "arrays",
            Category::Strings => "strings",
            Category::Stacks => "stacks",
            Category::Queues => "queues",
            Category::LinkedLists => "linked-lists",
            Category::Recursion => "recursion",
            Category::Backtracking => "backtracking",
            Category::Trees => "trees",
            Category::Dp => "dp",
            Category::Hashing => "hashing",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// Descriptive complexity; never enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeComplexity {
    pub best: &'static str,
    pub average: &'static str,
    pub worst: &'static str,
}

impl TimeComplexity {
    pub const fn new(best: &'static str, average: &'static str, worst: &'static str) -> Self {
        Self {
            best,
            average,
            worst,
        }
    }

    pub const fn uniform(all: &'static str) -> Self {
        Self::new(all, all, all)
    }
}

/// Immutable metadata for one algorithm.
#[derive(Debug, Clone, Serialize)]
pub struct Descriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub category: Category,
    pub difficulty: Difficulty,
    pub input: InputShape,
    /// Targets of `highlight` events, addressed 1-based.
    pub pseudocode: &'static [&'static str],
    pub time: TimeComplexity,
    pub space: &'static str,
    pub parameters: Vec<ParamSpec>,
}

/// Verdict of a validator: `{ok: true}` or `{ok: false, error}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Validation {
    pub fn ok() -> Self {
        Self {
            ok: true,
            error: None,
        }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
        }
    }

    /// Fails unless `condition` holds.
    pub fn require(condition: bool, error: impl FnOnce() -> String) -> Self {
        if condition {
            Self::ok()
        } else {
            Self::fail(error())
        }
    }

    pub fn is_ok(&self) -> bool {
        self.ok
    }

    pub fn into_result(self) -> Result<(), String> {
        match self.error {
            Some(error) if !self.ok => Err(error),
            _ if !self.ok => Err("invalid input".to_string()),
            _ => Ok(()),
        }
    }
}

/// One algorithm as seen by the engine and the registry.
pub trait Algorithm: Send + Sync {
    fn descriptor(&self) -> &Descriptor;

    /// Pure predicate gating execution; must not mutate anything.
    fn validate(&self, input: &Input) -> Validation;

    /// Build the suspendable procedure. Owns its copy of `input`.
    fn run(&self, input: Input, params: Params, tx: Tracer) -> Procedure;
}

pub type ValidateFn = fn(&Input) -> Validation;
pub type RunFn = fn(Input, Params, Tracer) -> Procedure;

/// An [`Algorithm`] assembled from a descriptor and two plain functions.
pub struct AlgorithmDef {
    descriptor: Descriptor,
    validate: ValidateFn,
    run: RunFn,
}

impl AlgorithmDef {
    pub fn new(descriptor: Descriptor, validate: ValidateFn, run: RunFn) -> Self {
        Self {
            descriptor,
            validate,
            run,
        }
    }
}

impl fmt::Debug for AlgorithmDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlgorithmDef")
            .field("id", &self.descriptor.id)
            .finish_non_exhaustive()
    }
}

impl Algorithm for AlgorithmDef {
    fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    fn validate(&self, input: &Input) -> Validation {
        if input.shape() != self.descriptor.input {
            return Validation::fail(format!(
                "{} expects {}, got {}",
                self.descriptor.name,
                self.descriptor.input,
                input.shape()
            ));
        }
        (self.validate)(input)
    }

    fn run(&self, input: Input, params: Params, tx: Tracer) -> Procedure {
        (self.run)(input, params, tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_wire_shape() {
        assert_eq!(serde_json::to_value(Validation::ok()).unwrap(), serde_json::json!({"ok": true}));
        assert_eq!(
            serde_json::to_value(Validation::fail("too long")).unwrap(),
            serde_json::json!({"ok": false, "error": "too long"})
        );
        assert_eq!(Validation::fail("bad").into_result(), Err("bad".to_string()));
        assert!(Validation::require(true, || unreachable!()).is_ok());
    }

    #[test]
    fn category_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.as_str()), Some(category));
        }
        assert_eq!(Category::parse("graphs"), None);
        assert_eq!(serde_json::to_value(Category::LinkedLists).unwrap(), "linked-lists");
    }
}
