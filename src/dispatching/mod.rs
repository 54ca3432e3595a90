//! Dispatching rules and rule engine for the job queue.
//!
//! The queue builder keeps order-book order. Dispatching decides which job
//! goes to a printer first when the farm allots work.
//!
//! # Usage
//!
//! ```
//! use printfarm_ops::dispatching::{rules, DispatchContext, RuleEngine};
//!
//! let engine = RuleEngine::new()
//!     .with_rule(rules::PriorityRule)
//!     .with_rule(rules::Edd);
//!
//! let context = DispatchContext::default();
//! assert!(engine.sort_indices(&[], &context).is_empty());
//! ```

mod context;
mod engine;
pub mod rules;

pub use context::DispatchContext;
pub use engine::{EvaluationMode, RuleEngine, TieBreaker};
pub use rules::RuleKind;

use crate::models::Job;
use std::fmt::Debug;

/// Score returned by a dispatching rule.
///
/// Lower scores = dispatched first.
pub type RuleScore = f64;

/// A dispatching rule that evaluates job urgency.
///
/// # Score Convention
/// **Lower score = higher priority.** Rules return smaller values for jobs
/// that should reach a printer first.
pub trait DispatchingRule: Send + Sync + Debug {
    /// Rule name (e.g., "PRIORITY", "EDD").
    fn name(&self) -> &'static str;

    /// Evaluates a job given the current dispatch context.
    fn evaluate(&self, job: &Job, context: &DispatchContext) -> RuleScore;

    fn description(&self) -> &'static str {
        self.name()
    }
}
