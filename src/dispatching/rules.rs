//! Built-in dispatching rules.
//!
//! - **Priority**: PRIORITY
//! - **Due-date**: EDD, SLACK
//! - **Queue**: FIFO
//! - **Size**: SMALLEST (fewest items first)
//!
//! All rules return lower scores for jobs that should print first.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{DispatchContext, DispatchingRule, RuleScore};
use crate::models::Job;

/// Built-in rule names as they appear in farm configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RuleKind {
    Priority,
    Edd,
    Slack,
    Fifo,
    Smallest,
}

impl RuleKind {
    pub fn build(self) -> Arc<dyn DispatchingRule> {
        match self {
            RuleKind::Priority => Arc::new(PriorityRule),
            RuleKind::Edd => Arc::new(Edd),
            RuleKind::Slack => Arc::new(Slack),
            RuleKind::Fifo => Arc::new(Fifo),
            RuleKind::Smallest => Arc::new(Smallest),
        }
    }
}

/// Order priority, high first.
#[derive(Debug, Clone, Copy)]
pub struct PriorityRule;

impl DispatchingRule for PriorityRule {
    fn name(&self) -> &'static str {
        "PRIORITY"
    }

    fn evaluate(&self, job: &Job, _context: &DispatchContext) -> RuleScore {
        -(job.priority.weight() as f64)
    }

    fn description(&self) -> &'static str {
        "Order Priority"
    }
}

/// Earliest Due Date.
///
/// Jobs without a due date go last.
#[derive(Debug, Clone, Copy)]
pub struct Edd;

impl DispatchingRule for Edd {
    fn name(&self) -> &'static str {
        "EDD"
    }

    fn evaluate(&self, job: &Job, _context: &DispatchContext) -> RuleScore {
        job.due_date
            .map(|d| d.num_days_from_ce() as f64)
            .unwrap_or(f64::MAX)
    }

    fn description(&self) -> &'static str {
        "Earliest Due Date"
    }
}

/// Days of slack until the due date, relative to `context.today`.
///
/// Without a reference day or a due date the job gets maximum slack.
#[derive(Debug, Clone, Copy)]
pub struct Slack;

impl DispatchingRule for Slack {
    fn name(&self) -> &'static str {
        "SLACK"
    }

    fn evaluate(&self, job: &Job, context: &DispatchContext) -> RuleScore {
        context
            .days_until_due(job)
            .map(|d| d as f64)
            .unwrap_or(f64::MAX)
    }

    fn description(&self) -> &'static str {
        "Minimum Slack (days)"
    }
}

/// Queue position, using `context.queue_positions`.
///
/// Jobs missing from the context go last.
#[derive(Debug, Clone, Copy)]
pub struct Fifo;

impl DispatchingRule for Fifo {
    fn name(&self) -> &'static str {
        "FIFO"
    }

    fn evaluate(&self, job: &Job, context: &DispatchContext) -> RuleScore {
        context
            .queue_positions
            .get(&job.id)
            .map(|&p| p as f64)
            .unwrap_or(f64::MAX)
    }

    fn description(&self) -> &'static str {
        "First In First Out"
    }
}

/// Fewest items first (shortest build).
#[derive(Debug, Clone, Copy)]
pub struct Smallest;

impl DispatchingRule for Smallest {
    fn name(&self) -> &'static str {
        "SMALLEST"
    }

    fn evaluate(&self, job: &Job, _context: &DispatchContext) -> RuleScore {
        job.total_items() as f64
    }

    fn description(&self) -> &'static str {
        "Fewest Items"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ItemGroup, PrinterTechnology, Priority};
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, d).unwrap()
    }

    fn job(id: &str, priority: Priority, due: Option<NaiveDate>, items: u32) -> Job {
        let mut j = Job::new(id, PrinterTechnology::Fdm)
            .with_priority(priority)
            .with_item_group(ItemGroup::new("g", items));
        j.due_date = due;
        j
    }

    #[test]
    fn test_priority() {
        let ctx = DispatchContext::default();
        let high = job("h", Priority::High, None, 1);
        let low = job("l", Priority::Low, None, 1);
        assert!(PriorityRule.evaluate(&high, &ctx) < PriorityRule.evaluate(&low, &ctx));
    }

    #[test]
    fn test_edd() {
        let ctx = DispatchContext::default();
        let early = job("e", Priority::Low, Some(day(2)), 1);
        let late = job("l", Priority::Low, Some(day(20)), 1);
        let none = job("n", Priority::Low, None, 1);
        assert!(Edd.evaluate(&early, &ctx) < Edd.evaluate(&late, &ctx));
        assert!(Edd.evaluate(&late, &ctx) < Edd.evaluate(&none, &ctx));
    }

    #[test]
    fn test_slack() {
        let ctx = DispatchContext::on(day(10));
        let overdue = job("o", Priority::Low, Some(day(8)), 1);
        let soon = job("s", Priority::Low, Some(day(12)), 1);
        assert!((Slack.evaluate(&overdue, &ctx) + 2.0).abs() < 1e-10);
        assert!((Slack.evaluate(&soon, &ctx) - 2.0).abs() < 1e-10);

        let no_today = DispatchContext::default();
        assert_eq!(Slack.evaluate(&soon, &no_today), f64::MAX);
    }

    #[test]
    fn test_fifo() {
        let jobs = vec![
            job("first", Priority::Low, None, 1),
            job("second", Priority::High, None, 1),
        ];
        let ctx = DispatchContext::for_queue(&jobs);
        assert!(Fifo.evaluate(&jobs[0], &ctx) < Fifo.evaluate(&jobs[1], &ctx));
        let stranger = job("x", Priority::Low, None, 1);
        assert_eq!(Fifo.evaluate(&stranger, &ctx), f64::MAX);
    }

    #[test]
    fn test_rule_kind_names() {
        for (kind, name) in [
            (RuleKind::Priority, "PRIORITY"),
            (RuleKind::Edd, "EDD"),
            (RuleKind::Slack, "SLACK"),
            (RuleKind::Fifo, "FIFO"),
            (RuleKind::Smallest, "SMALLEST"),
        ] {
            assert_eq!(kind.build().name(), name);
            assert_eq!(serde_json::to_string(&kind).unwrap(), format!("\"{name}\""));
        }
    }

    #[test]
    fn test_smallest() {
        let ctx = DispatchContext::default();
        let small = job("s", Priority::Low, None, 2);
        let big = job("b", Priority::Low, None, 40);
        assert!(Smallest.evaluate(&small, &ctx) < Smallest.evaluate(&big, &ctx));
    }
}
