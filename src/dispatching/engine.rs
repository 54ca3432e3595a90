//! Rule engine for multi-criteria dispatching.
//!
//! Every rule scores every job once; the resulting score table is then
//! compared either rule by rule (sequential) or as a weighted sum.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;

use super::{DispatchContext, DispatchingRule, RuleScore};
use crate::config::DispatchConfig;
use crate::models::Job;

/// How multiple rules are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationMode {
    /// Compare by the first rule; later rules only break ties.
    #[default]
    Sequential,
    /// Compare by the weighted sum of all rule scores.
    Weighted,
}

/// What decides between jobs that score equal on every rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TieBreaker {
    /// Keep queue order.
    #[default]
    Stable,
    /// Job id, lexicographic.
    ById,
}

/// Ranks queued jobs.
///
/// # Example
/// ```
/// use printfarm_ops::dispatching::{rules, RuleEngine, TieBreaker};
///
/// let engine = RuleEngine::new()
///     .with_rule(rules::Edd)
///     .with_rule(rules::Smallest)
///     .with_final_tie_breaker(TieBreaker::ById);
/// ```
#[derive(Clone)]
pub struct RuleEngine {
    rules: Vec<(Arc<dyn DispatchingRule>, f64)>,
    mode: EvaluationMode,
    tie_breaker: TieBreaker,
}

const EPSILON: f64 = 1e-9;

impl RuleEngine {
    /// Creates an engine with no rules (queue order).
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            mode: EvaluationMode::Sequential,
            tie_breaker: TieBreaker::Stable,
        }
    }

    /// Farm default: priority, then earliest due date, then job id.
    pub fn farm_default() -> Self {
        Self::from_config(&DispatchConfig::default())
    }

    /// Engine described by a farm's dispatch settings. Ties end on job id.
    pub fn from_config(config: &DispatchConfig) -> Self {
        let mut engine = Self::new()
            .with_mode(config.mode)
            .with_final_tie_breaker(TieBreaker::ById);
        for entry in &config.rules {
            engine.push(entry.rule.build(), entry.weight);
        }
        engine
    }

    fn push(&mut self, rule: Arc<dyn DispatchingRule>, weight: f64) {
        self.rules.push((rule, weight));
    }

    /// Adds a rule with weight 1.0.
    pub fn with_rule<R: DispatchingRule + 'static>(self, rule: R) -> Self {
        self.with_weighted_rule(rule, 1.0)
    }

    /// Adds a rule; the weight only matters in [`EvaluationMode::Weighted`].
    pub fn with_weighted_rule<R: DispatchingRule + 'static>(mut self, rule: R, weight: f64) -> Self {
        self.push(Arc::new(rule), weight);
        self
    }

    pub fn with_mode(mut self, mode: EvaluationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_final_tie_breaker(mut self, tie_breaker: TieBreaker) -> Self {
        self.tie_breaker = tie_breaker;
        self
    }

    /// Names of the configured rules, in evaluation order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|(r, _)| r.name()).collect()
    }

    /// Returns indices into `jobs`, first-to-dispatch first.
    pub fn sort_indices(&self, jobs: &[Job], context: &DispatchContext) -> Vec<usize> {
        let table: Vec<Vec<RuleScore>> = jobs
            .iter()
            .map(|job| {
                self.rules
                    .iter()
                    .map(|(rule, _)| rule.evaluate(job, context))
                    .collect()
            })
            .collect();

        let mut indices: Vec<usize> = (0..jobs.len()).collect();
        indices.sort_by(|&a, &b| {
            self.compare_scores(&table[a], &table[b])
                .then_with(|| self.final_tie(&jobs[a], &jobs[b]))
        });
        indices
    }

    /// Index of the job to dispatch first.
    pub fn select_best(&self, jobs: &[Job], context: &DispatchContext) -> Option<usize> {
        self.sort_indices(jobs, context).first().copied()
    }

    fn compare_scores(&self, a: &[RuleScore], b: &[RuleScore]) -> Ordering {
        match self.mode {
            EvaluationMode::Sequential => a
                .iter()
                .zip(b)
                .find(|(x, y)| (*x - *y).abs() > EPSILON)
                .map_or(Ordering::Equal, |(x, y)| x.total_cmp(y)),
            EvaluationMode::Weighted => {
                let sum = |scores: &[RuleScore]| -> f64 {
                    scores.iter().zip(&self.rules).map(|(s, (_, w))| s * w).sum()
                };
                let (x, y) = (sum(a), sum(b));
                if (x - y).abs() > EPSILON {
                    x.total_cmp(&y)
                } else {
                    Ordering::Equal
                }
            }
        }
    }

    fn final_tie(&self, a: &Job, b: &Job) -> Ordering {
        match self.tie_breaker {
            TieBreaker::Stable => Ordering::Equal,
            TieBreaker::ById => a.id.cmp(&b.id),
        }
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::farm_default()
    }
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field("rules", &self.rule_names())
            .field("mode", &self.mode)
            .field("tie_breaker", &self.tie_breaker)
            .finish()
    }
}
