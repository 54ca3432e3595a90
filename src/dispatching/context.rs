//! Dispatch context for rule evaluation.

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::models::Job;

/// State passed to dispatching rules.
#[derive(Debug, Clone, Default)]
pub struct DispatchContext {
    /// Calendar day the dispatch happens on.
    pub today: Option<NaiveDate>,
    /// Position of each job in the queue (job_id → index).
    pub queue_positions: HashMap<String, usize>,
}

impl DispatchContext {
    pub fn on(today: NaiveDate) -> Self {
        Self {
            today: Some(today),
            ..Default::default()
        }
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Context recording the queue position of every job.
    pub fn for_queue(jobs: &[Job]) -> Self {
        Self::default().with_queue(jobs)
    }

    pub fn with_queue(mut self, jobs: &[Job]) -> Self {
        self.queue_positions = jobs
            .iter()
            .enumerate()
            .map(|(i, j)| (j.id.clone(), i))
            .collect();
        self
    }

    /// Days from `today` to the job's due date (negative when late).
    pub fn days_until_due(&self, job: &Job) -> Option<i64> {
        let today = self.today?;
        job.due_date.map(|due| (due - today).num_days())
    }
}
