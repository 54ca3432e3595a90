//! Job queue builder.
//!
//! Derives one print job per pending order. Queue position follows the
//! order list; priority is carried on the job for [`crate::dispatching`]
//! to use later.

use tracing::debug;

use crate::config::FarmConfig;
use crate::models::{ItemGroup, Job, MaterialRequirement, Order, OrderStatus};

/// Prefix of job ids derived from orders.
pub const JOB_ID_PREFIX: &str = "JOB-";

/// Builds jobs from orders.
#[derive(Debug, Clone)]
pub struct JobQueueBuilder {
    placeholder: MaterialRequirement,
}

impl JobQueueBuilder {
    pub fn new(placeholder: MaterialRequirement) -> Self {
        Self { placeholder }
    }

    pub fn from_config(config: &FarmConfig) -> Self {
        Self::new(config.placeholder_material.clone())
    }

    /// One job per `pending` order, in input order.
    pub fn build(&self, orders: &[Order]) -> Vec<Job> {
        let jobs: Vec<Job> = orders
            .iter()
            .filter(|o| o.status == OrderStatus::Pending)
            .map(|o| self.job_for(o))
            .collect();
        debug!(orders = orders.len(), jobs = jobs.len(), "built job queue");
        jobs
    }

    /// The job derived from a single order, regardless of its status.
    pub fn job_for(&self, order: &Order) -> Job {
        let name = if order.order_number.is_empty() {
            order.id.clone()
        } else {
            order.order_number.clone()
        };
        let mut job = Job::new(job_id_for(&order.id), order.printer_tech)
            .with_name(format!("{} - {}", name, order.customer))
            .with_project_code(order.project_code.clone())
            .with_order(order.id.clone())
            .with_priority(order.priority)
            .with_item_group(
                ItemGroup::new(name, order.items).with_material(self.placeholder.clone()),
            );
        job.due_date = order.due_date;
        job
    }
}

impl Default for JobQueueBuilder {
    fn default() -> Self {
        Self::from_config(&FarmConfig::default())
    }
}

/// Job id for an order id.
pub fn job_id_for(order_id: &str) -> String {
    format!("{JOB_ID_PREFIX}{order_id}")
}

/// Shorthand for [`JobQueueBuilder::build`] with an explicit placeholder.
pub fn build_job_queue(orders: &[Order], placeholder: &MaterialRequirement) -> Vec<Job> {
    JobQueueBuilder::new(placeholder.clone()).build(orders)
}
