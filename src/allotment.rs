//! Greedy job allotment.
//!
//! # Algorithm
//!
//! 1. Order jobs with the dispatching rule engine.
//! 2. For each job, take the operational printers of the required technology.
//! 3. Pick the printer that frees up earliest (ties: fleet order).
//! 4. Reserve every material the job needs, all or nothing.
//! 5. Book `total_items × build_time_per_item_ms` on that printer.
//!
//! A job that cannot get materials consumes no printer time.
//!
//! # Complexity
//! O(n log n + n * p) where n=jobs, p=printers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::dispatching::{DispatchContext, RuleEngine};
use crate::inventory::Inventory;
use crate::models::{Job, JobSchedule, Printer, UnitRef};

/// A job booked onto a printer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Allotment {
    pub job_id: String,
    pub printer_id: String,
    pub start_ms: i64,
    pub end_ms: i64,
    /// Units reserved for the job.
    pub materials: Vec<UnitRef>,
}

impl Allotment {
    #[inline]
    pub fn duration_ms(&self) -> i64 {
        self.end_ms - self.start_ms
    }
}

/// Why a job was left out of the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnallottedReason {
    /// No operational printer implements the job's technology.
    NoCapablePrinter,
    /// Material reservation failed; carries the error text.
    OutOfStock(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unallotted {
    pub job_id: String,
    pub reason: UnallottedReason,
}

/// Result of an allotment run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllotmentPlan {
    pub allotments: Vec<Allotment>,
    pub unallotted: Vec<Unallotted>,
}

impl AllotmentPlan {
    /// Latest end time across allotments (ms), or 0 when empty.
    pub fn makespan_ms(&self) -> i64 {
        self.allotments.iter().map(|a| a.end_ms).max().unwrap_or(0)
    }

    pub fn allotment_for_job(&self, job_id: &str) -> Option<&Allotment> {
        self.allotments.iter().find(|a| a.job_id == job_id)
    }

    pub fn allotments_for_printer(&self, printer_id: &str) -> Vec<&Allotment> {
        self.allotments
            .iter()
            .filter(|a| a.printer_id == printer_id)
            .collect()
    }

    /// Busy time / (makespan - start) per printer with allotments.
    pub fn printer_utilization(&self, start_ms: i64) -> HashMap<String, f64> {
        let horizon = self.makespan_ms() - start_ms;
        if horizon <= 0 {
            return HashMap::new();
        }
        let mut busy: HashMap<String, i64> = HashMap::new();
        for a in &self.allotments {
            *busy.entry(a.printer_id.clone()).or_insert(0) += a.duration_ms();
        }
        busy.into_iter()
            .map(|(id, b)| (id, b as f64 / horizon as f64))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.unallotted.is_empty()
    }
}

/// Greedy allotter.
///
/// # Example
///
/// ```
/// use printfarm_ops::allotment::Allotter;
/// use printfarm_ops::inventory::Inventory;
/// use printfarm_ops::models::{
///     ItemGroup, Job, MaterialKind, MaterialRequirement, MaterialUnit, Printer, PrinterTechnology,
/// };
///
/// let mut jobs = vec![Job::new("J1", PrinterTechnology::Fdm).with_item_group(
///     ItemGroup::new("part", 2).with_material(MaterialRequirement::new("PLA", "#FFFFFF")),
/// )];
/// let printers = vec![Printer::new("P1", PrinterTechnology::Fdm).with_build_time(1_000)];
/// let mut inventory = Inventory::new()
///     .with_unit(MaterialUnit::new("SP-1", MaterialKind::Spool, "PLA", "#FFFFFF", 1000.0));
///
/// let plan = Allotter::new().allot(&mut jobs, &printers, &mut inventory, 0);
/// assert_eq!(plan.allotments.len(), 1);
/// assert_eq!(plan.makespan_ms(), 2_000);
/// ```
#[derive(Debug, Clone)]
pub struct Allotter {
    rule_engine: RuleEngine,
    today: Option<NaiveDate>,
    busy_until: HashMap<String, i64>,
}

impl Allotter {
    pub fn new() -> Self {
        Self {
            rule_engine: RuleEngine::farm_default(),
            today: None,
            busy_until: HashMap::new(),
        }
    }

    pub fn with_rule_engine(mut self, engine: RuleEngine) -> Self {
        self.rule_engine = engine;
        self
    }

    /// Reference day for date-aware rules.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Marks a printer busy until `time_ms` (e.g. its current print).
    pub fn with_busy_until(mut self, printer_id: impl Into<String>, time_ms: i64) -> Self {
        self.busy_until.insert(printer_id.into(), time_ms);
        self
    }

    /// Allots `jobs` onto `printers`, reserving materials in `inventory`.
    ///
    /// Allotted jobs get their `schedule` filled; already scheduled jobs are skipped.
    pub fn allot(
        &self,
        jobs: &mut [Job],
        printers: &[Printer],
        inventory: &mut Inventory,
        start_ms: i64,
    ) -> AllotmentPlan {
        let mut plan = AllotmentPlan::default();
        let mut free_at: HashMap<&str, i64> = printers
            .iter()
            .filter(|p| p.is_operational())
            .map(|p| {
                let busy = self.busy_until.get(&p.id).copied().unwrap_or(start_ms);
                (p.id.as_str(), busy.max(start_ms))
            })
            .collect();

        let mut ctx = DispatchContext::for_queue(jobs);
        ctx.today = self.today;
        let order = self.rule_engine.sort_indices(jobs, &ctx);

        for idx in order {
            let job = &mut jobs[idx];
            if job.is_scheduled() {
                continue;
            }

            let mut best: Option<(&Printer, i64)> = None;
            for p in printers.iter().filter(|p| p.technology == job.required_technology) {
                if let Some(&t) = free_at.get(p.id.as_str()) {
                    if best.map_or(true, |(_, bt)| t < bt) {
                        best = Some((p, t));
                    }
                }
            }

            let Some((printer, start)) = best else {
                debug!(job = %job.id, tech = %job.required_technology, "no capable printer");
                plan.unallotted.push(Unallotted {
                    job_id: job.id.clone(),
                    reason: UnallottedReason::NoCapablePrinter,
                });
                continue;
            };

            let materials = match inventory.assign_all(job.material_requirements(), printer, &job.id) {
                Ok(units) => units,
                Err(err) => {
                    plan.unallotted.push(Unallotted {
                        job_id: job.id.clone(),
                        reason: UnallottedReason::OutOfStock(err.to_string()),
                    });
                    continue;
                }
            };

            let end = start + job.total_items() as i64 * printer.build_time_ms();
            job.schedule = Some(JobSchedule::new(&printer.id, start, end));
            free_at.insert(printer.id.as_str(), end);

            info!(job = %job.id, printer = %printer.id, start, end, "job allotted");
            plan.allotments.push(Allotment {
                job_id: job.id.clone(),
                printer_id: printer.id.clone(),
                start_ms: start,
                end_ms: end,
                materials,
            });
        }

        plan
    }
}

impl Default for Allotter {
    fn default() -> Self {
        Self::new()
    }
}
