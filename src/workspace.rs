//! Farm workspace.
//!
//! A [`Workspace`] is one tenant's farm: its order book, printer fleet and
//! stock. All dashboard actions go through it. [`FarmRegistry`] holds the
//! workspaces of every tenant.
//!
//! State is in memory only. [`Workspace::snapshot_json`] exports it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::allotment::{AllotmentPlan, Allotter};
use crate::config::FarmConfig;
use crate::dispatching::{DispatchContext, RuleEngine};
use crate::error::{FarmError, Result};
use crate::inventory::Inventory;
use crate::models::{
    Job, MaterialRequirement, MaterialUnit, Order, OrderStatus, Printer, PrinterStatus, UnitRef,
};
use crate::queue::{job_id_for, JobQueueBuilder};
use crate::status;
use crate::summary::FarmSummary;

/// One farm's operational state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workspace {
    pub farm_id: String,
    pub config: FarmConfig,
    orders: Vec<Order>,
    printers: Vec<Printer>,
    inventory: Inventory,
    next_order_number: u64,
}

impl Workspace {
    pub fn new(farm_id: impl Into<String>, config: FarmConfig) -> Self {
        Self {
            farm_id: farm_id.into(),
            config,
            orders: Vec::new(),
            printers: Vec::new(),
            inventory: Inventory::new(),
            next_order_number: 1,
        }
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn printers(&self) -> &[Printer] {
        &self.printers
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn order(&self, order_id: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == order_id)
    }

    pub fn printer(&self, printer_id: &str) -> Option<&Printer> {
        self.printers.iter().find(|p| p.id == printer_id)
    }

    fn order_mut(&mut self, order_id: &str) -> Result<&mut Order> {
        self.orders
            .iter_mut()
            .find(|o| o.id == order_id)
            .ok_or_else(|| FarmError::not_found("order", order_id))
    }

    fn printer_index(&self, printer_id: &str) -> Result<usize> {
        self.printers
            .iter()
            .position(|p| p.id == printer_id)
            .ok_or_else(|| FarmError::not_found("printer", printer_id))
    }

    /// Order a job was derived from.
    pub fn order_for_job(&self, job_id: &str) -> Option<&Order> {
        self.orders.iter().find(|o| job_id_for(&o.id) == job_id)
    }

    /// Records a new order as `pending`, numbering it when it has no number.
    pub fn submit_order(&mut self, mut order: Order) -> Result<&Order> {
        if self.order(&order.id).is_some() {
            return Err(FarmError::duplicate("order", order.id));
        }
        order.status = OrderStatus::Pending;
        if order.order_number.is_empty() {
            order.order_number = self.next_free_order_number();
        }
        info!(farm = %self.farm_id, order = %order.id, number = %order.order_number, "order submitted");
        self.orders.push(order);
        Ok(&self.orders[self.orders.len() - 1])
    }

    /// Next `ORD-<n>` not already used by a caller-supplied number.
    fn next_free_order_number(&mut self) -> String {
        loop {
            let candidate = format!("ORD-{}", self.next_order_number);
            self.next_order_number += 1;
            if !self.orders.iter().any(|o| o.order_number == candidate) {
                return candidate;
            }
        }
    }

    /// Adds a printer to the fleet.
    ///
    /// A printer without a build time gets `config.default_build_time_per_item_ms`.
    pub fn add_printer(&mut self, mut printer: Printer) -> Result<()> {
        if self.printer(&printer.id).is_some() {
            return Err(FarmError::duplicate("printer", printer.id));
        }
        if printer.build_time_per_item_ms.is_none() {
            printer.build_time_per_item_ms = Some(self.config.default_build_time_per_item_ms);
        }
        debug!(farm = %self.farm_id, printer = %printer.id, tech = %printer.technology, "printer added");
        self.printers.push(printer);
        Ok(())
    }

    /// Adds a stock unit.
    pub fn add_unit(&mut self, unit: MaterialUnit) -> Result<UnitRef> {
        self.inventory.add_unit(unit)
    }

    /// Moves an order forward in the workflow.
    pub fn advance_order(&mut self, order_id: &str, target: OrderStatus) -> Result<OrderStatus> {
        let order = self.order_mut(order_id)?;
        status::transition(order, target)
    }

    /// Labels late `in-progress` orders as `overdue`.
    ///
    /// Late `pending` orders keep their label so they stay in the job queue;
    /// [`status::is_overdue`] still counts them. Returns the ids of the
    /// orders that changed.
    pub fn mark_overdue(&mut self, today: NaiveDate) -> Vec<String> {
        let mut changed = Vec::new();
        for order in &mut self.orders {
            if order.status == OrderStatus::InProgress
                && status::is_overdue(order, today)
                && status::transition(order, OrderStatus::Overdue).is_ok()
            {
                changed.push(order.id.clone());
            }
        }
        if !changed.is_empty() {
            info!(farm = %self.farm_id, count = changed.len(), "orders marked overdue");
        }
        changed
    }

    /// Jobs for every pending order.
    pub fn job_queue(&self) -> Vec<Job> {
        JobQueueBuilder::from_config(&self.config).build(&self.orders)
    }

    /// Printer whose current job is `job_id`.
    pub fn printer_running(&self, job_id: &str) -> Option<&Printer> {
        self.printers
            .iter()
            .find(|p| p.current_job.as_deref() == Some(job_id))
    }

    /// Dispatch rules from the farm config.
    pub fn rule_engine(&self) -> RuleEngine {
        RuleEngine::from_config(&self.config.dispatch)
    }

    /// The queued job the dispatch rules put first on `today`.
    pub fn next_job(&self, today: NaiveDate) -> Option<Job> {
        let mut jobs = self.job_queue();
        let ctx = DispatchContext::for_queue(&jobs).with_today(today);
        let best = self.rule_engine().select_best(&jobs, &ctx)?;
        Some(jobs.swap_remove(best))
    }

    fn normalize(&self, requirement: &MaterialRequirement) -> MaterialRequirement {
        let mut req = requirement.clone();
        if req.finish.is_empty() {
            req.finish = self.config.default_finish.clone();
        }
        req
    }

    /// Reserves one unit matching `requirement` for a printer+job pair.
    pub fn assign_material(
        &mut self,
        requirement: &MaterialRequirement,
        printer_id: &str,
        job_id: &str,
    ) -> Result<UnitRef> {
        let idx = self.printer_index(printer_id)?;
        let req = self.normalize(requirement);
        self.inventory.assign(&req, &self.printers[idx], job_id)
    }

    /// Returns a unit to stock with the amount consumed.
    pub fn return_material(&mut self, unit: &UnitRef, used_amount: f64) -> Result<()> {
        self.inventory.return_unit(unit, used_amount)
    }

    /// Returns a unit identified by scanned label text.
    pub fn return_scanned(&mut self, code: &str, used_amount: f64) -> Result<UnitRef> {
        let unit: UnitRef = code.parse()?;
        self.inventory.return_unit(&unit, used_amount)?;
        Ok(unit)
    }

    /// Manually changes a printer's status.
    pub fn set_printer_status(&mut self, printer_id: &str, target: PrinterStatus) -> Result<PrinterStatus> {
        let idx = self.printer_index(printer_id)?;
        status::set_printer_status(&mut self.printers[idx], target)
    }

    /// Starts a job on an idle printer of the right technology.
    ///
    /// Denied when another printer already runs the job, or when its source
    /// order is past production (`qc` or later). A `pending` source order
    /// moves to `in-progress`.
    pub fn start_job(&mut self, job_id: &str, printer_id: &str) -> Result<()> {
        let idx = self.printer_index(printer_id)?;
        let printer = &self.printers[idx];
        let deny = |reason: String| {
            warn!(job = job_id, printer = printer_id, %reason, "start denied");
            FarmError::ActionDenied {
                printer_id: printer.id.clone(),
                status: printer.status,
                reason,
            }
        };

        if let Some(other) = self.printer_running(job_id) {
            return Err(deny(format!("job '{job_id}' is already printing on '{}'", other.id)));
        }
        let order_id = match self.order_for_job(job_id) {
            Some(order) => {
                if order.status > OrderStatus::Overdue {
                    return Err(deny(format!("order '{}' is already {}", order.id, order.status)));
                }
                if order.printer_tech != printer.technology {
                    return Err(deny(format!(
                        "job '{job_id}' needs {}, printer is {}",
                        order.printer_tech, printer.technology
                    )));
                }
                Some(order.id.clone())
            }
            None => None,
        };

        status::start_print(&mut self.printers[idx], job_id)?;

        if let Some(order_id) = order_id {
            let order = self.order_mut(&order_id)?;
            if order.status == OrderStatus::Pending {
                status::transition(order, OrderStatus::InProgress)?;
            }
        }
        Ok(())
    }

    /// Finishes the printer's current job; its order moves to `qc`.
    pub fn finish_job(&mut self, printer_id: &str) -> Result<String> {
        let idx = self.printer_index(printer_id)?;
        let job_id = status::finish_print(&mut self.printers[idx])?;
        let order_id = self.order_for_job(&job_id).map(|o| o.id.clone());
        if let Some(order_id) = order_id {
            let order = self.order_mut(&order_id)?;
            if order.status.can_transition_to(OrderStatus::Qc) {
                status::transition(order, OrderStatus::Qc)?;
            }
        }
        Ok(job_id)
    }

    /// Allots the current queue onto the fleet, reserving materials.
    ///
    /// Jobs that already hold reserved units are left out, so repeated runs
    /// never reserve twice. A printing printer is busy until its current job
    /// would finish if started at `start_ms`. Returns the jobs considered,
    /// with their schedules filled, and the plan.
    pub fn allot(&mut self, start_ms: i64, today: NaiveDate) -> (Vec<Job>, AllotmentPlan) {
        let mut jobs: Vec<Job> = self
            .job_queue()
            .into_iter()
            .filter(|job| self.inventory.assigned_to_job(&job.id).is_empty())
            .collect();

        let mut allotter = Allotter::new()
            .with_rule_engine(self.rule_engine())
            .with_today(today);
        for printer in self.printers.iter().filter(|p| p.status == PrinterStatus::Printing) {
            let busy_until = start_ms + self.remaining_print_ms(printer);
            allotter = allotter.with_busy_until(&printer.id, busy_until);
        }

        let plan = allotter.allot(&mut jobs, &self.printers, &mut self.inventory, start_ms);
        info!(
            farm = %self.farm_id,
            allotted = plan.allotments.len(),
            unallotted = plan.unallotted.len(),
            "allotment complete"
        );
        (jobs, plan)
    }

    /// Print time of the printer's current job: its order's item count, or
    /// a single item when the job has no source order.
    fn remaining_print_ms(&self, printer: &Printer) -> i64 {
        let items = printer
            .current_job
            .as_deref()
            .and_then(|job| self.order_for_job(job))
            .map_or(1, |o| o.items.max(1));
        items as i64 * printer.build_time_ms()
    }

    pub fn summary(&self, today: NaiveDate) -> FarmSummary {
        FarmSummary::calculate(self, today)
    }

    /// Serialises the whole workspace.
    pub fn snapshot_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Restores a workspace from [`snapshot_json`](Self::snapshot_json) output.
    pub fn from_snapshot_json(json: &str) -> Result<Self> {
        let ws: Workspace = serde_json::from_str(json)?;
        ws.config.validate()?;
        Ok(ws)
    }
}

/// Workspaces of every tenant, keyed by farm id.
#[derive(Debug, Clone, Default)]
pub struct FarmRegistry {
    farms: BTreeMap<String, Workspace>,
}

impl FarmRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty farm.
    pub fn create(&mut self, farm_id: impl Into<String>, config: FarmConfig) -> Result<&mut Workspace> {
        let farm_id = farm_id.into();
        if self.farms.contains_key(&farm_id) {
            return Err(FarmError::duplicate("farm", farm_id));
        }
        config.validate()?;
        info!(farm = %farm_id, "farm created");
        Ok(self
            .farms
            .entry(farm_id.clone())
            .or_insert_with(|| Workspace::new(farm_id, config)))
    }

    /// Registers an existing workspace under its own farm id.
    pub fn insert(&mut self, workspace: Workspace) -> Result<()> {
        if self.farms.contains_key(&workspace.farm_id) {
            return Err(FarmError::duplicate("farm", workspace.farm_id));
        }
        self.farms.insert(workspace.farm_id.clone(), workspace);
        Ok(())
    }

    pub fn get(&self, farm_id: &str) -> Result<&Workspace> {
        self.farms
            .get(farm_id)
            .ok_or_else(|| FarmError::not_found("farm", farm_id))
    }

    pub fn get_mut(&mut self, farm_id: &str) -> Result<&mut Workspace> {
        self.farms
            .get_mut(farm_id)
            .ok_or_else(|| FarmError::not_found("farm", farm_id))
    }

    pub fn remove(&mut self, farm_id: &str) -> Result<Workspace> {
        self.farms
            .remove(farm_id)
            .ok_or_else(|| FarmError::not_found("farm", farm_id))
    }

    pub fn farm_ids(&self) -> Vec<&str> {
        self.farms.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MaterialKind, PrinterTechnology};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, d).unwrap()
    }

    fn workspace() -> Workspace {
        let mut ws = Workspace::new("farm-a", FarmConfig::default());
        ws.add_printer(Printer::new("F1", PrinterTechnology::Fdm)).unwrap();
        ws.add_printer(Printer::new("S1", PrinterTechnology::Sla)).unwrap();
        ws.add_unit(MaterialUnit::new("SP-1", MaterialKind::Spool, "PLA", "#FFFFFF", 1000.0))
            .unwrap();
        ws.add_unit(MaterialUnit::new("R-1", MaterialKind::Resin, "Clear", "#FFFFFF", 500.0))
            .unwrap();
        ws
    }

    #[test]
    fn test_submit_numbers_and_forces_pending() {
        let mut ws = workspace();
        let o = ws
            .submit_order(Order::new("O1", "ACME", day(1)).with_status(OrderStatus::Qc))
            .unwrap();
        assert_eq!(o.status, OrderStatus::Pending);
        assert_eq!(o.order_number, "ORD-1");

        let o = ws
            .submit_order(Order::new("O2", "ACME", day(1)).with_order_number("CUST-9"))
            .unwrap();
        assert_eq!(o.order_number, "CUST-9");

        let o = ws.submit_order(Order::new("O3", "ACME", day(1))).unwrap();
        assert_eq!(o.order_number, "ORD-2");

        assert!(matches!(
            ws.submit_order(Order::new("O1", "Dup", day(1))),
            Err(FarmError::DuplicateId { .. })
        ));
    }

    #[test]
    fn test_advance_unknown_order() {
        let mut ws = workspace();
        assert!(matches!(
            ws.advance_order("nope", OrderStatus::Qc),
            Err(FarmError::NotFound { .. })
        ));
    }

    #[test]
    fn test_start_and_finish_job() {
        let mut ws = workspace();
        ws.submit_order(Order::new("O1", "ACME", day(1))).unwrap();
        let job = ws.job_queue().remove(0);

        ws.start_job(&job.id, "F1").unwrap();
        assert_eq!(ws.order("O1").unwrap().status, OrderStatus::InProgress);
        assert!(ws.job_queue().is_empty());

        assert!(matches!(
            ws.set_printer_status("F1", PrinterStatus::Offline),
            Err(FarmError::ActionDenied { .. })
        ));

        assert_eq!(ws.finish_job("F1").unwrap(), job.id);
        assert_eq!(ws.order("O1").unwrap().status, OrderStatus::Qc);
        assert_eq!(ws.printer("F1").unwrap().status, PrinterStatus::Idle);
    }

    #[test]
    fn test_start_job_wrong_technology() {
        let mut ws = workspace();
        ws.submit_order(Order::new("O1", "ACME", day(1))).unwrap();
        let err = ws.start_job("JOB-O1", "S1").unwrap_err();
        assert!(matches!(err, FarmError::ActionDenied { .. }));
        assert_eq!(ws.printer("S1").unwrap().status, PrinterStatus::Idle);
        assert_eq!(ws.order("O1").unwrap().status, OrderStatus::Pending);
    }

    #[test]
    fn test_assign_and_return_scanned() {
        let mut ws = workspace();
        let req = MaterialRequirement::new("PLA", "#FFFFFF");
        let unit = ws.assign_material(&req, "F1", "JOB-X").unwrap();
        assert!(ws.assign_material(&req, "F1", "JOB-Y").is_err());

        let back = ws.return_scanned(&unit.to_string(), 42.0).unwrap();
        assert_eq!(back, unit);
        let u = ws.inventory().get(&unit).unwrap();
        assert!(!u.is_assigned());
        assert!((u.used - 42.0).abs() < 1e-10);

        assert!(matches!(ws.return_scanned("garbage", 1.0), Err(FarmError::InvalidCode(_))));
    }

    #[test]
    fn test_empty_finish_uses_default() {
        let mut ws = workspace();
        let req = MaterialRequirement::new("PLA", "#FFFFFF").with_finish("");
        assert!(ws.assign_material(&req, "F1", "JOB-X").is_ok());
    }

    #[test]
    fn test_mark_overdue() {
        let mut ws = workspace();
        ws.submit_order(Order::new("O1", "A", day(1)).with_due_date(day(5))).unwrap();
        ws.submit_order(Order::new("O2", "B", day(1)).with_due_date(day(20))).unwrap();
        ws.submit_order(Order::new("O3", "C", day(1)).with_due_date(day(5))).unwrap();
        ws.submit_order(Order::new("O4", "D", day(1)).with_due_date(day(5))).unwrap();
        ws.advance_order("O1", OrderStatus::InProgress).unwrap();
        ws.advance_order("O3", OrderStatus::Packing).unwrap();

        assert_eq!(ws.mark_overdue(day(10)), vec!["O1".to_string()]);
        assert_eq!(ws.order("O4").unwrap().status, OrderStatus::Pending);
        assert_eq!(ws.order("O1").unwrap().status, OrderStatus::Overdue);
        assert!(ws.mark_overdue(day(10)).is_empty());
    }

    #[test]
    fn test_allot_reserves_materials() {
        let mut ws = workspace();
        ws.submit_order(Order::new("O1", "ACME", day(1)).with_items(2)).unwrap();
        ws.submit_order(Order::new("O2", "ACME", day(1))).unwrap();

        let (jobs, plan) = ws.allot(0, day(1));
        assert_eq!(jobs.len(), 2);
        assert_eq!(plan.allotments.len(), 1);
        assert_eq!(plan.unallotted.len(), 1);
        assert_eq!(ws.inventory().assigned_to_printer("F1").len(), 1);
    }

    #[test]
    fn test_allot_twice_reserves_once() {
        let mut ws = workspace();
        for id in ["SP-2", "SP-3"] {
            ws.add_unit(MaterialUnit::new(id, MaterialKind::Spool, "PLA", "#FFFFFF", 1000.0))
                .unwrap();
        }
        ws.submit_order(Order::new("A", "ACME", day(1))).unwrap();

        let (_, first) = ws.allot(0, day(1));
        assert_eq!(first.allotments.len(), 1);
        let (jobs, second) = ws.allot(0, day(1));
        assert!(jobs.is_empty());
        assert!(second.allotments.is_empty());
        assert_eq!(ws.inventory().assigned_to_job("JOB-A").len(), 1);
    }

    #[test]
    fn test_late_pending_order_stays_queued() {
        let mut ws = workspace();
        ws.submit_order(Order::new("A", "ACME", day(1)).with_due_date(day(5))).unwrap();
        assert!(ws.mark_overdue(day(10)).is_empty());
        assert_eq!(ws.order("A").unwrap().status, OrderStatus::Pending);
        assert_eq!(ws.summary(day(10)).overdue_count, 1);

        assert_eq!(ws.job_queue().len(), 1);
        let (_, plan) = ws.allot(0, day(10));
        assert_eq!(plan.allotments.len(), 1);

        ws.start_job("JOB-A", "F1").unwrap();
        assert_eq!(ws.mark_overdue(day(10)), vec!["A".to_string()]);
        assert!(ws.job_queue().is_empty());
    }

    #[test]
    fn test_allot_waits_for_running_print() {
        const HOUR: i64 = 3_600_000;
        let mut ws = workspace();
        ws.submit_order(Order::new("O1", "ACME", day(1)).with_items(2)).unwrap();
        ws.start_job("JOB-O1", "F1").unwrap();
        ws.submit_order(Order::new("O2", "ACME", day(1))).unwrap();

        let (_, plan) = ws.allot(0, day(1));
        let a = plan.allotment_for_job("JOB-O2").unwrap();
        assert_eq!(a.printer_id, "F1");
        assert_eq!(a.start_ms, 2 * HOUR);
        assert_eq!(a.end_ms, 3 * HOUR);
    }

    #[test]
    fn test_allot_waits_for_job_without_order() {
        let mut ws = workspace();
        ws.start_job("JOB-MANUAL", "F1").unwrap();
        ws.submit_order(Order::new("O1", "ACME", day(1))).unwrap();

        let (_, plan) = ws.allot(0, day(1));
        assert_eq!(plan.allotment_for_job("JOB-O1").unwrap().start_ms, 3_600_000);
    }

    #[test]
    fn test_config_build_time_applies_to_new_printers() {
        let config = FarmConfig {
            default_build_time_per_item_ms: 1_000,
            ..FarmConfig::default()
        };
        let mut ws = Workspace::new("farm-c", config);
        ws.add_printer(Printer::new("F1", PrinterTechnology::Fdm)).unwrap();
        ws.add_printer(Printer::new("F2", PrinterTechnology::Fdm).with_build_time(5_000))
            .unwrap();
        ws.add_unit(MaterialUnit::new("SP-1", MaterialKind::Spool, "PLA", "#FFFFFF", 1000.0))
            .unwrap();
        ws.submit_order(Order::new("O1", "ACME", day(1)).with_items(2)).unwrap();

        assert_eq!(ws.printer("F1").unwrap().build_time_per_item_ms, Some(1_000));
        assert_eq!(ws.printer("F2").unwrap().build_time_per_item_ms, Some(5_000));
        let (_, plan) = ws.allot(0, day(1));
        let a = plan.allotment_for_job("JOB-O1").unwrap();
        assert_eq!(a.printer_id, "F1");
        assert_eq!(a.duration_ms(), 2_000);
    }

    #[test]
    fn test_start_job_denied_after_production() {
        let mut ws = workspace();
        ws.submit_order(Order::new("O1", "ACME", day(1))).unwrap();
        ws.advance_order("O1", OrderStatus::Completed).unwrap();

        let err = ws.start_job("JOB-O1", "F1").unwrap_err();
        assert!(matches!(err, FarmError::ActionDenied { .. }));
        assert_eq!(ws.printer("F1").unwrap().status, PrinterStatus::Idle);
    }

    #[test]
    fn test_start_job_denied_when_already_printing() {
        let mut ws = workspace();
        ws.add_printer(Printer::new("F2", PrinterTechnology::Fdm)).unwrap();
        ws.submit_order(Order::new("O1", "ACME", day(1))).unwrap();
        ws.start_job("JOB-O1", "F1").unwrap();

        let err = ws.start_job("JOB-O1", "F2").unwrap_err();
        assert!(err.to_string().contains("already printing on 'F1'"));
        assert_eq!(ws.printer("F2").unwrap().status, PrinterStatus::Idle);
        assert_eq!(ws.printer_running("JOB-O1").unwrap().id, "F1");
    }

    #[test]
    fn test_auto_number_skips_supplied_numbers() {
        let mut ws = workspace();
        ws.submit_order(Order::new("O1", "ACME", day(1)).with_order_number("ORD-1"))
            .unwrap();
        let o = ws.submit_order(Order::new("O2", "ACME", day(1))).unwrap();
        assert_eq!(o.order_number, "ORD-2");
    }

    #[test]
    fn test_dispatch_rules_from_config() {
        use crate::config::{DispatchConfig, WeightedRule};
        use crate::dispatching::RuleKind;

        let mut ws = workspace();
        ws.add_unit(MaterialUnit::new("SP-2", MaterialKind::Spool, "PLA", "#FFFFFF", 1000.0))
            .unwrap();
        ws.submit_order(
            Order::new("BIG", "ACME", day(1))
                .with_items(5)
                .with_priority(crate::models::Priority::High),
        )
        .unwrap();
        ws.submit_order(Order::new("SMALL", "ACME", day(1))).unwrap();
        assert_eq!(ws.next_job(day(1)).unwrap().id, "JOB-BIG");

        ws.config.dispatch = DispatchConfig {
            rules: vec![WeightedRule::new(RuleKind::Smallest)],
            ..DispatchConfig::default()
        };
        assert_eq!(ws.next_job(day(1)).unwrap().id, "JOB-SMALL");
        let (_, plan) = ws.allot(0, day(1));
        assert_eq!(plan.allotment_for_job("JOB-SMALL").unwrap().start_ms, 0);
    }

    #[test]
    fn test_duplicate_units_in_snapshot_rejected() {
        let ws = workspace();
        let mut v: serde_json::Value = serde_json::from_str(&ws.snapshot_json().unwrap()).unwrap();
        let unit = v["inventory"][0].clone();
        v["inventory"].as_array_mut().unwrap().push(unit);

        let err = Workspace::from_snapshot_json(&v.to_string()).unwrap_err();
        assert!(matches!(err, FarmError::Serialization(_)));
        assert!(err.to_string().contains("duplicate material unit"));
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let mut ws = workspace();
        ws.submit_order(Order::new("O1", "ACME", day(1))).unwrap();
        let json = ws.snapshot_json().unwrap();
        let back = Workspace::from_snapshot_json(&json).unwrap();
        assert_eq!(back.farm_id, "farm-a");
        assert_eq!(back.orders().len(), 1);
        assert_eq!(back.inventory().len(), 2);
    }

    #[test]
    fn test_registry() {
        let mut reg = FarmRegistry::new();
        reg.create("farm-b", FarmConfig::default()).unwrap();
        reg.insert(workspace()).unwrap();
        assert_eq!(reg.farm_ids(), vec!["farm-a", "farm-b"]);
        assert!(reg.create("farm-a", FarmConfig::default()).is_err());

        reg.get_mut("farm-b")
            .unwrap()
            .add_printer(Printer::new("X", PrinterTechnology::Dmls))
            .unwrap();
        assert_eq!(reg.get("farm-b").unwrap().printers().len(), 1);
        assert!(reg.get("farm-a").unwrap().printer("X").is_none());

        reg.remove("farm-b").unwrap();
        assert!(matches!(reg.get("farm-b"), Err(FarmError::NotFound { .. })));
    }
}
