//! Dashboard indicators.
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Orders by status | Count per stored status |
//! | Overdue | Orders late on `today`, whatever their stored label |
//! | Printer utilization | printing / (printers not offline) |
//! | Stock by status | Units per [`StockStatus`] |
//! | Low stock | Units that are Low, Critical or Empty |

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{OrderStatus, PrinterStatus, StockStatus, UnitRef};
use crate::status;
use crate::workspace::Workspace;

/// Farm-level indicators for one day.
#[derive(Debug, Clone, Serialize)]
pub struct FarmSummary {
    pub orders_by_status: BTreeMap<OrderStatus, usize>,
    pub overdue_count: usize,
    pub printers_by_status: BTreeMap<PrinterStatus, usize>,
    /// `None` when every printer is offline (or there are none).
    pub printer_utilization: Option<f64>,
    pub stock_by_status: BTreeMap<StockStatus, usize>,
    pub low_stock_units: Vec<UnitRef>,
}

impl FarmSummary {
    pub fn calculate(workspace: &Workspace, today: NaiveDate) -> Self {
        let mut orders_by_status = BTreeMap::new();
        let mut overdue_count = 0;
        for order in workspace.orders() {
            *orders_by_status.entry(order.status).or_insert(0) += 1;
            if status::is_overdue(order, today) {
                overdue_count += 1;
            }
        }

        let mut printers_by_status = BTreeMap::new();
        for p in workspace.printers() {
            *printers_by_status.entry(p.status).or_insert(0) += 1;
        }
        let printing = printers_by_status.get(&PrinterStatus::Printing).copied().unwrap_or(0);
        let offline = printers_by_status.get(&PrinterStatus::Offline).copied().unwrap_or(0);
        let online = workspace.printers().len() - offline;
        let printer_utilization = (online > 0).then(|| printing as f64 / online as f64);

        let thresholds = &workspace.config.stock_thresholds;
        let mut stock_by_status = BTreeMap::new();
        let mut low_stock_units = Vec::new();
        for unit in workspace.inventory().iter() {
            let st = unit.status(thresholds);
            *stock_by_status.entry(st).or_insert(0) += 1;
            if matches!(st, StockStatus::Low | StockStatus::Critical | StockStatus::Empty) {
                low_stock_units.push(unit.unit_ref());
            }
        }

        Self {
            orders_by_status,
            overdue_count,
            printers_by_status,
            printer_utilization,
            stock_by_status,
            low_stock_units,
        }
    }

    /// Number of orders currently stored with `status`.
    pub fn orders_in(&self, status: OrderStatus) -> usize {
        self.orders_by_status.get(&status).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FarmConfig;
    use crate::models::{MaterialKind, MaterialUnit, Order, Printer, PrinterTechnology};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, d).unwrap()
    }

    fn sample() -> Workspace {
        let mut ws = Workspace::new("f", FarmConfig::default());
        ws.submit_order(Order::new("O1", "A", day(1)).with_due_date(day(3))).unwrap();
        ws.submit_order(Order::new("O2", "B", day(1)).with_due_date(day(30))).unwrap();
        ws.submit_order(Order::new("O3", "C", day(1)).with_due_date(day(2))).unwrap();
        ws.advance_order("O3", OrderStatus::Completed).unwrap();

        ws.add_printer(Printer::new("P1", PrinterTechnology::Fdm)).unwrap();
        ws.add_printer(Printer::new("P2", PrinterTechnology::Fdm)).unwrap();
        ws.add_printer(
            Printer::new("P3", PrinterTechnology::Sla).with_status(PrinterStatus::Offline),
        )
        .unwrap();
        ws.start_job("JOB-O1", "P1").unwrap();

        ws.add_unit(MaterialUnit::new("S1", MaterialKind::Spool, "PLA", "#000", 1000.0)).unwrap();
        ws.add_unit(MaterialUnit::new("S2", MaterialKind::Spool, "PLA", "#000", 1000.0).with_used(800.0))
            .unwrap();
        ws.add_unit(MaterialUnit::new("R1", MaterialKind::Resin, "Clear", "#FFF", 500.0).with_used(500.0))
            .unwrap();
        ws
    }

    #[test]
    fn test_order_counts() {
        let s = sample().summary(day(10));
        assert_eq!(s.orders_in(OrderStatus::InProgress), 1);
        assert_eq!(s.orders_in(OrderStatus::Pending), 1);
        assert_eq!(s.orders_in(OrderStatus::Completed), 1);
        assert_eq!(s.orders_in(OrderStatus::Qc), 0);
        // O1 is late; O3 is late but already completed.
        assert_eq!(s.overdue_count, 1);
    }

    #[test]
    fn test_printer_utilization() {
        let s = sample().summary(day(10));
        assert_eq!(s.printers_by_status[&PrinterStatus::Printing], 1);
        assert!((s.printer_utilization.unwrap() - 0.5).abs() < 1e-10);
    }

    #[test]
    fn test_no_online_printers() {
        let ws = Workspace::new("empty", FarmConfig::default());
        assert!(ws.summary(day(1)).printer_utilization.is_none());
    }

    #[test]
    fn test_stock_health() {
        let s = sample().summary(day(10));
        assert_eq!(s.stock_by_status[&StockStatus::New], 1);
        assert_eq!(s.stock_by_status[&StockStatus::Low], 1);
        assert_eq!(s.stock_by_status[&StockStatus::Empty], 1);
        assert_eq!(
            s.low_stock_units,
            vec![
                UnitRef::new(MaterialKind::Spool, "S2"),
                UnitRef::new(MaterialKind::Resin, "R1"),
            ]
        );
    }
}
