//! Order and printer status state machines.
//!
//! # Order workflow
//!
//! ```text
//! pending → in-progress → overdue → qc → packing → dispatched → completed
//! ```
//!
//! An order may jump to any state strictly later in this sequence. Backward
//! and same-state moves are rejected. `overdue` is a stored label that sits
//! after `in-progress`; [`is_overdue`] derives the condition from the due date.
//!
//! # Printer guard
//!
//! A printing printer cannot have its status changed manually; it leaves
//! `printing` only through [`finish_print`].

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::error::{FarmError, Result};
use crate::models::{Order, OrderStatus, Printer, PrinterStatus};

const N: usize = OrderStatus::ALL.len();

/// `TRANSITIONS[from][to]` is true when `from → to` is allowed.
static TRANSITIONS: [[bool; N]; N] = build_transitions();

const fn build_transitions() -> [[bool; N]; N] {
    let mut table = [[false; N]; N];
    let mut from = 0;
    while from < N {
        let mut to = from + 1;
        while to < N {
            table[from][to] = true;
            to += 1;
        }
        from += 1;
    }
    table
}

impl OrderStatus {
    /// Whether moving to `target` is allowed.
    pub fn can_transition_to(self, target: OrderStatus) -> bool {
        TRANSITIONS[self.ordinal()][target.ordinal()]
    }

    /// Every state reachable from this one, in workflow order.
    pub fn allowed_targets(self) -> Vec<OrderStatus> {
        OrderStatus::ALL
            .into_iter()
            .filter(|&t| self.can_transition_to(t))
            .collect()
    }

    /// Whether no further transition exists.
    pub fn is_terminal(self) -> bool {
        self.allowed_targets().is_empty()
    }
}

/// Moves `order` to `target`, returning the previous status.
///
/// The order is left untouched when the move is rejected.
pub fn transition(order: &mut Order, target: OrderStatus) -> Result<OrderStatus> {
    let from = order.status;
    if !from.can_transition_to(target) {
        warn!(order = %order.id, %from, to = %target, "rejected status transition");
        return Err(FarmError::InvalidTransition { from, to: target });
    }
    order.status = target;
    info!(order = %order.id, %from, to = %target, "order status changed");
    Ok(from)
}

/// Whether `order` is late on `today`.
///
/// Only orders still waiting for or in production count; orders already
/// labelled overdue stay overdue while the date has passed.
pub fn is_overdue(order: &Order, today: NaiveDate) -> bool {
    let open = matches!(
        order.status,
        OrderStatus::Pending | OrderStatus::InProgress | OrderStatus::Overdue
    );
    open && order.due_date.is_some_and(|due| due < today)
}

/// Manually sets a printer's status.
///
/// Denied while the printer is printing. Leaving `current_job` consistent is
/// the caller's job; use [`start_print`] to enter `printing`.
pub fn set_printer_status(printer: &mut Printer, target: PrinterStatus) -> Result<PrinterStatus> {
    let from = printer.status;
    if from == PrinterStatus::Printing {
        warn!(printer = %printer.id, to = %target, "status change denied while printing");
        return Err(FarmError::ActionDenied {
            printer_id: printer.id.clone(),
            status: from,
            reason: "cannot change status while printing".to_string(),
        });
    }
    if target == PrinterStatus::Printing {
        return Err(FarmError::ActionDenied {
            printer_id: printer.id.clone(),
            status: from,
            reason: "printing requires a job".to_string(),
        });
    }
    printer.status = target;
    info!(printer = %printer.id, %from, to = %target, "printer status changed");
    Ok(from)
}

/// Puts `job_id` on an idle printer.
pub fn start_print(printer: &mut Printer, job_id: &str) -> Result<()> {
    if printer.status != PrinterStatus::Idle {
        return Err(FarmError::ActionDenied {
            printer_id: printer.id.clone(),
            status: printer.status,
            reason: format!("cannot start job '{job_id}' unless idle"),
        });
    }
    printer.status = PrinterStatus::Printing;
    printer.current_job = Some(job_id.to_string());
    info!(printer = %printer.id, job = job_id, "print started");
    Ok(())
}

/// Ends the current print, returning the finished job id.
pub fn finish_print(printer: &mut Printer) -> Result<String> {
    if printer.status != PrinterStatus::Printing {
        return Err(FarmError::ActionDenied {
            printer_id: printer.id.clone(),
            status: printer.status,
            reason: "no print in progress".to_string(),
        });
    }
    printer.status = PrinterStatus::Idle;
    let job = printer.current_job.take().unwrap_or_default();
    info!(printer = %printer.id, job = %job, "print finished");
    Ok(job)
}
