//! Workspace integrity checks.
//!
//! Reservation bookkeeping has no locking, so a workspace restored from a
//! snapshot (or edited by hand) can hold inconsistent state. Detects:
//! - Duplicate order and printer IDs
//! - Units reserved by a printer that does not exist
//! - Units with only half of the printer+job reservation set
//! - Printers whose status and current job disagree

use crate::models::PrinterStatus;
use crate::workspace::Workspace;
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A unit is assigned to a printer that is not in the fleet.
    UnknownPrinter,
    /// Exactly one of `assigned_to_printer_id` / `assigned_to_job_id` is set.
    PartialAssignment,
    /// Printing without a current job, or a current job while not printing.
    PrinterJobMismatch,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a workspace.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_workspace(ws: &Workspace) -> ValidationResult {
    let mut errors = Vec::new();

    let mut order_ids = HashSet::new();
    for o in ws.orders() {
        if !order_ids.insert(o.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate order ID: {}", o.id),
            ));
        }
    }

    let mut printer_ids = HashSet::new();
    for p in ws.printers() {
        if !printer_ids.insert(p.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate printer ID: {}", p.id),
            ));
        }

        match (p.status, &p.current_job) {
            (PrinterStatus::Printing, None) => errors.push(ValidationError::new(
                ValidationErrorKind::PrinterJobMismatch,
                format!("Printer '{}' is printing without a job", p.id),
            )),
            (status, Some(job)) if status != PrinterStatus::Printing => {
                errors.push(ValidationError::new(
                    ValidationErrorKind::PrinterJobMismatch,
                    format!("Printer '{}' is {status} but holds job '{job}'", p.id),
                ))
            }
            _ => {}
        }
    }

    for unit in ws.inventory().iter() {
        match (&unit.assigned_to_printer_id, &unit.assigned_to_job_id) {
            (Some(printer), Some(_)) => {
                if !printer_ids.contains(printer.as_str()) {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::UnknownPrinter,
                        format!("Unit '{}' is assigned to unknown printer '{printer}'", unit.unit_ref()),
                    ));
                }
            }
            (None, None) => {}
            _ => errors.push(ValidationError::new(
                ValidationErrorKind::PartialAssignment,
                format!("Unit '{}' has a partial assignment", unit.unit_ref()),
            )),
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
