//! Printer-technology matching.
//!
//! Filters fleet capacity by the technology a job requires and maps a
//! printer to the stock pool it consumes.

use std::collections::BTreeMap;

use crate::models::{MaterialKind, Printer, PrinterTechnology};

/// All printers of `tech`, in fleet order.
pub fn printers_for(printers: &[Printer], tech: PrinterTechnology) -> Vec<&Printer> {
    printers.iter().filter(|p| p.technology == tech).collect()
}

/// Idle printers of `tech`, in fleet order.
pub fn available_printers(printers: &[Printer], tech: PrinterTechnology) -> Vec<&Printer> {
    printers
        .iter()
        .filter(|p| p.technology == tech && p.is_available())
        .collect()
}

/// Stock pool consumed by `printer`.
pub fn pool_for(printer: &Printer) -> MaterialKind {
    printer.technology.material_kind()
}

/// Idle printer count per technology. Technologies without printers are absent.
pub fn capacity_by_technology(printers: &[Printer]) -> BTreeMap<PrinterTechnology, usize> {
    let mut out = BTreeMap::new();
    for p in printers {
        let slot = out.entry(p.technology).or_insert(0);
        if p.is_available() {
            *slot += 1;
        }
    }
    out
}
