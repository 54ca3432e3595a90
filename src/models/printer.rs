//! Printer model.
//!
//! Printers are the processing resources of the farm. Each implements one
//! technology and carries a manually driven status.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::PrinterTechnology;

/// Build time per item when the printer does not specify one (1 hour).
pub const DEFAULT_BUILD_TIME_PER_ITEM_MS: i64 = 3_600_000;

/// A printer in the fleet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Printer {
    /// Unique printer identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    pub technology: PrinterTechnology,
    pub status: PrinterStatus,
    /// Job currently on the build plate.
    pub current_job: Option<String>,
    /// Estimated print time per item (ms), used by allotment.
    ///
    /// `None` takes the farm default when the printer joins a workspace.
    #[serde(default)]
    pub build_time_per_item_ms: Option<i64>,
}

/// Operational status of a printer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrinterStatus {
    Printing,
    Idle,
    Maintenance,
    Offline,
}

impl PrinterStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PrinterStatus::Printing => "printing",
            PrinterStatus::Idle => "idle",
            PrinterStatus::Maintenance => "maintenance",
            PrinterStatus::Offline => "offline",
        }
    }
}

impl fmt::Display for PrinterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Printer {
    /// Creates an idle printer.
    pub fn new(id: impl Into<String>, technology: PrinterTechnology) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            technology,
            status: PrinterStatus::Idle,
            current_job: None,
            build_time_per_item_ms: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_status(mut self, status: PrinterStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_build_time(mut self, per_item_ms: i64) -> Self {
        self.build_time_per_item_ms = Some(per_item_ms);
        self
    }

    /// Build time per item, falling back to [`DEFAULT_BUILD_TIME_PER_ITEM_MS`].
    #[inline]
    pub fn build_time_ms(&self) -> i64 {
        self.build_time_per_item_ms.unwrap_or(DEFAULT_BUILD_TIME_PER_ITEM_MS)
    }

    /// Whether the printer can accept a new job right now.
    pub fn is_available(&self) -> bool {
        self.status == PrinterStatus::Idle
    }

    /// Whether the printer can take jobs at all (now or after its current print).
    pub fn is_operational(&self) -> bool {
        matches!(self.status, PrinterStatus::Idle | PrinterStatus::Printing)
    }
}
