//! Job model.
//!
//! A job is a unit of print work derived from an order. It is grouped into
//! item groups, each listing the materials it consumes.
//!
//! # Time Representation
//! Schedule times are milliseconds relative to a farm epoch (t=0).
//! The consumer defines what t=0 means (e.g. shift start, midnight UTC).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Priority, PrinterTechnology};

/// Finish used when a requirement does not name one.
pub const DEFAULT_FINISH: &str = "Standard";

fn default_finish() -> String {
    DEFAULT_FINISH.to_string()
}

/// A print job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Unique job identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Project code (copied from the order).
    pub project_code: String,
    /// Originating order, when derived from one.
    pub order_id: Option<String>,
    /// Technology the job must print on.
    pub required_technology: PrinterTechnology,
    /// Carried from the order; ordering is left to dispatching.
    pub priority: Priority,
    /// Promised delivery date.
    pub due_date: Option<NaiveDate>,
    /// Groups of identical items and their materials.
    pub item_groups: Vec<ItemGroup>,
    /// Set once the job is allotted to a printer.
    pub schedule: Option<JobSchedule>,
}

impl Job {
    /// Creates an empty job for the given technology.
    pub fn new(id: impl Into<String>, required_technology: PrinterTechnology) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            project_code: String::new(),
            order_id: None,
            required_technology,
            priority: Priority::Medium,
            due_date: None,
            item_groups: Vec::new(),
            schedule: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_project_code(mut self, code: impl Into<String>) -> Self {
        self.project_code = code.into();
        self
    }

    pub fn with_order(mut self, order_id: impl Into<String>) -> Self {
        self.order_id = Some(order_id.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_due_date(mut self, due: NaiveDate) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn with_item_group(mut self, group: ItemGroup) -> Self {
        self.item_groups.push(group);
        self
    }

    /// Total item count across groups.
    pub fn total_items(&self) -> u32 {
        self.item_groups.iter().map(|g| g.quantity).sum()
    }

    /// Every material requirement across all item groups, in group order.
    pub fn material_requirements(&self) -> Vec<&MaterialRequirement> {
        self.item_groups
            .iter()
            .flat_map(|g| g.materials.iter())
            .collect()
    }

    /// Whether the job has been allotted.
    pub fn is_scheduled(&self) -> bool {
        self.schedule.is_some()
    }
}

/// A group of identical items within a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemGroup {
    pub name: String,
    pub quantity: u32,
    pub materials: Vec<MaterialRequirement>,
}

impl ItemGroup {
    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            quantity,
            materials: Vec::new(),
        }
    }

    pub fn with_material(mut self, req: MaterialRequirement) -> Self {
        self.materials.push(req);
        self
    }
}

/// Material a job needs: type, color and finish.
///
/// Matching against stock is exact and case-sensitive on every field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialRequirement {
    /// Material type (e.g. "PLA", "Tough Resin", "PA12").
    pub material: String,
    /// Color, usually a hex code (e.g. "#FFFFFF").
    pub color: String,
    #[serde(default = "default_finish")]
    pub finish: String,
}

impl MaterialRequirement {
    /// Creates a requirement with the default finish.
    pub fn new(material: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            material: material.into(),
            color: color.into(),
            finish: default_finish(),
        }
    }

    pub fn with_finish(mut self, finish: impl Into<String>) -> Self {
        self.finish = finish.into();
        self
    }
}

/// Printer-time slot of an allotted job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSchedule {
    pub printer_id: String,
    /// Start time (ms).
    pub start_ms: i64,
    /// End time (ms).
    pub end_ms: i64,
}

impl JobSchedule {
    pub fn new(printer_id: impl Into<String>, start_ms: i64, end_ms: i64) -> Self {
        Self {
            printer_id: printer_id.into(),
            start_ms,
            end_ms,
        }
    }

    #[inline]
    pub fn duration_ms(&self) -> i64 {
        self.end_ms - self.start_ms
    }
}
