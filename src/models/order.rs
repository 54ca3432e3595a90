//! Order model.
//!
//! An order is the customer-facing unit of work. Pending orders feed the
//! job queue; status changes move an order through the shop workflow.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FarmError;

use super::MaterialKind;

/// A customer order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Unique order identifier.
    pub id: String,
    /// Customer name.
    pub customer: String,
    /// Human-facing order number (e.g. "ORD-1042"). Empty until submitted.
    pub order_number: String,
    /// Project code shared with the derived job.
    pub project_code: String,
    /// Date the order was placed.
    pub order_date: NaiveDate,
    /// Promised delivery date. `None` = no commitment.
    pub due_date: Option<NaiveDate>,
    /// Workflow status.
    pub status: OrderStatus,
    /// Number of printed items.
    pub items: u32,
    /// Commercial priority.
    pub priority: Priority,
    /// Printer technology the parts must be produced on.
    pub printer_tech: PrinterTechnology,
    /// Responsible sales person.
    pub sales_person: String,
    /// Free-form notes.
    pub notes: String,
}

impl Order {
    /// Creates a pending FDM order with one item.
    pub fn new(id: impl Into<String>, customer: impl Into<String>, order_date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            customer: customer.into(),
            order_number: String::new(),
            project_code: String::new(),
            order_date,
            due_date: None,
            status: OrderStatus::Pending,
            items: 1,
            priority: Priority::Medium,
            printer_tech: PrinterTechnology::Fdm,
            sales_person: String::new(),
            notes: String::new(),
        }
    }

    pub fn with_order_number(mut self, number: impl Into<String>) -> Self {
        self.order_number = number.into();
        self
    }

    pub fn with_project_code(mut self, code: impl Into<String>) -> Self {
        self.project_code = code.into();
        self
    }

    pub fn with_due_date(mut self, due: NaiveDate) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_items(mut self, items: u32) -> Self {
        self.items = items;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_technology(mut self, tech: PrinterTechnology) -> Self {
        self.printer_tech = tech;
        self
    }

    pub fn with_sales_person(mut self, name: impl Into<String>) -> Self {
        self.sales_person = name.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

/// Order workflow status.
///
/// Declaration order is the workflow order; see [`crate::status`] for the
/// transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    Pending,
    InProgress,
    Overdue,
    Qc,
    Packing,
    Dispatched,
    Completed,
}

impl OrderStatus {
    /// All states in workflow order.
    pub const ALL: [OrderStatus; 7] = [
        OrderStatus::Pending,
        OrderStatus::InProgress,
        OrderStatus::Overdue,
        OrderStatus::Qc,
        OrderStatus::Packing,
        OrderStatus::Dispatched,
        OrderStatus::Completed,
    ];

    /// Position in the workflow (0 = pending).
    pub fn ordinal(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::InProgress => "in-progress",
            OrderStatus::Overdue => "overdue",
            OrderStatus::Qc => "qc",
            OrderStatus::Packing => "packing",
            OrderStatus::Dispatched => "dispatched",
            OrderStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = FarmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| FarmError::not_found("order status", s))
    }
}

/// Commercial priority of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Numeric weight (higher = more important).
    pub fn weight(self) -> i32 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }
}

/// Additive-manufacturing process a printer implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PrinterTechnology {
    /// Fused deposition modelling (filament spools).
    Fdm,
    /// Stereolithography (resin).
    Sla,
    /// Selective laser sintering (powder).
    Sls,
    /// Digital light processing (resin).
    Dlp,
    /// Multi jet fusion (powder).
    Mjf,
    /// Electron beam melting (metal powder).
    Ebm,
    /// Direct metal laser sintering (metal powder).
    Dmls,
}

impl PrinterTechnology {
    pub const ALL: [PrinterTechnology; 7] = [
        PrinterTechnology::Fdm,
        PrinterTechnology::Sla,
        PrinterTechnology::Sls,
        PrinterTechnology::Dlp,
        PrinterTechnology::Mjf,
        PrinterTechnology::Ebm,
        PrinterTechnology::Dmls,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PrinterTechnology::Fdm => "FDM",
            PrinterTechnology::Sla => "SLA",
            PrinterTechnology::Sls => "SLS",
            PrinterTechnology::Dlp => "DLP",
            PrinterTechnology::Mjf => "MJF",
            PrinterTechnology::Ebm => "EBM",
            PrinterTechnology::Dmls => "DMLS",
        }
    }

    /// Stock pool consumed by this technology.
    pub fn material_kind(self) -> MaterialKind {
        match self {
            PrinterTechnology::Fdm => MaterialKind::Spool,
            PrinterTechnology::Sla | PrinterTechnology::Dlp => MaterialKind::Resin,
            _ => MaterialKind::Powder,
        }
    }
}

impl fmt::Display for PrinterTechnology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrinterTechnology {
    type Err = FarmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PrinterTechnology::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FarmError::not_found("printer technology", s))
    }
}
