//! Material unit model.
//!
//! A material unit is one physical piece of stock: a filament spool, a resin
//! bottle or a powder batch. Units are consumed by printers of the matching
//! technology and may be reserved for a printer+job pair.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::StockThresholds;
use crate::error::FarmError;

use super::MaterialRequirement;

/// Stock pool a unit belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    /// Filament spool (FDM).
    Spool,
    /// Photopolymer resin (SLA, DLP).
    Resin,
    /// Powder batch (SLS, MJF, EBM, DMLS).
    Powder,
}

impl MaterialKind {
    pub const ALL: [MaterialKind; 3] = [MaterialKind::Spool, MaterialKind::Resin, MaterialKind::Powder];

    pub fn as_str(self) -> &'static str {
        match self {
            MaterialKind::Spool => "spool",
            MaterialKind::Resin => "resin",
            MaterialKind::Powder => "powder",
        }
    }
}

impl fmt::Display for MaterialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remaining-quantity health of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StockStatus {
    New,
    Active,
    Low,
    Critical,
    Empty,
}

/// A stock unit.
///
/// Quantities are in the unit's native measure (grams for spools and powder,
/// millilitres for resin).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialUnit {
    pub id: String,
    pub kind: MaterialKind,
    /// Material type (e.g. "PLA").
    pub material: String,
    pub color: String,
    pub finish: String,
    pub used: f64,
    pub total: f64,
    pub assigned_to_printer_id: Option<String>,
    pub assigned_to_job_id: Option<String>,
}

impl MaterialUnit {
    /// Creates an unassigned, unused unit with the default finish.
    pub fn new(
        id: impl Into<String>,
        kind: MaterialKind,
        material: impl Into<String>,
        color: impl Into<String>,
        total: f64,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            material: material.into(),
            color: color.into(),
            finish: super::job::DEFAULT_FINISH.to_string(),
            used: 0.0,
            total,
            assigned_to_printer_id: None,
            assigned_to_job_id: None,
        }
    }

    pub fn with_finish(mut self, finish: impl Into<String>) -> Self {
        self.finish = finish.into();
        self
    }

    pub fn with_used(mut self, used: f64) -> Self {
        self.used = used;
        self
    }

    /// Arena key of this unit.
    pub fn unit_ref(&self) -> UnitRef {
        UnitRef::new(self.kind, self.id.clone())
    }

    /// Remaining quantity. Not clamped: over-consumption yields a negative value.
    pub fn remaining(&self) -> f64 {
        self.total - self.used
    }

    /// Whether the unit is reserved by a printer.
    pub fn is_assigned(&self) -> bool {
        self.assigned_to_printer_id.is_some()
    }

    /// Exact, case-sensitive match on material, color and finish.
    pub fn matches(&self, req: &MaterialRequirement) -> bool {
        self.material == req.material && self.color == req.color && self.finish == req.finish
    }

    /// Derives the stock status from the remaining-quantity ratio.
    pub fn status(&self, thresholds: &StockThresholds) -> StockStatus {
        let remaining = self.remaining();
        if remaining <= 0.0 || self.total <= 0.0 {
            return StockStatus::Empty;
        }
        if self.used == 0.0 {
            return StockStatus::New;
        }
        let ratio = remaining / self.total;
        if ratio <= thresholds.critical_ratio {
            StockStatus::Critical
        } else if ratio <= thresholds.low_ratio {
            StockStatus::Low
        } else {
            StockStatus::Active
        }
    }
}

/// Key of a unit in the inventory arena.
///
/// Printed on unit labels as `"<kind>:<id>"`, e.g. `"spool:SP-001"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitRef {
    pub kind: MaterialKind,
    pub id: String,
}

impl UnitRef {
    pub fn new(kind: MaterialKind, id: impl Into<String>) -> Self {
        Self { kind, id: id.into() }
    }
}

impl fmt::Display for UnitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

impl FromStr for UnitRef {
    type Err = FarmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, id) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| FarmError::InvalidCode(s.to_string()))?;
        let kind = MaterialKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(kind))
            .ok_or_else(|| FarmError::InvalidCode(s.to_string()))?;
        if id.is_empty() {
            return Err(FarmError::InvalidCode(s.to_string()));
        }
        Ok(UnitRef::new(kind, id))
    }
}
