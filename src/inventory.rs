//! Material reservation tracker.
//!
//! Stock units live in an index-based arena keyed by [`UnitRef`]. A unit
//! reserved for a printer+job pair stays out of the candidate set until it is
//! returned to stock.
//!
//! # Selection
//! The printer's technology picks the pool (FDM → spools, SLA/DLP → resins,
//! anything else → powders). Within the pool the first unit in insertion
//! order that is unassigned and matches `(material, color, finish)` exactly
//! is reserved.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::error::{FarmError, Result};
use crate::models::{MaterialKind, MaterialRequirement, MaterialUnit, Printer, UnitRef};

/// Arena of stock units.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<MaterialUnit>", into = "Vec<MaterialUnit>")]
pub struct Inventory {
    units: Vec<MaterialUnit>,
    index: HashMap<UnitRef, usize>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a unit. Fails if `(kind, id)` is already present.
    pub fn add_unit(&mut self, unit: MaterialUnit) -> Result<UnitRef> {
        let key = unit.unit_ref();
        if self.index.contains_key(&key) {
            return Err(FarmError::duplicate("material unit", key.to_string()));
        }
        self.index.insert(key.clone(), self.units.len());
        self.units.push(unit);
        Ok(key)
    }

    /// Builder-style [`add_unit`](Self::add_unit) that ignores duplicates.
    pub fn with_unit(mut self, unit: MaterialUnit) -> Self {
        let _ = self.add_unit(unit);
        self
    }

    pub fn get(&self, unit_ref: &UnitRef) -> Option<&MaterialUnit> {
        self.index.get(unit_ref).map(|&i| &self.units[i])
    }

    fn get_mut(&mut self, unit_ref: &UnitRef) -> Result<&mut MaterialUnit> {
        match self.index.get(unit_ref) {
            Some(&i) => Ok(&mut self.units[i]),
            None => Err(FarmError::not_found("material unit", unit_ref.to_string())),
        }
    }

    /// Reserves the first matching unassigned unit for `printer` and `job_id`.
    ///
    /// On no match the pool is left unchanged and `OutOfStock` is returned.
    pub fn assign(
        &mut self,
        requirement: &MaterialRequirement,
        printer: &Printer,
        job_id: &str,
    ) -> Result<UnitRef> {
        let kind = printer.technology.material_kind();
        let slot = self
            .units
            .iter()
            .position(|u| u.kind == kind && !u.is_assigned() && u.matches(requirement));

        let Some(slot) = slot else {
            warn!(
                printer = %printer.id,
                job = job_id,
                %kind,
                material = %requirement.material,
                color = %requirement.color,
                finish = %requirement.finish,
                "no matching stock"
            );
            return Err(out_of_stock(kind, requirement));
        };

        let unit = &mut self.units[slot];
        unit.assigned_to_printer_id = Some(printer.id.clone());
        unit.assigned_to_job_id = Some(job_id.to_string());
        let key = unit.unit_ref();
        info!(unit = %key, printer = %printer.id, job = job_id, "material assigned");
        Ok(key)
    }

    /// Reserves one unit per requirement, or nothing at all.
    ///
    /// On the first miss every unit reserved by this call is released
    /// without touching `used`.
    pub fn assign_all<'a, I>(&mut self, requirements: I, printer: &Printer, job_id: &str) -> Result<Vec<UnitRef>>
    where
        I: IntoIterator<Item = &'a MaterialRequirement>,
    {
        let mut reserved = Vec::new();
        for req in requirements {
            match self.assign(req, printer, job_id) {
                Ok(key) => reserved.push(key),
                Err(err) => {
                    for key in &reserved {
                        if let Ok(unit) = self.get_mut(key) {
                            unit.assigned_to_printer_id = None;
                            unit.assigned_to_job_id = None;
                        }
                    }
                    debug!(job = job_id, released = reserved.len(), "rolled back partial reservation");
                    return Err(err);
                }
            }
        }
        Ok(reserved)
    }

    /// Returns a unit to stock, clearing its assignment and adding `used_amount`.
    ///
    /// The amount is accepted as given, including zero, negative and
    /// over-capacity values.
    pub fn return_unit(&mut self, unit_ref: &UnitRef, used_amount: f64) -> Result<()> {
        let unit = self.get_mut(unit_ref)?;
        if used_amount < 0.0 || unit.used + used_amount > unit.total {
            warn!(unit = %unit_ref, used_amount, total = unit.total, "implausible used amount");
        }
        let job = unit.assigned_to_job_id.take();
        unit.assigned_to_printer_id = None;
        unit.used += used_amount;
        info!(unit = %unit_ref, ?job, used_amount, "material returned to stock");
        Ok(())
    }

    /// Returns every unit reserved by `job_id` with no consumption recorded.
    pub fn release_job(&mut self, job_id: &str) -> Vec<UnitRef> {
        let mut released = Vec::new();
        for unit in self
            .units
            .iter_mut()
            .filter(|u| u.assigned_to_job_id.as_deref() == Some(job_id))
        {
            unit.assigned_to_printer_id = None;
            unit.assigned_to_job_id = None;
            released.push(unit.unit_ref());
        }
        if !released.is_empty() {
            info!(job = job_id, released = released.len(), "job reservations released");
        }
        released
    }

    /// All units, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &MaterialUnit> {
        self.units.iter()
    }

    /// Units of one pool.
    pub fn units(&self, kind: MaterialKind) -> Vec<&MaterialUnit> {
        self.units.iter().filter(|u| u.kind == kind).collect()
    }

    /// Unassigned units of one pool.
    pub fn available(&self, kind: MaterialKind) -> Vec<&MaterialUnit> {
        self.units
            .iter()
            .filter(|u| u.kind == kind && !u.is_assigned())
            .collect()
    }

    pub fn assigned_to_job(&self, job_id: &str) -> Vec<&MaterialUnit> {
        self.units
            .iter()
            .filter(|u| u.assigned_to_job_id.as_deref() == Some(job_id))
            .collect()
    }

    pub fn assigned_to_printer(&self, printer_id: &str) -> Vec<&MaterialUnit> {
        self.units
            .iter()
            .filter(|u| u.assigned_to_printer_id.as_deref() == Some(printer_id))
            .collect()
    }

    /// Remaining quantity over unassigned units matching `requirement`.
    pub fn available_quantity(&self, requirement: &MaterialRequirement, kind: MaterialKind) -> f64 {
        self.units
            .iter()
            .filter(|u| u.kind == kind && !u.is_assigned() && u.matches(requirement))
            .map(|u| u.remaining().max(0.0))
            .sum()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

fn out_of_stock(kind: MaterialKind, req: &MaterialRequirement) -> FarmError {
    FarmError::OutOfStock {
        kind,
        material: req.material.clone(),
        color: req.color.clone(),
        finish: req.finish.clone(),
    }
}

impl TryFrom<Vec<MaterialUnit>> for Inventory {
    type Error = FarmError;

    /// Rebuilds the index; a repeated `(kind, id)` is an error.
    fn try_from(units: Vec<MaterialUnit>) -> Result<Self> {
        let mut inv = Inventory::new();
        for unit in units {
            inv.add_unit(unit)?;
        }
        Ok(inv)
    }
}

impl From<Inventory> for Vec<MaterialUnit> {
    fn from(inv: Inventory) -> Self {
        inv.units
    }
}
