//! Error taxonomy for farm operations.
//!
//! Every fallible operation returns [`Result`]. The `Display` text of each
//! variant is short enough to be surfaced directly as a dashboard toast.

use thiserror::Error;

use crate::models::{MaterialKind, OrderStatus, PrinterStatus};

/// Errors raised by farm operations.
#[derive(Error, Debug)]
pub enum FarmError {
    /// No unassigned unit matches the requested material.
    #[error("Out of Stock: no {kind} unit of {material} / {color} / {finish} available")]
    OutOfStock {
        kind: MaterialKind,
        material: String,
        color: String,
        finish: String,
    },

    /// A printer-side action was refused by its current state.
    #[error("Action Denied: printer '{printer_id}' is {status}: {reason}")]
    ActionDenied {
        printer_id: String,
        status: PrinterStatus,
        reason: String,
    },

    /// Order status move that is not strictly forward.
    #[error("invalid status transition: from={from} to={to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// Scanned label text could not be parsed into a unit reference.
    #[error("Invalid QR Code: {0}")]
    InvalidCode(String),

    #[error("{entity} not found: id={id}")]
    NotFound { entity: &'static str, id: String },

    #[error("duplicate {entity} id: {id}")]
    DuplicateId { entity: &'static str, id: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl FarmError {
    pub(crate) fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub(crate) fn duplicate(entity: &'static str, id: impl Into<String>) -> Self {
        Self::DuplicateId {
            entity,
            id: id.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FarmError>;
