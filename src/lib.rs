//! Job-shop operations core for a 3D-printing farm.
//!
//! Provides the domain models and bookkeeping behind a print-farm dashboard:
//! turning orders into print jobs, matching jobs to printers by technology,
//! reserving stock units, and moving orders through the shop workflow.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Order`, `Job`, `Printer`, `MaterialUnit`
//! - **`queue`**: Job queue built from pending orders
//! - **`matcher`**: Printer capacity by technology
//! - **`inventory`**: Material reservation arena (assign / return)
//! - **`status`**: Order workflow and printer status guard
//! - **`dispatching`**: Rules that decide which queued job prints first
//! - **`allotment`**: Greedy job-to-printer allotment with material reservation
//! - **`workspace`**: A tenant's farm, and the registry of all farms
//! - **`summary`**: Dashboard indicators
//! - **`validation`**: Integrity checks over a workspace
//! - **`fixtures`**: Seeded demo data
//!
//! # Concurrency
//!
//! All state is owned by a [`workspace::Workspace`] and mutated through
//! `&mut self`. Sharing a workspace across threads requires wrapping it in a
//! lock; reservation and return are then atomic per call.

pub mod allotment;
pub mod config;
pub mod dispatching;
pub mod error;
pub mod fixtures;
pub mod inventory;
pub mod logging;
pub mod matcher;
pub mod models;
pub mod queue;
pub mod status;
pub mod summary;
pub mod validation;
pub mod workspace;

pub use error::{FarmError, Result};
pub use workspace::{FarmRegistry, Workspace};
