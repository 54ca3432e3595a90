//! Farm domain models.
//!
//! Provides the core data types for the print shop: what customers order,
//! what the farm prints it on, and what it prints it with.
//!
//! # Domain Mappings
//!
//! | printfarm-ops | Job shop | Meaning |
//! |---------------|----------|---------|
//! | Order | Order | Customer request with workflow status |
//! | Job | Job | Print work derived from an order |
//! | Printer | Machine | Processing resource of one technology |
//! | MaterialUnit | Consumable | Spool, resin bottle or powder batch |

mod job;
mod material;
mod order;
mod printer;

pub use job::{ItemGroup, Job, JobSchedule, MaterialRequirement, DEFAULT_FINISH};
pub use material::{MaterialKind, MaterialUnit, StockStatus, UnitRef};
pub use order::{Order, OrderStatus, PrinterTechnology, Priority};
pub use printer::{Printer, PrinterStatus, DEFAULT_BUILD_TIME_PER_ITEM_MS};
