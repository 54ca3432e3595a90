//! Seeded demo data.
//!
//! Generates a plausible farm (fleet, stock and order book) for demos and
//! tests. The same seed always yields the same workspace.

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::config::FarmConfig;
use crate::models::{
    MaterialKind, MaterialUnit, Order, OrderStatus, Printer, PrinterStatus, PrinterTechnology, Priority,
};
use crate::workspace::Workspace;

const CUSTOMERS: [&str; 6] = [
    "Acme Robotics",
    "Globex",
    "Initech",
    "Umbrella Labs",
    "Stark Prototyping",
    "Wayne Medical",
];
const SALES: [&str; 3] = ["Avery", "Jordan", "Riley"];
const COLORS: [&str; 4] = ["#FFFFFF", "#000000", "#FF0000", "#808080"];

/// Materials stocked per pool: (material, total quantity).
fn catalogue(kind: MaterialKind) -> &'static [(&'static str, f64)] {
    match kind {
        MaterialKind::Spool => &[("PLA", 1000.0), ("PETG", 1000.0), ("ABS", 750.0)],
        MaterialKind::Resin => &[("Standard Resin", 1000.0), ("Tough Resin", 1000.0)],
        MaterialKind::Powder => &[("PA12", 10_000.0), ("Ti64", 5_000.0)],
    }
}

fn pick<'a, T>(rng: &mut StdRng, items: &'a [T]) -> &'a T {
    &items[rng.random_range(0..items.len())]
}

/// Builds a demo farm with `order_count` orders.
///
/// Every technology gets at least one printer and every pool gets stock.
pub fn generate_farm(farm_id: &str, seed: u64, order_count: usize) -> Workspace {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut ws = Workspace::new(farm_id, FarmConfig::default());
    let epoch = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();

    for (i, tech) in PrinterTechnology::ALL.into_iter().enumerate() {
        let count = if tech == PrinterTechnology::Fdm { 3 } else { 1 };
        for n in 0..count {
            let status = match rng.random_range(0..10_u32) {
                0 => PrinterStatus::Maintenance,
                1 => PrinterStatus::Offline,
                _ => PrinterStatus::Idle,
            };
            let printer = Printer::new(format!("{}-{:02}", tech, i * 10 + n + 1), tech)
                .with_name(format!("{tech} #{}", n + 1))
                .with_status(status)
                .with_build_time(rng.random_range(1..=6) * 1_800_000);
            let _ = ws.add_printer(printer);
        }
    }

    for kind in MaterialKind::ALL {
        let mut serial = 1;
        for &(material, total) in catalogue(kind) {
            for color in COLORS.iter().take(rng.random_range(1..=COLORS.len())) {
                let used = if rng.random_bool(0.4) {
                    (total * rng.random_range(0..=95_u32) as f64 / 100.0).round()
                } else {
                    0.0
                };
                let prefix = match kind {
                    MaterialKind::Spool => "SP",
                    MaterialKind::Resin => "RS",
                    MaterialKind::Powder => "PW",
                };
                let unit = MaterialUnit::new(format!("{prefix}-{serial:03}"), kind, material, *color, total)
                    .with_used(used);
                let _ = ws.add_unit(unit);
                serial += 1;
            }
        }
    }

    for n in 0..order_count {
        let placed = epoch + Duration::days(rng.random_range(0..60));
        let priority = *pick(&mut rng, &[Priority::Low, Priority::Medium, Priority::High]);
        let tech = *pick(&mut rng, &PrinterTechnology::ALL);
        let order = Order::new(format!("O-{:04}", n + 1), *pick(&mut rng, &CUSTOMERS), placed)
            .with_project_code(format!("PRJ-{}", rng.random_range(100..1000_u32)))
            .with_due_date(placed + Duration::days(rng.random_range(3..21)))
            .with_items(rng.random_range(1..=24))
            .with_priority(priority)
            .with_technology(tech)
            .with_sales_person(*pick(&mut rng, &SALES));
        let target = *pick(&mut rng, &OrderStatus::ALL);
        if let Ok(submitted) = ws.submit_order(order) {
            let id = submitted.id.clone();
            if target != OrderStatus::Pending {
                let _ = ws.advance_order(&id, target);
            }
        }
    }

    debug!(
        farm = farm_id,
        seed,
        printers = ws.printers().len(),
        units = ws.inventory().len(),
        orders = ws.orders().len(),
        "generated demo farm"
    );
    ws
}
