use chrono::NaiveDate;

use printfarm_ops::allotment::Allotter;
use printfarm_ops::config::FarmConfig;
use printfarm_ops::fixtures::generate_farm;
use printfarm_ops::logging;
use printfarm_ops::models::{
    ItemGroup, Job, MaterialKind, MaterialRequirement, MaterialUnit, Order, OrderStatus, Printer,
    PrinterStatus, PrinterTechnology, Priority,
};
use printfarm_ops::validation::validate_workspace;
use printfarm_ops::{FarmError, FarmRegistry, Workspace};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 11, d).unwrap()
}

fn shop() -> Workspace {
    let mut ws = Workspace::new("north", FarmConfig::default());
    ws.add_printer(Printer::new("FDM-1", PrinterTechnology::Fdm).with_build_time(600_000))
        .unwrap();
    ws.add_printer(Printer::new("SLA-1", PrinterTechnology::Sla).with_build_time(900_000))
        .unwrap();
    ws.add_unit(MaterialUnit::new("SP-1", MaterialKind::Spool, "PLA", "#FFFFFF", 1000.0))
        .unwrap();
    ws.add_unit(MaterialUnit::new("SP-2", MaterialKind::Spool, "PLA", "#FFFFFF", 1000.0))
        .unwrap();
    ws.add_unit(MaterialUnit::new("RS-1", MaterialKind::Resin, "PLA", "#FFFFFF", 1000.0))
        .unwrap();
    ws
}

#[test]
fn order_to_dispatch() {
    logging::init_test();
    let mut ws = shop();

    ws.submit_order(
        Order::new("A", "Acme", day(1))
            .with_items(3)
            .with_priority(Priority::Low)
            .with_due_date(day(8)),
    )
    .unwrap();
    ws.submit_order(
        Order::new("B", "Globex", day(2))
            .with_items(1)
            .with_priority(Priority::High)
            .with_technology(PrinterTechnology::Sla),
    )
    .unwrap();

    let queue = ws.job_queue();
    let ids: Vec<&str> = queue.iter().map(|j| j.id.as_str()).collect();
    assert_eq!(ids, vec!["JOB-A", "JOB-B"]);

    let (jobs, plan) = ws.allot(0, day(3));
    assert!(plan.is_complete());
    assert!(jobs.iter().all(Job::is_scheduled));
    assert_eq!(plan.allotment_for_job("JOB-A").unwrap().end_ms, 1_800_000);
    assert_eq!(plan.allotment_for_job("JOB-B").unwrap().printer_id, "SLA-1");
    assert_eq!(
        plan.allotment_for_job("JOB-B").unwrap().materials[0].kind,
        MaterialKind::Resin
    );

    ws.start_job("JOB-A", "FDM-1").unwrap();
    assert_eq!(ws.order("A").unwrap().status, OrderStatus::InProgress);
    assert_eq!(ws.mark_overdue(day(9)), vec!["A".to_string()]);

    ws.finish_job("FDM-1").unwrap();
    assert_eq!(ws.order("A").unwrap().status, OrderStatus::Qc);

    let reserved: Vec<_> = ws
        .inventory()
        .assigned_to_job("JOB-A")
        .into_iter()
        .map(|u| u.unit_ref())
        .collect();
    for unit in &reserved {
        ws.return_material(unit, 120.0).unwrap();
    }
    assert!(ws.inventory().assigned_to_job("JOB-A").is_empty());

    ws.advance_order("A", OrderStatus::Packing).unwrap();
    ws.advance_order("A", OrderStatus::Dispatched).unwrap();
    assert!(matches!(
        ws.advance_order("A", OrderStatus::Qc),
        Err(FarmError::InvalidTransition { .. })
    ));

    assert!(validate_workspace(&ws).is_ok());
}

#[test]
fn out_of_stock_is_reported_without_side_effects() {
    let mut ws = shop();
    let before = ws.snapshot_json().unwrap();

    let err = ws
        .assign_material(&MaterialRequirement::new("PETG", "#FFFFFF"), "FDM-1", "JOB-X")
        .unwrap_err();
    assert!(err.to_string().starts_with("Out of Stock"));
    assert_eq!(ws.snapshot_json().unwrap(), before);
}

#[test]
fn printing_printer_refuses_status_change() {
    let mut ws = shop();
    ws.start_job("JOB-X", "FDM-1").unwrap();
    let err = ws
        .set_printer_status("FDM-1", PrinterStatus::Maintenance)
        .unwrap_err();
    assert!(err.to_string().starts_with("Action Denied"));
}

#[test]
fn multi_material_job_all_or_nothing() {
    let ws = shop();
    let mut jobs = vec![Job::new("J-MULTI", PrinterTechnology::Fdm).with_item_group(
        ItemGroup::new("assembly", 1)
            .with_material(MaterialRequirement::new("PLA", "#FFFFFF"))
            .with_material(MaterialRequirement::new("TPU", "#000000")),
    )];

    let printers = ws.printers().to_vec();
    let mut inventory = ws.inventory().clone();
    let plan = Allotter::new().allot(&mut jobs, &printers, &mut inventory, 0);
    assert_eq!(plan.unallotted.len(), 1);
    assert_eq!(inventory.available(MaterialKind::Spool).len(), 2);
}

#[test]
fn tenants_are_isolated() {
    let mut reg = FarmRegistry::new();
    reg.insert(generate_farm("demo", 11, 20)).unwrap();
    reg.create("empty", FarmConfig::default()).unwrap();

    assert_eq!(reg.get("demo").unwrap().orders().len(), 20);
    assert!(reg.get("empty").unwrap().orders().is_empty());

    let summary = reg.get("demo").unwrap().summary(day(30));
    let total: usize = summary.orders_by_status.values().sum();
    assert_eq!(total, 20);
}
