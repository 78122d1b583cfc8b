//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `slotbook_core` linkage.
//! - Run one seed/book/report cycle on an in-memory store.

use slotbook_core::{
    BookingDesk, BookingFilter, BookingRequest, MemoryKvRepository, SoftwarePackage,
};

fn main() {
    println!("slotbook_core version={}", slotbook_core::core_version());

    let store = MemoryKvRepository::new();
    let desk = BookingDesk::new(&store);
    let today = desk.today();

    match run_probe(&desk, today) {
        Ok(()) => println!("probe status=ok"),
        Err(err) => {
            eprintln!("probe status=error error={err}");
            std::process::exit(1);
        }
    }
}

fn run_probe(
    desk: &BookingDesk<&MemoryKvRepository>,
    today: chrono::NaiveDate,
) -> slotbook_core::ServiceResult<()> {
    let slots = desk.list_slots_for_date(today)?;
    println!("slots date={today} count={}", slots.len());

    if let Some(first) = slots.first() {
        let outcome = desk.create_booking(&BookingRequest {
            date: today,
            time_slot: first.time.clone(),
            company_name: "Probe Ltd".to_string(),
            phone_number: "+1 555 010 0199".to_string(),
            software_package: SoftwarePackage::CloudBasic,
        })?;
        println!("booking success={} message={}", outcome.is_success(), outcome.message());
    }

    let stats = desk.compute_dashboard_stats(today)?;
    println!(
        "stats today_total={} upcoming_total={} available_today={}",
        stats.today_total, stats.upcoming_total, stats.available_today
    );

    let csv = desk.export_bookings_csv(&BookingFilter::default())?;
    println!("report rows={}", csv.lines().count().saturating_sub(1));
    Ok(())
}
