use chime::{ManualClock, ReminderSchedulerBuilder, TaskStore};
use chrono::{NaiveDateTime, TimeDelta};

/// Drives the scheduler by hand against a simulated clock
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let store = TaskStore::new();
    store.add("Pay rent", "09:00", "2024-01-01")?;
    store.add("Call the bank", "09:01", "2024-01-01")?;
    let dentist = store.add("Dentist", "14:30", "2024-01-02")?;

    if let Err(e) = store.add("X", "bad-time", "2024-01-01") {
        println!("Rejected: {}", e);
    }

    println!("Tasks:");
    for entry in store.list() {
        println!("  {}", entry);
    }

    let start = NaiveDateTime::parse_from_str("2024-01-01 08:59", "%Y-%m-%d %H:%M")?;
    let clock = ManualClock::new(start);
    let scheduler = ReminderSchedulerBuilder::new(store.clone())
        .clock(clock.clone())
        .sink(|reminder: &chime::Reminder| -> Result<(), chime::SinkError> {
            println!("  🔔 {}", reminder);
            Ok(())
        })
        .build()?;

    for _ in 0..4 {
        let report = scheduler.tick();
        println!("[{}] fired {} task(s)", report.now, report.fired.len());
        clock.advance(TimeDelta::seconds(30));
    }

    store.remove(dentist)?;
    println!("\nRemaining:");
    for entry in store.list() {
        let state = if entry.fired { "done" } else { "pending" };
        println!("  {} ({})", entry, state);
    }

    Ok(())
}
