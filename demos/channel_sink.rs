use chime::{ChannelSink, ReminderSchedulerBuilder, TaskStore};
use chrono::{Local, TimeDelta};

/// Delivers reminders through a channel to a separate consumer task,
/// the way a UI layer would receive them
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "debug".to_string())
        )
        .with_target(false)
        .init();

    let store = TaskStore::new();
    let due = Local::now().naive_local() + TimeDelta::minutes(1);
    store.add(
        "Check the oven",
        &due.format("%H:%M").to_string(),
        &due.format("%Y-%m-%d").to_string(),
    )?;

    let (sink, mut reminders) = ChannelSink::new();
    let handle = ReminderSchedulerBuilder::new(store.clone())
        .sink(sink)
        .cron("0 * * * * *")
        .build()?
        .start()
        .await?;

    println!("⏰ Waiting for '{}'...", store.list()[0]);

    if let Some(reminder) = reminders.recv().await {
        println!("🔔 {}", reminder);
    }

    handle.stop().await?;
    println!("👋 Done");
    Ok(())
}
