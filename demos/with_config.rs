use chime::{ReminderSchedulerBuilder, TaskStore};
use chrono::{Local, TimeDelta};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info".to_string())
        )
        .with_target(false)
        .init();

    println!("🚀 Starting reminders with TOML configuration...\n");
    println!("📁 Config file: config/application.toml");
    println!("💡 Override with CHIME_REMINDER__PERIOD=10s, CHIME_REMINDER__TRIGGER=cron, ...\n");

    let config = chime::load_toml_config("config/application.toml")?;
    let offset = config.get_int("app.demo_offset_minutes").unwrap_or(1);

    // One task for the coming minute, one a little later
    let store = TaskStore::new();
    let now = Local::now().naive_local();
    for (label, minutes) in [("Stretch your legs", offset), ("Drink some water", offset + 1)] {
        let due = now + TimeDelta::minutes(minutes);
        store.add(
            label,
            &due.format("%H:%M").to_string(),
            &due.format("%Y-%m-%d").to_string(),
        )?;
    }
    for entry in store.list() {
        println!("  📝 {}", entry);
    }

    // Reminders are written through the default TracingSink
    let handle = ReminderSchedulerBuilder::with_config(store, config)?
        .build()?
        .start()
        .await?;

    println!("\n✅ Scheduler started! Press Ctrl+C to stop.\n");
    tokio::signal::ctrl_c().await?;

    println!("\n👋 Shutting down...");
    handle.stop().await?;
    Ok(())
}
