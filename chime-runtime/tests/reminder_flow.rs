use chime_runtime::{
    ChannelSink, ManualClock, Reminder, ReminderScheduler, ReminderSchedulerBuilder,
    SchedulerError, TaskStore, ValidationError,
};
use chrono::NaiveDateTime;
use std::collections::HashSet;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn scheduler(
    store: &TaskStore,
    clock: &ManualClock,
    period: &str,
) -> (ReminderScheduler, UnboundedReceiver<Reminder>) {
    let (sink, rx) = ChannelSink::new();
    let scheduler = ReminderSchedulerBuilder::new(store.clone())
        .clock(clock.clone())
        .sink(sink)
        .fixed_rate(period)
        .build()
        .unwrap();
    (scheduler, rx)
}

#[test]
fn pay_rent_scenario() {
    let store = TaskStore::new();
    let id = store.add("Pay rent", "09:00", "2024-01-01").unwrap();
    let clock = ManualClock::new(at("2024-01-01 09:00:00"));
    let (scheduler, mut rx) = scheduler(&store, &clock, "60s");

    scheduler.tick();
    let reminder = rx.try_recv().unwrap();
    assert_eq!(reminder.description, "Pay rent");
    assert_eq!(reminder.id, id);
    assert!(rx.try_recv().is_err());
    assert!(store.list()[0].fired);

    scheduler.tick();
    assert!(rx.try_recv().is_err());
}

#[test]
fn bad_time_is_rejected() {
    let store = TaskStore::new();
    let err = store.add("X", "bad-time", "2024-01-01").unwrap_err();
    assert!(matches!(err, ValidationError::InvalidDateTime { .. }));
    assert!(store.list().is_empty());
}

#[tokio::test(start_paused = true)]
async fn running_scheduler_fires_due_entry_once() {
    let store = TaskStore::new();
    let id = store.add("Pay rent", "09:00", "2024-01-01").unwrap();
    let clock = ManualClock::new(at("2024-01-01 08:59:30"));
    let (scheduler, mut rx) = scheduler(&store, &clock, "60s");

    let handle = scheduler.start().await.unwrap();

    // The first tick runs straight away, one minute early
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(rx.try_recv().is_err());

    clock.set(at("2024-01-01 09:00:10"));
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(rx.try_recv().unwrap().id, id);

    // Later ticks in the same minute and afterwards stay quiet
    clock.set(at("2024-01-01 09:00:50"));
    tokio::time::sleep(Duration::from_secs(60)).await;
    clock.set(at("2024-01-01 09:01:00"));
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert!(rx.try_recv().is_err());

    handle.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn no_reminders_after_stop() {
    let store = TaskStore::new();
    store.add("Water plants", "18:00", "2024-06-01").unwrap();
    let clock = ManualClock::new(at("2024-06-01 17:59:00"));
    let (scheduler, mut rx) = scheduler(&store, &clock, "60s");

    let handle = scheduler.start().await.unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;

    let idle = handle.stop().await.unwrap();
    clock.set(at("2024-06-01 18:00:00"));
    tokio::time::sleep(Duration::from_secs(300)).await;
    assert!(rx.try_recv().is_err());
    assert!(!store.list()[0].fired);

    // Restarting the returned scheduler picks up where it left off
    let handle = idle.start().await.unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(rx.try_recv().unwrap().description, "Water plants");
    handle.stop().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn dropping_the_handle_disarms() {
    let store = TaskStore::new();
    store.add("Feed cat", "07:00", "2024-06-01").unwrap();
    let clock = ManualClock::new(at("2024-06-01 06:59:00"));
    let (scheduler, mut rx) = scheduler(&store, &clock, "60s");

    let handle = scheduler.start().await.unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;
    drop(handle);

    clock.set(at("2024-06-01 07:00:00"));
    tokio::time::sleep(Duration::from_secs(120)).await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn initial_delay_postpones_the_first_tick() {
    let store = TaskStore::new();
    store.add("Stretch", "10:00", "2024-06-01").unwrap();
    let clock = ManualClock::new(at("2024-06-01 10:00:00"));
    let (sink, mut rx) = ChannelSink::new();
    let scheduler = ReminderSchedulerBuilder::new(store.clone())
        .clock(clock.clone())
        .sink(sink)
        .fixed_rate("60s")
        .initial_delay("30s")
        .build()
        .unwrap();

    let handle = scheduler.start().await.unwrap();
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(rx.try_recv().is_err());

    tokio::time::sleep(Duration::from_secs(25)).await;
    assert_eq!(rx.try_recv().unwrap().description, "Stretch");
    handle.stop().await.unwrap();
}

#[test]
fn removals_during_ticks_never_double_fire() {
    let store = TaskStore::new();
    for i in 0..200 {
        store.add(&format!("task {i}"), "09:00", "2024-01-01").unwrap();
    }
    let clock = ManualClock::new(at("2024-01-01 09:00:00"));
    let (scheduler, mut rx) = scheduler(&store, &clock, "60s");

    let remover = {
        let store = store.clone();
        std::thread::spawn(move || {
            while store.len() > 100 {
                let _ = store.remove_at(store.len() / 2);
                let _ = store.add("late", "09:00", "2024-01-01");
                let _ = store.remove_at(0);
            }
        })
    };

    for _ in 0..50 {
        scheduler.tick();
    }
    remover.join().unwrap();
    scheduler.tick();

    let mut seen = HashSet::new();
    while let Ok(reminder) = rx.try_recv() {
        assert!(seen.insert(reminder.id), "{} fired twice", reminder.id);
    }
    assert!(store.list().iter().all(|entry| entry.fired));
}

#[tokio::test(flavor = "multi_thread")]
async fn cron_trigger_starts_and_stops() {
    let store = TaskStore::new();
    let scheduler = ReminderSchedulerBuilder::new(store)
        .cron("0 * * * * *")
        .build()
        .unwrap();

    let handle = scheduler.start().await.unwrap();
    let idle = handle.stop().await.unwrap();
    assert_eq!(idle.trigger().to_string(), "cron '0 * * * * *'");
}

#[tokio::test(flavor = "multi_thread")]
async fn dropping_a_cron_handle_releases_the_sink() {
    let (sink, mut rx) = ChannelSink::new();
    let scheduler = ReminderSchedulerBuilder::new(TaskStore::new())
        .sink(sink)
        .cron("* * * * * *")
        .build()
        .unwrap();

    let handle = scheduler.start().await.unwrap();
    drop(handle);

    // The channel closes once the cron job holding the engine is gone
    let closed = tokio::time::timeout(Duration::from_secs(5), rx.recv()).await;
    assert_eq!(closed, Ok(None));
}

#[tokio::test(flavor = "multi_thread")]
async fn invalid_cron_fails_to_start() {
    let scheduler = ReminderSchedulerBuilder::new(TaskStore::new())
        .cron("every minute please")
        .build()
        .unwrap();

    let err = scheduler.start().await.err().expect("cron parse error");
    assert!(matches!(err, SchedulerError::Cron(_)));
}
