//! Scheduler loop behavior: trigger timing, failure tolerance, shutdown

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, TimeZone};

use weekly_reporter::config::ScheduleConfig;
use weekly_reporter::scheduler::{CancellationToken, Clock, ManualClock, RunHook};
use weekly_reporter::{
    Config, RenderError, Renderer, ScheduleDescriptor, Scheduler, SourceResolver, TriggerHandle,
};

/// Counts run outcomes and cancels the loop once a target total is reached
struct CountingHook {
    successes: Arc<AtomicUsize>,
    failures: Arc<AtomicUsize>,
    token: CancellationToken,
    stop_after: usize,
}

impl CountingHook {
    fn total(&self) -> usize {
        self.successes.load(Ordering::SeqCst) + self.failures.load(Ordering::SeqCst)
    }
}

impl RunHook for CountingHook {
    fn on_success(&self, _artifact: &Path) -> Result<(), Box<dyn std::error::Error>> {
        self.successes.fetch_add(1, Ordering::SeqCst);
        if self.total() >= self.stop_after {
            self.token.cancel();
        }
        Ok(())
    }

    fn on_failure(&self, _error: &RenderError) {
        self.failures.fetch_add(1, Ordering::SeqCst);
        if self.total() >= self.stop_after {
            self.token.cancel();
        }
    }
}

struct Fixture {
    scheduler: Scheduler,
    trigger: TriggerHandle,
    clock: ManualClock,
    start: DateTime<Local>,
    successes: Arc<AtomicUsize>,
    failures: Arc<AtomicUsize>,
}

/// Tuesday 10:00 start, Wednesday 09:00 schedule, 60-second polling.
/// Runs against the builtin sample; `corrupt_template` makes every render
/// fail at template load.
fn fixture(root: &Path, stop_after: usize, corrupt_template: bool) -> Fixture {
    let mut config = Config::default();
    config.data_source.source_type = String::new();
    config.template.path = root.join("template.json");
    config.output.directory = root.join("reports");
    // Distinct name per week so consecutive scheduled runs do not collide
    config.output.filename_pattern = "report_{week}.pptx".to_string();
    if corrupt_template {
        std::fs::write(&config.template.path, "not a deck").unwrap();
    }

    let descriptor = ScheduleDescriptor::from_config(&ScheduleConfig {
        day: "wednesday".to_string(),
        time: "09:00".to_string(),
    });
    let start = Local.with_ymd_and_hms(2025, 8, 12, 10, 0, 0).unwrap();
    let clock = ManualClock::starting_at(start);

    let (scheduler, trigger) = Scheduler::new(
        descriptor,
        SourceResolver::from_config(&config.data_source),
        Renderer::from_config(&config),
        Box::new(clock.clone()),
    );

    let successes = Arc::new(AtomicUsize::new(0));
    let failures = Arc::new(AtomicUsize::new(0));
    let hook = CountingHook {
        successes: successes.clone(),
        failures: failures.clone(),
        token: scheduler.cancellation_token(),
        stop_after,
    };
    let scheduler = scheduler
        .with_hook(Box::new(hook))
        .with_poll_interval(Duration::from_secs(60));

    Fixture {
        scheduler,
        trigger,
        clock,
        start,
        successes,
        failures,
    }
}

#[test]
fn scheduled_trigger_fires_at_next_wednesday_morning() {
    let dir = tempfile::tempdir().unwrap();
    let mut f = fixture(dir.path(), 1, false);

    f.scheduler.run_loop();

    assert_eq!(f.successes.load(Ordering::SeqCst), 1);
    assert_eq!(f.failures.load(Ordering::SeqCst), 0);
    // The run happened once the clock reached Wednesday 09:00
    let fired_at = f.clock.now();
    let expected = Local.with_ymd_and_hms(2025, 8, 13, 9, 0, 0).unwrap();
    assert!(fired_at >= expected);
    assert!(fired_at < expected + chrono::Duration::minutes(5));
}

#[test]
fn manual_trigger_fires_immediately() {
    let dir = tempfile::tempdir().unwrap();
    let mut f = fixture(dir.path(), 1, false);

    assert!(f.trigger.run_now());
    f.scheduler.run_loop();

    assert_eq!(f.successes.load(Ordering::SeqCst), 1);
    // No schedule wait happened: barely any simulated time passed
    assert!(f.clock.now() < f.start + chrono::Duration::minutes(5));
}

#[test]
fn surplus_manual_triggers_in_one_tick_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut f = fixture(dir.path(), 1, false);

    // Three triggers queued; only one run may execute per tick
    assert!(f.trigger.run_now());
    assert!(f.trigger.run_now());
    assert!(f.trigger.run_now());
    f.scheduler.run_loop();

    assert_eq!(f.successes.load(Ordering::SeqCst), 1);
}

#[test]
fn failed_run_does_not_stop_subsequent_scheduled_runs() {
    let dir = tempfile::tempdir().unwrap();
    let mut f = fixture(dir.path(), 2, true);

    f.scheduler.run_loop();

    // Two consecutive weekly fires, both failing at template load; the loop
    // kept going after the first failure and never missed the second slot
    assert_eq!(f.failures.load(Ordering::SeqCst), 2);
    assert_eq!(f.successes.load(Ordering::SeqCst), 0);
    let second_fire = Local.with_ymd_and_hms(2025, 8, 20, 9, 0, 0).unwrap();
    assert!(f.clock.now() >= second_fire);
}

#[test]
fn cancelled_scheduler_exits_without_running() {
    let dir = tempfile::tempdir().unwrap();
    let mut f = fixture(dir.path(), 1, false);

    f.scheduler.cancellation_token().cancel();
    f.scheduler.run_loop();

    assert_eq!(f.successes.load(Ordering::SeqCst), 0);
    assert_eq!(f.failures.load(Ordering::SeqCst), 0);
}

#[test]
fn run_once_reports_render_failures() {
    let dir = tempfile::tempdir().unwrap();
    let mut f = fixture(dir.path(), 99, true);

    assert!(f.scheduler.run_once().is_err());
    assert_eq!(f.failures.load(Ordering::SeqCst), 1);
    assert!(matches!(
        f.scheduler.state(),
        weekly_reporter::RunState::Failed
    ));
}
