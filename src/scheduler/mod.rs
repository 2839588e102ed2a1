//! Run scheduling: the weekly trigger state machine
//!
//! One cooperative poll loop drives the pipeline: resolve a snapshot, render
//! the report, invoke the post-run hook. States follow
//! `IDLE → WAITING_FOR_TRIGGER → RUNNING → (SUCCEEDED | FAILED) →
//! WAITING_FOR_TRIGGER`. A failed run is logged and never stops the loop or
//! shifts the next scheduled fire; shutdown is checked between poll ticks,
//! never mid-run.

pub mod clock;

pub use clock::{CancellationToken, Clock, ManualClock, SystemClock};

use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::time::Duration;

use chrono::{Datelike, NaiveDateTime, NaiveTime, Weekday};
use tracing::{error, info, warn};

use crate::config::ScheduleConfig;
use crate::renderer::{RenderError, Renderer};
use crate::source::SourceResolver;

/// How often the waiting loop polls for triggers
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Scheduler state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    WaitingForTrigger,
    Running,
    Succeeded,
    Failed,
}

/// One weekly recurring fire point, immutable for the process lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleDescriptor {
    pub day: Weekday,
    pub time: NaiveTime,
}

impl ScheduleDescriptor {
    /// Parse from configuration. Unknown weekday falls back to Monday and
    /// unparseable time to 09:00, each with a warning; schedule problems
    /// must not fail runs.
    pub fn from_config(config: &ScheduleConfig) -> Self {
        let day = match config.day.to_lowercase().as_str() {
            "monday" => Weekday::Mon,
            "tuesday" => Weekday::Tue,
            "wednesday" => Weekday::Wed,
            "thursday" => Weekday::Thu,
            "friday" => Weekday::Fri,
            "saturday" => Weekday::Sat,
            "sunday" => Weekday::Sun,
            other => {
                warn!(day = other, "unknown schedule day, defaulting to Monday");
                Weekday::Mon
            }
        };
        let time = match NaiveTime::parse_from_str(&config.time, "%H:%M") {
            Ok(t) => t,
            Err(_) => {
                warn!(time = %config.time, "unparseable schedule time, defaulting to 09:00");
                NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default()
            }
        };
        ScheduleDescriptor { day, time }
    }
}

/// Next occurrence of the descriptor's day and time strictly after `now`
pub fn next_fire_time(now: NaiveDateTime, descriptor: ScheduleDescriptor) -> NaiveDateTime {
    let today = now.date();
    let days_ahead = (descriptor.day.num_days_from_monday() + 7
        - today.weekday().num_days_from_monday())
        % 7;
    let mut fire = (today + chrono::Days::new(u64::from(days_ahead))).and_time(descriptor.time);
    if fire <= now {
        fire = fire + chrono::Duration::days(7);
    }
    fire
}

/// Post-run collaborator (notification, upload). Best-effort on both sides:
/// hook failures are logged by the scheduler and never fail the run.
pub trait RunHook {
    fn on_success(&self, _artifact: &Path) -> Result<(), Box<dyn std::error::Error>> {
        Ok(())
    }

    fn on_failure(&self, _error: &RenderError) {}
}

/// Default hook: does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHook;

impl RunHook for NoopHook {}

/// Sends manual `run_now` triggers into a running scheduler loop
#[derive(Debug, Clone)]
pub struct TriggerHandle {
    sender: Sender<()>,
}

impl TriggerHandle {
    /// Request an immediate run. Returns false when the loop has shut down.
    pub fn run_now(&self) -> bool {
        self.sender.send(()).is_ok()
    }
}

/// Owns the trigger loop and the per-run pipeline. Constructed once at
/// startup; no ambient state.
pub struct Scheduler {
    descriptor: ScheduleDescriptor,
    resolver: SourceResolver,
    renderer: Renderer,
    hook: Box<dyn RunHook>,
    clock: Box<dyn Clock>,
    token: CancellationToken,
    poll_interval: Duration,
    triggers: Receiver<()>,
    state: RunState,
}

impl Scheduler {
    pub fn new(
        descriptor: ScheduleDescriptor,
        resolver: SourceResolver,
        renderer: Renderer,
        clock: Box<dyn Clock>,
    ) -> (Self, TriggerHandle) {
        let (sender, triggers) = std::sync::mpsc::channel();
        let scheduler = Scheduler {
            descriptor,
            resolver,
            renderer,
            hook: Box::new(NoopHook),
            clock,
            token: CancellationToken::new(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            triggers,
            state: RunState::Idle,
        };
        (scheduler, TriggerHandle { sender })
    }

    /// Install a post-run hook (default: no-op)
    pub fn with_hook(mut self, hook: Box<dyn RunHook>) -> Self {
        self.hook = hook;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Token to cancel from a signal handler or test
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Execute one run: resolve a snapshot, render, invoke the hook.
    /// The resolve/render pair is one atomic unit of work; a render failure
    /// leaves no artifact behind (persist is atomic).
    pub fn run_once(&mut self) -> Result<PathBuf, RenderError> {
        self.state = RunState::Running;
        let snapshot = self.resolver.resolve();
        info!(
            week = snapshot.week(),
            strategy = %snapshot.provenance().strategy,
            degraded = snapshot.provenance().degraded,
            "snapshot resolved"
        );
        match self.renderer.render(&snapshot) {
            Ok(path) => {
                self.state = RunState::Succeeded;
                if let Err(e) = self.hook.on_success(&path) {
                    warn!(error = %e, "post-run hook failed");
                }
                Ok(path)
            }
            Err(e) => {
                self.state = RunState::Failed;
                error!(error = %e, "run failed");
                self.hook.on_failure(&e);
                Err(e)
            }
        }
    }

    /// Run until the cancellation token fires. Triggers are either the
    /// weekly fire point or a manual `run_now`; at most one run executes per
    /// poll tick, and surplus manual triggers from the same tick are
    /// rejected with a warning rather than queued.
    pub fn run_loop(&mut self) {
        self.state = RunState::WaitingForTrigger;
        let mut next_fire = next_fire_time(self.clock.now().naive_local(), self.descriptor);
        info!(%next_fire, "scheduler waiting for trigger");

        loop {
            if self.token.is_cancelled() {
                info!("shutdown requested, scheduler stopping");
                break;
            }

            let manual = match self.triggers.try_recv() {
                Ok(()) => true,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => false,
            };
            let now = self.clock.now().naive_local();

            if manual || now >= next_fire {
                info!(
                    trigger = if manual { "manual" } else { "scheduled" },
                    "run triggered"
                );
                // Errors are already logged and reported via the hook; the
                // loop always returns to waiting.
                let _ = self.run_once();
                self.reject_surplus_triggers();
                self.state = RunState::WaitingForTrigger;
                next_fire = next_fire_time(self.clock.now().naive_local(), self.descriptor);
                info!(%next_fire, "next scheduled run");
            }

            if self.clock.wait(self.poll_interval, &self.token) {
                info!("shutdown requested, scheduler stopping");
                break;
            }
        }
    }

    /// Drain triggers that arrived while a run was in flight; re-entrant
    /// triggering within one tick is rejected, never run concurrently.
    fn reject_surplus_triggers(&mut self) {
        let mut rejected = 0;
        while self.triggers.try_recv().is_ok() {
            rejected += 1;
        }
        if rejected > 0 {
            warn!(rejected, "manual trigger rejected: a run already executed this tick");
        }
    }
}
