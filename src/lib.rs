//! Weekly Reporter - automated slide-deck report generation
//!
//! Turns a periodic business-data snapshot into a formatted deck artifact on
//! a weekly trigger. The pipeline has three parts: a source resolver that
//! always yields a renderable snapshot (falling back to a built-in sample on
//! any acquisition failure), a template renderer that substitutes
//! placeholder tokens at styled-run granularity without disturbing
//! formatting, and a scheduler that drives the pair on a failure-tolerant
//! poll loop with manual override.

pub mod config;
pub mod deck;
pub mod renderer;
pub mod scheduler;
pub mod snapshot;
pub mod source;

pub use config::{Config, ConfigError};
pub use deck::{Deck, DeckError};
pub use renderer::{RenderError, Renderer, SectionBindings};
pub use scheduler::{
    CancellationToken, NoopHook, RunHook, RunState, ScheduleDescriptor, Scheduler, SystemClock,
    TriggerHandle,
};
pub use snapshot::{Provenance, Snapshot, SourceKind};
pub use source::{AcquisitionError, SourceResolver};

use std::path::PathBuf;

/// Run one complete report cycle with the given configuration: resolve a
/// snapshot (total, never fails) and render it.
///
/// This is the unit of work the scheduler executes per trigger; it is also
/// the `--now` entry point.
pub fn generate_report(config: &Config) -> Result<PathBuf, RenderError> {
    let resolver = SourceResolver::from_config(&config.data_source);
    let renderer = Renderer::from_config(config);
    let snapshot = resolver.resolve();
    renderer.render(&snapshot)
}
