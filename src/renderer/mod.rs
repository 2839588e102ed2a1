//! Template renderer: maps a snapshot onto a deck template
//!
//! Four phases per run: load the template (or synthesize a minimal deck when
//! none exists), substitute bound tokens at run level, compute the output
//! path, persist atomically. Missing sections, tokens, or snapshot fields
//! are logged and skipped; load and persist failures are returned to the
//! caller, because the artifact is the run's primary deliverable.

pub mod bindings;
pub mod format;
pub mod path;

pub use bindings::{SectionBinding, SectionBindings, TokenBinding};
pub use format::{format_value, ValueFormat};
pub use path::output_path;

use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::deck::{Deck, DeckError, Slide};
use crate::snapshot::Snapshot;

/// Errors that can occur while rendering a report
#[derive(Debug, Error)]
pub enum RenderError {
    /// Template exists but could not be loaded
    #[error("failed to load template {path}: {source}")]
    TemplateLoad {
        path: PathBuf,
        #[source]
        source: DeckError,
    },

    /// Output directory could not be created
    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An artifact already exists at the destination path
    #[error("output artifact already exists: {path}")]
    ArtifactExists { path: PathBuf },

    /// Artifact could not be written
    #[error("failed to persist artifact {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: DeckError,
    },
}

/// Renders one snapshot against the configured template
#[derive(Debug, Clone)]
pub struct Renderer {
    template_path: PathBuf,
    output_dir: PathBuf,
    filename_pattern: String,
    bindings: SectionBindings,
}

impl Renderer {
    pub fn from_config(config: &Config) -> Self {
        Renderer {
            template_path: config.template.path.clone(),
            output_dir: config.output.directory.clone(),
            filename_pattern: config.output.filename_pattern.clone(),
            bindings: SectionBindings::standard(),
        }
    }

    /// Replace the binding table (the section set is configuration, not
    /// renderer knowledge)
    pub fn with_bindings(mut self, bindings: SectionBindings) -> Self {
        self.bindings = bindings;
        self
    }

    /// Render the snapshot and persist the output artifact, returning its
    /// path. Failures are logged here with cause and returned to the caller.
    pub fn render(&self, snapshot: &Snapshot) -> Result<PathBuf, RenderError> {
        match self.render_inner(snapshot) {
            Ok(path) => Ok(path),
            Err(e) => {
                error!(error = %e, "report rendering failed");
                Err(e)
            }
        }
    }

    fn render_inner(&self, snapshot: &Snapshot) -> Result<PathBuf, RenderError> {
        let mut deck = self.load_template(snapshot)?;
        self.apply_bindings(&mut deck, snapshot);

        let today = snapshot.generated_at().date_naive();
        let path = output_path(&self.output_dir, &self.filename_pattern, today, snapshot.week());

        std::fs::create_dir_all(&self.output_dir).map_err(|source| RenderError::OutputDir {
            path: self.output_dir.clone(),
            source,
        })?;
        if path.exists() {
            return Err(RenderError::ArtifactExists { path });
        }
        deck.save(&path).map_err(|source| RenderError::Persist {
            path: path.clone(),
            source,
        })?;

        info!(path = %path.display(), "report generated");
        Ok(path)
    }

    /// Load phase: parse the configured template, or synthesize a minimal
    /// deck when the file does not exist (smoke output only).
    fn load_template(&self, snapshot: &Snapshot) -> Result<Deck, RenderError> {
        if self.template_path.exists() {
            let deck = Deck::from_file(&self.template_path).map_err(|source| {
                RenderError::TemplateLoad {
                    path: self.template_path.clone(),
                    source,
                }
            })?;
            info!(template = %self.template_path.display(), "template loaded");
            Ok(deck)
        } else {
            warn!(
                template = %self.template_path.display(),
                "template not found, synthesizing minimal deck"
            );
            Ok(Deck::synthesized(
                snapshot.week(),
                &snapshot.generated_at().format("%Y-%m-%d %H:%M").to_string(),
            ))
        }
    }

    /// Update phase: walk each bound section and substitute its tokens.
    /// Absent sections and unmatched tokens are logged, never errors.
    fn apply_bindings(&self, deck: &mut Deck, snapshot: &Snapshot) {
        for section in &self.bindings.sections {
            let present = deck
                .slides
                .iter()
                .any(|slide| slide.section.as_deref() == Some(section.section.as_str()));
            if !present {
                warn!(section = %section.section, "section not present in template, skipping");
                continue;
            }
            for binding in &section.tokens {
                let replacement = format_value(snapshot.lookup(&binding.path), &binding.format);
                let mut replaced = 0;
                for slide in deck.slides_in_section(&section.section) {
                    replaced += substitute_in_slide(slide, &binding.token, &replacement);
                }
                if replaced == 0 {
                    debug!(
                        section = %section.section,
                        token = %binding.token,
                        "token not present in template"
                    );
                }
            }
        }
    }
}

/// Run-level substitution: a token is matched only within a single run's own
/// text, so a token split across adjacent runs is deliberately left as-is.
/// Formatting attributes are untouched. Returns the number of runs changed.
pub fn substitute_in_slide(slide: &mut Slide, token: &str, replacement: &str) -> usize {
    let mut replaced = 0;
    for shape in &mut slide.shapes {
        let Some(frame) = shape.text.as_mut() else {
            continue;
        };
        for paragraph in &mut frame.paragraphs {
            for run in &mut paragraph.runs {
                if run.text.contains(token) {
                    run.text = run.text.replace(token, replacement);
                    replaced += 1;
                }
            }
        }
    }
    replaced
}
