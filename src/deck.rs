//! Slide-deck artifact model
//!
//! The template artifact is a structured deck document: slides tagged with an
//! optional section name, containing shapes whose text frames are paragraphs
//! of atomic styled runs. A run is the smallest unit a token substitution can
//! target; its formatting attributes travel with it and are never rewritten
//! by the renderer.
//!
//! Decks serialize as pretty-printed JSON. Saving is atomic: the document is
//! written to a sibling temp file and renamed into place, so a failed persist
//! never leaves a truncated artifact at the destination path.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading or saving a deck document
#[derive(Debug, Error)]
pub enum DeckError {
    #[error("failed to read deck: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse deck JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A deck document: the template artifact and the output artifact share
/// this shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub slides: Vec<Slide>,
}

/// One slide; `section` tags the logical region the renderer binds tokens to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(default)]
    pub shapes: Vec<Shape>,
}

/// A visual shape; only text-bearing shapes participate in substitution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextFrame>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFrame {
    #[serde(default)]
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Bullet indentation level
    #[serde(default)]
    pub level: u8,
    #[serde(default)]
    pub runs: Vec<Run>,
}

/// An atomic styled text span
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
}

impl Run {
    /// An unstyled run
    pub fn plain(text: impl Into<String>) -> Self {
        Run {
            text: text.into(),
            font: None,
            size: None,
            color: None,
            bold: None,
        }
    }
}

impl Deck {
    /// Load a deck document from a file
    pub fn from_file(path: &Path) -> Result<Self, DeckError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse a deck document from a JSON string
    pub fn from_str(content: &str) -> Result<Self, DeckError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Serialize and write atomically: temp file next to the destination,
    /// then rename into place.
    pub fn save(&self, path: &Path) -> Result<(), DeckError> {
        let bytes = serde_json::to_vec_pretty(self)?;
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, &bytes)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Slides tagged with the given section name
    pub fn slides_in_section(&mut self, section: &str) -> Vec<&mut Slide> {
        self.slides
            .iter_mut()
            .filter(|slide| slide.section.as_deref() == Some(section))
            .collect()
    }

    /// Minimal synthesized deck for template-less runs: a title slide plus
    /// one content slide. Smoke output only; production runs should ship a
    /// real template.
    pub fn synthesized(week: &str, generated_at: &str) -> Self {
        Deck {
            title: Some("VLines Weekly Report".to_string()),
            slides: vec![
                Slide {
                    section: Some("title".to_string()),
                    shapes: vec![Shape {
                        name: Some("title".to_string()),
                        text: Some(TextFrame {
                            paragraphs: vec![
                                Paragraph {
                                    level: 0,
                                    runs: vec![Run::plain("VLines Weekly Report")],
                                },
                                Paragraph {
                                    level: 0,
                                    runs: vec![Run::plain(format!(
                                        "Week {week} — generated {generated_at}"
                                    ))],
                                },
                            ],
                        }),
                    }],
                },
                Slide {
                    section: None,
                    shapes: vec![Shape {
                        name: Some("body".to_string()),
                        text: Some(TextFrame {
                            paragraphs: vec![
                                Paragraph {
                                    level: 0,
                                    runs: vec![Run::plain("Report Summary")],
                                },
                                Paragraph {
                                    level: 1,
                                    runs: vec![Run::plain(
                                        "No template was found; create one for production use",
                                    )],
                                },
                            ],
                        }),
                    }],
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_run_deck() -> Deck {
        Deck {
            title: None,
            slides: vec![Slide {
                section: Some("financial_overview".to_string()),
                shapes: vec![Shape {
                    name: None,
                    text: Some(TextFrame {
                        paragraphs: vec![Paragraph {
                            level: 0,
                            runs: vec![Run {
                                text: "{{TOTAL_RECEIVABLES}}".to_string(),
                                font: Some("Calibri".to_string()),
                                size: Some(18.0),
                                color: None,
                                bold: Some(true),
                            }],
                        }],
                    }),
                }],
            }],
        }
    }

    #[test]
    fn test_roundtrip_preserves_styles() {
        let deck = one_run_deck();
        let json = serde_json::to_string(&deck).unwrap();
        let parsed = Deck::from_str(&json).unwrap();
        assert_eq!(parsed, deck);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.json");
        let deck = one_run_deck();
        deck.save(&path).unwrap();
        assert_eq!(Deck::from_file(&path).unwrap(), deck);
        // No temp file left behind
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_slides_in_section_filters() {
        let mut deck = one_run_deck();
        deck.slides.push(Slide {
            section: None,
            shapes: vec![],
        });
        assert_eq!(deck.slides_in_section("financial_overview").len(), 1);
        assert!(deck.slides_in_section("market_overview").is_empty());
    }

    #[test]
    fn test_synthesized_deck_has_title_and_content() {
        let deck = Deck::synthesized("2025-W33", "2025-08-13 09:00");
        assert_eq!(deck.slides.len(), 2);
        let title_runs: Vec<&str> = deck.slides[0].shapes[0]
            .text
            .as_ref()
            .unwrap()
            .paragraphs
            .iter()
            .flat_map(|p| p.runs.iter().map(|r| r.text.as_str()))
            .collect();
        assert!(title_runs.iter().any(|t| t.contains("2025-W33")));
    }

    #[test]
    fn test_malformed_deck_is_parse_error() {
        let result = Deck::from_str("{ this is not a deck");
        assert!(matches!(result, Err(DeckError::Parse(_))));
    }
}
