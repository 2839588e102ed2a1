//! End-to-end pipeline test: absent data source, real template, full render

use std::path::Path;

use chrono::Local;
use pretty_assertions::assert_eq;

use weekly_reporter::deck::{Deck, Paragraph, Run, Shape, Slide, TextFrame};
use weekly_reporter::{generate_report, Config, SourceResolver};

fn styled_run(text: &str, font: &str, size: f64) -> Run {
    Run {
        text: text.to_string(),
        font: Some(font.to_string()),
        size: Some(size),
        color: None,
        bold: Some(true),
    }
}

fn financial_template() -> Deck {
    Deck {
        title: Some("Weekly Report Template".to_string()),
        slides: vec![Slide {
            section: Some("financial_overview".to_string()),
            shapes: vec![Shape {
                name: Some("receivables".to_string()),
                text: Some(TextFrame {
                    paragraphs: vec![Paragraph {
                        level: 0,
                        runs: vec![
                            styled_run("Tổng phải thu: ", "Calibri", 18.0),
                            styled_run("{{TOTAL_RECEIVABLES}}", "Calibri", 18.0),
                        ],
                    }],
                }),
            }],
        }],
    }
}

fn test_config(root: &Path) -> Config {
    let mut config = Config::default();
    // sample.json deliberately does not exist: the resolver must degrade
    config.data_source.source_type = "json".to_string();
    config.data_source.json_path = root.join("sample.json");
    config.template.path = root.join("template.json");
    config.output.directory = root.join("reports");
    config
}

#[test]
fn absent_source_renders_sample_figures_from_template() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    financial_template().save(&config.template.path).unwrap();

    // The configured source degrades to the built-in sample
    let snapshot = SourceResolver::from_config(&config.data_source).resolve();
    assert!(snapshot.provenance().degraded);

    let path = generate_report(&config).unwrap();

    let today = Local::now().format("%Y-%m-%d").to_string();
    assert_eq!(
        path.file_name().unwrap().to_string_lossy(),
        format!("VLines_Weekly_Report_{today}.pptx")
    );

    let rendered = Deck::from_file(&path).unwrap();
    let runs = &rendered.slides[0].shapes[0].text.as_ref().unwrap().paragraphs[0].runs;
    // Token replaced with the sample figure, thousands-separated
    assert_eq!(runs[1].text, "112,282,563");
    // Formatting attributes preserved on every run
    for (rendered_run, template_run) in runs.iter().zip(
        financial_template().slides[0].shapes[0]
            .text
            .as_ref()
            .unwrap()
            .paragraphs[0]
            .runs
            .iter(),
    ) {
        assert_eq!(rendered_run.font, template_run.font);
        assert_eq!(rendered_run.size, template_run.size);
        assert_eq!(rendered_run.bold, template_run.bold);
    }
    // The token-free run is byte-identical to the template's
    assert_eq!(runs[0], financial_template().slides[0].shapes[0].text.as_ref().unwrap().paragraphs[0].runs[0]);
}

#[test]
fn snapshot_missing_optional_fields_still_renders() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    financial_template().save(&config.template.path).unwrap();

    // A source file that exists but carries none of the bound fields
    std::fs::write(&config.data_source.json_path, r#"{"metadata": {"week": "2025-W33"}}"#)
        .unwrap();

    let path = generate_report(&config).unwrap();
    let rendered = Deck::from_file(&path).unwrap();
    let runs = &rendered.slides[0].shapes[0].text.as_ref().unwrap().paragraphs[0].runs;
    // Missing field degrades to the format's safe default, never an error
    assert_eq!(runs[1].text, "0");
}

#[test]
fn week_placeholder_in_pattern_is_filled() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path());
    config.output.filename_pattern = "report_{week}.pptx".to_string();
    financial_template().save(&config.template.path).unwrap();

    let snapshot = SourceResolver::from_config(&config.data_source).resolve();
    let path = generate_report(&config).unwrap();
    assert_eq!(
        path.file_name().unwrap().to_string_lossy(),
        format!("report_{}.pptx", snapshot.week())
    );
}
