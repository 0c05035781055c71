//! Stats command: aggregate counts rendered as terminal bar charts.

use crate::cli::StatsDimension;
use crate::config::open_storage;
use crate::error::Result;
use crate::storage::CatalogCounts;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

/// Widest bar, in cells.
const BAR_WIDTH: usize = 40;

#[derive(Serialize)]
struct StatsOutput {
    problems: usize,
    solutions: usize,
    implementations: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    by_difficulty: Option<Vec<Bar>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    by_tag: Option<Vec<Bar>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    by_language: Option<Vec<Bar>>,
}

#[derive(Serialize, Debug, PartialEq, Eq)]
struct Bar {
    label: String,
    count: usize,
}

/// Execute the stats command.
///
/// # Errors
///
/// Returns an error if the counts cannot be queried.
pub fn execute(by: StatsDimension, top: usize, db_path: Option<&Path>, json: bool) -> Result<()> {
    let storage = open_storage(db_path)?;
    let counts = storage.counts()?;
    let output = build_output(&counts, by, top);

    if json {
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("{}", "━━━ Catalogue ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".magenta().bold());
    println!(
        "  {} problems, {} solutions, {} implementations",
        output.problems.to_string().bold(),
        output.solutions.to_string().bold(),
        output.implementations.to_string().bold()
    );

    if let Some(bars) = &output.by_difficulty {
        print_chart("By difficulty", bars);
    }
    if let Some(bars) = &output.by_tag {
        print_chart("By tag", bars);
    }
    if let Some(bars) = &output.by_language {
        print_chart("By language", bars);
    }

    Ok(())
}

fn build_output(counts: &CatalogCounts, by: StatsDimension, top: usize) -> StatsOutput {
    let wants = |dim: StatsDimension| by == StatsDimension::All || by == dim;

    StatsOutput {
        problems: counts.problems,
        solutions: counts.solutions,
        implementations: counts.implementations,
        by_difficulty: wants(StatsDimension::Difficulty).then(|| {
            counts
                .by_difficulty
                .iter()
                .map(|(d, count)| Bar {
                    label: d.label().to_string(),
                    count: *count,
                })
                .collect()
        }),
        by_tag: wants(StatsDimension::Tag).then(|| top_bars(&counts.by_tag, top)),
        by_language: wants(StatsDimension::Language).then(|| top_bars(&counts.by_language, top)),
    }
}

fn top_bars(pairs: &[(String, usize)], top: usize) -> Vec<Bar> {
    pairs
        .iter()
        .take(top)
        .map(|(label, count)| Bar {
            label: if label.is_empty() {
                "-".to_string()
            } else {
                label.clone()
            },
            count: *count,
        })
        .collect()
}

fn print_chart(title: &str, bars: &[Bar]) {
    println!();
    println!("{}", title.cyan().bold());

    if bars.is_empty() {
        println!("  {}", "(none)".dimmed());
        return;
    }

    let label_width = bars.iter().map(|b| b.label.chars().count()).max().unwrap_or(0);
    let max = bars.iter().map(|b| b.count).max().unwrap_or(0);

    for bar in bars {
        let cells = bar_cells(bar.count, max);
        println!(
            "  {:<label_width$}  {} {}",
            bar.label,
            "█".repeat(cells).green(),
            bar.count.to_string().dimmed()
        );
    }
}

/// Scale a count to a bar length; any non-zero count gets at least one cell.
fn bar_cells(count: usize, max: usize) -> usize {
    if count == 0 || max == 0 {
        return 0;
    }
    (count * BAR_WIDTH / max).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Difficulty;

    fn sample_counts() -> CatalogCounts {
        CatalogCounts {
            problems: 3,
            solutions: 4,
            implementations: 5,
            by_difficulty: vec![
                (Difficulty::Unset, 0),
                (Difficulty::Easy, 2),
                (Difficulty::Medium, 1),
                (Difficulty::Hard, 0),
            ],
            by_tag: vec![
                ("array".to_string(), 3),
                ("dp".to_string(), 2),
                ("graph".to_string(), 1),
            ],
            by_language: vec![("Rust".to_string(), 3), (String::new(), 1)],
        }
    }

    #[test]
    fn test_bar_cells_scale() {
        assert_eq!(bar_cells(0, 10), 0);
        assert_eq!(bar_cells(10, 10), BAR_WIDTH);
        assert_eq!(bar_cells(5, 10), BAR_WIDTH / 2);
        assert_eq!(bar_cells(1, 1000), 1);
    }

    #[test]
    fn test_single_dimension() {
        let output = build_output(&sample_counts(), StatsDimension::Tag, 2);
        assert!(output.by_difficulty.is_none());
        assert!(output.by_language.is_none());

        let tags = output.by_tag.unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0], Bar { label: "array".to_string(), count: 3 });
    }

    #[test]
    fn test_all_dimensions_label_blank_language() {
        let output = build_output(&sample_counts(), StatsDimension::All, 10);
        assert_eq!(output.by_difficulty.unwrap().len(), 4);
        let languages = output.by_language.unwrap();
        assert_eq!(languages[1].label, "-");
    }
}
