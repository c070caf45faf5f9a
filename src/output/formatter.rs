use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::race::RaceContext;
use crate::scoring::{
    Band, Column, ComparisonRow, CorrectedEntry, DetailInput, Highlight, Lane, RankedEntry,
};
use std::collections::BTreeMap;

const DEFAULT_RULE_WIDTH: usize = 40;
const MAX_RULE_WIDTH: usize = 60;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Width of the divider drawn between races, capped for wide terminals
fn rule_width() -> usize {
    terminal_size()
        .map(|(Width(w), _)| (w as usize).min(MAX_RULE_WIDTH))
        .unwrap_or(DEFAULT_RULE_WIDTH)
}

/// Medal for the top three, "N位" after that
pub fn rank_icon(rank: usize) -> String {
    match rank {
        1 => "🥇".to_string(),
        2 => "🥈".to_string(),
        3 => "🥉".to_string(),
        n => format!("{}位", n),
    }
}

/// Race header line: "2026-10-19　蒲郡 5R" under a divider
pub fn format_race_header(context: &RaceContext, use_colors: bool) -> String {
    let rule = "─".repeat(rule_width());
    if use_colors {
        format!("{}\n{}", rule.dimmed(), context.to_string().bold())
    } else {
        format!("{}\n{}", rule, context)
    }
}

/// Format a ranking as rank cards, one or two lines per boat.
///
/// Cards in the top-pick band are gold, recommended ones pink. When
/// `details` is given, the boat's stats follow on a second line.
pub fn format_rank_cards(
    title: &str,
    ranked: &[RankedEntry],
    details: Option<&BTreeMap<Lane, DetailInput>>,
    use_colors: bool,
) -> String {
    let mut lines = Vec::with_capacity(ranked.len() * 2 + 1);
    lines.push(if use_colors {
        title.bold().to_string()
    } else {
        title.to_string()
    });

    for (i, entry) in ranked.iter().enumerate() {
        let band = entry.band();
        let head = format!(
            "{} {}号艇  おすすめ度：{:.0}％",
            rank_icon(i + 1),
            entry.lane,
            entry.percent
        );
        let badge = band.badge();

        let line = if use_colors {
            let head = match band {
                Band::TopPick => head.yellow().bold().to_string(),
                Band::Recommended => head.magenta().to_string(),
                Band::None => head,
            };
            if badge.is_empty() {
                format!("  {}", head)
            } else {
                format!("  {}  {}", head, badge.bright_magenta())
            }
        } else if badge.is_empty() {
            format!("  {}", head)
        } else {
            format!("  {}  {}", head, badge)
        };
        lines.push(line);

        if let Some(stats) = details.and_then(|d| d.get(&entry.lane)) {
            let detail_line = format!(
                "      モーター {}｜当地 {}｜ST {}｜展示 {}",
                stats.motor, stats.local, stats.start, stats.expo
            );
            lines.push(if use_colors {
                detail_line.dimmed().to_string()
            } else {
                detail_line
            });
        }
    }

    lines.join("\n")
}

/// Format the corrected-time ranking, fastest first
pub fn format_corrected(ranked: &[CorrectedEntry], bias: f64, use_colors: bool) -> String {
    let title = format!("補正タイム順位 (bias {:+.4})", bias);
    let mut lines = vec![if use_colors {
        title.bold().to_string()
    } else {
        title
    }];

    for (i, entry) in ranked.iter().enumerate() {
        let rank = format!("{:>2}.", i + 1);
        lines.push(if use_colors {
            format!("  {} {}号艇  {:.3}", rank.dimmed(), entry.lane, entry.time)
        } else {
            format!("  {} {}号艇  {:.3}", rank, entry.lane, entry.time)
        });
    }

    lines.join("\n")
}

/// Format one table cell, marking the best value with `*` and the runner-up
/// with `+` when colors are off
fn format_cell(value: f64, highlight: Option<Highlight>, width: usize, use_colors: bool) -> String {
    let text = format!("{:.2}", value);
    if use_colors {
        let padded = format!("{:>width$}", text, width = width);
        match highlight {
            Some(Highlight::First) => padded.on_red().white().bold().to_string(),
            Some(Highlight::Second) => padded.on_yellow().black().to_string(),
            None => padded,
        }
    } else {
        let marker = match highlight {
            Some(Highlight::First) => "*",
            Some(Highlight::Second) => "+",
            None => " ",
        };
        format!("{:>width$}{}", text, marker, width = width - 1)
    }
}

/// Format the exhibition comparison table in lane order
pub fn format_comparison_table(rows: &[ComparisonRow], use_colors: bool) -> String {
    if rows.is_empty() {
        return "No exhibition data.".to_string();
    }

    let width: usize = 8;
    let mut header = "艇 ".to_string();
    for column in Column::ALL {
        // CJK titles are two cells wide per char
        let pad = width.saturating_sub(column.title().chars().count() * 2);
        header.push_str(&" ".repeat(pad));
        header.push_str(column.title());
    }

    let mut lines = vec![if use_colors {
        header.bold().to_string()
    } else {
        header
    }];

    for row in rows {
        let mut line = format!("{:>2} ", row.lane);
        for column in Column::ALL {
            line.push_str(&format_cell(
                row.value(column),
                row.highlight(column),
                width,
                use_colors,
            ));
        }
        lines.push(line);
    }

    lines.join("\n")
}

/// Format a ranking as tab-separated values for scripting
/// Columns: board, rank, lane, score, percent, band (no headers, no colors)
pub fn format_tsv(board: &str, ranked: &[RankedEntry]) -> String {
    ranked
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            format!(
                "{}\t{}\t{}\t{:.4}\t{:.1}\t{}",
                board,
                i + 1,
                entry.lane,
                entry.score,
                entry.percent,
                entry.band().label()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Corrected times as tab-separated values: "corrected", rank, lane, time
pub fn format_corrected_tsv(ranked: &[CorrectedEntry]) -> String {
    ranked
        .iter()
        .enumerate()
        .map(|(i, entry)| format!("corrected\t{}\t{}\t{:.4}", i + 1, entry.lane, entry.time))
        .collect::<Vec<_>>()
        .join("\n")
}
