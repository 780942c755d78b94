// Colored terminal output for topic score tables.
//
// This module handles all terminal-specific formatting: colors, bars,
// per-sample summaries. The main.rs display calls delegate here.

use std::collections::HashMap;

use colored::Colorize;

use crate::topics::Topic;

/// Display a full score table for one sentence, ranked highest first.
///
/// Scores are cosine similarities in [-1, 1]; the bar maps the positive
/// range so the relative ordering is scannable at a glance.
pub fn display_scores(sentence: &str, scores: &HashMap<Topic, f64>) {
    println!(
        "\n{}",
        format!("=== Topic scores for \"{}\" ===", super::truncate_chars(sentence, 60)).bold()
    );
    println!();

    let mut ranked: Vec<(&Topic, &f64)> = scores.iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(a.1));

    let bar_width: usize = 20;

    for (i, (topic, &score)) in ranked.iter().enumerate() {
        let filled = (score.clamp(0.0, 1.0) * bar_width as f64).round() as usize;
        let empty = bar_width.saturating_sub(filled);
        let bar = format!("[{}{}]", "=".repeat(filled), " ".repeat(empty));

        // Color the bar based on similarity
        let colored_bar = if score >= 0.35 {
            bar.bright_green()
        } else if score >= 0.20 {
            bar.bright_yellow()
        } else {
            bar.bright_blue()
        };

        println!(
            "  {:>2}. {:<15} {} {:+.4}",
            i + 1,
            topic.name().bold(),
            colored_bar,
            score
        );
    }

    println!();
}

/// Display one line per scored sample: its top topics and a text preview.
pub fn display_batch_line(index: usize, text: &str, scores: &HashMap<Topic, f64>, top: usize) {
    let mut ranked: Vec<(&Topic, &f64)> = scores.iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(a.1));

    let top_str = ranked
        .iter()
        .take(top)
        .map(|(topic, score)| format!("{} {:.3}", topic.name(), score))
        .collect::<Vec<_>>()
        .join(", ");

    println!(
        "  {:>3}. {}",
        index + 1,
        super::truncate_chars(text, 72).dimmed()
    );
    println!("       {}", top_str);
}

/// Display the fixed topic vocabulary and the prompt each topic embeds.
pub fn display_topics() {
    println!("\n{}", "=== Topic vocabulary ===".bold());
    println!();
    for (i, topic) in Topic::ALL.iter().enumerate() {
        println!(
            "  {:>2}. {:<15} {}",
            i + 1,
            topic.name().bold(),
            format!("\"{}\"", topic.prompt()).dimmed()
        );
    }
    println!();
}
