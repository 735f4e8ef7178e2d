//! Vertical card display for risk reports and model manifests.

use std::fmt::Write;

use chrono::Utc;
use jusdata_ai::{ArtifactManifest, RiskQuery, RiskReport};

const MAX_CLAIM_CHARS: usize = 120;
const MAX_DECISION_CHARS: usize = 240;

// ── Public API ──

pub fn print_report_card(query: &RiskQuery, report: &RiskReport, known_forum: bool) {
    print!("{}", render_report_card(query, report, known_forum));
}

pub fn print_manifest(manifest: &ArtifactManifest) {
    print!("{}", render_manifest(manifest));
}

pub fn print_forums(forums: &[String]) {
    for forum in forums {
        println!("{forum}");
    }
}

// ── Rendering ──

pub fn render_report_card(query: &RiskQuery, report: &RiskReport, known_forum: bool) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_report_card(&mut out, query, report, known_forum);
    out
}

fn write_report_card(
    out: &mut String,
    query: &RiskQuery,
    report: &RiskReport,
    known_forum: bool,
) -> std::fmt::Result {
    writeln!(out, "=== Risk Report ===")?;
    writeln!(out, "  {:<26} {}", "forum", query.forum)?;
    if !known_forum {
        writeln!(out, "  {:<26} not seen in training", "")?;
    }
    writeln!(out, "  {:<26} {}", "claim", truncate(&query.claim_text, MAX_CLAIM_CHARS))?;
    writeln!(out)?;

    writeln!(out, "Outcome Estimate")?;
    writeln!(out, "  {:<26} {}", "favorable probability", percent(report.probability))?;
    writeln!(out, "  {:<26} {}", "risk level", report.risk_level)?;
    writeln!(out)?;

    writeln!(out, "Similar Cases ({})", report.similar_cases.len())?;
    if report.similar_cases.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for (rank, case) in report.similar_cases.iter().enumerate() {
        writeln!(
            out,
            "  {}. [{}] similarity {:.3}  {}",
            rank + 1,
            case.outcome,
            case.similarity,
            case.forum
        )?;
        writeln!(out, "     {}", truncate(&case.claim_text, MAX_CLAIM_CHARS))?;
        if !case.decision_text.is_empty() {
            writeln!(out, "     {}", truncate(&case.decision_text, MAX_DECISION_CHARS))?;
        }
    }
    let favorable = report
        .similar_cases
        .iter()
        .filter(|c| c.outcome.is_favorable())
        .count();
    writeln!(
        out,
        "  {:<26} {} ({} of {})",
        "historical success rate",
        percent(report.historical_success_rate),
        favorable,
        report.similar_cases.len()
    )?;
    Ok(())
}

pub fn render_manifest(manifest: &ArtifactManifest) -> String {
    let mut out = String::new();
    let _ = write_manifest(&mut out, manifest);
    out
}

fn write_manifest(out: &mut String, m: &ArtifactManifest) -> std::fmt::Result {
    let age_days = (Utc::now() - m.trained_at).num_days();
    writeln!(out, "=== Model Manifest ===")?;
    writeln!(out, "  {:<26} {}", "format version", m.format_version)?;
    writeln!(
        out,
        "  {:<26} {} ({} days ago)",
        "trained at",
        m.trained_at.format("%Y-%m-%d %H:%M:%S UTC"),
        age_days
    )?;
    writeln!(out, "  {:<26} {}", "corpus fingerprint", m.corpus_fingerprint)?;
    writeln!(out)?;

    writeln!(out, "Corpus")?;
    writeln!(out, "  {:<26} {}", "rows", m.corpus_rows)?;
    writeln!(out, "  {:<26} {}", "favorable", m.outcome_counts.favorable)?;
    writeln!(out, "  {:<26} {}", "unfavorable", m.outcome_counts.unfavorable)?;
    writeln!(out, "  {:<26} {}", "base rate", percent(m.outcome_counts.favorable_rate()))?;
    writeln!(out, "  {:<26} {}", "forums", m.forums.len())?;
    writeln!(out)?;

    writeln!(out, "Models")?;
    writeln!(out, "  {:<26} {}", "outcome vocabulary", m.outcome_vocabulary)?;
    writeln!(out, "  {:<26} {}", "similarity vocabulary", m.similarity_vocabulary)?;
    writeln!(
        out,
        "  {:<26} {}{}",
        "optimizer iterations",
        m.fit.iterations,
        if m.fit.converged { "" } else { " (not converged)" }
    )?;
    writeln!(out, "  {:<26} {:.6}", "final loss", m.fit.final_loss)?;
    writeln!(out, "  {:<26} {}", "training accuracy", percent(m.training_accuracy))?;
    Ok(())
}

// ── Helpers ──

fn percent(p: f64) -> String {
    format!("{:.1}%", p * 100.0)
}

/// Shorten to at most `max` characters, marking the cut with an ellipsis.
fn truncate(text: &str, max: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
