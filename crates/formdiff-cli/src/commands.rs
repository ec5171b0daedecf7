use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use formdiff_classify::{Classifier, FieldSummary, PropertyEntry, Report};
use formdiff_server::{FormdiffServer, ServerConfig};
use serde_json::Value;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Compare(args) => cmd_compare(args, &cli.format),
        Command::Serve(args) => cmd_serve(args),
    }
}

fn cmd_compare(args: CompareArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let report = compare_files(&args.original, &args.modified)?;
    tracing::debug!(
        entries = report.entry_count(),
        "compared {} with {}",
        args.original.display(),
        args.modified.display()
    );
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print!("{}", render_text(&report)),
    }
    Ok(())
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = &args.bind {
        config.bind_addr = bind.parse().with_context(|| format!("invalid bind address {bind}"))?;
    }

    println!("formdiff server on {}", config.bind_addr.to_string().bold());
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(FormdiffServer::new(config).serve())?;
    Ok(())
}

fn load_document(path: &Path) -> anyhow::Result<Value> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

pub fn compare_files(original: &Path, modified: &Path) -> anyhow::Result<Report> {
    let original = load_document(original)?;
    let modified = load_document(modified)?;
    Ok(Classifier::new().classify_values(original, modified)?)
}

fn field_label(summary: &FieldSummary) -> String {
    format!(
        "field {} {} ({})",
        summary.index,
        summary.name.as_deref().unwrap_or("<unnamed>"),
        summary.field_type.as_deref().unwrap_or("?")
    )
}

fn render_entries(out: &mut String, indent: &str, verb: &str, entries: Option<&[PropertyEntry]>) {
    for entry in entries.unwrap_or_default() {
        let _ = match (&entry.old_value, &entry.new_value, &entry.value) {
            (Some(old), Some(new), _) => writeln!(
                out,
                "{indent}{} {}: {} -> {}",
                verb.yellow(),
                entry.property_name,
                old,
                new
            ),
            (_, _, Some(value)) => writeln!(out, "{indent}{} {} = {}", verb.yellow(), entry.property_name, value),
            _ => writeln!(out, "{indent}{} {}", verb.yellow(), entry.property_name),
        };
    }
}

fn render_properties(out: &mut String, indent: &str, changes: &formdiff_classify::PropertyChanges) {
    use formdiff_classify::PropertyBucket as B;
    render_entries(out, indent, "added", changes.bucket(B::Added));
    render_entries(out, indent, "removed", changes.bucket(B::Removed));
    render_entries(out, indent, "changed", changes.bucket(B::Changed));
    render_entries(out, indent, "added element", changes.bucket(B::IterableAdded));
    render_entries(out, indent, "removed element", changes.bucket(B::IterableRemoved));
}

/// Human-readable rendering of a report.
pub fn render_text(report: &Report) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Change distance: {}", format!("{:.2}%", report.change_distance).bold());

    if report.is_unchanged() {
        let _ = writeln!(out, "{}", "No changes.".green());
        return out;
    }

    for summary in &report.added_fields {
        let _ = writeln!(out, "{} {}", "+".green().bold(), field_label(summary));
    }
    for summary in &report.removed_fields {
        let _ = writeln!(out, "{} {}", "-".red().bold(), field_label(summary));
    }

    for entry in report.field_changes.values() {
        let _ = writeln!(out, "{} {}", "~".yellow().bold(), field_label(&entry.summary));
        render_properties(&mut out, "    ", &entry.properties);
        for rule in entry.added_rules.iter().flatten() {
            let _ = writeln!(out, "    {} rule {} {}", "+".green(), rule.rule_index, rule.rule);
        }
        for rule in entry.removed_rules.iter().flatten() {
            let _ = writeln!(out, "    {} rule {} {}", "-".red(), rule.rule_index, rule.rule);
        }
        for rule in entry.changed_rules.iter().flat_map(|rules| rules.values()) {
            let _ = writeln!(
                out,
                "    rule {} ({})",
                rule.rule_index,
                rule.rule_type.as_deref().unwrap_or("?").cyan()
            );
            render_entries(&mut out, "        ", "added", Some(&rule.added_properties));
            render_entries(&mut out, "        ", "removed", Some(&rule.removed_properties));
            render_entries(&mut out, "        ", "changed", Some(&rule.changed_properties));
        }
    }

    if !report.form_changes.is_empty() {
        let _ = writeln!(out, "{} form", "~".yellow().bold());
        render_properties(&mut out, "    ", &report.form_changes);
    }
    out
}
