//! Day MCP Tools
//!
//! Day summaries and log impact previews over entries supplied by the caller.

use chrono::{Local, NaiveDate, TimeZone};
use serde::Serialize;

use crate::models::{parse_day, DailyTargets, FormattedLogEntry, LogEntry, NutritionTotals};
use crate::nutrition::{calculate_day_nutrition_in, format_log_entry, preview_log_impact_in, ImpactPreview, UnitWarning};

use super::{check_quantity, parse_payload};

fn parse_date(date: &str) -> Result<NaiveDate, String> {
    parse_day(date).ok_or_else(|| format!("Invalid date '{}': expected YYYY-MM-DD", date))
}

fn format_entries(entries: Vec<serde_json::Value>) -> Result<Vec<FormattedLogEntry>, String> {
    entries
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            let entry: LogEntry = parse_payload(&format!("entry {}", i), value)?;
            check_quantity(entry.quantity)?;
            Ok(format_log_entry(&entry))
        })
        .collect()
}

/// Response for summarize_day
#[derive(Debug, Serialize)]
pub struct DaySummary {
    pub date: String,
    /// Entries that fall on the date
    pub entries: Vec<FormattedLogEntry>,
    /// Supplied entries that belong to another day or to none
    pub skipped_entries: usize,
    pub totals: NutritionTotals,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unit_warnings: Vec<UnitWarning>,
}

pub fn summarize_day(date: &str, entries: Vec<serde_json::Value>) -> Result<DaySummary, String> {
    summarize_day_in(date, entries, &Local)
}

fn summarize_day_in<Tz: TimeZone>(
    date: &str,
    entries: Vec<serde_json::Value>,
    tz: &Tz,
) -> Result<DaySummary, String> {
    let day = parse_date(date)?;
    let formatted = format_entries(entries)?;
    let totals = calculate_day_nutrition_in(&formatted, day, tz);

    let total_count = formatted.len();
    let on_day: Vec<FormattedLogEntry> = formatted
        .into_iter()
        .filter(|entry| entry.calendar_day_in(tz) == Some(day))
        .collect();
    let unit_warnings = on_day
        .iter()
        .filter_map(|entry| entry.unit_warning.clone())
        .collect();

    Ok(DaySummary {
        date: day.to_string(),
        skipped_entries: total_count - on_day.len(),
        entries: on_day,
        totals,
        unit_warnings,
    })
}

/// Response for preview_log_impact
#[derive(Debug, Serialize)]
pub struct PreviewLogImpactResponse {
    /// "request" when targets came with the call, otherwise "config"
    pub targets_source: &'static str,
    #[serde(flatten)]
    pub preview: ImpactPreview,
}

pub fn preview_log_impact(
    date: &str,
    entries: Vec<serde_json::Value>,
    pending: serde_json::Value,
    targets: Option<serde_json::Value>,
    default_targets: &DailyTargets,
) -> Result<PreviewLogImpactResponse, String> {
    preview_log_impact_with(date, entries, pending, targets, default_targets, &Local)
}

fn preview_log_impact_with<Tz: TimeZone>(
    date: &str,
    entries: Vec<serde_json::Value>,
    pending: serde_json::Value,
    targets: Option<serde_json::Value>,
    default_targets: &DailyTargets,
    tz: &Tz,
) -> Result<PreviewLogImpactResponse, String> {
    let day = parse_date(date)?;
    let formatted = format_entries(entries)?;
    let pending: LogEntry = parse_payload("pending entry", pending)?;
    check_quantity(pending.quantity)?;

    let (targets, targets_source) = match targets.filter(|t| !t.is_null()) {
        Some(value) => (parse_payload::<DailyTargets>("targets", value)?, "request"),
        None => (default_targets.clone(), "config"),
    };

    let preview = preview_log_impact_in(&formatted, day, &pending, &targets, tz);
    Ok(PreviewLogImpactResponse {
        targets_source,
        preview,
    })
}
