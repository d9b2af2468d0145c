//! Push local records into the sheet.

use clap::Args;
use serde_json::Value;
use std::path::PathBuf;

use sheetsync_core::{RowStore, SaveOutcome, Sheet, SheetError};

use super::CommandError;
use crate::config::Config;
use crate::records::{label, load_records, parse_assignments, stamp};
use crate::remote::open_sheet;

/// Create or update a row for every record in a file
#[derive(Debug, Args)]
pub struct PushCommand {
    /// JSON or YAML file holding a list of records
    file: PathBuf,

    /// Reload the remote feed before writing a row that looks out of sync
    #[arg(long)]
    refresh: bool,

    /// Reuse the remote feed across records instead of relisting each time
    #[arg(long)]
    cache_feed: bool,

    /// Extra column to set on every record
    #[arg(long = "set", value_name = "KEY=VALUE")]
    sets: Vec<String>,

    /// Print the writes instead of sending them
    #[arg(long)]
    dry_run: bool,
}

/// Tally of a push run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PushSummary {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub failed: usize,
}

impl PushSummary {
    fn record(&mut self, outcome: SaveOutcome) {
        match outcome {
            SaveOutcome::Created => self.created += 1,
            SaveOutcome::Updated => self.updated += 1,
            SaveOutcome::Unchanged => self.unchanged += 1,
        }
    }
}

impl std::fmt::Display for PushSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} created, {} updated, {} unchanged, {} failed",
            self.created, self.updated, self.unchanged, self.failed
        )
    }
}

impl PushCommand {
    pub fn run(&self, config: &Config) -> Result<(), CommandError> {
        let mut config = config.clone();
        if self.cache_feed {
            config.enable_cache_feed();
        }

        let assignments = parse_assignments(&self.sets)?;
        let mut records = load_records(&self.file)?;
        for record in &mut records {
            stamp(record, &assignments);
        }

        let sheet = open_sheet(&config, self.dry_run)?;
        let primary_key = config.primary_key.value.as_str();

        println!("Pushing {} record(s)...", records.len());
        let summary = push_all(&sheet, &records, self.refresh, |record, result| match result {
            Ok(SaveOutcome::Unchanged) => {}
            Ok(outcome) => println!("  ✓ {} {}", label(record, primary_key), outcome_name(*outcome)),
            Err(e) => println!("  ✗ {} - {}", label(record, primary_key), e),
        });

        println!();
        println!("{}", summary);

        if summary.failed > 0 {
            return Err(CommandError::Failed(summary.failed));
        }
        Ok(())
    }
}

fn outcome_name(outcome: SaveOutcome) -> &'static str {
    match outcome {
        SaveOutcome::Created => "created",
        SaveOutcome::Updated => "updated",
        SaveOutcome::Unchanged => "unchanged",
    }
}

/// Saves every record, reporting each result to `report`.
///
/// A failure on one record does not stop the run.
pub fn push_all<S, F>(sheet: &Sheet<S>, records: &[Value], refresh: bool, mut report: F) -> PushSummary
where
    S: RowStore,
    F: FnMut(&Value, &Result<SaveOutcome, SheetError>),
{
    let mut summary = PushSummary::default();
    for record in records {
        let result = push_record(sheet, record, refresh);
        report(record, &result);
        match result {
            Ok(outcome) => summary.record(outcome),
            Err(_) => summary.failed += 1,
        }
    }
    summary
}

/// Saves one record. Duplicate remote rows are cleaned up and the record
/// retried once.
pub fn push_record<S: RowStore>(
    sheet: &Sheet<S>,
    record: &Value,
    refresh: bool,
) -> Result<SaveOutcome, SheetError> {
    let mut row = match sheet.get(record) {
        Ok(row) => row,
        Err(e) if e.is_duplicate() => {
            tracing::warn!("{}; deduplicating", e);
            let cleaned = sheet.deduplicate()?;
            tracing::info!("Deduplicated {} key(s)", cleaned.len());
            sheet.get(record)?
        }
        Err(e) => return Err(e),
    };
    row.save(refresh)
}
