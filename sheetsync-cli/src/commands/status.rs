//! Report which records differ from the sheet.

use clap::Args;
use serde_json::Value;
use std::path::PathBuf;

use sheetsync_core::{RowStore, Sheet, SheetError};

use super::CommandError;
use crate::config::Config;
use crate::records::{label, load_records};
use crate::remote::open_sheet;

/// Show which records are missing from or out of sync with the sheet
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// JSON or YAML file holding a list of records
    file: PathBuf,
}

/// Where a record stands relative to the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStatus {
    InSync,
    OutOfSync,
    Missing,
    Duplicated,
}

impl RecordStatus {
    fn as_str(self) -> &'static str {
        match self {
            RecordStatus::InSync => "in sync",
            RecordStatus::OutOfSync => "out of sync",
            RecordStatus::Missing => "missing",
            RecordStatus::Duplicated => "duplicated",
        }
    }
}

impl StatusCommand {
    pub fn run(&self, config: &Config) -> Result<(), CommandError> {
        // Read-only, so one listing serves every record
        let mut config = config.clone();
        config.enable_cache_feed();

        let records = load_records(&self.file)?;
        let sheet = open_sheet(&config, false)?;
        let primary_key = config.primary_key.value.as_str();

        let mut in_sync = 0;
        let mut pending = 0;
        for record in &records {
            let status = classify(&sheet, record)?;
            if status == RecordStatus::InSync {
                in_sync += 1;
            } else {
                pending += 1;
                println!("  {:<12} {}", status.as_str(), label(record, primary_key));
            }
        }

        if pending > 0 {
            println!();
        }
        println!("{} in sync, {} need pushing", in_sync, pending);
        Ok(())
    }
}

/// Classifies one record against the sheet.
pub fn classify<S: RowStore>(sheet: &Sheet<S>, record: &Value) -> Result<RecordStatus, SheetError> {
    let row = match sheet.get(record) {
        Ok(row) => row,
        Err(e) if e.is_duplicate() => return Ok(RecordStatus::Duplicated),
        Err(e) => return Err(e),
    };

    Ok(if !row.exists() {
        RecordStatus::Missing
    } else if row.out_of_sync() {
        RecordStatus::OutOfSync
    } else {
        RecordStatus::InSync
    })
}
