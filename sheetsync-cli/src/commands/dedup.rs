//! Remove duplicate rows from the sheet.

use clap::Args;

use sheetsync_core::{DedupStrategy, FirstSeen, LatestByColumn};

use super::CommandError;
use crate::config::Config;
use crate::remote::open_sheet;

/// Delete extra rows that share a primary key
#[derive(Debug, Args)]
pub struct DedupCommand {
    /// Keep the row with the latest timestamp in this column instead of the first one
    #[arg(long, value_name = "COLUMN")]
    keep_latest: Option<String>,

    /// Print the deletes instead of sending them
    #[arg(long)]
    dry_run: bool,
}

impl DedupCommand {
    pub fn run(&self, config: &Config) -> Result<(), CommandError> {
        let sheet = open_sheet(config, self.dry_run)?;

        let strategy: Box<dyn DedupStrategy> = match &self.keep_latest {
            Some(column) => Box::new(LatestByColumn::new(column.clone())),
            None => Box::new(FirstSeen),
        };
        let cleaned = sheet.deduplicate_with(strategy.as_ref())?;

        if cleaned.is_empty() {
            println!("No duplicate rows found.");
        } else {
            for key in &cleaned {
                println!("  ✓ {}", key);
            }
            println!();
            println!("Deduplicated {} key(s).", cleaned.len());
        }
        Ok(())
    }
}
