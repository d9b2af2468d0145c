//! sheetsync core library
//!
//! Reconciles local records with rows of a remote spreadsheet, matched by a
//! primary key column. A [`Sheet`] caches the remote rows and decides
//! between create, update and no-op; a [`Row`] pairs one converted payload
//! with its remote counterpart and computes the merge.

pub mod clean;
pub mod convert;
pub mod dedup;
pub mod error;
pub mod row;
pub mod sheet;
pub mod store;

pub use clean::{clean, ConvertedData, IntoCell, RowData};
pub use convert::Convert;
pub use dedup::{DedupStrategy, FirstSeen, LatestByColumn};
pub use error::{Result, SheetError};
pub use row::{DeleteOutcome, Row, SaveOutcome};
pub use sheet::{DeleteTarget, FeedCache, Sheet, SheetConfig, DEFAULT_PRIMARY_KEY};
pub use store::{
    MemoryStore, RemoteRow, RowStore, SheetsApiStore, StoreError, Worksheet,
    DEFAULT_API_BASE_URL,
};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
