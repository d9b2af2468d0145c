//! Remote row stores.
//!
//! A [`RowStore`] is the transport the sheet reconciles against. It knows
//! how to list, insert, update and delete rows of one worksheet and
//! nothing about primary keys beyond reporting each row's title.
//!
//! Two stores ship with the crate:
//! - [`MemoryStore`]: in-process rows with write counters
//! - [`SheetsApiStore`]: Google Sheets v4 REST API over blocking HTTP

mod memory;
mod sheets_api;

use thiserror::Error;

use crate::clean::RowData;

pub use memory::MemoryStore;
pub use sheets_api::{SheetsApiStore, DEFAULT_API_BASE_URL};

/// Identifies the worksheet a sheet syncs into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worksheet {
    /// Spreadsheet identifier
    pub spreadsheet: String,
    /// Worksheet (tab) name within the spreadsheet
    pub worksheet: String,
    /// Column whose value is reported as each row's title
    pub key_column: String,
}

impl Worksheet {
    pub fn new(
        spreadsheet: impl Into<String>,
        worksheet: impl Into<String>,
        key_column: impl Into<String>,
    ) -> Self {
        Self {
            spreadsheet: spreadsheet.into(),
            worksheet: worksheet.into(),
            key_column: key_column.into(),
        }
    }
}

impl std::fmt::Display for Worksheet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.spreadsheet, self.worksheet)
    }
}

/// Handle to one row in the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRow {
    /// Store-assigned locator (a sheet row number for the Sheets API)
    pub id: String,
    /// Primary key text of the row
    pub title: String,
    /// Column name -> current remote text (`None` for a blank cell)
    pub custom: RowData,
}

/// Errors reported by a remote store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote store returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to decode remote response: {0}")]
    Decode(String),

    /// The row handle no longer refers to a row in the store.
    #[error("Unknown remote row: {0}")]
    Unknown(String),

    /// The worksheet's header row has no column for the primary key.
    #[error("Worksheet {worksheet} has no '{column}' column")]
    MissingColumn { worksheet: String, column: String },

    #[error("Store not configured: {0}")]
    NotConfigured(String),
}

/// Transport for one remote spreadsheet service.
///
/// Every call is a blocking round trip. Implementations keep whatever
/// session state they need behind `&self`.
pub trait RowStore {
    /// Lists every row of the worksheet, in sheet order.
    fn list_rows(&self, target: &Worksheet) -> Result<Vec<RemoteRow>, StoreError>;

    /// Appends a row and returns its handle.
    fn insert_row(&self, target: &Worksheet, data: &RowData) -> Result<RemoteRow, StoreError>;

    /// Replaces the contents of `row` and returns the updated handle.
    fn update_row(
        &self,
        target: &Worksheet,
        row: &RemoteRow,
        data: &RowData,
    ) -> Result<RemoteRow, StoreError>;

    /// Removes `row` from the worksheet.
    fn delete_row(&self, target: &Worksheet, row: &RemoteRow) -> Result<(), StoreError>;
}

impl<S: RowStore + ?Sized> RowStore for &S {
    fn list_rows(&self, target: &Worksheet) -> Result<Vec<RemoteRow>, StoreError> {
        (**self).list_rows(target)
    }

    fn insert_row(&self, target: &Worksheet, data: &RowData) -> Result<RemoteRow, StoreError> {
        (**self).insert_row(target, data)
    }

    fn update_row(
        &self,
        target: &Worksheet,
        row: &RemoteRow,
        data: &RowData,
    ) -> Result<RemoteRow, StoreError> {
        (**self).update_row(target, row, data)
    }

    fn delete_row(&self, target: &Worksheet, row: &RemoteRow) -> Result<(), StoreError> {
        (**self).delete_row(target, row)
    }
}

impl<S: RowStore + ?Sized> RowStore for Box<S> {
    fn list_rows(&self, target: &Worksheet) -> Result<Vec<RemoteRow>, StoreError> {
        (**self).list_rows(target)
    }

    fn insert_row(&self, target: &Worksheet, data: &RowData) -> Result<RemoteRow, StoreError> {
        (**self).insert_row(target, data)
    }

    fn update_row(
        &self,
        target: &Worksheet,
        row: &RemoteRow,
        data: &RowData,
    ) -> Result<RemoteRow, StoreError> {
        (**self).update_row(target, row, data)
    }

    fn delete_row(&self, target: &Worksheet, row: &RemoteRow) -> Result<(), StoreError> {
        (**self).delete_row(target, row)
    }
}
