//! Conversion between local payloads and row data.

use serde_json::{Map, Value};

use crate::clean::{ConvertedData, RowData};
use crate::error::{Result, SheetError};

/// A local record that can be synced into a sheet.
///
/// `convert` must produce a value for the sheet's primary key column.
/// Values are coerced to cell text before they are sent.
pub trait Convert {
    /// Converts the payload into column -> value data.
    fn convert(&self) -> Result<ConvertedData>;

    /// Writes remote data back onto the payload.
    ///
    /// Experimental: no correctness guarantee is made for this direction.
    /// The default implementation refuses.
    fn convert_back(&mut self, incoming: &RowData) -> Result<()> {
        let _ = incoming;
        Err(SheetError::ConvertBackUnsupported)
    }
}

fn cell_value(cell: &Option<String>) -> Value {
    match cell {
        Some(text) => Value::String(text.clone()),
        None => Value::Null,
    }
}

impl Convert for Map<String, Value> {
    fn convert(&self) -> Result<ConvertedData> {
        Ok(self.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }

    fn convert_back(&mut self, incoming: &RowData) -> Result<()> {
        for (k, v) in incoming {
            self.insert(k.clone(), cell_value(v));
        }
        Ok(())
    }
}

impl Convert for Value {
    fn convert(&self) -> Result<ConvertedData> {
        match self {
            Value::Object(map) => map.convert(),
            other => Err(SheetError::Conversion(format!(
                "expected a JSON object, got {}",
                kind(other)
            ))),
        }
    }

    fn convert_back(&mut self, incoming: &RowData) -> Result<()> {
        match self {
            Value::Object(map) => map.convert_back(incoming),
            other => Err(SheetError::Conversion(format!(
                "cannot write columns onto {}",
                kind(other)
            ))),
        }
    }
}

impl Convert for ConvertedData {
    fn convert(&self) -> Result<ConvertedData> {
        Ok(self.clone())
    }

    fn convert_back(&mut self, incoming: &RowData) -> Result<()> {
        for (k, v) in incoming {
            self.insert(k.clone(), cell_value(v));
        }
        Ok(())
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
