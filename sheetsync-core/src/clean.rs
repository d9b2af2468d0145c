//! Cell cleaning shared by outgoing and incoming row data.
//!
//! Every key is coerced to a string, every non-null value to its string
//! form. Null values survive as `None`, which stands for an intentionally
//! blank cell.

use std::collections::BTreeMap;

use serde_json::Value;

/// Cleaned row data: column name -> cell text (`None` = blank cell).
pub type RowData = BTreeMap<String, Option<String>>;

/// Data produced by [`Convert::convert`](crate::Convert::convert), before cleaning.
pub type ConvertedData = BTreeMap<String, Value>;

/// A value that can be written into a spreadsheet cell.
pub trait IntoCell {
    /// Returns the cell text, or `None` for a blank cell.
    fn into_cell(self) -> Option<String>;
}

impl IntoCell for Value {
    fn into_cell(self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::String(s) => Some(s),
            // Numbers and bools print bare; arrays and objects as compact JSON
            other => Some(other.to_string()),
        }
    }
}

impl IntoCell for &Value {
    fn into_cell(self) -> Option<String> {
        self.clone().into_cell()
    }
}

impl<T: IntoCell> IntoCell for Option<T> {
    fn into_cell(self) -> Option<String> {
        self.and_then(IntoCell::into_cell)
    }
}

impl IntoCell for String {
    fn into_cell(self) -> Option<String> {
        Some(self)
    }
}

impl IntoCell for &str {
    fn into_cell(self) -> Option<String> {
        Some(self.to_string())
    }
}

impl IntoCell for &String {
    fn into_cell(self) -> Option<String> {
        Some(self.clone())
    }
}

macro_rules! display_cell {
    ($($t:ty),*) => {
        $(
            impl IntoCell for $t {
                fn into_cell(self) -> Option<String> {
                    Some(self.to_string())
                }
            }
        )*
    };
}

display_cell!(i32, i64, u32, u64, usize, f32, f64, bool);

/// Cleans a mapping ready for the remote store.
///
/// Applying `clean` to its own output returns the same mapping.
pub fn clean<I, K, V>(data: I) -> RowData
where
    I: IntoIterator<Item = (K, V)>,
    K: ToString,
    V: IntoCell,
{
    data.into_iter()
        .map(|(k, v)| (k.to_string(), v.into_cell()))
        .collect()
}

/// Overlays `local` on top of `base`; local values win on key collision.
pub fn overlay(mut base: RowData, local: &RowData) -> RowData {
    for (k, v) in local {
        base.insert(k.clone(), v.clone());
    }
    base
}
