//! Sheets API response shapes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub(crate) struct Spreadsheet {
    #[serde(default)]
    pub sheets: Vec<Sheet>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Sheet {
    #[serde(default)]
    pub properties: Option<SheetProperties>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SheetProperties {
    #[serde(default)]
    pub title: Option<String>,
}

impl Spreadsheet {
    pub fn titles(self) -> Vec<String> {
        self.sheets
            .into_iter()
            .filter_map(|sheet| sheet.properties?.title)
            .collect()
    }
}

/// A `ValueRange`; `values` is omitted by the API when the range is empty.
#[derive(Debug, Default, Deserialize, Serialize)]
pub(crate) struct ValueRange {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<Vec<Value>>,
}

impl ValueRange {
    pub fn single(value: &str) -> Self {
        Self {
            values: vec![vec![Value::String(value.to_string())]],
        }
    }

    /// Rows as text. Formatted values are already strings; anything else
    /// is rendered as JSON.
    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect()
    }
}

fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateValuesResponse {
    #[serde(rename = "updatedCells", default)]
    pub updated_cells: u32,
}
