//! JSON output formatting

use anyhow::Result;
use nova_core::{ExportReceipt, ViewModel};
use serde::Serialize;

/// Final JSON document of `nova generate`.
#[derive(Serialize)]
pub struct GenerateReport<'a> {
    #[serde(flatten)]
    view: &'a ViewModel,
    #[serde(skip_serializing_if = "Option::is_none")]
    export: Option<&'a ExportReceipt>,
}

impl<'a> GenerateReport<'a> {
    pub const fn new(view: &'a ViewModel, export: Option<&'a ExportReceipt>) -> Self {
        Self { view, export }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
