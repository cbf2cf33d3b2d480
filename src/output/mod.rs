pub mod charts;
pub mod csv;
pub mod format;
pub mod table;

use anyhow::{Context, Result};
use serde::Serialize;

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed serializing JSON output")
}
