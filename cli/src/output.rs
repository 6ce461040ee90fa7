//! Rendering of converted symbols

use byteconv::Symbol;

/// One symbol per line
#[must_use]
pub fn render_plain(symbols: &[Symbol]) -> String {
    symbols.iter().map(|s| format!("{s}\n")).collect()
}

/// JSON array of strings, e.g. `["63","z","25"]`
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_json(symbols: &[Symbol]) -> serde_json::Result<String> {
    serde_json::to_string(symbols)
}
