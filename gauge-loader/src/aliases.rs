//! `alias=symbol` text format

use gauge_core::{codes, Diagnostic};
use gauge_units::AliasTable;

use crate::LoadReport;

/// Parse alias lines into a table.
///
/// Lines starting with `#` and lines without `=` are ignored. Each line is
/// split at its first `=`, both sides trimmed. Lines with an empty side are
/// reported and skipped.
pub fn parse_aliases(text: &str, origin: &str, report: &mut LoadReport) -> AliasTable {
    let mut table = AliasTable::new();

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.starts_with('#') {
            continue;
        }
        let Some((alias, symbol)) = line.split_once('=') else {
            continue;
        };
        if let Err(e) = table.insert(alias, symbol) {
            report.push(
                Diagnostic::warning(codes::MALFORMED_ALIAS, format!("Malformed alias '{}': {}", line, e))
                    .in_source(origin)
                    .at_line(index + 1),
            );
        }
    }
    table
}
