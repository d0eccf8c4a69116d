//! DOT format utilities.

use callmap_core::EdgeFlavor;

/// Map edge flavor to DOT stroke style.
pub fn stroke_for_flavor(flavor: EdgeFlavor) -> &'static str {
    match flavor {
        // Structural membership: dashed
        EdgeFlavor::Defines => "dashed",
        // Calls/references: solid
        EdgeFlavor::Uses => "solid",
    }
}

/// Escape special characters for DOT labels.
pub fn escape_label(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
