//! Markup helpers shared by the HTML and SVG writers

/// Escape a value for use inside a double-quoted attribute
pub fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
