//! HTML helper functions

/// Escape HTML special characters
///
/// Slashes are left alone so URLs stay readable in attributes.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
