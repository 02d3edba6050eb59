//! Exporter configuration rendering
//!
//! The configuration file is derived wholesale from the normalized module
//! list; the same input always renders to the same bytes.

/// Header marking the file as agent-managed
pub const MANAGED_HEADER: &str =
    "# This file is managed by probekeeper. Local changes will be overwritten.";

/// Render the exporter configuration from a normalized module list
#[must_use]
pub fn render_config(modules_yaml: &str) -> String {
    let mut out = String::with_capacity(modules_yaml.len() + 64);
    out.push_str(MANAGED_HEADER);
    out.push('\n');
    out.push_str("modules:\n");

    for line in modules_yaml.lines() {
        if line.is_empty() {
            out.push('\n');
        } else {
            out.push_str("  ");
            out.push_str(line);
            out.push('\n');
        }
    }

    out
}
