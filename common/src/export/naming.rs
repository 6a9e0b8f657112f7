//! Export filenames

use crate::time::format_date_in;
use crate::types::TimestampMs;
use chrono::TimeZone;
use std::fmt::Display;

const FALLBACK_STEM: &str = "scene";

/// Lowercases, collapses runs of non-alphanumerics to `-`, trims dashes.
pub fn sanitize_scene_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if out.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        out
    }
}

/// `<sanitized scene>-vitals-<YYYY-MM-DD>`, shared by both artifacts.
pub fn base_filename<Tz>(scene_name: &str, export_ms: TimestampMs, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "{}-vitals-{}",
        sanitize_scene_name(scene_name),
        format_date_in(export_ms, tz)
    )
}
