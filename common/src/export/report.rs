//! Paginated report layout
//!
//! Produces positioned text lines grouped into pages. Firefighters are ordered
//! by display name; each section lists entries newest first (the table export
//! is oldest first). A new page starts whenever the next line would cross the
//! content limit.

use crate::export::table::format_number;
use crate::layout::ReportLayout;
use crate::time::{format_timestamp_in, now_ms};
use crate::types::{Firefighter, TimestampMs, VitalsEntry};
use chrono::{Local, TimeZone};
use std::fmt::Display;

pub const REPORT_TITLE: &str = "Firefighter Vitals Report";
pub const NO_VITALS_LINE: &str = "No vitals recorded.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Regular,
    Bold,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine {
    pub text: String,
    pub x_pt: f32,
    /// Baseline, measured from the top of the page
    pub y_pt: f32,
    pub font_size: f32,
    pub style: TextStyle,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportPage {
    pub lines: Vec<ReportLine>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    pub title: String,
    pub layout: ReportLayout,
    pub pages: Vec<ReportPage>,
}

impl ReportDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Every line's text in order, across pages.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages
            .iter()
            .flat_map(|p| p.lines.iter())
            .map(|l| l.text.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    pub scene_name: Option<String>,
    pub exported_at: Option<TimestampMs>,
    pub layout: ReportLayout,
}

/// Greedy word wrap. Words longer than a line are split.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_len = 0;

        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();

            while word.len() > max_chars {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }

            let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
            if needed > max_chars {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current_len += word.len();
            current.extend(word);
        }

        if current_len > 0 {
            lines.push(current);
        }
    }

    lines
}

struct PageCursor {
    layout: ReportLayout,
    pages: Vec<ReportPage>,
    y_pt: f32,
}

impl PageCursor {
    fn new(layout: ReportLayout) -> Self {
        Self {
            layout,
            pages: vec![ReportPage::default()],
            y_pt: layout.margin_pt,
        }
    }

    fn write(&mut self, text: impl Into<String>, font_size: f32, style: TextStyle, indent_pt: f32) {
        let advance = self.layout.line_height(font_size);
        if self.y_pt + advance > self.layout.content_limit_pt() {
            self.pages.push(ReportPage::default());
            self.y_pt = self.layout.margin_pt;
        }
        self.y_pt += advance;

        let line = ReportLine {
            text: text.into(),
            x_pt: self.layout.margin_pt + indent_pt,
            y_pt: self.y_pt,
            font_size,
            style,
        };
        if let Some(page) = self.pages.last_mut() {
            page.lines.push(line);
        }
    }

    fn gap(&mut self, pt: f32) {
        self.y_pt += pt;
    }

    fn finish(self) -> Vec<ReportPage> {
        self.pages
    }
}

pub fn section_heading(firefighter: &Firefighter) -> String {
    let mut heading = firefighter.display_name();
    if let Some(unit) = firefighter.unit.as_deref().filter(|u| !u.is_empty()) {
        heading.push_str(&format!(" ({})", unit));
    }
    if let Some(status) = firefighter.status {
        heading.push_str(&format!(" - {}", status.label()));
    }
    heading
}

pub fn readings_summary(entry: &VitalsEntry) -> String {
    let mut parts = Vec::new();
    if let Some(v) = entry.heart_rate {
        parts.push(format!("HR {}", format_number(v)));
    }
    if let Some(v) = entry.resp_rate {
        parts.push(format!("RR {}", format_number(v)));
    }
    if let Some(v) = entry.oxygen_sat {
        parts.push(format!("SpO2 {}%", format_number(v)));
    }
    if entry.bp_systolic.is_some() || entry.bp_diastolic.is_some() {
        let side = |v: Option<f64>| v.map(format_number).unwrap_or_else(|| "-".to_string());
        parts.push(format!("BP {}/{}", side(entry.bp_systolic), side(entry.bp_diastolic)));
    }
    if let Some(v) = entry.temperature_f {
        parts.push(format!("Temp {} F", format_number(v)));
    }
    if parts.is_empty() {
        "(no readings)".to_string()
    } else {
        parts.join(" | ")
    }
}

/// Builds the report in local time, stamped now.
pub fn build_report(firefighters: &[Firefighter], vitals: &[VitalsEntry]) -> ReportDocument {
    build_report_with(firefighters, vitals, &ReportOptions::default(), &Local)
}

pub fn build_report_with<Tz>(
    firefighters: &[Firefighter],
    vitals: &[VitalsEntry],
    options: &ReportOptions,
    tz: &Tz,
) -> ReportDocument
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let layout = options.layout;
    let mut cursor = PageCursor::new(layout);
    let exported_at = options.exported_at.unwrap_or_else(now_ms);

    cursor.write(REPORT_TITLE, layout.title_size, TextStyle::Bold, 0.0);
    if let Some(scene) = options.scene_name.as_deref() {
        cursor.write(format!("Scene: {}", scene), layout.body_size, TextStyle::Regular, 0.0);
    }
    cursor.write(
        format!("Exported: {}", format_timestamp_in(exported_at, tz)),
        layout.body_size,
        TextStyle::Regular,
        0.0,
    );

    let mut roster: Vec<(String, &Firefighter)> = firefighters
        .iter()
        .map(|f| (f.display_name(), f))
        .collect();
    roster.sort_by(|a, b| a.0.cmp(&b.0));

    let notes_width = layout.wrap_chars(layout.indent_pt * 2.0);

    for (_, firefighter) in roster {
        cursor.gap(layout.body_size);
        cursor.write(section_heading(firefighter), layout.heading_size, TextStyle::Bold, 0.0);

        let mut entries: Vec<&VitalsEntry> = vitals
            .iter()
            .filter(|e| e.firefighter_id == firefighter.id)
            .collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        if entries.is_empty() {
            cursor.write(NO_VITALS_LINE, layout.body_size, TextStyle::Regular, layout.indent_pt);
            continue;
        }

        for entry in entries {
            cursor.write(
                format!("{}  {}", format_timestamp_in(entry.timestamp, tz), readings_summary(entry)),
                layout.body_size,
                TextStyle::Regular,
                layout.indent_pt,
            );
            if let Some(notes) = entry.notes.as_deref() {
                for (i, line) in wrap_text(notes, notes_width.saturating_sub(7)).into_iter().enumerate() {
                    let text = if i == 0 { format!("Notes: {}", line) } else { line };
                    cursor.write(text, layout.body_size, TextStyle::Regular, layout.indent_pt * 2.0);
                }
            }
        }
    }

    ReportDocument {
        title: REPORT_TITLE.to_string(),
        layout,
        pages: cursor.finish(),
    }
}
