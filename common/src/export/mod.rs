//! Export builders shared by every front end
//!
//! - table: one CSV row per vitals entry, oldest first
//! - report: paginated layout, one section per firefighter, newest first
//! - naming: shared base filename for both artifacts
//! - email: a draft asking the user to attach the downloaded files

pub mod email;
pub mod naming;
pub mod report;
pub mod table;

pub use email::{compose_email_draft, EmailDraft};
pub use naming::{base_filename, sanitize_scene_name};
pub use report::{build_report, build_report_with, readings_summary, section_heading, wrap_text, ReportDocument, ReportLine, ReportOptions, ReportPage, TextStyle};
pub use table::{build_table, build_table_in, format_number, TABLE_HEADER};

/// Extension and MIME type of an export artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Table,
    Report,
}

impl ArtifactKind {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Table => "csv",
            Self::Report => "pdf",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Table => "text/csv",
            Self::Report => "application/pdf",
        }
    }

    pub fn file_name(self, base: &str) -> String {
        format!("{}.{}", base, self.extension())
    }
}
