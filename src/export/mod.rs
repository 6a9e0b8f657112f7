pub mod download;
pub mod pdf;
pub mod share;

use crate::error::Result;
use chrono::Local;
use download::Downloader;
use scene_vitals_common::export::{
    base_filename, build_report_with, build_table_in, compose_email_draft, ArtifactKind,
    EmailDraft, ReportOptions,
};
use scene_vitals_common::{Scene, TimestampMs};
use share::ShareTarget;
use std::path::PathBuf;
use tracing::{info, warn};

/// One named, typed in-memory payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ExportFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

/// Both artifacts of one export, table first
#[derive(Debug, Clone)]
pub struct ExportBundle {
    pub base_name: String,
    pub table: ExportFile,
    pub report: ExportFile,
}

impl ExportBundle {
    pub fn files(&self) -> [ExportFile; 2] {
        [self.table.clone(), self.report.clone()]
    }

    pub fn file_names(&self) -> Vec<String> {
        vec![self.table.name.clone(), self.report.name.clone()]
    }
}

/// How the export reached the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Shared { base_name: String },
    Downloaded { base_name: String, paths: Vec<PathBuf> },
}

/// Builds the CSV and the PDF for a scene with a shared base filename.
pub fn build_bundle(scene: &Scene, now: TimestampMs) -> Result<ExportBundle> {
    let base_name = base_filename(&scene.name, now, &Local);

    let table = build_table_in(&scene.firefighters, &scene.vitals, &Local)?;
    let options = ReportOptions {
        scene_name: Some(scene.name.clone()),
        exported_at: Some(now),
        ..Default::default()
    };
    let report = build_report_with(&scene.firefighters, &scene.vitals, &options, &Local);
    let pdf_bytes = pdf::render_pdf(&report)?;

    Ok(ExportBundle {
        table: ExportFile::new(
            ArtifactKind::Table.file_name(&base_name),
            ArtifactKind::Table.mime_type(),
            table.into_bytes(),
        ),
        report: ExportFile::new(
            ArtifactKind::Report.file_name(&base_name),
            ArtifactKind::Report.mime_type(),
            pdf_bytes,
        ),
        base_name,
    })
}

/// Tries the share hand-off with both files; any refusal or failure falls
/// through to two independent downloads.
pub async fn deliver<S, D>(bundle: &ExportBundle, share: &S, downloader: &D) -> Result<ExportOutcome>
where
    S: ShareTarget,
    D: Downloader,
{
    if share.is_available() {
        let title = format!("Vitals export {}", bundle.base_name);
        match share.share(&bundle.files(), &title).await {
            Ok(true) => {
                info!(base_name = %bundle.base_name, "export shared");
                return Ok(ExportOutcome::Shared { base_name: bundle.base_name.clone() });
            }
            Ok(false) => info!("share hand-off declined, downloading instead"),
            Err(e) => warn!("share hand-off failed, downloading instead: {}", e),
        }
    }

    let mut paths = Vec::with_capacity(2);
    for file in [&bundle.table, &bundle.report] {
        paths.push(downloader.download(file)?);
    }
    Ok(ExportOutcome::Downloaded {
        base_name: bundle.base_name.clone(),
        paths,
    })
}

/// Builds both artifacts and delivers them.
pub async fn export_all<S, D>(scene: &Scene, share: &S, downloader: &D, now: TimestampMs) -> Result<ExportOutcome>
where
    S: ShareTarget,
    D: Downloader,
{
    let bundle = build_bundle(scene, now)?;
    deliver(&bundle, share, downloader).await
}

/// Draft asking the user to attach the already-downloaded files.
pub fn email_draft(scene: &Scene, now: TimestampMs) -> EmailDraft {
    let base_name = base_filename(&scene.name, now, &Local);
    let names = vec![
        ArtifactKind::Table.file_name(&base_name),
        ArtifactKind::Report.file_name(&base_name),
    ];
    compose_email_draft(&scene.name, &names)
}
