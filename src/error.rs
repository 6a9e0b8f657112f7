use thiserror::Error;

#[derive(Error, Debug)]
pub enum VitalsError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF generation failed: {0}")]
    PdfGeneration(String),

    #[error("Share hand-off failed: {0}")]
    Share(String),

    #[error("Firefighter not found in the active scene: {0}")]
    FirefighterNotFound(String),

    #[error("Scene not found: {0}")]
    SceneNotFound(String),

    #[error("Ambiguous reference: {0}")]
    AmbiguousReference(String),

    #[error("No active scene. Run `scene-vitals scene new <name>` first.")]
    NoActiveScene,

    #[error(transparent)]
    Core(#[from] scene_vitals_common::Error),
}

pub type Result<T> = std::result::Result<T, VitalsError>;
