//! Scene Vitals Common Library
//!
//! Scene state store and its derived views, shared by every front end:
//! persistence with schema migration, threshold alerting, trend series and
//! the table/report export builders.

pub mod alerts;
pub mod error;
pub mod export;
pub mod input;
pub mod layout;
pub mod migrate;
pub mod series;
pub mod storage;
pub mod store;
pub mod time;
pub mod types;

pub use alerts::{evaluate, AlertSet, AlertTag};
pub use error::{Error, Result};
pub use input::{parse_optional_number, FirefighterInput, VitalsForm, VitalsInput};
pub use layout::ReportLayout;
pub use series::{build_series, series_for_firefighter, Metric, SeriesPoint, TrendSeries};
pub use storage::{KeyValueStore, MemoryStore, CURRENT_KEY, LEGACY_KEY};
pub use store::{StateStore, Transition};
pub use types::{
    AppState, EntryId, Firefighter, FirefighterId, FirefighterStatus, Scene, SceneId, Settings,
    Theme, Thresholds, TimestampMs, VitalsEntry,
};
