use clap::{Args, Parser, Subcommand};
use scene_vitals_common::{FirefighterStatus, Metric, Theme, VitalsForm};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scene-vitals")]
#[command(about = "Firefighter rehab vitals tracking per incident scene", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose log output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Skip confirmation prompts for destructive commands
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create, switch and manage scenes
    Scene {
        #[command(subcommand)]
        action: SceneCommand,
    },

    /// Manage the active scene's roster
    #[command(name = "ff")]
    Firefighter {
        #[command(subcommand)]
        action: FirefighterCommand,
    },

    /// Record and list vitals readings
    Vitals {
        #[command(subcommand)]
        action: VitalsCommand,
    },

    /// Latest reading and alerts for each firefighter
    Alerts,

    /// Time series of one metric for one firefighter
    Trend {
        /// heartRate, respRate, oxygenSat, bloodPressure or temperatureF
        #[arg(required = true)]
        metric: Metric,

        /// Firefighter (id, list number or name); defaults to the selection
        #[arg(short, long)]
        ff: Option<String>,
    },

    /// Theme and alert thresholds
    Settings {
        #[command(subcommand)]
        action: SettingsCommand,
    },

    /// Export the active scene as CSV and PDF
    Export {
        /// Skip the share hand-off and download directly
        #[arg(long)]
        no_share: bool,

        /// Print an email draft listing the downloaded files
        #[arg(long)]
        email: bool,
    },

    /// Show or edit configuration
    Config {
        /// Show configuration
        #[arg(long)]
        show: bool,

        /// Set the export download directory
        #[arg(long)]
        set_export_dir: Option<PathBuf>,

        /// Set the external share program (empty string disables it)
        #[arg(long)]
        set_share_command: Option<String>,

        /// Argument for the share program, repeatable; `{title}` is substituted
        #[arg(long = "share-arg", allow_hyphen_values = true)]
        share_args: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum SceneCommand {
    /// Create a scene and make it active
    New {
        /// Scene name (blank becomes "Untitled Scene")
        #[arg(default_value = "")]
        name: String,
    },
    /// List scenes
    List,
    /// Make another scene active
    Switch {
        /// Scene id, list number or name
        scene: String,
    },
    /// Rename a scene
    Rename {
        /// New name
        name: String,

        /// Scene id, list number or name; defaults to the active scene
        #[arg(short, long)]
        scene: Option<String>,
    },
    /// Delete a scene and everything recorded in it
    Delete {
        /// Scene id, list number or name; defaults to the active scene
        scene: Option<String>,
    },
    /// Erase the active scene's roster and vitals
    Clear,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FirefighterFields {
    /// First name
    #[arg(long)]
    pub first: Option<String>,

    /// Last name
    #[arg(long)]
    pub last: Option<String>,

    /// Unit (blank clears it)
    #[arg(short, long)]
    pub unit: Option<String>,

    /// onDuty, rehab or transport
    #[arg(short, long, value_parser = parse_status)]
    pub status: Option<FirefighterStatus>,
}

#[derive(Subcommand)]
pub enum FirefighterCommand {
    /// Add a firefighter to the roster
    Add {
        #[command(flatten)]
        fields: FirefighterFields,
    },
    /// Edit a firefighter; unspecified fields keep their value
    Edit {
        /// Firefighter id, list number or name
        target: String,

        #[command(flatten)]
        fields: FirefighterFields,

        /// Clear the status
        #[arg(long, conflicts_with = "status")]
        clear_status: bool,
    },
    /// Remove a firefighter and all of their vitals
    Remove {
        /// Firefighter id, list number or name
        target: String,
    },
    /// Select a firefighter for vitals entry
    Select {
        /// Firefighter id, list number or name; omit to clear the selection
        target: Option<String>,
    },
    /// List the roster
    List,
}

#[derive(Args, Debug, Clone, Default)]
pub struct VitalsFields {
    /// Heart rate (bpm)
    #[arg(long)]
    pub hr: Option<String>,

    /// Respiratory rate (breaths/min)
    #[arg(long)]
    pub rr: Option<String>,

    /// Oxygen saturation (%)
    #[arg(long)]
    pub spo2: Option<String>,

    /// Systolic blood pressure (mmHg)
    #[arg(long)]
    pub sys: Option<String>,

    /// Diastolic blood pressure (mmHg)
    #[arg(long)]
    pub dia: Option<String>,

    /// Temperature (F)
    #[arg(long)]
    pub temp: Option<String>,

    /// Free-text note
    #[arg(short, long)]
    pub notes: Option<String>,
}

impl VitalsFields {
    pub fn is_blank(&self) -> bool {
        [&self.hr, &self.rr, &self.spo2, &self.sys, &self.dia, &self.temp, &self.notes]
            .iter()
            .all(|f| f.is_none())
    }

    pub fn to_form(&self) -> VitalsForm {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        VitalsForm {
            heart_rate: text(&self.hr),
            resp_rate: text(&self.rr),
            oxygen_sat: text(&self.spo2),
            bp_systolic: text(&self.sys),
            bp_diastolic: text(&self.dia),
            temperature_f: text(&self.temp),
            notes: text(&self.notes),
        }
    }
}

#[derive(Subcommand)]
pub enum VitalsCommand {
    /// Record a reading; prompts for each field when none are given
    Add {
        /// Firefighter id, list number or name; defaults to the selection
        #[arg(short, long)]
        ff: Option<String>,

        #[command(flatten)]
        fields: VitalsFields,
    },
    /// List recorded readings, newest first
    List {
        /// Only this firefighter
        #[arg(short, long)]
        ff: Option<String>,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct ThresholdFields {
    #[arg(long)]
    pub hr_high: Option<f64>,
    #[arg(long)]
    pub hr_low: Option<f64>,
    #[arg(long)]
    pub rr_high: Option<f64>,
    #[arg(long)]
    pub rr_low: Option<f64>,
    #[arg(long)]
    pub spo2_low: Option<f64>,
    #[arg(long)]
    pub bp_sys_high: Option<f64>,
    #[arg(long)]
    pub bp_sys_low: Option<f64>,
    #[arg(long)]
    pub bp_dia_high: Option<f64>,
    #[arg(long)]
    pub bp_dia_low: Option<f64>,
    #[arg(long)]
    pub temp_high_f: Option<f64>,
}

impl ThresholdFields {
    /// Overlays the given bounds onto `base`.
    pub fn apply_to(&self, base: scene_vitals_common::Thresholds) -> scene_vitals_common::Thresholds {
        let mut t = base;
        let pairs: [(Option<f64>, &mut f64); 10] = [
            (self.hr_high, &mut t.hr_high),
            (self.hr_low, &mut t.hr_low),
            (self.rr_high, &mut t.rr_high),
            (self.rr_low, &mut t.rr_low),
            (self.spo2_low, &mut t.spo2_low),
            (self.bp_sys_high, &mut t.bp_sys_high),
            (self.bp_sys_low, &mut t.bp_sys_low),
            (self.bp_dia_high, &mut t.bp_dia_high),
            (self.bp_dia_low, &mut t.bp_dia_low),
            (self.temp_high_f, &mut t.temp_high_f),
        ];
        for (value, slot) in pairs {
            if let Some(v) = value {
                *slot = v;
            }
        }
        t
    }
}

#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Show theme and thresholds
    Show,
    /// Set the theme (light/dark)
    Theme {
        #[arg(value_parser = parse_theme)]
        theme: Theme,
    },
    /// Change alert thresholds; unspecified bounds keep their value
    Thresholds {
        #[command(flatten)]
        fields: ThresholdFields,
    },
    /// Restore default thresholds
    Reset,
}

fn parse_status(s: &str) -> Result<FirefighterStatus, String> {
    let key = match s.to_lowercase().replace(['-', '_', ' '], "").as_str() {
        "onduty" | "duty" => "onDuty",
        "rehab" => "rehab",
        "transport" => "transport",
        _ => "",
    };
    FirefighterStatus::parse(key)
        .ok_or_else(|| format!("Unknown status: {}. Use onDuty, rehab, or transport", s))
}

fn parse_theme(s: &str) -> Result<Theme, String> {
    match s.to_lowercase().as_str() {
        "light" => Ok(Theme::Light),
        "dark" => Ok(Theme::Dark),
        _ => Err(format!("Unknown theme: {}. Use light or dark", s)),
    }
}
