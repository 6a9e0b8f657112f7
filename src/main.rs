use anyhow::{Context, Result};
use clap::Parser;
use dialoguer::{Confirm, Input};
use scene_vitals::cli::{
    Cli, Commands, FirefighterCommand, FirefighterFields, SceneCommand, SettingsCommand,
    VitalsCommand,
};
use scene_vitals::config::Config;
use scene_vitals::export::download::DirectoryDownloader;
use scene_vitals::export::share::{CommandShare, NoShare};
use scene_vitals::export::{self, ExportOutcome};
use scene_vitals::storage::FileStore;
use scene_vitals::{logging, lookup};
use scene_vitals_common::export::{readings_summary, section_heading};
use scene_vitals_common::time::{format_local_timestamp, format_time_since, latest_reading, now_ms};
use scene_vitals_common::{
    evaluate, series_for_firefighter, FirefighterInput, Metric, SeriesPoint, StateStore, Theme,
    Transition, TrendSeries, VitalsForm, VitalsInput,
};
use std::path::PathBuf;

type Store = StateStore<FileStore>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = Config::load().context("failed to load config")?;
    let data_dir = config.data_dir()?;
    let mut store = StateStore::init(FileStore::new(&data_dir));

    match cli.command {
        Commands::Scene { action } => run_scene(&mut store, action, cli.yes)?,
        Commands::Firefighter { action } => run_firefighter(&mut store, action, cli.yes)?,
        Commands::Vitals { action } => match action {
            VitalsCommand::Add { ff, fields } => {
                let form = if fields.is_blank() {
                    prompt_vitals_form()?
                } else {
                    fields.to_form()
                };
                add_vitals(&mut store, ff.as_deref(), &form)?
            }
            VitalsCommand::List { ff } => list_vitals(&store, ff.as_deref())?,
        },
        Commands::Alerts => print_alerts(&store)?,
        Commands::Trend { metric, ff } => print_trend(&store, metric, ff.as_deref())?,
        Commands::Settings { action } => run_settings(&mut store, action)?,
        Commands::Export { no_share, email } => {
            run_export(&store, &config, no_share, email).await?
        }
        Commands::Config { show, set_export_dir, set_share_command, share_args } => {
            run_config(config, show, set_export_dir, set_share_command, share_args)?
        }
    }

    store.teardown();
    Ok(())
}

fn confirm(prompt: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}

fn run_scene(store: &mut Store, action: SceneCommand, yes: bool) -> Result<()> {
    match action {
        SceneCommand::New { name } => {
            store.dispatch(Transition::create_scene(name))?;
            let scene = lookup::active_scene(store.state())?;
            println!("✔ Created scene: {} ({})", scene.name, scene.id);
        }

        SceneCommand::List => {
            let state = store.state();
            if state.scenes.is_empty() {
                println!("No scenes. Run `scene-vitals scene new <name>`.");
            }
            for (i, scene) in state.scenes.iter().enumerate() {
                let marker = if state.current_scene_id.as_ref() == Some(&scene.id) { "*" } else { " " };
                println!(
                    "{} {}. {}  ({} firefighters, {} readings)  [{}]",
                    marker,
                    i + 1,
                    scene.name,
                    scene.firefighters.len(),
                    scene.vitals.len(),
                    scene.id
                );
            }
        }

        SceneCommand::Switch { scene } => {
            let id = lookup::find_scene(store.state(), &scene)?.id.clone();
            store.dispatch(Transition::SwitchScene(id))?;
            println!("✔ Active scene: {}", lookup::active_scene(store.state())?.name);
        }

        SceneCommand::Rename { name, scene } => {
            let id = match scene {
                Some(target) => lookup::find_scene(store.state(), &target)?.id.clone(),
                None => lookup::active_scene(store.state())?.id.clone(),
            };
            store.dispatch(Transition::RenameScene { id: id.clone(), name })?;
            if let Some(scene) = store.state().scene(&id) {
                println!("✔ Renamed scene: {}", scene.name);
            }
        }

        SceneCommand::Delete { scene } => {
            let target = match scene {
                Some(target) => lookup::find_scene(store.state(), &target)?,
                None => lookup::active_scene(store.state())?,
            };
            let (id, name) = (target.id.clone(), target.name.clone());
            let prompt = format!(
                "Delete scene \"{}\" with {} firefighters and {} readings?",
                name,
                target.firefighters.len(),
                target.vitals.len()
            );
            if !confirm(&prompt, yes)? {
                println!("Cancelled");
                return Ok(());
            }
            store.dispatch(Transition::DeleteScene(id))?;
            println!("✔ Deleted scene: {}", name);
            match store.state().current_scene() {
                Some(scene) => println!("Active scene: {}", scene.name),
                None => println!("No active scene"),
            }
        }

        SceneCommand::Clear => {
            let scene = lookup::active_scene(store.state())?;
            let prompt = format!(
                "Erase all firefighters and readings in \"{}\"?",
                scene.name
            );
            if !confirm(&prompt, yes)? {
                println!("Cancelled");
                return Ok(());
            }
            store.reset_active_scene()?;
            println!("✔ Scene cleared");
        }
    }
    Ok(())
}

fn prompt_name_fields(fields: FirefighterFields) -> Result<FirefighterFields> {
    if fields.first.is_some() || fields.last.is_some() {
        return Ok(fields);
    }
    let first: String = Input::new()
        .with_prompt("First name")
        .allow_empty(true)
        .interact_text()?;
    let last: String = Input::new()
        .with_prompt("Last name")
        .allow_empty(true)
        .interact_text()?;
    Ok(FirefighterFields {
        first: Some(first),
        last: Some(last),
        ..fields
    })
}

fn run_firefighter(store: &mut Store, action: FirefighterCommand, yes: bool) -> Result<()> {
    match action {
        FirefighterCommand::Add { fields } => {
            let fields = prompt_name_fields(fields)?;
            let input = FirefighterInput {
                first_name: fields.first.unwrap_or_default(),
                last_name: fields.last.unwrap_or_default(),
                unit: fields.unit,
                status: fields.status,
            };
            store.dispatch(Transition::add_firefighter(input))?;
            let scene = lookup::active_scene(store.state())?;
            if let Some(added) = scene.firefighters.last() {
                println!("✔ Added {} [{}]", section_heading(added), added.id);
            }
        }

        FirefighterCommand::Edit { target, fields, clear_status } => {
            let scene = lookup::active_scene(store.state())?;
            let current = lookup::find_firefighter(scene, &target)?;
            let id = current.id.clone();
            let input = FirefighterInput {
                first_name: fields.first.unwrap_or_else(|| current.first_name.clone()),
                last_name: fields.last.unwrap_or_else(|| current.last_name.clone()),
                unit: fields.unit.or_else(|| current.unit.clone()),
                status: if clear_status { None } else { fields.status.or(current.status) },
            };
            store.dispatch(Transition::UpdateFirefighter { id: id.clone(), input })?;
            let scene = lookup::active_scene(store.state())?;
            if let Some(updated) = scene.firefighter(&id) {
                println!("✔ Updated {}", section_heading(updated));
            }
        }

        FirefighterCommand::Remove { target } => {
            let scene = lookup::active_scene(store.state())?;
            let firefighter = lookup::find_firefighter(scene, &target)?;
            let id = firefighter.id.clone();
            let name = firefighter.display_name();
            let prompt = format!(
                "Remove {} and their {} readings?",
                name,
                scene.vitals_for(&id).count()
            );
            if !confirm(&prompt, yes)? {
                println!("Cancelled");
                return Ok(());
            }
            store.dispatch(Transition::RemoveFirefighter(id))?;
            println!("✔ Removed {}", name);
        }

        FirefighterCommand::Select { target } => {
            let id = match target {
                Some(target) => {
                    let scene = lookup::active_scene(store.state())?;
                    Some(lookup::find_firefighter(scene, &target)?.id.clone())
                }
                None => None,
            };
            store.dispatch(Transition::SelectFirefighter(id))?;
            let scene = lookup::active_scene(store.state())?;
            match scene.selected_firefighter() {
                Some(f) => println!("✔ Selected {}", f.display_name()),
                None => println!("✔ Selection cleared"),
            }
        }

        FirefighterCommand::List => {
            let scene = lookup::active_scene(store.state())?;
            println!("{}", scene.name);
            if scene.firefighters.is_empty() {
                println!("No firefighters. Run `scene-vitals ff add`.");
            }
            let now = now_ms();
            for (i, f) in scene.firefighters.iter().enumerate() {
                let marker = if scene.selected_firefighter_id.as_ref() == Some(&f.id) { "*" } else { " " };
                let last = latest_reading(&scene.vitals, &f.id)
                    .map(|e| format!("last reading {}", format_time_since(e.timestamp, now)))
                    .unwrap_or_else(|| "no readings".to_string());
                println!("{} {}. {}  ({})  [{}]", marker, i + 1, section_heading(f), last, f.id);
            }
        }
    }
    Ok(())
}

fn prompt_vitals_form() -> Result<VitalsForm> {
    let ask = |prompt: &str| -> Result<String> {
        Ok(Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?)
    };
    Ok(VitalsForm {
        heart_rate: ask("Heart rate (bpm)")?,
        resp_rate: ask("Respiratory rate (/min)")?,
        oxygen_sat: ask("SpO2 (%)")?,
        bp_systolic: ask("BP systolic")?,
        bp_diastolic: ask("BP diastolic")?,
        temperature_f: ask("Temperature (F)")?,
        notes: ask("Notes")?,
    })
}

fn add_vitals(store: &mut Store, ff: Option<&str>, form: &VitalsForm) -> Result<()> {
    let scene = lookup::active_scene(store.state())?;
    let firefighter_id = lookup::target_firefighter_id(scene, ff)?;

    store.dispatch(Transition::append_vitals(firefighter_id, VitalsInput::from(form)))?;

    let state = store.state();
    let scene = lookup::active_scene(state)?;
    if let Some(entry) = scene.vitals.last() {
        println!("✔ Recorded {}", readings_summary(entry));
        let alerts = evaluate(entry, &state.settings.thresholds);
        if !alerts.is_empty() {
            println!("⚠ ALERT: {}", alerts);
        }
    }
    Ok(())
}

fn list_vitals(store: &Store, ff: Option<&str>) -> Result<()> {
    let state = store.state();
    let scene = lookup::active_scene(state)?;
    let only = ff.map(|t| lookup::find_firefighter(scene, t)).transpose()?;

    let mut entries: Vec<_> = scene
        .vitals
        .iter()
        .filter(|e| only.map_or(true, |f| f.id == e.firefighter_id))
        .collect();
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    if entries.is_empty() {
        println!("No vitals recorded.");
    }
    for entry in entries {
        let name = scene
            .firefighter(&entry.firefighter_id)
            .map(|f| f.display_name())
            .unwrap_or_else(|| "Unknown".to_string());
        let alerts = evaluate(entry, &state.settings.thresholds);
        let flag = if alerts.is_empty() { String::new() } else { format!("  ⚠ {}", alerts) };
        println!(
            "{}  {}  {}{}",
            format_local_timestamp(entry.timestamp),
            name,
            readings_summary(entry),
            flag
        );
        if let Some(notes) = entry.notes.as_deref() {
            println!("    Notes: {}", notes);
        }
    }
    Ok(())
}

fn print_alerts(store: &Store) -> Result<()> {
    let state = store.state();
    let scene = lookup::active_scene(state)?;
    let now = now_ms();

    println!("{}", scene.name);
    for f in &scene.firefighters {
        println!("{}", section_heading(f));
        match latest_reading(&scene.vitals, &f.id) {
            Some(entry) => {
                println!(
                    "  {}  ({})",
                    readings_summary(entry),
                    format_time_since(entry.timestamp, now)
                );
                let alerts = evaluate(entry, &state.settings.thresholds);
                if alerts.is_empty() {
                    println!("  no alerts");
                } else {
                    println!("  ⚠ ALERT: {}", alerts);
                }
            }
            None => println!("  no readings"),
        }
    }
    Ok(())
}

fn print_points(label: Option<&str>, unit: &str, points: &[SeriesPoint]) {
    if let Some(label) = label {
        println!("{}", label);
    }
    for p in points {
        println!("  {}  {} {}", format_local_timestamp(p.timestamp), p.value, unit);
    }
}

fn print_trend(store: &Store, metric: Metric, ff: Option<&str>) -> Result<()> {
    let scene = lookup::active_scene(store.state())?;
    let firefighter = lookup::target_firefighter(scene, ff)?;
    let series = series_for_firefighter(&scene.vitals, &firefighter.id, metric);

    println!("{} for {}", metric, firefighter.display_name());
    if series.is_empty() {
        println!("No readings.");
        return Ok(());
    }
    match &series {
        TrendSeries::Single(points) => print_points(None, metric.unit(), points),
        TrendSeries::BloodPressure { systolic, diastolic } => {
            print_points(Some("Systolic"), metric.unit(), systolic);
            print_points(Some("Diastolic"), metric.unit(), diastolic);
        }
    }
    Ok(())
}

fn run_settings(store: &mut Store, action: SettingsCommand) -> Result<()> {
    match action {
        SettingsCommand::Show => {}
        SettingsCommand::Theme { theme } => {
            store.dispatch(Transition::SetTheme(theme))?;
        }
        SettingsCommand::Thresholds { fields } => {
            let next = fields.apply_to(store.state().settings.thresholds);
            store.dispatch(Transition::SetThresholds(next))?;
        }
        SettingsCommand::Reset => {
            store.dispatch(Transition::ResetThresholds)?;
        }
    }

    let settings = &store.state().settings;
    let t = &settings.thresholds;
    let theme = match settings.theme {
        Theme::Light => "light",
        Theme::Dark => "dark",
    };
    println!("Theme: {}", theme);
    println!("Thresholds (alert outside):");
    println!("  Heart rate     {} - {}", t.hr_low, t.hr_high);
    println!("  Resp rate      {} - {}", t.rr_low, t.rr_high);
    println!("  SpO2           below {}", t.spo2_low);
    println!("  BP systolic    {} - {}", t.bp_sys_low, t.bp_sys_high);
    println!("  BP diastolic   {} - {}", t.bp_dia_low, t.bp_dia_high);
    println!("  Temperature F  above {}", t.temp_high_f);
    Ok(())
}

async fn run_export(store: &Store, config: &Config, no_share: bool, email: bool) -> Result<()> {
    let scene = lookup::active_scene(store.state())?;
    let now = now_ms();
    let downloader = DirectoryDownloader::new(config.export_dir()?);

    let share_command = config.share_command.as_deref().filter(|_| !no_share);
    let outcome = match share_command {
        Some(program) => {
            let staging = std::env::temp_dir().join("scene-vitals-share");
            let share = CommandShare::new(program, config.share_args.clone(), staging);
            export::export_all(scene, &share, &downloader, now).await?
        }
        None => export::export_all(scene, &NoShare, &downloader, now).await?,
    };

    match &outcome {
        ExportOutcome::Shared { base_name } => {
            println!("✔ Shared {}.csv and {}.pdf", base_name, base_name);
        }
        ExportOutcome::Downloaded { paths, .. } => {
            for path in paths {
                println!("✔ Saved {}", path.display());
            }
        }
    }

    if email {
        let draft = export::email_draft(scene, now);
        println!();
        println!("Subject: {}", draft.subject);
        println!();
        println!("{}", draft.body);
    }
    Ok(())
}

fn run_config(
    mut config: Config,
    show: bool,
    set_export_dir: Option<PathBuf>,
    set_share_command: Option<String>,
    share_args: Vec<String>,
) -> Result<()> {
    let mut changed = false;

    if let Some(dir) = set_export_dir {
        config.set_export_dir(dir).context("failed to save config")?;
        println!("✔ Export directory set");
        changed = true;
    }

    if let Some(command) = set_share_command {
        config
            .set_share_command(Some(command), share_args)
            .context("failed to save config")?;
        println!("✔ Share command set");
        changed = true;
    }

    if show || !changed {
        println!("Config:");
        println!("  File: {}", Config::config_path()?.display());
        println!("  Data directory: {}", config.data_dir()?.display());
        println!("  Export directory: {}", config.export_dir()?.display());
        match &config.share_command {
            Some(cmd) => println!("  Share command: {} {}", cmd, config.share_args.join(" ")),
            None => println!("  Share command: (not set, exports download directly)"),
        }
    }
    Ok(())
}
