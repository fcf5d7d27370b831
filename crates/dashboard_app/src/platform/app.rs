use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use chrono::Utc;
use dashboard_core::{update, AppState, Msg};
use dashboard_logging::{dash_info, dash_warn};

use super::console::{self, ConsoleCommand, HELP};
use super::effects::EffectRunner;
use super::logging;
use super::render;
use super::settings::{
    apply_env_overrides, load_settings, AppSettings, SETTINGS_FILENAME, WEBHOOK_ENV_VAR,
};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub fn run_app() -> io::Result<()> {
    let settings_path = PathBuf::from(SETTINGS_FILENAME);
    let (mut settings, settings_error) = match load_settings(&settings_path) {
        Ok(settings) => (settings, None),
        Err(err) => (AppSettings::default(), Some(err)),
    };
    apply_env_overrides(&mut settings, env::var(WEBHOOK_ENV_VAR).ok());
    logging::initialize(settings.log_destination, settings.log_level);
    if let Some(err) = settings_error {
        dash_warn!("Using default settings: {}", err);
    }
    dash_info!("Starting dashboard with data dir {:?}", settings.data_dir);

    let mut state = AppState::with_webhook_url(settings.webhook_url.clone());
    let mut runner = EffectRunner::new(settings, settings_path);
    let restored = runner.load_jobs();
    state = dispatch(state, Msg::RestoreJobs(restored), &mut runner);

    let (cmd_tx, cmd_rx) = mpsc::channel();
    console::spawn_stdin_reader(cmd_tx);

    let mut out = io::stdout();
    writeln!(out, "{HELP}")?;
    let mut full_render = true;

    loop {
        while let Ok(command) = cmd_rx.try_recv() {
            match command {
                ConsoleCommand::Quit => {
                    dash_info!("Exiting dashboard");
                    return Ok(());
                }
                ConsoleCommand::Help => writeln!(out, "{HELP}")?,
                ConsoleCommand::Unknown(line) => {
                    writeln!(out, "Unknown command: {line} (type `help`)")?
                }
                ConsoleCommand::List => full_render = true,
                other => {
                    for msg in other.into_msgs(Utc::now()) {
                        state = dispatch(state, msg, &mut runner);
                    }
                    full_render = true;
                }
            }
        }

        while let Some(msg) = runner.poll() {
            if matches!(msg, Msg::WebhookFinished { .. }) {
                full_render = true;
            }
            state = dispatch(state, msg, &mut runner);
        }

        let changed = state.consume_dirty();
        if full_render {
            for line in render::render(&state.view()) {
                writeln!(out, "{line}")?;
            }
            full_render = false;
        } else if changed {
            for line in render::render_progress(&state.view()) {
                writeln!(out, "{line}")?;
            }
        }
        out.flush()?;

        thread::sleep(POLL_INTERVAL);
    }
}

fn dispatch(state: AppState, msg: Msg, runner: &mut EffectRunner) -> AppState {
    let (state, effects) = update(state, msg);
    runner.run(effects);
    state
}
