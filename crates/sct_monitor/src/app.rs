use std::io::{self, Write};
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use sct_core::{Msg, Slice, SliceUpdate, StateStore};
use sct_feed::{load_replay, ConsoleExporter, MessageSource, MonitorSession};
use sct_logging::{sct_info, sct_warn};

use crate::cli::Cli;
use crate::config::{load_config, ConfigError, MonitorConfig};
use crate::render::{render_summary, Renderer};

const TICK: Duration = Duration::from_millis(20);

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let (config, config_error) = resolve_config(&cli.config);
    sct_logging::initialize(
        config.log_destination.into(),
        sct_logging::parse_level(&config.log_level),
        &config.log_file,
    );
    if let Some(err) = config_error {
        sct_warn!("{}; using defaults", err);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    monitor(&cli, &config, &mut out)?;
    Ok(())
}

/// Loads the config, falling back to defaults on any error. The error is
/// returned separately since logging is not set up yet.
pub(crate) fn resolve_config(path: &Path) -> (MonitorConfig, Option<ConfigError>) {
    match load_config(path) {
        Ok(config) => (config, None),
        Err(err) => (MonitorConfig::default(), Some(err)),
    }
}

/// Replays `cli.replay` through a fresh session, rendering slice updates to
/// `out` until the source is drained and idle. Returns the final state.
pub(crate) fn monitor(
    cli: &Cli,
    config: &MonitorConfig,
    out: &mut impl Write,
) -> anyhow::Result<StateStore> {
    let messages = load_replay(&cli.replay)
        .with_context(|| format!("loading replay {:?}", cli.replay))?;
    let source =
        MessageSource::new(config.source_settings()).context("starting message source")?;
    let mut session = MonitorSession::new(StateStore::new(), source);
    let receivers: Vec<mpsc::Receiver<SliceUpdate>> =
        [Slice::Status, Slice::TestRecords, Slice::Console]
            .into_iter()
            .map(|slice| session.subscribe(slice))
            .collect();

    session.source().set_messages(messages);

    let mut renderer = Renderer::new();
    let idle = config.idle_timeout();
    let mut last_activity = Instant::now();
    loop {
        if session.pump() > 0 {
            last_activity = Instant::now();
        } else if session.source().pending() == 0 && last_activity.elapsed() >= idle {
            break;
        }
        if session.consume_dirty() {
            drain_updates(&receivers, &mut renderer, out)?;
            out.flush()?;
        }
        thread::sleep(TICK.min(idle));
    }

    sct_info!("replay drained after {} messages", session.turn());

    if let Some(dir) = &cli.export_dir {
        let exporter = ConsoleExporter::new(dir.clone());
        let path = exporter
            .write(&config.export_filename, session.state().console())
            .with_context(|| format!("exporting console to {:?}", dir))?;
        sct_info!("console exported to {:?}", path);
    }
    if cli.clear_console {
        session.dispatch(Msg::ClearConsoleClicked);
        drain_updates(&receivers, &mut renderer, out)?;
    }

    render_summary(out, &session.state().view())?;
    out.flush()?;
    Ok(session.into_state())
}

fn drain_updates(
    receivers: &[mpsc::Receiver<SliceUpdate>],
    renderer: &mut Renderer,
    out: &mut impl Write,
) -> io::Result<()> {
    for rx in receivers {
        for update in rx.try_iter() {
            renderer.render(out, &update)?;
        }
    }
    Ok(())
}
