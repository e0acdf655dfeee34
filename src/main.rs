use anyhow::{Context, Result};
use menubar_volume::{DisplayPreferences, PreferencesStore};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: menubar-volume [--toggle-percentage | --toggle-icon]";

fn init_logging() {
    // Logs go to stderr; stdout carries the status line.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();

    let store = PreferencesStore::default_location().context("Failed to locate preferences")?;

    match std::env::args().nth(1).as_deref() {
        None => run_monitor(store),
        Some("--toggle-percentage") => toggle(&store, DisplayPreferences::toggle_percentage),
        Some("--toggle-icon") => toggle(&store, DisplayPreferences::toggle_icon),
        Some(other) => anyhow::bail!("unknown argument {other:?}\n{USAGE}"),
    }
}

fn toggle(store: &PreferencesStore, change: fn(&mut DisplayPreferences)) -> Result<()> {
    let preferences = store
        .update(change)
        .with_context(|| format!("Failed to update {}", store.path().display()))?;
    tracing::info!(
        show_percentage = preferences.show_percentage,
        show_icon = preferences.show_icon,
        "Saved display preferences"
    );
    Ok(())
}

#[cfg(target_os = "macos")]
fn run_monitor(store: PreferencesStore) -> Result<()> {
    use menubar_volume::{CoreAudioHardware, MonitorConfig, StatusLineSink, VolumeMonitor};

    let config = MonitorConfig::from_env();
    let hardware = CoreAudioHardware::new().context("Failed to configure CoreAudio")?;
    let sink = StatusLineSink::new(std::io::stdout(), store);

    let mut monitor = VolumeMonitor::new(hardware, sink, &config);
    monitor.start();
    monitor.run();
    Ok(())
}

#[cfg(not(target_os = "macos"))]
fn run_monitor(_store: PreferencesStore) -> Result<()> {
    anyhow::bail!("menubar-volume monitors the CoreAudio HAL and only runs on macOS")
}
