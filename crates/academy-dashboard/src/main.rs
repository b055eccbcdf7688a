mod bootstrap;
mod summary;

use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use dashboard_core::settings::Settings;
use dashboard_data::analysis::{build_snapshot, SnapshotOptions};
use dashboard_runtime::data_manager::ActivityLoader;
use dashboard_runtime::session::FilterSession;
use dashboard_ui::app::{App, InitialFilters};

use crate::summary::SummaryReport;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    // The TUI owns the terminal, so dashboard mode always logs to a file.
    let log_file = match (&settings.log_file, settings.is_summary()) {
        (Some(path), _) => Some(path.clone()),
        (None, true) => None,
        (None, false) => Some(bootstrap::default_log_file()),
    };
    bootstrap::setup_logging(&settings.log_level, log_file.as_deref())?;

    tracing::info!("Academy Dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "View: {}, Theme: {}, Capacity: {}h",
        settings.view,
        settings.theme,
        settings.capacity
    );

    if settings.clear && settings.file.is_none() {
        println!("Saved configuration cleared.");
        return Ok(ExitCode::SUCCESS);
    }

    let path = match settings.data_file() {
        Ok(path) => path.to_path_buf(),
        Err(e) => {
            eprintln!("{}", e);
            return Ok(ExitCode::from(2));
        }
    };

    let options = SnapshotOptions {
        capacity: settings.capacity,
        top_n: settings.top_n(),
    };

    if settings.is_summary() {
        return run_summary(&settings, &path, options);
    }

    tracing::info!("Starting dashboard for {}", path.display());
    let mut app = App::new(
        ActivityLoader::new(path, settings.sheet_index),
        &settings.theme,
        options,
        InitialFilters {
            categories: settings.categories.clone(),
            start: settings.start,
            end: settings.end,
        },
    );
    app.load();

    // The loop exits on 'q' / Ctrl+C inside the TUI; the OS signal covers
    // the moments before raw mode is active.
    tokio::select! {
        result = app.run() => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Ctrl+C received; shutting down");
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Load, aggregate and print once. Load and schema errors go to stderr.
fn run_summary(settings: &Settings, path: &Path, options: SnapshotOptions) -> Result<ExitCode> {
    let mut loader = ActivityLoader::new(path, settings.sheet_index);
    let table = match loader.load() {
        Ok(table) => table,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("{}: {}", e.title(), e);
            return Ok(ExitCode::FAILURE);
        }
    };

    let session = FilterSession::with_initial(
        table,
        &settings.categories,
        settings.start,
        settings.end,
    );
    let snapshot = build_snapshot(table, &session.query(), options);

    if settings.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        print!(
            "{}",
            SummaryReport::new(&snapshot, &file_name, session.categories().len())
        );
    }

    Ok(ExitCode::SUCCESS)
}
