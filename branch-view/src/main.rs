//! Application entry point for the branch viewer.
//!
//! This binary sets up logging and eframe/egui, then delegates all
//! interactive logic and rendering to [`Viewer`] from the `viewer` module.
//!
//! An optional first argument names a TOML config file for the generator.

mod viewer;

use branch_core::Config;
use tracing_subscriber::EnvFilter;
use viewer::Viewer;

/// Starts the native eframe application.
///
/// Log verbosity follows `RUST_LOG` and defaults to `info`. A config file
/// that fails to load is reported and the defaults are used instead.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if eframe fails to create the native window or event loop.
fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let viewer = match std::env::args_os().nth(1) {
        Some(path) => match Config::load(&path) {
            Ok(cfg) => {
                tracing::info!(policy = %cfg.policy, rules = cfg.rules.len(), "loaded config");
                Viewer::with_config(cfg)
            }
            Err(e) => {
                tracing::error!(error = %e, "using default config");
                Viewer::new()
            }
        },
        None => Viewer::new(),
    };

    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "Branch Generator",
        options,
        Box::new(|_cc| Ok(Box::new(viewer))),
    )
}
