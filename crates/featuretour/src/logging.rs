//! Log setup. The terminal belongs to the UI, so logs go to a file.

use color_eyre::eyre::{Result, WrapErr};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// `<cache dir>/featuretour/featuretour.log`, or the temp dir when the
/// platform has no cache directory.
pub fn default_log_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("featuretour")
        .join("featuretour.log")
}

fn open_log(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .wrap_err_with(|| format!("failed to create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .wrap_err_with(|| format!("failed to open log file {}", path.display()))
}

fn filter(verbose: bool) -> Result<EnvFilter> {
    let level = if verbose { "featuretour=debug" } else { "featuretour=info" };
    Ok(EnvFilter::from_default_env().add_directive(level.parse()?))
}

/// Installs the global subscriber writing to `path`.
pub fn init(path: &Path, verbose: bool) -> Result<()> {
    let file = open_log(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter(verbose)?)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_thread_ids(false)
        .init();
    Ok(())
}
