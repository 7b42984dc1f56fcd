use std::{
    env,
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{Context, Result};
use chrono::Local;
use log::LevelFilter;

pub const LOG_FILE_ENV: &str = "TASKLIST_LOG_FILE";
pub const LOG_LEVEL_ENV: &str = "TASKLIST_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// No file means no logger; the terminal belongs to the UI.
    pub file: Option<PathBuf>,
    pub level: LevelFilter,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: None,
            level: LevelFilter::Info,
        }
    }
}

impl LogConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(
            env::var(LOG_FILE_ENV).ok().as_deref(),
            env::var(LOG_LEVEL_ENV).ok().as_deref(),
        )
    }

    fn from_vars(file: Option<&str>, level: Option<&str>) -> Result<Self> {
        let file = file
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(PathBuf::from);
        let level = match level.map(str::trim).filter(|l| !l.is_empty()) {
            Some(raw) => LevelFilter::from_str(raw)
                .with_context(|| format!("invalid {LOG_LEVEL_ENV} value {raw:?}"))?,
            None => LevelFilter::Info,
        };
        Ok(Self { file, level })
    }
}

pub fn init_logger(config: &LogConfig) -> Result<()> {
    let Some(path) = &config.file else {
        return Ok(());
    };
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating log directory {}", dir.display()))?;
    }
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    env_logger::Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{}/{}:{} {} [{}] - {}",
                record.module_path().unwrap_or("unknown"),
                basename(record.file().unwrap_or("unknown")),
                record.line().unwrap_or(0),
                Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.level(),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, config.level)
        .try_init()
        .context("installing logger")?;
    Ok(())
}

fn basename(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
}
