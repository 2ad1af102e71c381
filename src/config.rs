use std::env;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_NOTEBOOK: &str = "Inbox";
const LOG_ENV: &str = "QUICK_NOTEBOOKS_LOG";

/// Settings read from the environment once per invocation.
#[derive(Debug, Clone)]
pub struct Config {
    pub dir: PathBuf,
    pub use_color: bool,
    pub default_notebook: String,
    pub editor: String,
}

impl Config {
    pub fn from_env() -> io::Result<Self> {
        let default_notebook = env::var("QUICK_NOTEBOOKS_DEFAULT")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_NOTEBOOK.to_string());
        Ok(Self {
            dir: notes_dir()?,
            use_color: env::var("NO_COLOR").is_err(),
            default_notebook,
            editor: env::var("EDITOR").unwrap_or_else(|_| "vi".to_string()),
        })
    }
}

fn notes_dir() -> io::Result<PathBuf> {
    if let Ok(dir) = env::var("QUICK_NOTEBOOKS_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let home = env::var("HOME").map_err(|_| {
        io::Error::other("HOME not set; set QUICK_NOTEBOOKS_DIR explicitly")
    })?;
    Ok(PathBuf::from(home).join(".quick_notebooks"))
}

/// Install a stderr subscriber filtered by `QUICK_NOTEBOOKS_LOG` (default
/// `warn`). A second call is a no-op.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}
