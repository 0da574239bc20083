use crate::config::{CONFIG_ENV, MotionConfig};
use clap::{ArgAction, Args};
use std::path::PathBuf;

#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Path to a config.toml file
    #[arg(short = 'c', long, value_name = "PATH", env = CONFIG_ENV)]
    pub config: Option<PathBuf>,
    /// Motion API base URL
    #[arg(long = "instance-url", value_name = "URL")]
    pub instance_url: Option<String>,
    /// Motion API key (prefer the MOTION_API_KEY environment variable)
    #[arg(long = "api-key", value_name = "KEY")]
    pub api_key: Option<String>,
    /// Directory for the rotating debug log
    #[arg(long = "log-dir", value_name = "DIR", env = "MOTION_TOOLKIT_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
    /// Do not write the debug log file
    #[arg(long = "no-log-file", action = ArgAction::SetTrue)]
    pub no_log_file: bool,
    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,
    /// Log at debug level
    #[arg(short, long, action = ArgAction::SetTrue)]
    pub verbose: bool,
}

impl CommonArgs {
    pub fn config_path(&self) -> Option<PathBuf> {
        self.config.clone()
    }

    pub fn apply_overrides(&self, config: &mut MotionConfig) {
        if let Some(url) = &self.instance_url {
            config.motion.instance_url = url.clone();
        }

        if let Some(key) = &self.api_key {
            config.motion.api_key = Some(key.clone());
        }

        if let Some(dir) = &self.log_dir {
            config.logging.dir = Some(dir.clone());
        }

        if self.no_log_file {
            config.logging.file = false;
        }

        if let Some(timeout) = self.timeout {
            config.http.timeout_secs = timeout;
        }
    }
}
