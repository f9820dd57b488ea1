use std::path::PathBuf;

use directories::ProjectDirs;

const APP_NAME: &str = "mindgym";

/// Where mindgym keeps its files on this machine
pub struct AppDirs;

impl AppDirs {
    fn project() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", APP_NAME)
    }

    /// `$HOME/.local/state/mindgym`, or the platform data-local dir without a HOME
    pub fn state_dir() -> Option<PathBuf> {
        match std::env::var_os("HOME") {
            Some(home) => Some(PathBuf::from(home).join(".local/state").join(APP_NAME)),
            None => Self::project().map(|dirs| dirs.data_local_dir().to_path_buf()),
        }
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::project().map(|dirs| dirs.config_dir().join("config.json"))
    }

    pub fn highscores_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("highscores.json"))
    }

    pub fn log_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join(format!("{APP_NAME}.log")))
    }
}
