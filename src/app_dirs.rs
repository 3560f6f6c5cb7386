use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "hangman";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", APP_NAME)
            .map(|proj_dirs| proj_dirs.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("hangman_config.json"))
    }

    /// Log file location; stderr is owned by the terminal UI
    pub fn log_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join(APP_NAME);
            Some(state_dir.join("hangman.log"))
        } else {
            ProjectDirs::from("", "", APP_NAME)
                .map(|proj_dirs| proj_dirs.data_local_dir().join("hangman.log"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_path_is_json() {
        let path = AppDirs::config_path();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("json"));
    }

    #[test]
    fn log_path_names_log_file() {
        if let Some(path) = AppDirs::log_path() {
            assert_eq!(
                path.file_name().and_then(|n| n.to_str()),
                Some("hangman.log")
            );
        }
    }
}
