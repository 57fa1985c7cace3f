use std::path::PathBuf;

const APP_DIR: &str = "interactive-exercises";
const DB_FILE: &str = "exercises.db";

#[derive(Debug, Clone)]
pub struct Config {
    pub lessons_dir: PathBuf,
    pub data_dir: PathBuf,
    pub log_level: String,
    pub log_file: PathBuf,
}

fn default_data_dir() -> PathBuf {
    if cfg!(target_os = "windows") {
        let home = std::env::var("USERPROFILE").unwrap_or_else(|_| "C:\\Users\\User".to_string());
        PathBuf::from(home).join(".local\\share").join(APP_DIR)
    } else {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/home/user".to_string());
        PathBuf::from(home).join(".local/share").join(APP_DIR)
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let lessons_dir = std::env::var("EXERCISES_LESSONS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("lessons"));

        let data_dir = std::env::var("EXERCISES_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir());

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let log_file = std::env::var("EXERCISES_LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("exercises.log"));

        Self {
            lessons_dir,
            data_dir,
            log_level,
            log_file,
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE)
    }
}
