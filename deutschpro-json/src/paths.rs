use directories::ProjectDirs;
use std::path::{Path, PathBuf};

pub const STORE_FILE: &str = "lexicon.json";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "deutschpro", "DeutschPro")
}

pub fn data_root() -> PathBuf {
    if let Some(pd) = project_dirs() {
        pd.data_dir().to_path_buf()
    } else {
        // Fallback: current dir
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    }
}

pub fn config_root() -> PathBuf {
    if let Some(pd) = project_dirs() {
        pd.config_dir().to_path_buf()
    } else {
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    }
}

/// Store file and backups dir under `root`.
pub fn store_files_in(root: &Path) -> (PathBuf, PathBuf) {
    (root.join(STORE_FILE), root.join("backups"))
}

pub fn default_store_file() -> (PathBuf, PathBuf) {
    store_files_in(&data_root())
}
