use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "eotrack.yaml";
pub const DEFAULT_DATA_FILE: &str = "src/data.json";

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Resolve the dataset location. Relative paths are taken from the project root.
pub fn data_path(root: &Path, data_file: &Path) -> PathBuf {
    if data_file.is_absolute() {
        data_file.to_path_buf()
    } else {
        root.join(data_file)
    }
}
