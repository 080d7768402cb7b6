//! Runtime configuration
//!
//! Everything comes from environment variables with project-relative defaults.

use std::path::PathBuf;

pub const DATABASE_PATH_VAR: &str = "RECIPE_MANAGER_DATABASE_PATH";
pub const IMAGES_DIR_VAR: &str = "RECIPE_MANAGER_IMAGES_DIR";

/// Resolved paths for a running server
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub images_dir: PathBuf,
}

impl Config {
    /// Read configuration from the environment
    pub fn from_env() -> Self {
        let database_path = std::env::var(DATABASE_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir().join("recipes.db"));

        let images_dir = std::env::var(IMAGES_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| images_dir_for(&database_path));

        Self {
            database_path,
            images_dir,
        }
    }
}

/// `images/` next to the database file
pub fn images_dir_for(database_path: &std::path::Path) -> PathBuf {
    database_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
        .join("images")
}

/// `<project>/data`, found by walking up out of target/{debug,release}
fn default_data_dir() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
            path = grandparent.to_path_buf();
        }
    }

    path.push("data");
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_images_dir_sits_next_to_database() {
        assert_eq!(
            images_dir_for(Path::new("/srv/recipes/data/recipes.db")),
            PathBuf::from("/srv/recipes/data/images")
        );
    }

    #[test]
    fn test_default_data_dir_ends_in_data() {
        assert!(default_data_dir().ends_with("data"));
    }
}
