//! JSON persistence for the task collection.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::task::Task;

pub const DEFAULT_TASKS_FILE: &str = "tasks.json";

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Reads and writes tasks to a single JSON file.
#[derive(Clone, Debug)]
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the saved tasks.
    ///
    /// A missing file yields an empty list. A file that does not parse is
    /// moved aside to `<name>_old.<ext>` and also yields an empty list, so a
    /// later save cannot overwrite it.
    pub fn load(&self) -> Result<Vec<Task>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::info!("no saved tasks at {}", self.path.display());
                return Ok(Vec::new());
            }
            Err(err) => return Err(StoreError::io(&self.path, err)),
        };

        match serde_json::from_str(&contents) {
            Ok(tasks) => Ok(tasks),
            Err(err) => {
                let backup = backup_path(&self.path);
                log::warn!("corrupt task file {}: {err}", self.path.display());
                if let Err(rename_err) = fs::rename(&self.path, &backup) {
                    log::warn!(
                        "failed to back up '{}' to '{}': {}",
                        self.path.display(),
                        backup.display(),
                        rename_err
                    );
                } else {
                    log::info!("backed up corrupt task file to '{}'", backup.display());
                }
                Ok(Vec::new())
            }
        }
    }

    pub fn save(&self, tasks: &[Task]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| StoreError::io(parent, err))?;
        }
        let json = serde_json::to_string_pretty(tasks)?;
        fs::write(&self.path, json).map_err(|err| StoreError::io(&self.path, err))?;
        log::debug!("saved {} tasks to {}", tasks.len(), self.path.display());
        Ok(())
    }
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new(DEFAULT_TASKS_FILE)
    }
}

/// `dir/tasks.json` becomes `dir/tasks_old.json`.
pub fn backup_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}_old.{}", ext.to_string_lossy()),
        None => format!("{stem}_old"),
    };
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskStatus;

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::new(dir.path().join("tasks.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_keeps_order_and_status() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::new(dir.path().join("nested/tasks.json"));
        let tasks = vec![
            Task::new("b", "second", 20, 2),
            Task::new("a", "first", 10, 1).with_status(TaskStatus::Done),
        ];

        store.save(&tasks).unwrap();

        assert_eq!(store.load().unwrap(), tasks);
    }

    #[test]
    fn corrupt_file_is_backed_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(&path, "{not json").unwrap();
        let store = TaskStore::new(&path);

        assert!(store.load().unwrap().is_empty());

        let backup = dir.path().join("tasks_old.json");
        assert_eq!(fs::read_to_string(backup).unwrap(), "{not json");
        assert!(!path.exists());
    }

    #[test]
    fn backup_name_without_extension() {
        assert_eq!(
            backup_path(Path::new("data/tasks")),
            PathBuf::from("data/tasks_old")
        );
    }
}
