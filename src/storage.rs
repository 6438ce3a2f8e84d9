// File: ./src/storage.rs
// Local JSON persistence for tasks, plus the locking/atomic-write helpers
// shared with the config file.
use crate::context::AppContext;
use crate::model::{Task, TaskDraft};
use crate::store::{TaskFilter, TaskStore, validated};
use anyhow::{Context, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const LOCAL_STORAGE_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct LocalStorageData {
    version: u32,
    tasks: Vec<Task>,
}

/// All tasks in one `tasks.json` document under the data directory.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    pub fn open(ctx: &dyn AppContext) -> Result<Self> {
        Ok(Self {
            path: ctx.get_tasks_path()?,
        })
    }

    fn get_lock_path(file_path: &Path) -> PathBuf {
        let mut lock_path = file_path.to_path_buf();
        if let Some(ext) = lock_path.extension() {
            let mut ext = ext.to_os_string();
            ext.push(".lock");
            lock_path.set_extension(ext);
        } else {
            lock_path.set_extension("lock");
        }
        lock_path
    }

    /// Runs `f` while holding an exclusive lock on `<file>.lock`.
    pub fn with_lock<F, T>(file_path: &Path, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let lock_path = Self::get_lock_path(file_path);
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file {:?}", lock_path))?;

        file.lock_exclusive()?;
        let result = f();
        FileExt::unlock(&file)?;
        result
    }

    /// Atomic write: Write to .tmp file then rename
    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
        let path = path.as_ref();
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, contents)?;
        fs::rename(tmp_path, path)?;
        Ok(())
    }

    fn read_unlocked(&self) -> Result<Vec<Task>> {
        if !self.path.exists() {
            return Ok(vec![]);
        }
        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {:?}", self.path))?;
        if json.trim().is_empty() {
            return Ok(vec![]);
        }
        let data: LocalStorageData = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse {:?}", self.path))?;
        if data.version > LOCAL_STORAGE_VERSION {
            anyhow::bail!(
                "{:?} was written by a newer version (v{}, this build reads v{})",
                self.path,
                data.version,
                LOCAL_STORAGE_VERSION
            );
        }
        Ok(data.tasks)
    }

    fn write_unlocked(&self, tasks: Vec<Task>) -> Result<()> {
        let data = LocalStorageData {
            version: LOCAL_STORAGE_VERSION,
            tasks,
        };
        let json = serde_json::to_string_pretty(&data)?;
        Self::atomic_write(&self.path, json)
    }

    pub fn load(&self) -> Result<Vec<Task>> {
        Self::with_lock(&self.path, || self.read_unlocked())
    }

    /// Read-modify-write under one lock.
    fn modify<T>(&self, f: impl FnOnce(&mut Vec<Task>) -> T) -> Result<T> {
        Self::with_lock(&self.path, || {
            let mut tasks = self.read_unlocked()?;
            let out = f(&mut tasks);
            self.write_unlocked(tasks)?;
            Ok(out)
        })
    }
}

impl TaskStore for LocalStore {
    fn create(&self, draft: TaskDraft) -> Result<Task> {
        let task = Task::from_draft(validated(draft)?);
        let stored = task.clone();
        self.modify(move |tasks| tasks.push(stored))?;
        log::info!("Created task {} ({:?})", task.id, task.title);
        Ok(task)
    }

    fn get(&self, id: &str) -> Result<Option<Task>> {
        Ok(self.load()?.into_iter().find(|t| t.id == id))
    }

    fn list(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        Ok(filter.apply(&self.load()?))
    }

    fn update(&self, id: &str, draft: TaskDraft) -> Result<Option<Task>> {
        let draft = validated(draft)?;
        let updated = self.modify(|tasks| {
            tasks.iter_mut().find(|t| t.id == id).map(|t| {
                t.apply_draft(draft);
                t.clone()
            })
        })?;
        if let Some(t) = &updated {
            log::info!("Updated task {}", t.id);
        }
        Ok(updated)
    }

    fn delete(&self, id: &str) -> Result<bool> {
        let removed = self.modify(|tasks| {
            let before = tasks.len();
            tasks.retain(|t| t.id != id);
            tasks.len() != before
        })?;
        if removed {
            log::info!("Deleted task {}", id);
        }
        Ok(removed)
    }
}
