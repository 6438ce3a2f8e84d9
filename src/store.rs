// File: src/store.rs
use crate::model::{Priority, Task, TaskDraft, TaskStatus};
use anyhow::{Result, anyhow, bail};
use std::sync::Mutex;

/// CRUD over tasks. Drafts are validated before anything is written.
pub trait TaskStore {
    fn create(&self, draft: TaskDraft) -> Result<Task>;
    fn get(&self, id: &str) -> Result<Option<Task>>;
    /// Newest first.
    fn list(&self, filter: &TaskFilter) -> Result<Vec<Task>>;
    fn update(&self, id: &str, draft: TaskDraft) -> Result<Option<Task>>;
    fn delete(&self, id: &str) -> Result<bool>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub search: Option<String>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(status) = self.status
            && task.status != status
        {
            return false;
        }
        if let Some(priority) = self.priority
            && task.priority != priority
        {
            return false;
        }
        match &self.search {
            Some(q) => task.matches_search_term(q),
            None => true,
        }
    }

    pub fn apply(&self, tasks: &[Task]) -> Vec<Task> {
        let mut out: Vec<Task> = tasks.iter().filter(|t| self.matches(t)).cloned().collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        out
    }
}

/// Accepts a full id or any unique prefix of one. A blank id never matches.
pub fn resolve_id<S: TaskStore + ?Sized>(store: &S, given: &str) -> Result<String> {
    let given = given.trim();
    if given.is_empty() {
        bail!("Task id is required");
    }
    if store.get(given)?.is_some() {
        return Ok(given.to_string());
    }
    let matches: Vec<String> = store
        .list(&TaskFilter::default())?
        .into_iter()
        .filter(|t| t.id.starts_with(given))
        .map(|t| t.id)
        .collect();
    match matches.as_slice() {
        [id] => Ok(id.clone()),
        [] => bail!("Task not found: {}", given),
        _ => bail!("Ambiguous id '{}' matches {} tasks", given, matches.len()),
    }
}

pub(crate) fn validated(mut draft: TaskDraft) -> Result<TaskDraft> {
    draft.validate()?;
    Ok(draft)
}

/// Process-local store, for callers that don't need persistence.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tasks: Mutex<Vec<Task>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_tasks<T>(&self, f: impl FnOnce(&mut Vec<Task>) -> T) -> Result<T> {
        let mut guard = self
            .tasks
            .lock()
            .map_err(|_| anyhow!("task store lock poisoned"))?;
        Ok(f(&mut guard))
    }
}

impl TaskStore for MemoryStore {
    fn create(&self, draft: TaskDraft) -> Result<Task> {
        let task = Task::from_draft(validated(draft)?);
        self.with_tasks(|tasks| tasks.push(task.clone()))?;
        Ok(task)
    }

    fn get(&self, id: &str) -> Result<Option<Task>> {
        self.with_tasks(|tasks| tasks.iter().find(|t| t.id == id).cloned())
    }

    fn list(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        self.with_tasks(|tasks| filter.apply(tasks))
    }

    fn update(&self, id: &str, draft: TaskDraft) -> Result<Option<Task>> {
        let draft = validated(draft)?;
        self.with_tasks(|tasks| {
            tasks.iter_mut().find(|t| t.id == id).map(|t| {
                t.apply_draft(draft);
                t.clone()
            })
        })
    }

    fn delete(&self, id: &str) -> Result<bool> {
        self.with_tasks(|tasks| {
            let before = tasks.len();
            tasks.retain(|t| t.id != id);
            tasks.len() != before
        })
    }
}
