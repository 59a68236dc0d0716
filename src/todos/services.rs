use std::sync::Arc;

use axum::extract::FromRef;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{repo::TaskStore, repo_types::Task};
use crate::{
    auth::AuthUser,
    error::{AppError, Result},
    state::AppState,
};

/// Task CRUD on behalf of an authenticated caller.
#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
}

impl FromRef<AppState> for TaskService {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.tasks.clone())
    }
}

fn ensure_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(AppError::EmptyTask);
    }
    Ok(())
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, caller: AuthUser, text: &str) -> Result<Task> {
        ensure_text(text)?;
        let task = self.store.insert(Uuid::new_v4(), caller.0, text).await?;
        debug!(task_id = %task.id, user_id = %caller.0, "task created");
        Ok(task)
    }

    pub async fn list(&self, caller: AuthUser) -> Result<Vec<Task>> {
        Ok(self.store.list_by_owner(caller.0).await?)
    }

    pub async fn update(
        &self,
        caller: AuthUser,
        id: Uuid,
        text: &str,
        completed: bool,
    ) -> Result<Task> {
        ensure_text(text)?;
        if let Some(task) = self.store.update_owned(caller.0, id, text, completed).await? {
            debug!(task_id = %id, completed, "task updated");
            return Ok(task);
        }
        match self.store.owner_of(id).await? {
            Some(_) => {
                warn!(task_id = %id, user_id = %caller.0, "update of foreign task refused");
                Err(AppError::Forbidden)
            }
            None => Err(AppError::NotFound),
        }
    }

    /// Deleting a task that does not exist succeeds.
    pub async fn delete(&self, caller: AuthUser, id: Uuid) -> Result<()> {
        if self.store.delete_owned(caller.0, id).await? {
            debug!(task_id = %id, "task deleted");
            return Ok(());
        }
        match self.store.owner_of(id).await? {
            Some(_) => {
                warn!(task_id = %id, user_id = %caller.0, "delete of foreign task refused");
                Err(AppError::Forbidden)
            }
            None => Ok(()),
        }
    }
}
