// ── Task service operations ──

use tracing::info;

use rsctl_api::Task;

use crate::controller::Controller;
use crate::error::CoreError;

impl Controller {
    /// Every task in the collection, optionally only the running ones.
    pub async fn list_tasks(&self, running_only: bool) -> Result<Vec<Task>, CoreError> {
        let links = self.client().list_task_links().await?;
        let mut tasks = Vec::with_capacity(links.len());
        for link in links {
            let task = self.client().get_task(&link).await?;
            if !running_only || task.is_running() {
                tasks.push(task);
            }
        }
        Ok(tasks)
    }

    pub async fn get_task(&self, id: &str) -> Result<Task, CoreError> {
        if id.trim().is_empty() {
            return Err(CoreError::Format {
                message: "task ID must not be empty".into(),
            });
        }
        Ok(self.client().get_task(id).await?)
    }

    /// Delete the task's monitor, which cancels the task.
    pub async fn cancel_task(&self, id: &str) -> Result<(), CoreError> {
        if id.trim().is_empty() {
            return Err(CoreError::Format {
                message: "task ID must not be empty".into(),
            });
        }
        self.client().cancel_task(id).await?;
        info!(id, "task cancelled");
        Ok(())
    }
}
