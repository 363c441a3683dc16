// Task service endpoints

use tracing::debug;

use crate::error::Error;
use crate::redfish::client::RedfishClient;
use crate::redfish::models::Collection;
use crate::task::Task;

pub const TASKS_PATH: &str = "/redfish/v1/TaskService/Tasks";

impl RedfishClient {
    /// Member paths of `/redfish/v1/TaskService/Tasks`.
    pub async fn list_task_links(&self) -> Result<Vec<String>, Error> {
        debug!("listing tasks");
        let collection: Collection = self.get_json(TASKS_PATH).await?;
        Ok(collection
            .members
            .into_iter()
            .map(|link| link.odata_id)
            .collect())
    }

    /// GET a task by member path (as listed) or bare identifier.
    pub async fn get_task(&self, id_or_path: &str) -> Result<Task, Error> {
        let path = task_path(id_or_path);
        debug!(path, "fetching task");
        self.get_json(&path).await
    }

    /// `DELETE /redfish/v1/TaskService/Tasks/{id}/Monitor`
    pub async fn cancel_task(&self, id: &str) -> Result<(), Error> {
        let path = format!("{}/Monitor", task_path(id));
        debug!(path, "cancelling task");
        self.delete(&path).await?;
        Ok(())
    }
}

fn task_path(id_or_path: &str) -> String {
    if id_or_path.starts_with('/') {
        id_or_path.trim_end_matches('/').to_owned()
    } else {
        format!("{TASKS_PATH}/{id_or_path}")
    }
}

#[cfg(test)]
mod tests {
    use super::task_path;

    #[test]
    fn bare_ids_are_expanded() {
        assert_eq!(task_path("12"), "/redfish/v1/TaskService/Tasks/12");
        assert_eq!(
            task_path("/redfish/v1/TaskService/Tasks/12/"),
            "/redfish/v1/TaskService/Tasks/12"
        );
    }
}
