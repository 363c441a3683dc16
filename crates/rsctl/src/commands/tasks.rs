//! Task service command handlers.

use tabled::Tabled;

use rsctl_core::{Controller, Task};

use crate::cli::{GlobalOpts, TasksArgs, TasksCommand};
use crate::error::CliError;
use crate::output::{self, Detail};

use super::util;

// ── Table row ────────────────────────────────────────────────────────

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "%")]
    percent: String,
    #[tabled(rename = "Started")]
    started: String,
}

impl From<&Task> for TaskRow {
    fn from(t: &Task) -> Self {
        Self {
            id: output::cell(t.id.as_deref()),
            name: output::cell(t.name.as_deref()),
            state: output::cell(t.task_state),
            status: output::cell(t.task_status.as_deref()),
            percent: output::cell(t.percent_complete),
            started: output::cell(t.start_time.as_deref()),
        }
    }
}

fn task_detail(t: &Task) -> String {
    let messages: Vec<&str> = t
        .messages
        .iter()
        .filter_map(|m| m.message.as_deref().or(m.message_id.as_deref()))
        .collect();

    Detail::new()
        .field("ID", t.id.as_deref())
        .field("Name", t.name.as_deref())
        .field("State", t.task_state)
        .field("Status", t.task_status.as_deref())
        .field("Percent complete", t.percent_complete)
        .field("Start time", t.start_time.as_deref())
        .field("End time", t.end_time.as_deref())
        .field("Task monitor", t.task_monitor.as_deref())
        .section("Messages")
        .items(&messages)
        .build()
}

fn task_key(t: &Task) -> String {
    output::cell(t.id.as_deref())
}

pub async fn handle(
    controller: &Controller,
    args: TasksArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        TasksCommand::List { running } => {
            let tasks = controller.list_tasks(running).await?;
            let out = output::render_list(
                global.output,
                &tasks,
                |t| TaskRow::from(t),
                task_key,
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TasksCommand::Get { task_id } => {
            let task = controller.get_task(&task_id).await?;
            let out = output::render_single(global.output, &task, task_detail, task_key)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TasksCommand::Cancel { task_id } => {
            if !util::confirm(&format!("Cancel task '{task_id}'?"), global.yes)? {
                return Ok(());
            }
            controller.cancel_task(&task_id).await?;
            output::print_status("Task deleted", global.quiet);
            Ok(())
        }
    }
}
