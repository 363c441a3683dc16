//! Time command handlers.

use rsctl_core::{Controller, TimeDelta, TimeSettings};

use crate::cli::{GlobalOpts, TimeArgs, TimeCommand};
use crate::error::CliError;
use crate::output::{self, Detail};
use crate::progress;

use super::util;

fn time_detail(t: &TimeSettings) -> String {
    Detail::new()
        .field("Date and time", t.date_time.as_deref())
        .field("Date and time offset", t.offset.as_deref())
        .section("NTP")
        .field("Enabled", Some(t.ntp_enabled))
        .section("Servers")
        .items(&t.ntp_servers)
        .build()
}

pub async fn handle(
    controller: &Controller,
    args: TimeArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        TimeCommand::Get => {
            let settings = controller.time_settings().await?;
            let out = output::render_single(global.output, &settings, time_detail, |t| {
                output::cell(t.date_time.as_deref())
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TimeCommand::Set {
            time,
            offset,
            ntp,
            ntp_servers,
        } => {
            let delta = TimeDelta {
                ntp: util::toggle(ntp),
                ntp_servers,
                date_time: time,
                offset,
            };
            let mut sink = progress::sink(global.quiet);
            let plan = controller.update_time(&delta, &mut *sink).await?;
            if plan.is_empty() {
                output::print_status("Nothing to change", global.quiet);
            } else {
                output::print_status("Time settings updated", global.quiet);
            }
            Ok(())
        }
    }
}
