//! Manager command handlers.

use secrecy::SecretString;

use rsctl_core::{Controller, Manager};

use crate::cli::{GlobalOpts, ManagerArgs, ManagerCommand};
use crate::error::CliError;
use crate::output::{self, Detail};
use crate::progress;

use super::{certs, network, time, util};

fn manager_detail(m: &Manager) -> String {
    let mut detail = Detail::new()
        .field("Model", m.model.as_deref())
        .field("Serial number", m.serial_number.as_deref())
        .field("Firmware version", m.firmware_version.as_deref());

    if let Some(kvm) = m.kvm_settings() {
        detail = detail
            .section("KVM settings")
            .field("Disable video on KVM idle", kvm.disable_video_on_kvm_idle)
            .field("Disable collaboration", kvm.disable_collaboration)
            .field(
                "Disable collaboration authorization",
                kvm.disable_collaboration_authorization,
            )
            .field("Port range begin", kvm.port_range_begin)
            .field("Port range end", kvm.port_range_end)
            .end_section();
    }
    if let Some(rsm) = m.rsm_binding() {
        detail = detail
            .section("RSM status")
            .field("Binding status", rsm.binding_status.as_deref())
            .field("Organization", rsm.organization.as_deref())
            .end_section();
    }

    detail
        .field("Date and time", m.date_time.as_deref())
        .field("Date and time offset", m.date_time_local_offset.as_deref())
        .build()
}

pub async fn handle(
    controller: &Controller,
    args: ManagerArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ManagerCommand::Get => {
            let manager = controller.manager_info().await?;
            let out = output::render_single(global.output, &manager, manager_detail, |m| {
                output::cell(m.firmware_version.as_deref())
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ManagerCommand::Restart => {
            if !util::confirm("Restart the management controller?", global.yes)? {
                return Ok(());
            }
            controller.restart_manager().await?;
            output::print_status("Manager restarted", global.quiet);
            Ok(())
        }

        ManagerCommand::FactoryReset => {
            if !util::confirm(
                "Reset ALL controller settings to factory defaults? This is destructive.",
                global.yes,
            )? {
                return Ok(());
            }
            controller.factory_reset().await?;
            output::print_status("Manager factory-reset", global.quiet);
            Ok(())
        }

        ManagerCommand::ChangePassword { new_password } => {
            let new_password = match new_password {
                Some(pw) => pw,
                None => util::prompt_new_secret("New password")?,
            };
            if new_password.is_empty() {
                return Err(CliError::Validation {
                    field: "new-password".into(),
                    reason: "must not be empty".into(),
                });
            }
            controller
                .change_password(&SecretString::from(new_password))
                .await?;
            output::print_status("Password changed", global.quiet);
            Ok(())
        }

        ManagerCommand::Update { fw_file } => {
            let image = util::read_binary_file(&fw_file)?;
            let file_name = fw_file
                .file_name()
                .map_or_else(|| "firmware.bin".to_owned(), |n| n.to_string_lossy().into_owned());
            if !util::confirm(
                &format!("Flash '{file_name}' to the management controller?"),
                global.yes,
            )? {
                return Ok(());
            }

            output::print_status("Uploading firmware and monitoring the update...", global.quiet);
            let mut sink = progress::sink(global.quiet);
            controller
                .update_firmware(&file_name, image, &mut *sink)
                .await?;
            output::print_status("Firmware updated", global.quiet);
            Ok(())
        }

        ManagerCommand::Network(args) => network::handle(controller, args, global).await,
        ManagerCommand::Time(args) => time::handle(controller, args, global).await,
        ManagerCommand::Cert(args) => certs::handle_https(controller, args, global).await,
        ManagerCommand::TrustedCert(args) => certs::handle_trusted(controller, args, global).await,
    }
}
