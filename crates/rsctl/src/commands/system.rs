//! Host system command handlers.

use rsctl_core::{Controller, PowerAction, SystemInfo};

use crate::cli::{GlobalOpts, PowerState, SystemArgs, SystemCommand};
use crate::error::CliError;
use crate::output::{self, Detail};
use crate::progress;

impl From<PowerState> for PowerAction {
    fn from(state: PowerState) -> Self {
        match state {
            PowerState::On => Self::On,
            PowerState::GracefulShutdown => Self::GracefulShutdown,
            PowerState::ForceOff => Self::ForceOff,
            PowerState::GracefulRestart => Self::GracefulRestart,
            PowerState::ForceRestart => Self::ForceRestart,
        }
    }
}

fn system_detail(info: &SystemInfo) -> String {
    let s = &info.system;
    let oem = s.oem_hp();
    let blink = s.blink_code();

    Detail::new()
        .field("Model", s.model.as_deref())
        .field("Serial number", s.serial_number.as_deref())
        .field("Power state", s.power_state.as_deref())
        .field("Indicator LED", s.indicator_led.as_deref())
        .field(
            "Boot override target",
            s.boot
                .as_ref()
                .and_then(|b| b.boot_source_override_target.as_deref()),
        )
        .section("Status")
        .field("Health", s.status.as_ref().and_then(|st| st.health.as_deref()))
        .field("State", s.status.as_ref().and_then(|st| st.state.as_deref()))
        .end_section()
        .section("Processors")
        .field("Model", s.processor_summary.as_ref().and_then(|p| p.model.as_deref()))
        .field("Count", s.processor_summary.as_ref().and_then(|p| p.count))
        .field("Cores", s.processor_summary.as_ref().and_then(|p| p.core_count))
        .end_section()
        .field(
            "Memory (GiB)",
            s.memory_summary
                .as_ref()
                .and_then(|m| m.total_system_memory_gib),
        )
        .field(
            "Main board adapter",
            oem.and_then(|o| o.main_board_adapter_state.as_deref()),
        )
        .field("Boot state", oem.and_then(|o| o.boot_state.as_deref()))
        .section("Blink code")
        .field("Type", blink.and_then(|b| b.kind.as_deref()))
        .field("Major", blink.and_then(|b| b.major.as_ref()))
        .field("Minor", blink.and_then(|b| b.minor.as_ref()))
        .field("Message", info.blink_message.as_deref())
        .build()
}

pub async fn handle(
    controller: &Controller,
    args: SystemArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SystemCommand::Get => {
            let info = controller.system_info().await?;
            let out = output::render_single(global.output, &info, system_detail, |i| {
                output::cell(i.system.power_state.as_deref())
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SystemCommand::Power { state } => {
            let action = PowerAction::from(state);
            output::print_status(
                "Sending power command and monitoring response...",
                global.quiet,
            );
            let mut sink = progress::sink(global.quiet);
            controller.set_power(action, &mut *sink).await?;
            output::print_status(&format!("Power command '{action}' succeeded."), global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn power_states_map_to_reset_types() {
        assert_eq!(PowerAction::from(PowerState::On).as_ref(), "On");
        assert_eq!(
            PowerAction::from(PowerState::GracefulShutdown).as_ref(),
            "GracefulShutdown"
        );
        assert_eq!(PowerAction::from(PowerState::ForceRestart).to_string(), "ForceRestart");
    }
}
