//! Config subcommand handlers. These never contact a controller.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = rsctl_config::load_config()?;
            let out = match global.output {
                OutputFormat::Table | OutputFormat::Plain => rsctl_config::render_redacted(&cfg)?,
                format => {
                    let redacted = cfg.redacted();
                    output::render_single(format, &redacted, |_| String::new(), |_| String::new())?
                }
            };
            output::print_output(out.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&rsctl_config::config_path().display().to_string(), false);
            Ok(())
        }
    }
}
