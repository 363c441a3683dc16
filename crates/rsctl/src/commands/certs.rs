//! HTTPS and trusted certificate handlers.

use tabled::Tabled;

use rsctl_core::{Certificate, Controller};

use crate::cli::{
    CertArgs, CertCommand, GlobalOpts, OutputFormat, TrustedCertArgs, TrustedCertCommand,
};
use crate::error::CliError;
use crate::output::{self, Detail};

use super::util;

// ── Table row ────────────────────────────────────────────────────────

#[derive(Tabled)]
struct CertRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Valid Until")]
    valid_not_after: String,
    #[tabled(rename = "Fingerprint")]
    fingerprint: String,
}

impl From<&Certificate> for CertRow {
    fn from(c: &Certificate) -> Self {
        Self {
            id: output::cell(c.id.as_deref()),
            kind: output::cell(c.certificate_type.as_deref()),
            valid_not_after: output::cell(c.valid_not_after.as_deref()),
            fingerprint: output::cell(c.fingerprint.as_deref()),
        }
    }
}

fn cert_detail(c: &Certificate) -> String {
    let mut text = Detail::new()
        .field("ID", c.id.as_deref())
        .field("Type", c.certificate_type.as_deref())
        .field("Valid until", c.valid_not_after.as_deref())
        .field("Fingerprint", c.fingerprint.as_deref())
        .build();
    if let Some(pem) = c.certificate_string.as_deref() {
        text.push('\n');
        text.push_str(pem.trim_end());
    }
    text
}

fn cert_id(c: &Certificate) -> String {
    output::cell(c.id.as_deref())
}

// ── Handlers ─────────────────────────────────────────────────────────

pub async fn handle_https(
    controller: &Controller,
    args: CertArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        CertCommand::Get => {
            let cert = controller.https_certificate().await?;
            let out = output::render_single(global.output, &cert, cert_detail, |c| {
                output::cell(c.certificate_string.as_deref())
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CertCommand::Replace {
            cert_file,
            key_file,
        } => {
            let cert = util::read_text_file(&cert_file)?;
            let key = util::read_text_file(&key_file)?;
            controller.replace_https_certificate(&cert, &key).await?;
            output::print_status("Certificate replaced", global.quiet);
            Ok(())
        }
    }
}

pub async fn handle_trusted(
    controller: &Controller,
    args: TrustedCertArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        TrustedCertCommand::List => {
            let certs = controller.trusted_certificates().await?;
            if certs.is_empty() && matches!(global.output, OutputFormat::Table) {
                output::print_status("No trusted certificates installed.", global.quiet);
                return Ok(());
            }
            let out = output::render_list(
                global.output,
                &certs,
                |c| CertRow::from(c),
                cert_id,
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TrustedCertCommand::Add { cert_file } => {
            let pem = util::read_text_file(&cert_file)?;
            controller.add_trusted_certificate(&pem).await?;
            output::print_status("Trusted certificate added", global.quiet);
            Ok(())
        }

        TrustedCertCommand::Delete { cert_id } => {
            if !util::confirm(&format!("Delete trusted certificate '{cert_id}'?"), global.yes)? {
                return Ok(());
            }
            controller.delete_trusted_certificate(&cert_id).await?;
            output::print_status("Trusted certificate deleted", global.quiet);
            Ok(())
        }
    }
}
