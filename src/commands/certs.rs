//! Campus network certificates

use anyhow::Result;
use clap::ValueEnum;
use std::io::Write;

use super::executor::ShellScript;
use super::labels::Labels;
use super::runner::Session;
use crate::constants::{CERTS_BROWSER_SCRIPT, CERTS_SYSTEM_SCRIPT, OPENSSL_CONF};

const STEPS: &str = "
    System initialization
    Patching openssl configuration
    Updating system certificates
    Updating browser certificates";

const DONE: &str = "Certificate installation is complete. If any step above
    shows a red \"X\", rerun this command once the network is reachable.";

/// Where the certificates are installed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CertMode {
    /// OpenSSL configuration and the system trust store
    System,
    /// Browser certificate databases
    Browser,
}

impl CertMode {
    fn script_url(self) -> &'static str {
        match self {
            CertMode::System => CERTS_SYSTEM_SCRIPT,
            CertMode::Browser => CERTS_BROWSER_SCRIPT,
        }
    }
}

pub async fn run<W: Write>(session: &mut Session<'_, W>, mode: CertMode) -> Result<()> {
    let env = session.env;
    session.clear();
    let mut labels = Labels::new(STEPS);
    session.acquire_sudo().await?;

    session.begin(&mut labels)?;
    session.pass()?;

    if mode == CertMode::System {
        session.begin(&mut labels)?;
        let cmd = format!(
            "sudo cp -f {} {}",
            env.system.join("openssl.cnf").display(),
            OPENSSL_CONF
        );
        let outcome = session.exec.run_one_command(&cmd).await;
        session.report(outcome)?;
    } else {
        labels.pop_first()?;
    }

    // Only one of the two certificate labels applies
    match mode {
        CertMode::System => labels.pop_last()?,
        CertMode::Browser => labels.pop_first()?,
    };

    session.begin(&mut labels)?;
    let outcome = session
        .exec
        .run_shell_script(mode.script_url(), &ShellScript::default())
        .await;
    session.report(outcome)?;

    session.finish(DONE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{checklist, dry_env, dry_session};

    #[tokio::test]
    async fn test_system_mode_steps() {
        let dir = tempfile::tempdir().unwrap();
        let env = dry_env(dir.path());
        let mut session = dry_session(&env);

        run(&mut session, CertMode::System).await.unwrap();

        let lines = checklist(session);
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("Patching openssl configuration"));
        assert!(lines[2].starts_with("Updating system certificates"));
    }

    #[tokio::test]
    async fn test_browser_mode_skips_openssl_patch() {
        let dir = tempfile::tempdir().unwrap();
        let env = dry_env(dir.path());
        let mut session = dry_session(&env);

        run(&mut session, CertMode::Browser).await.unwrap();

        let lines = checklist(session);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("System initialization"));
        // Width still comes from the full label list
        assert_eq!(lines[1], format!("{:.<33}\u{2714}", "Updating browser certificates"));
    }
}
