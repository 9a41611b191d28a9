//! Multipass instance initialization

use anyhow::Result;
use std::io::Write;

use super::labels::Labels;
use super::runner::Session;
use super::server::{add_to_sudoers, create_user, patch_ssh_login};
use super::NewAccount;

/// Create the working account on a fresh Multipass instance and enable
/// password logins over ssh
pub async fn initialize<W: Write>(session: &mut Session<'_, W>, account: &NewAccount) -> Result<()> {
    session.clear();
    let mut labels = Labels::new(&format!(
        "System initialization
        Creating user {user}
        Adding user {user} to sudoers
        Installing nala
        Installing zsh
        Enabling remote login with ssh",
        user = account.user
    ));

    session.acquire_sudo().await?;

    session.begin(&mut labels)?;
    session.pass()?;

    session.begin(&mut labels)?;
    let outcome = create_user(session, account).await;
    session.report(outcome)?;

    session.begin(&mut labels)?;
    let outcome = add_to_sudoers(session, &account.user).await;
    session.report(outcome)?;

    for package in ["nala", "zsh"] {
        session.begin(&mut labels)?;
        let cmd = format!("sudo apt install {} -y", package);
        let outcome = session.exec.run_one_command(&cmd).await;
        session.report(outcome)?;
    }

    session.begin(&mut labels)?;
    let outcome = patch_ssh_login(session).await;
    session.report(outcome)?;

    session.finish(&format!(
        "Initialization script is complete. If all steps above are marked
        with green checkmarks, the multipass Ubuntu instance is ready to go.
        You must reboot your VM instance now for the changes to take effect.
        Log back in as {} and run \"vmsetup server-configure\". If any steps
        above show a red \"X\", there was an error during installation.",
        account.user
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{checklist, dry_env, dry_session};

    #[tokio::test]
    async fn test_initialize_dry_run() {
        let dir = tempfile::tempdir().unwrap();
        let env = dry_env(dir.path());
        let mut session = dry_session(&env);
        let account = NewAccount {
            user: "plebe".to_string(),
            passwd: "beatarmy".to_string(),
        };

        initialize(&mut session, &account).await.unwrap();

        let lines = checklist(session);
        assert_eq!(
            lines,
            vec![
                "System initialization............\u{2714}",
                "Creating user plebe..............\u{2714}",
                "Adding user plebe to sudoers.....\u{2714}",
                "Installing nala..................\u{2714}",
                "Installing zsh...................\u{2714}",
                "Enabling remote login with ssh...\u{2714}",
            ]
        );
    }
}
