//! Server VM initialization and configuration
//!
//! `initialize` runs as the image's default account and creates the working
//! account; `configure` runs afterwards as that account.

use anyhow::Result;
use std::io::Write;
use std::path::Path;

use super::executor::{quote_arg, RunOptions};
use super::files::CopyTarget;
use super::labels::Labels;
use super::runner::Session;
use super::{shell, NewAccount, Outcome};
use crate::constants::{CLOUD_INIT_SUDOERS, SSHD_CONFIG_DIR, SSH_CLOUD_IMAGE_CONF};
use crate::system;

const CONFIGURE_STEPS: &str = "
    System initialization
    Creating new directories
    Setting up vim
    Installing OhMyZsh
    Installing OhMyZsh Full-autoupdate
    Installing powerlevel10k theme
    Copying dot files";

const CONFIGURE_DONE: &str = "Setup script is complete. If all steps above are
    marked with green checkmarks, the Ubuntu instance is ready to go. Change
    your shell to \"/bin/zsh\" using the \"chsh\" command. Logout and log back
    in and you should be all set. If any steps above show a red \"X\", there
    was an error during installation.";

/// Create the account, grant passwordless sudo and open ssh to password logins
pub async fn initialize<W: Write>(session: &mut Session<'_, W>, account: &NewAccount) -> Result<()> {
    session.clear();
    let mut labels = Labels::new(&format!(
        "System initialization
        Creating user {user}
        Adding user {user} to sudoers
        Turn off password for {user} when using sudo
        Installing zsh
        Enabling remote login with ssh",
        user = account.user
    ));

    session.begin(&mut labels)?;
    session.pass()?;

    session.begin(&mut labels)?;
    let outcome = create_user(session, account).await;
    session.report(outcome)?;

    session.begin(&mut labels)?;
    let outcome = add_to_sudoers(session, &account.user).await;
    session.report(outcome)?;

    session.begin(&mut labels)?;
    let cmd = format!(
        "sudo sh -c 'echo \"{} ALL=(ALL) NOPASSWD:ALL\" >> {}'",
        account.user, CLOUD_INIT_SUDOERS
    );
    let outcome = session.exec.run_one_command(&cmd).await;
    session.report(outcome)?;

    session.begin(&mut labels)?;
    let outcome = session.exec.run_one_command("sudo apt install zsh -y").await;
    session.report(outcome)?;

    // Only cloud images ship the drop-in that disables password logins
    session.begin(&mut labels)?;
    let outcome = if system::is_cloud_image(Path::new(SSHD_CONFIG_DIR), SSH_CLOUD_IMAGE_CONF) {
        patch_ssh_login(session).await
    } else {
        Outcome::Pass
    };
    session.report(outcome)?;

    session.finish(&format!(
        "Initialization script is complete. If all steps above are marked
        with green checkmarks, the Ubuntu server instance is ready to go. You
        must reboot now for the changes to take effect. Log back in as {} and
        run \"vmsetup server-configure\". If any steps above show a red \"X\",
        there was an error during installation.",
        account.user
    ))
}

/// Set up vim and the zsh stack for the current account
pub async fn configure<W: Write>(session: &mut Session<'_, W>) -> Result<()> {
    let env = session.env;
    session.clear();
    let mut labels = Labels::new(CONFIGURE_STEPS);

    session.begin(&mut labels)?;
    session.pass()?;

    session.begin(&mut labels)?;
    let outcome = session.make_dirs(&[env.home_path(".vim/colors")]);
    session.report(outcome)?;

    session.begin(&mut labels)?;
    let outcome = session.copy_files(&[
        CopyTarget::new(env.vim.join("vimrc.txt"), env.home_path(".vimrc")),
        CopyTarget::new(env.vim.join("vimcolors/*"), env.home_path(".vim/colors")),
    ]);
    session.report(outcome)?;

    session.begin(&mut labels)?;
    let outcome = shell::install_oh_my_zsh(session).await;
    session.report(outcome)?;

    session.begin(&mut labels)?;
    let outcome = shell::install_autoupdate(session).await;
    session.report(outcome)?;

    session.begin(&mut labels)?;
    let outcome = shell::install_powerlevel10k(session).await;
    session.report(outcome)?;

    session.begin(&mut labels)?;
    let outcome = session.copy_files(&[
        CopyTarget::new(env.shell.join("zshrc.txt"), env.home_path(".zshrc")),
        CopyTarget::new(env.shell.join("p10k.txt"), env.home_path(".p10k.zsh")),
    ]);
    session.report(outcome)?;

    session.finish(CONFIGURE_DONE)
}

/// Hash the password with openssl, then create the account with a bash login
/// shell and a home directory. The password travels on stdin and neither it
/// nor the hash reaches the log.
pub(crate) async fn create_user<W: Write>(
    session: &mut Session<'_, W>,
    account: &NewAccount,
) -> Outcome {
    // openssl reads one password per line
    if account.passwd.contains(['\n', '\r', '\0']) {
        tracing::warn!("Unusable password for {}: contains a line break or NUL", account.user);
        return Outcome::Fail;
    }

    let hash = RunOptions::default()
        .stdin_bytes(format!("{}\n", account.passwd).into_bytes())
        .sensitive();
    if session
        .exec
        .run_with("openssl passwd -1 -stdin", hash)
        .await
        .is_fail()
    {
        return Outcome::Fail;
    }
    let crypt = session.exec.last_stdout().unwrap_or_default();
    let crypt = match quote_arg(&crypt) {
        Ok(quoted) => quoted,
        Err(_) => {
            tracing::warn!("openssl produced an unusable hash for {}", account.user);
            return Outcome::Fail;
        }
    };

    let cmd = format!("sudo useradd -s /bin/bash -m -p {} {}", crypt, account.user);
    session
        .exec
        .run_with(&cmd, RunOptions::default().sensitive())
        .await
}

pub(crate) async fn add_to_sudoers<W: Write>(session: &mut Session<'_, W>, user: &str) -> Outcome {
    session
        .exec
        .run_one_command(&format!("sudo usermod -aG sudo {}", user))
        .await
}

/// Replace the cloud-image sshd drop-in with the one that allows passwords
pub(crate) async fn patch_ssh_login<W: Write>(session: &mut Session<'_, W>) -> Outcome {
    let src = session.env.shell.join(SSH_CLOUD_IMAGE_CONF);
    let dest = Path::new(SSHD_CONFIG_DIR).join(SSH_CLOUD_IMAGE_CONF);
    session
        .exec
        .run_one_command(&format!("sudo cp {} {}", src.display(), dest.display()))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{capture_logs, checklist, dry_env, dry_session};

    fn account() -> NewAccount {
        NewAccount {
            user: "mid".to_string(),
            passwd: "s3cret".to_string(),
        }
    }

    #[tokio::test]
    async fn test_initialize_dry_run() {
        let dir = tempfile::tempdir().unwrap();
        let env = dry_env(dir.path());
        let mut session = dry_session(&env);

        initialize(&mut session, &account()).await.unwrap();

        let lines = checklist(session);
        assert_eq!(lines.len(), 6);
        assert!(lines[1].starts_with("Creating user mid..."));
        assert!(lines[3].starts_with("Turn off password for mid when using sudo..."));
        assert!(lines.iter().all(|l| l.ends_with('\u{2714}')));
    }

    #[tokio::test]
    async fn test_configure_dry_run() {
        let dir = tempfile::tempdir().unwrap();
        let env = dry_env(dir.path());
        let mut session = dry_session(&env);

        configure(&mut session).await.unwrap();

        let lines = checklist(session);
        assert_eq!(lines.len(), 7);
        assert!(lines[6].starts_with("Copying dot files"));
        assert!(!dir.path().join(".vim").exists());
        assert!(!dir.path().join(".zshrc").exists());
    }

    #[tokio::test]
    async fn test_password_with_line_break_fails() {
        let dir = tempfile::tempdir().unwrap();
        let env = dry_env(dir.path());
        let mut session = dry_session(&env);

        for passwd in ["two\nlines", "bad\0pass"] {
            let broken = NewAccount {
                user: "mid".to_string(),
                passwd: passwd.to_string(),
            };
            assert_eq!(create_user(&mut session, &broken).await, Outcome::Fail);
        }
    }

    #[tokio::test]
    async fn test_create_user_keeps_password_out_of_logs() {
        let (logs, _guard) = capture_logs();
        let dir = tempfile::tempdir().unwrap();
        let env = dry_env(dir.path());
        let mut session = dry_session(&env);
        let account = NewAccount {
            user: "mid".to_string(),
            passwd: "Hunter2SuperSecret".to_string(),
        };

        initialize(&mut session, &account).await.unwrap();

        let text = logs.text();
        assert!(text.contains("Step passed: Creating user mid"));
        assert!(!text.contains("Hunter2SuperSecret"));
    }
}
