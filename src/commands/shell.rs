//! Zsh framework steps shared by the desktop and server workflows

use std::io::Write;
use std::path::Path;

use super::executor::{Executor, ShellScript};
use super::runner::Session;
use super::Outcome;
use crate::constants::{OH_MY_ZSH_AUTOUPDATE_REPO, OH_MY_ZSH_INSTALLER, POWERLEVEL10K_REPO};

/// Run the Oh My Zsh installer without letting it switch shells or start zsh
pub async fn install_oh_my_zsh<W: Write>(session: &mut Session<'_, W>) -> Outcome {
    let script = ShellScript {
        shell: "sh",
        options: "\"\" --unattended",
        ..Default::default()
    };
    session
        .exec
        .run_shell_script(OH_MY_ZSH_INSTALLER, &script)
        .await
}

pub async fn install_autoupdate<W: Write>(session: &mut Session<'_, W>) -> Outcome {
    let dest = session
        .env
        .oh_my_zsh
        .join("custom/plugins/ohmyzsh-full-autoupdate");
    shallow_clone(&mut session.exec, OH_MY_ZSH_AUTOUPDATE_REPO, &dest).await
}

pub async fn install_powerlevel10k<W: Write>(session: &mut Session<'_, W>) -> Outcome {
    let dest = session.env.oh_my_zsh.join("custom/themes/powerlevel10k");
    shallow_clone(&mut session.exec, POWERLEVEL10K_REPO, &dest).await
}

async fn shallow_clone(exec: &mut Executor, repo: &str, dest: &Path) -> Outcome {
    exec.run_one_command(&format!("git clone --depth=1 {} {}", repo, dest.display()))
        .await
}
