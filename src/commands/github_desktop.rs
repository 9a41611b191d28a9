//! GitHub Desktop from the community apt repository

use anyhow::Result;
use std::io::Write;

use super::labels::Labels;
use super::runner::Session;
use crate::constants::GITHUB_DESKTOP_GPG_KEY;

const STEPS: &str = "
    System initialization
    Installing developer's public gpg key
    Mapping to developer ppa
    Refreshing
    Installing GitHub Desktop";

const KEY_TARGET: &str = "/etc/apt/trusted.gpg.d/shiftkey-desktop.asc";
const SOURCES_LIST: &str = "/etc/apt/sources.list.d/packagecloud-shiftkey-desktop.list";

const DONE: &str = "GitHub Desktop installation complete. Run the command
    'github-desktop' and pin the icon to favorites.";

pub async fn run<W: Write>(session: &mut Session<'_, W>) -> Result<()> {
    let env = session.env;
    session.clear();
    let mut labels = Labels::new(STEPS);
    session.acquire_sudo().await?;

    session.begin(&mut labels)?;
    session.pass()?;

    let commands = [
        format!("sudo wget -qO {} {}", KEY_TARGET, GITHUB_DESKTOP_GPG_KEY),
        format!(
            "sudo cp -f {} {}",
            env.system.join("githubdesktop.txt").display(),
            SOURCES_LIST
        ),
        "sudo apt update".to_string(),
        "sudo apt install -y github-desktop".to_string(),
    ];
    for cmd in &commands {
        session.begin(&mut labels)?;
        let outcome = session.exec.run_one_command(cmd).await;
        session.report(outcome)?;
    }

    session.finish(DONE)
}
