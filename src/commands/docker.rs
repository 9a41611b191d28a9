//! Docker engine and compose plugin installation

use anyhow::Result;
use std::io::Write;

use super::executor::RunOptions;
use super::labels::Labels;
use super::runner::Session;
use super::Outcome;
use crate::constants::{
    DOCKER_APT_REPO, DOCKER_CLI_PLUGINS, DOCKER_COMPOSE_REPO, DOCKER_GPG_KEY, DOCKER_KEYRING,
};
use crate::system::environment::current_user;

const DOCKER_STEPS: &str = "
    System initialization
    Updating package index
    Installing dependencies
    Installing Docker public key
    Mapping the Docker repository
    Installing Docker
    Adding user to Docker group
    Cloning compose repository
    Making docker compose binary (please be patient)
    Moving files into final position";

const COMPOSE_STEPS: &str = "
    System initialization
    Cloning compose repository
    Making docker compose binary (please be patient)
    Moving files into final position";

const DEPENDENCIES: &[&str] = &[
    "apt-transport-https",
    "ca-certificates",
    "curl",
    "gnupg-agent",
    "make",
    "software-properties-common",
];

const SOURCES_LIST: &str = "/etc/apt/sources.list.d/docker.list";

const DOCKER_DONE: &str = "Setup script is complete. If all steps above are
    marked with green checkmarks, Docker and Docker Compose are ready to go.
    Log out and back in so the docker group membership takes effect. If any
    steps above show a red \"X\", there was an error during installation.";

const COMPOSE_DONE: &str = "Setup script is complete. If all steps above are
    marked with green checkmarks, Docker Compose is ready to go. There is no
    need for a reboot. If any steps above show a red \"X\", there was an error
    during installation.";

/// Install Docker from the upstream apt repository, then build compose
pub async fn run<W: Write>(session: &mut Session<'_, W>) -> Result<()> {
    session.clear();
    let mut labels = Labels::new(DOCKER_STEPS);
    session.acquire_sudo().await?;

    session.begin(&mut labels)?;
    session.pass()?;

    session.begin(&mut labels)?;
    let outcome = session
        .exec
        .run_each(&["sudo apt update", "sudo apt upgrade -y"])
        .await;
    session.report(outcome)?;

    session.begin(&mut labels)?;
    let outcome = session
        .exec
        .run_many_arguments(DEPENDENCIES, |p| format!("sudo apt install {} -y", p))
        .await;
    session.report(outcome)?;

    session.begin(&mut labels)?;
    let outcome = session
        .exec
        .pipe(
            &format!("curl -fsSL {}", DOCKER_GPG_KEY),
            &format!("sudo gpg --batch --yes --dearmor -o {}", DOCKER_KEYRING),
        )
        .await;
    session.report(outcome)?;

    session.begin(&mut labels)?;
    let outcome = map_repository(session).await;
    session.report(outcome)?;

    session.begin(&mut labels)?;
    let outcome = session
        .exec
        .run_each(&[
            "sudo apt update",
            "sudo apt install docker-ce docker-ce-cli containerd.io -y",
        ])
        .await;
    session.report(outcome)?;

    session.begin(&mut labels)?;
    let outcome = match current_user() {
        Some(user) => {
            session
                .exec
                .run_one_command(&format!("sudo usermod -aG docker {}", user))
                .await
        }
        None => {
            tracing::warn!("Could not determine the invoking user");
            Outcome::Fail
        }
    };
    session.report(outcome)?;

    build_compose(session, &mut labels).await?;
    session.finish(DOCKER_DONE)
}

/// Build the compose plugin from source into Docker's plugin directory
pub async fn run_compose<W: Write>(session: &mut Session<'_, W>) -> Result<()> {
    session.clear();
    let mut labels = Labels::new(COMPOSE_STEPS);
    session.acquire_sudo().await?;

    session.begin(&mut labels)?;
    session.pass()?;

    build_compose(session, &mut labels).await?;
    session.finish(COMPOSE_DONE)
}

/// Write the signed apt source line for this architecture and release
async fn map_repository<W: Write>(session: &mut Session<'_, W>) -> Outcome {
    if session
        .exec
        .run_one_command("dpkg --print-architecture")
        .await
        .is_fail()
    {
        return Outcome::Fail;
    }
    let arch = session.exec.last_stdout().unwrap_or_default();

    if session.exec.run_one_command("lsb_release -cs").await.is_fail() {
        return Outcome::Fail;
    }
    let codename = session.exec.last_stdout().unwrap_or_default();

    let line = format!(
        "deb [arch={} signed-by={}] {} {} stable\n",
        arch, DOCKER_KEYRING, DOCKER_APT_REPO, codename
    );
    session
        .exec
        .run_with(
            &format!("sudo tee {}", SOURCES_LIST),
            RunOptions::default().stdin_bytes(line.into_bytes()),
        )
        .await
}

async fn build_compose<W: Write>(session: &mut Session<'_, W>, labels: &mut Labels) -> Result<()> {
    let clone_dir = session.env.home_path(".compose");

    session.begin(labels)?;
    let cmd = format!(
        "git clone {} {} --depth 1",
        DOCKER_COMPOSE_REPO,
        clone_dir.display()
    );
    let outcome = session.exec.run_one_command(&cmd).await;
    session.report(outcome)?;

    session.begin(labels)?;
    let outcome = session
        .exec
        .run_with("make binary", RunOptions::default().in_dir(&clone_dir))
        .await;
    session.report(outcome)?;

    session.begin(labels)?;
    let binary = clone_dir.join("bin/build/docker-compose");
    let outcome = session
        .exec
        .run_each(&[
            format!("sudo mkdir -p {}", DOCKER_CLI_PLUGINS),
            format!("sudo mv {} {}/", binary.display(), DOCKER_CLI_PLUGINS),
            format!("sudo chmod 755 {}/docker-compose", DOCKER_CLI_PLUGINS),
        ])
        .await;
    session.report(outcome)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{checklist, dry_env, dry_session};

    #[tokio::test]
    async fn test_docker_dry_run() {
        let dir = tempfile::tempdir().unwrap();
        let env = dry_env(dir.path());
        let mut session = dry_session(&env);

        run(&mut session).await.unwrap();

        let lines = checklist(session);
        assert_eq!(lines.len(), 10);
        assert!(lines[3].starts_with("Installing Docker public key..."));
        assert!(lines[9].starts_with("Moving files into final position..."));
    }

    #[tokio::test]
    async fn test_compose_dry_run() {
        let dir = tempfile::tempdir().unwrap();
        let env = dry_env(dir.path());
        let mut session = dry_session(&env);

        run_compose(&mut session).await.unwrap();

        let lines = checklist(session);
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("Making docker compose binary (please be patient)..."));
        assert!(lines.iter().all(|l| l.ends_with('\u{2714}')));
        assert!(!dir.path().join(".compose").exists());
    }
}
