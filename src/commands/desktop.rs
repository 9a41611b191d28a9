//! Desktop VM provisioning
//!
//! Installs developer tools, the zsh stack and fonts, then applies the GNOME
//! preferences used on course machines.

use anyhow::Result;
use std::io::Write;
use std::path::Path;

use super::executor::{Executor, RunOptions};
use super::files::CopyTarget;
use super::labels::Labels;
use super::runner::Session;
use super::{shell, Outcome};
use crate::constants::{AUTO_UPGRADES_CONF, FUSE_CONF, POWERLEVEL10K_MEDIA};

const STEPS: &str = "
    System initialization
    Creating new directories
    Copying files
    Adjusting file permissions
    Setting terminal profile
    Installing developer tools
    Installing seahorse nautilus
    Installing zsh
    Installing nala
    Installing OhMyZsh
    Install OhMyZsh Full-autoupdate
    Installing powerlevel10k theme
    Installing Nerd Fonts
    Installing pipx
    Installing snap store
    Setting Text Editor profile
    Refreshing snaps (please be patient)
    Configuring favorites
    Disabling auto screen lock
    Setting idle timeout to \"never\"
    Disabling auto updates
    Patching fuse.conf
    Tidying icons
    Cleaning up";

const HOME_DIRS: &[&str] = &[".fonts", ".notebooksrepo", ".vim/colors", "notebooks", "shares"];

const DEV_TOOLS: &[&str] = &[
    "build-essential",
    "ccache",
    "gnome-text-editor",
    "open-vm-tools-desktop",
    "python3-pip",
    "python3-venv",
    "tree",
    "vim",
    "xclip",
];

const NERD_FONTS: &[&str] = &[
    "MesloLGS NF Bold.ttf",
    "MesloLGS NF Bold Italic.ttf",
    "MesloLGS NF Italic.ttf",
    "MesloLGS NF Regular.ttf",
];

const FAVORITES: &[&str] = &[
    "firefox_firefox.desktop",
    "org.gnome.TextEditor.desktop",
    "org.gnome.Terminal.desktop",
    "org.gnome.Nautilus.desktop",
    "org.gnome.Calculator.desktop",
    "gnome-control-center.desktop",
    "snap-store_ubuntu-software.desktop",
    "org.gnome.seahorse.Application.desktop",
];

const ICON_SETTINGS: &[&str] = &[
    "dash-to-dock show-trash false",
    "dash-to-dock show-mounts false",
    "ding start-corner bottom-left",
    "ding show-trash true",
];

const DONE: &str = "Setup script is complete. If all steps above are marked
    with green checkmarks, Ubuntu is ready to go. You must reboot your VM
    now for the changes to take effect. If any steps above show a red \"X\",
    there was an error during installation.";

pub async fn run<W: Write>(session: &mut Session<'_, W>) -> Result<()> {
    let env = session.env;
    session.clear();
    let mut labels = Labels::new(STEPS);

    session.begin(&mut labels)?;
    session.pass()?;

    session.begin(&mut labels)?;
    let dirs: Vec<_> = HOME_DIRS.iter().map(|d| env.home_path(d)).collect();
    let outcome = session.make_dirs(&dirs);
    session.report(outcome)?;

    session.begin(&mut labels)?;
    let outcome = session.copy_files(&[
        CopyTarget::new(env.shell.join("bashrc.txt"), env.home_path(".bashrc")),
        CopyTarget::new(env.shell.join("dircolors.txt"), env.home_path(".dircolors")),
        CopyTarget::new(env.shell.join("p10k.txt"), env.home_path(".p10k.zsh")),
        CopyTarget::new(env.shell.join("profile.txt"), env.home_path(".profile")),
        CopyTarget::new(env.shell.join("profile.txt"), env.home_path(".zprofile")),
        CopyTarget::new(env.vim.join("vimcolors/*"), env.home_path(".vim/colors")),
        CopyTarget::new(env.vim.join("vimrc.txt"), env.home_path(".vimrc")),
    ]);
    session.report(outcome)?;

    session.begin(&mut labels)?;
    let cmd = format!(
        "find {} -name *.py -exec chmod 754 {{}} ;",
        env.scripts.display()
    );
    let outcome = session.exec.run_one_command(&cmd).await;
    session.report(outcome)?;

    session.begin(&mut labels)?;
    let outcome = load_dconf(
        &mut session.exec,
        "/org/gnome/terminal/legacy",
        "/org/gnome/terminal/legacy/profiles:/",
        &env.system.join("terminal_settings.txt"),
    )
    .await;
    session.report(outcome)?;

    session
        .acquire_sudo_with("Installing additional software. Please enter your password if prompted.")
        .await?;

    let groups: [&[&str]; 4] = [DEV_TOOLS, &["seahorse-nautilus"], &["zsh"], &["nala"]];
    for packages in groups {
        session.begin(&mut labels)?;
        let outcome = session
            .exec
            .run_many_arguments(packages, |p| format!("sudo apt -y install {}", p))
            .await;
        session.report(outcome)?;
    }

    session.begin(&mut labels)?;
    let mut outcome = shell::install_oh_my_zsh(session).await;
    if outcome.is_pass() {
        outcome = session.copy_files(&[CopyTarget::new(
            env.shell.join("zshrc.txt"),
            env.home_path(".zshrc"),
        )]);
    }
    session.report(outcome)?;

    session.begin(&mut labels)?;
    let outcome = shell::install_autoupdate(session).await;
    session.report(outcome)?;

    session.begin(&mut labels)?;
    let outcome = shell::install_powerlevel10k(session).await;
    session.report(outcome)?;

    session.begin(&mut labels)?;
    let fonts: Vec<String> = NERD_FONTS
        .iter()
        .map(|font| {
            format!(
                "curl -sL {}{} -o \"{}\"",
                POWERLEVEL10K_MEDIA,
                font.replace(' ', "%20"),
                env.home_path(".fonts").join(font).display()
            )
        })
        .collect();
    let mut outcome = session.exec.run_each(&fonts).await;
    if outcome.is_pass() {
        outcome = session.exec.run_one_command("fc-cache -vf").await;
    }
    session.report(outcome)?;

    session.begin(&mut labels)?;
    let outcome = session
        .exec
        .run_each(&["sudo apt -y install pipx", "pipx ensurepath"])
        .await;
    session.report(outcome)?;

    session.begin(&mut labels)?;
    let outcome = session
        .exec
        .run_one_command("sudo snap install snap-store")
        .await;
    session.report(outcome)?;

    session.begin(&mut labels)?;
    let outcome = load_dconf(
        &mut session.exec,
        "/org/gnome/TextEditor/",
        "/org/gnome/TextEditor/",
        &env.system.join("text_editor_settings.txt"),
    )
    .await;
    session.report(outcome)?;

    session.begin(&mut labels)?;
    let outcome = session.exec.run_one_command("sudo snap refresh").await;
    session.report(outcome)?;

    session.begin(&mut labels)?;
    let cmd = format!(
        "gsettings set org.gnome.shell favorite-apps \"['{}']\"",
        FAVORITES.join("','")
    );
    let outcome = session.exec.run_one_command(&cmd).await;
    session.report(outcome)?;

    session.begin(&mut labels)?;
    let outcome = session
        .exec
        .run_one_command("gsettings set org.gnome.desktop.screensaver lock-enabled false")
        .await;
    session.report(outcome)?;

    session.begin(&mut labels)?;
    let outcome = session
        .exec
        .run_one_command("gsettings set org.gnome.desktop.session idle-delay 0")
        .await;
    session.report(outcome)?;

    session.begin(&mut labels)?;
    let outcome = session
        .exec
        .run_each(&[
            format!(
                "sudo sed -i 's+Update-Package-Lists \"1\"+Update-Package-Lists \"0\"+' {}",
                AUTO_UPGRADES_CONF
            ),
            format!(
                "sudo sed -i 's+Unattended-Upgrade \"1\"+Unattended-Upgrade \"0\"+' {}",
                AUTO_UPGRADES_CONF
            ),
        ])
        .await;
    session.report(outcome)?;

    session.begin(&mut labels)?;
    let cmd = format!("sudo sed -i 's+#user_allow_other+user_allow_other+' {}", FUSE_CONF);
    let outcome = session.exec.run_one_command(&cmd).await;
    session.report(outcome)?;

    session.begin(&mut labels)?;
    let outcome = session
        .exec
        .run_many_arguments(ICON_SETTINGS, |s| {
            format!("gsettings set org.gnome.shell.extensions.{}", s)
        })
        .await;
    session.report(outcome)?;

    session.begin(&mut labels)?;
    session.pass()?;

    session.finish(DONE)
}

/// Reset a dconf directory, then load saved settings into it from a file
async fn load_dconf(exec: &mut Executor, reset: &str, load: &str, settings: &Path) -> Outcome {
    let outcome = exec
        .run_one_command(&format!("dconf reset -f {}", reset))
        .await;
    if outcome.is_fail() {
        return outcome;
    }
    exec.run_with(
        &format!("dconf load {}", load),
        RunOptions::default().stdin_file(settings),
    )
    .await
}
