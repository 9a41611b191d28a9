//! Application-wide constants

// =============================================================================
// Console
// =============================================================================

/// Extra dots between the longest label and its pass/fail glyph
pub const LABEL_PADDING: usize = 3;

/// Column width for closing paragraphs
pub const WRAP_WIDTH: usize = 70;

/// Success glyph (rendered green)
pub const PASS_GLYPH: &str = "\u{2714}";

/// Failure glyph (rendered red)
pub const FAIL_GLYPH: &str = "\u{2718}";

// =============================================================================
// Requirements
// =============================================================================

/// Oldest Ubuntu release the workflows are written against
pub const DEFAULT_MIN_RELEASE: &str = "22.04";

/// Release file consulted for the host version
pub const OS_RELEASE_FILE: &str = "/etc/os-release";

// =============================================================================
// Repository layout (relative to the repository root)
// =============================================================================

/// Default repository location relative to home
pub const REPO_HOME_SUBDIR: &str = ".ubuntu";

pub const SCRIPTS_SUBDIR: &str = "scripts";
pub const SHELL_SUBDIR: &str = "shell";
pub const SYSTEM_SUBDIR: &str = "system";
pub const VIM_SUBDIR: &str = "vim";
pub const JUPYTER_SUBDIR: &str = "jupyter";

/// Oh My Zsh install location relative to home
pub const OH_MY_ZSH_SUBDIR: &str = ".oh-my-zsh";

// =============================================================================
// Network
// =============================================================================

/// Default timeout for remote script downloads (seconds)
pub const DOWNLOAD_TIMEOUT_SECS: u64 = 60;

/// User agent sent with downloads
pub const USER_AGENT: &str = "vmsetup";

pub const OH_MY_ZSH_INSTALLER: &str =
    "https://raw.githubusercontent.com/ohmyzsh/ohmyzsh/master/tools/install.sh";
pub const OH_MY_ZSH_AUTOUPDATE_REPO: &str = "https://github.com/Pilaton/OhMyZsh-full-autoupdate.git";
pub const POWERLEVEL10K_REPO: &str = "https://github.com/romkatv/powerlevel10k.git";
pub const POWERLEVEL10K_MEDIA: &str = "https://github.com/romkatv/powerlevel10k-media/raw/master/";
pub const DOCKER_GPG_KEY: &str = "https://download.docker.com/linux/ubuntu/gpg";
pub const DOCKER_APT_REPO: &str = "https://download.docker.com/linux/ubuntu";
pub const DOCKER_KEYRING: &str = "/usr/share/keyrings/docker-archive-keyring.gpg";
pub const DOCKER_COMPOSE_REPO: &str = "https://github.com/docker/compose.git";
pub const DOCKER_CLI_PLUGINS: &str = "/usr/libexec/docker/cli-plugins";
pub const PYENV_INSTALLER: &str = "https://pyenv.run";
pub const CERTS_SYSTEM_SCRIPT: &str = "https://apt.cs.usna.edu/ssl/install-ssl-system.sh";
pub const CERTS_BROWSER_SCRIPT: &str = "https://apt.cs.usna.edu/ssl/install-ssl-browsers.sh";
pub const GITHUB_DESKTOP_GPG_KEY: &str = "https://packagecloud.io/shiftkey/desktop/gpgkey";

// =============================================================================
// System files
// =============================================================================

pub const SSH_CLOUD_IMAGE_CONF: &str = "60-cloudimg-settings.conf";
pub const SSHD_CONFIG_DIR: &str = "/etc/ssh/sshd_config.d";
pub const CLOUD_INIT_SUDOERS: &str = "/etc/sudoers.d/90-cloud-init-users";
pub const OPENSSL_CONF: &str = "/usr/lib/ssl/openssl.cnf";
pub const AUTO_UPGRADES_CONF: &str = "/etc/apt/apt.conf.d/20auto-upgrades";
pub const FUSE_CONF: &str = "/etc/fuse.conf";
