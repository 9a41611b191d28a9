//! vim settings and colour schemes

use anyhow::Result;
use std::io::Write;

use super::files::CopyTarget;
use super::labels::Labels;
use super::runner::Session;

const STEPS: &str = "
    System initialization
    Creating new directories
    Copying files";

const DONE: &str = "vim setup complete. You are now ready to use vi or vim and
    enjoy a pleasing visual experience.";

pub async fn run<W: Write>(session: &mut Session<'_, W>) -> Result<()> {
    let env = session.env;
    session.clear();
    let mut labels = Labels::new(STEPS);

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

    session.finish(DONE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::executor::Executor;
    use crate::system::environment::Environment;
    use crate::ui::{theme::Glyphs, Console};
    use std::fs;
    use std::time::Duration;

    #[tokio::test]
    async fn test_installs_vimrc_and_colours() {
        let home = tempfile::tempdir().unwrap();
        let repo = home.path().join(".ubuntu");
        fs::create_dir_all(repo.join("vim/vimcolors")).unwrap();
        fs::write(repo.join("vim/vimrc.txt"), "syntax on\n").unwrap();
        fs::write(repo.join("vim/vimcolors/navy.vim"), "hi Normal\n").unwrap();
        fs::write(repo.join("vim/vimcolors/sand.vim"), "hi Normal\n").unwrap();

        let env = Environment::for_root(home.path(), &repo, false);
        let exec = Executor::new(false, Duration::from_secs(5)).unwrap();
        let mut session = Session::with_console(&env, exec, Console::new(Vec::new(), Glyphs::plain()));

        run(&mut session).await.unwrap();

        let text = String::from_utf8(session.console.into_inner()).unwrap();
        assert!(text.starts_with(
            "System initialization......\u{2714}\nCreating new directories...\u{2714}\nCopying files..............\u{2714}\n"
        ));
        assert!(text.contains("vim setup complete."));
        assert_eq!(fs::read_to_string(home.path().join(".vimrc")).unwrap(), "syntax on\n");
        assert!(home.path().join(".vim/colors/navy.vim").is_file());
        assert!(home.path().join(".vim/colors/sand.vim").is_file());
    }

    #[tokio::test]
    async fn test_missing_assets_fail_copy_step() {
        let home = tempfile::tempdir().unwrap();
        let env = Environment::for_root(home.path(), &home.path().join("absent"), false);
        let exec = Executor::new(false, Duration::from_secs(5)).unwrap();
        let mut session = Session::with_console(&env, exec, Console::new(Vec::new(), Glyphs::plain()));

        run(&mut session).await.unwrap();

        let text = String::from_utf8(session.console.into_inner()).unwrap();
        assert!(text.contains("Copying files..............\u{2718}"));
    }
}
