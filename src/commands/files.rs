//! File copying, directory creation and rc-file patching

use anyhow::{anyhow, Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// A (source, destination) pair; the source file name may be a glob
#[derive(Debug, Clone)]
pub struct CopyTarget {
    pub source: PathBuf,
    pub dest: PathBuf,
}

impl CopyTarget {
    pub fn new(source: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            dest: dest.into(),
        }
    }
}

/// Copy every target. A glob in the source file name is expanded against
/// the source's parent directory and each match lands in `dest`.
/// Errors are returned as soon as one copy fails.
pub fn copy_files(targets: &[CopyTarget], dry_run: bool) -> Result<()> {
    for target in targets {
        if dry_run {
            println!(
                "\nCopying: {}\nTo: {}",
                target.source.display(),
                target.dest.display()
            );
            continue;
        }

        let name = target
            .source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow!("Invalid copy source: {}", target.source.display()))?;

        if is_glob(name) {
            let copied = copy_matches(&target.source, name, &target.dest)?;
            tracing::info!(
                "Copied {} file(s) matching {} to {}",
                copied,
                target.source.display(),
                target.dest.display()
            );
        } else {
            copy_one(&target.source, &target.dest)?;
        }
    }
    Ok(())
}

fn is_glob(name: &str) -> bool {
    name.contains(['*', '?', '['])
}

fn copy_matches(source: &Path, name: &str, dest: &Path) -> Result<usize> {
    let parent = match source.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let parent_str = parent
        .to_str()
        .ok_or_else(|| anyhow!("Non UTF-8 source directory: {}", parent.display()))?;
    let pattern = format!("{}/{}", glob::Pattern::escape(parent_str), name);

    let mut copied = 0;
    for entry in glob::glob(&pattern).with_context(|| format!("Invalid pattern: {}", pattern))? {
        let path = entry?;
        if path.is_file() {
            copy_one(&path, dest)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Copy a single file; a directory destination keeps the source file name
fn copy_one(from: &Path, to: &Path) -> Result<()> {
    let target = if to.is_dir() {
        let name = from
            .file_name()
            .ok_or_else(|| anyhow!("Copy source has no file name: {}", from.display()))?;
        to.join(name)
    } else {
        to.to_path_buf()
    };

    fs::copy(from, &target)
        .with_context(|| format!("Failed to copy {} to {}", from.display(), target.display()))?;
    tracing::info!("Copied {} to {}", from.display(), target.display());
    Ok(())
}

/// Create each directory with its parents
pub fn make_dirs(dirs: &[PathBuf], dry_run: bool) -> Result<()> {
    for dir in dirs {
        if dry_run {
            println!("\nMaking: {}", dir.display());
            continue;
        }
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }
    Ok(())
}

/// Collapse all whitespace runs to single spaces
pub fn lean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Append the contents of `snippet` to every target unless `probe` already
/// contains it. Returns whether anything was appended.
pub fn append_once(snippet: &Path, probe: &Path, targets: &[PathBuf], dry_run: bool) -> Result<bool> {
    if dry_run {
        for target in targets {
            println!("\nAppending: {}\nTo: {}", snippet.display(), target.display());
        }
        return Ok(true);
    }

    let support = fs::read_to_string(snippet)
        .with_context(|| format!("Failed to read {}", snippet.display()))?;
    let existing = fs::read_to_string(probe).unwrap_or_default();

    if lean_text(&existing).contains(&lean_text(&support)) {
        tracing::info!("{} already contains {}", probe.display(), snippet.display());
        return Ok(false);
    }

    for target in targets {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(target)
            .with_context(|| format!("Failed to open {}", target.display()))?;
        file.write_all(support.as_bytes())?;
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_glob() {
        assert!(is_glob("*"));
        assert!(is_glob("Icon?"));
        assert!(is_glob("[ab].vim"));
        assert!(!is_glob("vimrc.txt"));
    }

    #[test]
    fn test_copy_into_directory_keeps_name() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("vimrc.txt");
        let dest = dir.path().join("out");
        fs::write(&src, "set number").unwrap();
        fs::create_dir(&dest).unwrap();

        copy_files(&[CopyTarget::new(&src, &dest)], false).unwrap();
        assert_eq!(fs::read_to_string(dest.join("vimrc.txt")).unwrap(), "set number");
    }

    #[test]
    fn test_copy_to_file_renames() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("zshrc.txt");
        let dest = dir.path().join(".zshrc");
        fs::write(&src, "export ZSH").unwrap();

        copy_files(&[CopyTarget::new(&src, &dest)], false).unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), "export ZSH");
    }

    #[test]
    fn test_missing_source_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = copy_files(
            &[CopyTarget::new(dir.path().join("absent"), dir.path().join("x"))],
            false,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_make_dirs_nested() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join(".vim/colors");
        make_dirs(&[nested.clone()], false).unwrap();
        assert!(nested.is_dir());
        // Idempotent
        make_dirs(&[nested.clone()], false).unwrap();
    }

    #[test]
    fn test_make_dirs_dry_run() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("notebooks");
        make_dirs(&[nested.clone()], true).unwrap();
        assert!(!nested.exists());
    }

    #[test]
    fn test_lean_text() {
        assert_eq!(lean_text("  export   PYENV_ROOT\n\n  eval "), "export PYENV_ROOT eval");
    }

    #[test]
    fn test_append_once() {
        let dir = tempfile::tempdir().unwrap();
        let snippet = dir.path().join("pyenvsupport.txt");
        let bashrc = dir.path().join(".bashrc");
        let zshrc = dir.path().join(".zshrc");
        fs::write(&snippet, "export PYENV_ROOT=\"$HOME/.pyenv\"\n").unwrap();
        fs::write(&bashrc, "# bash\n").unwrap();

        let targets = vec![bashrc.clone(), zshrc.clone()];
        assert!(append_once(&snippet, &zshrc, &targets, false).unwrap());
        assert!(fs::read_to_string(&bashrc).unwrap().contains("PYENV_ROOT"));
        assert!(fs::read_to_string(&zshrc).unwrap().contains("PYENV_ROOT"));

        // Second run sees the snippet and leaves the files alone
        assert!(!append_once(&snippet, &zshrc, &targets, false).unwrap());
        let count = fs::read_to_string(&bashrc).unwrap().matches("PYENV_ROOT").count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_append_once_dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let snippet = dir.path().join("support.txt");
        let zshrc = dir.path().join(".zshrc");
        fs::write(&snippet, "eval init").unwrap();

        assert!(append_once(&snippet, &zshrc, &[zshrc.clone()], true).unwrap());
        assert!(!zshrc.exists());
    }
}
