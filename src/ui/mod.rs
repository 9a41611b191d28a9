//! Console rendering for the step checklist

pub mod theme;

use anyhow::Result;
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
    tty::IsTty,
};
use std::io::{self, Stdout, Write};

use crate::commands::labels::Labels;
use crate::commands::Outcome;
use crate::constants::WRAP_WIDTH;
use theme::Glyphs;

/// Checklist writer: labels on the left, glyphs on the right
pub struct Console<W: Write = Stdout> {
    out: W,
    glyphs: Glyphs,
}

impl Console<Stdout> {
    /// Console bound to the process stdout
    pub fn stdout(glyphs: Glyphs) -> Self {
        Self::new(io::stdout(), glyphs)
    }
}

impl<W: Write> Console<W> {
    pub fn new(out: W, glyphs: Glyphs) -> Self {
        Self { out, glyphs }
    }

    /// Print the next label, leaving the cursor on the same line
    pub fn label(&mut self, labels: &mut Labels) -> Result<()> {
        labels.next(&mut self.out)?;
        Ok(())
    }

    /// Finish the current line with the outcome glyph
    pub fn outcome(&mut self, outcome: Outcome) -> Result<()> {
        let glyph = match outcome {
            Outcome::Pass => &self.glyphs.pass,
            Outcome::Fail => &self.glyphs.fail,
        };
        writeln!(self.out, "{}", glyph)?;
        Ok(())
    }

    /// Print a wrapped paragraph surrounded by blank lines
    pub fn paragraph(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "\n{}\n", wrap_tight(text))?;
        self.out.flush()?;
        Ok(())
    }

    /// Print a plain line
    pub fn line(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{}", text)?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Clear the terminal (no-op when stdout is not a terminal)
pub fn clear_screen() {
    let mut stdout = io::stdout();
    if !stdout.is_tty() {
        return;
    }
    if let Err(e) = execute!(stdout, Clear(ClearType::All), MoveTo(0, 0)) {
        tracing::debug!("Failed to clear screen: {}", e);
    }
}

/// Collapse all whitespace runs and refill the text to the wrap width
pub fn wrap_tight(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + 1 + word.chars().count() <= WRAP_WIDTH {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_tight_collapses_whitespace() {
        let text = "Setup   script\n        is complete.";
        assert_eq!(wrap_tight(text), "Setup script is complete.");
    }

    #[test]
    fn test_wrap_tight_respects_width() {
        let text = "word ".repeat(40);
        let wrapped = wrap_tight(&text);
        assert!(wrapped.lines().count() > 1);
        for line in wrapped.lines() {
            assert!(line.chars().count() <= WRAP_WIDTH);
        }
    }

    #[test]
    fn test_wrap_tight_empty() {
        assert_eq!(wrap_tight("  \n  "), "");
    }

    #[test]
    fn test_console_label_then_outcome() {
        let mut labels = Labels::new("A\nBB\nCCC");
        let mut console = Console::new(Vec::new(), Glyphs::plain());
        console.label(&mut labels).unwrap();
        console.outcome(Outcome::Pass).unwrap();
        console.label(&mut labels).unwrap();
        console.outcome(Outcome::Fail).unwrap();
        let text = String::from_utf8(console.into_inner()).unwrap();
        assert_eq!(text, "A.....\u{2714}\nBB....\u{2718}\n");
    }

    #[test]
    fn test_console_paragraph() {
        let mut console = Console::new(Vec::new(), Glyphs::plain());
        console.paragraph("All   done.").unwrap();
        let text = String::from_utf8(console.into_inner()).unwrap();
        assert_eq!(text, "\nAll done.\n\n");
    }
}
