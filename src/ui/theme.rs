//! Pass/fail glyph styling

use crossterm::style::Stylize;

use crate::constants::{FAIL_GLYPH, PASS_GLYPH};

/// The two rendered step markers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyphs {
    pub pass: String,
    pub fail: String,
}

impl Default for Glyphs {
    /// Green check mark and red cross
    fn default() -> Self {
        Self {
            pass: PASS_GLYPH.green().to_string(),
            fail: FAIL_GLYPH.red().to_string(),
        }
    }
}

impl Glyphs {
    /// Uncoloured markers, for logs and non-terminal output
    pub fn plain() -> Self {
        Self {
            pass: PASS_GLYPH.to_string(),
            fail: FAIL_GLYPH.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_glyphs_wrap_marker_in_color() {
        let glyphs = Glyphs::default();
        assert!(glyphs.pass.contains(PASS_GLYPH));
        assert!(glyphs.fail.contains(FAIL_GLYPH));
    }

    #[test]
    fn test_plain_glyphs() {
        let glyphs = Glyphs::plain();
        assert_eq!(glyphs.pass, "\u{2714}");
        assert_eq!(glyphs.fail, "\u{2718}");
    }
}
