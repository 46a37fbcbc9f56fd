//! Terminal rendering for markdown output
//!
//! Uses termimad for styled output, with a plain text fallback that prints
//! the markdown unchanged.

use std::{
    fmt::Display,
    io::{self, Write},
};

use anyhow::{Context, Result};
use termimad::{MadSkin, crossterm::style::Color};

/// Terminal renderer that can switch between rich and plain text output
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    /// Create a new terminal renderer
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(Color::Cyan);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Grey);
        skin.inline_code.set_fg(Color::Green);
        skin.inline_code.set_bg(Color::Reset);

        Self { rich_enabled, skin }
    }

    /// Render markdown text to the terminal
    pub fn render(&self, markdown: &str) -> Result<()> {
        if self.rich_enabled {
            for line in markdown.lines() {
                if line.starts_with('#') {
                    // Keep the hashes so heading levels stay visible
                    println!("\x1b[36m{line}\x1b[0m");
                } else {
                    self.skin.print_inline(line);
                    println!();
                }
            }
        } else {
            print!("{markdown}");
        }
        io::stdout().flush().context("Failed to flush stdout")
    }

    /// Render anything that formats itself as markdown
    pub fn show(&self, item: &impl Display) -> Result<()> {
        self.render(&item.to_string())
    }

    /// Print an input prompt without a trailing newline
    pub fn prompt(&self, text: &str) -> Result<()> {
        if self.rich_enabled {
            self.skin.print_inline(text);
        } else {
            print!("{text}");
        }
        io::stdout().flush().context("Failed to flush stdout")
    }

    /// True when styled output is enabled
    pub fn is_rich(&self) -> bool {
        self.rich_enabled
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_renderer() {
        let renderer = TerminalRenderer::new(false);
        assert!(!renderer.is_rich());
    }

    #[test]
    fn test_default_is_rich() {
        assert!(TerminalRenderer::default().is_rich());
    }
}
