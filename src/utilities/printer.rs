//! Console printer with ANSI color support.

use std::io::Write;

use serde::{Deserialize, Serialize};

/// Available colors for printed output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrinterColor {
    Red,
    Green,
    Yellow,
    Cyan,
    White,
    BoldRed,
    BoldYellow,
}

impl PrinterColor {
    /// ANSI escape code for this color.
    fn ansi_code(&self) -> &'static str {
        match self {
            Self::Red => "\x1b[31m",
            Self::Green => "\x1b[32m",
            Self::Yellow => "\x1b[33m",
            Self::Cyan => "\x1b[36m",
            Self::White => "\x1b[37m",
            Self::BoldRed => "\x1b[1;31m",
            Self::BoldYellow => "\x1b[1;33m",
        }
    }
}

/// ANSI reset code.
const RESET: &str = "\x1b[0m";

/// Wrap `content` in the escape codes for `color`.
pub fn paint(content: &str, color: PrinterColor) -> String {
    format!("{}{}{}", color.ansi_code(), content, RESET)
}

/// Printer for console output with color support.
#[derive(Debug, Clone, Default)]
pub struct Printer;

impl Printer {
    pub fn new() -> Self {
        Self
    }

    /// Print a full line in `color`.
    pub fn print(&self, content: &str, color: PrinterColor) {
        println!("{}", paint(content, color));
    }

    /// Print without a trailing newline and flush immediately.
    ///
    /// Used for streamed fragments, which must appear as they arrive.
    pub fn write(&self, content: &str, color: PrinterColor) -> std::io::Result<()> {
        let mut stdout = std::io::stdout().lock();
        write!(stdout, "{}", paint(content, color))?;
        stdout.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint_wraps_and_resets() {
        assert_eq!(paint("hi", PrinterColor::Green), "\x1b[32mhi\x1b[0m");
        assert!(paint("", PrinterColor::BoldRed).ends_with(RESET));
    }
}
