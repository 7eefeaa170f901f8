//! Console I/O for the conversation loop.
//!
//! [`StdConsole`] drives a colored terminal. [`ScriptedConsole`] feeds
//! queued lines and captures everything written, for offline runs and
//! tests.

use std::collections::VecDeque;
use std::io::BufRead;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::utilities::errors::Result;
use crate::utilities::printer::{Printer, PrinterColor};

/// Lines read ahead of the conversation.
const INPUT_BUFFER: usize = 16;

/// Line-oriented console the conversation reads from and streams into.
#[async_trait]
pub trait Console: Send {
    /// Show a status line such as the session banner.
    fn announce(&mut self, text: &str) -> Result<()>;

    /// Next line of user input without its line terminator.
    ///
    /// `Ok(None)` means input is closed.
    async fn read_line(&mut self) -> Result<Option<String>>;

    /// Called before the first fragment of each assistant response.
    fn begin_response(&mut self) -> Result<()> {
        Ok(())
    }

    /// Show one assistant fragment as soon as it arrives.
    fn write_fragment(&mut self, text: &str) -> Result<()>;

    /// Close out the current assistant response.
    fn end_response(&mut self) -> Result<()>;
}

// ---------------------------------------------------------------------------
// StdConsole
// ---------------------------------------------------------------------------

/// Terminal console over stdin/stdout.
///
/// Stdin is read on a dedicated thread so a pending read never keeps the
/// runtime alive once the session has stopped.
pub struct StdConsole {
    lines: mpsc::Receiver<std::io::Result<String>>,
    printer: Printer,
    user_label: String,
    assistant_label: String,
}

impl StdConsole {
    /// `assistant_label` is printed before each response, usually the
    /// agent's name.
    pub fn new(assistant_label: impl Into<String>) -> Self {
        let (tx, rx) = mpsc::channel(INPUT_BUFFER);
        std::thread::spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let failed = line.is_err();
                if tx.blocking_send(line).is_err() || failed {
                    break;
                }
            }
        });
        Self {
            lines: rx,
            printer: Printer::new(),
            user_label: "User".to_string(),
            assistant_label: assistant_label.into(),
        }
    }
}

#[async_trait]
impl Console for StdConsole {
    fn announce(&mut self, text: &str) -> Result<()> {
        self.printer.print(text, PrinterColor::Yellow);
        Ok(())
    }

    async fn read_line(&mut self) -> Result<Option<String>> {
        self.printer
            .write(&format!("{}: ", self.user_label), PrinterColor::Green)?;
        match self.lines.recv().await {
            Some(line) => Ok(Some(line?)),
            None => Ok(None),
        }
    }

    fn begin_response(&mut self) -> Result<()> {
        self.printer
            .write(&format!("{}: ", self.assistant_label), PrinterColor::Cyan)?;
        Ok(())
    }

    fn write_fragment(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        self.printer.write(text, PrinterColor::White)?;
        Ok(())
    }

    fn end_response(&mut self) -> Result<()> {
        self.printer.write("\n", PrinterColor::White)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ScriptedConsole
// ---------------------------------------------------------------------------

/// Console with queued input and captured output.
#[derive(Debug, Default, Clone)]
pub struct ScriptedConsole {
    input: VecDeque<String>,
    announcements: Vec<String>,
    responses: Vec<String>,
    current: Option<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: lines.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn announcements(&self) -> &[String] {
        &self.announcements
    }

    /// Every completed response as the user saw it, fragments joined.
    pub fn responses(&self) -> &[String] {
        &self.responses
    }

    /// Lines not yet consumed.
    pub fn pending_input(&self) -> usize {
        self.input.len()
    }
}

#[async_trait]
impl Console for ScriptedConsole {
    fn announce(&mut self, text: &str) -> Result<()> {
        self.announcements.push(text.to_string());
        Ok(())
    }

    async fn read_line(&mut self) -> Result<Option<String>> {
        Ok(self.input.pop_front())
    }

    fn write_fragment(&mut self, text: &str) -> Result<()> {
        self.current.get_or_insert_with(String::new).push_str(text);
        Ok(())
    }

    fn end_response(&mut self) -> Result<()> {
        self.responses.push(self.current.take().unwrap_or_default());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_console_round() {
        let mut console = ScriptedConsole::new(["hello", ""]);
        console.announce("started").unwrap();
        assert_eq!(console.read_line().await.unwrap().as_deref(), Some("hello"));

        console.write_fragment("Hi ").unwrap();
        console.write_fragment("there").unwrap();
        console.end_response().unwrap();
        console.end_response().unwrap();

        assert_eq!(console.read_line().await.unwrap().as_deref(), Some(""));
        assert_eq!(console.read_line().await.unwrap(), None);
        assert_eq!(console.announcements(), ["started"]);
        assert_eq!(console.responses(), ["Hi there", ""]);
    }
}
