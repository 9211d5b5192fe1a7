//! Line-oriented terminal I/O behind a trait so menu flows can be scripted.

use std::future::Future;
use std::io::{self, Write};
use std::pin::Pin;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

pub type ReadLine<'a> = Pin<Box<dyn Future<Output = io::Result<Option<String>>> + 'a>>;

pub trait Console {
    /// Show `prompt` and wait for one line. `None` means input is closed.
    fn read_line<'a>(&'a mut self, prompt: &'a str) -> ReadLine<'a>;

    fn write_line(&mut self, line: &str) -> io::Result<()>;
}

/// Console over the process stdin/stdout.
pub struct StdConsole {
    lines: Lines<BufReader<Stdin>>,
    out: io::Stdout,
}

impl StdConsole {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
            out: io::stdout(),
        }
    }
}

impl Default for StdConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for StdConsole {
    fn read_line<'a>(&'a mut self, prompt: &'a str) -> ReadLine<'a> {
        Box::pin(async move {
            {
                let mut out = self.out.lock();
                out.write_all(prompt.as_bytes())?;
                out.flush()?;
            }
            self.lines.next_line().await
        })
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.out.lock(), "{line}")
    }
}

/// Console fed from a fixed list of answers, capturing everything written.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct ScriptedConsole {
    inputs: std::collections::VecDeque<String>,
    output: String,
}

#[cfg(test)]
impl ScriptedConsole {
    pub(crate) fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            output: String::new(),
        }
    }

    pub(crate) fn output(&self) -> &str {
        &self.output
    }

    pub(crate) fn remaining(&self) -> usize {
        self.inputs.len()
    }
}

#[cfg(test)]
impl Console for ScriptedConsole {
    fn read_line<'a>(&'a mut self, prompt: &'a str) -> ReadLine<'a> {
        self.output.push_str(prompt);
        let line = self.inputs.pop_front();
        if let Some(line) = &line {
            self.output.push_str(line);
        }
        self.output.push('\n');
        Box::pin(std::future::ready(Ok(line)))
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.output.push_str(line);
        self.output.push('\n');
        Ok(())
    }
}
