//! Coloured operator output.
//!
//! Everything the operator is meant to read goes through [`OutputManager`];
//! diagnostic detail goes through the `log` facade instead.

use std::io::{IsTerminal, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Terminal output with verbosity control.
#[derive(Debug, Clone)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
    stdout_color: ColorChoice,
    stderr_color: ColorChoice,
}

impl OutputManager {
    /// Creates an output manager.
    ///
    /// `quiet` suppresses everything except warnings and errors; `verbose`
    /// additionally shows detail lines such as streamed tool output.
    pub fn new(verbose: bool, quiet: bool) -> Self {
        let choice = |terminal: bool| {
            if terminal {
                ColorChoice::Auto
            } else {
                ColorChoice::Never
            }
        };
        Self {
            verbose,
            quiet,
            stdout_color: choice(std::io::stdout().is_terminal()),
            stderr_color: choice(std::io::stderr().is_terminal()),
        }
    }

    /// Whether verbose output is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose && !self.quiet
    }

    /// Plain informational line.
    pub fn info(&self, message: &str) {
        if !self.quiet {
            self.write_stdout(None, false, "", message);
        }
    }

    /// Line shown only in verbose mode.
    pub fn verbose(&self, message: &str) {
        if self.is_verbose() {
            self.write_stdout(None, false, "", message);
        }
    }

    /// Indented line shown only in verbose mode.
    pub fn detail(&self, message: &str) {
        if self.is_verbose() {
            self.write_stdout(None, false, "    ", message);
        }
    }

    /// Indented line.
    pub fn indent(&self, message: &str) {
        if !self.quiet {
            self.write_stdout(None, false, "    ", message);
        }
    }

    /// Progress step.
    pub fn progress(&self, message: &str) {
        if !self.quiet {
            self.write_stdout(Some(Color::Cyan), false, "→ ", message);
        }
    }

    /// Success line.
    pub fn success(&self, message: &str) {
        if !self.quiet {
            self.write_stdout(Some(Color::Green), true, "✓ ", message);
        }
    }

    /// Section header.
    pub fn section(&self, title: &str) {
        if !self.quiet {
            self.write_stdout(None, false, "", "");
            self.write_stdout(Some(Color::Blue), true, "══ ", title);
        }
    }

    /// Warning, shown even in quiet mode.
    pub fn warn(&self, message: &str) {
        self.write_stderr(Color::Yellow, "⚠ ", message);
    }

    /// Error, shown even in quiet mode.
    pub fn error(&self, message: &str) {
        self.write_stderr(Color::Red, "✗ ", message);
    }

    fn write_stdout(&self, color: Option<Color>, bold: bool, prefix: &str, message: &str) {
        let mut stream = StandardStream::stdout(self.stdout_color);
        let mut spec = ColorSpec::new();
        spec.set_fg(color).set_bold(bold);
        let _ = write_colored(&mut stream, &spec, prefix, message);
    }

    fn write_stderr(&self, color: Color, prefix: &str, message: &str) {
        let mut stream = StandardStream::stderr(self.stderr_color);
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(color)).set_bold(true);
        let _ = write_colored(&mut stream, &spec, prefix, message);
    }
}

fn write_colored(
    stream: &mut StandardStream,
    spec: &ColorSpec,
    prefix: &str,
    message: &str,
) -> std::io::Result<()> {
    stream.set_color(spec)?;
    write!(stream, "{prefix}")?;
    stream.reset()?;
    writeln!(stream, "{message}")?;
    stream.flush()
}
