//! Structured command lines for the JDK packaging tools.
//!
//! An [`Invocation`] is an ordered list of flags built through
//! [`InvocationBuilder`] and validated once, before anything is spawned.
//! Flags with values are never concatenated into a single string.

use crate::bundler::error::{Error, Result};
use crate::bundler::utils::process::CommandSpec;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// One command-line flag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Flag {
    /// Flag without a value (`--verbose`).
    Switch(String),
    /// Flag followed by a value (`--name App`).
    Value(String, String),
}

impl Flag {
    /// Flag name including its leading dashes.
    pub fn name(&self) -> &str {
        match self {
            Flag::Switch(name) | Flag::Value(name, _) => name,
        }
    }

    /// Value, if the flag takes one.
    pub fn value(&self) -> Option<&str> {
        match self {
            Flag::Switch(_) => None,
            Flag::Value(_, value) => Some(value),
        }
    }
}

/// A validated, immutable tool command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    tool: &'static str,
    program: PathBuf,
    flags: Vec<Flag>,
}

impl Invocation {
    /// Tool name used in messages (`jpackage`, `jlink`).
    pub fn tool(&self) -> &str {
        self.tool
    }

    /// Executable that will be run.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Flags, in order.
    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    /// Whether `name` appears at least once.
    pub fn has_flag(&self, name: &str) -> bool {
        self.flags.iter().any(|f| f.name() == name)
    }

    /// First value given for `name`.
    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.flags
            .iter()
            .find(|f| f.name() == name)
            .and_then(Flag::value)
    }

    /// Every value given for `name`, in order.
    pub fn values_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.flags
            .iter()
            .filter(move |f| f.name() == name)
            .filter_map(Flag::value)
    }

    /// Serializes the flags into an argument vector.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.flags.len() * 2);
        for flag in &self.flags {
            match flag {
                Flag::Switch(name) => args.push(name.clone()),
                Flag::Value(name, value) => {
                    args.push(name.clone());
                    args.push(value.clone());
                }
            }
        }
        args
    }

    /// Command ready for [`ProcessRunner`](crate::bundler::utils::process::ProcessRunner).
    pub fn command(&self) -> CommandSpec {
        CommandSpec::new(&self.program).args(self.to_args())
    }
}

/// Accumulates flags and validates them into an [`Invocation`].
#[derive(Debug)]
pub struct InvocationBuilder {
    tool: &'static str,
    program: PathBuf,
    flags: Vec<Flag>,
    required: &'static [&'static str],
    repeatable: &'static [&'static str],
}

impl InvocationBuilder {
    /// Starts an invocation of `program`.
    ///
    /// # Arguments
    ///
    /// * `tool` - Tool name for error messages
    /// * `program` - Resolved executable
    /// * `required` - Flags that must be present
    /// * `repeatable` - Flags that may appear more than once
    pub fn new(
        tool: &'static str,
        program: impl Into<PathBuf>,
        required: &'static [&'static str],
        repeatable: &'static [&'static str],
    ) -> Self {
        Self {
            tool,
            program: program.into(),
            flags: Vec::new(),
            required,
            repeatable,
        }
    }

    /// Appends a flag with a value.
    pub fn value(mut self, name: &str, value: impl Into<String>) -> Self {
        self.flags.push(Flag::Value(name.to_string(), value.into()));
        self
    }

    /// Appends a flag whose value is a path.
    pub fn path(self, name: &str, path: &Path) -> Self {
        let value = path.display().to_string();
        self.value(name, value)
    }

    /// Appends a flag with a value when one is given.
    pub fn value_opt(self, name: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.value(name, value),
            None => self,
        }
    }

    /// Appends a flag without a value.
    pub fn switch(mut self, name: &str) -> Self {
        self.flags.push(Flag::Switch(name.to_string()));
        self
    }

    /// Appends a flag without a value when `enabled`.
    pub fn switch_if(self, enabled: bool, name: &str) -> Self {
        if enabled { self.switch(name) } else { self }
    }

    /// Appends `name value` once per value.
    pub fn repeated<I, S>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for value in values {
            self = self.value(name, value);
        }
        self
    }

    /// Validates and freezes the invocation.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInvocation`] if a flag name does not start with `--`,
    /// a value is empty, a single-valued flag is repeated, or a required
    /// flag is missing.
    pub fn build(self) -> Result<Invocation> {
        let invalid = |reason: String| Error::InvalidInvocation {
            tool: self.tool.to_string(),
            reason,
        };

        let mut seen = HashSet::new();
        for flag in &self.flags {
            let name = flag.name();
            if name.len() <= 2 || !name.starts_with("--") || name.contains(char::is_whitespace) {
                return Err(invalid(format!("malformed flag name `{name}`")));
            }
            if let Some(value) = flag.value()
                && value.trim().is_empty()
            {
                return Err(invalid(format!("empty value for `{name}`")));
            }
            if !seen.insert(name) && !self.repeatable.contains(&name) {
                return Err(invalid(format!("`{name}` given more than once")));
            }
        }
        if let Some(missing) = self.required.iter().find(|r| !seen.contains(**r)) {
            return Err(invalid(format!("required flag `{missing}` missing")));
        }

        Ok(Invocation {
            tool: self.tool,
            program: self.program,
            flags: self.flags,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: &[&str] = &["--name", "--type"];
    const REPEATABLE: &[&str] = &["--java-options"];

    fn builder() -> InvocationBuilder {
        InvocationBuilder::new("jpackage", "/jdk/bin/jpackage", REQUIRED, REPEATABLE)
    }

    #[test]
    fn serializes_flags_in_order() {
        let invocation = builder()
            .value("--name", "Trading Analytics")
            .value("--type", "exe")
            .switch("--verbose")
            .repeated("--java-options", ["-Xmx2048m", "-Dfile.encoding=UTF-8"])
            .build()
            .unwrap();

        assert_eq!(
            invocation.to_args(),
            vec![
                "--name",
                "Trading Analytics",
                "--type",
                "exe",
                "--verbose",
                "--java-options",
                "-Xmx2048m",
                "--java-options",
                "-Dfile.encoding=UTF-8",
            ]
        );
        assert_eq!(invocation.values_of("--java-options").count(), 2);
        assert_eq!(invocation.command().program(), Path::new("/jdk/bin/jpackage"));
    }

    #[test]
    fn rejects_repeated_single_valued_flag() {
        let err = builder()
            .value("--name", "A")
            .value("--name", "B")
            .value("--type", "exe")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("`--name` given more than once"));
    }

    #[test]
    fn rejects_missing_required_flag() {
        let err = builder().value("--name", "A").build().unwrap_err();
        assert!(err.to_string().contains("`--type`"));
    }

    #[test]
    fn rejects_empty_values_and_bad_names() {
        assert!(builder().value("--name", " ").value("--type", "exe").build().is_err());
        assert!(builder().value("-n", "A").value("--type", "exe").build().is_err());
    }
}
