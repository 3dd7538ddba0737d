//! POSIX shell command lines built from typed parts.

use std::fmt;

/// A command plus the working directory and environment it runs with.
///
/// The command text itself is trusted; directory and environment values are
/// always quoted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shell {
    command: String,
    cwd: Option<String>,
    env: Vec<(String, String)>,
}

impl Shell {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            cwd: None,
            env: Vec::new(),
        }
    }

    pub fn cwd(mut self, dir: impl Into<String>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn envs<K, V>(mut self, vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.env
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Renders `cd DIR && export K=V ... && COMMAND`.
    pub fn render(&self) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(3);
        if let Some(dir) = &self.cwd {
            parts.push(format!("cd {}", quote(dir)));
        }
        if !self.env.is_empty() {
            let assignments: Vec<String> = self
                .env
                .iter()
                .map(|(k, v)| format!("{k}={}", quote(v)))
                .collect();
            parts.push(format!("export {}", assignments.join(" ")));
        }
        parts.push(self.command.clone());
        parts.join(" && ")
    }
}

impl From<&str> for Shell {
    fn from(command: &str) -> Self {
        Shell::new(command)
    }
}

impl From<String> for Shell {
    fn from(command: String) -> Self {
        Shell::new(command)
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Quotes a single shell word. Words made only of safe characters pass through.
pub fn quote(word: &str) -> String {
    let safe = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=@,+%".contains(c));
    if safe {
        return word.to_string();
    }
    format!("'{}'", word.replace('\'', r"'\''"))
}
