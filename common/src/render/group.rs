//! Server group spec forms, as read by `p4 group -i`.

use std::fmt;

use crate::render::RenderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeout {
    Unlimited,
    Seconds(u64),
}

impl fmt::Display for Timeout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timeout::Unlimited => f.write_str("unlimited"),
            Timeout::Seconds(secs) => write!(f, "{secs}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSpec {
    pub name: String,
    pub timeout: Timeout,
    pub users: Vec<String>,
}

impl GroupSpec {
    /// A group whose members get tickets that never expire.
    pub fn no_timeout(user: &str) -> Self {
        Self {
            name: "notimeout".to_string(),
            timeout: Timeout::Unlimited,
            users: vec![user.to_string()],
        }
    }

    pub fn render(&self) -> Result<String, RenderError> {
        let mut form = format!(
            "Group:\t{}\nTimeout:\t{}\nUsers:\n",
            token("Group", &self.name)?,
            self.timeout
        );
        for user in &self.users {
            form.push('\t');
            form.push_str(token("Users", user)?);
            form.push('\n');
        }
        Ok(form)
    }
}

/// Spec form values are whitespace delimited; anything else would spill into
/// the next field.
fn token<'a>(field: &'static str, value: &'a str) -> Result<&'a str, RenderError> {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return Err(RenderError::InvalidToken {
            field,
            value: value.to_string(),
        });
    }
    Ok(value)
}
