use std::fmt;
use std::str::FromStr;

/// A user supplied text field that must carry some content
#[derive(Debug, PartialEq, Clone)]
pub struct RequiredText(String);

impl RequiredText {
    /// Parse an optional form value, treating a missing value like an empty one
    pub fn parse_field(value: Option<String>, field: &str) -> Result<Self, String> {
        value
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(|_: String| format!("{} cannot be empty", field))
    }
}

impl FromStr for RequiredText {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.is_empty() {
            return Err("Value cannot be empty".into());
        }
        Ok(Self(value.to_string()))
    }
}

impl AsRef<str> for RequiredText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequiredText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Normalize an optional form value, an empty string counts as absent
pub fn optional_text(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
