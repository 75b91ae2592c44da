//! Raw form capture: the ordered (name, raw string) pairs of one submission.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormError {
    #[error("Field '{0}' is missing a '=' separator")]
    MissingSeparator(String),
    #[error("Field has an empty name: '{0}'")]
    EmptyName(String),
}

/// One submission's worth of raw field values, in the order they were
/// entered. Values are untouched here; coercion happens in the payload
/// builder.
#[derive(Debug, Clone, Default)]
pub struct FormData {
    entries: Vec<(String, String)>,
}

impl FormData {
    pub fn from_pairs(entries: Vec<(String, String)>) -> Self {
        Self { entries }
    }

    /// Parses CLI-style `name=value` arguments, the binary's stand-in for the
    /// HTML form. The value may contain further `=` characters; only the
    /// first one splits.
    pub fn from_args<I, S>(args: I) -> Result<Self, FormError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries = Vec::new();
        for arg in args {
            let arg = arg.as_ref();
            let (name, value) = arg
                .split_once('=')
                .ok_or_else(|| FormError::MissingSeparator(arg.to_string()))?;
            if name.trim().is_empty() {
                return Err(FormError::EmptyName(arg.to_string()));
            }
            entries.push((name.trim().to_string(), value.to_string()));
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
