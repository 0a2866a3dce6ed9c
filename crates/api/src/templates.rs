//! Minimal HTML templating: `#name#` placeholders replaced from a map.

use std::collections::BTreeMap;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Template loading failures.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Invalid template name '{0}'")]
    InvalidName(String),

    #[error("Template '{name}' not found")]
    NotFound { name: String },

    #[error("Cannot read template '{name}': {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Placeholder values for one render.
pub type TemplateValues = BTreeMap<&'static str, String>;

/// Renders HTML files from one template directory.
#[derive(Debug, Clone)]
pub struct TemplateEngine {
    base_dir: PathBuf,
}

impl TemplateEngine {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Template path below the base directory; `None` if `name` leaves it.
    fn map_path(&self, name: &str) -> Option<PathBuf> {
        let mut path = self.base_dir.clone();
        let mut has_file = false;
        for component in Path::new(name).components() {
            match component {
                Component::Normal(part) => {
                    path.push(part);
                    has_file = true;
                }
                Component::CurDir => {}
                _ => return None,
            }
        }
        has_file.then_some(path)
    }

    /// Load `name` and substitute `values`.
    pub async fn render(
        &self,
        name: &str,
        values: &TemplateValues,
    ) -> Result<String, TemplateError> {
        let path = self
            .map_path(name)
            .ok_or_else(|| TemplateError::InvalidName(name.to_string()))?;

        let source = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => TemplateError::NotFound {
                    name: name.to_string(),
                },
                _ => TemplateError::Io {
                    name: name.to_string(),
                    source: e,
                },
            })?;

        Ok(substitute(&source, values))
    }
}

fn is_placeholder(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Replace every `#name#` whose name is in `values`; others stay untouched.
pub fn substitute(source: &str, values: &TemplateValues) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;

    while let Some(start) = rest.find('#') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let replaced = after.find('#').and_then(|end| {
            let name = &after[..end];
            is_placeholder(name)
                .then(|| values.get(name))
                .flatten()
                .map(|value| (value, end))
        });
        match replaced {
            Some((value, end)) => {
                out.push_str(&escape_html(value));
                rest = &after[end + 1..];
            }
            None => {
                out.push('#');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
