//! Template rendering seam.
//!
//! Fixed markup (section frames, overlap notices, informational bodies) is compiled in through
//! [`builtin`]. Designer-supplied templates, such as the text of an additional design element, are
//! only known at runtime and go through a [`TemplateService`].

pub(crate) mod builtin;
pub(crate) mod format;
pub(crate) mod jinja;

use serde_json::Value;

use crate::foundation::error::PatternResult;

/// Template context: a JSON object keyed by variable name.
pub type Context = serde_json::Map<String, Value>;

/// A runtime template with a name used in logs and error messages.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TemplateSource {
    pub name: String,
    pub source: String,
}

impl TemplateSource {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// Renders templates into HTML strings.
///
/// Implementations must keep lookup failures ([`crate::PatternError::TemplateNotFound`]) distinct
/// from rendering failures ([`crate::PatternError::TemplateRender`]).
pub trait TemplateService: Send + Sync {
    /// Render a template previously registered under `name`.
    fn render_named(&self, name: &str, ctx: &Context) -> PatternResult<String>;

    /// Render an ad-hoc template.
    fn render_source(&self, template: &TemplateSource, ctx: &Context) -> PatternResult<String>;
}

/// Build a context from key/value pairs.
pub fn context<K: Into<String>>(pairs: impl IntoIterator<Item = (K, Value)>) -> Context {
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}
