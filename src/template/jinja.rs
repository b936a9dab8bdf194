use std::path::Path;

use minijinja::{AutoEscape, Environment, ErrorKind};

use crate::foundation::error::{PatternError, PatternResult};
use crate::template::format::{count_fmt, length_fmt};
use crate::template::{Context, TemplateService, TemplateSource};

/// [`TemplateService`] backed by a minijinja environment.
///
/// Comes with `count_fmt` and `length_fmt` filters so designer templates can print graded values
/// the same way the built-in sections do. Every template is HTML-escaped, whatever its name.
pub struct JinjaTemplates {
    env: Environment<'static>,
}

impl Default for JinjaTemplates {
    fn default() -> Self {
        Self::new()
    }
}

impl JinjaTemplates {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        env.add_filter(
            "count_fmt",
            |v: minijinja::Value| -> Result<minijinja::Value, minijinja::Error> {
                Ok(minijinja::Value::from_safe_string(count_fmt(&to_json(&v)?)))
            },
        );
        env.add_filter(
            "length_fmt",
            |v: minijinja::Value| -> Result<minijinja::Value, minijinja::Error> {
                Ok(minijinja::Value::from_safe_string(length_fmt(&to_json(&v)?)))
            },
        );
        Self { env }
    }

    /// Like [`JinjaTemplates::new`], but named templates that were not registered are loaded from
    /// files under `dir`.
    pub fn with_template_dir(dir: impl AsRef<Path>) -> Self {
        let mut t = Self::new();
        t.env.set_loader(minijinja::path_loader(dir.as_ref()));
        t
    }

    /// Register a named template.
    pub fn add_template(
        &mut self,
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> PatternResult<()> {
        let name = name.into();
        self.env
            .add_template_owned(name.clone(), source.into())
            .map_err(|e| PatternError::template_render(name, e.to_string()))
    }

    fn render_failed(name: &str, ctx: &Context, err: &minijinja::Error) -> PatternError {
        let ctx_json = serde_json::Value::Object(ctx.clone());
        tracing::error!(
            template = name,
            context = %ctx_json,
            error = %err,
            "error while rendering template"
        );
        PatternError::template_render(name, err.to_string())
    }
}

fn to_json(v: &minijinja::Value) -> Result<serde_json::Value, minijinja::Error> {
    serde_json::to_value(v)
        .map_err(|e| minijinja::Error::new(ErrorKind::InvalidOperation, e.to_string()))
}

impl TemplateService for JinjaTemplates {
    fn render_named(&self, name: &str, ctx: &Context) -> PatternResult<String> {
        let tmpl = match self.env.get_template(name) {
            Ok(t) => t,
            Err(err) if err.kind() == ErrorKind::TemplateNotFound => {
                let ctx_json = serde_json::Value::Object(ctx.clone());
                tracing::error!(
                    template = name,
                    context = %ctx_json,
                    "could not find template"
                );
                return Err(PatternError::template_not_found(name));
            }
            Err(err) => return Err(Self::render_failed(name, ctx, &err)),
        };
        tmpl.render(ctx)
            .map_err(|err| Self::render_failed(name, ctx, &err))
    }

    fn render_source(&self, template: &TemplateSource, ctx: &Context) -> PatternResult<String> {
        self.env
            .render_named_str(&template.name, &template.source, ctx)
            .map_err(|err| Self::render_failed(&template.name, ctx, &err))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/template/jinja.rs"]
mod tests;
