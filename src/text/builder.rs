use crate::foundation::error::PatternResult;
use crate::template::{Context, TemplateService, TemplateSource};

/// Ordered text fragments, rendered by concatenation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextBuilder {
    chunks: Vec<String>,
}

impl TextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_text(&mut self, text: impl Into<String>) {
        self.chunks.push(text.into());
    }

    /// Render a registered template and append the result.
    pub fn add_template_named(
        &mut self,
        templates: &dyn TemplateService,
        name: &str,
        ctx: &Context,
    ) -> PatternResult<()> {
        let text = templates.render_named(name, ctx)?;
        self.add_text(text);
        Ok(())
    }

    /// Render an ad-hoc template and append the result.
    pub fn add_template_source(
        &mut self,
        templates: &dyn TemplateService,
        template: &TemplateSource,
        ctx: &Context,
    ) -> PatternResult<()> {
        let text = templates.render_source(template, ctx)?;
        self.add_text(text);
        Ok(())
    }

    pub fn chunks(&self) -> &[String] {
        &self.chunks
    }

    pub fn render(&self) -> String {
        self.chunks.concat()
    }

    /// `true` when there is no visible text.
    pub fn is_empty(&self) -> bool {
        self.chunks.iter().all(|c| c.trim().is_empty())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/builder.rs"]
mod tests;
