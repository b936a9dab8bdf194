use std::sync::Arc;

use crate::foundation::error::PatternResult;
use crate::model::pattern::Pattern;
use crate::section::{Section, SectionInput};
use crate::template::{Context, TemplateService};
use crate::text::builder::TextBuilder;

/// Body of a non-instruction section built around the whole pattern.
pub trait InformationContent: Send + Sync {
    fn title(&self, pattern: &Pattern) -> PatternResult<String>;

    fn css_class(&self) -> Option<&'static str> {
        None
    }

    fn is_nonempty(&self, _pattern: &Pattern) -> bool {
        true
    }

    fn gather_text(
        &self,
        pattern: &Pattern,
        templates: &dyn TemplateService,
        ctx: &Context,
        text: &mut TextBuilder,
    ) -> PatternResult<()>;
}

/// A flat section: no subsections, no ordering.
pub struct InformationSection<C> {
    pattern: Arc<Pattern>,
    templates: Arc<dyn TemplateService>,
    content: C,
}

impl<C: InformationContent> InformationSection<C> {
    pub fn new(pattern: Arc<Pattern>, templates: Arc<dyn TemplateService>, content: C) -> Self {
        Self {
            pattern,
            templates,
            content,
        }
    }
}

impl<C: InformationContent> Section for InformationSection<C> {
    fn title(&self) -> PatternResult<String> {
        self.content.title(&self.pattern)
    }

    fn css_class(&self) -> Option<&str> {
        self.content.css_class()
    }

    fn is_nonempty(&self) -> bool {
        self.content.is_nonempty(&self.pattern)
    }

    fn prepare_context(&self, ctx: &mut Context) -> PatternResult<()> {
        ctx.insert("piece".to_string(), self.pattern.to_context_value());
        Ok(())
    }

    fn section_text(&self, ctx: &Context) -> PatternResult<String> {
        let mut text = TextBuilder::new();
        self.content
            .gather_text(&self.pattern, self.templates.as_ref(), ctx, &mut text)?;
        Ok(text.render())
    }
}

/// Factory for information sections whose content has a default value.
pub fn build_information<C>(
    input: &SectionInput,
    templates: &Arc<dyn TemplateService>,
) -> PatternResult<Box<dyn Section>>
where
    C: InformationContent + Default + 'static,
{
    let pattern = Arc::clone(input.pattern()?);
    Ok(Box::new(InformationSection::new(
        pattern,
        Arc::clone(templates),
        C::default(),
    )))
}

/// Trimmed, non-blank text.
pub(crate) fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}
