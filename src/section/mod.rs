//! Top-level titled chunks of a pattern.
//!
//! A [`Section`] is built fresh for each render from a [`SectionInput`] by a [`SectionClass`], and
//! renders into a fixed frame holding its title, an optional CSS class and its body.

pub(crate) mod compose;
pub(crate) mod information;
pub(crate) mod instruction;
pub mod notes;

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::foundation::core::SafeHtml;
use crate::foundation::error::{PatternError, PatternResult};
use crate::model::pattern::Pattern;
use crate::piece::PieceRef;
use crate::piece::list::PieceList;
use crate::template::builtin::{SectionFrame, render_builtin};
use crate::template::{Context, TemplateService};

/// Context key that replaces a section's title.
pub const PIECE_NAME_KEY: &str = "piece_name";
/// Context key that replaces a section's CSS class.
pub const SECTION_CSS_CLASS_KEY: &str = "section_css_class";

pub trait Section {
    fn title(&self) -> PatternResult<String>;

    fn css_class(&self) -> Option<&str> {
        None
    }

    /// Empty sections are skipped entirely by the pattern renderer, heading included.
    fn is_nonempty(&self) -> bool {
        true
    }

    /// Add section-specific entries (the piece, gauge, ...) to the render context.
    fn prepare_context(&self, ctx: &mut Context) -> PatternResult<()>;

    /// The body HTML, before framing.
    fn section_text(&self, ctx: &Context) -> PatternResult<String>;

    /// Render the framed section. `extra` may override the title and CSS class.
    fn render(&self, extra: Context) -> PatternResult<SafeHtml> {
        let mut ctx = extra;
        self.prepare_context(&mut ctx)?;
        let body = self.section_text(&ctx)?;

        let title = match ctx.get(PIECE_NAME_KEY).and_then(Value::as_str) {
            Some(t) => t.to_string(),
            None => self.title()?,
        };
        let css_class = match ctx.get(SECTION_CSS_CLASS_KEY) {
            Some(Value::String(c)) => Some(c.as_str()),
            Some(Value::Null) => None,
            _ => self.css_class(),
        };

        let html = render_builtin(
            "section_frame",
            &SectionFrame {
                title: &title,
                css_class,
                body: &body,
            },
        )?;
        Ok(SafeHtml::new(html))
    }
}

/// What a section is built around: the whole pattern or one piece per size.
#[derive(Clone)]
pub enum SectionInput {
    Pattern(Arc<Pattern>),
    Pieces(PieceList),
}

impl SectionInput {
    pub fn piece(piece: PieceRef) -> Self {
        Self::Pieces(PieceList::single(piece))
    }

    /// Type name of the underlying object (the exemplar piece for a list).
    pub fn kind(&self) -> &str {
        match self {
            Self::Pattern(p) => p.kind.as_str(),
            Self::Pieces(l) => l.kind(),
        }
    }

    /// Ids of the underlying objects, in size order.
    pub fn ids(&self) -> Vec<u64> {
        match self {
            Self::Pattern(p) => vec![p.id.0],
            Self::Pieces(l) => l.ids().into_iter().map(|id| id.0).collect(),
        }
    }

    pub fn pattern(&self) -> PatternResult<&Arc<Pattern>> {
        match self {
            Self::Pattern(p) => Ok(p),
            Self::Pieces(l) => Err(PatternError::construction(format!(
                "section expects a pattern, got {} pieces",
                l.kind()
            ))),
        }
    }

    pub fn pieces(&self) -> PatternResult<&PieceList> {
        match self {
            Self::Pieces(l) => Ok(l),
            Self::Pattern(p) => Err(PatternError::construction(format!(
                "section expects pieces, got pattern {}",
                p.id
            ))),
        }
    }
}

impl fmt::Debug for SectionInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pattern(p) => f.debug_tuple("Pattern").field(&p.id).finish(),
            Self::Pieces(l) => f.debug_tuple("Pieces").field(l).finish(),
        }
    }
}

pub type SectionFactory =
    fn(&SectionInput, &Arc<dyn TemplateService>) -> PatternResult<Box<dyn Section>>;

/// A named way of building a section; the name is part of the section's cache key.
#[derive(Clone, Copy)]
pub struct SectionClass {
    name: &'static str,
    factory: SectionFactory,
}

impl SectionClass {
    pub const fn new(name: &'static str, factory: SectionFactory) -> Self {
        Self { name, factory }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn build(
        &self,
        input: &SectionInput,
        templates: &Arc<dyn TemplateService>,
    ) -> PatternResult<Box<dyn Section>> {
        (self.factory)(input, templates)
    }
}

impl fmt::Debug for SectionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SectionClass").field(&self.name).finish()
    }
}
