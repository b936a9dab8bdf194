use std::sync::Arc;

use serde_json::Value;

use crate::foundation::core::Row;
use crate::foundation::error::{PatternError, PatternResult};
use crate::foundation::graded::Graded;
use crate::model::design::{AdditionalDesignElement, Design, Stitch};
use crate::piece::list::PieceList;
use crate::section::compose::compose_elements;
use crate::section::{Section, SectionInput};
use crate::template::builtin::{SwitchTo, SwitchToWhatever, render_builtin};
use crate::template::{Context, TemplateService};
use crate::text::element::Element;
use crate::text::subsection::SubSection;

/// Garment-specific part of an instruction section.
pub trait InstructionContent: Send + Sync {
    type Sub: SubSection;

    fn title(&self, pieces: &PieceList) -> PatternResult<String>;

    fn css_class(&self) -> Option<&'static str> {
        None
    }

    fn is_nonempty(&self, _pieces: &PieceList) -> bool {
        true
    }

    /// The section's own elements, ready to compose.
    fn make_elements(
        &self,
        pieces: &PieceList,
        templates: &dyn TemplateService,
        ctx: &Context,
    ) -> PatternResult<Vec<Element<Self::Sub>>>;

    /// Design add-ons that belong in this section.
    fn additional_elements<'d>(&self, design: &'d Design) -> Vec<&'d AdditionalDesignElement> {
        design.additional_elements.iter().collect()
    }

    /// First row of `element` in each size.
    fn additional_element_start_rows(
        &self,
        pieces: &PieceList,
        element: &AdditionalDesignElement,
    ) -> PatternResult<Graded<Row>>;

    /// The single, still text-less subsection that carries an add-on.
    fn additional_element_subsection(
        &self,
        title: &str,
        start_rows: Graded<Row>,
        end_rows: Graded<Row>,
        interrupts_others: bool,
        warn_if_interrupted: bool,
        ctx: &Context,
    ) -> PatternResult<Self::Sub>;

    /// Last row of the piece in each size.
    fn final_rows(&self, pieces: &PieceList, _ctx: &Context) -> PatternResult<Graded<Row>> {
        pieces.final_rows()
    }
}

/// A section of knitting instructions for one piece, or one piece per size.
pub struct InstructionSection<C> {
    pieces: PieceList,
    templates: Arc<dyn TemplateService>,
    content: C,
}

impl<C: InstructionContent> InstructionSection<C> {
    pub fn new(pieces: PieceList, templates: Arc<dyn TemplateService>, content: C) -> Self {
        Self {
            pieces,
            templates,
            content,
        }
    }

    pub fn pieces(&self) -> &PieceList {
        &self.pieces
    }

    pub fn is_graded(&self) -> bool {
        self.pieces.is_graded()
    }

    /// Every element of the section: the content's own plus the design add-ons.
    pub fn make_elements(&self, ctx: &Context) -> PatternResult<Vec<Element<C::Sub>>> {
        let mut elements = self
            .content
            .make_elements(&self.pieces, self.templates.as_ref(), ctx)?;
        elements.extend(self.make_additional_elements(ctx)?);
        Ok(elements)
    }

    /// Turn the design's add-ons into ordinary elements.
    pub fn make_additional_elements(&self, ctx: &Context) -> PatternResult<Vec<Element<C::Sub>>> {
        let Some(design) = self.pieces.exemplar().design() else {
            return Ok(Vec::new());
        };
        self.content
            .additional_elements(&design)
            .into_iter()
            .map(|adl| self.element_from_design_element(adl, ctx))
            .collect()
    }

    fn element_from_design_element(
        &self,
        adl: &AdditionalDesignElement,
        ctx: &Context,
    ) -> PatternResult<Element<C::Sub>> {
        adl.validate()?;
        let start_rows = self.content.additional_element_start_rows(&self.pieces, adl)?;
        let final_rows = self.content.final_rows(&self.pieces, ctx)?;

        let starts_in_piece = start_rows.zip_with(&final_rows, |s, f| s <= f)?;
        if !starts_in_piece.all(|ok| *ok) {
            return Err(PatternError::validation(format!(
                "element '{}' starts on row {start_rows}, after the piece ends on row {final_rows}",
                adl.name
            )));
        }

        let heights = self.pieces.map(|p| adl.height_in_rows(p.gauge()));
        let end_rows = start_rows
            .zip_with(&heights, |s, h| match h {
                Some(h) => s.saturating_add(h.saturating_sub(1)),
                None => Row::MAX,
            })?
            .elementwise_min(&final_rows)?;

        let mut sub = self.content.additional_element_subsection(
            &adl.name,
            start_rows.clone(),
            end_rows.clone(),
            adl.interrupts_others(),
            adl.warn_if_interrupted(),
            ctx,
        )?;

        let mut el_ctx = ctx.clone();
        el_ctx.extend(self.additional_element_context(&start_rows, &end_rows)?);
        sub.text_mut()
            .add_template_source(self.templates.as_ref(), &adl.template, &el_ctx)?;

        Ok(Element::with_subsection(adl.name.clone(), sub))
    }

    fn additional_element_context(
        &self,
        start_rows: &Graded<Row>,
        end_rows: &Graded<Row>,
    ) -> PatternResult<Context> {
        let rows_per_inch = self.pieces.exemplar().gauge().rows;
        let heights = end_rows.zip_with(start_rows, |e, s| e - s + 1)?;

        let mut c = Context::new();
        c.insert("piece".to_string(), self.pieces.to_context_value()?);
        c.insert("start_row".to_string(), start_rows.to_context_value()?);
        c.insert("final_row".to_string(), end_rows.to_context_value()?);
        c.insert(
            "start_height".to_string(),
            inches(start_rows, rows_per_inch).to_context_value()?,
        );
        c.insert(
            "final_height".to_string(),
            inches(end_rows, rows_per_inch).to_context_value()?,
        );
        c.insert("height_in_rows".to_string(), heights.to_context_value()?);
        c.insert(
            "height_in_inches".to_string(),
            inches(&heights, rows_per_inch).to_context_value()?,
        );
        Ok(c)
    }
}

fn inches(rows: &Graded<Row>, rows_per_inch: f64) -> Graded<f64> {
    rows.map(|r| f64::from(*r) / rows_per_inch)
}

impl<C: InstructionContent> Section for InstructionSection<C> {
    fn title(&self) -> PatternResult<String> {
        self.content.title(&self.pieces)
    }

    fn css_class(&self) -> Option<&str> {
        self.content.css_class()
    }

    fn is_nonempty(&self) -> bool {
        self.content.is_nonempty(&self.pieces)
    }

    fn prepare_context(&self, ctx: &mut Context) -> PatternResult<()> {
        let exemplar = self.pieces.exemplar();
        if !ctx.contains_key("gauge") {
            ctx.insert("gauge".to_string(), serde_json::to_value(exemplar.gauge())?);
        }
        if !ctx.contains_key("design") {
            let design = match exemplar.design() {
                Some(d) => serde_json::to_value(d.as_ref())?,
                None => Value::Null,
            };
            ctx.insert("design".to_string(), design);
        }
        ctx.insert("piece".to_string(), self.pieces.to_context_value()?);
        ctx.insert("piece_is_graded".to_string(), Value::Bool(self.is_graded()));
        Ok(())
    }

    fn section_text(&self, ctx: &Context) -> PatternResult<String> {
        compose_elements(self.make_elements(ctx)?)
    }
}

/// Factory for instruction sections whose content has a default value.
pub fn build_instruction<C>(
    input: &SectionInput,
    templates: &Arc<dyn TemplateService>,
) -> PatternResult<Box<dyn Section>>
where
    C: InstructionContent + Default + 'static,
{
    let pieces = input.pieces()?.clone();
    Ok(Box::new(InstructionSection::new(
        pieces,
        Arc::clone(templates),
        C::default(),
    )))
}

/// Text for moving from one stitch pattern to another; empty when nothing changes.
pub fn stitch_transition_text(old: Option<&Stitch>, new: Option<&Stitch>) -> PatternResult<String> {
    match (old, new) {
        (_, None) => render_builtin("switch_to_whatever", &SwitchToWhatever),
        (Some(o), Some(n)) if o == n => Ok(String::new()),
        (_, Some(n)) => render_builtin(
            "switch_to",
            &SwitchTo {
                stitch_name: n.display_text(),
            },
        ),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/section/instruction.rs"]
mod tests;
