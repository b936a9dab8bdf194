//! Informational sections built around the whole pattern.

use crate::foundation::error::{PatternError, PatternResult};
use crate::model::pattern::Pattern;
use crate::section::SectionClass;
use crate::section::information::{InformationContent, build_information, non_blank};
use crate::template::builtin::{
    AboutDesignerBody, ChartRef, DesignerNotesBody, PatternNotesBody, PersonalNotesPdfBody,
    PersonalNotesWebBody, PreamblePdfBody, PreambleWebBody, StitchChartsBody, StitchNote,
    StitchesBody, render_builtin,
};
use crate::template::{Context, TemplateService};
use crate::text::builder::TextBuilder;

pub const DESIGNER_NOTES: SectionClass =
    SectionClass::new("DesignerNotesSection", build_information::<DesignerNotes>);
pub const STITCHES: SectionClass =
    SectionClass::new("StitchesSection", build_information::<Stitches>);
pub const WEB_PERSONAL_NOTES: SectionClass =
    SectionClass::new("WebPersonalNotesSection", build_information::<WebPersonalNotes>);
pub const PDF_PERSONAL_NOTES: SectionClass =
    SectionClass::new("PdfPersonalNotesSection", build_information::<PdfPersonalNotes>);
pub const ABOUT_DESIGNER: SectionClass =
    SectionClass::new("AboutDesignerSection", build_information::<AboutDesigner>);
pub const STITCH_CHARTS: SectionClass =
    SectionClass::new("StitchChartsSection", build_information::<StitchCharts>);
pub const PATTERN_NOTES: SectionClass =
    SectionClass::new("PatternNotesSection", build_information::<PatternNotes>);
pub const SCHEMATIC: SectionClass =
    SectionClass::new("SchematicSection", build_information::<SchematicNotes>);
pub const WEB_PREAMBLE: SectionClass =
    SectionClass::new("WebPreambleSection", build_information::<WebPreamble>);
pub const PDF_PREAMBLE: SectionClass =
    SectionClass::new("PdfPreambleSection", build_information::<PdfPreamble>);

/// Design description and credits.
#[derive(Default)]
pub struct DesignerNotes;

impl InformationContent for DesignerNotes {
    fn title(&self, _pattern: &Pattern) -> PatternResult<String> {
        Ok("Design Notes".to_string())
    }

    fn is_nonempty(&self, pattern: &Pattern) -> bool {
        let src = &pattern.spec_source;
        non_blank(src.description.as_deref()).is_some()
            || non_blank(src.pattern_credits.as_deref()).is_some()
    }

    fn gather_text(
        &self,
        pattern: &Pattern,
        _templates: &dyn TemplateService,
        _ctx: &Context,
        text: &mut TextBuilder,
    ) -> PatternResult<()> {
        let src = &pattern.spec_source;
        text.add_text(render_builtin(
            "designer_notes",
            &DesignerNotesBody {
                notes: non_blank(src.description.as_deref()),
                credits: non_blank(src.pattern_credits.as_deref()),
            },
        )?);
        Ok(())
    }
}

/// Notes for every stitch that has some.
#[derive(Default)]
pub struct Stitches;

impl Stitches {
    fn with_notes(pattern: &Pattern) -> Vec<StitchNote<'_>> {
        pattern
            .spec_source
            .stitches_used()
            .iter()
            .filter_map(|s| {
                non_blank(s.notes.as_deref()).map(|notes| StitchNote {
                    name: &s.name,
                    notes,
                })
            })
            .collect()
    }
}

impl InformationContent for Stitches {
    fn title(&self, _pattern: &Pattern) -> PatternResult<String> {
        Ok("Stitches".to_string())
    }

    fn is_nonempty(&self, pattern: &Pattern) -> bool {
        !Self::with_notes(pattern).is_empty()
    }

    fn gather_text(
        &self,
        pattern: &Pattern,
        _templates: &dyn TemplateService,
        _ctx: &Context,
        text: &mut TextBuilder,
    ) -> PatternResult<()> {
        text.add_text(render_builtin(
            "stitches",
            &StitchesBody {
                stitches: Self::with_notes(pattern),
            },
        )?);
        Ok(())
    }
}

/// The knitter's own notes. Always shown on the web, where notes can be added.
#[derive(Default)]
pub struct WebPersonalNotes;

impl InformationContent for WebPersonalNotes {
    fn title(&self, _pattern: &Pattern) -> PatternResult<String> {
        Ok("Your Notes".to_string())
    }

    fn gather_text(
        &self,
        pattern: &Pattern,
        _templates: &dyn TemplateService,
        _ctx: &Context,
        text: &mut TextBuilder,
    ) -> PatternResult<()> {
        text.add_text(render_builtin(
            "personal_notes_web",
            &PersonalNotesWebBody {
                notes: pattern.notes_text(),
            },
        )?);
        Ok(())
    }
}

/// The knitter's own notes, only when there are some.
#[derive(Default)]
pub struct PdfPersonalNotes;

impl InformationContent for PdfPersonalNotes {
    fn title(&self, _pattern: &Pattern) -> PatternResult<String> {
        Ok("Your Notes".to_string())
    }

    fn is_nonempty(&self, pattern: &Pattern) -> bool {
        pattern.notes_text().is_some()
    }

    fn gather_text(
        &self,
        pattern: &Pattern,
        _templates: &dyn TemplateService,
        _ctx: &Context,
        text: &mut TextBuilder,
    ) -> PatternResult<()> {
        text.add_text(render_builtin(
            "personal_notes_pdf",
            &PersonalNotesPdfBody {
                notes: pattern.notes_text().unwrap_or_default(),
            },
        )?);
        Ok(())
    }
}

/// Designer biography, long form preferred.
#[derive(Default)]
pub struct AboutDesigner;

impl AboutDesigner {
    fn paragraphs(pattern: &Pattern) -> Vec<&str> {
        let Some(designer) = pattern.spec_source.designer() else {
            return Vec::new();
        };
        if let Some(long) = non_blank(designer.about_long.as_deref()) {
            return long
                .split("\n\n")
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .collect();
        }
        non_blank(designer.about_short.as_deref())
            .into_iter()
            .collect()
    }
}

impl InformationContent for AboutDesigner {
    fn title(&self, pattern: &Pattern) -> PatternResult<String> {
        let designer = pattern
            .spec_source
            .designer()
            .ok_or_else(|| PatternError::validation("pattern has no designer"))?;
        Ok(format!("About {}", designer.short_name))
    }

    fn is_nonempty(&self, pattern: &Pattern) -> bool {
        !Self::paragraphs(pattern).is_empty()
    }

    fn gather_text(
        &self,
        pattern: &Pattern,
        _templates: &dyn TemplateService,
        _ctx: &Context,
        text: &mut TextBuilder,
    ) -> PatternResult<()> {
        text.add_text(render_builtin(
            "about_designer",
            &AboutDesignerBody {
                paragraphs: Self::paragraphs(pattern),
            },
        )?);
        Ok(())
    }
}

/// Chart images for stitches that have them.
#[derive(Default)]
pub struct StitchCharts;

impl StitchCharts {
    fn charts(pattern: &Pattern) -> Vec<ChartRef<'_>> {
        pattern
            .spec_source
            .stitches_used()
            .iter()
            .filter_map(|s| {
                non_blank(s.chart.as_deref()).map(|url| ChartRef {
                    name: &s.name,
                    url,
                })
            })
            .collect()
    }
}

impl InformationContent for StitchCharts {
    fn title(&self, _pattern: &Pattern) -> PatternResult<String> {
        Ok("Stitch Charts".to_string())
    }

    fn css_class(&self) -> Option<&'static str> {
        Some("stitch-chart-section")
    }

    fn is_nonempty(&self, pattern: &Pattern) -> bool {
        !Self::charts(pattern).is_empty()
    }

    fn gather_text(
        &self,
        pattern: &Pattern,
        _templates: &dyn TemplateService,
        _ctx: &Context,
        text: &mut TextBuilder,
    ) -> PatternResult<()> {
        text.add_text(render_builtin(
            "stitch_charts",
            &StitchChartsBody {
                charts: Self::charts(pattern),
            },
        )?);
        Ok(())
    }
}

/// Fixed knitting conventions.
#[derive(Default)]
pub struct PatternNotes;

impl InformationContent for PatternNotes {
    fn title(&self, _pattern: &Pattern) -> PatternResult<String> {
        Ok("Pattern Notes".to_string())
    }

    fn gather_text(
        &self,
        _pattern: &Pattern,
        _templates: &dyn TemplateService,
        _ctx: &Context,
        text: &mut TextBuilder,
    ) -> PatternResult<()> {
        text.add_text(render_builtin("pattern_notes", &PatternNotesBody)?);
        Ok(())
    }
}

/// The pattern's schematic drawing, rendered from its own template.
#[derive(Default)]
pub struct SchematicNotes;

impl InformationContent for SchematicNotes {
    fn title(&self, _pattern: &Pattern) -> PatternResult<String> {
        Ok("Pattern Schematic".to_string())
    }

    fn css_class(&self) -> Option<&'static str> {
        Some("schematic-section")
    }

    fn is_nonempty(&self, pattern: &Pattern) -> bool {
        pattern.schematic.is_some()
    }

    fn gather_text(
        &self,
        pattern: &Pattern,
        templates: &dyn TemplateService,
        ctx: &Context,
        text: &mut TextBuilder,
    ) -> PatternResult<()> {
        let Some(schematic) = &pattern.schematic else {
            return Ok(());
        };
        let mut schematic_ctx = schematic.context.clone();
        schematic_ctx.extend(ctx.clone());
        text.add_template_source(templates, &schematic.template, &schematic_ctx)
    }
}

const BASE_NOTIONS: &str = "Stitch markers, stitch holders, tapestry needle";

fn notions_text(pattern: &Pattern) -> String {
    let src = &pattern.spec_source;
    let mut parts = vec![BASE_NOTIONS];
    parts.extend(non_blank(src.notions.as_deref()));
    parts.extend(
        src.stitches_used()
            .iter()
            .filter_map(|s| non_blank(s.extra_notions_text.as_deref())),
    );
    parts.join(", ")
}

fn needles_text(pattern: &Pattern) -> String {
    let src = &pattern.spec_source;
    let mut out = String::new();
    if let Some(swatch) = non_blank(src.swatch_needle_size.as_deref()) {
        out.push_str(swatch);
        out.push_str(if swatch.ends_with('.') { " " } else { ". " });
    }
    if let Some(needles) = non_blank(src.needles.as_deref()) {
        out.push_str(needles);
    }
    out.trim_end().to_string()
}

/// "Pattern Information": notions, needles and design choices, as a web list.
#[derive(Default)]
pub struct WebPreamble;

impl InformationContent for WebPreamble {
    fn title(&self, _pattern: &Pattern) -> PatternResult<String> {
        Ok("Pattern Information".to_string())
    }

    fn gather_text(
        &self,
        pattern: &Pattern,
        _templates: &dyn TemplateService,
        _ctx: &Context,
        text: &mut TextBuilder,
    ) -> PatternResult<()> {
        let notions = notions_text(pattern);
        let needles = needles_text(pattern);
        text.add_text(render_builtin(
            "preamble_web",
            &PreambleWebBody {
                notions: &notions,
                needles: &needles,
                design_choices: &pattern.spec_source.design_choices,
            },
        )?);
        Ok(())
    }
}

/// "Pattern Information" laid out for print.
#[derive(Default)]
pub struct PdfPreamble;

impl InformationContent for PdfPreamble {
    fn title(&self, _pattern: &Pattern) -> PatternResult<String> {
        Ok("Pattern Information".to_string())
    }

    fn gather_text(
        &self,
        pattern: &Pattern,
        _templates: &dyn TemplateService,
        _ctx: &Context,
        text: &mut TextBuilder,
    ) -> PatternResult<()> {
        let notions = notions_text(pattern);
        let needles = needles_text(pattern);
        text.add_text(render_builtin(
            "preamble_pdf",
            &PreamblePdfBody {
                notions: &notions,
                needles: &needles,
                design_choices: &pattern.spec_source.design_choices,
            },
        )?);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/section/notes.rs"]
mod tests;
