use askama::Template;
use serde::Serialize;

use crate::foundation::error::{PatternError, PatternResult};

/// Render a compiled-in template, logging the template and its context on failure.
pub(crate) fn render_builtin<T: Template + Serialize>(
    name: &str,
    tmpl: &T,
) -> PatternResult<String> {
    tmpl.render().map_err(|err| {
        let ctx_json = serde_json::to_string(tmpl).unwrap_or_default();
        tracing::error!(
            template = name,
            context = %ctx_json,
            error = %err,
            "error while rendering template"
        );
        PatternError::template_render(name, err.to_string())
    })
}

/// Top-level wrapper every section is rendered into.
#[derive(Template, Serialize)]
#[template(path = "section_frame.html")]
pub(crate) struct SectionFrame<'a> {
    pub title: &'a str,
    pub css_class: Option<&'a str>,
    pub body: &'a str,
}

/// Name and row range of an element, pre-formatted for display.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct ElementSummary {
    pub name: String,
    pub start: String,
    pub end: String,
}

#[derive(Clone, Debug, Serialize)]
pub(crate) struct OverlapLine {
    pub first: ElementSummary,
    pub second: ElementSummary,
    pub full: bool,
}

#[derive(Template, Serialize)]
#[template(path = "notices/single_overlap.html")]
pub(crate) struct SingleOverlapNotice<'a> {
    pub first: &'a ElementSummary,
    pub second: &'a ElementSummary,
    pub full: bool,
}

#[derive(Template, Serialize)]
#[template(path = "notices/multiple_overlaps.html")]
pub(crate) struct MultipleOverlapNotice<'a> {
    pub pairs: &'a [OverlapLine],
}

#[derive(Template, Serialize)]
#[template(path = "stitches/switch_to_whatever.html")]
pub(crate) struct SwitchToWhatever;

#[derive(Template, Serialize)]
#[template(path = "stitches/switch_to.html")]
pub(crate) struct SwitchTo<'a> {
    pub stitch_name: &'a str,
}

#[derive(Template, Serialize)]
#[template(path = "notes/designer_notes.html")]
pub(crate) struct DesignerNotesBody<'a> {
    pub notes: Option<&'a str>,
    pub credits: Option<&'a str>,
}

#[derive(Serialize)]
pub(crate) struct StitchNote<'a> {
    pub name: &'a str,
    pub notes: &'a str,
}

#[derive(Template, Serialize)]
#[template(path = "notes/stitches.html")]
pub(crate) struct StitchesBody<'a> {
    pub stitches: Vec<StitchNote<'a>>,
}

#[derive(Template, Serialize)]
#[template(path = "notes/personal_notes_web.html")]
pub(crate) struct PersonalNotesWebBody<'a> {
    pub notes: Option<&'a str>,
}

#[derive(Template, Serialize)]
#[template(path = "notes/personal_notes_pdf.html")]
pub(crate) struct PersonalNotesPdfBody<'a> {
    pub notes: &'a str,
}

#[derive(Template, Serialize)]
#[template(path = "notes/about_designer.html")]
pub(crate) struct AboutDesignerBody<'a> {
    pub paragraphs: Vec<&'a str>,
}

#[derive(Serialize)]
pub(crate) struct ChartRef<'a> {
    pub name: &'a str,
    pub url: &'a str,
}

#[derive(Template, Serialize)]
#[template(path = "notes/stitch_charts.html")]
pub(crate) struct StitchChartsBody<'a> {
    pub charts: Vec<ChartRef<'a>>,
}

#[derive(Template, Serialize)]
#[template(path = "notes/pattern_notes.html")]
pub(crate) struct PatternNotesBody;

#[derive(Template, Serialize)]
#[template(path = "notes/preamble_web.html")]
pub(crate) struct PreambleWebBody<'a> {
    pub notions: &'a str,
    pub needles: &'a str,
    pub design_choices: &'a [String],
}

#[derive(Template, Serialize)]
#[template(path = "notes/preamble_pdf.html")]
pub(crate) struct PreamblePdfBody<'a> {
    pub notions: &'a str,
    pub needles: &'a str,
    pub design_choices: &'a [String],
}

#[cfg(test)]
#[path = "../../tests/unit/template/builtin.rs"]
mod tests;
