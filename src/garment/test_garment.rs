//! A minimal garment used to exercise the whole engine: one rectangular piece with a hem.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::foundation::core::{Gauge, PatternId, PieceId, Row};
use crate::foundation::error::{PatternError, PatternResult};
use crate::foundation::graded::Graded;
use crate::model::design::{AdditionalDesignElement, SpecSource, Stitch};
use crate::model::pattern::{Pattern, Schematic};
use crate::piece::list::PieceList;
use crate::piece::{Piece, PieceRef};
use crate::render::pattern::{PatternLayout, SectionEntry};
use crate::section::SectionClass;
use crate::section::instruction::{InstructionContent, build_instruction, stitch_transition_text};
use crate::section::notes;
use crate::template::jinja::JinjaTemplates;
use crate::template::{Context, TemplateService};
use crate::text::element::Element;
use crate::text::subsection::{RowSubSection, SubSection};

pub const TEST_PIECE_KIND: &str = "TestPiece";
pub const INDIVIDUAL_PATTERN_KIND: &str = "TestIndividualPattern";
pub const GRADED_PATTERN_KIND: &str = "TestGradedPattern";

pub const CAST_ON_TEMPLATE: &str = "test_garment/cast_on.html";
pub const BODY_TEMPLATE: &str = "test_garment/body.html";
pub const FINISHING_TEMPLATE: &str = "test_garment/finishing.html";

const TEMPLATES: [(&str, &str); 3] = [
    (
        CAST_ON_TEMPLATE,
        include_str!("../../templates/test_garment/cast_on.html"),
    ),
    (
        BODY_TEMPLATE,
        include_str!("../../templates/test_garment/body.html"),
    ),
    (
        FINISHING_TEMPLATE,
        include_str!("../../templates/test_garment/finishing.html"),
    ),
];

/// Register the garment's instruction templates.
pub fn register_templates(templates: &mut JinjaTemplates) -> PatternResult<()> {
    for (name, source) in TEMPLATES {
        templates.add_template(name, source)?;
    }
    Ok(())
}

/// Computed numbers for one size of the test piece.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestPieceSpec {
    pub id: PieceId,
    pub cast_on_stitches: u32,
    pub hem_rows: Row,
    pub total_rows: Row,
    #[serde(default)]
    pub hem_stitch: Option<String>,
    #[serde(default)]
    pub main_stitch: Option<String>,
    /// Height, in inches from the cast-on, where cap shaping would begin.
    #[serde(default)]
    pub cap_shaping_height: f64,
    pub gauge: Gauge,
}

#[derive(Debug)]
pub struct TestPiece {
    spec: TestPieceSpec,
    spec_source: Arc<SpecSource>,
}

impl TestPiece {
    pub fn new(spec: TestPieceSpec, spec_source: Arc<SpecSource>) -> PatternResult<Self> {
        spec.gauge.validate()?;
        if spec.hem_rows == 0 {
            return Err(PatternError::validation(format!(
                "piece {}: hem must have at least one row",
                spec.id
            )));
        }
        if spec.total_rows <= spec.hem_rows {
            return Err(PatternError::validation(format!(
                "piece {}: total rows ({}) must exceed hem rows ({})",
                spec.id, spec.total_rows, spec.hem_rows
            )));
        }
        if !(spec.cap_shaping_height.is_finite() && spec.cap_shaping_height >= 0.0) {
            return Err(PatternError::validation(format!(
                "piece {}: cap shaping height must be >= 0",
                spec.id
            )));
        }
        Ok(Self { spec, spec_source })
    }

    pub fn spec(&self) -> &TestPieceSpec {
        &self.spec
    }

    fn stitch(&self, name: Option<&str>) -> Option<Stitch> {
        name.map(|n| resolve_stitch(&self.spec_source, n))
    }

    pub fn hem_stitch(&self) -> Option<Stitch> {
        self.stitch(self.spec.hem_stitch.as_deref())
    }

    pub fn main_stitch(&self) -> Option<Stitch> {
        self.stitch(self.spec.main_stitch.as_deref())
    }

    pub fn body_length(&self) -> f64 {
        self.spec.gauge.rows_to_inches(f64::from(self.spec.total_rows))
    }
}

impl Piece for TestPiece {
    fn id(&self) -> PieceId {
        self.spec.id
    }

    fn kind(&self) -> &str {
        TEST_PIECE_KIND
    }

    fn gauge(&self) -> Gauge {
        self.spec.gauge
    }

    fn spec_source(&self) -> Arc<SpecSource> {
        Arc::clone(&self.spec_source)
    }

    fn final_row(&self) -> Row {
        self.spec.total_rows
    }

    fn fields(&self) -> Context {
        let stitch_text = |s: Option<Stitch>| match s {
            Some(s) => Value::from(s.display_text()),
            None => Value::Null,
        };
        let mut c = Context::new();
        c.insert(
            "cast_on_stitches".to_string(),
            Value::from(self.spec.cast_on_stitches),
        );
        c.insert("hem_rows".to_string(), Value::from(self.spec.hem_rows));
        c.insert("total_rows".to_string(), Value::from(self.spec.total_rows));
        c.insert("body_length".to_string(), Value::from(self.body_length()));
        c.insert(
            "cap_shaping_height".to_string(),
            Value::from(self.spec.cap_shaping_height),
        );
        c.insert("hem_stitch".to_string(), stitch_text(self.hem_stitch()));
        c.insert("main_stitch".to_string(), stitch_text(self.main_stitch()));
        c
    }
}

/// The stitch called `name` (by name or display text), or a bare stitch when the design lists none.
fn resolve_stitch(spec_source: &SpecSource, name: &str) -> Stitch {
    spec_source
        .stitches_used()
        .iter()
        .find(|s| s.name == name || s.display_text() == name)
        .cloned()
        .unwrap_or_else(|| Stitch::named(name))
}

pub const TEST_PIECE_SECTION: SectionClass =
    SectionClass::new("TestPieceSection", build_instruction::<TestPieceInstructions>);

/// Instructions for the test piece: cast-on and hem, body, any design add-ons, finishing.
#[derive(Default)]
pub struct TestPieceInstructions;

impl TestPieceInstructions {
    /// Hem and main stitches, as named by the exemplar piece.
    fn stitches(pieces: &PieceList) -> (Option<Stitch>, Option<Stitch>) {
        let exemplar = pieces.exemplar();
        let spec_source = exemplar.spec_source();
        let stitch = |key: &str| {
            let value = exemplar.item(key)?;
            Some(resolve_stitch(&spec_source, value.as_str()?))
        };
        (stitch("hem_stitch"), stitch("main_stitch"))
    }
}

impl InstructionContent for TestPieceInstructions {
    type Sub = RowSubSection;

    fn title(&self, _pieces: &PieceList) -> PatternResult<String> {
        Ok("Test Piece".to_string())
    }

    fn make_elements(
        &self,
        pieces: &PieceList,
        templates: &dyn TemplateService,
        ctx: &Context,
    ) -> PatternResult<Vec<Element<RowSubSection>>> {
        let hem_rows = pieces.rows("hem_rows")?;
        let final_rows = pieces.final_rows()?;
        let first_rows = Graded::repeat(1, pieces.len())?;
        let (hem_stitch, main_stitch) = Self::stitches(pieces);

        let mut cast_on =
            RowSubSection::positioned("Cast-on and hem", first_rows, hem_rows.clone(), true, true)?;
        cast_on
            .text_mut()
            .add_template_named(templates, CAST_ON_TEMPLATE, ctx)?;

        let body_start = hem_rows.map(|r| r + 1);
        let mut body = RowSubSection::positioned("Body", body_start, final_rows, true, true)?;
        let transition = stitch_transition_text(hem_stitch.as_ref(), main_stitch.as_ref())?;
        if !transition.is_empty() {
            body.text_mut().add_text(transition);
        }
        body.text_mut()
            .add_template_named(templates, BODY_TEMPLATE, ctx)?;

        let mut finishing = RowSubSection::unpositioned("Finishing", 0);
        finishing
            .text_mut()
            .add_template_named(templates, FINISHING_TEMPLATE, ctx)?;

        Ok(vec![
            Element::with_subsection("Cast-on and hem", cast_on),
            Element::with_subsection("Body", body),
            Element::with_subsection("Finishing", finishing),
        ])
    }

    fn additional_element_start_rows(
        &self,
        pieces: &PieceList,
        element: &AdditionalDesignElement,
    ) -> PatternResult<Graded<Row>> {
        let cap_heights = pieces.numbers("cap_shaping_height")?;
        let gauges = pieces.map(|p| p.gauge());
        cap_heights.zip_with(&gauges, |cap, gauge| element.start_row(*cap, *gauge))
    }

    fn additional_element_subsection(
        &self,
        title: &str,
        start_rows: Graded<Row>,
        end_rows: Graded<Row>,
        interrupts_others: bool,
        warn_if_interrupted: bool,
        _ctx: &Context,
    ) -> PatternResult<RowSubSection> {
        RowSubSection::positioned(
            title,
            start_rows,
            end_rows,
            interrupts_others,
            warn_if_interrupted,
        )
    }
}

/// Output flavour of a test-garment pattern.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutFormat {
    #[default]
    WebFull,
    PdfFull,
    PdfAbridged,
}

/// Section layout for test-garment patterns, per piece or broadcast over every size.
#[derive(Clone, Debug)]
pub struct TestGarmentLayout {
    format: LayoutFormat,
    graded: bool,
    name: String,
}

impl TestGarmentLayout {
    pub fn new(format: LayoutFormat, graded: bool) -> Self {
        let base = match format {
            LayoutFormat::WebFull => "TestPatternRendererWebFull",
            LayoutFormat::PdfFull => "TestPatternRendererPdfFull",
            LayoutFormat::PdfAbridged => "TestPatternRendererPdfAbridged",
        };
        let name = if graded {
            format!("Graded{base}")
        } else {
            base.to_string()
        };
        Self {
            format,
            graded,
            name,
        }
    }

    pub fn format(&self) -> LayoutFormat {
        self.format
    }

    pub fn is_graded(&self) -> bool {
        self.graded
    }

    fn test_pieces(&self, pattern: &Pattern) -> PatternResult<Option<PieceList>> {
        let pieces: Vec<PieceRef> = pattern
            .pieces
            .iter()
            .filter(|p| p.kind() == TEST_PIECE_KIND)
            .cloned()
            .collect();
        if pieces.is_empty() {
            return Ok(None);
        }
        if self.graded {
            PieceList::new(pieces).map(Some)
        } else {
            Ok(pieces.into_iter().next().map(PieceList::single))
        }
    }
}

impl PatternLayout for TestGarmentLayout {
    fn name(&self) -> &str {
        &self.name
    }

    fn preamble(&self, pattern: &Arc<Pattern>) -> PatternResult<Vec<SectionEntry>> {
        let classes: &[SectionClass] = match self.format {
            LayoutFormat::WebFull => &[
                notes::WEB_PREAMBLE,
                notes::WEB_PERSONAL_NOTES,
                notes::DESIGNER_NOTES,
                notes::STITCHES,
                notes::PATTERN_NOTES,
                notes::SCHEMATIC,
            ],
            LayoutFormat::PdfFull => &[
                notes::PDF_PREAMBLE,
                notes::PDF_PERSONAL_NOTES,
                notes::DESIGNER_NOTES,
                notes::STITCHES,
                notes::PATTERN_NOTES,
                notes::SCHEMATIC,
            ],
            LayoutFormat::PdfAbridged => &[
                notes::PDF_PERSONAL_NOTES,
                notes::DESIGNER_NOTES,
                notes::STITCHES,
            ],
        };
        Ok(classes
            .iter()
            .map(|class| SectionEntry::pattern(pattern, *class))
            .collect())
    }

    fn instructions(&self, pattern: &Arc<Pattern>) -> PatternResult<Vec<SectionEntry>> {
        Ok(vec![SectionEntry::pieces(
            self.test_pieces(pattern)?,
            TEST_PIECE_SECTION,
        )])
    }

    fn postamble(&self, pattern: &Arc<Pattern>) -> PatternResult<Vec<SectionEntry>> {
        Ok(vec![SectionEntry::pattern(pattern, notes::ABOUT_DESIGNER)])
    }

    fn charts(&self, pattern: &Arc<Pattern>) -> PatternResult<Vec<SectionEntry>> {
        Ok(vec![SectionEntry::pattern(pattern, notes::STITCH_CHARTS)])
    }
}

/// On-disk description of a test-garment pattern.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestGarmentDocument {
    pub id: PatternId,
    pub name: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub spec_source: SpecSource,
    pub pieces: Vec<TestPieceSpec>,
    #[serde(default)]
    pub schematic: Option<Schematic>,
}

impl TestGarmentDocument {
    pub fn from_json(json: &str) -> PatternResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate the document and build the pattern it describes. More than one piece makes a
    /// graded pattern.
    pub fn into_pattern(self) -> PatternResult<Arc<Pattern>> {
        self.spec_source.validate()?;
        if self.pieces.is_empty() {
            return Err(PatternError::validation(format!(
                "pattern {} has no pieces",
                self.id
            )));
        }
        let kind = if self.pieces.len() > 1 {
            GRADED_PATTERN_KIND
        } else {
            INDIVIDUAL_PATTERN_KIND
        };
        let spec_source = Arc::new(self.spec_source);
        let pieces = self
            .pieces
            .into_iter()
            .map(|spec| {
                TestPiece::new(spec, Arc::clone(&spec_source)).map(|p| Arc::new(p) as PieceRef)
            })
            .collect::<PatternResult<Vec<_>>>()?;

        let mut pattern = Pattern::new(self.id, self.name, spec_source)
            .with_kind(kind)
            .with_pieces(pieces);
        if let Some(notes) = self.notes {
            pattern = pattern.with_notes(notes);
        }
        if let Some(schematic) = self.schematic {
            pattern = pattern.with_schematic(schematic);
        }
        Ok(Arc::new(pattern))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/garment/test_garment.rs"]
mod tests;
