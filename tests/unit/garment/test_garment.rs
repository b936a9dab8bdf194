use serde_json::json;

use super::*;
use crate::config::RenderConfig;
use crate::model::design::{Design, ElementHeight, OverlapBehavior, StartLocation};
use crate::render::cache::InMemoryCache;
use crate::render::pattern::PatternRenderer;
use crate::section::SectionInput;
use crate::template::TemplateSource;
use crate::text::subsection::FULL_OVERLAP_PREFACE;

fn gauge() -> Gauge {
    Gauge::new(5.0, 7.0).unwrap()
}

fn piece_spec(id: u64, cast_on: u32, total_rows: Row) -> TestPieceSpec {
    TestPieceSpec {
        id: PieceId(id),
        cast_on_stitches: cast_on,
        hem_rows: 10,
        total_rows,
        hem_stitch: Some("1x1 Rib".to_string()),
        main_stitch: Some("Stockinette".to_string()),
        cap_shaping_height: 14.0,
        gauge: gauge(),
    }
}

fn spec_source(additional_elements: Vec<AdditionalDesignElement>) -> Arc<SpecSource> {
    Arc::new(SpecSource {
        name: "Test".to_string(),
        stitches: vec![Stitch::named("1x1 Rib"), Stitch::named("Stockinette")],
        design_origin: Some(Arc::new(Design {
            name: "Test".to_string(),
            designer: None,
            additional_elements,
        })),
        ..SpecSource::default()
    })
}

fn templates() -> Arc<dyn TemplateService> {
    let mut t = JinjaTemplates::new();
    register_templates(&mut t).unwrap();
    Arc::new(t)
}

fn pieces(specs: Vec<TestPieceSpec>, src: &Arc<SpecSource>) -> PieceList {
    let refs = specs
        .into_iter()
        .map(|s| Arc::new(TestPiece::new(s, Arc::clone(src)).unwrap()) as PieceRef)
        .collect();
    PieceList::new(refs).unwrap()
}

fn render_section(pieces: PieceList) -> String {
    TEST_PIECE_SECTION
        .build(&SectionInput::Pieces(pieces), &templates())
        .unwrap()
        .render(Context::new())
        .unwrap()
        .into_string()
}

#[test]
fn single_piece_section_reads_in_order() {
    let src = spec_source(Vec::new());
    let html = render_section(pieces(vec![piece_spec(1, 100, 140)], &src));
    assert_eq!(
        html,
        "<div><div><h2>Test Piece</h2></div><div>\
         <p>Cast on 100 stitches. Work 10 rows in 1x1 Rib, ending with a wrong-side row.</p>\
         <p>Switch to Stockinette.</p>\
         <p>Work even until piece measures 20\" from cast-on, ending after row 140.</p>\
         <p>Bind off all stitches. Weave in ends and block to measurements.</p>\
         </div></div>"
    );
}

#[test]
fn graded_section_shows_every_size() {
    let src = spec_source(Vec::new());
    let html = render_section(pieces(
        vec![
            piece_spec(1, 100, 140),
            piece_spec(2, 110, 154),
            piece_spec(3, 120, 168),
        ],
        &src,
    ));
    assert!(html.contains("Cast on 100 (110, 120) stitches. Work 10 rows"));
    assert!(html.contains("measures 20\" (22\", 24\") from cast-on, ending after row 140 (154, 168)."));
}

#[test]
fn design_add_on_interrupts_the_body() {
    let stripe = AdditionalDesignElement {
        name: "Stripe".to_string(),
        start_location: StartLocation::AfterCastOn { inches: 3.0 },
        height: ElementHeight::Rows { value: 6 },
        overlap_behavior: OverlapBehavior::Instructions,
        template: TemplateSource::new("Stripe", "<p>Work a stripe.</p>"),
    };
    let src = spec_source(vec![stripe]);
    let html = render_section(pieces(vec![piece_spec(1, 100, 140)], &src));

    assert!(html.contains(
        "In particular, Body will overlap Stripe. Body begins on row 11 and ends on row 140. \
         Stripe begins on row 21 and ends on row 26."
    ));
    let body = html.find("Work even until").unwrap();
    let stripe = html
        .find(&format!("{FULL_OVERLAP_PREFACE}<p>Work a stripe.</p>"))
        .unwrap();
    let finishing = html.find("Bind off").unwrap();
    assert!(body < stripe && stripe < finishing);
}

#[test]
fn same_stitch_needs_no_transition() {
    let src = spec_source(Vec::new());
    let mut spec = piece_spec(1, 100, 140);
    spec.main_stitch = Some("1x1 Rib".to_string());
    let html = render_section(pieces(vec![spec], &src));
    assert!(!html.contains("Switch to"));
}

#[test]
fn piece_rejects_inconsistent_rows() {
    let src = spec_source(Vec::new());
    let mut spec = piece_spec(1, 100, 140);
    spec.total_rows = 10;
    let err = TestPiece::new(spec, Arc::clone(&src)).unwrap_err();
    assert!(matches!(err, PatternError::Validation(_)));

    let mut spec = piece_spec(1, 100, 140);
    spec.hem_rows = 0;
    assert!(TestPiece::new(spec, src).is_err());
}

#[test]
fn piece_fields_expose_display_names() {
    let src = Arc::new(SpecSource {
        stitches: vec![Stitch {
            patterntext: Some("twisted rib".to_string()),
            ..Stitch::named("1x1 Rib")
        }],
        ..SpecSource::default()
    });
    let piece = TestPiece::new(piece_spec(1, 100, 140), src).unwrap();
    let fields = piece.fields();
    assert_eq!(fields["hem_stitch"], json!("twisted rib"));
    assert_eq!(fields["main_stitch"], json!("Stockinette"));
    assert_eq!(fields["body_length"], json!(20.0));
    assert_eq!(piece.final_row(), 140);
}

#[test]
fn layout_names_and_instruction_inputs() {
    let doc = TestGarmentDocument::from_json(include_str!("../../data/graded_pullover.json")).unwrap();
    let pattern = doc.into_pattern().unwrap();
    assert_eq!(pattern.kind, GRADED_PATTERN_KIND);

    let graded = TestGarmentLayout::new(LayoutFormat::PdfFull, true);
    assert_eq!(graded.name(), "GradedTestPatternRendererPdfFull");
    let entries = graded.instructions(&pattern).unwrap();
    assert_eq!(entries[0].input.as_ref().unwrap().ids(), vec![101, 102, 103]);

    let single = TestGarmentLayout::new(LayoutFormat::WebFull, false);
    assert_eq!(single.name(), "TestPatternRendererWebFull");
    let entries = single.instructions(&pattern).unwrap();
    assert_eq!(entries[0].input.as_ref().unwrap().ids(), vec![101]);

    let abridged = TestGarmentLayout::new(LayoutFormat::PdfAbridged, false);
    assert_eq!(abridged.preamble(&pattern).unwrap().len(), 3);
}

#[test]
fn document_requires_pieces() {
    let doc = TestGarmentDocument {
        id: PatternId(1),
        name: "Empty".to_string(),
        notes: None,
        spec_source: SpecSource::default(),
        pieces: Vec::new(),
        schematic: None,
    };
    assert!(matches!(
        doc.into_pattern().unwrap_err(),
        PatternError::Validation(_)
    ));
}

#[test]
fn full_render_of_the_fixture() {
    let doc = TestGarmentDocument::from_json(include_str!("../../data/graded_pullover.json")).unwrap();
    let pattern = doc.into_pattern().unwrap();
    let layout = TestGarmentLayout::new(LayoutFormat::WebFull, true);
    let r = PatternRenderer::new(
        pattern,
        &layout,
        Arc::new(InMemoryCache::new()),
        templates(),
        RenderConfig::default(),
    )
    .unwrap();
    let html = r.render_pattern().unwrap().into_string();

    let order = [
        "<h2>Pattern Information</h2>",
        "<h2>Your Notes</h2>",
        "<h2>Design Notes</h2>",
        "<h2>Stitches</h2>",
        "<h2>Pattern Notes</h2>",
        "<h2>Test Piece</h2>",
        "<h2>About Alex</h2>",
        "<h2>Stitch Charts</h2>",
    ];
    let positions: Vec<usize> = order.iter().map(|h| html.find(h).unwrap()).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert!(!html.contains("Pattern Schematic"));
    assert!(html.contains("<p>Work rows 21 to 26 in seed stitch.</p>"));
}
