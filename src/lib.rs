//! patterntext composes per-piece knitting instructions into complete HTML patterns.
//!
//! The pieces of a pattern are computed elsewhere; this crate turns them into text:
//!
//! - Wrap one piece per size in a [`PieceList`] so templates see graded values
//! - Build [`Element`]s of row-positioned [`SubSection`]s and let an [`InstructionSection`]
//!   order them and warn where instructions overlap
//! - Render a whole [`Pattern`] through a [`PatternLayout`] with a [`PatternRenderer`], which
//!   caches every section and chunk in a [`RenderCache`]
#![forbid(unsafe_code)]

mod config;
mod foundation;
mod garment;
mod model;
mod piece;
mod render;
mod section;
mod template;
mod text;

pub use crate::config::{DEFAULT_CACHE_KEY_PREFIX, RenderConfig};
pub use crate::foundation::core::{Gauge, PatternId, PieceId, Row, SafeHtml};
pub use crate::foundation::error::{PatternError, PatternResult};
pub use crate::foundation::graded::Graded;
pub use crate::foundation::math::{RoundDirection, round_to, round_to_even, round_to_odd};

pub use crate::piece::list::{Broadcast, GradedMethod, PieceList};
pub use crate::piece::{Attr, Method, Piece, PieceRef};

pub use crate::model::design::{
    AdditionalDesignElement, Design, Designer, ElementHeight, OverlapBehavior, SpecSource,
    StartLocation, Stitch,
};
pub use crate::model::pattern::{Pattern, Schematic};

pub use crate::template::format::{count_fmt, length_fmt};
pub use crate::template::jinja::JinjaTemplates;
pub use crate::template::{Context, TemplateService, TemplateSource, context};

pub use crate::text::builder::TextBuilder;
pub use crate::text::element::Element;
pub use crate::text::subsection::{
    FULL_OVERLAP_PREFACE, Overlap, PARTIAL_OVERLAP_PREFACE, Quantifier, RowSubSection, SubSection,
    SubSectionText, rows_start_during,
};

pub use crate::section::compose::{compose_elements, element_overlaps};
pub use crate::section::information::{InformationContent, InformationSection, build_information};
pub use crate::section::instruction::{
    InstructionContent, InstructionSection, build_instruction, stitch_transition_text,
};
pub use crate::section::notes;
pub use crate::section::{
    PIECE_NAME_KEY, SECTION_CSS_CLASS_KEY, Section, SectionClass, SectionFactory, SectionInput,
};

pub use crate::render::cache::{
    CHARTS_CHUNK, CHUNK_NAMES, INSTRUCTIONS_CHUNK, InMemoryCache, NullCache, PATTERN_CHUNK,
    POSTAMBLE_CHUNK, PREAMBLE_CHUNK, RenderCache, make_cache_key,
};
pub use crate::render::pattern::{
    CacheStats, PatternLayout, PatternRenderer, SectionEntry, section_extra_context,
};

pub use crate::garment::test_garment::{
    LayoutFormat, TEST_PIECE_SECTION, TestGarmentDocument, TestGarmentLayout, TestPiece,
    TestPieceInstructions, TestPieceSpec,
    register_templates as register_test_garment_templates,
};
