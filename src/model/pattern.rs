use std::fmt;
use std::sync::Arc;

use crate::foundation::core::PatternId;
use crate::model::design::SpecSource;
use crate::piece::PieceRef;
use crate::template::{Context, TemplateSource};

/// Schematic drawing for a pattern: a template plus the measurements it displays.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Schematic {
    pub template: TemplateSource,
    #[serde(default)]
    pub context: Context,
}

/// A knitting pattern ready to be rendered: its pieces plus design-level context.
#[derive(Clone)]
pub struct Pattern {
    pub id: PatternId,
    pub name: String,
    /// Type name used as a cache-key component for pattern-level sections.
    pub kind: String,
    pub notes: Option<String>,
    pub spec_source: Arc<SpecSource>,
    pub pieces: Vec<PieceRef>,
    pub schematic: Option<Schematic>,
}

impl Pattern {
    pub fn new(id: PatternId, name: impl Into<String>, spec_source: Arc<SpecSource>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: "IndividualPattern".to_string(),
            notes: None,
            spec_source,
            pieces: Vec::new(),
            schematic: None,
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_pieces(mut self, pieces: Vec<PieceRef>) -> Self {
        self.pieces = pieces;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_schematic(mut self, schematic: Schematic) -> Self {
        self.schematic = Some(schematic);
        self
    }

    /// First piece of the given kind.
    pub fn piece_of_kind(&self, kind: &str) -> Option<&PieceRef> {
        self.pieces.iter().find(|p| p.kind() == kind)
    }

    /// Template-facing summary of the pattern.
    pub fn to_context_value(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id.0,
            "name": self.name,
            "kind": self.kind,
            "notes": self.notes_text(),
        })
    }

    /// Notes with surrounding whitespace removed; `None` when blank.
    pub fn notes_text(&self) -> Option<&str> {
        self.notes.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("pieces", &self.pieces.len())
            .finish()
    }
}
