//! Read-only access to computed garment pieces.

pub(crate) mod list;

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::foundation::core::{Gauge, PieceId, Row};
use crate::foundation::error::PatternResult;
use crate::model::design::{Design, SpecSource};
use crate::template::Context;

/// Shared handle to a piece.
pub type PieceRef = Arc<dyn Piece>;

/// A zero-or-more argument accessor exposed by a piece, such as `final_row`.
pub type Method = Arc<dyn Fn(&[Value]) -> PatternResult<Value> + Send + Sync>;

/// Result of looking up a named attribute on a piece.
#[derive(Clone)]
pub enum Attr {
    Value(Value),
    Method(Method),
    Piece(PieceRef),
}

impl fmt::Debug for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Method(_) => f.write_str("Method(..)"),
            Self::Piece(p) => f.debug_tuple("Piece").field(&p.id()).finish(),
        }
    }
}

/// A computed garment piece as seen by the rendering engine.
///
/// Numeric shaping results live behind [`Piece::fields`]; the engine only relies on the identity,
/// gauge, design context and last row of each piece.
pub trait Piece: Send + Sync {
    fn id(&self) -> PieceId;

    /// Stable type name, used as a cache-key component.
    fn kind(&self) -> &str;

    fn gauge(&self) -> Gauge;

    fn spec_source(&self) -> Arc<SpecSource>;

    /// The design this piece was made from, if any.
    fn design(&self) -> Option<Arc<Design>> {
        self.spec_source().design_origin.clone()
    }

    /// Last row of the piece.
    fn final_row(&self) -> Row;

    /// Garment-specific numeric fields, exposed to templates under `piece`.
    fn fields(&self) -> Context;

    /// Named attribute lookup. Defaults cover `id`, `kind`, `final_row` and every field.
    fn attr(&self, name: &str) -> Option<Attr> {
        match name {
            "id" => Some(Attr::Value(Value::from(self.id().0))),
            "kind" => Some(Attr::Value(Value::from(self.kind()))),
            "final_row" => {
                let row = self.final_row();
                Some(Attr::Method(Arc::new(move |_| Ok(Value::from(row)))))
            }
            _ => self.fields().remove(name).map(Attr::Value),
        }
    }

    /// Keyed item lookup into [`Piece::fields`].
    fn item(&self, key: &str) -> Option<Value> {
        self.fields().remove(key)
    }
}
