use std::fmt;

use serde_json::Value;

use crate::foundation::core::{PieceId, Row};
use crate::foundation::error::{PatternError, PatternResult};
use crate::foundation::graded::Graded;
use crate::piece::{Attr, Method, Piece, PieceRef};
use crate::template::Context;

/// One piece per garment size, addressed as if it were a single piece.
///
/// Attribute lookups broadcast over every piece and come back as a [`Graded`] value, a
/// [`GradedMethod`] when every piece answers with a method, or another [`PieceList`] when every
/// piece answers with a piece. The list is never empty.
#[derive(Clone)]
pub struct PieceList {
    pieces: Vec<PieceRef>,
}

/// Outcome of broadcasting an attribute lookup.
#[derive(Clone, Debug)]
pub enum Broadcast {
    Values(Graded<Value>),
    Callable(GradedMethod),
    Pieces(PieceList),
}

/// Per-size methods invoked together.
#[derive(Clone)]
pub struct GradedMethod(Graded<Method>);

impl GradedMethod {
    /// Call every underlying method with the same arguments.
    pub fn call(&self, args: &[Value]) -> PatternResult<Graded<Value>> {
        self.0.try_map(|m| m(args))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Debug for GradedMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GradedMethod({} sizes)", self.0.len())
    }
}

impl Broadcast {
    pub fn into_values(self) -> PatternResult<Graded<Value>> {
        match self {
            Self::Values(v) => Ok(v),
            Self::Callable(_) => Err(PatternError::broadcast(
                "expected plain values, found methods",
            )),
            Self::Pieces(_) => Err(PatternError::broadcast("expected plain values, found pieces")),
        }
    }

    /// Call a broadcast method; plain values are rejected.
    pub fn call(self, args: &[Value]) -> PatternResult<Graded<Value>> {
        match self {
            Self::Callable(m) => m.call(args),
            _ => Err(PatternError::broadcast("attribute is not callable")),
        }
    }

    pub fn into_pieces(self) -> PatternResult<PieceList> {
        match self {
            Self::Pieces(p) => Ok(p),
            _ => Err(PatternError::broadcast("attribute does not name pieces")),
        }
    }
}

impl PieceList {
    pub fn new(pieces: Vec<PieceRef>) -> PatternResult<Self> {
        if pieces.is_empty() {
            return Err(PatternError::construction(
                "piece list needs at least one piece",
            ));
        }
        Ok(Self { pieces })
    }

    pub fn single(piece: PieceRef) -> Self {
        Self {
            pieces: vec![piece],
        }
    }

    /// The first piece, standing in for the whole list where one representative is enough.
    pub fn exemplar(&self) -> &PieceRef {
        &self.pieces[0]
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_graded(&self) -> bool {
        self.pieces.len() > 1
    }

    pub fn pieces(&self) -> &[PieceRef] {
        &self.pieces
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PieceRef> {
        self.pieces.iter()
    }

    pub fn kind(&self) -> &str {
        self.exemplar().kind()
    }

    pub fn ids(&self) -> Vec<PieceId> {
        self.pieces.iter().map(|p| p.id()).collect()
    }

    pub fn map<T>(&self, mut f: impl FnMut(&dyn Piece) -> T) -> Graded<T> {
        Graded::from_nonempty(self.pieces.iter().map(|p| f(p.as_ref())).collect())
    }

    /// Broadcast an attribute lookup over every piece.
    pub fn attr(&self, name: &str) -> PatternResult<Broadcast> {
        let mut attrs = Vec::with_capacity(self.pieces.len());
        for p in &self.pieces {
            let a = p.attr(name).ok_or_else(|| {
                PatternError::broadcast(format!("piece {} has no attribute '{name}'", p.id()))
            })?;
            attrs.push(a);
        }

        let methods = attrs.iter().filter(|a| matches!(a, Attr::Method(_))).count();
        let pieces = attrs.iter().filter(|a| matches!(a, Attr::Piece(_))).count();
        let n = attrs.len();

        if methods > 0 && methods < n {
            return Err(PatternError::broadcast(format!(
                "some but not all values of '{name}' are callable"
            )));
        }
        if pieces > 0 && pieces < n {
            return Err(PatternError::broadcast(format!(
                "some but not all values of '{name}' are pieces"
            )));
        }

        if methods == n {
            let ms = attrs
                .into_iter()
                .filter_map(|a| match a {
                    Attr::Method(m) => Some(m),
                    _ => None,
                })
                .collect();
            return Ok(Broadcast::Callable(GradedMethod(Graded::new(ms)?)));
        }
        if pieces == n {
            let ps = attrs
                .into_iter()
                .filter_map(|a| match a {
                    Attr::Piece(p) => Some(p),
                    _ => None,
                })
                .collect();
            return Ok(Broadcast::Pieces(PieceList::new(ps)?));
        }
        let vs = attrs
            .into_iter()
            .filter_map(|a| match a {
                Attr::Value(v) => Some(v),
                _ => None,
            })
            .collect();
        Ok(Broadcast::Values(Graded::new(vs)?))
    }

    /// Broadcast a keyed item lookup over every piece.
    pub fn item(&self, key: &str) -> PatternResult<Graded<Value>> {
        let values = self
            .pieces
            .iter()
            .map(|p| {
                p.item(key).ok_or_else(|| {
                    PatternError::broadcast(format!("piece {} has no item '{key}'", p.id()))
                })
            })
            .collect::<PatternResult<Vec<_>>>()?;
        Graded::new(values)
    }

    /// A plain numeric attribute, one per size.
    pub fn numbers(&self, name: &str) -> PatternResult<Graded<f64>> {
        self.attr(name)?.into_values()?.try_map(|v| {
            v.as_f64().ok_or_else(|| {
                PatternError::broadcast(format!("attribute '{name}' is not numeric: {v}"))
            })
        })
    }

    /// A row-valued attribute, one per size.
    pub fn rows(&self, name: &str) -> PatternResult<Graded<Row>> {
        self.attr(name)?.into_values()?.try_map(|v| value_to_row(name, v))
    }

    /// Last row of each piece, through the broadcast `final_row` method.
    pub fn final_rows(&self) -> PatternResult<Graded<Row>> {
        self.attr("final_row")?
            .call(&[])?
            .try_map(|v| value_to_row("final_row", v))
    }

    /// Template-facing view: one entry per field, collapsed to a scalar when all sizes agree.
    pub fn to_context_value(&self) -> PatternResult<Value> {
        let mut out = Context::new();
        out.insert(
            "id".to_string(),
            self.map(|p| p.id().0).to_context_value()?,
        );
        out.insert("kind".to_string(), Value::from(self.kind()));
        out.insert("is_graded".to_string(), Value::Bool(self.is_graded()));
        out.insert(
            "final_row".to_string(),
            self.final_rows()?.to_context_value()?,
        );
        for key in self.exemplar().fields().keys() {
            out.insert(key.clone(), self.item(key)?.to_context_value()?);
        }
        Ok(Value::Object(out))
    }
}

fn value_to_row(name: &str, v: &Value) -> PatternResult<Row> {
    v.as_u64()
        .and_then(|n| Row::try_from(n).ok())
        .ok_or_else(|| PatternError::broadcast(format!("attribute '{name}' is not a row: {v}")))
}

impl fmt::Debug for PieceList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PieceList")
            .field("kind", &self.kind())
            .field("ids", &self.ids())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/piece/list.rs"]
mod tests;
