use std::fmt;

use crate::foundation::error::{PatternError, PatternResult};

/// 1-based row number within a piece.
pub type Row = u32;

/// Stable identifier of a computed garment piece.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct PieceId(pub u64);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable identifier of a pattern.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct PatternId(pub u64);

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Knitting gauge: stitches and rows per inch.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Gauge {
    /// Stitches per inch.
    pub stitches: f64,
    /// Rows per inch.
    pub rows: f64,
}

impl Gauge {
    /// Create a validated gauge with strictly positive finite components.
    pub fn new(stitches: f64, rows: f64) -> PatternResult<Self> {
        let g = Self { stitches, rows };
        g.validate()?;
        Ok(g)
    }

    pub fn validate(&self) -> PatternResult<()> {
        if !(self.stitches.is_finite() && self.stitches > 0.0) {
            return Err(PatternError::validation("gauge stitches must be > 0"));
        }
        if !(self.rows.is_finite() && self.rows > 0.0) {
            return Err(PatternError::validation("gauge rows must be > 0"));
        }
        Ok(())
    }

    /// Convert a row count into inches of fabric.
    pub fn rows_to_inches(self, rows: f64) -> f64 {
        rows / self.rows
    }

    /// Convert inches of fabric into an (unrounded) row count.
    pub fn inches_to_rows(self, inches: f64) -> f64 {
        inches * self.rows
    }
}

/// HTML that has already been escaped and assembled, safe to concatenate verbatim.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct SafeHtml(String);

impl SafeHtml {
    pub fn new(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, other: &SafeHtml) {
        self.0.push_str(&other.0);
    }

    /// Concatenate several chunks in order.
    pub fn concat<'a>(parts: impl IntoIterator<Item = &'a SafeHtml>) -> Self {
        let mut out = Self::default();
        for p in parts {
            out.push(p);
        }
        out
    }
}

impl fmt::Display for SafeHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SafeHtml {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
