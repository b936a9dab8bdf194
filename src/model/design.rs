use std::sync::Arc;

use crate::foundation::core::{Gauge, Row};
use crate::foundation::error::{PatternError, PatternResult};
use crate::foundation::math::{round_to_even, round_to_odd};
use crate::template::TemplateSource;

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Designer {
    pub short_name: String,
    #[serde(default)]
    pub about_long: Option<String>,
    #[serde(default)]
    pub about_short: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Stitch {
    pub name: String,
    /// How the stitch is named inside instructions, when different from `name`.
    #[serde(default)]
    pub patterntext: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// URL of a chart image.
    #[serde(default)]
    pub chart: Option<String>,
    #[serde(default)]
    pub extra_notions_text: Option<String>,
}

impl Stitch {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn display_text(&self) -> &str {
        self.patterntext.as_deref().unwrap_or(&self.name)
    }
}

/// Where an additional design element begins.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StartLocation {
    /// `inches` of fabric above the cast-on edge.
    AfterCastOn { inches: f64 },
    /// `inches` below the start of cap (or armhole) shaping.
    BeforeCapShaping { inches: f64 },
}

impl StartLocation {
    /// Height above the cast-on edge, given where cap shaping starts.
    pub fn start_height(self, cap_height_in_inches: f64) -> f64 {
        match self {
            Self::AfterCastOn { inches } => inches,
            Self::BeforeCapShaping { inches } => cap_height_in_inches - inches,
        }
    }

    /// First row of the element. Always a right-side (odd) row, never below row 1.
    pub fn start_row(self, cap_height_in_inches: f64, gauge: Gauge) -> Row {
        let rows = round_to_odd(gauge.inches_to_rows(self.start_height(cap_height_in_inches)));
        if rows < 1.0 { 1 } else { rows as Row }
    }
}

/// How tall an additional design element is.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementHeight {
    Inches { value: f64 },
    /// Row count including both the start and end row.
    Rows { value: Row },
    /// Runs to the end of the piece.
    NoEnd,
}

impl ElementHeight {
    /// Height in rows, or `None` for an element that runs to the end of the piece.
    ///
    /// Inch heights become an even row count of at least 2.
    pub fn in_rows(self, gauge: Gauge) -> Option<Row> {
        match self {
            Self::NoEnd => None,
            Self::Rows { value } => Some(value),
            Self::Inches { value } => {
                let rows = round_to_even(gauge.inches_to_rows(value));
                Some(if rows < 2.0 { 2 } else { rows as Row })
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapBehavior {
    /// Never interrupts and is never warned about.
    PurelyInformational,
    /// Full instructions: interrupts others and wants to be told when interrupted.
    #[default]
    Instructions,
    /// Only the start matters: interrupts others but is not warned about.
    StartOnly,
}

impl OverlapBehavior {
    pub fn interrupts_others(self) -> bool {
        matches!(self, Self::Instructions | Self::StartOnly)
    }

    pub fn warn_if_interrupted(self) -> bool {
        matches!(self, Self::Instructions)
    }
}

/// Designer-supplied insert (a pocket, a cable panel, a stripe) placed into a piece's instructions.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AdditionalDesignElement {
    pub name: String,
    pub start_location: StartLocation,
    pub height: ElementHeight,
    #[serde(default)]
    pub overlap_behavior: OverlapBehavior,
    pub template: TemplateSource,
}

impl AdditionalDesignElement {
    pub fn validate(&self) -> PatternResult<()> {
        if self.name.trim().is_empty() {
            return Err(PatternError::validation(
                "additional design element needs a name",
            ));
        }
        let inches = match self.start_location {
            StartLocation::AfterCastOn { inches } | StartLocation::BeforeCapShaping { inches } => {
                inches
            }
        };
        if !(inches.is_finite() && inches >= 0.0) {
            return Err(PatternError::validation(format!(
                "element '{}' start location must be >= 0 inches",
                self.name
            )));
        }
        match self.height {
            ElementHeight::Inches { value } if !(value.is_finite() && value > 0.0) => {
                Err(PatternError::validation(format!(
                    "element '{}' height must be > 0 inches",
                    self.name
                )))
            }
            ElementHeight::Rows { value: 0 } => Err(PatternError::validation(format!(
                "element '{}' height must be at least 1 row",
                self.name
            ))),
            _ => Ok(()),
        }
    }

    pub fn height_in_rows(&self, gauge: Gauge) -> Option<Row> {
        self.height.in_rows(gauge)
    }

    pub fn start_row(&self, cap_height_in_inches: f64, gauge: Gauge) -> Row {
        self.start_location.start_row(cap_height_in_inches, gauge)
    }

    pub fn interrupts_others(&self) -> bool {
        self.overlap_behavior.interrupts_others()
    }

    pub fn warn_if_interrupted(&self) -> bool {
        self.overlap_behavior.warn_if_interrupted()
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Design {
    pub name: String,
    #[serde(default)]
    pub designer: Option<Designer>,
    #[serde(default)]
    pub additional_elements: Vec<AdditionalDesignElement>,
}

impl Design {
    pub fn validate(&self) -> PatternResult<()> {
        for el in &self.additional_elements {
            el.validate()?;
        }
        Ok(())
    }
}

/// Design-level context a pattern was computed from.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpecSource {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub pattern_credits: Option<String>,
    #[serde(default)]
    pub notions: Option<String>,
    #[serde(default)]
    pub needles: Option<String>,
    #[serde(default)]
    pub swatch_needle_size: Option<String>,
    #[serde(default)]
    pub design_choices: Vec<String>,
    #[serde(default)]
    pub stitches: Vec<Stitch>,
    #[serde(default)]
    pub design_origin: Option<Arc<Design>>,
}

impl SpecSource {
    pub fn validate(&self) -> PatternResult<()> {
        match &self.design_origin {
            Some(d) => d.validate(),
            None => Ok(()),
        }
    }

    pub fn stitches_used(&self) -> &[Stitch] {
        &self.stitches
    }

    pub fn designer(&self) -> Option<&Designer> {
        self.design_origin.as_ref()?.designer.as_ref()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/design.rs"]
mod tests;
