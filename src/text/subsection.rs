use std::cmp::Ordering;
use std::ops::{Deref, DerefMut};

use crate::foundation::core::Row;
use crate::foundation::error::{PatternError, PatternResult};
use crate::foundation::graded::Graded;
use crate::text::builder::TextBuilder;

pub const FULL_OVERLAP_PREFACE: &str = "<p><strong><em>At the same time:</em></strong></p>";
pub const PARTIAL_OVERLAP_PREFACE: &str =
    "<p><strong><em>At the same time (for some sizes):</em></strong></p>";

/// How a subsection overlaps the instructions rendered before it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Overlap {
    None,
    /// Starts during an earlier subsection in every size.
    Full,
    /// Starts during an earlier subsection in some sizes only.
    Partial,
}

/// Text of a subsection plus optional preface chunks chosen by overlap.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubSectionText {
    body: TextBuilder,
    start_text_overlap: Option<String>,
    start_text_overlap_partial: Option<String>,
    start_text_non_overlap: Option<String>,
}

impl SubSectionText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shown right after the full-overlap banner.
    pub fn set_start_text_overlap(&mut self, text: impl Into<String>) {
        self.start_text_overlap = Some(text.into());
    }

    /// Shown right after the partial-overlap banner.
    pub fn set_start_text_overlap_partial(&mut self, text: impl Into<String>) {
        self.start_text_overlap_partial = Some(text.into());
    }

    /// Shown only when nothing overlaps.
    pub fn set_start_text_non_overlap(&mut self, text: impl Into<String>) {
        self.start_text_non_overlap = Some(text.into());
    }

    pub fn render(&self, overlap: Overlap) -> String {
        let mut out = String::new();
        match overlap {
            Overlap::Full => {
                out.push_str(FULL_OVERLAP_PREFACE);
                out.push_str(self.start_text_overlap.as_deref().unwrap_or_default());
            }
            Overlap::Partial => {
                out.push_str(PARTIAL_OVERLAP_PREFACE);
                out.push_str(self.start_text_overlap_partial.as_deref().unwrap_or_default());
            }
            Overlap::None => {
                out.push_str(self.start_text_non_overlap.as_deref().unwrap_or_default());
            }
        }
        out.push_str(&self.body.render());
        out
    }
}

impl Deref for SubSectionText {
    type Target = TextBuilder;

    fn deref(&self) -> &TextBuilder {
        &self.body
    }
}

impl DerefMut for SubSectionText {
    fn deref_mut(&mut self) -> &mut TextBuilder {
        &mut self.body
    }
}

/// An atomic, orderable chunk of instruction text.
///
/// Each concrete type picks its own ordering and overlap rules, so a garment can say things
/// like "side 1 shoulder before side 2 armhole". Implementations must keep `order` a total
/// order and `starts_during_all_grades` must imply `starts_during`.
pub trait SubSection {
    fn display_name(&self) -> &str;

    /// `None` for chunks with no row position, such as finishing notes.
    fn start_rows(&self) -> Option<&Graded<Row>>;

    fn end_rows(&self) -> Option<&Graded<Row>>;

    /// Starting during another subsection may call for an "at the same time" preface.
    fn interrupts_others(&self) -> bool;

    /// Wants the reader told when something starts during it.
    fn warn_if_interrupted(&self) -> bool;

    fn text(&self) -> &SubSectionText;

    fn text_mut(&mut self) -> &mut SubSectionText;

    fn order(&self, other: &Self) -> Ordering;

    /// `self` begins while `other` is in progress, in at least one size.
    fn starts_during(&self, other: &Self) -> bool;

    /// `self` begins while `other` is in progress, in every size.
    fn starts_during_all_grades(&self, other: &Self) -> bool;

    fn smallest_start_row(&self) -> Option<Row> {
        self.start_rows().map(Graded::min)
    }

    fn is_empty(&self) -> bool {
        self.text().is_empty()
    }

    fn render(&self, overlap: Overlap) -> String {
        self.text().render(overlap)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quantifier {
    Any,
    All,
}

/// Per size, does `start` fall inside `[other_start, other_end]`? Mismatched sizes never overlap.
pub fn rows_start_during(
    start: &Graded<Row>,
    other_start: &Graded<Row>,
    other_end: &Graded<Row>,
    quantifier: Quantifier,
) -> bool {
    if start.len() != other_start.len() || start.len() != other_end.len() {
        return false;
    }
    let mut hits = start
        .iter()
        .zip(other_start.iter().zip(other_end.iter()))
        .map(|(s, (os, oe))| os <= s && s <= oe);
    match quantifier {
        Quantifier::Any => hits.any(|h| h),
        Quantifier::All => hits.all(|h| h),
    }
}

/// The standard subsection: positioned by row range, or unpositioned and sorted last.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowSubSection {
    name: String,
    rows: Option<(Graded<Row>, Graded<Row>)>,
    interrupts_others: bool,
    warn_if_interrupted: bool,
    tail_order: u32,
    text: SubSectionText,
}

impl RowSubSection {
    /// A subsection covering `start..=end` rows in each size.
    pub fn positioned(
        name: impl Into<String>,
        start_rows: Graded<Row>,
        end_rows: Graded<Row>,
        interrupts_others: bool,
        warn_if_interrupted: bool,
    ) -> PatternResult<Self> {
        let name = name.into();
        let ordered = start_rows.zip_with(&end_rows, |s, e| s <= e)?;
        if !ordered.all(|ok| *ok) {
            return Err(PatternError::validation(format!(
                "subsection '{name}' ends before it starts"
            )));
        }
        Ok(Self {
            name,
            rows: Some((start_rows, end_rows)),
            interrupts_others,
            warn_if_interrupted,
            tail_order: 0,
            text: SubSectionText::new(),
        })
    }

    /// A subsection with no row position, placed after every positioned one by `tail_order`.
    pub fn unpositioned(name: impl Into<String>, tail_order: u32) -> Self {
        Self {
            name: name.into(),
            rows: None,
            interrupts_others: true,
            warn_if_interrupted: true,
            tail_order,
            text: SubSectionText::new(),
        }
    }
}

impl SubSection for RowSubSection {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn start_rows(&self) -> Option<&Graded<Row>> {
        self.rows.as_ref().map(|(s, _)| s)
    }

    fn end_rows(&self) -> Option<&Graded<Row>> {
        self.rows.as_ref().map(|(_, e)| e)
    }

    fn interrupts_others(&self) -> bool {
        self.interrupts_others
    }

    fn warn_if_interrupted(&self) -> bool {
        self.warn_if_interrupted
    }

    fn text(&self) -> &SubSectionText {
        &self.text
    }

    fn text_mut(&mut self) -> &mut SubSectionText {
        &mut self.text
    }

    fn order(&self, other: &Self) -> Ordering {
        match (self.smallest_start_row(), other.smallest_start_row()) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.tail_order.cmp(&other.tail_order),
        }
    }

    fn starts_during(&self, other: &Self) -> bool {
        match (&self.rows, &other.rows) {
            (Some((start, _)), Some((os, oe))) => {
                rows_start_during(start, os, oe, Quantifier::Any)
            }
            _ => false,
        }
    }

    fn starts_during_all_grades(&self, other: &Self) -> bool {
        match (&self.rows, &other.rows) {
            (Some((start, _)), Some((os, oe))) => {
                rows_start_during(start, os, oe, Quantifier::All)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/subsection.rs"]
mod tests;
