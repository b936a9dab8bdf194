use crate::foundation::core::Row;
use crate::foundation::error::PatternResult;
use crate::foundation::graded::Graded;
use crate::text::subsection::SubSection;

/// A named group of subsections produced together, such as "Neckline" or an add-on pocket.
#[derive(Clone, Debug)]
pub struct Element<S> {
    name: String,
    subsections: Vec<S>,
}

impl<S: SubSection> Element<S> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subsections: Vec::new(),
        }
    }

    /// An element with a single subsection.
    pub fn with_subsection(name: impl Into<String>, subsection: S) -> Self {
        let mut e = Self::new(name);
        e.add_subsection(subsection);
        e
    }

    pub fn add_subsection(&mut self, subsection: S) {
        self.subsections.push(subsection);
    }

    pub fn display_name(&self) -> &str {
        &self.name
    }

    pub fn subsections(&self) -> &[S] {
        &self.subsections
    }

    pub fn into_subsections(self) -> Vec<S> {
        self.subsections
    }

    /// Smallest start row over every size and positioned subsection.
    pub fn smallest_start_row(&self) -> Option<Row> {
        self.subsections
            .iter()
            .filter_map(|s| s.smallest_start_row())
            .min()
    }

    /// Elementwise minimum of the positioned subsections' start rows.
    pub fn start_rows(&self) -> PatternResult<Option<Graded<Row>>> {
        fold_rows(self.subsections.iter().filter_map(|s| s.start_rows()), Graded::elementwise_min)
    }

    /// Elementwise maximum of the positioned subsections' end rows.
    pub fn end_rows(&self) -> PatternResult<Option<Graded<Row>>> {
        fold_rows(self.subsections.iter().filter_map(|s| s.end_rows()), Graded::elementwise_max)
    }

    /// Something in `later` starts during something in `self` that asked to be warned about it.
    ///
    /// Assumes `self` sorts before `later`.
    pub fn warn_of_overlap_with(&self, later: &Self) -> bool {
        self.any_pair(later, |mine, theirs| theirs.starts_during(mine))
    }

    /// As [`Element::warn_of_overlap_with`], but the overlap holds in every size.
    pub fn warn_of_full_overlap_with(&self, later: &Self) -> bool {
        self.any_pair(later, |mine, theirs| theirs.starts_during_all_grades(mine))
    }

    fn any_pair(&self, later: &Self, starts_during: impl Fn(&S, &S) -> bool) -> bool {
        self.subsections.iter().any(|mine| {
            later.subsections.iter().any(|theirs| {
                theirs.interrupts_others()
                    && mine.warn_if_interrupted()
                    && starts_during(mine, theirs)
            })
        })
    }
}

fn fold_rows<'a>(
    mut rows: impl Iterator<Item = &'a Graded<Row>>,
    combine: fn(&Graded<Row>, &Graded<Row>) -> PatternResult<Graded<Row>>,
) -> PatternResult<Option<Graded<Row>>> {
    let Some(first) = rows.next() else {
        return Ok(None);
    };
    let mut acc = first.clone();
    for r in rows {
        acc = combine(&acc, r)?;
    }
    Ok(Some(acc))
}

#[cfg(test)]
#[path = "../../tests/unit/text/element.rs"]
mod tests;
