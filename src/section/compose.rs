use crate::foundation::error::PatternResult;
use crate::template::builtin::{
    ElementSummary, MultipleOverlapNotice, OverlapLine, SingleOverlapNotice, render_builtin,
};
use crate::text::element::Element;
use crate::text::subsection::{Overlap, SubSection};

/// Order, annotate and concatenate the elements of one instruction section.
///
/// Elements are sorted by their smallest start row (unpositioned ones last, ties in insertion
/// order). Element pairs that overlap produce one notice up front; each subsection that starts
/// during an earlier one that wants to be warned gets an "at the same time" preface. The preface
/// is the full one when the subsection starts, in every size, during any earlier subsection still
/// in progress.
#[tracing::instrument(skip(elements), fields(elements = elements.len()))]
pub fn compose_elements<S: SubSection>(mut elements: Vec<Element<S>>) -> PatternResult<String> {
    elements.sort_by_key(|e| match e.smallest_start_row() {
        Some(row) => (false, row),
        None => (true, 0),
    });

    let mut out = overlap_notice(&elements)?;

    let mut subsections: Vec<S> = elements
        .into_iter()
        .flat_map(Element::into_subsections)
        .filter(|s| !s.is_empty())
        .collect();
    subsections.sort_by(|a, b| a.order(b));

    let mut prior: Vec<S> = Vec::with_capacity(subsections.len());
    for sub in subsections {
        let overlap = overlap_with_prior(&sub, &prior);
        out.push_str(&sub.render(overlap));
        prior.push(sub);
    }
    Ok(out)
}

fn overlap_with_prior<S: SubSection>(sub: &S, prior: &[S]) -> Overlap {
    if sub.start_rows().is_none() || !sub.interrupts_others() {
        return Overlap::None;
    }
    let mut during = prior
        .iter()
        .filter(|p| p.start_rows().is_some() && sub.starts_during(p));
    if !during.clone().any(|p| p.warn_if_interrupted()) {
        return Overlap::None;
    }
    // Full or partial is judged against everything running, warned about or not.
    if during.any(|p| sub.starts_during_all_grades(p)) {
        Overlap::Full
    } else {
        Overlap::Partial
    }
}

/// Overlapping element pairs in sorted order, with whether each overlap holds in every size.
pub fn element_overlaps<S: SubSection>(elements: &[Element<S>]) -> Vec<(usize, usize, bool)> {
    let mut pairs = Vec::new();
    for (i, earlier) in elements.iter().enumerate() {
        for (j, later) in elements.iter().enumerate().skip(i + 1) {
            if earlier.warn_of_overlap_with(later) {
                pairs.push((i, j, earlier.warn_of_full_overlap_with(later)));
            }
        }
    }
    pairs
}

fn overlap_notice<S: SubSection>(elements: &[Element<S>]) -> PatternResult<String> {
    let pairs = element_overlaps(elements);
    tracing::debug!(overlaps = pairs.len(), "element overlaps");
    match pairs.as_slice() {
        [] => Ok(String::new()),
        [(i, j, full)] => {
            let first = summarize(&elements[*i])?;
            let second = summarize(&elements[*j])?;
            render_builtin(
                "single_overlap",
                &SingleOverlapNotice {
                    first: &first,
                    second: &second,
                    full: *full,
                },
            )
        }
        many => {
            let lines = many
                .iter()
                .map(|(i, j, full)| {
                    Ok(OverlapLine {
                        first: summarize(&elements[*i])?,
                        second: summarize(&elements[*j])?,
                        full: *full,
                    })
                })
                .collect::<PatternResult<Vec<_>>>()?;
            render_builtin("multiple_overlaps", &MultipleOverlapNotice { pairs: &lines })
        }
    }
}

fn summarize<S: SubSection>(element: &Element<S>) -> PatternResult<ElementSummary> {
    Ok(ElementSummary {
        name: element.display_name().to_string(),
        start: element
            .start_rows()?
            .map(|r| r.to_string())
            .unwrap_or_default(),
        end: element.end_rows()?.map(|r| r.to_string()).unwrap_or_default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/section/compose.rs"]
mod tests;
