//! Comment range linking
//!
//! A comment annotates a span of runs with three pieces: a zero-width
//! `w:commentRangeStart` before the first run, a `w:commentRangeEnd` after
//! the last run, and a reference run (`w:r` holding `w:commentReference`)
//! directly after the end marker. Word rejects documents where these fall
//! out of order, so the linker verifies the start < end < reference
//! invariant after every insertion instead of trusting its own arithmetic.

use crate::document::Run;
use crate::error::{Error, Result};
use crate::xml::{w_id, Element};

/// Child index of the `ordinal`-th direct `w:r` of `paragraph`
pub(crate) fn run_child_index(paragraph: &Element, ordinal: usize) -> Option<usize> {
    paragraph
        .children()
        .iter()
        .enumerate()
        .filter(|(_, c)| c.tag() == "w:r")
        .map(|(i, _)| i)
        .nth(ordinal)
}

/// Surround a single run with comment range markers for `id`.
///
/// The resulting sibling sequence is
/// `[rangeStart(id), run, rangeEnd(id), referenceRun(id)]`.
pub fn mark_run_comment(paragraph: &mut Element, ordinal: usize, id: u64) -> Result<()> {
    mark_span_comment(paragraph, ordinal, ordinal, id)
}

/// Surround the run span `first..=last` with comment range markers for `id`
/// and insert the reference run after the end marker.
///
/// Only spans within one paragraph are supported; the caller is responsible
/// for rejecting endpoints from different paragraphs. Fails with
/// [`Error::InvalidRange`] when an ordinal is out of range, `last` precedes
/// `first`, or the inserted markers do not end up in document order.
pub fn mark_span_comment(
    paragraph: &mut Element,
    first: usize,
    last: usize,
    id: u64,
) -> Result<()> {
    if last < first {
        return Err(Error::InvalidRange(format!(
            "span end run {last} precedes start run {first}"
        )));
    }
    let first_index = run_child_index(paragraph, first)
        .ok_or_else(|| Error::InvalidRange(format!("no run at ordinal {first}")))?;
    let last_index = run_child_index(paragraph, last)
        .ok_or_else(|| Error::InvalidRange(format!("no run at ordinal {last}")))?;

    paragraph.insert_child(first_index, marker("w:commentRangeStart", id));
    // the start marker shifted every following child by one
    let end_index = last_index + 2;
    paragraph.insert_child(end_index, marker("w:commentRangeEnd", id));
    paragraph.insert_child(end_index + 1, reference_run(id)?);

    verify_marker_order(paragraph, id)
}

fn marker(tag: &'static str, id: u64) -> Element {
    Element::new(tag).with_attr("w:id", id.to_string())
}

fn reference_run(id: u64) -> Result<Element> {
    let mut element = Element::new("w:r");
    Run::new(&mut element).add_comment_reference(id)?;
    Ok(element)
}

/// Confirm start < end < reference for the markers carrying `id`
fn verify_marker_order(paragraph: &Element, id: u64) -> Result<()> {
    let index_of = |tag: &str| {
        paragraph
            .children()
            .iter()
            .position(|c| c.tag() == tag && w_id(c) == Some(id))
    };
    let start = index_of("w:commentRangeStart");
    let end = index_of("w:commentRangeEnd");
    let reference = paragraph.children().iter().position(|c| {
        c.tag() == "w:r"
            && c.children_with_tag("w:commentReference")
                .any(|r| w_id(r) == Some(id))
    });

    match (start, end, reference) {
        (Some(s), Some(e), Some(r)) if s < e && e < r => Ok(()),
        _ => Err(Error::InvalidRange(format!(
            "comment {id} markers out of document order"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn paragraph_with_runs(texts: &[&str]) -> Element {
        let mut p = Element::new("w:p");
        for text in texts {
            let r = p.add_ordered("w:r").unwrap();
            Run::new(r).set_text(text).unwrap();
        }
        p
    }

    fn child_tags(el: &Element) -> Vec<&str> {
        el.children().iter().map(|c| c.tag()).collect()
    }

    #[test]
    fn test_single_run_marker_sequence() {
        let mut p = paragraph_with_runs(&["annotated"]);
        mark_run_comment(&mut p, 0, 7).unwrap();

        assert_eq!(
            child_tags(&p),
            vec!["w:commentRangeStart", "w:r", "w:commentRangeEnd", "w:r"]
        );
        assert_eq!(p.children()[0].attr("w:id"), Some("7"));
        assert_eq!(p.children()[2].attr("w:id"), Some("7"));
        let reference = p.children()[3].find("w:commentReference").unwrap();
        assert_eq!(reference.attr("w:id"), Some("7"));
    }

    #[test]
    fn test_span_markers() {
        let mut p = paragraph_with_runs(&["a", "b", "c"]);
        mark_span_comment(&mut p, 0, 2, 11).unwrap();

        assert_eq!(
            child_tags(&p),
            vec![
                "w:commentRangeStart",
                "w:r",
                "w:r",
                "w:r",
                "w:commentRangeEnd",
                "w:r"
            ]
        );
    }

    #[test]
    fn test_inner_span() {
        let mut p = paragraph_with_runs(&["before", "target", "after"]);
        mark_span_comment(&mut p, 1, 1, 3).unwrap();

        assert_eq!(
            child_tags(&p),
            vec![
                "w:r",
                "w:commentRangeStart",
                "w:r",
                "w:commentRangeEnd",
                "w:r",
                "w:r"
            ]
        );
    }

    #[test]
    fn test_reversed_span_rejected() {
        let mut p = paragraph_with_runs(&["a", "b"]);
        let err = mark_span_comment(&mut p, 1, 0, 1).unwrap_err();
        assert!(matches!(err, Error::InvalidRange(_)));
        // nothing was inserted
        assert_eq!(child_tags(&p), vec!["w:r", "w:r"]);
    }

    #[test]
    fn test_out_of_range_ordinal_rejected() {
        let mut p = paragraph_with_runs(&["only"]);
        assert!(matches!(
            mark_run_comment(&mut p, 3, 1),
            Err(Error::InvalidRange(_))
        ));
    }

    #[test]
    fn test_two_comments_on_adjacent_runs() {
        let mut p = paragraph_with_runs(&["a", "b"]);
        mark_run_comment(&mut p, 0, 1).unwrap();
        // run "b" is now ordinal 2 (the reference run of comment 1 sits at 1)
        mark_run_comment(&mut p, 2, 2).unwrap();

        let start_positions: Vec<usize> = p
            .children()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.tag() == "w:commentRangeStart")
            .map(|(i, _)| i)
            .collect();
        assert_eq!(start_positions.len(), 2);
        assert!(start_positions[0] < start_positions[1]);
    }
}
