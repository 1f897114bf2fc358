//! Declared child sequences and ordered insertion
//!
//! WordprocessingML parents accept their children in a fixed schema order:
//! `w:pPr` must lead a paragraph, `w:sectPr` must trail a body, and the
//! property elements inside `w:pPr`/`w:rPr` follow a long declared sequence.
//! Emitting children out of order produces a file Word refuses to open.
//!
//! Only ordering *relative to what is already present* matters when
//! inserting, so the full grammar is unnecessary: each parent tag registers
//! an ordered list of [`Slot`]s, and a new child is placed immediately
//! before the first existing child belonging to a later slot. Children of
//! the same slot keep their mutual insertion order, which is how inline
//! atoms (`w:t`, `w:tab`, `w:br`, ...) interleave freely inside a run while
//! still following the leading `w:rPr`.

use crate::error::{Error, Result};
use crate::xml::Element;

/// How many children a slot admits
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cardinality {
    /// Zero or one child
    Singleton,
    /// Zero or more children, order-preserving
    Repeated,
}

/// One position in a parent's declared child sequence.
///
/// Most slots hold a single tag. A multi-tag slot groups children that share
/// a sequence position and may interleave in any order, such as the inline
/// content of a run or the run/marker children of a paragraph.
#[derive(Debug)]
pub struct Slot {
    /// Child tags belonging to this slot
    pub tags: &'static [&'static str],
    /// Zero-or-one vs. zero-or-more
    pub cardinality: Cardinality,
}

impl Slot {
    fn matches(&self, tag: &str) -> bool {
        self.tags.contains(&tag)
    }
}

use Cardinality::{Repeated, Singleton};

/// Inline content of a run. One slot: atoms interleave in insertion order.
const RUN_CONTENT: &[&str] = &[
    "w:annotationRef",
    "w:br",
    "w:commentReference",
    "w:continuationSeparator",
    "w:cr",
    "w:delText",
    "w:drawing",
    "w:footnoteRef",
    "w:footnoteReference",
    "w:lastRenderedPageBreak",
    "w:noBreakHyphen",
    "w:ptab",
    "w:separator",
    "w:t",
    "w:tab",
];

/// Inline-level content of a paragraph: runs, hyperlinks, revision wrappers
/// and the zero-width range markers.
const PARAGRAPH_CONTENT: &[&str] = &[
    "w:bookmarkEnd",
    "w:bookmarkStart",
    "w:commentRangeEnd",
    "w:commentRangeStart",
    "w:del",
    "w:hyperlink",
    "w:ins",
    "w:proofErr",
    "w:r",
    "w:sdt",
];

static DOCUMENT_SLOTS: &[Slot] = &[Slot {
    tags: &["w:body"],
    cardinality: Singleton,
}];

static BODY_SLOTS: &[Slot] = &[
    Slot {
        tags: &["w:p", "w:tbl"],
        cardinality: Repeated,
    },
    Slot {
        tags: &["w:sectPr"],
        cardinality: Singleton,
    },
];

static PARAGRAPH_SLOTS: &[Slot] = &[
    Slot {
        tags: &["w:pPr"],
        cardinality: Singleton,
    },
    Slot {
        tags: PARAGRAPH_CONTENT,
        cardinality: Repeated,
    },
];

/// Handled subset of the `w:pPr` child sequence, in schema order
static PARAGRAPH_PROPS_SLOTS: &[Slot] = &[
    Slot {
        tags: &["w:pStyle"],
        cardinality: Singleton,
    },
    Slot {
        tags: &["w:keepNext"],
        cardinality: Singleton,
    },
    Slot {
        tags: &["w:keepLines"],
        cardinality: Singleton,
    },
    Slot {
        tags: &["w:pageBreakBefore"],
        cardinality: Singleton,
    },
    Slot {
        tags: &["w:widowControl"],
        cardinality: Singleton,
    },
    Slot {
        tags: &["w:numPr"],
        cardinality: Singleton,
    },
    Slot {
        tags: &["w:spacing"],
        cardinality: Singleton,
    },
    Slot {
        tags: &["w:ind"],
        cardinality: Singleton,
    },
    Slot {
        tags: &["w:jc"],
        cardinality: Singleton,
    },
    Slot {
        tags: &["w:outlineLvl"],
        cardinality: Singleton,
    },
    Slot {
        tags: &["w:rPr"],
        cardinality: Singleton,
    },
    Slot {
        tags: &["w:sectPr"],
        cardinality: Singleton,
    },
];

static NUMBERING_PROPS_SLOTS: &[Slot] = &[
    Slot {
        tags: &["w:ilvl"],
        cardinality: Singleton,
    },
    Slot {
        tags: &["w:numId"],
        cardinality: Singleton,
    },
];

static RUN_SLOTS: &[Slot] = &[
    Slot {
        tags: &["w:rPr"],
        cardinality: Singleton,
    },
    Slot {
        tags: RUN_CONTENT,
        cardinality: Repeated,
    },
];

/// Handled subset of the `w:rPr` child sequence, in schema order
static RUN_PROPS_SLOTS: &[Slot] = &[
    Slot {
        tags: &["w:rStyle"],
        cardinality: Singleton,
    },
    Slot {
        tags: &["w:rFonts"],
        cardinality: Singleton,
    },
    Slot {
        tags: &["w:b"],
        cardinality: Singleton,
    },
    Slot {
        tags: &["w:bCs"],
        cardinality: Singleton,
    },
    Slot {
        tags: &["w:i"],
        cardinality: Singleton,
    },
    Slot {
        tags: &["w:iCs"],
        cardinality: Singleton,
    },
    Slot {
        tags: &["w:caps"],
        cardinality: Singleton,
    },
    Slot {
        tags: &["w:smallCaps"],
        cardinality: Singleton,
    },
    Slot {
        tags: &["w:strike"],
        cardinality: Singleton,
    },
    Slot {
        tags: &["w:dstrike"],
        cardinality: Singleton,
    },
    Slot {
        tags: &["w:color"],
        cardinality: Singleton,
    },
    Slot {
        tags: &["w:sz"],
        cardinality: Singleton,
    },
    Slot {
        tags: &["w:szCs"],
        cardinality: Singleton,
    },
    Slot {
        tags: &["w:highlight"],
        cardinality: Singleton,
    },
    Slot {
        tags: &["w:u"],
        cardinality: Singleton,
    },
    Slot {
        tags: &["w:vertAlign"],
        cardinality: Singleton,
    },
];

static RUN_LIST_SLOTS: &[Slot] = &[Slot {
    tags: &["w:r"],
    cardinality: Repeated,
}];

static COMMENTS_SLOTS: &[Slot] = &[Slot {
    tags: &["w:comment"],
    cardinality: Repeated,
}];

static PARAGRAPH_LIST_SLOTS: &[Slot] = &[Slot {
    tags: &["w:p"],
    cardinality: Repeated,
}];

static FOOTNOTES_SLOTS: &[Slot] = &[Slot {
    tags: &["w:footnote"],
    cardinality: Repeated,
}];

/// The declared child sequence for `parent_tag`, if one is registered
pub fn declared_slots(parent_tag: &str) -> Option<&'static [Slot]> {
    match parent_tag {
        "w:document" => Some(DOCUMENT_SLOTS),
        "w:body" => Some(BODY_SLOTS),
        "w:p" => Some(PARAGRAPH_SLOTS),
        "w:pPr" => Some(PARAGRAPH_PROPS_SLOTS),
        "w:numPr" => Some(NUMBERING_PROPS_SLOTS),
        "w:r" => Some(RUN_SLOTS),
        "w:rPr" => Some(RUN_PROPS_SLOTS),
        "w:hyperlink" | "w:ins" | "w:del" => Some(RUN_LIST_SLOTS),
        "w:comments" => Some(COMMENTS_SLOTS),
        "w:comment" | "w:footnote" => Some(PARAGRAPH_LIST_SLOTS),
        "w:footnotes" => Some(FOOTNOTES_SLOTS),
        _ => None,
    }
}

fn slot_position(slots: &[Slot], tag: &str) -> Option<usize> {
    slots.iter().position(|s| s.matches(tag))
}

impl Element {
    /// Look up this element's declared sequence and the slot for `child_tag`,
    /// failing with [`Error::SchemaViolation`] when either is missing.
    fn resolve_slot(&self, child_tag: &str) -> Result<(&'static [Slot], usize)> {
        let violation = || Error::SchemaViolation {
            parent: self.tag().to_string(),
            child: child_tag.to_string(),
        };
        let slots = declared_slots(self.tag()).ok_or_else(violation)?;
        let index = slot_position(slots, child_tag).ok_or_else(violation)?;
        Ok((slots, index))
    }

    /// The index at which a new child of slot `slot_index` belongs:
    /// immediately before the first existing child of any later slot, or at
    /// the end when no later-slot child exists.
    fn ordered_insert_index(&self, slots: &[Slot], slot_index: usize) -> usize {
        self.children()
            .iter()
            .position(|child| {
                slots[slot_index + 1..]
                    .iter()
                    .any(|later| later.matches(child.tag()))
            })
            .unwrap_or_else(|| self.children().len())
    }

    /// Return the `child_tag` singleton, creating it in sequence position if
    /// absent. Idempotent: an existing child is returned unchanged.
    pub fn get_or_add(&mut self, child_tag: &str) -> Result<&mut Element> {
        let (slots, slot_index) = self.resolve_slot(child_tag)?;
        debug_assert_eq!(
            slots[slot_index].cardinality,
            Singleton,
            "get_or_add on repeated slot {child_tag}"
        );

        let at = match self.position(child_tag) {
            Some(existing) => existing,
            None => {
                let at = self.ordered_insert_index(slots, slot_index);
                self.insert_child(at, Element::new(child_tag));
                at
            }
        };
        Ok(&mut self.children_mut()[at])
    }

    /// Remove the `child_tag` singleton if present; no-op otherwise
    pub fn remove_singleton(&mut self, child_tag: &str) -> Result<()> {
        let (slots, slot_index) = self.resolve_slot(child_tag)?;
        debug_assert_eq!(
            slots[slot_index].cardinality,
            Singleton,
            "remove_singleton on repeated slot {child_tag}"
        );

        if let Some(at) = self.position(child_tag) {
            self.remove_child(at);
        }
        Ok(())
    }

    /// Create a new `child_tag` child at its sequence position and return it.
    /// Repeated slots accumulate in insertion order; no deduplication.
    pub fn add_ordered(&mut self, child_tag: &str) -> Result<&mut Element> {
        let (slots, slot_index) = self.resolve_slot(child_tag)?;
        let at = self.ordered_insert_index(slots, slot_index);
        self.insert_child(at, Element::new(child_tag));
        Ok(&mut self.children_mut()[at])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tags(el: &Element) -> Vec<&str> {
        el.children().iter().map(|c| c.tag()).collect()
    }

    #[test]
    fn test_trailing_singleton_stays_last() {
        let mut body = Element::new("w:body");
        body.add_ordered("w:p").unwrap();
        body.get_or_add("w:sectPr").unwrap();
        body.add_ordered("w:p").unwrap();
        body.add_ordered("w:tbl").unwrap();

        assert_eq!(tags(&body), vec!["w:p", "w:p", "w:tbl", "w:sectPr"]);
    }

    #[test]
    fn test_leading_singleton_created_late_goes_first() {
        let mut run = Element::new("w:r");
        run.add_ordered("w:t").unwrap();
        run.add_ordered("w:tab").unwrap();
        run.get_or_add("w:rPr").unwrap();

        assert_eq!(tags(&run), vec!["w:rPr", "w:t", "w:tab"]);
    }

    #[test]
    fn test_property_sequence_respected_regardless_of_call_order() {
        let mut ppr = Element::new("w:pPr");
        ppr.get_or_add("w:jc").unwrap();
        ppr.get_or_add("w:outlineLvl").unwrap();
        ppr.get_or_add("w:pStyle").unwrap();
        ppr.get_or_add("w:numPr").unwrap();

        assert_eq!(
            tags(&ppr),
            vec!["w:pStyle", "w:numPr", "w:jc", "w:outlineLvl"]
        );
    }

    #[test]
    fn test_numbering_props_order() {
        let mut numpr = Element::new("w:numPr");
        numpr.get_or_add("w:numId").unwrap().set_attr("w:val", "3");
        numpr.get_or_add("w:ilvl").unwrap().set_attr("w:val", "0");

        assert_eq!(tags(&numpr), vec!["w:ilvl", "w:numId"]);
    }

    #[test]
    fn test_get_or_add_is_idempotent() {
        let mut para = Element::new("w:p");
        para.get_or_add("w:pPr").unwrap().set_attr("marker", "x");
        let again = para.get_or_add("w:pPr").unwrap();

        assert_eq!(again.attr("marker"), Some("x"));
        assert_eq!(para.children_with_tag("w:pPr").count(), 1);
    }

    #[test]
    fn test_repeated_children_keep_insertion_order() {
        let mut run = Element::new("w:r");
        run.add_ordered("w:t").unwrap().set_text("a");
        run.add_ordered("w:tab").unwrap();
        run.add_ordered("w:t").unwrap().set_text("b");
        run.add_ordered("w:br").unwrap();
        run.add_ordered("w:t").unwrap().set_text("c");

        assert_eq!(tags(&run), vec!["w:t", "w:tab", "w:t", "w:br", "w:t"]);
    }

    #[test]
    fn test_undeclared_child_is_rejected() {
        let mut para = Element::new("w:p");
        let err = para.add_ordered("w:bogus").unwrap_err();
        assert!(matches!(
            err,
            Error::SchemaViolation { ref parent, ref child }
                if parent == "w:p" && child == "w:bogus"
        ));
    }

    #[test]
    fn test_unregistered_parent_is_rejected() {
        let mut stranger = Element::new("w:fldSimple");
        assert!(stranger.add_ordered("w:r").is_err());
    }

    #[test]
    fn test_remove_singleton() {
        let mut para = Element::new("w:p");
        para.get_or_add("w:pPr").unwrap();
        para.add_ordered("w:r").unwrap();

        para.remove_singleton("w:pPr").unwrap();
        assert_eq!(tags(&para), vec!["w:r"]);

        // removing again is a no-op
        para.remove_singleton("w:pPr").unwrap();
        assert_eq!(tags(&para), vec!["w:r"]);
    }

    #[test]
    fn test_paragraph_properties_lead_content() {
        let mut para = Element::new("w:p");
        para.add_ordered("w:r").unwrap();
        para.add_ordered("w:r").unwrap();
        para.get_or_add("w:pPr").unwrap();

        assert_eq!(tags(&para), vec!["w:pPr", "w:r", "w:r"]);
    }

    #[test]
    fn test_run_props_sequence() {
        let mut rpr = Element::new("w:rPr");
        rpr.get_or_add("w:u").unwrap();
        rpr.get_or_add("w:b").unwrap();
        rpr.get_or_add("w:rStyle").unwrap();
        rpr.get_or_add("w:color").unwrap();

        assert_eq!(tags(&rpr), vec!["w:rStyle", "w:b", "w:color", "w:u"]);
    }

    #[test]
    fn test_markers_share_the_content_slot() {
        let mut para = Element::new("w:p");
        para.add_ordered("w:r").unwrap();
        para.add_ordered("w:commentRangeEnd").unwrap();
        para.get_or_add("w:pPr").unwrap();

        // markers are content, so they follow pPr but mix freely with runs
        assert_eq!(tags(&para), vec!["w:pPr", "w:r", "w:commentRangeEnd"]);
    }
}
