//! Legacy plain-text list markers
//!
//! Rewrites every numbered paragraph's text to a `"{n}) "` prefix, counting
//! separately per `(w:numId, w:ilvl)` group in document order. This is a
//! lossy, presentation-only substitute for real numbering definitions
//! (digit/alpha/roman formats from the numbering part are not consulted).
//!
//! The pass aborts silently when any paragraph carries a `w:numPr` whose
//! `w:numId` or `w:ilvl` lookup fails: no error, no mutation. A document
//! without numbering is indistinguishable from a malformed one here, which
//! is why the pass only runs behind an explicit opt-in call and leaves a
//! debug log line behind.

use std::collections::HashMap;

use crate::document::Paragraph;
use crate::xml::{w_val, Element};

/// Apply fake list markers to every numbered paragraph under `body`.
pub fn apply_fake_list_markers(body: &mut Element) {
    // Resolve numbering linkage for all paragraphs up front, so an abort
    // happens before the first mutation.
    let mut groups: Vec<Option<(String, String)>> = Vec::new();
    for child in body.children() {
        if child.tag() != "w:p" {
            continue;
        }
        let numbering = child.find("w:pPr").and_then(|ppr| ppr.find("w:numPr"));
        let Some(numbering) = numbering else {
            groups.push(None);
            continue;
        };
        let num_id = numbering.find("w:numId").and_then(w_val);
        let level = numbering.find("w:ilvl").and_then(w_val);
        match (num_id, level) {
            (Some(num_id), Some(level)) => {
                groups.push(Some((num_id.to_string(), level.to_string())));
            }
            _ => {
                log::debug!("list-marker pass aborted: incomplete numbering linkage");
                return;
            }
        }
    }

    // Number each group in document order.
    let mut counters: HashMap<(String, String), u32> = HashMap::new();
    let numbers: Vec<Option<u32>> = groups
        .into_iter()
        .map(|group| {
            group.map(|key| {
                let counter = counters.entry(key).or_insert(0);
                *counter += 1;
                *counter
            })
        })
        .collect();

    let mut index = 0;
    for child in body.children_mut() {
        if child.tag() != "w:p" {
            continue;
        }
        if let Some(number) = numbers[index] {
            let mut paragraph = Paragraph::new(child);
            let text = paragraph.text();
            if let Err(err) = paragraph.set_text(&format!("{number}) {text}")) {
                log::debug!("list-marker rewrite failed: {err}");
                return;
            }
        }
        index += 1;
    }
}
