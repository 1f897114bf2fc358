//! Generic element tree and WordprocessingML helpers

mod element;
mod namespace;

pub use element::Element;
pub use namespace::*;

/// Helper to read the `w:val` attribute (common in OOXML)
pub fn w_val(element: &Element) -> Option<&str> {
    element.attr("w:val").or_else(|| element.attr("val"))
}

/// Helper to read the `w:id` attribute as an integer
pub fn w_id(element: &Element) -> Option<u64> {
    element
        .attr("w:id")
        .or_else(|| element.attr("id"))
        .and_then(|v| v.parse().ok())
}

/// Parse an OOXML boolean value ("1", "true", "on", or missing val means true)
pub fn parse_bool(element: &Element) -> bool {
    match w_val(element) {
        None => true, // No val attribute means true (e.g. <w:b/>)
        Some(v) => matches!(v, "1" | "true" | "on"),
    }
}
