//! Flattens the apparatus, translation, commentary and bibliography
//! divisions into newline-joined plain text.

use crate::types::{ApparatusStyle, BibliographyStyle};
use crate::xml_tree::Element;

/// Extract apparatus entries according to the configured policy.
pub fn extract_apparatus(div: Option<&Element>, style: ApparatusStyle, lang: &str) -> String {
    let Some(div) = div else {
        return String::new();
    };

    let mut lines: Vec<String> = Vec::new();

    for app in div.descendants("app") {
        match style {
            ApparatusStyle::LocationBased => {
                let loc = app.attr("loc").unwrap_or("");
                if let Some(note) = app.descendant("note").and_then(|n| n.text_trimmed()) {
                    lines.push(format!("Line {}: {}", loc, note));
                }
            }
            ApparatusStyle::LanguageFiltered => {
                if app.xml_lang() != Some(lang) {
                    continue;
                }
                if let Some(note) = app.descendant("note").and_then(|n| n.text_trimmed()) {
                    lines.push(note.to_string());
                }
            }
        }
    }

    lines.join("\n")
}

/// Collect every `seg` under the division whose `xml:lang` matches the
/// filter. Used for both translation and commentary; non-matching segments
/// are expected in multi-language documents and silently skipped.
pub fn extract_seg_texts(div: Option<&Element>, lang: &str) -> String {
    let Some(div) = div else {
        return String::new();
    };

    let texts: Vec<&str> = div
        .descendants("seg")
        .into_iter()
        .filter(|seg| seg.xml_lang() == Some(lang))
        .filter_map(|seg| seg.text_trimmed())
        .collect();

    texts.join("\n")
}

/// Extract bibliography entries according to the configured policy.
pub fn extract_bibliography(div: Option<&Element>, style: BibliographyStyle) -> String {
    let Some(div) = div else {
        return String::new();
    };

    let mut lines: Vec<String> = Vec::new();

    for bibl in div.descendants("bibl") {
        match style {
            BibliographyStyle::Structured => {
                if let Some(entry) = structured_bibl_entry(bibl) {
                    lines.push(entry);
                }
            }
            BibliographyStyle::Verbatim => {
                if let Some(text) = bibl.text_trimmed() {
                    lines.push(text.to_string());
                }
            }
        }
    }

    lines.join("\n")
}

fn structured_bibl_entry(bibl: &Element) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();

    if let Some(title) = bibl.child("title").and_then(|e| e.text_trimmed()) {
        parts.push(title.to_string());
    }
    if let Some(date) = bibl.child("date").and_then(|e| e.text_trimmed()) {
        parts.push(format!("({})", date));
    }
    if let Some(place) = bibl.child("pubPlace").and_then(|e| e.text_trimmed()) {
        parts.push(place.to_string());
    }
    if let Some(volume) = bibl_scope(bibl, "volume") {
        parts.push(format!("vol. {}", volume));
    }
    if let Some(page) = bibl_scope(bibl, "page") {
        parts.push(format!("p. {}", page));
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

fn bibl_scope<'a>(bibl: &'a Element, unit: &str) -> Option<&'a str> {
    bibl.children_named("biblScope")
        .find(|e| e.attr("unit") == Some(unit))
        .and_then(|e| e.text_trimmed())
}
