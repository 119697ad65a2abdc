//! Descriptive metadata extraction from the TEI header.
//!
//! Legacy digitizations encode these fields very unevenly, so every field is
//! looked up independently and degrades to the [`NOT_AVAILABLE`] sentinel
//! when its node is missing. Nothing here can fail, and no missing field
//! blocks the extraction of another.

use serde::Serialize;

use crate::NOT_AVAILABLE;
use crate::xml_tree::Element;

/// Flat record of the scalar descriptive fields of one monument.
#[derive(Debug, Clone, Serialize)]
pub struct MonumentMetadata {
    pub editors: String,
    pub object_type: String,
    pub material: String,
    pub height: String,
    pub width: String,
    pub depth: String,
    pub letter_height: String,
    pub layout: String,
    pub find_place: String,
    pub origin: String,
    /// Dating text, with a `(between N and M)` range appended when both
    /// `notBefore` and `notAfter` are present.
    pub dating: String,
    pub institution: String,
    pub inventory: String,
    pub category: String,
}

impl Default for MonumentMetadata {
    fn default() -> Self {
        let na = || NOT_AVAILABLE.to_string();
        MonumentMetadata {
            editors: na(),
            object_type: na(),
            material: na(),
            height: na(),
            width: na(),
            depth: na(),
            letter_height: na(),
            layout: na(),
            find_place: na(),
            origin: na(),
            dating: na(),
            institution: na(),
            inventory: na(),
            category: na(),
        }
    }
}

impl MonumentMetadata {
    /// Labelled field values in display order.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("Editor(s)", &self.editors),
            ("Type of monument", &self.object_type),
            ("Material", &self.material),
            ("Height", &self.height),
            ("Width", &self.width),
            ("Depth", &self.depth),
            ("Letter height", &self.letter_height),
            ("Layout description", &self.layout),
            ("Find place", &self.find_place),
            ("Origin", &self.origin),
            ("Date", &self.dating),
            ("Institution", &self.institution),
            ("Inventory number", &self.inventory),
            ("Category of inscription", &self.category),
        ]
    }
}

/// Monument title from the title statement.
pub fn extract_title(header: Option<&Element>) -> String {
    step(header, &["fileDesc", "titleStmt", "title"])
        .and_then(|e| e.text_trimmed())
        .unwrap_or("Untitled Monument")
        .to_string()
}

/// Monument identifier from `idno type="filename"` in the publication
/// statement; used to key images and the re-download file name.
pub fn extract_monument_id(header: Option<&Element>) -> String {
    step(header, &["fileDesc", "publicationStmt"])
        .map(|stmt| {
            stmt.children_named("idno")
                .find(|e| e.attr("type") == Some("filename"))
                .and_then(|e| e.text_trimmed())
                .unwrap_or("")
        })
        .unwrap_or("")
        .to_string()
}

/// Pull every descriptive field out of the header subtree.
///
/// `lang` filters the language-tagged fields (layout description and
/// inscription category).
pub fn extract(header: Option<&Element>, lang: &str) -> MonumentMetadata {
    let mut meta = MonumentMetadata::default();

    if let Some(title_stmt) = step(header, &["fileDesc", "titleStmt"]) {
        let names: Vec<&str> = title_stmt
            .children_named("editor")
            .filter_map(|e| e.text_trimmed())
            .collect();
        if !names.is_empty() {
            meta.editors = names.join(", ");
        }
    }

    let ms_desc = step(header, &["fileDesc", "sourceDesc", "msDesc"]);

    if let Some(ms_identifier) = step(ms_desc, &["msIdentifier"]) {
        set_text(&mut meta.institution, ms_identifier.child("repository"));
        set_text(&mut meta.inventory, ms_identifier.child("idno"));
    }

    let object_desc = step(ms_desc, &["physDesc", "objectDesc"]);
    let support = step(object_desc, &["supportDesc", "support"]);

    if let Some(support) = support {
        set_text(&mut meta.object_type, support.child("objectType"));
        set_text(&mut meta.material, support.child("material"));

        if let Some(dimensions) = support.child("dimensions") {
            set_text(&mut meta.height, dimensions.child("height"));
            set_text(&mut meta.width, dimensions.child("width"));
            set_text(&mut meta.depth, dimensions.child("depth"));
        }
    }

    set_text(
        &mut meta.letter_height,
        step(ms_desc, &["physDesc", "handDesc", "handNote", "height"]),
    );

    if let Some(layout_desc) = step(object_desc, &["layoutDesc"]) {
        set_text(&mut meta.layout, child_with_lang(layout_desc, "layout", lang));
    }

    if let Some(history) = step(ms_desc, &["history"]) {
        let found = history
            .children_named("provenance")
            .find(|p| p.attr("type") == Some("found"));
        if let Some(found) = found {
            set_text(&mut meta.find_place, found.child("origPlace"));
        }

        if let Some(origin) = history.child("origin") {
            set_text(&mut meta.origin, origin.child("origPlace"));

            if let Some(orig_date) = origin.child("origDate") {
                if let Some(text) = orig_date.text_trimmed() {
                    let mut dating = text.to_string();
                    let not_before = orig_date.attr("notBefore").unwrap_or("");
                    let not_after = orig_date.attr("notAfter").unwrap_or("");
                    if !not_before.is_empty() && !not_after.is_empty() {
                        dating.push_str(&format!(" (between {} and {})", not_before, not_after));
                    }
                    meta.dating = dating;
                }
            }
        }
    }

    if let Some(summary) = step(ms_desc, &["msContents", "summary"]) {
        set_text(&mut meta.category, child_with_lang(summary, "seg", lang));
    }

    meta
}

/// Follow a chain of direct-child steps, `None` as soon as a step is absent.
fn step<'a>(elem: Option<&'a Element>, names: &[&str]) -> Option<&'a Element> {
    names.iter().fold(elem, |acc, name| acc.and_then(|e| e.child(name)))
}

fn child_with_lang<'a>(elem: &'a Element, local: &'a str, lang: &str) -> Option<&'a Element> {
    elem.children_named(local).find(|e| e.xml_lang() == Some(lang))
}

/// Overwrite the sentinel only when the node exists and has text.
fn set_text(field: &mut String, elem: Option<&Element>) {
    if let Some(text) = elem.and_then(|e| e.text_trimmed()) {
        *field = text.to_string();
    }
}
