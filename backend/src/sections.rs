//! Locates the TEI header and the typed divisions of the text body.

use crate::xml_tree::Element;

/// Borrowed views into one parsed document. Absence of a section is not an
/// error; extractors produce empty output for a missing reference.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sections<'a> {
    pub header: Option<&'a Element>,
    pub body: Option<&'a Element>,
    pub edition: Option<&'a Element>,
    pub apparatus: Option<&'a Element>,
    pub translation: Option<&'a Element>,
    pub commentary: Option<&'a Element>,
    pub bibliography: Option<&'a Element>,
}

/// Walk the root's direct structure and classify the body's divisions by
/// their `type` attribute (case-sensitive exact match).
///
/// Edition disambiguation: a single edition div is used regardless of its
/// language tag; with several, the one whose `xml:lang` equals
/// `edition_lang` wins, falling back to the first.
pub fn locate<'a>(root: &'a Element, edition_lang: &str) -> Sections<'a> {
    let mut sections = Sections::default();

    sections.header = root.child("teiHeader");
    sections.body = root.child("text").and_then(|t| t.child("body"));

    let Some(body) = sections.body else {
        return sections;
    };

    let mut editions: Vec<&Element> = Vec::new();

    for div in body.children_named("div") {
        match div.attr("type") {
            Some("edition") => editions.push(div),
            Some("apparatus") => sections.apparatus = sections.apparatus.or(Some(div)),
            Some("translation") => sections.translation = sections.translation.or(Some(div)),
            Some("commentary") => sections.commentary = sections.commentary.or(Some(div)),
            Some("bibliography") => sections.bibliography = sections.bibliography.or(Some(div)),
            _ => {}
        }
    }

    sections.edition = match editions.len() {
        0 => None,
        1 => Some(editions[0]),
        _ => editions
            .iter()
            .find(|d| d.xml_lang() == Some(edition_lang))
            .copied()
            .or(Some(editions[0])),
    };

    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml_tree::parse_document;

    #[test]
    fn test_locates_typed_divisions() {
        let xml = r#"<TEI>
            <teiHeader/>
            <text><body>
                <div type="edition">ed</div>
                <div type="apparatus">app</div>
                <div type="translation">tr</div>
                <div type="commentary">comm</div>
                <div type="bibliography">bib</div>
            </body></text>
        </TEI>"#;
        let root = parse_document(xml).unwrap();
        let s = locate(&root, "grc");
        assert!(s.header.is_some());
        assert_eq!(s.edition.unwrap().text, "ed");
        assert_eq!(s.apparatus.unwrap().text, "app");
        assert_eq!(s.translation.unwrap().text, "tr");
        assert_eq!(s.commentary.unwrap().text, "comm");
        assert_eq!(s.bibliography.unwrap().text, "bib");
    }

    #[test]
    fn test_missing_sections_are_none() {
        let root = parse_document("<TEI><text><body/></text></TEI>").unwrap();
        let s = locate(&root, "grc");
        assert!(s.header.is_none());
        assert!(s.body.is_some());
        assert!(s.edition.is_none());
        assert!(s.apparatus.is_none());
    }

    #[test]
    fn test_single_edition_used_whatever_its_language() {
        let xml = r#"<TEI><text><body>
            <div type="edition" xml:lang="la">latin</div>
        </body></text></TEI>"#;
        let root = parse_document(xml).unwrap();
        assert_eq!(locate(&root, "grc").edition.unwrap().text, "latin");
    }

    #[test]
    fn test_multiple_editions_prefer_ancient_language() {
        let xml = r#"<TEI><text><body>
            <div type="edition" xml:lang="en">english</div>
            <div type="edition" xml:lang="grc">greek</div>
        </body></text></TEI>"#;
        let root = parse_document(xml).unwrap();
        assert_eq!(locate(&root, "grc").edition.unwrap().text, "greek");
    }

    #[test]
    fn test_multiple_editions_fall_back_to_first() {
        let xml = r#"<TEI><text><body>
            <div type="edition" xml:lang="en">first</div>
            <div type="edition" xml:lang="la">second</div>
        </body></text></TEI>"#;
        let root = parse_document(xml).unwrap();
        assert_eq!(locate(&root, "grc").edition.unwrap().text, "first");
    }

    #[test]
    fn test_type_match_is_case_sensitive() {
        let xml = r#"<TEI><text><body><div type="Edition">x</div></body></text></TEI>"#;
        let root = parse_document(xml).unwrap();
        assert!(locate(&root, "grc").edition.is_none());
    }

    #[test]
    fn test_nested_divisions_not_scanned() {
        // Only direct children of body are classified.
        let xml = r#"<TEI><text><body>
            <div><div type="edition">nested</div></div>
        </body></text></TEI>"#;
        let root = parse_document(xml).unwrap();
        assert!(locate(&root, "grc").edition.is_none());
    }
}
