//! Document tree for parsed TEI files.
//!
//! The shape mirrors the text/children/tail convention: an element owns the
//! text that precedes its first child, and every element owns the tail text
//! that follows its own end tag up to the next sibling. Any traversal has to
//! interleave element text, child renderings and child tails in document
//! order, otherwise interstitial text is lost.

use quick_xml::NsReader;
use quick_xml::events::Event;
use quick_xml::name::ResolveResult;

use crate::XML_NS;
use crate::types::MalformedXml;

/// A namespace-qualified attribute with its unescaped value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub ns: Option<String>,
    pub local: String,
    pub value: String,
}

/// One node of the document tree. Read-only after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Namespace URI, if the element name is bound to one.
    pub ns: Option<String>,
    pub local: String,
    pub attrs: Vec<Attr>,
    /// Text between the start tag and the first child (or the end tag).
    pub text: String,
    pub children: Vec<Element>,
    /// Text between this element's end tag and the next sibling.
    pub tail: String,
}

impl Element {
    pub fn new(ns: Option<String>, local: impl Into<String>) -> Self {
        Element {
            ns,
            local: local.into(),
            attrs: Vec::new(),
            text: String::new(),
            children: Vec::new(),
            tail: String::new(),
        }
    }

    /// Value of an unqualified attribute.
    pub fn attr(&self, local: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.ns.is_none() && a.local == local)
            .map(|a| a.value.as_str())
    }

    /// Value of the `xml:lang` attribute.
    pub fn xml_lang(&self) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.ns.as_deref() == Some(XML_NS) && a.local == "lang")
            .map(|a| a.value.as_str())
    }

    /// First direct child with the given local name.
    pub fn child(&self, local: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.local == local)
    }

    /// All direct children with the given local name.
    pub fn children_named<'a>(&'a self, local: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.local == local)
    }

    /// First descendant with the given local name, depth-first document
    /// order, not including the element itself.
    pub fn descendant(&self, local: &str) -> Option<&Element> {
        for child in &self.children {
            if child.local == local {
                return Some(child);
            }
            if let Some(found) = child.descendant(local) {
                return Some(found);
            }
        }
        None
    }

    /// All descendants with the given local name, in document order.
    pub fn descendants<'a>(&'a self, local: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.collect_descendants(local, &mut found);
        found
    }

    fn collect_descendants<'a>(&'a self, local: &str, found: &mut Vec<&'a Element>) {
        for child in &self.children {
            if child.local == local {
                found.push(child);
            }
            child.collect_descendants(local, found);
        }
    }

    /// All text within this element, markup stripped: leading text, then for
    /// each child its own collected text followed by its tail.
    pub fn collected_text(&self) -> String {
        let mut out = String::new();
        self.push_collected_text(&mut out);
        out
    }

    fn push_collected_text(&self, out: &mut String) {
        out.push_str(&self.text);
        for child in &self.children {
            child.push_collected_text(out);
            out.push_str(&child.tail);
        }
    }

    /// Leading text with surrounding whitespace stripped, if anything is left.
    pub fn text_trimmed(&self) -> Option<&str> {
        let t = self.text.trim();
        if t.is_empty() { None } else { Some(t) }
    }
}

/// Parse a UTF-8 XML string into an [`Element`] tree.
///
/// The only failure mode is well-formedness: any stream accepted by the
/// parser yields a tree, whatever its vocabulary.
pub fn parse_document(xml: &str) -> Result<Element, MalformedXml> {
    let mut reader = NsReader::from_str(xml);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let (resolve, event) = match reader.read_resolved_event() {
            Ok(x) => x,
            Err(e) => {
                return Err(MalformedXml {
                    position: reader.buffer_position(),
                    message: e.to_string(),
                });
            }
        };
        let ns = owned_ns(resolve);

        match event {
            Event::Start(e) => {
                let elem = build_element(&reader, ns, &e)?;
                stack.push(elem);
            }
            Event::Empty(e) => {
                let elem = build_element(&reader, ns, &e)?;
                attach(&mut stack, &mut root, elem, &reader)?;
            }
            Event::End(_) => {
                // Mismatched end tags are already rejected by the reader.
                if let Some(elem) = stack.pop() {
                    attach(&mut stack, &mut root, elem, &reader)?;
                }
            }
            Event::Text(e) => {
                let text = e.unescape().map_err(|err| MalformedXml {
                    position: reader.buffer_position(),
                    message: err.to_string(),
                })?;
                append_text(&mut stack, &text);
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                append_text(&mut stack, &text);
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions and doctypes
            // carry no transcription content.
            _ => {}
        }
    }

    if let Some(unclosed) = stack.last() {
        return Err(MalformedXml {
            position: reader.buffer_position(),
            message: format!("unexpected end of file, {} is not closed", unclosed.local),
        });
    }

    root.ok_or_else(|| MalformedXml {
        position: reader.buffer_position(),
        message: "no root element".to_string(),
    })
}

fn owned_ns(resolve: ResolveResult) -> Option<String> {
    match resolve {
        ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.into_inner()).into_owned()),
        _ => None,
    }
}

fn build_element(
    reader: &NsReader<&[u8]>,
    ns: Option<String>,
    start: &quick_xml::events::BytesStart,
) -> Result<Element, MalformedXml> {
    let local = String::from_utf8_lossy(start.local_name().into_inner()).into_owned();
    let mut elem = Element::new(ns, local);

    for attr in start.attributes() {
        let attr = attr.map_err(|e| MalformedXml {
            position: reader.buffer_position(),
            message: e.to_string(),
        })?;
        // Skip namespace declarations; they are bindings, not data.
        if attr.key.as_ref() == b"xmlns" || attr.key.as_ref().starts_with(b"xmlns:") {
            continue;
        }
        let (resolve, local_name) = reader.resolve_attribute(attr.key);
        let value = attr.unescape_value().map_err(|e| MalformedXml {
            position: reader.buffer_position(),
            message: e.to_string(),
        })?;
        elem.attrs.push(Attr {
            ns: owned_ns(resolve),
            local: String::from_utf8_lossy(local_name.into_inner()).into_owned(),
            value: value.into_owned(),
        });
    }

    Ok(elem)
}

fn attach(
    stack: &mut Vec<Element>,
    root: &mut Option<Element>,
    elem: Element,
    reader: &NsReader<&[u8]>,
) -> Result<(), MalformedXml> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(elem);
        Ok(())
    } else if root.is_none() {
        *root = Some(elem);
        Ok(())
    } else {
        Err(MalformedXml {
            position: reader.buffer_position(),
            message: "multiple root elements".to_string(),
        })
    }
}

fn append_text(stack: &mut Vec<Element>, text: &str) {
    // Character data before the root element is ignorable whitespace.
    if let Some(current) = stack.last_mut() {
        match current.children.last_mut() {
            Some(last_child) => last_child.tail.push_str(text),
            None => current.text.push_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_element() {
        let root = parse_document("<a>hello</a>").unwrap();
        assert_eq!(root.local, "a");
        assert_eq!(root.ns, None);
        assert_eq!(root.text, "hello");
        assert!(root.children.is_empty());
    }

    #[test]
    fn test_text_and_tail_interleaving() {
        let root = parse_document("<a>one<b>two</b>three<c/>four</a>").unwrap();
        assert_eq!(root.text, "one");
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].local, "b");
        assert_eq!(root.children[0].text, "two");
        assert_eq!(root.children[0].tail, "three");
        assert_eq!(root.children[1].local, "c");
        assert_eq!(root.children[1].tail, "four");
    }

    #[test]
    fn test_namespace_resolution() {
        let xml = r#"<TEI xmlns="http://www.tei-c.org/ns/1.0"><teiHeader/></TEI>"#;
        let root = parse_document(xml).unwrap();
        assert_eq!(root.local, "TEI");
        assert_eq!(root.ns.as_deref(), Some("http://www.tei-c.org/ns/1.0"));
        assert_eq!(root.children[0].local, "teiHeader");
        assert_eq!(root.children[0].ns.as_deref(), Some("http://www.tei-c.org/ns/1.0"));
    }

    #[test]
    fn test_xml_lang_attribute() {
        let root = parse_document(r#"<seg xml:lang="en">text</seg>"#).unwrap();
        assert_eq!(root.xml_lang(), Some("en"));
        // The plain lookup must not see the namespaced attribute.
        assert_eq!(root.attr("lang"), None);
    }

    #[test]
    fn test_attribute_entities_unescaped() {
        let root = parse_document(r#"<a n="1 &amp; 2">x &lt; y</a>"#).unwrap();
        assert_eq!(root.attr("n"), Some("1 & 2"));
        assert_eq!(root.text, "x < y");
    }

    #[test]
    fn test_malformed_reports_position() {
        let err = parse_document("<a><b></a>").unwrap_err();
        assert!(err.position > 0);
        assert!(!err.message.is_empty());
    }

    #[test]
    fn test_empty_input_is_malformed() {
        assert!(parse_document("").is_err());
        assert!(parse_document("   ").is_err());
    }

    #[test]
    fn test_descendants_document_order() {
        let root = parse_document("<a><x n='1'/><b><x n='2'/></b><x n='3'/></a>").unwrap();
        let order: Vec<&str> = root.descendants("x").iter().map(|e| e.attr("n").unwrap()).collect();
        assert_eq!(order, vec!["1", "2", "3"]);
        assert_eq!(root.descendant("x").unwrap().attr("n"), Some("1"));
    }

    #[test]
    fn test_collected_text_includes_inner_tails() {
        let root = parse_document("<a>one<b>two</b>three</a>").unwrap();
        assert_eq!(root.collected_text(), "onetwothree");
    }
}
