pub mod types;
pub mod logger;
pub mod encoding;
pub mod xml_tree;
pub mod sections;
pub mod leiden;
pub mod extractors;
pub mod metadata;
pub mod monument;
pub mod search;

pub static TEI_NS: &'static str = "http://www.tei-c.org/ns/1.0";
pub static XML_NS: &'static str = "http://www.w3.org/XML/1998/namespace";

/// Sentinel for descriptive fields whose node is absent in the header.
pub static NOT_AVAILABLE: &'static str = "Not available";

/// Shown in place of the edition text when no edition division exists.
pub static NO_EDITION_TEXT: &'static str = "No Greek edition text available.";
