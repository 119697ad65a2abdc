//! Case-insensitive substring search over assembled monument records, plus
//! the append-only term sets used for search suggestions and the image
//! association helper.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::NOT_AVAILABLE;
use crate::types::Monument;

/// Which record fields a search runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    All,
    /// The descriptive metadata fields.
    MonumentInfo,
    /// The rendered Leiden+ edition text.
    Edition,
    Translation,
    Commentary,
    Bibliography,
}

impl std::str::FromStr for SearchField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(SearchField::All),
            "info" => Ok(SearchField::MonumentInfo),
            "edition" => Ok(SearchField::Edition),
            "translation" => Ok(SearchField::Translation),
            "commentary" => Ok(SearchField::Commentary),
            "bibliography" => Ok(SearchField::Bibliography),
            _ => Err(format!("Invalid search field: {}", s)),
        }
    }
}

/// One hit: the file, the section it was found in, and that section's text.
#[derive(Debug, Clone, Serialize)]
pub struct SearchMatch {
    pub file_name: String,
    pub section: String,
    pub content: String,
}

/// Case-insensitive substring search across a batch of records.
pub fn search_monuments(monuments: &[Monument], term: &str, field: SearchField) -> Vec<SearchMatch> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return Vec::new();
    }

    let mut matches = Vec::new();

    for m in monuments {
        if matches!(field, SearchField::All | SearchField::MonumentInfo) {
            for (label, value) in m.metadata.fields() {
                if value != NOT_AVAILABLE && value.to_lowercase().contains(&term) {
                    matches.push(SearchMatch {
                        file_name: m.file_name.clone(),
                        section: label.to_string(),
                        content: value.to_string(),
                    });
                }
            }
        }

        let sections: &[(SearchField, &str, &str)] = &[
            (SearchField::Edition, "Edition", &m.leiden_text),
            (SearchField::Translation, "Translation", &m.translation),
            (SearchField::Commentary, "Commentary", &m.commentary),
            (SearchField::Bibliography, "Bibliography", &m.bibliography),
        ];

        for (section_field, label, content) in sections {
            if field != SearchField::All && field != *section_field {
                continue;
            }
            if !content.is_empty() && content.to_lowercase().contains(&term) {
                matches.push(SearchMatch {
                    file_name: m.file_name.clone(),
                    section: label.to_string(),
                    content: content.to_string(),
                });
            }
        }
    }

    matches
}

/// Aggregate sets of lowercased metadata values across a batch, offered as
/// search-term suggestions. Append-only; sentinel values are skipped.
#[derive(Debug, Default, Clone)]
pub struct TermSets {
    object_types: BTreeSet<String>,
    materials: BTreeSet<String>,
    categories: BTreeSet<String>,
}

impl TermSets {
    pub fn add(&mut self, monument: &Monument) {
        let meta = &monument.metadata;
        Self::add_term(&mut self.object_types, &meta.object_type);
        Self::add_term(&mut self.materials, &meta.material);
        Self::add_term(&mut self.categories, &meta.category);
    }

    fn add_term(set: &mut BTreeSet<String>, value: &str) {
        if !value.is_empty() && value != NOT_AVAILABLE {
            set.insert(value.to_lowercase());
        }
    }

    pub fn object_types(&self) -> Vec<&str> {
        self.object_types.iter().map(String::as_str).collect()
    }

    pub fn materials(&self) -> Vec<&str> {
        self.materials.iter().map(String::as_str).collect()
    }

    pub fn categories(&self) -> Vec<&str> {
        self.categories.iter().map(String::as_str).collect()
    }
}

/// Uploaded image names associated with a monument: the identifier appears
/// in the file name as a case-insensitive substring.
pub fn matching_images<'a>(monument_id: &str, image_names: &[&'a str]) -> Vec<&'a str> {
    if monument_id.is_empty() {
        return Vec::new();
    }
    let id = monument_id.to_lowercase();
    image_names
        .iter()
        .filter(|name| name.to_lowercase().contains(&id))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::MonumentMetadata;

    fn sample_monument() -> Monument {
        let mut meta = MonumentMetadata::default();
        meta.object_type = "Altar".to_string();
        meta.material = "limestone".to_string();
        meta.category = "votive inscription".to_string();

        Monument {
            file_name: "ilb-042.xml".to_string(),
            monument_id: "ILB-042".to_string(),
            title: "Votive altar".to_string(),
            leiden_text: "\n1. Imp(erator) [Caesar]".to_string(),
            translation: "To the emperor.".to_string(),
            apparatus: String::new(),
            commentary: String::new(),
            bibliography: "IGBulg, (1958)".to_string(),
            metadata: meta,
            raw_xml: String::new(),
        }
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let monuments = vec![sample_monument()];
        let matches = search_monuments(&monuments, "ALTAR", SearchField::MonumentInfo);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].section, "Type of monument");
    }

    #[test]
    fn test_search_scoped_to_field() {
        let monuments = vec![sample_monument()];
        assert_eq!(search_monuments(&monuments, "caesar", SearchField::Edition).len(), 1);
        assert!(search_monuments(&monuments, "caesar", SearchField::Translation).is_empty());
    }

    #[test]
    fn test_search_all_fields() {
        let monuments = vec![sample_monument()];
        let matches = search_monuments(&monuments, "emperor", SearchField::All);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].section, "Translation");
    }

    #[test]
    fn test_empty_term_matches_nothing() {
        let monuments = vec![sample_monument()];
        assert!(search_monuments(&monuments, "  ", SearchField::All).is_empty());
    }

    #[test]
    fn test_sentinel_fields_never_match() {
        let monuments = vec![sample_monument()];
        assert!(search_monuments(&monuments, "not available", SearchField::MonumentInfo).is_empty());
    }

    #[test]
    fn test_term_sets_lowercase_and_skip_sentinel() {
        let mut sets = TermSets::default();
        sets.add(&sample_monument());
        sets.add(&sample_monument());
        assert_eq!(sets.object_types(), vec!["altar"]);
        assert_eq!(sets.materials(), vec!["limestone"]);
        assert_eq!(sets.categories(), vec!["votive inscription"]);
    }

    #[test]
    fn test_matching_images() {
        let names = ["ILB-042_front.jpg", "ilb-042-back.png", "other.jpg"];
        let found = matching_images("ilb-042", &names);
        assert_eq!(found, vec!["ILB-042_front.jpg", "ilb-042-back.png"]);
        assert!(matching_images("", &names).is_empty());
    }
}
