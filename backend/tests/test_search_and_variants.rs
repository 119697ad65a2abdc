/// Search over assembled records, edition disambiguation and the
/// toggleable rendering rules, driven through the public API.

use inscripta_backend::monument::{build_monument, parse_tei};
use inscripta_backend::search::{SearchField, TermSets, matching_images, search_monuments};
use inscripta_backend::types::{ExtractOptions, RenderOptions, StructuralWarning};

fn doc_with_editions(extra_edition: &str) -> String {
    format!(
        r#"<TEI xmlns="http://www.tei-c.org/ns/1.0">
            <teiHeader>
                <fileDesc>
                    <publicationStmt><idno type="filename">IGB-007</idno></publicationStmt>
                    <sourceDesc><msDesc><physDesc><objectDesc><supportDesc><support>
                        <objectType>stele</objectType>
                        <material>marble</material>
                    </support></supportDesc></objectDesc></physDesc></msDesc></sourceDesc>
                </fileDesc>
            </teiHeader>
            <text><body>
                {}
                <div type="edition" xml:lang="grc"><ab>ancient text</ab></div>
            </body></text>
        </TEI>"#,
        extra_edition
    )
}

#[test]
fn test_edition_preferred_by_language() {
    let xml = doc_with_editions(r#"<div type="edition" xml:lang="en"><ab>modern text</ab></div>"#);
    let m = build_monument("igb-007.xml", &xml, &ExtractOptions::default()).unwrap();
    assert_eq!(m.leiden_text, "ancient text");
}

#[test]
fn test_single_edition_used_regardless_of_language() {
    let xml = r#"<TEI xmlns="http://www.tei-c.org/ns/1.0">
        <teiHeader/>
        <text><body><div type="edition" xml:lang="la"><ab>latin only</ab></div></body></text>
    </TEI>"#;
    let m = build_monument("latin.xml", xml, &ExtractOptions::default()).unwrap();
    assert_eq!(m.leiden_text, "latin only");
}

#[test]
fn test_render_toggles_flow_through_options() {
    let xml = r#"<TEI xmlns="http://www.tei-c.org/ns/1.0">
        <teiHeader/>
        <text><body><div type="edition"><ab>uo<lb n="2" break="no"/>tum</ab></div></body></text>
    </TEI>"#;

    let m = build_monument("t.xml", xml, &ExtractOptions::default()).unwrap();
    assert_eq!(m.leiden_text, "uotum");

    let opts = ExtractOptions {
        render: RenderOptions { suppress_unbroken_lb: false, transparent_ab: true },
        ..ExtractOptions::default()
    };
    let m = build_monument("t.xml", xml, &opts).unwrap();
    assert_eq!(m.leiden_text, "uo\n2. tum");
}

#[test]
fn test_structural_warnings_are_advisory() {
    let doc = parse_tei("odd.xml", "<inscription><body>text</body></inscription>").unwrap();
    assert!(doc.warnings.contains(&StructuralWarning::UnexpectedRoot {
        found: "inscription".to_string()
    }));
    assert!(doc.warnings.contains(&StructuralWarning::MissingHeader));
    assert!(doc.warnings.contains(&StructuralWarning::MissingText));
}

#[test]
fn test_search_across_batch() {
    let a = build_monument(
        "igb-007.xml",
        &doc_with_editions(""),
        &ExtractOptions::default(),
    )
    .unwrap();
    let monuments = vec![a];

    let hits = search_monuments(&monuments, "MARBLE", SearchField::All);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].file_name, "igb-007.xml");
    assert_eq!(hits[0].section, "Material");

    let hits = search_monuments(&monuments, "ancient", SearchField::Edition);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].content, "ancient text");

    assert!(search_monuments(&monuments, "granite", SearchField::All).is_empty());
}

#[test]
fn test_term_suggestions_accumulate() {
    let m = build_monument(
        "igb-007.xml",
        &doc_with_editions(""),
        &ExtractOptions::default(),
    )
    .unwrap();

    let mut sets = TermSets::default();
    sets.add(&m);
    assert_eq!(sets.object_types(), vec!["stele"]);
    assert_eq!(sets.materials(), vec!["marble"]);
    assert!(sets.categories().is_empty());
}

#[test]
fn test_image_association_by_identifier() {
    let m = build_monument(
        "igb-007.xml",
        &doc_with_editions(""),
        &ExtractOptions::default(),
    )
    .unwrap();

    let images = ["IGB-007_front.jpg", "igb-007_squeeze.png", "IGB-008.jpg"];
    let found = matching_images(&m.monument_id, &images);
    assert_eq!(found, vec!["IGB-007_front.jpg", "igb-007_squeeze.png"]);
}
