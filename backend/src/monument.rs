//! Per-document pipeline: parse, locate sections, render and extract,
//! assemble the output record. Batch processing over uploaded files.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::{NO_EDITION_TEXT, TEI_NS, extractors, leiden, metadata, sections};
use crate::encoding::decode_xml_bytes;
use crate::types::{BatchFailure, ExtractOptions, MalformedXml, Monument, StructuralWarning};
use crate::xml_tree::{Element, parse_document};

/// A parsed TEI file with its advisory structural findings and the original
/// text kept for re-download.
#[derive(Debug, Clone)]
pub struct TeiDocument {
    pub root: Element,
    pub raw_xml: String,
    pub warnings: Vec<StructuralWarning>,
}

/// Parse one document and check its top-level TEI structure.
///
/// Well-formedness failures are fatal for this document. Structural
/// findings (wrong root, missing header or text section) are advisory;
/// extraction continues best-effort on whatever is present.
pub fn parse_tei(file_name: &str, xml: &str) -> Result<TeiDocument, MalformedXml> {
    let root = parse_document(xml)?;

    let mut warnings = Vec::new();

    if root.local != "TEI" || root.ns.as_deref() != Some(TEI_NS) {
        warnings.push(StructuralWarning::UnexpectedRoot { found: root.local.clone() });
    }
    if root.child("teiHeader").is_none() {
        warnings.push(StructuralWarning::MissingHeader);
    }
    match root.child("text") {
        None => warnings.push(StructuralWarning::MissingText),
        Some(text) => {
            if text.child("body").is_none() {
                warnings.push(StructuralWarning::MissingBody);
            }
        }
    }

    for w in &warnings {
        warn!("{}: {}", file_name, w);
    }

    Ok(TeiDocument {
        root,
        raw_xml: xml.to_string(),
        warnings,
    })
}

/// Run the whole extraction pipeline for one document.
pub fn build_monument(
    file_name: &str,
    xml: &str,
    opts: &ExtractOptions,
) -> Result<Monument, MalformedXml> {
    let doc = parse_tei(file_name, xml)?;
    let s = sections::locate(&doc.root, &opts.edition_lang);

    let leiden_text = match s.edition {
        Some(edition) => leiden::render(edition, &opts.render),
        None => NO_EDITION_TEXT.to_string(),
    };

    let translation = extractors::extract_seg_texts(s.translation, &opts.note_lang);
    let apparatus = extractors::extract_apparatus(s.apparatus, opts.apparatus, &opts.note_lang);
    let commentary = extractors::extract_seg_texts(s.commentary, &opts.note_lang);
    let bibliography = extractors::extract_bibliography(s.bibliography, opts.bibliography);

    let meta = metadata::extract(s.header, &opts.note_lang);

    Ok(Monument {
        file_name: file_name.to_string(),
        monument_id: metadata::extract_monument_id(s.header),
        title: metadata::extract_title(s.header),
        leiden_text,
        translation,
        apparatus,
        commentary,
        bibliography,
        metadata: meta,
        raw_xml: doc.raw_xml,
    })
}

/// Decode raw file bytes and run the pipeline.
pub fn build_monument_from_bytes(
    file_name: &str,
    bytes: &[u8],
    opts: &ExtractOptions,
) -> Result<Monument, MalformedXml> {
    let xml = decode_xml_bytes(bytes);
    build_monument(file_name, &xml, opts)
}

/// Read one file from disk and run the pipeline on it.
pub fn load_monument_from_path(path: &Path, opts: &ExtractOptions) -> Result<Monument> {
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read file: {:?}", path))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let monument = build_monument_from_bytes(&file_name, &bytes, opts)?;
    Ok(monument)
}

/// Process an uploaded batch sequentially.
///
/// A document that fails to parse is skipped with a diagnostic naming the
/// file; all other documents are unaffected.
pub fn process_batch(
    inputs: &[(String, Vec<u8>)],
    opts: &ExtractOptions,
) -> (Vec<Monument>, Vec<BatchFailure>) {
    let mut monuments = Vec::new();
    let mut failures = Vec::new();

    for (file_name, bytes) in inputs {
        match build_monument_from_bytes(file_name, bytes, opts) {
            Ok(monument) => {
                info!("Processed {} ({})", file_name, monument.monument_id);
                monuments.push(monument);
            }
            Err(e) => {
                error!("XML parsing error in file {}: {}", file_name, e);
                failures.push(BatchFailure {
                    file_name: file_name.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    (monuments, failures)
}
