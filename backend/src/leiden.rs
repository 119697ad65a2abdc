//! Leiden+ rendering of EpiDoc edition text.
//!
//! A single recursive pass over the element tree produces the plain-text
//! transcription notation: brackets for restored text, dots for lacunae,
//! combining marks for damaged letters and so on. Rendering is a pure
//! function of the subtree; no tag has a failure path, and an unrecognized
//! tag recurses into its children so encoded text is never dropped.

use crate::types::RenderOptions;
use crate::xml_tree::Element;

/// Combining dot below, marks an unclear letter.
const UNCLEAR_MARK: char = '\u{0323}';
/// Greek tonos, appended in parentheses for an apex.
const APEX_MARK: char = '\u{0384}';
/// Macron, marks supralinear text.
const SUPRALINE_MARK: char = '\u{00AF}';
/// Combining double inverted breve, marks a ligature.
const LIGATURE_MARK: char = '\u{0361}';

/// The finite set of EpiDoc tags the transducer knows how to format.
///
/// Dispatching through one enum keeps the rule table in a single place:
/// supporting a new tag means adding a variant here and one match arm in
/// [`render_child`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LeidenTag {
    /// `lb`, a physical line on the monument.
    LineBreak,
    /// `div`, a structural division (only `type="textpart"` is formatted).
    Division,
    /// `unclear`, damaged but legible letters.
    Unclear,
    /// `orig`, letters kept as inscribed against the editor's judgement.
    Orig,
    /// `supplied`, editorially restored text.
    Supplied,
    /// `gap`, a physical lacuna.
    Gap,
    /// `del`, text deleted in antiquity.
    Deletion,
    /// `add`, text added in antiquity.
    Addition,
    /// `choice`, a correction or regularization pair.
    Choice,
    /// `hi`, rendering highlights (apex, supraline, ligature).
    Highlight,
    /// `expan`, an abbreviation with its expansion.
    Expansion,
    /// `interp`, an interpunct.
    Interpunct,
    /// `abbr`, `ex` and `num` outside an `expan`, plain text.
    Literal,
    /// `g`, a named glyph.
    Glyph,
    /// `surplus`, letters inscribed in error.
    Surplus,
    /// `note`, an editorial remark.
    Note,
    /// `space`, an inscribed blank.
    Space,
    /// `w`, a transparent word container.
    Word,
    /// Anything else: recurse, never drop content.
    Other,
}

impl LeidenTag {
    fn classify(local: &str) -> Self {
        match local {
            "lb" => LeidenTag::LineBreak,
            "div" => LeidenTag::Division,
            "unclear" => LeidenTag::Unclear,
            "orig" => LeidenTag::Orig,
            "supplied" => LeidenTag::Supplied,
            "gap" => LeidenTag::Gap,
            "del" => LeidenTag::Deletion,
            "add" => LeidenTag::Addition,
            "choice" => LeidenTag::Choice,
            "hi" => LeidenTag::Highlight,
            "expan" => LeidenTag::Expansion,
            "interp" => LeidenTag::Interpunct,
            "abbr" | "ex" | "num" => LeidenTag::Literal,
            "g" => LeidenTag::Glyph,
            "surplus" => LeidenTag::Surplus,
            "note" => LeidenTag::Note,
            "space" => LeidenTag::Space,
            "w" => LeidenTag::Word,
            _ => LeidenTag::Other,
        }
    }
}

/// Render an edition subtree to Leiden+ plain text.
///
/// Emits the element's leading text, then for each child its tag-specific
/// formatting immediately followed by that child's tail, in document order.
pub fn render(elem: &Element, opts: &RenderOptions) -> String {
    // Some encodings wrap the whole edition in a single ab container
    // directly under the div; render that container instead.
    if opts.transparent_ab && elem.local == "div" {
        if let Some(ab) = elem.child("ab") {
            return render(ab, opts);
        }
    }

    let mut out = String::new();
    out.push_str(&elem.text);

    for child in &elem.children {
        render_child(child, opts, &mut out);
        out.push_str(&child.tail);
    }

    out
}

fn render_child(child: &Element, opts: &RenderOptions, out: &mut String) {
    match LeidenTag::classify(&child.local) {
        LeidenTag::LineBreak => {
            if opts.suppress_unbroken_lb && child.attr("break") == Some("no") {
                return;
            }
            match child.attr("n") {
                Some(n) if !n.is_empty() => {
                    out.push('\n');
                    out.push_str(n);
                    out.push_str(". ");
                }
                _ => out.push('\n'),
            }
        }

        LeidenTag::Division => {
            if child.attr("type") == Some("textpart") {
                let n = child.attr("n").unwrap_or("");
                let inner = render(child, opts);
                out.push_str(&format!("<D=.{} {} =D>", n, inner));
            } else {
                out.push_str(&render(child, opts));
            }
        }

        LeidenTag::Unclear => {
            for ch in child.text.chars() {
                out.push(ch);
                out.push(UNCLEAR_MARK);
            }
        }

        LeidenTag::Orig => {
            out.push('=');
            out.push_str(&child.text);
            out.push('=');
        }

        LeidenTag::Supplied => {
            let sup = child.text.as_str();
            match child.attr("reason") {
                Some("lost") => {
                    let query = if child.attr("cert") == Some("low") { "?" } else { "" };
                    out.push_str(&format!("[{}{}]", sup, query));
                }
                Some("undefined") => out.push_str(&format!("_[{}]_", sup)),
                Some("omitted") => out.push_str(&format!("<{}>", sup)),
                Some("subaudible") => out.push_str(&format!("({})", sup)),
                _ => out.push_str(sup),
            }
        }

        LeidenTag::Gap => render_gap(child, out),

        LeidenTag::Deletion => {
            let inner = child.collected_text();
            if child.attr("rend") == Some("erasure") {
                out.push_str(&format!("\u{301A}{}\u{301B}", inner));
            } else {
                out.push_str(&inner);
            }
        }

        LeidenTag::Addition => {
            let inner = child.text.as_str();
            match child.attr("place") {
                Some("overstrike") => out.push_str(&format!("\u{300A}{}\u{300B}", inner)),
                Some("above") => out.push_str(&format!("`{}\u{00B4}", inner)),
                Some("below") => out.push_str(&format!("/{}\\", inner)),
                _ => out.push_str(inner),
            }
        }

        LeidenTag::Choice => {
            let corr = child.child("corr");
            let sic = child.child("sic");
            let reg = child.child("reg");
            let orig = child.child("orig");
            if let (Some(corr), Some(sic)) = (corr, sic) {
                out.push_str(&format!("<{}|corr|{}>", corr.text, sic.text));
            } else if let (Some(reg), Some(orig)) = (reg, orig) {
                out.push_str(&format!("<{}|reg|{}>", orig.text, reg.text));
            } else {
                out.push_str(&child.collected_text());
            }
        }

        LeidenTag::Highlight => {
            let inner = child.text.as_str();
            match child.attr("rend") {
                Some("apex") => out.push_str(&format!("{}({})", inner, APEX_MARK)),
                Some("supraline") => out.push_str(&format!("{}{}", inner, SUPRALINE_MARK)),
                Some("ligature") => out.push_str(&format!("{}{}", inner, LIGATURE_MARK)),
                _ => out.push_str(inner),
            }
        }

        LeidenTag::Expansion => {
            // Only a complete abbr+ex pair is formattable.
            if let (Some(abbr), Some(ex)) = (child.child("abbr"), child.child("ex")) {
                let query = if ex.attr("cert") == Some("low") { "?" } else { "" };
                out.push_str(&format!("{}({}{})", abbr.text, ex.text, query));
            }
        }

        LeidenTag::Interpunct => out.push_str(" \u{00B7} "),

        LeidenTag::Literal => out.push_str(&child.text),

        LeidenTag::Glyph => {
            if let Some(glyph_type) = child.attr("type") {
                out.push_str(&format!("*{}*", glyph_type));
            }
        }

        LeidenTag::Surplus => out.push_str(&format!("{{{}}}", child.text)),

        LeidenTag::Note => {
            let note = child.text.as_str();
            // Stock editorial markers get comment syntax, free text gets
            // parentheses.
            if matches!(note, "!" | "sic" | "e.g.") {
                out.push_str(&format!("/*{}*/", note));
            } else {
                out.push_str(&format!("({})", note));
            }
        }

        LeidenTag::Space => render_space(child, out),

        LeidenTag::Word => out.push_str(&render(child, opts)),

        LeidenTag::Other => out.push_str(&render(child, opts)),
    }
}

fn render_gap(child: &Element, out: &mut String) {
    if child.attr("reason") == Some("ellipsis") {
        out.push_str("...");
        return;
    }

    let qty = child.attr("quantity").unwrap_or("");
    let extent_unknown = child.attr("extent") == Some("unknown");

    match child.attr("unit") {
        Some("character") => {
            if extent_unknown {
                out.push_str("[.?]");
            } else if child.attr("precision") == Some("low") {
                out.push_str(&format!("[.{}]", qty));
            } else {
                let n = qty.parse::<usize>().unwrap_or(0);
                out.push('[');
                for _ in 0..n {
                    out.push('.');
                }
                out.push(']');
            }
        }
        Some("line") => {
            if extent_unknown {
                out.push_str("(Lines: ? non transcribed)");
            } else {
                out.push_str(&format!("(Lines: {} non transcribed)", qty));
            }
        }
        _ => {}
    }
}

fn render_space(child: &Element, out: &mut String) {
    let qty = child.attr("quantity").unwrap_or("");
    let extent_unknown = child.attr("extent") == Some("unknown");

    match child.attr("unit") {
        Some("character") => {
            if extent_unknown {
                out.push_str("vac.?");
            } else {
                out.push_str(&format!("vac.{}", qty));
            }
        }
        Some("line") => {
            if extent_unknown {
                out.push_str("vac.?lin");
            } else {
                out.push_str(&format!("vac.{}lin", qty));
            }
        }
        _ => {}
    }
}
