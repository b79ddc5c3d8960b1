use crate::error::{HarvestError, Result};
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::fs;
use std::path::Path;
use tracing::warn;

/// Inner markup and coordinate frame pulled out of an SVG document.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgFragment {
    /// The root's `viewBox`, either verbatim or synthesized from
    /// `width`/`height`.
    pub view_box: String,
    /// Everything between the root's start and end tags, serialized
    /// verbatim and trimmed.
    pub inner: String,
}

fn attr_value(attr: &Attribute) -> String {
    match attr.unescape_value() {
        Ok(v) => v.into_owned(),
        Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
    }
}

/// Keep only the characters that can appear in an SVG length number.
fn numeric(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect()
}

fn synthesize_view_box(width: Option<&str>, height: Option<&str>) -> Result<String> {
    let (Some(w), Some(h)) = (width, height) else {
        return Err(HarvestError::Extract(
            "no viewBox and no width/height on <svg>".to_string(),
        ));
    };
    let w = numeric(w);
    let h = numeric(h);
    if w.is_empty() || h.is_empty() {
        return Err(HarvestError::Extract(
            "no viewBox and no numeric width/height on <svg>".to_string(),
        ));
    }
    Ok(format!("0 0 {} {}", w, h))
}

fn view_box_from_root(root: &BytesStart<'_>) -> Result<String> {
    let mut view_box: Option<String> = None;
    let mut width: Option<String> = None;
    let mut height: Option<String> = None;

    for attr in root.attributes().with_checks(false).flatten() {
        match attr.key.as_ref() {
            b"viewBox" => view_box = Some(attr_value(&attr)),
            b"width" => width = Some(attr_value(&attr)),
            b"height" => height = Some(attr_value(&attr)),
            _ => {}
        }
    }

    match view_box.filter(|v| !v.is_empty()) {
        Some(vb) => Ok(vb),
        None => synthesize_view_box(width.as_deref(), height.as_deref()),
    }
}

/// Extract the coordinate frame and inner markup from SVG text.
///
/// The parse is deliberately tolerant: upload pipelines and hand-edited
/// heraldry files come with mismatched or missing end tags, and a stream
/// error after the root has opened degrades to whatever markup was captured
/// up to that point instead of failing the asset. Fails when the root is not
/// `<svg>`, when no coordinate frame can be determined, or when the root has
/// no content at all.
pub fn extract_svg_markup(svg_text: &str) -> Result<SvgFragment> {
    let mut reader = Reader::from_str(svg_text);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let mut buf = Vec::new();

    // Skip the prolog (declaration, doctype, comments, stray text) up to the
    // root element.
    let root: BytesStart<'static> = loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => break e.into_owned(),
            Ok(Event::Eof) => {
                return Err(HarvestError::Extract("no root element".to_string()));
            }
            Ok(_) => {}
            Err(e) => {
                return Err(HarvestError::Extract(format!("XML parse error: {}", e)));
            }
        }
        buf.clear();
    };

    if root.local_name().as_ref() != b"svg" {
        let name = String::from_utf8_lossy(root.local_name().as_ref()).to_string();
        return Err(HarvestError::Extract(format!(
            "root element is <{}>, not <svg>",
            name
        )));
    }

    let view_box = view_box_from_root(&root)?;

    // Copy every event between the root tags back out verbatim.
    let mut writer = Writer::new(Vec::new());
    let mut depth = 1usize;
    buf.clear();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                depth += 1;
                writer
                    .write_event(Event::Start(e))
                    .map_err(|e| HarvestError::Extract(format!("rewrite failed: {}", e)))?;
            }
            Ok(Event::End(e)) => {
                if depth == 1 {
                    break;
                }
                depth -= 1;
                writer
                    .write_event(Event::End(e))
                    .map_err(|e| HarvestError::Extract(format!("rewrite failed: {}", e)))?;
            }
            Ok(Event::Eof) => break,
            // A second declaration or doctype in the body is garbage even
            // for a tolerant parse; drop it.
            Ok(Event::Decl(_)) | Ok(Event::DocType(_)) => {}
            Ok(other) => {
                writer
                    .write_event(other)
                    .map_err(|e| HarvestError::Extract(format!("rewrite failed: {}", e)))?;
            }
            Err(e) => {
                warn!("XML stream error inside <svg>: {}; keeping captured markup", e);
                break;
            }
        }
        buf.clear();
    }

    let inner = String::from_utf8_lossy(&writer.into_inner())
        .trim()
        .to_string();
    if inner.is_empty() {
        return Err(HarvestError::Extract(
            "no inner markup inside <svg>".to_string(),
        ));
    }

    Ok(SvgFragment { view_box, inner })
}

/// Read `path` and extract its fragment. Invalid UTF-8 is replaced rather
/// than rejected; Commons serves SVGs as UTF-8.
pub fn extract_svg_file(path: &Path) -> Result<SvgFragment> {
    let raw = fs::read(path)?;
    extract_svg_markup(&String::from_utf8_lossy(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_box_passes_through_verbatim() {
        let svg = r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 600 660"><g id="crest"><path d="M0 0h600v660H0z" fill="#c00"/></g></svg>"##;
        let fragment = extract_svg_markup(svg).unwrap();
        assert_eq!(fragment.view_box, "0 0 600 660");
        assert_eq!(
            fragment.inner,
            r##"<g id="crest"><path d="M0 0h600v660H0z" fill="#c00"/></g>"##
        );
    }

    #[test]
    fn view_box_synthesized_from_width_and_height() {
        let svg = r#"<svg width="100px" height="50.5px"><rect width="10" height="10"/></svg>"#;
        let fragment = extract_svg_markup(svg).unwrap();
        assert_eq!(fragment.view_box, "0 0 100 50.5");
        assert_eq!(fragment.inner, r#"<rect width="10" height="10"/>"#);
    }

    #[test]
    fn empty_view_box_attribute_falls_back_to_dimensions() {
        let svg = r#"<svg viewBox="" width="10" height="20"><g/></svg>"#;
        let fragment = extract_svg_markup(svg).unwrap();
        assert_eq!(fragment.view_box, "0 0 10 20");
    }

    #[test]
    fn non_numeric_dimensions_fail() {
        let svg = r#"<svg width="auto" height="auto"><g/></svg>"#;
        let err = extract_svg_markup(svg).unwrap_err();
        assert!(matches!(err, HarvestError::Extract(_)));
    }

    #[test]
    fn missing_dimensions_fail() {
        let err = extract_svg_markup("<svg><g/></svg>").unwrap_err();
        assert!(matches!(err, HarvestError::Extract(_)));
    }

    #[test]
    fn non_svg_root_fails() {
        let err = extract_svg_markup("<html><body>hi</body></html>").unwrap_err();
        match err {
            HarvestError::Extract(reason) => assert!(reason.contains("not <svg>")),
            other => panic!("expected Extract, got {:?}", other),
        }
    }

    #[test]
    fn empty_root_fails() {
        for svg in [
            r#"<svg viewBox="0 0 1 1"></svg>"#,
            r#"<svg viewBox="0 0 1 1"/>"#,
            r#"<svg viewBox="0 0 1 1">   </svg>"#,
        ] {
            let err = extract_svg_markup(svg).unwrap_err();
            assert!(matches!(err, HarvestError::Extract(_)), "input: {}", svg);
        }
    }

    #[test]
    fn comments_text_and_entities_are_preserved() {
        let svg = r#"<svg viewBox="0 0 10 10"><!-- mantling --><text>A &amp; B</text><?aux hint?></svg>"#;
        let fragment = extract_svg_markup(svg).unwrap();
        assert_eq!(
            fragment.inner,
            r#"<!-- mantling --><text>A &amp; B</text><?aux hint?>"#
        );
    }

    #[test]
    fn namespaced_root_is_still_svg() {
        let svg = r#"<svg:svg xmlns:svg="http://www.w3.org/2000/svg" viewBox="0 0 4 4"><svg:g/></svg:svg>"#;
        let fragment = extract_svg_markup(svg).unwrap();
        assert_eq!(fragment.inner, "<svg:g/>");
    }

    #[test]
    fn nested_svg_elements_do_not_end_the_root() {
        let svg = r#"<svg viewBox="0 0 5 5"><svg width="1"><g/></svg><path d="M0 0"/></svg>"#;
        let fragment = extract_svg_markup(svg).unwrap();
        assert_eq!(fragment.inner, r#"<svg width="1"><g/></svg><path d="M0 0"/>"#);
    }

    #[test]
    fn truncated_document_keeps_captured_markup() {
        let svg = r#"<svg viewBox="0 0 10 10"><g><path d="M0 0"/>"#;
        let fragment = extract_svg_markup(svg).unwrap();
        assert_eq!(fragment.inner, r#"<g><path d="M0 0"/>"#);
    }

    /// The extractor must never panic, whatever Commons hands back.
    #[test]
    fn fuzz_inputs_never_panic() {
        let fuzz_inputs = [
            "",
            "not xml at all",
            "<",
            "<svg",
            "<svg>",
            "<<<>>>",
            "<svg viewBox=\"0 0 1 1\">&bad;</svg>",
            "<svg viewBox=\"0 0 1 1\"><g></svg>",
            "<svg viewBox=\"0 0 1 1\"></g></svg>",
            "<svg viewBox=\"0 0 1 1\"><g foo=</g></svg>",
            "<html><svg viewBox=\"0 0 1 1\"/></html>",
            "\u{feff}<svg viewBox=\"0 0 1 1\"><g/></svg>",
            "\x00\x01\x02\x03",
            "<?xml version=\"1.0\"?>",
            "<!DOCTYPE svg><svg width=\"a\" height=\"b\"><g/></svg>",
        ];

        for input in &fuzz_inputs {
            // Ok or Err are both acceptable; a panic is not.
            let _ = extract_svg_markup(input);
        }

        let deep = format!(
            "<svg viewBox=\"0 0 1 1\">{}</svg>",
            "<g>".repeat(5000)
        );
        let _ = extract_svg_markup(&deep);
    }
}
