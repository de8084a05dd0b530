//! Annotation extraction from a page's `/Annots` array.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::{LinkAnnotation, Rect, LINK_SUBTYPE};

use super::backend::decode_text_simple;
use super::content::{get_number, resolve};

/// Read the annotations of a page.
///
/// Every annotation with a usable `/Rect` is returned with its subtype;
/// targets are resolved for `Link` annotations only. Malformed entries are
/// skipped rather than failing the page.
pub(crate) fn collect_page_annotations(
    doc: &LopdfDocument,
    page_id: ObjectId,
    pages: &BTreeMap<u32, ObjectId>,
) -> Result<Vec<LinkAnnotation>> {
    let page_dict = doc
        .get_dictionary(page_id)
        .map_err(|e| Error::Annotation(format!("failed to get page dictionary: {}", e)))?;

    let annots = match page_dict.get(b"Annots") {
        Ok(obj) => resolve(doc, obj),
        Err(_) => return Ok(Vec::new()),
    };
    let annots = annots
        .as_array()
        .map_err(|e| Error::Annotation(format!("/Annots is not an array: {}", e)))?;

    let mut result = Vec::with_capacity(annots.len());
    for entry in annots {
        let dict = match resolve(doc, entry).as_dict() {
            Ok(dict) => dict,
            Err(_) => continue,
        };

        let subtype = match dict.get(b"Subtype") {
            Ok(Object::Name(name)) => String::from_utf8_lossy(name).into_owned(),
            _ => continue,
        };

        let rect = match dict.get(b"Rect").ok().and_then(|o| read_rect(doc, o)) {
            Some(rect) => rect,
            None => {
                log::debug!("Skipping {} annotation without a valid /Rect", subtype);
                continue;
            }
        };

        let target = if subtype == LINK_SUBTYPE {
            resolve_link_target(doc, dict, pages)
        } else {
            LinkTarget::default()
        };

        result.push(LinkAnnotation {
            subtype,
            url: target.url,
            destination: target.destination,
            file: target.file,
            rect,
        });
    }

    Ok(result)
}

fn read_rect(doc: &LopdfDocument, obj: &Object) -> Option<Rect> {
    let values: Vec<f32> = resolve(doc, obj)
        .as_array()
        .ok()?
        .iter()
        .filter_map(|o| get_number(resolve(doc, o)))
        .collect();
    if values.len() != 4 {
        return None;
    }
    Some(Rect::new(values[0], values[1], values[2], values[3]))
}

#[derive(Default)]
struct LinkTarget {
    url: Option<String>,
    destination: Option<String>,
    file: Option<String>,
}

/// Resolve where a link points.
///
/// `/A` actions are checked first (`URI`, `GoTo`, `GoToR`), then a direct
/// `/Dest`. `GoToR` targets another document and is kept apart from URLs.
fn resolve_link_target(
    doc: &LopdfDocument,
    annot: &Dictionary,
    pages: &BTreeMap<u32, ObjectId>,
) -> LinkTarget {
    if let Some(action) = annot
        .get(b"A")
        .ok()
        .and_then(|o| resolve(doc, o).as_dict().ok())
    {
        match action.get(b"S") {
            Ok(Object::Name(s)) if s == b"URI" => {
                return LinkTarget {
                    url: read_string(doc, action, b"URI"),
                    ..Default::default()
                };
            }
            Ok(Object::Name(s)) if s == b"GoTo" => {
                return LinkTarget {
                    destination: action
                        .get(b"D")
                        .ok()
                        .and_then(|d| resolve_destination(doc, d, pages)),
                    ..Default::default()
                };
            }
            Ok(Object::Name(s)) if s == b"GoToR" => {
                return LinkTarget {
                    destination: action
                        .get(b"D")
                        .ok()
                        .and_then(|d| resolve_destination(doc, d, pages)),
                    file: read_string(doc, action, b"F"),
                    ..Default::default()
                };
            }
            _ => {}
        }
    }

    LinkTarget {
        destination: annot
            .get(b"Dest")
            .ok()
            .and_then(|d| resolve_destination(doc, d, pages)),
        ..Default::default()
    }
}

fn read_string(doc: &LopdfDocument, dict: &Dictionary, key: &[u8]) -> Option<String> {
    let value = match resolve(doc, dict.get(key).ok()?) {
        Object::String(bytes, _) => Some(decode_text_simple(bytes)),
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        // File specification dictionary
        Object::Dictionary(spec) => read_string(doc, spec, b"F"),
        _ => None,
    };
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Turn a destination into `page=N` or the destination name.
fn resolve_destination(
    doc: &LopdfDocument,
    dest: &Object,
    pages: &BTreeMap<u32, ObjectId>,
) -> Option<String> {
    let resolved = match resolve(doc, dest) {
        Object::String(bytes, _) => Some(decode_text_simple(bytes)),
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        Object::Array(arr) => match arr.first()? {
            Object::Reference(page_ref) => pages
                .iter()
                .find(|(_, id)| *id == page_ref)
                .map(|(number, _)| format!("page={}", number)),
            // Remote destinations carry a 0-based page index
            Object::Integer(index) => Some(format!("page={}", index + 1)),
            _ => None,
        },
        // Destination dictionary from the name tree
        Object::Dictionary(dict) => resolve_destination(doc, dict.get(b"D").ok()?, pages),
        _ => None,
    };
    resolved.filter(|s| !s.is_empty())
}
