// lopdf helper - object resolution shared by the structured walks
use anyhow::{anyhow, Result};
use lopdf::{Dictionary, Document, Object};

// Guards against reference loops in malformed files
const MAX_DEPTH: usize = 32;

/// Parse a PDF held in memory
pub fn load_pdf(bytes: &[u8]) -> Result<Document> {
    Ok(Document::load_mem(bytes)?)
}

/// Follow indirect references until a direct object is reached
pub fn resolve<'a>(doc: &'a Document, mut object: &'a Object) -> Result<&'a Object> {
    for _ in 0..MAX_DEPTH {
        match object {
            Object::Reference(id) => object = doc.get_object(*id)?,
            direct => return Ok(direct),
        }
    }
    Err(anyhow!("reference chain too deep"))
}

pub fn resolve_dict<'a>(doc: &'a Document, object: &'a Object) -> Result<&'a Dictionary> {
    Ok(resolve(doc, object)?.as_dict()?)
}

/// The document catalog (/Root)
pub fn catalog(doc: &Document) -> Result<&Dictionary> {
    let root = doc.trailer.get(b"Root")?;
    resolve_dict(doc, root)
}

pub fn get<'a>(doc: &'a Document, dict: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
    dict.get(key).ok().and_then(|obj| resolve(doc, obj).ok())
}

pub fn name_value(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<String> {
    get(doc, dict, key)
        .and_then(|obj| obj.as_name().ok())
        .map(|name| String::from_utf8_lossy(name).into_owned())
}

pub fn int_value(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<i64> {
    match get(doc, dict, key)? {
        Object::Integer(i) => Some(*i),
        Object::Real(r) => Some(*r as i64),
        _ => None,
    }
}

pub fn text_value(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<String> {
    match get(doc, dict, key)? {
        Object::String(bytes, _) => Some(decode_text_string(bytes)),
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        _ => None,
    }
}

fn parent<'a>(doc: &'a Document, dict: &'a Dictionary) -> Option<&'a Dictionary> {
    get(doc, dict, b"Parent").and_then(|obj| obj.as_dict().ok())
}

/// Look a key up on the field and then on its ancestors (/FT, /Ff are inheritable)
pub fn inherited<'a>(doc: &'a Document, dict: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
    let mut node = Some(dict);
    for _ in 0..MAX_DEPTH {
        let current = node?;
        if let Some(value) = get(doc, current, key) {
            return Some(value);
        }
        node = parent(doc, current);
    }
    None
}

pub fn inherited_name(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<String> {
    inherited(doc, dict, key)
        .and_then(|obj| obj.as_name().ok())
        .map(|name| String::from_utf8_lossy(name).into_owned())
}

pub fn inherited_int(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<i64> {
    match inherited(doc, dict, key)? {
        Object::Integer(i) => Some(*i),
        Object::Real(r) => Some(*r as i64),
        _ => None,
    }
}

/// Fully qualified field name: partial /T names joined with dots from the root down
pub fn qualified_name(doc: &Document, dict: &Dictionary) -> Option<String> {
    let mut parts = Vec::new();
    let mut node = Some(dict);
    for _ in 0..MAX_DEPTH {
        let Some(current) = node else { break };
        if let Some(partial) = text_value(doc, current, b"T") {
            if !partial.is_empty() {
                parts.push(partial);
            }
        }
        node = parent(doc, current);
    }
    if parts.is_empty() {
        return None;
    }
    parts.reverse();
    Some(parts.join("."))
}

/// Decode a PDF text string: UTF-16BE or UTF-8 with BOM, otherwise PDFDocEncoding
pub fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    if let Some(utf8) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8_lossy(utf8).into_owned();
    }
    // Latin-1 agrees with PDFDocEncoding for everything a field name uses
    bytes.iter().map(|&b| b as char).collect()
}
