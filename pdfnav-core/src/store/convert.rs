//! Translation between lopdf objects and the crate's object model

use crate::objects::{Dictionary, Object, ObjectId};
use lopdf::{Object as LoObject, StringFormat};

/// Decodes a PDF text string: UTF-16BE when it carries a byte order mark,
/// UTF-8 when valid, else one char per byte.
pub(crate) fn decode_text(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else {
        match std::str::from_utf8(bytes) {
            Ok(s) => s.to_string(),
            Err(_) => bytes.iter().map(|&b| b as char).collect(),
        }
    }
}

/// Encodes a text string: literal when ASCII, else UTF-16BE with BOM.
pub(crate) fn encode_text(text: &str) -> LoObject {
    if text.is_ascii() {
        LoObject::String(text.as_bytes().to_vec(), StringFormat::Literal)
    } else {
        let mut bytes = vec![0xFE, 0xFF];
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        LoObject::String(bytes, StringFormat::Hexadecimal)
    }
}

pub(crate) fn id_from_lopdf(id: lopdf::ObjectId) -> ObjectId {
    ObjectId::from(id)
}

pub(crate) fn id_to_lopdf(id: ObjectId) -> lopdf::ObjectId {
    id.into()
}

pub(crate) fn from_lopdf(object: &LoObject) -> Object {
    #[allow(unreachable_patterns)]
    match object {
        LoObject::Null => Object::Null,
        LoObject::Boolean(b) => Object::Boolean(*b),
        LoObject::Integer(i) => Object::Integer(*i),
        LoObject::Real(r) => Object::Real(f64::from(*r)),
        LoObject::Name(name) => Object::Name(String::from_utf8_lossy(name).into_owned()),
        LoObject::String(bytes, _) => Object::String(decode_text(bytes)),
        LoObject::Array(items) => Object::Array(items.iter().map(from_lopdf).collect()),
        LoObject::Dictionary(dict) => Object::Dictionary(dict_from_lopdf(dict)),
        LoObject::Stream(stream) => {
            Object::Stream(dict_from_lopdf(&stream.dict), stream.content.clone())
        }
        LoObject::Reference(id) => Object::Reference(id_from_lopdf(*id)),
        _ => Object::Null,
    }
}

pub(crate) fn dict_from_lopdf(dict: &lopdf::Dictionary) -> Dictionary {
    dict.iter()
        .map(|(key, value)| (String::from_utf8_lossy(key).into_owned(), from_lopdf(value)))
        .collect()
}

pub(crate) fn to_lopdf(object: &Object) -> LoObject {
    match object {
        Object::Null => LoObject::Null,
        Object::Boolean(b) => LoObject::Boolean(*b),
        Object::Integer(i) => LoObject::Integer(*i),
        Object::Real(r) => LoObject::Real(*r as f32),
        Object::Name(name) => LoObject::Name(name.as_bytes().to_vec()),
        Object::String(text) => encode_text(text),
        Object::Array(items) => LoObject::Array(items.iter().map(to_lopdf).collect()),
        Object::Dictionary(dict) => LoObject::Dictionary(dict_to_lopdf(dict)),
        Object::Stream(dict, content) => {
            LoObject::Stream(lopdf::Stream::new(dict_to_lopdf(dict), content.clone()))
        }
        Object::Reference(id) => LoObject::Reference(id_to_lopdf(*id)),
    }
}

pub(crate) fn dict_to_lopdf(dict: &Dictionary) -> lopdf::Dictionary {
    let mut out = lopdf::Dictionary::new();
    for (key, value) in dict.iter() {
        out.set(key.as_bytes().to_vec(), to_lopdf(value));
    }
    out
}
