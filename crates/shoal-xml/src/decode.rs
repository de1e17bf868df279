//! Event-driven XML decoding into a dynamic value tree.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::XmlError;

/// A decoded XML value.
///
/// Documents decode into nested [`Value::Node`] maps keyed by lower-cased
/// tag name, with leaf text as [`Value::Text`], empty elements as
/// [`Value::Flag`], and repeated (or always-list) tags as [`Value::List`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Leaf element text, entities unescaped.
    Text(String),
    /// A self-closing or empty element; always `true`.
    Flag(bool),
    /// An element with child elements, keyed by lower-cased tag name.
    Node(BTreeMap<String, Value>),
    /// Repeated sibling elements, or a tag on the always-list.
    List(Vec<Value>),
}

impl Value {
    /// Look up a child by lower-cased tag name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Node(map) => map.get(key),
            _ => None,
        }
    }

    /// The text of this value, if it is a leaf.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The elements of this value, if it is a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Convenience: the text of the child named `key`.
    #[must_use]
    pub fn text_of(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }
}

/// Decode an S3 XML document into a [`Value`] tree.
///
/// `always_list` names the (lower-cased) tags that must decode as a list
/// even when only one sibling is present — e.g. `contents` for object
/// listings — so callers never special-case the single-result shape.
///
/// # Errors
///
/// Returns [`XmlError`] if the document is malformed or text cannot be
/// decoded.
pub fn decode(xml: &[u8], always_list: &[&str]) -> Result<Value, XmlError> {
    let mut reader = Reader::from_reader(xml);

    let mut children: BTreeMap<String, Value> = BTreeMap::new();
    let mut text = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = tag_name(e.name().as_ref())?;
                let child = read_element(&mut reader, &name, always_list)?;
                insert_child(&mut children, name, child, always_list);
            }
            Event::Empty(e) => {
                let name = tag_name(e.name().as_ref())?;
                insert_child(&mut children, name, Value::Flag(true), always_list);
            }
            Event::Text(e) => {
                let decoded = e.decode().map_err(|err| XmlError::Text(err.to_string()))?;
                let unescaped = quick_xml::escape::unescape(&decoded)
                    .map_err(|err| XmlError::Text(err.to_string()))?;
                text.push_str(&unescaped);
            }
            Event::CData(e) => {
                let raw = e.into_inner();
                let decoded = std::str::from_utf8(&raw)
                    .map_err(|err| XmlError::Text(err.to_string()))?;
                text.push_str(decoded);
            }
            Event::GeneralRef(e) => {
                let decoded = e.decode().map_err(|err| XmlError::Text(err.to_string()))?;
                let entity = format!("&{decoded};");
                let resolved = quick_xml::escape::unescape(&entity)
                    .map_err(|err| XmlError::Text(err.to_string()))?;
                text.push_str(&resolved);
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions.
            _ => {}
        }
    }

    if children.is_empty() {
        // Root text with no markup decodes to the unescaped string.
        Ok(Value::Text(text))
    } else {
        Ok(Value::Node(children))
    }
}

/// Read one element's content; the opening tag has already been consumed.
fn read_element(
    reader: &mut Reader<&[u8]>,
    name: &str,
    always_list: &[&str],
) -> Result<Value, XmlError> {
    let mut children: BTreeMap<String, Value> = BTreeMap::new();
    let mut text = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let child_name = tag_name(e.name().as_ref())?;
                let child = read_element(reader, &child_name, always_list)?;
                insert_child(&mut children, child_name, child, always_list);
            }
            Event::Empty(e) => {
                let child_name = tag_name(e.name().as_ref())?;
                insert_child(&mut children, child_name, Value::Flag(true), always_list);
            }
            Event::Text(e) => {
                let decoded = e.decode().map_err(|err| XmlError::Text(err.to_string()))?;
                let unescaped = quick_xml::escape::unescape(&decoded)
                    .map_err(|err| XmlError::Text(err.to_string()))?;
                text.push_str(&unescaped);
            }
            Event::CData(e) => {
                let raw = e.into_inner();
                let decoded = std::str::from_utf8(&raw)
                    .map_err(|err| XmlError::Text(err.to_string()))?;
                text.push_str(decoded);
            }
            Event::GeneralRef(e) => {
                let decoded = e.decode().map_err(|err| XmlError::Text(err.to_string()))?;
                let entity = format!("&{decoded};");
                let resolved = quick_xml::escape::unescape(&entity)
                    .map_err(|err| XmlError::Text(err.to_string()))?;
                text.push_str(&resolved);
            }
            Event::End(_) => break,
            Event::Eof => return Err(XmlError::UnexpectedEof(name.to_owned())),
            _ => {}
        }
    }

    if !children.is_empty() {
        Ok(Value::Node(children))
    } else if text.is_empty() {
        // <Tag></Tag> and <Tag/> both decode to a flag.
        Ok(Value::Flag(true))
    } else {
        Ok(Value::Text(text))
    }
}

/// Insert a decoded child, promoting repeated siblings to a list and
/// honoring the always-list allow-list.
fn insert_child(
    map: &mut BTreeMap<String, Value>,
    name: String,
    value: Value,
    always_list: &[&str],
) {
    match map.entry(name) {
        Entry::Vacant(slot) => {
            if always_list.contains(&slot.key().as_str()) {
                slot.insert(Value::List(vec![value]));
            } else {
                slot.insert(value);
            }
        }
        Entry::Occupied(mut slot) => match slot.get_mut() {
            Value::List(items) => items.push(value),
            existing => {
                let first = std::mem::replace(existing, Value::List(Vec::with_capacity(2)));
                if let Value::List(items) = existing {
                    items.push(first);
                    items.push(value);
                }
            }
        },
    }
}

/// Lower-case a raw tag name, stripping any namespace prefix.
fn tag_name(raw: &[u8]) -> Result<String, XmlError> {
    let name =
        std::str::from_utf8(raw).map_err(|err| XmlError::Text(err.to_string()))?;
    let local = name.rsplit(':').next().unwrap_or(name);
    Ok(local.to_ascii_lowercase())
}
