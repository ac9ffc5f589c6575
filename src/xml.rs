//! XML ⇄ `serde_json::Value` codec for the Jamf Classic API.
//!
//! The Classic API speaks XML only, while the rest of the crate hands
//! callers a `serde_json::Value`. This module maps between the two using
//! a small, fixed convention:
//!
//! | XML | Value |
//! |-----|-------|
//! | document `<root>..</root>` | `{"root": ..}` |
//! | `<a/>` or `<a></a>` | `null` |
//! | `<a>text</a>` | `"text"` |
//! | `<a x="1">..</a>` | `{"@x": "1", ..}` |
//! | `<a x="1">text</a>` | `{"@x": "1", "#text": "text"}` |
//! | `<a><b>1</b><b>2</b></a>` | `{"b": ["1", "2"]}` |
//!
//! Decoded scalars are always strings: XML carries no type information,
//! so `<id>5</id>` decodes to `"5"`. When encoding, numbers and booleans
//! are written as their textual form.
//!
//! A single child and a one-element array are indistinguishable in XML,
//! which is why endpoint wrappers normalize collections with
//! [`as_list`] rather than matching on `Value::Array`.

use std::str::Utf8Error;

use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use serde_json::{Map, Value};

/// Prefix used for attribute keys in decoded objects.
pub const ATTRIBUTE_PREFIX: char = '@';

/// Key holding an element's text when it also has attributes or children.
pub const TEXT_KEY: &str = "#text";

/// Failures while decoding or encoding Classic API XML.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// The reader rejected the document (bad syntax, mismatched tags).
    #[error("malformed XML: {0}")]
    Syntax(#[from] quick_xml::Error),

    /// An attribute could not be parsed.
    #[error("malformed attribute: {0}")]
    Attribute(#[from] AttrError),

    /// A name or CDATA section was not UTF-8.
    #[error("XML is not valid UTF-8: {0}")]
    Utf8(#[from] Utf8Error),

    /// The input contained no element at all.
    #[error("document has no root element")]
    MissingRoot,

    /// A second top-level element followed the first.
    #[error("document has more than one root element")]
    MultipleRoots,

    /// A closing tag appeared with no open element.
    #[error("unexpected closing tag </{0}>")]
    UnbalancedEnd(String),

    /// The input ended before this element was closed.
    #[error("document ended inside <{0}>")]
    Unclosed(String),

    /// The value handed to [`to_xml`] is not a single-rooted object.
    #[error("cannot encode {0} as an XML document; expected an object with exactly one key")]
    InvalidDocument(&'static str),

    /// A key cannot be used as an element or attribute name.
    #[error("invalid element name {0:?}")]
    InvalidName(String),
}

/// An element that has been opened but not yet closed.
struct Frame {
    name: String,
    fields: Map<String, Value>,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> Result<Self, XmlError> {
        let name = std::str::from_utf8(start.name().as_ref())?.to_string();
        let mut fields = Map::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = std::str::from_utf8(attr.key.as_ref())?;
            let value = attr.unescape_value()?.into_owned();
            fields.insert(format!("{ATTRIBUTE_PREFIX}{key}"), Value::String(value));
        }
        Ok(Frame {
            name,
            fields,
            text: String::new(),
        })
    }

    fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    fn push_child(&mut self, name: String, value: Value) {
        insert_repeated(&mut self.fields, name, value);
    }

    /// Collapses the frame into its decoded value.
    fn close(mut self) -> (String, Value) {
        let text = self.text.trim();
        let value = if self.fields.is_empty() {
            if text.is_empty() {
                Value::Null
            } else {
                Value::String(text.to_string())
            }
        } else {
            if !text.is_empty() {
                self.fields
                    .insert(TEXT_KEY.to_string(), Value::String(text.to_string()));
            }
            Value::Object(self.fields)
        };
        (self.name, value)
    }
}

/// Inserts `value` under `key`, turning repeated keys into an array.
fn insert_repeated(fields: &mut Map<String, Value>, key: String, value: Value) {
    match fields.get_mut(&key) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            fields.insert(key, value);
        }
    }
}

/// Attaches a closed element to its parent, or makes it the document root.
fn finish(
    stack: &mut [Frame],
    root: &mut Option<(String, Value)>,
    frame: Frame,
) -> Result<(), XmlError> {
    let (name, value) = frame.close();
    match stack.last_mut() {
        Some(parent) => parent.push_child(name, value),
        None if root.is_some() => return Err(XmlError::MultipleRoots),
        None => *root = Some((name, value)),
    }
    Ok(())
}

/// Decodes an XML document into a `{root_name: value}` object.
pub fn from_xml(text: &str) -> Result<Value, XmlError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, Value)> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                if stack.is_empty() && root.is_some() {
                    return Err(XmlError::MultipleRoots);
                }
                stack.push(Frame::open(&start)?);
            }
            Event::Empty(start) => {
                let frame = Frame::open(&start)?;
                finish(&mut stack, &mut root, frame)?;
            }
            Event::End(end) => {
                let name = std::str::from_utf8(end.name().as_ref())?.to_string();
                let frame = stack.pop().ok_or(XmlError::UnbalancedEnd(name))?;
                finish(&mut stack, &mut root, frame)?;
            }
            Event::Text(text) => {
                if let Some(frame) = stack.last_mut() {
                    frame.push_text(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let Some(frame) = stack.last_mut() {
                    let raw = data.into_inner();
                    frame.push_text(std::str::from_utf8(&raw)?);
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions and doctypes
            // carry nothing the Classic API puts data in.
            _ => {}
        }
    }

    if let Some(frame) = stack.pop() {
        return Err(XmlError::Unclosed(frame.name));
    }

    let (name, value) = root.ok_or(XmlError::MissingRoot)?;
    let mut document = Map::new();
    document.insert(name, value);
    Ok(Value::Object(document))
}

/// Encodes a `{root_name: value}` object as an XML document (no declaration).
///
/// This is the inverse of [`from_xml`]: for any `doc` produced by
/// `from_xml`, `from_xml(&to_xml(&doc)?)` yields `doc` again.
pub fn to_xml(document: &Value) -> Result<String, XmlError> {
    let Value::Object(fields) = document else {
        return Err(XmlError::InvalidDocument(kind_of(document)));
    };
    let mut entries = fields.iter();
    let (Some((name, value)), None) = (entries.next(), entries.next()) else {
        return Err(XmlError::InvalidDocument("an object without exactly one key"));
    };
    if matches!(value, Value::Array(_)) {
        return Err(XmlError::InvalidDocument("an array root"));
    }

    let mut out = String::new();
    write_element(&mut out, name, value)?;
    Ok(out)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn check_name(name: &str) -> Result<(), XmlError> {
    let valid = name
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'));
    if valid {
        Ok(())
    } else {
        Err(XmlError::InvalidName(name.to_string()))
    }
}

/// Text form of a scalar; `None` for containers.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn write_element(out: &mut String, name: &str, value: &Value) -> Result<(), XmlError> {
    check_name(name)?;
    match value {
        Value::Array(items) => {
            for item in items {
                write_element(out, name, item)?;
            }
        }
        Value::Object(fields) => {
            out.push('<');
            out.push_str(name);

            let mut text = String::new();
            let mut children = Vec::new();
            for (key, field) in fields {
                if let Some(attr) = key.strip_prefix(ATTRIBUTE_PREFIX) {
                    check_name(attr)?;
                    let attr_value = scalar_text(field).unwrap_or_else(|| field.to_string());
                    out.push(' ');
                    out.push_str(attr);
                    out.push_str("=\"");
                    out.push_str(&quick_xml::escape::escape(attr_value.as_str()));
                    out.push('"');
                } else if key == TEXT_KEY {
                    text = scalar_text(field).unwrap_or_else(|| field.to_string());
                } else {
                    children.push((key, field));
                }
            }

            if text.is_empty() && children.is_empty() {
                out.push_str("/>");
                return Ok(());
            }
            out.push('>');
            out.push_str(&quick_xml::escape::escape(text.as_str()));
            for (key, field) in children {
                write_element(out, key, field)?;
            }
            close_tag(out, name);
        }
        scalar => {
            let text = scalar_text(scalar).unwrap_or_default();
            if text.is_empty() {
                out.push('<');
                out.push_str(name);
                out.push_str("/>");
            } else {
                out.push('<');
                out.push_str(name);
                out.push('>');
                out.push_str(&quick_xml::escape::escape(text.as_str()));
                close_tag(out, name);
            }
        }
    }
    Ok(())
}

fn close_tag(out: &mut String, name: &str) {
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

/// Normalizes a decoded collection into a list.
///
/// `None`/`null` → empty, an array → its items, anything else → one item.
pub fn as_list(value: Option<Value>) -> Vec<Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items,
        Some(single) => vec![single],
    }
}
