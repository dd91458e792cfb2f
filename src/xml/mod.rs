//! Minimal XML tree decoder
//!
//! Report dialects are easier to walk as a tree than as an event stream, so
//! the whole document is decoded once into `XmlElement` nodes.

mod error;

#[cfg(test)]
mod tests;

pub use error::XmlError;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// One decoded XML element with its attributes, text and children
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    /// Concatenated text and CDATA content, trimmed at the edges
    pub text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Value of the attribute `key`, if present
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Value of the attribute `key`, or an empty string
    pub fn attr_or_empty(&self, key: &str) -> &str {
        self.attr(key).unwrap_or_default()
    }

    /// Direct children with the given tag name
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == tag)
    }

    /// First direct child with the given tag name
    pub fn child(&self, tag: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == tag)
    }

    /// Depth-first iterator over this element and all its descendants
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    fn from_start(start: &BytesStart) -> Result<Self, XmlError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();

        for attr in start.attributes() {
            let attr = attr.map_err(|e| XmlError::Malformed(e.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| XmlError::Malformed(e.to_string()))?
                .into_owned();
            attributes.push((key, value));
        }

        Ok(Self {
            name,
            attributes,
            ..Self::default()
        })
    }
}

pub struct Descendants<'a> {
    stack: Vec<&'a XmlElement>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlElement;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}

/// Decode a whole document into its root element
pub fn parse_document(bytes: &[u8]) -> Result<XmlElement, XmlError> {
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|e| {
            XmlError::Malformed(format!("at position {}: {}", reader.buffer_position(), e))
        })?;

        match event {
            Event::Eof => break,
            Event::Start(e) => stack.push(XmlElement::from_start(&e)?),
            Event::Empty(e) => {
                let element = XmlElement::from_start(&e)?;
                attach(element, &mut stack, &mut root)?;
            }
            Event::End(_) => {
                let element = stack.pop().ok_or(XmlError::UnexpectedEnd)?;
                attach(element, &mut stack, &mut root)?;
            }
            Event::Text(e) => {
                if let Some(current) = stack.last_mut() {
                    let text = e.unescape().map_err(|e| XmlError::Malformed(e.to_string()))?;
                    current.text.push_str(&text);
                }
            }
            Event::CData(e) => {
                if let Some(current) = stack.last_mut() {
                    current
                        .text
                        .push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            _ => (),
        }
        buf.clear();
    }

    if let Some(open) = stack.pop() {
        return Err(XmlError::Unclosed(open.name));
    }

    root.ok_or(XmlError::Empty)
}

fn attach(
    element: XmlElement,
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
) -> Result<(), XmlError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(XmlError::MultipleRoots(element.name)),
    }
    Ok(())
}
