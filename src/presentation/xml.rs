/*!
 * Owned XML element tree for package parts.
 *
 * Slide parts are parsed into an editable tree, text is replaced in place,
 * and the tree is written back with the original declaration, element order
 * and attribute order preserved.
 */

use quick_xml::escape::{escape, partial_escape};
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::{Reader, Writer};
use std::borrow::Cow;

use crate::errors::DocumentError;

/// A node of the tree
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
    CData(String),
    Comment(String),
}

/// An element with its qualified name, attributes and children
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    /// Qualified name as written, e.g. `a:t`
    pub name: String,
    /// Attributes in document order, values unescaped
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Name without the namespace prefix
    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    /// Namespace prefix, if any
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }

    /// Whether the element has the given local name
    pub fn is(&self, local_name: &str) -> bool {
        self.local_name() == local_name
    }

    /// Build a sibling-namespace name, e.g. `a` + `r` -> `a:r`
    pub fn qualified(prefix: Option<&str>, local_name: &str) -> String {
        match prefix {
            Some(prefix) => format!("{}:{}", prefix, local_name),
            None => local_name.to_string(),
        }
    }

    /// Attribute by exact qualified name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Prefixed attribute by local name, e.g. `r:id` for `id`
    pub fn prefixed_attribute(&self, local_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.contains(':') && local_part(key) == local_name)
            .map(|(_, value)| value.as_str())
    }

    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }

    /// Child elements
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Mutable child elements
    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut XmlElement> {
        self.children.iter_mut().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            _ => None,
        })
    }

    /// First child element with the local name
    pub fn child(&self, local_name: &str) -> Option<&XmlElement> {
        self.elements().find(|element| element.is(local_name))
    }

    pub fn child_mut(&mut self, local_name: &str) -> Option<&mut XmlElement> {
        self.elements_mut().find(|element| element.is(local_name))
    }

    /// Follow a path of local names from this element
    pub fn find_path(&self, path: &[&str]) -> Option<&XmlElement> {
        path.iter().try_fold(self, |element, name| element.child(name))
    }

    pub fn find_path_mut(&mut self, path: &[&str]) -> Option<&mut XmlElement> {
        let mut current = self;
        for name in path {
            current = current.child_mut(name)?;
        }
        Some(current)
    }

    /// All descendants with the local name, not descending into matches
    pub fn descendants(&self, local_name: &str) -> Vec<&XmlElement> {
        let mut found = Vec::new();
        collect_descendants(self, local_name, &mut found);
        found
    }

    pub fn descendants_mut(&mut self, local_name: &str) -> Vec<&mut XmlElement> {
        let mut found = Vec::new();
        collect_descendants_mut(self, local_name, &mut found);
        found
    }

    /// Concatenated character data of this element and its descendants
    pub fn text(&self) -> String {
        let mut text = String::new();
        append_text(self, &mut text);
        text
    }

    /// Replace all children with a single text node
    pub fn set_text(&mut self, text: &str) {
        self.children.clear();
        if !text.is_empty() {
            self.children.push(XmlNode::Text(text.to_string()));
        }
    }

    /// Index of the first child element with the local name
    pub fn position_of(&self, local_name: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|node| matches!(node, XmlNode::Element(element) if element.is(local_name)))
    }
}

fn local_part(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

fn collect_descendants<'a>(element: &'a XmlElement, local_name: &str, found: &mut Vec<&'a XmlElement>) {
    for child in element.elements() {
        if child.is(local_name) {
            found.push(child);
        } else {
            collect_descendants(child, local_name, found);
        }
    }
}

fn collect_descendants_mut<'a>(element: &'a mut XmlElement, local_name: &str, found: &mut Vec<&'a mut XmlElement>) {
    for child in element.elements_mut() {
        if child.is(local_name) {
            found.push(child);
        } else {
            collect_descendants_mut(child, local_name, found);
        }
    }
}

fn append_text(element: &XmlElement, text: &mut String) {
    for node in &element.children {
        match node {
            XmlNode::Element(child) => append_text(child, text),
            XmlNode::Text(value) | XmlNode::CData(value) => text.push_str(value),
            XmlNode::Comment(_) => {}
        }
    }
}

/// A parsed XML part
#[derive(Debug, Clone)]
pub struct XmlDocument {
    declaration: Option<BytesDecl<'static>>,
    pub root: XmlElement,
}

impl XmlDocument {
    pub fn new(root: XmlElement) -> Self {
        Self {
            declaration: Some(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))),
            root,
        }
    }

    /// Parse a part; `part_name` only appears in error messages
    pub fn parse(bytes: &[u8], part_name: &str) -> Result<Self, DocumentError> {
        let malformed = |message: String| DocumentError::Malformed(format!("{}: {}", part_name, message));

        let mut reader = Reader::from_reader(bytes);
        reader.config_mut().trim_text(false);

        let mut declaration = None;
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root = None;
        let mut buf = Vec::new();

        loop {
            let event = reader
                .read_event_into(&mut buf)
                .map_err(|e| malformed(format!("at byte {}: {}", reader.buffer_position(), e)))?;

            match event {
                Event::Decl(decl) => declaration = Some(decl.into_owned()),
                Event::Start(start) => stack.push(element_from_start(&start).map_err(malformed)?),
                Event::Empty(start) => {
                    let element = element_from_start(&start).map_err(malformed)?;
                    attach(&mut stack, &mut root, element).map_err(malformed)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| malformed("unexpected closing tag".to_string()))?;
                    attach(&mut stack, &mut root, element).map_err(malformed)?;
                }
                Event::Text(text) => {
                    if let Some(parent) = stack.last_mut() {
                        let value = text.unescape().map_err(|e| malformed(e.to_string()))?;
                        parent.children.push(XmlNode::Text(value.into_owned()));
                    }
                }
                Event::CData(data) => {
                    if let Some(parent) = stack.last_mut() {
                        let value = String::from_utf8_lossy(&data.into_inner()).into_owned();
                        parent.children.push(XmlNode::CData(value));
                    }
                }
                Event::Comment(comment) => {
                    if let Some(parent) = stack.last_mut() {
                        let value = String::from_utf8_lossy(&comment.into_inner()).into_owned();
                        parent.children.push(XmlNode::Comment(value));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(malformed("unexpected end of document".to_string()));
        }
        let root = root.ok_or_else(|| malformed("document has no root element".to_string()))?;

        Ok(Self { declaration, root })
    }

    /// Serialize back to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, DocumentError> {
        let mut writer = Writer::new(Vec::new());
        if let Some(declaration) = &self.declaration {
            writer
                .write_event(Event::Decl(declaration.clone()))
                .map_err(write_failed)?;
            writer.get_mut().extend_from_slice(b"\r\n");
        }
        write_element(&mut writer, &self.root)?;
        Ok(writer.into_inner())
    }
}

fn write_failed<E: std::fmt::Display>(error: E) -> DocumentError {
    DocumentError::Malformed(format!("cannot serialize part: {}", error))
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement, String> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut element = XmlElement::new(name);
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| e.to_string())?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value().map_err(|e| e.to_string())?;
        element.attributes.push((key, value.into_owned()));
    }
    Ok(element)
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) -> Result<(), String> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(XmlNode::Element(element));
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err("more than one root element".to_string()),
    }
}

/// Escape an attribute value so readers do not normalize its whitespace to spaces
fn escape_attribute(value: &str) -> String {
    escape(value)
        .replace('\n', "&#xA;")
        .replace('\r', "&#xD;")
        .replace('\t', "&#9;")
}

/// Escape character data; a raw carriage return would be folded into a line feed on read
fn escape_text(text: &str) -> String {
    partial_escape(text).replace('\r', "&#xD;")
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> Result<(), DocumentError> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute(Attribute {
            key: QName(key.as_bytes()),
            value: Cow::Owned(escape_attribute(value).into_bytes()),
        });
    }

    if element.children.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(write_failed);
    }

    writer.write_event(Event::Start(start)).map_err(write_failed)?;
    for child in &element.children {
        match child {
            XmlNode::Element(child) => write_element(writer, child)?,
            XmlNode::Text(text) => writer
                .write_event(Event::Text(BytesText::from_escaped(escape_text(text))))
                .map_err(write_failed)?,
            XmlNode::CData(data) => writer
                .write_event(Event::CData(BytesCData::new(data.as_str())))
                .map_err(write_failed)?,
            XmlNode::Comment(comment) => writer
                .write_event(Event::Comment(BytesText::from_escaped(comment.as_str())))
                .map_err(write_failed)?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(write_failed)
}
