/*!
 * Shapes on a slide and the text they carry.
 *
 * Auto shapes (`p:sp`: text boxes, placeholders, drawn shapes) expose their
 * text body as one string, paragraphs joined with `\n`. Graphic frames that
 * hold a table expose a text frame of paragraphs, one per table cell
 * paragraph. Pictures, groups, connectors and content parts carry no text.
 */

use crate::errors::DocumentError;
use crate::presentation::xml::{XmlElement, XmlNode};

/// Line break inside a paragraph, as read from `a:br`
pub const LINE_BREAK: char = '\u{000B}';

/// Element names of the shape tree that count as shapes
const SHAPE_ELEMENTS: [&str; 6] = ["sp", "pic", "graphicFrame", "grpSp", "cxnSp", "contentPart"];

/// Kind of a shape element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    AutoShape,
    Picture,
    GraphicFrame,
    Group,
    Connector,
    ContentPart,
}

impl ShapeKind {
    /// Kind for a shape tree child, `None` for non-shape children
    pub fn from_element(element: &XmlElement) -> Option<Self> {
        match element.local_name() {
            "sp" => Some(Self::AutoShape),
            "pic" => Some(Self::Picture),
            "graphicFrame" => Some(Self::GraphicFrame),
            "grpSp" => Some(Self::Group),
            "cxnSp" => Some(Self::Connector),
            "contentPart" => Some(Self::ContentPart),
            _ => None,
        }
    }
}

pub(crate) fn is_shape_element(element: &XmlElement) -> bool {
    SHAPE_ELEMENTS.contains(&element.local_name())
}

/// Read-only view of a shape
#[derive(Debug, Clone, Copy)]
pub struct Shape<'a> {
    element: &'a XmlElement,
}

impl<'a> Shape<'a> {
    pub(crate) fn new(element: &'a XmlElement) -> Self {
        Self { element }
    }

    pub fn kind(&self) -> ShapeKind {
        ShapeKind::from_element(self.element).unwrap_or(ShapeKind::AutoShape)
    }

    /// Name from the non-visual properties, e.g. `Title 1`
    pub fn name(&self) -> Option<&'a str> {
        self.element
            .elements()
            .find(|child| child.local_name().starts_with("nv"))
            .and_then(|nv| nv.child("cNvPr"))
            .and_then(|props| props.attribute("name"))
    }

    /// Direct text of an auto shape; `None` for shapes without a text attribute
    pub fn text(&self) -> Option<String> {
        if self.kind() != ShapeKind::AutoShape {
            return None;
        }
        Some(
            self.element
                .child("txBody")
                .map(body_text)
                .unwrap_or_default(),
        )
    }

    /// Whether the shape exposes a text frame of paragraphs (tables)
    pub fn has_text_frame(&self) -> bool {
        self.kind() == ShapeKind::GraphicFrame && !self.element.descendants("txBody").is_empty()
    }

    /// Paragraph texts of the text frame, empty when there is none
    pub fn paragraph_texts(&self) -> Vec<String> {
        if !self.has_text_frame() {
            return Vec::new();
        }
        self.element
            .descendants("txBody")
            .into_iter()
            .flat_map(|body| body.elements().filter(|e| e.is("p")))
            .map(paragraph_text)
            .collect()
    }
}

/// Mutable handle on a shape
#[derive(Debug)]
pub struct ShapeMut<'a> {
    element: &'a mut XmlElement,
}

impl<'a> ShapeMut<'a> {
    pub(crate) fn new(element: &'a mut XmlElement) -> Self {
        Self { element }
    }

    pub fn view(&self) -> Shape<'_> {
        Shape::new(self.element)
    }

    /// Replace the direct text of an auto shape
    ///
    /// Line `i` of `text` goes into paragraph `i`, keeping its paragraph and
    /// first-run properties. Extra lines copy the last paragraph; surplus
    /// paragraphs are removed.
    pub fn set_text(&mut self, text: &str) -> Result<(), DocumentError> {
        if self.view().kind() != ShapeKind::AutoShape {
            return Err(DocumentError::Edit(format!(
                "shape {:?} has no text attribute",
                self.view().name().unwrap_or("<unnamed>")
            )));
        }

        if self.element.child("txBody").is_none() {
            let body = new_text_body(self.element.prefix());
            self.element.children.push(XmlNode::Element(body));
        }
        let body = self
            .element
            .child_mut("txBody")
            .ok_or_else(|| DocumentError::Edit("text body missing".to_string()))?;
        set_body_text(body, text);
        Ok(())
    }

    /// Paragraphs of the text frame (tables), in document order
    pub fn paragraphs_mut(&mut self) -> Vec<ParagraphMut<'_>> {
        if !self.view().has_text_frame() {
            return Vec::new();
        }
        self.element
            .descendants_mut("txBody")
            .into_iter()
            .flat_map(|body| body.elements_mut().filter(|e| e.is("p")))
            .map(|element| ParagraphMut { element })
            .collect()
    }
}

/// Mutable handle on one `a:p` paragraph
#[derive(Debug)]
pub struct ParagraphMut<'a> {
    element: &'a mut XmlElement,
}

impl ParagraphMut<'_> {
    pub fn text(&self) -> String {
        paragraph_text(self.element)
    }

    pub fn set_text(&mut self, text: &str) {
        set_paragraph_text(self.element, text);
    }
}

fn body_text(body: &XmlElement) -> String {
    body.elements()
        .filter(|e| e.is("p"))
        .map(paragraph_text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Text of a paragraph: runs and fields, `a:br` as a vertical tab
pub fn paragraph_text(paragraph: &XmlElement) -> String {
    let mut text = String::new();
    for child in paragraph.elements() {
        match child.local_name() {
            "r" | "fld" => {
                if let Some(t) = child.child("t") {
                    text.push_str(&t.text());
                }
            }
            "br" => text.push(LINE_BREAK),
            _ => {}
        }
    }
    text
}

/// Replace the runs of a paragraph with `text`
///
/// The first run's (or field's) `a:rPr` is reused for every new run and
/// break; `a:pPr` and `a:endParaRPr` stay where they are.
pub fn set_paragraph_text(paragraph: &mut XmlElement, text: &str) {
    let prefix = paragraph.prefix().map(str::to_string);
    let prefix = prefix.as_deref();

    let run_properties = paragraph
        .elements()
        .find(|e| e.is("r") || e.is("fld"))
        .and_then(|run| run.child("rPr"))
        .cloned();

    paragraph
        .children
        .retain(|node| !matches!(node, XmlNode::Element(e) if e.is("r") || e.is("br") || e.is("fld")));

    let mut content = Vec::new();
    for (index, segment) in text.split([LINE_BREAK, '\n']).enumerate() {
        if index > 0 {
            let mut line_break = XmlElement::new(XmlElement::qualified(prefix, "br"));
            if let Some(props) = &run_properties {
                line_break.children.push(XmlNode::Element(props.clone()));
            }
            content.push(XmlNode::Element(line_break));
        }
        if segment.is_empty() {
            continue;
        }
        let mut run = XmlElement::new(XmlElement::qualified(prefix, "r"));
        if let Some(props) = &run_properties {
            run.children.push(XmlNode::Element(props.clone()));
        }
        run.children.push(XmlNode::Element(
            XmlElement::new(XmlElement::qualified(prefix, "t")).with_text(segment),
        ));
        content.push(XmlNode::Element(run));
    }

    let insert_at = paragraph
        .position_of("endParaRPr")
        .unwrap_or(paragraph.children.len());
    paragraph.children.splice(insert_at..insert_at, content);
}

fn set_body_text(body: &mut XmlElement, text: &str) {
    let mut paragraphs = Vec::new();
    let mut others = Vec::new();
    let mut insert_at = None;

    for node in body.children.drain(..) {
        match node {
            XmlNode::Element(element) if element.is("p") => {
                insert_at.get_or_insert(others.len());
                paragraphs.push(element);
            }
            other => others.push(other),
        }
    }

    let template = paragraphs
        .last()
        .cloned()
        .unwrap_or_else(|| XmlElement::new(XmlElement::qualified(Some("a"), "p")));

    let mut existing = paragraphs.into_iter();
    let updated: Vec<XmlNode> = text
        .split('\n')
        .map(|line| {
            let mut paragraph = existing.next().unwrap_or_else(|| template.clone());
            set_paragraph_text(&mut paragraph, line);
            XmlNode::Element(paragraph)
        })
        .collect();

    let insert_at = insert_at.unwrap_or(others.len());
    others.splice(insert_at..insert_at, updated);
    body.children = others;
}

fn new_text_body(shape_prefix: Option<&str>) -> XmlElement {
    XmlElement::new(XmlElement::qualified(shape_prefix, "txBody"))
        .with_child(XmlElement::new("a:bodyPr"))
        .with_child(XmlElement::new("a:lstStyle"))
        .with_child(XmlElement::new("a:p"))
}
