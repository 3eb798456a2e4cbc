//! Mutable XML tree for Android `values*/` resource documents.
//!
//! The tree keeps everything needed to write a document back the way it was
//! read: the declaration, comments, self-closing tags and, most importantly,
//! the whitespace between siblings. Whitespace is stored the element/tail
//! way: an element's `text` is what precedes its first child, and every
//! child [`Node`] owns the `tail` that follows it up to the next sibling.
//! Moving a node therefore moves its trailing whitespace with it.

use quick_xml::{
    Reader, Writer,
    escape::{minimal_escape, partial_escape},
    events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event},
};
use std::{
    borrow::Cow,
    io::{BufRead, Write},
};

use crate::{error::Error, traits::Parser};

/// Tag of an array declaration.
pub const STRING_ARRAY: &str = "string-array";
/// Tag of one array item.
pub const ITEM: &str = "item";
/// Tag of a flattened entry.
pub const STRING: &str = "string";
/// Attribute identifying arrays and entries.
pub const NAME: &str = "name";

/// The `<?xml ...?>` header, kept as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub version: String,
    pub encoding: Option<String>,
    pub standalone: Option<String>,
}

impl Default for Declaration {
    fn default() -> Self {
        Declaration {
            version: "1.0".to_string(),
            encoding: Some("utf-8".to_string()),
            standalone: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Element(Element),
    Comment(String),
    CData(String),
    Instruction(String),
    DocType(String),
}

/// A child node together with the text that follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub tail: String,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Node {
            kind,
            tail: String::new(),
        }
    }

    pub fn element(element: Element) -> Self {
        Node::new(NodeKind::Element(element))
    }

    pub fn as_element(&self) -> Option<&Element> {
        match &self.kind {
            NodeKind::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match &mut self.kind {
            NodeKind::Element(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Qualified tag name, prefix included (`xliff:g`).
    pub name: String,
    /// Attributes in document order, values unescaped.
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<Node>,
    self_closing: bool,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            attributes: Vec::new(),
            text: String::new(),
            children: Vec::new(),
            self_closing: false,
        }
    }

    /// A `<string name="...">` element with no content yet.
    pub fn string_entry(name: impl Into<String>) -> Self {
        let mut element = Element::new(STRING);
        element.set_attribute(NAME, name);
        element
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attribute(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((key.to_string(), value)),
        }
    }

    /// Value of the `name` attribute.
    pub fn resource_name(&self) -> Option<&str> {
        self.attribute(NAME)
    }

    fn is_named(&self, tag: &str, name: &str) -> bool {
        self.name == tag && self.resource_name() == Some(name)
    }

    /// Child elements, skipping comments and other non-element nodes.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(Node::as_element_mut)
    }

    /// Child elements with the given tag.
    pub fn elements_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |e| e.name == tag)
    }

    /// First child `<tag name="name">`.
    pub fn find(&self, tag: &str, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.is_named(tag, name))
    }

    pub fn find_mut(&mut self, tag: &str, name: &str) -> Option<&mut Element> {
        self.elements_mut().find(|e| e.is_named(tag, name))
    }

    /// Removes every child element matching `predicate` and returns the
    /// removed nodes in document order, tails included.
    pub fn detach<F>(&mut self, mut predicate: F) -> Vec<Node>
    where
        F: FnMut(&Element) -> bool,
    {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.children.len());
        for node in self.children.drain(..) {
            match node.as_element() {
                Some(e) if predicate(e) => removed.push(node),
                _ => kept.push(node),
            }
        }
        self.children = kept;
        removed
    }

    /// Concatenated text of this element and all its descendants.
    pub fn text_content(&self) -> String {
        let mut out = self.text.clone();
        for child in &self.children {
            match &child.kind {
                NodeKind::Element(e) => out.push_str(&e.text_content()),
                NodeKind::CData(c) => out.push_str(c),
                _ => {}
            }
            out.push_str(&child.tail);
        }
        out
    }

    /// Copies the inner content (text and inline markup) of `other`.
    pub fn copy_content_from(&mut self, other: &Element) {
        self.text = other.text.clone();
        self.children = other.children.clone();
    }

    /// Replaces the whole inner content with plain text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.children.clear();
    }

    fn is_empty(&self) -> bool {
        self.text.is_empty() && self.children.is_empty()
    }
}

/// A whole resource document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Language suffix of the `values-<lang>` directory the document came
    /// from; empty for the base language. Not part of the XML.
    pub language: String,
    pub declaration: Option<Declaration>,
    /// Text between the declaration and the first prolog node (or root).
    pub head: String,
    /// Comments and instructions before the root element.
    pub prolog: Vec<Node>,
    pub root: Element,
    pub root_tail: String,
    pub epilog: Vec<Node>,
}

impl Document {
    /// An empty `<resources>` document with the usual Android header.
    pub fn new() -> Self {
        Document {
            language: String::new(),
            declaration: Some(Declaration::default()),
            head: "\n".to_string(),
            prolog: Vec::new(),
            root: Element::new("resources"),
            root_tail: "\n".to_string(),
            epilog: Vec::new(),
        }
    }

    /// Language for diagnostics, `base` for the unqualified variant.
    pub fn language_label(&self) -> &str {
        if self.language.is_empty() {
            "base"
        } else {
            &self.language
        }
    }

    /// Root-level `<string-array>` declarations in document order.
    pub fn string_arrays(&self) -> impl Iterator<Item = &Element> {
        self.root.elements_named(STRING_ARRAY)
    }

    pub fn string_array(&self, name: &str) -> Option<&Element> {
        self.root.find(STRING_ARRAY, name)
    }

    pub fn string_array_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.root.find_mut(STRING_ARRAY, name)
    }

    /// Root-level `<string>` entry with the given name.
    pub fn string_entry(&self, name: &str) -> Option<&Element> {
        self.root.find(STRING, name)
    }

    pub fn has_string_entry(&self, name: &str) -> bool {
        self.string_entry(name).is_some()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Where parsed content currently lands.
struct TreeBuilder {
    declaration: Option<Declaration>,
    head: String,
    prolog: Vec<Node>,
    stack: Vec<Element>,
    root: Option<Element>,
    root_tail: String,
    epilog: Vec<Node>,
}

impl TreeBuilder {
    fn new() -> Self {
        TreeBuilder {
            declaration: None,
            head: String::new(),
            prolog: Vec::new(),
            stack: Vec::new(),
            root: None,
            root_tail: String::new(),
            epilog: Vec::new(),
        }
    }

    fn push_text(&mut self, text: &str) {
        let target = if let Some(open) = self.stack.last_mut() {
            match open.children.last_mut() {
                Some(last) => &mut last.tail,
                None => &mut open.text,
            }
        } else if self.root.is_some() {
            match self.epilog.last_mut() {
                Some(last) => &mut last.tail,
                None => &mut self.root_tail,
            }
        } else {
            match self.prolog.last_mut() {
                Some(last) => &mut last.tail,
                None => &mut self.head,
            }
        };
        target.push_str(text);
    }

    fn push_node(&mut self, kind: NodeKind) -> Result<(), Error> {
        if let Some(open) = self.stack.last_mut() {
            open.children.push(Node::new(kind));
            return Ok(());
        }
        match kind {
            NodeKind::Element(element) => self.close_root(element)?,
            other if self.root.is_some() => self.epilog.push(Node::new(other)),
            other => self.prolog.push(Node::new(other)),
        }
        Ok(())
    }

    fn close_root(&mut self, element: Element) -> Result<(), Error> {
        if self.root.is_some() {
            return Err(Error::malformed(format!(
                "second root element <{}>",
                element.name
            )));
        }
        self.root = Some(element);
        Ok(())
    }

    fn finish(self) -> Result<Document, Error> {
        if let Some(open) = self.stack.last() {
            return Err(Error::malformed(format!("unclosed element <{}>", open.name)));
        }
        let root = self
            .root
            .ok_or_else(|| Error::malformed("document has no root element"))?;
        Ok(Document {
            language: String::new(), // set by whoever knows the directory
            declaration: self.declaration,
            head: self.head,
            prolog: self.prolog,
            root,
            root_tail: self.root_tail,
            epilog: self.epilog,
        })
    }
}

fn element_from_start(e: &BytesStart) -> Result<Element, Error> {
    let mut element = Element::new(String::from_utf8_lossy(e.name().as_ref()).into_owned());
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn optional<E: Into<Error>>(value: Option<Result<Cow<'_, [u8]>, E>>) -> Result<Option<String>, Error> {
    Ok(value.transpose().map_err(Into::into)?.map(|b| lossy(&b)))
}

impl Parser for Document {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        let mut builder = TreeBuilder::new();

        loop {
            match xml_reader.read_event_into(&mut buf)? {
                Event::Decl(ref e) => {
                    builder.declaration = Some(Declaration {
                        version: lossy(&e.version()?),
                        encoding: optional(e.encoding())?,
                        standalone: optional(e.standalone())?,
                    });
                }
                Event::Start(ref e) => builder.stack.push(element_from_start(e)?),
                Event::Empty(ref e) => {
                    let mut element = element_from_start(e)?;
                    element.self_closing = true;
                    builder.push_node(NodeKind::Element(element))?;
                }
                Event::End(ref e) => {
                    let element = builder.stack.pop().ok_or_else(|| {
                        Error::malformed(format!(
                            "unexpected closing tag </{}>",
                            lossy(e.name().as_ref())
                        ))
                    })?;
                    builder.push_node(NodeKind::Element(element))?;
                }
                Event::Text(ref e) => {
                    let text = e.unescape()?;
                    builder.push_text(&text);
                }
                Event::CData(ref e) => builder.push_node(NodeKind::CData(lossy(e)))?,
                Event::Comment(ref e) => builder.push_node(NodeKind::Comment(lossy(e)))?,
                Event::PI(ref e) => builder.push_node(NodeKind::Instruction(lossy(e)))?,
                Event::DocType(ref e) => builder.push_node(NodeKind::DocType(lossy(e)))?,
                Event::Eof => break,
            }
            buf.clear();
        }
        builder.finish()
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml_writer = Writer::new(&mut writer);

        if let Some(decl) = &self.declaration {
            xml_writer.write_event(Event::Decl(BytesDecl::new(
                &decl.version,
                decl.encoding.as_deref(),
                decl.standalone.as_deref(),
            )))?;
        }
        write_text(&mut xml_writer, &self.head)?;
        for node in &self.prolog {
            write_node(&mut xml_writer, node)?;
        }
        write_element(&mut xml_writer, &self.root)?;
        write_text(&mut xml_writer, &self.root_tail)?;
        for node in &self.epilog {
            write_node(&mut xml_writer, node)?;
        }
        Ok(())
    }
}

fn write_text<W: Write>(writer: &mut Writer<W>, text: &str) -> Result<(), Error> {
    if !text.is_empty() {
        writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))?;
    }
    Ok(())
}

fn write_node<W: Write>(writer: &mut Writer<W>, node: &Node) -> Result<(), Error> {
    match &node.kind {
        NodeKind::Element(e) => write_element(writer, e)?,
        NodeKind::Comment(c) => {
            writer.write_event(Event::Comment(BytesText::from_escaped(c.as_str())))?
        }
        NodeKind::CData(c) => writer.write_event(Event::CData(BytesCData::new(c.as_str())))?,
        NodeKind::Instruction(p) => writer.write_event(Event::PI(BytesPI::new(p.as_str())))?,
        NodeKind::DocType(d) => {
            writer.write_event(Event::DocType(BytesText::from_escaped(d.as_str())))?
        }
    }
    write_text(writer, &node.tail)
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &Element) -> Result<(), Error> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        // `"` must not leak into a double-quoted value; `'` is left alone.
        let escaped = minimal_escape(value).replace('"', "&quot;");
        start.push_attribute((key.as_bytes(), escaped.as_bytes()));
    }

    if element.self_closing && element.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    write_text(writer, &element.text)?;
    for child in &element.children {
        write_node(writer, child)?;
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}
