//! Record-oriented access to simple XML documents.
//!
//! The documents handled here (front-end game lists, platform mappings,
//! scraper metadata) all have the same shape: one root, repeated item
//! elements, and leaf child fields. Items are addressed by a tag, an
//! optional parent tag, and exact-match criteria on child fields; the first
//! match in document order wins.
//!
//! Edits splice the original source text instead of re-serializing, so
//! formatting and unknown content around the touched item are preserved.

use std::ops::Range;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::LibError;

/// Ordered child fields of one item element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field insertion.
    pub fn with(mut self, tag: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(tag, value);
        self
    }

    /// Set a field, replacing an existing one with the same tag.
    pub fn set(&mut self, tag: impl Into<String>, value: impl Into<String>) {
        let tag = tag.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(t, _)| *t == tag) {
            Some(field) => field.1 = value,
            None => self.fields.push((tag, value)),
        }
    }

    pub fn get(&self, tag: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(t, _)| t == tag)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(t, v)| (t.as_str(), v.as_str()))
    }

    /// True when every criterion field is present with exactly that value.
    pub fn matches(&self, criteria: &[(&str, &str)]) -> bool {
        criteria
            .iter()
            .all(|(tag, expected)| self.get(tag) == Some(*expected))
    }
}

/// Parsed element with the byte range it occupies in the source.
#[derive(Debug, Clone)]
struct Element {
    name: String,
    text: String,
    children: Vec<Element>,
    span: Range<usize>,
}

impl Element {
    fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    fn record(&self) -> Record {
        let mut record = Record::new();
        for child in &self.children {
            record.set(child.name.clone(), child.text.clone());
        }
        record
    }

    fn matches(&self, criteria: &[(&str, &str)]) -> bool {
        criteria
            .iter()
            .all(|(tag, expected)| self.child(tag).is_some_and(|c| c.text == *expected))
    }

    /// Descendants named `name`, in document order.
    fn descendants<'a>(&'a self, name: &str, out: &mut Vec<&'a Element>) {
        for child in &self.children {
            if child.name == name {
                out.push(child);
            }
            child.descendants(name, out);
        }
    }
}

/// A loaded document: the source text and its element tree.
struct Document {
    source: String,
    root: Element,
}

impl Document {
    fn load(path: &Path) -> Result<Self, LibError> {
        let source = std::fs::read_to_string(path)?;
        let root = parse(&source).map_err(|err| match err {
            ParseFailure::Xml(e) => LibError::XmlParse(e),
            ParseFailure::Structure(message) => LibError::invalid_document(path, message),
        })?;
        Ok(Self { source, root })
    }

    /// Item elements selected by `tag` and an optional `parent_tag`.
    ///
    /// Without a parent every `tag` element counts. With one, each element
    /// named `parent_tag` contributes its first direct `tag` child, and the
    /// root itself counts when it carries the parent name.
    fn select(&self, parent_tag: Option<&str>, tag: &str) -> Vec<&Element> {
        let mut nodes = Vec::new();
        match parent_tag {
            None => {
                if self.root.name == tag {
                    nodes.push(&self.root);
                }
                self.root.descendants(tag, &mut nodes);
            }
            Some(parent) => {
                let mut parents = Vec::new();
                if self.root.name == parent {
                    parents.push(&self.root);
                }
                self.root.descendants(parent, &mut parents);
                if self.root.name == parent {
                    // The root's own items are its children, not only the first one
                    nodes.extend(self.root.children.iter().filter(|c| c.name == tag));
                    parents.remove(0);
                }
                nodes.extend(parents.into_iter().filter_map(|p| p.child(tag)));
            }
        }
        nodes
    }

    fn find(
        &self,
        parent_tag: Option<&str>,
        tag: &str,
        criteria: &[(&str, &str)],
    ) -> Option<&Element> {
        self.select(parent_tag, tag)
            .into_iter()
            .find(|node| node.matches(criteria))
    }
}

enum ParseFailure {
    Xml(quick_xml::Error),
    Structure(String),
}

impl From<quick_xml::Error> for ParseFailure {
    fn from(err: quick_xml::Error) -> Self {
        Self::Xml(err)
    }
}

fn parse(source: &str) -> Result<Element, ParseFailure> {
    let mut reader = Reader::from_str(source);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let start = reader.buffer_position() as usize;
        let event = reader.read_event()?;
        let end = reader.buffer_position() as usize;
        match event {
            Event::Start(e) => stack.push(Element {
                name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                text: String::new(),
                children: Vec::new(),
                span: start..end,
            }),
            Event::Empty(e) => {
                let element = Element {
                    name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                    text: String::new(),
                    children: Vec::new(),
                    span: start..end,
                };
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(e) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&e.unescape()?);
                }
            }
            Event::CData(e) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::End(_) => {
                let mut element = stack
                    .pop()
                    .ok_or_else(|| ParseFailure::Structure("unexpected closing tag".into()))?;
                element.span.end = end;
                element.text = element.text.trim().to_string();
                attach(&mut stack, &mut root, element)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(ParseFailure::Structure("unclosed element".into()));
    }
    root.ok_or_else(|| ParseFailure::Structure("document has no root element".into()))
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), ParseFailure> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(element);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(ParseFailure::Structure("more than one root element".into())),
    }
}

/// Text of `tag` for every selected item (see the module docs for the
/// selection rule).
pub fn list_values(
    path: &Path,
    parent_tag: Option<&str>,
    tag: &str,
) -> Result<Vec<String>, LibError> {
    let doc = Document::load(path)?;
    Ok(doc
        .select(parent_tag, tag)
        .into_iter()
        .map(|node| node.text.clone())
        .collect())
}

/// Child fields of every selected item.
pub fn list_records(
    path: &Path,
    parent_tag: Option<&str>,
    tag: &str,
) -> Result<Vec<Record>, LibError> {
    let doc = Document::load(path)?;
    Ok(doc
        .select(parent_tag, tag)
        .into_iter()
        .map(Element::record)
        .collect())
}

/// Child fields of the first item matching every criterion; empty when none.
pub fn get_record(
    path: &Path,
    parent_tag: Option<&str>,
    tag: &str,
    criteria: &[(&str, &str)],
) -> Result<Record, LibError> {
    let doc = Document::load(path)?;
    Ok(doc
        .find(parent_tag, tag, criteria)
        .map(Element::record)
        .unwrap_or_default())
}

/// Exact source text of the first matching item.
pub fn get_raw_content(
    path: &Path,
    parent_tag: Option<&str>,
    tag: &str,
    criteria: &[(&str, &str)],
) -> Result<Option<String>, LibError> {
    let doc = Document::load(path)?;
    Ok(doc
        .find(parent_tag, tag, criteria)
        .map(|node| doc.source[node.span.clone()].to_string()))
}

/// Remove the first matching item and rewrite the file.
///
/// Returns whether something was removed.
pub fn delete_record(
    path: &Path,
    parent_tag: Option<&str>,
    tag: &str,
    criteria: &[(&str, &str)],
) -> Result<bool, LibError> {
    let doc = Document::load(path)?;
    let Some(node) = doc.find(parent_tag, tag, criteria) else {
        return Ok(false);
    };
    let updated = remove_span(&doc.source, node.span.clone());
    std::fs::write(path, updated)?;
    Ok(true)
}

/// Insert raw item text before the closing tag of the root element.
pub fn append_raw(path: &Path, raw: &str) -> Result<(), LibError> {
    let doc = Document::load(path)?;
    let close = root_close_offset(&doc, path)?;
    let indent = "    ";
    let mut updated = String::with_capacity(doc.source.len() + raw.len() + 8);
    let head = doc.source[..close].trim_end();
    updated.push_str(head);
    updated.push('\n');
    for line in raw.trim().lines() {
        if !line.trim().is_empty() {
            updated.push_str(indent);
            updated.push_str(line.trim_end());
            updated.push('\n');
        }
    }
    updated.push_str(&doc.source[close..]);
    std::fs::write(path, updated)?;
    Ok(())
}

fn root_close_offset(doc: &Document, path: &Path) -> Result<usize, LibError> {
    let span = &doc.root.span;
    let inner = &doc.source[span.clone()];
    inner
        .rfind("</")
        .map(|pos| span.start + pos)
        .ok_or_else(|| LibError::invalid_document(path, "root element has no closing tag"))
}

/// Cut a span out of the source together with the indentation before it and
/// the line break after it.
fn remove_span(source: &str, span: Range<usize>) -> String {
    let before = &source[..span.start];
    let line_start = before.trim_end_matches([' ', '\t']).len();
    let after = &source[span.end..];
    let after = after
        .strip_prefix("\r\n")
        .or_else(|| after.strip_prefix('\n'))
        .unwrap_or(after);
    let mut out = String::with_capacity(source.len());
    out.push_str(&source[..line_start]);
    out.push_str(after);
    out
}

/// Write a document holding one `item_tag` element per record, indented
/// with four spaces and preceded by an XML declaration.
pub fn create_from_list(
    path: &Path,
    root_tag: &str,
    item_tag: &str,
    records: &[Record],
) -> Result<(), LibError> {
    let mut xml = String::new();
    xml.push_str("<?xml version='1.0' encoding='utf-8'?>\n");
    if records.is_empty() {
        xml.push_str(&format!("<{root_tag} />"));
    } else {
        xml.push_str(&format!("<{root_tag}>\n"));
        for record in records {
            xml.push_str(&format!("    <{item_tag}>\n"));
            for (tag, value) in record.iter() {
                xml.push_str(&format!(
                    "        <{tag}>{}</{tag}>\n",
                    escape_xml(value)
                ));
            }
            xml.push_str(&format!("    </{item_tag}>\n"));
        }
        xml.push_str(&format!("</{root_tag}>"));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, xml)?;
    Ok(())
}

/// Replace the item matching `criteria` by `record` (appending it when no
/// item matches) and rewrite the whole document. A missing file starts empty.
pub fn replace_record(
    path: &Path,
    root_tag: &str,
    item_tag: &str,
    criteria: &[(&str, &str)],
    record: Record,
) -> Result<(), LibError> {
    let mut records = if path.is_file() {
        list_records(path, Some(root_tag), item_tag)?
    } else {
        Vec::new()
    };
    match records.iter().position(|r| r.matches(criteria)) {
        Some(index) => records[index] = record,
        None => records.push(record),
    }
    create_from_list(path, root_tag, item_tag, &records)
}

/// Literal search for an opening `<tag>` element.
///
/// Used for settings files whose writer does not always produce
/// well-formed XML; no parsing is attempted. A missing file contains nothing.
pub fn contains_tag_literal(path: &Path, tag: &str) -> Result<bool, LibError> {
    if !path.is_file() {
        return Ok(false);
    }
    let bytes = std::fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(opening_tag_offset(&text, tag).is_some())
}

fn opening_tag_offset(text: &str, tag: &str) -> Option<usize> {
    let open = format!("<{tag}");
    let mut from = 0;
    while let Some(pos) = text[from..].find(&open) {
        let at = from + pos;
        let next = text[at + open.len()..].chars().next();
        if matches!(next, Some('>' | '/' | ' ' | '\t' | '\r' | '\n')) {
            return Some(at);
        }
        from = at + open.len();
    }
    None
}

/// Byte range of the first literal `<tag ...>...</tag>` (or `<tag/>`) block.
pub fn find_tag_block(text: &str, tag: &str) -> Option<Range<usize>> {
    let start = opening_tag_offset(text, tag)?;
    let open_end = start + text[start..].find('>')? + 1;
    if text[..open_end].ends_with("/>") {
        return Some(start..open_end);
    }
    let close = format!("</{tag}>");
    let end = open_end + text[open_end..].find(&close)? + close.len();
    Some(start..end)
}

/// Text-level variant of [`delete_record`] for the non-well-formed settings
/// files. Returns the updated text, or `None` when the block is absent.
pub fn remove_tag_block(text: &str, tag: &str) -> Option<String> {
    let span = find_tag_block(text, tag)?;
    Some(remove_span(text, span))
}

/// Text-level insertion of a raw block before the last closing tag.
pub fn insert_before_root_close(text: &str, block: &str) -> Option<String> {
    let close = text.rfind("</")?;
    let head = text[..close].trim_end();
    Some(format!("{head}\n  {}\n{}", block.trim(), &text[close..]))
}

pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
#[path = "tests/document_tests.rs"]
mod tests;
