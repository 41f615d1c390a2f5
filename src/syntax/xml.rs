//! Documentation XML: a small owned element tree over `quick-xml` events.
//!
//! Text is kept exactly as written (no trimming) so that `<code>` blocks
//! survive; whitespace policy belongs to the renderer.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use smol_str::SmolStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum XmlError {
    #[error(transparent)]
    Syntax(#[from] quick_xml::Error),
    #[error("unexpected end of document inside <{0}>")]
    Unclosed(SmolStr),
    #[error("document has no root element")]
    NoRoot,
}

/// A node of a documentation tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DocNode {
    Element(DocElement),
    Text(String),
}

/// An element with its attributes and children, in document order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocElement {
    pub name: SmolStr,
    pub attributes: Vec<(SmolStr, String)>,
    pub children: Vec<DocNode>,
}

impl DocElement {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Get an attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Direct child elements.
    pub fn elements(&self) -> impl Iterator<Item = &DocElement> {
        self.children.iter().filter_map(|node| match node {
            DocNode::Element(el) => Some(el),
            DocNode::Text(_) => None,
        })
    }

    /// First direct child element with the given name.
    pub fn child(&self, name: &str) -> Option<&DocElement> {
        self.elements().find(|el| el.name == name)
    }

    /// All descendant elements in document order, excluding `self`.
    pub fn descendants(&self) -> Descendants<'_> {
        let mut stack: Vec<&DocElement> = self.elements().collect();
        stack.reverse();
        Descendants { stack }
    }

    /// Concatenated text of all descendant text nodes.
    pub fn inner_text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(DocNode::Text(last)) = self.children.last_mut() {
            last.push_str(text);
        } else {
            self.children.push(DocNode::Text(text.to_string()));
        }
    }
}

fn collect_text(el: &DocElement, out: &mut String) {
    for node in &el.children {
        match node {
            DocNode::Text(text) => out.push_str(text),
            DocNode::Element(child) => collect_text(child, out),
        }
    }
}

/// Pre-order iterator over descendant elements.
pub struct Descendants<'a> {
    stack: Vec<&'a DocElement>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a DocElement;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        let len = self.stack.len();
        self.stack.extend(next.elements());
        self.stack[len..].reverse();
        Some(next)
    }
}

/// Parse a whole document and return its root element.
pub fn parse_document(bytes: &[u8]) -> Result<DocElement, XmlError> {
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut stack: Vec<DocElement> = Vec::new();
    let mut root = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(start) => stack.push(element(&start)?),
            Event::Empty(start) => {
                let el = element(&start)?;
                attach(&mut stack, &mut root, el);
            }
            Event::End(_) => {
                if let Some(el) = stack.pop() {
                    attach(&mut stack, &mut root, el);
                }
            }
            Event::Text(text) => {
                if let Some(parent) = stack.last_mut() {
                    parent.push_text(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let Some(parent) = stack.last_mut() {
                    parent.push_text(&String::from_utf8_lossy(&data));
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.pop() {
        return Err(XmlError::Unclosed(open.name));
    }
    root.ok_or(XmlError::NoRoot)
}

/// Parse a standalone fragment such as `<member>...</member>`.
pub fn parse_fragment(xml: &str) -> Result<DocElement, XmlError> {
    parse_document(xml.as_bytes())
}

fn element(start: &BytesStart<'_>) -> quick_xml::Result<DocElement> {
    let mut el = DocElement::new(String::from_utf8_lossy(start.name().as_ref()).as_ref());
    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref());
        let value = attr.unescape_value()?;
        el.attributes.push((SmolStr::new(key), value.into_owned()));
    }
    Ok(el)
}

fn attach(stack: &mut [DocElement], root: &mut Option<DocElement>, el: DocElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(DocNode::Element(el)),
        None => {
            if root.is_none() {
                *root = Some(el);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_member() {
        let el = parse_fragment(
            r#"<member name="P:Ns.Dog.Age"><summary>Dog's <c>Age</c> &amp; more</summary></member>"#,
        )
        .unwrap();

        assert_eq!(el.name, "member");
        assert_eq!(el.attr("name"), Some("P:Ns.Dog.Age"));
        let summary = el.child("summary").unwrap();
        assert_eq!(summary.inner_text(), "Dog's Age & more");
    }

    #[test]
    fn test_whitespace_preserved() {
        let el = parse_fragment("<code>\n    var x = 1;\n</code>").unwrap();
        assert_eq!(el.inner_text(), "\n    var x = 1;\n");
    }

    #[test]
    fn test_cdata_merges_with_text() {
        let el = parse_fragment("<c>a<![CDATA[<b>]]>c</c>").unwrap();
        assert_eq!(el.children, vec![DocNode::Text("a<b>c".to_string())]);
    }

    #[test]
    fn test_descendants_in_document_order() {
        let el = parse_fragment(
            r#"<member><summary><see cref="A"/><para><see cref="B"/></para></summary><seealso cref="C"/></member>"#,
        )
        .unwrap();
        let names: Vec<_> = el.descendants().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["summary", "see", "para", "see", "seealso"]);
    }

    #[test]
    fn test_unclosed_document() {
        assert!(parse_fragment("<doc><members>").is_err());
    }

    #[test]
    fn test_mismatched_end_tag() {
        assert!(parse_fragment("<doc><a></b></doc>").is_err());
    }

    #[test]
    fn test_empty_document() {
        assert!(matches!(parse_fragment(""), Err(XmlError::NoRoot)));
    }
}
