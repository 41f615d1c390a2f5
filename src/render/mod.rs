//! Plain-text rendering of documentation entries.
//!
//! The renderer walks an entry's XML tree and writes text according to a
//! fixed set of tag rules. Block-level tags emit blank lines around their
//! content; a final [`normalize`] pass turns that into tidy paragraphs (or a
//! single line).
//!
//! ```text
//! <summary>See <see cref="T:Ns.Foo"/>.</summary>   →   See Foo.
//! ```
//!
//! `<inheritdoc/>` renders the inherited entry in its place. Entries being
//! rendered are tracked so that an inheritance cycle renders empty instead
//! of recursing forever.

mod normalize;

pub use normalize::{normalize, push_collapsed};

use tracing::trace;

use crate::base::Symbol;
use crate::error::DocResult;
use crate::hir::{Documentation, DocumentationStore, ReferenceMap};
use crate::syntax::cref::MemberIdentifier;
use crate::syntax::{DocElement, DocNode};

// ============================================================================
// OPTIONS
// ============================================================================

/// Rendering switches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RenderOptions {
    /// Join all lines with spaces instead of newlines.
    pub single_line: bool,
    /// Render references as `Type` / `Type.Member` rather than fully
    /// qualified names.
    pub short_type_names: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            single_line: false,
            short_type_names: true,
        }
    }
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_single_line(mut self, single_line: bool) -> Self {
        self.single_line = single_line;
        self
    }

    pub fn with_short_type_names(mut self, short_type_names: bool) -> Self {
        self.short_type_names = short_type_names;
        self
    }
}

// ============================================================================
// RENDERER
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq)]
enum ListStyle {
    Bullet,
    Number,
    Table,
}

impl ListStyle {
    fn from_attr(kind: Option<&str>) -> Self {
        match kind {
            Some("number") => ListStyle::Number,
            Some("table") => ListStyle::Table,
            _ => ListStyle::Bullet,
        }
    }

    fn prefix(self, index: usize) -> String {
        match self {
            ListStyle::Bullet => "– ".to_string(),
            ListStyle::Number => format!("{}. ", index + 1),
            ListStyle::Table => "* ".to_string(),
        }
    }
}

/// The entry currently being written and its resolved references.
struct Scope<'d> {
    doc: &'d Documentation,
    references: &'d ReferenceMap,
}

/// Renders documentation entries of one store.
pub struct Renderer<'a> {
    store: &'a DocumentationStore,
    options: RenderOptions,
    visiting: Vec<Symbol>,
}

impl<'a> Renderer<'a> {
    pub fn new(store: &'a DocumentationStore, options: RenderOptions) -> Self {
        Self {
            store,
            options,
            visiting: Vec::new(),
        }
    }

    /// Render an entry to normalized text.
    ///
    /// An entry without an XML node renders empty. Unresolvable references
    /// render empty; an ambiguous reference is an error.
    pub fn render(&mut self, doc: &Documentation) -> DocResult<String> {
        let mut out = String::new();
        self.write_doc(doc, &mut out)?;
        Ok(normalize(&out, self.options.single_line))
    }

    fn write_doc(&mut self, doc: &Documentation, out: &mut String) -> DocResult<()> {
        let symbol = doc.symbol();
        if self.visiting.contains(&symbol) {
            trace!(?symbol, "inheritance cycle, rendering empty");
            return Ok(());
        }
        let Some(node) = doc.node() else {
            return Ok(());
        };

        let scope = Scope {
            doc,
            references: self.store.references(doc)?,
        };
        self.visiting.push(symbol);
        let result = self.write_children(&scope, node, out);
        self.visiting.pop();
        result
    }

    fn write_children(&mut self, scope: &Scope<'_>, el: &DocElement, out: &mut String) -> DocResult<()> {
        for node in &el.children {
            match node {
                DocNode::Text(text) => push_collapsed(out, text),
                DocNode::Element(child) => self.write_element(scope, child, out)?,
            }
        }
        Ok(())
    }

    fn write_element(&mut self, scope: &Scope<'_>, el: &DocElement, out: &mut String) -> DocResult<()> {
        match el.name.as_str() {
            "see" | "seealso" => self.write_reference(scope, el, out),
            "inheritdoc" if el.attr("cref").is_none() => self.write_inherited(scope, out),
            "para" | "remarks" | "example" => {
                out.push_str("\n\n");
                self.write_children(scope, el, out)?;
                out.push_str("\n\n");
                Ok(())
            }
            "list" => self.write_list(scope, el, out),
            "code" => {
                write_code(el, out);
                Ok(())
            }
            "param" => self.write_labeled(scope, &named_label("Parameter", el), el, out),
            "typeparam" => self.write_labeled(scope, &named_label("Type parameter", el), el, out),
            "value" => self.write_labeled(scope, "Value", el, out),
            "returns" => self.write_labeled(scope, "Returns", el, out),
            "exception" => {
                let label = match el.attr("cref") {
                    Some(token) => format!("Throws {}", self.exception_name(token)),
                    None => "Throws".to_string(),
                };
                self.write_labeled(scope, &label, el, out)
            }
            "paramref" | "typeparamref" => {
                out.push_str(el.attr("name").unwrap_or_default());
                Ok(())
            }
            "c" => {
                out.push('`');
                self.write_children(scope, el, out)?;
                out.push('`');
                Ok(())
            }
            _ if el.attr("cref").is_some() => self.write_reference(scope, el, out),
            _ => self.write_children(scope, el, out),
        }
    }

    /// `see`, `seealso` and any other element carrying a target.
    fn write_reference(&mut self, scope: &Scope<'_>, el: &DocElement, out: &mut String) -> DocResult<()> {
        if let Some(word) = el.attr("langword") {
            out.push_str(word);
            return Ok(());
        }

        let mut content = String::new();
        self.write_children(scope, el, &mut content)?;
        if !content.trim().is_empty() {
            out.push_str(&content);
            return Ok(());
        }

        if let Some(href) = el.attr("href") {
            out.push_str(href);
        } else if let Some(token) = el.attr("cref") {
            let resolved = scope
                .references
                .get(token)
                .is_some_and(|reference| reference.target.is_some());
            if resolved {
                if let Ok(id) = MemberIdentifier::parse(token) {
                    out.push_str(&id.display_name(self.options.short_type_names));
                }
            }
        }
        Ok(())
    }

    fn write_inherited(&mut self, scope: &Scope<'_>, out: &mut String) -> DocResult<()> {
        let target = self
            .store
            .inherited(scope.doc)?
            .and_then(|reference| reference.target);
        let Some(target) = target else {
            return Ok(());
        };
        match self.store.get_tolerant(target) {
            Some(inherited) => self.write_doc(&inherited, out),
            None => Ok(()),
        }
    }

    fn write_list(&mut self, scope: &Scope<'_>, el: &DocElement, out: &mut String) -> DocResult<()> {
        let style = ListStyle::from_attr(el.attr("type"));
        out.push_str("\n\n");
        for (index, item) in el.elements().filter(|child| child.name == "item").enumerate() {
            let mut line = String::new();
            match (item.child("term"), item.child("description")) {
                (Some(term), Some(description)) => {
                    self.write_children(scope, term, &mut line)?;
                    line = line.trim().to_string();
                    line.push_str(" – ");
                    self.write_children(scope, description, &mut line)?;
                }
                _ => self.write_children(scope, item, &mut line)?,
            }
            out.push_str(&style.prefix(index));
            out.push_str(line.trim());
            out.push('\n');
        }
        out.push('\n');
        Ok(())
    }

    fn write_labeled(&mut self, scope: &Scope<'_>, label: &str, el: &DocElement, out: &mut String) -> DocResult<()> {
        let mut body = String::new();
        self.write_children(scope, el, &mut body)?;
        let body = body.trim();

        out.push_str("\n\n");
        out.push_str(label);
        if !body.is_empty() {
            out.push_str(": ");
            out.push_str(body);
        }
        out.push('\n');
        Ok(())
    }

    fn exception_name(&self, token: &str) -> String {
        match MemberIdentifier::parse(token) {
            Ok(id) => id.display_name(self.options.short_type_names),
            // Keep whatever the author wrote, minus a `X:` prefix.
            Err(_) => token.split_once(':').map_or(token, |(_, rest)| rest).to_string(),
        }
    }
}

fn named_label(label: &str, el: &DocElement) -> String {
    match el.attr("name") {
        Some(name) => format!("{label} {name}"),
        None => label.to_string(),
    }
}

fn write_code(el: &DocElement, out: &mut String) {
    let text = el.inner_text();
    out.push_str("\n\n```\n");
    out.push_str(text.trim_matches(['\n', '\r']));
    out.push_str("\n```\n\n");
}
