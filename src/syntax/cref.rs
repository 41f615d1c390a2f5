//! Reference tokens: parsing `Prefix:Type[.Member][(Params)]` strings.
//!
//! Documentation ids name every documented symbol and every `cref` target:
//!
//! ```text
//! T:Ns.Dog
//! P:Ns.Dog.Age
//! M:Ns.Repo`1.Query``2(System.Func{System.Linq.IQueryable{`0},System.Linq.IQueryable{``1}})
//! ```
//!
//! Parsing is pure string work and never touches the symbol graph.

use std::borrow::Cow;
use std::fmt;

use smol_str::SmolStr;

use crate::error::{DocError, DocResult};

/// The symbol-kind prefix of a reference token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RefPrefix {
    Type,
    Method,
    Property,
    Field,
}

impl RefPrefix {
    /// Classify the two-character prefix of `token`.
    ///
    /// Returns `None` for prefixes this engine does not index (`E:`, `N:`,
    /// the compiler's `!:` marker) and for tokens without a prefix at all.
    pub fn classify(token: &str) -> Option<RefPrefix> {
        let mut chars = token.chars();
        let prefix = match chars.next()? {
            'T' => RefPrefix::Type,
            'M' => RefPrefix::Method,
            'P' => RefPrefix::Property,
            'F' => RefPrefix::Field,
            _ => return None,
        };
        (chars.next()? == ':').then_some(prefix)
    }

    pub fn has_member(self) -> bool {
        !matches!(self, RefPrefix::Type)
    }
}

/// A parsed reference token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberIdentifier {
    /// The symbol-kind prefix.
    pub prefix: RefPrefix,
    /// Fully qualified type name, generic arity kept (`Ns.Repo`1`).
    pub type_name: SmolStr,
    /// Type name without its namespace or enclosing types (`Repo`1`).
    pub short_type_name: SmolStr,
    /// Member name with generic markers stripped; `None` for type tokens.
    pub member_name: Option<SmolStr>,
    /// Parameter type names with generic markers stripped. Empty for
    /// non-method tokens and for parameterless methods.
    pub parameters: Vec<SmolStr>,
}

impl MemberIdentifier {
    /// Parse a reference token.
    pub fn parse(token: &str) -> DocResult<Self> {
        let token = token.trim();
        let prefix = RefPrefix::classify(token)
            .ok_or_else(|| DocError::UnsupportedReference(token.to_string()))?;
        let rest = &token[2..];

        if !prefix.has_member() {
            if rest.is_empty() {
                return Err(DocError::MalformedReference(token.to_string()));
            }
            return Ok(Self {
                prefix,
                type_name: SmolStr::new(rest),
                short_type_name: SmolStr::new(short_name(rest)),
                member_name: None,
                parameters: Vec::new(),
            });
        }

        let (head, parameters) = match rest.find('(') {
            Some(open) => {
                let close = rest
                    .rfind(')')
                    .filter(|&close| close > open)
                    .ok_or_else(|| DocError::MalformedReference(token.to_string()))?;
                // Anything after `)` is a return type (`op_Implicit(X)~Y`).
                (&rest[..open], parse_parameters(&rest[open + 1..close]))
            }
            None => (rest, Vec::new()),
        };

        let (type_name, member) = split_type_and_member(head)
            .ok_or_else(|| DocError::MalformedReference(token.to_string()))?;

        Ok(Self {
            prefix,
            type_name: SmolStr::new(type_name),
            short_type_name: SmolStr::new(short_name(type_name)),
            member_name: Some(SmolStr::new(strip_generic_markers(member))),
            parameters,
        })
    }

    /// The name shown in rendered text: `Type` or `Type.Member`.
    pub fn display_name(&self, short_type_names: bool) -> String {
        let ty = if short_type_names {
            &self.short_type_name
        } else {
            &self.type_name
        };
        let ty = strip_generic_markers(ty);
        match self.member_name.as_deref() {
            // Constructors read as the type they build.
            Some("#ctor" | "#cctor") | None => ty.into_owned(),
            Some(member) => format!("{ty}.{member}"),
        }
    }
}

impl fmt::Display for MemberIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name(false))
    }
}

/// Split `Ns.Type.Member` on the last `.`.
///
/// Returns `None` when there is no dot or either side is empty.
pub fn split_type_and_member(head: &str) -> Option<(&str, &str)> {
    let dot = head.rfind('.')?;
    let (ty, member) = (&head[..dot], &head[dot + 1..]);
    (!ty.is_empty() && !member.is_empty()).then_some((ty, member))
}

/// Split a parameter list on top-level commas.
///
/// Commas nested inside generic arguments (`{}`/`<>`) or array dimensions
/// (`[]`) belong to the enclosing parameter.
pub fn parse_parameters(list: &str) -> Vec<SmolStr> {
    if list.trim().is_empty() {
        return Vec::new();
    }

    let mut params = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in list.char_indices() {
        match c {
            '{' | '<' | '[' => depth += 1,
            '}' | '>' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                params.push(param(&list[start..i]));
                start = i + 1;
            }
            _ => {}
        }
    }
    params.push(param(&list[start..]));
    params
}

fn param(raw: &str) -> SmolStr {
    SmolStr::new(strip_generic_markers(raw.trim()))
}

/// Remove generic arity markers: a run of backticks and the digits after it.
///
/// `Select``2` → `Select`, `List`1` → `List`, `Foo`` → `Foo`.
pub fn strip_generic_markers(name: &str) -> Cow<'_, str> {
    if !name.contains('`') {
        return Cow::Borrowed(name);
    }

    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '`' {
            while chars.next_if(|&next| next == '`').is_some() {}
            while chars.next_if(|next| next.is_ascii_digit()).is_some() {}
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

/// Canonical form used when comparing parameter type names.
pub fn normalize_type_name(name: &str) -> String {
    strip_generic_markers(name)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Friendly generic type name: `Namespace.Generic{Arg1, Arg2}`.
pub fn friendly_generic_name(base: &str, args: &[&str]) -> String {
    let base = strip_generic_markers(base);
    if args.is_empty() {
        return base.into_owned();
    }
    format!("{base}{{{}}}", args.join(", "))
}

fn short_name(type_name: &str) -> &str {
    type_name
        .rfind('.')
        .map_or(type_name, |dot| &type_name[dot + 1..])
}
