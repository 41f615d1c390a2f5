//! Documentation entries: what the store hands out.
//!
//! An [`AssemblyDocumentation`] is built once from an assembly's XML file and
//! never changes afterwards. Each entry carries two lazily computed facets
//! (its inheritance reference and its cross-references); both are computed
//! at most once and then read without locking.

use std::sync::Arc;

use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::base::{AssemblyId, MemberId, MemberKind, Symbol, TypeId};
use crate::error::{DocError, DocResult};
use crate::syntax::DocElement;

// ============================================================================
// REFERENCES
// ============================================================================

/// A resolved `<inheritdoc/>` or `cref` reference.
#[derive(Clone, Debug)]
pub struct DocumentationReference {
    /// The element that asked for resolution. `None` for a type without its
    /// own documentation, which inherits implicitly.
    pub origin: Option<DocElement>,
    /// The symbol the reference resolved to, if any.
    pub target: Option<Symbol>,
    /// Whether the target has a documentation entry of its own.
    pub documented: bool,
}

impl DocumentationReference {
    pub fn unresolved(origin: DocElement) -> Self {
        Self {
            origin: Some(origin),
            target: None,
            documented: false,
        }
    }
}

/// Cross-references of one entry keyed by their literal `cref` token.
pub type ReferenceMap = IndexMap<SmolStr, DocumentationReference>;

#[derive(Debug, Default)]
pub(crate) struct Facets {
    pub(crate) inherited: OnceCell<Option<DocumentationReference>>,
    pub(crate) references: OnceCell<ReferenceMap>,
}

/// `<inheritdoc/>` without a `cref`: reuse the nearest ancestor's docs.
pub fn inheritance_marker(node: &DocElement) -> Option<&DocElement> {
    node.descendants()
        .find(|el| el.name == "inheritdoc" && el.attr("cref").is_none())
}

// ============================================================================
// ENTRIES
// ============================================================================

/// Documentation of one type and of the members it declares.
#[derive(Debug)]
pub struct TypeDocumentation {
    pub ty: TypeId,
    node: Option<DocElement>,
    members: FxHashMap<MemberId, Arc<MemberDocumentation>>,
    pub(crate) facets: Facets,
}

impl TypeDocumentation {
    pub(crate) fn new(ty: TypeId, node: Option<DocElement>) -> Self {
        Self {
            ty,
            node,
            members: FxHashMap::default(),
            facets: Facets::default(),
        }
    }

    /// The `<member name="T:...">` element, if the type has one.
    pub fn node(&self) -> Option<&DocElement> {
        self.node.as_ref()
    }

    /// Documentation of a member declared on this type.
    ///
    /// Fails with [`DocError::OwnershipMismatch`] if `member` is declared on
    /// another type; normalize inherited handles to their declaring type
    /// first.
    pub fn member(&self, member: MemberId) -> DocResult<Option<&Arc<MemberDocumentation>>> {
        if member.declaring != self.ty {
            return Err(DocError::OwnershipMismatch {
                member,
                declaring: member.declaring,
                requested: self.ty,
            });
        }
        Ok(self.members.get(&member))
    }

    pub fn members(&self) -> impl Iterator<Item = &Arc<MemberDocumentation>> {
        self.members.values()
    }

    /// Returns false if an entry for `member` already existed.
    pub(crate) fn insert_member(&mut self, doc: MemberDocumentation) -> bool {
        debug_assert_eq!(doc.member.declaring, self.ty);
        if self.members.contains_key(&doc.member) {
            return false;
        }
        self.members.insert(doc.member, Arc::new(doc));
        true
    }
}

/// Documentation of one property, field or method.
#[derive(Debug)]
pub struct MemberDocumentation {
    pub member: MemberId,
    pub kind: MemberKind,
    node: Option<DocElement>,
    pub(crate) facets: Facets,
}

impl MemberDocumentation {
    pub(crate) fn new(member: MemberId, kind: MemberKind, node: Option<DocElement>) -> Self {
        Self {
            member,
            kind,
            node,
            facets: Facets::default(),
        }
    }

    pub fn node(&self) -> Option<&DocElement> {
        self.node.as_ref()
    }

    /// The type owning this entry.
    pub fn declaring_type(&self) -> TypeId {
        self.member.declaring
    }
}

/// Either kind of entry.
#[derive(Clone, Debug)]
pub enum Documentation {
    Type(Arc<TypeDocumentation>),
    Member(Arc<MemberDocumentation>),
}

impl Documentation {
    pub fn symbol(&self) -> Symbol {
        match self {
            Documentation::Type(doc) => Symbol::Type(doc.ty),
            Documentation::Member(doc) => Symbol::Member(doc.member),
        }
    }

    pub fn node(&self) -> Option<&DocElement> {
        match self {
            Documentation::Type(doc) => doc.node(),
            Documentation::Member(doc) => doc.node(),
        }
    }

    pub(crate) fn facets(&self) -> &Facets {
        match self {
            Documentation::Type(doc) => &doc.facets,
            Documentation::Member(doc) => &doc.facets,
        }
    }
}

impl From<Arc<TypeDocumentation>> for Documentation {
    fn from(doc: Arc<TypeDocumentation>) -> Self {
        Documentation::Type(doc)
    }
}

impl From<Arc<MemberDocumentation>> for Documentation {
    fn from(doc: Arc<MemberDocumentation>) -> Self {
        Documentation::Member(doc)
    }
}

/// Every documented type of one assembly.
#[derive(Debug)]
pub struct AssemblyDocumentation {
    pub assembly: AssemblyId,
    pub name: SmolStr,
    types: FxHashMap<TypeId, Arc<TypeDocumentation>>,
}

impl AssemblyDocumentation {
    pub(crate) fn new(assembly: AssemblyId, name: SmolStr, types: FxHashMap<TypeId, Arc<TypeDocumentation>>) -> Self {
        Self { assembly, name, types }
    }

    pub fn ty(&self, ty: TypeId) -> Option<&Arc<TypeDocumentation>> {
        self.types.get(&ty)
    }

    /// Look up a member through its declaring type.
    pub fn member(&self, member: MemberId) -> Option<&Arc<MemberDocumentation>> {
        self.types
            .get(&member.declaring)
            .and_then(|ty| ty.members.get(&member))
    }

    pub fn types(&self) -> impl Iterator<Item = &Arc<TypeDocumentation>> {
        self.types.values()
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn member_count(&self) -> usize {
        self.types.values().map(|t| t.members.len()).sum()
    }
}
