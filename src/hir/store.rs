//! Documentation store: the engine callers share.
//!
//! The store owns the symbol graph, a [`DocSource`] and one build-once slot
//! per assembly. The first request for any symbol of an assembly loads and
//! indexes that assembly's XML; concurrent first requests wait for the same
//! build instead of starting their own. Results, failures included, are kept
//! for the life of the store.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::base::{AssemblyId, MemberId, MemberKind, Symbol, TypeId};
use crate::error::{DocError, DocResult};
use crate::hir::docs::{
    AssemblyDocumentation, Documentation, DocumentationReference, MemberDocumentation, ReferenceMap,
    TypeDocumentation,
};
use crate::hir::symbols::SymbolGraph;
use crate::hir::{index, inherit, references};
use crate::project::DocSource;
use crate::render::{RenderOptions, Renderer};
use crate::syntax::xml::parse_document;

type AssemblySlot = Arc<OnceCell<DocResult<Arc<AssemblyDocumentation>>>>;

pub struct DocumentationStore {
    graph: Arc<SymbolGraph>,
    source: Arc<dyn DocSource>,
    assemblies: RwLock<FxHashMap<AssemblyId, AssemblySlot>>,
}

impl DocumentationStore {
    pub fn new(graph: Arc<SymbolGraph>, source: impl DocSource + 'static) -> Self {
        Self::with_shared_source(graph, Arc::new(source))
    }

    pub fn with_shared_source(graph: Arc<SymbolGraph>, source: Arc<dyn DocSource>) -> Self {
        Self {
            graph,
            source,
            assemblies: RwLock::new(FxHashMap::default()),
        }
    }

    pub fn graph(&self) -> &SymbolGraph {
        &self.graph
    }

    // ========================================================================
    // ASSEMBLIES
    // ========================================================================

    /// Documentation of a whole assembly, building it on first request.
    pub fn assembly(&self, assembly: AssemblyId) -> DocResult<Arc<AssemblyDocumentation>> {
        if self.graph.assembly(assembly).is_none() {
            return Err(DocError::UnknownAssembly(assembly));
        }
        let slot = self.slot(assembly);
        slot.get_or_init(|| self.build(assembly)).clone()
    }

    /// True once the assembly's build has finished (successfully or not).
    pub fn is_loaded(&self, assembly: AssemblyId) -> bool {
        self.assemblies
            .read()
            .get(&assembly)
            .is_some_and(|slot| slot.get().is_some())
    }

    fn slot(&self, assembly: AssemblyId) -> AssemblySlot {
        // Fast path: read lock
        {
            let slots = self.assemblies.read();
            if let Some(slot) = slots.get(&assembly) {
                return Arc::clone(slot);
            }
        }

        // Slow path: the entry() call re-checks under the write lock
        let mut slots = self.assemblies.write();
        Arc::clone(slots.entry(assembly).or_default())
    }

    fn build(&self, assembly: AssemblyId) -> DocResult<Arc<AssemblyDocumentation>> {
        let asm = self
            .graph
            .assembly(assembly)
            .ok_or(DocError::UnknownAssembly(assembly))?;
        debug!(assembly = %asm.name, "loading documentation");

        let bytes = self.source.load(asm)?;
        let root = parse_document(&bytes).map_err(|e| DocError::Xml {
            assembly: asm.name.clone(),
            message: e.to_string(),
        })?;
        drop(bytes);

        index::build_assembly(&self.graph, assembly, root).map(Arc::new)
    }

    // ========================================================================
    // LOOKUPS
    // ========================================================================

    pub fn get(&self, symbol: Symbol) -> DocResult<Option<Documentation>> {
        Ok(match symbol {
            Symbol::Type(ty) => self.type_doc(ty)?.map(Documentation::Type),
            Symbol::Member(member) => self.member_doc(member)?.map(Documentation::Member),
        })
    }

    pub fn type_doc(&self, ty: TypeId) -> DocResult<Option<Arc<TypeDocumentation>>> {
        Ok(self.assembly(ty.assembly)?.ty(ty).cloned())
    }

    /// Documentation of a member, looked up on its declaring type.
    pub fn member_doc(&self, member: MemberId) -> DocResult<Option<Arc<MemberDocumentation>>> {
        let Some(ty) = self.type_doc(member.declaring)? else {
            return Ok(None);
        };
        Ok(ty.member(member)?.cloned())
    }

    /// Documentation of `member` as seen through `ty`.
    ///
    /// Inherited members are normalized to their declaring type, and members
    /// of interfaces `ty` implements are accepted as well. Any other member
    /// is an ownership mismatch.
    pub fn member_doc_on(&self, ty: TypeId, member: MemberId) -> DocResult<Option<Arc<MemberDocumentation>>> {
        let owned = self.graph.inherits_from(ty, member.declaring)
            || self.graph.all_interfaces(ty).contains(&member.declaring);
        if !owned {
            return Err(DocError::OwnershipMismatch {
                member,
                declaring: member.declaring,
                requested: ty,
            });
        }
        self.member_doc(member)
    }

    pub fn property(&self, ty: TypeId, name: &str) -> DocResult<Option<Arc<MemberDocumentation>>> {
        self.named_member(ty, MemberKind::Property, name)
    }

    pub fn field(&self, ty: TypeId, name: &str) -> DocResult<Option<Arc<MemberDocumentation>>> {
        self.named_member(ty, MemberKind::Field, name)
    }

    pub fn method(&self, ty: TypeId, name: &str, parameters: &[&str]) -> DocResult<Option<Arc<MemberDocumentation>>> {
        match self.graph.find_method(ty, name, parameters) {
            Some(member) => self.member_doc(member),
            None => Ok(None),
        }
    }

    fn named_member(&self, ty: TypeId, kind: MemberKind, name: &str) -> DocResult<Option<Arc<MemberDocumentation>>> {
        match self.graph.find_member(ty, kind, name) {
            Some(member) => self.member_doc(member),
            None => Ok(None),
        }
    }

    /// Like [`get`](Self::get), but a failure to load another assembly's
    /// documentation degrades to "undocumented".
    pub(crate) fn get_tolerant(&self, symbol: Symbol) -> Option<Documentation> {
        match self.get(symbol) {
            Ok(doc) => doc,
            Err(e) => {
                warn!(?symbol, error = %e, "documentation unavailable");
                None
            }
        }
    }

    // ========================================================================
    // FACETS
    // ========================================================================

    /// The ancestor documentation `doc` inherits from, computed once.
    pub fn inherited<'a>(&self, doc: &'a Documentation) -> DocResult<Option<&'a DocumentationReference>> {
        doc.facets()
            .inherited
            .get_or_try_init(|| inherit::resolve(self, doc))
            .map(Option::as_ref)
    }

    /// The cross-references embedded in `doc`, computed once.
    pub fn references<'a>(&self, doc: &'a Documentation) -> DocResult<&'a ReferenceMap> {
        doc.facets()
            .references
            .get_or_try_init(|| references::resolve(self, doc))
    }

    // ========================================================================
    // RENDERING
    // ========================================================================

    pub fn render(&self, doc: &Documentation, options: RenderOptions) -> DocResult<String> {
        Renderer::new(self, options).render(doc)
    }

    /// Render a symbol's documentation; undocumented symbols render empty.
    pub fn render_symbol(&self, symbol: impl Into<Symbol>, options: RenderOptions) -> DocResult<String> {
        match self.get(symbol.into())? {
            Some(doc) => self.render(&doc, options),
            None => Ok(String::new()),
        }
    }
}

impl std::fmt::Debug for DocumentationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentationStore")
            .field("assemblies", &self.graph.assemblies().count())
            .field("loaded", &self.assemblies.read().len())
            .finish()
    }
}
