//! Inheritance resolution: finding the documentation `<inheritdoc/>` reuses.
//!
//! Resolution is one hop: the result points at the nearest ancestor symbol
//! that carries documentation, not at whatever that ancestor inherits in
//! turn. Rendering the target resolves its own inheritance again.
//!
//! Search order for a member:
//!
//! 1. the declaring type's base chain, nearest first;
//! 2. the interfaces the declaring type adds on top of its base type, then
//!    those each base type adds in turn. Within one type the order is
//!    declaration order, each interface followed by its ancestor interfaces.

use tracing::trace;

use crate::base::Symbol;
use crate::error::DocResult;
use crate::hir::docs::{
    Documentation, DocumentationReference, MemberDocumentation, TypeDocumentation, inheritance_marker,
};
use crate::hir::store::DocumentationStore;
use crate::hir::symbols::MemberData;
use crate::syntax::DocElement;

pub(crate) fn resolve(store: &DocumentationStore, doc: &Documentation) -> DocResult<Option<DocumentationReference>> {
    let resolved = match doc {
        Documentation::Type(ty) => resolve_type(store, ty),
        Documentation::Member(member) => resolve_member(store, member),
    };
    trace!(symbol = ?doc.symbol(), resolved_to = ?resolved.as_ref().and_then(|r| r.target), "resolved inheritance");
    Ok(resolved)
}

fn resolve_type(store: &DocumentationStore, doc: &TypeDocumentation) -> Option<DocumentationReference> {
    let graph = store.graph();

    // A type without its own entry inherits implicitly from its base chain.
    let Some(node) = doc.node() else {
        return graph
            .base_chain(doc.ty)
            .find(|&base| documented(store, Symbol::Type(base)))
            .map(|base| found(None, Symbol::Type(base)));
    };

    let marker = inheritance_marker(node)?;
    graph
        .inheritance_order(doc.ty)
        .into_iter()
        .find(|&ancestor| documented(store, Symbol::Type(ancestor)))
        .map(|ancestor| found(Some(marker.clone()), Symbol::Type(ancestor)))
}

fn resolve_member(store: &DocumentationStore, doc: &MemberDocumentation) -> Option<DocumentationReference> {
    let marker = inheritance_marker(doc.node()?)?;
    let graph = store.graph();
    let member = graph.member(doc.member)?;
    let declaring = doc.declaring_type();

    let candidates = graph
        .inheritance_order(declaring)
        .into_iter()
        .filter_map(|ancestor| graph.ty(ancestor))
        .flat_map(|ancestor| ancestor.members().iter())
        .filter(|candidate| candidate.same_signature(member));

    first_documented(store, candidates).map(|target| found(Some(marker.clone()), Symbol::Member(target.id)))
}

fn first_documented<'a>(
    store: &DocumentationStore,
    mut candidates: impl Iterator<Item = &'a MemberData>,
) -> Option<&'a MemberData> {
    candidates.find(|candidate| documented(store, Symbol::Member(candidate.id)))
}

fn documented(store: &DocumentationStore, symbol: Symbol) -> bool {
    store.get_tolerant(symbol).is_some()
}

fn found(origin: Option<DocElement>, target: Symbol) -> DocumentationReference {
    DocumentationReference {
        origin,
        target: Some(target),
        documented: true,
    }
}
