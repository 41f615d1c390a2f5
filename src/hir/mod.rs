//! Documentation model for the engine.
//!
//! This module ties documentation XML to the symbol graph:
//! - [`SymbolGraph`] - Registered assemblies, types and members
//! - [`DocumentationStore`] - Build-once, per-assembly documentation cache
//! - [`Documentation`] - A type or member entry with lazily resolved
//!   inheritance and cross-references
//!
//! Indexing happens per assembly on first access. Inheritance and reference
//! resolution happen per entry on first access and are then memoized.

mod docs;
mod index;
mod inherit;
mod references;
mod store;
mod symbols;

pub use docs::{
    AssemblyDocumentation, Documentation, DocumentationReference, MemberDocumentation, ReferenceMap,
    TypeDocumentation, inheritance_marker,
};
pub use index::build_assembly;
pub use store::DocumentationStore;
pub use symbols::{
    AssemblyData, BaseChain, MemberData, SymbolGraph, SymbolGraphBuilder, TypeData, TypeKind, simple_member_name,
};
