//! # xmldoc-base
//!
//! Core library for resolving and rendering compiler-generated XML
//! documentation files.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! render  → Plain-text renderer (tag rules, whitespace normalization)
//!   ↓
//! hir     → Symbol graph, per-assembly index, inheritance + cref resolution
//!   ↓
//! syntax  → Reference-token parser, documentation XML tree
//!   ↓
//! base    → Primitives (AssemblyId, TypeId, MemberId, Symbol)
//! ```
//!
//! `project` locates documentation files and `error` holds the crate-wide
//! error type.
//!
//! ## Usage
//!
//! ```
//! use xmldoc::{DocumentationStore, MemorySource, RenderOptions, SymbolGraphBuilder, TypeKind};
//!
//! let mut graph = SymbolGraphBuilder::new();
//! let zoo = graph.add_assembly("Zoo", "Zoo.dll");
//! let dog = graph.add_type(zoo, "Zoo.Dog", TypeKind::Class);
//! graph.add_property(dog, "Age");
//!
//! let xml = r#"<doc><members>
//!     <member name="P:Zoo.Dog.Age"><summary>Dog's Age</summary></member>
//! </members></doc>"#;
//! let store = DocumentationStore::new(graph.build(), MemorySource::new().with("Zoo", xml));
//!
//! let age = store.property(dog, "Age").unwrap().unwrap();
//! let text = store.render(&age.into(), RenderOptions::default()).unwrap();
//! assert_eq!(text, "Dog's Age");
//! ```

/// Foundation types: assembly, type and member handles
pub mod base;

/// Error taxonomy shared by every layer
pub mod error;

/// Documentation model: symbol graph, store, resolvers
pub mod hir;

/// Documentation file sources
pub mod project;

/// Plain-text rendering
pub mod render;

/// Reference tokens and the documentation XML tree
pub mod syntax;

// Re-export the types most callers need
pub use base::{AssemblyId, MemberId, MemberKind, Symbol, TypeId};
pub use error::{DocError, DocResult};
pub use hir::{
    Documentation, DocumentationReference, DocumentationStore, MemberDocumentation, SymbolGraph, SymbolGraphBuilder,
    TypeDocumentation, TypeKind,
};
pub use project::{DocSource, FsDocSource, MemorySource};
pub use render::{RenderOptions, Renderer};
pub use syntax::MemberIdentifier;
