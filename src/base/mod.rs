//! Foundation types for the documentation engine.
//!
//! This module provides the identifiers used throughout the crate:
//! - [`AssemblyId`] - Registered assembly handles
//! - [`TypeId`], [`MemberId`] - Symbol handles within an assembly
//! - [`Symbol`] - Either of the above
//!
//! This module has NO dependencies on other crate modules.

mod ids;

pub use ids::{AssemblyId, MemberId, MemberKind, Symbol, TypeId};
