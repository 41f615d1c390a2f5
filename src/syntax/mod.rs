//! Syntax layer: reference tokens and documentation XML.
//!
//! Nothing here knows about the symbol graph.

pub mod cref;
pub mod xml;

pub use cref::{MemberIdentifier, RefPrefix};
pub use xml::{DocElement, DocNode, XmlError};
