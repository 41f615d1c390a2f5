//! Project glue: locating documentation files.

mod doc_source;

pub use doc_source::{DocSource, FsDocSource, MemorySource};
