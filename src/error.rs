//! Errors raised while building or querying documentation.

use std::path::PathBuf;
use std::sync::Arc;

use smol_str::SmolStr;
use thiserror::Error;

use crate::base::{AssemblyId, MemberId, TypeId};

#[derive(Error, Debug, Clone)]
pub enum DocError {
    #[error("documentation file for assembly '{assembly}' not found: {}", path.display())]
    DocFileNotFound { assembly: SmolStr, path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },

    #[error("malformed documentation XML for assembly '{assembly}': {message}")]
    Xml { assembly: SmolStr, message: String },

    #[error("malformed reference '{0}'")]
    MalformedReference(String),

    #[error("unsupported reference prefix in '{0}'")]
    UnsupportedReference(String),

    #[error("documented type '{name}' does not exist in assembly '{assembly}'")]
    UnknownType { assembly: SmolStr, name: String },

    #[error("documented member '{member}' does not exist on type '{ty}'")]
    UnknownMember { ty: SmolStr, member: String },

    #[error("type '{0}' is documented more than once")]
    DuplicateType(SmolStr),

    #[error("member {member:?} is declared on {declaring:?}, not on {requested:?}")]
    OwnershipMismatch {
        member: MemberId,
        declaring: TypeId,
        requested: TypeId,
    },

    #[error("reference '{reference}' is ambiguous between {candidates} members")]
    AmbiguousOverload { reference: String, candidates: usize },

    #[error("{0} is not registered in the symbol graph")]
    UnknownAssembly(AssemblyId),
}

impl DocError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DocError::Io {
            path: path.into(),
            source: Arc::new(source),
        }
    }

    /// True for the missing-file class of error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DocError::DocFileNotFound { .. })
    }
}

pub type DocResult<T> = Result<T, DocError>;
