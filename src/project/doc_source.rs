//! Documentation sources: where an assembly's XML bytes come from.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::error::{DocError, DocResult};
use crate::hir::AssemblyData;

/// Supplies the raw XML documentation of an assembly.
///
/// Called at most once per assembly by the
/// [`DocumentationStore`](crate::hir::DocumentationStore).
pub trait DocSource: Send + Sync {
    fn load(&self, assembly: &AssemblyData) -> DocResult<Vec<u8>>;
}

/// Reads `<module>.xml` next to the assembly module in a base directory.
#[derive(Clone, Debug)]
pub struct FsDocSource {
    base_dir: PathBuf,
}

impl FsDocSource {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Use the directory of the running executable.
    pub fn from_process_dir() -> DocResult<Self> {
        let exe = std::env::current_exe().map_err(|e| DocError::io("<current executable>", e))?;
        let dir = exe.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(Self::new(dir))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// `Zoo.Model.dll` → `<base_dir>/Zoo.Model.xml`.
    pub fn doc_path(&self, assembly: &AssemblyData) -> PathBuf {
        self.base_dir
            .join(Path::new(assembly.module.as_str()).with_extension("xml"))
    }
}

impl DocSource for FsDocSource {
    fn load(&self, assembly: &AssemblyData) -> DocResult<Vec<u8>> {
        let path = self.doc_path(assembly);
        // fs::read closes the handle before returning, on success or failure.
        match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(DocError::DocFileNotFound {
                assembly: assembly.name.clone(),
                path,
            }),
            Err(e) => Err(DocError::io(path, e)),
        }
    }
}

/// Documentation held in memory, keyed by assembly name.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    files: FxHashMap<SmolStr, Arc<[u8]>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, assembly: &str, xml: impl AsRef<[u8]>) -> Self {
        self.insert(assembly, xml);
        self
    }

    pub fn insert(&mut self, assembly: &str, xml: impl AsRef<[u8]>) {
        self.files.insert(SmolStr::new(assembly), Arc::from(xml.as_ref()));
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl DocSource for MemorySource {
    fn load(&self, assembly: &AssemblyData) -> DocResult<Vec<u8>> {
        self.files
            .get(&assembly.name)
            .map(|bytes| bytes.to_vec())
            .ok_or_else(|| DocError::DocFileNotFound {
                assembly: assembly.name.clone(),
                path: Path::new(assembly.module.as_str()).with_extension("xml"),
            })
    }
}
