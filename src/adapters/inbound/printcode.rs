use std::path::PathBuf;

use crate::common::{DomainError, DomainResult};
use crate::domains::mission::PrintPathSource;

/// Filesystem-backed printcode source.
pub struct PrintcodeFile {
    path: PathBuf,
}

impl PrintcodeFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PrintPathSource for PrintcodeFile {
    fn load(&self) -> DomainResult<String> {
        std::fs::read_to_string(&self.path).map_err(|err| {
            DomainError::Infrastructure(format!(
                "failed to read printcode {}: {}",
                self.path.display(),
                err
            ))
        })
    }
}

/// In-memory printcode source, mainly for demos and tests.
pub struct InMemoryPrintcode {
    text: String,
}

impl InMemoryPrintcode {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl PrintPathSource for InMemoryPrintcode {
    fn load(&self) -> DomainResult<String> {
        Ok(self.text.clone())
    }
}
