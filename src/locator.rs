//! Interpreter discovery by filesystem traversal
//!
//! Walks a directory tree depth-first, visiting siblings in lexical order,
//! and returns the first entry whose base name is the platform's interpreter
//! binary. Traversal errors abort the search instead of being skipped.

use std::path::PathBuf;

use log::{debug, info};
use walkdir::WalkDir;

use crate::error::LaunchError;
use crate::platform::{self, PlatformKind};

#[derive(Debug, Clone)]
pub struct InterpreterLocator {
    root: PathBuf,
    kind: PlatformKind,
    prefer_windowless: bool,
}

impl InterpreterLocator {
    pub fn new(root: impl Into<PathBuf>, kind: PlatformKind, prefer_windowless: bool) -> Self {
        Self {
            root: root.into(),
            kind,
            prefer_windowless,
        }
    }

    /// First matching interpreter, or `None` when the tree holds none
    pub fn locate(&self) -> Result<Option<PathBuf>, LaunchError> {
        let wanted = platform::candidate_binary_name(self.kind, self.prefer_windowless);
        debug!("Searching {} for {wanted}", self.root.display());

        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        for entry in walker {
            let entry = entry.map_err(|source| LaunchError::Traversal {
                root: self.root.clone(),
                source,
            })?;
            if entry.file_type().is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            if platform::matches_binary(self.kind, self.prefer_windowless, name) {
                info!("Found interpreter: {}", entry.path().display());
                return Ok(Some(entry.into_path()));
            }
        }

        Ok(None)
    }

    /// Like [`locate`](Self::locate), but a missing interpreter is an error
    pub fn locate_required(&self) -> Result<PathBuf, LaunchError> {
        self.locate()?.ok_or_else(|| LaunchError::InterpreterNotFound {
            root: self.root.clone(),
        })
    }
}
