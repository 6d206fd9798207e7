use std::path::{Path, PathBuf};

/// Finds an executable by name.
pub trait ProgramLocator {
    fn locate(&self, name: &str) -> Option<PathBuf>;
}

/// Searches `PATH`, or accepts a pinned path when one is configured.
#[derive(Debug, Default, Clone)]
pub struct SystemLocator {
    pinned: Option<PathBuf>,
}

impl SystemLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `path` instead of searching. It still has to exist.
    pub fn pinned<P: AsRef<Path>>(path: P) -> Self {
        Self {
            pinned: Some(path.as_ref().to_path_buf()),
        }
    }
}

impl ProgramLocator for SystemLocator {
    fn locate(&self, name: &str) -> Option<PathBuf> {
        if let Some(path) = &self.pinned {
            if path.is_file() {
                return Some(path.clone());
            }
            log::debug!("Pinned {} at {} does not exist", name, path.display());
            return None;
        }

        match which::which(name) {
            Ok(path) => Some(path),
            Err(e) => {
                log::debug!("Could not find program {}: {}", name, e);
                None
            }
        }
    }
}
