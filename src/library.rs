//! A folder of PLY files to pick from.

use std::fs::{ self, File };
use std::path::{ Path, PathBuf };

use tracing::{ debug, instrument, warn };

use crate::config::ViewerConfig;
use crate::errors::LibraryError;
use crate::parser::Parser;
use crate::ply::{ PointCloud, Sample };
use crate::scene::CloudSlot;

const PLY_EXTENSION: &str = ".ply";

/// Lists and loads the `.ply` files of one folder.
///
/// The folder is whatever the caller configured; no fallback locations are tried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlyLibrary {
    dir: PathBuf,
}

impl PlyLibrary {
    /// Library over `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        PlyLibrary { dir: dir.into() }
    }

    /// Library over the configured `ply_dir`.
    pub fn from_config(config: &ViewerConfig) -> Self {
        Self::new(config.ply_dir.clone())
    }

    /// The folder.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Names of the regular files ending in `.ply`, sorted.
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    pub fn list(&self) -> Result<Vec<String>, LibraryError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if name.ends_with(PLY_EXTENSION) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        debug!(count = names.len(), "listed PLY files");
        Ok(names)
    }

    /// Decodes the file `name` of this folder.
    ///
    /// `name` must be a bare file name ending in `.ply`. The file is closed before
    /// this returns, on success and on every error.
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    pub fn open<S: Sample>(&self, name: &str) -> Result<PointCloud<S>, LibraryError> {
        let path = self.resolve(name)?;
        let file = File::open(&path)?;
        Parser::<S>::new().read_ply(file).map_err(|e| {
            warn!(kind = %e.kind(), "failed to decode {}: {}", path.display(), e);
            LibraryError::from(e)
        })
    }

    /// Decodes the file `name` and installs it in `slot`, returning the new revision.
    ///
    /// On failure the cloud in `slot` stays as it was.
    pub fn load_into<S: Sample>(&self, name: &str, slot: &CloudSlot<S>) -> Result<u64, LibraryError> {
        let cloud = self.open::<S>(name)?;
        Ok(slot.replace(cloud))
    }

    fn resolve(&self, name: &str) -> Result<PathBuf, LibraryError> {
        let bare = Path::new(name).file_name().and_then(|n| n.to_str()) == Some(name);
        let path = self.dir.join(name);
        if !bare || !name.ends_with(PLY_EXTENSION) || !path.is_file() {
            return Err(LibraryError::NotFound { name: name.to_string() });
        }
        Ok(path)
    }
}
