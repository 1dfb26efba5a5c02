//! @ai:module:intent Per-request temporary source artifacts with guaranteed cleanup
//! @ai:module:layer infrastructure
//! @ai:module:public_api TempArtifacts
//! @ai:module:stateless false

use std::io;
use std::path::PathBuf;
use tracing::{debug, warn};
use uuid::Uuid;

/// @ai:intent Files written for one request, removed on cleanup or drop
/// @ai:invariant only paths created through this value are ever deleted
#[derive(Debug)]
pub struct TempArtifacts {
    root: PathBuf,
    created: Vec<PathBuf>,
}

impl TempArtifacts {
    /// @ai:intent Track artifacts under a shared temp directory
    /// @ai:effects pure
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            created: Vec::new(),
        }
    }

    /// @ai:intent Write code to a uniquely named file `temp_code_<uuid>.<ext>`
    /// @ai:post the returned path is tracked for cleanup
    /// @ai:effects fs:write
    pub fn write_source(&mut self, code: &str, extension: &str) -> io::Result<PathBuf> {
        std::fs::create_dir_all(&self.root)?;

        let path = self
            .root
            .join(format!("temp_code_{}.{}", Uuid::new_v4(), extension));

        std::fs::write(&path, code)?;
        debug!(path = %path.display(), "Materialized source artifact");
        self.created.push(path.clone());

        Ok(path)
    }

    #[cfg(test)]
    fn paths(&self) -> &[PathBuf] {
        &self.created
    }

    /// @ai:intent Delete every tracked artifact; idempotent
    /// @ai:effects fs:write
    pub fn cleanup(&mut self) {
        for path in self.created.drain(..) {
            let removed = if path.is_dir() {
                std::fs::remove_dir_all(&path)
            } else {
                std::fs::remove_file(&path)
            };

            match removed {
                Ok(()) => debug!(path = %path.display(), "Removed artifact"),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove artifact"),
            }
        }
    }
}

impl Drop for TempArtifacts {
    fn drop(&mut self) {
        self.cleanup();
    }
}
