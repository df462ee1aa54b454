//! Artifact I/O: the on-disk format, the encoder ([`OSnapshot`]) and the
//! decoder ([`ISnapshot`]).

pub mod format;
mod reader;
mod writer;

pub use reader::{ISnapshot, IStream};
pub use writer::{ExportOptions, OSnapshot, OStream};

use std::path::{Path, PathBuf};

/// Make a mesh identifier safe for use in artifact filenames.
///
/// Host identifiers like `Cube.001` contain separators that do not belong
/// in paths; everything outside `[A-Za-z0-9_-]` becomes `_`.
pub fn sanitize_mesh_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect();
    if sanitized.is_empty() {
        "mesh".to_string()
    } else {
        sanitized
    }
}

/// The four artifact paths of one export, under a shared base directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub vertices: PathBuf,
    pub edges: PathBuf,
    pub faces: PathBuf,
    pub metadata: PathBuf,
}

impl ArtifactPaths {
    /// Paths for `mesh_name` under `dir`. The name is sanitized first.
    pub fn new(dir: impl AsRef<Path>, mesh_name: &str) -> Self {
        let dir = dir.as_ref();
        let name = sanitize_mesh_name(mesh_name);
        Self {
            vertices: dir.join(format!("{name}{}", format::VERTICES_SUFFIX)),
            edges: dir.join(format!("{name}{}", format::EDGES_SUFFIX)),
            faces: dir.join(format!("{name}{}", format::FACES_SUFFIX)),
            metadata: dir.join(format!("{name}{}", format::METADATA_SUFFIX)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize_mesh_name("Cube.001"), "Cube_001");
        assert_eq!(sanitize_mesh_name("body/left arm"), "body_left_arm");
        assert_eq!(sanitize_mesh_name("plain_name-2"), "plain_name-2");
        assert_eq!(sanitize_mesh_name(""), "mesh");
    }

    #[test]
    fn test_artifact_paths() {
        let paths = ArtifactPaths::new("/tmp/out", "Cube.001");
        assert_eq!(paths.vertices, PathBuf::from("/tmp/out/Cube_001_vertices.msa"));
        assert_eq!(paths.edges, PathBuf::from("/tmp/out/Cube_001_edges.msa"));
        assert_eq!(paths.faces, PathBuf::from("/tmp/out/Cube_001_faces.msa"));
        assert_eq!(paths.metadata, PathBuf::from("/tmp/out/Cube_001_metadata.json"));
    }
}
