//! Artifact encoder.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};
use tracing::{debug, info};

use crate::core::{Precision, SampledTopology, SnapshotMetadata, Topology, VertexSnapshot};
use crate::io::format::{ArtifactHeader, PayloadKind};
use crate::io::ArtifactPaths;
use crate::util::{Error, Result, ScalarType};

/// Output stream for writing one artifact.
pub struct OStream {
    writer: BufWriter<File>,
}

impl OStream {
    /// Create a new output stream for the given file path, truncating any
    /// existing artifact.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            writer: BufWriter::with_capacity(2 * 1024 * 1024, file), // 2MB buffer
        })
    }

    /// Write the artifact header.
    pub fn write_header(&mut self, header: &ArtifactHeader) -> Result<()> {
        self.write_bytes(&header.encode())
    }

    /// Write raw bytes.
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        Ok(())
    }

    /// Write a u64 value (little-endian).
    pub fn write_u64(&mut self, value: u64) -> Result<()> {
        self.writer.write_u64::<LittleEndian>(value)?;
        Ok(())
    }

    /// Flush and close the stream.
    pub fn finish(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Which payloads an export writes. Metadata is always written.
#[derive(Clone, Copy, Debug)]
pub struct ExportOptions {
    pub vertices: bool,
    pub edges: bool,
    pub faces: bool,
    /// Vertex coordinate storage precision.
    pub precision: Precision,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            vertices: true,
            edges: true,
            faces: true,
            precision: Precision::Half,
        }
    }
}

impl ExportOptions {
    /// Whether any topology payload is enabled.
    pub fn wants_topology(&self) -> bool {
        self.edges || self.faces
    }
}

/// Output snapshot: writes the artifacts of one export.
///
/// The sidecar is written first, whatever payloads are enabled. There are
/// no partial-success semantics: any failed payload write fails the whole
/// export, and artifacts already on disk are the caller's to clean up.
pub struct OSnapshot {
    paths: ArtifactPaths,
}

impl OSnapshot {
    /// Prepare an export under `dir`, creating the directory if needed.
    pub fn create(dir: impl AsRef<Path>, mesh_name: &str) -> Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        Ok(Self { paths: ArtifactPaths::new(dir, mesh_name) })
    }

    /// The artifact paths this export writes to.
    pub fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }

    /// Write the sidecar and every enabled payload.
    pub fn export(
        &self,
        snapshot: &VertexSnapshot,
        topology: Option<&SampledTopology>,
        options: &ExportOptions,
        metadata: &SnapshotMetadata,
    ) -> Result<()> {
        // Sidecar first, always.
        metadata.write(&self.paths.metadata)?;
        debug!(path = %self.paths.metadata.display(), "wrote metadata sidecar");

        if options.vertices {
            self.write_vertices(snapshot)?;
        }
        if options.wants_topology() {
            let topology = topology.ok_or_else(|| {
                Error::config("edge/face payloads enabled but no topology was sampled")
            })?;
            if options.edges {
                self.write_edges(topology)?;
            }
            if options.faces {
                self.write_faces(topology)?;
            }
        }

        info!(
            mesh = %metadata.mesh,
            frames = metadata.frame_count(),
            vertices = metadata.vertex_count,
            "export complete"
        );
        Ok(())
    }

    fn write_vertices(&self, snapshot: &VertexSnapshot) -> Result<()> {
        let mut out = OStream::create(&self.paths.vertices)?;
        out.write_header(&ArtifactHeader::new(
            PayloadKind::Vertices,
            snapshot.precision().scalar_type(),
            Default::default(),
        ))?;
        out.write_u64(snapshot.frame_count() as u64)?;
        out.write_u64(snapshot.vertex_count() as u64)?;
        out.write_bytes(snapshot.payload_bytes())?;
        out.finish()?;
        debug!(path = %self.paths.vertices.display(), "wrote vertex artifact");
        Ok(())
    }

    fn write_edges(&self, topology: &SampledTopology) -> Result<()> {
        let mut out = OStream::create(&self.paths.edges)?;
        out.write_header(&ArtifactHeader::new(
            PayloadKind::Edges,
            ScalarType::Uint32,
            topology.mode(),
        ))?;
        out.write_u64(topology.num_sets() as u64)?;
        for set in topology.sets() {
            write_edge_set(&mut out, set)?;
        }
        out.finish()?;
        debug!(path = %self.paths.edges.display(), "wrote edge artifact");
        Ok(())
    }

    fn write_faces(&self, topology: &SampledTopology) -> Result<()> {
        let mut out = OStream::create(&self.paths.faces)?;
        out.write_header(&ArtifactHeader::new(
            PayloadKind::Faces,
            ScalarType::Uint32,
            topology.mode(),
        ))?;
        out.write_u64(topology.num_sets() as u64)?;
        for set in topology.sets() {
            write_face_set(&mut out, set)?;
        }
        out.finish()?;
        debug!(path = %self.paths.faces.display(), "wrote face artifact");
        Ok(())
    }
}

fn write_edge_set(out: &mut OStream, set: &Topology) -> Result<()> {
    out.write_u64(set.edges.len() as u64)?;
    out.write_bytes(bytemuck::cast_slice(&set.edges))
}

fn write_face_set(out: &mut OStream, set: &Topology) -> Result<()> {
    out.write_u64(set.faces.len() as u64)?;
    out.write_u64(set.faces.num_indices() as u64)?;
    out.write_bytes(bytemuck::cast_slice(set.faces.starts()))?;
    out.write_bytes(bytemuck::cast_slice(set.faces.indices()))
}
