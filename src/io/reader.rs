//! Artifact decoder.

use std::fs::File;
use std::io::{Cursor, Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::Arc;

use byteorder::{LittleEndian, ReadBytesExt};
use glam::Vec3;
use half::f16;
use memmap2::Mmap;
use parking_lot::RwLock;
use tracing::debug;

use crate::core::{
    EdgeTopology, FaceTable, FaceTopology, SnapshotMetadata, TopologyMode,
};
use crate::io::format::{ArtifactHeader, PayloadKind, HEADER_SIZE};
use crate::io::ArtifactPaths;
use crate::util::{Error, Result, ScalarType};

/// Input stream over one artifact.
/// Supports both memory-mapped and buffered I/O modes.
#[derive(Debug)]
pub struct IStream {
    inner: StreamsInner,
    size: u64,
}

#[derive(Debug)]
enum StreamsInner {
    /// Memory-mapped file (preferred: single-frame reads touch only that
    /// frame's byte range)
    Mmap(Mmap),
    /// Buffered file access (fallback)
    File(Arc<RwLock<File>>),
}

impl IStream {
    /// Open an artifact for reading, memory-mapped when the `mmap` feature
    /// is enabled.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_opts(path, cfg!(feature = "mmap"))
    }

    /// Open an artifact with explicit mapping choice.
    pub fn open_opts(path: impl AsRef<Path>, use_mmap: bool) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound(path.to_path_buf())
            } else {
                Error::Io(e)
            }
        })?;

        let size = file.metadata()?.len();
        if size < HEADER_SIZE as u64 {
            return Err(Error::UnexpectedEof(size));
        }

        let inner = if use_mmap {
            // Safety: the file is opened read-only
            let mmap = unsafe { Mmap::map(&file) }
                .map_err(|e| Error::MmapFailed(e.to_string()))?;
            StreamsInner::Mmap(mmap)
        } else {
            StreamsInner::File(Arc::new(RwLock::new(file)))
        };

        Ok(Self { inner, size })
    }

    /// Total artifact size in bytes.
    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Read `len` bytes starting at `pos`.
    pub fn read_at(&self, pos: u64, len: usize) -> Result<Vec<u8>> {
        let end = pos + len as u64;
        if end > self.size {
            return Err(Error::UnexpectedEof(self.size));
        }
        match &self.inner {
            StreamsInner::Mmap(mmap) => Ok(mmap[pos as usize..end as usize].to_vec()),
            StreamsInner::File(file) => {
                let mut f = file.write();
                let mut buf = vec![0u8; len];
                f.seek(SeekFrom::Start(pos))?;
                f.read_exact(&mut buf)?;
                Ok(buf)
            }
        }
    }
}

/// Input snapshot: decodes the artifacts of one export.
///
/// Opens the sidecar and the vertex artifact eagerly; edge and face
/// artifacts are read on request. All consumer-facing frame numbers are
/// 1-based and translated to 0-based array rows at this boundary.
#[derive(Debug)]
pub struct ISnapshot {
    metadata: SnapshotMetadata,
    paths: ArtifactPaths,
    vertices: IStream,
    scalar: ScalarType,
    frame_count: usize,
    vertex_count: usize,
}

impl ISnapshot {
    /// Open an export by its vertex artifact path instead of directory +
    /// mesh name.
    pub fn open_vertices(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_suffix(crate::io::format::VERTICES_SUFFIX))
            .ok_or_else(|| {
                Error::invalid(format!(
                    "{} is not a vertex artifact path",
                    path.display()
                ))
            })?;
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::open(dir, name)
    }

    /// Open the export for `mesh_name` under `dir`.
    pub fn open(dir: impl AsRef<Path>, mesh_name: &str) -> Result<Self> {
        let paths = ArtifactPaths::new(dir.as_ref(), mesh_name);
        let metadata = SnapshotMetadata::read(&paths.metadata)?;

        let vertices = IStream::open(&paths.vertices)?;
        let header = ArtifactHeader::parse(&vertices.read_at(0, HEADER_SIZE)?)?;
        if header.payload != PayloadKind::Vertices {
            return Err(Error::invalid(format!(
                "vertex artifact carries {} payload",
                header.payload
            )));
        }
        if !matches!(header.scalar, ScalarType::Float16 | ScalarType::Float32) {
            return Err(Error::invalid(format!(
                "vertex artifact has non-float scalar type {}",
                header.scalar
            )));
        }

        let mut dims = Cursor::new(vertices.read_at(HEADER_SIZE as u64, 16)?);
        let frame_count = dims.read_u64::<LittleEndian>()? as usize;
        let vertex_count = dims.read_u64::<LittleEndian>()? as usize;

        if frame_count != metadata.frame_count() {
            return Err(Error::ShapeMismatch {
                expected: metadata.frame_count(),
                actual: frame_count,
                context: "vertex artifact frame count vs sidecar frame list".into(),
            });
        }
        if vertex_count != metadata.vertex_count {
            return Err(Error::ShapeMismatch {
                expected: metadata.vertex_count,
                actual: vertex_count,
                context: "vertex artifact vertex count vs sidecar".into(),
            });
        }

        let expected_size =
            HEADER_SIZE as u64 + 16 + (frame_count * vertex_count * 3 * header.scalar.num_bytes()) as u64;
        if vertices.size() < expected_size {
            return Err(Error::UnexpectedEof(vertices.size()));
        }

        debug!(
            mesh = %metadata.mesh,
            frames = frame_count,
            vertices = vertex_count,
            scalar = %header.scalar,
            "opened snapshot"
        );

        Ok(Self {
            metadata,
            paths,
            vertices,
            scalar: header.scalar,
            frame_count,
            vertex_count,
        })
    }

    /// The sidecar of this export.
    pub fn metadata(&self) -> &SnapshotMetadata {
        &self.metadata
    }

    /// Number of captured frames.
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Vertices per frame.
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Translate a 1-based consumer frame number into a 0-based array row.
    pub fn row_index(&self, requested: i32) -> Result<usize> {
        if requested < 1 || requested as usize > self.frame_count {
            return Err(Error::FrameOutOfRange {
                frame: requested,
                count: self.frame_count,
            });
        }
        Ok(requested as usize - 1)
    }

    /// The host frame number a row was captured from.
    pub fn source_frame(&self, row: usize) -> i32 {
        self.metadata.frames[row]
    }

    /// Vertex positions of array row `row`, upconverted to f32.
    pub fn positions_at_row(&self, row: usize) -> Result<Vec<Vec3>> {
        if row >= self.frame_count {
            return Err(Error::FrameOutOfRange {
                frame: row as i32 + 1,
                count: self.frame_count,
            });
        }
        let span = self.vertex_count * 3 * self.scalar.num_bytes();
        let pos = (HEADER_SIZE + 16 + row * span) as u64;
        let bytes = self.vertices.read_at(pos, span)?;

        let mut rdr = Cursor::new(bytes);
        let mut positions = Vec::with_capacity(self.vertex_count);
        match self.scalar {
            ScalarType::Float16 => {
                for _ in 0..self.vertex_count {
                    let x = f16::from_bits(rdr.read_u16::<LittleEndian>()?).to_f32();
                    let y = f16::from_bits(rdr.read_u16::<LittleEndian>()?).to_f32();
                    let z = f16::from_bits(rdr.read_u16::<LittleEndian>()?).to_f32();
                    positions.push(Vec3::new(x, y, z));
                }
            }
            ScalarType::Float32 => {
                for _ in 0..self.vertex_count {
                    let x = rdr.read_f32::<LittleEndian>()?;
                    let y = rdr.read_f32::<LittleEndian>()?;
                    let z = rdr.read_f32::<LittleEndian>()?;
                    positions.push(Vec3::new(x, y, z));
                }
            }
            ScalarType::Uint32 => unreachable!("rejected at open"),
        }
        Ok(positions)
    }

    /// Vertex positions for a 1-based consumer frame number.
    pub fn positions(&self, requested: i32) -> Result<Vec<Vec3>> {
        self.positions_at_row(self.row_index(requested)?)
    }

    /// Load the edge artifact, resolved by topology mode.
    pub fn load_edges(&self) -> Result<EdgeTopology> {
        let (header, mut rdr) = self.open_topology_artifact(&self.paths.edges, PayloadKind::Edges)?;
        let set_count = self.checked_set_count(&mut rdr, header.mode, "edge")?;

        let mut sets = Vec::with_capacity(set_count);
        for _ in 0..set_count {
            let edge_count = rdr.read_u64::<LittleEndian>()? as usize;
            let mut edges = Vec::with_capacity(edge_count);
            for _ in 0..edge_count {
                let a = rdr.read_u32::<LittleEndian>()?;
                let b = rdr.read_u32::<LittleEndian>()?;
                edges.push([a, b]);
            }
            sets.push(edges);
        }

        Ok(match header.mode {
            TopologyMode::Static => EdgeTopology::Static(
                sets.pop().ok_or_else(|| Error::invalid("edge artifact holds no set"))?,
            ),
            TopologyMode::PerFrame => EdgeTopology::PerFrame(sets),
        })
    }

    /// Load the face artifact, resolved by topology mode.
    pub fn load_faces(&self) -> Result<FaceTopology> {
        let (header, mut rdr) = self.open_topology_artifact(&self.paths.faces, PayloadKind::Faces)?;
        let set_count = self.checked_set_count(&mut rdr, header.mode, "face")?;

        let mut sets = Vec::with_capacity(set_count);
        for _ in 0..set_count {
            let face_count = rdr.read_u64::<LittleEndian>()? as usize;
            let index_count = rdr.read_u64::<LittleEndian>()? as usize;
            let mut starts = Vec::with_capacity(face_count + 1);
            for _ in 0..face_count + 1 {
                starts.push(rdr.read_u32::<LittleEndian>()?);
            }
            let mut indices = Vec::with_capacity(index_count);
            for _ in 0..index_count {
                indices.push(rdr.read_u32::<LittleEndian>()?);
            }
            sets.push(FaceTable::from_parts(starts, indices)?);
        }

        Ok(match header.mode {
            TopologyMode::Static => FaceTopology::Static(
                sets.pop().ok_or_else(|| Error::invalid("face artifact holds no set"))?,
            ),
            TopologyMode::PerFrame => FaceTopology::PerFrame(sets),
        })
    }

    /// Open a topology artifact and validate payload identity, scalar type,
    /// and mode agreement with the sidecar.
    fn open_topology_artifact(
        &self,
        path: &Path,
        expected: PayloadKind,
    ) -> Result<(ArtifactHeader, Cursor<Vec<u8>>)> {
        let stream = IStream::open(path)?;
        let bytes = stream.read_at(0, stream.size() as usize)?;
        let header = ArtifactHeader::parse(&bytes)?;

        if header.payload != expected {
            return Err(Error::invalid(format!(
                "{expected} artifact carries {} payload",
                header.payload
            )));
        }
        if header.scalar != ScalarType::Uint32 {
            return Err(Error::invalid(format!(
                "{expected} artifact has scalar type {}, expected uint32",
                header.scalar
            )));
        }
        if header.mode != self.metadata.topology_mode {
            return Err(Error::TopologyIncompatible {
                stored: header.mode.to_string(),
                requested: self.metadata.topology_mode.to_string(),
            });
        }

        let mut rdr = Cursor::new(bytes);
        rdr.set_position(HEADER_SIZE as u64);
        Ok((header, rdr))
    }

    /// Read and validate a topology artifact's set count against its mode.
    fn checked_set_count(
        &self,
        rdr: &mut Cursor<Vec<u8>>,
        mode: TopologyMode,
        what: &str,
    ) -> Result<usize> {
        let set_count = rdr.read_u64::<LittleEndian>()? as usize;
        let expected = match mode {
            TopologyMode::Static => 1,
            TopologyMode::PerFrame => self.frame_count,
        };
        if set_count != expected {
            return Err(Error::ShapeMismatch {
                expected,
                actual: set_count,
                context: format!("{what} set count for {mode} topology"),
            });
        }
        Ok(set_count)
    }
}
