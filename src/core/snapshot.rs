//! Per-frame vertex position storage.

use glam::Vec3;
use half::f16;
use serde::{Deserialize, Serialize};

use crate::frame::FrameSet;
use crate::util::{Error, Result, ScalarType};

/// Storage precision for vertex coordinates.
///
/// `Half` quantizes to 16-bit floats (~3 significant decimal digits,
/// relative error around 1e-3) to halve the vertex artifact size. Callers
/// must treat round-tripped half coordinates as approximate. `Full` keeps
/// 32-bit floats and round-trips exactly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    #[default]
    Half,
    Full,
}

impl Precision {
    /// The artifact scalar type this precision stores.
    #[inline]
    pub const fn scalar_type(self) -> ScalarType {
        match self {
            Self::Half => ScalarType::Float16,
            Self::Full => ScalarType::Float32,
        }
    }

    /// The precision stored by an artifact scalar type, if it is a vertex type.
    pub const fn from_scalar_type(st: ScalarType) -> Option<Self> {
        match st {
            ScalarType::Float16 => Some(Self::Half),
            ScalarType::Float32 => Some(Self::Full),
            ScalarType::Uint32 => None,
        }
    }
}

#[derive(Clone, Debug)]
enum SnapshotData {
    Half(Vec<f16>),
    Full(Vec<f32>),
}

/// Vertex positions of every captured frame, frame-major.
///
/// Logical shape is `(frame, vertex, xyz)`. The vertex count is fixed for
/// the whole snapshot; a frame with a different count is rejected.
#[derive(Clone, Debug)]
pub struct VertexSnapshot {
    frames: FrameSet,
    vertex_count: usize,
    data: SnapshotData,
}

impl VertexSnapshot {
    /// Create an empty snapshot for meshes of `vertex_count` vertices.
    pub fn new(vertex_count: usize, precision: Precision) -> Self {
        let data = match precision {
            Precision::Half => SnapshotData::Half(Vec::new()),
            Precision::Full => SnapshotData::Full(Vec::new()),
        };
        Self { frames: Vec::new(), vertex_count, data }
    }

    /// Append one frame of world-space positions.
    pub fn push_frame(&mut self, frame: i32, positions: &[Vec3]) -> Result<()> {
        if positions.len() != self.vertex_count {
            return Err(Error::ShapeMismatch {
                expected: self.vertex_count,
                actual: positions.len(),
                context: format!("vertex count at frame {frame}"),
            });
        }
        match &mut self.data {
            SnapshotData::Half(buf) => {
                buf.reserve(positions.len() * 3);
                for p in positions {
                    buf.push(f16::from_f32(p.x));
                    buf.push(f16::from_f32(p.y));
                    buf.push(f16::from_f32(p.z));
                }
            }
            SnapshotData::Full(buf) => {
                buf.reserve(positions.len() * 3);
                for p in positions {
                    buf.extend_from_slice(&[p.x, p.y, p.z]);
                }
            }
        }
        self.frames.push(frame);
        Ok(())
    }

    /// Host frame numbers in capture order.
    pub fn frames(&self) -> &FrameSet {
        &self.frames
    }

    /// Number of captured frames.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Vertices per frame.
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Storage precision of this snapshot.
    pub fn precision(&self) -> Precision {
        match self.data {
            SnapshotData::Half(_) => Precision::Half,
            SnapshotData::Full(_) => Precision::Full,
        }
    }

    /// Positions of array row `row`, upconverted to f32.
    pub fn row(&self, row: usize) -> Vec<Vec3> {
        let span = self.vertex_count * 3;
        let base = row * span;
        match &self.data {
            SnapshotData::Half(buf) => buf[base..base + span]
                .chunks_exact(3)
                .map(|c| Vec3::new(c[0].to_f32(), c[1].to_f32(), c[2].to_f32()))
                .collect(),
            SnapshotData::Full(buf) => buf[base..base + span]
                .chunks_exact(3)
                .map(|c| Vec3::new(c[0], c[1], c[2]))
                .collect(),
        }
    }

    /// Raw payload bytes for the encoder (native little-endian layout).
    pub fn payload_bytes(&self) -> &[u8] {
        match &self.data {
            SnapshotData::Half(buf) => bytemuck::cast_slice(buf),
            SnapshotData::Full(buf) => bytemuck::cast_slice(buf),
        }
    }
}
