//! Snapshot metadata sidecar.
//!
//! One JSON document per export describing the capture: which mesh, which
//! frames, what shape the arrays have, and how topology was sampled. The
//! sidecar is always written, whatever payloads are enabled, and is the
//! decode side's source of truth for frame numbering.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::core::{Precision, SampledTopology, TopologyMode, VertexSnapshot};
use crate::util::{Error, Result};

/// Description of one exported snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// Host identifier of the captured mesh.
    pub mesh: String,
    /// How connectivity was sampled.
    pub topology_mode: TopologyMode,
    /// Host frame numbers in capture order. Row `i` of every artifact
    /// belongs to `frames[i]`.
    pub frames: Vec<i32>,
    /// Vertices per frame.
    pub vertex_count: usize,
    /// Edge count at the first captured frame.
    pub edge_count: usize,
    /// Face count at the first captured frame.
    pub face_count: usize,
    /// Vertex coordinate precision.
    pub precision: Precision,
    /// Export time, seconds since the unix epoch.
    pub exported_at: u64,
}

impl SnapshotMetadata {
    /// Assemble the sidecar for a capture.
    pub fn describe(
        mesh: &str,
        snapshot: &VertexSnapshot,
        topology: Option<&SampledTopology>,
    ) -> Self {
        let first = topology.and_then(|t| t.first());
        Self {
            mesh: mesh.to_string(),
            topology_mode: topology.map(|t| t.mode()).unwrap_or_default(),
            frames: snapshot.frames().clone(),
            vertex_count: snapshot.vertex_count(),
            edge_count: first.map(|t| t.edges.len()).unwrap_or(0),
            face_count: first.map(|t| t.faces.len()).unwrap_or(0),
            precision: snapshot.precision(),
            exported_at: unix_now(),
        }
    }

    /// Number of captured frames.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Write the sidecar as pretty-printed JSON.
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| Error::InvalidMetadata(e.to_string()))?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Read a sidecar back.
    pub fn read(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound(path.to_path_buf())
            } else {
                Error::Io(e)
            }
        })?;
        serde_json::from_str(&json).map_err(|e| Error::InvalidMetadata(e.to_string()))
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
