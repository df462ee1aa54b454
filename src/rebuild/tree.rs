//! Frame reconstruction: single frames and whole-animation trees.

use std::collections::BTreeMap;

use glam::Vec3;
use tracing::info;

use crate::core::{EdgeList, EdgeTopology, FaceTable, FaceTopology};
use crate::io::ISnapshot;
use crate::rebuild::{Mesh, PointCloud};
use crate::util::Result;

/// Geometry of exactly one decoded frame.
#[derive(Clone, Debug, PartialEq)]
pub struct ReconstructedFrame {
    /// 1-based consumer frame number (array row + 1).
    pub number: i32,
    /// Host frame the row was captured from.
    pub source_frame: i32,
    pub positions: Vec<Vec3>,
    pub edges: Option<EdgeList>,
    pub faces: Option<FaceTable>,
}

impl ReconstructedFrame {
    /// Build a mesh from this frame's arrays.
    ///
    /// Requires face data; frames decoded without faces are point data,
    /// see [`points`](Self::points).
    pub fn build_mesh(&self, lenient: bool) -> Result<Mesh> {
        let faces = self.faces.as_ref().ok_or_else(|| {
            crate::util::Error::config("frame was decoded without face data")
        })?;
        Mesh::build(self.positions.clone(), faces, self.edges.as_ref(), lenient)
    }

    /// This frame's positions as a flat point collection.
    pub fn points(&self) -> PointCloud {
        PointCloud { positions: self.positions.clone() }
    }
}

/// Every decoded frame of an animation, keyed by 1-based frame number.
#[derive(Clone, Debug, Default)]
pub struct AnimationTree {
    frames: BTreeMap<i32, ReconstructedFrame>,
}

impl AnimationTree {
    /// Look up a frame by its 1-based number.
    pub fn get(&self, number: i32) -> Option<&ReconstructedFrame> {
        self.frames.get(&number)
    }

    /// Number of frames in the tree.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether the tree holds no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Iterate frames in ascending frame-number order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, &ReconstructedFrame)> {
        self.frames.iter().map(|(&n, f)| (n, f))
    }
}

/// Rebuilds frames from a decoded snapshot.
///
/// Topology payloads are opt-in per side: by default the builder decodes
/// faces (enough to build meshes) and skips edges.
pub struct TreeBuilder<'a> {
    snapshot: &'a ISnapshot,
    with_edges: bool,
    with_faces: bool,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(snapshot: &'a ISnapshot) -> Self {
        Self { snapshot, with_edges: false, with_faces: true }
    }

    /// Also decode the edge artifact.
    pub fn with_edges(mut self, yes: bool) -> Self {
        self.with_edges = yes;
        self
    }

    /// Decode the face artifact (on by default). Without faces, frames
    /// reconstruct as point data only.
    pub fn with_faces(mut self, yes: bool) -> Self {
        self.with_faces = yes;
        self
    }

    /// Reconstruct a single frame by its 1-based number.
    pub fn single(&self, requested: i32) -> Result<ReconstructedFrame> {
        let row = self.snapshot.row_index(requested)?;
        let edges = self.load_edge_topology()?;
        let faces = self.load_face_topology()?;
        self.build_row(row, edges.as_ref(), faces.as_ref())
    }

    /// Reconstruct every stored frame. All-or-nothing: any failing frame
    /// fails the whole tree.
    pub fn whole(&self) -> Result<AnimationTree> {
        let edges = self.load_edge_topology()?;
        let faces = self.load_face_topology()?;

        let mut frames = BTreeMap::new();
        for row in 0..self.snapshot.frame_count() {
            let frame = self.build_row(row, edges.as_ref(), faces.as_ref())?;
            frames.insert(frame.number, frame);
        }

        info!(
            mesh = %self.snapshot.metadata().mesh,
            frames = frames.len(),
            "reconstructed animation tree"
        );
        Ok(AnimationTree { frames })
    }

    fn load_edge_topology(&self) -> Result<Option<EdgeTopology>> {
        if self.with_edges {
            Ok(Some(self.snapshot.load_edges()?))
        } else {
            Ok(None)
        }
    }

    fn load_face_topology(&self) -> Result<Option<FaceTopology>> {
        if self.with_faces {
            Ok(Some(self.snapshot.load_faces()?))
        } else {
            Ok(None)
        }
    }

    fn build_row(
        &self,
        row: usize,
        edges: Option<&EdgeTopology>,
        faces: Option<&FaceTopology>,
    ) -> Result<ReconstructedFrame> {
        let positions = self.snapshot.positions_at_row(row)?;
        let edges = match edges {
            Some(topo) => Some(topo.for_row(row)?.clone()),
            None => None,
        };
        let faces = match faces {
            Some(topo) => Some(topo.for_row(row)?.clone()),
            None => None,
        };
        Ok(ReconstructedFrame {
            number: row as i32 + 1,
            source_frame: self.snapshot.source_frame(row),
            positions,
            edges,
            faces,
        })
    }
}
