//! Mesh connectivity: edge lists and variable-arity face tables.

use serde::{Deserialize, Serialize};

use crate::util::{Error, Result};

/// Edge list: one pair of vertex indices per edge.
pub type EdgeList = Vec<[u32; 2]>;

/// Variable-length face records, CSR style.
///
/// Face `i` owns the slice `indices[starts[i] as usize .. starts[i + 1] as usize]`.
/// This keeps triangles, quads, and n-gons in one flat buffer without any
/// per-record object encoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FaceTable {
    starts: Vec<u32>,
    indices: Vec<u32>,
}

impl FaceTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self { starts: vec![0], indices: Vec::new() }
    }

    /// Rebuild a table from its raw offset and index buffers.
    ///
    /// `starts` must begin at 0, be non-decreasing, and end at `indices.len()`.
    pub fn from_parts(starts: Vec<u32>, indices: Vec<u32>) -> Result<Self> {
        if starts.first() != Some(&0) {
            return Err(Error::invalid("face offsets must start at 0"));
        }
        if starts.windows(2).any(|w| w[0] > w[1]) {
            return Err(Error::invalid("face offsets must be non-decreasing"));
        }
        if starts.last().copied() != Some(indices.len() as u32) {
            return Err(Error::invalid(format!(
                "last face offset {} does not match index count {}",
                starts.last().copied().unwrap_or(0),
                indices.len()
            )));
        }
        Ok(Self { starts, indices })
    }

    /// Append one face record.
    pub fn push_face(&mut self, face: &[u32]) {
        self.indices.extend_from_slice(face);
        self.starts.push(self.indices.len() as u32);
    }

    /// Number of faces.
    pub fn len(&self) -> usize {
        self.starts.len() - 1
    }

    /// Whether the table holds no faces.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of vertex indices across all faces.
    pub fn num_indices(&self) -> usize {
        self.indices.len()
    }

    /// The vertex indices of face `i`.
    pub fn face(&self, i: usize) -> &[u32] {
        &self.indices[self.starts[i] as usize..self.starts[i + 1] as usize]
    }

    /// Iterate over all face records.
    pub fn iter(&self) -> impl Iterator<Item = &[u32]> {
        (0..self.len()).map(|i| self.face(i))
    }

    /// Raw offsets buffer (`len() + 1` entries).
    pub fn starts(&self) -> &[u32] {
        &self.starts
    }

    /// Raw flat index buffer.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }
}

impl Default for FaceTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Full connectivity of a mesh at one point in time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Topology {
    pub edges: EdgeList,
    pub faces: FaceTable,
}

impl Topology {
    /// Largest vertex index referenced by any edge or face, if any.
    pub fn max_vertex_index(&self) -> Option<u32> {
        let edge_max = self.edges.iter().flatten().copied().max();
        let face_max = self.faces.indices().iter().copied().max();
        edge_max.into_iter().chain(face_max).max()
    }
}

/// Whether connectivity is captured once for the whole animation or once
/// per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TopologyMode {
    /// Single capture, shared by every frame.
    #[default]
    Static,
    /// One capture per frame, tolerating structural changes.
    PerFrame,
}

impl TopologyMode {
    /// Stable on-disk code.
    #[inline]
    pub const fn to_u8(self) -> u8 {
        match self {
            Self::Static => 0,
            Self::PerFrame => 1,
        }
    }

    /// Convert from the on-disk code.
    pub const fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Static),
            1 => Some(Self::PerFrame),
            _ => None,
        }
    }

    /// Name of this mode as a string.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::PerFrame => "per-frame",
        }
    }
}

impl std::fmt::Display for TopologyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Connectivity captured for an animation.
#[derive(Clone, Debug)]
pub enum SampledTopology {
    /// One set shared across all frames.
    Static(Topology),
    /// One set per captured frame, in frame order.
    PerFrame(Vec<Topology>),
}

impl SampledTopology {
    /// The mode tag of this capture.
    pub fn mode(&self) -> TopologyMode {
        match self {
            Self::Static(_) => TopologyMode::Static,
            Self::PerFrame(_) => TopologyMode::PerFrame,
        }
    }

    /// Number of stored sets: 1 for static, frame count for per-frame.
    pub fn num_sets(&self) -> usize {
        match self {
            Self::Static(_) => 1,
            Self::PerFrame(sets) => sets.len(),
        }
    }

    /// The first stored set. Used for sidecar counts.
    pub fn first(&self) -> Option<&Topology> {
        match self {
            Self::Static(t) => Some(t),
            Self::PerFrame(sets) => sets.first(),
        }
    }

    /// Iterate over all stored sets in order.
    pub fn sets(&self) -> impl Iterator<Item = &Topology> {
        match self {
            Self::Static(t) => std::slice::from_ref(t).iter(),
            Self::PerFrame(sets) => sets.iter(),
        }
    }
}

/// Decoded edge connectivity, resolved by topology mode.
#[derive(Clone, Debug, PartialEq)]
pub enum EdgeTopology {
    Static(EdgeList),
    PerFrame(Vec<EdgeList>),
}

impl EdgeTopology {
    /// The edge list that applies to array row `row`.
    pub fn for_row(&self, row: usize) -> Result<&EdgeList> {
        match self {
            Self::Static(edges) => Ok(edges),
            Self::PerFrame(sets) => sets.get(row).ok_or_else(|| Error::ShapeMismatch {
                expected: sets.len(),
                actual: row + 1,
                context: "per-frame edge set index".into(),
            }),
        }
    }
}

/// Decoded face connectivity, resolved by topology mode.
#[derive(Clone, Debug, PartialEq)]
pub enum FaceTopology {
    Static(FaceTable),
    PerFrame(Vec<FaceTable>),
}

impl FaceTopology {
    /// The face table that applies to array row `row`.
    pub fn for_row(&self, row: usize) -> Result<&FaceTable> {
        match self {
            Self::Static(faces) => Ok(faces),
            Self::PerFrame(sets) => sets.get(row).ok_or_else(|| Error::ShapeMismatch {
                expected: sets.len(),
                actual: row + 1,
                context: "per-frame face set index".into(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_and_tri() -> FaceTable {
        let mut faces = FaceTable::new();
        faces.push_face(&[0, 1, 2, 3]);
        faces.push_face(&[3, 2, 4]);
        faces
    }

    #[test]
    fn test_face_table_push_and_read() {
        let faces = quad_and_tri();
        assert_eq!(faces.len(), 2);
        assert_eq!(faces.num_indices(), 7);
        assert_eq!(faces.face(0), &[0, 1, 2, 3]);
        assert_eq!(faces.face(1), &[3, 2, 4]);

        let records: Vec<&[u32]> = faces.iter().collect();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_face_table_from_parts() {
        let faces = FaceTable::from_parts(vec![0, 4, 7], vec![0, 1, 2, 3, 3, 2, 4]).unwrap();
        assert_eq!(faces, quad_and_tri());

        assert!(FaceTable::from_parts(vec![1, 4], vec![0, 1, 2, 3]).is_err());
        assert!(FaceTable::from_parts(vec![0, 4, 2], vec![0, 1, 2, 3]).is_err());
        assert!(FaceTable::from_parts(vec![0, 3], vec![0, 1, 2, 3]).is_err());
    }

    #[test]
    fn test_topology_max_index() {
        let topo = Topology { edges: vec![[0, 9]], faces: quad_and_tri() };
        assert_eq!(topo.max_vertex_index(), Some(9));
        assert_eq!(Topology::default().max_vertex_index(), None);
    }

    #[test]
    fn test_mode_codes() {
        assert_eq!(TopologyMode::from_u8(TopologyMode::Static.to_u8()), Some(TopologyMode::Static));
        assert_eq!(
            TopologyMode::from_u8(TopologyMode::PerFrame.to_u8()),
            Some(TopologyMode::PerFrame)
        );
        assert_eq!(TopologyMode::from_u8(9), None);
    }

    #[test]
    fn test_edge_topology_for_row() {
        let stat = EdgeTopology::Static(vec![[0, 1]]);
        assert_eq!(stat.for_row(0).unwrap(), &vec![[0, 1]]);
        assert_eq!(stat.for_row(99).unwrap(), &vec![[0, 1]]);

        let per = EdgeTopology::PerFrame(vec![vec![[0, 1]], vec![[1, 2]]]);
        assert_eq!(per.for_row(1).unwrap(), &vec![[1, 2]]);
        assert!(per.for_row(2).is_err());
    }
}
