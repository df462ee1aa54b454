//! Consumer-side geometry built from decoded arrays.

use glam::Vec3;
use smallvec::SmallVec;

use crate::core::{EdgeList, FaceTable};
use crate::util::{Error, Result};

/// One mesh face, dispatched by vertex count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MeshFace {
    Triangle([u32; 3]),
    Quad([u32; 4]),
    NGon(SmallVec<[u32; 8]>),
}

impl MeshFace {
    /// Vertex indices of this face.
    pub fn indices(&self) -> &[u32] {
        match self {
            Self::Triangle(v) => v,
            Self::Quad(v) => v,
            Self::NGon(v) => v,
        }
    }

    /// Number of vertices of this face.
    pub fn arity(&self) -> usize {
        self.indices().len()
    }
}

/// A mesh rebuilt from one frame of a snapshot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub faces: Vec<MeshFace>,
    pub edges: EdgeList,
}

impl Mesh {
    /// Build a mesh from decoded arrays: all vertices first, then faces
    /// dispatched on record arity (3 = triangle, 4 = quad, >4 = n-gon).
    ///
    /// A record with fewer than 3 indices, or one referencing a vertex the
    /// frame does not have, is an error. With `lenient` set, short records
    /// are skipped instead.
    pub fn build(
        positions: Vec<Vec3>,
        faces: &FaceTable,
        edges: Option<&EdgeList>,
        lenient: bool,
    ) -> Result<Self> {
        let mut mesh_faces = Vec::with_capacity(faces.len());

        for (i, record) in faces.iter().enumerate() {
            if record.len() < 3 {
                if lenient {
                    continue;
                }
                return Err(Error::invalid(format!(
                    "face {i} has {} vertex indices, need at least 3",
                    record.len()
                )));
            }
            if let Some(&bad) = record.iter().find(|&&v| v as usize >= positions.len()) {
                return Err(Error::invalid(format!(
                    "face {i} references vertex {bad}, frame has {}",
                    positions.len()
                )));
            }
            mesh_faces.push(match record {
                &[a, b, c] => MeshFace::Triangle([a, b, c]),
                &[a, b, c, d] => MeshFace::Quad([a, b, c, d]),
                _ => MeshFace::NGon(SmallVec::from_slice(record)),
            });
        }

        Ok(Self {
            positions,
            faces: mesh_faces,
            edges: edges.cloned().unwrap_or_default(),
        })
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Number of faces.
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Check if this is a valid mesh (has vertices and faces).
    pub fn is_valid(&self) -> bool {
        !self.positions.is_empty() && !self.faces.is_empty()
    }

    /// Calculate bounding box.
    pub fn compute_bounds(&self) -> (Vec3, Vec3) {
        compute_bounds(&self.positions)
    }
}

/// A flat point collection for frames decoded without topology.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointCloud {
    pub positions: Vec<Vec3>,
}

impl PointCloud {
    /// Number of points.
    pub fn num_points(&self) -> usize {
        self.positions.len()
    }

    /// Calculate bounding box.
    pub fn compute_bounds(&self) -> (Vec3, Vec3) {
        compute_bounds(&self.positions)
    }
}

fn compute_bounds(positions: &[Vec3]) -> (Vec3, Vec3) {
    if positions.is_empty() {
        return (Vec3::ZERO, Vec3::ZERO);
    }

    let mut min = positions[0];
    let mut max = positions[0];
    for &p in &positions[1..] {
        min = min.min(p);
        max = max.max(p);
    }
    (min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.5, 1.5, 0.0),
        ]
    }

    #[test]
    fn test_face_dispatch() {
        let mut faces = FaceTable::new();
        faces.push_face(&[0, 1, 2, 3]);
        faces.push_face(&[3, 2, 4]);
        faces.push_face(&[0, 1, 2, 3, 4]);

        let mesh = Mesh::build(unit_square(), &faces, None, false).unwrap();
        assert_eq!(mesh.num_faces(), 3);
        assert!(matches!(mesh.faces[0], MeshFace::Quad(_)));
        assert!(matches!(mesh.faces[1], MeshFace::Triangle(_)));
        assert!(matches!(mesh.faces[2], MeshFace::NGon(_)));
        assert_eq!(mesh.faces[2].arity(), 5);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_short_record_rejected() {
        let mut faces = FaceTable::new();
        faces.push_face(&[0, 1]);

        let err = Mesh::build(unit_square(), &faces, None, false).unwrap_err();
        assert!(matches!(err, Error::InvalidStructure(_)));
    }

    #[test]
    fn test_short_record_lenient() {
        let mut faces = FaceTable::new();
        faces.push_face(&[0, 1]);
        faces.push_face(&[0, 1, 2]);

        let mesh = Mesh::build(unit_square(), &faces, None, true).unwrap();
        assert_eq!(mesh.num_faces(), 1);
        assert!(matches!(mesh.faces[0], MeshFace::Triangle(_)));
    }

    #[test]
    fn test_out_of_range_index_rejected_even_lenient() {
        let mut faces = FaceTable::new();
        faces.push_face(&[0, 1, 99]);

        assert!(Mesh::build(unit_square(), &faces, None, true).is_err());
    }

    #[test]
    fn test_bounds() {
        let cloud = PointCloud { positions: unit_square() };
        let (min, max) = cloud.compute_bounds();
        assert_eq!(min, Vec3::ZERO);
        assert_eq!(max, Vec3::new(1.0, 1.5, 0.0));
    }
}
