//! Consumer side: rebuilds meshes and point clouds from decoded arrays.
//!
//! - [`Mesh`] / [`PointCloud`] - per-frame geometry
//! - [`ReconstructedFrame`] - one frame's decoded arrays
//! - [`TreeBuilder`] / [`AnimationTree`] - single-frame and whole-animation
//!   reconstruction

mod mesh;
mod tree;

pub use mesh::{Mesh, MeshFace, PointCloud};
pub use tree::{AnimationTree, ReconstructedFrame, TreeBuilder};
