//! Host geometry access.
//!
//! The codec never holds host scene or mesh objects. Everything it needs
//! from the authoring application goes through [`GeometryProvider`].

use glam::Vec3;

use crate::core::Topology;
use crate::frame::SceneTime;
use crate::util::Result;

/// Access to one deforming mesh inside a host application.
///
/// Implementations are typically backed by shared mutable host state: the
/// playhead. [`evaluate`](Self::evaluate) moves it, and callers are expected
/// to issue frames strictly in the order they want them evaluated - the
/// codec never calls this trait concurrently.
pub trait GeometryProvider {
    /// Identifier of the target mesh. Used to key the artifact names.
    fn mesh_name(&self) -> &str;

    /// Timeline bounds and current playhead of the host scene.
    fn scene_time(&self) -> SceneTime;

    /// Number of vertices of the target mesh. Constant for the whole capture.
    fn vertex_count(&self) -> usize;

    /// Advance the playhead to `frame` and return the mesh's deformed
    /// world-space vertex positions there.
    ///
    /// The playhead is left wherever the last call put it; the codec does
    /// not restore it. Fails if the host cannot evaluate `frame`.
    fn evaluate(&mut self, frame: i32) -> Result<Vec<Vec3>>;

    /// Edge and face connectivity of the mesh at `frame`.
    ///
    /// May advance the playhead like [`evaluate`](Self::evaluate).
    fn topology(&mut self, frame: i32) -> Result<Topology>;
}
