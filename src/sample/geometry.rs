//! Vertex position sampling.

use tracing::{debug, info};

use crate::core::{GeometryProvider, Precision, VertexSnapshot};
use crate::frame::FrameSet;
use crate::util::{Error, Result};

/// Captures deformed vertex positions for every requested frame.
///
/// Frames are evaluated strictly in `FrameSet` order because each
/// evaluation moves the host playhead, and the playhead is left at the
/// last requested frame when the capture finishes. That is an intended
/// side effect of sampling, not something the sampler undoes.
#[derive(Clone, Copy, Debug, Default)]
pub struct GeometrySampler {
    precision: Precision,
}

impl GeometrySampler {
    /// Sampler with the default half-precision storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sampler with an explicit storage precision.
    pub fn with_precision(precision: Precision) -> Self {
        Self { precision }
    }

    /// Capture one snapshot. Aborts on the first frame the provider
    /// cannot evaluate.
    pub fn capture<P: GeometryProvider + ?Sized>(
        &self,
        provider: &mut P,
        frames: &FrameSet,
    ) -> Result<VertexSnapshot> {
        if frames.is_empty() {
            return Err(Error::config("frame selection resolved to no frames"));
        }

        let vertex_count = provider.vertex_count();
        let mut snapshot = VertexSnapshot::new(vertex_count, self.precision);

        for &frame in frames {
            let positions = provider.evaluate(frame)?;
            snapshot.push_frame(frame, &positions)?;
            debug!(frame, "sampled vertex positions");
        }

        info!(
            mesh = provider.mesh_name(),
            frames = snapshot.frame_count(),
            vertices = vertex_count,
            "vertex capture complete"
        );
        Ok(snapshot)
    }
}
