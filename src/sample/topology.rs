//! Connectivity sampling.

use tracing::info;

use crate::core::{GeometryProvider, SampledTopology, Topology, TopologyMode};
use crate::frame::FrameSet;
use crate::util::{Error, Result};

/// Captures edge and face connectivity for a frame set.
///
/// Static mode captures once, at the first requested frame, and shares
/// that set across the whole animation. Per-frame mode re-captures at
/// every frame, tolerating structural changes at proportionally higher
/// cost.
#[derive(Clone, Copy, Debug, Default)]
pub struct TopologySampler {
    mode: TopologyMode,
}

impl TopologySampler {
    pub fn new(mode: TopologyMode) -> Self {
        Self { mode }
    }

    /// Capture connectivity for `frames`.
    pub fn capture<P: GeometryProvider + ?Sized>(
        &self,
        provider: &mut P,
        frames: &FrameSet,
    ) -> Result<SampledTopology> {
        let Some(&first) = frames.first() else {
            return Err(Error::config("frame selection resolved to no frames"));
        };
        let vertex_count = provider.vertex_count();

        let sampled = match self.mode {
            TopologyMode::Static => {
                let topo = provider.topology(first)?;
                validate_indices(&topo, vertex_count, first)?;
                SampledTopology::Static(topo)
            }
            TopologyMode::PerFrame => {
                let mut sets = Vec::with_capacity(frames.len());
                for &frame in frames {
                    let topo = provider.topology(frame)?;
                    validate_indices(&topo, vertex_count, frame)?;
                    sets.push(topo);
                }
                SampledTopology::PerFrame(sets)
            }
        };

        info!(
            mesh = provider.mesh_name(),
            mode = %self.mode,
            sets = sampled.num_sets(),
            "topology capture complete"
        );
        Ok(sampled)
    }
}

/// Every edge and face index must address a vertex of the snapshot.
fn validate_indices(topo: &Topology, vertex_count: usize, frame: i32) -> Result<()> {
    if let Some(max) = topo.max_vertex_index() {
        if max as usize >= vertex_count {
            return Err(Error::invalid(format!(
                "topology at frame {frame} references vertex {max}, mesh has {vertex_count}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FaceTable;
    use crate::frame::SceneTime;
    use glam::Vec3;

    /// Triangle that gains one face per frame.
    struct Growing;

    impl GeometryProvider for Growing {
        fn mesh_name(&self) -> &str {
            "growing"
        }

        fn scene_time(&self) -> SceneTime {
            SceneTime { start: 1, end: 4, current: 1 }
        }

        fn vertex_count(&self) -> usize {
            8
        }

        fn evaluate(&mut self, _frame: i32) -> Result<Vec<Vec3>> {
            Ok(vec![Vec3::ZERO; 8])
        }

        fn topology(&mut self, frame: i32) -> Result<Topology> {
            let mut faces = FaceTable::new();
            for i in 0..frame.max(1) as u32 {
                faces.push_face(&[i, i + 1, i + 2]);
            }
            Ok(Topology { edges: vec![[0, 1]], faces })
        }
    }

    #[test]
    fn test_static_captures_first_frame_only() {
        let sampled = TopologySampler::new(TopologyMode::Static)
            .capture(&mut Growing, &vec![2, 3, 4])
            .unwrap();
        assert_eq!(sampled.mode(), TopologyMode::Static);
        assert_eq!(sampled.num_sets(), 1);
        // first requested frame was 2, so two faces
        assert_eq!(sampled.first().unwrap().faces.len(), 2);
    }

    #[test]
    fn test_per_frame_captures_all() {
        let sampled = TopologySampler::new(TopologyMode::PerFrame)
            .capture(&mut Growing, &vec![1, 2, 3])
            .unwrap();
        assert_eq!(sampled.mode(), TopologyMode::PerFrame);
        assert_eq!(sampled.num_sets(), 3);
        let face_counts: Vec<usize> = sampled.sets().map(|t| t.faces.len()).collect();
        assert_eq!(face_counts, vec![1, 2, 3]);
    }

    #[test]
    fn test_out_of_range_index_rejected() {
        struct Bad;
        impl GeometryProvider for Bad {
            fn mesh_name(&self) -> &str {
                "bad"
            }
            fn scene_time(&self) -> SceneTime {
                SceneTime { start: 1, end: 1, current: 1 }
            }
            fn vertex_count(&self) -> usize {
                3
            }
            fn evaluate(&mut self, _frame: i32) -> Result<Vec<Vec3>> {
                Ok(vec![Vec3::ZERO; 3])
            }
            fn topology(&mut self, _frame: i32) -> Result<Topology> {
                let mut faces = FaceTable::new();
                faces.push_face(&[0, 1, 7]);
                Ok(Topology { edges: Vec::new(), faces })
            }
        }

        let err = TopologySampler::new(TopologyMode::Static)
            .capture(&mut Bad, &vec![1])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidStructure(_)));
    }
}
