//! # meshsnap
//!
//! Animated-mesh snapshot codec. Captures a deforming mesh's per-frame
//! vertex positions and connectivity from an authoring application,
//! persists them as array artifacts plus a metadata sidecar, and rebuilds
//! per-frame meshes or point clouds on the consuming side - including a
//! whole-animation, frame-indexed tree.
//!
//! The two applications share nothing but the filesystem: the capture side
//! talks to its host through the [`core::GeometryProvider`] trait, the
//! consuming side reads artifacts back with [`io::ISnapshot`] and
//! [`rebuild::TreeBuilder`].
//!
//! ## Modules
//!
//! - [`util`] - Errors and scalar storage types
//! - [`frame`] - Frame selection (timeline, range, custom list, CSV)
//! - [`core`] - Data model: provider trait, snapshot, topology, metadata
//! - [`sample`] - Capture-side samplers
//! - [`io`] - Artifact format, encoder, decoder
//! - [`rebuild`] - Consumer-side mesh/point reconstruction
//! - [`export`] - One-call export pipeline
//!
//! ## Example
//!
//! ```ignore
//! use meshsnap::prelude::*;
//!
//! let meta = export_animation(
//!     &mut provider,
//!     &FrameSelection::Timeline,
//!     TopologyMode::Static,
//!     &ExportOptions::default(),
//!     "/tmp/out",
//! )?;
//!
//! let snapshot = ISnapshot::open("/tmp/out", &meta.mesh)?;
//! let mesh = TreeBuilder::new(&snapshot).single(5)?.build_mesh(false)?;
//! ```

pub mod util;
pub mod frame;
pub mod core;
pub mod sample;
pub mod io;
pub mod rebuild;
pub mod export;

// Re-export commonly used types
pub use export::export_animation;
pub use util::{Error, Result, ScalarType};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        GeometryProvider, Precision, SampledTopology, SnapshotMetadata, Topology, TopologyMode,
        VertexSnapshot,
    };
    pub use crate::export::export_animation;
    pub use crate::frame::{FrameSelection, FrameSet, SceneTime};
    pub use crate::io::{ExportOptions, ISnapshot, OSnapshot};
    pub use crate::rebuild::{AnimationTree, Mesh, PointCloud, ReconstructedFrame, TreeBuilder};
    pub use crate::sample::{GeometrySampler, TopologySampler};
    pub use crate::util::{Error, Result};
}
