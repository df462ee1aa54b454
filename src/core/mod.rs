//! Core data model of the codec.
//!
//! - [`GeometryProvider`] - host access trait, the codec's only view of the
//!   authoring application
//! - [`VertexSnapshot`] / [`Precision`] - per-frame position storage
//! - [`Topology`] / [`FaceTable`] / [`TopologyMode`] - connectivity
//! - [`SnapshotMetadata`] - the sidecar describing a capture

mod metadata;
mod provider;
mod snapshot;
mod topology;

pub use metadata::SnapshotMetadata;
pub use provider::GeometryProvider;
pub use snapshot::{Precision, VertexSnapshot};
pub use topology::{
    EdgeList, EdgeTopology, FaceTable, FaceTopology, SampledTopology, Topology, TopologyMode,
};
