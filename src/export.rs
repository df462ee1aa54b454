//! One-call export pipeline: frame selection, sampling, encoding.

use std::path::Path;

use crate::core::{GeometryProvider, SnapshotMetadata, TopologyMode};
use crate::frame::FrameSelection;
use crate::io::{ExportOptions, OSnapshot};
use crate::sample::{GeometrySampler, TopologySampler};
use crate::util::Result;

/// Capture an animation from `provider` and write its artifacts under `dir`.
///
/// Resolves the frame selection against the host timeline, samples vertex
/// positions (and topology, if any topology payload is enabled), then
/// writes the sidecar and enabled payloads. The host playhead ends up at
/// the last sampled frame.
///
/// Returns the sidecar that was written.
pub fn export_animation<P: GeometryProvider + ?Sized>(
    provider: &mut P,
    selection: &FrameSelection,
    mode: TopologyMode,
    options: &ExportOptions,
    dir: impl AsRef<Path>,
) -> Result<SnapshotMetadata> {
    let scene = provider.scene_time();
    let frames = selection.resolve(&scene)?;

    let snapshot = GeometrySampler::with_precision(options.precision).capture(provider, &frames)?;
    let topology = if options.wants_topology() {
        Some(TopologySampler::new(mode).capture(provider, &frames)?)
    } else {
        None
    };

    let metadata = SnapshotMetadata::describe(provider.mesh_name(), &snapshot, topology.as_ref());
    let out = OSnapshot::create(dir, provider.mesh_name())?;
    out.export(&snapshot, topology.as_ref(), options, &metadata)?;
    Ok(metadata)
}
