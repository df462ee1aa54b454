//! Snapshot artifact format constants and header.
//!
//! Every artifact starts with a fixed 16-byte header followed by a
//! payload-kind-specific body. All multi-byte values are little-endian;
//! bulk payloads are written with the machine's native layout, which this
//! format requires to be little-endian.
//!
//! Header layout:
//!
//! | offset | size | field |
//! |--------|------|------------------------------------|
//! | 0      | 5    | magic `MSNAP`                      |
//! | 5      | 2    | format version (u16)               |
//! | 7      | 1    | payload kind                       |
//! | 8      | 1    | scalar type                        |
//! | 9      | 1    | topology mode (edges/faces only)   |
//! | 10     | 6    | reserved, zero                     |

use crate::core::TopologyMode;
use crate::util::{Error, Result, ScalarType};

/// Magic bytes at the start of every artifact.
pub const SNAPSHOT_MAGIC: &[u8; 5] = b"MSNAP";

/// Size of the artifact header in bytes.
pub const HEADER_SIZE: usize = 16;

/// Current artifact format version.
pub const CURRENT_VERSION: u16 = 1;

/// Filename suffix of the vertex artifact.
pub const VERTICES_SUFFIX: &str = "_vertices.msa";

/// Filename suffix of the edge artifact.
pub const EDGES_SUFFIX: &str = "_edges.msa";

/// Filename suffix of the face artifact.
pub const FACES_SUFFIX: &str = "_faces.msa";

/// Filename suffix of the metadata sidecar.
pub const METADATA_SUFFIX: &str = "_metadata.json";

/// What an artifact carries.
///
/// Stored in the header so a vertex payload can never be mistaken for an
/// edge or face payload, whatever the file happens to be called.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum PayloadKind {
    Vertices = 0,
    Edges = 1,
    Faces = 2,
}

impl PayloadKind {
    /// Convert from the on-disk code.
    pub const fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Vertices),
            1 => Some(Self::Edges),
            2 => Some(Self::Faces),
            _ => None,
        }
    }

    /// Name of this payload as a string.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Vertices => "vertices",
            Self::Edges => "edges",
            Self::Faces => "faces",
        }
    }
}

impl std::fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Parsed artifact header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArtifactHeader {
    pub version: u16,
    pub payload: PayloadKind,
    pub scalar: ScalarType,
    pub mode: TopologyMode,
}

impl ArtifactHeader {
    /// Header for a new artifact at the current format version.
    pub fn new(payload: PayloadKind, scalar: ScalarType, mode: TopologyMode) -> Self {
        Self { version: CURRENT_VERSION, payload, scalar, mode }
    }

    /// Encode into the fixed 16-byte on-disk form.
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..5].copy_from_slice(SNAPSHOT_MAGIC);
        buf[5..7].copy_from_slice(&self.version.to_le_bytes());
        buf[7] = self.payload as u8;
        buf[8] = self.scalar as u8;
        buf[9] = self.mode.to_u8();
        buf
    }

    /// Parse and validate a header from the start of an artifact.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(Error::UnexpectedEof(data.len() as u64));
        }
        if &data[0..5] != SNAPSHOT_MAGIC {
            return Err(Error::InvalidMagic);
        }

        let version = u16::from_le_bytes([data[5], data[6]]);
        if version > CURRENT_VERSION {
            return Err(Error::UnsupportedVersion(version));
        }

        let payload = PayloadKind::from_u8(data[7])
            .ok_or_else(|| Error::invalid(format!("unknown payload kind {}", data[7])))?;
        let scalar = ScalarType::from_u8(data[8])
            .ok_or_else(|| Error::invalid(format!("unknown scalar type {}", data[8])))?;
        let mode = TopologyMode::from_u8(data[9])
            .ok_or_else(|| Error::invalid(format!("unknown topology mode {}", data[9])))?;

        Ok(Self { version, payload, scalar, mode })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_roundtrip() {
        let header = ArtifactHeader::new(
            PayloadKind::Faces,
            ScalarType::Uint32,
            TopologyMode::PerFrame,
        );
        let parsed = ArtifactHeader::parse(&header.encode()).unwrap();
        assert_eq!(parsed, header);
    }

    #[test]
    fn test_bad_magic() {
        let mut buf = ArtifactHeader::new(
            PayloadKind::Vertices,
            ScalarType::Float16,
            TopologyMode::Static,
        )
        .encode();
        buf[0] = b'X';
        assert!(matches!(ArtifactHeader::parse(&buf).unwrap_err(), Error::InvalidMagic));
    }

    #[test]
    fn test_future_version() {
        let mut buf = ArtifactHeader::new(
            PayloadKind::Vertices,
            ScalarType::Float16,
            TopologyMode::Static,
        )
        .encode();
        buf[5..7].copy_from_slice(&99u16.to_le_bytes());
        assert!(matches!(
            ArtifactHeader::parse(&buf).unwrap_err(),
            Error::UnsupportedVersion(99)
        ));
    }

    #[test]
    fn test_truncated() {
        assert!(matches!(
            ArtifactHeader::parse(&[0u8; 4]).unwrap_err(),
            Error::UnexpectedEof(4)
        ));
    }
}
