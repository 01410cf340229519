// Decode error taxonomy for the vmap binary formats.
//
// Every variant is fatal to the decode call that raised it; a half-decoded
// tile is never returned. The intersection engine has no error cases at
// all: degenerate geometry is modeled as data, not as failures.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// The 8-byte version tag at the start of the file is not a supported
    /// vmap version.
    #[error("{context}: unsupported vmap magic {magic:?}")]
    UnsupportedMagic { context: String, magic: String },

    /// The declared spawn count exceeds the sanity ceiling. Guards against
    /// corrupt files being read as having billions of records.
    #[error("{context}: spawn count {count} exceeds sanity ceiling {ceiling}")]
    UnreasonableCount {
        context: String,
        count: u32,
        ceiling: u32,
    },

    /// The buffer ended before a field could be fully read.
    #[error("{context}: buffer truncated reading {field} at offset {offset}")]
    Truncated {
        context: String,
        field: &'static str,
        offset: usize,
    },

    /// The tree file's marker field did not read as "NODE".
    #[error("{context}: invalid tree node marker {marker:?}")]
    InvalidNodeMarker { context: String, marker: String },
}
