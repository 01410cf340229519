// Root bounding volume of a .vmtree spatial index.
//
// Only the root volume is decoded here; walking the packed BIH node array
// that follows it is the map-level query engine's concern, not this
// core's.

use std::io::Write;

use crate::error::DecodeError;
use crate::math::AABox;
use crate::reader::Reader;
use crate::spawn::write_vector3;
use crate::tile::read_magic;

/// Marker tag that must follow the magic in a tree file.
pub const NODE_MARKER: &[u8; 4] = b"NODE";

/// Decode the root bounding volume of a tree file.
pub fn decode_tree(buffer: &[u8]) -> Result<AABox, DecodeError> {
    let mut reader = Reader::new(buffer, "tree root".to_string());

    read_magic(&mut reader)?;

    let marker = reader.take(4, "node marker")?;
    if marker != NODE_MARKER {
        return Err(DecodeError::InvalidNodeMarker {
            context: reader.context().to_string(),
            marker: String::from_utf8_lossy(marker).to_string(),
        });
    }

    reader.read_aabox("root bound")
}

/// Encode a tree header in the exact layout `decode_tree` accepts.
pub fn write_tree<W: Write>(writer: &mut W, magic: &str, bound: &AABox) -> anyhow::Result<()> {
    writer.write_all(magic.as_bytes())?;
    writer.write_all(NODE_MARKER)?;
    write_vector3(writer, bound.min)?;
    write_vector3(writer, bound.max)?;
    Ok(())
}
