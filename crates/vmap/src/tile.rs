// VMapTile - decoding and encoding of .vmtile spawn lists.

use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};
use serde::Serialize;

use crate::error::DecodeError;
use crate::reader::Reader;
use crate::spawn::ModelSpawn;

/// Version tag written by the current assembler.
pub const VMAP_MAGIC: &str = "VMAP_7.0";

/// Version tags this decoder accepts. Immutable whitelist; there is no
/// runtime mechanism to add or remove supported versions.
pub const SUPPORTED_MAGICS: [&str; 2] = ["VMAP_7.0", "VMAP_6.0"];

/// Sanity ceiling on the declared spawn count of a single tile.
pub const MAX_TILE_SPAWNS: u32 = 100_000;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VMapTile {
    /// The 8-byte version tag the file carried.
    pub magic: String,
    /// Spawns in decoded order.
    pub spawns: Vec<ModelSpawn>,
    /// Grid coordinates, caller-supplied (not stored in the file; they
    /// come from the filename convention handled by the caller).
    pub tile_x: i32,
    pub tile_y: i32,
}

/// Decode a whole tile from an already-loaded byte buffer.
///
/// Single pass, no I/O, no partial results: any failure aborts the decode
/// and nothing of the half-read tile escapes.
pub fn decode_tile(buffer: &[u8], tile_x: i32, tile_y: i32) -> Result<VMapTile, DecodeError> {
    let mut reader = Reader::new(buffer, format!("tile ({}, {})", tile_x, tile_y));

    let magic = read_magic(&mut reader)?;

    let spawn_count = reader.read_u32("spawn count")?;
    if spawn_count > MAX_TILE_SPAWNS {
        return Err(DecodeError::UnreasonableCount {
            context: reader.context().to_string(),
            count: spawn_count,
            ceiling: MAX_TILE_SPAWNS,
        });
    }

    let mut spawns = Vec::with_capacity(spawn_count as usize);
    for _ in 0..spawn_count {
        spawns.push(ModelSpawn::read_from(&mut reader)?);
    }

    tracing::debug!(
        "tile ({}, {}): decoded {} spawns ({})",
        tile_x,
        tile_y,
        spawns.len(),
        magic
    );

    Ok(VMapTile {
        magic,
        spawns,
        tile_x,
        tile_y,
    })
}

impl VMapTile {
    /// Encode this tile in the exact layout `decode_tile` accepts.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> anyhow::Result<()> {
        writer.write_all(self.magic.as_bytes())?;
        writer.write_u32::<LittleEndian>(self.spawns.len() as u32)?;
        for spawn in &self.spawns {
            spawn.write_to(writer)?;
        }
        Ok(())
    }
}

/// Read and validate the 8-byte version tag both file formats start with.
pub(crate) fn read_magic(reader: &mut Reader<'_>) -> Result<String, DecodeError> {
    let raw = reader.take(8, "magic")?;
    let magic = String::from_utf8_lossy(raw).to_string();
    if !SUPPORTED_MAGICS.contains(&magic.as_str()) {
        return Err(DecodeError::UnsupportedMagic {
            context: reader.context().to_string(),
            magic,
        });
    }
    Ok(magic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{AABox, Vector3};
    use crate::spawn::MOD_HAS_BOUND;

    fn sample_tile() -> VMapTile {
        let bounded = ModelSpawn {
            flags: MOD_HAS_BOUND,
            adt_id: 0,
            id: 1,
            position: Vector3::new(10.0, 20.0, 30.0),
            rotation: Vector3::ZERO,
            scale: 1.0,
            bound: AABox::new(Vector3::new(5.0, 15.0, 25.0), Vector3::new(15.0, 25.0, 35.0)),
            name: "building.wmo".to_string(),
        };
        let unbounded = ModelSpawn {
            flags: 0,
            adt_id: 1,
            id: 2,
            position: Vector3::new(-10.0, -20.0, -30.0),
            rotation: Vector3::new(0.0, 45.0, 0.0),
            scale: 0.5,
            bound: AABox::default(),
            name: "tree.m2".to_string(),
        };
        VMapTile {
            magic: VMAP_MAGIC.to_string(),
            spawns: vec![bounded, unbounded, extra_spawn(3)],
            tile_x: 32,
            tile_y: 48,
        }
    }

    fn extra_spawn(id: u32) -> ModelSpawn {
        ModelSpawn {
            flags: MOD_HAS_BOUND,
            adt_id: 2,
            id,
            position: Vector3::new(1.0, 2.0, 3.0),
            rotation: Vector3::ZERO,
            scale: 2.0,
            bound: AABox::new(Vector3::new(0.0, 1.0, 2.0), Vector3::new(2.0, 3.0, 4.0)),
            name: "rock.m2".to_string(),
        }
    }

    fn encode(tile: &VMapTile) -> Vec<u8> {
        let mut data = Vec::new();
        tile.write_to(&mut data).unwrap();
        data
    }

    #[test]
    fn test_round_trip_mixed_flags() {
        let tile = sample_tile();
        let decoded = decode_tile(&encode(&tile), 32, 48).unwrap();
        assert_eq!(decoded, tile);
        // Spawns without the bound flag come back with the zero box.
        assert_eq!(decoded.spawns[1].bound, AABox::default());
    }

    #[test]
    fn test_decode_is_idempotent() {
        let data = encode(&sample_tile());
        let first = decode_tile(&data, 32, 48).unwrap();
        let second = decode_tile(&data, 32, 48).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unsupported_magic() {
        let mut data = encode(&sample_tile());
        data[..8].copy_from_slice(b"VMAP_9.9");

        let err = decode_tile(&data, 3, 4).unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnsupportedMagic {
                context: "tile (3, 4)".to_string(),
                magic: "VMAP_9.9".to_string(),
            }
        );
    }

    #[test]
    fn test_unreasonable_count_checked_before_records() {
        // Header only: a huge declared count must fail without the decoder
        // attempting to read (or allocate for) any spawn record.
        let mut data = Vec::new();
        data.extend_from_slice(VMAP_MAGIC.as_bytes());
        data.write_u32::<LittleEndian>(200_000).unwrap();

        let err = decode_tile(&data, 0, 0).unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnreasonableCount {
                context: "tile (0, 0)".to_string(),
                count: 200_000,
                ceiling: MAX_TILE_SPAWNS,
            }
        );
    }

    #[test]
    fn test_truncated_aborts_whole_decode() {
        let data = encode(&sample_tile());
        // Cut at several points inside the spawn records; each must yield
        // Truncated, never a partial tile.
        for cut in [9, 15, 40, data.len() - 1] {
            let err = decode_tile(&data[..cut], 32, 48).unwrap_err();
            assert!(matches!(err, DecodeError::Truncated { .. }), "cut at {}", cut);
        }
    }

    #[test]
    fn test_empty_tile() {
        let tile = VMapTile {
            magic: VMAP_MAGIC.to_string(),
            spawns: Vec::new(),
            tile_x: 0,
            tile_y: 0,
        };
        let decoded = decode_tile(&encode(&tile), 0, 0).unwrap();
        assert!(decoded.spawns.is_empty());
    }

    #[test]
    fn test_older_supported_magic_accepted() {
        let mut tile = sample_tile();
        tile.magic = "VMAP_6.0".to_string();
        let decoded = decode_tile(&encode(&tile), 32, 48).unwrap();
        assert_eq!(decoded.magic, "VMAP_6.0");
    }
}
