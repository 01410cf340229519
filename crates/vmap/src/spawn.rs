// ModelSpawn - one placed instance of a 3D model within a tile.

use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};
use serde::Serialize;

use crate::error::DecodeError;
use crate::math::{AABox, Vector3};
use crate::reader::Reader;

/// Flag bit: a bounding box was serialized for this spawn.
pub const MOD_HAS_BOUND: u8 = 0x01;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ModelSpawn {
    pub flags: u8,
    pub adt_id: u8,
    /// Unique spawn identifier.
    pub id: u32,
    pub position: Vector3,
    /// Euler angles, opaque to this core (radians or degrees as stored).
    pub rotation: Vector3,
    pub scale: f32,
    /// Zero box when the file carried no bounds for this spawn.
    pub bound: AABox,
    pub name: String,
}

impl ModelSpawn {
    pub fn has_bound(&self) -> bool {
        (self.flags & MOD_HAS_BOUND) != 0
    }

    /// Decode one spawn record at the reader's cursor.
    ///
    /// The bound field is conditionally present: it occupies 24 bytes in
    /// the stream only when MOD_HAS_BOUND is set, and is omitted entirely
    /// otherwise (not zero-filled). The branch below is what keeps every
    /// subsequent record aligned.
    pub(crate) fn read_from(reader: &mut Reader<'_>) -> Result<Self, DecodeError> {
        let flags = reader.read_u8("spawn flags")?;
        let adt_id = reader.read_u8("adt id")?;
        let id = reader.read_u32("spawn id")?;
        let position = reader.read_vector3("position")?;
        let rotation = reader.read_vector3("rotation")?;
        let scale = reader.read_f32("scale")?;

        let bound = if (flags & MOD_HAS_BOUND) != 0 {
            reader.read_aabox("bound")?
        } else {
            AABox::new(Vector3::ZERO, Vector3::ZERO)
        };

        // Name is length-prefixed, never null-terminated: read exactly
        // name_len bytes, no terminator scan.
        let name_len = reader.read_u32("name length")? as usize;
        let name_bytes = reader.take(name_len, "name")?;
        let name = String::from_utf8_lossy(name_bytes).to_string();

        Ok(Self {
            flags,
            adt_id,
            id,
            position,
            rotation,
            scale,
            bound,
            name,
        })
    }

    /// Encode this spawn in the exact layout `read_from` decodes.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> anyhow::Result<()> {
        writer.write_u8(self.flags)?;
        writer.write_u8(self.adt_id)?;
        writer.write_u32::<LittleEndian>(self.id)?;
        write_vector3(writer, self.position)?;
        write_vector3(writer, self.rotation)?;
        writer.write_f32::<LittleEndian>(self.scale)?;
        if self.has_bound() {
            write_vector3(writer, self.bound.min)?;
            write_vector3(writer, self.bound.max)?;
        }
        writer.write_u32::<LittleEndian>(self.name.len() as u32)?;
        writer.write_all(self.name.as_bytes())?;
        Ok(())
    }
}

pub(crate) fn write_vector3<W: Write>(writer: &mut W, v: Vector3) -> anyhow::Result<()> {
    writer.write_f32::<LittleEndian>(v.x)?;
    writer.write_f32::<LittleEndian>(v.y)?;
    writer.write_f32::<LittleEndian>(v.z)?;
    Ok(())
}
