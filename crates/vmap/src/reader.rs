// Bounds-checked little-endian reader over an in-memory buffer.
//
// The decoder never touches disk itself: callers hand it a fully loaded
// byte buffer and the reader walks it with an explicit cursor. Every read
// is bounds-checked up front so a truncated file surfaces as a typed
// error naming the field and offset instead of a panic.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::DecodeError;
use crate::math::{AABox, Vector3};

pub(crate) struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
    context: String,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8], context: String) -> Self {
        Reader {
            data,
            pos: 0,
            context,
        }
    }

    /// Identifies the file being decoded, e.g. "tile (3, 4)". Used as the
    /// prefix of every error raised through this reader.
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Take the next `count` bytes, advancing the cursor.
    pub fn take(&mut self, count: usize, field: &'static str) -> Result<&'a [u8], DecodeError> {
        if self.pos + count > self.data.len() {
            return Err(DecodeError::Truncated {
                context: self.context.clone(),
                field,
                offset: self.pos,
            });
        }
        let slice = &self.data[self.pos..self.pos + count];
        self.pos += count;
        Ok(slice)
    }

    pub fn read_u8(&mut self, field: &'static str) -> Result<u8, DecodeError> {
        Ok(self.take(1, field)?[0])
    }

    pub fn read_u32(&mut self, field: &'static str) -> Result<u32, DecodeError> {
        Ok(LittleEndian::read_u32(self.take(4, field)?))
    }

    pub fn read_f32(&mut self, field: &'static str) -> Result<f32, DecodeError> {
        Ok(LittleEndian::read_f32(self.take(4, field)?))
    }

    pub fn read_vector3(&mut self, field: &'static str) -> Result<Vector3, DecodeError> {
        let x = self.read_f32(field)?;
        let y = self.read_f32(field)?;
        let z = self.read_f32(field)?;
        Ok(Vector3::new(x, y, z))
    }

    /// An AABox is stored as six floats, min before max.
    pub fn read_aabox(&mut self, field: &'static str) -> Result<AABox, DecodeError> {
        let min = self.read_vector3(field)?;
        let max = self.read_vector3(field)?;
        Ok(AABox { min, max })
    }
}
