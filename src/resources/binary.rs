use crate::error::{DecodeError, Result};

/// Bounds-checked little-endian reads over a borrowed byte buffer.
///
/// The view is stateless: callers keep their own cursor and pass absolute
/// offsets in.
#[derive(Clone, Copy, Debug)]
pub struct BinaryView<'a> {
    data: &'a [u8],
}

impl<'a> BinaryView<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get_bytes(&self, offset: usize, length: usize) -> Result<&'a [u8]> {
        let out_of_range = || DecodeError::OutOfRange {
            table: "byte buffer",
            index: offset,
            len: self.data.len(),
        };
        let end = offset.checked_add(length).ok_or_else(out_of_range)?;
        self.data.get(offset..end).ok_or_else(out_of_range)
    }

    pub fn get_u16(&self, offset: usize) -> Result<u16> {
        self.array(offset).map(u16::from_le_bytes)
    }

    pub fn get_u32(&self, offset: usize) -> Result<u32> {
        self.array(offset).map(u32::from_le_bytes)
    }

    pub fn get_f32(&self, offset: usize) -> Result<f32> {
        self.array(offset).map(f32::from_le_bytes)
    }

    fn array<const N: usize>(&self, offset: usize) -> Result<[u8; N]> {
        let bytes = self.get_bytes(offset, N)?;
        let mut out = [0; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian_values() {
        let mut data = vec![0x34, 0x12];
        data.extend_from_slice(&0xdead_beef_u32.to_le_bytes());
        data.extend_from_slice(&1.5f32.to_le_bytes());
        let view = BinaryView::new(&data);

        assert_eq!(view.get_u16(0).unwrap(), 0x1234);
        assert_eq!(view.get_u32(2).unwrap(), 0xdead_beef);
        assert_eq!(view.get_f32(6).unwrap(), 1.5);
        assert_eq!(view.get_bytes(2, 2).unwrap(), &[0xef, 0xbe]);
    }

    #[test]
    fn rejects_reads_past_the_end() {
        let data = [0u8; 6];
        let view = BinaryView::new(&data);

        assert!(view.get_u32(2).is_ok());
        assert_eq!(
            view.get_u32(3),
            Err(DecodeError::OutOfRange {
                table: "byte buffer",
                index: 3,
                len: 6
            })
        );
        assert!(view.get_u16(5).is_err());
        assert!(view.get_bytes(usize::MAX, 2).is_err());
        assert!(view.get_bytes(6, 0).unwrap().is_empty());
    }
}
