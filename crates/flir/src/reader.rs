use crate::FlirError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Big,
    Little,
}

impl ByteOrder {
    /// FLIR records start with a u16 that reads as 2 in the record's own
    /// byte order; anything else means the other order.
    pub fn detect_record(data: &[u8]) -> Result<Self, FlirError> {
        let head = data.get(..2).ok_or(FlirError::Truncated { what: "record header" })?;
        if u16::from_be_bytes([head[0], head[1]]) == 2 {
            Ok(ByteOrder::Big)
        } else {
            Ok(ByteOrder::Little)
        }
    }
}

/// Bounds-checked fixed-offset reads over a FLIR structure.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Reader<'a> {
    data: &'a [u8],
    order: ByteOrder,
    what: &'static str,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8], order: ByteOrder, what: &'static str) -> Self {
        Self { data, order, what }
    }

    pub fn bytes(&self, offset: usize, len: usize) -> Result<&'a [u8], FlirError> {
        offset
            .checked_add(len)
            .and_then(|end| self.data.get(offset..end))
            .ok_or(FlirError::Truncated { what: self.what })
    }

    fn array<const N: usize>(&self, offset: usize) -> Result<[u8; N], FlirError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.bytes(offset, N)?);
        Ok(out)
    }

    pub fn u16(&self, offset: usize) -> Result<u16, FlirError> {
        let b = self.array::<2>(offset)?;
        Ok(match self.order {
            ByteOrder::Big => u16::from_be_bytes(b),
            ByteOrder::Little => u16::from_le_bytes(b),
        })
    }

    pub fn u32(&self, offset: usize) -> Result<u32, FlirError> {
        let b = self.array::<4>(offset)?;
        Ok(match self.order {
            ByteOrder::Big => u32::from_be_bytes(b),
            ByteOrder::Little => u32::from_le_bytes(b),
        })
    }

    pub fn i32(&self, offset: usize) -> Result<i32, FlirError> {
        let b = self.array::<4>(offset)?;
        Ok(match self.order {
            ByteOrder::Big => i32::from_be_bytes(b),
            ByteOrder::Little => i32::from_le_bytes(b),
        })
    }

    pub fn f32(&self, offset: usize) -> Result<f32, FlirError> {
        let b = self.array::<4>(offset)?;
        Ok(match self.order {
            ByteOrder::Big => f32::from_be_bytes(b),
            ByteOrder::Little => f32::from_le_bytes(b),
        })
    }

    /// NUL-terminated string in a fixed-width field.
    pub fn string(&self, offset: usize, len: usize) -> Result<String, FlirError> {
        let raw = self.bytes(offset, len)?;
        let end = raw.iter().position(|b| *b == 0).unwrap_or(raw.len());
        Ok(String::from_utf8_lossy(&raw[..end]).trim().to_string())
    }
}
