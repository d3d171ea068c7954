use crate::reader::{ByteOrder, Reader};
use crate::FlirError;

pub const FFF_HEADER_LEN: usize = 0x40;
pub const FFF_DIR_ENTRY_LEN: usize = 0x20;

pub const RECORD_RAW_DATA: u16 = 0x0001;
pub const RECORD_CAMERA_INFO: u16 = 0x0020;

/// One entry of the FFF record directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FffRecord {
    pub kind: u16,
    pub subtype: u16,
    pub version: u32,
    pub index_id: u32,
    pub offset: u32,
    pub length: u32,
}

/// A parsed FLIR File Format container.
#[derive(Debug, Clone)]
pub struct FffFile<'a> {
    data: &'a [u8],
    pub creator: String,
    pub version: u32,
    pub order: ByteOrder,
    pub records: Vec<FffRecord>,
}

impl<'a> FffFile<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Self, FlirError> {
        if data.len() < FFF_HEADER_LEN {
            return Err(FlirError::Truncated { what: "FFF header" });
        }
        let magic = &data[0..4];
        if magic != b"FFF\0" && magic != b"AFF\0" {
            return Err(FlirError::BadMagic);
        }

        // The version (1xx) decides the byte order of the whole directory.
        let order = {
            let be = Reader::new(data, ByteOrder::Big, "FFF header").u32(0x14)?;
            let le = Reader::new(data, ByteOrder::Little, "FFF header").u32(0x14)?;
            if (100..200).contains(&be) {
                ByteOrder::Big
            } else if (100..200).contains(&le) {
                ByteOrder::Little
            } else {
                return Err(FlirError::UnsupportedVersion { version: be });
            }
        };

        let header = Reader::new(data, order, "FFF header");
        let creator = header.string(0x04, 16)?;
        let version = header.u32(0x14)?;
        let dir_offset = header.u32(0x18)? as usize;
        let entries = header.u32(0x1c)? as usize;

        let dir = Reader::new(data, order, "FFF directory");
        let mut records = Vec::with_capacity(entries.min(256));
        for i in 0..entries {
            let base = dir_offset + i * FFF_DIR_ENTRY_LEN;
            let kind = dir.u16(base)?;
            // free slot
            if kind == 0 {
                continue;
            }
            records.push(FffRecord {
                kind,
                subtype: dir.u16(base + 0x02)?,
                version: dir.u32(base + 0x04)?,
                index_id: dir.u32(base + 0x08)?,
                offset: dir.u32(base + 0x0c)?,
                length: dir.u32(base + 0x10)?,
            });
        }

        Ok(Self {
            data,
            creator,
            version,
            order,
            records,
        })
    }

    pub fn record(&self, kind: u16) -> Option<&FffRecord> {
        self.records.iter().find(|r| r.kind == kind)
    }

    pub fn record_data(&self, record: &FffRecord) -> Result<&'a [u8], FlirError> {
        Reader::new(self.data, self.order, "FFF record")
            .bytes(record.offset as usize, record.length as usize)
    }
}
