use crate::reader::{ByteOrder, Reader};
use crate::FlirError;
use image::ImageFormat;

pub const RAW_DATA_HEADER_LEN: usize = 0x20;
const PNG_SIGNATURE: &[u8; 8] = b"\x89PNG\r\n\x1a\n";

/// Sensor counts of the thermal frame, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawThermalImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u16>,
}

impl RawThermalImage {
    pub fn parse(data: &[u8]) -> Result<Self, FlirError> {
        let order = ByteOrder::detect_record(data)?;
        let r = Reader::new(data, order, "RawData record");
        let width = u32::from(r.u16(0x02)?);
        let height = u32::from(r.u16(0x04)?);
        if width == 0 || height == 0 {
            return Err(FlirError::RawImage {
                reason: format!("empty {width}x{height} frame"),
            });
        }
        let payload = data
            .get(RAW_DATA_HEADER_LEN..)
            .ok_or(FlirError::Truncated { what: "RawData record" })?;

        let image = if payload.starts_with(PNG_SIGNATURE) {
            Self::decode_png(payload)?
        } else {
            Self::decode_packed(payload, width, height, order)?
        };

        if image.width != width || image.height != height {
            return Err(FlirError::DimensionMismatch {
                expected: (width, height),
                actual: (image.width, image.height),
            });
        }
        Ok(image)
    }

    /// FLIR writes little-endian samples into a format that is big-endian,
    /// so every decoded value has its bytes swapped.
    fn decode_png(payload: &[u8]) -> Result<Self, FlirError> {
        let decoded = image::load_from_memory_with_format(payload, ImageFormat::Png)
            .map_err(|e| FlirError::RawImage { reason: e.to_string() })?
            .into_luma16();
        let (width, height) = decoded.dimensions();
        let pixels = decoded.into_raw().into_iter().map(u16::swap_bytes).collect();
        Ok(Self { width, height, pixels })
    }

    fn decode_packed(
        payload: &[u8],
        width: u32,
        height: u32,
        order: ByteOrder,
    ) -> Result<Self, FlirError> {
        let count = width as usize * height as usize;
        let bytes = payload
            .get(..count * 2)
            .ok_or(FlirError::Truncated { what: "raw thermal pixels" })?;
        let pixels = bytes
            .chunks_exact(2)
            .map(|b| match order {
                ByteOrder::Big => u16::from_be_bytes([b[0], b[1]]),
                ByteOrder::Little => u16::from_le_bytes([b[0], b[1]]),
            })
            .collect();
        Ok(Self { width, height, pixels })
    }
}
