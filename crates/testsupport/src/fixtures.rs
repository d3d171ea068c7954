//! Synthetic radiometric JPEGs.
//!
//! The builder runs the extraction pipeline backwards: temperatures become raw
//! counts through the inverse Planck model, the counts and the calibration are
//! packed into an FFF container, and the container is split into FLIR APP1
//! segments inside an ordinary JPEG.

use image::{GrayImage, ImageBuffer, ImageFormat, Luma};
use powerscan_flir::fff::{FFF_DIR_ENTRY_LEN, FFF_HEADER_LEN, RECORD_CAMERA_INFO, RECORD_RAW_DATA};
use powerscan_flir::jpeg::{FLIR_SEGMENT_HEADER_LEN, FLIR_SEGMENT_MAGIC};
use powerscan_flir::raw::RAW_DATA_HEADER_LEN;
use powerscan_flir::{ByteOrder, CameraInfo, PlanckModel};
use anyhow::{Context, Result};
use std::io::Cursor;

const MAX_SEGMENT_BODY: usize = u16::MAX as usize - 2 - FLIR_SEGMENT_HEADER_LEN;

/// Row-major horizontal ramp from `min` (left) to `max` (right).
pub fn gradient(width: u32, height: u32, min: f64, max: f64) -> Vec<f64> {
    let step = if width > 1 {
        (max - min) / f64::from(width - 1)
    } else {
        0.0
    };
    (0..height)
        .flat_map(|_| (0..width).map(move |x| min + step * f64::from(x)))
        .collect()
}

/// A grayscale ramp JPEG without any FLIR data.
pub fn plain_jpeg(width: u32, height: u32) -> Result<Vec<u8>> {
    let img = GrayImage::from_fn(width, height, |x, _| {
        Luma([(x * 255 / width.max(2).saturating_sub(1)).min(255) as u8])
    });
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Jpeg)
        .context("encode JPEG")?;
    Ok(out.into_inner())
}

#[derive(Debug, Clone)]
pub struct RadiometricJpegBuilder {
    width: u32,
    height: u32,
    celsius: Vec<f64>,
    camera: CameraInfo,
    order: ByteOrder,
    png: bool,
    segment_body: usize,
}

impl RadiometricJpegBuilder {
    /// Defaults to a 20..40 °C ramp, little-endian records and a PNG frame.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            celsius: gradient(width, height, 20.0, 40.0),
            camera: CameraInfo {
                camera_model: "FLIR E8".to_string(),
                camera_serial: "PS-TEST".to_string(),
                ..CameraInfo::default()
            },
            order: ByteOrder::Little,
            png: true,
            segment_body: MAX_SEGMENT_BODY,
        }
    }

    /// Not checked against the dimensions, so mismatched frames can be built.
    pub fn temperatures(mut self, celsius: Vec<f64>) -> Self {
        self.celsius = celsius;
        self
    }

    pub fn camera(mut self, camera: CameraInfo) -> Self {
        self.camera = camera;
        self
    }

    pub fn byte_order(mut self, order: ByteOrder) -> Self {
        self.order = order;
        self
    }

    /// Store the frame as packed u16 instead of PNG.
    pub fn packed(mut self) -> Self {
        self.png = false;
        self
    }

    /// Forces the FFF blob to be split into segments of at most `len` bytes.
    pub fn segment_size(mut self, len: usize) -> Self {
        self.segment_body = len.clamp(1, MAX_SEGMENT_BODY);
        self
    }

    fn u16_bytes(&self, v: u16) -> [u8; 2] {
        match self.order {
            ByteOrder::Big => v.to_be_bytes(),
            ByteOrder::Little => v.to_le_bytes(),
        }
    }

    fn u32_bytes(&self, v: u32) -> [u8; 4] {
        match self.order {
            ByteOrder::Big => v.to_be_bytes(),
            ByteOrder::Little => v.to_le_bytes(),
        }
    }

    /// Raw counts the extractor should read back.
    pub fn raw_counts(&self) -> Vec<u16> {
        let model = PlanckModel::new(&self.camera);
        self.celsius
            .iter()
            .map(|t| model.to_raw(*t).round().clamp(0.0, f64::from(u16::MAX)) as u16)
            .collect()
    }

    pub fn raw_record(&self) -> Result<Vec<u8>> {
        let counts = self.raw_counts();
        let mut record = vec![0u8; RAW_DATA_HEADER_LEN];
        record[0..2].copy_from_slice(&self.u16_bytes(2));
        record[2..4].copy_from_slice(&self.u16_bytes(self.width as u16));
        record[4..6].copy_from_slice(&self.u16_bytes(self.height as u16));

        if self.png {
            let stored: Vec<u16> = counts.iter().map(|v| v.swap_bytes()).collect();
            let frame = ImageBuffer::<Luma<u16>, _>::from_raw(self.width, self.height, stored)
                .context("temperatures do not fill the frame")?;
            let mut png = Cursor::new(Vec::new());
            frame.write_to(&mut png, ImageFormat::Png).context("encode PNG")?;
            record.extend_from_slice(png.get_ref());
        } else {
            for v in counts {
                record.extend_from_slice(&self.u16_bytes(v));
            }
        }
        Ok(record)
    }

    /// The FFF container with a RawData and a CameraInfo record.
    pub fn fff(&self) -> Result<Vec<u8>> {
        let records = [
            (RECORD_RAW_DATA, self.raw_record()?),
            (RECORD_CAMERA_INFO, self.camera.to_record(self.order)),
        ];

        let dir_len = records.len() * FFF_DIR_ENTRY_LEN;
        let mut blob = vec![0u8; FFF_HEADER_LEN + dir_len];
        blob[0..4].copy_from_slice(b"FFF\0");
        blob[4..4 + 13].copy_from_slice(b"PowerScanTest");
        blob[0x14..0x18].copy_from_slice(&self.u32_bytes(100));
        blob[0x18..0x1c].copy_from_slice(&self.u32_bytes(FFF_HEADER_LEN as u32));
        blob[0x1c..0x20].copy_from_slice(&self.u32_bytes(records.len() as u32));

        for (i, (kind, data)) in records.iter().enumerate() {
            let offset = blob.len() as u32;
            let entry = FFF_HEADER_LEN + i * FFF_DIR_ENTRY_LEN;
            blob[entry..entry + 2].copy_from_slice(&self.u16_bytes(*kind));
            blob[entry + 0x04..entry + 0x08].copy_from_slice(&self.u32_bytes(100));
            blob[entry + 0x08..entry + 0x0c].copy_from_slice(&self.u32_bytes(i as u32 + 1));
            blob[entry + 0x0c..entry + 0x10].copy_from_slice(&self.u32_bytes(offset));
            blob[entry + 0x10..entry + 0x14].copy_from_slice(&self.u32_bytes(data.len() as u32));
            blob.extend_from_slice(data);
        }
        Ok(blob)
    }

    pub fn build(&self) -> Result<Vec<u8>> {
        let visible = plain_jpeg(self.width.max(8), self.height.max(8))?;
        let fff = self.fff()?;
        let chunks: Vec<&[u8]> = fff.chunks(self.segment_body).collect();
        let last = (chunks.len() - 1) as u8;

        let mut jpeg = visible[..2].to_vec();
        for (index, chunk) in chunks.iter().enumerate() {
            let seg_len = (2 + FLIR_SEGMENT_HEADER_LEN + chunk.len()) as u16;
            jpeg.extend_from_slice(&[0xFF, 0xE1]);
            jpeg.extend_from_slice(&seg_len.to_be_bytes());
            jpeg.extend_from_slice(FLIR_SEGMENT_MAGIC);
            jpeg.extend_from_slice(&[1, index as u8, last]);
            jpeg.extend_from_slice(chunk);
        }
        jpeg.extend_from_slice(&visible[2..]);
        Ok(jpeg)
    }
}
