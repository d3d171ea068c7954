use crate::FlirError;
use tracing::debug;

const MARKER_SOI: u8 = 0xD8;
const MARKER_EOI: u8 = 0xD9;
const MARKER_SOS: u8 = 0xDA;
const MARKER_APP1: u8 = 0xE1;

/// Every FLIR APP1 payload starts with this, followed by a version byte,
/// the segment index and the index of the last segment.
pub const FLIR_SEGMENT_MAGIC: &[u8; 5] = b"FLIR\0";
pub const FLIR_SEGMENT_HEADER_LEN: usize = 8;

/// Collects the FLIR APP1 segments of a JPEG and reassembles the FFF blob
/// they carry.
pub fn read_flir_segments(jpeg: &[u8]) -> Result<Vec<u8>, FlirError> {
    if jpeg.len() < 4 || jpeg[0] != 0xFF || jpeg[1] != MARKER_SOI {
        return Err(FlirError::NotJpeg);
    }

    let mut segments: Vec<(u8, &[u8])> = Vec::new();
    let mut pos = 2;

    while pos + 4 <= jpeg.len() {
        if jpeg[pos] != 0xFF {
            break;
        }
        let marker = jpeg[pos + 1];
        // fill byte
        if marker == 0xFF {
            pos += 1;
            continue;
        }
        if marker == MARKER_EOI || marker == MARKER_SOS {
            break;
        }
        // standalone markers carry no length
        if (0xD0..=0xD7).contains(&marker) || marker == 0x01 {
            pos += 2;
            continue;
        }

        let seg_len = u16::from_be_bytes([jpeg[pos + 2], jpeg[pos + 3]]) as usize;
        if seg_len < 2 || pos + 2 + seg_len > jpeg.len() {
            return Err(FlirError::Truncated { what: "JPEG segment" });
        }
        let payload = &jpeg[pos + 4..pos + 2 + seg_len];

        if marker == MARKER_APP1
            && payload.len() >= FLIR_SEGMENT_HEADER_LEN
            && payload.starts_with(FLIR_SEGMENT_MAGIC)
        {
            segments.push((payload[6], &payload[FLIR_SEGMENT_HEADER_LEN..]));
        }

        pos += 2 + seg_len;
    }

    if segments.is_empty() {
        return Err(FlirError::NotRadiometric);
    }

    segments.sort_by_key(|(index, _)| *index);
    let total: usize = segments.iter().map(|(_, body)| body.len()).sum();
    let mut blob = Vec::with_capacity(total);
    for (_, body) in &segments {
        blob.extend_from_slice(body);
    }

    debug!(segments = segments.len(), bytes = blob.len(), "Reassembled FLIR segments");
    Ok(blob)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app1(index: u8, last: u8, body: &[u8]) -> Vec<u8> {
        let mut payload = FLIR_SEGMENT_MAGIC.to_vec();
        payload.extend_from_slice(&[1, index, last]);
        payload.extend_from_slice(body);
        let len = (payload.len() + 2) as u16;
        let mut seg = vec![0xFF, MARKER_APP1];
        seg.extend_from_slice(&len.to_be_bytes());
        seg.extend_from_slice(&payload);
        seg
    }

    #[test]
    fn reassembles_in_index_order() {
        let mut jpeg = vec![0xFF, MARKER_SOI];
        jpeg.extend(app1(1, 1, b"world"));
        jpeg.extend(app1(0, 1, b"hello "));
        jpeg.extend([0xFF, MARKER_EOI]);

        assert_eq!(read_flir_segments(&jpeg).unwrap(), b"hello world");
    }

    #[test]
    fn ignores_other_app1_segments() {
        let mut jpeg = vec![0xFF, MARKER_SOI];
        let exif = b"Exif\0\0data";
        jpeg.extend([0xFF, MARKER_APP1, 0, (exif.len() + 2) as u8]);
        jpeg.extend_from_slice(exif);
        jpeg.extend(app1(0, 0, b"fff"));
        jpeg.extend([0xFF, MARKER_EOI]);

        assert_eq!(read_flir_segments(&jpeg).unwrap(), b"fff");
    }

    #[test]
    fn plain_jpeg_is_not_radiometric() {
        let jpeg = [0xFF, MARKER_SOI, 0xFF, MARKER_EOI];
        assert!(matches!(read_flir_segments(&jpeg), Err(FlirError::NotRadiometric)));
    }

    #[test]
    fn rejects_non_jpeg() {
        assert!(matches!(read_flir_segments(b"\x89PNG\r\n"), Err(FlirError::NotJpeg)));
    }

    #[test]
    fn rejects_truncated_segment() {
        let jpeg = [0xFF, MARKER_SOI, 0xFF, MARKER_APP1, 0x10, 0x00, b'F'];
        assert!(matches!(read_flir_segments(&jpeg), Err(FlirError::Truncated { .. })));
    }
}
