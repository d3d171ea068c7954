use crate::{FlirError, ThermalImage};
use tracing::debug;

pub const ESTIMATE_WARNING: &str = "Temperatures are relative, not absolute";

/// Maps image brightness linearly onto `[min_temp, max_temp]`.
///
/// This is a visual approximation for images without radiometric data, not
/// a measurement.
pub fn estimate_from_brightness(
    image_bytes: &[u8],
    min_temp: f64,
    max_temp: f64,
) -> Result<ThermalImage, FlirError> {
    let gray = image::load_from_memory(image_bytes)
        .map_err(|e| FlirError::InvalidImage { reason: e.to_string() })?
        .into_luma8();
    let (width, height) = gray.dimensions();

    let (lo, hi) = gray
        .as_raw()
        .iter()
        .fold((u8::MAX, u8::MIN), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    let (lo, hi) = (f64::from(lo), f64::from(hi));
    let span = hi - lo + 1e-6;

    let celsius = gray
        .as_raw()
        .iter()
        .map(|v| min_temp + (f64::from(*v) - lo) / span * (max_temp - min_temp))
        .collect();

    debug!(width, height, lo, hi, "Estimated temperatures from brightness");
    Ok(ThermalImage {
        width,
        height,
        celsius,
        camera: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, ImageFormat, Luma};

    fn png(img: &GrayImage) -> Vec<u8> {
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn scales_brightness_to_range() {
        let img = GrayImage::from_fn(3, 1, |x, _| Luma([[0u8, 128, 255][x as usize]]));
        let thermal = estimate_from_brightness(&png(&img), 20.0, 45.0).unwrap();

        assert_eq!((thermal.width, thermal.height), (3, 1));
        assert!((thermal.celsius[0] - 20.0).abs() < 1e-6);
        assert!((thermal.celsius[2] - 45.0).abs() < 1e-4);
        assert!(thermal.celsius[1] > 32.0 && thermal.celsius[1] < 33.0);
    }

    #[test]
    fn uniform_image_maps_to_minimum() {
        let img = GrayImage::from_pixel(4, 4, Luma([90u8]));
        let thermal = estimate_from_brightness(&png(&img), 20.0, 45.0).unwrap();
        assert!(thermal.celsius.iter().all(|t| (*t - 20.0).abs() < 1e-9));
    }

    #[test]
    fn garbage_is_invalid_image() {
        let result = estimate_from_brightness(b"not an image", 20.0, 45.0);
        assert!(matches!(result, Err(FlirError::InvalidImage { .. })));
    }
}
