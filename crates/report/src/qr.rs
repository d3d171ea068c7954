use crate::fetch::data_uri;
use crate::ReportError;
use image::{GrayImage, ImageFormat, Luma};
use powerscan_models::MeasureData;
use qrcode::{Color, QrCode};

const BOX_SIZE: u32 = 10;
const BORDER: u32 = 2;

/// Where the report QR code points: the capture location on Google Maps,
/// or the measure page in the app when there are no coordinates.
pub fn qr_target(measure: &MeasureData, app_measure_url: &str) -> String {
    match measure.coordinates() {
        Some((lat, lon)) => format!("https://www.google.com/maps?q={lat},{lon}"),
        None => format!(
            "{}/{}",
            app_measure_url.trim_end_matches('/'),
            measure.id_unico
        ),
    }
}

pub fn qr_code_png(data: &str) -> Result<Vec<u8>, ReportError> {
    let code = QrCode::new(data.as_bytes()).map_err(|e| ReportError::QrCode {
        reason: e.to_string(),
    })?;
    let modules = code.width() as u32;
    let colors = code.to_colors();
    let size = (modules + 2 * BORDER) * BOX_SIZE;

    let img = GrayImage::from_fn(size, size, |x, y| {
        let (mx, my) = (x / BOX_SIZE, y / BOX_SIZE);
        let inside = (BORDER..BORDER + modules).contains(&mx) && (BORDER..BORDER + modules).contains(&my);
        if inside {
            let idx = ((my - BORDER) * modules + (mx - BORDER)) as usize;
            if colors[idx] == Color::Dark {
                return Luma([0u8]);
            }
        }
        Luma([255u8])
    });

    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)
        .map_err(|e| ReportError::Image { reason: e.to_string() })?;
    Ok(out.into_inner())
}

pub fn qr_code_data_uri(data: &str) -> Result<String, ReportError> {
    Ok(data_uri("image/png", &qr_code_png(data)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_prefers_coordinates() {
        let measure = MeasureData {
            id_unico: "M-9".into(),
            latitude: Some(-23.5),
            longitude: Some(-46.25),
            ..Default::default()
        };
        assert_eq!(
            qr_target(&measure, "https://powerscan.app/measure"),
            "https://www.google.com/maps?q=-23.5,-46.25"
        );
    }

    #[test]
    fn target_falls_back_to_app_link() {
        let measure = MeasureData {
            id_unico: "M-9".into(),
            ..Default::default()
        };
        assert_eq!(
            qr_target(&measure, "https://powerscan.app/measure/"),
            "https://powerscan.app/measure/M-9"
        );
    }

    #[test]
    fn renders_bordered_png() {
        let png = qr_code_png("https://powerscan.app/measure/M-9").unwrap();
        let img = image::load_from_memory(&png).unwrap().into_luma8();

        assert_eq!(img.width(), img.height());
        assert_eq!(img.width() % BOX_SIZE, 0);
        // quiet border is white, finder pattern corner is dark
        assert_eq!(img.get_pixel(0, 0)[0], 255);
        assert_eq!(img.get_pixel(BORDER * BOX_SIZE, BORDER * BOX_SIZE)[0], 0);
    }

    #[test]
    fn data_uri_prefix() {
        assert!(qr_code_data_uri("x").unwrap().starts_with("data:image/png;base64,"));
    }
}
