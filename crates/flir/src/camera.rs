use crate::reader::{ByteOrder, Reader};
use crate::FlirError;

const KELVIN: f64 = 273.15;

/// Byte offsets inside the CameraInfo record.
pub mod layout {
    pub const EMISSIVITY: usize = 0x20;
    pub const OBJECT_DISTANCE: usize = 0x24;
    pub const REFLECTED_APPARENT_TEMPERATURE: usize = 0x28;
    pub const ATMOSPHERIC_TEMPERATURE: usize = 0x2c;
    pub const IR_WINDOW_TEMPERATURE: usize = 0x30;
    pub const IR_WINDOW_TRANSMISSION: usize = 0x34;
    pub const RELATIVE_HUMIDITY: usize = 0x3c;
    pub const PLANCK_R1: usize = 0x58;
    pub const PLANCK_B: usize = 0x5c;
    pub const PLANCK_F: usize = 0x60;
    pub const ATMOSPHERIC_TRANS_ALPHA1: usize = 0x70;
    pub const ATMOSPHERIC_TRANS_ALPHA2: usize = 0x74;
    pub const ATMOSPHERIC_TRANS_BETA1: usize = 0x78;
    pub const ATMOSPHERIC_TRANS_BETA2: usize = 0x7c;
    pub const ATMOSPHERIC_TRANS_X: usize = 0x80;
    pub const CAMERA_MODEL: usize = 0xd4;
    pub const CAMERA_MODEL_LEN: usize = 32;
    pub const CAMERA_SERIAL: usize = 0x104;
    pub const CAMERA_SERIAL_LEN: usize = 16;
    pub const LENS_MODEL: usize = 0x170;
    pub const LENS_MODEL_LEN: usize = 32;
    pub const PLANCK_O: usize = 0x308;
    pub const PLANCK_R2: usize = 0x30c;
    pub const RECORD_LEN: usize = 0x310;
}

/// Calibration and environment parameters of a radiometric capture.
/// Temperatures are in degrees Celsius and humidity is a percentage.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraInfo {
    pub emissivity: f64,
    pub object_distance: f64,
    pub reflected_temp_c: f64,
    pub atmospheric_temp_c: f64,
    pub ir_window_temp_c: f64,
    pub ir_window_transmission: f64,
    pub relative_humidity: f64,
    pub planck_r1: f64,
    pub planck_b: f64,
    pub planck_f: f64,
    pub planck_o: f64,
    pub planck_r2: f64,
    pub atmospheric_trans_alpha1: f64,
    pub atmospheric_trans_alpha2: f64,
    pub atmospheric_trans_beta1: f64,
    pub atmospheric_trans_beta2: f64,
    pub atmospheric_trans_x: f64,
    pub camera_model: String,
    pub camera_serial: String,
    pub lens_model: String,
}

impl Default for CameraInfo {
    fn default() -> Self {
        Self {
            emissivity: 1.0,
            object_distance: 1.0,
            reflected_temp_c: 20.0,
            atmospheric_temp_c: 20.0,
            ir_window_temp_c: 20.0,
            ir_window_transmission: 1.0,
            relative_humidity: 50.0,
            planck_r1: 21106.77,
            planck_b: 1501.0,
            planck_f: 1.0,
            planck_o: -7340.0,
            planck_r2: 0.012545258,
            atmospheric_trans_alpha1: 0.006569,
            atmospheric_trans_alpha2: 0.01262,
            atmospheric_trans_beta1: -0.002276,
            atmospheric_trans_beta2: -0.00667,
            atmospheric_trans_x: 1.9,
            camera_model: String::new(),
            camera_serial: String::new(),
            lens_model: String::new(),
        }
    }
}

impl CameraInfo {
    pub fn parse(data: &[u8]) -> Result<Self, FlirError> {
        if data.len() < layout::RECORD_LEN {
            return Err(FlirError::Truncated { what: "CameraInfo record" });
        }
        let order = ByteOrder::detect_record(data)?;
        let r = Reader::new(data, order, "CameraInfo record");
        let f = |offset| r.f32(offset).map(f64::from);

        // stored as a fraction, some firmwares write a percentage
        let humidity = f(layout::RELATIVE_HUMIDITY)?;
        let humidity = if humidity > 2.0 { humidity / 100.0 } else { humidity };

        Ok(Self {
            emissivity: f(layout::EMISSIVITY)?,
            object_distance: f(layout::OBJECT_DISTANCE)?,
            reflected_temp_c: f(layout::REFLECTED_APPARENT_TEMPERATURE)? - KELVIN,
            atmospheric_temp_c: f(layout::ATMOSPHERIC_TEMPERATURE)? - KELVIN,
            ir_window_temp_c: f(layout::IR_WINDOW_TEMPERATURE)? - KELVIN,
            ir_window_transmission: f(layout::IR_WINDOW_TRANSMISSION)?,
            relative_humidity: humidity * 100.0,
            planck_r1: f(layout::PLANCK_R1)?,
            planck_b: f(layout::PLANCK_B)?,
            planck_f: f(layout::PLANCK_F)?,
            planck_o: f64::from(r.i32(layout::PLANCK_O)?),
            planck_r2: f(layout::PLANCK_R2)?,
            atmospheric_trans_alpha1: f(layout::ATMOSPHERIC_TRANS_ALPHA1)?,
            atmospheric_trans_alpha2: f(layout::ATMOSPHERIC_TRANS_ALPHA2)?,
            atmospheric_trans_beta1: f(layout::ATMOSPHERIC_TRANS_BETA1)?,
            atmospheric_trans_beta2: f(layout::ATMOSPHERIC_TRANS_BETA2)?,
            atmospheric_trans_x: f(layout::ATMOSPHERIC_TRANS_X)?,
            camera_model: r.string(layout::CAMERA_MODEL, layout::CAMERA_MODEL_LEN)?,
            camera_serial: r.string(layout::CAMERA_SERIAL, layout::CAMERA_SERIAL_LEN)?,
            lens_model: r.string(layout::LENS_MODEL, layout::LENS_MODEL_LEN)?,
        })
    }

    /// Serializes into a CameraInfo record in the given byte order.
    pub fn to_record(&self, order: ByteOrder) -> Vec<u8> {
        let mut data = vec![0u8; layout::RECORD_LEN];
        let mut put = |offset: usize, bytes: [u8; 4]| {
            data[offset..offset + 4].copy_from_slice(&bytes);
        };
        let f32_bytes = |v: f64| match order {
            ByteOrder::Big => (v as f32).to_be_bytes(),
            ByteOrder::Little => (v as f32).to_le_bytes(),
        };

        put(layout::EMISSIVITY, f32_bytes(self.emissivity));
        put(layout::OBJECT_DISTANCE, f32_bytes(self.object_distance));
        put(layout::REFLECTED_APPARENT_TEMPERATURE, f32_bytes(self.reflected_temp_c + KELVIN));
        put(layout::ATMOSPHERIC_TEMPERATURE, f32_bytes(self.atmospheric_temp_c + KELVIN));
        put(layout::IR_WINDOW_TEMPERATURE, f32_bytes(self.ir_window_temp_c + KELVIN));
        put(layout::IR_WINDOW_TRANSMISSION, f32_bytes(self.ir_window_transmission));
        put(layout::RELATIVE_HUMIDITY, f32_bytes(self.relative_humidity / 100.0));
        put(layout::PLANCK_R1, f32_bytes(self.planck_r1));
        put(layout::PLANCK_B, f32_bytes(self.planck_b));
        put(layout::PLANCK_F, f32_bytes(self.planck_f));
        put(layout::ATMOSPHERIC_TRANS_ALPHA1, f32_bytes(self.atmospheric_trans_alpha1));
        put(layout::ATMOSPHERIC_TRANS_ALPHA2, f32_bytes(self.atmospheric_trans_alpha2));
        put(layout::ATMOSPHERIC_TRANS_BETA1, f32_bytes(self.atmospheric_trans_beta1));
        put(layout::ATMOSPHERIC_TRANS_BETA2, f32_bytes(self.atmospheric_trans_beta2));
        put(layout::ATMOSPHERIC_TRANS_X, f32_bytes(self.atmospheric_trans_x));
        put(layout::PLANCK_R2, f32_bytes(self.planck_r2));
        let planck_o = self.planck_o.round() as i32;
        put(
            layout::PLANCK_O,
            match order {
                ByteOrder::Big => planck_o.to_be_bytes(),
                ByteOrder::Little => planck_o.to_le_bytes(),
            },
        );

        let magic = match order {
            ByteOrder::Big => 2u16.to_be_bytes(),
            ByteOrder::Little => 2u16.to_le_bytes(),
        };
        data[0..2].copy_from_slice(&magic);

        for (offset, len, text) in [
            (layout::CAMERA_MODEL, layout::CAMERA_MODEL_LEN, &self.camera_model),
            (layout::CAMERA_SERIAL, layout::CAMERA_SERIAL_LEN, &self.camera_serial),
            (layout::LENS_MODEL, layout::LENS_MODEL_LEN, &self.lens_model),
        ] {
            let bytes = text.as_bytes();
            let n = bytes.len().min(len - 1);
            data[offset..offset + n].copy_from_slice(&bytes[..n]);
        }

        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CameraInfo {
        CameraInfo {
            emissivity: 0.95,
            object_distance: 3.0,
            reflected_temp_c: 22.0,
            relative_humidity: 65.0,
            camera_model: "FLIR E8".to_string(),
            camera_serial: "63901234".to_string(),
            lens_model: "FOL7".to_string(),
            ..CameraInfo::default()
        }
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-3, "{a} != {b}");
    }

    #[test]
    fn reads_back_little_endian_record() {
        let info = sample();
        let parsed = CameraInfo::parse(&info.to_record(ByteOrder::Little)).unwrap();
        assert_close(parsed.emissivity, 0.95);
        assert_close(parsed.object_distance, 3.0);
        assert_close(parsed.reflected_temp_c, 22.0);
        assert_close(parsed.relative_humidity, 65.0);
        assert_close(parsed.planck_o, -7340.0);
        assert_eq!(parsed.camera_model, "FLIR E8");
        assert_eq!(parsed.lens_model, "FOL7");
    }

    #[test]
    fn big_endian_record_is_detected() {
        let parsed = CameraInfo::parse(&sample().to_record(ByteOrder::Big)).unwrap();
        assert_eq!(parsed.camera_serial, "63901234");
        assert_close(parsed.planck_b, 1501.0);
    }

    #[test]
    fn percentage_humidity_is_normalised() {
        let mut record = sample().to_record(ByteOrder::Little);
        record[layout::RELATIVE_HUMIDITY..layout::RELATIVE_HUMIDITY + 4]
            .copy_from_slice(&40.0f32.to_le_bytes());
        let parsed = CameraInfo::parse(&record).unwrap();
        assert_close(parsed.relative_humidity, 40.0);
    }

    #[test]
    fn short_record_is_rejected() {
        assert!(matches!(
            CameraInfo::parse(&[0, 2, 0, 0]),
            Err(FlirError::Truncated { .. })
        ));
    }
}
