use crate::camera::CameraInfo;

const KELVIN: f64 = 273.15;

/// Raw sensor value to object temperature conversion for one capture.
///
/// The atmosphere and IR window attenuation only depend on the capture
/// parameters, so they are computed once and reused for every pixel.
#[derive(Debug, Clone)]
pub struct PlanckModel {
    r1: f64,
    r2: f64,
    b: f64,
    f: f64,
    o: f64,
    /// Divisor applied to the raw value: E * tau1 * IRT * tau2.
    gain: f64,
    /// Radiance of reflections, atmosphere and window, already attenuated.
    offset: f64,
}

impl PlanckModel {
    pub fn new(camera: &CameraInfo) -> Self {
        let e = camera.emissivity;
        let od = camera.object_distance;
        let irt = camera.ir_window_transmission;
        let atemp = camera.atmospheric_temp_c;

        let emiss_wind = 1.0 - irt;
        let refl_wind = 0.0;

        let h2o = (camera.relative_humidity / 100.0)
            * (1.5587 + 0.06939 * atemp - 0.00027816 * atemp.powi(2)
                + 0.00000068455 * atemp.powi(3))
            .exp();
        let path = -(od / 2.0).sqrt();
        let tau = camera.atmospheric_trans_x
            * (path * (camera.atmospheric_trans_alpha1
                + camera.atmospheric_trans_beta1 * h2o.sqrt()))
            .exp()
            + (1.0 - camera.atmospheric_trans_x)
                * (path * (camera.atmospheric_trans_alpha2
                    + camera.atmospheric_trans_beta2 * h2o.sqrt()))
                .exp();
        let (tau1, tau2) = (tau, tau);

        let radiance = |temp_c: f64| {
            camera.planck_r1
                / (camera.planck_r2 * ((camera.planck_b / (temp_c + KELVIN)).exp() - camera.planck_f))
                - camera.planck_o
        };

        let raw_refl1_attn = (1.0 - e) / e * radiance(camera.reflected_temp_c);
        let raw_atm1_attn = (1.0 - tau1) / e / tau1 * radiance(atemp);
        let raw_wind_attn = emiss_wind / e / tau1 / irt * radiance(camera.ir_window_temp_c);
        let raw_refl2_attn = refl_wind / e / tau1 / irt * radiance(camera.reflected_temp_c);
        let raw_atm2_attn = (1.0 - tau2) / e / tau1 / irt / tau2 * radiance(atemp);

        Self {
            r1: camera.planck_r1,
            r2: camera.planck_r2,
            b: camera.planck_b,
            f: camera.planck_f,
            o: camera.planck_o,
            gain: e * tau1 * irt * tau2,
            offset: raw_atm1_attn + raw_atm2_attn + raw_wind_attn + raw_refl1_attn + raw_refl2_attn,
        }
    }

    pub fn to_celsius(&self, raw: f64) -> f64 {
        let raw_obj = raw / self.gain - self.offset;
        self.b / (self.r1 / (self.r2 * (raw_obj + self.o)) + self.f).ln() - KELVIN
    }

    /// Inverse of [`PlanckModel::to_celsius`].
    pub fn to_raw(&self, celsius: f64) -> f64 {
        let raw_obj = self.r1 / (self.r2 * ((self.b / (celsius + KELVIN)).exp() - self.f)) - self.o;
        (raw_obj + self.offset) * self.gain
    }
}

pub fn raw_to_celsius(raw: f64, camera: &CameraInfo) -> f64 {
    PlanckModel::new(camera).to_celsius(raw)
}
