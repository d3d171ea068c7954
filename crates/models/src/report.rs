use serde::{Deserialize, Serialize};

/// A single inspection measurement as exported by the field app.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MeasureData {
    pub id_unico: String,
    #[serde(default)]
    pub inspection_id: Option<String>,
    #[serde(default)]
    pub registro_num: Option<i64>,
    #[serde(default)]
    pub localizacao: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub temp1_c: Option<f64>,
    /// Excel serial date (days since 1899-12-30).
    #[serde(default)]
    pub data_criacao: Option<f64>,
    #[serde(default)]
    pub alimentador: Option<String>,
    #[serde(default)]
    pub inspetor: Option<String>,
    #[serde(default)]
    pub regional: Option<String>,
    #[serde(default)]
    pub severidade: Option<String>,
    #[serde(default)]
    pub observations: Option<String>,
    #[serde(default)]
    pub vel_do_ar_na_inspecao_ms: Option<f64>,
    #[serde(default)]
    pub umidade_relativa: Option<f64>,
    #[serde(default)]
    pub carregamento: Option<f64>,
    #[serde(default)]
    pub nome_inspecao: Option<String>,
}

impl MeasureData {
    /// Both coordinates, when present and non-zero.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (non_zero(self.latitude), non_zero(self.longitude)) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

/// Row of the elements table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ElementData {
    #[serde(default)]
    pub numero_operativo: Option<String>,
    #[serde(default)]
    pub elemento: Option<String>,
    #[serde(default)]
    pub temperatura: Option<String>,
    #[serde(default)]
    pub metodo: Option<String>,
    #[serde(default)]
    pub calculada: Option<String>,
    #[serde(default)]
    pub acao: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PdfRequest {
    pub measure_data: MeasureData,
    #[serde(default)]
    pub thermal_image_url: Option<String>,
    #[serde(default)]
    pub optical_image_url: Option<String>,
    #[serde(default)]
    pub client_company_logo_url: Option<String>,
    #[serde(default = "default_language")]
    pub language: Option<String>,
    #[serde(default = "default_elements")]
    pub elements: Option<Vec<ElementData>>,
}

fn default_language() -> Option<String> {
    Some("pt".to_string())
}

fn default_elements() -> Option<Vec<ElementData>> {
    Some(Vec::new())
}

/// Zero counts as "not measured".
pub fn non_zero(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}
