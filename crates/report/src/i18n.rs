use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    Pt,
    En,
    Es,
}

impl Language {
    /// Unknown or missing codes fall back to Portuguese.
    pub fn from_code(code: Option<&str>) -> Self {
        code.and_then(|c| c.parse().ok()).unwrap_or_default()
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::Pt => "pt",
            Language::En => "en",
            Language::Es => "es",
        }
    }

    pub fn translations(&self) -> &'static Translations {
        match self {
            Language::Pt => &PT,
            Language::En => &EN,
            Language::Es => &ES,
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pt" => Ok(Language::Pt),
            "en" => Ok(Language::En),
            "es" => Ok(Language::Es),
            _ => Err(format!("Unsupported language: {s}")),
        }
    }
}

#[derive(Debug)]
pub struct Translations {
    pub report_title: &'static str,
    pub measure: &'static str,
    pub detected_feeders: &'static str,
    pub date_time: &'static str,
    pub address: &'static str,
    pub inspection_name: &'static str,
    pub feeder: &'static str,
    pub coordinates: &'static str,
    pub temperature: &'static str,
    pub relative_humidity: &'static str,
    pub load: &'static str,
    pub wind: &'static str,
    pub op_number: &'static str,
    pub element: &'static str,
    pub method: &'static str,
    pub calculated: &'static str,
    pub action: &'static str,
    pub no_elements: &'static str,
}

static PT: Translations = Translations {
    report_title: "Relatório de Inspeção Termográfica",
    measure: "Medida",
    detected_feeders: "Alimentadores Detectados",
    date_time: "Data e Hora",
    address: "Endereço",
    inspection_name: "Nome Inspeção",
    feeder: "Alimentador",
    coordinates: "Coordenadas",
    temperature: "Temperatura",
    relative_humidity: "Umidade Relativa",
    load: "Carregamento",
    wind: "Vento",
    op_number: "Número Operativo",
    element: "Elemento",
    method: "Método",
    calculated: "Calculada",
    action: "Ação",
    no_elements: "Sem dados de elementos",
};

static EN: Translations = Translations {
    report_title: "Thermographic Inspection Report",
    measure: "Measure",
    detected_feeders: "Detected Feeders",
    date_time: "Date & Time",
    address: "Address",
    inspection_name: "Inspection Name",
    feeder: "Feeder",
    coordinates: "Coordinates",
    temperature: "Temperature",
    relative_humidity: "Relative Humidity",
    load: "Load",
    wind: "Wind",
    op_number: "Operative Number",
    element: "Element",
    method: "Method",
    calculated: "Calculated",
    action: "Action",
    no_elements: "No elements data",
};

static ES: Translations = Translations {
    report_title: "Informe de Inspección Termográfica",
    measure: "Medida",
    detected_feeders: "Alimentadores Detectados",
    date_time: "Fecha y Hora",
    address: "Dirección",
    inspection_name: "Nombre de Inspección",
    feeder: "Alimentador",
    coordinates: "Coordenadas",
    temperature: "Temperatura",
    relative_humidity: "Humedad Relativa",
    load: "Carga",
    wind: "Viento",
    op_number: "Número Operativo",
    element: "Elemento",
    method: "Método",
    calculated: "Calculada",
    action: "Acción",
    no_elements: "Sin datos de elementos",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_codes() {
        assert_eq!("EN".parse::<Language>().unwrap(), Language::En);
        assert_eq!(" es ".parse::<Language>().unwrap(), Language::Es);
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn unknown_falls_back_to_portuguese() {
        assert_eq!(Language::from_code(Some("de")), Language::Pt);
        assert_eq!(Language::from_code(None), Language::Pt);
        assert_eq!(
            Language::from_code(Some("fr")).translations().report_title,
            "Relatório de Inspeção Termográfica"
        );
    }

    #[test]
    fn each_language_has_its_own_title() {
        assert_eq!(Language::En.translations().report_title, "Thermographic Inspection Report");
        assert_eq!(Language::Es.translations().action, "Acción");
    }
}
