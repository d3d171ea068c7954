use crate::format::MeasureFields;
use crate::i18n::{Language, Translations};
use powerscan_models::{ElementData, MeasureData};
use std::fmt::Write as _;

const STYLESHEET: &str = include_str!("report.css");
const TEXT_LOGO: &str = r#"<span class="logo-text">&#9889;PowerScan</span>"#;

/// Everything the two report pages show. Images are data URIs.
#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    pub measure: &'a MeasureData,
    pub elements: &'a [ElementData],
    pub language: Language,
    pub thermal_image: Option<String>,
    pub optical_image: Option<String>,
    pub map_image: Option<String>,
    pub qr_code: Option<String>,
    pub client_logo: Option<String>,
    pub powerscan_logo: Option<String>,
}

impl<'a> ReportContext<'a> {
    pub fn new(measure: &'a MeasureData) -> Self {
        Self {
            measure,
            elements: &[],
            language: Language::default(),
            thermal_image: None,
            optical_image: None,
            map_image: None,
            qr_code: None,
            client_logo: None,
            powerscan_logo: None,
        }
    }
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn or_dash(value: &Option<String>) -> String {
    value.as_deref().map(escape).unwrap_or_else(|| "-".to_string())
}

fn img(src: &Option<String>, class: Option<&str>) -> Option<String> {
    src.as_ref().map(|s| match class {
        Some(c) => format!(r#"<img src="{}" class="{}" />"#, escape(s), c),
        None => format!(r#"<img src="{}" />"#, escape(s)),
    })
}

fn header(t: &Translations, left_logo: &str, right_logo: &str) -> String {
    format!(
        r#"<table class="header-table">
    <tr>
        <td style="width: 20%;">{left_logo}</td>
        <td style="width: 60%;"><div class="header-title">{title}</div></td>
        <td style="width: 20%;" class="logo-right-cell">{right_logo}</td>
    </tr>
</table>"#,
        title = escape(t.report_title),
    )
}

fn info_cell(width: u8, label: &str, value: &str, link: bool) -> String {
    let class = if link { "info-value link" } else { "info-value" };
    format!(
        r#"<td style="width: {width}%;"><div class="info-label">{}</div><div class="{class}">{value}</div></td>"#,
        escape(label)
    )
}

fn element_rows(t: &Translations, elements: &[ElementData]) -> String {
    if elements.is_empty() {
        return format!(r#"<tr><td colspan="6" class="empty">{}</td></tr>"#, escape(t.no_elements));
    }

    let mut rows = String::new();
    for elem in elements {
        let action_class = match elem.acao.as_deref() {
            Some(a) if a != "-" => "action-green",
            _ => "",
        };
        let _ = write!(
            rows,
            r#"<tr><td>{}</td><td>{}</td><td>{}</td><td class="method">{}</td><td>{}</td><td class="{}">{}</td></tr>"#,
            elem.numero_operativo.as_deref().map(escape).unwrap_or_else(|| "N/A".to_string()),
            or_dash(&elem.elemento),
            or_dash(&elem.temperatura),
            or_dash(&elem.metodo),
            or_dash(&elem.calculada),
            action_class,
            or_dash(&elem.acao),
        );
    }
    rows
}

/// Renders the two-page A4 inspection report.
pub fn render_report_html(ctx: &ReportContext<'_>) -> String {
    let t = ctx.language.translations();
    let m = ctx.measure;
    let fields = MeasureFields::from_measure(m);

    let right_logo =
        img(&ctx.powerscan_logo, Some("logo-img-right")).unwrap_or_else(|| TEXT_LOGO.to_string());
    let left_logo = img(&ctx.client_logo, Some("logo-img-left"))
        .or_else(|| img(&ctx.powerscan_logo, Some("logo-img-left")))
        .unwrap_or_else(|| TEXT_LOGO.to_string());
    let header = header(t, &left_logo, &right_logo);

    let thermal = img(&ctx.thermal_image, None)
        .unwrap_or_else(|| r#"<div class="placeholder thermal"></div>"#.to_string());
    let optical = img(&ctx.optical_image, None)
        .unwrap_or_else(|| r#"<div class="placeholder optical"></div>"#.to_string());
    let map = img(&ctx.map_image, None)
        .unwrap_or_else(|| r#"<div class="placeholder map">Map unavailable</div>"#.to_string());
    let qr = img(&ctx.qr_code, None)
        .unwrap_or_else(|| r#"<div class="placeholder">QR Code</div>"#.to_string());

    let feeder = or_dash(&m.alimentador);
    let row1 = [
        info_cell(30, t.measure, &escape(&m.id_unico), true),
        info_cell(40, t.detected_feeders, &feeder, false),
        info_cell(30, t.date_time, &escape(&fields.date_time), false),
    ]
    .concat();
    let row2 = [
        info_cell(40, t.address, &or_dash(&m.localizacao), false),
        info_cell(30, t.inspection_name, &or_dash(&m.nome_inspecao), false),
        info_cell(30, t.feeder, &feeder, false),
    ]
    .concat();
    let row3 = [
        info_cell(25, t.coordinates, &escape(&fields.coordinates), false),
        info_cell(15, t.temperature, &escape(&fields.temperature), false),
        info_cell(20, t.relative_humidity, &escape(&fields.humidity), false),
        info_cell(20, t.load, &escape(&fields.load), false),
        info_cell(20, t.wind, &escape(&fields.wind), false),
    ]
    .concat();

    let columns = [t.op_number, t.element, t.temperature, t.method, t.calculated, t.action]
        .iter()
        .map(|c| format!("<th>{}</th>", escape(c)))
        .collect::<String>();
    let rows = element_rows(t, ctx.elements);

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
<meta charset="UTF-8">
<style>
{STYLESHEET}
</style>
</head>
<body>
<div class="page">
{header}
<table class="info-table"><tr>{row1}</tr></table>
<table class="info-table"><tr>{row2}</tr></table>
<table class="info-table"><tr>{row3}</tr></table>
<table class="images-table"><tr><td>{thermal}</td><td>{optical}</td></tr></table>
<table class="elements-table">
<thead><tr>{columns}</tr></thead>
<tbody>{rows}</tbody>
</table>
</div>
<div class="page">
{header}
<div class="page2-content">
<table class="page2-table"><tr><td class="map-cell">{map}</td><td class="qr-cell">{qr}</td></tr></table>
</div>
</div>
</body>
</html>
"#,
        lang = ctx.language.code(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measure() -> MeasureData {
        MeasureData {
            id_unico: "M-100".into(),
            alimentador: Some("AL-07".into()),
            localizacao: Some("Rua A & B".into()),
            ..Default::default()
        }
    }

    #[test]
    fn escapes_user_text() {
        assert_eq!(escape(r#"<b>"x"&'y'</b>"#), "&lt;b&gt;&quot;x&quot;&amp;&#39;y&#39;&lt;/b&gt;");
    }

    #[test]
    fn empty_elements_show_translated_message() {
        let m = measure();
        let ctx = ReportContext {
            language: Language::En,
            ..ReportContext::new(&m)
        };
        let html = render_report_html(&ctx);
        assert!(html.contains("No elements data"));
        assert!(html.contains("Thermographic Inspection Report"));
        assert!(html.contains("Rua A &amp; B"));
        assert!(html.contains("Map unavailable"));
        assert!(html.contains("placeholder thermal"));
    }

    #[test]
    fn action_class_only_for_real_actions() {
        let m = measure();
        let elements = vec![
            ElementData {
                numero_operativo: Some("OP-1".into()),
                acao: Some("Replace".into()),
                ..Default::default()
            },
            ElementData {
                acao: Some("-".into()),
                ..Default::default()
            },
        ];
        let ctx = ReportContext {
            elements: &elements,
            ..ReportContext::new(&m)
        };
        let html = render_report_html(&ctx);
        assert_eq!(html.matches(r#"class="action-green""#).count(), 1);
        assert!(html.contains("<td>N/A</td>"));
        assert!(html.contains("<td>OP-1</td>"));
    }

    #[test]
    fn client_logo_takes_left_slot() {
        let m = measure();
        let ctx = ReportContext {
            client_logo: Some("data:image/png;base64,CLIENT".into()),
            powerscan_logo: Some("data:image/svg+xml;base64,PS".into()),
            ..ReportContext::new(&m)
        };
        let html = render_report_html(&ctx);
        assert!(html.contains(r#"<img src="data:image/png;base64,CLIENT" class="logo-img-left" />"#));
        assert!(html.contains(r#"<img src="data:image/svg+xml;base64,PS" class="logo-img-right" />"#));
    }

    #[test]
    fn text_logo_when_no_images() {
        let m = measure();
        let ctx = ReportContext::new(&m);
        let html = render_report_html(&ctx);
        // left and right on both pages
        assert_eq!(html.matches("logo-text\">").count(), 4);
    }
}
