use crate::fetch::data_uri;
use rust_embed::RustEmbed;
use tracing::warn;

pub const POWERSCAN_LOGO: &str = "powerscan_logo.svg";

#[derive(RustEmbed)]
#[folder = "../../assets"]
struct Assets;

/// Embedded asset as a data URI, typed from its extension.
pub fn asset_data_uri(name: &str) -> Option<String> {
    match Assets::get(name) {
        Some(content) => {
            let mime = mime_guess::from_path(name).first_or_octet_stream();
            Some(data_uri(mime.as_ref(), &content.data))
        }
        None => {
            warn!("Asset not found: {}", name);
            None
        }
    }
}

pub fn logo_data_uri() -> Option<String> {
    asset_data_uri(POWERSCAN_LOGO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logo_is_embedded_as_svg() {
        let uri = logo_data_uri().unwrap();
        assert!(uri.starts_with("data:image/svg+xml;base64,"));
    }

    #[test]
    fn missing_asset_is_none() {
        assert!(asset_data_uri("nope.png").is_none());
    }
}
