use crate::draw::draw_pin_marker;
use crate::fetch::data_uri;
use crate::ReportError;
use futures::future::join_all;
use image::{imageops, ImageFormat, Rgba, RgbaImage};
use powerscan_models::MapConfig;
use reqwest::{header::USER_AGENT, Client};
use std::time::Duration;
use tracing::{debug, instrument, warn};

pub const TILE_SIZE: u32 = 256;
pub const PIN_SIZE: i64 = 36;
pub const PIN_HOT: [u8; 3] = [239, 68, 68];
pub const PIN_COLD: [u8; 3] = [59, 130, 246];
pub const MAX_ZOOM: u8 = 30;
const BACKGROUND: Rgba<u8> = Rgba([240, 240, 240, 255]);

/// Fractional Web-Mercator tile coordinates of a point. `zoom` must not exceed [`MAX_ZOOM`].
pub fn lat_lon_to_tile(lat: f64, lon: f64, zoom: u8) -> (f64, f64) {
    let lat_rad = lat.to_radians();
    let n = 2f64.powi(i32::from(zoom));
    let x = (lon + 180.0) / 360.0 * n;
    let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / std::f64::consts::PI) / 2.0 * n;
    (x, y)
}

/// Tiles needed to cover a `width` x `height` view centred on a point.
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    pub zoom: u8,
    pub center: (f64, f64),
    pub start: (i64, i64),
    pub tiles_x: u32,
    pub tiles_y: u32,
}

impl TileGrid {
    /// Fails when the zoom is above [`MAX_ZOOM`] or the point has no tile on
    /// the map (poles, non-finite or out-of-range coordinates).
    pub fn new(lat: f64, lon: f64, zoom: u8, width: u32, height: u32) -> Result<Self, ReportError> {
        if zoom > MAX_ZOOM {
            return Err(ReportError::Image {
                reason: format!("zoom {zoom} exceeds {MAX_ZOOM}"),
            });
        }
        let center = lat_lon_to_tile(lat, lon, zoom);
        let n = 2f64.powi(i32::from(zoom));
        let on_map = |v: f64| v.is_finite() && (0.0..n).contains(&v);
        if !on_map(center.0) || !on_map(center.1) {
            return Err(ReportError::Image {
                reason: format!("({lat}, {lon}) has no tile at zoom {zoom}"),
            });
        }
        let tiles_x = width.div_ceil(TILE_SIZE) + 1;
        let tiles_y = height.div_ceil(TILE_SIZE) + 1;
        let start = (
            center.0.floor() as i64 - i64::from(tiles_x / 2),
            center.1.floor() as i64 - i64::from(tiles_y / 2),
        );
        Ok(Self {
            zoom,
            center,
            start,
            tiles_x,
            tiles_y,
        })
    }

    /// `(grid column, grid row, tile x, tile y)` for every tile on the map.
    /// Columns wrap around the antimeridian; rows beyond the poles are skipped.
    pub fn tiles(&self) -> Vec<(u32, u32, i64, i64)> {
        let n = 1i64 << self.zoom;
        let mut out = Vec::new();
        for tx in 0..self.tiles_x {
            for ty in 0..self.tiles_y {
                let tile_x = self.start.0.saturating_add(i64::from(tx)).rem_euclid(n);
                let tile_y = self.start.1.saturating_add(i64::from(ty));
                if tile_y < 0 || tile_y >= n {
                    continue;
                }
                out.push((tx, ty, tile_x, tile_y));
            }
        }
        out
    }

    /// Pixel position of the centre point inside the composite.
    pub fn center_pixel(&self) -> (i64, i64) {
        (
            ((self.center.0 - self.start.0 as f64) * f64::from(TILE_SIZE)) as i64,
            ((self.center.1 - self.start.1 as f64) * f64::from(TILE_SIZE)) as i64,
        )
    }
}

/// Pastes tiles into the grid, crops around the point and draws the pin.
pub fn compose_map(
    grid: &TileGrid,
    tiles: &[(u32, u32, RgbaImage)],
    width: u32,
    height: u32,
    pin_color: [u8; 3],
) -> RgbaImage {
    let mut composite = RgbaImage::from_pixel(
        grid.tiles_x * TILE_SIZE,
        grid.tiles_y * TILE_SIZE,
        BACKGROUND,
    );
    for (tx, ty, tile) in tiles {
        imageops::replace(
            &mut composite,
            tile,
            i64::from(tx * TILE_SIZE),
            i64::from(ty * TILE_SIZE),
        );
    }

    let (px, py) = grid.center_pixel();
    let left = px - i64::from(width / 2);
    let top = py - i64::from(height / 2);

    // out-of-range source pixels stay transparent
    let mut view = RgbaImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let sx = left + i64::from(x);
            let sy = top + i64::from(y);
            if sx >= 0 && sy >= 0 && sx < i64::from(composite.width()) && sy < i64::from(composite.height()) {
                view.put_pixel(x, y, *composite.get_pixel(sx as u32, sy as u32));
            }
        }
    }

    draw_pin_marker(
        &mut view,
        i64::from(width / 2),
        i64::from(height / 2),
        pin_color,
        PIN_SIZE,
    );
    view
}

/// Static map images built from slippy-map tiles.
#[derive(Debug, Clone)]
pub struct StaticMapRenderer {
    client: Client,
    config: MapConfig,
}

impl StaticMapRenderer {
    pub fn new(config: MapConfig) -> Result<Self, ReportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.tile_timeout_secs))
            .build()
            .map_err(|e| ReportError::Http { reason: e.to_string() })?;
        Ok(Self { client, config })
    }

    pub fn tile_url(&self, zoom: u8, x: i64, y: i64) -> String {
        self.config
            .tile_url_template
            .replace("{z}", &zoom.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }

    async fn fetch_tile(&self, url: String) -> Option<RgbaImage> {
        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, &self.config.user_agent)
            .send()
            .await
            .ok()?;
        if !response.status().is_success() {
            debug!(url = %url, status = %response.status(), "Tile unavailable");
            return None;
        }
        let bytes = response.bytes().await.ok()?;
        image::load_from_memory(&bytes).ok().map(|img| img.into_rgba8())
    }

    /// PNG data URI of the map, or `None` when disabled or on any failure.
    #[instrument(skip(self))]
    pub async fn render_data_uri(&self, lat: f64, lon: f64, pin_color: [u8; 3]) -> Option<String> {
        if !self.config.enabled {
            return None;
        }
        match self.render_png(lat, lon, pin_color).await {
            Ok(png) => Some(data_uri("image/png", &png)),
            Err(e) => {
                warn!("Error generating static map: {}", e);
                None
            }
        }
    }

    pub async fn render_png(&self, lat: f64, lon: f64, pin_color: [u8; 3]) -> Result<Vec<u8>, ReportError> {
        let (width, height) = (self.config.width, self.config.height);
        let grid = TileGrid::new(lat, lon, self.config.zoom, width, height)?;

        let requests = grid.tiles().into_iter().map(|(tx, ty, x, y)| {
            let url = self.tile_url(grid.zoom, x, y);
            async move { self.fetch_tile(url).await.map(|tile| (tx, ty, tile)) }
        });
        // failed tiles keep the background
        let tiles: Vec<_> = join_all(requests).await.into_iter().flatten().collect();
        debug!(fetched = tiles.len(), "Fetched map tiles");

        let view = compose_map(&grid, &tiles, width, height, pin_color);
        let mut out = std::io::Cursor::new(Vec::new());
        view.write_to(&mut out, ImageFormat::Png)
            .map_err(|e| ReportError::Image { reason: e.to_string() })?;
        Ok(out.into_inner())
    }
}
