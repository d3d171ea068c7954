//! Minimal anti-alias-free raster primitives for the map pin.

use image::{Rgba, RgbaImage};

/// Source-over compositing of `src` onto the pixel at (x, y).
fn blend(img: &mut RgbaImage, x: i64, y: i64, src: Rgba<u8>) {
    if x < 0 || y < 0 || x >= i64::from(img.width()) || y >= i64::from(img.height()) {
        return;
    }
    let dst = img.get_pixel_mut(x as u32, y as u32);
    let sa = f32::from(src[3]) / 255.0;
    let da = f32::from(dst[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        *dst = Rgba([0, 0, 0, 0]);
        return;
    }
    for c in 0..3 {
        let s = f32::from(src[c]);
        let d = f32::from(dst[c]);
        dst[c] = ((s * sa + d * da * (1.0 - sa)) / out_a).round() as u8;
    }
    dst[3] = (out_a * 255.0).round() as u8;
}

/// Fills the ellipse inscribed in the box `[x0, y0, x1, y1]`.
pub fn fill_ellipse(img: &mut RgbaImage, bbox: [i64; 4], color: Rgba<u8>) {
    let [x0, y0, x1, y1] = bbox;
    let cx = (x0 + x1) as f64 / 2.0;
    let cy = (y0 + y1) as f64 / 2.0;
    let rx = (x1 - x0) as f64 / 2.0;
    let ry = (y1 - y0) as f64 / 2.0;
    if rx <= 0.0 || ry <= 0.0 {
        return;
    }
    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = (x as f64 + 0.5 - cx) / rx;
            let dy = (y as f64 + 0.5 - cy) / ry;
            if dx * dx + dy * dy <= 1.0 {
                blend(img, x, y, color);
            }
        }
    }
}

/// Ellipse with an outline of `width` pixels.
pub fn outlined_ellipse(
    img: &mut RgbaImage,
    bbox: [i64; 4],
    fill: Rgba<u8>,
    outline: Rgba<u8>,
    width: i64,
) {
    let [x0, y0, x1, y1] = bbox;
    fill_ellipse(img, bbox, outline);
    fill_ellipse(img, [x0 + width, y0 + width, x1 - width, y1 - width], fill);
}

pub fn fill_triangle(img: &mut RgbaImage, points: [(i64, i64); 3], color: Rgba<u8>) {
    let edge = |a: (f64, f64), b: (f64, f64), p: (f64, f64)| {
        (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0)
    };
    let pts = points.map(|(x, y)| (x as f64, y as f64));
    let min_x = points.iter().map(|p| p.0).min().unwrap_or(0);
    let max_x = points.iter().map(|p| p.0).max().unwrap_or(0);
    let min_y = points.iter().map(|p| p.1).min().unwrap_or(0);
    let max_y = points.iter().map(|p| p.1).max().unwrap_or(0);

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = (x as f64 + 0.5, y as f64 + 0.5);
            let w0 = edge(pts[1], pts[2], p);
            let w1 = edge(pts[2], pts[0], p);
            let w2 = edge(pts[0], pts[1], p);
            let inside = (w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0) || (w0 <= 0.0 && w1 <= 0.0 && w2 <= 0.0);
            if inside {
                blend(img, x, y, color);
            }
        }
    }
}

/// Teardrop map pin whose point sits at (cx, cy).
pub fn draw_pin_marker(img: &mut RgbaImage, cx: i64, cy: i64, color: [u8; 3], size: i64) {
    let fill = Rgba([color[0], color[1], color[2], 255]);
    let white = Rgba([255, 255, 255, 255]);
    let pin_top = cy - size;
    let pin_w = size / 2;
    let head_bottom = pin_top + size * 2 / 3;

    let shadow = 2;
    fill_ellipse(
        img,
        [cx - pin_w + shadow, pin_top + shadow, cx + pin_w + shadow, head_bottom + shadow],
        Rgba([0, 0, 0, 60]),
    );

    outlined_ellipse(img, [cx - pin_w, pin_top, cx + pin_w, head_bottom], fill, white, 2);

    fill_triangle(
        img,
        [
            (cx - pin_w / 2, pin_top + size / 3),
            (cx, cy),
            (cx + pin_w / 2, pin_top + size / 3),
        ],
        fill,
    );

    let inner_r = size / 5;
    let inner_top = pin_top + size / 6;
    fill_ellipse(
        img,
        [cx - inner_r, inner_top, cx + inner_r, inner_top + inner_r * 2],
        Rgba([255, 255, 255, 230]),
    );

    let dot_r = size / 8;
    fill_ellipse(
        img,
        [
            cx - dot_r,
            inner_top + (inner_r - dot_r),
            cx + dot_r,
            inner_top + (inner_r + dot_r),
        ],
        fill,
    );
}
