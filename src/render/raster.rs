//! Pixelprimitive auf RGBA-Puffern.
//!
//! Alle Routinen arbeiten mit Straight-Alpha und Source-Over. Koordinaten
//! sind Flächenkoordinaten in f32; Pixel außerhalb der Fläche werden still
//! verworfen. Linien werden als Kreisstempel entlang der Strecke gelegt,
//! das entspricht runden Kappen.

use glam::Vec2;
use image::{Rgba, RgbaImage};

/// Pixel mit Alpha null, Rückgabewert für Zugriffe außerhalb der Fläche.
pub const TRANSPARENT_PIXEL: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Füllt die gesamte Fläche deckend mit einer Farbe.
pub fn fill(surface: &mut RgbaImage, color: Rgba<u8>) {
    for pixel in surface.pixels_mut() {
        *pixel = color;
    }
}

/// Setzt die gesamte Fläche auf transparent zurück.
pub fn clear(surface: &mut RgbaImage) {
    fill(surface, TRANSPARENT_PIXEL);
}

/// Liest ein Pixel; außerhalb der Fläche kommt [`TRANSPARENT_PIXEL`] zurück.
#[inline]
pub fn pixel_at(surface: &RgbaImage, x: i32, y: i32) -> Rgba<u8> {
    if x < 0 || y < 0 || x >= surface.width() as i32 || y >= surface.height() as i32 {
        TRANSPARENT_PIXEL
    } else {
        *surface.get_pixel(x as u32, y as u32)
    }
}

/// Überschreibt ein Pixel ohne Mischung, etwa für Radierer und Flächenfüllung.
#[inline]
pub fn put_pixel(surface: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>) {
    if x < 0 || y < 0 || x >= surface.width() as i32 || y >= surface.height() as i32 {
        return;
    }
    surface.put_pixel(x as u32, y as u32, color);
}

/// Mischt eine Farbe per Source-Over auf ein Pixel.
///
/// `alpha` skaliert den Alphakanal der Farbe zusätzlich, wie globale
/// Deckkraft beim Zeichnen.
pub fn blend_pixel(surface: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>, alpha: f32) {
    if x < 0 || y < 0 || x >= surface.width() as i32 || y >= surface.height() as i32 {
        return;
    }
    let src_a = (color.0[3] as f32 / 255.0 * alpha).clamp(0.0, 1.0);
    if src_a <= 0.0 {
        return;
    }

    let dst = surface.get_pixel_mut(x as u32, y as u32);
    let dst_a = dst.0[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    if out_a <= f32::EPSILON {
        *dst = TRANSPARENT_PIXEL;
        return;
    }

    for kanal in 0..3 {
        let src_c = color.0[kanal] as f32;
        let dst_c = dst.0[kanal] as f32;
        dst.0[kanal] = ((src_c * src_a + dst_c * dst_a * (1.0 - src_a)) / out_a).round() as u8;
    }
    dst.0[3] = (out_a * 255.0).round() as u8;
}

/// Legt `overlay` per Source-Over über `base`, Pixel für Pixel.
///
/// Beide Puffer müssen dieselben Maße haben; der Überstand eines größeren
/// Overlays wird ignoriert.
pub fn composite_over(base: &mut RgbaImage, overlay: &RgbaImage) {
    let w = base.width().min(overlay.width());
    let h = base.height().min(overlay.height());
    for y in 0..h {
        for x in 0..w {
            let src = *overlay.get_pixel(x, y);
            if src.0[3] == 0 {
                continue;
            }
            blend_pixel(base, x as i32, y as i32, src, 1.0);
        }
    }
}

// ── Formen ──────────────────────────────────────────────────────────────────

/// Gefüllter Kreis.
pub fn draw_filled_circle(
    surface: &mut RgbaImage,
    center: Vec2,
    radius: f32,
    color: Rgba<u8>,
    alpha: f32,
) {
    if radius <= 0.0 {
        return;
    }
    let r_sq = radius * radius;
    let min_x = (center.x - radius).floor() as i32;
    let max_x = (center.x + radius).ceil() as i32;
    let min_y = (center.y - radius).floor() as i32;
    let max_y = (center.y + radius).ceil() as i32;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dx = x as f32 - center.x;
            let dy = y as f32 - center.y;
            if dx * dx + dy * dy <= r_sq {
                blend_pixel(surface, x, y, color, alpha);
            }
        }
    }
}

/// Obere Kreishälfte, gefüllt. Für Bögen wie das Tunnelportal.
pub fn draw_half_disc(
    surface: &mut RgbaImage,
    center: Vec2,
    radius: f32,
    color: Rgba<u8>,
    alpha: f32,
) {
    if radius <= 0.0 {
        return;
    }
    let r_sq = radius * radius;
    let min_x = (center.x - radius).floor() as i32;
    let max_x = (center.x + radius).ceil() as i32;
    let min_y = (center.y - radius).floor() as i32;
    let max_y = center.y.ceil() as i32;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dx = x as f32 - center.x;
            let dy = y as f32 - center.y;
            if dy <= 0.0 && dx * dx + dy * dy <= r_sq {
                blend_pixel(surface, x, y, color, alpha);
            }
        }
    }
}

/// Kreisring mit Linienbreite, als Ring zwischen Innen- und Außenradius.
pub fn draw_ring(
    surface: &mut RgbaImage,
    center: Vec2,
    radius: f32,
    line_width: f32,
    color: Rgba<u8>,
    alpha: f32,
) {
    if radius <= 0.0 || line_width <= 0.0 {
        return;
    }
    let outer = radius + line_width * 0.5;
    let inner = (radius - line_width * 0.5).max(0.0);
    let outer_sq = outer * outer;
    let inner_sq = inner * inner;
    let min_x = (center.x - outer).floor() as i32;
    let max_x = (center.x + outer).ceil() as i32;
    let min_y = (center.y - outer).floor() as i32;
    let max_y = (center.y + outer).ceil() as i32;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dx = x as f32 - center.x;
            let dy = y as f32 - center.y;
            let d_sq = dx * dx + dy * dy;
            if d_sq <= outer_sq && d_sq >= inner_sq {
                blend_pixel(surface, x, y, color, alpha);
            }
        }
    }
}

/// Strecke mit runden Kappen.
///
/// Breiten bis anderthalb Pixel werden als Einzelpixel gesetzt, damit
/// dünne Linien nicht in Punkte zerfallen.
pub fn draw_line(
    surface: &mut RgbaImage,
    from: Vec2,
    to: Vec2,
    width: f32,
    color: Rgba<u8>,
    alpha: f32,
) {
    let dist = from.distance(to);
    let steps = dist.ceil().max(1.0) as i32;
    if width <= 1.5 {
        for i in 0..=steps {
            let p = from.lerp(to, i as f32 / steps as f32);
            blend_pixel(surface, p.x.round() as i32, p.y.round() as i32, color, alpha);
        }
        return;
    }
    let radius = width * 0.5;
    for i in 0..=steps {
        let p = from.lerp(to, i as f32 / steps as f32);
        draw_filled_circle(surface, p, radius, color, alpha);
    }
}

/// Linienzug aus [`draw_line`]-Segmenten.
pub fn draw_polyline(
    surface: &mut RgbaImage,
    points: &[Vec2],
    width: f32,
    color: Rgba<u8>,
    alpha: f32,
) {
    for pair in points.windows(2) {
        draw_line(surface, pair[0], pair[1], width, color, alpha);
    }
}

/// Quadratische Bézierkurve, abgetastet und als Linienzug gezeichnet.
pub fn draw_quadratic(
    surface: &mut RgbaImage,
    from: Vec2,
    control: Vec2,
    to: Vec2,
    width: f32,
    color: Rgba<u8>,
    alpha: f32,
) {
    let steps = (from.distance(control) + control.distance(to))
        .ceil()
        .clamp(4.0, 120.0) as usize;
    let mut previous = from;
    for i in 1..=steps {
        let t = i as f32 / steps as f32;
        let p = crate::core::geometry::quadratic_point(from, control, to, t);
        draw_line(surface, previous, p, width, color, alpha);
        previous = p;
    }
}

/// Achsenparalleles, gefülltes Rechteck mit Ecke `min` und Größe `size`.
pub fn draw_rect(surface: &mut RgbaImage, min: Vec2, size: Vec2, color: Rgba<u8>, alpha: f32) {
    let min_x = min.x.floor() as i32;
    let min_y = min.y.floor() as i32;
    let max_x = (min.x + size.x).ceil() as i32;
    let max_y = (min.y + size.y).ceil() as i32;
    for y in min_y..max_y {
        for x in min_x..max_x {
            blend_pixel(surface, x, y, color, alpha);
        }
    }
}

/// Rechteckrahmen aus vier Strecken.
pub fn draw_rect_outline(
    surface: &mut RgbaImage,
    min: Vec2,
    size: Vec2,
    line_width: f32,
    color: Rgba<u8>,
    alpha: f32,
) {
    let a = min;
    let b = min + Vec2::new(size.x, 0.0);
    let c = min + size;
    let d = min + Vec2::new(0.0, size.y);
    draw_line(surface, a, b, line_width, color, alpha);
    draw_line(surface, b, c, line_width, color, alpha);
    draw_line(surface, c, d, line_width, color, alpha);
    draw_line(surface, d, a, line_width, color, alpha);
}

/// Um `angle` gedrehtes, gefülltes Rechteck um einen Mittelpunkt.
pub fn draw_rotated_rect(
    surface: &mut RgbaImage,
    center: Vec2,
    size: Vec2,
    angle: f32,
    color: Rgba<u8>,
    alpha: f32,
) {
    let half = size * 0.5;
    let reach = half.length();
    let inverse = Vec2::from_angle(-angle);
    let min_x = (center.x - reach).floor() as i32;
    let max_x = (center.x + reach).ceil() as i32;
    let min_y = (center.y - reach).floor() as i32;
    let max_y = (center.y + reach).ceil() as i32;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let local = inverse.rotate(Vec2::new(x as f32, y as f32) - center);
            if local.x.abs() <= half.x && local.y.abs() <= half.y {
                blend_pixel(surface, x, y, color, alpha);
            }
        }
    }
}

/// Rahmen eines gedrehten Rechtecks aus vier Strecken.
pub fn draw_rotated_rect_outline(
    surface: &mut RgbaImage,
    center: Vec2,
    size: Vec2,
    angle: f32,
    line_width: f32,
    color: Rgba<u8>,
    alpha: f32,
) {
    let half = size * 0.5;
    let rot = Vec2::from_angle(angle);
    let corners = [
        center + rot.rotate(Vec2::new(-half.x, -half.y)),
        center + rot.rotate(Vec2::new(half.x, -half.y)),
        center + rot.rotate(Vec2::new(half.x, half.y)),
        center + rot.rotate(Vec2::new(-half.x, half.y)),
    ];
    for i in 0..4 {
        draw_line(surface, corners[i], corners[(i + 1) % 4], line_width, color, alpha);
    }
}

/// Gedrehte, gefüllte Ellipse mit Halbachsen `radii`.
pub fn draw_ellipse(
    surface: &mut RgbaImage,
    center: Vec2,
    radii: Vec2,
    rotation: f32,
    color: Rgba<u8>,
    alpha: f32,
) {
    if radii.x <= 0.0 || radii.y <= 0.0 {
        return;
    }
    let reach = radii.x.max(radii.y);
    let inverse = Vec2::from_angle(-rotation);
    let min_x = (center.x - reach).floor() as i32;
    let max_x = (center.x + reach).ceil() as i32;
    let min_y = (center.y - reach).floor() as i32;
    let max_y = (center.y + reach).ceil() as i32;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let local = inverse.rotate(Vec2::new(x as f32, y as f32) - center);
            let nx = local.x / radii.x;
            let ny = local.y / radii.y;
            if nx * nx + ny * ny <= 1.0 {
                blend_pixel(surface, x, y, color, alpha);
            }
        }
    }
}

/// Gefülltes Dreieck über Kantenfunktionen, Umlaufrichtung egal.
pub fn draw_triangle(
    surface: &mut RgbaImage,
    a: Vec2,
    b: Vec2,
    c: Vec2,
    color: Rgba<u8>,
    alpha: f32,
) {
    let min_x = a.x.min(b.x).min(c.x).floor() as i32;
    let max_x = a.x.max(b.x).max(c.x).ceil() as i32;
    let min_y = a.y.min(b.y).min(c.y).floor() as i32;
    let max_y = a.y.max(b.y).max(c.y).ceil() as i32;

    let edge = |p: Vec2, q: Vec2, r: Vec2| (q.x - p.x) * (r.y - p.y) - (q.y - p.y) * (r.x - p.x);
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = Vec2::new(x as f32, y as f32);
            let e0 = edge(a, b, p);
            let e1 = edge(b, c, p);
            let e2 = edge(c, a, p);
            let inside = (e0 >= 0.0 && e1 >= 0.0 && e2 >= 0.0)
                || (e0 <= 0.0 && e1 <= 0.0 && e2 <= 0.0);
            if inside {
                blend_pixel(surface, x, y, color, alpha);
            }
        }
    }
}

// ── Radieren ────────────────────────────────────────────────────────────────

/// Setzt alle Pixel im Kreis auf transparent.
pub fn erase_circle(surface: &mut RgbaImage, center: Vec2, radius: f32) {
    if radius <= 0.0 {
        return;
    }
    let r_sq = radius * radius;
    let min_x = (center.x - radius).floor() as i32;
    let max_x = (center.x + radius).ceil() as i32;
    let min_y = (center.y - radius).floor() as i32;
    let max_y = (center.y + radius).ceil() as i32;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dx = x as f32 - center.x;
            let dy = y as f32 - center.y;
            if dx * dx + dy * dy <= r_sq {
                put_pixel(surface, x, y, TRANSPARENT_PIXEL);
            }
        }
    }
}

/// Radiert entlang einer Strecke mit runden Kappen.
pub fn erase_line(surface: &mut RgbaImage, from: Vec2, to: Vec2, width: f32) {
    let dist = from.distance(to);
    let steps = dist.ceil().max(1.0) as i32;
    let radius = (width * 0.5).max(0.5);
    for i in 0..=steps {
        let p = from.lerp(to, i as f32 / steps as f32);
        erase_circle(surface, p, radius);
    }
}
