//! CPU rasterizer: flattens a canvas to an RGBA surface and encodes PNG.

use crate::error::ExportError;
use crate::pixmap::Pixmap;
use crate::sources::{ImageResolver, QrRenderer, TextRasterizer, TextRequest};
use kurbo::Point;
use tapfolio_core::{CanvasElement, CanvasState, ElementKind, SerializableColor};

const BLACK: [u8; 4] = [0, 0, 0, 255];
const WHITE: [u8; 4] = [255, 255, 255, 255];

/// Output knobs for one export run.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Device pixels per canvas unit.
    pub scale: f64,
    /// Surface color under everything, used when the product template has
    /// no background image.
    pub background: SerializableColor,
    /// Opacity multiplier for hidden elements. They stay in the output as
    /// ghosts rather than disappearing.
    pub hidden_opacity: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            background: SerializableColor::white(),
            hidden_opacity: 0.3,
        }
    }
}

/// The host-provided pieces the rasterizer cannot supply itself.
pub struct Collaborators<'a> {
    pub qr: &'a dyn QrRenderer,
    pub images: &'a dyn ImageResolver,
    /// Text shaping needs fonts; without it text elements are skipped.
    pub text: Option<&'a dyn TextRasterizer>,
}

/// Flatten the print area to pixels: background first, then elements in
/// ascending layer order, each rotated about its own center.
pub fn render(
    canvas: &CanvasState,
    options: &RenderOptions,
    collaborators: &Collaborators<'_>,
) -> Result<Pixmap, ExportError> {
    let area = canvas.print_area();
    let width = (area.width() * options.scale).round() as u32;
    let height = (area.height() * options.scale).round() as u32;
    let mut surface = Pixmap::new(width, height)?;
    surface.fill(options.background);

    let origin = Point::new(area.x0, area.y0);

    if let Some(background) = canvas.background() {
        let image = collaborators.images.resolve(background)?;
        draw_cover(&mut surface, &image);
    }

    for element in canvas.elements_ordered() {
        let mut opacity = element.opacity;
        if !element.visible {
            opacity *= options.hidden_opacity;
        }
        if opacity <= 0.0 {
            continue;
        }

        match &element.kind {
            ElementKind::Shape { fill } => {
                let fill = [fill.r, fill.g, fill.b, fill.a];
                let border = element
                    .border_color
                    .filter(|_| element.border_width > 0.0)
                    .map(|c| [c.r, c.g, c.b, c.a]);
                let border_width = element.border_width;
                paint_element(&mut surface, element, origin, options.scale, opacity, |lx, ly| {
                    if let Some(border) = border {
                        let edge = lx
                            .min(ly)
                            .min(element.width - lx)
                            .min(element.height - ly);
                        if edge <= border_width {
                            return Some(border);
                        }
                    }
                    Some(fill)
                });
            }
            ElementKind::Qr { payload } => {
                let matrix = collaborators.qr.render(payload)?;
                let n = matrix.size();
                paint_element(&mut surface, element, origin, options.scale, opacity, |lx, ly| {
                    let mx = ((lx / element.width * n as f64) as usize).min(n - 1);
                    let my = ((ly / element.height * n as f64) as usize).min(n - 1);
                    Some(if matrix.dark(mx, my) { BLACK } else { WHITE })
                });
            }
            ElementKind::Image { source } => {
                let image = collaborators.images.resolve(source)?;
                let (iw, ih) = (image.width(), image.height());
                paint_element(&mut surface, element, origin, options.scale, opacity, |lx, ly| {
                    let sx = ((lx / element.width * f64::from(iw)) as u32).min(iw - 1);
                    let sy = ((ly / element.height * f64::from(ih)) as u32).min(ih - 1);
                    Some(image.pixel(sx, sy))
                });
            }
            ElementKind::Text {
                content,
                font_size,
                font_family,
                font_weight,
                color,
                align,
            } => {
                let Some(rasterizer) = collaborators.text else {
                    log::debug!("no text rasterizer, skipping element {}", element.id());
                    continue;
                };
                let request = TextRequest {
                    content,
                    family: *font_family,
                    weight: *font_weight,
                    align: *align,
                    font_size: font_size * options.scale,
                    width: (element.width * options.scale).round().max(1.0) as u32,
                    height: (element.height * options.scale).round().max(1.0) as u32,
                };
                let mask = rasterizer.rasterize(&request)?;
                let (mw, mh) = (mask.width(), mask.height());
                let rgba = [color.r, color.g, color.b, color.a];
                paint_element(&mut surface, element, origin, options.scale, opacity, |lx, ly| {
                    let mx = ((lx / element.width * f64::from(mw)) as u32).min(mw - 1);
                    let my = ((ly / element.height * f64::from(mh)) as u32).min(mh - 1);
                    let coverage = mask.coverage(mx, my);
                    if coverage == 0 {
                        return None;
                    }
                    let alpha = (u32::from(rgba[3]) * u32::from(coverage) / 255) as u8;
                    Some([rgba[0], rgba[1], rgba[2], alpha])
                });
            }
        }
    }

    Ok(surface)
}

/// Encode a surface as an RGBA8 PNG.
pub fn encode_png(pixmap: &Pixmap) -> Result<Vec<u8>, ExportError> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, pixmap.width(), pixmap.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(pixmap.data())?;
    }
    Ok(out)
}

/// Scale an image over the whole surface with nearest sampling.
fn draw_cover(surface: &mut Pixmap, image: &Pixmap) {
    let (sw, sh) = (surface.width(), surface.height());
    let (iw, ih) = (image.width(), image.height());
    for y in 0..sh {
        let sy = ((u64::from(y) * u64::from(ih)) / u64::from(sh)) as u32;
        for x in 0..sw {
            let sx = ((u64::from(x) * u64::from(iw)) / u64::from(sw)) as u32;
            surface.blend_pixel(x, y, image.pixel(sx, sy), 1.0);
        }
    }
}

/// Rasterize one element: walk its rotated bounding box in device pixels,
/// map each pixel center back into the element's local space, and blend
/// whatever the sampler returns. `sample` gets local coordinates in canvas
/// units, `(0, 0)` at the element's top-left.
fn paint_element<F>(
    surface: &mut Pixmap,
    element: &CanvasElement,
    origin: Point,
    scale: f64,
    opacity: f64,
    sample: F,
) where
    F: Fn(f64, f64) -> Option<[u8; 4]>,
{
    let rect = element.as_rect();
    let center = element.center();
    let theta = element.rotation.to_radians();
    let (sin, cos) = theta.sin_cos();

    // Device-space bounding box of the rotated rect.
    let corners = [
        (rect.x0, rect.y0),
        (rect.x1, rect.y0),
        (rect.x1, rect.y1),
        (rect.x0, rect.y1),
    ];
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for (x, y) in corners {
        let dx = x - center.x;
        let dy = y - center.y;
        let rx = center.x + dx * cos - dy * sin;
        let ry = center.y + dx * sin + dy * cos;
        min_x = min_x.min(rx);
        min_y = min_y.min(ry);
        max_x = max_x.max(rx);
        max_y = max_y.max(ry);
    }

    let px0 = (((min_x - origin.x) * scale).floor().max(0.0)) as u32;
    let py0 = (((min_y - origin.y) * scale).floor().max(0.0)) as u32;
    let px1 = ((((max_x - origin.x) * scale).ceil()).max(0.0) as u32).min(surface.width());
    let py1 = ((((max_y - origin.y) * scale).ceil()).max(0.0) as u32).min(surface.height());

    let radius = element
        .corner_radius
        .clamp(0.0, element.width.min(element.height) / 2.0);

    for py in py0..py1 {
        for px in px0..px1 {
            let cx = origin.x + (f64::from(px) + 0.5) / scale;
            let cy = origin.y + (f64::from(py) + 0.5) / scale;
            // Un-rotate the pixel center into element-local space.
            let dx = cx - center.x;
            let dy = cy - center.y;
            let lx = center.x + dx * cos + dy * sin - rect.x0;
            let ly = center.y - dx * sin + dy * cos - rect.y0;
            if lx < 0.0 || ly < 0.0 || lx >= element.width || ly >= element.height {
                continue;
            }
            if radius > 0.0 && !inside_rounded(lx, ly, element.width, element.height, radius) {
                continue;
            }
            if let Some(rgba) = sample(lx, ly) {
                surface.blend_pixel(px, py, rgba, opacity);
            }
        }
    }
}

/// Membership test for a rounded rectangle in local coordinates.
fn inside_rounded(lx: f64, ly: f64, width: f64, height: f64, radius: f64) -> bool {
    let qx = (radius - lx).max(lx - (width - radius)).max(0.0);
    let qy = (radius - ly).max(ly - (height - radius)).max(0.0);
    qx * qx + qy * qy <= radius * radius
}
