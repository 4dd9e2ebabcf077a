use image::RgbaImage;

/// Where a surface put a label. Text shaping itself belongs to the
/// presentation layer; the core only decides position and content.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelPlacement {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

/// The rendering boundary. One implementation sits in front of whatever the
/// UI composites over the video; `PixelSurface` below is the headless one.
pub trait OverlaySurface: Send {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Drop everything drawn so far. Every batch render starts here, so
    /// overlays never accumulate across batches.
    fn clear(&mut self);

    /// Filled rounded rectangle, color as RGB, alpha in [0,1].
    fn fill_round_rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
        color: [u8; 3],
        alpha: f32,
    );

    fn draw_label(&mut self, text: &str, x: f32, y: f32);
}

/// Headless surface over an RGBA pixel buffer.
///
/// Boxes are rasterized with source-over blending; labels are collected as
/// placements for the compositor.
pub struct PixelSurface {
    pixels: RgbaImage,
    labels: Vec<LabelPlacement>,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
            labels: Vec::new(),
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn labels(&self) -> &[LabelPlacement] {
        &self.labels
    }

    fn blend_pixel(&mut self, px: u32, py: u32, color: [u8; 3], alpha: f32) {
        let dst = self.pixels.get_pixel_mut(px, py);
        for c in 0..3 {
            let src = color[c] as f32 * alpha;
            let kept = dst.0[c] as f32 * (1.0 - alpha);
            dst.0[c] = (src + kept).round().min(255.0) as u8;
        }
        let src_a = alpha * 255.0;
        let kept_a = dst.0[3] as f32 * (1.0 - alpha);
        dst.0[3] = (src_a + kept_a).round().min(255.0) as u8;
    }
}

/// Pixel-center coverage test for a rounded rectangle.
fn inside_round_rect(cx: f32, cy: f32, x: f32, y: f32, w: f32, h: f32, r: f32) -> bool {
    if cx < x || cy < y || cx > x + w || cy > y + h {
        return false;
    }
    let r = r.min(w / 2.0).min(h / 2.0);
    let nearest_x = cx.clamp(x + r, x + w - r);
    let nearest_y = cy.clamp(y + r, y + h - r);
    let dx = cx - nearest_x;
    let dy = cy - nearest_y;
    dx * dx + dy * dy <= r * r
}

impl OverlaySurface for PixelSurface {
    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn clear(&mut self) {
        for pixel in self.pixels.pixels_mut() {
            pixel.0 = [0, 0, 0, 0];
        }
        self.labels.clear();
    }

    fn fill_round_rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        radius: f32,
        color: [u8; 3],
        alpha: f32,
    ) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }

        let x0 = x.floor().max(0.0) as u32;
        let y0 = y.floor().max(0.0) as u32;
        let x1 = ((x + width).ceil() as i64).clamp(0, self.width() as i64) as u32;
        let y1 = ((y + height).ceil() as i64).clamp(0, self.height() as i64) as u32;

        for py in y0..y1 {
            for px in x0..x1 {
                let cx = px as f32 + 0.5;
                let cy = py as f32 + 0.5;
                if inside_round_rect(cx, cy, x, y, width, height, radius) {
                    self.blend_pixel(px, py, color, alpha);
                }
            }
        }
    }

    fn draw_label(&mut self, text: &str, x: f32, y: f32) {
        self.labels.push(LabelPlacement {
            text: text.to_string(),
            x,
            y,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_resets_pixels_and_labels() {
        let mut surface = PixelSurface::new(16, 16);
        surface.fill_round_rect(0.0, 0.0, 8.0, 8.0, 2.0, [255, 0, 0], 0.4);
        surface.draw_label("person", 2.0, 4.0);
        assert!(surface.pixels().pixels().any(|p| p.0 != [0, 0, 0, 0]));
        assert_eq!(surface.labels().len(), 1);

        surface.clear();
        assert!(surface.pixels().pixels().all(|p| p.0 == [0, 0, 0, 0]));
        assert!(surface.labels().is_empty());
    }

    #[test]
    fn corners_are_rounded() {
        let mut surface = PixelSurface::new(32, 32);
        surface.fill_round_rect(0.0, 0.0, 20.0, 20.0, 8.0, [0, 255, 0], 1.0);

        // Extreme corner pixel lies outside the radius; the center does not.
        assert_eq!(surface.pixels().get_pixel(0, 0).0, [0, 0, 0, 0]);
        assert_ne!(surface.pixels().get_pixel(10, 10).0, [0, 0, 0, 0]);
    }

    #[test]
    fn out_of_bounds_boxes_are_clipped() {
        let mut surface = PixelSurface::new(8, 8);
        surface.fill_round_rect(-4.0, -4.0, 100.0, 100.0, 0.0, [9, 9, 9], 1.0);
        assert!(surface.pixels().pixels().all(|p| p.0[3] == 255));
    }
}
