use crate::detect::DetectionBatch;
use crate::overlay::surface::OverlaySurface;

/// Fill for boxes of the auto-record trigger class.
pub const TRIGGER_FILL: [u8; 3] = [0xFF, 0x0F, 0x0F];
/// Fill for every other class.
pub const OTHER_FILL: [u8; 3] = [0x00, 0xB6, 0x12];

const FILL_ALPHA: f32 = 0.4;
const CORNER_RADIUS: f32 = 8.0;
const LABEL_INSET_X: f32 = 10.0;
const LABEL_OFFSET_Y: f32 = 20.0;

/// Paint one detection batch onto the surface.
///
/// The surface is cleared first, so each batch fully replaces the previous
/// drawing and re-rendering the same batch is idempotent. When the batch was
/// captured mirrored, every x-coordinate is reflected about the surface's
/// vertical center before drawing; labels sit a fixed inset from the
/// (possibly reflected) left edge.
pub fn render(batch: &DetectionBatch, trigger_class: &str, surface: &mut dyn OverlaySurface) {
    surface.clear();

    let surface_width = surface.width() as f32;

    for detection in &batch.detections {
        let bbox = detection.bbox;
        let x = if batch.mirrored {
            surface_width - bbox.x - bbox.width
        } else {
            bbox.x
        };

        let fill = if detection.class == trigger_class {
            TRIGGER_FILL
        } else {
            OTHER_FILL
        };

        surface.fill_round_rect(
            x,
            bbox.y,
            bbox.width,
            bbox.height,
            CORNER_RADIUS,
            fill,
            FILL_ALPHA,
        );
        surface.draw_label(&detection.class, x + LABEL_INSET_X, bbox.y + LABEL_OFFSET_Y);
    }
}
