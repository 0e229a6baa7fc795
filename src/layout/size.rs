const MIN_RADIUS: f32 = 12.0;
const RADIUS_PER_SQRT_MENTION: f32 = 2.4;

// Area tracks magnitude, so radius follows its square root; the step scale
// keeps bubbles proportionate to the canvas they land on.
pub(crate) fn bubble_radius(magnitude: u64, viewport_width: f32) -> f32 {
    let scaled = (magnitude as f32).sqrt() * RADIUS_PER_SQRT_MENTION * width_scale(viewport_width);
    scaled.max(MIN_RADIUS)
}

fn width_scale(viewport_width: f32) -> f32 {
    if viewport_width >= 1600.0 {
        1.15
    } else if viewport_width >= 1200.0 {
        1.0
    } else if viewport_width >= 900.0 {
        0.85
    } else if viewport_width >= 600.0 {
        0.7
    } else {
        0.55
    }
}
