//! Procedural 80x80 RGB565 sprites, one per [`VisualState`].
//!
//! A sprite is a list of [`Layer`]s drawn back to front into a shared
//! buffer; each layer pairs a closed-form [`Shape`] with a color. The packed
//! output is `width * height * 2` bytes, low byte first, which is what the
//! display's DMA expects.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::pet::classify::VisualState;

pub const SPRITE_WIDTH: usize = 80;
pub const SPRITE_HEIGHT: usize = 80;
pub const SPRITE_BYTES: usize = SPRITE_WIDTH * SPRITE_HEIGHT * 2;

pub const BLACK: u16 = 0x0000;
pub const WHITE: u16 = 0xFFFF;
pub const RED: u16 = 0xF800;
pub const BLUE: u16 = 0x001F;
pub const CYAN: u16 = 0x07FF;
pub const DARK_BROWN: u16 = 0x4208;

/// Per-state colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub body: u16,
    pub eye: u16,
    pub accent: u16,
}

pub fn palette(state: VisualState) -> Palette {
    match state {
        VisualState::Happy => Palette { body: 0xFE60, eye: BLACK, accent: RED },
        VisualState::Sick => Palette { body: 0x8410, eye: BLACK, accent: 0x8410 },
        VisualState::Dirty => Palette { body: 0x8A22, eye: BLACK, accent: 0x7BCF },
        VisualState::Hungry => Palette { body: 0xFE00, eye: BLACK, accent: 0x7800 },
        VisualState::Sad => Palette { body: 0xB5B6, eye: BLUE, accent: BLACK },
        VisualState::Normal => Palette { body: 0xFD20, eye: BLACK, accent: BLACK },
    }
}

/// Pixel-membership tests. All bounds are inclusive unless noted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Strict interior of an axis-aligned ellipse, limited to rows `rows.0..=rows.1`.
    Ellipse {
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
        rows: (i32, i32),
    },
    /// Strict interior of a circle.
    Circle { cx: f64, cy: f64, r: f64 },
    Rect { x0: i32, y0: i32, x1: i32, y1: i32 },
    /// Box whose left and right edges move inward by `inset_left` / `inset_right`
    /// pixels between the top row and the bottom row (ear tips).
    Taper {
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        inset_left: f64,
        inset_right: f64,
    },
    /// Band of half-height `half` around the line `y = base_y + slope * (x - x0)`,
    /// clipped to the box.
    Band {
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        base_y: f64,
        slope: f64,
        half: f64,
    },
    /// Downward-pointing wedge filling the box below both diagonals (integer math).
    Wedge { x0: i32, y0: i32, x1: i32, y1: i32 },
}

fn in_box(x: i32, y: i32, x0: i32, y0: i32, x1: i32, y1: i32) -> bool {
    x >= x0 && x <= x1 && y >= y0 && y <= y1
}

impl Shape {
    pub fn contains(&self, x: i32, y: i32) -> bool {
        match *self {
            Shape::Ellipse { cx, cy, rx, ry, rows } => {
                if y < rows.0 || y > rows.1 {
                    return false;
                }
                let dx = (x as f64 - cx) / rx;
                let dy = (y as f64 - cy) / ry;
                dx * dx + dy * dy < 1.0
            }
            Shape::Circle { cx, cy, r } => {
                let dx = x as f64 - cx;
                let dy = y as f64 - cy;
                dx * dx + dy * dy < r * r
            }
            Shape::Rect { x0, y0, x1, y1 } => in_box(x, y, x0, y0, x1, y1),
            Shape::Taper { x0, y0, x1, y1, inset_left, inset_right } => {
                if !in_box(x, y, x0, y0, x1, y1) {
                    return false;
                }
                let t = (y - y0) as f64 / (y1 - y0) as f64;
                let left = x0 as f64 + t * inset_left;
                let right = x1 as f64 - t * inset_right;
                x as f64 >= left && x as f64 <= right
            }
            Shape::Band { x0, y0, x1, y1, base_y, slope, half } => {
                if !in_box(x, y, x0, y0, x1, y1) {
                    return false;
                }
                let center = base_y + (x - x0) as f64 * slope;
                let yf = y as f64;
                yf >= center - half && yf <= center + half
            }
            Shape::Wedge { x0, y0, x1, y1 } => {
                in_box(x, y, x0, y0, x1, y1)
                    && y >= y0 + (x - x0) / 2
                    && y >= y0 + (x1 - x) / 2
            }
        }
    }
}

/// A shape painted in one color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layer {
    pub shape: Shape,
    pub color: u16,
}

fn layer(shape: Shape, color: u16) -> Layer {
    Layer { shape, color }
}

fn rect(x0: i32, y0: i32, x1: i32, y1: i32) -> Shape {
    Shape::Rect { x0, y0, x1, y1 }
}

fn circle(cx: f64, cy: f64, r: f64) -> Shape {
    Shape::Circle { cx, cy, r }
}

/// The z-ordered draw list for `state`, background excluded.
pub fn layers(state: VisualState) -> Vec<Layer> {
    let pal = palette(state);
    let body = pal.body;
    let mut out = vec![
        layer(
            Shape::Ellipse { cx: 40.0, cy: 52.0, rx: 25.0, ry: 23.0, rows: (30, i32::MAX) },
            body,
        ),
        layer(circle(40.0, 25.0, 20.0), body),
        layer(
            Shape::Taper { x0: 18, y0: 5, x1: 30, y1: 20, inset_left: 6.0, inset_right: 3.0 },
            body,
        ),
        layer(
            Shape::Taper { x0: 50, y0: 5, x1: 62, y1: 20, inset_left: 3.0, inset_right: 6.0 },
            body,
        ),
        layer(
            Shape::Band { x0: 62, y0: 40, x1: 78, y1: 55, base_y: 47.0, slope: 0.3, half: 3.0 },
            body,
        ),
        layer(rect(22, 65, 28, 78), body),
        layer(rect(35, 65, 41, 78), body),
        layer(rect(42, 65, 48, 78), body),
        layer(rect(55, 65, 61, 78), body),
    ];

    for eye_x in [32.0, 48.0] {
        out.push(layer(circle(eye_x, 22.0, 4.0), WHITE));
        out.push(layer(circle(eye_x, 22.0, 2.0), pal.eye));
    }

    out.push(layer(Shape::Wedge { x0: 37, y0: 28, x1: 43, y1: 32 }, BLACK));

    match state {
        VisualState::Happy => out.push(layer(
            Shape::Ellipse { cx: 40.0, cy: 35.0, rx: 8.0, ry: 4.0, rows: (36, 39) },
            pal.accent,
        )),
        VisualState::Sad => out.push(layer(
            Shape::Ellipse { cx: 40.0, cy: 40.0, rx: 8.0, ry: 4.0, rows: (36, 39) },
            pal.accent,
        )),
        VisualState::Hungry => out.push(layer(circle(40.0, 37.0, 5.0), pal.accent)),
        _ => {}
    }

    match state {
        VisualState::Sick => {
            out.push(layer(rect(55, 15, 55, 18), CYAN));
            out.push(layer(rect(58, 18, 58, 21), CYAN));
        }
        VisualState::Sad => {
            out.push(layer(rect(30, 26, 30, 30), BLUE));
            out.push(layer(rect(50, 26, 50, 30), BLUE));
        }
        VisualState::Dirty => {
            for (x, y) in [(25, 35), (55, 40), (45, 55)] {
                out.push(layer(rect(x, y, x, y), DARK_BROWN));
            }
        }
        _ => {}
    }

    out
}

/// Rasterize `state` into RGB565 values, row-major.
pub fn render_pixels(state: VisualState) -> Vec<u16> {
    let mut pixels = vec![BLACK; SPRITE_WIDTH * SPRITE_HEIGHT];
    for l in layers(state) {
        for y in 0..SPRITE_HEIGHT {
            for x in 0..SPRITE_WIDTH {
                if l.shape.contains(x as i32, y as i32) {
                    pixels[y * SPRITE_WIDTH + x] = l.color;
                }
            }
        }
    }
    pixels
}

/// Packed sprite bytes, each pixel low byte first.
pub fn render(state: VisualState) -> Vec<u8> {
    let mut out = Vec::with_capacity(SPRITE_BYTES);
    for px in render_pixels(state) {
        out.extend_from_slice(&px.to_le_bytes());
    }
    out
}

/// [`render`] encoded as standard base64 for JSON transport.
pub fn render_base64(state: VisualState) -> String {
    STANDARD.encode(render(state))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn px(pixels: &[u16], x: usize, y: usize) -> u16 {
        pixels[y * SPRITE_WIDTH + x]
    }

    #[test]
    fn every_state_renders_full_buffer() {
        for state in VisualState::ALL {
            let bytes = render(state);
            assert_eq!(bytes.len(), SPRITE_BYTES);
            assert_eq!(bytes, render(state), "{} not reproducible", state);
        }
    }

    #[test]
    fn bytes_are_little_endian() {
        let pixels = render_pixels(VisualState::Happy);
        let bytes = render(VisualState::Happy);
        // head centre carries the body color
        let i = 20 * SPRITE_WIDTH + 40;
        assert_eq!(pixels[i], 0xFE60);
        assert_eq!(bytes[i * 2], 0x60);
        assert_eq!(bytes[i * 2 + 1], 0xFE);
    }

    #[test]
    fn corners_are_background() {
        let pixels = render_pixels(VisualState::Normal);
        assert_eq!(px(&pixels, 0, 0), BLACK);
        assert_eq!(px(&pixels, 79, 79), BLACK);
        assert_eq!(px(&pixels, 0, 79), BLACK);
    }

    #[test]
    fn eyes_have_white_and_pupil() {
        let pixels = render_pixels(VisualState::Sad);
        assert_eq!(px(&pixels, 32, 22), BLUE);
        assert_eq!(px(&pixels, 35, 22), WHITE);
        assert_eq!(px(&pixels, 48, 22), BLUE);
    }

    #[test]
    fn mouths_follow_state() {
        let happy = render_pixels(VisualState::Happy);
        assert_eq!(px(&happy, 40, 37), RED);
        let hungry = render_pixels(VisualState::Hungry);
        assert_eq!(px(&hungry, 40, 37), 0x7800);
        let normal = render_pixels(VisualState::Normal);
        assert_eq!(px(&normal, 40, 37), 0xFD20);
    }

    #[test]
    fn decorations_follow_state() {
        let sick = render_pixels(VisualState::Sick);
        assert_eq!(px(&sick, 55, 16), CYAN);
        assert_eq!(px(&sick, 58, 21), CYAN);
        let sad = render_pixels(VisualState::Sad);
        assert_eq!(px(&sad, 30, 28), BLUE);
        let dirty = render_pixels(VisualState::Dirty);
        assert_eq!(px(&dirty, 45, 55), DARK_BROWN);
        let happy = render_pixels(VisualState::Happy);
        assert_eq!(px(&happy, 45, 55), 0xFE60);
    }

    #[test]
    fn nose_is_a_wedge() {
        let pixels = render_pixels(VisualState::Normal);
        assert_eq!(px(&pixels, 40, 30), BLACK);
        assert_eq!(px(&pixels, 40, 32), BLACK);
        // top corners of the nose box stay body colored
        assert_eq!(px(&pixels, 37, 29), 0xFD20);
        assert_eq!(px(&pixels, 43, 29), 0xFD20);
    }

    #[test]
    fn legs_and_tail_are_drawn() {
        let pixels = render_pixels(VisualState::Normal);
        assert_eq!(px(&pixels, 25, 77), 0xFD20);
        assert_eq!(px(&pixels, 31, 77), BLACK);
        assert_eq!(px(&pixels, 75, 51), 0xFD20);
    }

    #[test]
    fn states_differ() {
        assert_ne!(render(VisualState::Happy), render(VisualState::Normal));
        assert_ne!(render(VisualState::Sick), render(VisualState::Dirty));
    }

    #[test]
    fn base64_length_matches() {
        let encoded = render_base64(VisualState::Normal);
        assert_eq!(encoded.len(), (SPRITE_BYTES + 2) / 3 * 4);
    }
}
