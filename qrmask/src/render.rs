use crate::matrix::{Matrix, State};

/// Rendered color of a single module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pixel {
    Black,
    White,
    /// Unwritten module.
    Transparent,
}

impl From<State> for Pixel {
    fn from(state: State) -> Pixel {
        match state {
            State::Set => Pixel::Black,
            State::Clear => Pixel::White,
            State::Reserved => Pixel::Transparent,
        }
    }
}

/// A matrix rendered as a grid of pixels, one per module.
#[derive(Debug, Clone)]
pub struct RenderedMatrix {
    pub width: usize,
    pub height: usize,
    /// Pixel values in row-major order.
    pub pixels: Vec<Pixel>,
}

impl RenderedMatrix {
    /// Get the pixel at position (x, y).
    pub fn pixel(&self, x: usize, y: usize) -> Pixel {
        self.pixels[y * self.width + x]
    }

    /// Convert to 8-bit grayscale with `scale` pixels per module and a white
    /// quiet zone of `border` modules. Transparent renders as white.
    ///
    /// Returns `(pixels, width, height)`.
    pub fn to_gray(&self, scale: usize, border: usize) -> (Vec<u8>, usize, usize) {
        let img_w = (self.width + 2 * border) * scale;
        let img_h = (self.height + 2 * border) * scale;
        let mut out = vec![255u8; img_w * img_h];

        for y in 0..self.height {
            for x in 0..self.width {
                if self.pixel(x, y) != Pixel::Black {
                    continue;
                }
                let ox = (x + border) * scale;
                let oy = (y + border) * scale;
                for sy in 0..scale {
                    let row = (oy + sy) * img_w;
                    out[row + ox..row + ox + scale].fill(0);
                }
            }
        }

        (out, img_w, img_h)
    }
}

/// Render a matrix module-for-module.
pub fn render(matrix: &Matrix) -> RenderedMatrix {
    let mut pixels = Vec::with_capacity(matrix.width() * matrix.height());
    for y in 0..matrix.height() {
        for x in 0..matrix.width() {
            pixels.push(matrix.get(x, y).map_or(Pixel::Transparent, Pixel::from));
        }
    }
    RenderedMatrix {
        width: matrix.width(),
        height: matrix.height(),
        pixels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_maps_states() {
        let m = Matrix::from_data_string("#_.").unwrap();
        let r = render(&m);
        assert_eq!(r.pixel(0, 0), Pixel::Black);
        assert_eq!(r.pixel(1, 0), Pixel::White);
        assert_eq!(r.pixel(2, 0), Pixel::Transparent);
    }

    #[test]
    fn to_gray_scales_and_borders() {
        let m = Matrix::from_data_string("#_\n_#").unwrap();
        let (px, w, h) = render(&m).to_gray(2, 1);
        assert_eq!((w, h), (8, 8));
        // Quiet zone is white
        assert!(px[..w * 2].iter().all(|&p| p == 255));
        // Module (0, 0) covers pixels (2..4, 2..4)
        assert_eq!(px[2 * w + 2], 0);
        assert_eq!(px[3 * w + 3], 0);
        // Module (1, 0) is white
        assert_eq!(px[2 * w + 4], 255);
        // Module (1, 1) is black
        assert_eq!(px[5 * w + 5], 0);
    }
}
