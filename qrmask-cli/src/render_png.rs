//! PNG output for finished matrices.

use std::path::{Path, PathBuf};

use qrmask::render;
use qrmask::{Matrix, Writer, WriterError};

/// Writes each matrix as a grayscale PNG file.
pub struct PngWriter {
    path: PathBuf,
    scale: usize,
    border: usize,
    closed: bool,
}

impl PngWriter {
    pub fn new(path: impl Into<PathBuf>, scale: usize, border: usize) -> Self {
        Self {
            path: path.into(),
            scale,
            border,
            closed: false,
        }
    }
}

impl Writer for PngWriter {
    fn write(&mut self, matrix: &Matrix) -> Result<(), WriterError> {
        if self.closed {
            return Err(WriterError::Closed);
        }
        let (pixels, width, height) = render::render(matrix).to_gray(self.scale, self.border);
        write_grayscale_png(&self.path, &pixels, width, height)?;
        tracing::info!(path = %self.path.display(), width, height, "wrote PNG");
        Ok(())
    }

    fn close(&mut self) -> Result<(), WriterError> {
        self.closed = true;
        Ok(())
    }
}

fn write_grayscale_png(
    path: &Path,
    pixels: &[u8],
    width: usize,
    height: usize,
) -> Result<(), WriterError> {
    let file = std::fs::File::create(path)?;
    let w = std::io::BufWriter::new(file);

    let mut encoder = png::Encoder::new(w, width as u32, height as u32);
    encoder.set_color(png::ColorType::Grayscale);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| WriterError::Encode(format!("PNG header for {}: {e}", path.display())))?;
    writer
        .write_image_data(pixels)
        .map_err(|e| WriterError::Encode(format!("PNG data for {}: {e}", path.display())))?;
    writer
        .finish()
        .map_err(|e| WriterError::Encode(format!("finishing {}: {e}", path.display())))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_png(path: &Path) -> (u32, u32, Vec<u8>) {
        let file = std::fs::File::open(path).unwrap();
        let decoder = png::Decoder::new(std::io::BufReader::new(file));
        let mut reader = decoder.read_info().unwrap();
        let mut buf = vec![0u8; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();
        buf.truncate(info.buffer_size());
        (info.width, info.height, buf)
    }

    #[test]
    fn writes_scaled_png_with_quiet_zone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let m = Matrix::from_data_string("#__\n___").unwrap();

        let mut w = PngWriter::new(&path, 3, 2);
        qrmask::write_and_close(&mut w, &m).unwrap();

        let (width, height, pixels) = read_png(&path);
        assert_eq!(width, (3 + 2 * 2) * 3);
        assert_eq!(height, (2 + 2 * 2) * 3);
        // Quiet zone corner is white, module (0, 0) starts at pixel (6, 6)
        assert_eq!(pixels[0], 255);
        assert_eq!(pixels[6 * width as usize + 6], 0);
        assert_eq!(pixels[6 * width as usize + 9], 255);
    }

    #[test]
    fn write_after_close_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("closed.png");
        let mut w = PngWriter::new(&path, 1, 0);
        w.close().unwrap();

        let err = w.write(&Matrix::new(1, 1)).unwrap_err();
        assert!(matches!(err, WriterError::Closed));
        assert!(!path.exists());
    }
}
