//! Mutable RGBA pixel access used by the fill engine.

use image::{Rgba, RgbaImage};

use super::FillError;

/// A mutable RGBA raster the fill engine can borrow for one operation
pub trait Raster {
    /// (width, height) in pixels
    fn size(&self) -> (u32, u32);

    /// Pixel at (x, y), or None if it cannot be read
    fn get(&self, x: u32, y: u32) -> Option<Rgba<u8>>;

    /// Overwrite pixel at (x, y); false if it cannot be written
    fn put(&mut self, x: u32, y: u32, color: Rgba<u8>) -> bool;

    /// Check the backing storage before a fill touches it
    fn check(&self) -> Result<(), FillError> {
        Ok(())
    }
}

impl Raster for RgbaImage {
    fn size(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn get(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.get_pixel_checked(x, y).copied()
    }

    fn put(&mut self, x: u32, y: u32, color: Rgba<u8>) -> bool {
        match self.get_pixel_mut_checked(x, y) {
            Some(pixel) => {
                *pixel = color;
                true
            }
            None => false,
        }
    }
}

/// Borrowed, tightly packed RGBA8 bytes (e.g. a locked platform bitmap)
#[derive(Debug)]
pub struct PixelBuffer<'a> {
    width: u32,
    height: u32,
    data: &'a mut [u8],
}

impl<'a> PixelBuffer<'a> {
    /// Wrap raw bytes; size mismatches surface from `check` rather than here
    pub fn new(width: u32, height: u32, data: &'a mut [u8]) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        (offset + 4 <= self.data.len()).then_some(offset)
    }
}

impl Raster for PixelBuffer<'_> {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn get(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        let offset = self.offset(x, y)?;
        let px = &self.data[offset..offset + 4];
        Some(Rgba([px[0], px[1], px[2], px[3]]))
    }

    fn put(&mut self, x: u32, y: u32, color: Rgba<u8>) -> bool {
        match self.offset(x, y) {
            Some(offset) => {
                self.data[offset..offset + 4].copy_from_slice(&color.0);
                true
            }
            None => false,
        }
    }

    fn check(&self) -> Result<(), FillError> {
        if self.data.len() != self.expected_len() {
            return Err(FillError::CorruptRaster {
                width: self.width,
                height: self.height,
                expected: self.expected_len(),
                actual: self.data.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_image_access() {
        let mut image = RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 4]));
        assert_eq!(Raster::size(&image), (3, 2));
        assert_eq!(Raster::get(&image, 2, 1), Some(Rgba([1, 2, 3, 4])));
        assert_eq!(Raster::get(&image, 3, 0), None);

        assert!(Raster::put(&mut image, 0, 0, Rgba([9, 9, 9, 255])));
        assert!(!Raster::put(&mut image, 0, 2, Rgba([9, 9, 9, 255])));
        assert_eq!(image.get_pixel(0, 0), &Rgba([9, 9, 9, 255]));
    }

    #[test]
    fn test_pixel_buffer_layout() {
        let mut bytes = vec![0u8; 2 * 2 * 4];
        let mut buffer = PixelBuffer::new(2, 2, &mut bytes);
        assert!(buffer.check().is_ok());

        assert!(buffer.put(1, 1, Rgba([10, 20, 30, 40])));
        assert_eq!(buffer.get(1, 1), Some(Rgba([10, 20, 30, 40])));
        assert_eq!(&bytes[12..16], &[10, 20, 30, 40]);
    }

    #[test]
    fn test_pixel_buffer_short_storage() {
        let mut bytes = vec![0u8; 10];
        let buffer = PixelBuffer::new(2, 2, &mut bytes);

        assert!(matches!(
            buffer.check(),
            Err(FillError::CorruptRaster {
                expected: 16,
                actual: 10,
                ..
            })
        ));
        // In-bounds coordinates past the end of storage read as unavailable
        assert_eq!(buffer.get(1, 1), None);
        assert!(buffer.get(0, 0).is_some());
    }
}
