//! Output surfaces a framebuffer is flushed to

use chromacloud_core::{Error, Result};
use image::RgbaImage;

/// Destination of rendered RGBA8 frames
pub trait Surface {
    /// Replace the surface contents with `data` (row-major RGBA8)
    fn put_image(&mut self, width: usize, height: usize, data: &[u8]) -> Result<()>;

    /// Copy the current surface contents into `data` (row-major RGBA8)
    fn get_image(&self, width: usize, height: usize, data: &mut [u8]) -> Result<()>;
}

fn check_size(image: &RgbaImage, width: usize, height: usize, len: usize) -> Result<()> {
    let (w, h) = (image.width() as usize, image.height() as usize);
    if w != width || h != height {
        return Err(Error::Surface(format!(
            "surface is {w}x{h}, frame is {width}x{height}"
        )));
    }
    if len != width * height * 4 {
        return Err(Error::Surface(format!(
            "expected {} bytes for a {width}x{height} frame, got {len}",
            width * height * 4
        )));
    }
    Ok(())
}

impl Surface for RgbaImage {
    fn put_image(&mut self, width: usize, height: usize, data: &[u8]) -> Result<()> {
        check_size(self, width, height, data.len())?;
        let pixels: &mut [u8] = self;
        pixels.copy_from_slice(data);
        Ok(())
    }

    fn get_image(&self, width: usize, height: usize, data: &mut [u8]) -> Result<()> {
        check_size(self, width, height, data.len())?;
        let pixels: &[u8] = self;
        data.copy_from_slice(pixels);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_image() {
        let mut image = RgbaImage::new(2, 1);
        let frame = [1, 2, 3, 4, 5, 6, 7, 8];
        image.put_image(2, 1, &frame).unwrap();
        assert_eq!(image.get_pixel(1, 0).0, [5, 6, 7, 8]);

        let mut back = [0u8; 8];
        image.get_image(2, 1, &mut back).unwrap();
        assert_eq!(back, frame);
    }

    #[test]
    fn test_size_mismatch() {
        let mut image = RgbaImage::new(2, 2);
        assert!(matches!(image.put_image(2, 1, &[0; 8]), Err(Error::Surface(_))));
        assert!(matches!(image.put_image(2, 2, &[0; 8]), Err(Error::Surface(_))));
    }
}
