//! Recoloring of template icons used by the overlay controls.

use std::path::Path;

use image::{Rgba, RgbaImage};

/// Paint every pixel of `image` with `color`, keeping the pixel's coverage.
///
/// The source is treated as a template: only its alpha channel matters. The
/// result's alpha is the source alpha scaled by the tint's alpha.
pub fn tint(image: &RgbaImage, color: [u8; 4]) -> RgbaImage {
    let [r, g, b, a] = color;
    let mut tinted = image.clone();
    for pixel in tinted.pixels_mut() {
        let alpha = (u16::from(pixel[3]) * u16::from(a) / 255) as u8;
        *pixel = Rgba([r, g, b, alpha]);
    }
    tinted
}

/// Load an icon from disk and tint it.
pub fn load_tinted(path: &Path, color: [u8; 4]) -> Result<RgbaImage, image::ImageError> {
    let image = image::open(path)?.to_rgba8();
    Ok(tint(&image, color))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> RgbaImage {
        let mut image = RgbaImage::new(2, 1);
        image.put_pixel(0, 0, Rgba([10, 20, 30, 255]));
        image.put_pixel(1, 0, Rgba([200, 0, 0, 0]));
        image
    }

    #[test]
    fn test_tint_replaces_color_keeps_coverage() {
        let tinted = tint(&template(), [255, 255, 255, 255]);
        assert_eq!(tinted.get_pixel(0, 0), &Rgba([255, 255, 255, 255]));
        assert_eq!(tinted.get_pixel(1, 0), &Rgba([255, 255, 255, 0]));
    }

    #[test]
    fn test_tint_alpha_scales_coverage() {
        let tinted = tint(&template(), [0, 128, 255, 51]);
        assert_eq!(tinted.get_pixel(0, 0), &Rgba([0, 128, 255, 51]));
        assert_eq!(tinted.dimensions(), (2, 1));
    }

    #[test]
    fn test_load_missing_file_fails() {
        assert!(load_tinted(Path::new("does/not/exist.png"), [255; 4]).is_err());
    }
}
