//! Grayscale image export and import of fields.

use std::path::Path;

use image::{GrayImage, Luma};

use crate::core::Result;
use super::grid::{Grid, ScalarField};

/// Render a field as 8-bit grayscale, values clamped to [0, 1].
///
/// Image pixel `(x, y)` is field texel `(x, y)`.
pub fn field_to_image(field: &ScalarField) -> GrayImage {
    GrayImage::from_fn(field.width() as u32, field.height() as u32, |x, y| {
        let v = field.row(y as usize)[x as usize];
        Luma([(v.clamp(0.0, 1.0) * 255.0).round() as u8])
    })
}

/// Convert an 8-bit grayscale image to a field in [0, 1].
pub fn field_from_image(img: &GrayImage) -> ScalarField {
    let (w, h) = img.dimensions();
    let mut field: ScalarField = Grid::new(w as usize, h as usize);
    for (x, y, pixel) in img.enumerate_pixels() {
        field.set(glam::IVec2::new(x as i32, y as i32), pixel.0[0] as f32 / 255.0);
    }
    field
}

/// Save a field as a grayscale PNG.
pub fn save_png(field: &ScalarField, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    field_to_image(field).save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

/// Load any supported image as a field, converting to 8-bit luma first.
pub fn load_png(path: &Path) -> Result<ScalarField> {
    let img = image::open(path)?.into_luma8();
    Ok(field_from_image(&img))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;
    use tempfile::TempDir;

    #[test]
    fn test_field_to_image_scaling() {
        let field = Grid::from_cells(4, 1, vec![0.0, 0.5, 1.0, 1.7]).unwrap();
        let img = field_to_image(&field);
        assert_eq!(img.dimensions(), (4, 1));
        assert_eq!(img.get_pixel(0, 0).0[0], 0);
        assert_eq!(img.get_pixel(1, 0).0[0], 128);
        assert_eq!(img.get_pixel(2, 0).0[0], 255);
        assert_eq!(img.get_pixel(3, 0).0[0], 255);
    }

    #[test]
    fn test_image_orientation() {
        let mut field: ScalarField = Grid::new(3, 2);
        field.set(IVec2::new(2, 1), 1.0);
        let img = field_to_image(&field);
        assert_eq!(img.get_pixel(2, 1).0[0], 255);
        assert_eq!(img.get_pixel(1, 0).0[0], 0);

        let back = field_from_image(&img);
        assert_eq!(back.get(IVec2::new(2, 1)), Some(&1.0));
    }

    #[test]
    fn test_png_persistence() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("field.png");

        let mut field: ScalarField = Grid::new(8, 8);
        field.set(IVec2::new(4, 4), 1.0);
        field.set(IVec2::new(4, 5), 0.6);

        save_png(&field, &path).expect("save failed");
        let loaded = load_png(&path).expect("load failed");
        assert_eq!(loaded.width(), 8);
        assert_eq!(loaded.get(IVec2::new(4, 4)), Some(&1.0));
        let v = *loaded.get(IVec2::new(4, 5)).unwrap();
        assert!((v - 0.6).abs() < 1.0 / 255.0);
    }
}
