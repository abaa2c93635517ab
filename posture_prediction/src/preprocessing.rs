use crate::{config::TensorLayout, error::PredictError};
use image::{imageops::FilterType, DynamicImage};
use ndarray::{Array, Ix4};
use std::path::Path;

pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

pub fn has_allowed_extension(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => ALLOWED_EXTENSIONS.contains(&ext.to_lowercase().as_str()),
        None => false,
    }
}

/// Rejects paths that do not exist or point at an empty file.
pub fn ensure_readable_image(image_path: &Path) -> Result<u64, PredictError> {
    let metadata = std::fs::metadata(image_path).map_err(|e| {
        PredictError::InputInvalid(format!("cannot read {}: {}", image_path.display(), e))
    })?;

    if !metadata.is_file() {
        return Err(PredictError::InputInvalid(format!(
            "{} is not a file",
            image_path.display()
        )));
    }
    if metadata.len() == 0 {
        return Err(PredictError::InputInvalid(format!(
            "{} is empty",
            image_path.display()
        )));
    }

    Ok(metadata.len())
}

pub fn load_image(image_path: &Path) -> Result<DynamicImage, PredictError> {
    image::ImageReader::open(image_path)
        .map_err(|e| PredictError::DecodeFailed(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| PredictError::DecodeFailed(e.to_string()))?
        .decode()
        .map_err(|e| PredictError::DecodeFailed(e.to_string()))
}

/// Resizes to `width`×`height`, drops alpha/grayscale into RGB and scales each
/// channel into `[0, 1]`.
pub fn transform_image(
    image: &DynamicImage,
    (width, height): (u32, u32),
    layout: TensorLayout,
) -> Array<f32, Ix4> {
    let resized = image.resize_exact(width, height, FilterType::Nearest).to_rgb8();
    let (w, h) = (width as usize, height as usize);

    let mut input = match layout {
        TensorLayout::Nhwc => Array::zeros((1, h, w, 3)),
        TensorLayout::Nchw => Array::zeros((1, 3, h, w)),
    };

    for (x, y, pixel) in resized.enumerate_pixels() {
        let (x, y) = (x as usize, y as usize);
        for (c, value) in pixel.0.iter().enumerate() {
            let value = (*value as f32) / 255.;
            match layout {
                TensorLayout::Nhwc => input[[0, y, x, c]] = value,
                TensorLayout::Nchw => input[[0, c, y, x]] = value,
            }
        }
    }

    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, LumaA, Rgb};
    use std::io::Write;

    #[test]
    fn test_transform_image_nhwc() {
        let img = ImageBuffer::<Rgb<u8>, Vec<u8>>::from_pixel(100, 50, Rgb([255, 0, 51]));
        let input = transform_image(&DynamicImage::ImageRgb8(img), (32, 16), TensorLayout::Nhwc);

        assert_eq!(input.shape(), &[1, 16, 32, 3]);
        assert_eq!(input[[0, 3, 7, 0]], 1.0);
        assert_eq!(input[[0, 3, 7, 1]], 0.0);
        assert!((input[[0, 3, 7, 2]] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_transform_image_nchw_from_grayscale_alpha() {
        let img = ImageBuffer::<LumaA<u8>, Vec<u8>>::from_pixel(10, 10, LumaA([128, 10]));
        let input = transform_image(&DynamicImage::ImageLumaA8(img), (8, 8), TensorLayout::Nchw);

        assert_eq!(input.shape(), &[1, 3, 8, 8]);
        for c in 0..3 {
            assert!((input[[0, c, 4, 4]] - 128.0 / 255.0).abs() < 1e-6);
        }
        assert!(input.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_allowed_extensions() {
        assert!(has_allowed_extension("bad.png"));
        assert!(has_allowed_extension("photo.JPEG"));
        assert!(has_allowed_extension("a.b.bmp"));
        assert!(!has_allowed_extension("x.txt"));
        assert!(!has_allowed_extension("png"));
        assert!(!has_allowed_extension("archive.png.zip"));
    }

    #[test]
    fn test_empty_and_missing_files_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("x.png");
        std::fs::File::create(&empty).unwrap();

        assert!(matches!(
            ensure_readable_image(&empty),
            Err(PredictError::InputInvalid(_))
        ));
        assert!(matches!(
            ensure_readable_image(&dir.path().join("missing.png")),
            Err(PredictError::InputInvalid(_))
        ));
        assert!(matches!(
            ensure_readable_image(dir.path()),
            Err(PredictError::InputInvalid(_))
        ));
    }

    #[test]
    fn test_garbage_fails_to_decode() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(b"definitely not an image").unwrap();

        assert_eq!(ensure_readable_image(file.path()).unwrap(), 23);
        assert!(matches!(
            load_image(file.path()),
            Err(PredictError::DecodeFailed(_))
        ));
    }
}
