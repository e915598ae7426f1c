use std::{fs, path::Path};

use jpeg_encoder::{ColorType, Encoder};
use morpho_image::{Image, ImageSize};

use crate::error::IoError;

/// Reads a JPEG file with three channels _(rgb8)_.
///
/// # Arguments
///
/// * `file_path` - The path to the JPEG file.
///
/// # Returns
///
/// A RGB image with three channels _(rgb8)_.
pub fn read_image_jpeg_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    if file_path.extension().map_or(true, |ext| {
        !ext.eq_ignore_ascii_case("jpg") && !ext.eq_ignore_ascii_case("jpeg")
    }) {
        return Err(IoError::InvalidFileExtension(file_path.to_path_buf()));
    }

    let jpeg_data = fs::read(file_path)?;
    let mut decoder = zune_jpeg::JpegDecoder::new(jpeg_data);
    decoder.decode_headers()?;

    let image_info = decoder.info().ok_or_else(|| {
        IoError::JpegDecodingError(zune_jpeg::errors::DecodeErrors::Format(String::from(
            "Failed to find image info from its metadata",
        )))
    })?;

    let image_size = ImageSize {
        width: image_info.width as usize,
        height: image_info.height as usize,
    };

    let img_data = decoder.decode()?;

    Ok(Image::new(image_size, img_data)?)
}

/// Writes the given JPEG _(rgb8)_ data to the given file path.
///
/// # Arguments
///
/// * `file_path` - The path to the JPEG image.
/// * `image` - The image containing the JPEG image data.
/// * `quality` - The quality of the JPEG encoding, from 0 (lowest) to 100 (highest).
pub fn write_image_jpeg_rgb8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 3>,
    quality: u8,
) -> Result<(), IoError> {
    let encoder = Encoder::new_file(file_path.as_ref(), quality)?;
    encoder.encode(
        image.as_slice(),
        image.width() as u16,
        image.height() as u16,
        ColorType::Rgb,
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use morpho_image::{Image, ImageSize};

    #[test]
    fn write_read_roundtrip_is_close() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("roundtrip.jpg");

        let size = ImageSize {
            width: 16,
            height: 16,
        };
        let image = Image::<u8, 3>::from_size_val(size, 128)?;

        write_image_jpeg_rgb8(&file_path, &image, 95)?;
        let image_back = read_image_jpeg_rgb8(&file_path)?;

        assert_eq!(image_back.size(), size);
        // lossy codec: a uniform image should stay close to its level
        for &v in image_back.as_slice() {
            assert!((i16::from(v) - 128).abs() <= 4, "value {v}");
        }

        Ok(())
    }

    #[test]
    fn wrong_extension_is_an_error() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("image.png");
        std::fs::write(&file_path, b"not a jpeg")?;

        let res = read_image_jpeg_rgb8(&file_path);
        assert!(matches!(res, Err(IoError::InvalidFileExtension(_))));

        Ok(())
    }
}
