use std::path::Path;

use morpho_image::{Image, ImageSize};

use crate::error::IoError;

/// Reads an image from the given file path into an RGB buffer.
///
/// The method tries to read any image format supported by the image crate
/// and converts the decoded result to rgb8, dropping alpha and expanding
/// grayscale as needed.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An RGB image with three channels.
pub fn read_image_any_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let file_path = file_path.as_ref();

    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    // open the file and map it to memory
    let file = std::fs::File::open(file_path)?;
    let mmap = unsafe { memmap2::Mmap::map(&file)? };

    // decode the data directly from memory
    let img = image::ImageReader::new(std::io::Cursor::new(&mmap))
        .with_guessed_format()?
        .decode()?;

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    let data = img.into_rgb8().into_raw();

    Ok(Image::new(size, data)?)
}

/// True when the path has one of the raster extensions handled by the readers.
pub fn has_image_extension(file_path: impl AsRef<Path>) -> bool {
    file_path
        .as_ref()
        .extension()
        .map(|ext| {
            ext.eq_ignore_ascii_case("jpg")
                || ext.eq_ignore_ascii_case("jpeg")
                || ext.eq_ignore_ascii_case("png")
        })
        .unwrap_or(false)
}
