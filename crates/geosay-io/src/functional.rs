use std::path::Path;

use geosay_image::{Image, ImageSize};

use crate::error::IoError;

/// A decoded image, either single channel or RGB.
pub enum GenericImage {
    /// 8-bit grayscale image
    L8(Image<u8, 1>),
    /// 8-bit RGB image
    Rgb8(Image<u8, 3>),
}

impl GenericImage {
    /// The size of the decoded image.
    pub fn size(&self) -> ImageSize {
        match self {
            GenericImage::L8(img) => img.size(),
            GenericImage::Rgb8(img) => img.size(),
        }
    }

    /// The number of channels of the decoded image.
    pub fn num_channels(&self) -> usize {
        match self {
            GenericImage::L8(img) => img.num_channels(),
            GenericImage::Rgb8(img) => img.num_channels(),
        }
    }
}

/// Reads an image from the given file path.
///
/// The method tries to read from any image format supported by the image crate.
/// Grayscale images (with or without alpha, any bit depth) are decoded to [`GenericImage::L8`],
/// everything else to [`GenericImage::Rgb8`]; alpha channels are dropped.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
pub fn read_image_any(file_path: impl AsRef<Path>) -> Result<GenericImage, IoError> {
    let file_path = file_path.as_ref();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let img = image::ImageReader::open(file_path)?
        .with_guessed_format()?
        .decode()?;

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    let image = match img.color() {
        image::ColorType::L8
        | image::ColorType::La8
        | image::ColorType::L16
        | image::ColorType::La16 => {
            GenericImage::L8(Image::<u8, 1>::new(size, img.into_luma8().into_raw())?)
        }
        _ => GenericImage::Rgb8(Image::<u8, 3>::new(size, img.into_rgb8().into_raw())?),
    };

    Ok(image)
}

/// Writes a single channel 8-bit image as PNG.
///
/// # Arguments
///
/// * `file_path` - The path to the output PNG file.
/// * `image` - The image to write.
pub fn write_image_png_mono8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 1>,
) -> Result<(), IoError> {
    let too_large = |_| IoError::ImageTooLarge(image.size());
    let width = u32::try_from(image.width()).map_err(too_large)?;
    let height = u32::try_from(image.height()).map_err(too_large)?;

    image::save_buffer_with_format(
        file_path,
        image.as_slice(),
        width,
        height,
        image::ExtendedColorType::L8,
        image::ImageFormat::Png,
    )?;

    Ok(())
}
