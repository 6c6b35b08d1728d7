use crate::parallel;
use geosay_image::{Image, ImageError};

/// Compute a luminance image as the per-pixel maximum over the color channels.
///
/// This is not a perceptual weighting: every channel contributes equally and only the
/// brightest one is kept. A single channel image is copied as is.
///
/// # Arguments
///
/// * `src` - The input image with `C` channels.
/// * `dst` - The output luminance image, same size as `src`.
///
/// # Example
///
/// ```
/// use geosay_image::{Image, ImageSize};
/// use geosay_imgproc::color::luminance_max;
///
/// let image = Image::<u8, 3>::new(
///     ImageSize {
///         width: 2,
///         height: 1,
///     },
///     vec![10, 200, 30, 0, 0, 7],
/// )
/// .unwrap();
///
/// let mut lum = Image::<f32, 1>::from_size_val(image.size(), 0.0).unwrap();
/// luminance_max(&image, &mut lum).unwrap();
/// assert_eq!(lum.as_slice(), &[200.0, 7.0]);
/// ```
pub fn luminance_max<T, const C: usize>(
    src: &Image<T, C>,
    dst: &mut Image<f32, 1>,
) -> Result<(), ImageError>
where
    T: Copy + Into<f32> + Send + Sync,
{
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    parallel::par_iter_rows(src, dst, |src_pixel, dst_pixel| {
        dst_pixel[0] = src_pixel
            .iter()
            .map(|&v| v.into())
            .fold(f32::MIN, f32::max);
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geosay_image::ImageSize;

    #[test]
    fn luminance_single_channel_is_copy() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 3,
            height: 1,
        };
        let image = Image::<u8, 1>::new(size, vec![1, 128, 255])?;
        let mut lum = Image::<f32, 1>::from_size_val(size, 0.0)?;
        luminance_max(&image, &mut lum)?;
        assert_eq!(lum.as_slice(), &[1.0, 128.0, 255.0]);
        Ok(())
    }

    #[test]
    fn luminance_takes_channel_max() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 2,
            height: 2,
        };
        #[rustfmt::skip]
        let image = Image::<u8, 3>::new(
            size,
            vec![
                255, 0, 0,    0, 255, 0,
                0, 0, 90,     12, 11, 10,
            ],
        )?;
        let mut lum = Image::<f32, 1>::from_size_val(size, 0.0)?;
        luminance_max(&image, &mut lum)?;
        assert_eq!(lum.as_slice(), &[255.0, 255.0, 90.0, 12.0]);
        Ok(())
    }

    #[test]
    fn luminance_size_mismatch() -> Result<(), ImageError> {
        let image = Image::<u8, 3>::from_size_val([2, 2].into(), 0)?;
        let mut lum = Image::<f32, 1>::from_size_val([1, 2].into(), 0.0)?;
        assert!(luminance_max(&image, &mut lum).is_err());
        Ok(())
    }
}
