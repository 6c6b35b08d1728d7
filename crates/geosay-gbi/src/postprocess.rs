use geosay_image::{Image, ImageError};
use geosay_imgproc::{color, filter, morphology, parallel};

use crate::error::GbiError;

/// Single channel luminance of an image: the per-pixel maximum over the channels.
pub fn luminance<T, const C: usize>(image: &Image<T, C>) -> Result<Image<f32, 1>, GbiError>
where
    T: Copy + Into<f32> + Send + Sync,
{
    let mut lum = Image::from_size_val(image.size(), 0.0)?;
    color::luminance_max(image, &mut lum)?;
    Ok(lum)
}

/// Attenuate the saliency map where the luminance has dark structures smaller than a
/// `kernel_size` square: `map *= 1 - blackhat(luminance) / 255`.
///
/// # Errors
///
/// Fails if the map and the luminance image differ in size.
pub fn suppress_black_hat(
    map: &mut Image<f32, 1>,
    luminance: &Image<f32, 1>,
    kernel_size: usize,
) -> Result<(), GbiError> {
    if map.size() != luminance.size() {
        return Err(ImageError::InvalidImageSize(
            luminance.width(),
            luminance.height(),
            map.width(),
            map.height(),
        )
        .into());
    }

    let mut hat = Image::from_size_val(luminance.size(), 0.0)?;
    morphology::black_hat(luminance, &mut hat, morphology::BoxKernel::square(kernel_size))?;

    parallel::par_iter_rows_zip(&hat, map, |&h, m| *m *= 1.0 - h / 255.0);

    Ok(())
}

/// Gaussian smoothing of the saliency map with a square kernel.
pub fn smooth(
    map: &Image<f32, 1>,
    kernel_size: usize,
    sigma: f32,
) -> Result<Image<f32, 1>, GbiError> {
    let mut out = Image::from_size_val(map.size(), 0.0)?;
    filter::gaussian_blur(map, &mut out, (kernel_size, kernel_size), (sigma, sigma))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geosay_image::ImageSize;

    #[test]
    fn luminance_gray_and_color() -> Result<(), GbiError> {
        let size = ImageSize {
            width: 2,
            height: 1,
        };
        let gray = Image::<u8, 1>::new(size, vec![3, 250])?;
        assert_eq!(luminance(&gray)?.as_slice(), &[3.0, 250.0]);

        let rgb = Image::<u8, 3>::new(size, vec![1, 90, 4, 255, 0, 0])?;
        assert_eq!(luminance(&rgb)?.as_slice(), &[90.0, 255.0]);
        Ok(())
    }

    #[test]
    fn black_hat_attenuates_dark_spots() -> Result<(), GbiError> {
        let size = ImageSize {
            width: 7,
            height: 7,
        };
        let mut lum = Image::<f32, 1>::from_size_val(size, 255.0)?;
        lum.set_pixel(3, 3, 0, 0.0)?;

        let mut map = Image::<f32, 1>::from_size_val(size, 2.0)?;
        suppress_black_hat(&mut map, &lum, 3)?;

        // the dark pixel is fully inside a bright closing: black hat 255
        assert_relative_eq!(*map.get_pixel(3, 3, 0)?, 0.0);
        assert_relative_eq!(*map.get_pixel(0, 0, 0)?, 2.0);
        assert_relative_eq!(*map.get_pixel(3, 4, 0)?, 2.0);
        Ok(())
    }

    #[test]
    fn black_hat_never_amplifies() -> Result<(), GbiError> {
        let size = ImageSize {
            width: 60,
            height: 40,
        };
        let mut lum = Image::<f32, 1>::from_size_val(size, 0.0)?;
        lum.set_pixel(20, 15, 0, 255.0)?;

        let mut map = Image::<f32, 1>::from_size_val(size, 1.0)?;
        suppress_black_hat(&mut map, &lum, 50)?;
        assert!(map.as_slice().iter().all(|&v| (0.0..=1.0).contains(&v)));
        Ok(())
    }

    #[test]
    fn black_hat_flat_image_is_noop() -> Result<(), GbiError> {
        let size = ImageSize {
            width: 10,
            height: 6,
        };
        let lum = Image::<f32, 1>::from_size_val(size, 80.0)?;
        let mut map = Image::<f32, 1>::from_size_val(size, 0.75)?;
        suppress_black_hat(&mut map, &lum, 50)?;
        assert!(map.as_slice().iter().all(|&v| v == 0.75));
        Ok(())
    }

    #[test]
    fn black_hat_size_mismatch() -> Result<(), GbiError> {
        let lum = Image::<f32, 1>::from_size_val([4, 4].into(), 0.0)?;
        let mut map = Image::<f32, 1>::from_size_val([4, 5].into(), 0.0)?;
        assert!(matches!(
            suppress_black_hat(&mut map, &lum, 3),
            Err(GbiError::ImageError(ImageError::InvalidImageSize(..)))
        ));
        Ok(())
    }

    #[test]
    fn smoothing_spreads_a_peak() -> Result<(), GbiError> {
        let mut map = Image::<f32, 1>::from_size_val([9, 9].into(), 0.0)?;
        map.set_pixel(4, 4, 0, 1.0)?;

        let out = smooth(&map, 5, 1.0)?;
        let sum: f32 = out.as_slice().iter().sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-5);
        assert!(*out.get_pixel(4, 4, 0)? < 1.0);
        assert!(*out.get_pixel(4, 4, 0)? > *out.get_pixel(5, 4, 0)?);
        assert_eq!(*out.get_pixel(0, 0, 0)?, 0.0);
        Ok(())
    }
}
