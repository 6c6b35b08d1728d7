use geosay_image::{Image, ImageError};
use rayon::prelude::*;

/// Map an out-of-range index back into `0..len` by mirroring around the border pixel,
/// excluding the border pixel itself (`gfedcb|abcdefgh|gfedcba`).
#[inline]
fn reflect101(i: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let len = len as isize;
    let mut i = i;
    while i < 0 || i >= len {
        if i < 0 {
            i = -i;
        } else {
            i = 2 * len - i - 2;
        }
    }
    i as usize
}

/// Apply a separable filter to an image.
///
/// The horizontal kernel is applied first into a temporary buffer, then the vertical kernel.
/// Borders are handled by reflection (reflect-101).
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel_x` - The horizontal kernel.
/// * `kernel_y` - The vertical kernel.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn separable_filter<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    kernel_x: &[f32],
    kernel_y: &[f32],
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    let rows = src.rows();
    let cols = src.cols();
    if rows == 0 || cols == 0 {
        return Ok(());
    }

    let half_x = (kernel_x.len() / 2) as isize;
    let half_y = (kernel_y.len() / 2) as isize;

    let src_data = src.as_slice();
    let mut temp = vec![0.0f32; src_data.len()];

    // horizontal
    temp.par_chunks_exact_mut(cols * C)
        .zip(src_data.par_chunks_exact(cols * C))
        .for_each(|(row_temp, row_src)| {
            for c in 0..cols {
                let mut acc = [0.0f32; C];
                for (i, &k) in kernel_x.iter().enumerate() {
                    let x = reflect101(c as isize + i as isize - half_x, cols);
                    for (ch, acc_val) in acc.iter_mut().enumerate() {
                        *acc_val += row_src[x * C + ch] * k;
                    }
                }
                row_temp[c * C..(c + 1) * C].copy_from_slice(&acc);
            }
        });

    // vertical
    dst.as_slice_mut()
        .par_chunks_exact_mut(cols * C)
        .enumerate()
        .for_each(|(r, row_dst)| {
            row_dst.iter_mut().for_each(|v| *v = 0.0);
            for (i, &k) in kernel_y.iter().enumerate() {
                let y = reflect101(r as isize + i as isize - half_y, rows);
                let row_temp = &temp[y * cols * C..(y + 1) * cols * C];
                row_dst
                    .iter_mut()
                    .zip(row_temp.iter())
                    .for_each(|(d, &t)| *d += t * k);
            }
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geosay_image::ImageSize;

    #[test]
    fn test_reflect101() {
        assert_eq!(reflect101(-1, 5), 1);
        assert_eq!(reflect101(-2, 5), 2);
        assert_eq!(reflect101(5, 5), 3);
        assert_eq!(reflect101(6, 5), 2);
        assert_eq!(reflect101(3, 5), 3);
        assert_eq!(reflect101(-4, 1), 0);
    }

    #[test]
    fn test_separable_filter_identity() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 3,
            height: 2,
        };
        let img = Image::<f32, 1>::new(size, vec![1., 2., 3., 4., 5., 6.])?;
        let mut dst = Image::<f32, 1>::from_size_val(size, 0.0)?;
        separable_filter(&img, &mut dst, &[0.0, 1.0, 0.0], &[1.0])?;
        assert_eq!(dst.as_slice(), img.as_slice());
        Ok(())
    }

    #[test]
    fn test_separable_filter_constant_image() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 6,
            height: 4,
        };
        let img = Image::<f32, 2>::from_size_val(size, 3.0)?;
        let mut dst = Image::<f32, 2>::from_size_val(size, 0.0)?;
        let k = [0.25, 0.5, 0.25];
        separable_filter(&img, &mut dst, &k, &k)?;
        for &v in dst.as_slice() {
            assert_relative_eq!(v, 3.0, epsilon = 1e-6);
        }
        Ok(())
    }

    #[rustfmt::skip]
    #[test]
    fn test_separable_filter_box() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 3,
            height: 3,
        };
        let img = Image::<f32, 1>::new(
            size,
            vec![
                0.0, 0.0, 0.0,
                0.0, 9.0, 0.0,
                0.0, 0.0, 0.0,
            ],
        )?;
        let mut dst = Image::<f32, 1>::from_size_val(size, 0.0)?;
        let k = [1.0 / 3.0; 3];
        separable_filter(&img, &mut dst, &k, &k)?;
        // reflect-101 mirrors the center into every border neighbourhood
        let expected = [
            4.0, 2.0, 4.0,
            2.0, 1.0, 2.0,
            4.0, 2.0, 4.0,
        ];
        for (v, e) in dst.as_slice().iter().zip(expected.iter()) {
            assert_relative_eq!(v, e, epsilon = 1e-5);
        }
        Ok(())
    }
}
