use geosay_image::{Image, ImageError};
use rayon::prelude::*;

/// A rectangular structuring element.
///
/// The anchor sits at `(width / 2, height / 2)`, so for even sizes the window extends one
/// pixel further towards the top left than towards the bottom right.
///
/// # Example
///
/// ```
/// use geosay_imgproc::morphology::BoxKernel;
///
/// let kernel = BoxKernel::square(50);
/// assert_eq!(kernel.anchor(), (25, 25));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxKernel {
    /// Width of the kernel in pixels.
    pub width: usize,
    /// Height of the kernel in pixels.
    pub height: usize,
}

impl BoxKernel {
    /// Create a square kernel of side `size`.
    pub fn square(size: usize) -> Self {
        Self {
            width: size,
            height: size,
        }
    }

    /// The anchor of the kernel as (x, y).
    pub fn anchor(&self) -> (usize, usize) {
        (self.width / 2, self.height / 2)
    }

    /// The anchor of the kernel mirrored through its center.
    ///
    /// Equal to [`BoxKernel::anchor`] for odd sizes, one pixel closer to the origin for even
    /// sizes. Eroding with it after dilating with [`BoxKernel::anchor`] keeps a closing above
    /// its source.
    pub fn reflected_anchor(&self) -> (usize, usize) {
        let (ax, ay) = self.anchor();
        (
            self.width.saturating_sub(1 + ax),
            self.height.saturating_sub(1 + ay),
        )
    }
}

#[derive(Clone, Copy)]
enum Extremum {
    Max,
    Min,
}

impl Extremum {
    #[inline]
    fn pick(self, a: f32, b: f32) -> f32 {
        match self {
            Extremum::Max => a.max(b),
            Extremum::Min => a.min(b),
        }
    }

    fn identity(self) -> f32 {
        match self {
            Extremum::Max => f32::NEG_INFINITY,
            Extremum::Min => f32::INFINITY,
        }
    }
}

/// The inclusive window `[i - anchor, i - anchor + size - 1]` clipped to `0..len`.
#[inline]
fn window(i: usize, anchor: usize, size: usize, len: usize) -> (usize, usize) {
    let start = i.saturating_sub(anchor);
    let end = (i + size).saturating_sub(anchor + 1).min(len - 1);
    (start, end)
}

/// Rank filter over a box, computed as a horizontal pass followed by a vertical pass.
///
/// Pixels outside of the image do not take part in the extremum.
fn box_extremum(
    src: &Image<f32, 1>,
    dst: &mut Image<f32, 1>,
    kernel: BoxKernel,
    anchor: (usize, usize),
    op: Extremum,
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
    if rows == 0 || cols == 0 || kernel.width == 0 || kernel.height == 0 {
        dst.as_slice_mut().copy_from_slice(src.as_slice());
        return Ok(());
    }

    let (anchor_x, anchor_y) = anchor;
    let mut temp = vec![0.0f32; src.as_slice().len()];

    // horizontal
    temp.par_chunks_exact_mut(cols)
        .zip(src.as_slice().par_chunks_exact(cols))
        .for_each(|(row_temp, row_src)| {
            for (x, out) in row_temp.iter_mut().enumerate() {
                let (start, end) = window(x, anchor_x, kernel.width, cols);
                *out = row_src[start..=end]
                    .iter()
                    .fold(op.identity(), |acc, &v| op.pick(acc, v));
            }
        });

    // vertical
    dst.as_slice_mut()
        .par_chunks_exact_mut(cols)
        .enumerate()
        .for_each(|(y, row_dst)| {
            let (start, end) = window(y, anchor_y, kernel.height, rows);
            row_dst.iter_mut().for_each(|v| *v = op.identity());
            for yy in start..=end {
                let row_temp = &temp[yy * cols..(yy + 1) * cols];
                row_dst
                    .iter_mut()
                    .zip(row_temp.iter())
                    .for_each(|(d, &t)| *d = op.pick(*d, t));
            }
        });

    Ok(())
}

/// Dilate an image with a box kernel.
///
/// Each pixel is replaced by the maximum value in the neighborhood defined by the kernel.
pub fn dilate(
    src: &Image<f32, 1>,
    dst: &mut Image<f32, 1>,
    kernel: BoxKernel,
) -> Result<(), ImageError> {
    box_extremum(src, dst, kernel, kernel.anchor(), Extremum::Max)
}

/// Erode an image with a box kernel.
///
/// Each pixel is replaced by the minimum value in the neighborhood defined by the kernel.
pub fn erode(
    src: &Image<f32, 1>,
    dst: &mut Image<f32, 1>,
    kernel: BoxKernel,
) -> Result<(), ImageError> {
    box_extremum(src, dst, kernel, kernel.anchor(), Extremum::Min)
}

/// Closing: dilation followed by erosion.
///
/// Fills dark structures smaller than the kernel. The erosion uses the reflected anchor, so
/// the result is never below `src`, also for even kernel sizes.
pub fn close(
    src: &Image<f32, 1>,
    dst: &mut Image<f32, 1>,
    kernel: BoxKernel,
) -> Result<(), ImageError> {
    let mut dilated = Image::from_size_val(src.size(), 0.0)?;
    dilate(src, &mut dilated, kernel)?;
    box_extremum(
        &dilated,
        dst,
        kernel,
        kernel.reflected_anchor(),
        Extremum::Min,
    )
}

/// Black-hat transform: the closing of the image minus the image.
///
/// Highlights dark structures smaller than the kernel; the result is non-negative.
///
/// # Example
///
/// ```
/// use geosay_image::{Image, ImageSize};
/// use geosay_imgproc::morphology::{black_hat, BoxKernel};
///
/// let size = ImageSize { width: 5, height: 5 };
/// let mut img = Image::<f32, 1>::from_size_val(size, 200.0).unwrap();
/// img.set_pixel(2, 2, 0, 50.0).unwrap();
///
/// let mut dst = Image::<f32, 1>::from_size_val(size, 0.0).unwrap();
/// black_hat(&img, &mut dst, BoxKernel::square(3)).unwrap();
///
/// assert_eq!(dst.get_pixel(2, 2, 0).unwrap(), &150.0);
/// assert_eq!(dst.get_pixel(0, 0, 0).unwrap(), &0.0);
/// ```
pub fn black_hat(
    src: &Image<f32, 1>,
    dst: &mut Image<f32, 1>,
    kernel: BoxKernel,
) -> Result<(), ImageError> {
    close(src, dst, kernel)?;
    dst.as_slice_mut()
        .par_iter_mut()
        .zip(src.as_slice().par_iter())
        .for_each(|(d, &s)| *d -= s);
    Ok(())
}
