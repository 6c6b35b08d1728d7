use crate::{Image, ImageError};

/// Convert a floating point image to 8 bits by rounding and saturating into `0..=255`.
///
/// NaN values map to 0.
pub fn saturate_to_u8<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<u8, C>,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.width(),
            src.height(),
            dst.width(),
            dst.height(),
        ));
    }

    dst.as_slice_mut()
        .iter_mut()
        .zip(src.as_slice().iter())
        .for_each(|(out, &inp)| {
            // `as` saturates and maps NaN to 0
            *out = inp.round() as u8;
        });

    Ok(())
}
