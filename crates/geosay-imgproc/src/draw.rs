use geosay_image::{Image, ImageSize};

/// A horizontal run of pixels `x_start..=x_end` on row `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Row of the span.
    pub y: usize,
    /// First column covered by the span.
    pub x_start: usize,
    /// Last column covered by the span (inclusive).
    pub x_end: usize,
}

/// Scan-convert a convex polygon into one span per covered row.
///
/// The vertices are rounded to the nearest pixel before conversion and the polygon
/// boundary is included. Rows and columns outside of `size` are clipped away, and every
/// covered pixel appears in exactly one span. Degenerate polygons (a point or a segment)
/// still cover the pixels along them.
///
/// # Arguments
///
/// * `size` - The size of the raster the polygon is drawn into.
/// * `points` - The polygon vertices as `[x, y]`, in order.
///
/// # Example
///
/// ```
/// use geosay_image::ImageSize;
/// use geosay_imgproc::draw::convex_polygon_spans;
///
/// let size = ImageSize { width: 5, height: 5 };
/// let spans = convex_polygon_spans(size, &[[1.0, 1.0], [3.0, 1.0], [3.0, 3.0], [1.0, 3.0]]);
/// assert_eq!(spans.len(), 3);
/// assert!(spans.iter().all(|s| s.x_start == 1 && s.x_end == 3));
/// ```
pub fn convex_polygon_spans(size: ImageSize, points: &[[f32; 2]]) -> Vec<Span> {
    let mut spans = Vec::new();
    if points.is_empty() || size.width == 0 || size.height == 0 {
        return spans;
    }

    // rounded coordinates stay in f64 so far away vertices cannot overflow
    let vertices: Vec<[f64; 2]> = points
        .iter()
        .map(|p| [f64::from(p[0]).round(), f64::from(p[1]).round()])
        .collect();

    let y_min = vertices.iter().map(|p| p[1]).fold(f64::INFINITY, f64::min).max(0.0);
    let y_max = vertices
        .iter()
        .map(|p| p[1])
        .fold(f64::NEG_INFINITY, f64::max)
        .min((size.height - 1) as f64);
    if y_min > y_max {
        return spans;
    }

    let max_col = size.width as i64 - 1;

    for y in y_min as i64..=y_max as i64 {
        let yf = y as f64;
        let mut x_lo = f64::INFINITY;
        let mut x_hi = f64::NEG_INFINITY;

        for (i, a) in vertices.iter().enumerate() {
            let b = &vertices[(i + 1) % vertices.len()];

            if a[1] == b[1] {
                if a[1] == yf {
                    x_lo = x_lo.min(a[0].min(b[0]));
                    x_hi = x_hi.max(a[0].max(b[0]));
                }
                continue;
            }

            if yf < a[1].min(b[1]) || yf > a[1].max(b[1]) {
                continue;
            }

            let t = (yf - a[1]) / (b[1] - a[1]);
            let x = a[0] + t * (b[0] - a[0]);
            x_lo = x_lo.min(x);
            x_hi = x_hi.max(x);
        }

        if x_lo > x_hi {
            continue;
        }

        let x_start = (x_lo.round() as i64).max(0);
        let x_end = (x_hi.round() as i64).min(max_col);
        if x_start > x_end {
            continue;
        }

        spans.push(Span {
            y: y as usize,
            x_start: x_start as usize,
            x_end: x_end as usize,
        });
    }

    spans
}

/// Fill a convex polygon on an image inplace.
///
/// See [`convex_polygon_spans`] for the pixel coverage rules.
///
/// # Arguments
///
/// * `img` - The image to draw on.
/// * `points` - The polygon vertices as `[x, y]`, in order.
/// * `color` - The fill color as an array of `C` elements.
pub fn fill_convex_polygon<T: Copy, const C: usize>(
    img: &mut Image<T, C>,
    points: &[[f32; 2]],
    color: [T; C],
) {
    let cols = img.cols();
    let spans = convex_polygon_spans(img.size(), points);
    let data = img.as_slice_mut();
    for span in spans {
        let row = span.y * cols * C;
        data[row + span.x_start * C..row + (span.x_end + 1) * C]
            .chunks_exact_mut(C)
            .for_each(|px| px.copy_from_slice(&color));
    }
}
