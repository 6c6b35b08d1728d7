use geosay_image::{Image, ImageSize};
use geosay_imgproc::draw::convex_polygon_spans;

use crate::error::GbiError;
use crate::junction::Junction;
use crate::neighbors::DistanceMatrix;
use crate::prob::AngleProbTable;

/// `1 - exp(logNFA)`: close to 1 for significant detections, close to 0 otherwise.
#[inline]
pub fn significance(log_nfa: f64) -> f32 {
    (1.0 - log_nfa.exp()) as f32
}

/// Saliency of a junction on its own, from its angle and its significance.
pub fn base_weight(junction: &Junction, table: &AngleProbTable) -> f32 {
    table.probability(junction.theta()) * significance(junction.log_nfa())
}

/// Saliency of junction `i`: its base weight plus the base weights of its neighbors,
/// decayed by `exp(-sqrt(D / mscale))`.
///
/// The leading self entry of the neighbor list is skipped.
pub fn junction_weight(
    junctions: &[Junction],
    distances: &DistanceMatrix,
    table: &AngleProbTable,
    i: usize,
) -> f32 {
    let junction = &junctions[i];
    let mscale = junction.mscale();

    let diffusion: f32 = junction
        .diffusion_neighbors()
        .iter()
        .map(|&k| {
            let decay = (-(distances.get(i, k) / mscale).sqrt()).exp();
            decay * base_weight(&junctions[k], table)
        })
        .sum();

    base_weight(junction, table) + diffusion
}

/// The quadrilateral spanned by the first two branches of a junction.
///
/// Vertices are the endpoint of branch 0, the location, the endpoint of branch 1 and the
/// fourth corner of the parallelogram they define.
pub fn wedge_polygon(junction: &Junction) -> [[f32; 2]; 4] {
    let location = junction.location();
    let branches = junction.branches();
    let e0 = branches[0].endpoint();
    let e1 = branches[1].endpoint();

    [
        e0.to_array(),
        location.to_array(),
        e1.to_array(),
        (e0 - location + e1).to_array(),
    ]
}

/// Accumulate the weighted wedges of all junctions into `map`.
///
/// Contributions are added, so overlapping wedges sum up. The junctions must carry their
/// neighbor lists, see [`crate::neighbors::build_neighbor_graph`].
///
/// # Errors
///
/// Returns [`GbiError::NeighborGraphMismatch`] if `distances` was not built from `junctions`.
pub fn accumulate_gbi_into(
    junctions: &[Junction],
    distances: &DistanceMatrix,
    table: &AngleProbTable,
    map: &mut Image<f32, 1>,
) -> Result<(), GbiError> {
    if distances.len() != junctions.len() {
        return Err(GbiError::NeighborGraphMismatch {
            junctions: junctions.len(),
            distances: distances.len(),
        });
    }

    let size = map.size();
    let cols = map.cols();
    let data = map.as_slice_mut();

    for (i, junction) in junctions.iter().enumerate() {
        let weight = junction_weight(junctions, distances, table, i);
        log::debug!("junction {i}: weight {weight}");

        for span in convex_polygon_spans(size, &wedge_polygon(junction)) {
            let row = span.y * cols;
            data[row + span.x_start..=row + span.x_end]
                .iter_mut()
                .for_each(|v| *v += weight);
        }
    }

    Ok(())
}

/// Compute the raw boundary saliency map of the given size.
///
/// # Example
///
/// ```
/// use geosay_image::ImageSize;
/// use geosay_gbi::junction::Junction;
/// use geosay_gbi::neighbors::build_neighbor_graph;
/// use geosay_gbi::prob::AngleProbTable;
/// use geosay_gbi::saliency::accumulate_gbi;
///
/// let table = AngleProbTable::from_fn(|_| 0.5).unwrap();
/// let mut junctions: Vec<Junction> = Vec::new();
/// let distances = build_neighbor_graph(&mut junctions);
///
/// let size = ImageSize { width: 4, height: 3 };
/// let map = accumulate_gbi(&junctions, &distances, &table, size).unwrap();
/// assert!(map.as_slice().iter().all(|&v| v == 0.0));
/// ```
pub fn accumulate_gbi(
    junctions: &[Junction],
    distances: &DistanceMatrix,
    table: &AngleProbTable,
    size: ImageSize,
) -> Result<Image<f32, 1>, GbiError> {
    let mut map = Image::from_size_val(size, 0.0)?;
    accumulate_gbi_into(junctions, distances, table, &mut map)?;
    Ok(map)
}
