use crate::geometry::squared_distance;
use crate::junction::Junction;

/// Upper bound on the neighbor list length, the junction itself included.
pub const MAX_NEIGHBORS: usize = 6;

/// Two junctions whose minimum scales differ by more than this factor are not neighbors.
pub const SCALE_RATIO_THRESHOLD: f32 = 3.0;

/// Square symmetric matrix of squared distances between junction centers.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    len: usize,
    data: Vec<f32>,
}

impl DistanceMatrix {
    /// Compute the squared distances between the centers of all junction pairs.
    pub fn from_junctions(junctions: &[Junction]) -> Self {
        let len = junctions.len();
        let mut data = vec![0.0f32; len * len];

        for i in 0..len {
            for j in (i + 1)..len {
                let d = squared_distance(junctions[i].center(), junctions[j].center());
                data[i * len + j] = d;
                data[j * len + i] = d;
            }
        }

        Self { len, data }
    }

    /// Number of junctions covered by the matrix.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the matrix covers no junction at all.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Squared distance between the centers of junctions `i` and `j`.
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is out of range.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f32 {
        assert!(i < self.len && j < self.len, "junction index out of range");
        self.data[i * self.len + j]
    }

    /// Squared distances from junction `i` to every junction.
    pub fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.len..(i + 1) * self.len]
    }
}

/// Whether two minimum branch scales are too far apart for saliency to diffuse between them.
///
/// # Example
///
/// ```
/// use geosay_gbi::neighbors::is_scale_incompatible;
///
/// assert!(!is_scale_incompatible(10.0, 10.0));
/// assert!(!is_scale_incompatible(3.0, 1.0));
/// assert!(is_scale_incompatible(1.0, 5.0));
/// ```
#[inline]
pub fn is_scale_incompatible(mscale_a: f32, mscale_b: f32) -> bool {
    let ratio = mscale_a / mscale_b;
    ratio > SCALE_RATIO_THRESHOLD || ratio < 1.0 / SCALE_RATIO_THRESHOLD
}

/// Select the neighbors of junction `i`.
///
/// Candidates are visited by ascending distance, ties broken by putting `i` first and then by
/// index. The walk stops at the first candidate farther than `mscale_i` from `i` or once
/// [`MAX_NEIGHBORS`] have been accepted; scale incompatible candidates are skipped.
fn select_neighbors(junctions: &[Junction], distances: &DistanceMatrix, i: usize) -> Vec<usize> {
    let row = distances.row(i);
    let mscale = junctions[i].mscale();
    let radius_sq = mscale * mscale;

    let mut order: Vec<usize> = (0..junctions.len()).collect();
    order.sort_by(|&a, &b| {
        row[a]
            .total_cmp(&row[b])
            .then_with(|| (a != i).cmp(&(b != i)))
            .then_with(|| a.cmp(&b))
    });

    let mut neighbors = Vec::with_capacity(MAX_NEIGHBORS);
    for j in order {
        if row[j] > radius_sq || neighbors.len() >= MAX_NEIGHBORS {
            break;
        }

        if !is_scale_incompatible(mscale, junctions[j].mscale()) {
            neighbors.push(j);
        }
    }

    neighbors
}

/// Build the distance matrix and fill the neighbor list of every junction.
///
/// Each list holds at most [`MAX_NEIGHBORS`] indices in ascending distance order and starts
/// with the junction's own index. Equal distances are ordered with the junction itself first,
/// then by ascending index, so a coincident junction never displaces self from the head.
pub fn build_neighbor_graph(junctions: &mut [Junction]) -> DistanceMatrix {
    let distances = DistanceMatrix::from_junctions(junctions);

    let lists: Vec<Vec<usize>> = (0..junctions.len())
        .map(|i| select_neighbors(junctions, &distances, i))
        .collect();

    let mut total = 0;
    for (junction, neighbors) in junctions.iter_mut().zip(lists) {
        total += neighbors.len();
        junction.set_neighbors(neighbors);
    }

    if !junctions.is_empty() {
        log::debug!(
            "neighbor graph: {} junctions, {:.2} neighbors per junction",
            junctions.len(),
            total as f32 / junctions.len() as f32
        );
    }

    distances
}
