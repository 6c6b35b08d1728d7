use crate::asj::AsjRecord;
use crate::error::{GbiError, JunctionDefect};
use crate::geometry::{circular_difference, Point2};

/// One arm of a junction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Branch {
    angle: f32,
    scale: f32,
    endpoint: Point2,
}

impl Branch {
    /// Create a branch leaving `location` along `angle` for `scale` pixels.
    pub fn new(location: Point2, angle: f32, scale: f32) -> Self {
        Self {
            angle,
            scale,
            endpoint: location.offset_polar(angle, scale),
        }
    }

    /// Direction of the branch in radians.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Length of the branch.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// `location + scale * (cos(angle), sin(angle))`.
    pub fn endpoint(&self) -> Point2 {
        self.endpoint
    }
}

/// A detected point where two or more branches meet.
///
/// Everything but the neighbor list is fixed at construction. The neighbor list is filled
/// once by [`crate::neighbors::build_neighbor_graph`]; when non-empty its first entry is the
/// junction's own index.
#[derive(Debug, Clone, PartialEq)]
pub struct Junction {
    location: Point2,
    log_nfa: f64,
    branches: Vec<Branch>,
    mscale: f32,
    theta: f32,
    center: Point2,
    neighbors: Vec<usize>,
}

impl Junction {
    /// Build a junction from its location, significance and `(angle, scale)` branches.
    ///
    /// # Errors
    ///
    /// Fails if there are fewer than two branches or a branch length is not strictly positive.
    ///
    /// # Example
    ///
    /// ```
    /// use geosay_gbi::geometry::Point2;
    /// use geosay_gbi::junction::Junction;
    ///
    /// let j = Junction::new(Point2::new(0.0, 0.0), -4.0, &[(0.0, 4.0), (1.0, 2.0)]).unwrap();
    /// assert_eq!(j.mscale(), 2.0);
    /// assert_eq!(j.theta(), 1.0);
    /// ```
    pub fn new(
        location: Point2,
        log_nfa: f64,
        branches: &[(f32, f32)],
    ) -> Result<Self, JunctionDefect> {
        if branches.len() < 2 {
            return Err(JunctionDefect::TooFewBranches(branches.len()));
        }

        if let Some((branch, &(_, scale))) = branches
            .iter()
            .enumerate()
            .find(|(_, (_, scale))| !(*scale > 0.0 && scale.is_finite()))
        {
            return Err(JunctionDefect::NonPositiveScale { branch, scale });
        }

        let branches: Vec<Branch> = branches
            .iter()
            .map(|&(angle, scale)| Branch::new(location, angle, scale))
            .collect();

        let mscale = branches
            .iter()
            .map(Branch::scale)
            .fold(f32::INFINITY, f32::min);

        let theta = circular_difference(branches[0].angle(), branches[1].angle());

        let sum = branches
            .iter()
            .fold(Point2::default(), |acc, b| acc + b.endpoint());
        let center = sum / branches.len() as f32;

        Ok(Self {
            location,
            log_nfa,
            branches,
            mscale,
            theta,
            center,
            neighbors: Vec::new(),
        })
    }

    /// Build a junction from a detection record.
    pub fn from_record(record: &AsjRecord) -> Result<Self, JunctionDefect> {
        let branches: Vec<(f32, f32)> = record
            .branches
            .iter()
            .map(|b| (b.angle, b.scale))
            .collect();
        Self::new(record.location, record.log_nfa, &branches)
    }

    /// Location of the junction.
    pub fn location(&self) -> Point2 {
        self.location
    }

    /// Number of branches.
    pub fn junction_class(&self) -> usize {
        self.branches.len()
    }

    /// Log of the number of false alarms; more negative is more significant.
    pub fn log_nfa(&self) -> f64 {
        self.log_nfa
    }

    /// The branches in detector order.
    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    /// Minimum branch length.
    pub fn mscale(&self) -> f32 {
        self.mscale
    }

    /// Circular difference between the angles of branch 0 and branch 1, in `[0, π]`.
    pub fn theta(&self) -> f32 {
        self.theta
    }

    /// Centroid of the branch endpoints.
    pub fn center(&self) -> Point2 {
        self.center
    }

    /// Neighbor indices in ascending distance order, self first.
    pub fn neighbors(&self) -> &[usize] {
        &self.neighbors
    }

    /// Neighbor indices without the leading self reference.
    pub fn diffusion_neighbors(&self) -> &[usize] {
        self.neighbors.get(1..).unwrap_or(&[])
    }

    pub(crate) fn set_neighbors(&mut self, neighbors: Vec<usize>) {
        self.neighbors = neighbors;
    }
}

/// Turn parsed detection records into junctions.
///
/// # Errors
///
/// Returns [`GbiError::InvalidJunction`] for the first record that cannot form a valid
/// junction; no partial list is returned.
pub fn build_junctions(records: &[AsjRecord]) -> Result<Vec<Junction>, GbiError> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            Junction::from_record(record)
                .map_err(|defect| GbiError::InvalidJunction { index, defect })
        })
        .collect()
}
