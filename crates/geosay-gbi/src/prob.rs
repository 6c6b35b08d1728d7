use std::f32::consts::PI;
use std::path::Path;

use crate::error::GbiError;

/// Number of angle buckets covering `[0, π]`.
pub const PROB_TABLE_SIZE: usize = 1000;

/// Probability of a junction angle being a good boundary, indexed by quantized angle.
///
/// The table is loaded once and shared by reference with the accumulator.
#[derive(Debug, Clone, PartialEq)]
pub struct AngleProbTable {
    values: Vec<f32>,
}

impl AngleProbTable {
    /// Create a table from exactly [`PROB_TABLE_SIZE`] finite values.
    ///
    /// # Errors
    ///
    /// Returns [`GbiError::ProbTable`] if the length is wrong or a value is not finite.
    pub fn new(values: Vec<f32>) -> Result<Self, GbiError> {
        if values.len() != PROB_TABLE_SIZE {
            return Err(GbiError::ProbTable(format!(
                "expected {PROB_TABLE_SIZE} entries, found {}",
                values.len()
            )));
        }

        if let Some(bucket) = values.iter().position(|v| !v.is_finite()) {
            return Err(GbiError::ProbTable(format!(
                "entry {bucket} is not a finite number"
            )));
        }

        Ok(Self { values })
    }

    /// Create a table by evaluating `f` on every bucket index.
    pub fn from_fn(f: impl FnMut(usize) -> f32) -> Result<Self, GbiError> {
        Self::new((0..PROB_TABLE_SIZE).map(f).collect())
    }

    /// Parse a table from text.
    ///
    /// Values may be separated by whitespace, commas or semicolons; curly braces are ignored so
    /// a C array initializer can be pasted as is.
    pub fn parse(text: &str) -> Result<Self, GbiError> {
        let values = text
            .split(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | '{' | '}'))
            .filter(|tok| !tok.is_empty())
            .enumerate()
            .map(|(i, tok)| {
                tok.trim_end_matches(['f', 'F']).parse::<f32>().map_err(|_| {
                    GbiError::ProbTable(format!("entry {i}: {tok:?} is not a number"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(values)
    }

    /// Load a table from a text file, see [`AngleProbTable::parse`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, GbiError> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|e| GbiError::FileError(path.to_path_buf(), e))?;
        let table = Self::parse(&text)?;
        log::debug!("loaded angle probability table from {}", path.display());
        Ok(table)
    }

    /// Bucket of an angle in `[0, π]`: `floor(theta / π * 1000)` clamped into the table.
    ///
    /// NaN and negative angles map to bucket 0.
    ///
    /// # Example
    ///
    /// ```
    /// use geosay_gbi::prob::AngleProbTable;
    ///
    /// assert_eq!(AngleProbTable::bucket(0.0), 0);
    /// assert_eq!(AngleProbTable::bucket(std::f32::consts::FRAC_PI_2), 500);
    /// assert_eq!(AngleProbTable::bucket(std::f32::consts::PI), 999);
    /// ```
    #[inline]
    pub fn bucket(theta: f32) -> usize {
        let b = (theta / PI * PROB_TABLE_SIZE as f32).floor();
        if b.is_nan() || b <= 0.0 {
            0
        } else {
            (b as usize).min(PROB_TABLE_SIZE - 1)
        }
    }

    /// Probability for the bucket of `theta`.
    #[inline]
    pub fn probability(&self, theta: f32) -> f32 {
        self.values[Self::bucket(theta)]
    }

    /// The raw table.
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_clamped() {
        assert_eq!(AngleProbTable::bucket(-0.5), 0);
        assert_eq!(AngleProbTable::bucket(f32::NAN), 0);
        assert_eq!(AngleProbTable::bucket(PI * 0.25), 250);
        assert_eq!(AngleProbTable::bucket(PI), PROB_TABLE_SIZE - 1);
        assert_eq!(AngleProbTable::bucket(10.0), PROB_TABLE_SIZE - 1);
        assert_eq!(AngleProbTable::bucket(f32::INFINITY), PROB_TABLE_SIZE - 1);
    }

    #[test]
    fn lookup() -> Result<(), GbiError> {
        let table = AngleProbTable::from_fn(|i| i as f32 / 1000.0)?;
        assert_eq!(table.as_slice().len(), PROB_TABLE_SIZE);
        assert_eq!(table.probability(0.0), 0.0);
        assert_eq!(table.probability(PI), 0.999);
        Ok(())
    }

    #[test]
    fn wrong_length() {
        assert!(matches!(
            AngleProbTable::new(vec![0.5; 999]),
            Err(GbiError::ProbTable(_))
        ));
        let mut values = vec![0.5; PROB_TABLE_SIZE];
        values[7] = f32::NAN;
        assert!(matches!(
            AngleProbTable::new(values),
            Err(GbiError::ProbTable(_))
        ));
    }

    #[test]
    fn parse_c_array() -> Result<(), GbiError> {
        let body = (0..PROB_TABLE_SIZE)
            .map(|i| if i == 3 { "0.25f".to_string() } else { "0.5".to_string() })
            .collect::<Vec<_>>()
            .join(",\n");
        let table = AngleProbTable::parse(&format!("{{ {body} }};"))?;
        assert_eq!(table.as_slice()[3], 0.25);
        assert_eq!(table.as_slice()[999], 0.5);

        assert!(AngleProbTable::parse("0.5 0.5 oops").is_err());
        Ok(())
    }

    #[test]
    fn load_from_file() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("prob.txt");
        std::fs::write(&path, vec!["0.125"; PROB_TABLE_SIZE].join(" "))?;

        let table = AngleProbTable::from_file(&path)?;
        assert_eq!(table.probability(1.0), 0.125);

        assert!(matches!(
            AngleProbTable::from_file(dir.path().join("missing.txt")),
            Err(GbiError::FileError(..))
        ));
        Ok(())
    }
}
