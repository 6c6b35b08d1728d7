//! Reader for the plain text detection files (`.asj`) written by the junction detector.
//!
//! The file is a stream of whitespace separated tokens:
//!
//! ```text
//! n
//! x y                                      (repeated n times)
//! junctionClass scale reducedDetection logNFA
//! angle strength scale                     (repeated junctionClass times)
//! ```

use std::path::Path;

use crate::error::GbiError;
use crate::geometry::Point2;

/// One branch as written by the detector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AsjBranch {
    /// Direction of the branch in radians.
    pub angle: f32,
    /// Branch strength. Not used by the saliency computation.
    pub strength: f32,
    /// Length of the branch in pixels.
    pub scale: f32,
}

/// One junction detection as written by the detector.
#[derive(Debug, Clone, PartialEq)]
pub struct AsjRecord {
    /// Location of the junction.
    pub location: Point2,
    /// Number of branches announced in the header of the record.
    pub junction_class: usize,
    /// Detection scale. Not used by the saliency computation.
    pub scale: f32,
    /// Whether the detector ran on a reduced image.
    pub reduced_detection: bool,
    /// Log of the number of false alarms.
    pub log_nfa: f64,
    /// The `junction_class` branches, in file order.
    pub branches: Vec<AsjBranch>,
}

struct Tokens<'a> {
    inner: std::iter::Peekable<Box<dyn Iterator<Item = (usize, &'a str)> + 'a>>,
    last_line: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        let iter: Box<dyn Iterator<Item = (usize, &'a str)> + 'a> = Box::new(
            text.lines()
                .enumerate()
                .flat_map(|(i, line)| line.split_whitespace().map(move |tok| (i + 1, tok))),
        );
        Self {
            inner: iter.peekable(),
            last_line: 1,
        }
    }

    fn next(&mut self, what: &str) -> Result<(usize, &'a str), GbiError> {
        match self.inner.next() {
            Some((line, tok)) => {
                self.last_line = line;
                Ok((line, tok))
            }
            None => Err(GbiError::Parse {
                line: self.last_line,
                message: format!("unexpected end of file while reading {what}"),
            }),
        }
    }

    fn next_usize(&mut self, what: &str) -> Result<usize, GbiError> {
        let (line, tok) = self.next(what)?;
        tok.parse::<usize>().map_err(|_| GbiError::Parse {
            line,
            message: format!("expected a non-negative integer for {what}, found {tok:?}"),
        })
    }

    fn next_f64(&mut self, what: &str) -> Result<f64, GbiError> {
        let (line, tok) = self.next(what)?;
        match tok.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(GbiError::Parse {
                line,
                message: format!("expected a finite number for {what}, found {tok:?}"),
            }),
        }
    }

    fn next_f32(&mut self, what: &str) -> Result<f32, GbiError> {
        let (line, tok) = self.next(what)?;
        match tok.parse::<f32>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(GbiError::Parse {
                line,
                message: format!("expected a finite number for {what}, found {tok:?}"),
            }),
        }
    }

    fn peek_line(&mut self) -> Option<usize> {
        self.inner.peek().map(|(line, _)| *line)
    }
}

fn parse_record(tokens: &mut Tokens) -> Result<AsjRecord, GbiError> {
    let x = tokens.next_f32("location x")?;
    let y = tokens.next_f32("location y")?;
    let junction_class = tokens.next_usize("junction class")?;
    let scale = tokens.next_f32("junction scale")?;
    let reduced_detection = tokens.next_f64("reduced detection flag")? != 0.0;
    let log_nfa = tokens.next_f64("logNFA")?;

    let mut branches = Vec::with_capacity(junction_class.min(16));
    for _ in 0..junction_class {
        let angle = tokens.next_f32("branch angle")?;
        let strength = tokens.next_f32("branch strength")?;
        let scale = tokens.next_f32("branch scale")?;
        branches.push(AsjBranch {
            angle,
            strength,
            scale,
        });
    }

    Ok(AsjRecord {
        location: Point2::new(x, y),
        junction_class,
        scale,
        reduced_detection,
        log_nfa,
        branches,
    })
}

/// Parse the content of a detection file.
///
/// Tokens left over after the announced number of records are ignored.
///
/// # Errors
///
/// Returns [`GbiError::Parse`] if the file is truncated or a token is not a valid number.
///
/// # Example
///
/// ```
/// use geosay_gbi::asj::parse_asj;
///
/// let text = "1\n10 20\n2 5 0 -3.5\n0.0 1.0 4\n1.57 1.0 6\n";
/// let records = parse_asj(text).unwrap();
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].branches.len(), 2);
/// assert_eq!(records[0].log_nfa, -3.5);
/// ```
pub fn parse_asj(text: &str) -> Result<Vec<AsjRecord>, GbiError> {
    let mut tokens = Tokens::new(text);

    let n = tokens.next_usize("junction count")?;
    let mut records = Vec::with_capacity(n.min(1 << 16));
    for _ in 0..n {
        records.push(parse_record(&mut tokens)?);
    }

    if let Some(line) = tokens.peek_line() {
        log::warn!("ignoring trailing data in detection file from line {line}");
    }

    log::debug!("parsed {} junction records", records.len());

    Ok(records)
}

/// Read and parse a detection file from disk.
pub fn read_asj(path: impl AsRef<Path>) -> Result<Vec<AsjRecord>, GbiError> {
    let path = path.as_ref();
    let text =
        std::fs::read_to_string(path).map_err(|e| GbiError::FileError(path.to_path_buf(), e))?;
    parse_asj(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_JUNCTIONS: &str = "2
12.5 30.25
3 8 0 -12.75
0.0 0.9 10
2.094 0.8 12
4.188 0.7 11
40 41
2 4 1 -2
1.0 0.5 5
2.5 0.5 7
";

    #[test]
    fn parse_two_records() -> Result<(), GbiError> {
        let records = parse_asj(TWO_JUNCTIONS)?;
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.location, Point2::new(12.5, 30.25));
        assert_eq!(first.junction_class, 3);
        assert_eq!(first.scale, 8.0);
        assert!(!first.reduced_detection);
        assert_eq!(first.log_nfa, -12.75);
        assert_eq!(first.branches.len(), 3);
        assert_eq!(
            first.branches[1],
            AsjBranch {
                angle: 2.094,
                strength: 0.8,
                scale: 12.0
            }
        );

        let second = &records[1];
        assert!(second.reduced_detection);
        assert_eq!(second.branches.len(), 2);
        assert_eq!(second.branches[1].scale, 7.0);

        Ok(())
    }

    #[test]
    fn parse_empty_file() -> Result<(), GbiError> {
        assert!(parse_asj("0\n")?.is_empty());
        assert!(matches!(parse_asj(""), Err(GbiError::Parse { line: 1, .. })));
        Ok(())
    }

    #[test]
    fn parse_truncated_record() {
        let text = "1\n10 20\n2 5 0 -3.5\n0.0 1.0 4\n";
        match parse_asj(text) {
            Err(GbiError::Parse { line, message }) => {
                assert_eq!(line, 4);
                assert!(message.contains("branch angle"), "{message}");
            }
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn parse_bad_tokens() {
        assert!(matches!(
            parse_asj("1\n10 abc\n"),
            Err(GbiError::Parse { line: 2, .. })
        ));
        assert!(matches!(
            parse_asj("-1\n"),
            Err(GbiError::Parse { line: 1, .. })
        ));
        assert!(matches!(
            parse_asj("1\n1 1\n2.5 1 0 -1\n"),
            Err(GbiError::Parse { line: 3, .. })
        ));
        assert!(matches!(
            parse_asj("1\n1 1\n2 1 0 nan\n"),
            Err(GbiError::Parse { line: 3, .. })
        ));
    }

    #[test]
    fn parse_ignores_trailing_tokens() -> Result<(), GbiError> {
        let text = "1\n10 20\n2 5 0 -3.5\n0.0 1.0 4\n1.0 1.0 4\nextra stuff";
        assert_eq!(parse_asj(text)?.len(), 1);
        Ok(())
    }

    #[test]
    fn read_from_disk() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("image.png.asj");
        std::fs::write(&path, TWO_JUNCTIONS)?;

        assert_eq!(read_asj(&path)?.len(), 2);
        assert!(matches!(
            read_asj(dir.path().join("missing.asj")),
            Err(GbiError::FileError(..))
        ));
        Ok(())
    }
}
