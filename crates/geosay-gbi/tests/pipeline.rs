//! End to end tests of the boundary saliency pipeline.
//!
//! A fake detector writes a known detection file next to a temporary image path, so the
//! tests exercise file discovery, parsing, the neighbor graph, accumulation and
//! post-processing without the real detector.

use std::cell::Cell;
use std::path::Path;

use geosay_gbi::detector::asj_path_for;
use geosay_gbi::prob::PROB_TABLE_SIZE;
use geosay_gbi::{
    load_junctions, AngleProbTable, GbiConfig, GbiError, GbiEstimator, JunctionDetector,
};
use geosay_image::{Image, ImageSize};

/// Two right angle corners facing each other plus a far away straight junction.
const DETECTIONS: &str = "3
10 10
2 6 0 -15.5
0.0 0.9 8
1.5707964 0.9 8
30 30
2 6 0 -9
3.1415927 0.9 8
4.712389 0.9 8
60 12
2 6 1 -4
0.0 0.5 12
3.1415927 0.5 12
";

struct FakeDetector {
    calls: Cell<usize>,
}

impl JunctionDetector for FakeDetector {
    fn detect(&self, image_path: &Path) -> Result<(), GbiError> {
        self.calls.set(self.calls.get() + 1);
        let path = asj_path_for(image_path);
        std::fs::write(&path, DETECTIONS).map_err(|e| GbiError::FileError(path, e))
    }
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn write_prob_table(dir: &Path) -> Result<std::path::PathBuf, std::io::Error> {
    // increasing with the angle, as a C initializer
    let values = (0..PROB_TABLE_SIZE)
        .map(|i| format!("{:.4}f", i as f32 / PROB_TABLE_SIZE as f32))
        .collect::<Vec<_>>();
    let path = dir.join("prob.txt");
    std::fs::write(&path, format!("{{{}}};", values.join(", ")))?;
    Ok(path)
}

#[test]
fn gbi_from_detection_file() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();

    let dir = tempfile::tempdir()?;
    let image_path = dir.path().join("scene.png");
    let detector = FakeDetector {
        calls: Cell::new(0),
    };

    let config: GbiConfig = serde_json::from_str(r#"{ "use_black_hat": true }"#)?;
    let table = AngleProbTable::from_file(write_prob_table(dir.path())?)?;
    let estimator = GbiEstimator::new(config, table);

    let mut junctions = load_junctions(&image_path, &detector)?;
    assert_eq!(detector.calls.get(), 1);
    assert_eq!(junctions.len(), 3);

    let size = ImageSize {
        width: 80,
        height: 48,
    };
    let image = Image::<u8, 3>::from_size_val(size, 200)?;
    let gbi = estimator.compute(&image, &mut junctions)?;

    assert_eq!(gbi.size(), size);
    assert!(gbi.as_slice().iter().all(|&v| v >= 0.0));

    // every junction sees itself first and never more than six neighbors
    for (i, j) in junctions.iter().enumerate() {
        assert_eq!(j.neighbors()[0], i);
        assert!(j.neighbors().len() <= 6);
    }

    // inside the wedge of the first corner
    assert!(*gbi.get_pixel(14, 14, 0)? > 0.0);
    // far from every wedge
    assert_eq!(*gbi.get_pixel(5, 45, 0)?, 0.0);

    // a second run reuses the detection file and gives the same map
    let mut again = load_junctions(&image_path, &detector)?;
    assert_eq!(detector.calls.get(), 1);
    assert_eq!(estimator.compute(&image, &mut again)?, gbi);

    Ok(())
}

#[test]
fn empty_detection_file_gives_empty_map() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();

    let dir = tempfile::tempdir()?;
    let image_path = dir.path().join("blank.png");
    std::fs::write(asj_path_for(&image_path), "0\n")?;

    let detector = FakeDetector {
        calls: Cell::new(0),
    };
    let mut junctions = load_junctions(&image_path, &detector)?;
    assert!(junctions.is_empty());
    assert_eq!(detector.calls.get(), 0);

    let estimator = GbiEstimator::new(GbiConfig::default(), AngleProbTable::from_fn(|_| 1.0)?);
    let image = Image::<u8, 1>::from_size_val([12, 9].into(), 17)?;
    let gbi = estimator.compute(&image, &mut junctions)?;
    assert!(gbi.as_slice().iter().all(|&v| v == 0.0));

    Ok(())
}

#[test]
fn malformed_detection_file_aborts() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let detector = FakeDetector {
        calls: Cell::new(0),
    };

    let truncated = dir.path().join("truncated.png");
    std::fs::write(asj_path_for(&truncated), "2\n1 1\n2 1 0 -3\n0 1 2\n1 1 2\n")?;
    assert!(matches!(
        load_junctions(&truncated, &detector),
        Err(GbiError::Parse { .. })
    ));

    let one_branch = dir.path().join("one_branch.png");
    std::fs::write(asj_path_for(&one_branch), "1\n1 1\n1 1 0 -3\n0 1 2\n")?;
    assert!(matches!(
        load_junctions(&one_branch, &detector),
        Err(GbiError::InvalidJunction { index: 0, .. })
    ));

    assert_eq!(detector.calls.get(), 0);
    Ok(())
}
