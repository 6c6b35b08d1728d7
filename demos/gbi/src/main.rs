use argh::FromArgs;
use std::path::PathBuf;

use geosay::{
    gbi::{load_junctions, AngleProbTable, GbiConfig, GbiEstimator, ProcessDetector},
    image::{ops, Image},
    io::functional::{self as F, GenericImage},
};

#[derive(FromArgs)]
/// Compute the Good Boundary Indicator map of an image from its junctions
struct Args {
    /// path to an input image
    #[argh(option, short = 'i')]
    image_path: PathBuf,

    /// path to the angle probability table
    #[argh(option, short = 'p')]
    prob_table: PathBuf,

    /// path to the junction detector executable, run when `<image>.asj` is missing
    #[argh(option, short = 'd')]
    detector_path: Option<PathBuf>,

    /// path to a json configuration file
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// path to the output png (default: gbi.png)
    #[argh(option, short = 'o', default = "PathBuf::from(\"gbi.png\")")]
    output: PathBuf,

    /// disable the black-hat suppression
    #[argh(switch)]
    no_black_hat: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Args = argh::from_env();

    let mut config = match &args.config {
        Some(path) => serde_json::from_str::<GbiConfig>(&std::fs::read_to_string(path)?)?,
        None => GbiConfig::default(),
    };
    if let Some(detector_path) = args.detector_path {
        config.detector_path = detector_path;
    }
    if args.no_black_hat {
        config.use_black_hat = false;
    }

    let detector = ProcessDetector::new(config.detector_path.clone(), config.detector_timeout());
    let prob_table = AngleProbTable::from_file(&args.prob_table)?;
    let estimator = GbiEstimator::new(config, prob_table);

    // read the image
    let image = F::read_image_any(&args.image_path)?;
    log::info!(
        "read {} ({} channels) from {}",
        image.size(),
        image.num_channels(),
        args.image_path.display()
    );

    let mut junctions = load_junctions(&args.image_path, &detector)?;

    let gbi = match &image {
        GenericImage::L8(img) => estimator.compute(img, &mut junctions)?,
        GenericImage::Rgb8(img) => estimator.compute(img, &mut junctions)?,
    };

    // write the map as 8 bits
    let mut gbi_u8 = Image::<u8, 1>::from_size_val(gbi.size(), 0)?;
    ops::saturate_to_u8(&gbi, &mut gbi_u8)?;
    F::write_image_png_mono8(&args.output, &gbi_u8)?;

    log::info!("wrote {}", args.output.display());

    Ok(())
}
