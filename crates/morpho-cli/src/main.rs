use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use morpho::face::detector::ExternalDetector;
use morpho::image::ImageSize;
use morpho::imgproc::blend::BlendMode;
use morpho::io::png::{write_image_png_rgb8, write_image_png_rgba8};
use morpho::morph::loader::list_image_paths;
use morpho::morph::{
    average_from_paths, morph_folder, morph_from_paths, AverageOptions, DirectorySink, Frame,
    MorphError, MorphOptions,
};

#[derive(Parser)]
#[command(name = "morpho", version, about = "Warp, morph and average face images")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Morph from a source face to a destination face, or through a folder
    Morph(MorphArgs),
    /// Average all faces found in a folder into one composite
    Average(AverageArgs),
}

#[derive(Args)]
struct CommonArgs {
    /// Width of the output canvas
    #[arg(long, default_value_t = 500)]
    width: usize,

    /// Height of the output canvas
    #[arg(long, default_value_t = 600)]
    height: usize,

    /// Path to the external landmark locator binary
    #[arg(long)]
    detector: PathBuf,

    /// Path to the locator's classifier data folder
    #[arg(long)]
    detector_data: PathBuf,

    /// Save with the face mask stacked as a transparent background
    #[arg(long)]
    alpha: bool,
}

#[derive(Args)]
struct MorphArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Filepath to the source image (.jpg, .jpeg, .png)
    #[arg(long, required_unless_present = "images", conflicts_with = "images")]
    src: Option<PathBuf>,

    /// Filepath to the destination image (.jpg, .jpeg, .png)
    #[arg(long, required_unless_present = "images", conflicts_with = "images")]
    dest: Option<PathBuf>,

    /// Folder of images to morph through pairwise
    #[arg(long)]
    images: Option<PathBuf>,

    /// Number of morph frames
    #[arg(long, default_value_t = 20)]
    num_frames: usize,

    /// Frames per second handed to the video sink
    #[arg(long, default_value_t = 10)]
    fps: u32,

    /// Folder to save all image frames into
    #[arg(long, default_value = "frames")]
    out_frames: PathBuf,
}

#[derive(Args)]
struct AverageArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Folder of images to average (.jpg, .jpeg, .png)
    #[arg(long)]
    images: PathBuf,

    /// Blur the mask edges of the averaged face
    #[arg(long)]
    blur: bool,

    /// Sharpen and seamlessly composite the average onto the first image
    #[arg(long)]
    blend: bool,

    /// Filename for the averaged face
    #[arg(long, default_value = "result.png")]
    out: PathBuf,
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Morph(args) => run_morph(args),
        Command::Average(args) => run_average(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_morph(args: MorphArgs) -> Result<(), MorphError> {
    let opts = MorphOptions {
        size: ImageSize {
            width: args.common.width,
            height: args.common.height,
        },
        num_frames: args.num_frames,
        fps: args.fps,
        alpha: args.common.alpha,
        ..Default::default()
    };

    let detector = ExternalDetector::new(&args.common.detector, &args.common.detector_data);
    let mut sink = DirectorySink::new(&args.out_frames)?;

    let written = match (&args.images, &args.src, &args.dest) {
        (Some(folder), _, _) => {
            if !folder.is_dir() {
                invalid_argument(format!("--images={} is not a valid directory", folder.display()));
            }
            morph_folder(&detector, folder, &opts, &mut sink)?
        }
        (None, Some(src), Some(dest)) => {
            if !src.is_file() || !dest.is_file() {
                invalid_argument(format!(
                    "--src={} or --dest={} are not valid images",
                    src.display(),
                    dest.display()
                ));
            }
            morph_from_paths(&detector, src, dest, &opts, &mut sink)?
        }
        // clap enforces the presence rules above
        _ => unreachable!(),
    };

    log::info!(
        "wrote {written} frames to {}",
        args.out_frames.display()
    );
    Ok(())
}

fn run_average(args: AverageArgs) -> Result<(), MorphError> {
    if !args.images.is_dir() {
        invalid_argument(format!(
            "--images={} is not a valid directory",
            args.images.display()
        ));
    }

    let opts = AverageOptions {
        size: ImageSize {
            width: args.common.width,
            height: args.common.height,
        },
        alpha: args.common.alpha,
        blur_edges: args.blur,
        composite: args.blend.then_some(BlendMode::Seamless),
        ..Default::default()
    };

    let detector = ExternalDetector::new(&args.common.detector, &args.common.detector_data);
    let paths = list_image_paths(&args.images)?;
    let (frame, report) = average_from_paths(&detector, &paths, &opts)?;

    match &frame {
        Frame::Rgb(img) => write_image_png_rgb8(&args.out, img)?,
        Frame::Rgba(img) => write_image_png_rgba8(&args.out, img)?,
    }

    println!(
        "Processed {} faces ({} skipped), saved {}",
        report.processed,
        report.skipped,
        args.out.display()
    );
    Ok(())
}

fn invalid_argument(message: String) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}
