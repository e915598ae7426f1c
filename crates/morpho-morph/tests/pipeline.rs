use std::path::{Path, PathBuf};

use morpho_face::{FaceError, Landmarks, LandmarkDetector};
use morpho_image::{Image, ImageSize};
use morpho_io::png::write_image_png_rgb8;
use morpho_morph::{
    average_from_paths, morph, morph_from_paths, AverageOptions, BatchReport, Frame, MemorySink,
    MorphError, MorphOptions,
};

/// A detector that reports a fixed landmark ring for files named `face_*`
/// and no face for everything else.
struct StubDetector;

impl LandmarkDetector for StubDetector {
    fn detect(&self, image_path: &Path) -> Result<Option<Landmarks>, FaceError> {
        let name = image_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if name.starts_with("face_") {
            Ok(Some(stub_landmarks(30.0, 30.0, 40.0)))
        } else {
            Ok(None)
        }
    }
}

/// A ring of points around (cx, cy), mimicking a detector's face outline.
fn stub_landmarks(cx: f32, cy: f32, radius: f32) -> Landmarks {
    let points = (0..16)
        .map(|i| {
            let angle = i as f32 * std::f32::consts::TAU / 16.0;
            [cx + radius * angle.cos(), cy + radius * 0.8 * angle.sin()]
        })
        .collect();
    Landmarks::new(points)
}

/// A 68-point landmark set shaped like a detector result: a jaw ring plus
/// interior feature points, offset by `shift` on the x axis.
fn canonical_landmarks(shift: f32) -> Landmarks {
    let (cx, cy) = (250.0 + shift, 300.0);
    let mut points = Vec::with_capacity(68);

    // jaw / outline ring
    for i in 0..28 {
        let angle = i as f32 * std::f32::consts::TAU / 28.0;
        points.push([cx + 140.0 * angle.cos(), cy + 170.0 * angle.sin()]);
    }
    // interior feature grid
    for row in 0..8 {
        for col in 0..5 {
            points.push([
                cx - 80.0 + col as f32 * 40.0,
                cy - 105.0 + row as f32 * 30.0,
            ]);
        }
    }

    assert_eq!(points.len(), 68);
    Landmarks::new(points)
}

fn flat_image(size: ImageSize, val: f32) -> Image<f32, 3> {
    Image::from_size_val(size, val).unwrap()
}

fn write_test_png(path: &PathBuf) {
    let size = ImageSize {
        width: 100,
        height: 100,
    };
    let img = Image::<u8, 3>::from_size_val(size, 90).unwrap();
    write_image_png_rgb8(path, &img).unwrap();
}

#[test]
fn morph_produces_twenty_ordered_frames_at_canonical_size() -> Result<(), MorphError> {
    let opts = MorphOptions::default();
    assert_eq!(opts.size.width, 500);
    assert_eq!(opts.size.height, 600);
    assert_eq!(opts.num_frames, 20);

    let src = flat_image(opts.size, 220.0);
    let dest = flat_image(opts.size, 30.0);

    let mut sink = MemorySink::new();
    let written = morph(
        &src,
        &canonical_landmarks(0.0),
        &dest,
        &canonical_landmarks(30.0),
        &opts,
        &mut sink,
    )?;

    assert_eq!(written, 20);
    assert_eq!(sink.frames.len(), 20);

    // the first frame is dominated by the source, the last by the destination
    let Frame::Rgb(first) = &sink.frames[0] else {
        panic!("expected rgb frame")
    };
    let Frame::Rgb(last) = sink.frames.last().unwrap() else {
        panic!("expected rgb frame")
    };
    assert!(first.as_slice().iter().all(|&v| v == 220));
    assert!(last.as_slice().iter().all(|&v| v == 30));

    // an early interpolated frame leans to the source level inside the face
    let Frame::Rgb(early) = &sink.frames[1] else {
        panic!("expected rgb frame")
    };
    let center = *early.get([300, 250, 0]).unwrap();
    assert!(center > 180, "early frame center {center}");

    // a late interpolated frame leans to the destination level
    let Frame::Rgb(late) = &sink.frames[18] else {
        panic!("expected rgb frame")
    };
    let center = *late.get([300, 250, 0]).unwrap();
    assert!(center < 80, "late frame center {center}");

    Ok(())
}

#[test]
fn averaging_skips_faceless_images_and_reports_the_tally() -> Result<(), MorphError> {
    let tmp_dir = tempfile::tempdir().map_err(morpho_io::IoError::FileError)?;

    let mut paths = Vec::new();
    for i in 0..5 {
        let path = tmp_dir.path().join(format!("face_{i}.png"));
        write_test_png(&path);
        paths.push(path);
    }
    for i in 0..2 {
        let path = tmp_dir.path().join(format!("blank_{i}.png"));
        write_test_png(&path);
        paths.push(path);
    }

    let opts = AverageOptions {
        size: ImageSize {
            width: 120,
            height: 120,
        },
        ..Default::default()
    };

    let (frame, report) = average_from_paths(&StubDetector, &paths, &opts)?;

    assert_eq!(
        report,
        BatchReport {
            processed: 5,
            skipped: 2
        }
    );
    assert_eq!(frame.size(), opts.size);

    Ok(())
}

#[test]
fn averaging_nothing_usable_is_fatal() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = tmp_dir.path().join("blank_0.png");
    write_test_png(&path);

    let opts = AverageOptions {
        size: ImageSize {
            width: 120,
            height: 120,
        },
        ..Default::default()
    };

    let res = average_from_paths(&StubDetector, &[path], &opts);
    assert!(matches!(res, Err(MorphError::NoValidImages)));
}

#[test]
fn morph_aborts_when_an_endpoint_has_no_face() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let src = tmp_dir.path().join("face_src.png");
    let dest = tmp_dir.path().join("blank_dest.png");
    write_test_png(&src);
    write_test_png(&dest);

    let opts = MorphOptions {
        size: ImageSize {
            width: 120,
            height: 120,
        },
        ..Default::default()
    };

    let mut sink = MemorySink::new();
    let res = morph_from_paths(&StubDetector, &src, &dest, &opts, &mut sink);
    assert!(matches!(res, Err(MorphError::NoFaceDetected(p)) if p == dest));
}
