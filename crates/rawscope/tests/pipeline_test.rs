//! File-backed pipeline tests: zip entries, inspection output and explorer frames.

use std::io::Write as _;
use std::path::Path;

use rawscope::inspect::{EQUALIZED_FILE, HISTOGRAM_FILE, MID_SLICE_FILE, STRETCHED_FILE};
use rawscope::*;
use zip::write::SimpleFileOptions;

const ENTRY: &str = "head256x256x109";

/// A 9x16x16 ramp along x, as `uint8`.
fn small_bytes() -> Vec<u8> {
    (0..9 * 16 * 16).map(|i| ((i % 16) * 16) as u8).collect()
}

fn small_options(dir: &Path) -> Options {
    Options {
        dims: VoxelGridSpec::new(9, 16, 16).unwrap(),
        output_dir: dir.join("out"),
        scale: 1,
        ..Options::default()
    }
}

fn write_zip(path: &Path, entry: &str, bytes: &[u8]) {
    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    zip.start_file(entry, options).unwrap();
    zip.write_all(bytes).unwrap();
    zip.finish().unwrap();
}

#[test]
fn test_load_from_zip_entry() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("head.zip");
    write_zip(&archive, ENTRY, &small_bytes());

    let options = Options {
        input: archive.clone(),
        archive_entry: Some(ENTRY.to_string()),
        ..small_options(dir.path())
    };
    let loaded = load_volume(&options).unwrap();
    assert_eq!(loaded.volume.shape(), vec![9, 16, 16]);
    assert_eq!(loaded.volume.get(0, 0, 3, 0), 48.0);

    let missing = Options {
        archive_entry: Some("other".to_string()),
        ..options
    };
    let err = load_volume(&missing).unwrap_err();
    assert!(matches!(err, RawscopeError::EntryNotFound { ref entry, .. } if entry == "other"));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let options = Options {
        input: dir.path().join("nope.raw"),
        ..small_options(dir.path())
    };
    assert!(matches!(load_volume(&options), Err(RawscopeError::Io(_))));
}

#[test]
fn test_inspection_writes_views() {
    let dir = tempfile::tempdir().unwrap();

    // Big-endian int16 CT-like values
    let values: Vec<i16> = (0..9 * 16 * 16).map(|i| (i % 4096) as i16 - 1024).collect();
    let data = VoxelData::Int16(values);
    let input = dir.path().join("head.raw");
    std::fs::write(&input, data.to_bytes(ByteOrder::Big)).unwrap();

    let options = Options {
        input,
        byte_order: ByteOrder::Big,
        encoding_hint: EncodingHint::ExpectedRange {
            min: -1024.0,
            max: 3071.0,
        },
        ..small_options(dir.path())
    };
    let report = run_inspection(&options).unwrap();

    assert_eq!(report.encoding.element_type, ElementType::Int16);
    assert_eq!(report.stats.min, -1024.0);
    assert_eq!(report.stats.max, 1279.0);
    assert!(report.display_range.is_some());

    let out = &options.output_dir;
    for name in [MID_SLICE_FILE, HISTOGRAM_FILE, STRETCHED_FILE] {
        assert!(out.join(name).exists(), "{name} missing");
    }
    assert_eq!(out.join(EQUALIZED_FILE).exists(), equalize::available());
}

#[test]
fn test_inspection_rejects_size_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("head.raw");
    std::fs::write(&input, vec![0_u8; 9 * 16 * 16 + 1]).unwrap();

    let options = Options {
        input,
        ..small_options(dir.path())
    };
    let err = run_inspection(&options).unwrap_err();
    assert!(matches!(err, RawscopeError::UnsupportedEncoding { .. }));
    assert!(!options.output_dir.exists());
}

#[test]
fn test_explorer_session_writes_frames() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("head.raw");
    std::fs::write(&input, small_bytes()).unwrap();

    let options = Options {
        input,
        initial_slice: Some(2),
        keep_frames: true,
        ..small_options(dir.path())
    };
    let commands = "slice 150\nlevel 0.5\nfoo\nquit\n";
    let mut output = Vec::new();
    let summary = run_explorer(&options, commands.as_bytes(), &mut output).unwrap();

    assert_eq!(summary.final_state.slice_index, 8);
    assert_eq!(summary.final_state.threshold, 0.5);
    assert_eq!(summary.redraws, 3);
    assert_eq!(summary.rejected, 1);

    let out = &options.output_dir;
    assert!(out.join(CURRENT_FRAME).exists());
    assert!(out.join("frame_0002.png").exists());
    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("Slice 2: Iso-Contour @ 0.200"));
    assert!(text.contains("Slice 8: Iso-Contour @ 0.500"));
}
