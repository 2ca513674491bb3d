use std::sync::Mutex;

use image::{Rgba, RgbaImage};

use super::*;
use crate::compose::raster::decode_png;

#[derive(Default)]
struct RecordingSink {
    fail: bool,
    calls: Mutex<Vec<(PathBuf, FillMode)>>,
}

impl WallpaperSink for RecordingSink {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn apply(&self, path: &Path, mode: FillMode) -> EarthwallResult<()> {
        assert!(path.exists(), "sink called before the file was written");
        self.calls.lock().unwrap().push((path.to_path_buf(), mode));
        if self.fail {
            return Err(EarthwallError::sink("gsettings exited with 1"));
        }
        Ok(())
    }
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("earthwall_publish_{name}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn image(color: [u8; 4]) -> FinalImage {
    FinalImage::from_image(RgbaImage::from_pixel(12, 12, Rgba(color)))
}

#[test]
fn publish_writes_file_then_applies_sink() {
    let dir = scratch_dir("ok");
    let dest = dir.join("wall.png");
    let sink = Arc::new(RecordingSink::default());
    let publisher = Publisher::new(sink.clone(), FillMode::Stretch);

    let report = publisher.publish(&image([1, 2, 3, 255]), &dest).unwrap();
    assert!(report.sink_applied);
    assert_eq!(report.path, dest);
    assert_eq!(report.bytes as u64, fs::metadata(&dest).unwrap().len());
    assert_eq!(
        *sink.calls.lock().unwrap(),
        vec![(dest.clone(), FillMode::Stretch)]
    );

    let back = decode_png(&fs::read(&dest).unwrap()).unwrap();
    assert_eq!(&back, image([1, 2, 3, 255]).as_image());
}

#[test]
fn publish_overwrites_previous_file_without_leftovers() {
    let dir = scratch_dir("overwrite");
    let dest = dir.join("wall.png");
    let publisher = Publisher::new(Arc::new(RecordingSink::default()), FillMode::Fit);

    publisher.publish(&image([255, 0, 0, 255]), &dest).unwrap();
    publisher.publish(&image([0, 255, 0, 255]), &dest).unwrap();

    let back = decode_png(&fs::read(&dest).unwrap()).unwrap();
    assert_eq!(back.get_pixel(0, 0), &Rgba([0, 255, 0, 255]));
    let entries: Vec<_> = fs::read_dir(&dir).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn sink_failure_is_reported_not_raised() {
    let dir = scratch_dir("sink_fail");
    let dest = dir.join("wall.png");
    let sink = Arc::new(RecordingSink {
        fail: true,
        ..RecordingSink::default()
    });
    let report = Publisher::new(sink.clone(), FillMode::Fit)
        .publish(&image([9, 9, 9, 255]), &dest)
        .unwrap();
    assert!(!report.sink_applied);
    assert!(dest.exists());
    assert_eq!(sink.calls.lock().unwrap().len(), 1);
}

#[test]
fn write_failure_skips_sink_and_keeps_old_file() {
    let dir = scratch_dir("write_fail");
    let dest = dir.join("wall.png");
    let sink = Arc::new(RecordingSink::default());
    let publisher = Publisher::new(sink.clone(), FillMode::Fit);
    publisher.publish(&image([200, 10, 10, 255]), &dest).unwrap();

    // A directory squatting on the temp-file name makes the next write fail before the rename.
    let tmp = dir.join(format!(".wall.png.{}.tmp", std::process::id()));
    fs::create_dir_all(tmp.join("occupied")).unwrap();

    let err = publisher
        .publish(&image([10, 200, 10, 255]), &dest)
        .unwrap_err();
    assert!(err.to_string().contains("publish error:"));
    assert_eq!(sink.calls.lock().unwrap().len(), 1);

    let back = decode_png(&fs::read(&dest).unwrap()).unwrap();
    assert_eq!(&back, image([200, 10, 10, 255]).as_image());
    assert!(tmp.join("occupied").is_dir());
}

#[test]
fn rename_onto_a_directory_fails_and_cleans_up() {
    let dir = scratch_dir("rename_fail");
    let dest = dir.join("wall.png");
    fs::create_dir_all(dest.join("occupied")).unwrap();

    let err = write_atomic(&dest, b"png").unwrap_err();
    assert!(err.to_string().contains("publish error:"));
    assert!(dest.join("occupied").is_dir());
    let leftovers = fs::read_dir(&dir)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .count();
    assert_eq!(leftovers, 0);
}
