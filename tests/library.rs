use plyview::config::ViewerConfig;
use plyview::errors::LibraryError;
use plyview::library::PlyLibrary;
use plyview::ply::PointSample;
use plyview::scene::CloudSlot;
use plyview::ErrorKind;

use std::fs;
use std::path::PathBuf;

const CLOUD: &str = "ply\nformat ascii 1.0\nelement vertex 2\n\
property float x\nproperty float y\nproperty float z\nend_header\n0 0 0\n1 2 3\n";

fn scratch_dir(test: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("plyview-{}-{}", test, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn lists_only_ply_files_sorted() {
    let dir = scratch_dir("list");
    fs::write(dir.join("b.ply"), CLOUD).unwrap();
    fs::write(dir.join("a.ply"), CLOUD).unwrap();
    fs::write(dir.join("notes.txt"), "hello").unwrap();
    fs::create_dir(dir.join("nested.ply")).unwrap();

    let library = PlyLibrary::new(&dir);
    assert_eq!(library.list().unwrap(), vec!["a.ply".to_string(), "b.ply".to_string()]);
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn missing_folder_is_an_io_error() {
    let library = PlyLibrary::new(std::env::temp_dir().join("plyview-does-not-exist-anywhere"));
    assert!(matches!(library.list(), Err(LibraryError::Io(_))));
}

#[test]
fn opens_a_listed_file() {
    let dir = scratch_dir("open");
    fs::write(dir.join("scan.ply"), CLOUD).unwrap();
    let cloud = PlyLibrary::new(&dir).open::<PointSample>("scan.ply").unwrap();
    assert_eq!(cloud.samples, vec![PointSample::new(0.0, 0.0, 0.0), PointSample::new(1.0, 2.0, 3.0)]);
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn rejects_names_outside_the_folder() {
    let dir = scratch_dir("resolve");
    fs::write(dir.join("notes.txt"), CLOUD).unwrap();
    let library = PlyLibrary::new(&dir);
    for name in ["missing.ply", "notes.txt", "../scan.ply", ""] {
        assert!(
            matches!(library.open::<PointSample>(name), Err(LibraryError::NotFound { .. })),
            "{} should not resolve", name
        );
    }
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn load_into_keeps_previous_cloud_on_failure() {
    let dir = scratch_dir("load");
    fs::write(dir.join("good.ply"), CLOUD).unwrap();
    fs::write(dir.join("bad.ply"), "ply\nformat xyz 1.0\nend_header\n").unwrap();
    let library = PlyLibrary::new(&dir);
    let slot = CloudSlot::<PointSample>::new();

    assert_eq!(library.load_into("good.ply", &slot).unwrap(), 1);
    match library.load_into("bad.ply", &slot) {
        Err(LibraryError::Decode(e)) => assert_eq!(e.kind(), ErrorKind::UnsupportedFormat),
        other => panic!("unexpected result {:?}", other),
    }
    assert_eq!(slot.revision(), 1);
    assert_eq!(slot.current().len(), 2);
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn library_from_config_uses_its_folder() {
    let config = ViewerConfig::from_json_str(r#"{ "ply_dir": "scans" }"#).unwrap();
    assert_eq!(PlyLibrary::from_config(&config).dir(), std::path::Path::new("scans"));
}
