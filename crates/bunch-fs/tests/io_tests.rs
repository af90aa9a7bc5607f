use bunch_fs::{NormalizedPath, VariantContent, io, read_variant, read_variant_opt};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_write_atomic_creates_parent_dirs() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("deep/nested/test.txt"));

    io::write_atomic(&path, b"hello world").unwrap();

    let content = fs::read_to_string(path.to_native()).unwrap();
    assert_eq!(content, "hello world");
}

#[test]
fn test_write_atomic_overwrites_existing() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("test.txt");
    fs::write(&file_path, "original").unwrap();

    let path = NormalizedPath::new(&file_path);
    io::write_atomic(&path, b"updated").unwrap();

    let content = fs::read_to_string(&file_path).unwrap();
    assert_eq!(content, "updated");
}

#[test]
fn test_copy_file_is_byte_exact() {
    let temp = TempDir::new().unwrap();
    let from = NormalizedPath::new(temp.path().join("f"));
    let to = from.with_suffix("192");
    let bytes = b"line one\r\nline two\n\xff\xfe";
    fs::write(from.to_native(), bytes).unwrap();

    io::copy_file(&from, &to).unwrap();

    assert_eq!(fs::read(to.to_native()).unwrap(), bytes);
}

#[test]
fn test_copy_file_rejects_directory() {
    let temp = TempDir::new().unwrap();
    let dir = NormalizedPath::new(temp.path().join("d"));
    fs::create_dir(dir.to_native()).unwrap();

    let result = io::copy_file(&dir, &dir.with_suffix("bak"));
    assert!(matches!(result, Err(bunch_fs::Error::IsDirectory { .. })));
}

#[test]
fn test_remove_missing_file_is_ok() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("absent"));
    io::remove_file(&path).unwrap();
}

#[test]
fn test_read_variant_distinguishes_tombstone_and_absence() {
    let temp = TempDir::new().unwrap();
    let tombstone = NormalizedPath::new(temp.path().join("f.192"));
    let content = NormalizedPath::new(temp.path().join("f.193"));
    let absent = NormalizedPath::new(temp.path().join("f.194"));
    fs::write(tombstone.to_native(), " \n\n").unwrap();
    fs::write(content.to_native(), "X").unwrap();

    assert_eq!(read_variant(&tombstone).unwrap(), VariantContent::Tombstone);
    assert_eq!(
        read_variant(&content).unwrap(),
        VariantContent::Content("X".into())
    );
    assert_eq!(read_variant_opt(&absent).unwrap(), None);
    assert!(read_variant(&absent).is_err());
}
