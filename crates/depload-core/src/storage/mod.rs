//! Cache file lifecycle.
//!
//! Bodies stream into a `.part` file next to the destination, which is
//! fsynced and atomically renamed over the final name. A writer dropped
//! before `finalize` removes its temp file, so a failed transfer never leaves
//! a partial artifact at the final path.

mod writer;

pub use writer::PartFile;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `lib-1.0.jar` → `lib-1.0.jar.part`).
pub fn temp_path(final_path: &std::path::Path) -> std::path::PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    std::path::PathBuf::from(o)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn temp_path_appends_part() {
        let p = temp_path(Path::new("lib-1.0.jar"));
        assert_eq!(p.to_string_lossy(), "lib-1.0.jar.part");
        let p2 = temp_path(Path::new("/tmp/cache/org/x/lib/1.0/lib-1.0.jar"));
        assert_eq!(p2.to_string_lossy(), "/tmp/cache/org/x/lib/1.0/lib-1.0.jar.part");
    }

    #[test]
    fn write_sync_finalize_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("lib-1.0.jar");
        std::fs::write(&final_path, b"stale").unwrap();

        let mut part = PartFile::create(&final_path).unwrap();
        part.write_chunk(b"fresh ").unwrap();
        part.write_chunk(b"content").unwrap();
        part.sync().unwrap();
        part.finalize().unwrap();

        assert!(!temp_path(&final_path).exists());
        assert_eq!(std::fs::read(&final_path).unwrap(), b"fresh content");
    }

    #[test]
    fn dropped_part_file_is_removed_and_final_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("lib-1.0.jar");
        std::fs::write(&final_path, b"original").unwrap();

        {
            let mut part = PartFile::create(&final_path).unwrap();
            part.write_chunk(b"half a bo").unwrap();
            assert!(temp_path(&final_path).exists());
        }

        assert!(!temp_path(&final_path).exists());
        assert_eq!(std::fs::read(&final_path).unwrap(), b"original");
    }

    #[test]
    fn create_truncates_leftover_part() {
        let dir = tempfile::tempdir().unwrap();
        let final_path = dir.path().join("a.jar");
        std::fs::write(temp_path(&final_path), b"leftover from a crash").unwrap();

        let mut part = PartFile::create(&final_path).unwrap();
        part.write_chunk(b"new").unwrap();
        part.finalize().unwrap();
        assert_eq!(std::fs::read(&final_path).unwrap(), b"new");
    }
}
