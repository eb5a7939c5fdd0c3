//! Classmap file codec.
//!
//! A persisted classmap is a short `//` comment header (banner plus a
//! human-readable generation timestamp, cosmetic only) followed by a single
//! JSON object mapping each name to a path string or an ordered list of
//! path strings. Writes land in a temp file and are renamed into place, so
//! a concurrent reader never observes a partial classmap.

use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};

use crate::classmap::ClassMap;
use crate::error::{Error, Result};

const BANNER: &str = "// Classmap for lookup-loader";

pub fn write_classmap(destination: &Path, map: &ClassMap) -> Result<()> {
    let body = serde_json::to_string_pretty(map)
        .map_err(|err| Error::Runtime(format!("failed to serialize classmap: {err}")))?;
    let payload = format!(
        "{BANNER}\n// Date of generation: {}\n{body}\n",
        Utc::now().to_rfc3339()
    );

    let tmp = tmp_path(destination);
    fs::write(&tmp, &payload).map_err(|err| {
        Error::Runtime(format!(
            "error while saving new classmap file to '{}': {err}",
            destination.display()
        ))
    })?;

    let written = fs::metadata(&tmp).map(|m| m.len()).unwrap_or(0);
    if written == 0 {
        let _ = fs::remove_file(&tmp);
        return Err(Error::Runtime(format!(
            "zero bytes written while saving classmap file to '{}'",
            destination.display()
        )));
    }

    fs::rename(&tmp, destination).map_err(|err| {
        let _ = fs::remove_file(&tmp);
        Error::Runtime(format!(
            "failed to atomically replace classmap file '{}': {err}",
            destination.display()
        ))
    })
}

pub fn read_classmap(source: &Path) -> Result<ClassMap> {
    if !source.exists() {
        return Err(Error::InvalidArgument(format!(
            "unable to find a file called '{}'",
            source.display()
        )));
    }

    let content = fs::read_to_string(source).map_err(|err| {
        Error::InvalidArgument(format!(
            "given file '{}' is not readable: {err}",
            source.display()
        ))
    })?;

    let body: String = content
        .lines()
        .skip_while(|line| line.trim_start().starts_with("//"))
        .collect::<Vec<_>>()
        .join("\n");

    serde_json::from_str(&body).map_err(|err| {
        Error::Runtime(format!(
            "file '{}' does not contain a proper classmap: {err}",
            source.display()
        ))
    })
}

fn tmp_path(destination: &Path) -> PathBuf {
    let mut os = destination.as_os_str().to_os_string();
    os.push(".tmp");
    PathBuf::from(os)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classmap::Location;

    fn temp_dir(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!(
            "lookup_loader_test_{}_{}_{}",
            std::process::id(),
            nanos,
            name
        ))
    }

    fn sample_map() -> ClassMap {
        let mut map = ClassMap::new();
        map.insert("Unique".to_string(), Location::Single("src/unique.php".into()));
        map.insert(
            "Shared".to_string(),
            Location::Multiple(vec!["src/a.php".into(), "src/b.php".into()]),
        );
        map
    }

    #[test]
    fn round_trip_preserves_entries_and_order() -> anyhow::Result<()> {
        let base = temp_dir("persist_roundtrip");
        fs::create_dir_all(&base)?;
        let file = base.join("classmap.json");

        let map = sample_map();
        write_classmap(&file, &map)?;
        let restored = read_classmap(&file)?;
        assert_eq!(restored, map);
        assert_eq!(
            restored["Shared"].paths(),
            &[PathBuf::from("src/a.php"), PathBuf::from("src/b.php")]
        );

        let _ = fs::remove_dir_all(base);
        Ok(())
    }

    #[test]
    fn written_file_carries_comment_header_and_no_temp_leftover() -> anyhow::Result<()> {
        let base = temp_dir("persist_header");
        fs::create_dir_all(&base)?;
        let file = base.join("classmap.json");

        write_classmap(&file, &sample_map())?;
        let content = fs::read_to_string(&file)?;
        assert!(content.starts_with(BANNER));
        assert!(content.contains("// Date of generation: "));
        assert!(!tmp_path(&file).exists());

        let _ = fs::remove_dir_all(base);
        Ok(())
    }

    #[test]
    fn missing_source_is_an_invalid_argument() {
        let err = read_classmap(Path::new("/nonexistent/classmap.json")).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn malformed_content_is_a_runtime_error() -> anyhow::Result<()> {
        let base = temp_dir("persist_malformed");
        fs::create_dir_all(&base)?;
        let file = base.join("classmap.json");
        fs::write(&file, "// Classmap for lookup-loader\nnot json at all\n")?;

        let err = read_classmap(&file).unwrap_err();
        assert!(matches!(err, Error::Runtime(_)));

        let _ = fs::remove_dir_all(base);
        Ok(())
    }

    #[test]
    fn unwritable_destination_is_a_runtime_error() {
        let map = sample_map();
        let err = write_classmap(Path::new("/nonexistent/dir/classmap.json"), &map).unwrap_err();
        assert!(matches!(err, Error::Runtime(_)));
    }
}
