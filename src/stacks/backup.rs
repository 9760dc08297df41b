//! Catalog backup: a gzipped tar archive holding the collection JSON.

use chrono::Utc;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, StacksError};
use crate::model::Book;

const ARCHIVE_ENTRY: &str = "stacks/library-books.json";

/// Write the collection into `dest_dir` as `stacks-<timestamp>.tar.gz`.
/// Returns the path of the archive.
pub fn export_catalog(books: &[Book], dest_dir: &Path) -> Result<PathBuf> {
    let filename = format!("stacks-{}.tar.gz", Utc::now().format("%Y-%m-%d_%H-%M-%S"));
    let path = dest_dir.join(filename);
    let file = File::create(&path).map_err(StacksError::Io)?;
    write_archive(file, books)?;
    Ok(path)
}

fn write_archive<W: Write>(writer: W, books: &[Book]) -> Result<()> {
    let enc = GzEncoder::new(writer, Compression::default());
    let mut tar = tar::Builder::new(enc);

    let content = serde_json::to_vec_pretty(books).map_err(StacksError::Serialization)?;
    let mut header = tar::Header::new_gnu();
    header.set_size(content.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    tar.append_data(&mut header, ARCHIVE_ENTRY, content.as_slice())
        .map_err(StacksError::Io)?;

    tar.finish().map_err(StacksError::Io)?;
    Ok(())
}

/// Read a collection back out of an archive written by [`export_catalog`].
pub fn import_catalog(path: &Path) -> Result<Vec<Book>> {
    let file = File::open(path).map_err(StacksError::Io)?;
    let mut archive = tar::Archive::new(GzDecoder::new(file));

    for entry in archive.entries().map_err(StacksError::Io)? {
        let mut entry = entry.map_err(StacksError::Io)?;
        let is_json = entry
            .path()
            .map_err(StacksError::Io)?
            .extension()
            .is_some_and(|ext| ext == "json");
        if !is_json {
            continue;
        }

        let mut content = String::new();
        entry
            .read_to_string(&mut content)
            .map_err(StacksError::Io)?;
        let books = serde_json::from_str(&content).map_err(StacksError::Serialization)?;
        return Ok(books);
    }

    Err(StacksError::Store(format!(
        "No catalog entry found in {}",
        path.display()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Lending, Loan};

    #[test]
    fn export_then_import_round_trips() {
        let mut issued = Book::new(
            "Dune".into(),
            "Frank Herbert".into(),
            "111".into(),
            Category::Fiction,
            1965,
        );
        issued.lending = Lending::Issued(Loan::starting("Alice", Utc::now()));
        let books = vec![
            issued,
            Book::new(
                "Cosmos".into(),
                "Carl Sagan".into(),
                "222".into(),
                Category::Science,
                1980,
            ),
        ];

        let dir = tempfile::tempdir().unwrap();
        let path = export_catalog(&books, dir.path()).unwrap();
        assert!(path.file_name().unwrap().to_str().unwrap().ends_with(".tar.gz"));

        let restored = import_catalog(&path).unwrap();
        assert_eq!(restored, books);
    }

    #[test]
    fn import_of_a_non_archive_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-an-archive.tar.gz");
        std::fs::write(&path, b"plain text").unwrap();
        assert!(import_catalog(&path).is_err());
    }
}
