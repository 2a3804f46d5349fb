//! Reading and writing the zip archive a mapping document is shipped in.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;
use log::debug;
use thiserror::Error;
use zip::{ZipArchive, ZipWriter};
use zip::result::ZipError;
use zip::write::FileOptions;

/// The name of the archive entry holding the mapping document.
pub const ENTRY_NAME: &str = "parchment.json";

/// The bytes of a mapping document, not yet parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument(Vec<u8>);

impl RawDocument {
	pub fn new(bytes: Vec<u8>) -> RawDocument {
		RawDocument(bytes)
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}

	pub fn into_bytes(self) -> Vec<u8> {
		self.0
	}
}

#[derive(Debug, Error)]
pub enum ArchiveError {
	#[error("archive has no entry named {entry_name:?}")]
	NotFound { entry_name: &'static str },
	#[error("failed to access the mapping archive")]
	Io(#[from] std::io::Error),
	#[error("malformed mapping archive")]
	Zip(#[source] ZipError),
}

impl From<ZipError> for ArchiveError {
	fn from(value: ZipError) -> Self {
		match value {
			ZipError::Io(e) => ArchiveError::Io(e),
			e => ArchiveError::Zip(e),
		}
	}
}

/// Reads the mapping document out of the archive at the given path.
pub fn read(path: impl AsRef<Path>) -> Result<RawDocument, ArchiveError> {
	let path = path.as_ref();
	debug!("reading mapping archive {path:?}");

	let file = File::open(path)?;
	read_from(BufReader::new(file))
}

/// Reads the mapping document out of an archive.
///
/// The entry is read in full before returning, the archive is dropped afterwards.
pub fn read_from(reader: impl Read + Seek) -> Result<RawDocument, ArchiveError> {
	let mut archive = ZipArchive::new(reader)?;

	let mut entry = match archive.by_name(ENTRY_NAME) {
		Ok(entry) => entry,
		Err(ZipError::FileNotFound) => return Err(ArchiveError::NotFound { entry_name: ENTRY_NAME }),
		Err(e) => return Err(e.into()),
	};

	let mut bytes = Vec::with_capacity(usize::try_from(entry.size()).unwrap_or(0));
	entry.read_to_end(&mut bytes)?;

	Ok(RawDocument(bytes))
}

/// Writes an archive holding only the given mapping document to the given path.
pub fn write(path: impl AsRef<Path>, document: &RawDocument) -> Result<(), ArchiveError> {
	let path = path.as_ref();
	debug!("writing mapping archive {path:?}");

	let file = File::create(path)?;
	let mut writer = write_to(BufWriter::new(file), document)?;
	writer.flush()?;
	Ok(())
}

/// Writes an archive holding only the given mapping document, giving back the writer.
pub fn write_to<W: Write + Seek>(writer: W, document: &RawDocument) -> Result<W, ArchiveError> {
	let mut zip = ZipWriter::new(writer);

	zip.start_file(ENTRY_NAME, FileOptions::<()>::default())?;
	zip.write_all(document.as_bytes())?;

	Ok(zip.finish()?)
}

#[cfg(test)]
mod testing {
	use std::io::{Cursor, Write};
	use pretty_assertions::assert_eq;
	use zip::write::FileOptions;
	use zip::ZipWriter;
	use crate::archive::{ArchiveError, RawDocument};

	#[test]
	fn in_memory() -> Result<(), ArchiveError> {
		let document = RawDocument::new(b"{\"version\":\"1.1.0\"}".to_vec());

		let archive = crate::archive::write_to(Cursor::new(Vec::new()), &document)?;
		let read = crate::archive::read_from(Cursor::new(archive.into_inner()))?;

		assert_eq!(read, document);
		Ok(())
	}

	#[test]
	fn missing_entry() -> anyhow::Result<()> {
		let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
		zip.start_file("Parchment.json", FileOptions::<()>::default())?;
		zip.write_all(b"{}")?;
		let archive = zip.finish()?.into_inner();

		match crate::archive::read_from(Cursor::new(archive)) {
			Err(ArchiveError::NotFound { entry_name }) => assert_eq!(entry_name, "parchment.json"),
			other => panic!("expected the entry to be missing, got {other:?}"),
		}
		Ok(())
	}

	#[test]
	fn not_a_zip() {
		let result = crate::archive::read_from(Cursor::new(b"just some text".to_vec()));
		assert!(matches!(result, Err(ArchiveError::Zip(_) | ArchiveError::Io(_))), "got {result:?}");
	}
}
