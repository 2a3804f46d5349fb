use std::io::{Cursor, Read, Seek, Write};
use anyhow::{anyhow, bail, Context, Result};
use log::{debug, info};
use tokio::task::JoinSet;
use zip::{CompressionMethod, ZipArchive, ZipWriter};
use zip::write::FileOptions;
use parchment::transformer::ParchmentTransformer;

/// An entry of a jar, with its content read into memory.
#[derive(Debug)]
struct JarEntry {
	name: String,
	compression: CompressionMethod,
	kind: JarEntryKind,
}

#[derive(Debug)]
enum JarEntryKind {
	Dir,
	Class(Vec<u8>),
	Other(Vec<u8>),
}

/// What happened to the classes of a jar.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RewriteSummary {
	/// Classes with mappings, passed through the transformer.
	pub(crate) rewritten: usize,
	/// Classes without mappings, copied as they were.
	pub(crate) copied: usize,
	/// Entries that aren't classes.
	pub(crate) other: usize,
}

fn read_entries(reader: impl Read + Seek) -> Result<Vec<JarEntry>> {
	let mut zip = ZipArchive::new(reader)?;

	let mut entries = Vec::with_capacity(zip.len());
	for index in 0..zip.len() {
		let mut file = zip.by_index(index)?;

		let kind = if file.is_dir() {
			JarEntryKind::Dir
		} else {
			let mut data = Vec::with_capacity(usize::try_from(file.size()).unwrap_or(0));
			file.read_to_end(&mut data)
				.with_context(|| anyhow!("failed to read jar entry {:?}", file.name()))?;

			if file.name().ends_with(".class") {
				JarEntryKind::Class(data)
			} else {
				JarEntryKind::Other(data)
			}
		};

		entries.push(JarEntry {
			name: file.name().to_owned(),
			compression: file.compression(),
			kind,
		});
	}

	Ok(entries)
}

/// Renames the local variables of one class, or gives it back as is if there are no mappings for it.
fn rewrite_class(transformer: &ParchmentTransformer, data: Vec<u8>) -> Result<(Vec<u8>, bool)> {
	let name = duke::peek_class_name(&mut data.as_slice())?;
	if !transformer.covers(&name) {
		return Ok((data, false));
	}

	let visitor = duke::read_class(&mut data.as_slice(), transformer.wrap(duke::ClassWriter::new()))
		.with_context(|| anyhow!("failed to rename local variables of class {name}"))?;
	let data = visitor.into_delegate().into_bytes()
		.with_context(|| anyhow!("failed to write class {name}"))?;

	Ok((data, true))
}

/// Rewrites all classes of the jar in parallel, keeping the order of the entries.
pub(crate) async fn rewrite(transformer: &ParchmentTransformer, jar: Vec<u8>) -> Result<(Vec<u8>, RewriteSummary)> {
	let mut entries = tokio::task::spawn_blocking(move || read_entries(Cursor::new(jar))).await??;
	debug!("read {} jar entries", entries.len());

	let mut summary = RewriteSummary::default();

	let mut tasks = JoinSet::new();
	for (index, entry) in entries.iter_mut().enumerate() {
		match &mut entry.kind {
			JarEntryKind::Class(data) => {
				let data = std::mem::take(data);
				let name = entry.name.clone();
				let transformer = transformer.clone();
				tasks.spawn_blocking(move || {
					let result = rewrite_class(&transformer, data)
						.with_context(|| anyhow!("in jar entry {name:?}"));
					(index, result)
				});
			},
			JarEntryKind::Other(_) => summary.other += 1,
			JarEntryKind::Dir => {},
		}
	}

	while let Some(result) = tasks.join_next().await {
		let (index, result) = result?;
		let (data, rewritten) = result?;

		if rewritten {
			summary.rewritten += 1;
		} else {
			summary.copied += 1;
		}

		match entries.get_mut(index).map(|entry| &mut entry.kind) {
			Some(JarEntryKind::Class(slot)) => *slot = data,
			_ => bail!("no class entry at index {index}"),
		}
	}

	let jar = tokio::task::spawn_blocking(move || write_entries(entries)).await??;

	info!("rewrote {} classes, copied {} classes and {} other entries", summary.rewritten, summary.copied, summary.other);
	Ok((jar, summary))
}

fn write_entries(entries: Vec<JarEntry>) -> Result<Vec<u8>> {
	let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

	for entry in entries {
		let options = FileOptions::<()>::default()
			.compression_method(entry.compression);

		match entry.kind {
			JarEntryKind::Dir => zip.add_directory(entry.name, options)?,
			JarEntryKind::Class(data) | JarEntryKind::Other(data) => {
				zip.start_file(entry.name, options)?;
				zip.write_all(&data)?;
			},
		}
	}

	Ok(zip.finish()?.into_inner())
}
