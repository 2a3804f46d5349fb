//! Finding the mapping archive a dependency refers to.

use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use log::debug;
use thiserror::Error;
use crate::coord::MavenCoord;

/// Where the mappings should come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencySpec {
	/// A mapping archive on disk.
	Path(PathBuf),
	Maven(MavenCoord),
}

impl DependencySpec {
	/// The key identifying the mappings of this dependency, see [`state_key`][crate::coord::state_key].
	///
	/// A path has no version.
	pub fn state_key(&self) -> String {
		match self {
			DependencySpec::Path(_) => crate::coord::state_key(None),
			DependencySpec::Maven(coord) => coord.state_key(),
		}
	}
}

impl Display for DependencySpec {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			DependencySpec::Path(path) => write!(f, "{}", path.display()),
			DependencySpec::Maven(coord) => write!(f, "{coord}"),
		}
	}
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolutionError {
	#[error("dependency {0} has no version")]
	NoVersion(MavenCoord),
	#[error("mapping archive {path:?} for dependency {dependency} doesn't exist")]
	Missing { dependency: String, path: PathBuf },
}

/// Finds the mapping archive of a dependency, without reading it.
pub trait ArchiveLocator {
	fn locate(&self, spec: &DependencySpec) -> Result<PathBuf, ResolutionError>;
}

/// A Maven repository on disk, like `~/.m2/repository`.
///
/// Paths are used as is, and only checked to exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalMavenRepository {
	pub root: PathBuf,
}

impl LocalMavenRepository {
	pub fn new(root: impl Into<PathBuf>) -> LocalMavenRepository {
		LocalMavenRepository { root: root.into() }
	}
}

fn check_exists(spec: &DependencySpec, path: &Path) -> Result<(), ResolutionError> {
	if path.is_file() {
		Ok(())
	} else {
		Err(ResolutionError::Missing { dependency: spec.to_string(), path: path.to_owned() })
	}
}

impl ArchiveLocator for LocalMavenRepository {
	fn locate(&self, spec: &DependencySpec) -> Result<PathBuf, ResolutionError> {
		let path = match spec {
			DependencySpec::Path(path) => path.clone(),
			DependencySpec::Maven(coord) => {
				let relative = coord.repository_path()
					.ok_or_else(|| ResolutionError::NoVersion(coord.clone()))?;
				self.root.join(relative)
			},
		};

		check_exists(spec, &path)?;
		debug!("located mappings {spec} at {path:?}");
		Ok(path)
	}
}
