//! Maven coordinates, and the keys mapping versions are known under.

use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;
use anyhow::{anyhow, bail, Context, Error};

/// The extension a mapping archive has if none is given.
pub const DEFAULT_EXTENSION: &str = "zip";

/// A Maven coordinate of a mapping archive.
///
/// [MavenCoord] implements [FromStr]. Format is: `group:artifact[:version[:classifier]][@extension]`, like
/// `org.parchmentmc.data:parchment-1.20.1:2023.09.03@zip`.
/// ```
/// # use pretty_assertions::assert_eq;
/// use parchment::coord::MavenCoord;
/// let a: MavenCoord = "org.parchmentmc.data:parchment-1.20.1:2023.09.03:checked@zip".parse().unwrap();
/// let b = MavenCoord {
///     group: "org.parchmentmc.data".to_owned(),
///     artifact: "parchment-1.20.1".to_owned(),
///     version: Some("2023.09.03".to_owned()),
///     classifier: Some("checked".to_owned()),
///     extension: "zip".to_owned(),
/// };
///
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "org.parchmentmc.data:parchment-1.20.1:2023.09.03:checked@zip");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MavenCoord {
	pub group: String,
	pub artifact: String,
	pub version: Option<String>,
	pub classifier: Option<String>,
	pub extension: String,
}

impl MavenCoord {
	pub fn new(group: &str, artifact: &str, version: &str) -> MavenCoord {
		MavenCoord {
			group: group.to_owned(),
			artifact: artifact.to_owned(),
			version: Some(version.to_owned()),
			classifier: None,
			extension: DEFAULT_EXTENSION.to_owned(),
		}
	}

	/// The key identifying the mappings resolved from this coordinate, see [`state_key`].
	pub fn state_key(&self) -> String {
		state_key(self.version.as_deref())
	}

	/// The path of the file of this coordinate, relative to the root of a Maven repository.
	///
	/// Returns `None` if there's no version.
	pub fn repository_path(&self) -> Option<PathBuf> {
		let version = self.version.as_deref()?;

		let mut path: PathBuf = self.group.split('.').collect();
		path.push(&self.artifact);
		path.push(version);
		path.push(format!("{artifact}-{version}{classifier_minus}{classifier}.{extension}",
			artifact = self.artifact,
			classifier_minus = if self.classifier.is_some() { "-" } else { "" },
			classifier = self.classifier.as_deref().unwrap_or(""),
			extension = self.extension,
		));
		Some(path)
	}
}

/// Creates the key under which mappings of the given version are known.
///
/// This is the version with all `.` removed, or `noVer` if there's no version.
pub fn state_key(version: Option<&str>) -> String {
	match version {
		Some(version) => version.replace('.', ""),
		None => "noVer".to_owned(),
	}
}

impl Display for MavenCoord {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}:{}", self.group, self.artifact)?;
		if let Some(version) = &self.version {
			write!(f, ":{version}")?;
			if let Some(classifier) = &self.classifier {
				write!(f, ":{classifier}")?;
			}
		}
		write!(f, "@{}", self.extension)
	}
}

impl FromStr for MavenCoord {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let (rest, extension) = match s.split_once('@') {
			Some((rest, extension)) if !extension.is_empty() => (rest, extension),
			Some(_) => bail!("empty extension in {s:?}"),
			None => (s, DEFAULT_EXTENSION),
		};

		let mut iter = rest.split(':');
		let group = iter.next().filter(|x| !x.is_empty()).with_context(|| anyhow!("no group specified: {s:?}"))?;
		let artifact = iter.next().filter(|x| !x.is_empty()).with_context(|| anyhow!("no artifact specified: {s:?}"))?;
		let version = iter.next();
		let classifier = iter.next();

		if iter.next().is_some() {
			bail!("there may not be more than 3 colons: {s:?}");
		}
		if version.is_some_and(str::is_empty) || classifier.is_some_and(str::is_empty) {
			bail!("empty part in {s:?}");
		}

		Ok(MavenCoord {
			group: group.to_owned(),
			artifact: artifact.to_owned(),
			version: version.map(|x| x.to_owned()),
			classifier: classifier.map(|x| x.to_owned()),
			extension: extension.to_owned(),
		})
	}
}

#[cfg(test)]
mod testing {
	use std::path::PathBuf;
	use pretty_assertions::assert_eq;
	use crate::coord::{state_key, MavenCoord};

	#[test]
	fn state_keys() {
		assert_eq!(state_key(Some("2.0.1")), "201");
		assert_eq!(state_key(Some("2023.09.03")), "20230903");
		assert_eq!(state_key(Some("1")), "1");
		assert_eq!(state_key(None), "noVer");

		let coord: MavenCoord = "org.parchmentmc.data:parchment-1.20.1".parse().expect("valid coordinate");
		assert_eq!(coord.state_key(), "noVer");
	}

	#[test]
	fn parse() {
		let coord: MavenCoord = "a.b:c:1.0".parse().expect("valid coordinate");
		assert_eq!(coord, MavenCoord::new("a.b", "c", "1.0"));
		assert_eq!(coord.to_string(), "a.b:c:1.0@zip");

		let coord: MavenCoord = "a.b:c@jar".parse().expect("valid coordinate");
		assert_eq!((coord.version, coord.extension), (None, "jar".to_owned()));

		assert!("a.b".parse::<MavenCoord>().is_err());
		assert!(":c:1.0".parse::<MavenCoord>().is_err());
		assert!("a:c:1.0:d:e".parse::<MavenCoord>().is_err());
		assert!("a:c:1.0@".parse::<MavenCoord>().is_err());
		assert!("a:c::d".parse::<MavenCoord>().is_err());
	}

	#[test]
	fn repository_path() {
		let mut coord = MavenCoord::new("org.parchmentmc.data", "parchment-1.20.1", "2023.09.03");
		assert_eq!(
			coord.repository_path(),
			Some(PathBuf::from("org/parchmentmc/data/parchment-1.20.1/2023.09.03/parchment-1.20.1-2023.09.03.zip")),
		);

		coord.classifier = Some("checked".to_owned());
		assert_eq!(
			coord.repository_path(),
			Some(PathBuf::from("org/parchmentmc/data/parchment-1.20.1/2023.09.03/parchment-1.20.1-2023.09.03-checked.zip")),
		);

		coord.version = None;
		assert_eq!(coord.repository_path(), None);
	}
}
