use std::fmt::{Display, Formatter};
use std::str::FromStr;
use anyhow::{anyhow, bail, Context, Error, Result};

/// A version of the form `major.minor.patch`, like the `1.1.0` at the top of a mapping document.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SimpleVersion {
	pub major: u32,
	pub minor: u32,
	pub patch: u32,
}

impl SimpleVersion {
	pub const fn new(major: u32, minor: u32, patch: u32) -> SimpleVersion {
		SimpleVersion { major, minor, patch }
	}
}

impl FromStr for SimpleVersion {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		let parts: Vec<&str> = s.split('.').collect();
		let [major, minor, patch] = parts[..] else {
			bail!("version {s:?} must have exactly three parts separated by `.`");
		};

		let parse = |part: &str| part.parse::<u32>()
			.with_context(|| anyhow!("part {part:?} of version {s:?} is not a number"));

		Ok(SimpleVersion {
			major: parse(major)?,
			minor: parse(minor)?,
			patch: parse(patch)?,
		})
	}
}

impl Display for SimpleVersion {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
	}
}
