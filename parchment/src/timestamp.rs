use std::fmt::{Display, Formatter};
use std::str::FromStr;
use anyhow::{anyhow, Context, Error, Result};
use chrono::{DateTime, FixedOffset};

/// A date and time with an offset, written as in RFC 3339.
///
/// The text it was read from is kept, so that writing it back out gives the exact same text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
	date_time: DateTime<FixedOffset>,
	text: String,
}

impl Timestamp {
	pub fn date_time(&self) -> DateTime<FixedOffset> {
		self.date_time
	}

	pub fn as_str(&self) -> &str {
		&self.text
	}
}

impl From<DateTime<FixedOffset>> for Timestamp {
	fn from(date_time: DateTime<FixedOffset>) -> Self {
		Timestamp { date_time, text: date_time.to_rfc3339() }
	}
}

impl FromStr for Timestamp {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		let date_time = DateTime::parse_from_rfc3339(s)
			.with_context(|| anyhow!("{s:?} is not an RFC 3339 date and time"))?;

		Ok(Timestamp { date_time, text: s.to_owned() })
	}
}

impl Display for Timestamp {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.text)
	}
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use crate::timestamp::Timestamp;

	#[test]
	fn keeps_the_text() {
		let timestamp: Timestamp = "2021-09-05T12:34:56.789Z".parse().expect("valid timestamp");
		assert_eq!(timestamp.to_string(), "2021-09-05T12:34:56.789Z");
		assert_eq!(timestamp.date_time().timestamp(), 1630845296);
	}

	#[test]
	fn invalid() {
		assert!("2021-09-05".parse::<Timestamp>().is_err());
		assert!("yesterday".parse::<Timestamp>().is_err());
	}
}
