//! Methods for converting the string format used in the Java Virtual Machine Specification to and from
//! rust strings.
//!
//! The Java Virtual Machine Specification's string format is using a 2x3-format and storing `\0`
//! using two bytes.
//!
//! See <https://docs.oracle.com/javase/specs/jvms/se22/html/jvms-4.html#jvms-4.4.7> for the complete specification of
//! the string format used in the Java Virtual Machine Specification.

use std::borrow::Cow;
use anyhow::{anyhow, Context, Result};
use java_string::{JavaStr, JavaString};

/// Takes in a vec of data, tries to read it into a [`JavaString`].
pub(crate) fn from_vec_to_string(vec: Vec<u8>) -> Result<JavaString> {
	JavaString::from_modified_utf8(vec)
		.with_context(|| anyhow!("invalid java utf8 contents"))
}

/// Takes in a string and writes it out into a vec.
pub(crate) fn from_string_to_vec(string: &JavaStr) -> Cow<[u8]> {
	string.to_modified_utf8()
}

#[cfg(test)]
mod testing {
	use anyhow::Result;
	use java_string::JavaStr;
	use pretty_assertions::assert_eq;
	use crate::jstring::{from_string_to_vec, from_vec_to_string};

	fn round_trip_str(raw: &[u8], string: &str) -> Result<()> {
		let str = JavaStr::from_str(string);
		assert_eq!(from_string_to_vec(str), raw);
		assert_eq!(from_vec_to_string(raw.to_owned())?, str);
		Ok(())
	}

	#[test]
	fn zero_takes_two_bytes() -> Result<()> {
		round_trip_str(&[0b1100_0000, 0b1000_0000, b'a', 0b1100_0000, 0b1000_0000], "\0a\0")
	}

	#[test]
	fn ascii_local_variable_names() -> Result<()> {
		round_trip_str(b"count", "count")?;
		round_trip_str(b"pValue", "pValue")
	}

	#[test]
	fn supplementary_character_is_a_surrogate_pair() -> Result<()> {
		// U+1F600 is stored as two surrogates of three bytes each
		round_trip_str(&[0xED, 0xA0, 0xBD, 0xED, 0xB8, 0x80], "\u{1F600}")
	}

	#[test]
	fn invalid_contents() {
		assert!(from_vec_to_string(vec![0b1100_0000]).is_err());
		assert!(from_vec_to_string(vec![0]).is_err());
	}
}
