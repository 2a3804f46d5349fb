/// Creates a [`JavaString`][java_string::JavaString] backed name type.
///
/// The content is checked with the given `is_valid` expression on construction, so any instance of the type
/// is known to hold valid content. The expression gets the [`JavaStr`][java_string::JavaStr] under the given name
/// and must evaluate to an `anyhow::Result<()>`.
macro_rules! make_name {
	(
		$( #[$doc:meta] )*
		$vis:vis $name:ident;
		is_valid($s:ident) = $check:expr;
	) => {
		$( #[$doc] )*
		#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
		$vis struct $name(java_string::JavaString);

		impl $name {
			/// Checks if the given string is valid for this type.
			pub fn check_valid($s: &java_string::JavaStr) -> anyhow::Result<()> {
				$check
			}

			/// Checks if a given value is valid for being represented by this type.
			///
			/// See [`Self::check_valid`] for the specification on what's valid.
			pub fn is_valid(inner: &java_string::JavaStr) -> bool {
				Self::check_valid(inner).is_ok()
			}

			pub fn as_java_str(&self) -> &java_string::JavaStr {
				&self.0
			}

			pub fn into_inner(self) -> java_string::JavaString {
				self.0
			}
		}

		impl TryFrom<java_string::JavaString> for $name {
			type Error = anyhow::Error;

			fn try_from(value: java_string::JavaString) -> anyhow::Result<$name> {
				match $name::check_valid(&value) {
					Ok(()) => Ok($name(value)),
					Err(e) => {
						use anyhow::Context;
						Err(e).with_context(|| anyhow::anyhow!("on value {value:?}"))
					},
				}
			}
		}

		impl<'a> TryFrom<&'a str> for $name {
			type Error = anyhow::Error;

			fn try_from(value: &'a str) -> anyhow::Result<$name> {
				$name::try_from(java_string::JavaString::from(value))
			}
		}

		impl From<$name> for java_string::JavaString {
			fn from(value: $name) -> Self {
				value.0
			}
		}

		impl AsRef<java_string::JavaStr> for $name {
			fn as_ref(&self) -> &java_string::JavaStr {
				&self.0
			}
		}

		impl std::fmt::Display for $name {
			fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
				match self.0.as_str() {
					Ok(s) => f.write_str(s),
					// lone surrogates can't be shown as a rust string
					Err(_) => write!(f, "{:?}", self.0),
				}
			}
		}
	}
}

pub(crate) use make_name;
