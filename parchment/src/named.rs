use indexmap::IndexMap;

/// An identity that can be known under several names, one per namespace.
///
/// Written either as a plain string, which is the mapped name, or as an object of namespace to name, like
/// `{"obfuscated": "a", "mojmap": "count"}`. Only the mapped name is used for renaming, see
/// [`NamedAdapter`][crate::adapter::NamedAdapter] for which namespace that is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Named {
	Plain(String),
	Namespaced(IndexMap<String, String>),
}

impl Named {
	/// Gets the name in the given namespace.
	///
	/// A plain name is the name in any namespace.
	pub fn get(&self, namespace: &str) -> Option<&str> {
		match self {
			Named::Plain(name) => Some(name.as_str()),
			Named::Namespaced(names) => names.get(namespace).map(String::as_str),
		}
	}
}

impl From<&str> for Named {
	fn from(value: &str) -> Self {
		Named::Plain(value.to_owned())
	}
}

impl From<String> for Named {
	fn from(value: String) -> Self {
		Named::Plain(value)
	}
}
