//! How single fields of a mapping document are read and written.
//!
//! The [`Adapters`] are built once and handed to both the [`MappingDeserializer`][crate::reader::MappingDeserializer]
//! and the [`MappingSerializer`][crate::writer::MappingSerializer].

use std::fmt::Debug;
use std::sync::Arc;
use serde_json::{Map, Value};
use crate::named::Named;
use crate::reader::{kind, JsonPath, ParseError};
use crate::timestamp::Timestamp;
use crate::version::SimpleVersion;

/// Converts between a JSON value and a `T`.
pub trait FieldAdapter<T>: Debug {
	fn read(&self, value: &Value, path: &JsonPath) -> Result<T, ParseError>;
	fn write(&self, value: &T) -> Value;
}

/// A [`FieldAdapter`] for [`Named`] values, which also knows which of the names is the mapped one.
pub trait NamedFieldAdapter: FieldAdapter<Named> {
	fn mapped<'n>(&self, named: &'n Named) -> Option<&'n str>;
}

#[derive(Debug, Clone)]
pub struct Adapters {
	pub version: Arc<dyn FieldAdapter<SimpleVersion> + Send + Sync>,
	pub timestamp: Arc<dyn FieldAdapter<Timestamp> + Send + Sync>,
	pub named: Arc<dyn NamedFieldAdapter + Send + Sync>,
}

impl Default for Adapters {
	fn default() -> Self {
		Adapters {
			version: Arc::new(SimpleVersionAdapter::default()),
			timestamp: Arc::new(OffsetDateTimeAdapter),
			named: Arc::new(NamedAdapter::default()),
		}
	}
}

/// Reads a `major.minor.patch` version string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleVersionAdapter {
	/// If set, other major versions are rejected.
	pub supported_major: Option<u32>,
}

impl Default for SimpleVersionAdapter {
	fn default() -> Self {
		SimpleVersionAdapter { supported_major: Some(1) }
	}
}

impl FieldAdapter<SimpleVersion> for SimpleVersionAdapter {
	fn read(&self, value: &Value, path: &JsonPath) -> Result<SimpleVersion, ParseError> {
		let version: SimpleVersion = crate::reader::string(value, path)?
			.parse()
			.map_err(|e| ParseError::new(path, format!("{e:#}")))?;

		match self.supported_major {
			Some(major) if version.major != major => {
				Err(ParseError::new(path, format!("unsupported version {version}, only major version {major} is supported")))
			},
			_ => Ok(version),
		}
	}

	fn write(&self, value: &SimpleVersion) -> Value {
		Value::String(value.to_string())
	}
}

/// Reads an RFC 3339 date and time with an offset.
#[derive(Debug, Clone, Copy, Default)]
pub struct OffsetDateTimeAdapter;

impl FieldAdapter<Timestamp> for OffsetDateTimeAdapter {
	fn read(&self, value: &Value, path: &JsonPath) -> Result<Timestamp, ParseError> {
		crate::reader::string(value, path)?
			.parse()
			.map_err(|e| ParseError::new(path, format!("{e:#}")))
	}

	fn write(&self, value: &Timestamp) -> Value {
		Value::String(value.as_str().to_owned())
	}
}

/// Reads a name that's either a plain string, or an object of namespace to name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedAdapter {
	/// The namespace whose names are applied to the bytecode.
	pub mapped_namespace: String,
}

impl Default for NamedAdapter {
	fn default() -> Self {
		NamedAdapter { mapped_namespace: "mojmap".to_owned() }
	}
}

impl FieldAdapter<Named> for NamedAdapter {
	fn read(&self, value: &Value, path: &JsonPath) -> Result<Named, ParseError> {
		match value {
			Value::String(name) => Ok(Named::Plain(name.clone())),
			Value::Object(names) => names.iter()
				.map(|(namespace, name)| {
					crate::reader::string(name, &path.key(namespace))
						.map(|name| (namespace.clone(), name.to_owned()))
				})
				.collect::<Result<_, _>>()
				.map(Named::Namespaced),
			value => Err(ParseError::new(path, format!("expected a string or an object of names, got {}", kind(value)))),
		}
	}

	fn write(&self, value: &Named) -> Value {
		match value {
			Named::Plain(name) => Value::String(name.clone()),
			Named::Namespaced(names) => Value::Object(names.iter()
				.map(|(namespace, name)| (namespace.clone(), Value::String(name.clone())))
				.collect::<Map<_, _>>()),
		}
	}
}

impl NamedFieldAdapter for NamedAdapter {
	fn mapped<'n>(&self, named: &'n Named) -> Option<&'n str> {
		named.get(&self.mapped_namespace)
	}
}
