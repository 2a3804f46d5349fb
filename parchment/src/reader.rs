//! Parsing a mapping document into a [`MappingTable`].
//!
//! The document is first read into a [`serde_json::Value`] and then walked by hand, so that every error can point
//! to the exact place in the document with a [`JsonPath`].

use std::fmt::{Display, Formatter};
use indexmap::map::Entry;
use log::debug;
use serde_json::{Map, Value};
use thiserror::Error;
use crate::adapter::Adapters;
use crate::archive::RawDocument;
use crate::named::Named;
use crate::tree::{ClassEntry, FieldEntry, MappingTable, MemberKey, MethodEntry, PackageEntry, ParameterEntry, SlotIndex};

/// A place in a JSON document, like `$.classes[0].methods[2].parameters`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPath(String);

impl JsonPath {
	pub fn root() -> JsonPath {
		JsonPath("$".to_owned())
	}

	pub fn key(&self, key: &str) -> JsonPath {
		JsonPath(format!("{}.{key}", self.0))
	}

	pub fn index(&self, index: usize) -> JsonPath {
		JsonPath(format!("{}[{index}]", self.0))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Display for JsonPath {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

/// The mapping document doesn't match the expected structure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("failed to parse mapping document at {path}: {reason}")]
pub struct ParseError {
	pub path: JsonPath,
	pub reason: String,
}

impl ParseError {
	pub fn new(path: &JsonPath, reason: impl Into<String>) -> ParseError {
		ParseError { path: path.clone(), reason: reason.into() }
	}
}

/// Parses mapping documents, with the given [`Adapters`] for the version, timestamp and name fields.
#[derive(Debug, Clone, Default)]
pub struct MappingDeserializer {
	adapters: Adapters,
}

impl MappingDeserializer {
	pub fn new(adapters: Adapters) -> MappingDeserializer {
		MappingDeserializer { adapters }
	}

	pub fn parse(&self, document: &RawDocument) -> Result<MappingTable, ParseError> {
		let value: Value = serde_json::from_slice(document.as_bytes())
			.map_err(|e| ParseError::new(&JsonPath::root(), format!("invalid json: {e}")))?;

		self.parse_value(&value)
	}

	pub fn parse_value(&self, value: &Value) -> Result<MappingTable, ParseError> {
		let path = JsonPath::root();
		let root = object(value, &path)?;

		let version_path = path.key("version");
		let version = self.adapters.version.read(required(root, "version", &path)?, &version_path)?;

		let mut table = MappingTable::new(version);

		if let Some(timestamp) = optional(root, "timestamp") {
			table.timestamp = Some(self.adapters.timestamp.read(timestamp, &path.key("timestamp"))?);
		}

		for (package, path) in optional_array(root, "packages", &path)? {
			let package = object(package, &path)?;
			table.packages.push(PackageEntry {
				name: self.adapters.named.read(required(package, "name", &path)?, &path.key("name"))?,
				javadoc: javadoc_lines(package, &path)?,
			});
		}

		for (class, path) in optional_array(root, "classes", &path)? {
			let (key, class) = self.parse_class(class, &path)?;
			match table.classes.entry(key) {
				Entry::Occupied(entry) => return Err(ParseError::new(&path, format!("duplicate class {:?}", entry.key()))),
				Entry::Vacant(entry) => { entry.insert(class); },
			}
		}

		debug!("parsed mapping document of version {} with {} classes", table.version, table.classes.len());

		Ok(table)
	}

	fn mapped_name(&self, name: &Named, path: &JsonPath) -> Result<String, ParseError> {
		self.adapters.named.mapped(name)
			.map(str::to_owned)
			.ok_or_else(|| ParseError::new(path, format!("no name in the mapped namespace in {name:?}")))
	}

	fn parse_class(&self, value: &Value, path: &JsonPath) -> Result<(String, ClassEntry), ParseError> {
		let class = object(value, path)?;

		let name_path = path.key("name");
		let name = self.adapters.named.read(required(class, "name", path)?, &name_path)?;
		let key = self.mapped_name(&name, &name_path)?;

		let mut entry = ClassEntry::new(name);
		entry.javadoc = javadoc_lines(class, path)?;

		for (field, path) in optional_array(class, "fields", path)? {
			let field = object(field, &path)?;
			let (key, name, descriptor) = self.parse_member_key(field, &path)?;
			let javadoc = javadoc_lines(field, &path)?;

			match entry.fields.entry(key) {
				Entry::Occupied(entry) => return Err(ParseError::new(&path, format!("duplicate field {}", entry.key()))),
				Entry::Vacant(entry) => { entry.insert(FieldEntry { name, descriptor, javadoc }); },
			}
		}

		for (method, path) in optional_array(class, "methods", path)? {
			let (key, method) = self.parse_method(method, &path)?;
			match entry.methods.entry(key) {
				Entry::Occupied(entry) => return Err(ParseError::new(&path, format!("duplicate method {}", entry.key()))),
				Entry::Vacant(entry) => { entry.insert(method); },
			}
		}

		Ok((key, entry))
	}

	fn parse_member_key(&self, member: &Map<String, Value>, path: &JsonPath) -> Result<(MemberKey, Named, Named), ParseError> {
		let name_path = path.key("name");
		let name = self.adapters.named.read(required(member, "name", path)?, &name_path)?;
		let descriptor_path = path.key("descriptor");
		let descriptor = self.adapters.named.read(required(member, "descriptor", path)?, &descriptor_path)?;

		let key = MemberKey::new(
			self.mapped_name(&name, &name_path)?,
			self.mapped_name(&descriptor, &descriptor_path)?,
		);
		Ok((key, name, descriptor))
	}

	fn parse_method(&self, value: &Value, path: &JsonPath) -> Result<(MemberKey, MethodEntry), ParseError> {
		let method = object(value, path)?;
		let (key, name, descriptor) = self.parse_member_key(method, path)?;

		let mut entry = MethodEntry::new(name, descriptor);
		entry.javadoc = javadoc_lines(method, path)?;

		for (parameter, path) in optional_array(method, "parameters", path)? {
			let parameter = self.parse_parameter(parameter, &path)?;
			match entry.parameters.entry(parameter.index) {
				Entry::Occupied(_) => return Err(ParseError::new(&path, format!("duplicate parameter at index {}", parameter.index))),
				Entry::Vacant(entry) => { entry.insert(parameter); },
			}
		}

		Ok((key, entry))
	}

	fn parse_parameter(&self, value: &Value, path: &JsonPath) -> Result<ParameterEntry, ParseError> {
		let parameter = object(value, path)?;

		let index_path = path.key("index");
		let index = required(parameter, "index", path)?
			.as_u64()
			.and_then(|index| SlotIndex::try_from(index).ok())
			.ok_or_else(|| ParseError::new(&index_path, "must be an integer from 0 to 255"))?;

		let name_path = path.key("name");
		let name = self.adapters.named.read(required(parameter, "name", path)?, &name_path)?;
		let mut entry = ParameterEntry::new(index, name, &*self.adapters.named)
			.map_err(|e| ParseError::new(&name_path, format!("{e:#}")))?;

		if let Some(javadoc) = optional(parameter, "javadoc") {
			entry.javadoc = Some(string(javadoc, &path.key("javadoc"))?.to_owned());
		}

		Ok(entry)
	}
}

pub(crate) fn object<'a>(value: &'a Value, path: &JsonPath) -> Result<&'a Map<String, Value>, ParseError> {
	value.as_object()
		.ok_or_else(|| ParseError::new(path, format!("expected an object, got {}", kind(value))))
}

pub(crate) fn string<'a>(value: &'a Value, path: &JsonPath) -> Result<&'a str, ParseError> {
	value.as_str()
		.ok_or_else(|| ParseError::new(path, format!("expected a string, got {}", kind(value))))
}

/// Gets a key of an object. A `null` value counts as absent.
fn optional<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
	object.get(key).filter(|value| !value.is_null())
}

fn required<'a>(object: &'a Map<String, Value>, key: &str, path: &JsonPath) -> Result<&'a Value, ParseError> {
	optional(object, key)
		.ok_or_else(|| ParseError::new(path, format!("missing required key {key:?}")))
}

/// Gets the elements of an array under the given key, together with their paths. An absent key is an empty array.
fn optional_array<'a>(object: &'a Map<String, Value>, key: &str, path: &JsonPath) -> Result<Vec<(&'a Value, JsonPath)>, ParseError> {
	let path = path.key(key);
	match optional(object, key) {
		None => Ok(Vec::new()),
		Some(Value::Array(array)) => Ok(array.iter()
			.enumerate()
			.map(|(index, value)| (value, path.index(index)))
			.collect()),
		Some(value) => Err(ParseError::new(&path, format!("expected an array, got {}", kind(value)))),
	}
}

/// Reads the `javadoc` key, which is either a list of lines, or a single line.
fn javadoc_lines(object: &Map<String, Value>, path: &JsonPath) -> Result<Vec<String>, ParseError> {
	let path = path.key("javadoc");
	match optional(object, "javadoc") {
		None => Ok(Vec::new()),
		Some(Value::String(line)) => Ok(vec![line.clone()]),
		Some(Value::Array(lines)) => lines.iter()
			.enumerate()
			.map(|(index, line)| string(line, &path.index(index)).map(str::to_owned))
			.collect(),
		Some(value) => Err(ParseError::new(&path, format!("expected a string or an array of strings, got {}", kind(value)))),
	}
}

pub(crate) fn kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}
