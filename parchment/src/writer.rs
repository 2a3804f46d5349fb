//! Writing a [`MappingTable`] back into a mapping document.

use serde_json::{Map, Value};
use crate::adapter::Adapters;
use crate::archive::RawDocument;
use crate::tree::{ClassEntry, FieldEntry, MappingTable, MethodEntry, ParameterEntry};

#[derive(Debug, Clone, Default)]
pub struct MappingSerializer {
	adapters: Adapters,
}

impl MappingSerializer {
	pub fn new(adapters: Adapters) -> MappingSerializer {
		MappingSerializer { adapters }
	}

	pub fn to_value(&self, table: &MappingTable) -> Value {
		let mut root = Map::new();
		root.insert("version".to_owned(), self.adapters.version.write(&table.version));
		if let Some(timestamp) = &table.timestamp {
			root.insert("timestamp".to_owned(), self.adapters.timestamp.write(timestamp));
		}

		if !table.packages.is_empty() {
			let packages = table.packages.iter()
				.map(|package| {
					let mut object = Map::new();
					object.insert("name".to_owned(), self.adapters.named.write(&package.name));
					put_javadoc(&mut object, &package.javadoc);
					Value::Object(object)
				})
				.collect();
			root.insert("packages".to_owned(), Value::Array(packages));
		}

		if !table.classes.is_empty() {
			let classes = table.classes.values().map(|class| self.class(class)).collect();
			root.insert("classes".to_owned(), Value::Array(classes));
		}

		Value::Object(root)
	}

	/// Writes the table as pretty printed JSON.
	pub fn to_document(&self, table: &MappingTable) -> serde_json::Result<RawDocument> {
		serde_json::to_vec_pretty(&self.to_value(table)).map(RawDocument::new)
	}

	fn class(&self, class: &ClassEntry) -> Value {
		let mut object = Map::new();
		object.insert("name".to_owned(), self.adapters.named.write(&class.name));
		put_javadoc(&mut object, &class.javadoc);

		if !class.fields.is_empty() {
			let fields = class.fields.values().map(|field| self.field(field)).collect();
			object.insert("fields".to_owned(), Value::Array(fields));
		}
		if !class.methods.is_empty() {
			let methods = class.methods.values().map(|method| self.method(method)).collect();
			object.insert("methods".to_owned(), Value::Array(methods));
		}

		Value::Object(object)
	}

	fn field(&self, field: &FieldEntry) -> Value {
		let mut object = Map::new();
		object.insert("name".to_owned(), self.adapters.named.write(&field.name));
		object.insert("descriptor".to_owned(), self.adapters.named.write(&field.descriptor));
		put_javadoc(&mut object, &field.javadoc);
		Value::Object(object)
	}

	fn method(&self, method: &MethodEntry) -> Value {
		let mut object = Map::new();
		object.insert("name".to_owned(), self.adapters.named.write(&method.name));
		object.insert("descriptor".to_owned(), self.adapters.named.write(&method.descriptor));
		put_javadoc(&mut object, &method.javadoc);

		if !method.parameters.is_empty() {
			let parameters = method.parameters.values().map(|parameter| self.parameter(parameter)).collect();
			object.insert("parameters".to_owned(), Value::Array(parameters));
		}

		Value::Object(object)
	}

	fn parameter(&self, parameter: &ParameterEntry) -> Value {
		let mut object = Map::new();
		object.insert("index".to_owned(), Value::from(parameter.index.get()));
		object.insert("name".to_owned(), self.adapters.named.write(parameter.name()));
		if let Some(javadoc) = &parameter.javadoc {
			object.insert("javadoc".to_owned(), Value::String(javadoc.clone()));
		}
		Value::Object(object)
	}
}

fn put_javadoc(object: &mut Map<String, Value>, javadoc: &[String]) {
	if !javadoc.is_empty() {
		let lines = javadoc.iter().cloned().map(Value::String).collect();
		object.insert("javadoc".to_owned(), Value::Array(lines));
	}
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use serde_json::json;
	use crate::reader::{MappingDeserializer, ParseError};
	use crate::writer::MappingSerializer;

	#[test]
	fn round_trip() -> Result<(), ParseError> {
		let value = json!({
			"version": "1.1.0",
			"timestamp": "2021-09-05T12:34:56+02:00",
			"packages": [ { "name": "a/b", "javadoc": ["Things."] } ],
			"classes": [
				{
					"name": "a/b/C",
					"fields": [ { "name": "d", "descriptor": "I", "javadoc": ["A count."] } ],
					"methods": [
						{
							"name": { "obfuscated": "e", "mojmap": "add" },
							"descriptor": "(I)I",
							"parameters": [ { "index": 1, "name": "amount", "javadoc": "How much." } ],
						},
					],
				},
			],
		});

		let table = MappingDeserializer::default().parse_value(&value)?;
		let written = MappingSerializer::default().to_value(&table);
		assert_eq!(written, value);

		let document = MappingSerializer::default().to_document(&table)
			.map_err(|e| ParseError::new(&crate::reader::JsonPath::root(), e.to_string()))?;
		assert_eq!(MappingDeserializer::default().parse(&document)?, table);
		Ok(())
	}

	#[test]
	fn single_line_javadoc_is_written_as_list() -> Result<(), ParseError> {
		let table = MappingDeserializer::default().parse_value(&json!({
			"version": "1.0.0",
			"classes": [ { "name": "a", "javadoc": "One line." } ],
		}))?;

		assert_eq!(MappingSerializer::default().to_value(&table), json!({
			"version": "1.0.0",
			"classes": [ { "name": "a", "javadoc": ["One line."] } ],
		}));
		Ok(())
	}
}
