use std::convert::Infallible;
use anyhow::{anyhow, bail, Context, Result};
use java_string::JavaStr;
use crate::class_constants::{self, attribute};
use crate::class_writer::pool::PoolWrite;
use crate::ClassWrite;
use crate::tree::attribute::Attribute;
use crate::tree::class::ClassHeader;
use crate::tree::field::Field;
use crate::tree::method::{Method, MethodAttribute, MethodHeader};
use crate::tree::method::code::{Code, CodeAttribute, Lv, LvTable, LvTableKind};
use crate::visitor::class::ClassVisitor;

mod pool;

/// The end of a visitor chain, writing out the visited class.
///
/// The constant pool of the class is reused and only extended at the end when new strings are needed, so a class that
/// passes through unchanged is written out exactly as it was read.
#[derive(Debug, Default)]
pub struct ClassWriter {
	header: Option<ClassHeader>,
	pool: PoolWrite,
	fields_count: usize,
	fields: Vec<u8>,
	methods_count: usize,
	methods: Vec<u8>,
	attributes_count: usize,
	attributes: Vec<u8>,
}

impl ClassWriter {
	pub fn new() -> ClassWriter {
		ClassWriter::default()
	}

	/// Puts together the bytes of the class file.
	pub fn into_bytes(self) -> Result<Vec<u8>> {
		let header = self.header.context("can't write a class without a header")?;

		let mut bytes = Vec::new();
		bytes.write_u32(class_constants::MAGIC)?;
		bytes.write_u16(header.version.minor)?;
		bytes.write_u16(header.version.major)?;
		self.pool.write(&mut bytes)?;
		bytes.write_u16(header.access)?;
		bytes.write_u16(header.this_class)?;
		bytes.write_u16(header.super_class)?;
		bytes.write_slice(&header.interfaces, |w, size| w.write_usize_as_u16(size), |w, &interface| w.write_u16(interface))?;

		bytes.write_usize_as_u16(self.fields_count)?;
		bytes.write_u8_slice(&self.fields)?;
		bytes.write_usize_as_u16(self.methods_count)?;
		bytes.write_u8_slice(&self.methods)?;
		bytes.write_usize_as_u16(self.attributes_count)?;
		bytes.write_u8_slice(&self.attributes)?;

		Ok(bytes)
	}

	fn write_method(&mut self, method: Method) -> Result<()> {
		let Method { header, attributes } = method;
		let name_index = self.pool.reuse_utf8(header.name_index, header.name.as_java_str())?;
		let descriptor_index = self.pool.reuse_utf8(header.descriptor_index, header.descriptor.as_java_str())?;

		let mut written = Vec::with_capacity(attributes.len());
		for attribute in attributes {
			written.push(match attribute {
				MethodAttribute::Raw(attribute) => attribute,
				MethodAttribute::Code(code) => write_code(&mut self.pool, code)
					.with_context(|| anyhow!("failed to write code of method {} {}", header.name, header.descriptor))?,
			});
		}

		let writer = &mut self.methods;
		writer.write_u16(header.access)?;
		writer.write_u16(name_index)?;
		writer.write_u16(descriptor_index)?;
		writer.write_slice(&written, |w, size| w.write_usize_as_u16(size), write_attribute)?;

		self.methods_count += 1;
		Ok(())
	}
}

fn write_attribute(writer: &mut Vec<u8>, attribute: &Attribute) -> Result<()> {
	writer.write_u16(attribute.name_index)?;
	writer.write_usize_as_u32(attribute.info.len())?;
	writer.write_u8_slice(&attribute.info)
}

/// Writes the `Code` attribute.
///
/// Local variable entries go into the table started before them. Entries that don't fit that table, or that come
/// without one, start a new table of their own.
fn write_code(pool: &mut PoolWrite, code: Code) -> Result<Attribute> {
	let mut attributes = Vec::new();
	let mut table: Option<LocalVariableTableWrite> = None;

	for attribute in code.attributes {
		match attribute {
			CodeAttribute::Raw(attribute) => {
				if let Some(table) = table.take() {
					attributes.push(table.finish(pool)?);
				}
				attributes.push(attribute);
			},
			CodeAttribute::LocalVariableTable(start) => {
				if let Some(table) = table.replace(LocalVariableTableWrite::new(start)) {
					attributes.push(table.finish(pool)?);
				}
			},
			CodeAttribute::LocalVariable(lv) => {
				let kind = table_kind(&lv)?;
				if table.as_ref().is_some_and(|table| table.start.kind != kind) {
					if let Some(table) = table.take() {
						attributes.push(table.finish(pool)?);
					}
				}
				table.get_or_insert_with(|| LocalVariableTableWrite::new(LvTable { kind, name_index: None }))
					.put(pool, lv)?;
			},
		}
	}
	if let Some(table) = table.take() {
		attributes.push(table.finish(pool)?);
	}

	let body = code.body;
	let mut info = Vec::new();
	info.write_u16(body.max_stack)?;
	info.write_u16(body.max_locals)?;
	info.write_usize_as_u32(body.code.len())?;
	info.write_u8_slice(&body.code)?;
	info.write_slice(&body.exception_table, |w, size| w.write_usize_as_u16(size), |w, exception| {
		w.write_u16(exception.start)?;
		w.write_u16(exception.end)?;
		w.write_u16(exception.handler)?;
		w.write_u16(exception.catch_type)
	})?;
	info.write_slice(&attributes, |w, size| w.write_usize_as_u16(size), write_attribute)?;

	Ok(Attribute {
		name_index: pool.reuse_utf8(body.name_index, JavaStr::from_str(attribute::CODE))?,
		info,
	})
}

fn table_kind(lv: &Lv) -> Result<LvTableKind> {
	match (&lv.descriptor, &lv.signature) {
		(Some(_), _) => Ok(LvTableKind::LocalVariableTable),
		(None, Some(_)) => Ok(LvTableKind::LocalVariableTypeTable),
		(None, None) => bail!("local variable {} at index {} has neither a descriptor nor a signature", lv.name, lv.index.index),
	}
}

/// Collects the entries of one local variable table attribute.
struct LocalVariableTableWrite {
	start: LvTable,
	count: usize,
	entries: Vec<u8>,
}

impl LocalVariableTableWrite {
	fn new(start: LvTable) -> LocalVariableTableWrite {
		LocalVariableTableWrite { start, count: 0, entries: Vec::new() }
	}

	fn put(&mut self, pool: &mut PoolWrite, lv: Lv) -> Result<()> {
		let type_ = match self.start.kind {
			LvTableKind::LocalVariableTable => lv.descriptor.as_deref(),
			LvTableKind::LocalVariableTypeTable => lv.signature.as_deref(),
		}.context("local variable doesn't fit the kind of table")?;
		let type_index = pool.reuse_utf8(lv.type_index, type_)?;
		let name_index = pool.reuse_utf8(lv.name_index, &lv.name)?;

		let writer = &mut self.entries;
		writer.write_u16(lv.range.start().pc)?;
		writer.write_u16(lv.range.length())?;
		writer.write_u16(name_index)?;
		writer.write_u16(type_index)?;
		writer.write_u16(lv.index.index)?;

		self.count += 1;
		Ok(())
	}

	fn finish(self, pool: &mut PoolWrite) -> Result<Attribute> {
		let mut info = Vec::with_capacity(2 + self.entries.len());
		info.write_usize_as_u16(self.count)?;
		info.write_u8_slice(&self.entries)?;

		Ok(Attribute {
			name_index: pool.reuse_utf8(self.start.name_index, JavaStr::from_str(self.start.kind.attribute_name()))?,
			info,
		})
	}
}

impl ClassVisitor for ClassWriter {
	type MethodVisitor = Method;
	type Delegate = Infallible;

	fn delegate(&mut self) -> Option<&mut Self::Delegate> {
		None
	}

	fn visit_header(&mut self, mut header: ClassHeader) -> Result<()> {
		if self.header.is_some() {
			bail!("can only write one class");
		}
		self.pool = PoolWrite::new(std::mem::take(&mut header.pool));
		self.header = Some(header);
		Ok(())
	}

	fn visit_field(&mut self, field: Field) -> Result<()> {
		let writer = &mut self.fields;
		writer.write_u16(field.access)?;
		writer.write_u16(field.name_index)?;
		writer.write_u16(field.descriptor_index)?;
		writer.write_slice(&field.attributes, |w, size| w.write_usize_as_u16(size), write_attribute)?;

		self.fields_count += 1;
		Ok(())
	}

	fn visit_method(&mut self, header: MethodHeader) -> Result<Option<Self::MethodVisitor>> {
		Ok(Some(Method::from(header)))
	}

	fn finish_method(&mut self, method_visitor: Self::MethodVisitor) -> Result<()> {
		self.write_method(method_visitor)
	}

	fn visit_attribute(&mut self, attribute: Attribute) -> Result<()> {
		write_attribute(&mut self.attributes, &attribute)?;
		self.attributes_count += 1;
		Ok(())
	}

	fn visit_end(&mut self) -> Result<()> {
		if self.header.is_none() {
			bail!("end visited without a header");
		}
		Ok(())
	}
}
