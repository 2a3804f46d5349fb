use anyhow::{anyhow, bail, Context, Result};
use crate::class_constants::{self, attribute};
use crate::ClassRead;
use crate::tree::attribute::Attribute;
use crate::tree::class::{ClassHeader, ClassName};
use crate::tree::field::Field;
use crate::tree::method::{MethodDescriptor, MethodHeader, MethodName};
use crate::tree::method::code::{CodeBody, Exception, LabelRange, Lv, LvIndex, LvTable, LvTableKind};
use crate::tree::pool::Pool;
use crate::tree::version::Version;
use crate::visitor::class::ClassVisitor;
use crate::visitor::method::MethodVisitor;

mod pool;

fn read_header(reader: &mut impl ClassRead) -> Result<ClassHeader> {
	let magic = reader.read_u32()?;
	if magic != class_constants::MAGIC {
		bail!("wrong magic: got {magic:#x}, expected 0xCAFEBABE");
	}

	let minor = reader.read_u16()?;
	let major = reader.read_u16()?;
	let version = Version::new(major, minor);

	let pool = pool::read_pool(reader)
		.with_context(|| anyhow!("failed to read constant pool of class file version {version}"))?;

	let access = reader.read_u16()?;
	let this_class = reader.read_u16()?;
	let super_class = reader.read_u16()?;
	let interfaces = reader.read_vec(
		|r| r.read_u16_as_usize(),
		|r| r.read_u16()
	)?;

	Ok(ClassHeader { version, pool, access, this_class, super_class, interfaces })
}

pub(crate) fn read_name(reader: &mut impl ClassRead) -> Result<ClassName> {
	read_header(reader)?.name()
}

pub(crate) fn read<V: ClassVisitor>(reader: &mut impl ClassRead, mut visitor: V) -> Result<V> {
	let header = read_header(reader)?;
	let class_name = header.name()?;
	// the header goes into the visitor chain, but we still need the names
	let pool = header.pool.clone();

	visitor.visit_header(header)?;

	let fields = reader.read_vec(
		|r| r.read_u16_as_usize(),
		|r| Ok(Field {
			access: r.read_u16()?,
			name_index: r.read_u16()?,
			descriptor_index: r.read_u16()?,
			attributes: read_attributes(r)?,
		})
	)?;
	for field in fields {
		visitor.visit_field(field)?;
	}

	for _ in 0..reader.read_u16()? {
		read_method(reader, &pool, &mut visitor)
			.with_context(|| anyhow!("in class {class_name}"))?;
	}

	for attribute in read_attributes(reader)? {
		visitor.visit_attribute(attribute)?;
	}

	visitor.visit_end()?;

	Ok(visitor)
}

fn read_attribute(reader: &mut impl ClassRead) -> Result<Attribute> {
	let name_index = reader.read_u16()?;
	let length = reader.read_u32_as_usize()?;
	let info = reader.read_u8_vec(length)?;
	Ok(Attribute { name_index, info })
}

fn read_attributes(reader: &mut impl ClassRead) -> Result<Vec<Attribute>> {
	reader.read_vec(
		|r| r.read_u16_as_usize(),
		|r| read_attribute(r)
	)
}

fn read_method<V: ClassVisitor>(reader: &mut impl ClassRead, pool: &Pool, visitor: &mut V) -> Result<()> {
	let access = reader.read_u16()?;
	let name_index = reader.read_u16()?;
	let name = MethodName::try_from(pool.get_utf8(name_index)?.to_owned())?;
	let descriptor_index = reader.read_u16()?;
	let descriptor = MethodDescriptor::try_from(pool.get_utf8(descriptor_index)?.to_owned())?;

	// the attributes must be read either way
	let attributes = read_attributes(reader)?;

	let header = MethodHeader {
		access,
		name: name.clone(),
		descriptor: descriptor.clone(),
		name_index: Some(name_index),
		descriptor_index: Some(descriptor_index),
	};
	let Some(mut method_visitor) = visitor.visit_method(header)? else {
		return Ok(());
	};

	for attribute in attributes {
		if pool.get_utf8(attribute.name_index)?.as_bytes() == attribute::CODE.as_bytes() {
			read_code(&mut attribute.info.as_slice(), attribute.name_index, pool, &mut method_visitor)
				.with_context(|| anyhow!("in code of method {name} {descriptor}"))?;
		} else {
			method_visitor.visit_attribute(attribute)?;
		}
	}

	method_visitor.visit_end()?;

	visitor.finish_method(method_visitor)
}

fn read_code(reader: &mut &[u8], name_index: u16, pool: &Pool, visitor: &mut impl MethodVisitor) -> Result<()> {
	let max_stack = reader.read_u16()?;
	let max_locals = reader.read_u16()?;
	let code_length = reader.read_u32_as_usize()?;
	if code_length == 0 || code_length > u16::MAX as usize {
		bail!("code length must be greater than zero and less than 65536, got {code_length}");
	}
	let code = reader.read_u8_vec(code_length)?;
	let exception_table = reader.read_vec(
		|r| r.read_u16_as_usize(),
		|r| Ok(Exception {
			start: r.read_u16()?,
			end: r.read_u16()?,
			handler: r.read_u16()?,
			catch_type: r.read_u16()?,
		})
	)?;

	visitor.visit_code(CodeBody { name_index: Some(name_index), max_stack, max_locals, code, exception_table })?;

	for attribute in read_attributes(reader)? {
		let name = pool.get_utf8(attribute.name_index)?.as_bytes();
		let kind = if name == attribute::LOCAL_VARIABLE_TABLE.as_bytes() {
			Some(LvTableKind::LocalVariableTable)
		} else if name == attribute::LOCAL_VARIABLE_TYPE_TABLE.as_bytes() {
			Some(LvTableKind::LocalVariableTypeTable)
		} else {
			None
		};

		match kind {
			Some(kind) => {
				visitor.visit_local_variable_table(LvTable { kind, name_index: Some(attribute.name_index) })?;
				read_local_variables(&mut attribute.info.as_slice(), kind, pool, visitor)
					.with_context(|| anyhow!("in {}", kind.attribute_name()))?;
			},
			None => visitor.visit_code_attribute(attribute)?,
		}
	}

	if !reader.is_empty() {
		bail!("{} bytes left over after reading code attribute", reader.len());
	}

	visitor.visit_code_end()
}

/// Reads the entries of a local variable table.
///
/// Only the layout is checked. Names, types and ranges are taken as they are, like the JVM does.
fn read_local_variables(reader: &mut &[u8], kind: LvTableKind, pool: &Pool, visitor: &mut impl MethodVisitor) -> Result<()> {
	for _ in 0..reader.read_u16()? {
		let start_pc = reader.read_u16()?;
		let length = reader.read_u16()?;
		let name_index = reader.read_u16()?;
		let type_index = reader.read_u16()?;
		let index = LvIndex { index: reader.read_u16()? };

		let name = pool.get_utf8(name_index)?.to_owned();
		let type_ = Some(pool.get_utf8(type_index)?.to_owned());
		let (descriptor, signature) = match kind {
			LvTableKind::LocalVariableTable => (type_, None),
			LvTableKind::LocalVariableTypeTable => (None, type_),
		};

		visitor.visit_local_variable(Lv {
			range: LabelRange::new(start_pc, length),
			name,
			descriptor,
			signature,
			index,
			name_index: Some(name_index),
			type_index: Some(type_index),
		})?;
	}

	if !reader.is_empty() {
		bail!("{} bytes left over after reading local variables", reader.len());
	}

	Ok(())
}
