use anyhow::{bail, Result};
use crate::class_constants::pool;
use crate::ClassRead;
use crate::jstring;
use crate::tree::pool::{Pool, PoolEntry};

/// Reads the `constant_pool_count` and the entries of the constant pool.
pub(super) fn read_pool(reader: &mut impl ClassRead) -> Result<Pool> {
	let count = reader.read_u16_as_usize()?;
	if count == 0 {
		bail!("constant pool count must be at least one");
	}

	let mut entries = Vec::with_capacity(count);
	entries.push(None);

	while entries.len() < count {
		let tag = reader.read_u8()?;
		let entry = match tag {
			pool::UTF8 => {
				let length = reader.read_u16_as_usize()?;
				let vec = reader.read_u8_vec(length)?;
				PoolEntry::Utf8(jstring::from_vec_to_string(vec)?)
			},
			pool::INTEGER => PoolEntry::Integer(reader.read_i32()?),
			pool::FLOAT => PoolEntry::Float(reader.read_u32()?),
			pool::LONG => PoolEntry::Long(reader.read_i64()?),
			pool::DOUBLE => PoolEntry::Double(reader.read_u64()?),
			pool::CLASS => {
				let name_index = reader.read_u16()?;
				PoolEntry::Class { name_index }
			},
			pool::STRING => {
				let string_index = reader.read_u16()?;
				PoolEntry::String { string_index }
			},
			pool::FIELD_REF => {
				let class_index = reader.read_u16()?;
				let name_and_type_index = reader.read_u16()?;
				PoolEntry::FieldRef { class_index, name_and_type_index }
			},
			pool::METHOD_REF => {
				let class_index = reader.read_u16()?;
				let name_and_type_index = reader.read_u16()?;
				PoolEntry::MethodRef { class_index, name_and_type_index }
			},
			pool::INTERFACE_METHOD_REF => {
				let class_index = reader.read_u16()?;
				let name_and_type_index = reader.read_u16()?;
				PoolEntry::InterfaceMethodRef { class_index, name_and_type_index }
			},
			pool::NAME_AND_TYPE => {
				let name_index = reader.read_u16()?;
				let descriptor_index = reader.read_u16()?;
				PoolEntry::NameAndType { name_index, descriptor_index }
			},
			pool::METHOD_HANDLE => {
				let reference_kind = reader.read_u8()?;
				let reference_index = reader.read_u16()?;
				PoolEntry::MethodHandle { reference_kind, reference_index }
			},
			pool::METHOD_TYPE => {
				let descriptor_index = reader.read_u16()?;
				PoolEntry::MethodType { descriptor_index }
			},
			pool::DYNAMIC => {
				let bootstrap_method_attr_index = reader.read_u16()?;
				let name_and_type_index = reader.read_u16()?;
				PoolEntry::Dynamic { bootstrap_method_attr_index, name_and_type_index }
			},
			pool::INVOKE_DYNAMIC => {
				let bootstrap_method_attr_index = reader.read_u16()?;
				let name_and_type_index = reader.read_u16()?;
				PoolEntry::InvokeDynamic { bootstrap_method_attr_index, name_and_type_index }
			},
			pool::MODULE => {
				let name_index = reader.read_u16()?;
				PoolEntry::Module { name_index }
			},
			pool::PACKAGE => {
				let name_index = reader.read_u16()?;
				PoolEntry::Package { name_index }
			},
			tag => bail!("unknown constant pool tag {tag} at pool index {}", entries.len()),
		};

		let wide = entry.is_wide();
		entries.push(Some(entry));
		if wide {
			if entries.len() >= count {
				bail!("wide constant pool entry at index {} doesn't fit into the pool", entries.len() - 1);
			}
			entries.push(None);
		}
	}

	Ok(Pool { entries })
}
