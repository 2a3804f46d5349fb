use std::collections::HashMap;
use anyhow::{anyhow, Context, Result};
use java_string::{JavaStr, JavaString};
use crate::class_constants::pool;
use crate::ClassWrite;
use crate::jstring;
use crate::tree::pool::{Pool, PoolEntry};

/// A constant pool that's being written.
///
/// Starts out with the pool of the class that's written, and only ever adds entries at the end, so that all
/// indices already in use keep pointing to the same entries.
#[derive(Debug, Default)]
pub(super) struct PoolWrite {
	pool: Pool,
	utf8: HashMap<JavaString, u16>,
}

impl PoolWrite {
	pub(super) fn new(pool: Pool) -> PoolWrite {
		let mut utf8 = HashMap::new();
		for (index, entry) in pool.iter() {
			if let PoolEntry::Utf8(string) = entry {
				// the first entry wins, like it would when looking through the pool
				utf8.entry(string.clone()).or_insert(index);
			}
		}
		PoolWrite { pool, utf8 }
	}

	/// Returns the index of an utf8 entry with the given content, adding one if there's none yet.
	pub(super) fn put_utf8(&mut self, string: &JavaStr) -> Result<u16> {
		if let Some(&index) = self.utf8.get(string) {
			return Ok(index);
		}

		let owned = string.to_owned();
		let index = self.pool.push(PoolEntry::Utf8(owned.clone()))
			.with_context(|| anyhow!("failed to add utf8 entry {string:?}"))?;
		self.utf8.insert(owned, index);
		Ok(index)
	}

	/// Returns `index` if the utf8 entry there holds exactly the given content, otherwise works like
	/// [`PoolWrite::put_utf8`].
	///
	/// Keeps unchanged names pointing at the entry they were read from, even if the pool has the same string twice.
	pub(super) fn reuse_utf8(&mut self, index: Option<u16>, string: &JavaStr) -> Result<u16> {
		if let Some(index) = index {
			if self.pool.get_utf8(index).is_ok_and(|x| x == string) {
				return Ok(index);
			}
		}
		self.put_utf8(string)
	}

	pub(super) fn write(&self, writer: &mut impl ClassWrite) -> Result<()> {
		writer.write_usize_as_u16(self.pool.count())?;

		for (_, entry) in self.pool.iter() {
			match entry {
				PoolEntry::Utf8(string) => {
					writer.write_u8(pool::UTF8)?;
					let vec = jstring::from_string_to_vec(string);
					writer.write_usize_as_u16(vec.len())?;
					writer.write_u8_slice(&vec)?;
				},
				&PoolEntry::Integer(value) => {
					writer.write_u8(pool::INTEGER)?;
					writer.write_i32(value)?;
				},
				&PoolEntry::Float(bits) => {
					writer.write_u8(pool::FLOAT)?;
					writer.write_u32(bits)?;
				},
				&PoolEntry::Long(value) => {
					writer.write_u8(pool::LONG)?;
					writer.write_i64(value)?;
				},
				&PoolEntry::Double(bits) => {
					writer.write_u8(pool::DOUBLE)?;
					writer.write_u64(bits)?;
				},
				&PoolEntry::Class { name_index } => {
					writer.write_u8(pool::CLASS)?;
					writer.write_u16(name_index)?;
				},
				&PoolEntry::String { string_index } => {
					writer.write_u8(pool::STRING)?;
					writer.write_u16(string_index)?;
				},
				&PoolEntry::FieldRef { class_index, name_and_type_index } => {
					writer.write_u8(pool::FIELD_REF)?;
					writer.write_u16(class_index)?;
					writer.write_u16(name_and_type_index)?;
				},
				&PoolEntry::MethodRef { class_index, name_and_type_index } => {
					writer.write_u8(pool::METHOD_REF)?;
					writer.write_u16(class_index)?;
					writer.write_u16(name_and_type_index)?;
				},
				&PoolEntry::InterfaceMethodRef { class_index, name_and_type_index } => {
					writer.write_u8(pool::INTERFACE_METHOD_REF)?;
					writer.write_u16(class_index)?;
					writer.write_u16(name_and_type_index)?;
				},
				&PoolEntry::NameAndType { name_index, descriptor_index } => {
					writer.write_u8(pool::NAME_AND_TYPE)?;
					writer.write_u16(name_index)?;
					writer.write_u16(descriptor_index)?;
				},
				&PoolEntry::MethodHandle { reference_kind, reference_index } => {
					writer.write_u8(pool::METHOD_HANDLE)?;
					writer.write_u8(reference_kind)?;
					writer.write_u16(reference_index)?;
				},
				&PoolEntry::MethodType { descriptor_index } => {
					writer.write_u8(pool::METHOD_TYPE)?;
					writer.write_u16(descriptor_index)?;
				},
				&PoolEntry::Dynamic { bootstrap_method_attr_index, name_and_type_index } => {
					writer.write_u8(pool::DYNAMIC)?;
					writer.write_u16(bootstrap_method_attr_index)?;
					writer.write_u16(name_and_type_index)?;
				},
				&PoolEntry::InvokeDynamic { bootstrap_method_attr_index, name_and_type_index } => {
					writer.write_u8(pool::INVOKE_DYNAMIC)?;
					writer.write_u16(bootstrap_method_attr_index)?;
					writer.write_u16(name_and_type_index)?;
				},
				&PoolEntry::Module { name_index } => {
					writer.write_u8(pool::MODULE)?;
					writer.write_u16(name_index)?;
				},
				&PoolEntry::Package { name_index } => {
					writer.write_u8(pool::PACKAGE)?;
					writer.write_u16(name_index)?;
				},
			}
		}

		Ok(())
	}
}
