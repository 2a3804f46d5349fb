use anyhow::{anyhow, bail, Context, Result};
use java_string::{JavaStr, JavaString};
use crate::tree::class::ClassName;

/// An entry of the constant pool.
///
/// Floating point values are stored as their bits, so that they are written back exactly as read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolEntry {
	Utf8(JavaString),
	Integer(i32),
	Float(u32),
	Long(i64),
	Double(u64),
	Class { name_index: u16 },
	String { string_index: u16 },
	FieldRef { class_index: u16, name_and_type_index: u16 },
	MethodRef { class_index: u16, name_and_type_index: u16 },
	InterfaceMethodRef { class_index: u16, name_and_type_index: u16 },
	NameAndType { name_index: u16, descriptor_index: u16 },
	MethodHandle { reference_kind: u8, reference_index: u16 },
	MethodType { descriptor_index: u16 },
	Dynamic { bootstrap_method_attr_index: u16, name_and_type_index: u16 },
	InvokeDynamic { bootstrap_method_attr_index: u16, name_and_type_index: u16 },
	Module { name_index: u16 },
	Package { name_index: u16 },
}

impl PoolEntry {
	/// `Long` and `Double` entries take up two indices of the pool.
	pub(crate) fn is_wide(&self) -> bool {
		matches!(self, PoolEntry::Long(_) | PoolEntry::Double(_))
	}
}

/// The constant pool of a class, as read from the class file.
///
/// The index `0` and the index after a wide entry are unusable and hold `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool {
	pub(crate) entries: Vec<Option<PoolEntry>>,
}

impl Default for Pool {
	fn default() -> Self {
		Pool { entries: vec![None] }
	}
}

impl Pool {
	/// The `constant_pool_count` of this pool, one larger than the largest index.
	pub fn count(&self) -> usize {
		self.entries.len()
	}

	/// Adds an entry at the end of the pool, returning its index.
	pub fn push(&mut self, entry: PoolEntry) -> Result<u16> {
		let wide = entry.is_wide();
		let slots = if wide { 2 } else { 1 };
		// the count written out must still fit into an u16
		if self.entries.len() + slots > u16::MAX as usize {
			bail!("constant pool is full, can't add {entry:?}");
		}
		let index = self.entries.len() as u16;

		self.entries.push(Some(entry));
		if wide {
			self.entries.push(None);
		}

		Ok(index)
	}

	pub fn get(&self, index: u16) -> Result<&PoolEntry> {
		self.entries.get(index as usize)
			.and_then(Option::as_ref)
			.with_context(|| anyhow!("invalid constant pool index {index}"))
	}

	pub fn get_utf8(&self, index: u16) -> Result<&JavaStr> {
		match self.get(index)? {
			PoolEntry::Utf8(string) => Ok(string),
			entry => bail!("expected utf8 entry at constant pool index {index}, got {entry:?}"),
		}
	}

	pub fn get_class_name(&self, index: u16) -> Result<ClassName> {
		match self.get(index)? {
			&PoolEntry::Class { name_index } => {
				let name = self.get_utf8(name_index)?;
				ClassName::try_from(name.to_owned())
			},
			entry => bail!("expected class entry at constant pool index {index}, got {entry:?}"),
		}
	}

	/// Iterates over all usable entries, together with their index.
	pub fn iter(&self) -> impl Iterator<Item=(u16, &PoolEntry)> {
		self.entries.iter()
			.enumerate()
			.filter_map(|(index, entry)| Some((index as u16, entry.as_ref()?)))
	}
}
