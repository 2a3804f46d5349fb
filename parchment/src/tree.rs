//! The in-memory form of a mapping document.
//!
//! A [`MappingTable`] is never changed after parsing, share it with an [`Arc`][std::sync::Arc].

use std::fmt::{Display, Formatter};
use anyhow::{anyhow, Context, Result};
use indexmap::{Equivalent, IndexMap};
use duke::tree::method::code::{LocalVariableName, LvIndex};
use crate::adapter::NamedFieldAdapter;
use crate::named::Named;
use crate::timestamp::Timestamp;
use crate::version::SimpleVersion;

#[derive(Debug, Clone, PartialEq)]
pub struct MappingTable {
	pub version: SimpleVersion,
	pub timestamp: Option<Timestamp>,
	pub packages: Vec<PackageEntry>,
	/// The classes, keyed by their mapped internal name, like `net/minecraft/world/entity/Entity`.
	pub classes: IndexMap<String, ClassEntry>,
}

impl MappingTable {
	pub fn new(version: SimpleVersion) -> MappingTable {
		MappingTable {
			version,
			timestamp: None,
			packages: Vec::new(),
			classes: IndexMap::new(),
		}
	}

	pub fn class(&self, name: &str) -> Option<&ClassEntry> {
		self.classes.get(name)
	}

	pub fn method(&self, class: &str, name: &str, descriptor: &str) -> Option<&MethodEntry> {
		self.class(class)?.method(name, descriptor)
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct PackageEntry {
	pub name: Named,
	pub javadoc: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassEntry {
	pub name: Named,
	pub javadoc: Vec<String>,
	pub fields: IndexMap<MemberKey, FieldEntry>,
	pub methods: IndexMap<MemberKey, MethodEntry>,
}

impl ClassEntry {
	pub fn new(name: Named) -> ClassEntry {
		ClassEntry {
			name,
			javadoc: Vec::new(),
			fields: IndexMap::new(),
			methods: IndexMap::new(),
		}
	}

	pub fn method(&self, name: &str, descriptor: &str) -> Option<&MethodEntry> {
		self.methods.get(&MemberKeyRef { name, descriptor })
	}

	pub fn field(&self, name: &str, descriptor: &str) -> Option<&FieldEntry> {
		self.fields.get(&MemberKeyRef { name, descriptor })
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldEntry {
	pub name: Named,
	pub descriptor: Named,
	pub javadoc: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodEntry {
	pub name: Named,
	pub descriptor: Named,
	pub javadoc: Vec<String>,
	pub parameters: IndexMap<SlotIndex, ParameterEntry>,
}

impl MethodEntry {
	pub fn new(name: Named, descriptor: Named) -> MethodEntry {
		MethodEntry {
			name,
			descriptor,
			javadoc: Vec::new(),
			parameters: IndexMap::new(),
		}
	}

	pub fn parameter(&self, slot: SlotIndex) -> Option<&ParameterEntry> {
		self.parameters.get(&slot)
	}
}

/// A parameter of a method, or any other local variable, by its slot.
///
/// The name the local variable gets is taken from the names once, when creating the entry, so the two can't disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterEntry {
	pub index: SlotIndex,
	name: Named,
	mapped: LocalVariableName,
	pub javadoc: Option<String>,
}

impl ParameterEntry {
	/// Creates an entry, with the name in the mapped namespace of `adapter` as the name to rename to.
	///
	/// Fails if there's no such name, or if it isn't a valid local variable name.
	pub fn new(index: SlotIndex, name: Named, adapter: &dyn NamedFieldAdapter) -> Result<ParameterEntry> {
		let mapped = adapter.mapped(&name)
			.with_context(|| anyhow!("no name in the mapped namespace in {name:?}"))?;
		let mapped = LocalVariableName::try_from(mapped)?;

		Ok(ParameterEntry { index, name, mapped, javadoc: None })
	}

	pub fn name(&self) -> &Named {
		&self.name
	}

	/// The name to give to the local variable in this slot.
	pub fn mapped(&self) -> &LocalVariableName {
		&self.mapped
	}
}

/// The mapped name and descriptor of a field or method, identifying it inside its class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberKey {
	pub name: String,
	pub descriptor: String,
}

impl MemberKey {
	pub fn new(name: impl Into<String>, descriptor: impl Into<String>) -> MemberKey {
		MemberKey { name: name.into(), descriptor: descriptor.into() }
	}
}

impl Display for MemberKey {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} {}", self.name, self.descriptor)
	}
}

/// Looks up a [`MemberKey`] without allocating. Hashes exactly like it.
#[derive(Hash)]
struct MemberKeyRef<'a> {
	name: &'a str,
	descriptor: &'a str,
}

impl Equivalent<MemberKey> for MemberKeyRef<'_> {
	fn equivalent(&self, key: &MemberKey) -> bool {
		self.name == key.name && self.descriptor == key.descriptor
	}
}

/// The index of a local variable slot in the frame of a method, `0` to `255`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotIndex(u8);

impl SlotIndex {
	pub const fn new(index: u8) -> SlotIndex {
		SlotIndex(index)
	}

	pub fn get(self) -> u8 {
		self.0
	}
}

impl From<u8> for SlotIndex {
	fn from(value: u8) -> Self {
		SlotIndex(value)
	}
}

macro_rules! slot_index_try_from {
	($($ty:ty),*) => {
		$(
			impl TryFrom<$ty> for SlotIndex {
				type Error = std::num::TryFromIntError;

				fn try_from(value: $ty) -> Result<Self, Self::Error> {
					u8::try_from(value).map(SlotIndex)
				}
			}
		)*
	}
}

slot_index_try_from!(u16, u32, u64, usize, i32, i64);

impl TryFrom<LvIndex> for SlotIndex {
	type Error = std::num::TryFromIntError;

	fn try_from(value: LvIndex) -> Result<Self, Self::Error> {
		SlotIndex::try_from(value.index)
	}
}

impl Display for SlotIndex {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

#[cfg(test)]
mod testing {
	use pretty_assertions::assert_eq;
	use duke::tree::method::code::LvIndex;
	use crate::adapter::NamedAdapter;
	use crate::named::Named;
	use crate::tree::{ClassEntry, MemberKey, MethodEntry, ParameterEntry, SlotIndex};

	#[test]
	fn slot_index_bounds() {
		assert_eq!(SlotIndex::try_from(255u16), Ok(SlotIndex::new(255)));
		assert!(SlotIndex::try_from(256u16).is_err());
		assert!(SlotIndex::try_from(-1i64).is_err());
		assert!(SlotIndex::try_from(LvIndex { index: 300 }).is_err());
		assert_eq!(SlotIndex::try_from(LvIndex { index: 2 }).map(SlotIndex::get), Ok(2));
	}

	#[test]
	fn method_lookup_by_name_and_descriptor() {
		let mut class = ClassEntry::new(Named::Plain("a/B".to_owned()));
		let method = MethodEntry::new(Named::Plain("add".to_owned()), Named::Plain("(I)I".to_owned()));
		class.methods.insert(MemberKey::new("add", "(I)I"), method.clone());

		assert_eq!(class.method("add", "(I)I"), Some(&method));
		assert_eq!(class.method("add", "(J)J"), None);
		assert_eq!(class.method("sub", "(I)I"), None);
	}

	#[test]
	fn parameter_takes_the_mapped_name() -> anyhow::Result<()> {
		let adapter = NamedAdapter::default();
		let names = Named::Namespaced([("obfuscated", "a"), ("mojmap", "count")]
			.into_iter()
			.map(|(namespace, name)| (namespace.to_owned(), name.to_owned()))
			.collect());

		let parameter = ParameterEntry::new(SlotIndex::new(1), names.clone(), &adapter)?;
		assert_eq!(parameter.name(), &names);
		assert_eq!(parameter.mapped().to_string(), "count");

		let other = NamedAdapter { mapped_namespace: "obfuscated".to_owned() };
		assert_eq!(ParameterEntry::new(SlotIndex::new(1), names, &other)?.mapped().to_string(), "a");

		let missing = Named::Namespaced([("obfuscated".to_owned(), "a".to_owned())].into_iter().collect());
		assert!(ParameterEntry::new(SlotIndex::new(1), missing, &adapter).is_err());
		assert!(ParameterEntry::new(SlotIndex::new(1), Named::from("a.b"), &adapter).is_err());
		Ok(())
	}
}
