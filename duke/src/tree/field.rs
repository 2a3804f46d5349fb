use crate::tree::attribute::Attribute;

/// A field of a class, with the name and descriptor kept as indices into the constant pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
	pub access: u16,
	pub name_index: u16,
	pub descriptor_index: u16,
	pub attributes: Vec<Attribute>,
}
