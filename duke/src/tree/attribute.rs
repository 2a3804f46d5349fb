/// An attribute that is passed through the visitor chain as is.
///
/// The name is only stored as the index into the constant pool of the class it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
	pub name_index: u16,
	pub info: Vec<u8>,
}
