use anyhow::bail;
use java_string::JavaString;
use crate::class_constants::attribute;
use crate::macros::make_name;
use crate::tree::attribute::Attribute;

/// Represents the code of a method, as stored in the `Code` attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Code {
	pub body: CodeBody,
	/// The attributes of the `Code` attribute, in the order they were read.
	pub attributes: Vec<CodeAttribute>,
}

impl Code {
	pub fn local_variables(&self) -> impl Iterator<Item=&Lv> {
		self.attributes.iter()
			.filter_map(|attribute| match attribute {
				CodeAttribute::LocalVariable(lv) => Some(lv),
				CodeAttribute::Raw(_) | CodeAttribute::LocalVariableTable(_) => None,
			})
	}
}

/// The part of the `Code` attribute that comes before its attributes.
///
/// The bytecode isn't parsed, it's kept as the raw `code` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBody {
	/// The constant pool index of the attribute name `Code`, if this was read from a class file.
	pub name_index: Option<u16>,
	pub max_stack: u16,
	pub max_locals: u16,
	pub code: Vec<u8>,
	pub exception_table: Vec<Exception>,
}

/// An entry of the exception table, with all bytecode offsets as read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exception {
	pub start: u16,
	pub end: u16,
	pub handler: u16,
	/// The constant pool index of the class to catch, or `0` for catching anything.
	pub catch_type: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CodeAttribute {
	Raw(Attribute),
	/// The start of a `LocalVariableTable` or `LocalVariableTypeTable`. The entries of it follow.
	LocalVariableTable(LvTable),
	/// An entry of either the `LocalVariableTable` or the `LocalVariableTypeTable`.
	LocalVariable(Lv),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LvTableKind {
	LocalVariableTable,
	LocalVariableTypeTable,
}

impl LvTableKind {
	pub fn attribute_name(self) -> &'static str {
		match self {
			LvTableKind::LocalVariableTable => attribute::LOCAL_VARIABLE_TABLE,
			LvTableKind::LocalVariableTypeTable => attribute::LOCAL_VARIABLE_TYPE_TABLE,
		}
	}
}

/// Starts a local variable table attribute.
///
/// Tables are visited even if they have no entries, so that writing them out again gives the same attributes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LvTable {
	pub kind: LvTableKind,
	/// The constant pool index of the attribute name, if this was read from a class file.
	pub name_index: Option<u16>,
}

/// Represents an index of a local variable.
///
/// If the local variable is of type `double` or `long`, it also occupies
/// the [`LvIndex`] with `index = index + 1`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LvIndex {
	pub index: u16,
}

/// A local variable entry.
///
/// Entries coming from the `LocalVariableTable` have a descriptor and no signature, the ones from the
/// `LocalVariableTypeTable` have a signature and no descriptor. When writing, an entry with a descriptor
/// ends up in the `LocalVariableTable`, and one with only a signature ends up in the `LocalVariableTypeTable`.
///
/// This is debug info the JVM never checks, so the name, the types and the range are kept exactly as read, even if
/// they aren't valid. The writer only reuses `name_index` and `type_index` if the constant pool entry there still
/// holds the same string.
#[derive(Debug, Clone, PartialEq)]
pub struct Lv {
	pub range: LabelRange,
	pub name: JavaString,
	pub descriptor: Option<JavaString>,
	pub signature: Option<JavaString>,
	pub index: LvIndex,
	pub name_index: Option<u16>,
	/// The index of either the descriptor or the signature, depending on the table this was read from.
	pub type_index: Option<u16>,
}

impl Lv {
	/// Creates an entry for the `LocalVariableTable`.
	pub fn new(range: LabelRange, name: impl Into<JavaString>, descriptor: impl Into<JavaString>, index: LvIndex) -> Lv {
		Lv {
			range,
			name: name.into(),
			descriptor: Some(descriptor.into()),
			signature: None,
			index,
			name_index: None,
			type_index: None,
		}
	}
}

/// Represents a bytecode offset inside the `code` array.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label {
	pub pc: u16,
}

/// Represents a range of bytecode offsets, as a start and a length.
///
/// The range isn't checked against the code it belongs to, and may even end after it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LabelRange {
	start: Label,
	length: u16,
}

impl LabelRange {
	pub fn new(start_pc: u16, length: u16) -> LabelRange {
		LabelRange { start: Label { pc: start_pc }, length }
	}

	pub fn start(&self) -> Label {
		self.start
	}

	pub fn length(&self) -> u16 {
		self.length
	}

	/// The offset right after the range, which doesn't always fit an `u16`.
	pub fn end_pc(&self) -> u32 {
		u32::from(self.start.pc) + u32::from(self.length)
	}
}

make_name!(
	/// The name of a local variable, an unqualified name.
	pub LocalVariableName;
	is_valid(s) = if crate::tree::names::is_valid_unqualified_name(s.as_bytes()) {
		Ok(())
	} else {
		bail!("invalid local variable name: must be non-empty and not contain any of `.`, `;`, `[` and `/`")
	};
);
