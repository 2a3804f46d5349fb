use anyhow::{bail, Result};
use crate::macros::make_name;
use crate::tree::attribute::Attribute;
use crate::tree::field::Field;
use crate::tree::method::Method;
use crate::tree::pool::Pool;
use crate::tree::version::Version;
use crate::visitor::class::ClassVisitor;

/// Everything of a class that comes before the fields.
///
/// The constant pool is kept as read, so that any indices in raw attributes stay valid.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassHeader {
	pub version: Version,
	pub pool: Pool,
	pub access: u16,
	pub this_class: u16,
	pub super_class: u16,
	pub interfaces: Vec<u16>,
}

impl ClassHeader {
	/// Looks up the name of this class in the constant pool.
	pub fn name(&self) -> Result<ClassName> {
		self.pool.get_class_name(self.this_class)
	}
}

/// A class file in memory.
///
/// Use [`ClassFile::accept`] to pass it through a visitor chain, and the implementation of
/// [`ClassVisitor`] on `Option<ClassFile>` to create one from a visitor chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassFile {
	pub header: ClassHeader,
	pub fields: Vec<Field>,
	pub methods: Vec<Method>,
	pub attributes: Vec<Attribute>,
}

impl ClassFile {
	pub fn new(header: ClassHeader) -> ClassFile {
		ClassFile {
			header,
			fields: Vec::new(),
			methods: Vec::new(),
			attributes: Vec::new(),
		}
	}

	pub fn name(&self) -> Result<ClassName> {
		self.header.name()
	}

	pub fn accept<V: ClassVisitor>(self, mut visitor: V) -> Result<V> {
		visitor.visit_header(self.header)?;

		for field in self.fields {
			visitor.visit_field(field)?;
		}

		for method in self.methods {
			method.accept(&mut visitor)?;
		}

		for attribute in self.attributes {
			visitor.visit_attribute(attribute)?;
		}

		visitor.visit_end()?;

		Ok(visitor)
	}
}

make_name!(
	/// Represents a class name.
	///
	/// The class name uses [internal binary names](https://docs.oracle.com/javase/specs/jvms/se22/html/jvms-4.html#jvms-4.2.1),
	/// i.e. with the complete path written out and using slashes. Array class names are also valid.
	///
	/// # Examples
	/// ```
	/// use duke::tree::class::ClassName;
	/// let java_lang_thread = ClassName::try_from("java/lang/Thread").unwrap();
	/// assert_eq!(java_lang_thread.to_string(), "java/lang/Thread");
	///
	/// assert!(ClassName::try_from("java.lang.Thread").is_err());
	/// ```
	pub ClassName;
	is_valid(s) = if crate::tree::names::is_valid_class_name(s.as_bytes()) {
		Ok(())
	} else {
		bail!("invalid class name: must be either array field descriptor; or must consist out of `/` separated non-empty parts, and not contain any of `.`, `;`, `[`")
	};
);
