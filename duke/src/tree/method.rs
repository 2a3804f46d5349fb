use anyhow::{bail, Context, Result};
use crate::macros::make_name;
use crate::tree::attribute::Attribute;
use crate::tree::method::code::{Code, CodeAttribute, CodeBody, Lv, LvTable};
use crate::visitor::class::ClassVisitor;
use crate::visitor::method::MethodVisitor;

pub mod code;

/// A method of a class.
///
/// The attributes are kept in the order they were read in, with only the `Code` attribute being parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
	pub header: MethodHeader,
	pub attributes: Vec<MethodAttribute>,
}

/// Everything of a method that comes before its attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodHeader {
	pub access: u16,
	pub name: MethodName,
	pub descriptor: MethodDescriptor,
	/// The constant pool index of the name, if this was read from a class file.
	pub name_index: Option<u16>,
	/// The constant pool index of the descriptor, if this was read from a class file.
	pub descriptor_index: Option<u16>,
}

impl MethodHeader {
	pub fn new(access: u16, name: MethodName, descriptor: MethodDescriptor) -> MethodHeader {
		MethodHeader { access, name, descriptor, name_index: None, descriptor_index: None }
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum MethodAttribute {
	Raw(Attribute),
	Code(Code),
}

impl Method {
	pub fn new(access: u16, name: MethodName, descriptor: MethodDescriptor) -> Method {
		Method::from(MethodHeader::new(access, name, descriptor))
	}

	pub fn code(&self) -> Option<&Code> {
		self.attributes.iter()
			.find_map(|attribute| match attribute {
				MethodAttribute::Code(code) => Some(code),
				MethodAttribute::Raw(_) => None,
			})
	}

	/// Passes this method to the given class visitor.
	///
	/// If the class visitor doesn't want to visit this method, nothing happens.
	pub fn accept<V: ClassVisitor>(self, visitor: &mut V) -> Result<()> {
		let Some(mut method_visitor) = visitor.visit_method(self.header)? else {
			return Ok(());
		};

		for attribute in self.attributes {
			match attribute {
				MethodAttribute::Raw(attribute) => method_visitor.visit_attribute(attribute)?,
				MethodAttribute::Code(code) => {
					method_visitor.visit_code(code.body)?;
					for attribute in code.attributes {
						match attribute {
							CodeAttribute::Raw(attribute) => method_visitor.visit_code_attribute(attribute)?,
							CodeAttribute::LocalVariableTable(table) => method_visitor.visit_local_variable_table(table)?,
							CodeAttribute::LocalVariable(lv) => method_visitor.visit_local_variable(lv)?,
						}
					}
					method_visitor.visit_code_end()?;
				},
			}
		}

		method_visitor.visit_end()?;

		visitor.finish_method(method_visitor)
	}

	fn current_code(&mut self) -> Result<&mut Code> {
		let (name, descriptor) = (&self.header.name, &self.header.descriptor);
		match self.attributes.last_mut() {
			Some(MethodAttribute::Code(code)) => Ok(code),
			_ => bail!("code attribute contents visited outside of the code of method {name} {descriptor}"),
		}
	}
}

impl From<MethodHeader> for Method {
	fn from(header: MethodHeader) -> Self {
		Method { header, attributes: Vec::new() }
	}
}

impl MethodVisitor for Method {
	type Delegate = std::convert::Infallible;

	fn delegate(&mut self) -> Option<&mut Self::Delegate> {
		None
	}

	fn visit_attribute(&mut self, attribute: Attribute) -> Result<()> {
		self.attributes.push(MethodAttribute::Raw(attribute));
		Ok(())
	}

	fn visit_code(&mut self, body: CodeBody) -> Result<()> {
		if self.code().is_some() {
			bail!("method {} {} can't have two code attributes", self.header.name, self.header.descriptor);
		}
		self.attributes.push(MethodAttribute::Code(Code { body, attributes: Vec::new() }));
		Ok(())
	}

	fn visit_code_attribute(&mut self, attribute: Attribute) -> Result<()> {
		self.current_code()?.attributes.push(CodeAttribute::Raw(attribute));
		Ok(())
	}

	fn visit_local_variable_table(&mut self, table: LvTable) -> Result<()> {
		self.current_code()?.attributes.push(CodeAttribute::LocalVariableTable(table));
		Ok(())
	}

	fn visit_local_variable(&mut self, lv: Lv) -> Result<()> {
		self.current_code()?.attributes.push(CodeAttribute::LocalVariable(lv));
		Ok(())
	}

	fn visit_code_end(&mut self) -> Result<()> {
		self.current_code()
			.map(|_| ())
			.context("end of code visited without code")
	}

	fn visit_end(&mut self) -> Result<()> {
		Ok(())
	}
}

make_name!(
	/// A method name, either `<init>`, `<clinit>` or an unqualified name not containing `<` and `>`.
	pub MethodName;
	is_valid(s) = if crate::tree::names::is_valid_method_name(s.as_bytes()) {
		Ok(())
	} else {
		bail!("invalid method name: must be `<init>`, `<clinit>` or non-empty and not contain any of `.`, `;`, `[`, `/`, `<` and `>`")
	};
);

make_name!(
	/// A method descriptor, like `(ILjava/lang/String;)V`.
	pub MethodDescriptor;
	is_valid(s) = if crate::tree::names::is_valid_method_descriptor(s.as_bytes()) {
		Ok(())
	} else {
		bail!("invalid method descriptor")
	};
);
