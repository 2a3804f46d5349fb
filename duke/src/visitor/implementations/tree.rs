use std::convert::Infallible;
use anyhow::{bail, Context, Result};
use crate::tree::attribute::Attribute;
use crate::tree::class::{ClassFile, ClassHeader};
use crate::tree::field::Field;
use crate::tree::method::{Method, MethodHeader};
use crate::visitor::class::ClassVisitor;

/// Collects the visited class into a [`ClassFile`].
///
/// Start with `None`, after visiting a class this holds `Some` class.
impl ClassVisitor for Option<ClassFile> {
	type MethodVisitor = Method;
	type Delegate = Infallible;

	fn delegate(&mut self) -> Option<&mut Self::Delegate> {
		None
	}

	fn visit_header(&mut self, header: ClassHeader) -> Result<()> {
		if self.is_some() {
			bail!("can only collect one class");
		}
		*self = Some(ClassFile::new(header));
		Ok(())
	}

	fn visit_field(&mut self, field: Field) -> Result<()> {
		self.as_mut().context("field visited before the header")?
			.fields.push(field);
		Ok(())
	}

	fn visit_method(&mut self, header: MethodHeader) -> Result<Option<Self::MethodVisitor>> {
		Ok(Some(Method::from(header)))
	}

	fn finish_method(&mut self, method_visitor: Self::MethodVisitor) -> Result<()> {
		self.as_mut().context("method visited before the header")?
			.methods.push(method_visitor);
		Ok(())
	}

	fn visit_attribute(&mut self, attribute: Attribute) -> Result<()> {
		self.as_mut().context("attribute visited before the header")?
			.attributes.push(attribute);
		Ok(())
	}

	fn visit_end(&mut self) -> Result<()> {
		self.as_ref()
			.map(|_| ())
			.context("end visited without a class")
	}
}
