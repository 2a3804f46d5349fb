use anyhow::Result;
use crate::tree::attribute::Attribute;
use crate::tree::method::code::{CodeBody, Lv, LvTable};

/// Visits the attributes of a method, in the order they appear in the class file.
///
/// A `Code` attribute is visited as [`visit_code`][MethodVisitor::visit_code], followed by its own attributes
/// and [`visit_code_end`][MethodVisitor::visit_code_end]. A `LocalVariableTable` or `LocalVariableTypeTable` is
/// visited as [`visit_local_variable_table`][MethodVisitor::visit_local_variable_table], followed by each of its
/// entries on its own with [`visit_local_variable`][MethodVisitor::visit_local_variable].
pub trait MethodVisitor: Sized {
	type Delegate: MethodVisitor;

	fn delegate(&mut self) -> Option<&mut Self::Delegate>;

	fn visit_attribute(&mut self, attribute: Attribute) -> Result<()> {
		match self.delegate() {
			Some(delegate) => delegate.visit_attribute(attribute),
			None => Ok(()),
		}
	}

	fn visit_code(&mut self, body: CodeBody) -> Result<()> {
		match self.delegate() {
			Some(delegate) => delegate.visit_code(body),
			None => Ok(()),
		}
	}

	fn visit_code_attribute(&mut self, attribute: Attribute) -> Result<()> {
		match self.delegate() {
			Some(delegate) => delegate.visit_code_attribute(attribute),
			None => Ok(()),
		}
	}

	fn visit_local_variable_table(&mut self, table: LvTable) -> Result<()> {
		match self.delegate() {
			Some(delegate) => delegate.visit_local_variable_table(table),
			None => Ok(()),
		}
	}

	fn visit_local_variable(&mut self, lv: Lv) -> Result<()> {
		match self.delegate() {
			Some(delegate) => delegate.visit_local_variable(lv),
			None => Ok(()),
		}
	}

	fn visit_code_end(&mut self) -> Result<()> {
		match self.delegate() {
			Some(delegate) => delegate.visit_code_end(),
			None => Ok(()),
		}
	}

	fn visit_end(&mut self) -> Result<()> {
		match self.delegate() {
			Some(delegate) => delegate.visit_end(),
			None => Ok(()),
		}
	}
}
