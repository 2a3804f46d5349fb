use anyhow::Result;
use crate::tree::attribute::Attribute;
use crate::tree::class::ClassHeader;
use crate::tree::field::Field;
use crate::tree::method::MethodHeader;
use crate::visitor::method::MethodVisitor;

/// Visits the parts of a class, in the order they appear in the class file.
///
/// The order of calls is:
/// - [`visit_header`][ClassVisitor::visit_header] once,
/// - [`visit_field`][ClassVisitor::visit_field] for each field,
/// - [`visit_method`][ClassVisitor::visit_method] for each method, each followed by the events for that method,
///   and [`finish_method`][ClassVisitor::finish_method] if a method visitor was returned,
/// - [`visit_attribute`][ClassVisitor::visit_attribute] for each attribute of the class,
/// - [`visit_end`][ClassVisitor::visit_end] once.
pub trait ClassVisitor: Sized {
	type MethodVisitor: MethodVisitor;
	/// The next visitor in the chain, use [`Infallible`][std::convert::Infallible] if there is none.
	type Delegate: ClassVisitor;

	fn delegate(&mut self) -> Option<&mut Self::Delegate>;

	fn visit_header(&mut self, header: ClassHeader) -> Result<()> {
		match self.delegate() {
			Some(delegate) => delegate.visit_header(header),
			None => Ok(()),
		}
	}

	fn visit_field(&mut self, field: Field) -> Result<()> {
		match self.delegate() {
			Some(delegate) => delegate.visit_field(field),
			None => Ok(()),
		}
	}

	/// Starts visiting a method.
	///
	/// Returning `None` drops the method: none of its events are visited, and it's gone from the output.
	fn visit_method(&mut self, header: MethodHeader) -> Result<Option<Self::MethodVisitor>>;
	fn finish_method(&mut self, method_visitor: Self::MethodVisitor) -> Result<()>;

	fn visit_attribute(&mut self, attribute: Attribute) -> Result<()> {
		match self.delegate() {
			Some(delegate) => delegate.visit_attribute(attribute),
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
