// TODO: also impl this for the never type !, once that's stable
use std::convert::Infallible;
use anyhow::Result;
use crate::tree::method::MethodHeader;
use crate::visitor::class::ClassVisitor;
use crate::visitor::method::MethodVisitor;

impl ClassVisitor for Infallible {
	type MethodVisitor = Infallible;
	type Delegate = Infallible;

	fn delegate(&mut self) -> Option<&mut Self::Delegate> {
		match *self {}
	}

	fn visit_method(&mut self, _header: MethodHeader) -> Result<Option<Self::MethodVisitor>> {
		match *self {}
	}

	fn finish_method(&mut self, _method_visitor: Self::MethodVisitor) -> Result<()> {
		match *self {}
	}
}

impl MethodVisitor for Infallible {
	type Delegate = Infallible;

	fn delegate(&mut self) -> Option<&mut Self::Delegate> {
		match *self {}
	}
}
