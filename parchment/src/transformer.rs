//! The visitor stage that renames local variables, and [`ParchmentTransformer`] to make it.
//!
//! [`ParchmentTransformer::wrap`] puts a [`ParchmentClassVisitor`] in front of any class visitor. It looks up the class
//! in the [`MappingTable`] once, and wraps the method visitors of the delegate in an [`LvNamer`].

use std::sync::Arc;
use anyhow::{anyhow, Context, Result};
use log::trace;
use duke::tree::class::{ClassHeader, ClassName};
use duke::tree::method::MethodHeader;
use duke::visitor::class::ClassVisitor;
use crate::lv_namer::LvNamer;
use crate::tree::{ClassEntry, MappingTable};

/// Creates the visitor stages that rename local variables with a [`MappingTable`].
///
/// The table is shared, so cloning this is cheap, and all clones can be used from several threads at once.
#[derive(Debug, Clone)]
pub struct ParchmentTransformer(Arc<MappingTable>);

impl ParchmentTransformer {
	pub fn new(table: MappingTable) -> ParchmentTransformer {
		ParchmentTransformer(Arc::new(table))
	}

	pub fn table(&self) -> &MappingTable {
		&self.0
	}

	/// Checks if there's an entry for the given class.
	///
	/// A class without an entry is left unchanged by the stage returned from [`ParchmentTransformer::wrap`].
	pub fn covers(&self, class: &ClassName) -> bool {
		class.as_java_str().as_str().ok()
			.is_some_and(|name| self.0.classes.contains_key(name))
	}

	/// Puts a renaming stage in front of the given class visitor.
	pub fn wrap<C: ClassVisitor>(&self, inner: C) -> ParchmentClassVisitor<'_, C> {
		ParchmentClassVisitor {
			table: &self.0,
			class: None,
			delegate: inner,
		}
	}
}

impl From<Arc<MappingTable>> for ParchmentTransformer {
	fn from(value: Arc<MappingTable>) -> Self {
		ParchmentTransformer(value)
	}
}

/// The class visitor stage of a [`ParchmentTransformer`].
#[derive(Debug)]
pub struct ParchmentClassVisitor<'t, C> {
	table: &'t MappingTable,
	class: Option<&'t ClassEntry>,
	delegate: C,
}

impl<C> ParchmentClassVisitor<'_, C> {
	pub fn into_delegate(self) -> C {
		self.delegate
	}
}

impl<'t, C: ClassVisitor> ClassVisitor for ParchmentClassVisitor<'t, C> {
	type MethodVisitor = LvNamer<'t, C::MethodVisitor>;
	type Delegate = C;

	fn delegate(&mut self) -> Option<&mut Self::Delegate> {
		Some(&mut self.delegate)
	}

	fn visit_header(&mut self, header: ClassHeader) -> Result<()> {
		let name = header.name()
			.context("failed to look up the name of the class to rename local variables in")?;

		self.class = name.as_java_str().as_str().ok()
			.and_then(|name| self.table.class(name));
		if self.class.is_some() {
			trace!("found mappings for class {name}");
		}

		self.delegate.visit_header(header)
	}

	fn visit_method(&mut self, header: MethodHeader) -> Result<Option<Self::MethodVisitor>> {
		let method = self.class.and_then(|class| {
			let name = header.name.as_java_str().as_str().ok()?;
			let descriptor = header.descriptor.as_java_str().as_str().ok()?;
			class.method(name, descriptor)
		});

		let delegate = self.delegate.visit_method(header)?;
		Ok(delegate.map(|delegate| LvNamer::new(method, delegate)))
	}

	fn finish_method(&mut self, method_visitor: Self::MethodVisitor) -> Result<()> {
		self.delegate.finish_method(method_visitor.into_delegate())
			.with_context(|| anyhow!("failed to finish a renamed method"))
	}
}
