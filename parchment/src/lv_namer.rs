//! Renaming the local variables of a single method.

use anyhow::Result;
use log::trace;
use duke::tree::method::code::Lv;
use duke::visitor::method::MethodVisitor;
use crate::tree::{MethodEntry, SlotIndex};

/// A method visitor stage giving local variables the names from a [`MethodEntry`].
///
/// Local variables whose slot has no parameter entry, and every other event, are forwarded unchanged. Without
/// a method entry, this forwards everything unchanged.
#[derive(Debug)]
pub struct LvNamer<'t, M> {
	method: Option<&'t MethodEntry>,
	delegate: M,
}

impl<'t, M> LvNamer<'t, M> {
	pub fn new(method: Option<&'t MethodEntry>, delegate: M) -> LvNamer<'t, M> {
		LvNamer { method, delegate }
	}

	pub fn into_delegate(self) -> M {
		self.delegate
	}
}

impl<M: MethodVisitor> MethodVisitor for LvNamer<'_, M> {
	type Delegate = M;

	fn delegate(&mut self) -> Option<&mut Self::Delegate> {
		Some(&mut self.delegate)
	}

	fn visit_local_variable(&mut self, mut lv: Lv) -> Result<()> {
		let parameter = self.method
			.zip(SlotIndex::try_from(lv.index).ok())
			.and_then(|(method, slot)| method.parameter(slot));

		if let Some(parameter) = parameter {
			trace!("renaming local variable {} at index {} to {}", lv.name, lv.index.index, parameter.mapped());
			lv.name = parameter.mapped().as_java_str().to_owned();
		}

		self.delegate.visit_local_variable(lv)
	}
}

#[cfg(test)]
mod testing {
	use anyhow::Result;
	use java_string::JavaString;
	use pretty_assertions::assert_eq;
	use duke::tree::method::{Method, MethodDescriptor, MethodName};
	use duke::tree::method::code::{CodeBody, LabelRange, Lv, LvIndex, LvTable, LvTableKind};
	use duke::visitor::method::MethodVisitor;
	use crate::adapter::NamedAdapter;
	use crate::lv_namer::LvNamer;
	use crate::named::Named;
	use crate::tree::{MethodEntry, ParameterEntry, SlotIndex};

	fn lv(name: &str, index: u16) -> Lv {
		Lv::new(LabelRange::new(0, 4), name, "I", LvIndex { index })
	}

	fn entry(parameters: &[(u8, &str)]) -> Result<MethodEntry> {
		let mut entry = MethodEntry::new(Named::from("add"), Named::from("(II)I"));
		for &(index, name) in parameters {
			let index = SlotIndex::new(index);
			entry.parameters.insert(index, ParameterEntry::new(index, Named::from(name), &NamedAdapter::default())?);
		}
		Ok(entry)
	}

	fn run(method: Option<&MethodEntry>, lvs: Vec<Lv>) -> Result<Method> {
		let recorder = Method::new(0, MethodName::try_from("add")?, MethodDescriptor::try_from("(II)I")?);
		let mut namer = LvNamer::new(method, recorder);

		namer.visit_code(CodeBody {
			name_index: None,
			max_stack: 1,
			max_locals: 3,
			code: vec![0x1b, 0x3d, 0x1c, 0xac],
			exception_table: Vec::new(),
		})?;
		namer.visit_local_variable_table(LvTable { kind: LvTableKind::LocalVariableTable, name_index: None })?;
		for lv in lvs {
			namer.visit_local_variable(lv)?;
		}
		namer.visit_code_end()?;
		namer.visit_end()?;

		Ok(namer.into_delegate())
	}

	fn names(method: &Method) -> Vec<String> {
		method.code()
			.map(|code| code.local_variables().map(|lv| lv.name.to_string()).collect())
			.unwrap_or_default()
	}

	#[test]
	fn renames_matching_slots() -> Result<()> {
		let entry = entry(&[(1, "count")])?;
		let method = run(Some(&entry), vec![lv("this", 0), lv("var1", 1), lv("var2", 2)])?;

		assert_eq!(names(&method), vec!["this", "count", "var2"]);
		Ok(())
	}

	#[test]
	fn everything_else_is_unchanged() -> Result<()> {
		let entry = entry(&[(1, "count")])?;
		let mut typed = lv("var1", 1);
		typed.descriptor = None;
		typed.signature = Some(JavaString::from("TT;"));
		typed.name_index = Some(11);
		typed.type_index = Some(12);

		let method = run(Some(&entry), vec![typed.clone()])?;
		let renamed = method.code().and_then(|code| code.local_variables().next()).cloned();

		typed.name = JavaString::from("count");
		assert_eq!(renamed, Some(typed));
		Ok(())
	}

	#[test]
	fn without_entry_nothing_changes() -> Result<()> {
		let lvs = vec![lv("this", 0), lv("var1", 1)];

		let method = run(None, lvs.clone())?;
		let expected = run(Some(&entry(&[])?), lvs)?;

		assert_eq!(names(&method), vec!["this", "var1"]);
		assert_eq!(method.code(), expected.code());
		Ok(())
	}

	#[test]
	fn slots_above_255_never_match() -> Result<()> {
		// 300 would wrap to 44 if it was truncated
		let entry = entry(&[(44, "wrapped"), (255, "last")])?;
		let method = run(Some(&entry), vec![lv("far", 300), lv("edge", 255)])?;

		assert_eq!(names(&method), vec!["far", "last"]);
		Ok(())
	}

	#[test]
	fn invalid_names_are_renamed_too() -> Result<()> {
		let entry = entry(&[(1, "count")])?;
		let method = run(Some(&entry), vec![lv("a.b", 1), lv("c;d", 2)])?;

		assert_eq!(names(&method), vec!["count", "c;d"]);
		Ok(())
	}
}
