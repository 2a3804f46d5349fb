use anyhow::Result;
use pretty_assertions::assert_eq;
use duke::ClassWriter;
use duke::tree::class::ClassFile;
use java_string::JavaString;
use duke::tree::method::{Method, MethodHeader};
use duke::tree::method::code::{Code, CodeAttribute, Lv, LvTable, LvTableKind};
use duke::visitor::class::ClassVisitor;
use duke::visitor::method::MethodVisitor;

/// Builds class file bytes by hand.
#[derive(Default)]
struct Bytes(Vec<u8>);

impl Bytes {
	fn u8(mut self, value: u8) -> Self {
		self.0.push(value);
		self
	}
	fn u16(mut self, value: u16) -> Self {
		self.0.extend_from_slice(&value.to_be_bytes());
		self
	}
	fn u32(mut self, value: u32) -> Self {
		self.0.extend_from_slice(&value.to_be_bytes());
		self
	}
	fn raw(mut self, bytes: &[u8]) -> Self {
		self.0.extend_from_slice(bytes);
		self
	}
	fn utf8(self, string: &str) -> Self {
		self.u8(1).u16(string.len() as u16).raw(string.as_bytes())
	}
	fn attribute(self, name_index: u16, info: Bytes) -> Self {
		self.u16(name_index).u32(info.0.len() as u32).raw(&info.0)
	}
	fn lv(self, start: u16, length: u16, name_index: u16, descriptor_index: u16, index: u16) -> Self {
		self.u16(start).u16(length).u16(name_index).u16(descriptor_index).u16(index)
	}
}

/// A class `org.example.Counter` with a method `int add(int)`, compiled with debug info.
fn counter_class() -> Vec<u8> {
	let local_variable_table = Bytes::default()
		.u16(3)
		.lv(0, 4, 9, 10, 0)
		.lv(0, 4, 11, 12, 1)
		.lv(2, 2, 13, 12, 2);

	let code = Bytes::default()
		.u16(1) // max stack
		.u16(3) // max locals
		.u32(4)
		.raw(&[0x1b, 0x3d, 0x1c, 0xac]) // iload_1, istore_2, iload_2, ireturn
		.u16(0) // exception table
		.u16(1)
		.attribute(8, local_variable_table);

	Bytes::default()
		.u32(0xCAFE_BABE)
		.u16(0).u16(52)
		.u16(18)
		.utf8("org/example/Counter") // 1
		.u8(7).u16(1) // 2
		.utf8("java/lang/Object") // 3
		.u8(7).u16(3) // 4
		.utf8("add") // 5
		.utf8("(I)I") // 6
		.utf8("Code") // 7
		.utf8("LocalVariableTable") // 8
		.utf8("this") // 9
		.utf8("Lorg/example/Counter;") // 10
		.utf8("var1") // 11
		.utf8("I") // 12
		.utf8("var2") // 13
		.utf8("SourceFile") // 14
		.utf8("Counter.java") // 15
		.u8(5).u32(0).u32(42) // 16 and 17
		.u16(0x0021)
		.u16(2)
		.u16(4)
		.u16(0) // interfaces
		.u16(0) // fields
		.u16(1)
		.u16(0x0001).u16(5).u16(6)
		.u16(1)
		.attribute(7, code)
		.u16(1)
		.attribute(14, Bytes::default().u16(15))
		.0
}

fn local_variable_names(method: &Method) -> Vec<String> {
	method.code()
		.map(|code| code.local_variables().map(|lv| lv.name.to_string()).collect())
		.unwrap_or_default()
}

#[test]
fn read_tree() -> Result<()> {
	let class = duke::read_class_file(&mut counter_class().as_slice())?;

	assert_eq!(class.name()?.to_string(), "org/example/Counter");
	assert_eq!(class.header.pool.count(), 18);
	assert_eq!(class.fields.len(), 0);
	assert_eq!(class.attributes.len(), 1);
	assert_eq!(class.methods.len(), 1);

	let method = &class.methods[0];
	assert_eq!(method.header.name.to_string(), "add");
	assert_eq!(method.header.descriptor.to_string(), "(I)I");
	assert_eq!((method.header.name_index, method.header.descriptor_index), (Some(5), Some(6)));
	assert_eq!(local_variable_names(method), vec!["this", "var1", "var2"]);

	let code = method.code().expect("method has code");
	assert_eq!(code.body.code, vec![0x1b, 0x3d, 0x1c, 0xac]);
	let slots: Vec<u16> = code.local_variables().map(|lv| lv.index.index).collect();
	assert_eq!(slots, vec![0, 1, 2]);
	let last = code.local_variables().last().expect("there are local variables");
	assert_eq!((last.range.start().pc, last.range.length()), (2, 2));
	assert!(last.signature.is_none());
	assert_eq!(last.descriptor.as_ref().map(ToString::to_string), Some("I".to_owned()));
	assert_eq!((last.name_index, last.type_index), (Some(13), Some(12)));

	assert_eq!(code.attributes.first(), Some(&CodeAttribute::LocalVariableTable(LvTable {
		kind: LvTableKind::LocalVariableTable,
		name_index: Some(8),
	})));

	Ok(())
}

#[test]
fn unchanged_class_is_written_byte_for_byte() -> Result<()> {
	let bytes = counter_class();

	let written = duke::read_class(&mut bytes.as_slice(), ClassWriter::new())?.into_bytes()?;
	assert_eq!(written, bytes);

	let class = duke::read_class_file(&mut bytes.as_slice())?;
	assert_eq!(duke::write_class_file(class)?, bytes);

	Ok(())
}

#[test]
fn peek_class_name() -> Result<()> {
	let name = duke::peek_class_name(&mut counter_class().as_slice())?;
	assert_eq!(name.to_string(), "org/example/Counter");
	Ok(())
}

#[test]
fn broken_class_files() {
	let bytes = counter_class();

	assert!(duke::read_class_file(&mut &bytes[..bytes.len() - 3]).is_err());

	let mut wrong_magic = bytes.clone();
	wrong_magic[0] = 0xCB;
	assert!(duke::read_class_file(&mut wrong_magic.as_slice()).is_err());
}

/// Renames one local variable, forwarding everything else.
struct Rename<M> {
	from: &'static str,
	to: &'static str,
	delegate: M,
}

impl<M: MethodVisitor> MethodVisitor for Rename<M> {
	type Delegate = M;

	fn delegate(&mut self) -> Option<&mut Self::Delegate> {
		Some(&mut self.delegate)
	}

	fn visit_local_variable(&mut self, mut lv: Lv) -> Result<()> {
		if lv.name == self.from {
			lv.name = JavaString::from(self.to);
		}
		self.delegate.visit_local_variable(lv)
	}
}

struct RenameInMethods<C>(C);

impl<C: ClassVisitor> ClassVisitor for RenameInMethods<C> {
	type MethodVisitor = Rename<C::MethodVisitor>;
	type Delegate = C;

	fn delegate(&mut self) -> Option<&mut Self::Delegate> {
		Some(&mut self.0)
	}

	fn visit_method(&mut self, header: MethodHeader) -> Result<Option<Self::MethodVisitor>> {
		Ok(self.0.visit_method(header)?
			.map(|delegate| Rename { from: "var2", to: "sum", delegate }))
	}

	fn finish_method(&mut self, method_visitor: Self::MethodVisitor) -> Result<()> {
		self.0.finish_method(method_visitor.delegate)
	}
}

#[test]
fn renaming_appends_to_the_pool() -> Result<()> {
	let bytes = counter_class();

	let RenameInMethods(writer) = duke::read_class(&mut bytes.as_slice(), RenameInMethods(ClassWriter::new()))?;
	let written = writer.into_bytes()?;
	assert_ne!(written, bytes);

	let class = duke::read_class_file(&mut written.as_slice())?;
	assert_eq!(class.header.pool.count(), 19);
	assert_eq!(local_variable_names(&class.methods[0]), vec!["this", "var1", "sum"]);

	// everything but the pool count and the new entry stays the same
	let original = duke::read_class_file(&mut bytes.as_slice())?;
	assert_eq!(class.methods[0].code().map(|code| &code.body), original.methods[0].code().map(|code| &code.body));
	assert_eq!(class.attributes, original.attributes);

	Ok(())
}

/// The name, types and slot of each local variable, leaving out where in the pool they are.
fn local_variables(method: &Method) -> Vec<(String, Option<String>, Option<String>, u16)> {
	method.code()
		.map(|code| code.local_variables()
			.map(|lv| (
				lv.name.to_string(),
				lv.descriptor.as_ref().map(ToString::to_string),
				lv.signature.as_ref().map(ToString::to_string),
				lv.index.index,
			))
			.collect())
		.unwrap_or_default()
}

fn code_mut(method: &mut Method) -> &mut Code {
	method.attributes.iter_mut()
		.find_map(|attribute| match attribute {
			duke::tree::method::MethodAttribute::Code(code) => Some(code),
			duke::tree::method::MethodAttribute::Raw(_) => None,
		})
		.expect("method has code")
}

#[test]
fn local_variable_tables_keep_their_order() -> Result<()> {
	let mut class: ClassFile = duke::read_class_file(&mut counter_class().as_slice())?;
	let code = code_mut(&mut class.methods[0]);

	let mut typed = code.local_variables().next().cloned().expect("there is a local variable");
	typed.descriptor = None;
	typed.signature = Some(JavaString::from("Lorg/example/Counter<TT;>;"));
	typed.type_index = None;
	code.attributes.push(CodeAttribute::LocalVariable(typed));
	let expected = local_variables(&class.methods[0]);

	let written = duke::write_class_file(class)?;
	let read = duke::read_class_file(&mut written.as_slice())?;

	assert_eq!(local_variables(&read.methods[0]), expected);
	let tables: Vec<LvTableKind> = read.methods[0].code()
		.map(|code| code.attributes.iter()
			.filter_map(|attribute| match attribute {
				CodeAttribute::LocalVariableTable(table) => Some(table.kind),
				_ => None,
			})
			.collect())
		.unwrap_or_default();
	assert_eq!(tables, vec![LvTableKind::LocalVariableTable, LvTableKind::LocalVariableTypeTable]);

	Ok(())
}

/// A class with a method `void run()` whose code has the given attributes, and the given extra pool entries.
///
/// The pool starts with `org/example/Empty` at 1 and 2, `java/lang/Object` at 3 and 4, `run` at 5, `()V` at 6,
/// `Code` at 7, `LocalVariableTable` at 8, `LocalVariableTypeTable` at 9, and then the extra entries from 10 on.
/// The method takes its name and descriptor from `method`, usually `(5, 6)`.
fn run_class(extra_pool: &[&str], method: (u16, u16), code_attributes: Bytes, code_attributes_count: u16) -> Vec<u8> {
	let code = Bytes::default()
		.u16(0) // max stack
		.u16(1) // max locals
		.u32(1)
		.raw(&[0xb1]) // return
		.u16(0) // exception table
		.u16(code_attributes_count)
		.raw(&code_attributes.0);

	let mut bytes = Bytes::default()
		.u32(0xCAFE_BABE)
		.u16(0).u16(52)
		.u16(10 + extra_pool.len() as u16)
		.utf8("org/example/Empty") // 1
		.u8(7).u16(1) // 2
		.utf8("java/lang/Object") // 3
		.u8(7).u16(3) // 4
		.utf8("run") // 5
		.utf8("()V") // 6
		.utf8("Code") // 7
		.utf8("LocalVariableTable") // 8
		.utf8("LocalVariableTypeTable"); // 9
	for entry in extra_pool {
		bytes = bytes.utf8(entry);
	}

	bytes
		.u16(0x0021)
		.u16(2)
		.u16(4)
		.u16(0) // interfaces
		.u16(0) // fields
		.u16(1)
		.u16(0x0001).u16(method.0).u16(method.1)
		.u16(1)
		.attribute(7, code)
		.u16(0) // attributes
		.0
}

#[test]
fn empty_local_variable_tables_are_kept() -> Result<()> {
	let tables = Bytes::default()
		.attribute(8, Bytes::default().u16(0))
		.attribute(9, Bytes::default().u16(0));
	let bytes = run_class(&[], (5, 6), tables, 2);

	let written = duke::read_class(&mut bytes.as_slice(), ClassWriter::new())?.into_bytes()?;
	assert_eq!(written, bytes);

	let class = duke::read_class_file(&mut bytes.as_slice())?;
	assert_eq!(class.methods[0].code().map(|code| code.attributes.len()), Some(2));
	assert_eq!(duke::write_class_file(class)?, bytes);
	Ok(())
}

#[test]
fn duplicate_pool_strings_keep_their_index() -> Result<()> {
	// `this`, `I`, `run` and `()V` are each in the pool twice, and the method and the variables mostly refer to the
	// second ones
	let table = Bytes::default()
		.u16(2)
		.lv(0, 1, 11, 13, 0)
		.lv(0, 1, 15, 12, 1);
	let bytes = run_class(&["this", "this", "I", "I", "run", "()V"], (14, 15), Bytes::default().attribute(8, table), 1);

	let written = duke::read_class(&mut bytes.as_slice(), ClassWriter::new())?.into_bytes()?;
	assert_eq!(written, bytes);

	let class = duke::read_class_file(&mut bytes.as_slice())?;
	assert_eq!(duke::write_class_file(class)?, bytes);
	Ok(())
}

#[test]
fn invalid_debug_info_is_passed_through() -> Result<()> {
	// a name that isn't a valid local variable name, a type that isn't a descriptor, and a range past the code end
	let table = Bytes::default()
		.u16(1)
		.lv(0, 200, 10, 11, 0);
	let bytes = run_class(&["a.b", "not a descriptor"], (5, 6), Bytes::default().attribute(8, table), 1);

	let class = duke::read_class_file(&mut bytes.as_slice())?;
	assert_eq!(local_variables(&class.methods[0]), vec![
		("a.b".to_owned(), Some("not a descriptor".to_owned()), None, 0),
	]);
	let lv = class.methods[0].code().and_then(|code| code.local_variables().next()).expect("there is a local variable");
	assert_eq!((lv.range.length(), lv.range.end_pc()), (200, 200));

	let written = duke::read_class(&mut bytes.as_slice(), ClassWriter::new())?.into_bytes()?;
	assert_eq!(written, bytes);
	Ok(())
}

#[test]
fn changed_names_get_new_pool_entries() -> Result<()> {
	let table = Bytes::default()
		.u16(1)
		.lv(0, 1, 10, 11, 0);
	let bytes = run_class(&["var2", "I"], (5, 6), Bytes::default().attribute(8, table), 1);

	let RenameInMethods(writer) = duke::read_class(&mut bytes.as_slice(), RenameInMethods(ClassWriter::new()))?;
	let written = writer.into_bytes()?;

	let class = duke::read_class_file(&mut written.as_slice())?;
	assert_eq!(class.header.pool.count(), 13);
	assert_eq!(local_variables(&class.methods[0]), vec![("sum".to_owned(), Some("I".to_owned()), None, 0)]);
	let lv = class.methods[0].code().and_then(|code| code.local_variables().next()).expect("there is a local variable");
	assert_eq!((lv.name_index, lv.type_index), (Some(12), Some(11)));
	Ok(())
}
