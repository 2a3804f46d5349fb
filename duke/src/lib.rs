//! A crate for reading and writing [Java Class Files](https://docs.oracle.com/javase/specs/jvms/se22/html/jvms-4.html)
//! through a chain of visitors.
//!
//! Only what's needed for rewriting local variables is parsed: the constant pool, the members and the `Code` attribute
//! with its `LocalVariableTable` and `LocalVariableTypeTable`. Everything else is handed through the chain as raw
//! [`Attribute`][tree::attribute::Attribute]s, and the [`ClassWriter`] puts these back byte for byte.
//!
//! Reading a class into a visitor chain and writing it back out looks like this:
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! let bytes = std::fs::read("Main.class")?;
//! let writer = duke::read_class(&mut bytes.as_slice(), duke::ClassWriter::new())?;
//! let written = writer.into_bytes()?;
//!
//! assert_eq!(bytes, written);
//! # Ok(())
//! # }
//! ```

pub mod tree;
pub mod visitor;
mod class_constants;
mod class_reader;
mod class_writer;
mod jstring;
mod macros;

use std::io::{Read, Write};
use anyhow::{anyhow, Context, Result};
use crate::tree::class::{ClassFile, ClassName};
use crate::visitor::class::ClassVisitor;

pub use class_writer::ClassWriter;

/// Reads a single java class file from the reader into the visitor, returning the visitor afterwards.
pub fn read_class<V: ClassVisitor>(reader: &mut impl Read, visitor: V) -> Result<V> {
	class_reader::read(reader, visitor)
}

/// Reads a single java class file into the tree representation.
pub fn read_class_file(reader: &mut impl Read) -> Result<ClassFile> {
	let class: Option<ClassFile> = class_reader::read(reader, None)?;

	class.context("there was no class inside it")
}

/// Writes out the given class file.
pub fn write_class_file(class: ClassFile) -> Result<Vec<u8>> {
	class.accept(ClassWriter::new())?.into_bytes()
}

/// Reads only as much of a class file as needed to get the name of the class.
pub fn peek_class_name(reader: &mut impl Read) -> Result<ClassName> {
	class_reader::read_name(reader)
}

trait ClassRead {
	fn read_n<const N: usize>(&mut self) -> Result<[u8; N]>;
	fn read_u8(&mut self) -> Result<u8> {
		Ok(u8::from_be_bytes(self.read_n().context("couldn't read u8, perhaps the data's end is reached?")?))
	}
	fn read_u16(&mut self) -> Result<u16> {
		Ok(u16::from_be_bytes(self.read_n().context("couldn't read u16, perhaps the data's end is reached?")?))
	}
	fn read_u32(&mut self) -> Result<u32> {
		Ok(u32::from_be_bytes(self.read_n().context("couldn't read u32, perhaps the data's end is reached?")?))
	}
	fn read_u64(&mut self) -> Result<u64> {
		Ok(u64::from_be_bytes(self.read_n().context("couldn't read u64, perhaps the data's end is reached?")?))
	}
	fn read_i32(&mut self) -> Result<i32> {
		Ok(i32::from_be_bytes(self.read_n().context("couldn't read i32, perhaps the data's end is reached?")?))
	}
	fn read_i64(&mut self) -> Result<i64> {
		Ok(i64::from_be_bytes(self.read_n().context("couldn't read i64, perhaps the data's end is reached?")?))
	}

	fn read_u16_as_usize(&mut self) -> Result<usize> {
		Ok(self.read_u16()? as usize)
	}
	fn read_u32_as_usize(&mut self) -> Result<usize> {
		Ok(self.read_u32()? as usize)
	}
	fn read_u8_vec(&mut self, size: usize) -> Result<Vec<u8>>;
	fn read_vec<T, S, E>(&mut self, get_size: S, mut get_element: E) -> Result<Vec<T>>
		where
			S: FnOnce(&mut Self) -> Result<usize>,
			E: FnMut(&mut Self) -> Result<T>
	{
		let size = get_size(self)?;
		let mut vec = Vec::with_capacity(size);
		for _ in 0..size {
			vec.push(get_element(self)?);
		}
		Ok(vec)
	}
}
impl<T: Read> ClassRead for T {
	fn read_n<const N: usize>(&mut self) -> Result<[u8; N]> {
		let mut buf = [0u8; N];
		self.read_exact(&mut buf)?;
		Ok(buf)
	}
	fn read_u8_vec(&mut self, size: usize) -> Result<Vec<u8>> {
		let mut vec = vec![0; size];
		self.read_exact(&mut vec)?;
		Ok(vec)
	}
}

trait ClassWrite {
	fn write_u8(&mut self, value: u8) -> Result<()> {
		self.write_u8_slice(&[value]).context("couldn't write u8")
	}
	fn write_u16(&mut self, value: u16) -> Result<()> {
		self.write_u8_slice(&value.to_be_bytes()).context("couldn't write u16")
	}
	fn write_u32(&mut self, value: u32) -> Result<()> {
		self.write_u8_slice(&value.to_be_bytes()).context("couldn't write u32")
	}
	fn write_u64(&mut self, value: u64) -> Result<()> {
		self.write_u8_slice(&value.to_be_bytes()).context("couldn't write u64")
	}
	fn write_i32(&mut self, value: i32) -> Result<()> {
		self.write_u8_slice(&value.to_be_bytes()).context("couldn't write i32")
	}
	fn write_i64(&mut self, value: i64) -> Result<()> {
		self.write_u8_slice(&value.to_be_bytes()).context("couldn't write i64")
	}

	fn write_usize_as_u16(&mut self, value: usize) -> Result<()> {
		self.write_u16(u16::try_from(value).with_context(|| anyhow!("failed to convert {value} to u16 for writing: value too large"))?)
	}
	fn write_usize_as_u32(&mut self, value: usize) -> Result<()> {
		self.write_u32(u32::try_from(value).with_context(|| anyhow!("failed to convert {value} to u32 for writing: value too large"))?)
	}

	fn write_u8_slice(&mut self, buf: &[u8]) -> Result<()>;
	fn write_slice<'t, T>(
		&mut self,
		slice: &'t [T],
		put_size: impl FnOnce(&mut Self, usize) -> Result<()>,
		mut put_element: impl FnMut(&mut Self, &'t T) -> Result<()>
	) -> Result<()> {
		put_size(self, slice.len())?;
		for value in slice {
			put_element(self, value)?;
		}
		Ok(())
	}
}
impl<T: Write> ClassWrite for T {
	fn write_u8_slice(&mut self, buf: &[u8]) -> Result<()> {
		self.write_all(buf)?;
		Ok(())
	}
}

