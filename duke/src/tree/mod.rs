pub mod attribute;
pub mod class;
pub mod field;
pub mod method;
pub mod pool;
pub mod version;

/// Name checks as given by the JVMS.
///
/// All of the characters that are forbidden in names are ASCII, so these work on the raw bytes of a
/// [`JavaStr`][java_string::JavaStr]. Multibyte sequences never contain ASCII bytes.
mod names {
	/// Checks if a class name is valid according to JVMS 4.2.1 (also accepting array class names).
	pub(super) fn is_valid_class_name(x: &[u8]) -> bool {
		if x.starts_with(b"[") {
			matches!(field_descriptor_rest(x), Some([]))
		} else {
			is_valid_obj_class_name(x)
		}
	}

	/// A list of identifiers split by `/`, each of them being an unqualified name.
	fn is_valid_obj_class_name(x: &[u8]) -> bool {
		x.split(|&b| b == b'/').all(is_valid_unqualified_name)
	}

	/// Checks if a name is an unqualified name according to JVMS 4.2.2
	///
	/// This is used for field names, formal parameter names, local variable names.
	pub(super) fn is_valid_unqualified_name(x: &[u8]) -> bool {
		// must contain at least one unicode codepoint
		!x.is_empty() &&
			x.iter().all(|c| !matches!(c, b'.' | b';' | b'[' | b'/'))
	}

	/// Checks if a method name is valid according to JVMS 4.2.2
	pub(super) fn is_valid_method_name(x: &[u8]) -> bool {
		// either one of the special names or an unqualified name with special < > restriction
		x == b"<init>" || x == b"<clinit>" || (
			!x.is_empty() &&
				x.iter().all(|c| !matches!(c, b'.' | b';' | b'[' | b'/' | b'<' | b'>'))
		)
	}

	/// Checks if the whole input is a single field descriptor according to JVMS 4.3.2
	pub(super) fn is_valid_field_descriptor(x: &[u8]) -> bool {
		matches!(field_descriptor_rest(x), Some([]))
	}

	/// Checks if the input is a method descriptor according to JVMS 4.3.3
	pub(super) fn is_valid_method_descriptor(x: &[u8]) -> bool {
		let Some(mut rest) = x.strip_prefix(b"(") else {
			return false;
		};
		loop {
			if let Some(after) = rest.strip_prefix(b")") {
				return after == b"V" || is_valid_field_descriptor(after);
			}
			match field_descriptor_rest(rest) {
				Some(after) => rest = after,
				None => return false,
			}
		}
	}

	/// Parses one field descriptor off the start of the input, returning what's left after it.
	fn field_descriptor_rest(x: &[u8]) -> Option<&[u8]> {
		let dimensions = x.iter().take_while(|&&b| b == b'[').count();
		if dimensions > 255 {
			return None;
		}
		let x = &x[dimensions..];
		match x.first()? {
			b'B' | b'C' | b'D' | b'F' | b'I' | b'J' | b'S' | b'Z' => Some(&x[1..]),
			b'L' => {
				let end = x.iter().position(|&b| b == b';')?;
				is_valid_obj_class_name(&x[1..end]).then(|| &x[end + 1..])
			},
			_ => None,
		}
	}

	#[cfg(test)]
	mod testing {
		use crate::tree::names::*;

		#[test]
		fn class_names() {
			assert!(is_valid_class_name(b"java/lang/Object"));
			assert!(is_valid_class_name(b"java/lang/Thread"));
			assert!(is_valid_class_name(b"[[[D"));
			assert!(is_valid_class_name(b"[Ljava/lang/String;"));
			assert!(is_valid_class_name(b"An$Inner$Class"));

			assert!(!is_valid_class_name(b"")); // it may come as a surprise, but an empty class name is not valid
			assert!(!is_valid_class_name(b"/"));
			assert!(!is_valid_class_name(b"/a"));
			assert!(!is_valid_class_name(b"a/"));
			assert!(!is_valid_class_name(b"a//"));
			assert!(!is_valid_class_name(b"a.b"));
			assert!(!is_valid_class_name(b"a;b"));
			assert!(!is_valid_class_name(b"[[[Q"));
		}

		#[test]
		fn unqualified_names() {
			assert!(is_valid_unqualified_name(b"count"));
			assert!(is_valid_unqualified_name(b"1234567")); // yes numbers are valid here, but not in java source code
			assert!(is_valid_unqualified_name(b"---"));
			assert!(is_valid_unqualified_name("\u{2603}".as_bytes()));

			assert!(!is_valid_unqualified_name(b""));
			assert!(!is_valid_unqualified_name(b"."));
			assert!(!is_valid_unqualified_name(b";"));
			assert!(!is_valid_unqualified_name(b"["));
			assert!(!is_valid_unqualified_name(b"/"));
		}

		#[test]
		fn method_names() {
			assert!(is_valid_method_name(b"foo"));
			assert!(is_valid_method_name(b"<init>"));
			assert!(is_valid_method_name(b"<clinit>"));

			assert!(!is_valid_method_name(b""));
			assert!(!is_valid_method_name(b"<NotClinit>"));
			assert!(!is_valid_method_name(b"<>"));
		}

		#[test]
		fn descriptors() {
			assert!(is_valid_field_descriptor(b"I"));
			assert!(is_valid_field_descriptor(b"[[J"));
			assert!(is_valid_field_descriptor(b"Ljava/lang/Object;"));
			assert!(!is_valid_field_descriptor(b"V"));
			assert!(!is_valid_field_descriptor(b"II"));
			assert!(!is_valid_field_descriptor(b"Ljava/lang/Object"));
			assert!(!is_valid_field_descriptor(b"L;"));

			assert!(is_valid_method_descriptor(b"()V"));
			assert!(is_valid_method_descriptor(b"(I)V"));
			assert!(is_valid_method_descriptor(b"(IJ[Ljava/lang/String;)Ljava/lang/Object;"));
			assert!(!is_valid_method_descriptor(b"(I)"));
			assert!(!is_valid_method_descriptor(b"I)V"));
			assert!(!is_valid_method_descriptor(b"(V)V"));
			assert!(!is_valid_method_descriptor(b"()VV"));
		}
	}
}
