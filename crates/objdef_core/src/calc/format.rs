use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Format tag of a descriptor or runtime value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueType {
	/// No value at all.
	None,
	/// Accepts any value.
	Any,
	/// Ordered collection written as `{a,b}`.
	Set,
	/// Opaque wrapped object.
	Object,
	/// 64-bit signed integer.
	Int,
	/// 64-bit float.
	Real,
	/// Int or real.
	Number,
	/// Text.
	String,
	/// Raw bytes.
	Bytes,
	/// Composite with named fields; concrete type lives in `fields_format`.
	Fields,
	/// Two component vector.
	Flatvector,
	/// Three component vector.
	Spacevector,
	/// Four component rotation.
	Quaternion,
	/// File path.
	File,
	/// File path meant for writing.
	FileSave,
	/// File path meant for reading.
	FileLoad,
	/// Enum descriptor.
	Enum,
	/// One value of an enum.
	EnumValue,
	/// true/false.
	Boolean,
	/// Ordered collection written as `[a,b]`.
	Array,
	/// Name to value map.
	Hash,
	/// Raster image.
	Image,
	/// Bit flags.
	Flags,
	/// RGBA color.
	Color,
	/// Calendar date.
	Date,
	/// Time of day.
	Time,
	/// Complex number.
	Complex,
	/// Font reference.
	Font,
	/// Named variable slot.
	Variable,
	/// Operator declaration.
	Operator,
	/// Class declaration.
	Class,
	/// Function declaration.
	Function,
	/// Namespace declaration.
	Namespace,
	/// Alias of another name.
	Alias,
	/// Several functions sharing one name.
	Overloaded,
	/// Placeholder.
	Dummy,
	/// Assignable location.
	LValue,
	/// Push button in generated dialogs.
	Button,
	/// Dynamically assigned id of a user class.
	User(u32),
}

impl ValueType {
	/// Every builtin tag, in declaration order.
	pub const BUILTINS: [ValueType; 38] = [
		ValueType::None,
		ValueType::Any,
		ValueType::Set,
		ValueType::Object,
		ValueType::Int,
		ValueType::Real,
		ValueType::Number,
		ValueType::String,
		ValueType::Bytes,
		ValueType::Fields,
		ValueType::Flatvector,
		ValueType::Spacevector,
		ValueType::Quaternion,
		ValueType::File,
		ValueType::FileSave,
		ValueType::FileLoad,
		ValueType::Enum,
		ValueType::EnumValue,
		ValueType::Boolean,
		ValueType::Array,
		ValueType::Hash,
		ValueType::Image,
		ValueType::Flags,
		ValueType::Color,
		ValueType::Date,
		ValueType::Time,
		ValueType::Complex,
		ValueType::Font,
		ValueType::Variable,
		ValueType::Operator,
		ValueType::Class,
		ValueType::Function,
		ValueType::Namespace,
		ValueType::Alias,
		ValueType::Overloaded,
		ValueType::Dummy,
		ValueType::LValue,
		ValueType::Button,
	];

	/// Scripting name of the tag, as used in attribute text.
	pub fn name(self) -> &'static str {
		match self {
			ValueType::None => "none",
			ValueType::Any => "any",
			ValueType::Set => "set",
			ValueType::Object => "object",
			ValueType::Int => "int",
			ValueType::Real => "real",
			ValueType::Number => "number",
			ValueType::String => "string",
			ValueType::Bytes => "bytes",
			ValueType::Fields | ValueType::User(_) => "fields",
			ValueType::Flatvector => "flatvector",
			ValueType::Spacevector => "spacevector",
			ValueType::Quaternion => "quaternion",
			// capitalized, it names a class rather than a primitive
			ValueType::File => "File",
			ValueType::FileSave => "filesave",
			ValueType::FileLoad => "fileload",
			ValueType::Enum => "enum",
			ValueType::EnumValue => "enumval",
			ValueType::Boolean => "boolean",
			ValueType::Array => "array",
			ValueType::Hash => "hash",
			ValueType::Image => "image",
			ValueType::Flags => "flags",
			ValueType::Color => "color",
			ValueType::Date => "date",
			ValueType::Time => "time",
			ValueType::Complex => "complex",
			ValueType::Font => "font",
			ValueType::Variable => "variable",
			ValueType::Operator => "operator",
			ValueType::Class => "class",
			ValueType::Function => "function",
			ValueType::Namespace => "namespace",
			ValueType::Alias => "alias",
			ValueType::Overloaded => "overloaded",
			ValueType::Dummy => "dummy",
			ValueType::LValue => "lvalue",
			ValueType::Button => "button",
		}
	}

	/// Map a scripting type name back to a tag.
	///
	/// An empty name means `Any`. Names that are not builtin are assumed to
	/// name a user class and map to `Fields`.
	pub fn from_name(name: &str) -> Self {
		if name.is_empty() {
			return ValueType::Any;
		}
		Self::BUILTINS
			.iter()
			.copied()
			.find(|item| item.name() == name)
			.unwrap_or(ValueType::Fields)
	}

	/// Identifier used when generating constructor source text.
	pub fn code_name(self) -> String {
		match self {
			ValueType::User(id) => format!("VALUE_MaxBuiltIn+{id}"),
			ValueType::EnumValue => "VALUE_EnumVal".to_owned(),
			other => format!("VALUE_{other:?}"),
		}
	}

	/// Whether values of this tag carry data, as opposed to declarations.
	pub fn is_data(self) -> bool {
		!matches!(
			self,
			ValueType::Namespace | ValueType::Class | ValueType::Operator | ValueType::Function | ValueType::Alias
		)
	}

	/// Whether this tag names one of the vector types.
	pub fn is_vector(self) -> bool {
		matches!(self, ValueType::Flatvector | ValueType::Spacevector | ValueType::Quaternion)
	}

	/// Whether this tag describes a declaration that owns nested children.
	pub fn is_complex_decl(self) -> bool {
		matches!(
			self,
			ValueType::Class
				| ValueType::Variable
				| ValueType::Operator
				| ValueType::Function
				| ValueType::Namespace
				| ValueType::Enum
		)
	}
}

impl fmt::Display for ValueType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ValueType::User(id) => write!(f, "user#{id}"),
			other => f.write_str(other.name()),
		}
	}
}

/// Descriptor flag set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DefFlags(u32);

impl DefFlags {
	/// No flags.
	pub const NONE: DefFlags = DefFlags(0);
	/// Fields cannot be added or removed.
	pub const CAPPED: DefFlags = DefFlags(1);
	/// Duplicate of another descriptor.
	pub const DUPLICATE: DefFlags = DefFlags(2);
	/// Not reachable from any namespace.
	pub const ORPHAN: DefFlags = DefFlags(4);
	/// Marks a set of such elements.
	pub const ISSET: DefFlags = DefFlags(8);
	/// No mutation at all.
	pub const READONLY: DefFlags = DefFlags(16);
	/// Constant value.
	pub const CONST: DefFlags = DefFlags(32);

	/// Build from raw bits.
	pub fn from_bits(bits: u32) -> Self {
		Self(bits)
	}

	/// Raw bit value.
	pub fn bits(self) -> u32 {
		self.0
	}

	/// Whether every bit of `other` is set.
	pub fn contains(self, other: DefFlags) -> bool {
		self.0 & other.0 == other.0
	}

	/// Set or clear the bits of `other`.
	pub fn set(&mut self, other: DefFlags, on: bool) {
		if on {
			self.0 |= other.0;
		} else {
			self.0 &= !other.0;
		}
	}

	/// True when no flag is set.
	pub fn is_empty(self) -> bool {
		self.0 == 0
	}
}

impl BitOr for DefFlags {
	type Output = DefFlags;

	fn bitor(self, rhs: DefFlags) -> DefFlags {
		DefFlags(self.0 | rhs.0)
	}
}

impl BitOrAssign for DefFlags {
	fn bitor_assign(&mut self, rhs: DefFlags) {
		self.0 |= rhs.0;
	}
}

#[cfg(test)]
mod tests {
	use super::{DefFlags, ValueType};

	#[test]
	fn names_round_trip_for_builtins() {
		for item in ValueType::BUILTINS {
			if item == ValueType::Fields {
				continue;
			}
			assert_eq!(ValueType::from_name(item.name()), item, "{item:?}");
		}
	}

	#[test]
	fn unknown_names_are_user_fields() {
		assert_eq!(ValueType::from_name("PaperStyle"), ValueType::Fields);
		assert_eq!(ValueType::from_name(""), ValueType::Any);
		assert_eq!(ValueType::File.name(), "File");
	}

	#[test]
	fn code_names() {
		assert_eq!(ValueType::Int.code_name(), "VALUE_Int");
		assert_eq!(ValueType::EnumValue.code_name(), "VALUE_EnumVal");
		assert_eq!(ValueType::User(3).code_name(), "VALUE_MaxBuiltIn+3");
	}

	#[test]
	fn declarations_are_not_data() {
		assert!(!ValueType::Function.is_data());
		assert!(!ValueType::Namespace.is_data());
		assert!(ValueType::Variable.is_data());
		assert!(ValueType::Int.is_data());
	}

	#[test]
	fn flags_combine() {
		let mut flags = DefFlags::CAPPED | DefFlags::CONST;
		assert!(flags.contains(DefFlags::CAPPED));
		assert!(!flags.contains(DefFlags::READONLY));
		flags.set(DefFlags::CAPPED, false);
		assert_eq!(flags, DefFlags::CONST);
		assert_eq!(flags.bits(), 32);
	}
}
