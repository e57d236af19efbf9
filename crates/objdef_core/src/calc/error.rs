use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, DefError>;

/// Errors produced while building descriptors or reading attribute text.
#[derive(Debug, Error)]
pub enum DefError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Descriptor is capped and its field list cannot change.
	#[error("descriptor {name} is capped")]
	Capped {
		/// Descriptor name.
		name: String,
	},
	/// Descriptor is read-only.
	#[error("descriptor {name} is read-only")]
	ReadOnly {
		/// Descriptor name.
		name: String,
	},
	/// Enum value pushed onto a descriptor that is not an enum.
	#[error("descriptor {name} is not an enum")]
	NotEnum {
		/// Descriptor name.
		name: String,
	},
	/// Child descriptor name already present.
	#[error("duplicate field {field} on {name}")]
	DuplicateField {
		/// Owning descriptor name.
		name: String,
		/// Duplicate child name.
		field: String,
	},
	/// Field index outside the descriptor's child list.
	#[error("field index {index} out of range on {name} (fields={len})")]
	FieldIndexOutOfRange {
		/// Owning descriptor name.
		name: String,
		/// Offending index.
		index: usize,
		/// Number of own children.
		len: usize,
	},
	/// Attribute text is malformed.
	#[error("attribute syntax at line {line}: {reason}")]
	AttributeSyntax {
		/// One-based line number.
		line: usize,
		/// What went wrong.
		reason: &'static str,
	},
	/// `extends` named a descriptor that could not be resolved.
	#[error("unknown extends target: {name}")]
	UnknownExtends {
		/// Unresolved descriptor name.
		name: String,
	},
	/// Attribute could not be turned into a value.
	#[error("cannot read value from attribute {name}")]
	UnknownAttributeValue {
		/// Attribute name.
		name: String,
	},
	/// Path expression syntax is invalid.
	#[error("invalid field path: {path}")]
	InvalidFieldPath {
		/// Original user-provided path string.
		path: String,
	},
}
