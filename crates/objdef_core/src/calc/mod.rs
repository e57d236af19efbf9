mod attribute;
mod def;
mod error;
mod eval;
mod format;
mod hash;
mod place;
mod value;

/// Shared descriptor table for builtin and registered types.
pub mod registry;

/// Attribute tree used for descriptor and value persistence.
pub use attribute::{Attribute, escape, unescape};
/// Type descriptors, builders and dump options.
pub use def::{DefFilter, DefRef, DumpMode, DumpOptions, EnumItem, FieldInfo, FieldSpec, NewValueFn, ObjectDef, VariableSlot};
/// Error and result aliases.
pub use error::{DefError, Result};
/// Three-way evaluation protocol, overload dispatch and error collection.
pub use eval::{
	ErrorLog, EvalOutcome, FunctionEvaluator, LogEntry, NumberKind, OpDirection, OpFuncEvaluator, Severity, SharedEvaluator, SharedOpEvaluator,
	apply_operator, call_method, dispatch_first, int_value, map_parameters, number_value,
};
/// Value type tags and descriptor flags.
pub use format::{DefFlags, ValueType};
/// Ordered name to value map.
pub use hash::{FindError, ValueHash};
/// Field paths and masks.
pub use place::{FieldExtPlace, FieldMask, FieldPlace, MaskMatch, PlaceSegment};
/// Runtime values.
pub use value::{
	AssignResult, Color, EnumValue, Flatvector, FunctionValue, GenericValue, ObjectValue, Quaternion, SetValue, Spacevector, Value, WrappedObject,
	attribute_to_value, format_g, parse_boolean,
};
