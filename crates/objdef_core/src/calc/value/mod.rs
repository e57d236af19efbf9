use std::fmt;

use crate::calc::eval::{ErrorLog, EvalOutcome, FunctionEvaluator, number_value};
use crate::calc::{DefRef, FieldExtPlace, PlaceSegment, ValueHash, ValueType, registry};

mod attributes;
mod enums;
mod generic;
mod object;
mod render;
mod scalar;
mod set;
mod vector;

pub use attributes::{attribute_to_value, parse_boolean};
pub use enums::EnumValue;
pub use generic::GenericValue;
pub use object::{FunctionValue, ObjectValue, WrappedObject};
pub use render::format_g;
pub use set::SetValue;
pub use vector::{Color, Flatvector, Quaternion, Spacevector};

use vector::Components;

/// Outcome of [`Value::assign`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignResult {
	/// Wrong value type; nothing changed.
	Failed,
	/// Only the addressed value changed.
	Changed,
	/// The addressed value changed and so did others around it.
	ChangedWithSideEffects,
	/// The path does not name anything inside this value.
	UnknownPath,
}

/// A runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// Nothing.
	Null,
	/// true/false.
	Boolean(bool),
	/// 64-bit integer.
	Int(i64),
	/// 64-bit float.
	Real(f64),
	/// Text.
	String(String),
	/// Raw bytes.
	Bytes(Vec<u8>),
	/// Two component vector.
	Flatvector(Flatvector),
	/// Three component vector.
	Spacevector(Spacevector),
	/// Four component rotation.
	Quaternion(Quaternion),
	/// RGBA color.
	Color(Color),
	/// File path.
	File(String),
	/// One value of an enum descriptor.
	Enum(EnumValue),
	/// Ordered collection written as `{a,b}`.
	Set(SetValue),
	/// Ordered collection written as `[a,b]`.
	Array(SetValue),
	/// Name to value map.
	Hash(ValueHash),
	/// Instance of a class descriptor.
	Generic(GenericValue),
	/// Opaque wrapped object.
	Object(ObjectValue),
	/// Function body text.
	Function(FunctionValue),
}

impl Value {
	/// Format tag of this value.
	///
	/// Class instances report their descriptor's type id so every user class
	/// gets a distinct tag.
	pub fn value_type(&self) -> ValueType {
		match self {
			Value::Null => ValueType::None,
			Value::Boolean(_) => ValueType::Boolean,
			Value::Int(_) => ValueType::Int,
			Value::Real(_) => ValueType::Real,
			Value::String(_) => ValueType::String,
			Value::Bytes(_) => ValueType::Bytes,
			Value::Flatvector(_) => ValueType::Flatvector,
			Value::Spacevector(_) => ValueType::Spacevector,
			Value::Quaternion(_) => ValueType::Quaternion,
			Value::Color(_) => ValueType::Color,
			Value::File(_) => ValueType::File,
			Value::Enum(_) => ValueType::Enum,
			Value::Set(_) => ValueType::Set,
			Value::Array(_) => ValueType::Array,
			Value::Hash(_) => ValueType::Hash,
			Value::Generic(value) => value.value_type(),
			Value::Object(_) => ValueType::Object,
			Value::Function(_) => ValueType::Function,
		}
	}

	/// Independent copy with the same content.
	pub fn duplicate(&self) -> Value {
		match self {
			Value::Object(value) => Value::Object(value.duplicate()),
			other => other.clone(),
		}
	}

	/// Registry name of the builtin descriptor for this variant.
	pub fn builtin_name(&self) -> Option<&'static str> {
		Some(match self {
			Value::Null => "null",
			Value::Boolean(_) => "boolean",
			Value::Int(_) => "int",
			Value::Real(_) => "real",
			Value::String(_) => "string",
			Value::Bytes(_) => "bytes",
			Value::Flatvector(_) => "flatvector",
			Value::Spacevector(_) => "spacevector",
			Value::Quaternion(_) => "quaternion",
			Value::Color(_) => "Color",
			Value::File(_) => "file",
			Value::Set(_) => "set",
			Value::Array(_) => "array",
			Value::Hash(_) => "Hash",
			Value::Object(_) => "ObjectWrapper",
			Value::Function(_) => "function",
			Value::Enum(_) | Value::Generic(_) => return None,
		})
	}

	/// Descriptor of this value. Builtin variants share one descriptor per type.
	pub fn object_def(&self) -> Option<DefRef> {
		match self {
			Value::Enum(value) => Some(value.def().clone()),
			Value::Generic(value) => Some(value.def().clone()),
			other => other.builtin_name().and_then(registry::lookup),
		}
	}

	/// Sub-value called `name`, such as a vector's `x`.
	pub fn dereference_by_name(&self, name: &str) -> Option<Value> {
		match self {
			Value::Flatvector(v) => v.component(name).map(Value::Real),
			Value::Spacevector(v) => v.component(name).map(Value::Real),
			Value::Quaternion(v) => v.component(name).map(Value::Real),
			Value::Color(v) => v.component(name).map(Value::Real),
			Value::Hash(hash) => hash.find(name).map(Value::duplicate),
			Value::Generic(value) => value.elements().find(name).map(Value::duplicate),
			Value::Set(set) | Value::Array(set) => name.parse::<usize>().ok().and_then(|index| set.get(index)).map(Value::duplicate),
			_ => None,
		}
	}

	/// Sub-value at position `index`.
	pub fn dereference_by_index(&self, index: usize) -> Option<Value> {
		match self {
			Value::Flatvector(v) => v.to_array().get(index).copied().map(Value::Real),
			Value::Spacevector(v) => v.to_array().get(index).copied().map(Value::Real),
			Value::Quaternion(v) => v.to_array().get(index).copied().map(Value::Real),
			Value::Color(v) => v.to_array().get(index).copied().map(Value::Real),
			Value::Set(set) | Value::Array(set) => set.get(index).map(Value::duplicate),
			Value::Hash(hash) => hash.value(index).map(Value::duplicate),
			Value::Generic(value) => value.elements().value(index).map(Value::duplicate),
			_ => None,
		}
	}

	/// Store `value` at `ext` inside this value.
	///
	/// An empty path replaces this value itself, converting between numbers
	/// where that is lossless enough to be expected.
	pub fn assign(&mut self, ext: &FieldExtPlace, value: &Value) -> AssignResult {
		if ext.is_empty() {
			return self.assign_whole(value);
		}

		match self {
			Value::Flatvector(v) => vector::assign_component(v, ext, value),
			Value::Spacevector(v) => vector::assign_component(v, ext, value),
			Value::Quaternion(v) => vector::assign_component(v, ext, value),
			Value::Color(v) => vector::assign_component(v, ext, value),
			Value::Set(set) | Value::Array(set) => {
				let Some(PlaceSegment::Index(index)) = ext.segment(0) else {
					return AssignResult::UnknownPath;
				};
				match set.get_mut(*index) {
					Some(element) => element.assign(&ext.tail(), value),
					None => AssignResult::UnknownPath,
				}
			}
			Value::Hash(hash) => hash.assign(ext, value),
			Value::Generic(generic) => generic.elements_mut().assign(ext, value),
			_ => AssignResult::UnknownPath,
		}
	}

	fn assign_whole(&mut self, value: &Value) -> AssignResult {
		let converted = match (&*self, value) {
			(Value::Int(_), Value::Real(d)) => Value::Int(d.round() as i64),
			(Value::Int(_), Value::Boolean(b)) => Value::Int(i64::from(*b)),
			(Value::Real(_), Value::Int(_) | Value::Boolean(_)) => match number_value(value) {
				Some((d, _)) => Value::Real(d),
				None => return AssignResult::Failed,
			},
			(Value::Boolean(_), Value::Int(i)) => Value::Boolean(*i != 0),
			(Value::Boolean(_), Value::Real(d)) => Value::Boolean(*d != 0.0),
			(Value::Enum(current), Value::Int(id)) => {
				let mut next = current.clone();
				if !next.set_from_id(*id) {
					return AssignResult::Failed;
				}
				Value::Enum(next)
			}
			(Value::Enum(current), Value::String(name)) => {
				let mut next = current.clone();
				if !next.set_from_name(name) {
					return AssignResult::Failed;
				}
				Value::Enum(next)
			}
			(current, other) if current.value_type() == other.value_type() => other.duplicate(),
			_ => return AssignResult::Failed,
		};
		*self = converted;
		AssignResult::Changed
	}

	/// Run a builtin method of this value.
	pub fn evaluate(&mut self, func: &str, context: Option<&ValueHash>, parameters: Option<&ValueHash>, log: &mut ErrorLog) -> EvalOutcome {
		match self {
			Value::Int(i) => scalar::eval_int(*i, func),
			Value::Real(d) => scalar::eval_real(*d, func),
			Value::String(text) => scalar::eval_string(text, func, parameters),
			Value::Bytes(bytes) => scalar::eval_bytes(bytes, func, parameters),
			Value::File(path) => scalar::eval_file(path, func),
			Value::Flatvector(v) => v.evaluate(func),
			Value::Spacevector(v) => v.evaluate(func),
			Value::Quaternion(v) => v.evaluate(func),
			Value::Set(set) | Value::Array(set) => set.evaluate(func, parameters, log),
			Value::Hash(hash) => hash.evaluate(func, context, parameters, log),
			Value::Generic(generic) => generic.evaluate(func, parameters, log),
			Value::Object(object) => object.evaluate(func, context, parameters, log),
			_ => EvalOutcome::NotApplicable,
		}
	}

	/// Whether `value_type` is one of the vector types.
	pub fn is_vector_type(value_type: ValueType) -> bool {
		value_type.is_vector()
	}
}

impl FunctionEvaluator for Value {
	fn evaluate(&mut self, func: &str, context: Option<&ValueHash>, parameters: Option<&ValueHash>, log: &mut ErrorLog) -> EvalOutcome {
		Value::evaluate(self, func, context, parameters, log)
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.render())
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Value::String(value.to_owned())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Value::String(value)
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Value::Int(value)
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Value::Real(value)
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Value::Boolean(value)
	}
}

#[cfg(test)]
mod tests;
