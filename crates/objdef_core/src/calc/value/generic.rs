use std::fmt;
use std::rc::Rc;

use crate::calc::eval::{ErrorLog, EvalOutcome};
use crate::calc::{
	Color, DefFilter, DefRef, EnumValue, Flatvector, Quaternion, SetValue, Spacevector, Value, ValueHash, ValueType, parse_boolean, registry,
};

/// Instance of a class descriptor, holding one element per data field.
#[derive(Clone)]
pub struct GenericValue {
	def: DefRef,
	elements: ValueHash,
}

impl GenericValue {
	/// Instance of `def` with every data field set to its default.
	///
	/// Class-typed fields hold nested instances, except where the class is
	/// already being built further up; those fields start as `Null`.
	pub fn new(def: DefRef) -> Self {
		Self::build(def, &mut Vec::new())
	}

	fn build(def: DefRef, building: &mut Vec<DefRef>) -> Self {
		let mut fields = Vec::new();
		collect_fields(&def, &mut fields);

		building.push(Rc::clone(&def));
		let mut elements = ValueHash::new();
		for field in fields.iter().filter(|field| field.is_data()) {
			elements.push(&field.name, default_for(field, building));
		}
		building.pop();
		Self { def, elements }
	}

	/// Class descriptor.
	pub fn def(&self) -> &DefRef {
		&self.def
	}

	/// Field values keyed by field name.
	pub fn elements(&self) -> &ValueHash {
		&self.elements
	}

	/// Mutable field values.
	pub fn elements_mut(&mut self) -> &mut ValueHash {
		&mut self.elements
	}

	/// The class's own type id.
	pub fn value_type(&self) -> ValueType {
		match self.def.format {
			ValueType::Fields | ValueType::Class if self.def.fields_format != ValueType::None => self.def.fields_format,
			other => other,
		}
	}

	pub(crate) fn evaluate(&mut self, func: &str, parameters: Option<&ValueHash>, log: &mut ErrorLog) -> EvalOutcome {
		let evaluator = self
			.def
			.find_def(func, DefFilter::FUNCTION)
			.and_then(|function| function.evaluator())
			.or_else(|| self.def.evaluator())
			.cloned();
		match evaluator {
			Some(evaluator) => evaluator.borrow_mut().evaluate(func, Some(&self.elements), parameters, log),
			None => EvalOutcome::NotApplicable,
		}
	}
}

/// Every field slot of `def`, inherited ones first.
fn collect_fields(def: &DefRef, out: &mut Vec<DefRef>) {
	for parent in def.extends() {
		collect_fields(parent, out);
	}
	out.extend(def.fields().iter().cloned());
}

/// Fresh value for a field descriptor, using its default text where it has one.
fn default_for(field: &DefRef, building: &mut Vec<DefRef>) -> Value {
	if let Some(value) = &field.default_value {
		return value.duplicate();
	}
	let text = field.default_text.as_deref().map(str::trim).unwrap_or_default();
	match field.format {
		ValueType::Int => Value::Int(text.parse().unwrap_or(0)),
		ValueType::Real | ValueType::Number => Value::Real(text.parse().unwrap_or(0.0)),
		ValueType::Boolean => Value::Boolean(parse_boolean(text)),
		ValueType::String => Value::String(text.to_owned()),
		ValueType::File | ValueType::FileSave | ValueType::FileLoad => Value::File(text.to_owned()),
		ValueType::Bytes => Value::Bytes(Vec::new()),
		ValueType::Flatvector => Value::Flatvector(Flatvector::default()),
		ValueType::Spacevector => Value::Spacevector(Spacevector::default()),
		ValueType::Quaternion => Value::Quaternion(Quaternion::default()),
		ValueType::Color => Value::Color(Color::from_hex(text).unwrap_or_default()),
		ValueType::Set => Value::Set(SetValue::new()),
		ValueType::Array => Value::Array(SetValue::new()),
		ValueType::Hash => Value::Hash(ValueHash::new()),
		ValueType::Enum if field.get_num_enum_fields() > 0 => {
			let mut value = EnumValue::new(Rc::clone(field), 0);
			if !text.is_empty() && !value.set_from_name(text) {
				log::warn!("{}: no enum value {text}", field.name);
			}
			Value::Enum(value)
		}
		ValueType::Fields => match field.format_str.as_deref().and_then(registry::lookup) {
			Some(class) if building.iter().any(|outer| Rc::ptr_eq(outer, &class)) => {
				log::trace!("{}: {} nests itself, left null", field.name, class.name);
				Value::Null
			}
			Some(class) => Value::Generic(GenericValue::build(class, building)),
			None => Value::Null,
		},
		_ => Value::Null,
	}
}

impl PartialEq for GenericValue {
	fn eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.def, &other.def) && self.elements == other.elements
	}
}

impl fmt::Debug for GenericValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("GenericValue")
			.field("def", &self.def.name)
			.field("elements", &self.elements)
			.finish()
	}
}

