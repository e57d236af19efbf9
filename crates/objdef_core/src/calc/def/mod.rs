use std::fmt;
use std::rc::Rc;

use crate::calc::eval::{OpDirection, SharedEvaluator, SharedOpEvaluator};
use crate::calc::{DefError, DefFlags, GenericValue, Result, Value, ValueType};

mod dump;
mod lookup;

pub use dump::{DumpMode, DumpOptions};
pub use lookup::DefFilter;

/// Shared handle to a descriptor.
pub type DefRef = Rc<ObjectDef>;

/// Constructor producing a fresh value of a described type.
pub type NewValueFn = fn() -> Value;

/// Runtime description of a class, enum, function, operator, variable or namespace.
///
/// Children and `extends` parents are owned handles. The namespace link is
/// only the name of the defining scope and is never followed for ownership.
#[derive(Clone)]
pub struct ObjectDef {
	/// Scripting identifier, unique within its defining scope.
	pub name: String,
	/// Display label.
	pub label: Option<String>,
	/// Longer description for docs and tooltips.
	pub description: Option<String>,
	/// Range hint, or operator associativity for operators.
	pub range: Option<String>,
	/// Default value text, enum id for enum values, priority for operators.
	pub default_text: Option<String>,
	/// Bound default instance.
	pub default_value: Option<Value>,
	/// Format tag.
	pub format: ValueType,
	/// Free-form type name, used for user classes.
	pub format_str: Option<String>,
	/// Concrete type id when `format` is `Fields`.
	pub fields_format: ValueType,
	/// Descriptor flags.
	pub flags: DefFlags,
	/// Hint for dialog generators.
	pub ui_hint: Option<String>,
	/// Suggested values for dialog generators.
	pub suggestions: Vec<String>,
	/// Whether the element is a list of such elements.
	pub is_list: bool,
	namespace: Option<String>,
	extends: Vec<DefRef>,
	fields: Vec<DefRef>,
	evaluator: Option<SharedEvaluator>,
	op_evaluator: Option<SharedOpEvaluator>,
	new_func: Option<NewValueFn>,
}

/// Declaration of one child field or function parameter.
#[derive(Debug, Clone)]
pub struct FieldSpec {
	/// Field name.
	pub name: String,
	/// Display label.
	pub label: Option<String>,
	/// Description.
	pub description: Option<String>,
	/// Format tag.
	pub format: ValueType,
	/// Type name for user classes.
	pub format_str: Option<String>,
	/// Range hint.
	pub range: Option<String>,
	/// Default value text.
	pub default_text: Option<String>,
	/// Flags.
	pub flags: DefFlags,
	/// Optional constructor.
	pub new_func: Option<NewValueFn>,
}

impl FieldSpec {
	/// Field of a builtin type.
	pub fn new(name: impl Into<String>, format: ValueType) -> Self {
		Self {
			name: name.into(),
			label: None,
			description: None,
			format,
			format_str: None,
			range: None,
			default_text: None,
			flags: DefFlags::NONE,
			new_func: None,
		}
	}

	/// Field whose type is given by name, builtin or user class.
	pub fn typed(name: impl Into<String>, type_name: &str) -> Self {
		let format = ValueType::from_name(type_name);
		let mut spec = Self::new(name, format);
		if format == ValueType::Fields {
			spec.format_str = Some(type_name.to_owned());
		}
		spec
	}

	/// Set the label and description.
	pub fn doc(mut self, label: &str, description: &str) -> Self {
		self.label = Some(label.to_owned());
		self.description = Some(description.to_owned());
		self
	}

	/// Set the range hint.
	pub fn range(mut self, range: &str) -> Self {
		self.range = Some(range.to_owned());
		self
	}

	/// Set the default value text.
	pub fn default_text(mut self, text: &str) -> Self {
		self.default_text = Some(text.to_owned());
		self
	}

	/// Set flags.
	pub fn flags(mut self, flags: DefFlags) -> Self {
		self.flags = flags;
		self
	}

	/// Set the constructor.
	pub fn new_func(mut self, func: NewValueFn) -> Self {
		self.new_func = Some(func);
		self
	}
}

/// Declaration of one enum value.
#[derive(Debug, Clone)]
pub struct EnumItem {
	/// Value name.
	pub name: String,
	/// Display label.
	pub label: Option<String>,
	/// Description.
	pub description: Option<String>,
	/// Explicit id; defaults to the position.
	pub id: Option<i64>,
}

impl EnumItem {
	/// Enum value with a label and description.
	pub fn new(name: &str, label: &str, description: &str) -> Self {
		Self {
			name: name.to_owned(),
			label: Some(label.to_owned()),
			description: Some(description.to_owned()),
			id: None,
		}
	}

	/// Set an explicit id.
	pub fn id(mut self, id: i64) -> Self {
		self.id = Some(id);
		self
	}
}

/// Flattened facts about one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
	/// Field name.
	pub name: String,
	/// Display label.
	pub label: Option<String>,
	/// Description.
	pub description: Option<String>,
	/// Range hint.
	pub range: Option<String>,
	/// Default value text.
	pub default_text: Option<String>,
	/// Format tag.
	pub format: ValueType,
	/// Type name for user classes.
	pub format_str: Option<String>,
	/// Flags.
	pub flags: DefFlags,
}

impl FieldInfo {
	fn from_def(def: &ObjectDef) -> Self {
		Self {
			name: def.name.clone(),
			label: def.label.clone(),
			description: def.description.clone(),
			range: def.range.clone(),
			default_text: def.default_text.clone(),
			format: def.format,
			format_str: def.format_str.clone(),
			flags: def.flags,
		}
	}
}

/// Whether [`ObjectDef::push_variable`] added a new slot or replaced one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableSlot {
	/// New child at this index.
	Added(usize),
	/// Existing child at this index was replaced.
	Replaced(usize),
}

impl ObjectDef {
	/// Create a descriptor with no children.
	pub fn new(name: impl Into<String>, label: Option<&str>, description: Option<&str>, format: ValueType) -> Self {
		Self {
			name: name.into(),
			label: label.map(str::to_owned),
			description: description.map(str::to_owned),
			range: None,
			default_text: None,
			default_value: None,
			format,
			format_str: None,
			fields_format: ValueType::None,
			flags: DefFlags::NONE,
			ui_hint: None,
			suggestions: Vec::new(),
			is_list: false,
			namespace: None,
			extends: Vec::new(),
			fields: Vec::new(),
			evaluator: None,
			op_evaluator: None,
			new_func: None,
		}
	}

	/// Descriptor of a user class with a freshly allocated type id.
	pub fn new_class(name: impl Into<String>, label: Option<&str>, description: Option<&str>) -> Self {
		let mut def = Self::new(name, label, description, ValueType::Class);
		def.fields_format = crate::calc::registry::next_class_id();
		def.format_str = Some(def.name.clone());
		def
	}

	/// Descriptor of a variable bound to `value`. Its `fields_format` is the value's type.
	pub fn new_variable(name: impl Into<String>, label: Option<&str>, description: Option<&str>, value: Value, flags: DefFlags) -> Self {
		let mut def = Self::new(name, label, description, ValueType::Variable);
		def.fields_format = value.value_type();
		def.default_value = Some(value);
		def.flags = flags;
		def
	}

	fn from_spec(spec: FieldSpec) -> Self {
		let mut def = Self::new(spec.name, spec.label.as_deref(), spec.description.as_deref(), spec.format);
		def.format_str = spec.format_str;
		def.range = spec.range;
		def.default_text = spec.default_text;
		def.flags = spec.flags;
		def.new_func = spec.new_func;
		def
	}

	/// Set the range hint.
	pub fn with_range(mut self, range: &str) -> Self {
		self.range = Some(range.to_owned());
		self
	}

	/// Set the default value text.
	pub fn with_default(mut self, text: &str) -> Self {
		self.default_text = Some(text.to_owned());
		self
	}

	/// Bind a default value instance.
	pub fn with_default_value(mut self, value: Value) -> Self {
		self.default_value = Some(value);
		self
	}

	/// Set flags.
	pub fn with_flags(mut self, flags: DefFlags) -> Self {
		self.flags = flags;
		self
	}

	/// Set the free-form type name.
	pub fn with_format_str(mut self, format_str: &str) -> Self {
		self.format_str = Some(format_str.to_owned());
		self
	}

	/// Attach a function evaluator.
	pub fn with_evaluator(mut self, evaluator: SharedEvaluator) -> Self {
		self.evaluator = Some(evaluator);
		self
	}

	/// Attach an operator evaluator.
	pub fn with_op_evaluator(mut self, evaluator: SharedOpEvaluator) -> Self {
		self.op_evaluator = Some(evaluator);
		self
	}

	/// Attach a value constructor.
	pub fn with_new_func(mut self, func: NewValueFn) -> Self {
		self.new_func = Some(func);
		self
	}

	/// Add `parent` to the extends list.
	pub fn extending(mut self, parent: DefRef) -> Self {
		self.extend(parent);
		self
	}

	/// Append `parent` to the extends list. Cycles are not detected.
	pub fn extend(&mut self, parent: DefRef) {
		self.extends.push(parent);
	}

	/// Parents this descriptor inherits fields from, in declaration order.
	pub fn extends(&self) -> &[DefRef] {
		&self.extends
	}

	/// Own child descriptors.
	pub fn fields(&self) -> &[DefRef] {
		&self.fields
	}

	/// Own child `index`.
	pub fn field(&self, index: usize) -> Option<&DefRef> {
		self.fields.get(index)
	}

	/// Name of the scope this descriptor was declared in.
	pub fn namespace(&self) -> Option<&str> {
		self.namespace.as_deref()
	}

	/// Function evaluator, if any.
	pub fn evaluator(&self) -> Option<&SharedEvaluator> {
		self.evaluator.as_ref()
	}

	/// Operator evaluator, if any.
	pub fn op_evaluator(&self) -> Option<&SharedOpEvaluator> {
		self.op_evaluator.as_ref()
	}

	/// Whether the field list may no longer change.
	pub fn is_capped(&self) -> bool {
		self.flags.contains(DefFlags::CAPPED)
	}

	/// Whether this describes data rather than a declaration.
	pub fn is_data(&self) -> bool {
		self.format.is_data()
	}

	/// No children and no parents.
	pub fn is_leaf(&self) -> bool {
		self.fields.is_empty() && self.extends.is_empty()
	}

	/// Associativity of an operator descriptor.
	pub fn operator_direction(&self) -> Option<OpDirection> {
		if self.format != ValueType::Operator {
			return None;
		}
		self.range.as_deref().and_then(|range| range.chars().next()).and_then(OpDirection::from_char)
	}

	/// Priority of an operator descriptor.
	pub fn operator_priority(&self) -> Option<i32> {
		if self.format != ValueType::Operator {
			return None;
		}
		self.default_text.as_deref().and_then(|text| text.trim().parse().ok())
	}

	/// Numeric id of an enum value descriptor.
	pub fn enum_id(&self) -> Option<i64> {
		self.default_text.as_deref().and_then(|text| text.trim().parse().ok())
	}

	fn check_mutable(&self) -> Result<()> {
		if self.flags.contains(DefFlags::READONLY) {
			return Err(DefError::ReadOnly { name: self.name.clone() });
		}
		if self.is_capped() {
			return Err(DefError::Capped { name: self.name.clone() });
		}
		Ok(())
	}

	fn check_unique(&self, name: &str) -> Result<()> {
		if !name.is_empty() && self.fields.iter().any(|item| item.name == name) {
			return Err(DefError::DuplicateField {
				name: self.name.clone(),
				field: name.to_owned(),
			});
		}
		Ok(())
	}

	/// Append a child built from `spec`. Returns its index.
	pub fn push(&mut self, spec: FieldSpec) -> Result<usize> {
		self.push_def(Self::from_spec(spec))
	}

	/// Append a prebuilt child subtree. Returns its index.
	pub fn push_def(&mut self, mut def: ObjectDef) -> Result<usize> {
		self.check_mutable()?;
		self.check_unique(&def.name)?;
		def.namespace = Some(self.name.clone());
		self.fields.push(Rc::new(def));
		Ok(self.fields.len() - 1)
	}

	/// Append a child already shared elsewhere. Returns its index.
	pub fn push_shared(&mut self, def: DefRef) -> Result<usize> {
		self.check_mutable()?;
		self.check_unique(&def.name)?;
		self.fields.push(def);
		Ok(self.fields.len() - 1)
	}

	/// Remove and return own child `index`.
	pub fn pop(&mut self, index: usize) -> Result<DefRef> {
		self.check_mutable()?;
		if index >= self.fields.len() {
			return Err(DefError::FieldIndexOutOfRange {
				name: self.name.clone(),
				index,
				len: self.fields.len(),
			});
		}
		Ok(self.fields.remove(index))
	}

	/// Mutable access to own child `index`, if it is not shared.
	pub fn field_mut(&mut self, index: usize) -> Option<&mut ObjectDef> {
		self.fields.get_mut(index).and_then(Rc::get_mut)
	}

	/// Append one value to an enum descriptor. The id defaults to the position.
	pub fn push_enum_value(&mut self, name: &str, label: Option<&str>, description: Option<&str>, id: Option<i64>) -> Result<usize> {
		if self.format != ValueType::Enum {
			return Err(DefError::NotEnum { name: self.name.clone() });
		}
		let id = id.unwrap_or(self.fields.len() as i64);
		let def = ObjectDef::new(name, label, description, ValueType::EnumValue).with_default(&id.to_string());
		self.push_def(def)
	}

	/// Create an enum child populated with `items`. Returns its index.
	pub fn push_enum(&mut self, name: &str, label: Option<&str>, description: Option<&str>, items: &[EnumItem]) -> Result<usize> {
		let mut def = ObjectDef::new(name, label, description, ValueType::Enum);
		for item in items {
			def.push_enum_value(&item.name, item.label.as_deref(), item.description.as_deref(), item.id)?;
		}
		self.push_def(def)
	}

	/// Create a function child with the given parameter list. Returns its index.
	pub fn push_function(
		&mut self,
		name: &str,
		label: Option<&str>,
		description: Option<&str>,
		evaluator: Option<SharedEvaluator>,
		parameters: Vec<FieldSpec>,
	) -> Result<usize> {
		let mut def = ObjectDef::new(name, label, description, ValueType::Function);
		def.evaluator = evaluator;
		for spec in parameters {
			def.push(spec)?;
		}
		self.push_def(def)
	}

	/// Create an operator child. Returns its index.
	pub fn push_operator(
		&mut self,
		op: &str,
		dir: OpDirection,
		priority: i32,
		description: Option<&str>,
		evaluator: Option<SharedOpEvaluator>,
		flags: DefFlags,
	) -> Result<usize> {
		let mut def = ObjectDef::new(op, Some(op), description, ValueType::Operator)
			.with_range(&dir.as_char().to_string())
			.with_default(&priority.to_string())
			.with_flags(flags);
		def.op_evaluator = evaluator;
		self.push_def(def)
	}

	/// Add a variable child, or replace the value of an existing one.
	pub fn push_variable(&mut self, name: &str, label: Option<&str>, description: Option<&str>, value: Value, flags: DefFlags) -> Result<VariableSlot> {
		if self.flags.contains(DefFlags::READONLY) {
			return Err(DefError::ReadOnly { name: self.name.clone() });
		}
		let def = ObjectDef::new_variable(name, label, description, value, flags);
		if let Some(index) = self.fields.iter().position(|item| item.name == name) {
			let mut def = def;
			def.namespace = Some(self.name.clone());
			self.fields[index] = Rc::new(def);
			return Ok(VariableSlot::Replaced(index));
		}
		self.push_def(def).map(VariableSlot::Added)
	}

	/// Facts about flattened field `index`.
	pub fn get_info(&self, index: usize) -> Option<FieldInfo> {
		self.get_field(index).map(FieldInfo::from_def)
	}

	/// Facts about enum value `index` plus its numeric id.
	pub fn get_enum_info(&self, index: usize) -> Option<(FieldInfo, i64)> {
		let field = self.get_enum_field(index)?;
		let id = field.enum_id().unwrap_or(index as i64);
		Some((FieldInfo::from_def(field), id))
	}

	/// Construct a fresh value of the described type.
	pub fn new_value(self: &Rc<Self>) -> Option<Value> {
		if let Some(func) = self.new_func {
			return Some(func());
		}
		match self.format {
			ValueType::Class | ValueType::Fields => Some(Value::Generic(GenericValue::new(Rc::clone(self)))),
			ValueType::Enum if !self.fields.is_empty() => Some(Value::Enum(crate::calc::EnumValue::new(Rc::clone(self), 0))),
			_ => self.default_value.as_ref().map(Value::duplicate),
		}
	}
}

impl fmt::Debug for ObjectDef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ObjectDef")
			.field("name", &self.name)
			.field("format", &self.format)
			.field("fields_format", &self.fields_format)
			.field("flags", &self.flags)
			.field("extends", &self.extends.iter().map(|item| item.name.as_str()).collect::<Vec<_>>())
			.field("fields", &self.fields)
			.field("evaluator", &self.evaluator.is_some())
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests;
