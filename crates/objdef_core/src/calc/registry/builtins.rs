use crate::calc::{
	Color, DefFlags, FieldSpec, Flatvector, FunctionValue, ObjectDef, Quaternion, Result, SetValue, Spacevector, Value, ValueHash, ValueType,
};

/// Names of every builtin descriptor.
pub const BUILTIN_NAMES: [&str; 16] = [
	"int",
	"real",
	"boolean",
	"string",
	"bytes",
	"flatvector",
	"spacevector",
	"quaternion",
	"Color",
	"file",
	"set",
	"array",
	"Hash",
	"null",
	"ObjectWrapper",
	"function",
];

fn int(name: &str, label: &str, description: &str) -> FieldSpec {
	FieldSpec::new(name, ValueType::Int).doc(label, description)
}

fn any(name: &str, label: &str, description: &str) -> FieldSpec {
	FieldSpec::new(name, ValueType::Any).doc(label, description)
}

fn string(name: &str, label: &str, description: &str) -> FieldSpec {
	FieldSpec::new(name, ValueType::String).doc(label, description)
}

fn class(name: &str, label: &str, description: &str, format: ValueType) -> ObjectDef {
	let mut def = ObjectDef::new(name, Some(label), Some(description), ValueType::Class);
	def.fields_format = format;
	def
}

fn method(def: &mut ObjectDef, name: &str, label: &str, description: &str, parameters: Vec<FieldSpec>) -> Result<()> {
	def.push_function(name, Some(label), Some(description), None, parameters)?;
	Ok(())
}

fn vector_methods(def: &mut ObjectDef, with_angle: bool) -> Result<()> {
	method(def, "length", "Length", "Length", Vec::new())?;
	method(def, "norm2", "Norm2", "Square of the length", Vec::new())?;
	if with_angle {
		method(def, "angle", "Angle", "atan2(y,x)", Vec::new())?;
	}
	method(def, "normalize", "Normalize", "Make length 1, keeping the direction", Vec::new())?;
	method(def, "isnull", "Is Null", "True if every component is 0", Vec::new())
}

fn pair(first: &str) -> Vec<FieldSpec> {
	vec![int("pos", "Position", first), int("pos2", "Position 2", "Second position")]
}

fn collection_methods(def: &mut ObjectDef) -> Result<()> {
	method(def, "n", "Number of elements", "Number of elements", Vec::new())?;
	method(
		def,
		"push",
		"Push",
		"Insert a value",
		vec![
			any("value", "Value", "Value to insert"),
			int("pos", "Position", "Where to insert, default is the end").default_text("-1"),
		],
	)?;
	method(
		def,
		"pop",
		"Pop",
		"Remove and return an element",
		vec![int("pos", "Position", "Which element, default is the last").default_text("-1")],
	)?;
	method(def, "swap", "Swap", "Swap two elements", pair("First position"))?;
	method(def, "slide", "Slide", "Move an element to another position", pair("From"))?;
	method(def, "removeValue", "Remove value", "Remove the first element equal to value", vec![any("value", "Value", "Value to remove")])
}

fn hash_methods(def: &mut ObjectDef) -> Result<()> {
	method(def, "n", "Number of entries", "Number of entries", Vec::new())?;
	method(def, "keys", "Keys", "Set of the keys", Vec::new())?;
	method(def, "values", "Values", "Set of the values", Vec::new())?;
	method(def, "flush", "Flush", "Remove every entry", Vec::new())?;
	method(def, "value", "Value", "Value of a key or index", vec![any("key", "Key", "Key name or index")])?;
	method(def, "key", "Key", "Key at an index", vec![int("pos", "Position", "Index of the entry")])?;
	method(
		def,
		"push",
		"Push",
		"Set a key, optionally placing it",
		vec![
			string("key", "Key", "Key name"),
			any("value", "Value", "Value to store"),
			int("pos", "Position", "Where to insert new keys").default_text("-1"),
		],
	)?;
	method(def, "pop", "Pop", "Remove an entry, returning {key, value}", vec![any("key", "Key", "Key name or index")])?;
	method(def, "swap", "Swap", "Swap two entries", pair("First position"))?;
	method(def, "slide", "Slide", "Move an entry to another position", pair("From"))
}

/// Build the builtin descriptor called `name`.
pub(super) fn make(name: &str) -> Option<Result<ObjectDef>> {
	let build = || -> Result<ObjectDef> {
		let mut def = match name {
			"int" => {
				let mut def = class(name, "Int", "Integer", ValueType::Int).with_default("0").with_new_func(|| Value::Int(0));
				method(&mut def, "abs", "Absolute value", "Absolute value", Vec::new())?;
				def
			}
			"real" => {
				let mut def = class(name, "Real", "Real number", ValueType::Real).with_default("0").with_new_func(|| Value::Real(0.0));
				method(&mut def, "abs", "Absolute value", "Absolute value", Vec::new())?;
				method(&mut def, "int", "Integer part", "Integer part, truncated toward zero", Vec::new())?;
				method(&mut def, "fraction", "Fraction", "Fractional part", Vec::new())?;
				def
			}
			"boolean" => class(name, "Boolean", "True or false", ValueType::Boolean)
				.with_default("false")
				.with_new_func(|| Value::Boolean(false)),
			"string" => {
				let mut def = class(name, "String", "Text", ValueType::String).with_new_func(|| Value::String(String::new()));
				method(&mut def, "len", "Length", "Number of characters", Vec::new())?;
				method(
					&mut def,
					"sub",
					"Substring",
					"Characters start through end inclusive",
					vec![
						int("start", "Start", "Counting from 0"),
						int("end", "End", "Counting from 0, negative means the last").default_text("-1"),
					],
				)?;
				method(
					&mut def,
					"find",
					"Find",
					"Position of str at or after from, or -1",
					vec![string("str", "String", "Text to find"), int("from", "From", "Where to start looking")],
				)?;
				method(
					&mut def,
					"replace",
					"Replace",
					"Replace characters start up to end with str",
					vec![
						string("str", "String", "Replacement text"),
						int("start", "Start", "Counting from 0"),
						int("end", "End", "One past the last replaced character"),
					],
				)?;
				def
			}
			"bytes" => {
				let mut def = class(name, "Bytes", "Raw binary data", ValueType::Bytes).with_new_func(|| Value::Bytes(Vec::new()));
				method(&mut def, "len", "Length", "Length of data", Vec::new())?;
				method(
					&mut def,
					"sub",
					"Subsection",
					"Bytes start through end inclusive",
					vec![
						int("start", "Start", "Counting from 0"),
						int("end", "End", "Counting from 0, negative means the last").default_text("-1"),
					],
				)?;
				def
			}
			"flatvector" => {
				let mut def = class(name, "Flatvector", "A two dimensional vector", ValueType::Flatvector)
					.with_default("(0,0)")
					.with_new_func(|| Value::Flatvector(Flatvector::default()));
				vector_methods(&mut def, true)?;
				def
			}
			"spacevector" => {
				let mut def = class(name, "Spacevector", "A three dimensional vector", ValueType::Spacevector)
					.with_default("(0,0,0)")
					.with_new_func(|| Value::Spacevector(Spacevector::default()));
				vector_methods(&mut def, false)?;
				def
			}
			"quaternion" => {
				let mut def = class(name, "Quaternion", "A four component rotation", ValueType::Quaternion)
					.with_default("(0,0,0,0)")
					.with_new_func(|| Value::Quaternion(Quaternion::default()));
				vector_methods(&mut def, false)?;
				def
			}
			"Color" => class(name, "Color", "A color with alpha", ValueType::Color)
				.with_default("#000000ff")
				.with_new_func(|| Value::Color(Color::default())),
			"file" => {
				let mut def = class(name, "File", "A file location", ValueType::File).with_new_func(|| Value::File(String::new()));
				method(&mut def, "depth", "Depth", "Number of path components", Vec::new())?;
				method(&mut def, "dirname", "Directory", "Everything before the last component", Vec::new())?;
				method(&mut def, "filename", "File name", "The last component", Vec::new())?;
				def
			}
			"set" => {
				let mut def = class(name, "Set", "Collection of values", ValueType::Set).with_new_func(|| Value::Set(SetValue::new()));
				collection_methods(&mut def)?;
				def
			}
			"array" => {
				let mut def = class(name, "Array", "Collection of values of one type", ValueType::Array).with_new_func(|| Value::Array(SetValue::new()));
				collection_methods(&mut def)?;
				def
			}
			"Hash" => {
				let mut def = class(name, "Hash", "Ordered names and values", ValueType::Hash).with_new_func(|| Value::Hash(ValueHash::new()));
				hash_methods(&mut def)?;
				def
			}
			"null" => class(name, "Null", "No value", ValueType::None).with_new_func(|| Value::Null),
			"ObjectWrapper" => class(name, "Object", "Opaque host object", ValueType::Object),
			"function" => class(name, "Function", "Function body", ValueType::Function).with_new_func(|| Value::Function(FunctionValue::new(""))),
			_ => unreachable!("filtered by BUILTIN_NAMES"),
		};
		def.flags |= DefFlags::CAPPED;
		Ok(def)
	};

	BUILTIN_NAMES.contains(&name).then(build)
}
