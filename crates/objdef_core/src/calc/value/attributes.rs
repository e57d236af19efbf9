use std::fmt::Write as _;

use super::vector::parse_components;
use crate::calc::{
	Attribute, Color, DefError, EnumValue, Flatvector, FunctionValue, GenericValue, Quaternion, Result, SetValue, Spacevector, Value, ValueHash, registry,
};

/// Read a boolean setting: `1`, `yes` or `true` is on, `0`, `no`, `false` or blank is off.
///
/// Anything else counts as on.
pub fn parse_boolean(text: &str) -> bool {
	let text = text.trim();
	if text.is_empty() {
		return false;
	}
	!["0", "no", "false"].iter().any(|off| text.eq_ignore_ascii_case(off))
}

fn hex(bytes: &[u8]) -> String {
	let mut out = String::with_capacity(bytes.len() * 2);
	for byte in bytes {
		let _ = write!(out, "{byte:02x}");
	}
	out
}

fn unhex(text: &str) -> Option<Vec<u8>> {
	if text.len() % 2 != 0 || !text.is_ascii() {
		return None;
	}
	(0..text.len())
		.step_by(2)
		.map(|at| u8::from_str_radix(&text[at..at + 2], 16).ok())
		.collect()
}

fn push_entries(att: &mut Attribute, hash: &ValueHash) {
	for (key, value) in hash.iter() {
		let item = att.push("key", key);
		item.push_attribute(value.to_attribute());
	}
}

fn read_entries(att: &Attribute, hash: &mut ValueHash) -> Result<()> {
	for item in att.children.iter().filter(|item| item.name == "key") {
		let Some(inner) = item.children.first() else {
			return Err(DefError::UnknownAttributeValue { name: item.name.clone() });
		};
		let value = attribute_to_value(inner)?;
		match item.value.as_deref() {
			Some(key) => hash.push(key, value),
			None => hash.push_unnamed(value),
		};
	}
	Ok(())
}

impl Value {
	/// Class identifier used as the attribute name of this value.
	pub fn whattype(&self) -> &'static str {
		match self {
			Value::Null => "NullValue",
			Value::Boolean(_) => "BooleanValue",
			Value::Int(_) => "IntValue",
			Value::Real(_) => "DoubleValue",
			Value::String(_) => "StringValue",
			Value::Bytes(_) => "BytesValue",
			Value::Flatvector(_) => "FlatvectorValue",
			Value::Spacevector(_) => "SpacevectorValue",
			Value::Quaternion(_) => "QuaternionValue",
			Value::Color(_) => "ColorValue",
			Value::File(_) => "FileValue",
			Value::Enum(_) => "EnumValue",
			Value::Set(_) => "SetValue",
			Value::Array(_) => "ArrayValue",
			Value::Hash(_) => "ValueHash",
			Value::Generic(_) => "GenericValue",
			Value::Object(_) => "ObjectValue",
			Value::Function(_) => "FunctionValue",
		}
	}

	/// Attribute form: `<whattype> <text>`, with nested entries for collections.
	pub fn to_attribute(&self) -> Attribute {
		let mut att = Attribute::new(self.whattype(), None);
		match self {
			Value::Null => {}
			Value::String(text) | Value::File(text) => att.value = Some(text.clone()),
			Value::Real(d) => att.value = Some(d.to_string()),
			Value::Bytes(bytes) => att.value = Some(hex(bytes)),
			Value::Function(function) => att.value = Some(function.code.clone()),
			Value::Enum(value) => att.value = Some(format!("{}.{}", value.def().name, value.name().unwrap_or_default())),
			Value::Set(set) | Value::Array(set) => {
				if let Some(element_type) = &set.element_type {
					att.push("elementtype", Some(element_type));
				}
				for item in set.values() {
					att.push_attribute(item.to_attribute());
				}
			}
			Value::Hash(hash) => push_entries(&mut att, hash),
			Value::Generic(value) => {
				att.value = Some(value.def().name.clone());
				push_entries(&mut att, value.elements());
			}
			other => att.value = Some(other.render()),
		}
		att
	}
}

/// Rebuild a value from the attribute written by [`Value::to_attribute`].
///
/// Enum and class instances are resolved through the descriptor registry.
pub fn attribute_to_value(att: &Attribute) -> Result<Value> {
	let unknown = || DefError::UnknownAttributeValue { name: att.name.clone() };
	let text = att.value.as_deref().unwrap_or_default();
	let components = |count: usize| parse_components(text, count).ok_or_else(unknown);

	let value = match att.name.as_str() {
		"NullValue" => Value::Null,
		"BooleanValue" => Value::Boolean(parse_boolean(text)),
		"IntValue" => Value::Int(text.trim().parse().map_err(|_| unknown())?),
		"DoubleValue" => Value::Real(text.trim().parse().map_err(|_| unknown())?),
		"StringValue" => Value::String(text.to_owned()),
		"FileValue" => Value::File(text.to_owned()),
		"FunctionValue" => Value::Function(FunctionValue::new(text)),
		"BytesValue" => Value::Bytes(unhex(text.trim()).ok_or_else(unknown)?),
		"ColorValue" => Value::Color(Color::from_hex(text.trim()).ok_or_else(unknown)?),
		"FlatvectorValue" => {
			let c = components(2)?;
			Value::Flatvector(Flatvector::new(c[0], c[1]))
		}
		"SpacevectorValue" => {
			let c = components(3)?;
			Value::Spacevector(Spacevector::new(c[0], c[1], c[2]))
		}
		"QuaternionValue" => {
			let c = components(4)?;
			Value::Quaternion(Quaternion::new(c[0], c[1], c[2], c[3]))
		}
		"EnumValue" => {
			let (def_name, item) = text.rsplit_once('.').ok_or_else(unknown)?;
			let def = registry::lookup(def_name).ok_or_else(unknown)?;
			let mut value = EnumValue::new(def, 0);
			if !value.set_from_name(item) {
				return Err(unknown());
			}
			Value::Enum(value)
		}
		"SetValue" | "ArrayValue" => {
			let mut set = SetValue::new();
			for item in &att.children {
				if item.name == "elementtype" {
					set.element_type = item.value.clone();
				} else {
					set.push(attribute_to_value(item)?, None);
				}
			}
			if att.name == "SetValue" { Value::Set(set) } else { Value::Array(set) }
		}
		"ValueHash" => {
			let mut hash = ValueHash::new();
			read_entries(att, &mut hash)?;
			Value::Hash(hash)
		}
		"GenericValue" => {
			let def = registry::lookup(text).ok_or_else(unknown)?;
			let mut generic = GenericValue::new(def);
			read_entries(att, generic.elements_mut())?;
			Value::Generic(generic)
		}
		_ => return Err(unknown()),
	};
	Ok(value)
}
