use std::path::Path;

use objdef::calc::{
	AssignResult, Attribute, Color, DefRef, FieldExtPlace, Flatvector, ObjectDef, Quaternion, SetValue, Spacevector, Value, ValueHash, ValueType, attribute_to_value, registry, unescape,
};

use crate::cmd::{CliError, Result};

/// Print a serializable payload as pretty JSON.
pub(crate) fn emit_json<T: serde::Serialize>(payload: &T) -> Result<()> {
	println!("{}", serde_json::to_string_pretty(payload)?);
	Ok(())
}

/// Read a descriptor file and register every class and enum it declares.
pub(crate) fn load_file(path: &Path) -> Result<(DefRef, usize)> {
	let root = ObjectDef::read_file(path)?;
	let registered = registry::register_tree(&root);
	log::info!("loaded {} from {} ({registered} registered)", root.name, path.display());
	Ok((root, registered))
}

/// Resolve a descriptor by name, loading `file` first when given.
///
/// The file's root answers to its own name; nested classes and enums are
/// found through the registry once the file is loaded.
pub(crate) fn resolve_def(type_name: &str, file: Option<&Path>) -> Result<DefRef> {
	if let Some(path) = file {
		let (root, _) = load_file(path)?;
		if root.name == type_name {
			return Ok(root);
		}
	}
	registry::lookup(type_name).ok_or_else(|| CliError::UnknownType { name: type_name.to_owned() })
}

/// Names of the function children of `def`, inherited ones included.
pub(crate) fn method_names(def: &ObjectDef) -> Vec<String> {
	let mut out: Vec<String> = def.extends().iter().flat_map(|parent| method_names(parent)).collect();
	out.extend(def.fields().iter().filter(|field| field.format == ValueType::Function).map(|field| field.name.clone()));
	out
}

/// Build a value of type `def` from command line text.
pub(crate) fn parse_value(def: &DefRef, text: &str) -> Result<Value> {
	let bad = || CliError::BadLiteral {
		type_name: def.name.clone(),
		text: text.to_owned(),
	};
	let mut value = def.new_value().ok_or_else(bad)?;
	if let Value::Bytes(_) = value {
		let att = Attribute::new(value.whattype(), Some(text.trim()));
		return attribute_to_value(&att).map_err(|_| bad());
	}

	match &mut value {
		Value::Null => {}
		Value::String(current) | Value::File(current) => {
			*current = match parse_literal(text) {
				Some(Value::String(quoted)) if text.trim_start().starts_with('"') => quoted,
				_ => text.to_owned(),
			};
		}
		Value::Set(set) | Value::Array(set) => {
			let (Value::Set(items) | Value::Array(items)) = parse_literal(text).ok_or_else(bad)? else {
				return Err(bad());
			};
			for item in items.values() {
				set.push(item.clone(), None);
			}
		}
		Value::Hash(hash) => {
			let Value::Hash(items) = parse_literal(text).ok_or_else(bad)? else {
				return Err(bad());
			};
			*hash = items;
		}
		Value::Generic(generic) => {
			let Value::Hash(items) = parse_literal(text).ok_or_else(bad)? else {
				return Err(bad());
			};
			for (key, item) in items.iter() {
				let Some(key) = key else {
					return Err(bad());
				};
				let place = FieldExtPlace::parse(key).0;
				if !assigned(generic.elements_mut().assign(&place, item)) {
					return Err(bad());
				}
			}
		}
		current => {
			let literal = parse_literal(text).ok_or_else(bad)?;
			if !assigned(current.assign(&FieldExtPlace::new(), &literal)) {
				return Err(bad());
			}
		}
	}
	Ok(value)
}

fn assigned(result: AssignResult) -> bool {
	matches!(result, AssignResult::Changed | AssignResult::ChangedWithSideEffects)
}

/// Read a literal: numbers, `true`/`false`, `null`, quoted strings,
/// `(x,y[,z[,w]])` vectors, `#rrggbbaa` colors, `[..]` arrays and `{..}`
/// sets or hashes. A bare word reads as a string.
pub(crate) fn parse_literal(text: &str) -> Option<Value> {
	let text = text.trim();
	if text.is_empty() {
		return None;
	}
	match text {
		"null" => return Some(Value::Null),
		"true" => return Some(Value::Boolean(true)),
		"false" => return Some(Value::Boolean(false)),
		_ => {}
	}

	if let Some(inner) = text.strip_prefix('"').and_then(|rest| rest.strip_suffix('"')) {
		return Some(Value::String(unescape(inner)));
	}
	if text.starts_with('#') {
		return Color::from_hex(text).map(Value::Color);
	}
	if let Some(inner) = text.strip_prefix('(').and_then(|rest| rest.strip_suffix(')')) {
		let parts: Vec<f64> = inner.split(',').map(|part| part.trim().parse::<f64>()).collect::<std::result::Result<_, _>>().ok()?;
		return match parts[..] {
			[x, y] => Some(Value::Flatvector(Flatvector::new(x, y))),
			[x, y, z] => Some(Value::Spacevector(Spacevector::new(x, y, z))),
			[x, y, z, w] => Some(Value::Quaternion(Quaternion::new(x, y, z, w))),
			_ => None,
		};
	}
	if let Some(inner) = text.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
		let items = split_top(inner).into_iter().map(parse_literal).collect::<Option<Vec<_>>>()?;
		return Some(Value::Array(SetValue::from_values(items)));
	}
	if let Some(inner) = text.strip_prefix('{').and_then(|rest| rest.strip_suffix('}')) {
		return parse_braces(inner);
	}

	if let Ok(int) = text.parse::<i64>() {
		return Some(Value::Int(int));
	}
	if let Ok(real) = text.parse::<f64>() {
		return Some(Value::Real(real));
	}
	Some(Value::String(text.to_owned()))
}

fn parse_braces(inner: &str) -> Option<Value> {
	if inner.trim() == ":" {
		return Some(Value::Hash(ValueHash::new()));
	}
	let items = split_top(inner);
	let keyed = items.iter().any(|item| split_key(item, ':').is_some());
	if !keyed {
		let values = items.into_iter().map(parse_literal).collect::<Option<Vec<_>>>()?;
		return Some(Value::Set(SetValue::from_values(values)));
	}

	let mut hash = ValueHash::new();
	for item in items {
		match split_key(item, ':') {
			Some((key, value)) => hash.push(key, parse_literal(value)?),
			None => hash.push_unnamed(parse_literal(item)?),
		};
	}
	Some(Value::Hash(hash))
}

/// Split on commas outside brackets and quotes. Blank input gives no items.
fn split_top(text: &str) -> Vec<&str> {
	if text.trim().is_empty() {
		return Vec::new();
	}
	let mut items = Vec::new();
	let mut depth = 0_usize;
	let mut quoted = false;
	let mut escaped = false;
	let mut start = 0;
	for (at, ch) in text.char_indices() {
		if quoted {
			match ch {
				_ if escaped => escaped = false,
				'\\' => escaped = true,
				'"' => quoted = false,
				_ => {}
			}
			continue;
		}
		match ch {
			'"' => quoted = true,
			'(' | '[' | '{' => depth += 1,
			')' | ']' | '}' => depth = depth.saturating_sub(1),
			',' if depth == 0 => {
				items.push(&text[start..at]);
				start = at + 1;
			}
			_ => {}
		}
	}
	items.push(&text[start..]);
	items
}

/// `name<sep>rest` where `name` is an identifier.
fn split_key(item: &str, sep: char) -> Option<(&str, &str)> {
	let (key, value) = item.split_once(sep)?;
	let key = key.trim();
	let ident = !key.is_empty() && key.bytes().all(|byte| byte.is_ascii_alphanumeric() || byte == b'_');
	ident.then_some((key, value))
}

/// Read a method parameter: `name=literal` or a bare positional literal.
pub(crate) fn parse_param(text: &str) -> Result<(Option<String>, Value)> {
	let (key, literal) = match split_key(text, '=') {
		Some((key, value)) => (Some(key.to_owned()), value),
		None => (None, text),
	};
	let value = parse_literal(literal).ok_or_else(|| CliError::BadLiteral {
		type_name: "parameter".to_owned(),
		text: text.to_owned(),
	})?;
	Ok((key, value))
}

/// Collect parameters into the raw hash handed to method calls.
pub(crate) fn param_hash(params: &[String]) -> Result<ValueHash> {
	let mut hash = ValueHash::new();
	for param in params {
		match parse_param(param)? {
			(Some(key), value) => hash.push(&key, value),
			(None, value) => hash.push_unnamed(value),
		};
	}
	Ok(hash)
}
