use std::fmt::Write as _;

use crate::calc::Value;

/// Format a float the way C's `%g` does: six significant digits, trailing zeros dropped.
pub fn format_g(d: f64) -> String {
	if d.is_nan() {
		return "nan".to_owned();
	}
	if d.is_infinite() {
		let text = if d < 0.0 { "-inf" } else { "inf" };
		return text.to_owned();
	}
	if d == 0.0 {
		let text = if d.is_sign_negative() { "-0" } else { "0" };
		return text.to_owned();
	}

	let sci = format!("{d:.5e}");
	let Some((mantissa, exp)) = sci.split_once('e') else {
		return sci;
	};
	let exp: i32 = exp.parse().unwrap_or(0);

	if !(-4..6).contains(&exp) {
		let sign = if exp < 0 { '-' } else { '+' };
		return format!("{}e{sign}{:02}", trim_zeros(mantissa), exp.abs());
	}
	let decimals = usize::try_from(5 - exp).unwrap_or(0);
	trim_zeros(&format!("{d:.decimals$}")).to_owned()
}

fn trim_zeros(text: &str) -> &str {
	if !text.contains('.') {
		return text;
	}
	text.trim_end_matches('0').trim_end_matches('.')
}

fn quote(text: &str) -> String {
	let mut out = String::with_capacity(text.len() + 2);
	out.push('"');
	for ch in text.chars() {
		match ch {
			'\t' => out.push_str("\\t"),
			'\n' => out.push_str("\\n"),
			c => out.push(c),
		}
	}
	out.push('"');
	out
}

fn join(values: &[Value]) -> String {
	values.iter().map(Value::render).collect::<Vec<_>>().join(",")
}

impl Value {
	/// Script-readable text of this value.
	pub fn render(&self) -> String {
		match self {
			Value::Null => "null".to_owned(),
			Value::Boolean(b) => b.to_string(),
			Value::Int(i) => i.to_string(),
			Value::Real(d) => format_g(*d),
			Value::String(text) => quote(text),
			Value::Bytes(_) => "(binary data)".to_owned(),
			Value::Flatvector(v) => format!("({},{})", format_g(v.x), format_g(v.y)),
			Value::Spacevector(v) => format!("({},{},{})", format_g(v.x), format_g(v.y), format_g(v.z)),
			Value::Quaternion(v) => format!("({},{},{},{})", format_g(v.x), format_g(v.y), format_g(v.z), format_g(v.w)),
			Value::Color(color) => color.hex(),
			Value::File(path) => quote(path),
			Value::Enum(value) => value.name().unwrap_or_default().to_owned(),
			Value::Set(set) => format!("{{{}}}", join(set.values())),
			Value::Array(set) => format!("[{}]", join(set.values())),
			Value::Hash(hash) => hash.render(),
			Value::Generic(value) => value.elements().render(),
			Value::Object(object) => object.type_name().to_owned(),
			Value::Function(function) => function.code.clone(),
		}
	}

	/// Write the text form into `buffer` if it fits in `capacity` bytes.
	///
	/// Returns 0 after writing, or the capacity needed without touching
	/// `buffer`, so the caller can grow and retry.
	pub fn render_to_text(&self, buffer: &mut String, capacity: usize) -> usize {
		let text = self.render();
		if text.len() > capacity {
			return text.len();
		}
		buffer.clear();
		let _ = buffer.write_str(&text);
		0
	}
}
