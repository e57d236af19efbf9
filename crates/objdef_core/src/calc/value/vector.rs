use crate::calc::eval::{EvalOutcome, number_value};
use crate::calc::{AssignResult, FieldExtPlace, Value};

/// Two component vector.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Flatvector {
	/// X.
	pub x: f64,
	/// Y.
	pub y: f64,
}

/// Three component vector.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Spacevector {
	/// X.
	pub x: f64,
	/// Y.
	pub y: f64,
	/// Z.
	pub z: f64,
}

/// Four component rotation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Quaternion {
	/// X.
	pub x: f64,
	/// Y.
	pub y: f64,
	/// Z.
	pub z: f64,
	/// W.
	pub w: f64,
}

/// RGBA color with channels in `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
	/// Red.
	pub r: f64,
	/// Green.
	pub g: f64,
	/// Blue.
	pub b: f64,
	/// Alpha.
	pub a: f64,
}

impl Default for Color {
	fn default() -> Self {
		Self { r: 0.0, g: 0.0, b: 0.0, a: 1.0 }
	}
}

/// Named float components shared by vectors and colors.
pub(crate) trait Components {
	const NAMES: &'static [&'static str];

	fn to_array(&self) -> Vec<f64>;

	fn set_at(&mut self, index: usize, d: f64);

	fn component(&self, name: &str) -> Option<f64> {
		let index = Self::NAMES.iter().position(|item| *item == name)?;
		self.to_array().get(index).copied()
	}
}

impl Components for Flatvector {
	const NAMES: &'static [&'static str] = &["x", "y"];

	fn to_array(&self) -> Vec<f64> {
		vec![self.x, self.y]
	}

	fn set_at(&mut self, index: usize, d: f64) {
		match index {
			0 => self.x = d,
			_ => self.y = d,
		}
	}
}

impl Components for Spacevector {
	const NAMES: &'static [&'static str] = &["x", "y", "z"];

	fn to_array(&self) -> Vec<f64> {
		vec![self.x, self.y, self.z]
	}

	fn set_at(&mut self, index: usize, d: f64) {
		match index {
			0 => self.x = d,
			1 => self.y = d,
			_ => self.z = d,
		}
	}
}

impl Components for Quaternion {
	const NAMES: &'static [&'static str] = &["x", "y", "z", "w"];

	fn to_array(&self) -> Vec<f64> {
		vec![self.x, self.y, self.z, self.w]
	}

	fn set_at(&mut self, index: usize, d: f64) {
		match index {
			0 => self.x = d,
			1 => self.y = d,
			2 => self.z = d,
			_ => self.w = d,
		}
	}
}

impl Components for Color {
	const NAMES: &'static [&'static str] = &["r", "g", "b", "a"];

	fn to_array(&self) -> Vec<f64> {
		vec![self.r, self.g, self.b, self.a]
	}

	fn set_at(&mut self, index: usize, d: f64) {
		match index {
			0 => self.r = d,
			1 => self.g = d,
			2 => self.b = d,
			_ => self.a = d,
		}
	}
}

/// Write one named component. Touching a component changes the whole vector.
pub(crate) fn assign_component<T: Components>(target: &mut T, ext: &FieldExtPlace, value: &Value) -> AssignResult {
	if ext.len() != 1 {
		return AssignResult::UnknownPath;
	}
	let Some(index) = ext.name_at(0).and_then(|name| T::NAMES.iter().position(|item| *item == name)) else {
		return AssignResult::UnknownPath;
	};
	let Some((d, _)) = number_value(value) else {
		return AssignResult::Failed;
	};
	target.set_at(index, d);
	AssignResult::ChangedWithSideEffects
}

fn norm2(components: &[f64]) -> f64 {
	components.iter().map(|c| c * c).sum()
}

fn vector_method<T: Components>(target: &mut T, func: &str) -> EvalOutcome {
	let components = target.to_array();
	match func {
		"length" => EvalOutcome::value(Value::Real(norm2(&components).sqrt())),
		"norm2" => EvalOutcome::value(Value::Real(norm2(&components))),
		"isnull" => EvalOutcome::value(Value::Boolean(components.iter().all(|c| *c == 0.0))),
		"normalize" => {
			let length = norm2(&components).sqrt();
			if length != 0.0 {
				for (index, c) in components.iter().enumerate() {
					target.set_at(index, c / length);
				}
			}
			EvalOutcome::done()
		}
		_ => EvalOutcome::NotApplicable,
	}
}

impl Flatvector {
	/// Vector from components.
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub(crate) fn evaluate(&mut self, func: &str) -> EvalOutcome {
		if func == "angle" {
			return EvalOutcome::value(Value::Real(self.y.atan2(self.x)));
		}
		vector_method(self, func)
	}
}

impl Spacevector {
	/// Vector from components.
	pub fn new(x: f64, y: f64, z: f64) -> Self {
		Self { x, y, z }
	}

	pub(crate) fn evaluate(&mut self, func: &str) -> EvalOutcome {
		vector_method(self, func)
	}
}

impl Quaternion {
	/// Quaternion from components.
	pub fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
		Self { x, y, z, w }
	}

	pub(crate) fn evaluate(&mut self, func: &str) -> EvalOutcome {
		vector_method(self, func)
	}
}

impl Color {
	/// Color from channels.
	pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// `#rrggbbaa`.
	pub fn hex(&self) -> String {
		let byte = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
		format!("#{:02x}{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b), byte(self.a))
	}

	/// Parse `#rrggbb` or `#rrggbbaa`.
	pub fn from_hex(text: &str) -> Option<Self> {
		let digits = text.strip_prefix('#')?;
		if !digits.is_ascii() || (digits.len() != 6 && digits.len() != 8) {
			return None;
		}
		let channel = |at: usize| u8::from_str_radix(&digits[at..at + 2], 16).ok().map(|c| f64::from(c) / 255.0);
		let a = if digits.len() == 8 { channel(6)? } else { 1.0 };
		Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, a))
	}
}

/// Parse `(a,b,...)` into exactly `count` floats.
pub(crate) fn parse_components(text: &str, count: usize) -> Option<Vec<f64>> {
	let inner = text.trim().strip_prefix('(')?.strip_suffix(')')?;
	let parts: Vec<f64> = inner.split(',').map(|part| part.trim().parse::<f64>()).collect::<Result<_, _>>().ok()?;
	(parts.len() == count).then_some(parts)
}
