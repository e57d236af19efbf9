use crate::calc::eval::{ErrorLog, EvalOutcome};
use crate::calc::{Value, ValueHash};

/// Ordered collection of owned values, backing both sets and arrays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SetValue {
	values: Vec<Value>,
	/// Element type name, for arrays that declare one.
	pub element_type: Option<String>,
}

impl SetValue {
	/// Empty collection.
	pub fn new() -> Self {
		Self::default()
	}

	/// Collection holding `values`.
	pub fn from_values(values: Vec<Value>) -> Self {
		Self { values, element_type: None }
	}

	/// Number of elements.
	pub fn len(&self) -> usize {
		self.values.len()
	}

	/// True when empty.
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// All elements in order.
	pub fn values(&self) -> &[Value] {
		&self.values
	}

	/// Element `index`.
	pub fn get(&self, index: usize) -> Option<&Value> {
		self.values.get(index)
	}

	/// Mutable element `index`.
	pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
		self.values.get_mut(index)
	}

	/// Insert at `pos`, or append when `pos` is `None` or past the end. Returns the index used.
	pub fn push(&mut self, value: Value, pos: Option<usize>) -> usize {
		let pos = pos.filter(|pos| *pos <= self.values.len()).unwrap_or(self.values.len());
		self.values.insert(pos, value);
		pos
	}

	/// Remove and return element `index`.
	pub fn remove(&mut self, index: usize) -> Option<Value> {
		(index < self.values.len()).then(|| self.values.remove(index))
	}

	/// Drop every element.
	pub fn flush(&mut self) {
		self.values.clear();
	}

	pub(crate) fn evaluate(&mut self, func: &str, parameters: Option<&ValueHash>, log: &mut ErrorLog) -> EvalOutcome {
		let int = |key: &str| parameters.and_then(|params| params.find_int(key).ok());
		let len = self.values.len();
		let in_range = |pos: Option<i64>| pos.filter(|pos| (0..len as i64).contains(pos)).map(|pos| pos as usize);

		match func {
			"n" => EvalOutcome::value(Value::Int(len as i64)),
			"removeValue" => {
				let Some(value) = parameters.and_then(|params| params.find("value")) else {
					return EvalOutcome::NotApplicable;
				};
				if let Some(index) = self.values.iter().position(|item| item == value) {
					self.values.remove(index);
				}
				EvalOutcome::done()
			}
			"push" => {
				let Some(value) = parameters.and_then(|params| params.find("value")) else {
					return EvalOutcome::NotApplicable;
				};
				let pos = int("pos").filter(|pos| *pos >= 0).map(|pos| pos as usize);
				self.push(value.duplicate(), pos);
				EvalOutcome::done()
			}
			"pop" => {
				let pos = match int("pos") {
					Some(pos) if pos >= 0 => Some(pos),
					_ => (len as i64).checked_sub(1),
				};
				match in_range(pos).and_then(|pos| self.remove(pos)) {
					Some(value) => EvalOutcome::value(value),
					None => EvalOutcome::fail(log, "Index out of range!"),
				}
			}
			"swap" | "slide" => {
				let Some(pos) = int("pos") else {
					return EvalOutcome::NotApplicable;
				};
				let (Some(pos), Some(pos2)) = (in_range(Some(pos)), in_range(int("pos2"))) else {
					return EvalOutcome::fail(log, "Index out of range!");
				};
				if func == "swap" {
					self.values.swap(pos, pos2);
				} else {
					let value = self.values.remove(pos);
					self.values.insert(pos2, value);
				}
				EvalOutcome::done()
			}
			_ => EvalOutcome::fail(log, "Unknown name!"),
		}
	}
}
