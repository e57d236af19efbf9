use std::cell::RefCell;
use std::rc::Rc;

use crate::calc::{ObjectDef, Value, ValueHash};

/// Result of dispatching a named function or operator.
///
/// The three outcomes drive overload resolution: `NotApplicable` tells a
/// dispatcher to try the next candidate, `Failed` stops the search because
/// this candidate was the right one but could not complete.
#[derive(Debug, Clone)]
pub enum EvalOutcome {
	/// Call succeeded, with an optional result.
	Handled(Option<Value>),
	/// Parameters not recognized by this candidate.
	NotApplicable,
	/// Parameters recognized but semantically invalid.
	Failed(String),
}

impl EvalOutcome {
	/// Success with a result value.
	pub fn value(value: Value) -> Self {
		EvalOutcome::Handled(Some(value))
	}

	/// Success with nothing to return.
	pub fn done() -> Self {
		EvalOutcome::Handled(None)
	}

	/// Record `message` as a failure in `log` and return `Failed`.
	pub fn fail(log: &mut ErrorLog, message: &str) -> Self {
		log.add(Severity::Fail, message);
		EvalOutcome::Failed(message.to_owned())
	}

	/// Numeric code: 0 success, -1 not applicable, 1 failed.
	pub fn code(&self) -> i32 {
		match self {
			EvalOutcome::Handled(_) => 0,
			EvalOutcome::NotApplicable => -1,
			EvalOutcome::Failed(_) => 1,
		}
	}

	/// Whether this outcome ends an overload search.
	pub fn is_final(&self) -> bool {
		!matches!(self, EvalOutcome::NotApplicable)
	}

	/// Result value of a successful call.
	pub fn into_value(self) -> Option<Value> {
		match self {
			EvalOutcome::Handled(value) => value,
			_ => None,
		}
	}
}

/// Severity of an [`ErrorLog`] entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
	/// Informational note.
	Info,
	/// Something odd that did not stop evaluation.
	Warning,
	/// Evaluation failed.
	Fail,
}

/// One message in an [`ErrorLog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
	/// How serious the message is.
	pub severity: Severity,
	/// Human readable text.
	pub message: String,
}

/// Messages collected while evaluating, for the caller to surface.
#[derive(Debug, Clone, Default)]
pub struct ErrorLog {
	entries: Vec<LogEntry>,
}

impl ErrorLog {
	/// Empty log.
	pub fn new() -> Self {
		Self::default()
	}

	/// Append a message.
	pub fn add(&mut self, severity: Severity, message: impl Into<String>) {
		let message = message.into();
		log::debug!("eval {severity:?}: {message}");
		self.entries.push(LogEntry { severity, message });
	}

	/// All messages in arrival order.
	pub fn entries(&self) -> &[LogEntry] {
		&self.entries
	}

	/// Most recent message text.
	pub fn last_message(&self) -> Option<&str> {
		self.entries.last().map(|entry| entry.message.as_str())
	}

	/// Whether any entry has `Fail` severity.
	pub fn has_failures(&self) -> bool {
		self.entries.iter().any(|entry| entry.severity == Severity::Fail)
	}

	/// True when nothing was logged.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Drop all messages.
	pub fn clear(&mut self) {
		self.entries.clear();
	}
}

/// Something that can run named functions.
pub trait FunctionEvaluator {
	/// Evaluate `func` with the given parameters.
	fn evaluate(&mut self, func: &str, context: Option<&ValueHash>, parameters: Option<&ValueHash>, log: &mut ErrorLog) -> EvalOutcome;
}

/// Operator associativity, stored as one character in an operator descriptor's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpDirection {
	/// Unary operator written left of its operand.
	Left,
	/// Unary operator written right of its operand.
	Right,
	/// Binary, grouping left to right.
	LeftToRight,
	/// Binary, grouping right to left.
	RightToLeft,
}

impl OpDirection {
	/// Encoding character.
	pub fn as_char(self) -> char {
		match self {
			OpDirection::Left => 'l',
			OpDirection::Right => 'r',
			OpDirection::LeftToRight => '>',
			OpDirection::RightToLeft => '<',
		}
	}

	/// Decode from the encoding character.
	pub fn from_char(ch: char) -> Option<Self> {
		match ch {
			'l' => Some(OpDirection::Left),
			'r' => Some(OpDirection::Right),
			'>' => Some(OpDirection::LeftToRight),
			'<' => Some(OpDirection::RightToLeft),
			_ => None,
		}
	}
}

/// Something that can apply operators.
pub trait OpFuncEvaluator {
	/// Apply `op` to one or two operands.
	fn op(&mut self, op: &str, dir: OpDirection, lhs: Option<&Value>, rhs: Option<&Value>, log: &mut ErrorLog) -> EvalOutcome;
}

/// Function evaluator shared by descriptors.
pub type SharedEvaluator = Rc<RefCell<dyn FunctionEvaluator>>;

/// Operator evaluator shared by descriptors.
pub type SharedOpEvaluator = Rc<RefCell<dyn OpFuncEvaluator>>;

/// Try candidates in order until one does not answer `NotApplicable`.
pub fn dispatch_first(
	candidates: &mut [&mut dyn FunctionEvaluator],
	func: &str,
	context: Option<&ValueHash>,
	parameters: Option<&ValueHash>,
	log: &mut ErrorLog,
) -> EvalOutcome {
	for candidate in candidates.iter_mut() {
		let outcome = candidate.evaluate(func, context, parameters, log);
		if outcome.is_final() {
			return outcome;
		}
	}
	EvalOutcome::NotApplicable
}

/// Call the method described by `func_def` on `target`.
///
/// Raw parameters are first lined up with the descriptor's parameter list.
/// A parameter list that cannot be mapped is not applicable to this method.
pub fn call_method(target: &mut Value, func_def: &ObjectDef, parameters: ValueHash, context: Option<&ValueHash>, log: &mut ErrorLog) -> EvalOutcome {
	let Some(mapped) = map_parameters(func_def, parameters) else {
		return EvalOutcome::NotApplicable;
	};
	target.evaluate(&func_def.name, context, Some(&mapped), log)
}

/// Apply an operator descriptor found in `scope`.
pub fn apply_operator(scope: &ObjectDef, op: &str, lhs: Option<&Value>, rhs: Option<&Value>, log: &mut ErrorLog) -> EvalOutcome {
	let Some(def) = scope.find_operator(op) else {
		return EvalOutcome::NotApplicable;
	};
	let Some(evaluator) = def.op_evaluator() else {
		return EvalOutcome::NotApplicable;
	};
	let dir = def.operator_direction().unwrap_or(OpDirection::LeftToRight);
	evaluator.borrow_mut().op(op, dir, lhs, rhs, log)
}

/// Reorder `raw` so its entries line up with the fields of `def`.
///
/// Named entries move to the position of the matching field. Unnamed
/// entries fill the remaining fields in order and take their names. Fields
/// with no parameter get a `Null` placeholder. Returns `None` when a named
/// parameter has no matching field or there are more parameters than fields.
pub fn map_parameters(def: &ObjectDef, mut raw: ValueHash) -> Option<ValueHash> {
	let count = if def.is_leaf() { 0 } else { def.get_num_fields() };

	for c in 0..count {
		let Some(info) = def.get_info(c) else {
			continue;
		};
		let name = info.name;
		if c >= raw.len() {
			raw.push(&name, Value::Null);
		}

		let named = (c..raw.len()).find(|&c2| raw.key(c2) == Some(name.as_str()));
		if let Some(c2) = named {
			if c2 != c {
				raw.swap(c2, c);
			}
			continue;
		}

		let unnamed = (c..raw.len()).find(|&c2| raw.key(c2).is_none())?;
		if unnamed != c {
			raw.swap(unnamed, c);
		}
		raw.rename_key(c, &name);
	}

	if raw.len() > count {
		log::trace!("map_parameters: {} extra parameters for {}", raw.len() - count, def.name);
		return None;
	}
	Some(raw)
}

/// How a number was stored before conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
	/// From a real.
	Real,
	/// From an integer.
	Int,
	/// From a boolean, always 0 or 1.
	Boolean,
}

/// Read a number from a real, integer or boolean value.
pub fn number_value(value: &Value) -> Option<(f64, NumberKind)> {
	match value {
		Value::Real(d) => Some((*d, NumberKind::Real)),
		Value::Int(i) => Some((*i as f64, NumberKind::Int)),
		Value::Boolean(b) => Some((if *b { 1.0 } else { 0.0 }, NumberKind::Boolean)),
		_ => None,
	}
}

/// Read an integer from a real, integer or boolean value, rounding reals.
pub fn int_value(value: &Value) -> Option<(i64, NumberKind)> {
	match value {
		Value::Real(d) => Some((d.round() as i64, NumberKind::Real)),
		Value::Int(i) => Some((*i, NumberKind::Int)),
		Value::Boolean(b) => Some((i64::from(*b), NumberKind::Boolean)),
		_ => None,
	}
}
