use crate::calc::eval::{ErrorLog, EvalOutcome, FunctionEvaluator};
use crate::calc::{SetValue, Value, ValueHash};

impl ValueHash {
	/// Entry `key` given as an index or a key name.
	fn resolve(&self, key: &Value) -> Option<usize> {
		match key {
			Value::Int(index) => usize::try_from(*index).ok().filter(|index| *index < self.len()),
			Value::String(name) => self.find_index(name),
			_ => None,
		}
	}

	fn position(&self, parameters: &ValueHash, key: &str) -> Option<Option<usize>> {
		let pos = parameters.find_int(key).ok()?;
		Some(usize::try_from(pos).ok().filter(|pos| *pos < self.len()))
	}

	/// Run one of the map's builtin methods.
	///
	/// `n`, `keys`, `values` and `flush` need no parameters. The rest answer
	/// `NotApplicable` when called without any, so another overload can take
	/// the call.
	pub fn evaluate(&mut self, func: &str, _context: Option<&ValueHash>, parameters: Option<&ValueHash>, log: &mut ErrorLog) -> EvalOutcome {
		match func {
			"n" => return EvalOutcome::value(Value::Int(self.len() as i64)),
			"keys" => {
				let keys = self.keys().map(|key| key.map_or(Value::Null, Value::from)).collect();
				return EvalOutcome::value(Value::Set(SetValue::from_values(keys)));
			}
			"values" => {
				let values = self.values().iter().map(Value::duplicate).collect();
				return EvalOutcome::value(Value::Set(SetValue::from_values(values)));
			}
			"flush" => {
				self.flush();
				return EvalOutcome::done();
			}
			_ => {}
		}

		let Some(parameters) = parameters else {
			return EvalOutcome::NotApplicable;
		};

		match func {
			"value" | "pop" => {
				let Some(key) = parameters.find("key") else {
					return EvalOutcome::fail(log, "Missing parameter!");
				};
				let Some(index) = self.resolve(key) else {
					return EvalOutcome::fail(log, "Index out of range!");
				};
				if func == "value" {
					return EvalOutcome::value(self.values()[index].duplicate());
				}
				match self.remove(index) {
					Some((key, value)) => {
						let key = key.map_or(Value::Null, Value::String);
						EvalOutcome::value(Value::Set(SetValue::from_values(vec![key, value])))
					}
					None => EvalOutcome::fail(log, "Index out of range!"),
				}
			}
			"key" => match self.position(parameters, "pos") {
				None => EvalOutcome::NotApplicable,
				Some(None) => EvalOutcome::fail(log, "Index out of range!"),
				Some(Some(index)) => EvalOutcome::value(self.key(index).map_or(Value::Null, Value::from)),
			},
			"push" => {
				let (Ok(key), Some(value)) = (parameters.find_string("key"), parameters.find("value")) else {
					return EvalOutcome::NotApplicable;
				};
				let pos = parameters.find_int("pos").ok().and_then(|pos| usize::try_from(pos).ok());
				self.push_at(Some(key), value.duplicate(), pos);
				EvalOutcome::done()
			}
			"swap" | "slide" => {
				let Some(pos) = self.position(parameters, "pos") else {
					return EvalOutcome::NotApplicable;
				};
				let (Some(pos), Some(Some(pos2))) = (pos, self.position(parameters, "pos2")) else {
					return EvalOutcome::fail(log, "Index out of range!");
				};
				if func == "swap" {
					self.swap(pos, pos2);
				} else {
					self.slide(pos, pos2);
				}
				EvalOutcome::done()
			}
			_ => EvalOutcome::fail(log, "Unknown name!"),
		}
	}
}

impl FunctionEvaluator for ValueHash {
	fn evaluate(&mut self, func: &str, context: Option<&ValueHash>, parameters: Option<&ValueHash>, log: &mut ErrorLog) -> EvalOutcome {
		ValueHash::evaluate(self, func, context, parameters, log)
	}
}
