use std::path::{Component, Path};

use crate::calc::eval::EvalOutcome;
use crate::calc::{Value, ValueHash};

pub(crate) fn eval_int(i: i64, func: &str) -> EvalOutcome {
	match func {
		"abs" => EvalOutcome::value(Value::Int(i.wrapping_abs())),
		_ => EvalOutcome::NotApplicable,
	}
}

pub(crate) fn eval_real(d: f64, func: &str) -> EvalOutcome {
	match func {
		"abs" => EvalOutcome::value(Value::Real(d.abs())),
		"int" => EvalOutcome::value(Value::Int(d.trunc() as i64)),
		"fraction" => EvalOutcome::value(Value::Real(d - d.trunc())),
		_ => EvalOutcome::NotApplicable,
	}
}

fn position(parameters: Option<&ValueHash>, key: &str) -> Option<i64> {
	parameters.and_then(|params| params.find_int_or_double(key).ok()).map(|d| d as i64)
}

/// Inclusive `start..=end` clamped to `len`; a missing or negative end means the last element.
fn inclusive_span(len: usize, parameters: Option<&ValueHash>) -> Option<(usize, usize)> {
	let start = position(parameters, "start").unwrap_or(0).max(0) as usize;
	let end = match position(parameters, "end") {
		Some(end) if end >= 0 => (end as usize).min(len.checked_sub(1)?),
		_ => len.checked_sub(1)?,
	};
	(start <= end).then_some((start, end))
}

pub(crate) fn eval_string(text: &str, func: &str, parameters: Option<&ValueHash>) -> EvalOutcome {
	let chars: Vec<char> = text.chars().collect();
	match func {
		"len" => EvalOutcome::value(Value::Int(chars.len() as i64)),
		"sub" => {
			let sub = match inclusive_span(chars.len(), parameters) {
				Some((start, end)) => chars[start..=end].iter().collect(),
				None => String::new(),
			};
			EvalOutcome::value(Value::String(sub))
		}
		"find" => {
			let needle = parameters.and_then(|params| params.find_string("str").or_else(|_| params.find_string("string")).ok());
			let Some(needle) = needle else {
				return EvalOutcome::value(Value::Int(-1));
			};
			let from = (position(parameters, "from").unwrap_or(0).max(0) as usize).min(chars.len());
			let hay: String = chars[from..].iter().collect();
			let found = hay.find(needle).map_or(-1, |byte| (from + hay[..byte].chars().count()) as i64);
			EvalOutcome::value(Value::Int(found))
		}
		"replace" => {
			let start = (position(parameters, "start").unwrap_or(0).max(0) as usize).min(chars.len());
			let end = position(parameters, "end").map_or(chars.len(), |end| end.max(0) as usize).clamp(start, chars.len());
			let insert = parameters.and_then(|params| params.find_string("str").ok()).unwrap_or_default();

			let mut out: String = chars[..start].iter().collect();
			out.push_str(insert);
			out.extend(&chars[end..]);
			EvalOutcome::value(Value::String(out))
		}
		_ => EvalOutcome::NotApplicable,
	}
}

pub(crate) fn eval_bytes(bytes: &[u8], func: &str, parameters: Option<&ValueHash>) -> EvalOutcome {
	match func {
		"len" => EvalOutcome::value(Value::Int(bytes.len() as i64)),
		"sub" => {
			let sub = inclusive_span(bytes.len(), parameters).map_or_else(Vec::new, |(start, end)| bytes[start..=end].to_vec());
			EvalOutcome::value(Value::Bytes(sub))
		}
		_ => EvalOutcome::NotApplicable,
	}
}

pub(crate) fn eval_file(path: &str, func: &str) -> EvalOutcome {
	let path = Path::new(path);
	match func {
		"depth" => {
			let depth = path.components().filter(|part| matches!(part, Component::Normal(_))).count();
			EvalOutcome::value(Value::Int(depth as i64))
		}
		"dirname" => {
			let dir = path.parent().map(|dir| dir.to_string_lossy().into_owned()).unwrap_or_default();
			EvalOutcome::value(Value::File(dir))
		}
		"filename" => {
			let name = path.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default();
			EvalOutcome::value(Value::String(name))
		}
		_ => EvalOutcome::NotApplicable,
	}
}
