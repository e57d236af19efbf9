use std::path::PathBuf;

use objdef::calc::{DefFilter, ErrorLog, EvalOutcome, Value, call_method};

use crate::cmd::util::{emit_json, param_hash, parse_value, resolve_def};
use crate::cmd::{CliError, Result};

#[derive(clap::Args)]
pub struct Args {
	pub type_name: String,
	/// Target value as literal text, like `"hello"`, `(3,4)` or `{a: 1}`.
	#[arg(allow_negative_numbers = true)]
	pub value: String,
	pub method: String,
	/// Parameters as `name=literal` or positional literals.
	#[arg(allow_negative_numbers = true)]
	pub params: Vec<String>,
	#[arg(long)]
	pub file: Option<PathBuf>,
	#[arg(long)]
	pub json: bool,
}

#[derive(serde::Serialize)]
struct EvalJson {
	type_name: String,
	method: String,
	result: Option<String>,
	result_type: Option<String>,
	value: String,
}

/// Call a method on a value built from literal text and print the result.
pub fn run(args: Args) -> Result<()> {
	let Args {
		type_name,
		value,
		method,
		params,
		file,
		json,
	} = args;

	let def = resolve_def(&type_name, file.as_deref())?;
	let mut target = parse_value(&def, &value)?;
	let function = def.find_def(&method, DefFilter::FUNCTION).cloned().ok_or_else(|| CliError::UnknownMethod {
		type_name: def.name.clone(),
		method: method.clone(),
	})?;
	let raw = param_hash(&params)?;

	let mut log = ErrorLog::new();
	let result = match call_method(&mut target, &function, raw, None, &mut log) {
		EvalOutcome::Handled(result) => result,
		EvalOutcome::NotApplicable => return Err(CliError::NotApplicable { method }),
		EvalOutcome::Failed(message) => return Err(CliError::EvalFailed { method, message }),
	};
	for entry in log.entries() {
		log::warn!("{method}: {:?} {}", entry.severity, entry.message);
	}

	if json {
		let payload = EvalJson {
			type_name: def.name.clone(),
			method,
			result: result.as_ref().map(Value::render),
			result_type: result.as_ref().map(|value| value.value_type().to_string()),
			value: target.render(),
		};
		return emit_json(&payload);
	}

	match result {
		Some(result) => println!("{}", result.render()),
		None => println!("{}", target.render()),
	}
	Ok(())
}

#[cfg(test)]
mod tests;
