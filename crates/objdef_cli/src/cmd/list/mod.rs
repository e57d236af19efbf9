use objdef::calc::{ObjectDef, registry};

use crate::cmd::util::{emit_json, method_names};
use crate::cmd::{CliError, Result};

#[derive(clap::Args)]
pub struct Args {
	/// Only list the descriptor with this name.
	pub name: Option<String>,
	#[arg(long)]
	pub json: bool,
}

#[derive(serde::Serialize)]
struct BuiltinJson {
	name: String,
	label: Option<String>,
	value_type: String,
	methods: Vec<MethodJson>,
}

#[derive(serde::Serialize)]
struct MethodJson {
	name: String,
	parameters: Vec<String>,
}

/// Print builtin descriptors with their methods and parameters.
pub fn run(args: Args) -> Result<()> {
	let Args { name, json } = args;

	let names: Vec<&str> = match name.as_deref() {
		Some(name) if registry::is_builtin(name) => vec![name],
		Some(name) => return Err(CliError::UnknownType { name: name.to_owned() }),
		None => registry::BUILTIN_NAMES.to_vec(),
	};

	let mut rows = Vec::with_capacity(names.len());
	for name in names {
		let def = registry::lookup(name).ok_or_else(|| CliError::UnknownType { name: name.to_owned() })?;
		rows.push(describe(&def));
	}

	if json {
		return emit_json(&rows);
	}

	for row in &rows {
		println!("{:<14} {:<12} {}", row.name, row.value_type, row.label.as_deref().unwrap_or("-"));
		for method in &row.methods {
			println!("  {}({})", method.name, method.parameters.join(", "));
		}
	}
	Ok(())
}

fn describe(def: &ObjectDef) -> BuiltinJson {
	let methods = method_names(def)
		.into_iter()
		.map(|name| {
			let parameters = def
				.find_def(&name, objdef::calc::DefFilter::FUNCTION)
				.map(|function| function.fields().iter().map(|param| param.name.clone()).collect())
				.unwrap_or_default();
			MethodJson { name, parameters }
		})
		.collect();

	BuiltinJson {
		name: def.name.clone(),
		label: def.label.clone(),
		value_type: def.fields_format.name().to_owned(),
		methods,
	}
}
