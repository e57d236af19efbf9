use std::path::PathBuf;

use objdef::calc::{DefError, DefRef, ValueType, registry};

use crate::cmd::Result;
use crate::cmd::util::{emit_json, resolve_def};

#[derive(clap::Args)]
pub struct Args {
	pub type_name: String,
	/// Dotted field path, by name or flattened index, like `outline.radius`.
	pub path: String,
	#[arg(long)]
	pub file: Option<PathBuf>,
	#[arg(long)]
	pub json: bool,
}

#[derive(serde::Serialize)]
struct StepJson {
	index: usize,
	name: String,
	owner: String,
	local_index: usize,
	value_type: String,
	label: Option<String>,
	range: Option<String>,
	default: Option<String>,
}

/// Resolve a dotted path one field at a time, descending into class-typed fields.
pub fn run(args: Args) -> Result<()> {
	let Args {
		type_name,
		path,
		file,
		json,
	} = args;

	let def = resolve_def(&type_name, file.as_deref())?;
	let steps = walk(def, &path)?;

	if json {
		return emit_json(&steps);
	}

	for step in &steps {
		println!(
			"{:>3} {:<12} {:<12} {}[{}] {}",
			step.index,
			step.name,
			step.value_type,
			step.owner,
			step.local_index,
			step.label.as_deref().unwrap_or("-")
		);
	}
	Ok(())
}

fn walk(mut def: DefRef, path: &str) -> Result<Vec<StepJson>> {
	let invalid = || DefError::InvalidFieldPath { path: path.to_owned() };
	let mut steps = Vec::new();
	let mut rest = path;

	loop {
		let (index, tail) = def.find_field(rest).ok_or_else(invalid)?;
		let info = def.get_info(index).ok_or_else(|| DefError::FieldIndexOutOfRange {
			name: def.name.clone(),
			index,
			len: def.get_num_fields(),
		})?;
		let (owner, local_index) = def.find_actual_def(index).ok_or_else(invalid)?;
		let owner = owner.name.clone();
		log::debug!("{path}: {} resolves to {} in {owner}", &rest[..rest.len() - tail.len()], info.name);

		let value_type = match (&info.format_str, info.format) {
			(Some(name), ValueType::Fields | ValueType::User(_)) => name.clone(),
			(_, format) => format.name().to_owned(),
		};
		steps.push(StepJson {
			index,
			name: info.name,
			owner,
			local_index,
			value_type,
			label: info.label,
			range: info.range,
			default: info.default_text,
		});

		if tail.is_empty() {
			return Ok(steps);
		}
		rest = tail;
		def = match (info.format, info.format_str) {
			(ValueType::Fields | ValueType::User(_), Some(name)) => registry::lookup(&name).ok_or_else(invalid)?,
			_ => return Err(invalid().into()),
		};
	}
}
