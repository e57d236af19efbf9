use std::path::PathBuf;

use objdef::calc::{ObjectDef, ValueType};

use crate::cmd::Result;
use crate::cmd::util::{emit_json, load_file};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
}

#[derive(serde::Serialize)]
struct LoadJson {
	path: String,
	name: String,
	registered: usize,
	declarations: Vec<DeclJson>,
}

#[derive(serde::Serialize)]
struct DeclJson {
	path: String,
	kind: String,
	extends: Vec<String>,
	fields: usize,
	enum_values: usize,
}

/// Load a descriptor file, register its classes and enums, and list them.
pub fn run(args: Args) -> Result<()> {
	let Args { path, json } = args;

	let (root, registered) = load_file(&path)?;
	let mut declarations = Vec::new();
	collect(&root, &root.name, &mut declarations);

	if json {
		let payload = LoadJson {
			path: path.display().to_string(),
			name: root.name.clone(),
			registered,
			declarations,
		};
		return emit_json(&payload);
	}

	println!("path: {}", path.display());
	println!("name: {}", root.name);
	println!("registered: {registered}");
	for decl in &declarations {
		let extends = if decl.extends.is_empty() { String::new() } else { format!(" extends {}", decl.extends.join(", ")) };
		match decl.kind.as_str() {
			"enum" => println!("{} {}{extends} ({} values)", decl.kind, decl.path, decl.enum_values),
			_ => println!("{} {}{extends} ({} fields)", decl.kind, decl.path, decl.fields),
		}
	}
	Ok(())
}

fn collect(def: &ObjectDef, path: &str, out: &mut Vec<DeclJson>) {
	for field in def.fields() {
		if !matches!(field.format, ValueType::Class | ValueType::Enum | ValueType::Namespace) {
			continue;
		}
		let child_path = format!("{path}.{}", field.name);
		out.push(DeclJson {
			path: child_path.clone(),
			kind: field.type_name().to_owned(),
			extends: field.extends().iter().map(|parent| parent.name.clone()).collect(),
			fields: field.get_num_fields(),
			enum_values: field.get_num_enum_fields(),
		});
		collect(field, &child_path, out);
	}
}
