use std::path::PathBuf;

use objdef::calc::{DumpMode, DumpOptions};

use crate::cmd::Result;
use crate::cmd::util::resolve_def;

#[derive(Clone, Copy, clap::ValueEnum)]
pub enum Mode {
	Attribute,
	Script,
	Summary,
	Codegen,
}

impl From<Mode> for DumpMode {
	fn from(mode: Mode) -> Self {
		match mode {
			Mode::Attribute => DumpMode::Attribute,
			Mode::Script => DumpMode::Script,
			Mode::Summary => DumpMode::Summary,
			Mode::Codegen => DumpMode::Codegen,
		}
	}
}

#[derive(clap::Args)]
pub struct Args {
	/// Builtin or registered descriptor name, or the root name of `--file`.
	pub type_name: String,
	/// Descriptor file to load first.
	#[arg(long)]
	pub file: Option<PathBuf>,
	#[arg(long, value_enum, default_value = "script")]
	pub mode: Mode,
	/// Deepest nesting level written.
	#[arg(long)]
	pub depth: Option<usize>,
	/// Leave functions and operators out.
	#[arg(long)]
	pub no_functions: bool,
	#[arg(long, default_value_t = 0)]
	pub indent: usize,
}

/// Dump one descriptor in the selected form.
pub fn run(args: Args) -> Result<()> {
	let Args {
		type_name,
		file,
		mode,
		depth,
		no_functions,
		indent,
	} = args;

	let def = resolve_def(&type_name, file.as_deref())?;
	let defaults = match mode {
		Mode::Summary => DumpOptions::summary(),
		other => DumpOptions {
			mode: other.into(),
			..DumpOptions::attribute()
		},
	};
	let options = DumpOptions {
		indent,
		max_depth: depth.or(defaults.max_depth),
		include_functions: !no_functions,
		..defaults
	};

	print!("{}", def.dump(&options));
	Ok(())
}
