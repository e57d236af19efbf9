#![allow(missing_docs)]

use clap::{ArgAction, Parser, Subcommand};

mod cmd;

#[derive(Parser)]
#[command(name = "objdef", about = "Object descriptor and dynamic value tools")]
struct Cli {
	/// Log more; repeat for debug and trace output.
	#[arg(short, long, action = ArgAction::Count, global = true)]
	verbose: u8,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// List builtin descriptors and their methods.
	List(cmd::list::Args),
	/// Dump a descriptor as attribute text, script, summary or constructor code.
	Show(cmd::show::Args),
	/// Load a descriptor file and report what it declares.
	Load(cmd::load::Args),
	/// Resolve a dotted field path against a descriptor.
	Field(cmd::field::Args),
	/// Classify a numeric path against a field mask.
	Mask(cmd::mask::Args),
	/// Call a method on a value.
	Eval(cmd::eval::Args),
}

fn main() {
	let cli = Cli::parse();
	init_logging(cli.verbose);

	if let Err(err) = run(cli.command) {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn init_logging(verbose: u8) {
	let level = match verbose {
		0 => log::LevelFilter::Warn,
		1 => log::LevelFilter::Info,
		2 => log::LevelFilter::Debug,
		_ => log::LevelFilter::Trace,
	};
	env_logger::Builder::new()
		.filter_level(level)
		.parse_default_env()
		.format_timestamp(None)
		.init();
}

fn run(command: Commands) -> cmd::Result<()> {
	match command {
		Commands::List(args) => cmd::list::run(args),
		Commands::Show(args) => cmd::show::run(args),
		Commands::Load(args) => cmd::load::run(args),
		Commands::Field(args) => cmd::field::run(args),
		Commands::Mask(args) => cmd::mask::run(args),
		Commands::Eval(args) => cmd::eval::run(args),
	}
}
