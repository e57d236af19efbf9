use std::path::PathBuf;
use std::process::{Command, Output};
use std::sync::OnceLock;

use objdef_testkit::{fixture_path as shared_fixture_path, parse_json, target_dir as workspace_target_dir};

static OBJDEF_BIN: OnceLock<PathBuf> = OnceLock::new();

pub(crate) fn fixture_path(name: &str) -> PathBuf {
	shared_fixture_path(name)
}

pub(crate) fn run_objdef(args: &[&str]) -> Output {
	Command::new(objdef_bin()).args(args).output().expect("objdef command executes")
}

pub(crate) fn run_objdef_json(args: &[&str]) -> serde_json::Value {
	let output = run_objdef(args);
	assert!(
		output.status.success(),
		"objdef command failed with status={}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	parse_json(&args.join(" "), &output.stdout)
}

fn objdef_bin() -> &'static PathBuf {
	OBJDEF_BIN.get_or_init(resolve_objdef_bin)
}

fn resolve_objdef_bin() -> PathBuf {
	if let Ok(path) = std::env::var("CARGO_BIN_EXE_objdef") {
		return PathBuf::from(path);
	}

	let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
	let target_dir = workspace_target_dir();

	let mut bin = target_dir.join("debug");
	bin.push(if cfg!(windows) { "objdef.exe" } else { "objdef" });

	let status = Command::new("cargo")
		.current_dir(&manifest_dir)
		.args(["build", "--quiet", "--bin", "objdef"])
		.status()
		.expect("cargo build executes");
	assert!(status.success(), "failed to build objdef binary at {}", bin.display());

	bin
}
