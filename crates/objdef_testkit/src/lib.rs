//! Shared test helpers for workspace crates.

use std::path::{Path, PathBuf};

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve a fixture path under `<workspace>/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
	workspace_root().join("fixtures").join(name)
}

/// Resolve the workspace target directory.
pub fn target_dir() -> PathBuf {
	std::env::var_os("CARGO_TARGET_DIR")
		.map(PathBuf::from)
		.unwrap_or_else(|| workspace_root().join("target"))
}

/// Parse command output as JSON, naming the command in the panic message.
pub fn parse_json(label: &str, stdout: &[u8]) -> serde_json::Value {
	serde_json::from_slice(stdout).unwrap_or_else(|err| panic!("{label}: stdout is not valid json ({err}): {}", String::from_utf8_lossy(stdout)))
}

/// Names of the object entries in a JSON array, read from `key`.
pub fn names(items: &serde_json::Value, key: &str) -> Vec<String> {
	items
		.as_array()
		.map(|items| items.iter().filter_map(|item| item[key].as_str().map(str::to_owned)).collect())
		.unwrap_or_default()
}

#[cfg(test)]
mod tests {
	use super::{fixture_path, names, parse_json};

	#[test]
	fn fixture_path_points_into_workspace() {
		let path = fixture_path("shapes.att");
		assert!(path.ends_with("fixtures/shapes.att"));
		assert!(path.exists(), "missing fixture {}", path.display());
	}

	#[test]
	fn names_reads_one_key_per_entry() {
		let json = parse_json("inline", br#"[{"name":"a"},{"name":"b"},{"other":1}]"#);
		assert_eq!(names(&json, "name"), vec!["a", "b"]);
		assert!(names(&json["missing"], "name").is_empty());
	}
}
