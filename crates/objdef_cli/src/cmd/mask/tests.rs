use crate::cmd::test_support::{run_objdef, run_objdef_json};

#[test]
fn mask_classifies_each_path() {
	let json = run_objdef_json(&["mask", "3.1.4,7", "3.1.4", "3", "7.2", "5", "x.1", "--json"]);
	let results: Vec<&str> = json
		.as_array()
		.expect("array")
		.iter()
		.map(|item| item["result"].as_str().expect("result"))
		.collect();

	assert_eq!(results, vec!["exact", "superset", "subset", "none", "none"]);
	assert_eq!(json[0]["depth"], 3);
	assert_eq!(json[1]["depth"], 1);
	assert_eq!(json[2]["depth"], 1);
}

#[test]
fn mask_rejects_malformed_lists() {
	let output = run_objdef(&["mask", "1..2", "1"]);
	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).starts_with("error:"));

	let output = run_objdef(&["mask", "1.2", "1"]);
	assert!(output.status.success());
	assert_eq!(String::from_utf8_lossy(&output.stdout), "1: superset (1)\n");
}
