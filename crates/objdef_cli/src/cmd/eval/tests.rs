use crate::cmd::test_support::{fixture_path, run_objdef, run_objdef_json};

fn stderr_of(args: &[&str]) -> String {
	let output = run_objdef(args);
	assert!(!output.status.success(), "objdef {args:?} should fail");
	String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn eval_string_methods() {
	let json = run_objdef_json(&["eval", "string", "\"hello world\"", "sub", "2", "5", "--json"]);
	assert_eq!(json["result"], "\"llo \"");
	assert_eq!(json["result_type"], "string");
	assert_eq!(json["value"], "\"hello world\"");

	let json = run_objdef_json(&["eval", "string", "hello", "replace", "str=J", "start=0", "end=1", "--json"]);
	assert_eq!(json["result"], "\"Jello\"");

	let output = run_objdef(&["eval", "string", "hello", "len"]);
	assert!(output.status.success());
	assert_eq!(String::from_utf8_lossy(&output.stdout), "5\n");
}

#[test]
fn eval_mutating_methods_report_the_new_value() {
	let json = run_objdef_json(&["eval", "set", "{1,2,3}", "pop", "--json"]);
	assert_eq!(json["result"], "3");
	assert_eq!(json["value"], "{1,2}");

	let json = run_objdef_json(&["eval", "flatvector", "(3,4)", "normalize", "--json"]);
	assert!(json["result"].is_null());
	assert_eq!(json["value"], "(0.6,0.8)");

	let json = run_objdef_json(&["eval", "Hash", "{a: 1, b: 2}", "pop", "key=a", "--json"]);
	assert_eq!(json["value"], "{ b: 2 }");

	let json = run_objdef_json(&["eval", "real", "-2.7", "int", "--json"]);
	assert_eq!(json["result"], "-2");
}

#[test]
fn eval_reports_each_failure_kind() {
	assert!(stderr_of(&["eval", "int", "3", "len"]).contains("int has no method len"));
	assert!(stderr_of(&["eval", "string", "abc", "sub", "0", "1", "2"]).contains("sub: parameters not applicable"));
	assert!(stderr_of(&["eval", "Hash", "{a: 1}", "value", "key=b"]).contains("value failed: Index out of range!"));
	assert!(stderr_of(&["eval", "int", "seven", "abs"]).contains("cannot read \"seven\" as int"));
	assert!(stderr_of(&["eval", "Nope", "1", "abs"]).contains("unknown type: Nope"));
}

#[test]
fn eval_accepts_loaded_class_instances() {
	let fixture = fixture_path("shapes.att");
	let fixture = fixture.to_string_lossy().into_owned();

	let message = stderr_of(&["eval", "Circle", "{radius: 2}", "area", "--file", &fixture]);
	assert!(message.contains("area: parameters not applicable"), "{message}");
	let message = stderr_of(&["eval", "Circle", "{radius: \"big\"}", "area", "--file", &fixture]);
	assert!(message.contains("cannot read"), "{message}");
}
