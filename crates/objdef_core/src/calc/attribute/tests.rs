use super::{Attribute, escape, unescape};

#[test]
fn parses_nested_blocks() {
	let text = "\
name Point
description A point
real x
  Name X
real y
  Name Y
";
	let root = Attribute::parse(text).expect("parses");

	assert_eq!(root.children.len(), 4);
	assert_eq!(root.find_value("name"), Some("Point"));
	assert_eq!(root.find_value("description"), Some("A point"));
	let x = &root.children[2];
	assert_eq!(x.name, "real");
	assert_eq!(x.value.as_deref(), Some("x"));
	assert_eq!(x.find_value("Name"), Some("X"));
}

#[test]
fn skips_comments_and_blank_lines() {
	let text = "# header\n\nname a\n  # inner\n  child 1\n";
	let root = Attribute::parse(text).expect("parses");

	assert_eq!(root.children.len(), 1);
	assert_eq!(root.children[0].children.len(), 1);
	assert_eq!(root.children[0].children[0].value.as_deref(), Some("1"));
}

#[test]
fn block_values_span_lines() {
	let text = "description \\\n  first line\n  second line\nname x\n";
	let root = Attribute::parse(text).expect("parses");

	assert_eq!(root.find_value("description"), Some("first line\nsecond line"));
	assert_eq!(root.find_value("name"), Some("x"));
}

#[test]
fn dump_then_parse_keeps_structure() {
	let mut root = Attribute::default();
	let field = root.push("int", Some("count"));
	field.push("Name", Some("Count"));
	field.push("description", Some("two\nlines"));
	root.push("quoted", Some(" padded "));
	root.push("flag", None);

	let text = root.dump(0);
	let back = Attribute::parse(&text).expect("reparses");

	assert_eq!(back, root);
}

#[test]
fn rejects_dedent_into_nowhere() {
	let text = "a\n    b\n  c\n";
	let err = Attribute::parse(text).expect_err("bad indentation");
	assert!(err.to_string().contains("line 3"), "{err}");
}

#[test]
fn rejects_tab_indentation() {
	assert!(Attribute::parse("a\n\tb\n").is_err());
}

#[test]
fn escape_handles_quotes_and_controls() {
	let raw = "say \"hi\"\n\tnow";
	let escaped = escape(raw, '"');
	assert_eq!(escaped, "say \\\"hi\\\"\\n\\tnow");
	assert_eq!(unescape(&escaped), raw);
}
