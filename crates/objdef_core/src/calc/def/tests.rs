use std::rc::Rc;

use crate::calc::{
	Attribute, DefError, DefFilter, DefFlags, DefRef, DumpMode, DumpOptions, EnumItem, FieldSpec, ObjectDef, OpDirection, Value, ValueType,
	VariableSlot,
};

fn class_with(name: &str, fields: &[&str], extends: &[DefRef]) -> DefRef {
	let mut def = ObjectDef::new_class(name, Some(name), None);
	for parent in extends {
		def.extend(Rc::clone(parent));
	}
	for field in fields {
		def.push(FieldSpec::new(*field, ValueType::Int)).expect("push field");
	}
	Rc::new(def)
}

/// A(a1, a2) <- B(b1) <- C(c1, c2) <- D()
fn chain() -> [DefRef; 4] {
	let a = class_with("A", &["a1", "a2"], &[]);
	let b = class_with("B", &["b1"], &[Rc::clone(&a)]);
	let c = class_with("C", &["c1", "c2"], &[Rc::clone(&b)]);
	let d = class_with("D", &[], &[Rc::clone(&c)]);
	[a, b, c, d]
}

fn load_shapes() -> DefRef {
	ObjectDef::read_file(objdef_testkit::fixture_path("shapes.att")).expect("fixture loads")
}

fn child<'a>(def: &'a ObjectDef, name: &str) -> &'a DefRef {
	def.find_def(name, DefFilter::ANY).unwrap_or_else(|| panic!("missing child {name}"))
}

#[test]
fn field_counts_include_inherited_fields() {
	let [a, b, c, d] = chain();

	assert_eq!(a.get_num_fields(), 2);
	assert_eq!(b.get_num_fields(), 3);
	assert_eq!(c.get_num_fields(), 5);
	assert_eq!(d.get_num_fields(), 5);

	let leaf = ObjectDef::new("x", None, None, ValueType::Int);
	assert_eq!(leaf.get_num_fields(), 1);
}

#[test]
fn actual_def_and_offset_round_trip() {
	for def in chain() {
		for index in 0..def.get_num_fields() {
			let (owner, local) = def.find_actual_def(index).expect("index in range");
			let offset = def.field_offset(owner).expect("owner reachable");
			assert_eq!(offset + local, index, "{} field {index}", def.name);
		}
		assert!(def.find_actual_def(def.get_num_fields()).is_none());
	}

	let [a, _, c, d] = chain();
	let (owner, local) = d.find_actual_def(3).expect("c1");
	assert_eq!(owner.name, "C");
	assert_eq!(local, 0);
	assert_eq!(d.get_info(3).expect("info").name, "c1");
	assert_eq!(c.get_info(0).expect("info").name, "a1");
	assert_eq!(a.get_info(1).expect("info").name, "a2");
}

#[test]
fn find_field_walks_extends_with_offsets() {
	let [_, _, c, d] = chain();

	assert_eq!(c.find_field("b1"), Some((2, "")));
	assert_eq!(c.find_field("c2.x.y"), Some((4, "x.y")));
	assert_eq!(d.find_field_index("a2"), Some(1));
	assert_eq!(d.find_field_index("nope"), None);
	assert_eq!(d.find_field("12.rest"), Some((12, "rest")));
	assert_eq!(d.find_field(".x"), None);
}

#[test]
fn capped_and_readonly_descriptors_reject_changes() {
	let mut def = ObjectDef::new_class("Locked", None, None).with_flags(DefFlags::CAPPED);
	let err = def.push(FieldSpec::new("x", ValueType::Int)).expect_err("capped");
	assert!(matches!(err, DefError::Capped { .. }));
	assert!(def.pop(0).is_err());

	let mut def = ObjectDef::new_class("Frozen", None, None).with_flags(DefFlags::READONLY);
	let err = def.push_variable("v", None, None, Value::Int(1), DefFlags::NONE).expect_err("readonly");
	assert!(matches!(err, DefError::ReadOnly { .. }));
}

#[test]
fn enum_values_only_go_into_enums() {
	let mut def = ObjectDef::new_class("NotAnEnum", None, None);
	let err = def.push_enum_value("a", None, None, None).expect_err("not an enum");
	assert!(matches!(err, DefError::NotEnum { .. }));

	let mut def = ObjectDef::new("Kind", None, None, ValueType::Enum);
	def.push_enum_value("a", None, None, None).expect("a");
	def.push_enum_value("b", None, None, Some(10)).expect("b");
	assert_eq!(def.get_num_enum_fields(), 2);
	assert_eq!(def.get_enum_info(0).expect("a").1, 0);
	assert_eq!(def.get_enum_info(1).expect("b").1, 10);
}

#[test]
fn duplicate_field_names_are_rejected() {
	let mut def = ObjectDef::new_class("Dup", None, None);
	def.push(FieldSpec::new("x", ValueType::Int)).expect("first");
	let err = def.push(FieldSpec::new("x", ValueType::Real)).expect_err("second");
	assert!(matches!(err, DefError::DuplicateField { ref field, .. } if field == "x"));
}

#[test]
fn variables_replace_in_place() {
	let mut def = ObjectDef::new("scope", None, None, ValueType::Namespace);
	assert_eq!(
		def.push_variable("count", None, None, Value::Int(1), DefFlags::NONE).expect("add"),
		VariableSlot::Added(0)
	);
	assert_eq!(
		def.push_variable("count", None, None, Value::Int(3), DefFlags::NONE).expect("replace"),
		VariableSlot::Replaced(0)
	);

	let var = def.find_def("count", DefFilter::VARIABLE).expect("variable");
	assert_eq!(var.default_value, Some(Value::Int(3)));
	assert_eq!(var.fields_format, ValueType::Int);
	assert_eq!(var.namespace(), Some("scope"));
}

#[test]
fn find_def_prefers_own_children_then_parents() {
	let mut base = ObjectDef::new_class("Base", None, None);
	base.push_function("draw", None, Some("base draw"), None, Vec::new()).expect("base draw");
	base.push_function("hide", None, None, None, Vec::new()).expect("hide");
	let base = Rc::new(base);

	let mut derived = ObjectDef::new_class("Derived", None, None).extending(Rc::clone(&base));
	derived.push_function("draw", None, Some("derived draw"), None, Vec::new()).expect("derived draw");

	let draw = derived.find_def("draw", DefFilter::FUNCTION).expect("draw");
	assert_eq!(draw.description.as_deref(), Some("derived draw"));
	assert!(derived.find_def("hide", DefFilter::FUNCTION).is_some());
	assert!(derived.find_def("hide", DefFilter::CLASS | DefFilter::VARIABLE).is_none());
}

#[test]
fn operators_keep_direction_and_priority() {
	let mut scope = ObjectDef::new("ops", None, None, ValueType::Namespace);
	scope
		.push_operator("+", OpDirection::LeftToRight, 500, Some("add"), None, DefFlags::NONE)
		.expect("push op");

	let op = scope.find_operator("+").expect("operator");
	assert_eq!(op.operator_direction(), Some(OpDirection::LeftToRight));
	assert_eq!(op.operator_priority(), Some(500));
	assert!(scope.find_operator("-").is_none());

	let script = scope.dump(&DumpOptions::script());
	assert!(script.contains("  operator + dir:'>', priority:500 Name:\"+\", doc:\"add\";\n"), "{script}");
}

#[test]
fn new_value_builds_instances() {
	let mut def = ObjectDef::new_class("Pen", None, None);
	def.push(FieldSpec::new("width", ValueType::Real).default_text("2.5")).expect("width");
	def.push(FieldSpec::new("name", ValueType::String).default_text("quill")).expect("name");
	def.push_function("draw", None, None, None, Vec::new()).expect("draw");
	let def = Rc::new(def);

	let Some(Value::Generic(pen)) = def.new_value() else {
		panic!("expected a class instance");
	};
	assert_eq!(pen.elements().len(), 2);
	assert_eq!(pen.elements().find("width"), Some(&Value::Real(2.5)));
	assert_eq!(pen.value_type(), def.fields_format);

	let mut kind = ObjectDef::new("Kind", None, None, ValueType::Enum);
	kind.push_enum_value("first", None, None, None).expect("first");
	let Some(Value::Enum(value)) = Rc::new(kind).new_value() else {
		panic!("expected an enum value");
	};
	assert_eq!(value.name(), Some("first"));
}

#[test]
fn loads_namespace_fixture() {
	let shapes = load_shapes();

	assert_eq!(shapes.name, "shapes");
	assert_eq!(shapes.label.as_deref(), Some("Shapes"));
	assert_eq!(shapes.format, ValueType::Namespace);
	assert_eq!(shapes.fields().len(), 5);

	let style = child(&shapes, "LineStyle");
	assert_eq!(style.format, ValueType::Enum);
	assert_eq!(style.get_num_enum_fields(), 3);
	assert_eq!(style.get_enum_info(2).expect("dotted").1, 4);

	let shape = child(&shapes, "Shape");
	let circle = child(&shapes, "Circle");
	let ring = child(&shapes, "Ring");
	assert_eq!(shape.get_num_fields(), 4);
	assert_eq!(circle.get_num_fields(), 7);
	assert_eq!(ring.get_num_fields(), 8);
	assert!(Rc::ptr_eq(&circle.extends()[0], shape));

	assert_eq!(ring.find_field_index("inner"), Some(7));
	assert_eq!(ring.find_field_index("width"), Some(2));
	let width = ring.get_info(2).expect("width");
	assert_eq!(width.range.as_deref(), Some("0..100"));
	assert_eq!(width.format, ValueType::Real);

	assert!(matches!(shape.fields_format, ValueType::User(_)));
	assert_ne!(shape.fields_format, circle.fields_format);

	let group = child(&shapes, "Group");
	let outline = group.find_def("outline", DefFilter::ANY).expect("outline");
	assert_eq!(outline.format, ValueType::Fields);
	assert_eq!(outline.format_str.as_deref(), Some("Circle"));
	assert_eq!(outline.fields_format, circle.fields_format);
}

#[test]
fn unknown_extends_is_an_error() {
	let att = Attribute::parse("name Orphan\nformat class\nextends NoSuchParent\n").expect("parses");
	let err = ObjectDef::from_attribute(&att, None).expect_err("unresolved parent");
	assert!(matches!(err, DefError::UnknownExtends { ref name } if name == "NoSuchParent"));
}

#[test]
fn attribute_dump_reloads() {
	let shapes = load_shapes();
	let text = shapes.dump(&DumpOptions::attribute());
	let reloaded = ObjectDef::from_attribute(&Attribute::parse(&text).expect("reparses"), None).expect("reloads");

	assert_eq!(reloaded.name, shapes.name);
	assert_eq!(reloaded.fields().len(), shapes.fields().len());
	for (a, b) in reloaded.fields().iter().zip(shapes.fields()) {
		assert_eq!(a.name, b.name);
		assert_eq!(a.format, b.format);
		assert_eq!(a.get_num_fields(), b.get_num_fields());
	}
	let ring = child(&reloaded, "Ring");
	assert_eq!(ring.get_info(3).expect("visible").default_text.as_deref(), Some("true"));

	let mut options = ObjectDef::new_class("Options", None, None);
	options.push(FieldSpec::new("mode", ValueType::Flags)).expect("mode");
	options.push(FieldSpec::new("spare", ValueType::None)).expect("spare");
	options.push(FieldSpec::new("size", ValueType::Int)).expect("size");
	options.flags = DefFlags::READONLY;
	let text = options.dump(&DumpOptions::attribute());
	let reloaded = ObjectDef::from_attribute(&Attribute::parse(&text).expect("reparses"), None).expect("flags child reloads");

	assert!(reloaded.flags.contains(DefFlags::READONLY));
	let formats: Vec<(&str, ValueType)> = reloaded.fields().iter().map(|field| (field.name.as_str(), field.format)).collect();
	assert_eq!(
		formats,
		vec![("mode", ValueType::Flags), ("spare", ValueType::None), ("size", ValueType::Int)]
	);
}

#[test]
fn script_dump_lists_declarations() {
	let shapes = load_shapes();
	let script = shapes.dump(&DumpOptions::script());

	assert!(script.starts_with("namespace shapes Name:\"Shapes\", doc:\"Drawing primitives\" {\n"), "{script}");
	assert!(script.contains("  enum LineStyle Name:\"Line style\" { solid, dashed, dotted }\n"), "{script}");
	assert!(script.contains("  class Circle extends Shape Name:\"Circle\" {\n"), "{script}");
	assert!(script.contains("    real radius = 1 Name:\"Radius\";\n"), "{script}");
	assert!(script.contains("    function area() Name:\"Area\", doc:\"Area of the circle\";\n"), "{script}");
	assert!(script.ends_with("}\n"));
}

#[test]
fn summary_and_depth_limits() {
	let shapes = load_shapes();
	let circle = child(&shapes, "Circle");

	assert_eq!(circle.summary(), "class Circle(VALUE_Flatvector center, VALUE_Real radius, VALUE_Function area)");
	assert_eq!(circle.dump(&DumpOptions::summary()), format!("{}\n", circle.summary()));

	let shallow = DumpOptions {
		max_depth: Some(1),
		include_functions: false,
		..DumpOptions::script()
	};
	let script = shapes.dump(&shallow);
	assert!(script.contains("  class Circle extends Shape Name:\"Circle\" {\n  }\n"), "{script}");
	assert!(!script.contains("area"));
}

#[test]
fn codegen_emits_constructor_calls() {
	let mut def = ObjectDef::new("Pen", Some("Pen"), None, ValueType::Class);
	def.push(FieldSpec::new("width", ValueType::Real).doc("Width", "Stroke width")).expect("width");
	def.push_enum("Tip", Some("Tip"), None, &[EnumItem::new("round", "Round", "Rounded tip")]).expect("tip");

	let options = DumpOptions {
		mode: DumpMode::Codegen,
		..DumpOptions::default()
	};
	let code = def.dump(&options);
	assert!(code.starts_with("ObjectDef *PenDef = new ObjectDef(NULL, \"Pen\", \"Pen\", NULL, \"class\",NULL,NULL);"), "{code}");
	assert!(code.contains("PenDef->push(\"width\", \"Width\", \"Stroke width\","), "{code}");
	assert!(code.contains("TipDef->pushEnumValue(\"round\", \"Round\", \"Rounded tip\");"), "{code}");
	assert!(code.contains("PenDef->push(TipDef, 1)"), "{code}");
}
