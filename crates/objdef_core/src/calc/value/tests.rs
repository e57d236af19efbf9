use std::cell::RefCell;
use std::rc::Rc;

use crate::calc::{
	AssignResult, Attribute, Color, DefFilter, DefRef, EnumValue, ErrorLog, EvalOutcome, FieldExtPlace, FieldSpec, Flatvector, FunctionEvaluator,
	GenericValue, ObjectDef, ObjectValue, SetValue, Spacevector, Value, ValueHash, ValueType, WrappedObject, attribute_to_value, call_method,
	dispatch_first, registry,
};

fn abc_enum(name: &str) -> DefRef {
	let mut def = ObjectDef::new(name, None, None, ValueType::Enum);
	for item in ["a", "b", "c"] {
		def.push_enum_value(item, None, None, None).expect("enum value");
	}
	Rc::new(def)
}

fn place(text: &str) -> FieldExtPlace {
	FieldExtPlace::parse(text).0
}

fn eval(target: &mut Value, func: &str, parameters: Option<&ValueHash>) -> EvalOutcome {
	let mut log = ErrorLog::new();
	target.evaluate(func, None, parameters, &mut log)
}

fn params(items: &[(&str, Value)]) -> ValueHash {
	let mut hash = ValueHash::new();
	for (key, value) in items {
		hash.push(key, value.clone());
	}
	hash
}

fn result(outcome: EvalOutcome) -> Value {
	match outcome {
		EvalOutcome::Handled(Some(value)) => value,
		other => panic!("expected a result, got {other:?}"),
	}
}

#[test]
fn duplicate_is_deep_and_renders_the_same() {
	let mut inner = ValueHash::new();
	inner.push("pos", Value::Flatvector(Flatvector::new(1.0, 2.0)));
	let original = Value::Set(SetValue::from_values(vec![Value::Int(1), Value::Hash(inner), Value::from("x")]));

	let mut copy = original.duplicate();
	assert_eq!(copy.render(), original.render());
	assert_eq!(original.render(), "{1,{ pos: (1,2) },\"x\"}");

	assert_eq!(copy.assign(&place("1.pos.x"), &Value::Real(9.0)), AssignResult::ChangedWithSideEffects);
	assert_eq!(original.render(), "{1,{ pos: (1,2) },\"x\"}");
	assert_eq!(copy.render(), "{1,{ pos: (9,2) },\"x\"}");
}

#[test]
fn string_sub_through_descriptor() {
	let mut target = Value::from("hello world");
	let def = target.object_def().expect("string def");
	let sub = def.find_def("sub", DefFilter::FUNCTION).expect("sub method");

	let mut raw = ValueHash::new();
	raw.push_unnamed(Value::Int(2));
	raw.push_unnamed(Value::Int(5));
	let mut log = ErrorLog::new();
	let outcome = call_method(&mut target, sub, raw, None, &mut log);
	assert_eq!(result(outcome), Value::from("llo "));

	let reversed = params(&[("end", Value::Int(4)), ("start", Value::Int(0))]);
	let outcome = call_method(&mut target, sub, reversed, None, &mut log);
	assert_eq!(result(outcome), Value::from("hello"));

	let mut extra = ValueHash::new();
	for i in 0..3 {
		extra.push_unnamed(Value::Int(i));
	}
	assert!(matches!(call_method(&mut target, sub, extra, None, &mut log), EvalOutcome::NotApplicable));
	assert!(log.is_empty());
}

#[test]
fn string_methods() {
	let mut text = Value::from("hello world");

	assert_eq!(result(eval(&mut text, "len", None)), Value::Int(11));
	assert_eq!(result(eval(&mut Value::from("héllo"), "len", None)), Value::Int(5));

	let from_five = params(&[("str", Value::from("o")), ("from", Value::Int(5))]);
	assert_eq!(result(eval(&mut text, "find", Some(&from_five))), Value::Int(7));
	let alias = params(&[("string", Value::from("wor"))]);
	assert_eq!(result(eval(&mut text, "find", Some(&alias))), Value::Int(6));
	let missing = params(&[("str", Value::from("zzz"))]);
	assert_eq!(result(eval(&mut text, "find", Some(&missing))), Value::Int(-1));

	let open_end = params(&[("start", Value::Int(6))]);
	assert_eq!(result(eval(&mut text, "sub", Some(&open_end))), Value::from("world"));
	let backwards = params(&[("start", Value::Int(6)), ("end", Value::Int(2))]);
	assert_eq!(result(eval(&mut text, "sub", Some(&backwards))), Value::from(""));

	let replace = params(&[("str", Value::from("J")), ("start", Value::Int(0)), ("end", Value::Int(1))]);
	assert_eq!(result(eval(&mut Value::from("hello"), "replace", Some(&replace))), Value::from("Jello"));

	assert!(matches!(eval(&mut text, "shout", None), EvalOutcome::NotApplicable));
}

#[test]
fn number_methods() {
	assert_eq!(result(eval(&mut Value::Int(-4), "abs", None)), Value::Int(4));
	assert_eq!(result(eval(&mut Value::Real(-2.7), "int", None)), Value::Int(-2));
	assert_eq!(result(eval(&mut Value::Real(2.5), "fraction", None)), Value::Real(0.5));
	assert_eq!(result(eval(&mut Value::Real(-1.5), "abs", None)), Value::Real(1.5));
	assert!(matches!(eval(&mut Value::Boolean(true), "abs", None), EvalOutcome::NotApplicable));
}

#[test]
fn bytes_and_file_methods() {
	let mut bytes = Value::Bytes(vec![1, 2, 3, 4, 5]);
	assert_eq!(result(eval(&mut bytes, "len", None)), Value::Int(5));
	let span = params(&[("start", Value::Int(1)), ("end", Value::Int(3))]);
	assert_eq!(result(eval(&mut bytes, "sub", Some(&span))), Value::Bytes(vec![2, 3, 4]));

	let mut file = Value::File("/usr/local/lib/x.so".to_owned());
	assert_eq!(result(eval(&mut file, "depth", None)), Value::Int(4));
	assert_eq!(result(eval(&mut file, "dirname", None)), Value::File("/usr/local/lib".to_owned()));
	assert_eq!(result(eval(&mut file, "filename", None)), Value::from("x.so"));
}

#[test]
fn set_methods() {
	let mut set = Value::Set(SetValue::from_values(vec![Value::Int(1), Value::Int(2), Value::Int(3)]));

	assert_eq!(result(eval(&mut set, "n", None)), Value::Int(3));
	let push = params(&[("value", Value::Int(0)), ("pos", Value::Int(0))]);
	assert!(matches!(eval(&mut set, "push", Some(&push)), EvalOutcome::Handled(None)));
	assert_eq!(set.render(), "{0,1,2,3}");

	let swap = params(&[("pos", Value::Int(0)), ("pos2", Value::Int(3))]);
	eval(&mut set, "swap", Some(&swap));
	assert_eq!(set.render(), "{3,1,2,0}");

	let slide = params(&[("pos", Value::Int(0)), ("pos2", Value::Int(2))]);
	eval(&mut set, "slide", Some(&slide));
	assert_eq!(set.render(), "{1,2,3,0}");

	let remove = params(&[("value", Value::Int(2))]);
	eval(&mut set, "removeValue", Some(&remove));
	assert_eq!(set.render(), "{1,3,0}");

	assert_eq!(result(eval(&mut set, "pop", None)), Value::Int(0));
	assert_eq!(set.render(), "{1,3}");

	let mut log = ErrorLog::new();
	let far = params(&[("pos", Value::Int(0)), ("pos2", Value::Int(7))]);
	assert!(matches!(set.evaluate("swap", None, Some(&far), &mut log), EvalOutcome::Failed(_)));
	let outcome = set.evaluate("shuffle", None, None, &mut log);
	assert!(matches!(outcome, EvalOutcome::Failed(ref message) if message == "Unknown name!"));
	assert!(log.has_failures());
	assert_eq!(log.last_message(), Some("Unknown name!"));
}

#[test]
fn vector_methods_and_components() {
	let mut v = Value::Flatvector(Flatvector::new(3.0, 4.0));

	assert_eq!(result(eval(&mut v, "length", None)), Value::Real(5.0));
	assert_eq!(result(eval(&mut v, "norm2", None)), Value::Real(25.0));
	assert_eq!(result(eval(&mut v, "isnull", None)), Value::Boolean(false));
	eval(&mut v, "normalize", None);
	let Value::Flatvector(unit) = &v else {
		panic!("still a flatvector");
	};
	assert!((unit.x - 0.6).abs() < 1e-12);
	assert!((unit.y - 0.8).abs() < 1e-12);

	let mut up = Value::Flatvector(Flatvector::new(0.0, 1.0));
	let Value::Real(angle) = result(eval(&mut up, "angle", None)) else {
		panic!("angle is real");
	};
	assert!((angle - std::f64::consts::FRAC_PI_2).abs() < 1e-12);

	let mut space = Value::Spacevector(Spacevector::new(1.0, 2.0, 3.0));
	assert_eq!(space.dereference_by_name("z"), Some(Value::Real(3.0)));
	assert_eq!(space.dereference_by_index(1), Some(Value::Real(2.0)));
	assert_eq!(space.assign(&place("y"), &Value::Int(7)), AssignResult::ChangedWithSideEffects);
	assert_eq!(space.assign(&place("w"), &Value::Int(7)), AssignResult::UnknownPath);
	assert_eq!(space.assign(&place("x"), &Value::from("seven")), AssignResult::Failed);
	assert_eq!(space.render(), "(1,7,3)");
}

#[test]
fn assign_converts_numbers_and_enums() {
	let mut int = Value::Int(0);
	assert_eq!(int.assign(&FieldExtPlace::new(), &Value::Real(2.6)), AssignResult::Changed);
	assert_eq!(int, Value::Int(3));
	assert_eq!(int.assign(&FieldExtPlace::new(), &Value::from("3")), AssignResult::Failed);

	let mut real = Value::Real(0.0);
	assert_eq!(real.assign(&FieldExtPlace::new(), &Value::Boolean(true)), AssignResult::Changed);
	assert_eq!(real, Value::Real(1.0));

	let mut choice = Value::Enum(EnumValue::new(abc_enum("Letters"), 0));
	assert_eq!(choice.assign(&FieldExtPlace::new(), &Value::from("c")), AssignResult::Changed);
	assert_eq!(choice.render(), "c");
	assert_eq!(choice.assign(&FieldExtPlace::new(), &Value::Int(1)), AssignResult::Changed);
	assert_eq!(choice.render(), "b");
	assert_eq!(choice.assign(&FieldExtPlace::new(), &Value::Int(99)), AssignResult::Failed);
	assert_eq!(choice.render(), "b");

	let mut set = Value::Array(SetValue::from_values(vec![Value::Int(1), Value::Int(2)]));
	assert_eq!(set.assign(&place("1"), &Value::Int(5)), AssignResult::Changed);
	assert_eq!(set.assign(&place("4"), &Value::Int(5)), AssignResult::UnknownPath);
	assert_eq!(set.render(), "[1,5]");
}

#[test]
fn enum_value_renders_its_name() {
	let def = abc_enum("Abc");
	let value = EnumValue::from_id(Rc::clone(&def), 1).expect("id 1 exists");

	assert_eq!(Value::Enum(value.clone()).render(), "b");
	assert_eq!(value.enum_id(), Some(1));
	assert!(EnumValue::from_id(Rc::clone(&def), 3).is_none());
	assert_eq!(value, EnumValue::new(def, 1));
}

#[test]
fn render_to_text_reports_needed_capacity() {
	let value = Value::from("abc");
	let mut buffer = String::from("untouched");

	assert_eq!(value.render_to_text(&mut buffer, 2), 5);
	assert_eq!(buffer, "untouched");
	assert_eq!(value.render_to_text(&mut buffer, 5), 0);
	assert_eq!(buffer, "\"abc\"");

	assert_eq!(Value::from("a\tb").render(), "\"a\\tb\"");
	assert_eq!(Value::Color(Color::rgba(1.0, 0.0, 0.0, 1.0)).render(), "#ff0000ff");
	assert_eq!(Value::Hash(ValueHash::new()).render(), "{:}");
	assert_eq!(Value::Null.render(), "null");
}

struct Area;

impl FunctionEvaluator for Area {
	fn evaluate(&mut self, func: &str, context: Option<&ValueHash>, _parameters: Option<&ValueHash>, _log: &mut ErrorLog) -> EvalOutcome {
		if func != "area" {
			return EvalOutcome::NotApplicable;
		}
		let Some(radius) = context.and_then(|elements| elements.find_double("radius").ok()) else {
			return EvalOutcome::NotApplicable;
		};
		EvalOutcome::value(Value::Real(3.0 * radius * radius))
	}
}

#[test]
fn generic_values_use_the_class_evaluator() {
	let mut def = ObjectDef::new_class("Disc", None, None).with_evaluator(Rc::new(RefCell::new(Area)));
	def.push(FieldSpec::new("radius", ValueType::Real).default_text("2")).expect("radius");
	def.push_function("area", None, None, None, Vec::new()).expect("area");
	let def = Rc::new(def);

	let mut disc = Value::Generic(GenericValue::new(Rc::clone(&def)));
	assert_eq!(disc.value_type(), def.fields_format);
	assert_eq!(result(eval(&mut disc, "area", None)), Value::Real(12.0));
	assert!(matches!(eval(&mut disc, "volume", None), EvalOutcome::NotApplicable));

	assert_eq!(disc.assign(&place("radius"), &Value::Int(1)), AssignResult::Changed);
	assert_eq!(disc.dereference_by_name("radius"), Some(Value::Real(1.0)));
	assert_eq!(result(eval(&mut disc, "area", None)), Value::Real(3.0));
}

#[derive(Clone)]
struct Counter {
	count: i64,
}

impl WrappedObject for Counter {
	fn type_name(&self) -> &str {
		"Counter"
	}

	fn duplicate(&self) -> Rc<dyn WrappedObject> {
		Rc::new(self.clone())
	}

	fn evaluate(&mut self, func: &str, _context: Option<&ValueHash>, _parameters: Option<&ValueHash>, _log: &mut ErrorLog) -> EvalOutcome {
		match func {
			"bump" => {
				self.count += 1;
				EvalOutcome::value(Value::Int(self.count))
			}
			_ => EvalOutcome::NotApplicable,
		}
	}
}

#[test]
fn wrapped_objects_copy_on_write() {
	let original = Value::Object(ObjectValue::new(Rc::new(Counter { count: 0 })));
	let mut shared = original.clone();
	let mut copy = original.duplicate();

	assert_eq!(original.render(), "Counter");
	assert_ne!(copy, original);
	assert_eq!(result(eval(&mut copy, "bump", None)), Value::Int(1));
	assert_eq!(result(eval(&mut copy, "bump", None)), Value::Int(2));
	assert_eq!(result(eval(&mut shared, "bump", None)), Value::Int(1));
	assert_eq!(result(eval(&mut original.clone(), "bump", None)), Value::Int(1));
}

#[test]
fn dispatch_tries_candidates_in_order() {
	let mut number = Value::Int(7);
	let mut text = Value::from("seven");
	let mut log = ErrorLog::new();

	let mut candidates: [&mut dyn FunctionEvaluator; 2] = [&mut number, &mut text];

	let outcome = dispatch_first(&mut candidates, "len", None, None, &mut log);
	assert_eq!(result(outcome), Value::Int(5));

	let outcome = dispatch_first(&mut candidates, "abs", None, None, &mut log);
	assert_eq!(result(outcome), Value::Int(7));

	let outcome = dispatch_first(&mut candidates, "nothing", None, None, &mut log);
	assert!(matches!(outcome, EvalOutcome::NotApplicable));
}

#[test]
fn attribute_round_trip_of_nested_values() {
	let mut hash = ValueHash::new();
	hash.push("at", Value::Flatvector(Flatvector::new(0.5, -1.0)));
	hash.push_unnamed(Value::Boolean(true));
	let mut set = SetValue::from_values(vec![
		Value::Int(-3),
		Value::Real(0.1),
		Value::from("two words"),
		Value::Bytes(vec![0, 255, 16]),
		Value::Color(Color::from_hex("#336699cc").expect("hex")),
		Value::Hash(hash),
		Value::Null,
	]);
	set.element_type = Some("any".to_owned());
	let value = Value::Array(set);

	let att = value.to_attribute();
	assert_eq!(att.name, "ArrayValue");
	assert_eq!(attribute_to_value(&att).expect("reads back"), value);

	let mut root = Attribute::default();
	root.push_attribute(att);
	let text = root.dump(0);
	let parsed = Attribute::parse(&text).expect("reparses");
	assert_eq!(attribute_to_value(&parsed.children[0]).expect("reads text back"), value);
}

#[test]
fn attribute_round_trip_of_registered_types() {
	let letters = abc_enum("RoundTripLetters");
	registry::register(Rc::clone(&letters));
	let choice = Value::Enum(EnumValue::new(Rc::clone(&letters), 2));
	let att = choice.to_attribute();
	assert_eq!(att.value.as_deref(), Some("RoundTripLetters.c"));
	assert_eq!(attribute_to_value(&att).expect("enum reads back"), choice);

	let mut class = ObjectDef::new_class("RoundTripPoint", None, None);
	class.push(FieldSpec::new("x", ValueType::Int).default_text("4")).expect("x");
	class.push(FieldSpec::new("label", ValueType::String)).expect("label");
	let class = Rc::new(class);
	registry::register(Rc::clone(&class));

	let mut point = GenericValue::new(class);
	point.elements_mut().push("label", Value::from("origin"));
	let point = Value::Generic(point);
	assert_eq!(attribute_to_value(&point.to_attribute()).expect("instance reads back"), point);

	let unknown = Attribute::new("MysteryValue", Some("1"));
	assert!(attribute_to_value(&unknown).is_err());
}

#[test]
fn self_referential_classes_stop_at_the_first_repeat() {
	let mut node = ObjectDef::new_class("ListNode", None, None);
	node.push(FieldSpec::new("payload", ValueType::Int).default_text("7")).expect("payload");
	node.push(FieldSpec::typed("next", "ListNode")).expect("next");
	let node = Rc::new(node);
	registry::register(Rc::clone(&node));

	let Some(Value::Generic(head)) = node.new_value() else {
		panic!("class instance");
	};
	assert_eq!(head.elements().find_int("payload"), Ok(7));
	assert_eq!(head.elements().find("next"), Some(&Value::Null));

	let mut left = ObjectDef::new_class("PairLeft", None, None);
	left.push(FieldSpec::typed("other", "PairRight")).expect("other");
	let left = Rc::new(left);
	let mut right = ObjectDef::new_class("PairRight", None, None);
	right.push(FieldSpec::typed("other", "PairLeft")).expect("other");
	registry::register(Rc::clone(&left));
	registry::register(Rc::new(right));

	let Some(Value::Generic(outer)) = left.new_value() else {
		panic!("class instance");
	};
	let Some(Value::Generic(inner)) = outer.elements().find("other") else {
		panic!("nested right instance");
	};
	assert_eq!(inner.def().name, "PairRight");
	assert_eq!(inner.elements().find("other"), Some(&Value::Null));
}
