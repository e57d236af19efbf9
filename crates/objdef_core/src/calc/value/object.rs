use std::fmt;
use std::rc::Rc;

use crate::calc::eval::{ErrorLog, EvalOutcome};
use crate::calc::{DefRef, ValueHash};

/// Host object carried inside a [`Value`](crate::calc::Value) without the runtime knowing its shape.
pub trait WrappedObject {
	/// Type name shown when the value is rendered.
	fn type_name(&self) -> &str;

	/// Independent copy of the object.
	fn duplicate(&self) -> Rc<dyn WrappedObject>;

	/// Run a method of the object.
	fn evaluate(&mut self, _func: &str, _context: Option<&ValueHash>, _parameters: Option<&ValueHash>, _log: &mut ErrorLog) -> EvalOutcome {
		EvalOutcome::NotApplicable
	}
}

/// Value wrapping a [`WrappedObject`].
#[derive(Clone)]
pub struct ObjectValue {
	object: Rc<dyn WrappedObject>,
}

impl ObjectValue {
	/// Wrap `object`.
	pub fn new(object: Rc<dyn WrappedObject>) -> Self {
		Self { object }
	}

	/// Wrapped object's type name.
	pub fn type_name(&self) -> &str {
		self.object.type_name()
	}

	/// Shared handle to the wrapped object.
	pub fn object(&self) -> &Rc<dyn WrappedObject> {
		&self.object
	}

	pub(crate) fn duplicate(&self) -> Self {
		Self { object: self.object.duplicate() }
	}

	pub(crate) fn evaluate(&mut self, func: &str, context: Option<&ValueHash>, parameters: Option<&ValueHash>, log: &mut ErrorLog) -> EvalOutcome {
		// methods that mutate need the only handle
		if Rc::get_mut(&mut self.object).is_none() {
			self.object = self.object.duplicate();
		}
		match Rc::get_mut(&mut self.object) {
			Some(object) => object.evaluate(func, context, parameters, log),
			None => EvalOutcome::NotApplicable,
		}
	}
}

impl PartialEq for ObjectValue {
	fn eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.object, &other.object)
	}
}

impl fmt::Debug for ObjectValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("ObjectValue").field(&self.object.type_name()).finish()
	}
}

/// Function body text, optionally described by a function descriptor.
#[derive(Clone)]
pub struct FunctionValue {
	/// Body text.
	pub code: String,
	/// Signature.
	pub def: Option<DefRef>,
}

impl FunctionValue {
	/// Function with a body and no signature.
	pub fn new(code: impl Into<String>) -> Self {
		Self { code: code.into(), def: None }
	}
}

impl PartialEq for FunctionValue {
	fn eq(&self, other: &Self) -> bool {
		let same_def = match (&self.def, &other.def) {
			(Some(a), Some(b)) => Rc::ptr_eq(a, b),
			(None, None) => true,
			_ => false,
		};
		same_def && self.code == other.code
	}
}

impl fmt::Debug for FunctionValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FunctionValue")
			.field("code", &self.code)
			.field("def", &self.def.as_ref().map(|def| def.name.as_str()))
			.finish()
	}
}
