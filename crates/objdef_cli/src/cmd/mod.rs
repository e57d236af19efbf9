use objdef::calc::DefError;
use thiserror::Error;

/// Method call command.
pub mod eval;
/// Field path resolution command.
pub mod field;
/// Builtin descriptor listing command.
pub mod list;
/// Descriptor file loading command.
pub mod load;
/// Field mask classification command.
pub mod mask;
/// Descriptor dump command.
pub mod show;

mod util;

#[cfg(test)]
mod test_support;

/// Command result type.
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors reported by commands.
#[derive(Debug, Error)]
pub enum CliError {
	/// Descriptor or attribute failure from the library.
	#[error(transparent)]
	Def(#[from] DefError),
	/// JSON output failed.
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
	/// No builtin, registered or loaded descriptor has this name.
	#[error("unknown type: {name}")]
	UnknownType {
		/// Requested name.
		name: String,
	},
	/// The descriptor has no such method.
	#[error("{type_name} has no method {method}")]
	UnknownMethod {
		/// Descriptor name.
		type_name: String,
		/// Requested method.
		method: String,
	},
	/// Value text could not be read as the requested type.
	#[error("cannot read {text:?} as {type_name}")]
	BadLiteral {
		/// Target type.
		type_name: String,
		/// Offending text.
		text: String,
	},
	/// The method did not accept the parameters.
	#[error("{method}: parameters not applicable")]
	NotApplicable {
		/// Method name.
		method: String,
	},
	/// The method accepted the parameters but failed.
	#[error("{method} failed: {message}")]
	EvalFailed {
		/// Method name.
		method: String,
		/// Failure text.
		message: String,
	},
}
