use objdef::calc::{FieldMask, MaskMatch};

use crate::cmd::Result;
use crate::cmd::util::emit_json;

#[derive(clap::Args)]
pub struct Args {
	/// Comma separated numeric paths, like `3.1,4`.
	pub mask: String,
	/// Numeric paths to classify.
	#[arg(required = true)]
	pub paths: Vec<String>,
	#[arg(long)]
	pub json: bool,
}

#[derive(serde::Serialize)]
struct MatchJson {
	path: String,
	result: &'static str,
	depth: usize,
}

/// Classify each path as exact, superset, subset or no match against the mask.
pub fn run(args: Args) -> Result<()> {
	let Args { mask, paths, json } = args;

	let mask = FieldMask::parse(&mask)?;
	let matches: Vec<MatchJson> = paths
		.into_iter()
		.map(|path| {
			let (found, depth) = mask.has(&path);
			MatchJson {
				path,
				result: label(found),
				depth,
			}
		})
		.collect();

	if json {
		return emit_json(&matches);
	}
	for item in &matches {
		println!("{}: {} ({})", item.path, item.result, item.depth);
	}
	Ok(())
}

fn label(found: MaskMatch) -> &'static str {
	match found {
		MaskMatch::None => "none",
		MaskMatch::Exact => "exact",
		MaskMatch::Superset => "superset",
		MaskMatch::Subset => "subset",
	}
}

#[cfg(test)]
mod tests;
