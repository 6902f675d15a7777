//! Command-line option grammar.
//!
//! Hand-written rather than built on a declarative argument-parsing crate:
//! the grammar mixes attached-value short options (`-Ipath`), Windows-style
//! slash spellings (`/Ipath`), and `+`/`-` suffixed extension toggles, none
//! of which map cleanly onto a generic parser's model. This follows the
//! teacher's own precedent of hand-writing a reader when the wire grammar
//! doesn't fit one (see `utilities::FromByteStream`, `raw::heaps::table`).

use bitflags::bitflags;

use crate::error::{CompileError, Result};

bitflags! {
	/// Extension toggles, each independently `+`/`-`; all default on.
	#[derive(Debug, Copy, Clone, PartialEq, Eq)]
	pub struct Extensions: u32 {
		const INTERFACE_TYPE          = 1 << 0;
		const EXCEPTION_TYPE          = 1 << 1;
		const POINTER_TYPE            = 1 << 2;
		const UNICODE_CHAR            = 1 << 3;
		const CASE_SENSITIVE          = 1 << 4;
		const CONTEXT_NAMES           = 1 << 5;
		const MULTI_DIMENSIONAL_ARRAY = 1 << 6;
	}
}

impl Default for Extensions {
	fn default() -> Self {
		Extensions::all()
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum Define {
	Flag(String),
	Value(String, String),
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Options {
	pub include_dirs: Vec<String>,
	pub output_dir: Option<String>,
	pub defines: Vec<Define>,
	pub help: bool,
	pub version: bool,
	pub resolve_const: bool,
	pub no_ps: bool,
	pub ps_lib_name: String,
	pub extensions: Extensions,
	pub sources: Vec<String>,
}

impl Options {
	fn new() -> Options {
		Options {
			ps_lib_name: "proxystub".to_owned(),
			extensions: Extensions::default(),
			..Default::default()
		}
	}
}

const EXTENSION_NAMES: &[(&str, Extensions)] = &[
	("interface_type", Extensions::INTERFACE_TYPE),
	("exception_type", Extensions::EXCEPTION_TYPE),
	("pointer_type", Extensions::POINTER_TYPE),
	("unicode_char", Extensions::UNICODE_CHAR),
	("case_sensitive", Extensions::CASE_SENSITIVE),
	("context_names", Extensions::CONTEXT_NAMES),
	("multi_dimensional_array", Extensions::MULTI_DIMENSIONAL_ARRAY),
];

/// Parses a full command line (excluding argv[0]) into [`Options`]. Any
/// leading `-`, `--` or `/` token not recognized by the grammar below is a
/// fatal error, per §6.1.
pub fn parse<I, S>(args: I) -> Result<Options>
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let mut opts = Options::new();
	for arg in args {
		let arg = arg.as_ref();
		parse_one(&mut opts, arg)?;
	}
	Ok(opts)
}

fn parse_one(opts: &mut Options, arg: &str) -> Result<()> {
	if arg == "--help" || arg == "-?" || arg == "/?" {
		opts.help = true;
		return Ok(());
	}
	if arg == "--version" {
		opts.version = true;
		return Ok(());
	}
	if arg == "--resolve_const" {
		opts.resolve_const = true;
		return Ok(());
	}
	if arg == "--no_ps" {
		opts.no_ps = true;
		return Ok(());
	}
	if let Some(name) = arg.strip_prefix("--ps_lib_name") {
		opts.ps_lib_name = name.to_owned();
		return Ok(());
	}
	if arg == "--strict" {
		opts.extensions = Extensions::empty();
		return Ok(());
	}
	for (name, flag) in EXTENSION_NAMES {
		if let Some(sign) = arg.strip_prefix(&format!("--{name}")) {
			match sign {
				"+" => {
					opts.extensions.insert(*flag);
					return Ok(());
				}
				"-" => {
					opts.extensions.remove(*flag);
					return Ok(());
				}
				_ => {}
			}
		}
	}
	if let Some(dir) = arg.strip_prefix("-I").or_else(|| arg.strip_prefix("/I")) {
		opts.include_dirs.push(dir.to_owned());
		return Ok(());
	}
	if let Some(dir) = arg.strip_prefix("-O").or_else(|| arg.strip_prefix("/O")) {
		if opts.output_dir.is_some() {
			return Err(CompileError::new(format!("Duplicate output directory option: '{arg}'.")));
		}
		opts.output_dir = Some(dir.to_owned());
		return Ok(());
	}
	if let Some(def) = arg.strip_prefix("-D").or_else(|| arg.strip_prefix("/D")) {
		let define = match def.split_once('=') {
			Some((name, value)) => Define::Value(name.to_owned(), value.to_owned()),
			None => Define::Flag(def.to_owned()),
		};
		if let Some(existing) = opts.defines.iter().find(|d| define_name(d) == define_name(&define)) {
			if existing != &define {
				return Err(CompileError::new(format!("Conflicting macro definition for '{}'.", define_name(&define))));
			}
			return Ok(());
		}
		opts.defines.push(define);
		return Ok(());
	}
	if arg.starts_with('-') || arg.starts_with('/') {
		return Err(CompileError::new(format!("Unknown option: '{arg}'.")));
	}
	opts.sources.push(arg.to_owned());
	Ok(())
}

fn define_name(define: &Define) -> &str {
	match define {
		Define::Flag(name) => name,
		Define::Value(name, _) => name,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn include_dirs_are_repeatable() {
		let opts = parse(["-Ia", "/Ib"]).unwrap();
		assert_eq!(opts.include_dirs, vec!["a", "b"]);
	}

	#[test]
	fn duplicate_output_dir_is_an_error() {
		assert!(parse(["-Oout1", "-Oout2"]).is_err());
	}

	#[test]
	fn repeated_identical_defines_are_allowed() {
		let opts = parse(["-DFOO=1", "-DFOO=1"]).unwrap();
		assert_eq!(opts.defines.len(), 1);
	}

	#[test]
	fn conflicting_defines_are_an_error() {
		assert!(parse(["-DFOO=1", "-DFOO=2"]).is_err());
	}

	#[test]
	fn strict_clears_every_extension() {
		let opts = parse(["--strict"]).unwrap();
		assert_eq!(opts.extensions, Extensions::empty());
	}

	#[test]
	fn extension_toggles_default_on_and_can_be_disabled() {
		let opts = parse(["--unicode_char-"]).unwrap();
		assert!(!opts.extensions.contains(Extensions::UNICODE_CHAR));
		assert!(opts.extensions.contains(Extensions::CASE_SENSITIVE));
	}

	#[test]
	fn unknown_dashed_option_is_fatal() {
		assert!(parse(["--bogus"]).is_err());
	}

	#[test]
	fn positional_sources_are_collected_in_order() {
		let opts = parse(["a.idl", "-Iinc", "b.idl"]).unwrap();
		assert_eq!(opts.sources, vec!["a.idl", "b.idl"]);
	}

	#[test]
	fn help_and_version_can_combine() {
		let opts = parse(["--help", "--version"]).unwrap();
		assert!(opts.help && opts.version);
	}
}
