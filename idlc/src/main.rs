mod any_value;
mod cli;
mod codepos;
mod const_variant;
mod error;
mod lexer;
mod logger;
mod marshalling;
mod text_interpreter;
mod token;
mod tokenlist;
mod utilities;

use std::process::ExitCode;

use codepos::CodePos;
use error::CompileError;
use lexer::{Lexer, LexingMode, NullCallback};

const HELP: &str = "\
idlc - OMG-IDL-flavored interface definition compiler front end

USAGE:
    idlc [options] <source.idl>...

OPTIONS:
    -I<dir>               add an include search directory (repeatable)
    -O<dir>               output directory
    -D<name>[=value]      define a preprocessor macro
    --resolve_const       fold constant expressions in emitted code
    --no_ps               skip proxy/stub generation
    --ps_lib_name<name>   override the generated proxy/stub library name
    --strict              disable every extension toggle
    --help, -?            show this summary
    --version             show the version banner
";

fn main() -> ExitCode {
	tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

	let args: Vec<String> = std::env::args().skip(1).collect();
	let options = match cli::parse(&args) {
		Ok(options) => options,
		Err(err) => {
			logger::error(&format!("{err}\n"));
			return ExitCode::FAILURE;
		}
	};

	if options.version {
		println!("idlc {}", env!("CARGO_PKG_VERSION"));
	}
	if options.help {
		print!("{HELP}");
	}
	if options.help || options.version {
		return ExitCode::SUCCESS;
	}

	logger::set_verbosity(logger::Verbosity::All);

	let mut had_errors = false;
	for source in &options.sources {
		if let Err(err) = compile_file(source) {
			logger::error(&format!("{err}\n"));
			had_errors = true;
		}
	}

	if had_errors {
		ExitCode::FAILURE
	} else {
		ExitCode::SUCCESS
	}
}

fn compile_file(path: &str) -> Result<(), CompileError> {
	let _scope = logger::LogScope::enter(format!("compiling {path}"));
	let contents = std::fs::read_to_string(path).map_err(|err| CompileError::new(format!("Could not read '{path}': {err}")).with_path(path))?;

	let mut code = CodePos::with_path(contents, Some(path));
	let mut source_lexer = Lexer::new(NullCallback, true, LexingMode::Idl);
	let mut tokens = tokenlist::TokenList::new();

	loop {
		let token = source_lexer.get_token(&mut code).map_err(|err| err.with_path(path))?;
		if token.is_undefined() {
			break;
		}
		tokens.push_back(token);
	}

	logger::info(&format!("{path}: {} token(s)\n", tokens.len()));
	Ok(())
}
