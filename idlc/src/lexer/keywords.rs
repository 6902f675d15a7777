//! Default reserved keyword set.
//!
//! `support.h`'s `g_vecOmgIdlKeywords` was not available to ground this list
//! literally, so it is the standard OMG IDL 4.2 reserved word list; additions
//! beyond this set are expected via [`super::Lexer::add_keyword`].
pub const DEFAULT_KEYWORDS: &[&str] = &[
	"module",
	"interface",
	"struct",
	"union",
	"enum",
	"exception",
	"typedef",
	"const",
	"readonly",
	"attribute",
	"raises",
	"in",
	"out",
	"inout",
	"oneway",
	"sequence",
	"string",
	"wstring",
	"long",
	"short",
	"unsigned",
	"char",
	"wchar",
	"boolean",
	"octet",
	"any",
	"double",
	"float",
	"void",
	"case",
	"default",
	"switch",
	"valuetype",
	"abstract",
	"local",
	"public",
	"private",
	"truncatable",
	"supports",
	"manages",
	"primarykey",
	"import",
	"fixed",
	"true",
	"false",
	"nullptr",
	"NULL",
	"TRUE",
	"FALSE",
	"home",
	"provides",
	"uses",
	"emits",
	"publishes",
	"consumes",
	"getraises",
	"setraises",
	"typeid",
	"typeprefix",
	"eventtype",
	"component",
	"native",
	"factory",
	"custom",
	"context",
	"ValueBase",
	"Object",
	"porttype",
	"connector",
	"mirrorport",
	"multiple",
];
