use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Python built-ins: bare calls to these never become graph edges.
pub static PY_BUILTINS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "abs",
        "all",
        "any",
        "ascii",
        "bin",
        "bool",
        "callable",
        "chr",
        "compile",
        "complex",
        "delattr",
        "dict",
        "dir",
        "divmod",
        "enumerate",
        "eval",
        "exec",
        "filter",
        "float",
        "format",
        "frozenset",
        "getattr",
        "globals",
        "hasattr",
        "hash",
        "hex",
        "id",
        "input",
        "int",
        "isinstance",
        "issubclass",
        "iter",
        "len",
        "list",
        "locals",
        "map",
        "max",
        "memoryview",
        "min",
        "next",
        "object",
        "oct",
        "open",
        "ord",
        "pow",
        "print",
        "property",
        "range",
        "repr",
        "reversed",
        "round",
        "set",
        "setattr",
        "slice",
        "sorted",
        "staticmethod",
        "str",
        "sum",
        "super",
        "tuple",
        "type",
        "vars",
        "zip",
    ]
    .into_iter()
    .collect()
});

/// Constructors, entrypoints and test-harness hooks. Declarations whose
/// final name segment matches are dropped as nodes, and references to them
/// are dropped as edges.
pub const EXCLUDED_CALLABLES: &[&str] = &["__init__", "main", "setUp", "tearDown"];

pub fn is_builtin(name: &str) -> bool {
    PY_BUILTINS.contains(name)
}

pub fn is_excluded_callable(final_segment: &str) -> bool {
    EXCLUDED_CALLABLES.contains(&final_segment)
}
