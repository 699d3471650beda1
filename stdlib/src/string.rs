//! `str::` text helpers.

use shale_core::registry::StdFunction;

pub fn functions() -> Vec<StdFunction> {
    vec![
        StdFunction::new("upper", 1, 1),
        StdFunction::new("lower", 1, 1),
        StdFunction::new("trim", 1, 1),
        StdFunction::new("trimStart", 1, 1),
        StdFunction::new("trimEnd", 1, 1),
        StdFunction::new("split", 1, 3),
        StdFunction::new("contains", 2, 2),
        StdFunction::new("startsWith", 2, 2),
        StdFunction::new("endsWith", 2, 2),
        StdFunction::new("replace", 3, 3),
        StdFunction::new("repeat", 2, 2),
        StdFunction::new("isDigit", 1, 1),
        StdFunction::new("isWhitespace", 1, 1),
        StdFunction::new("lines", 1, 1).consuming_pipe(),
        StdFunction::variadic("format", 1),
    ]
}
