//! Functions available everywhere without a module path.

use shale_core::registry::StdFunction;

pub fn functions() -> Vec<StdFunction> {
    vec![
        // output
        StdFunction::variadic("print", 0),
        StdFunction::variadic("println", 0),
        StdFunction::new("error", 1, 2),
        StdFunction::new("exit", 0, 1),
        StdFunction::new("assert", 1, 2),
        // conversion
        StdFunction::new("str", 1, 1),
        StdFunction::new("int", 1, 1),
        StdFunction::new("float", 1, 1),
        StdFunction::new("bool", 1, 1),
        StdFunction::new("type", 1, 1),
        // collections
        StdFunction::new("len", 1, 1),
        StdFunction::new("range", 1, 3),
        StdFunction::new("first", 1, 1),
        StdFunction::new("last", 1, 1),
        StdFunction::new("join", 1, 2),
        StdFunction::new("split", 1, 2),
        StdFunction::new("sort", 1, 1),
        StdFunction::new("zip", 2, 2),
        StdFunction::new("each", 1, 1).with_closure(1),
        StdFunction::new("map", 1, 1).with_closure(1),
        StdFunction::new("filter", 1, 1).with_closure(1),
        StdFunction::new("all", 1, 1).with_closure(1),
        StdFunction::new("any", 1, 1).with_closure(1),
        StdFunction::new("reduce", 1, 2).with_closure(2),
        // processes
        StdFunction::new("lines", 1, 1).consuming_pipe(),
        StdFunction::new("disposeAll", 1, 1).consuming_pipe(),
        StdFunction::new("time", 1, 1).starting_pipe_manually(),
        StdFunction::new("cd", 0, 1),
        StdFunction::new("scriptPath", 0, 0),
    ]
}
