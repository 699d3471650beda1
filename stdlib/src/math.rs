use shale_core::registry::StdFunction;

pub fn functions() -> Vec<StdFunction> {
    vec![
        StdFunction::new("abs", 1, 1),
        StdFunction::new("ceil", 1, 1),
        StdFunction::new("floor", 1, 1),
        StdFunction::new("round", 1, 2),
        StdFunction::new("sqrt", 1, 1),
        StdFunction::new("pow", 2, 2),
        StdFunction::new("log", 1, 2),
        StdFunction::variadic("min", 1),
        StdFunction::variadic("max", 1),
        StdFunction::new("random", 0, 2),
    ]
}
