use shale_core::registry::StdFunction;

pub fn functions() -> Vec<StdFunction> {
    vec![
        StdFunction::new("get", 1, 2),
        StdFunction::new("set", 2, 2),
        StdFunction::new("unset", 1, 1),
        StdFunction::new("vars", 0, 0),
        StdFunction::new("args", 0, 0),
        StdFunction::new("home", 0, 0),
        StdFunction::new("cwd", 0, 0),
    ]
}
