use shale_core::registry::StdFunction;

pub fn functions() -> Vec<StdFunction> {
    vec![
        StdFunction::new("enumerate", 1, 1),
        StdFunction::new("reverse", 1, 1),
        StdFunction::new("take", 2, 2),
        StdFunction::new("skip", 2, 2),
        StdFunction::new("collect", 1, 1).consuming_pipe(),
        StdFunction::variadic("chain", 1),
        StdFunction::new("count", 1, 1),
        StdFunction::new("takeWhile", 1, 1).with_closure(1),
        StdFunction::new("skipWhile", 1, 1).with_closure(1),
        StdFunction::new("find", 1, 1).with_closure(1),
        StdFunction::new("sortBy", 1, 1).with_closure(1),
        StdFunction::new("groupBy", 1, 1).with_closure(1),
    ]
}
