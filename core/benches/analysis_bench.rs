use criterion::{Criterion, criterion_group, criterion_main};
use shale_core::{
    analysis::{AnalysisScope, Analyzer},
    ast::{AccessLevel, Ast, build::*},
    registry::EmptyRegistry,
    scope::ScopeTree,
};
use std::hint::black_box;

// A module with `n` functions, each piping a program into a closure that
// captures the function's parameter.
fn build_unit(n: usize) -> (ScopeTree, Ast) {
    let mut tree = ScopeTree::new("bench");
    let root = tree.root();
    let root_scope = tree.module(root).scope;
    let mut expressions = Vec::with_capacity(n * 2);
    let wrapper = tree.declare_function(root, "each", AccessLevel::Public, vec![param("xs")], true);
    let wrapper_body = tree.add_scope(root_scope);
    expressions.push(function(
        &tree,
        wrapper,
        block(wrapper_body, vec![call("closure", vec![var("xs")])]),
    ));

    for i in 0..n {
        let name = format!("f{i}");
        let id = tree.declare_function(root, &name, AccessLevel::Public, vec![param("p")], false);
        let body = tree.add_scope(root_scope);
        let closure_body = tree.add_scope(body);
        let inner = closure(
            call("each", vec![list(vec![int("1"), int("0x2")])]),
            &["item"],
            block(closure_body, vec![pipe(command("echo", &["-n"]), call("grep", vec![var("p")]))]),
        );
        expressions.push(function(&tree, id, block(body, vec![inner])));
        expressions.push(call(&name, vec![string("x")]));
    }
    (tree, Ast::new(expressions))
}

fn bench_analyze(c: &mut Criterion) {
    let (tree, ast) = build_unit(200);
    c.bench_function("analyze_200_functions", |b| {
        b.iter(|| {
            let mut tree = tree.clone();
            let root = tree.root();
            let analysed = Analyzer::analyze(
                &mut tree,
                &EmptyRegistry,
                black_box(ast.clone()),
                root,
                AnalysisScope::OverwriteExistingModule,
            )
            .unwrap();
            black_box(analysed);
        })
    });
}

criterion_group!(benches, bench_analyze);
criterion_main!(benches);
