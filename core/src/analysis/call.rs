use tracing::trace;

use super::{AnalysisErrorKind, Analyzer, Result, SemanticCategory, err, walker::node};
use crate::{
    ast::{
        AccessLevel, BinaryExpr, BinaryOp, CallExpr, CallType, ConstructExpr, Enclosing, Expr, ExprKind, Parameter,
        StructRef,
    },
    registry::StdFunction,
    scope::{CLOSURE_CARRIER, FunctionId},
    token::Span,
};

/// Argument count check shared by user functions and user structs.
pub(super) fn validate_arguments(
    name: &str,
    actual: usize,
    parameters: &[Parameter],
    is_reference: bool,
) -> Result<()> {
    let variadic = parameters.last().is_some_and(|p| p.is_variadic);
    let min = parameters
        .iter()
        .filter(|p| p.default_value.is_none() && !p.is_variadic)
        .count();
    let max = (!variadic).then_some(parameters.len());

    let too_few = !is_reference && actual < min;
    let too_many = max.is_some_and(|max| actual > max);
    if too_few || too_many {
        return err(AnalysisErrorKind::WrongArgumentCount {
            name: name.to_string(),
            min,
            max,
            actual,
            variadic,
        });
    }
    Ok(())
}

fn validate_std_arguments(function: &StdFunction, actual: usize, is_reference: bool) -> Result<()> {
    let enough = is_reference || actual >= function.min_argument_count;
    if !enough || actual > function.max_argument_count {
        let variadic = function.is_variadic();
        return err(AnalysisErrorKind::WrongArgumentCount {
            name: function.name.clone(),
            min: function.min_argument_count,
            max: (!variadic).then_some(function.max_argument_count),
            actual,
            variadic,
        });
    }
    Ok(())
}

impl Analyzer<'_> {
    pub(super) fn visit_pipe(&mut self, binary: BinaryExpr, is_root: bool) -> Result<Expr> {
        let BinaryExpr { left, op, mut right } = binary;
        let mut left = self.next(*left)?;

        let is_program = left.is_program_call();
        if !is_program && op != BinaryOp::Pipe {
            return err(AnalysisErrorKind::InvalidRedirection {
                operator: op.to_string(),
            });
        }
        if is_program
            && let (ExprKind::Call(call), Some(redirection)) = (&mut left.kind, op.redirection_kind())
        {
            call.redirection = redirection;
        }

        right.is_root = is_root;
        self.next_call_or_closure(*right, Some(left), false, true)
    }

    pub(super) fn visit_assignment(&mut self, binary: BinaryExpr, span: Span, is_root: bool) -> Result<Expr> {
        let BinaryExpr { left, op, right } = binary;
        match &left.kind {
            ExprKind::Variable(_) | ExprKind::Indexer(_) | ExprKind::FieldAccess(_) => {}
            ExprKind::Call(_) => return err(AnalysisErrorKind::InvalidAssignment { parsed_as_call: true }),
            _ => return err(AnalysisErrorKind::InvalidAssignment { parsed_as_call: false }),
        }

        let left = self.next_boxed(left)?;
        let right = self.next_boxed(right)?;
        Ok(node(ExprKind::Binary(BinaryExpr { left, op, right }), span, is_root))
    }

    /// Classifies a call, binds it to its target and checks the argument
    /// list against the target's signature.
    ///
    /// `piped` is the already analysed left side of a pipe ending in this
    /// call and `has_closure` tells whether a closure is attached.
    pub(super) fn visit_call(
        &mut self,
        call: CallExpr,
        span: Span,
        is_root: bool,
        piped: Option<Expr>,
        has_closure: bool,
        validate: bool,
    ) -> Result<Expr> {
        let name = call.name.value.clone();
        let module_path = call.module_path_names();
        let builtin = CallType::builtin(&name);

        let closure_provider = match builtin {
            Some(CallType::BuiltInClosure) => Some(self.resolve_closure_provider()?),
            _ => None,
        };
        let std_function = match builtin {
            Some(_) => None,
            None => self.resolve_std_function(&name, &module_path)?,
        };
        let function = match (builtin, &std_function) {
            (None, None) => self.resolve_user_function(&name, &module_path)?,
            _ => None,
        };
        let call_type = builtin.unwrap_or(match (&std_function, function) {
            (Some(_), _) => CallType::StdFunction,
            (None, Some(_)) => CallType::Function,
            (None, None) => CallType::Program,
        });
        trace!(target: "shale::analysis", name = %name, ?call_type, "classified call");

        for segment in &call.module_path {
            self.push_token(segment.span, SemanticCategory::Module);
        }
        self.push_token(
            call.name.span,
            match call_type {
                CallType::StdFunction => SemanticCategory::StdFunction,
                CallType::Function => SemanticCategory::Function,
                CallType::Program => SemanticCategory::Program,
                _ => SemanticCategory::BuiltIn,
            },
        );

        let mut arguments = Vec::with_capacity(call.arguments.len() + 1);
        for argument in call.arguments {
            arguments.push(self.next(argument)?);
        }

        let mut piped_to_program = None;
        if let Some(mut piped) = piped {
            if let ExprKind::Call(source) = &mut piped.kind
                && source.call_type == Some(CallType::Program)
            {
                source.disable_redirection_buffering = call_type == CallType::Program
                    || std_function.as_ref().is_some_and(|f| f.consumes_pipe);
            }
            if call_type == CallType::Program {
                piped_to_program = Some(Box::new(piped));
            } else {
                arguments.insert(0, piped);
            }
        }

        let accepts_closure = std_function.as_ref().is_some_and(|f| f.has_closure)
            || function.is_some_and(|id| self.tree.function(id).has_closure);
        if has_closure && !accepts_closure {
            return err(AnalysisErrorKind::UnexpectedClosure {
                program_call: call_type == CallType::Program,
            });
        }
        if !has_closure && accepts_closure {
            return err(AnalysisErrorKind::ExpectedClosure);
        }

        if validate {
            if let Some(std_function) = &std_function {
                validate_std_arguments(std_function, arguments.len(), call.is_reference)?;
            } else if let Some(id) = function {
                let symbol = self.tree.function(id);
                validate_arguments(&symbol.name, arguments.len(), &symbol.parameters, call.is_reference)?;
            }
        }

        if std_function.as_ref().is_some_and(|f| f.starts_pipe_manually) {
            for argument in &mut arguments {
                if let ExprKind::Call(inner) = &mut argument.kind {
                    inner.automatic_start = false;
                }
            }
        }

        let mut environment_variables = Vec::with_capacity(call.environment_variables.len());
        for (key, value) in call.environment_variables {
            environment_variables.push((key, self.next(value)?));
        }

        Ok(node(
            ExprKind::Call(CallExpr {
                name: call.name,
                module_path: call.module_path,
                arguments,
                style: call.style,
                call_type: Some(call_type),
                std_function,
                function,
                piped_to_program,
                redirection: call.redirection,
                disable_redirection_buffering: call.disable_redirection_buffering,
                automatic_start: call.automatic_start,
                is_reference: call.is_reference,
                environment_variables,
                closure_provider,
                scope: Some(self.scope),
            }),
            span,
            is_root,
        ))
    }

    /// Finds the function whose closure a `closure(...)` call refers to: the
    /// nearest function reached by walking out through enclosing closures.
    fn resolve_closure_provider(&mut self) -> Result<FunctionId> {
        let mut current = self.enclosing;
        while let Some(Enclosing::Closure(id)) = current {
            current = self.closure(id).owner;
        }

        let Some(Enclosing::Function(provider)) = current else {
            return err(AnalysisErrorKind::UnexpectedClosureCall);
        };
        if !self.closure_support.get(&provider).copied().unwrap_or(false) {
            return err(AnalysisErrorKind::UnexpectedClosureCall);
        }

        if let Some(Enclosing::Closure(nearest)) = self.enclosing {
            self.captured_carriers.insert(provider);
            self.closure_mut(nearest).captured.insert(CLOSURE_CARRIER.to_string());
            if let Some(carrier) = self.tree.find_variable_mut(self.scope, CLOSURE_CARRIER) {
                carrier.is_captured = true;
            }
            trace!(target: "shale::analysis", "closure carrier captured");
        }
        Ok(provider)
    }

    fn resolve_std_function(&self, name: &str, module_path: &[String]) -> Result<Option<StdFunction>> {
        let function = self.registry.function(name, module_path);
        if function.is_none() && !module_path.is_empty() && self.registry.has_module(module_path) {
            return err(AnalysisErrorKind::NotFound { name: name.to_string() });
        }
        Ok(function)
    }

    fn resolve_user_function(&self, name: &str, module_path: &[String]) -> Result<Option<FunctionId>> {
        let current = self.current_module();
        let Some(module) = self.tree.find_module(current, module_path, true) else {
            return err(AnalysisErrorKind::ModuleNotFound {
                path: module_path.to_vec(),
            });
        };
        let Some(id) = self.tree.find_function(module, name, true) else {
            return Ok(None);
        };

        let symbol = self.tree.function(id);
        if symbol.module != current && module != current && symbol.access != AccessLevel::Public {
            return err(AnalysisErrorKind::AccessLevel {
                access: symbol.access,
                name: name.to_string(),
            });
        }
        Ok(Some(id))
    }

    pub(super) fn visit_construct(&mut self, construct: ConstructExpr, span: Span, is_root: bool) -> Result<Expr> {
        let ConstructExpr {
            name,
            module_path,
            arguments,
            ..
        } = construct;
        let path: Vec<String> = module_path.iter().map(|t| t.value.clone()).collect();
        let current = self.current_module();

        let symbol = match self.tree.find_module(current, &path, true) {
            Some(module) => {
                let Some(id) = self.tree.find_struct(module, &name.value, true) else {
                    return err(AnalysisErrorKind::NotFound { name: name.value });
                };
                let structure = self.tree.structure(id);
                if structure.module != current && module != current && structure.access != AccessLevel::Public {
                    return err(AnalysisErrorKind::AccessLevel {
                        access: structure.access,
                        name: name.value,
                    });
                }
                validate_arguments(&structure.name, arguments.len(), &structure.parameters, false)?;
                StructRef::User(id)
            }
            None => {
                let std_module = path
                    .first()
                    .filter(|first| self.registry.has_module(std::slice::from_ref(*first)));
                let Some(std_module) = std_module else {
                    return err(AnalysisErrorKind::ModuleNotFound { path });
                };
                let Some(structure) = self.registry.structure(&name.value, std_module) else {
                    return err(AnalysisErrorKind::NotFound { name: name.value });
                };

                let actual = arguments.len();
                if actual < structure.min_argument_count || actual > structure.max_argument_count {
                    let variadic = structure.is_variadic();
                    return err(AnalysisErrorKind::WrongArgumentCount {
                        name: structure.name.clone(),
                        min: structure.min_argument_count,
                        max: (!variadic).then_some(structure.max_argument_count),
                        actual,
                        variadic,
                    });
                }
                StructRef::Std(structure)
            }
        };

        for segment in &module_path {
            self.push_token(segment.span, SemanticCategory::Module);
        }
        self.push_token(name.span, SemanticCategory::Struct);

        let mut analysed = Vec::with_capacity(arguments.len());
        for argument in arguments {
            analysed.push(self.next(argument)?);
        }

        Ok(node(
            ExprKind::Construct(ConstructExpr {
                name,
                module_path,
                arguments: analysed,
                symbol: Some(symbol),
            }),
            span,
            is_root,
        ))
    }
}
