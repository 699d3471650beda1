use super::{AnalysisErrorKind, Analyzer, Result, SemanticCategory, err, walker::node};
use crate::{
    ast::{CallExpr, CallStyle, CallType, Expr, ExprKind, LiteralExpr, Parameter},
    token::{Span, Token, TokenKind},
    val::ConstValue,
};

/// Parses an integer literal. `0x`, `0o` and `0b` select the radix; a sign
/// is only accepted on plain decimal literals.
pub(crate) fn parse_integer(literal: &str) -> Option<i64> {
    let (digits, radix) = if let Some(rest) = literal.strip_prefix("0x") {
        (rest, 16)
    } else if let Some(rest) = literal.strip_prefix("0o") {
        (rest, 8)
    } else if let Some(rest) = literal.strip_prefix("0b") {
        (rest, 2)
    } else {
        (literal, 10)
    };

    if digits.is_empty() || (radix != 10 && digits.starts_with(['+', '-'])) {
        return None;
    }
    i64::from_str_radix(digits, radix).ok()
}

/// Whether `expr` is allowed as a default parameter value.
fn is_literal_default(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Literal(_) => true,
        ExprKind::List(values) => values.is_empty(),
        ExprKind::Dictionary(entries) => entries.is_empty(),
        ExprKind::StringInterpolation(parts) => {
            matches!(parts.as_slice(), [part] if matches!(part.kind, ExprKind::Literal(_)))
        }
        _ => false,
    }
}

impl Analyzer<'_> {
    pub(super) fn visit_literal(&mut self, literal: LiteralExpr, span: Span, is_root: bool) -> Result<Expr> {
        let token = literal.token;
        let value = match token.kind {
            TokenKind::BashLiteral => return self.expand_bash_literal(token, span, is_root),
            TokenKind::IntegerLiteral => match parse_integer(&token.value) {
                Some(value) => ConstValue::Integer(value),
                None => return err(AnalysisErrorKind::InvalidNumberLiteral { literal: token.value }),
            },
            TokenKind::FloatLiteral => match token.value.parse::<f64>() {
                Ok(value) => ConstValue::Float(value),
                Err(_) => return err(AnalysisErrorKind::InvalidNumberLiteral { literal: token.value }),
            },
            TokenKind::DoubleQuoteStringLiteral | TokenKind::SingleQuoteStringLiteral => {
                ConstValue::string(token.value.clone())
            }
            TokenKind::TextArgumentStringLiteral => ConstValue::text_argument(token.value.clone()),
            TokenKind::True => ConstValue::Boolean(true),
            TokenKind::False => ConstValue::Boolean(false),
            _ => ConstValue::Nil,
        };

        self.push_token(
            token.span,
            match &value {
                ConstValue::Integer(_) | ConstValue::Float(_) => SemanticCategory::Number,
                ConstValue::String { .. } => SemanticCategory::String,
                _ => SemanticCategory::Constant,
            },
        );
        Ok(node(
            ExprKind::Literal(LiteralExpr {
                token,
                value: Some(value),
            }),
            span,
            is_root,
        ))
    }

    /// `$:echo hi` runs the fragment after the marker through `bash -c`.
    fn expand_bash_literal(&mut self, token: Token, span: Span, is_root: bool) -> Result<Expr> {
        let fragment = token.value.get(2..).unwrap_or_default().to_string();
        self.push_token(token.span, SemanticCategory::Program);

        let argument = |value: String| {
            let token = token.with_value(value.clone());
            let mut expr = node(
                ExprKind::Literal(LiteralExpr {
                    token: Token {
                        kind: TokenKind::SingleQuoteStringLiteral,
                        ..token
                    },
                    value: Some(ConstValue::string(value)),
                }),
                span,
                false,
            );
            expr.enclosing = self.enclosing;
            expr
        };
        let arguments = vec![argument("-c".to_string()), argument(fragment)];

        let mut call = CallExpr::new(token.with_value("bash"), Vec::new(), arguments);
        call.style = CallStyle::Parenthesized;
        call.call_type = Some(CallType::Program);
        call.scope = Some(self.scope);
        Ok(node(ExprKind::Call(call), span, is_root))
    }

    /// Checks the shape of a parameter list and analyses default values.
    pub(super) fn analyze_parameters(&mut self, parameters: Vec<Parameter>) -> Result<Vec<Parameter>> {
        let count = parameters.len();
        let mut seen_default = false;
        let mut analysed = Vec::with_capacity(count);

        for (i, parameter) in parameters.into_iter().enumerate() {
            let Parameter {
                name,
                default_value,
                is_variadic,
            } = parameter;
            self.push_token(name.span, SemanticCategory::Parameter);

            if is_variadic && i + 1 != count {
                return err(AnalysisErrorKind::MisplacedVariadicParameter);
            }

            let default_value = match default_value {
                Some(default) => {
                    if !is_literal_default(&default) {
                        return err(AnalysisErrorKind::NonLiteralDefault);
                    }
                    seen_default = true;
                    Some(self.next_boxed(default)?)
                }
                None if seen_default && !is_variadic => {
                    return err(AnalysisErrorKind::MisplacedDefaultParameter);
                }
                None => None,
            };

            analysed.push(Parameter {
                name,
                default_value,
                is_variadic,
            });
        }

        Ok(analysed)
    }
}
