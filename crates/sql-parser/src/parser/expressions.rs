//! Expression parsing by precedence climbing.
//!
//! Binding powers from lowest to highest: `OR`, `AND`, `NOT`, comparisons
//! (including `LIKE`, `IN`, `BETWEEN` and `IS NULL`), `+ - ||`, `* / %`,
//! unary sign. Postfix `::type` attaches directly to a primary.

use super::Parser;
use crate::ast::*;
use crate::error::Result;
use crate::token::{Keyword, Operator, Punctuation, TokenKind};

const OR: u8 = 1;
const AND: u8 = 2;
const NOT: u8 = 3;
const COMPARISON: u8 = 4;
const ADDITIVE: u8 = 5;
const MULTIPLICATIVE: u8 = 6;
const SIGN: u8 = 7;

impl Parser<'_> {
    pub(super) fn parse_expr(&mut self) -> Result<Expr> {
        self.nested(|p| p.parse_expr_bp(OR))
    }

    /// Parse an expression whose infix operators all bind at least as
    /// tightly as `min`. Every binary operator is left-associative.
    fn parse_expr_bp(&mut self, min: u8) -> Result<Expr> {
        // Power of the last operator applied to `left`. Nothing tighter may
        // follow a completed IN, BETWEEN or IS NULL, even under a `NOT`.
        let (mut left, mut ceiling) = self.parse_prefix(min)?;
        loop {
            let next = self.tokens.peek()?.kind;

            if let Some((op, power)) = binary_operator(next) {
                if power < min || power > ceiling {
                    break;
                }
                self.tokens.next()?;
                let right = self.parse_expr_bp(power + 1)?;
                left = binary(op, left, right);
                ceiling = power;
                continue;
            }
            if COMPARISON < min || COMPARISON > ceiling {
                break;
            }

            // `NOT` here only belongs to a negated LIKE / IN / BETWEEN.
            let negated = next == TokenKind::Keyword(Keyword::Not)
                && matches!(
                    self.tokens.peek_nth(1)?.kind,
                    TokenKind::Keyword(Keyword::Like | Keyword::In | Keyword::Between)
                );
            if negated {
                self.tokens.next()?;
            }
            left = match self.tokens.peek()?.kind {
                TokenKind::Keyword(Keyword::Like) => {
                    self.tokens.next()?;
                    let pattern = self.parse_expr_bp(ADDITIVE)?;
                    let op = if negated {
                        BinaryOperator::NotLike
                    } else {
                        BinaryOperator::Like
                    };
                    binary(op, left, pattern)
                }
                TokenKind::Keyword(Keyword::In) => {
                    self.tokens.next()?;
                    let position = left.position;
                    Expr::new(self.parse_in(left, negated)?, position)
                }
                TokenKind::Keyword(Keyword::Between) => {
                    self.tokens.next()?;
                    self.parse_between(left, negated)?
                }
                TokenKind::Keyword(Keyword::Is) => {
                    self.tokens.next()?;
                    let position = left.position;
                    let negated = self.tokens.eat_keyword(Keyword::Not)?;
                    self.tokens.expect_keyword(Keyword::Null)?;
                    Expr::new(
                        ExprKind::IsNull {
                            expr: Box::new(left),
                            negated,
                        },
                        position,
                    )
                }
                _ => break,
            };
            ceiling = COMPARISON;
        }
        Ok(left)
    }

    /// `NOT` and unary sign recurse one nesting level; `NOT` is only
    /// accepted where the surrounding operator binds no tighter than it.
    /// Also returns the power of the prefix operator, if one was applied.
    fn parse_prefix(&mut self, min: u8) -> Result<(Expr, u8)> {
        let next = self.tokens.peek()?.kind;
        let (op, power) = match next {
            TokenKind::Keyword(Keyword::Not) if min <= NOT => (UnaryOperator::Not, NOT),
            TokenKind::Operator(Operator::Minus) => (UnaryOperator::Minus, SIGN),
            TokenKind::Operator(Operator::Plus) => (UnaryOperator::Plus, SIGN),
            _ => return Ok((self.parse_postfix()?, u8::MAX)),
        };
        let position = self.tokens.next()?.position;
        let operand = self.nested(|p| p.parse_expr_bp(power))?;
        let expr = Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            position,
        );
        Ok((expr, power))
    }

    fn parse_between(&mut self, expr: Expr, negated: bool) -> Result<Expr> {
        let position = expr.position;
        let low = self.parse_expr_bp(ADDITIVE)?;
        self.tokens.expect_keyword(Keyword::And)?;
        let high = self.parse_expr_bp(ADDITIVE)?;
        Ok(Expr::new(
            ExprKind::Between {
                expr: Box::new(expr),
                low: Box::new(low),
                high: Box::new(high),
                negated,
            },
            position,
        ))
    }

    /// The rest of `expr [NOT] IN`: a parenthesized list or subquery.
    fn parse_in(&mut self, expr: Expr, negated: bool) -> Result<ExprKind> {
        self.tokens.expect_punct(Punctuation::LParen)?;
        let kind = if self.tokens.at_keyword(Keyword::Select)? {
            ExprKind::InSubquery {
                expr: Box::new(expr),
                subquery: Box::new(self.parse_select()?),
                negated,
            }
        } else {
            ExprKind::InList {
                expr: Box::new(expr),
                list: self.comma_separated(Self::parse_expr)?,
                negated,
            }
        };
        self.tokens.expect_punct(Punctuation::RParen)?;
        Ok(kind)
    }

    fn parse_postfix(&mut self) -> Result<Expr> {
        let mut expr = self.parse_primary()?;
        while self.tokens.eat_operator(Operator::DoubleColon)? {
            let data_type = self.parse_data_type(false)?;
            let position = expr.position;
            expr = Expr::new(
                ExprKind::Cast {
                    expr: Box::new(expr),
                    data_type,
                },
                position,
            );
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let (position, first) = {
            let token = self.tokens.peek()?;
            (token.position, token.kind)
        };
        let kind = match first {
            TokenKind::IntegerLiteral(value) => {
                self.tokens.next()?;
                ExprKind::Literal(Literal::Integer(value))
            }
            TokenKind::NumericLiteral => {
                ExprKind::Literal(Literal::Numeric(self.tokens.next()?.text))
            }
            TokenKind::StringLiteral => {
                ExprKind::Literal(Literal::String(self.tokens.next()?.text))
            }
            TokenKind::Keyword(Keyword::True) => {
                self.tokens.next()?;
                ExprKind::Literal(Literal::Boolean(true))
            }
            TokenKind::Keyword(Keyword::False) => {
                self.tokens.next()?;
                ExprKind::Literal(Literal::Boolean(false))
            }
            TokenKind::Keyword(Keyword::Null) => {
                self.tokens.next()?;
                ExprKind::Literal(Literal::Null)
            }
            TokenKind::Keyword(Keyword::Exists) => {
                self.tokens.next()?;
                self.tokens.expect_punct(Punctuation::LParen)?;
                if !self.tokens.at_keyword(Keyword::Select)? {
                    return Err(self.tokens.unexpected("subquery after EXISTS"));
                }
                let subquery = self.parse_select()?;
                self.tokens.expect_punct(Punctuation::RParen)?;
                ExprKind::Exists(Box::new(subquery))
            }
            TokenKind::Operator(Operator::Star) => {
                self.tokens.next()?;
                ExprKind::Wildcard { qualifier: None }
            }
            TokenKind::Punctuation(Punctuation::LParen) => {
                self.tokens.next()?;
                let kind = if self.tokens.at_keyword(Keyword::Select)? {
                    ExprKind::Subquery(Box::new(self.parse_select()?))
                } else {
                    // The grouping parens only move the position.
                    self.parse_expr()?.kind
                };
                self.tokens.expect_punct(Punctuation::RParen)?;
                kind
            }
            TokenKind::Identifier => self.parse_identifier_expr()?,
            _ => return Err(self.tokens.unexpected("expression")),
        };
        Ok(Expr::new(kind, position))
    }

    /// Column reference, `qualifier.*` or function call.
    fn parse_identifier_expr(&mut self) -> Result<ExprKind> {
        let mut name = self.tokens.next()?.text;
        let mut qualifier = Vec::new();

        while self.tokens.eat_punct(Punctuation::Dot)? {
            qualifier.push(name);
            if self.tokens.eat_operator(Operator::Star)? {
                return Ok(ExprKind::Wildcard {
                    qualifier: Some(ObjectName(qualifier)),
                });
            }
            name = self.tokens.expect_identifier("identifier or '*' after '.'")?;
        }

        if self.tokens.at_punct(Punctuation::LParen)? {
            qualifier.push(name);
            let call = self.parse_function_call(ObjectName(qualifier))?;
            return Ok(ExprKind::Function(call));
        }

        Ok(ExprKind::Column(ColumnRef {
            qualifier: (!qualifier.is_empty()).then(|| ObjectName(qualifier)),
            name,
        }))
    }

    fn parse_function_call(&mut self, name: ObjectName) -> Result<FunctionCall> {
        self.tokens.expect_punct(Punctuation::LParen)?;
        let mut call = FunctionCall {
            name,
            distinct: false,
            args: Vec::new(),
        };
        if self.tokens.eat_punct(Punctuation::RParen)? {
            return Ok(call);
        }
        call.distinct = self.tokens.eat_keyword(Keyword::Distinct)?;
        call.args = self.comma_separated(Self::parse_expr)?;
        self.tokens.expect_punct(Punctuation::RParen)?;
        Ok(call)
    }
}

/// Infix operators that take a plain right operand, with their binding power.
fn binary_operator(kind: TokenKind) -> Option<(BinaryOperator, u8)> {
    let op = match kind {
        TokenKind::Keyword(Keyword::Or) => (BinaryOperator::Or, OR),
        TokenKind::Keyword(Keyword::And) => (BinaryOperator::And, AND),
        TokenKind::Operator(op) => match op {
            Operator::Eq => (BinaryOperator::Eq, COMPARISON),
            Operator::LtGt | Operator::BangEq => (BinaryOperator::NotEq, COMPARISON),
            Operator::Lt => (BinaryOperator::Lt, COMPARISON),
            Operator::LtEq => (BinaryOperator::LtEq, COMPARISON),
            Operator::Gt => (BinaryOperator::Gt, COMPARISON),
            Operator::GtEq => (BinaryOperator::GtEq, COMPARISON),
            Operator::Plus => (BinaryOperator::Plus, ADDITIVE),
            Operator::Minus => (BinaryOperator::Minus, ADDITIVE),
            Operator::Concat => (BinaryOperator::Concat, ADDITIVE),
            Operator::Star => (BinaryOperator::Multiply, MULTIPLICATIVE),
            Operator::Slash => (BinaryOperator::Divide, MULTIPLICATIVE),
            Operator::Percent => (BinaryOperator::Modulo, MULTIPLICATIVE),
            _ => return None,
        },
        _ => return None,
    };
    Some(op)
}

/// A binary node positioned at its left operand.
fn binary(op: BinaryOperator, left: Expr, right: Expr) -> Expr {
    let position = left.position;
    Expr::new(
        ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        position,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use BinaryOperator::*;

    /// Parse `SELECT <sql>` and return the single projected expression.
    fn expr(sql: &str) -> Expr {
        let statement = parse(&format!("SELECT {sql}")).unwrap_or_else(|e| panic!("{sql}: {e}"));
        let select = statement.as_select().expect("SELECT statement");
        assert_eq!(select.projection.len(), 1, "{sql}");
        select.projection[0].expr.clone()
    }

    fn col(name: &str) -> Expr {
        Expr::column(name)
    }

    fn int(value: i64) -> Expr {
        Expr::integer(value)
    }

    fn not(operand: Expr) -> Expr {
        Expr::unary(UnaryOperator::Not, operand)
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        assert_eq!(
            expr("1 + 2 * 3"),
            Expr::binary(Plus, int(1), Expr::binary(Multiply, int(2), int(3)))
        );
        assert_eq!(
            expr("1 * 2 + 3"),
            Expr::binary(Plus, Expr::binary(Multiply, int(1), int(2)), int(3))
        );
    }

    #[test]
    fn binary_operators_are_left_associative() {
        assert_eq!(
            expr("a - b - c"),
            Expr::binary(Minus, Expr::binary(Minus, col("a"), col("b")), col("c"))
        );
        assert_eq!(
            expr("a / b % c"),
            Expr::binary(Modulo, Expr::binary(Divide, col("a"), col("b")), col("c"))
        );
        assert_eq!(
            expr("a OR b OR c"),
            Expr::binary(Or, Expr::binary(Or, col("a"), col("b")), col("c"))
        );
    }

    #[test]
    fn and_binds_tighter_than_or() {
        assert_eq!(
            expr("a OR b AND c"),
            Expr::binary(Or, col("a"), Expr::binary(And, col("b"), col("c")))
        );
    }

    #[test]
    fn not_sits_between_and_and_comparison() {
        assert_eq!(
            expr("NOT a = b"),
            not(Expr::binary(Eq, col("a"), col("b")))
        );
        assert_eq!(
            expr("NOT a AND b"),
            Expr::binary(And, not(col("a")), col("b"))
        );
        assert_eq!(expr("NOT NOT a"), not(not(col("a"))));
    }

    #[test]
    fn unary_minus_is_right_associative() {
        assert_eq!(
            expr("- -5"),
            Expr::unary(UnaryOperator::Minus, Expr::unary(UnaryOperator::Minus, int(5)))
        );
        assert_eq!(
            expr("-a * b"),
            Expr::binary(Multiply, Expr::unary(UnaryOperator::Minus, col("a")), col("b"))
        );
    }

    #[test]
    fn comparison_operators() {
        for (sql, op) in [
            ("a = 1", Eq),
            ("a <> 1", NotEq),
            ("a != 1", NotEq),
            ("a < 1", Lt),
            ("a <= 1", LtEq),
            ("a > 1", Gt),
            ("a >= 1", GtEq),
        ] {
            assert_eq!(expr(sql), Expr::binary(op, col("a"), int(1)), "{sql}");
        }
    }

    #[test]
    fn concat_is_additive() {
        assert_eq!(
            expr("a || 'x' = b"),
            Expr::binary(Eq, Expr::binary(Concat, col("a"), Expr::string("x")), col("b"))
        );
    }

    #[test]
    fn like_and_not_like() {
        assert_eq!(
            expr("name LIKE 'a%'"),
            Expr::binary(Like, col("name"), Expr::string("a%"))
        );
        assert_eq!(
            expr("name NOT LIKE 'a%'"),
            Expr::binary(NotLike, col("name"), Expr::string("a%"))
        );
    }

    #[test]
    fn in_list_and_subquery() {
        let e = expr("id NOT IN (1, 2, 3)");
        let ExprKind::InList { list, negated, .. } = &*e else {
            panic!("expected IN list, got {e:?}");
        };
        assert!(*negated);
        assert_eq!(list, &vec![int(1), int(2), int(3)]);

        let e = expr("id IN (SELECT author_id FROM book)");
        assert!(matches!(&*e, ExprKind::InSubquery { negated: false, .. }));
    }

    #[test]
    fn in_list_must_not_be_empty() {
        let err = parse("SELECT a IN ()").unwrap_err();
        assert_eq!(err.message(), "expected expression, found ')'");
    }

    #[test]
    fn between_bounds_stop_at_and() {
        let e = expr("x BETWEEN 1 AND 2 AND y");
        let ExprKind::Binary { op: And, left, right } = &*e else {
            panic!("expected AND, got {e:?}");
        };
        assert_eq!(**right, col("y"));
        assert!(matches!(
            &***left,
            ExprKind::Between { negated: false, .. }
        ));

        let e = expr("x NOT BETWEEN a + 1 AND b");
        let ExprKind::Between { low, negated, .. } = &*e else {
            panic!("expected BETWEEN, got {e:?}");
        };
        assert!(*negated);
        assert_eq!(**low, Expr::binary(Plus, col("a"), int(1)));
    }

    #[test]
    fn is_null_and_is_not_null() {
        assert!(matches!(
            &*expr("a IS NULL"),
            ExprKind::IsNull { negated: false, .. }
        ));
        assert!(matches!(
            &*expr("a IS NOT NULL"),
            ExprKind::IsNull { negated: true, .. }
        ));
        let err = parse("SELECT a IS 1").unwrap_err();
        assert_eq!(err.message(), "expected keyword NULL, found number 1");
    }

    #[test]
    fn literals() {
        assert_eq!(
            *expr("TRUE"),
            ExprKind::Literal(Literal::Boolean(true))
        );
        assert_eq!(*expr("null"), ExprKind::Literal(Literal::Null));
        assert_eq!(
            *expr("3.14"),
            ExprKind::Literal(Literal::Numeric("3.14".into()))
        );
        assert_eq!(
            *expr("1e10"),
            ExprKind::Literal(Literal::Numeric("1e10".into()))
        );
        assert_eq!(expr("'it''s'"), Expr::string("it's"));
    }

    #[test]
    fn column_references() {
        assert_eq!(expr("author.name"), Expr::qualified_column("author", "name"));
        let e = expr("public.author.name");
        let ExprKind::Column(column) = &*e else {
            panic!("expected column, got {e:?}");
        };
        assert_eq!(column.qualifier, Some(ObjectName::new(["public", "author"])));
        assert_eq!(column.name, "name");
    }

    #[test]
    fn wildcards() {
        assert_eq!(expr("*"), Expr::wildcard());
        assert_eq!(
            *expr("book.*"),
            ExprKind::Wildcard {
                qualifier: Some(ObjectName::new(["book"]))
            }
        );
    }

    #[test]
    fn function_calls() {
        assert_eq!(expr("now()"), Expr::function("now", vec![]));
        assert_eq!(
            expr("count(*)"),
            Expr::function("count", vec![Expr::wildcard()])
        );
        assert_eq!(
            expr("coalesce(a, 0)"),
            Expr::function("coalesce", vec![col("a"), int(0)])
        );

        let e = expr("COUNT(DISTINCT author.id)");
        let ExprKind::Function(call) = &*e else {
            panic!("expected function, got {e:?}");
        };
        assert!(call.distinct);
        assert_eq!(call.args, vec![Expr::qualified_column("author", "id")]);

        let e = expr("pg_catalog.lower(name)");
        let ExprKind::Function(call) = &*e else {
            panic!("expected function, got {e:?}");
        };
        assert_eq!(call.name, ObjectName::new(["pg_catalog", "lower"]));
    }

    #[test]
    fn casts_bind_tighter_than_unary() {
        assert_eq!(
            expr("-a::int"),
            Expr::unary(
                UnaryOperator::Minus,
                Expr::detached(ExprKind::Cast {
                    expr: Box::new(col("a")),
                    data_type: DataType::new("int"),
                })
            )
        );
        let e = expr("price::numeric(10, 2) AS p");
        assert!(matches!(&*e, ExprKind::Cast { data_type, .. } if data_type.params == [10, 2]));
    }

    #[test]
    fn subqueries_and_exists() {
        let e = expr("(SELECT max(cost) FROM book)");
        assert!(matches!(&*e, ExprKind::Subquery(_)));

        let e = expr("NOT EXISTS (SELECT 1 FROM book WHERE book.author_id = author.id)");
        let ExprKind::Unary { operand, .. } = &*e else {
            panic!("expected NOT, got {e:?}");
        };
        assert!(matches!(&***operand, ExprKind::Exists(_)));

        let err = parse("SELECT EXISTS (1)").unwrap_err();
        assert_eq!(err.message(), "expected subquery after EXISTS, found number 1");
    }

    #[test]
    fn parentheses_override_precedence() {
        assert_eq!(
            expr("(1 + 2) * 3"),
            Expr::binary(Multiply, Expr::binary(Plus, int(1), int(2)), int(3))
        );
    }

    #[test]
    fn positions_point_at_first_token() {
        let e = expr("(1 + 2) * 3");
        assert_eq!(e.position.column, 8);
        let ExprKind::Binary { left, right, .. } = &*e else {
            panic!("expected binary, got {e:?}");
        };
        assert_eq!(left.position.column, 8);
        assert_eq!(right.position.column, 18);
    }

    #[test]
    fn not_is_rejected_as_a_comparison_operand() {
        let err = parse("SELECT a = NOT b").unwrap_err();
        assert_eq!(err.message(), "expected expression, found keyword NOT");
        assert_eq!(
            expr("a = (NOT b)"),
            Expr::binary(Eq, col("a"), not(col("b")))
        );
    }

    #[test]
    fn arithmetic_cannot_follow_a_predicate() {
        for sql in [
            "SELECT a IS NULL + 1",
            "SELECT NOT a IS NULL * 2",
            "SELECT a IN (1) || 'x'",
        ] {
            let err = parse(sql).unwrap_err();
            assert!(err.message().starts_with("expected end of input"), "{sql}: {err}");
        }
        assert!(matches!(
            &*expr("(a IS NULL) + 1"),
            ExprKind::Binary { op: Plus, .. }
        ));
        assert!(matches!(
            &*expr("a IS NULL = b IS NOT NULL"),
            ExprKind::IsNull { negated: true, .. }
        ));
    }

    #[test]
    fn sign_binds_tighter_than_binary_operators() {
        assert_eq!(
            expr("-a + b"),
            Expr::binary(Plus, Expr::unary(UnaryOperator::Minus, col("a")), col("b"))
        );
        assert_eq!(
            expr("a * -b"),
            Expr::binary(Multiply, col("a"), Expr::unary(UnaryOperator::Minus, col("b")))
        );
    }

    #[test]
    fn largest_integer_literal() {
        assert_eq!(expr("9223372036854775807"), int(i64::MAX));
        assert_eq!(
            expr("-9223372036854775807"),
            Expr::unary(UnaryOperator::Minus, int(i64::MAX))
        );
        let err = parse("SELECT 9223372036854775808").unwrap_err();
        assert_eq!(
            err.kind,
            crate::error::ErrorKind::IntegerOutOfRange("9223372036854775808".into())
        );
    }

    #[test]
    fn keyword_where_expression_expected() {
        let err = parse("SELECT FROM t").unwrap_err();
        assert_eq!(err.message(), "expected expression, found keyword FROM");
        assert_eq!((err.line(), err.column()), (1, 8));
    }

    #[test]
    fn unclosed_parenthesis() {
        let err = parse("SELECT (1 + 2 FROM t").unwrap_err();
        assert_eq!(err.message(), "expected ')', found keyword FROM");
    }
}
