//! Property-based test generators for SQL syntax trees
//!
//! These generators build ASTs directly, restricted to trees the parser
//! can produce, so that printing and re-parsing must give the same tree
//! back. Positions are left detached; tree equality ignores them.

use proptest::collection::vec;
use proptest::option;
use proptest::prelude::*;
use sql_parser::*;

// ===== Basic building blocks =====

/// Identifiers that can be written without quotes
pub fn arb_identifier() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_]{0,10}".prop_filter("keywords must be quoted", |s| !is_keyword(s))
}

/// Any identifier, including ones the printer has to quote
pub fn arb_any_identifier() -> impl Strategy<Value = String> {
    prop_oneof![
        6 => arb_identifier(),
        1 => "[A-Za-z][A-Za-z0-9 \"]{0,8}",
        1 => prop::sample::select(vec!["select", "From", "key", "Order"]).prop_map(String::from),
    ]
}

pub fn arb_object_name() -> impl Strategy<Value = ObjectName> {
    vec(arb_any_identifier(), 1..=2).prop_map(ObjectName)
}

pub fn arb_literal() -> impl Strategy<Value = Literal> {
    prop_oneof![
        (0i64..=i64::MAX).prop_map(Literal::Integer),
        (0u32..10_000, 0u32..1000).prop_map(|(whole, frac)| Literal::Numeric(format!("{whole}.{frac}"))),
        "[ -~]{0,16}".prop_map(Literal::String),
        any::<bool>().prop_map(Literal::Boolean),
        Just(Literal::Null),
    ]
}

pub fn arb_column_ref() -> impl Strategy<Value = ColumnRef> {
    (option::weighted(0.3, arb_object_name()), arb_any_identifier())
        .prop_map(|(qualifier, name)| ColumnRef { qualifier, name })
}

/// Type names as they appear after `::` (one word) or in a column
/// definition (one or two words). Quoted words may hold spaces.
pub fn arb_data_type(max_words: usize) -> impl Strategy<Value = DataType> {
    let word = prop_oneof![
        4 => arb_identifier(),
        1 => "[a-z][a-z ]{0,6}",
        1 => arb_any_identifier(),
    ];
    (vec(word, 1..=max_words), vec(0u64..1000, 0..=2))
        .prop_map(|(words, params)| DataType { words, params })
}

// ===== Expressions =====

fn node(kind: ExprKind) -> Expr {
    Expr::detached(kind)
}

pub fn arb_binary_op() -> impl Strategy<Value = BinaryOperator> {
    use BinaryOperator::*;
    prop::sample::select(vec![
        Or, And, Eq, NotEq, Lt, LtEq, Gt, GtEq, Like, NotLike, Plus, Minus, Concat, Multiply,
        Divide, Modulo,
    ])
}

pub fn arb_unary_op() -> impl Strategy<Value = UnaryOperator> {
    prop::sample::select(vec![UnaryOperator::Not, UnaryOperator::Plus, UnaryOperator::Minus])
}

/// Literals, columns and `count(*)`
pub fn arb_leaf_expr() -> impl Strategy<Value = Expr> {
    prop_oneof![
        3 => arb_literal().prop_map(|literal| node(ExprKind::Literal(literal))),
        3 => arb_column_ref().prop_map(|column| node(ExprKind::Column(column))),
        1 => Just(Expr::function("count", vec![Expr::wildcard()])),
    ]
}

/// A small SELECT used inside subquery expressions and derived tables
pub fn arb_leaf_select() -> impl Strategy<Value = Select> {
    (
        vec(arb_leaf_expr(), 1..=2),
        arb_object_name(),
        option::of(arb_leaf_expr()),
    )
        .prop_map(|(exprs, table, selection)| {
            let projection = exprs
                .into_iter()
                .map(|expr| SelectItem { expr, alias: None })
                .collect();
            let mut select = Select::new(projection);
            select.from = vec![TableRef::detached(TableFactor {
                relation: Relation::Table(table),
                alias: None,
            })];
            select.selection = selection;
            select
        })
}

/// Generate expressions of bounded depth
pub fn arb_expr() -> impl Strategy<Value = Expr> {
    arb_leaf_expr().prop_recursive(3, 24, 3, |inner| {
        prop_oneof![
            4 => (arb_binary_op(), inner.clone(), inner.clone())
                .prop_map(|(op, left, right)| Expr::binary(op, left, right)),
            2 => (arb_unary_op(), inner.clone())
                .prop_map(|(op, operand)| Expr::unary(op, operand)),
            1 => (arb_object_name(), any::<bool>(), vec(inner.clone(), 0..=3)).prop_map(
                |(name, distinct, args)| {
                    node(ExprKind::Function(FunctionCall {
                        name,
                        distinct: distinct && !args.is_empty(),
                        args,
                    }))
                }
            ),
            1 => (inner.clone(), vec(inner.clone(), 1..=3), any::<bool>()).prop_map(
                |(expr, list, negated)| node(ExprKind::InList {
                    expr: Box::new(expr),
                    list,
                    negated,
                })
            ),
            1 => (inner.clone(), arb_leaf_select(), any::<bool>()).prop_map(
                |(expr, subquery, negated)| node(ExprKind::InSubquery {
                    expr: Box::new(expr),
                    subquery: Box::new(subquery),
                    negated,
                })
            ),
            1 => (inner.clone(), inner.clone(), inner.clone(), any::<bool>()).prop_map(
                |(expr, low, high, negated)| node(ExprKind::Between {
                    expr: Box::new(expr),
                    low: Box::new(low),
                    high: Box::new(high),
                    negated,
                })
            ),
            1 => (inner.clone(), any::<bool>()).prop_map(|(expr, negated)| {
                node(ExprKind::IsNull {
                    expr: Box::new(expr),
                    negated,
                })
            }),
            1 => (inner, arb_data_type(1)).prop_map(|(expr, data_type)| {
                node(ExprKind::Cast {
                    expr: Box::new(expr),
                    data_type,
                })
            }),
            1 => arb_leaf_select().prop_map(|select| node(ExprKind::Subquery(Box::new(select)))),
            1 => arb_leaf_select().prop_map(|select| node(ExprKind::Exists(Box::new(select)))),
        ]
    })
}

// ===== SELECT =====

pub fn arb_select_item() -> impl Strategy<Value = SelectItem> {
    let expr = prop_oneof![
        6 => arb_expr(),
        1 => Just(Expr::wildcard()),
        1 => arb_object_name().prop_map(|qualifier| node(ExprKind::Wildcard {
            qualifier: Some(qualifier)
        })),
    ];
    (expr, option::weighted(0.3, arb_any_identifier()))
        .prop_map(|(expr, alias)| SelectItem { expr, alias })
}

pub fn arb_table_ref() -> impl Strategy<Value = TableRef> {
    let relation = prop_oneof![
        4 => arb_object_name().prop_map(Relation::Table),
        1 => arb_leaf_select().prop_map(|select| Relation::Subquery(Box::new(select))),
    ];
    (relation, option::weighted(0.4, arb_any_identifier()))
        .prop_map(|(relation, alias)| TableRef::detached(TableFactor { relation, alias }))
}

pub fn arb_join() -> impl Strategy<Value = Join> {
    let kind = prop::sample::select(vec![
        JoinKind::Inner,
        JoinKind::Left,
        JoinKind::Right,
        JoinKind::Full,
        JoinKind::Cross,
    ]);
    (kind, arb_table_ref(), arb_expr()).prop_map(|(kind, table, condition)| Join {
        kind,
        table,
        constraint: (kind != JoinKind::Cross).then_some(condition),
    })
}

pub fn arb_order_by() -> impl Strategy<Value = OrderByExpr> {
    (
        arb_expr(),
        prop::sample::select(vec![SortDirection::Asc, SortDirection::Desc]),
    )
        .prop_map(|(expr, direction)| OrderByExpr { expr, direction })
}

/// Generate any SELECT; every clause is independently present or absent
pub fn arb_select() -> impl Strategy<Value = Select> {
    (
        any::<bool>(),
        vec(arb_select_item(), 1..=3),
        vec(arb_table_ref(), 0..=2),
        vec(arb_join(), 0..=2),
        option::of(arb_expr()),
        vec(arb_expr(), 0..=2),
        option::of(arb_expr()),
        vec(arb_order_by(), 0..=2),
        option::of(0u64..1_000_000),
        option::of(0u64..1_000_000),
    )
        .prop_map(
            |(distinct, projection, from, joins, selection, group_by, having, order_by, limit, offset)| {
                // Joins hang off the FROM list.
                let joins = if from.is_empty() { Vec::new() } else { joins };
                Select {
                    distinct,
                    projection,
                    from,
                    joins,
                    selection,
                    group_by,
                    having,
                    order_by,
                    limit,
                    offset,
                }
            },
        )
}

// ===== Other statements =====

pub fn arb_insert() -> impl Strategy<Value = Insert> {
    let source = prop_oneof![
        3 => vec(vec(arb_expr(), 1..=3), 1..=3).prop_map(InsertSource::Values),
        1 => arb_select().prop_map(|select| InsertSource::Select(Box::new(select))),
    ];
    (arb_object_name(), vec(arb_any_identifier(), 0..=3), source).prop_map(
        |(table, columns, source)| Insert {
            table,
            columns,
            source,
        },
    )
}

pub fn arb_update() -> impl Strategy<Value = Update> {
    let assignment = (arb_any_identifier(), arb_expr())
        .prop_map(|(column, value)| Assignment { column, value });
    (
        arb_object_name(),
        vec(assignment, 1..=3),
        option::of(arb_expr()),
    )
        .prop_map(|(table, assignments, selection)| Update {
            table,
            assignments,
            selection,
        })
}

pub fn arb_delete() -> impl Strategy<Value = Delete> {
    (arb_object_name(), option::of(arb_expr()))
        .prop_map(|(table, selection)| Delete { table, selection })
}

pub fn arb_column_constraint() -> impl Strategy<Value = ColumnConstraint> {
    prop_oneof![
        Just(ColumnConstraint::NotNull),
        Just(ColumnConstraint::Null),
        Just(ColumnConstraint::PrimaryKey),
        Just(ColumnConstraint::Unique),
        arb_expr().prop_map(ColumnConstraint::Default),
    ]
}

pub fn arb_create_table() -> impl Strategy<Value = CreateTable> {
    let column = (
        arb_any_identifier(),
        arb_data_type(2),
        vec(arb_column_constraint(), 0..=2),
    )
        .prop_map(|(name, data_type, constraints)| ColumnDef {
            name,
            data_type,
            constraints,
        });
    (
        arb_object_name(),
        any::<bool>(),
        vec(column, 1..=4),
        vec(arb_any_identifier(), 0..=2),
    )
        .prop_map(|(name, if_not_exists, columns, primary_key)| CreateTable {
            name,
            if_not_exists,
            columns,
            primary_key,
        })
}

/// Generate any statement
pub fn arb_statement() -> impl Strategy<Value = Statement> {
    prop_oneof![
        4 => arb_select().prop_map(|select| StatementKind::Select(Box::new(select))),
        1 => arb_insert().prop_map(StatementKind::Insert),
        1 => arb_update().prop_map(StatementKind::Update),
        1 => arb_delete().prop_map(StatementKind::Delete),
        1 => arb_create_table().prop_map(StatementKind::CreateTable),
    ]
    .prop_map(Statement::detached)
}

// ===== SQL text =====

/// A hand-written statement and a copy with every letter in random case
pub fn arb_mixed_case_query() -> impl Strategy<Value = (String, String)> {
    let queries = prop::sample::select(vec![
        "SELECT DISTINCT a, count(*) FROM t LEFT JOIN u ON t.id = u.id WHERE a IS NOT NULL GROUP BY a HAVING count(*) > 1 ORDER BY a DESC LIMIT 5",
        "INSERT INTO t (a, b) VALUES (1, 2)",
        "UPDATE t SET a = a + 1 WHERE b NOT IN (1, 2)",
        "DELETE FROM t WHERE a BETWEEN 1 AND 2 OR NOT b LIKE c",
        "CREATE TABLE IF NOT EXISTS t (id INT PRIMARY KEY, name TEXT NOT NULL DEFAULT 0)",
    ]);
    queries.prop_flat_map(|sql| {
        vec(any::<bool>(), sql.len()).prop_map(move |upper| {
            let mixed = sql
                .chars()
                .zip(upper)
                .map(|(c, up)| {
                    if up {
                        c.to_ascii_uppercase()
                    } else {
                        c.to_ascii_lowercase()
                    }
                })
                .collect::<String>();
            (sql.to_string(), mixed)
        })
    })
}
