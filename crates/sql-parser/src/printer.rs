//! SQL printer for converting an AST back to SQL text.
//!
//! `Display` on [`Statement`], [`Select`] and [`Expr`] produces compact,
//! single-line SQL; the alternate form (`{:#}`) puts each clause on its own
//! line. Subqueries are always printed compactly.
//!
//! Formatting rules:
//! - Keywords: UPPERCASE
//! - Identifiers: bare when they lex back as the same identifier, otherwise
//!   quoted (double quotes unless [`to_sql_with`] asks for backticks)
//! - Parentheses: only where precedence or associativity requires them
//!
//! Printing then parsing yields a tree equal to the one printed.

use crate::ast::*;
use crate::config::IdentifierQuote;
use crate::token::is_keyword;
use std::fmt::{self, Display, Write};

/// Format mode for SQL printing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatMode {
    /// Single-line output
    #[default]
    Compact,
    /// One clause per line
    Pretty,
}

impl FormatMode {
    fn of(f: &fmt::Formatter<'_>) -> Self {
        if f.alternate() {
            FormatMode::Pretty
        } else {
            FormatMode::Compact
        }
    }
}

/// Render `statement` as SQL.
pub fn to_sql(statement: &Statement, mode: FormatMode) -> String {
    to_sql_with(statement, mode, IdentifierQuote::Double)
}

/// Render `statement` as SQL that lexes back under `quote`.
pub fn to_sql_with(statement: &Statement, mode: FormatMode, quote: IdentifierQuote) -> String {
    let mut out = String::new();
    let mut printer = Printer::new(&mut out, mode);
    printer.quote = quote;
    // Writing into a String cannot fail.
    let _ = printer.statement(&statement.kind);
    out
}

// ===== Display implementations =====

impl Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = FormatMode::of(f);
        Printer::new(f, mode).statement(&self.kind)
    }
}

impl Display for Select {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = FormatMode::of(f);
        Printer::new(f, mode).select(self)
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Printer::new(f, FormatMode::Compact).expr(self)
    }
}

impl Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Printer::new(f, FormatMode::Compact).object_name(self)
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Printer::new(f, FormatMode::Compact).data_type(self)
    }
}

// ===== Precedence =====

// Binding strength of each expression form, loosest first. Mirrors the
// parser's precedence levels.
const OR: u8 = 1;
const AND: u8 = 2;
const NOT: u8 = 3;
const COMPARISON: u8 = 4;
const ADDITIVE: u8 = 5;
const MULTIPLICATIVE: u8 = 6;
const SIGN: u8 = 7;
const CAST: u8 = 8;
const ATOM: u8 = 9;

fn precedence(expr: &Expr) -> u8 {
    match &expr.kind {
        ExprKind::Binary { op, .. } => match op {
            BinaryOperator::Or => OR,
            BinaryOperator::And => AND,
            BinaryOperator::Eq
            | BinaryOperator::NotEq
            | BinaryOperator::Lt
            | BinaryOperator::LtEq
            | BinaryOperator::Gt
            | BinaryOperator::GtEq
            | BinaryOperator::Like
            | BinaryOperator::NotLike => COMPARISON,
            BinaryOperator::Plus | BinaryOperator::Minus | BinaryOperator::Concat => ADDITIVE,
            BinaryOperator::Multiply | BinaryOperator::Divide | BinaryOperator::Modulo => {
                MULTIPLICATIVE
            }
        },
        ExprKind::Unary {
            op: UnaryOperator::Not,
            ..
        } => NOT,
        ExprKind::Unary { .. } => SIGN,
        ExprKind::InList { .. }
        | ExprKind::InSubquery { .. }
        | ExprKind::Between { .. }
        | ExprKind::IsNull { .. } => COMPARISON,
        ExprKind::Cast { .. } => CAST,
        // A negative literal only exists in hand-built trees; it prints
        // with a leading sign.
        ExprKind::Literal(Literal::Integer(n)) if *n < 0 => SIGN,
        ExprKind::Literal(Literal::Numeric(text)) if text.starts_with('-') => SIGN,
        _ => ATOM,
    }
}

// ===== Printer =====

struct Printer<W> {
    out: W,
    mode: FormatMode,
    quote: IdentifierQuote,
}

impl<W: Write> Printer<W> {
    fn new(out: W, mode: FormatMode) -> Self {
        Self {
            out,
            mode,
            quote: IdentifierQuote::Double,
        }
    }

    /// Separator before a clause: a space, or a newline in pretty mode.
    fn clause_break(&mut self) -> fmt::Result {
        match self.mode {
            FormatMode::Compact => self.out.write_char(' '),
            FormatMode::Pretty => self.out.write_char('\n'),
        }
    }

    fn ident(&mut self, name: &str) -> fmt::Result {
        if is_bare_identifier(name) {
            return self.out.write_str(name);
        }
        let quote = self.quote.as_char();
        let escaped = name.replace(quote, &format!("{quote}{quote}"));
        write!(self.out, "{quote}{escaped}{quote}")
    }

    fn object_name(&mut self, name: &ObjectName) -> fmt::Result {
        for (i, part) in name.0.iter().enumerate() {
            if i > 0 {
                self.out.write_char('.')?;
            }
            self.ident(part)?;
        }
        Ok(())
    }

    /// Every word is printed as its own identifier, so a quoted word with
    /// spaces stays one word.
    fn data_type(&mut self, data_type: &DataType) -> fmt::Result {
        for (i, word) in data_type.words.iter().enumerate() {
            if i > 0 {
                self.out.write_char(' ')?;
            }
            self.ident(word)?;
        }
        if !data_type.params.is_empty() {
            self.out.write_char('(')?;
            self.comma_separated(&data_type.params, |p, param| write!(p.out, "{param}"))?;
            self.out.write_char(')')?;
        }
        Ok(())
    }

    fn comma_separated<T>(
        &mut self,
        items: &[T],
        mut each: impl FnMut(&mut Self, &T) -> fmt::Result,
    ) -> fmt::Result {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.out.write_str(", ")?;
            }
            each(self, item)?;
        }
        Ok(())
    }

    fn statement(&mut self, statement: &StatementKind) -> fmt::Result {
        match statement {
            StatementKind::Select(select) => self.select(select),
            StatementKind::Insert(insert) => self.insert(insert),
            StatementKind::Update(update) => self.update(update),
            StatementKind::Delete(delete) => self.delete(delete),
            StatementKind::CreateTable(create) => self.create_table(create),
        }
    }

    fn select(&mut self, select: &Select) -> fmt::Result {
        self.out.write_str("SELECT ")?;
        if select.distinct {
            self.out.write_str("DISTINCT ")?;
        }
        self.comma_separated(&select.projection, |p, item| {
            p.expr(&item.expr)?;
            p.alias(item.alias.as_deref())
        })?;

        if !select.from.is_empty() {
            self.clause_break()?;
            self.out.write_str("FROM ")?;
            self.comma_separated(&select.from, Self::table_ref)?;
        }
        for join in &select.joins {
            self.clause_break()?;
            write!(self.out, "{} ", join.kind.as_str())?;
            self.table_ref(&join.table)?;
            if let Some(constraint) = &join.constraint {
                self.out.write_str(" ON ")?;
                self.expr(constraint)?;
            }
        }

        if let Some(selection) = &select.selection {
            self.clause_break()?;
            self.out.write_str("WHERE ")?;
            self.expr(selection)?;
        }
        if !select.group_by.is_empty() {
            self.clause_break()?;
            self.out.write_str("GROUP BY ")?;
            self.comma_separated(&select.group_by, Self::expr)?;
        }
        if let Some(having) = &select.having {
            self.clause_break()?;
            self.out.write_str("HAVING ")?;
            self.expr(having)?;
        }
        if !select.order_by.is_empty() {
            self.clause_break()?;
            self.out.write_str("ORDER BY ")?;
            self.comma_separated(&select.order_by, |p, item| {
                p.expr(&item.expr)?;
                match item.direction {
                    SortDirection::Asc => p.out.write_str(" ASC"),
                    SortDirection::Desc => p.out.write_str(" DESC"),
                }
            })?;
        }
        if let Some(limit) = select.limit {
            self.clause_break()?;
            write!(self.out, "LIMIT {limit}")?;
        }
        if let Some(offset) = select.offset {
            self.clause_break()?;
            write!(self.out, "OFFSET {offset}")?;
        }
        Ok(())
    }

    /// `(SELECT ...)` on a single line whatever the mode.
    fn subquery(&mut self, select: &Select) -> fmt::Result {
        let mode = std::mem::replace(&mut self.mode, FormatMode::Compact);
        self.out.write_char('(')?;
        let result = self.select(select);
        self.mode = mode;
        result?;
        self.out.write_char(')')
    }

    fn alias(&mut self, alias: Option<&str>) -> fmt::Result {
        match alias {
            Some(alias) => {
                self.out.write_str(" AS ")?;
                self.ident(alias)
            }
            None => Ok(()),
        }
    }

    fn table_ref(&mut self, table: &TableRef) -> fmt::Result {
        match &table.relation {
            Relation::Table(name) => self.object_name(name)?,
            Relation::Subquery(select) => self.subquery(select)?,
        }
        self.alias(table.alias.as_deref())
    }

    fn insert(&mut self, insert: &Insert) -> fmt::Result {
        self.out.write_str("INSERT INTO ")?;
        self.object_name(&insert.table)?;
        if !insert.columns.is_empty() {
            self.out.write_str(" (")?;
            self.comma_separated(&insert.columns, |p, column| p.ident(column))?;
            self.out.write_char(')')?;
        }
        self.clause_break()?;
        match &insert.source {
            InsertSource::Values(rows) => {
                self.out.write_str("VALUES ")?;
                self.comma_separated(rows, |p, row| {
                    p.out.write_char('(')?;
                    p.comma_separated(row, Self::expr)?;
                    p.out.write_char(')')
                })
            }
            InsertSource::Select(select) => self.select(select),
        }
    }

    fn update(&mut self, update: &Update) -> fmt::Result {
        self.out.write_str("UPDATE ")?;
        self.object_name(&update.table)?;
        self.clause_break()?;
        self.out.write_str("SET ")?;
        self.comma_separated(&update.assignments, |p, assignment| {
            p.ident(&assignment.column)?;
            p.out.write_str(" = ")?;
            p.expr(&assignment.value)
        })?;
        self.where_clause(update.selection.as_ref())
    }

    fn delete(&mut self, delete: &Delete) -> fmt::Result {
        self.out.write_str("DELETE FROM ")?;
        self.object_name(&delete.table)?;
        self.where_clause(delete.selection.as_ref())
    }

    fn where_clause(&mut self, selection: Option<&Expr>) -> fmt::Result {
        match selection {
            Some(selection) => {
                self.clause_break()?;
                self.out.write_str("WHERE ")?;
                self.expr(selection)
            }
            None => Ok(()),
        }
    }

    fn create_table(&mut self, create: &CreateTable) -> fmt::Result {
        self.out.write_str("CREATE TABLE ")?;
        if create.if_not_exists {
            self.out.write_str("IF NOT EXISTS ")?;
        }
        self.object_name(&create.name)?;

        let (open, separator, close) = match self.mode {
            FormatMode::Compact => (" (", ", ", ")"),
            FormatMode::Pretty => (" (\n  ", ",\n  ", "\n)"),
        };
        self.out.write_str(open)?;
        for (i, column) in create.columns.iter().enumerate() {
            if i > 0 {
                self.out.write_str(separator)?;
            }
            self.column_def(column)?;
        }
        if !create.primary_key.is_empty() {
            if !create.columns.is_empty() {
                self.out.write_str(separator)?;
            }
            self.out.write_str("PRIMARY KEY (")?;
            self.comma_separated(&create.primary_key, |p, column| p.ident(column))?;
            self.out.write_char(')')?;
        }
        self.out.write_str(close)
    }

    fn column_def(&mut self, column: &ColumnDef) -> fmt::Result {
        self.ident(&column.name)?;
        self.out.write_char(' ')?;
        self.data_type(&column.data_type)?;
        for constraint in &column.constraints {
            match constraint {
                ColumnConstraint::NotNull => self.out.write_str(" NOT NULL")?,
                ColumnConstraint::Null => self.out.write_str(" NULL")?,
                ColumnConstraint::PrimaryKey => self.out.write_str(" PRIMARY KEY")?,
                ColumnConstraint::Unique => self.out.write_str(" UNIQUE")?,
                ColumnConstraint::Default(value) => {
                    self.out.write_str(" DEFAULT ")?;
                    self.expr(value)?;
                }
            }
        }
        Ok(())
    }

    // ===== Expressions =====

    /// Print `expr`, parenthesized when it binds looser than `min`.
    fn operand(&mut self, expr: &Expr, min: u8) -> fmt::Result {
        if precedence(expr) < min {
            self.out.write_char('(')?;
            self.expr(expr)?;
            self.out.write_char(')')
        } else {
            self.expr(expr)
        }
    }

    fn expr(&mut self, expr: &Expr) -> fmt::Result {
        match &expr.kind {
            ExprKind::Literal(literal) => write_literal(&mut self.out, literal),
            ExprKind::Column(column) => {
                if let Some(qualifier) = &column.qualifier {
                    self.object_name(qualifier)?;
                    self.out.write_char('.')?;
                }
                self.ident(&column.name)
            }
            ExprKind::Wildcard { qualifier } => {
                if let Some(qualifier) = qualifier {
                    self.object_name(qualifier)?;
                    self.out.write_char('.')?;
                }
                self.out.write_char('*')
            }
            ExprKind::Binary { op, left, right } => {
                // Left-associative: an equal-precedence right operand
                // needs parentheses, an equal-precedence left one does not.
                let level = precedence(expr);
                self.operand(left, level)?;
                write!(self.out, " {} ", op.as_str())?;
                self.operand(right, level + 1)
            }
            ExprKind::Unary {
                op: UnaryOperator::Not,
                operand,
            } => {
                self.out.write_str("NOT ")?;
                self.operand(operand, NOT)
            }
            ExprKind::Unary { op, operand } => {
                // `- -x` must not print as the comment `--x`.
                self.out.write_str(op.as_str())?;
                self.operand(operand, CAST)
            }
            ExprKind::Function(call) => {
                self.object_name(&call.name)?;
                self.out.write_char('(')?;
                if call.distinct {
                    self.out.write_str("DISTINCT ")?;
                }
                self.comma_separated(&call.args, Self::expr)?;
                self.out.write_char(')')
            }
            ExprKind::Subquery(select) => self.subquery(select),
            ExprKind::Exists(select) => {
                self.out.write_str("EXISTS ")?;
                self.subquery(select)
            }
            ExprKind::InList {
                expr,
                list,
                negated,
            } => {
                self.operand(expr, COMPARISON)?;
                self.out.write_str(if *negated { " NOT IN (" } else { " IN (" })?;
                self.comma_separated(list, Self::expr)?;
                self.out.write_char(')')
            }
            ExprKind::InSubquery {
                expr,
                subquery,
                negated,
            } => {
                self.operand(expr, COMPARISON)?;
                self.out.write_str(if *negated { " NOT IN " } else { " IN " })?;
                self.subquery(subquery)
            }
            ExprKind::Between {
                expr,
                low,
                high,
                negated,
            } => {
                self.operand(expr, COMPARISON)?;
                self.out
                    .write_str(if *negated { " NOT BETWEEN " } else { " BETWEEN " })?;
                self.operand(low, ADDITIVE)?;
                self.out.write_str(" AND ")?;
                self.operand(high, ADDITIVE)
            }
            ExprKind::IsNull { expr, negated } => {
                self.operand(expr, COMPARISON)?;
                self.out
                    .write_str(if *negated { " IS NOT NULL" } else { " IS NULL" })
            }
            ExprKind::Cast { expr, data_type } => {
                self.operand(expr, CAST)?;
                self.out.write_str("::")?;
                self.data_type(data_type)
            }
        }
    }
}

fn write_literal(out: &mut impl Write, literal: &Literal) -> fmt::Result {
    match literal {
        Literal::Integer(value) => write!(out, "{value}"),
        Literal::Numeric(text) => out.write_str(text),
        Literal::String(value) => write!(out, "'{}'", value.replace('\'', "''")),
        Literal::Boolean(true) => out.write_str("TRUE"),
        Literal::Boolean(false) => out.write_str("FALSE"),
        Literal::Null => out.write_str("NULL"),
    }
}

/// Whether `name` lexes back as itself without quotes.
fn is_bare_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_well = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    starts_well && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') && !is_keyword(name)
}
