//! Statement and clause productions.

use super::Parser;
use crate::ast::*;
use crate::error::{ErrorKind, ParseError, Result};
use crate::token::{Keyword, Operator, Punctuation, TokenKind};

/// SELECT clauses in the order they must appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Clause {
    Projection,
    From,
    Where,
    GroupBy,
    Having,
    OrderBy,
    Limit,
    Offset,
}

impl Clause {
    const ORDERED: [Clause; 8] = [
        Clause::Projection,
        Clause::From,
        Clause::Where,
        Clause::GroupBy,
        Clause::Having,
        Clause::OrderBy,
        Clause::Limit,
        Clause::Offset,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Clause::Projection => "SELECT",
            Clause::From => "FROM",
            Clause::Where => "WHERE",
            Clause::GroupBy => "GROUP BY",
            Clause::Having => "HAVING",
            Clause::OrderBy => "ORDER BY",
            Clause::Limit => "LIMIT",
            Clause::Offset => "OFFSET",
        }
    }

    /// The clause a keyword introduces, if any. Join keywords continue FROM.
    fn keyword_name(kw: Keyword) -> Option<&'static str> {
        match kw {
            Keyword::From => Some("FROM"),
            Keyword::Join
            | Keyword::Inner
            | Keyword::Left
            | Keyword::Right
            | Keyword::Full
            | Keyword::Cross => Some("JOIN"),
            Keyword::Where => Some("WHERE"),
            Keyword::Group => Some("GROUP BY"),
            Keyword::Having => Some("HAVING"),
            Keyword::Order => Some("ORDER BY"),
            Keyword::Limit => Some("LIMIT"),
            Keyword::Offset => Some("OFFSET"),
            _ => None,
        }
    }
}

impl Parser<'_> {
    pub fn parse_statement(&mut self) -> Result<Statement> {
        let (position, first) = {
            let token = self.tokens.peek()?;
            (token.position, token.kind)
        };
        let kind = match first {
            TokenKind::Keyword(Keyword::Select) => {
                StatementKind::Select(Box::new(self.parse_select()?))
            }
            TokenKind::Keyword(Keyword::Insert) => StatementKind::Insert(self.parse_insert()?),
            TokenKind::Keyword(Keyword::Update) => StatementKind::Update(self.parse_update()?),
            TokenKind::Keyword(Keyword::Delete) => StatementKind::Delete(self.parse_delete()?),
            TokenKind::Keyword(Keyword::Create) => {
                StatementKind::CreateTable(self.parse_create_table()?)
            }
            _ => return Err(self.tokens.unexpected("statement keyword")),
        };
        tracing::trace!(line = position.line, column = position.column, "parsed statement");
        Ok(Statement::new(kind, position))
    }

    // ===== SELECT =====

    pub(super) fn parse_select(&mut self) -> Result<Select> {
        self.nested(Self::parse_select_body)
    }

    fn parse_select_body(&mut self) -> Result<Select> {
        self.tokens.expect_keyword(Keyword::Select)?;

        let distinct = if self.tokens.eat_keyword(Keyword::Distinct)? {
            true
        } else {
            self.tokens.eat_keyword(Keyword::All)?;
            false
        };

        let projection = self.comma_separated(Self::parse_select_item)?;
        let mut select = Select::new(projection);
        select.distinct = distinct;
        let mut last = Clause::Projection;

        // FROM clause
        if self.tokens.eat_keyword(Keyword::From)? {
            select.from = self.comma_separated(Self::parse_table_ref)?;
            select.joins = self.parse_joins()?;
            last = Clause::From;
        }

        // WHERE clause
        if self.tokens.eat_keyword(Keyword::Where)? {
            select.selection = Some(self.parse_expr()?);
            last = Clause::Where;
        }

        // GROUP BY clause
        if self.tokens.eat_keyword(Keyword::Group)? {
            self.tokens.expect_keyword(Keyword::By)?;
            select.group_by = self.comma_separated(Self::parse_expr)?;
            last = Clause::GroupBy;
        }

        // HAVING clause
        if self.tokens.eat_keyword(Keyword::Having)? {
            select.having = Some(self.parse_expr()?);
            last = Clause::Having;
        }

        // ORDER BY clause
        if self.tokens.eat_keyword(Keyword::Order)? {
            self.tokens.expect_keyword(Keyword::By)?;
            select.order_by = self.comma_separated(Self::parse_order_by_item)?;
            last = Clause::OrderBy;
        }

        // LIMIT clause; LIMIT ALL means no limit
        if self.tokens.eat_keyword(Keyword::Limit)? {
            if !self.tokens.eat_keyword(Keyword::All)? {
                select.limit = Some(self.parse_count("row count or ALL")?);
            }
            last = Clause::Limit;
        }

        if self.tokens.eat_keyword(Keyword::Offset)? {
            select.offset = Some(self.parse_count("row count")?);
            last = Clause::Offset;
        }

        self.check_clause_order(last)?;
        Ok(select)
    }

    /// After the last clause, a clause keyword can only mean the clauses
    /// were written in the wrong order (or one was repeated).
    fn check_clause_order(&mut self, last: Clause) -> Result<()> {
        let token = self.tokens.peek()?;
        let TokenKind::Keyword(kw) = token.kind else {
            return Ok(());
        };
        let Some(clause) = Clause::keyword_name(kw) else {
            return Ok(());
        };

        let mut allowed: Vec<&str> = Clause::ORDERED
            .iter()
            .filter(|c| **c > last)
            .map(|c| c.as_str())
            .collect();
        allowed.push("end of statement");

        Err(ParseError::new(
            ErrorKind::ClauseOutOfOrder {
                clause: clause.to_string(),
                expected: one_of(&allowed),
            },
            token.position,
            token.range,
        ))
    }

    fn parse_select_item(&mut self) -> Result<SelectItem> {
        let expr = self.parse_expr()?;
        let alias = self.parse_optional_alias()?;
        Ok(SelectItem { expr, alias })
    }

    /// `[AS] alias`. A bare identifier directly after an item is an alias.
    fn parse_optional_alias(&mut self) -> Result<Option<String>> {
        if self.tokens.eat_keyword(Keyword::As)? {
            return self.tokens.expect_identifier("alias after AS").map(Some);
        }
        if self.tokens.peek()?.kind == TokenKind::Identifier {
            return Ok(Some(self.tokens.next()?.text));
        }
        Ok(None)
    }

    fn parse_table_ref(&mut self) -> Result<TableRef> {
        let position = self.tokens.peek()?.position;

        let relation = if self.tokens.eat_punct(Punctuation::LParen)? {
            if !self.tokens.at_keyword(Keyword::Select)? {
                return Err(self.tokens.unexpected("subquery"));
            }
            let subquery = self.parse_select()?;
            self.tokens.expect_punct(Punctuation::RParen)?;
            Relation::Subquery(Box::new(subquery))
        } else {
            Relation::Table(self.parse_object_name("table name")?)
        };

        let alias = self.parse_optional_alias()?;
        Ok(TableRef::new(TableFactor { relation, alias }, position))
    }

    fn parse_joins(&mut self) -> Result<Vec<Join>> {
        let mut joins = Vec::new();
        while let Some(kind) = self.parse_join_kind()? {
            let table = self.parse_table_ref()?;
            let constraint = if kind == JoinKind::Cross {
                None
            } else {
                self.tokens.expect_keyword(Keyword::On)?;
                Some(self.parse_expr()?)
            };
            joins.push(Join {
                kind,
                table,
                constraint,
            });
        }
        Ok(joins)
    }

    fn parse_join_kind(&mut self) -> Result<Option<JoinKind>> {
        let next = self.tokens.peek()?.kind;
        let kind = match next {
            TokenKind::Keyword(Keyword::Join) => {
                self.tokens.next()?;
                return Ok(Some(JoinKind::Inner));
            }
            TokenKind::Keyword(Keyword::Inner) => JoinKind::Inner,
            TokenKind::Keyword(Keyword::Left) => JoinKind::Left,
            TokenKind::Keyword(Keyword::Right) => JoinKind::Right,
            TokenKind::Keyword(Keyword::Full) => JoinKind::Full,
            TokenKind::Keyword(Keyword::Cross) => JoinKind::Cross,
            _ => return Ok(None),
        };
        self.tokens.next()?;

        if matches!(kind, JoinKind::Left | JoinKind::Right | JoinKind::Full) {
            self.tokens.eat_keyword(Keyword::Outer)?;
        }
        self.tokens.expect_keyword(Keyword::Join)?;
        Ok(Some(kind))
    }

    fn parse_order_by_item(&mut self) -> Result<OrderByExpr> {
        let expr = self.parse_expr()?;
        let direction = if self.tokens.eat_keyword(Keyword::Desc)? {
            SortDirection::Desc
        } else {
            self.tokens.eat_keyword(Keyword::Asc)?;
            SortDirection::Asc
        };
        Ok(OrderByExpr { expr, direction })
    }

    /// A non-negative integer literal (LIMIT, OFFSET, type parameters).
    fn parse_count(&mut self, what: &str) -> Result<u64> {
        let token = self.tokens.peek()?;
        let count = match token.kind {
            TokenKind::IntegerLiteral(value) => u64::try_from(value).ok(),
            _ => None,
        };
        let Some(count) = count else {
            return Err(self.tokens.unexpected(what));
        };
        self.tokens.next()?;
        Ok(count)
    }

    // ===== Data modification =====

    fn parse_insert(&mut self) -> Result<Insert> {
        self.tokens.expect_keyword(Keyword::Insert)?;
        self.tokens.expect_keyword(Keyword::Into)?;
        let table = self.parse_object_name("table name")?;

        let columns = if self.tokens.at_punct(Punctuation::LParen)? {
            self.parse_identifier_list("column name")?
        } else {
            Vec::new()
        };

        let source = if self.tokens.eat_keyword(Keyword::Values)? {
            InsertSource::Values(self.comma_separated(Self::parse_values_row)?)
        } else if self.tokens.at_keyword(Keyword::Select)? {
            InsertSource::Select(Box::new(self.parse_select()?))
        } else {
            return Err(self.tokens.unexpected("VALUES or SELECT"));
        };

        Ok(Insert {
            table,
            columns,
            source,
        })
    }

    fn parse_values_row(&mut self) -> Result<Vec<Expr>> {
        self.tokens.expect_punct(Punctuation::LParen)?;
        let row = self.comma_separated(Self::parse_expr)?;
        self.tokens.expect_punct(Punctuation::RParen)?;
        Ok(row)
    }

    fn parse_update(&mut self) -> Result<Update> {
        self.tokens.expect_keyword(Keyword::Update)?;
        let table = self.parse_object_name("table name")?;
        self.tokens.expect_keyword(Keyword::Set)?;
        let assignments = self.comma_separated(Self::parse_assignment)?;
        let selection = self.parse_optional_where()?;
        Ok(Update {
            table,
            assignments,
            selection,
        })
    }

    fn parse_assignment(&mut self) -> Result<Assignment> {
        let column = self.tokens.expect_identifier("column name")?;
        self.tokens.expect_operator(Operator::Eq)?;
        let value = self.parse_expr()?;
        Ok(Assignment { column, value })
    }

    fn parse_delete(&mut self) -> Result<Delete> {
        self.tokens.expect_keyword(Keyword::Delete)?;
        self.tokens.expect_keyword(Keyword::From)?;
        let table = self.parse_object_name("table name")?;
        let selection = self.parse_optional_where()?;
        Ok(Delete { table, selection })
    }

    fn parse_optional_where(&mut self) -> Result<Option<Expr>> {
        if self.tokens.eat_keyword(Keyword::Where)? {
            self.parse_expr().map(Some)
        } else {
            Ok(None)
        }
    }

    // ===== CREATE TABLE =====

    fn parse_create_table(&mut self) -> Result<CreateTable> {
        self.tokens.expect_keyword(Keyword::Create)?;
        self.tokens.expect_keyword(Keyword::Table)?;

        let if_not_exists = if self.tokens.eat_keyword(Keyword::If)? {
            self.tokens.expect_keyword(Keyword::Not)?;
            self.tokens.expect_keyword(Keyword::Exists)?;
            true
        } else {
            false
        };

        let name = self.parse_object_name("table name")?;
        let mut create = CreateTable {
            name,
            if_not_exists,
            columns: Vec::new(),
            primary_key: Vec::new(),
        };

        self.tokens.expect_punct(Punctuation::LParen)?;
        loop {
            if self.tokens.eat_keyword(Keyword::Primary)? {
                self.tokens.expect_keyword(Keyword::Key)?;
                let columns = self.parse_identifier_list("column name")?;
                create.primary_key.extend(columns);
            } else {
                create.columns.push(self.parse_column_def()?);
            }
            if !self.tokens.eat_punct(Punctuation::Comma)? {
                break;
            }
        }
        self.tokens.expect_punct(Punctuation::RParen)?;

        Ok(create)
    }

    fn parse_column_def(&mut self) -> Result<ColumnDef> {
        let name = self.tokens.expect_identifier("column definition")?;
        let data_type = self.parse_data_type(true)?;

        let mut constraints = Vec::new();
        loop {
            let next = self.tokens.peek()?.kind;
            let constraint = match next {
                TokenKind::Keyword(Keyword::Not) => {
                    self.tokens.next()?;
                    self.tokens.expect_keyword(Keyword::Null)?;
                    ColumnConstraint::NotNull
                }
                TokenKind::Keyword(Keyword::Null) => {
                    self.tokens.next()?;
                    ColumnConstraint::Null
                }
                TokenKind::Keyword(Keyword::Primary) => {
                    self.tokens.next()?;
                    self.tokens.expect_keyword(Keyword::Key)?;
                    ColumnConstraint::PrimaryKey
                }
                TokenKind::Keyword(Keyword::Unique) => {
                    self.tokens.next()?;
                    ColumnConstraint::Unique
                }
                TokenKind::Keyword(Keyword::Default) => {
                    self.tokens.next()?;
                    ColumnConstraint::Default(self.parse_expr()?)
                }
                _ => break,
            };
            constraints.push(constraint);
        }

        Ok(ColumnDef {
            name,
            data_type,
            constraints,
        })
    }

    /// `name [(n [, m])]`. Column definitions allow multi-word names such as
    /// `DOUBLE PRECISION`; casts take a single word so a following alias is
    /// not swallowed.
    pub(super) fn parse_data_type(&mut self, multi_word: bool) -> Result<DataType> {
        let mut words = vec![self.tokens.expect_identifier("data type")?];
        while multi_word && self.tokens.peek()?.kind == TokenKind::Identifier {
            words.push(self.tokens.next()?.text);
        }

        let mut data_type = DataType::from_words(words);
        if self.tokens.eat_punct(Punctuation::LParen)? {
            data_type.params = self.comma_separated(|p| p.parse_count("type parameter"))?;
            self.tokens.expect_punct(Punctuation::RParen)?;
        }
        Ok(data_type)
    }

    // ===== Shared helpers =====

    /// `ident {. ident}`
    pub(super) fn parse_object_name(&mut self, what: &str) -> Result<ObjectName> {
        let mut parts = vec![self.tokens.expect_identifier(what)?];
        while self.tokens.eat_punct(Punctuation::Dot)? {
            parts.push(self.tokens.expect_identifier("identifier after '.'")?);
        }
        Ok(ObjectName(parts))
    }

    /// `( ident {, ident} )`
    fn parse_identifier_list(&mut self, what: &str) -> Result<Vec<String>> {
        self.tokens.expect_punct(Punctuation::LParen)?;
        let names = self.comma_separated(|p| p.tokens.expect_identifier(what))?;
        self.tokens.expect_punct(Punctuation::RParen)?;
        Ok(names)
    }

    /// One or more `item`s separated by commas.
    pub(super) fn comma_separated<T>(
        &mut self,
        mut item: impl FnMut(&mut Self) -> Result<T>,
    ) -> Result<Vec<T>> {
        let mut items = vec![item(self)?];
        while self.tokens.eat_punct(Punctuation::Comma)? {
            items.push(item(self)?);
        }
        Ok(items)
    }
}

/// "A", "A or B", "A, B or C"
fn one_of(options: &[&str]) -> String {
    match options {
        [] => String::new(),
        [only] => (*only).to_string(),
        [init @ .., last] => format!("{} or {}", init.join(", "), last),
    }
}
