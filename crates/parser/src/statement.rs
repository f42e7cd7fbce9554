//! Statement-level grammar for the GoogleSQL DDL subset named in §3/§4.2:
//! `CREATE TABLE`, `CREATE INDEX`, `ALTER TABLE`, `ALTER DATABASE`, and
//! `CREATE CHANGE STREAM`.

use sqlparser::tokenizer::Token;
use spandiff_core::{
    AlterDatabaseStatement, AlterTableAction, AlterTableStatement, Column,
    ConstraintBody, CreateChangeStreamStatement, CreateTableStatement, Index, OnDeleteAction,
    OptionMap, ParsedConstraint, ParsedInterleave, Statement, StatementKind,
};

use crate::cursor::{join_tokens, Cursor};
use crate::types::parse_type;

pub(crate) fn parse_statement(tokens: &[Token], source_fragment: &str) -> Result<Statement, String> {
    let mut cursor = Cursor::new(tokens);

    let kind = if cursor.eat_word("CREATE") {
        if cursor.eat_word("TABLE") {
            parse_create_table(&mut cursor)?
        } else if cursor.eat_word("CHANGE") {
            cursor.expect_word("STREAM")?;
            parse_create_change_stream(&mut cursor)?
        } else {
            while cursor.eat_word("UNIQUE") || cursor.eat_word("NULL_FILTERED") {}
            if cursor.eat_word("INDEX") {
                parse_create_index(&mut cursor, tokens)?
            } else {
                return Err(format!("unsupported statement: {source_fragment}"));
            }
        }
    } else if cursor.eat_word("ALTER") {
        if cursor.eat_word("TABLE") {
            parse_alter_table(&mut cursor, source_fragment)?
        } else if cursor.eat_word("DATABASE") {
            parse_alter_database(&mut cursor)?
        } else {
            return Err(format!("unsupported statement: {source_fragment}"));
        }
    } else {
        return Err(format!("unsupported statement: {source_fragment}"));
    };

    Ok(Statement::new(kind, source_fragment.to_string()))
}

fn parse_create_table(cursor: &mut Cursor<'_>) -> Result<StatementKind, String> {
    let name = cursor.next_identifier()?;
    let mut columns = Vec::new();
    let mut constraints = Vec::new();

    cursor.expect_token(&Token::LParen)?;
    loop {
        if cursor.eat_token(&Token::RParen) {
            break;
        }
        if cursor.eat_word("CONSTRAINT") {
            let constraint_name = cursor.next_identifier()?;
            let body = parse_constraint_body(cursor)?;
            constraints.push(ParsedConstraint {
                name: Some(constraint_name),
                body,
            });
        } else if cursor.eat_word("FOREIGN") {
            cursor.expect_word("KEY")?;
            let body = parse_foreign_key_body(cursor)?;
            constraints.push(ParsedConstraint { name: None, body });
        } else if cursor.eat_word("CHECK") {
            let expr = cursor.capture_parenthesized()?;
            constraints.push(ParsedConstraint {
                name: None,
                body: ConstraintBody::Check(expr),
            });
        } else {
            columns.push(parse_column_def(cursor)?);
        }

        if !cursor.eat_token(&Token::Comma) {
            cursor.expect_token(&Token::RParen)?;
            break;
        }
    }

    cursor.expect_word("PRIMARY")?;
    cursor.expect_word("KEY")?;
    let primary_key = format!("({})", cursor.capture_parenthesized()?);

    let mut interleave = None;
    let mut row_deletion_policy = None;
    while cursor.eat_token(&Token::Comma) {
        if cursor.eat_word("INTERLEAVE") {
            cursor.expect_word("IN")?;
            cursor.expect_word("PARENT")?;
            let parent = cursor.next_identifier()?;
            let on_delete = parse_optional_on_delete(cursor)?;
            interleave = Some(ParsedInterleave { parent, on_delete });
        } else if cursor.eat_word("ROW") {
            cursor.expect_word("DELETION")?;
            cursor.expect_word("POLICY")?;
            let clause = cursor.capture_parenthesized()?;
            row_deletion_policy = Some(format!("ROW DELETION POLICY ({clause})"));
        } else {
            return Err(format!(
                "unexpected table-level clause near {:?}",
                cursor.peek()
            ));
        }
    }

    Ok(StatementKind::CreateTable(CreateTableStatement {
        name,
        columns,
        primary_key,
        interleave,
        constraints,
        row_deletion_policy,
    }))
}

fn parse_optional_on_delete(cursor: &mut Cursor<'_>) -> Result<OnDeleteAction, String> {
    if !cursor.eat_word("ON") {
        return Ok(OnDeleteAction::NoAction);
    }
    cursor.expect_word("DELETE")?;
    if cursor.eat_word("CASCADE") {
        Ok(OnDeleteAction::CascadeDelete)
    } else {
        cursor.expect_word("NO")?;
        cursor.expect_word("ACTION")?;
        Ok(OnDeleteAction::NoAction)
    }
}

fn parse_column_def(cursor: &mut Cursor<'_>) -> Result<Column, String> {
    let name = cursor.next_identifier()?;
    let (canonical_type, type_tree) = parse_type(cursor)?;
    let mut not_null = false;
    let mut generated = None;
    let mut default = None;
    let mut options = OptionMap::new();

    loop {
        if cursor.eat_word("NOT") {
            cursor.expect_word("NULL")?;
            not_null = true;
        } else if cursor.eat_word("AS") {
            let expr = cursor.capture_parenthesized()?;
            cursor.eat_word("STORED");
            generated = Some(expr);
        } else if cursor.eat_word("DEFAULT") {
            default = Some(cursor.capture_parenthesized()?);
        } else if cursor.eat_word("OPTIONS") {
            options = parse_option_map(cursor)?;
        } else {
            break;
        }
    }

    Ok(Column {
        name,
        canonical_type,
        type_tree,
        not_null,
        default,
        generated,
        options,
    })
}

fn parse_option_map(cursor: &mut Cursor<'_>) -> Result<OptionMap, String> {
    cursor.expect_token(&Token::LParen)?;
    let mut options = OptionMap::new();
    loop {
        if cursor.eat_token(&Token::RParen) {
            break;
        }
        let key = cursor.next_identifier()?;
        cursor.expect_token(&Token::Eq)?;
        let value = cursor.capture_until(&[]);
        options.insert(key, value);
        if !cursor.eat_token(&Token::Comma) {
            cursor.expect_token(&Token::RParen)?;
            break;
        }
    }
    Ok(options)
}

fn parse_constraint_body(cursor: &mut Cursor<'_>) -> Result<ConstraintBody, String> {
    if cursor.eat_word("CHECK") {
        Ok(ConstraintBody::Check(cursor.capture_parenthesized()?))
    } else if cursor.eat_word("FOREIGN") {
        cursor.expect_word("KEY")?;
        parse_foreign_key_body(cursor)
    } else {
        Err(format!(
            "expected CHECK or FOREIGN KEY, found {:?}",
            cursor.peek()
        ))
    }
}

fn parse_foreign_key_body(cursor: &mut Cursor<'_>) -> Result<ConstraintBody, String> {
    let columns = cursor.capture_parenthesized()?;
    cursor.expect_word("REFERENCES")?;
    let parent = cursor.next_identifier()?;
    let parent_columns = cursor.capture_parenthesized()?;
    let mut clause = format!("({columns}) REFERENCES {parent} ({parent_columns})");
    if cursor.eat_word("ON") {
        cursor.expect_word("DELETE")?;
        if cursor.eat_word("CASCADE") {
            clause.push_str(" ON DELETE CASCADE");
        } else {
            cursor.expect_word("NO")?;
            cursor.expect_word("ACTION")?;
            clause.push_str(" ON DELETE NO ACTION");
        }
    }
    Ok(ConstraintBody::ForeignKey(clause))
}

fn parse_create_index(cursor: &mut Cursor<'_>, all_tokens: &[Token]) -> Result<StatementKind, String> {
    let name = cursor.next_identifier()?;
    let rendered = all_tokens.iter().map(ToString::to_string).collect::<Vec<_>>();
    let canonical_text = join_tokens(&rendered);
    Ok(StatementKind::CreateIndex(Index {
        name,
        canonical_text,
    }))
}

fn parse_alter_table(
    cursor: &mut Cursor<'_>,
    source_fragment: &str,
) -> Result<StatementKind, String> {
    let table = cursor.next_identifier()?;

    let action = if cursor.eat_word("ADD") {
        if cursor.eat_word("CONSTRAINT") {
            let name = cursor.next_identifier()?;
            let body = parse_constraint_body(cursor)?;
            AlterTableAction::AddConstraint(ParsedConstraint {
                name: Some(name),
                body,
            })
        } else if cursor.eat_word("FOREIGN") {
            cursor.expect_word("KEY")?;
            let body = parse_foreign_key_body(cursor)?;
            AlterTableAction::AddConstraint(ParsedConstraint { name: None, body })
        } else if cursor.eat_word("CHECK") {
            let expr = cursor.capture_parenthesized()?;
            AlterTableAction::AddConstraint(ParsedConstraint {
                name: None,
                body: ConstraintBody::Check(expr),
            })
        } else if cursor.eat_word("ROW") {
            cursor.expect_word("DELETION")?;
            cursor.expect_word("POLICY")?;
            let clause = cursor.capture_parenthesized()?;
            AlterTableAction::AddRowDeletionPolicy(format!("ROW DELETION POLICY ({clause})"))
        } else {
            AlterTableAction::Unsupported(source_fragment.to_string())
        }
    } else {
        AlterTableAction::Unsupported(source_fragment.to_string())
    };

    Ok(StatementKind::AlterTable(AlterTableStatement {
        table,
        action,
    }))
}

fn parse_alter_database(cursor: &mut Cursor<'_>) -> Result<StatementKind, String> {
    let name = cursor.next_identifier()?;
    cursor.expect_word("SET")?;
    cursor.expect_word("OPTIONS")?;
    let options = parse_option_map(cursor)?;
    Ok(StatementKind::AlterDatabase(AlterDatabaseStatement {
        database: Some(name),
        options,
    }))
}

fn parse_create_change_stream(cursor: &mut Cursor<'_>) -> Result<StatementKind, String> {
    let name = cursor.next_identifier()?;
    cursor.expect_word("FOR")?;
    let for_clause = cursor.capture_until_keyword(&["OPTIONS"]);
    let options_clause = if cursor.eat_word("OPTIONS") {
        cursor.capture_parenthesized()?
    } else {
        String::new()
    };
    Ok(StatementKind::CreateChangeStream(
        CreateChangeStreamStatement {
            name,
            for_clause,
            options_clause,
        },
    ))
}
