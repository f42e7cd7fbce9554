//! GoogleSQL DDL parsing for the Spanner schema-diff tool: implements the
//! `DdlParser` interface the core consumes (§6). We reuse `sqlparser` for
//! tokenizing only — none of its bundled dialects understand GoogleSQL's
//! `INTERLEAVE`/`ROW DELETION POLICY`/`CHANGE STREAM` syntax, so the
//! statement grammar itself is hand-rolled in [`statement`].

mod cursor;
mod statement;
mod types;

use sqlparser::dialect::GenericDialect;
use sqlparser::tokenizer::{Token, Tokenizer};
use spandiff_core::{DdlParser, ParseError, Statement};

/// A `DdlParser` for the GoogleSQL DDL subset named in §3/§4.2.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpannerDdlParser;

impl DdlParser for SpannerDdlParser {
    fn parse_ddl(&self, ddl: &str) -> spandiff_core::Result<Vec<Statement>> {
        let mut statements = Vec::new();
        for fragment in split_statements(ddl) {
            let tokens = tokenize(&fragment).map_err(|message| ParseError::InvalidFragment {
                fragment: fragment.clone(),
                message,
            })?;
            let statement =
                statement::parse_statement(&tokens, &fragment).map_err(|message| {
                    ParseError::InvalidFragment {
                        fragment: fragment.clone(),
                        message,
                    }
                })?;
            statements.push(statement);
        }
        Ok(statements)
    }
}

pub(crate) fn tokenize(text: &str) -> Result<Vec<Token>, String> {
    let dialect = GenericDialect {};
    let tokens = Tokenizer::new(&dialect, text)
        .tokenize()
        .map_err(|err| err.to_string())?;
    Ok(tokens
        .into_iter()
        .filter(|token| !matches!(token, Token::Whitespace(_)))
        .collect())
}

/// Strips `--` line comments and splits on top-level `;` (§6), honoring
/// string-literal and parenthesis nesting so semicolons inside a quoted
/// value or a nested expression are not treated as statement boundaries.
fn split_statements(ddl: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;
    let mut in_string: Option<char> = None;
    let mut chars = ddl.chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(quote) = in_string {
            current.push(c);
            if c == quote {
                in_string = None;
            }
            continue;
        }
        match c {
            '-' if chars.peek() == Some(&'-') => {
                while let Some(&next) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            '\'' | '"' | '`' => {
                in_string = Some(c);
                current.push(c);
            }
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth -= 1;
                current.push(c);
            }
            ';' if depth == 0 => {
                statements.push(current.clone());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    if !current.trim().is_empty() {
        statements.push(current);
    }

    statements
        .into_iter()
        .map(|fragment| fragment.trim().to_string())
        .filter(|fragment| !fragment.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use spandiff_core::{RootType, StatementKind};

    #[test]
    fn splits_on_top_level_semicolons_only() {
        let ddl = "CREATE TABLE T (id INT64) PRIMARY KEY (id); CREATE INDEX I ON T(id);";
        let fragments = split_statements(ddl);
        assert_eq!(fragments.len(), 2);
    }

    #[test]
    fn strips_line_comments() {
        let ddl = "-- a comment\nCREATE TABLE T (id INT64) PRIMARY KEY (id);";
        let fragments = split_statements(ddl);
        assert_eq!(fragments.len(), 1);
        assert!(!fragments[0].contains("comment"));
    }

    #[test]
    fn parses_create_table_with_interleave() {
        let parser = SpannerDdlParser;
        let ddl = "CREATE TABLE Child (id INT64, pid INT64) PRIMARY KEY (pid, id), \
                   INTERLEAVE IN PARENT Parent ON DELETE CASCADE;";
        let statements = parser.parse_ddl(ddl).unwrap();
        assert_eq!(statements.len(), 1);
        match &statements[0].kind {
            StatementKind::CreateTable(table) => {
                assert_eq!(table.name, "Child");
                assert_eq!(table.columns.len(), 2);
                assert_eq!(table.columns[0].type_tree.root, RootType::Int64);
                let interleave = table.interleave.as_ref().unwrap();
                assert_eq!(interleave.parent, "Parent");
            }
            other => panic!("expected CreateTable, got {other:?}"),
        }
    }

    #[test]
    fn parses_alter_database_set_options() {
        let parser = SpannerDdlParser;
        let ddl = "ALTER DATABASE D SET OPTIONS (version_retention_period='7d');";
        let statements = parser.parse_ddl(ddl).unwrap();
        match &statements[0].kind {
            StatementKind::AlterDatabase(alter) => {
                assert_eq!(alter.database.as_deref(), Some("D"));
                assert_eq!(
                    alter.options.get("version_retention_period").map(String::as_str),
                    Some("'7d'")
                );
            }
            other => panic!("expected AlterDatabase, got {other:?}"),
        }
    }

    #[test]
    fn unrecognized_alter_table_child_parses_as_unsupported() {
        let parser = SpannerDdlParser;
        let ddl = "ALTER TABLE T RENAME COLUMN a TO b;";
        let statements = parser.parse_ddl(ddl).unwrap();
        match &statements[0].kind {
            StatementKind::AlterTable(alter) => {
                assert!(matches!(
                    alter.action,
                    spandiff_core::AlterTableAction::Unsupported(_)
                ));
            }
            other => panic!("expected AlterTable, got {other:?}"),
        }
    }
}
