//! Column type syntax: `BOOL`, `STRING(256)`, `ARRAY<BYTES(MAX)>`, and the
//! opaque fallback for `STRUCT<...>` and `PG_`-prefixed types (§9 open
//! question: these are never in-place alterable).

use spandiff_core::{Length, RootType, TypeTree};

use crate::cursor::Cursor;

/// Parses one column type, returning both its canonical string rendering and
/// the decomposed [`TypeTree`] the compatibility rule inspects.
pub(crate) fn parse_type(cursor: &mut Cursor<'_>) -> Result<(String, TypeTree), String> {
    if cursor.eat_word("ARRAY") {
        let inner_text = cursor.capture_angle_bracketed()?;
        let mut inner_cursor = Cursor::new(&crate::tokenize(&inner_text)?);
        let (_, inner_tree) = parse_type(&mut inner_cursor)?;
        let canonical = format!("ARRAY<{inner_text}>");
        let tree = TypeTree {
            root: inner_tree.root,
            array_depth: inner_tree.array_depth + 1,
            length: inner_tree.length,
        };
        return Ok((canonical, tree));
    }

    let name = cursor.next_identifier()?;
    let root = root_type_from_name(&name);
    let mut canonical = name.to_ascii_uppercase();
    let mut length = None;

    if matches!(root, RootType::Other(_)) {
        if cursor.peek() == Some(&sqlparser::tokenizer::Token::Lt) {
            let inner = cursor.capture_angle_bracketed()?;
            canonical.push('<');
            canonical.push_str(&inner);
            canonical.push('>');
        }
    } else if cursor.eat_token(&sqlparser::tokenizer::Token::LParen) {
        if cursor.eat_word("MAX") {
            length = Some(Length::Max);
            canonical.push_str("(MAX)");
        } else {
            let value = cursor.next_number()?;
            length = Some(Length::Value(value));
            canonical.push_str(&format!("({value})"));
        }
        cursor.expect_token(&sqlparser::tokenizer::Token::RParen)?;
    }

    Ok((
        canonical,
        TypeTree {
            root,
            array_depth: 0,
            length,
        },
    ))
}

fn root_type_from_name(name: &str) -> RootType {
    match name.to_ascii_uppercase().as_str() {
        "BOOL" => RootType::Bool,
        "INT64" => RootType::Int64,
        "FLOAT32" => RootType::Float32,
        "FLOAT64" => RootType::Float64,
        "STRING" => RootType::String,
        "BYTES" => RootType::Bytes,
        "DATE" => RootType::Date,
        "TIMESTAMP" => RootType::Timestamp,
        "NUMERIC" => RootType::Numeric,
        "JSON" => RootType::Json,
        "TOKENLIST" => RootType::TokenList,
        other => RootType::Other(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> (String, TypeTree) {
        let tokens = crate::tokenize(text).unwrap();
        let mut cursor = Cursor::new(&tokens);
        parse_type(&mut cursor).unwrap()
    }

    #[test]
    fn parses_plain_scalar() {
        let (canonical, tree) = parse("INT64");
        assert_eq!(canonical, "INT64");
        assert_eq!(tree.root, RootType::Int64);
        assert_eq!(tree.array_depth, 0);
    }

    #[test]
    fn parses_string_with_length() {
        let (canonical, tree) = parse("STRING(256)");
        assert_eq!(canonical, "STRING(256)");
        assert_eq!(tree.length, Some(Length::Value(256)));
    }

    #[test]
    fn parses_array_of_bytes_max() {
        let (canonical, tree) = parse("ARRAY<BYTES(MAX)>");
        assert_eq!(canonical, "ARRAY<BYTES(MAX)>");
        assert_eq!(tree.root, RootType::Bytes);
        assert_eq!(tree.array_depth, 1);
        assert_eq!(tree.length, Some(Length::Max));
    }
}
