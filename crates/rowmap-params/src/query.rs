//! Named-parameter translation.
//!
//! A single left-to-right pass over the SQL text:
//! - `?` is rejected, the translator owns placeholder generation
//! - `:` must be followed by an identifier (letter or `_`, then letters,
//!   digits or `_`); the token becomes `?` and its 1-based position is
//!   recorded under the name
//! - everything else is copied verbatim

use std::collections::HashMap;
use std::iter::Peekable;
use std::str::CharIndices;

use rowmap_core::ParameterCase;

use crate::error::ParamError;

const PARAM_CHARACTER: char = ':';
const POSITIONAL_PLACEHOLDER: char = '?';

/// A SQL string translated from `:name` placeholders to positional `?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedParameterQuery {
    translated: String,
    indexes: HashMap<String, Vec<usize>>,
    placeholder_count: usize,
    case: ParameterCase,
}

impl NamedParameterQuery {
    /// Translate `sql`, keeping parameter names case-sensitive.
    ///
    /// # Errors
    ///
    /// Returns `ParamError::LiteralPlaceholder` for a literal `?` and
    /// `ParamError::InvalidName` for a `:` without a valid name.
    pub fn parse(sql: &str) -> Result<Self, ParamError> {
        Self::parse_with(sql, ParameterCase::Preserve)
    }

    /// Translate `sql`, keying parameter names according to `case`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::parse`].
    pub fn parse_with(sql: &str, case: ParameterCase) -> Result<Self, ParamError> {
        let mut translated = String::with_capacity(sql.len());
        let mut indexes: HashMap<String, Vec<usize>> = HashMap::new();
        let mut position = 1;
        let mut chars = sql.char_indices().peekable();

        while let Some(&(offset, c)) = chars.peek() {
            match c {
                POSITIONAL_PLACEHOLDER => return Err(ParamError::LiteralPlaceholder { offset }),
                PARAM_CHARACTER => {
                    chars.next();
                    let name = parse_name(&mut chars, offset)?;
                    indexes
                        .entry(case.normalize(&name))
                        .or_default()
                        .push(position);
                    position += 1;
                    translated.push(POSITIONAL_PLACEHOLDER);
                }
                _ => copy_text(&mut chars, &mut translated),
            }
        }

        tracing::trace!(
            placeholders = position - 1,
            names = indexes.len(),
            "translated named-parameter query"
        );

        Ok(Self {
            translated,
            indexes,
            placeholder_count: position - 1,
            case,
        })
    }

    #[must_use]
    pub fn translated_query(&self) -> &str {
        &self.translated
    }

    /// Name → 1-based positions, in the order each name was encountered.
    #[must_use]
    pub const fn parameter_indexes(&self) -> &HashMap<String, Vec<usize>> {
        &self.indexes
    }

    /// Positions of `name`, normalized with this query's [`ParameterCase`].
    #[must_use]
    pub fn indexes_of(&self, name: &str) -> Option<&[usize]> {
        self.indexes
            .get(&self.case.normalize(name))
            .map(Vec::as_slice)
    }

    /// Total number of `?` placeholders emitted.
    #[must_use]
    pub const fn placeholder_count(&self) -> usize {
        self.placeholder_count
    }

    #[must_use]
    pub const fn case(&self) -> ParameterCase {
        self.case
    }

    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.indexes.keys().map(String::as_str)
    }
}

/// Consume an identifier after `:`. `colon_offset` is used for error reporting.
fn parse_name(chars: &mut Peekable<CharIndices<'_>>, colon_offset: usize) -> Result<String, ParamError> {
    let mut name = String::new();
    match chars.peek() {
        Some(&(_, c)) if is_identifier_start(c) => {
            name.push(c);
            chars.next();
        }
        _ => return Err(ParamError::InvalidName { offset: colon_offset }),
    }
    while let Some(&(_, c)) = chars.peek() {
        if !is_identifier_part(c) {
            break;
        }
        name.push(c);
        chars.next();
    }
    Ok(name)
}

/// Copy characters until the next `:` or `?`.
fn copy_text(chars: &mut Peekable<CharIndices<'_>>, out: &mut String) {
    while let Some(&(_, c)) = chars.peek() {
        if c == PARAM_CHARACTER || c == POSITIONAL_PLACEHOLDER {
            break;
        }
        out.push(c);
        chars.next();
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_identifier_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn repeated_names_collect_all_positions() {
        let query =
            NamedParameterQuery::parse("SELECT * FROM a WHERE a = :p1 AND b = :p2 AND c = :p1")
                .unwrap();
        assert_eq!(
            query.translated_query(),
            "SELECT * FROM a WHERE a = ? AND b = ? AND c = ?"
        );
        assert_eq!(query.indexes_of("p1"), Some(&[1, 3][..]));
        assert_eq!(query.indexes_of("p2"), Some(&[2][..]));
        assert_eq!(query.placeholder_count(), 3);
    }

    #[test]
    fn names_are_case_sensitive_by_default() {
        let query = NamedParameterQuery::parse("x = :Name AND y = :name").unwrap();
        assert_eq!(query.indexes_of("Name"), Some(&[1][..]));
        assert_eq!(query.indexes_of("name"), Some(&[2][..]));
        assert_eq!(query.indexes_of("NAME"), None);
    }

    #[test]
    fn upper_case_normalizes_parse_and_lookup() {
        let query =
            NamedParameterQuery::parse_with("x = :param_1 AND y = :PARAM_1", ParameterCase::Upper)
                .unwrap();
        assert_eq!(query.indexes_of("Param_1"), Some(&[1, 2][..]));
        assert!(query.parameter_indexes().contains_key("PARAM_1"));
    }

    #[rstest]
    #[case("SELECT ?")]
    #[case("?")]
    #[case("SELECT * FROM t WHERE a = :a AND b = ?")]
    #[case("SELECT '?' FROM t")]
    fn literal_question_mark_always_fails(#[case] sql: &str) {
        let err = NamedParameterQuery::parse(sql).unwrap_err();
        assert!(matches!(err, ParamError::LiteralPlaceholder { .. }));
    }

    #[rstest]
    #[case("a = :", 4)]
    #[case("a = :1abc", 4)]
    #[case("a = : b", 4)]
    #[case("a::int", 1)]
    fn invalid_names_fail(#[case] sql: &str, #[case] offset: usize) {
        assert_eq!(
            NamedParameterQuery::parse(sql).unwrap_err(),
            ParamError::InvalidName { offset }
        );
    }

    #[test]
    fn names_stop_at_non_identifier_characters() {
        let query = NamedParameterQuery::parse("IN (:a,:b_2) AND z=:c)").unwrap();
        assert_eq!(query.translated_query(), "IN (?,?) AND z=?)");
        assert_eq!(query.indexes_of("b_2"), Some(&[2][..]));
        assert_eq!(query.indexes_of("c"), Some(&[3][..]));
    }

    #[test]
    fn text_without_parameters_is_copied_verbatim() {
        let sql = "SELECT 'é', \"col\" FROM t -- comment";
        let query = NamedParameterQuery::parse(sql).unwrap();
        assert_eq!(query.translated_query(), sql);
        assert_eq!(query.placeholder_count(), 0);
        assert!(query.parameter_indexes().is_empty());
    }

    #[test]
    fn unicode_identifiers_are_accepted() {
        let query = NamedParameterQuery::parse("a = :größe").unwrap();
        assert_eq!(query.indexes_of("größe"), Some(&[1][..]));
    }
}
