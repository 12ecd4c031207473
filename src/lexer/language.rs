//! Language definitions.
//!
//! A [`LanguageDefinition`] is built once by a grammar author and then only
//! read. It is plain data, so it can be written as a struct literal, built
//! with the `with_*` methods, taken from a preset, or loaded from a YAML or
//! JSON file.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

// ============================================================================
// CHARACTER CLASSES - Identifier predicates as data
// ============================================================================

/// Unicode character categories usable in a [`CharClass`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharCategory {
    Alphabetic,
    Alphanumeric,
    Numeric,
    Whitespace,
}

impl CharCategory {
    fn contains(self, c: char) -> bool {
        match self {
            Self::Alphabetic => c.is_alphabetic(),
            Self::Alphanumeric => c.is_alphanumeric(),
            Self::Numeric => c.is_numeric(),
            Self::Whitespace => c.is_whitespace(),
        }
    }
}

/// A character predicate: the union of some categories, some literal
/// characters and, when built in code, a custom function.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CharClass {
    pub categories: Vec<CharCategory>,
    pub chars: String,
    #[serde(skip)]
    pub custom: Option<fn(char) -> bool>,
}

impl CharClass {
    pub fn category(category: CharCategory) -> Self {
        Self {
            categories: vec![category],
            ..Self::default()
        }
    }

    pub fn alphabetic() -> Self {
        Self::category(CharCategory::Alphabetic)
    }

    pub fn alphanumeric() -> Self {
        Self::category(CharCategory::Alphanumeric)
    }

    /// Exactly the characters in `chars`.
    pub fn chars(chars: impl Into<String>) -> Self {
        Self {
            chars: chars.into(),
            ..Self::default()
        }
    }

    /// Characters accepted by `predicate`. Not preserved by serialization.
    pub fn custom(predicate: fn(char) -> bool) -> Self {
        Self {
            custom: Some(predicate),
            ..Self::default()
        }
    }

    /// Also accept the characters in `chars`.
    pub fn with_chars(mut self, chars: &str) -> Self {
        self.chars.push_str(chars);
        self
    }

    pub fn contains(&self, c: char) -> bool {
        self.categories.iter().any(|category| category.contains(c))
            || self.chars.contains(c)
            || self.custom.map_or(false, |predicate| predicate(c))
    }
}

// ============================================================================
// LANGUAGE DEFINITION
// ============================================================================

/// Lexical conventions of one language.
///
/// Empty comment markers disable that kind of comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LanguageDefinition {
    pub name: String,
    pub comment_start: String,
    pub comment_end: String,
    pub comment_line: String,
    pub nested_comments: bool,
    /// Characters skipped as insignificant whitespace.
    pub whitespace: String,
    pub identifier_start: CharClass,
    pub identifier_letter: CharClass,
    pub reserved_names: Vec<String>,
    /// Characters operator symbols are made of.
    pub operator_chars: String,
    pub reserved_op_names: Vec<String>,
    /// Whether identifiers and reserved words compare case-sensitively.
    pub case_sensitive: bool,
}

const OPERATOR_CHARS: &str = ":!#$%&*+./<=>?@\\^|-~";

impl Default for LanguageDefinition {
    fn default() -> Self {
        Self {
            name: "default".into(),
            comment_start: String::new(),
            comment_end: String::new(),
            comment_line: String::new(),
            nested_comments: false,
            whitespace: " \t\r\n".into(),
            identifier_start: CharClass::alphabetic().with_chars("_"),
            identifier_letter: CharClass::alphanumeric().with_chars("_'"),
            reserved_names: Vec::new(),
            operator_chars: OPERATOR_CHARS.into(),
            reserved_op_names: Vec::new(),
            case_sensitive: true,
        }
    }
}

impl LanguageDefinition {
    /// Scheme-like conventions: `;` line comments, nestable `#| |#` block
    /// comments, symbol characters in identifiers, case-insensitive names.
    pub fn lisp() -> Self {
        let symbol_chars = "!$%&*/:<=>?^_~+-";
        Self {
            name: "lisp".into(),
            identifier_start: CharClass::alphabetic().with_chars(symbol_chars),
            identifier_letter: CharClass::alphanumeric()
                .with_chars(symbol_chars)
                .with_chars(".@"),
            operator_chars: "'`,@".into(),
            case_sensitive: false,
            ..Self::default()
        }
        .with_line_comment(";")
        .with_block_comment("#|", "|#", true)
        .with_reserved_names(["true", "false", "nil"])
    }

    /// C/Java conventions: `//` and non-nesting `/* */` comments.
    pub fn java_style() -> Self {
        Self {
            name: "java".into(),
            identifier_start: CharClass::alphabetic().with_chars("_$"),
            identifier_letter: CharClass::alphanumeric().with_chars("_$"),
            ..Self::default()
        }
        .with_line_comment("//")
        .with_block_comment("/*", "*/", false)
    }

    /// Haskell conventions: `--` and nesting `{- -}` comments.
    pub fn haskell_style() -> Self {
        Self {
            name: "haskell".into(),
            identifier_start: CharClass::alphabetic(),
            ..Self::default()
        }
        .with_line_comment("--")
        .with_block_comment("{-", "-}", true)
        .with_reserved_names([
            "let", "in", "case", "of", "if", "then", "else", "data", "type", "class", "default",
            "deriving", "do", "import", "infix", "infixl", "infixr", "instance", "module",
            "newtype", "where",
        ])
        .with_reserved_ops(["::", "..", "=", "\\", "|", "<-", "->", "@", "~", "=>"])
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_line_comment(mut self, marker: impl Into<String>) -> Self {
        self.comment_line = marker.into();
        self
    }

    pub fn with_block_comment(
        mut self,
        start: impl Into<String>,
        end: impl Into<String>,
        nested: bool,
    ) -> Self {
        self.comment_start = start.into();
        self.comment_end = end.into();
        self.nested_comments = nested;
        self
    }

    pub fn with_whitespace(mut self, chars: impl Into<String>) -> Self {
        self.whitespace = chars.into();
        self
    }

    pub fn with_identifier(mut self, start: CharClass, letter: CharClass) -> Self {
        self.identifier_start = start;
        self.identifier_letter = letter;
        self
    }

    pub fn with_reserved_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved_names.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_operator_chars(mut self, chars: impl Into<String>) -> Self {
        self.operator_chars = chars.into();
        self
    }

    pub fn with_reserved_ops<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved_op_names.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    /// Freeze the definition for sharing between combinators.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn is_whitespace(&self, c: char) -> bool {
        self.whitespace.contains(c)
    }

    pub fn is_operator_char(&self, c: char) -> bool {
        self.operator_chars.contains(c)
    }

    /// Compare two names under this language's case rules.
    pub fn names_equal(&self, a: &str, b: &str) -> bool {
        if self.case_sensitive {
            a == b
        } else {
            a.to_lowercase() == b.to_lowercase()
        }
    }

    pub fn is_reserved(&self, word: &str) -> bool {
        self.reserved_names
            .iter()
            .any(|name| self.names_equal(name, word))
    }

    pub fn is_reserved_op(&self, op: &str) -> bool {
        self.reserved_op_names.iter().any(|name| name == op)
    }

    // ------------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------------

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let definition: Self = serde_yaml::from_str(text)?;
        definition.validate()?;
        Ok(definition)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let definition: Self = serde_json::from_str(text)?;
        definition.validate()?;
        Ok(definition)
    }

    /// Load a definition from a `.yaml`, `.yml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_str(&text),
            Some("json") => Self::from_json_str(&text),
            other => Err(ConfigError::UnknownFormat(other.unwrap_or("").to_string())),
        }
    }

    /// Check the fields that must agree with each other.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.comment_start.is_empty() != self.comment_end.is_empty() {
            return Err(ConfigError::Invalid(
                "block comments need both a start and an end marker".into(),
            ));
        }
        if self.reserved_names.iter().any(String::is_empty) {
            return Err(ConfigError::Invalid("reserved names cannot be empty".into()));
        }
        if let Some(c) = self.whitespace.chars().find(|c| self.identifier_start.contains(*c)) {
            return Err(ConfigError::Invalid(format!(
                "{c:?} cannot be both whitespace and an identifier start"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_reserved_lookup() {
        let lisp = LanguageDefinition::lisp();
        assert!(lisp.is_reserved("TRUE"));
        assert!(!LanguageDefinition::java_style()
            .with_reserved_names(["if"])
            .is_reserved("IF"));
    }

    #[test]
    fn test_char_class_union() {
        let class = CharClass::alphabetic().with_chars("_");
        assert!(class.contains('x'));
        assert!(class.contains('_'));
        assert!(!class.contains('1'));
        assert!(CharClass::custom(|c| c == '#').contains('#'));
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r##"
name: mini
comment_line: "#"
identifier_start:
  categories: [alphabetic]
reserved_names: [if, else]
"##;
        let definition = LanguageDefinition::from_yaml_str(yaml).unwrap();
        assert_eq!(definition.name, "mini");
        assert_eq!(definition.comment_line, "#");
        assert!(definition.is_reserved("if"));
        assert!(!definition.identifier_start.contains('_'));
        assert!(definition.case_sensitive);
    }

    #[test]
    fn test_validate_rejects_half_block_comment() {
        let json = r#"{ "comment_start": "/*" }"#;
        assert!(matches!(
            LanguageDefinition::from_json_str(json),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        assert!(matches!(
            LanguageDefinition::from_json_str(r#"{ "colour": "red" }"#),
            Err(ConfigError::Json(_))
        ));
    }
}
