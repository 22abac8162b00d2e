// Array-valued column as it comes off the wire
// Either a native list or a Postgres array literal such as `{a,b,c}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArrayColumn {
    List(Vec<String>),
    Literal(String),
}

impl ArrayColumn {
    /// Classifies raw column text. JSON arrays become native lists; anything
    /// else is kept as a literal for [`ArrayColumn::into_list`] to parse.
    pub fn from_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with('[') {
            if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(trimmed) {
                let list = items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(text) => Some(text),
                        Value::Null => None,
                        other => Some(other.to_string()),
                    })
                    .collect();
                return ArrayColumn::List(list);
            }
        }
        ArrayColumn::Literal(trimmed.to_string())
    }

    pub fn into_list(self) -> Vec<String> {
        match self {
            ArrayColumn::List(items) => items,
            ArrayColumn::Literal(text) => parse_array_literal(&text),
        }
    }

    pub fn normalize(column: Option<ArrayColumn>) -> Vec<String> {
        column.map(ArrayColumn::into_list).unwrap_or_default()
    }
}

/// `{a, b,,"c, d"}` → `["a", "b", "c, d"]`. Double-quoted elements may
/// contain commas and backslash escapes. Text that is not brace-delimited
/// yields an empty list.
pub fn parse_array_literal(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    let Some(inner) = trimmed
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
    else {
        return Vec::new();
    };

    let mut items = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' if in_quotes => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => push_element(&mut items, &mut current),
            _ => current.push(ch),
        }
    }
    push_element(&mut items, &mut current);
    items
}

fn push_element(items: &mut Vec<String>, current: &mut String) {
    let element = current.trim();
    if !element.is_empty() {
        items.push(element.to_string());
    }
    current.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_is_split_and_trimmed() {
        assert_eq!(
            parse_array_literal("{New York, London,,Tokyo}"),
            vec!["New York", "London", "Tokyo"]
        );
    }

    #[test]
    fn quoted_elements_keep_inner_commas() {
        assert_eq!(
            parse_array_literal(r#"{"New York, USA",mobile}"#),
            vec!["New York, USA", "mobile"]
        );
        assert_eq!(parse_array_literal(r#"{"mobile"}"#), vec!["mobile"]);
    }

    #[test]
    fn empty_and_unbraced_literals_yield_nothing() {
        assert!(parse_array_literal("{}").is_empty());
        assert!(parse_array_literal("London").is_empty());
        assert!(ArrayColumn::normalize(None).is_empty());
    }

    #[test]
    fn json_text_becomes_native_list() {
        let column = ArrayColumn::from_text(r#"["mobile", "desktop", null, 3]"#);
        assert_eq!(
            column,
            ArrayColumn::List(vec![
                "mobile".to_string(),
                "desktop".to_string(),
                "3".to_string()
            ])
        );
    }

    #[test]
    fn both_shapes_normalize_to_the_same_list() {
        let literal = ArrayColumn::from_text("{mobile,desktop}").into_list();
        let list = ArrayColumn::from_text(r#"["mobile","desktop"]"#).into_list();
        assert_eq!(literal, list);
    }
}
