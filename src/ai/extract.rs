use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("no JSON {0} found in model output")]
    NotFound(&'static str),
    #[error("model output is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unexpected response structure: {0}")]
    Shape(&'static str),
}

/// Parse the widest `{ ... }` span of `text` (first `{` to last `}`).
pub fn extract_object(text: &str) -> Result<Value, FormatError> {
    let span = greedy_span(text, '{', '}').ok_or(FormatError::NotFound("object"))?;
    let value: Value = serde_json::from_str(span)?;
    if !value.is_object() {
        return Err(FormatError::Shape("expected an object"));
    }
    Ok(value)
}

/// Parse the widest `[ ... ]` span of `text` (first `[` to last `]`).
pub fn extract_array(text: &str) -> Result<Vec<Value>, FormatError> {
    let span = greedy_span(text, '[', ']').ok_or(FormatError::NotFound("array"))?;
    match serde_json::from_str(span)? {
        Value::Array(items) => Ok(items),
        _ => Err(FormatError::Shape("expected an array")),
    }
}

fn greedy_span(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_is_found_inside_prose_and_fences() {
        let text = "Sure! Here it is:\n```json\n{\"confidence\": 0.9, \"suggestions\": []}\n```\nEnjoy.";
        let value = extract_object(text).unwrap();
        assert_eq!(value["confidence"], 0.9);
    }

    #[test]
    fn object_span_is_greedy() {
        let text = r#"{"a": {"b": 1}} trailing {"c": 2}"#;
        // first '{' to last '}' is not one document
        assert!(matches!(extract_object(text), Err(FormatError::Json(_))));
    }

    #[test]
    fn missing_braces_is_not_found() {
        assert!(matches!(
            extract_object("I cannot help with that"),
            Err(FormatError::NotFound("object"))
        ));
        assert!(matches!(
            extract_array("nothing here"),
            Err(FormatError::NotFound("array"))
        ));
    }

    #[test]
    fn array_is_extracted() {
        let items = extract_array("results: [{\"name\": \"Apple\"}, {\"name\": \"Pear\"}]").unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1]["name"], "Pear");
    }

    #[test]
    fn reversed_brackets_are_not_a_span() {
        assert!(extract_array("] oops [").is_err());
    }
}
