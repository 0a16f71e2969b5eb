use serde_json::Value;
use std::io::{self, Read};

/// JSON piped on stdin, or `None` when stdin is a terminal or empty.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }
    parse_piped(io::stdin().lock())
}

fn parse_piped<R: Read>(mut reader: R) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let mut buffer = String::new();
    reader.read_to_string(&mut buffer)?;

    let payload = buffer.trim();
    if payload.is_empty() {
        return Ok(None);
    }

    serde_json::from_str(payload).map(Some).map_err(|e| {
        format!(
            "stdin is not valid JSON (line {}, column {}): {e}",
            e.line(),
            e.column()
        )
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_blank_input_is_none() {
        assert!(parse_piped(Cursor::new("  \n")).unwrap().is_none());
    }

    #[test]
    fn test_piped_payload_is_parsed() {
        let value = parse_piped(Cursor::new(r#"{"gross_income": 75000}"#))
            .unwrap()
            .unwrap();
        assert_eq!(value["gross_income"], 75000);
    }

    #[test]
    fn test_malformed_payload_reports_position() {
        let err = parse_piped(Cursor::new("{\"principal\": }")).unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }
}
