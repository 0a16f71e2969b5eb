use serde_json::Value;

/// Pretty JSON on a terminal, one compact line when piped into another tool.
pub fn print_json(value: &Value) {
    match render(value, atty::is(atty::Stream::Stdout)) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}

fn render(value: &Value, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compact_when_piped() {
        let v = json!({"result": {"tax_amount": "8507.50"}});
        assert_eq!(render(&v, false).unwrap(), r#"{"result":{"tax_amount":"8507.50"}}"#);
        assert!(render(&v, true).unwrap().contains('\n'));
    }
}
