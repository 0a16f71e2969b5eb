pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Command input from `--input <file.json>`, else from piped stdin.
/// `Ok(None)` means neither was given and the caller falls back to flags.
pub fn read_input<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(Some(file::read_json(path)?));
    }
    if let Some(data) = stdin::read_stdin()? {
        return Ok(Some(serde_json::from_value(data)?));
    }
    Ok(None)
}
