//! Line-oriented, JSON-like text codec for [`Config`].
//!
//! Accepted input is deliberately loose: one `"key": value` pair per line,
//! `#` and `//` comment lines, bare braces and trailing commas are skipped,
//! as is an object brace sharing a line with the first or last pair.
//! Nested object literals are not part of the format; sections have to be
//! populated programmatically.

use super::{Config, ConfigValue, value::escape};
use crate::{Error, Result};

pub(super) fn parse(source: &str) -> Result<Config> {
    let mut config = Config::new();

    for (idx, raw_line) in source.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
            continue;
        }

        let structural = line.trim_end_matches(',').trim();
        if matches!(structural, "{" | "}" | "[" | "]") {
            continue;
        }

        // An object brace may share a line with the first or last pair
        let line = line.strip_prefix('{').map_or(line, str::trim_start);

        let Some((key, rest)) = split_key(line, line_no)? else {
            continue;
        };

        let value = rest.trim();
        let value = value.strip_suffix(',').unwrap_or(value).trim_end();
        let value = value.strip_suffix('}').unwrap_or(value).trim_end();
        let value = value.strip_suffix(',').unwrap_or(value).trim();

        if value.starts_with('{') || value == "[" {
            tracing::debug!(key = %key, line = line_no, "skipping nested literal in config text");
            continue;
        }

        config.set(key, parse_value(value, line_no)?);
    }

    Ok(config)
}

/// Splits `"key": value` at the colon that ends the key.
///
/// Returns `None` for lines that carry no key/value pair.
fn split_key(line: &str, line_no: usize) -> Result<Option<(String, &str)>> {
    if let Some(quoted) = line.strip_prefix('"') {
        let (key, consumed) = read_quoted(quoted).ok_or_else(|| Error::ConfigParse {
            line: line_no,
            message: "unterminated quoted key".to_string(),
        })?;
        let after = quoted[consumed..].trim_start();
        return match after.strip_prefix(':') {
            Some(rest) if !key.is_empty() => Ok(Some((key, rest))),
            Some(_) => Err(Error::ConfigParse {
                line: line_no,
                message: "empty key".to_string(),
            }),
            None => Ok(None),
        };
    }

    match line.split_once(':') {
        Some((key, rest)) => {
            let key = key.trim();
            if key.is_empty() {
                return Err(Error::ConfigParse {
                    line: line_no,
                    message: "empty key".to_string(),
                });
            }
            Ok(Some((key.to_string(), rest)))
        }
        None => Ok(None),
    }
}

/// Reads a quoted body (opening quote already stripped) up to the closing
/// quote. Returns the unescaped text and the number of bytes consumed,
/// including the closing quote.
fn read_quoted(body: &str) -> Option<(String, usize)> {
    let mut out = String::new();
    let mut chars = body.char_indices();
    while let Some((idx, c)) = chars.next() {
        match c {
            '"' => return Some((out, idx + 1)),
            '\\' => match chars.next()? {
                (_, 'n') => out.push('\n'),
                (_, 't') => out.push('\t'),
                (_, other) => out.push(other),
            },
            other => out.push(other),
        }
    }
    None
}

fn parse_value(value: &str, line_no: usize) -> Result<ConfigValue> {
    if let Some(body) = value.strip_prefix('"') {
        let (text, consumed) = read_quoted(body).ok_or_else(|| Error::ConfigParse {
            line: line_no,
            message: format!("unterminated string value {value}"),
        })?;
        if !body[consumed..].trim().is_empty() {
            return Err(Error::ConfigParse {
                line: line_no,
                message: format!("unexpected text after string value {value}"),
            });
        }
        return Ok(ConfigValue::Str(text));
    }

    match value {
        "true" => return Ok(ConfigValue::Bool(true)),
        "false" => return Ok(ConfigValue::Bool(false)),
        _ => {}
    }

    if value.contains(['.', 'e', 'E']) {
        if let Ok(real) = value.parse::<f64>() {
            return Ok(ConfigValue::Real(real));
        }
    } else if let Ok(int) = value.parse::<i64>() {
        return Ok(ConfigValue::Int(int));
    }

    Ok(ConfigValue::Str(value.to_string()))
}

pub(super) fn write(config: &Config) -> String {
    let mut out = String::from("{\n");
    let lines: Vec<String> = config
        .iter()
        .map(|(key, value)| format!("  \"{}\": {value}", escape(key)))
        .collect();
    out.push_str(&lines.join(",\n"));
    if !lines.is_empty() {
        out.push('\n');
    }
    out.push_str("}\n");
    out
}
