// src/report/template.rs
use crate::utils::error::TemplateError;
use regex::Captures;

const PLACEHOLDER_PREFIX: &str = "extracted_text_";

/// Fills `{extracted_text_N}` placeholders from the capture groups of `caps`
/// (group N, counted from 1). `{{` and `}}` are literal braces.
///
/// A placeholder naming anything else, a group the pattern does not have, or a
/// group that did not take part in the match is an error.
pub fn fill(template: &str, caps: &Captures) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(ch) => name.push(ch),
                        None => return Err(TemplateError::Unclosed),
                    }
                }
                out.push_str(lookup(&name, caps)?);
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '}' => return Err(TemplateError::StrayBrace),
            other => out.push(other),
        }
    }

    Ok(out)
}

fn lookup<'t>(name: &str, caps: &Captures<'t>) -> Result<&'t str, TemplateError> {
    name.strip_prefix(PLACEHOLDER_PREFIX)
        .and_then(|index| index.parse::<usize>().ok())
        .filter(|index| *index >= 1)
        .and_then(|index| caps.get(index))
        .map(|m| m.as_str())
        .ok_or_else(|| TemplateError::Unavailable(name.to_string()))
}
