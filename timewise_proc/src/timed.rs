// SPDX-License-Identifier: MIT OR Apache-2.0
use proc_macro::{Delimiter, TokenStream, TokenTree};
use std::collections::VecDeque;

/// Implementation of the `#[timed]` attribute macro.
///
/// Parses the attribute's `key = value` pairs into `TimerConfig` builder
/// calls, then wraps the function body with a guard created by
/// `timewise::hidden::timed_begin`.
pub fn timed_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    let builder_calls = match parse_builder_calls(attr) {
        Ok(calls) => calls,
        Err(msg) => {
            return format!("compile_error!({msg:?});").parse().unwrap();
        }
    };

    let mut tokens: Vec<TokenTree> = item.into_iter().collect();

    // Find the function name and body. The body is the last top-level brace
    // group; the name is the ident following `fn`.
    let mut fn_name: Option<String> = None;
    let mut body_idx: Option<usize> = None;
    for (i, token) in tokens.iter().enumerate() {
        match token {
            TokenTree::Ident(ident) if ident.to_string() == "fn" && fn_name.is_none() => {
                if let Some(TokenTree::Ident(name)) = tokens.get(i + 1) {
                    fn_name = Some(name.to_string());
                }
            }
            TokenTree::Group(g) if g.delimiter() == Delimiter::Brace => {
                body_idx = Some(i);
            }
            _ => {}
        }
    }

    let fn_name = match fn_name {
        Some(name) => name,
        None => {
            return "compile_error!(\"#[timed] can only be applied to functions\");"
                .parse()
                .unwrap();
        }
    };
    let body_idx = match body_idx {
        Some(idx) => idx,
        None => {
            return "compile_error!(\"#[timed] requires a function with a body\");"
                .parse()
                .unwrap();
        }
    };

    let original_body = match &tokens[body_idx] {
        TokenTree::Group(g) => g.stream(),
        _ => unreachable!(),
    };

    let new_body_src = format!(
        r#"{{
            let __timewise_guard = ::timewise::hidden::timed_begin(
                ::timewise::TimerConfig::new(){builder_calls},
                ::timewise::CallSite {{
                    file: file!(),
                    line: line!(),
                    module: module_path!(),
                    name: "{fn_name}",
                }},
            );
            {{ {original_body} }}
        }}"#
    );

    let new_body: TokenStream = new_body_src.parse().unwrap();
    tokens[body_idx] = new_body.into_iter().next().unwrap();
    tokens.into_iter().collect()
}

/// Turns `key = value, …` attribute arguments into a chain of builder calls.
///
/// Returns an error message (for `compile_error!`) on unknown keys or
/// unrecognized `level`/`output` strings.
fn parse_builder_calls(attr: TokenStream) -> Result<String, String> {
    let mut input: VecDeque<TokenTree> = attr.into_iter().collect();
    let mut calls = String::new();
    while !input.is_empty() {
        let key = parse_key(&mut input)
            .ok_or_else(|| "expected `key = value` in #[timed(...)]".to_string())?;
        let value = parse_value(&mut input);
        if value.is_empty() {
            return Err(format!("missing value for #[timed] key `{key}`"));
        }
        calls.push_str(&builder_call(&key, &value)?);
    }
    Ok(calls)
}

fn builder_call(key: &str, value: &str) -> Result<String, String> {
    match key {
        "level" => {
            let variant = match unquote(value)?.to_ascii_lowercase().as_str() {
                "debug" => "Debug",
                "info" => "Info",
                "warning" => "Warning",
                "error" => "Error",
                "critical" => "Critical",
                other => return Err(format!("unrecognized level {other:?} in #[timed]")),
            };
            Ok(format!(".level(::timewise::Level::{variant})"))
        }
        "output" => {
            let variant = match unquote(value)?.to_ascii_lowercase().as_str() {
                "file" => "File",
                "console" => "Console",
                "both" => "Both",
                "none" => "None",
                other => return Err(format!("unrecognized output mode {other:?} in #[timed]")),
            };
            Ok(format!(".output(::timewise::OutputMode::{variant})"))
        }
        // `name` mirrors the original decorator argument; it sets the
        // explicit channel identity.
        "name" => Ok(format!(".logger_name({value})")),
        "enabled" | "log_dir" | "log_file" | "extra" | "template" | "datefmt" | "rotate"
        | "max_bytes" | "backup_count" => Ok(format!(".{key}({value})")),
        other => Err(format!("unknown #[timed] key `{other}`")),
    }
}

/// Strips the surrounding quotes from a string literal value.
fn unquote(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        Ok(trimmed[1..trimmed.len() - 1].to_string())
    } else {
        Err(format!("expected a string literal, got `{value}`"))
    }
}

/// Consumes tokens up to and including '=' and returns the key.
fn parse_key(input: &mut VecDeque<TokenTree>) -> Option<String> {
    let mut key = String::new();
    loop {
        match input.pop_front() {
            Some(TokenTree::Punct(p)) if p.as_char() == '=' => {
                return Some(key);
            }
            Some(TokenTree::Ident(i)) => {
                key.push_str(&i.to_string());
            }
            _ => {
                return None;
            }
        }
    }
}

/// Consumes tokens up to a top-level ',' (or end of stream) and returns the
/// value expression verbatim.
fn parse_value(input: &mut VecDeque<TokenTree>) -> String {
    let mut value = String::new();
    loop {
        match input.pop_front() {
            Some(TokenTree::Punct(p)) => {
                if p.as_char() == ',' {
                    return value;
                }
                value.push(p.as_char());
            }
            Some(token) => {
                // Idents and literals need a separator to survive reparsing
                // (`x as u64`); puncts stay glued so `::` and `..` do too.
                value.push_str(&token.to_string());
                value.push(' ');
            }
            None => {
                return value;
            }
        }
    }
}
