//! Output formatting utilities.

use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use crate::config::OutputFormat;

/// Prints a success message.
pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Prints an error message.
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Prints a warning message.
pub fn warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message);
}

/// Prints an info message.
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Outputs a list.
///
/// Tables use the display rows; JSON and YAML use the full records.
pub fn output<R: Tabled, T: serde::Serialize>(
    rows: &[R],
    data: &[T],
    empty_message: &str,
    format: OutputFormat,
) -> crate::CliResult<()> {
    match format {
        OutputFormat::Table => {
            if rows.is_empty() {
                info(empty_message);
            } else {
                let table = Table::new(rows).with(Style::rounded()).to_string();
                println!("{table}");
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(data)?;
            println!("{json}");
        }
        OutputFormat::Yaml => {
            for item in data {
                let json = serde_json::to_value(item)?;
                print!("{}", yaml_string(&json));
                println!();
            }
        }
        OutputFormat::Quiet => {}
    }
    Ok(())
}

/// Outputs a single item.
pub fn output_single<T: serde::Serialize>(item: &T, format: OutputFormat) -> crate::CliResult<()> {
    match format {
        OutputFormat::Table | OutputFormat::Yaml => {
            let json = serde_json::to_value(item)?;
            print!("{}", yaml_string(&json));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(item)?;
            println!("{json}");
        }
        OutputFormat::Quiet => {}
    }
    Ok(())
}

/// Renders a JSON value as YAML-like text.
#[must_use]
pub fn yaml_string(value: &serde_json::Value) -> String {
    let mut out = String::new();
    write_yaml_value(&mut out, value, 0);
    out
}

fn write_yaml_value(out: &mut String, value: &serde_json::Value, indent: usize) {
    let prefix = "  ".repeat(indent);

    match value {
        serde_json::Value::Array(arr) => {
            for item in arr {
                out.push_str(&format!("{prefix}- "));
                if item.is_object() || item.is_array() {
                    out.push('\n');
                    write_yaml_value(out, item, indent + 1);
                } else {
                    out.push_str(&format!("{}\n", scalar(item)));
                }
            }
        }
        serde_json::Value::Object(map) => {
            for (key, val) in map {
                if val.is_object() || val.is_array() {
                    out.push_str(&format!("{prefix}{key}:\n"));
                    write_yaml_value(out, val, indent + 1);
                } else {
                    out.push_str(&format!("{prefix}{key}: {}\n", scalar(val)));
                }
            }
        }
        scalar_value => out.push_str(&format!("{prefix}{}\n", scalar(scalar_value))),
    }
}

fn scalar(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Prompts for confirmation.
pub fn confirm(message: &str) -> crate::CliResult<bool> {
    print!("{message} [y/N]: ");
    std::io::Write::flush(&mut std::io::stdout())?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    Ok(input.trim().eq_ignore_ascii_case("y") || input.trim().eq_ignore_ascii_case("yes"))
}

/// Prompts for a line of input, returning `default` when left empty.
pub fn prompt(label: &str, default: &str) -> crate::CliResult<String> {
    print!("{label} [{default}]: ");
    std::io::Write::flush(&mut std::io::stdout())?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    let trimmed = input.trim();
    Ok(if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    })
}

/// Prompts for password input (hidden).
pub fn prompt_password(prompt: &str) -> crate::CliResult<String> {
    Ok(rpassword::prompt_password(prompt)?)
}
