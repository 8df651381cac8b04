//! Parsing of the interactive command language

use crate::types::DataType;

/// What `print` should show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrintTarget {
    Mmu,
    Page,
    Processes,
    Variable { pid: u32, name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Create { text_size: u32, data_size: u32 },
    Allocate {
        pid: u32,
        name: String,
        kind: DataType,
        count: u32,
    },
    Set {
        pid: u32,
        name: String,
        offset: u32,
        values: Vec<String>,
    },
    Free { pid: u32, name: String },
    Terminate { pid: u32 },
    Print(PrintTarget),
    Exit,
}

impl Command {
    /// Parse one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let tokens = split_tokens(line);
        let Some(keyword) = tokens.first() else {
            return Ok(None);
        };
        let args = &tokens[1..];

        let command = match keyword.as_str() {
            "create" => {
                expect_args("create <text_size> <data_size>", args, 2)?;
                Command::Create {
                    text_size: parse_number(&args[0], "text size")?,
                    data_size: parse_number(&args[1], "data size")?,
                }
            }
            "allocate" => {
                expect_args("allocate <PID> <var_name> <data_type> <number_of_elements>", args, 4)?;
                Command::Allocate {
                    pid: parse_number(&args[0], "PID")?,
                    name: args[1].clone(),
                    kind: args[2].parse().map_err(|e| format!("{}", e))?,
                    count: parse_number(&args[3], "number of elements")?,
                }
            }
            "set" => {
                if args.len() < 4 {
                    return Err(
                        "usage: set <PID> <var_name> <offset> <value_0> ... <value_N>".to_string(),
                    );
                }
                Command::Set {
                    pid: parse_number(&args[0], "PID")?,
                    name: args[1].clone(),
                    offset: parse_number(&args[2], "offset")?,
                    values: args[3..].to_vec(),
                }
            }
            "free" => {
                expect_args("free <PID> <var_name>", args, 2)?;
                Command::Free {
                    pid: parse_number(&args[0], "PID")?,
                    name: args[1].clone(),
                }
            }
            "terminate" => {
                expect_args("terminate <PID>", args, 1)?;
                Command::Terminate {
                    pid: parse_number(&args[0], "PID")?,
                }
            }
            "print" => {
                expect_args("print <mmu|page|processes|PID:var_name>", args, 1)?;
                Command::Print(parse_print_target(&args[0])?)
            }
            "exit" => Command::Exit,
            other => return Err(format!("unknown command '{}'", other)),
        };
        Ok(Some(command))
    }
}

fn expect_args(usage: &str, args: &[String], count: usize) -> Result<(), String> {
    if args.len() != count {
        return Err(format!("usage: {}", usage));
    }
    Ok(())
}

fn parse_number(token: &str, what: &str) -> Result<u32, String> {
    token.parse().map_err(|_| format!("invalid {}: {}", what, token))
}

fn parse_print_target(token: &str) -> Result<PrintTarget, String> {
    match token {
        "mmu" => Ok(PrintTarget::Mmu),
        "page" => Ok(PrintTarget::Page),
        "processes" => Ok(PrintTarget::Processes),
        _ => {
            let (pid, name) = token
                .split_once(':')
                .ok_or_else(|| format!("invalid print target: {}", token))?;
            if name.is_empty() {
                return Err(format!("invalid print target: {}", token));
            }
            Ok(PrintTarget::Variable {
                pid: parse_number(pid, "PID")?,
                name: name.to_string(),
            })
        }
    }
}

/// Split on spaces, keeping double-quoted runs together as one token
pub fn split_tokens(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut token = String::new();
    let mut in_word = false;
    let mut in_string = false;

    for c in line.chars() {
        if in_string {
            if c == '"' {
                tokens.push(std::mem::take(&mut token));
                in_string = false;
            } else {
                token.push(c);
            }
        } else if c.is_whitespace() {
            if in_word {
                tokens.push(std::mem::take(&mut token));
                in_word = false;
            }
        } else if c == '"' && !in_word {
            in_string = true;
        } else {
            token.push(c);
            in_word = true;
        }
    }
    if in_word || in_string {
        tokens.push(token);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_tokens() {
        assert_eq!(
            split_tokens("  set 1024  msg 0 \"a b\" c"),
            vec!["set", "1024", "msg", "0", "a b", "c"]
        );
        assert_eq!(split_tokens("\"unterminated"), vec!["unterminated"]);
        assert!(split_tokens("   ").is_empty());
    }

    #[test]
    fn test_parse_create_and_allocate() {
        assert_eq!(
            Command::parse("create 5992 564"),
            Ok(Some(Command::Create {
                text_size: 5992,
                data_size: 564,
            }))
        );
        assert_eq!(
            Command::parse("allocate 1024 point double 3"),
            Ok(Some(Command::Allocate {
                pid: 1024,
                name: "point".to_string(),
                kind: DataType::Double,
                count: 3,
            }))
        );
    }

    #[test]
    fn test_parse_set_keeps_values_as_text() {
        assert_eq!(
            Command::parse("set 1024 name 0 \"J\" o e"),
            Ok(Some(Command::Set {
                pid: 1024,
                name: "name".to_string(),
                offset: 0,
                values: vec!["J".to_string(), "o".to_string(), "e".to_string()],
            }))
        );
        assert!(Command::parse("set 1024 name 0").is_err());
    }

    #[test]
    fn test_parse_print_targets() {
        assert_eq!(Command::parse("print mmu"), Ok(Some(Command::Print(PrintTarget::Mmu))));
        assert_eq!(Command::parse("print page"), Ok(Some(Command::Print(PrintTarget::Page))));
        assert_eq!(
            Command::parse("print 1025:counter"),
            Ok(Some(Command::Print(PrintTarget::Variable {
                pid: 1025,
                name: "counter".to_string(),
            })))
        );
        assert!(Command::parse("print 1025:").is_err());
        assert!(Command::parse("print stuff").is_err());
    }

    #[test]
    fn test_parse_errors() {
        assert!(Command::parse("allocate 1024 x bool 3").unwrap_err().contains("bool"));
        assert!(Command::parse("free 1024").is_err());
        assert!(Command::parse("terminate abc").unwrap_err().contains("PID"));
        assert!(Command::parse("jump 1").unwrap_err().contains("jump"));
        assert_eq!(Command::parse(""), Ok(None));
        assert_eq!(Command::parse("exit"), Ok(Some(Command::Exit)));
    }
}
