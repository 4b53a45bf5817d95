/// Parsing of shell lines into heap commands
use semispace::{ObjectType, Path};

use crate::error::{err_command, RuntimeError};

/// Right hand side of an assignment
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Allocate a fresh object
    New(ObjectType),
    Nil,
    /// Read whatever a path currently points at
    Path(Path),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Print,
    Debug,
    Collect,
    Assign { target: Path, value: Value },
}

/// Parse one line of input. Spaces are insignificant. Blank lines and
/// `#` comments parse to `None`.
pub fn parse(line: &str) -> Result<Option<Command>, RuntimeError> {
    let line: String = line.chars().filter(|c| *c != ' ').collect();
    let line = line.trim_end_matches(|c: char| c == '\r' || c == '\n');

    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let command = match line {
        "PRINT" => Command::Print,
        "DEBUG" => Command::Debug,
        "COLLECT" => Command::Collect,

        _ => {
            let (lhs, rhs) = match line.find('=') {
                Some(pos) => (&line[..pos], &line[pos + 1..]),
                None => return Err(err_command(line)),
            };

            let value = match rhs {
                "NULL" => Value::Nil,
                _ => match rhs.parse::<ObjectType>() {
                    Ok(object_type) => Value::New(object_type),
                    Err(_) => Value::Path(rhs.parse()?),
                },
            };

            Command::Assign {
                target: lhs.parse()?,
                value,
            }
        }
    };

    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use semispace::HeapError;

    fn path(s: &str) -> Path {
        s.parse().unwrap()
    }

    #[test]
    fn parse_keywords() {
        assert_eq!(parse("PRINT").unwrap(), Some(Command::Print));
        assert_eq!(parse(" DEBUG ").unwrap(), Some(Command::Debug));
        assert_eq!(parse("COLLECT\n").unwrap(), Some(Command::Collect));
    }

    #[test]
    fn parse_skips() {
        assert_eq!(parse("").unwrap(), None);
        assert_eq!(parse("   ").unwrap(), None);
        assert_eq!(parse("# x = Alpha").unwrap(), None);
        assert_eq!(parse("  # indented").unwrap(), None);
    }

    #[test]
    fn parse_new() {
        assert_eq!(
            parse("x = Alpha").unwrap(),
            Some(Command::Assign {
                target: path("x"),
                value: Value::New(ObjectType::Alpha),
            })
        );
        assert_eq!(
            parse("x.c=Gamma").unwrap(),
            Some(Command::Assign {
                target: path("x.c"),
                value: Value::New(ObjectType::Gamma),
            })
        );
    }

    #[test]
    fn parse_nil_and_paths() {
        assert_eq!(
            parse("x.c.f = NULL").unwrap(),
            Some(Command::Assign {
                target: path("x.c.f"),
                value: Value::Nil,
            })
        );
        assert_eq!(
            parse("y = x . c").unwrap(),
            Some(Command::Assign {
                target: path("y"),
                value: Value::Path(path("x.c")),
            })
        );
    }

    #[test]
    fn parse_bad_command() {
        let err = parse("what is this").unwrap_err();
        assert_eq!(
            err.error_kind(),
            &ErrorKind::CommandError(String::from("whatisthis"))
        );
    }

    #[test]
    fn parse_empty_sides() {
        let err = parse("=Alpha").unwrap_err();
        assert_eq!(err.error_kind(), &ErrorKind::HeapError(HeapError::EmptyPath));

        let err = parse("x=").unwrap_err();
        assert_eq!(err.error_kind(), &ErrorKind::HeapError(HeapError::EmptyPath));
    }
}
