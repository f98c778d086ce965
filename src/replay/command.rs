//! Replay Commands
//!
//! Parses one line of replay input into a cache operation.

use std::str::FromStr;

use crate::error::CacheError;

/// A single replay instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `get <key>`
    Get { key: String },
    /// `put <key> <value>`; the value is the rest of the line
    Put { key: String, value: String },
    /// `remove <key>`
    Remove { key: String },
    /// `contains <key>`
    Contains { key: String },
    /// `tier <key>`
    Tier { key: String },
    /// `stats`
    Stats,
}

impl Command {
    /// Whether a raw line carries no command (blank or `#` comment).
    pub fn is_skippable(line: &str) -> bool {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    }
}

impl FromStr for Command {
    type Err = CacheError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (op, rest) = match line.split_once(char::is_whitespace) {
            Some((op, rest)) => (op, rest.trim()),
            None => (line, ""),
        };

        match op.to_ascii_lowercase().as_str() {
            "get" => Ok(Command::Get {
                key: single_key(op, rest)?,
            }),
            "put" | "set" => {
                let (key, value) = rest.split_once(char::is_whitespace).ok_or_else(|| {
                    CacheError::InvalidCommand(format!("'{op}' expects a key and a value"))
                })?;
                Ok(Command::Put {
                    key: key.to_string(),
                    value: value.trim().to_string(),
                })
            }
            "remove" | "del" => Ok(Command::Remove {
                key: single_key(op, rest)?,
            }),
            "contains" => Ok(Command::Contains {
                key: single_key(op, rest)?,
            }),
            "tier" => Ok(Command::Tier {
                key: single_key(op, rest)?,
            }),
            "stats" if rest.is_empty() => Ok(Command::Stats),
            "stats" => Err(CacheError::InvalidCommand(
                "'stats' takes no arguments".to_string(),
            )),
            "" => Err(CacheError::InvalidCommand("empty command".to_string())),
            other => Err(CacheError::InvalidCommand(format!("unknown operation '{other}'"))),
        }
    }
}

fn single_key(op: &str, rest: &str) -> Result<String, CacheError> {
    if rest.is_empty() || rest.contains(char::is_whitespace) {
        return Err(CacheError::InvalidCommand(format!(
            "'{op}' expects exactly one key"
        )));
    }
    Ok(rest.to_string())
}
