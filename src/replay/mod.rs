//! Replay Module
//!
//! Drives a tiered cache from newline-delimited commands and writes one JSON
//! object per command. This is the binary's only interface.

mod command;
mod models;

use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::tiered::TieredCache;

pub use command::Command;
pub use models::{Response, StatsReport};

/// Applies replay commands to a tiered cache.
pub struct Replayer<'a> {
    cache: &'a TieredCache<String, String>,
}

impl<'a> Replayer<'a> {
    pub fn new(cache: &'a TieredCache<String, String>) -> Self {
        Self { cache }
    }

    /// Executes one command against the cache.
    pub fn execute(&self, command: Command) -> Response {
        match command {
            Command::Get { key } => {
                let value = self.cache.get(&key);
                Response::Get {
                    found: value.is_some(),
                    key,
                    value,
                }
            }
            Command::Put { key, value } => {
                let evicted = self.cache.put(key.clone(), value);
                Response::Put { key, evicted }
            }
            Command::Remove { key } => Response::Remove {
                removed: self.cache.remove(&key),
                key,
            },
            Command::Contains { key } => Response::Contains {
                found: self.cache.contains(&key),
                key,
            },
            Command::Tier { key } => Response::Tier {
                tier: self.cache.tier_of(&key),
                key,
            },
            Command::Stats => self.stats(),
        }
    }

    /// Current statistics as a response line.
    pub fn stats(&self) -> Response {
        Response::Stats(self.cache.stats().into())
    }

    /// Replays every line of `input`, writing responses to `output`.
    ///
    /// Malformed lines produce an error response and do not stop the replay.
    /// Returns the number of commands processed.
    pub fn run<R: BufRead, W: Write>(&self, input: R, output: &mut W) -> io::Result<usize> {
        let mut processed = 0;

        for (lineno, line) in input.lines().enumerate() {
            let line = line?;
            if Command::is_skippable(&line) {
                continue;
            }

            let response = match line.parse::<Command>() {
                Ok(command) => self.execute(command),
                Err(err) => {
                    debug!(line = lineno + 1, "rejected replay line: {}", err);
                    Response::error(err)
                }
            };
            write_line(output, &response)?;
            processed += 1;
        }

        output.flush()?;
        Ok(processed)
    }
}

/// Writes one response as a JSON line.
pub fn write_line<W: Write>(output: &mut W, response: &Response) -> io::Result<()> {
    serde_json::to_writer(&mut *output, response)?;
    writeln!(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::PolicyKind;
    use serde_json::Value;
    use std::io::Cursor;

    fn replay(cache: &TieredCache<String, String>, script: &str) -> Vec<Value> {
        let mut output = Vec::new();
        Replayer::new(cache)
            .run(Cursor::new(script), &mut output)
            .unwrap();

        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_replay_promotion_script() {
        let cache = TieredCache::with_levels(2, 2, PolicyKind::Recency).unwrap();
        let lines = replay(
            &cache,
            "# promotion\nput x v\ntier x\n\nget x\ntier x\ncontains x\nremove x\nget x\n",
        );

        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0]["op"], "put");
        assert_eq!(lines[1]["tier"], 1);
        assert_eq!(lines[2]["value"], "v");
        assert_eq!(lines[3]["tier"], 0);
        assert_eq!(lines[4]["found"], true);
        assert_eq!(lines[5]["removed"], true);
        assert_eq!(lines[6]["found"], false);
    }

    #[test]
    fn test_replay_reports_evictions() {
        let cache = TieredCache::with_levels(1, 1, PolicyKind::Recency).unwrap();
        let lines = replay(&cache, "put a 1\nput b 2\n");

        assert_eq!(lines[0]["evicted"], serde_json::json!([]));
        assert_eq!(lines[1]["evicted"], serde_json::json!(["a"]));
    }

    #[test]
    fn test_replay_bad_line_continues() {
        let cache = TieredCache::with_levels(1, 4, PolicyKind::Frequency).unwrap();
        let lines = replay(&cache, "frob\nput a 1\nstats\n");

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["op"], "error");
        assert!(lines[0]["error"].as_str().unwrap().contains("frob"));
        assert_eq!(lines[2]["op"], "stats");
        assert_eq!(lines[2]["total_entries"], 1);
    }
}
