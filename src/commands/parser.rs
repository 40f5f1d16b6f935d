//! Config Command Parser
//!
//! Splits on `;`, then each segment on its first `:`. Nothing is trimmed: a
//! key or value is exactly what the peer sent. Segments without `:` and
//! unknown keys are skipped, never an error.

use defmt::{debug, warn};

use super::{Command, Directive, DirectiveKey};

/// Parse a config write into an ordered command
pub fn parse(input: &str) -> Command<'_> {
    let mut command = Command::default();

    if input.is_empty() {
        return command;
    }

    for segment in input.split(';') {
        let Some((token, value)) = segment.split_once(':') else {
            // Empty trailing segments after the final ';' are not worth counting
            if !segment.is_empty() {
                command.ignored += 1;
            }
            continue;
        };

        let Some(key) = DirectiveKey::from_token(token) else {
            debug!("CONFIG: Ignoring unknown key {=str}", token);
            command.ignored += 1;
            continue;
        };

        if command.directives.push(Directive { key, value }).is_err() {
            command.overflow += 1;
        }
    }

    if command.overflow > 0 {
        warn!("CONFIG: Command full, dropped {} directives", command.overflow);
    }

    command
}

/// Parse a raw config write. Non UTF-8 input yields `None`.
pub fn parse_bytes(input: &[u8]) -> Option<Command<'_>> {
    match ::core::str::from_utf8(input) {
        Ok(text) => Some(parse(text)),
        Err(_) => {
            warn!("CONFIG: Dropping config write that is not UTF-8 ({} bytes)", input.len());
            None
        }
    }
}
