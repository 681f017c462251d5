mod commands;
mod cursor;
mod registry;

use cursor::Cursor;

use crate::command::Command;
use crate::{DeltaError, Result};

/// Parses a control script into its command sequence.
///
/// Fails fast on the first malformed or unsupported command, naming the
/// offending command text.
pub fn parse_script(script: &str) -> Result<Vec<Command>> {
    let mut cursor = Cursor::new(script);
    let mut result = Vec::new();
    while !cursor.is_eof() {
        let start = cursor.offset();
        if !cursor.eat('.') {
            return Err(DeltaError::parse(format!(
                "expected a control command at `{}`",
                cursor.current_line()
            )));
        }
        result.push(registry::dispatch(&mut cursor, start)?);
    }
    Ok(result)
}
