use super::commands;
use super::cursor::Cursor;
use crate::command::Command;
use crate::{DeltaError, Result};

/// One supported command kind: the keyword head that selects it, a
/// declared priority (mirrored by `Command::priority`), and the factory
/// that parses the remainder.
///
/// An explicit table instead of attribute scanning: trivially testable,
/// and the whole supported surface is visible in one place.
pub(super) struct CommandParser {
    pub head: &'static [&'static str],
    #[allow(dead_code)]
    pub priority: i32,
    pub parse: fn(&mut Cursor<'_>) -> Result<Command>,
}

pub(super) static REGISTRY: &[CommandParser] = &[
    CommandParser {
        head: &["create-merge", "tables"],
        priority: 610,
        parse: commands::create_merge_tables,
    },
    CommandParser {
        head: &["create-merge", "table"],
        priority: 600,
        parse: commands::create_merge_table,
    },
    CommandParser {
        head: &["create", "tables"],
        priority: 610,
        parse: commands::create_tables,
    },
    CommandParser {
        head: &["create", "table"],
        priority: 600,
        parse: commands::create_table,
    },
    CommandParser {
        head: &["create-or-alter", "function"],
        priority: 900,
        parse: commands::create_function,
    },
    CommandParser {
        head: &["create", "function"],
        priority: 900,
        parse: commands::create_function,
    },
    CommandParser {
        head: &["drop", "table"],
        priority: 300,
        parse: commands::drop_table,
    },
    CommandParser {
        head: &["drop", "function"],
        priority: 100,
        parse: commands::drop_function,
    },
    CommandParser {
        head: &["alter", "table"],
        priority: 700,
        parse: commands::alter_table_policy,
    },
    CommandParser {
        head: &["alter", "database"],
        priority: 700,
        parse: commands::alter_database_policy,
    },
    CommandParser {
        head: &["delete", "table"],
        priority: 400,
        parse: commands::delete_table_policy,
    },
    CommandParser {
        head: &["delete", "database"],
        priority: 400,
        parse: commands::delete_database_policy,
    },
];

/// Dispatches the command starting at `start` (the position of the
/// leading `.`). Fails with UnsupportedCommand when no head matches.
pub(super) fn dispatch(cursor: &mut Cursor<'_>, start: usize) -> Result<Command> {
    let first = cursor.read_word().map_err(|err| {
        err.context(DeltaError::parse(format!(
            "in command `{}`",
            cursor.command_text(start)
        )))
    })?;

    let second = cursor.peek_word();
    let entry = REGISTRY
        .iter()
        .find(|entry| entry.head[0] == first && Some(entry.head[1]) == second)
        .ok_or_else(|| DeltaError::unsupported_command(cursor.command_text(start)))?;
    cursor.read_word().expect("peeked head keyword reads");

    (entry.parse)(cursor).map_err(|err| {
        if err.is_unsupported_command() {
            err
        } else {
            err.context(DeltaError::parse(format!(
                "in command `{}`",
                cursor.command_text(start)
            )))
        }
    })
}
