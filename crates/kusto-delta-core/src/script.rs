#[macro_use]
mod fmt;
use fmt::ToScript;

mod delim;
use delim::Comma;

mod statement;

use indexmap::IndexMap;

use crate::command::Command;
use crate::schema::EntityName;

/// Context information when emitting commands.
///
/// When `current_database_name` is set, database-scoped commands for that
/// database omit the explicit identifier in favor of current-database
/// syntax.
#[derive(Debug, Clone, Default)]
pub struct ScriptingContext {
    pub current_database_name: Option<EntityName>,
}

impl ScriptingContext {
    pub fn with_database(name: impl Into<EntityName>) -> Self {
        Self {
            current_database_name: Some(name.into()),
        }
    }
}

pub(crate) struct Formatter<'a> {
    /// Where to write the emitted script
    dst: &'a mut String,

    /// Database-qualification context, honored uniformly by commands
    context: &'a ScriptingContext,
}

/// Emits a single command.
pub(crate) fn emit(command: &Command, context: &ScriptingContext) -> String {
    let mut ret = String::new();
    let mut f = Formatter {
        dst: &mut ret,
        context,
    };
    ToScript::to_script(command, &mut f);
    ret
}

/// Serializes an ordered command list to a single script.
pub fn to_script(commands: &[Command], context: &ScriptingContext) -> String {
    commands
        .iter()
        .map(|command| emit(command, context))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Serializes an ordered command list to per-file scripts keyed by each
/// command's script path. Commands sharing a path merge into one file in
/// emission order.
pub fn to_script_files(
    commands: &[Command],
    context: &ScriptingContext,
) -> Vec<(String, String)> {
    let mut files: IndexMap<String, Vec<String>> = IndexMap::new();
    for command in commands {
        files
            .entry(command.script_path())
            .or_default()
            .push(emit(command, context));
    }
    files
        .into_iter()
        .map(|(path, scripts)| (format!("{path}.kql"), scripts.join("\n\n")))
        .collect()
}
