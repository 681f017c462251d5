mod alter_policy;
pub use alter_policy::AlterPolicy;

mod caching_policy;
pub use caching_policy::AlterCachingPolicy;

mod create_function;
pub use create_function::CreateFunction;

mod create_mapping;
pub use create_mapping::CreateMapping;

mod create_table;
pub use create_table::CreateTable;

mod create_tables;
pub use create_tables::{CreateTables, TableDef};

mod delete_policy;
pub use delete_policy::DeletePolicy;

mod drop_function;
pub use drop_function::DropFunction;

mod drop_mapping;
pub use drop_mapping::DropMapping;

mod drop_table;
pub use drop_table::DropTable;

use crate::schema::{EntityName, EntityType, QuotedText};
use crate::script::{self, ScriptingContext};

/// A parsed control command. One variant per supported command kind.
///
/// Commands are immutable values: the parser constructs them, the model
/// folds them, and the delta engine emits them.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AlterCachingPolicy(AlterCachingPolicy),
    AlterPolicy(AlterPolicy),
    CreateFunction(CreateFunction),
    CreateMapping(CreateMapping),
    CreateTable(CreateTable),
    CreateTables(CreateTables),
    DeletePolicy(DeletePolicy),
    DropFunction(DropFunction),
    DropMapping(DropMapping),
    DropTable(DropTable),
}

impl Command {
    /// Human-readable command name, e.g. `.create table`.
    pub fn friendly_name(&self) -> &'static str {
        match self {
            Command::AlterCachingPolicy(_) => ".alter policy caching",
            Command::AlterPolicy(_) => ".alter policy",
            Command::CreateFunction(_) => ".create-or-alter function",
            Command::CreateMapping(_) => ".create ingestion mapping",
            Command::CreateTable(cmd) if cmd.merge => ".create-merge table",
            Command::CreateTable(_) => ".create table",
            Command::CreateTables(cmd) if cmd.merge => ".create-merge tables",
            Command::CreateTables(_) => ".create tables",
            Command::DeletePolicy(_) => ".delete policy",
            Command::DropFunction(_) => ".drop function",
            Command::DropMapping(_) => ".drop ingestion mapping",
            Command::DropTable(_) => ".drop table",
        }
    }

    /// Stable tiebreaker for emission order across unrelated command kinds.
    /// Mirrors the priorities declared in the parser registry.
    pub fn priority(&self) -> i32 {
        match self {
            Command::DropFunction(_) => 100,
            Command::DropMapping(_) => 200,
            Command::DropTable(_) => 300,
            Command::DeletePolicy(_) => 400,
            Command::CreateTable(_) => 600,
            Command::CreateTables(_) => 610,
            Command::AlterCachingPolicy(_) => 700,
            Command::AlterPolicy(_) => 710,
            Command::CreateMapping(_) => 800,
            Command::CreateFunction(_) => 900,
        }
    }

    /// Lexicographic key used to group and order emitted commands of the
    /// same kind.
    pub fn sort_index(&self) -> String {
        match self {
            Command::AlterCachingPolicy(cmd) => policy_sort_index(&cmd.entity, "caching"),
            Command::AlterPolicy(cmd) => policy_sort_index(&cmd.entity, cmd.kind.keyword()),
            Command::CreateFunction(cmd) => cmd.name.as_str().to_string(),
            Command::CreateMapping(cmd) => {
                format!("{}/{}/{}", cmd.table, cmd.kind.keyword(), cmd.name)
            }
            Command::CreateTable(cmd) => cmd.name.as_str().to_string(),
            Command::CreateTables(cmd) => cmd
                .tables
                .first()
                .map(|def| def.name.as_str().to_string())
                .unwrap_or_default(),
            Command::DeletePolicy(cmd) => policy_sort_index(&cmd.entity, cmd.kind.keyword()),
            Command::DropFunction(cmd) => cmd.name.as_str().to_string(),
            Command::DropMapping(cmd) => {
                format!("{}/{}/{}", cmd.table, cmd.kind.keyword(), cmd.name)
            }
            Command::DropTable(cmd) => cmd.name.as_str().to_string(),
        }
    }

    /// Suggested file path when writing the delta to a multi-file output.
    ///
    /// Derived from one canonical scheme over (family, entity type, folder,
    /// name) so that paths stay deterministic and collision-free.
    pub fn script_path(&self) -> String {
        match self {
            Command::AlterCachingPolicy(cmd) => {
                policy_path(cmd.entity_type, "caching", "create", &cmd.entity)
            }
            Command::AlterPolicy(cmd) => {
                policy_path(cmd.entity_type, cmd.kind.path_segment(), "create", &cmd.entity)
            }
            Command::CreateFunction(cmd) => {
                entity_path("functions/create", cmd.folder.as_ref(), cmd.name.as_str())
            }
            Command::CreateMapping(cmd) => {
                format!(
                    "tables/ingestion-mappings/create/{}",
                    sanitize(cmd.table.as_str())
                )
            }
            Command::CreateTable(cmd) => {
                entity_path("tables/create", cmd.folder.as_ref(), cmd.name.as_str())
            }
            Command::CreateTables(cmd) => {
                let joined = cmd
                    .tables
                    .iter()
                    .map(|def| def.name.as_str())
                    .collect::<Vec<_>>()
                    .join("_");
                entity_path("tables/create", cmd.folder.as_ref(), &joined)
            }
            Command::DeletePolicy(cmd) => {
                policy_path(cmd.entity_type, cmd.kind.path_segment(), "delete", &cmd.entity)
            }
            Command::DropFunction(cmd) => format!("functions/drop/{}", sanitize(cmd.name.as_str())),
            Command::DropMapping(cmd) => {
                format!(
                    "tables/ingestion-mappings/drop/{}",
                    sanitize(cmd.table.as_str())
                )
            }
            Command::DropTable(cmd) => format!("tables/drop/{}", sanitize(cmd.name.as_str())),
        }
    }

    /// Emits the command as a valid control command.
    pub fn to_script(&self, context: &ScriptingContext) -> String {
        script::emit(self, context)
    }
}

fn policy_sort_index(entity: &EntityName, keyword: &str) -> String {
    format!("{}/{}", entity, keyword)
}

fn entity_path(prefix: &str, folder: Option<&QuotedText>, name: &str) -> String {
    match folder {
        Some(folder) if !folder.is_empty() => {
            format!("{}/{}/{}", prefix, sanitize(folder.as_str()), sanitize(name))
        }
        _ => format!("{}/{}", prefix, sanitize(name)),
    }
}

fn policy_path(entity_type: EntityType, segment: &str, action: &str, entity: &EntityName) -> String {
    match entity_type {
        EntityType::Table => format!(
            "tables/policies/{}/{}/{}",
            segment,
            action,
            sanitize(entity.as_str())
        ),
        EntityType::Database => format!("databases/policies/{}/{}", segment, action),
    }
}

// Entity names may contain path separators; keep paths flat per entity.
fn sanitize(segment: &str) -> String {
    segment.replace(['/', '\\'], "_")
}
