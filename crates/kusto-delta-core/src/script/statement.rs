use super::{Comma, Formatter, ToScript};

use crate::command::{
    AlterCachingPolicy, AlterPolicy, Command, CreateFunction, CreateMapping, CreateTable,
    CreateTables, DeletePolicy, DropFunction, DropMapping, DropTable, TableDef,
};
use crate::schema::{EntityName, EntityType, QuotedText};

/// A `table T` / `database D` reference. The database identifier is
/// omitted when the context names the same database.
struct EntityRef<'a> {
    entity_type: EntityType,
    entity: &'a EntityName,
}

impl ToScript for &EntityRef<'_> {
    fn to_script(self, f: &mut Formatter<'_>) {
        match self.entity_type {
            EntityType::Table => fmt!(f, "table ", self.entity),
            EntityType::Database => {
                let current = f.context.current_database_name.as_ref();
                if current == Some(self.entity) {
                    fmt!(f, "database");
                } else {
                    fmt!(f, "database ", self.entity);
                }
            }
        }
    }
}

/// The `with (name=value, ...)` clause; skipped entirely when empty.
#[derive(Default)]
struct WithClause {
    properties: Vec<(&'static str, String)>,
}

impl WithClause {
    fn folder_and_doc(folder: &Option<QuotedText>, doc_string: &Option<QuotedText>) -> Self {
        let mut clause = Self::default();
        if let Some(folder) = folder {
            clause.properties.push(("folder", folder.to_script()));
        }
        if let Some(doc_string) = doc_string {
            clause.properties.push(("docstring", doc_string.to_script()));
        }
        clause
    }
}

impl ToScript for &WithClause {
    fn to_script(self, f: &mut Formatter<'_>) {
        if self.properties.is_empty() {
            return;
        }
        let properties = Comma(
            self.properties
                .iter()
                .map(|(name, value)| (*name, "=", value.as_str())),
        );
        fmt!(f, " with (", properties, ")");
    }
}

impl ToScript for &TableDef {
    fn to_script(self, f: &mut Formatter<'_>) {
        let columns = Comma(&self.columns);
        fmt!(f, &self.name, " (", columns, ")");
    }
}

impl ToScript for &CreateTable {
    fn to_script(self, f: &mut Formatter<'_>) {
        let verb = if self.merge {
            ".create-merge table "
        } else {
            ".create table "
        };
        let columns = Comma(&self.columns);
        let with = WithClause::folder_and_doc(&self.folder, &self.doc_string);
        fmt!(f, verb, &self.name, " (", columns, ")", &with);
    }
}

impl ToScript for &CreateTables {
    fn to_script(self, f: &mut Formatter<'_>) {
        let verb = if self.merge {
            ".create-merge tables "
        } else {
            ".create tables "
        };
        let tables = Comma(&self.tables);
        let with = WithClause::folder_and_doc(&self.folder, &self.doc_string);
        fmt!(f, verb, tables, &with);
    }
}

impl ToScript for &DropTable {
    fn to_script(self, f: &mut Formatter<'_>) {
        fmt!(f, ".drop table ", &self.name);
    }
}

impl ToScript for &CreateFunction {
    fn to_script(self, f: &mut Formatter<'_>) {
        let with = WithClause::folder_and_doc(&self.folder, &self.doc_string);
        fmt!(
            f,
            ".create-or-alter function", &with, " ", &self.name,
            "(", self.parameters.as_str(), ") {\n", self.body.as_str(), "\n}"
        );
    }
}

impl ToScript for &DropFunction {
    fn to_script(self, f: &mut Formatter<'_>) {
        fmt!(f, ".drop function ", &self.name);
    }
}

impl ToScript for &CreateMapping {
    fn to_script(self, f: &mut Formatter<'_>) {
        fmt!(
            f,
            ".create table ", &self.table, " ingestion ", self.kind.keyword(), " mapping ",
            &self.name, " ", self.mapping.to_single_quoted()
        );
        if self.remove_oldest_if_required {
            fmt!(f, " with (removeOldestIfRequired=true)");
        }
    }
}

impl ToScript for &DropMapping {
    fn to_script(self, f: &mut Formatter<'_>) {
        fmt!(
            f,
            ".drop table ", &self.table, " ingestion ", self.kind.keyword(), " mapping ", &self.name
        );
    }
}

impl ToScript for &AlterCachingPolicy {
    fn to_script(self, f: &mut Formatter<'_>) {
        let entity = EntityRef {
            entity_type: self.entity_type,
            entity: &self.entity,
        };
        fmt!(f, ".alter ", &entity, " policy caching hot = ", &self.hot_data);
        for window in &self.hot_windows {
            fmt!(f, ", hot_window = ", window);
        }
    }
}

impl ToScript for &AlterPolicy {
    fn to_script(self, f: &mut Formatter<'_>) {
        let entity = EntityRef {
            entity_type: self.entity_type,
            entity: &self.entity,
        };
        fmt!(
            f,
            ".alter ", &entity, " policy ", self.kind.keyword(),
            "\n```\n", self.payload.to_json_text(), "\n```"
        );
    }
}

impl ToScript for &DeletePolicy {
    fn to_script(self, f: &mut Formatter<'_>) {
        let entity = EntityRef {
            entity_type: self.entity_type,
            entity: &self.entity,
        };
        fmt!(f, ".delete ", &entity, " policy ", self.kind.keyword());
    }
}

impl ToScript for &Command {
    fn to_script(self, f: &mut Formatter<'_>) {
        match self {
            Command::AlterCachingPolicy(cmd) => cmd.to_script(f),
            Command::AlterPolicy(cmd) => cmd.to_script(f),
            Command::CreateFunction(cmd) => cmd.to_script(f),
            Command::CreateMapping(cmd) => cmd.to_script(f),
            Command::CreateTable(cmd) => cmd.to_script(f),
            Command::CreateTables(cmd) => cmd.to_script(f),
            Command::DeletePolicy(cmd) => cmd.to_script(f),
            Command::DropFunction(cmd) => cmd.to_script(f),
            Command::DropMapping(cmd) => cmd.to_script(f),
            Command::DropTable(cmd) => cmd.to_script(f),
        }
    }
}
