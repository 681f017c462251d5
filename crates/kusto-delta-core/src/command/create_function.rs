use super::Command;
use crate::schema::{EntityName, FunctionSpec, QuotedText};

/// `.create-or-alter function`.
///
/// The parameter list and body are carried as raw text: the delta engine
/// compares them textually and never needs to understand the query
/// language inside.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateFunction {
    pub name: EntityName,
    /// Parameter list without the surrounding parentheses.
    pub parameters: String,
    /// Function body without the surrounding braces, trimmed.
    pub body: String,
    pub folder: Option<QuotedText>,
    pub doc_string: Option<QuotedText>,
}

impl CreateFunction {
    pub fn from_spec(name: EntityName, spec: &FunctionSpec) -> Self {
        Self {
            name,
            parameters: spec.parameters.clone(),
            body: spec.body.clone(),
            folder: spec.folder.clone(),
            doc_string: spec.doc_string.clone(),
        }
    }
}

impl From<CreateFunction> for Command {
    fn from(value: CreateFunction) -> Self {
        Self::CreateFunction(value)
    }
}
