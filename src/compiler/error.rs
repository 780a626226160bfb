use thiserror::Error;

/// The payload could not be turned into a `Project`.
#[derive(Debug, Error)]
pub enum BindError {
    #[error("malformed payload: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("invalid `{field}`: {source}")]
    Field {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid node type `{kind}` for layer `{name}`")]
    InvalidNodeType { name: String, kind: String },
    #[error("invalid parameters for layer `{name}`: {source}")]
    Param {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid identifier `{0}`")]
    InvalidIdentifier(String),
    #[error("layer name `{0}` is reserved by the generated code")]
    ReservedName(String),
    #[error("invalid user id `{0}`")]
    InvalidUserId(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("no layer of type Input")]
    MissingInput,
    #[error("more than one layer of type Input: {}", .0.join(", "))]
    MultipleInputs(Vec<String>),
    #[error("duplicate layer name `{0}`")]
    DuplicateName(String),
    #[error("layer `{module}` reads from unknown layer `{input}`")]
    DanglingInput { module: String, input: String },
    #[error("layer `{module}` feeds unknown layer `{output}`")]
    DanglingOutput { module: String, output: String },
    #[error("graph {role} `{name}` does not name a layer")]
    UnknownEndpoint { role: &'static str, name: String },
    #[error("dependency cycle through: {}", .0.join(", "))]
    Cycle(Vec<String>),
    #[error("layers not connected to the input: {}", .0.join(", "))]
    Unreachable(Vec<String>),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UnsupportedTypeError {
    #[error("layer `{module}` has no supported parameter variant")]
    Variant { module: String },
    #[error("layer `{module}`: category `{category}` has no namespace in the dialect")]
    Category {
        module: String,
        category: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Bind(#[from] BindError),
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Unsupported(#[from] UnsupportedTypeError),
}
