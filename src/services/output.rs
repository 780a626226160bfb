use crate::compiler::error::{BindError, CompileError, GraphError, UnsupportedTypeError};
use crate::domain::models::{ErrorBody, JsonErr, JsonOut};
use crate::services::storage::PersistenceError;
use crate::services::trainer::{ProcessError, RemoteError};
use serde::Serialize;

pub fn print_out<T: Serialize>(
    json: bool,
    data: &[T],
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok: true, data })?
        );
    } else {
        for d in data {
            println!("{}", row(d));
        }
    }
    Ok(())
}

pub fn print_one<T: Serialize>(
    json: bool,
    data: T,
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok: true, data })?
        );
    } else {
        println!("{}", row(&data));
    }
    Ok(())
}

/// Stable code for the first recognised error in the chain.
pub fn error_code(err: &anyhow::Error) -> &'static str {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<CompileError>() {
            return match e {
                CompileError::Bind(_) => "BIND_ERROR",
                CompileError::Graph(_) => "GRAPH_ERROR",
                CompileError::Unsupported(_) => "UNSUPPORTED_TYPE",
            };
        }
        if cause.is::<BindError>() {
            return "BIND_ERROR";
        }
        if cause.is::<GraphError>() {
            return "GRAPH_ERROR";
        }
        if cause.is::<UnsupportedTypeError>() {
            return "UNSUPPORTED_TYPE";
        }
        if cause.is::<PersistenceError>() {
            return "PERSISTENCE_ERROR";
        }
        if cause.is::<ProcessError>() {
            return "PROCESS_ERROR";
        }
        if cause.is::<RemoteError>() {
            return "REMOTE_ERROR";
        }
    }
    "INTERNAL"
}

pub fn print_error(json: bool, err: &anyhow::Error) {
    let message = format!("{:#}", err);
    if json {
        let body = JsonErr {
            ok: false,
            error: ErrorBody {
                code: error_code(err),
                message,
            },
        };
        match serde_json::to_string_pretty(&body) {
            Ok(s) => println!("{}", s),
            Err(_) => eprintln!("error: {}", body.error.message),
        }
    } else {
        eprintln!("error: {}", message);
    }
}
