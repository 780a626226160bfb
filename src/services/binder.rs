use anyhow::Context;
use crate::compiler::error::BindError;
use crate::compiler::literal::is_identifier;
use crate::domain::models::{Config, Content, Project};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Reads a payload from `path`, or stdin when `path` is `-`.
pub fn read_payload(path: &str) -> anyhow::Result<String> {
    if path == "-" {
        let mut raw = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut raw)
            .context("reading payload from stdin")?;
        return Ok(raw);
    }
    std::fs::read_to_string(path).with_context(|| format!("reading payload {}", path))
}

/// Binds a transport payload into a `Project`.
///
/// `user` namespaces every artifact of the request; when absent the
/// namespace is derived from the payload digest.
pub fn bind_project(raw: &str, user: Option<&str>) -> Result<Project, BindError> {
    let mut data: Map<String, Value> = serde_json::from_str(raw).map_err(BindError::Malformed)?;

    let config: Config = take(&mut data, "config")?;
    if !is_identifier(&config.optimizer) {
        return Err(BindError::InvalidIdentifier(config.optimizer));
    }
    let content: Content = take(&mut data, "content")?;
    let dataset = data.remove("dataset").unwrap_or(Value::Null);

    let user_id = match user {
        Some(u) => validate_namespace(u)?,
        None => payload_namespace(raw),
    };

    tracing::debug!(user = %user_id, layers = content.modules.len(), "bound project");
    Ok(Project {
        user_id,
        config,
        dataset,
        content,
    })
}

fn take<T: serde::de::DeserializeOwned>(
    data: &mut Map<String, Value>,
    field: &'static str,
) -> Result<T, BindError> {
    let value = data.remove(field).ok_or(BindError::MissingField(field))?;
    serde_json::from_value(value).map_err(|source| BindError::Field { field, source })
}

/// A namespace becomes a directory name, so it may not traverse or nest.
pub fn validate_namespace(id: &str) -> Result<String, BindError> {
    let ok = !id.is_empty()
        && id != "."
        && id != ".."
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if ok {
        Ok(id.to_string())
    } else {
        Err(BindError::InvalidUserId(id.to_string()))
    }
}

pub fn payload_namespace(raw: &str) -> String {
    let digest = hex::encode(Sha256::digest(raw.as_bytes()));
    digest[..16].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(layers: Value) -> String {
        json!({
            "config": {
                "optimizer": "Adam", "learning_rate": 0.001, "loss": "mse",
                "metrics": ["mae"], "batch_size": 4, "epochs": 2
            },
            "dataset": {"x": [[0.0]], "y": [1.0]},
            "content": {"input": "x", "output": "d", "layers": layers}
        })
        .to_string()
    }

    fn valid_layers() -> Value {
        json!([
            {"category": "Layer", "type": "Input", "name": "x", "param": {"shape": "1,"}},
            {"category": "Layer", "type": "Dense", "name": "d", "input": "x", "param": {"units": 1}}
        ])
    }

    #[test]
    fn binds_full_payload() {
        let project = bind_project(&payload(valid_layers()), Some("alice")).unwrap();
        assert_eq!(project.user_id, "alice");
        assert_eq!(project.content.modules.len(), 2);
        assert_eq!(project.config.metrics, vec!["mae"]);
        assert_eq!(project.dataset["y"][0], 1.0);
    }

    #[test]
    fn unknown_layer_type_fails_binding() {
        let layers = json!([
            {"category": "Layer", "type": "Input", "name": "x", "param": {"shape": "1,"}},
            {"category": "Layer", "type": "Attention", "name": "att", "input": "x", "param": {}}
        ]);
        let err = bind_project(&payload(layers), Some("alice")).unwrap_err();
        assert!(matches!(err, BindError::Field { field: "content", .. }));
        assert!(err.to_string().contains("invalid node type `Attention`"));
    }

    #[test]
    fn missing_sections_are_named() {
        let err = bind_project(r#"{"content": {}}"#, Some("alice")).unwrap_err();
        assert!(matches!(err, BindError::MissingField("config")));
        assert!(matches!(
            bind_project("not json", None).unwrap_err(),
            BindError::Malformed(_)
        ));
    }

    #[test]
    fn optimizer_must_be_an_identifier() {
        let mut raw: Value = serde_json::from_str(&payload(valid_layers())).unwrap();
        raw["config"]["optimizer"] = json!("Adam(); import os");
        let err = bind_project(&raw.to_string(), Some("alice")).unwrap_err();
        assert!(matches!(err, BindError::InvalidIdentifier(_)));
    }

    #[test]
    fn namespaces_cannot_escape_the_output_dir() {
        for bad in ["", ".", "..", "../etc", "a/b", "a b"] {
            assert!(validate_namespace(bad).is_err(), "{bad:?} accepted");
        }
        assert_eq!(validate_namespace("user-1.v2_x").unwrap(), "user-1.v2_x");
    }

    #[test]
    fn anonymous_requests_get_a_stable_payload_namespace() {
        let raw = payload(valid_layers());
        let a = bind_project(&raw, None).unwrap();
        let b = bind_project(&raw, None).unwrap();
        assert_eq!(a.user_id, b.user_id);
        assert_eq!(a.user_id.len(), 16);
        assert!(validate_namespace(&a.user_id).is_ok());
    }

    #[test]
    fn dataset_is_optional() {
        let mut raw: Value = serde_json::from_str(&payload(valid_layers())).unwrap();
        raw.as_object_mut().unwrap().remove("dataset");
        let project = bind_project(&raw.to_string(), Some("bob")).unwrap();
        assert!(project.dataset.is_null());
    }
}
