mod common;

use common::{classifier_payload, TestEnv};
use jsonschema::JSONSchema;
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;

fn load_schema(name: &str) -> Value {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let raw = fs::read_to_string(root.join("docs/contracts").join(name)).unwrap();
    serde_json::from_str(&raw).unwrap()
}

fn validate(schema_name: &str, data: &Value) {
    let schema = load_schema(schema_name);
    let validator = JSONSchema::compile(&schema).expect("compile schema");
    let msgs: Vec<String> = match validator.validate(data) {
        Ok(()) => return,
        Err(errors) => errors.map(|e| e.to_string()).collect(),
    };
    panic!("schema validation failed: {}", msgs.join(" | "));
}

#[test]
fn contracts_check() {
    let env = TestEnv::new();
    let payload = env.write_payload("net.json", &classifier_payload());
    let out = env.out_dir();

    let compiled = env.run_json(&[
        "compile",
        &payload,
        "--user",
        "alice",
        "--out-dir",
        out.to_str().unwrap(),
    ]);
    assert_eq!(compiled["ok"], true);
    validate("compile.schema.json", &compiled["data"]);

    let order = env.run_json(&["order", &payload]);
    assert_eq!(order["ok"], true);
    validate("order.schema.json", &order["data"]);

    let layers = env.run_json(&["layers"]);
    assert_eq!(layers["ok"], true);
    validate("layers.schema.json", &layers["data"]);

    let body = env.run_json(&["train-body", &payload, "--user", "alice"]);
    assert_eq!(body["ok"], true);
    validate("train-body.schema.json", &body["data"]);
}

#[test]
fn error_envelope_contract() {
    let env = TestEnv::new();
    let mut bad = classifier_payload();
    bad["content"]["layers"][0]["type"] = json!("Transformer");
    let payload = env.write_payload("bad.json", &bad);

    let err = env.run_json_failure(&["compile", &payload]);
    validate("error.schema.json", &err);

    let missing = env.run_json_failure(&["order", "nowhere.json"]);
    validate("error.schema.json", &missing);
    assert_eq!(missing["error"]["code"], "INTERNAL");
}
