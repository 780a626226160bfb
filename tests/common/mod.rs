#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    pub work: PathBuf,
    cargo_home: PathBuf,
    rustup_home: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        let work = tmp.path().join("work");
        fs::create_dir_all(&home).expect("create isolated home");
        fs::create_dir_all(&work).expect("create work dir");

        let orig_home = std::env::var("HOME").unwrap_or_default();
        let cargo_home = PathBuf::from(&orig_home).join(".cargo");
        let rustup_home = PathBuf::from(&orig_home).join(".rustup");

        Self {
            _tmp: tmp,
            home,
            work,
            cargo_home,
            rustup_home,
        }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("netforge");
        cmd.env("HOME", &self.home)
            .env("CARGO_HOME", &self.cargo_home)
            .env("RUSTUP_HOME", &self.rustup_home)
            .env_remove("RUST_LOG")
            .current_dir(&self.work);
        cmd
    }

    pub fn out_dir(&self) -> PathBuf {
        self.work.join("generated")
    }

    pub fn write_payload(&self, name: &str, payload: &Value) -> String {
        let path = self.work.join(name);
        fs::write(&path, serde_json::to_string_pretty(payload).expect("serialize payload"))
            .expect("write payload");
        path.to_str().expect("payload path utf8").to_string()
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    pub fn run_json_failure(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .args(args)
            .assert()
            .failure()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json error output")
    }
}

/// A small convolutional classifier wired Input -> Conv2D -> MaxPool2D ->
/// Flatten -> Dense.
pub fn classifier_payload() -> Value {
    json!({
        "config": {
            "optimizer": "Adam",
            "learning_rate": 0.001,
            "loss": "sparse_categorical_crossentropy",
            "metrics": ["accuracy"],
            "batch_size": 32,
            "epochs": 5,
            "early_stopping": {"usage": false},
            "learning_rate_reduction": {"usage": false}
        },
        "dataset": {"x": [[[[0.0]]]], "y": [1]},
        "content": {
            "input": "x",
            "output": "probs",
            "layers": [
                {"category": "Layer", "type": "Input", "name": "x",
                 "param": {"shape": "28,28,1"}},
                {"category": "Layer", "type": "Conv2D", "name": "c1", "input": "x",
                 "param": {"filters": 8, "kernel_size": "3,3", "activation": "relu"}},
                {"category": "Layer", "type": "MaxPool2D", "name": "p1", "input": "c1",
                 "param": {"pool_size": "2,2"}},
                {"category": "Layer", "type": "Flatten", "name": "flat", "input": "p1"},
                {"category": "Layer", "type": "Dense", "name": "probs", "input": "flat",
                 "param": {"units": 10, "activation": "softmax"}}
            ]
        }
    })
}
