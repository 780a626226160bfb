use crate::compiler::dialect::Dialect;
use crate::compiler::literal::{boolean, quoted, string_list};
use crate::domain::models::Config;

pub const EARLY_STOPPING: &str = "early_stopping";
pub const REDUCE_LR: &str = "reduce_lr";
pub const REMOTE_MONITOR: &str = "remote_monitor";
pub const DATA: &str = "x_train";
pub const LABELS: &str = "y_train";

/// Emits the compile, callback and fit statements for a training config.
pub struct ConfigCompiler<'d> {
    dialect: &'d Dialect,
    validation_split: f64,
}

impl<'d> ConfigCompiler<'d> {
    pub fn new(dialect: &'d Dialect, validation_split: f64) -> Self {
        Self {
            dialect,
            validation_split,
        }
    }

    pub fn emit(&self, config: &Config) -> Vec<String> {
        let mut out = vec![format!(
            "model.compile(optimizer={}.{}(learning_rate={}), loss={}, metrics={})",
            self.dialect.optimizers,
            config.optimizer,
            config.learning_rate,
            quoted(&config.loss),
            string_list(&config.metrics)
        )];

        let es = &config.early_stopping;
        if es.usage {
            let mut args = vec![
                format!("monitor={}", quoted(&es.monitor)),
                format!("patience={}", es.patience),
            ];
            if let Some(min_delta) = es.min_delta {
                args.push(format!("min_delta={}", min_delta));
            }
            if let Some(mode) = &es.mode {
                args.push(format!("mode={}", quoted(mode)));
            }
            if let Some(restore) = es.restore_best_weights {
                args.push(format!("restore_best_weights={}", boolean(restore)));
            }
            out.push(format!(
                "{} = {}.EarlyStopping({})",
                EARLY_STOPPING,
                self.dialect.callbacks,
                args.join(", ")
            ));
        }

        let lr = &config.learning_rate_reduction;
        if lr.usage {
            let mut args = vec![
                format!("monitor={}", quoted(&lr.monitor)),
                format!("factor={}", lr.factor),
                format!("patience={}", lr.patience),
            ];
            if let Some(min_lr) = lr.min_lr {
                args.push(format!("min_lr={}", min_lr));
            }
            out.push(format!(
                "{} = {}.ReduceLROnPlateau({})",
                REDUCE_LR,
                self.dialect.callbacks,
                args.join(", ")
            ));
        }

        out
    }

    pub fn emit_remote_monitor(&self, root: &str) -> String {
        format!(
            "{} = {}.RemoteMonitor(root={})",
            REMOTE_MONITOR,
            self.dialect.callbacks,
            quoted(root)
        )
    }

    pub fn emit_fit(&self, config: &Config) -> String {
        format!(
            "model.fit({}, {}, epochs={}, batch_size={}, validation_split={}, callbacks=[{}])",
            DATA,
            LABELS,
            config.epochs,
            config.batch_size,
            self.validation_split,
            callback_names(config).join(", ")
        )
    }
}

/// Callback identifiers passed to fit: the remote monitor first, then early
/// stopping and learning-rate reduction when enabled.
pub fn callback_names(config: &Config) -> Vec<&'static str> {
    let mut names = vec![REMOTE_MONITOR];
    if config.early_stopping.usage {
        names.push(EARLY_STOPPING);
    }
    if config.learning_rate_reduction.usage {
        names.push(REDUCE_LR);
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(value: serde_json::Value) -> Config {
        let mut base = json!({
            "optimizer": "Adam",
            "learning_rate": 0.001,
            "loss": "sparse_categorical_crossentropy",
            "metrics": ["accuracy"],
            "batch_size": 32,
            "epochs": 10
        });
        if let (Some(base), Some(extra)) = (base.as_object_mut(), value.as_object()) {
            for (k, v) in extra {
                base.insert(k.clone(), v.clone());
            }
        }
        serde_json::from_value(base).unwrap()
    }

    #[test]
    fn compile_statement_only_when_callbacks_unused() {
        let dialect = Dialect::default();
        let out = ConfigCompiler::new(&dialect, 0.2).emit(&config(json!({})));
        assert_eq!(
            out,
            vec![
                "model.compile(optimizer=tf.keras.optimizers.Adam(learning_rate=0.001), \
                 loss=\"sparse_categorical_crossentropy\", metrics=[\"accuracy\"])"
            ]
        );
    }

    #[test]
    fn enabled_callbacks_are_defined_in_order() {
        let dialect = Dialect::default();
        let cfg = config(json!({
            "early_stopping": {"usage": true, "patience": 3, "restore_best_weights": true},
            "learning_rate_reduction": {"usage": true, "factor": 0.5, "patience": 2, "min_lr": 0.0001}
        }));
        let out = ConfigCompiler::new(&dialect, 0.2).emit(&cfg);
        assert_eq!(out.len(), 3);
        assert_eq!(
            out[1],
            "early_stopping = tf.keras.callbacks.EarlyStopping(monitor=\"val_loss\", patience=3, restore_best_weights=True)"
        );
        assert_eq!(
            out[2],
            "reduce_lr = tf.keras.callbacks.ReduceLROnPlateau(monitor=\"val_loss\", factor=0.5, patience=2, min_lr=0.0001)"
        );
    }

    #[test]
    fn fit_without_callbacks_keeps_remote_monitor() {
        let dialect = Dialect::default();
        let fit = ConfigCompiler::new(&dialect, 0.2).emit_fit(&config(json!({})));
        assert_eq!(
            fit,
            "model.fit(x_train, y_train, epochs=10, batch_size=32, validation_split=0.2, callbacks=[remote_monitor])"
        );
    }

    #[test]
    fn fit_lists_enabled_callbacks_deterministically() {
        let both = config(json!({
            "early_stopping": {"usage": true},
            "learning_rate_reduction": {"usage": true}
        }));
        assert_eq!(
            callback_names(&both),
            vec![REMOTE_MONITOR, EARLY_STOPPING, REDUCE_LR]
        );

        let only_lr = config(json!({"learning_rate_reduction": {"usage": true}}));
        assert_eq!(callback_names(&only_lr), vec![REMOTE_MONITOR, REDUCE_LR]);
    }

    #[test]
    fn remote_monitor_points_at_root() {
        let dialect = Dialect::default();
        assert_eq!(
            ConfigCompiler::new(&dialect, 0.2).emit_remote_monitor("http://trainer:9000"),
            "remote_monitor = tf.keras.callbacks.RemoteMonitor(root=\"http://trainer:9000\")"
        );
    }
}
