use crate::compiler::dialect::Dialect;
use crate::compiler::error::UnsupportedTypeError;
use crate::compiler::literal;
use crate::domain::models::{Content, Module};

/// Emits one layer-construction statement per module.
pub struct ModuleCompiler<'d> {
    dialect: &'d Dialect,
}

impl<'d> ModuleCompiler<'d> {
    pub fn new(dialect: &'d Dialect) -> Self {
        Self { dialect }
    }

    /// `name = ns.Type(k=v, ...)(input)`; the input layer is never applied.
    pub fn emit(&self, module: &Module) -> Result<String, UnsupportedTypeError> {
        let params = module
            .layer
            .params()
            .ok_or_else(|| UnsupportedTypeError::Variant {
                module: module.name.clone(),
            })?;
        let namespace =
            self.dialect
                .namespace(module.category)
                .ok_or_else(|| UnsupportedTypeError::Category {
                    module: module.name.clone(),
                    category: module.category.as_str(),
                })?;

        let args: Vec<String> = params
            .iter()
            .map(|(key, value)| format!("{}={}", key, literal::render(key, value)))
            .collect();
        let mut stmt = format!(
            "{} = {}.{}({})",
            module.name,
            namespace,
            module.kind(),
            args.join(", ")
        );
        if !module.is_input() {
            if let Some(input) = &module.input {
                stmt.push_str(&format!("({})", input));
            }
        }
        Ok(stmt)
    }

    pub fn emit_model(&self, content: &Content) -> String {
        format!(
            "model = {}(inputs={}, outputs={})",
            self.dialect.model, content.input, content.output
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::params::Layer;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn module(value: serde_json::Value) -> Module {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn input_layer_has_no_application() {
        let dialect = Dialect::default();
        let m = module(json!({
            "category": "Layer", "type": "Input", "name": "x",
            "param": {"shape": "28,28,1"}
        }));
        assert_eq!(
            ModuleCompiler::new(&dialect).emit(&m).unwrap(),
            "x = tf.keras.layers.Input(shape=(28,28,1))"
        );
    }

    #[test]
    fn layer_is_applied_to_its_input() {
        let dialect = Dialect::default();
        let m = module(json!({
            "category": "Layer", "type": "Dense", "name": "d1", "input": "x",
            "param": {"units": "10", "activation": "softmax", "use_bias": false}
        }));
        assert_eq!(
            ModuleCompiler::new(&dialect).emit(&m).unwrap(),
            "d1 = tf.keras.layers.Dense(units=10, activation=\"softmax\", use_bias=False)(x)"
        );
    }

    #[test]
    fn parameterless_layer_emits_empty_call() {
        let dialect = Dialect::default();
        let m = module(json!({
            "category": "Layer", "type": "Flatten", "name": "flat", "input": "pool"
        }));
        assert_eq!(
            ModuleCompiler::new(&dialect).emit(&m).unwrap(),
            "flat = tf.keras.layers.Flatten()(pool)"
        );
    }

    #[test]
    fn math_category_uses_math_namespace() {
        let dialect = Dialect::default();
        let m = module(json!({
            "category": "Math", "type": "Activation", "name": "act", "input": "d",
            "param": {"activation": "tanh"}
        }));
        assert_eq!(
            ModuleCompiler::new(&dialect).emit(&m).unwrap(),
            "act = tf.math.Activation(activation=\"tanh\")(d)"
        );
    }

    #[test]
    fn unmapped_category_is_unsupported() {
        let dialect = Dialect {
            namespaces: BTreeMap::new(),
            ..Dialect::default()
        };
        let m = module(json!({
            "category": "Layer", "type": "Flatten", "name": "flat"
        }));
        assert_eq!(
            ModuleCompiler::new(&dialect).emit(&m).unwrap_err(),
            UnsupportedTypeError::Category {
                module: "flat".to_string(),
                category: "Layer"
            }
        );
    }

    #[test]
    fn unsupported_variant_is_refused() {
        let dialect = Dialect::default();
        let mut m = module(json!({
            "category": "Layer", "type": "Flatten", "name": "flat"
        }));
        m.layer = Layer::Unsupported;
        assert!(matches!(
            ModuleCompiler::new(&dialect).emit(&m),
            Err(UnsupportedTypeError::Variant { .. })
        ));
    }

    #[test]
    fn model_binding_uses_graph_endpoints() {
        let dialect = Dialect::default();
        let content: Content = serde_json::from_value(json!({
            "input": "x", "output": "out", "layers": []
        }))
        .unwrap();
        assert_eq!(
            ModuleCompiler::new(&dialect).emit_model(&content),
            "model = tf.keras.Model(inputs=x, outputs=out)"
        );
    }
}
