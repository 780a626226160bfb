use crate::domain::models::Category;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Namespace catalog of the target runtime.
///
/// Passed by reference into the compilers; swapping it retargets the emitted
/// statements without touching the compiler code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dialect {
    pub imports: Vec<String>,
    /// Category name (`Layer`, `Math`) to dotted namespace path.
    pub namespaces: BTreeMap<String, String>,
    pub model: String,
    pub optimizers: String,
    pub callbacks: String,
}

impl Dialect {
    pub fn tensorflow() -> Self {
        let namespaces = [("Layer", "tf.keras.layers"), ("Math", "tf.math")]
            .into_iter()
            .map(|(c, ns)| (c.to_string(), ns.to_string()))
            .collect();
        Self {
            imports: vec![
                "import tensorflow as tf".to_string(),
                "import tensorflow_addons as tfa".to_string(),
            ],
            namespaces,
            model: "tf.keras.Model".to_string(),
            optimizers: "tf.keras.optimizers".to_string(),
            callbacks: "tf.keras.callbacks".to_string(),
        }
    }

    pub fn namespace(&self, category: Category) -> Option<&str> {
        self.namespaces.get(category.as_str()).map(String::as_str)
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Self::tensorflow()
    }
}
