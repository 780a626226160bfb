//! Per-layer parameter records.
//!
//! `Layer` is the discriminated union selected by a layer declaration's
//! `type` field. Each variant owns a typed parameter record; the record's
//! field order is the order parameters are emitted in.

use serde::{Deserialize, Serialize};

/// A single parameter value as it arrived on the wire.
///
/// Strings and numbers keep their textual form and are classified later by
/// the literal formatter. Booleans are kept apart because the target
/// language spells them differently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Flag(bool),
    Number(serde_json::Number),
    Text(String),
}

impl ParamValue {
    pub fn raw(&self) -> String {
        match self {
            ParamValue::Flag(b) => b.to_string(),
            ParamValue::Number(n) => n.to_string(),
            ParamValue::Text(s) => s.clone(),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

/// One `key=value` pair in emission order.
pub type ParamEntry<'a> = (&'static str, &'a ParamValue);

/// Static description of a parameter record.
pub trait LayerParams {
    const REQUIRED: &'static [&'static str];
    const OPTIONAL: &'static [&'static str];

    /// Populated parameters, in declaration order.
    fn entries(&self) -> Vec<ParamEntry<'_>>;
}

fn collect<'a>(fields: &[(&'static str, Option<&'a ParamValue>)]) -> Vec<ParamEntry<'a>> {
    fields
        .iter()
        .filter_map(|(k, v)| v.map(|v| (*k, v)))
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputParams {
    pub shape: ParamValue,
    pub batch_size: Option<ParamValue>,
    pub dtype: Option<ParamValue>,
}

impl LayerParams for InputParams {
    const REQUIRED: &'static [&'static str] = &["shape"];
    const OPTIONAL: &'static [&'static str] = &["batch_size", "dtype"];

    fn entries(&self) -> Vec<ParamEntry<'_>> {
        collect(&[
            ("shape", Some(&self.shape)),
            ("batch_size", self.batch_size.as_ref()),
            ("dtype", self.dtype.as_ref()),
        ])
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Conv2DParams {
    pub filters: ParamValue,
    pub kernel_size: ParamValue,
    pub strides: Option<ParamValue>,
    pub padding: Option<ParamValue>,
    pub activation: Option<ParamValue>,
    pub use_bias: Option<ParamValue>,
    pub dilation_rate: Option<ParamValue>,
}

impl LayerParams for Conv2DParams {
    const REQUIRED: &'static [&'static str] = &["filters", "kernel_size"];
    const OPTIONAL: &'static [&'static str] =
        &["strides", "padding", "activation", "use_bias", "dilation_rate"];

    fn entries(&self) -> Vec<ParamEntry<'_>> {
        collect(&[
            ("filters", Some(&self.filters)),
            ("kernel_size", Some(&self.kernel_size)),
            ("strides", self.strides.as_ref()),
            ("padding", self.padding.as_ref()),
            ("activation", self.activation.as_ref()),
            ("use_bias", self.use_bias.as_ref()),
            ("dilation_rate", self.dilation_rate.as_ref()),
        ])
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DenseParams {
    pub units: ParamValue,
    pub activation: Option<ParamValue>,
    pub use_bias: Option<ParamValue>,
}

impl LayerParams for DenseParams {
    const REQUIRED: &'static [&'static str] = &["units"];
    const OPTIONAL: &'static [&'static str] = &["activation", "use_bias"];

    fn entries(&self) -> Vec<ParamEntry<'_>> {
        collect(&[
            ("units", Some(&self.units)),
            ("activation", self.activation.as_ref()),
            ("use_bias", self.use_bias.as_ref()),
        ])
    }
}

/// Shared by `AveragePooling2D` and `MaxPool2D`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PoolingParams {
    pub pool_size: Option<ParamValue>,
    pub strides: Option<ParamValue>,
    pub padding: Option<ParamValue>,
}

impl LayerParams for PoolingParams {
    const REQUIRED: &'static [&'static str] = &[];
    const OPTIONAL: &'static [&'static str] = &["pool_size", "strides", "padding"];

    fn entries(&self) -> Vec<ParamEntry<'_>> {
        collect(&[
            ("pool_size", self.pool_size.as_ref()),
            ("strides", self.strides.as_ref()),
            ("padding", self.padding.as_ref()),
        ])
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActivationParams {
    pub activation: ParamValue,
}

impl LayerParams for ActivationParams {
    const REQUIRED: &'static [&'static str] = &["activation"];
    const OPTIONAL: &'static [&'static str] = &[];

    fn entries(&self) -> Vec<ParamEntry<'_>> {
        vec![("activation", &self.activation)]
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DropoutParams {
    pub rate: ParamValue,
    pub seed: Option<ParamValue>,
}

impl LayerParams for DropoutParams {
    const REQUIRED: &'static [&'static str] = &["rate"];
    const OPTIONAL: &'static [&'static str] = &["seed"];

    fn entries(&self) -> Vec<ParamEntry<'_>> {
        collect(&[("rate", Some(&self.rate)), ("seed", self.seed.as_ref())])
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatchNormalizationParams {
    pub axis: Option<ParamValue>,
    pub momentum: Option<ParamValue>,
    pub epsilon: Option<ParamValue>,
    pub center: Option<ParamValue>,
    pub scale: Option<ParamValue>,
}

impl LayerParams for BatchNormalizationParams {
    const REQUIRED: &'static [&'static str] = &[];
    const OPTIONAL: &'static [&'static str] = &["axis", "momentum", "epsilon", "center", "scale"];

    fn entries(&self) -> Vec<ParamEntry<'_>> {
        collect(&[
            ("axis", self.axis.as_ref()),
            ("momentum", self.momentum.as_ref()),
            ("epsilon", self.epsilon.as_ref()),
            ("center", self.center.as_ref()),
            ("scale", self.scale.as_ref()),
        ])
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlattenParams {
    pub data_format: Option<ParamValue>,
}

impl LayerParams for FlattenParams {
    const REQUIRED: &'static [&'static str] = &[];
    const OPTIONAL: &'static [&'static str] = &["data_format"];

    fn entries(&self) -> Vec<ParamEntry<'_>> {
        collect(&[("data_format", self.data_format.as_ref())])
    }
}

/// Layer kind together with its parameter record.
///
/// Decoded from `{"type": ..., "param": {...}}`. Any discriminator outside
/// the closed set lands in `Unsupported`, which binding rejects and the
/// module compiler refuses to emit.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum Layer {
    Input { param: InputParams },
    Conv2D { param: Conv2DParams },
    Dense { param: DenseParams },
    AveragePooling2D { param: PoolingParams },
    MaxPool2D { param: PoolingParams },
    Activation { param: ActivationParams },
    Dropout { param: DropoutParams },
    BatchNormalization { param: BatchNormalizationParams },
    Flatten { param: FlattenParams },
    #[serde(other)]
    Unsupported,
}

impl Layer {
    pub fn kind(&self) -> &'static str {
        match self {
            Layer::Input { .. } => "Input",
            Layer::Conv2D { .. } => "Conv2D",
            Layer::Dense { .. } => "Dense",
            Layer::AveragePooling2D { .. } => "AveragePooling2D",
            Layer::MaxPool2D { .. } => "MaxPool2D",
            Layer::Activation { .. } => "Activation",
            Layer::Dropout { .. } => "Dropout",
            Layer::BatchNormalization { .. } => "BatchNormalization",
            Layer::Flatten { .. } => "Flatten",
            Layer::Unsupported => "Unsupported",
        }
    }

    pub fn is_input(&self) -> bool {
        matches!(self, Layer::Input { .. })
    }

    /// Populated parameters, or `None` for an unsupported layer.
    pub fn params(&self) -> Option<Vec<ParamEntry<'_>>> {
        let entries = match self {
            Layer::Input { param } => param.entries(),
            Layer::Conv2D { param } => param.entries(),
            Layer::Dense { param } => param.entries(),
            Layer::AveragePooling2D { param } | Layer::MaxPool2D { param } => param.entries(),
            Layer::Activation { param } => param.entries(),
            Layer::Dropout { param } => param.entries(),
            Layer::BatchNormalization { param } => param.entries(),
            Layer::Flatten { param } => param.entries(),
            Layer::Unsupported => return None,
        };
        Some(entries)
    }

    pub fn catalog() -> Vec<LayerInfo> {
        fn info<P: LayerParams>(kind: &'static str) -> LayerInfo {
            LayerInfo {
                kind,
                required: P::REQUIRED.to_vec(),
                optional: P::OPTIONAL.to_vec(),
            }
        }
        vec![
            info::<InputParams>("Input"),
            info::<Conv2DParams>("Conv2D"),
            info::<DenseParams>("Dense"),
            info::<PoolingParams>("AveragePooling2D"),
            info::<PoolingParams>("MaxPool2D"),
            info::<ActivationParams>("Activation"),
            info::<DropoutParams>("Dropout"),
            info::<BatchNormalizationParams>("BatchNormalization"),
            info::<FlattenParams>("Flatten"),
        ]
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LayerInfo {
    pub kind: &'static str,
    pub required: Vec<&'static str>,
    pub optional: Vec<&'static str>,
}
