use serde::Serialize;

use crate::dataset::catalog::{self, DatasetInfo};
use crate::model::activation::ActivationKind;
use crate::model::hyperparams::Hyperparams;

/// Describes one dense layer of the simulated network.
///
/// Fields:
/// - `size`      : number of neurons in this layer
/// - `input_size`: output size of the previous layer, or the raw feature
///                  count for the first layer
/// - `activation`: `None` for the linear output head
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerSpec {
    pub size: usize,
    pub input_size: usize,
    pub activation: Option<ActivationKind>,
}

impl LayerSpec {
    /// Weights plus biases.
    pub fn parameter_count(&self) -> usize {
        self.input_size * self.size + self.size
    }
}

/// The dense stack a user has dialled in, sized for a particular dataset.
///
/// Nothing is ever instantiated; this exists so the UI can show the shape and
/// the parameter count of the network being "trained".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelArchitecture {
    pub hidden_layers: usize,
    pub neurons_per_layer: usize,
    pub activation: ActivationKind,
    pub input_shape: usize,
    pub output_shape: usize,
}

impl ModelArchitecture {
    pub fn new(hp: &Hyperparams, input_shape: usize, output_shape: usize) -> Self {
        ModelArchitecture {
            hidden_layers: hp.hidden_layers,
            neurons_per_layer: hp.neurons_per_layer,
            activation: hp.activation,
            input_shape,
            output_shape,
        }
    }

    /// Sizes the input and output layers from the catalog entry.
    pub fn for_dataset(hp: &Hyperparams, dataset: &DatasetInfo) -> Self {
        Self::new(hp, dataset.features, dataset.outputs)
    }

    /// Like [`for_dataset`](Self::for_dataset) but by id. Unknown datasets get
    /// a single-feature, single-output shape.
    pub fn for_dataset_id(hp: &Hyperparams, dataset_id: &str) -> Self {
        match catalog::find(dataset_id) {
            Some(info) => Self::for_dataset(hp, info),
            None => Self::new(hp, 1, 1),
        }
    }

    /// Hidden layers followed by the output head, input → output.
    pub fn layers(&self) -> Vec<LayerSpec> {
        let mut layers = Vec::with_capacity(self.hidden_layers + 1);
        let mut fan_in = self.input_shape;
        for _ in 0..self.hidden_layers {
            layers.push(LayerSpec {
                size: self.neurons_per_layer,
                input_size: fan_in,
                activation: Some(self.activation),
            });
            fan_in = self.neurons_per_layer;
        }
        layers.push(LayerSpec {
            size: self.output_shape,
            input_size: fan_in,
            activation: None,
        });
        layers
    }

    pub fn parameter_count(&self) -> usize {
        self.layers().iter().map(LayerSpec::parameter_count).sum()
    }

    /// Multi-line description shown under the parameter panel.
    pub fn summary(&self) -> String {
        let mut out = format!(
            "Dense network: {} hidden layer(s) x {} neurons, {} activation\n",
            self.hidden_layers, self.neurons_per_layer, self.activation
        );
        for (i, layer) in self.layers().iter().enumerate() {
            let act = layer.activation.map(|a| a.as_str()).unwrap_or("linear");
            out.push_str(&format!(
                "  layer {:>2}: {:>5} -> {:<5} {:<10} {:>8} params\n",
                i + 1,
                layer.input_size,
                layer.size,
                act,
                layer.parameter_count()
            ));
        }
        out.push_str(&format!(
            "Input shape: {}, output shape: {}, total parameters: {}",
            self.input_shape,
            self.output_shape,
            self.parameter_count()
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iris_default_parameter_count() {
        let arch = ModelArchitecture::for_dataset_id(&Hyperparams::default(), "iris");
        // 4*64+64 + 2*(64*64+64) + 64*3+3
        assert_eq!(arch.parameter_count(), 320 + 2 * 4160 + 195);
        assert_eq!(arch.layers().len(), 4);
        assert_eq!(arch.layers().last().unwrap().activation, None);
    }

    #[test]
    fn first_layer_takes_feature_count() {
        let arch = ModelArchitecture::for_dataset_id(&Hyperparams::default(), "mnist");
        assert_eq!(arch.layers()[0].input_size, 784);
        assert_eq!(arch.output_shape, 10);
    }

    #[test]
    fn summary_mentions_totals() {
        let hp = Hyperparams { hidden_layers: 1, neurons_per_layer: 2, ..Hyperparams::default() };
        let arch = ModelArchitecture::new(&hp, 3, 1);
        let text = arch.summary();
        // 3*2+2 + 2*1+1
        assert!(text.contains("total parameters: 11"), "{}", text);
        assert!(text.contains("relu"));
        assert!(text.contains("linear"));
    }
}
