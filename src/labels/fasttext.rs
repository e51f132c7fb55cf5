/*! FastText emotion classifier

Closed-label classifier: a fastText supervised model trained with `__label__<emotion>` labels.
The top-1 prediction is returned, with its `__label__` prefix removed.
!*/
use std::path::Path;

use fasttext::{FastText as FastTextLib, Prediction};
use log::{info, warn};

use crate::error::Error;

use super::{Device, Model};

const LABEL_PREFIX: &str = "__label__";

/// Remove `__label__` from the prediction label.
///
/// Labels without the prefix are returned untouched.
fn clean_label(prediction: &Prediction) -> &str {
    prediction
        .label
        .strip_prefix(LABEL_PREFIX)
        .unwrap_or(&prediction.label)
}

/// Holds a [fasttext::FastText] instance.
pub struct FastTextClassifier {
    inner: FastTextLib,
    name: String,
    threshold: f32,
}

impl Model for FastTextClassifier {
    fn infer(&self, text: &str) -> Result<String, Error> {
        // fasttext chokes on unicode null chars
        let text = text.replace(char::from(0), "");

        let predictions = self
            .inner
            .predict(&text, 1, self.threshold)
            .map_err(Error::FastText)?;

        predictions
            .first()
            .map(|p| clean_label(p).to_string())
            .ok_or_else(|| {
                Error::FastText(format!("no prediction above threshold {}", self.threshold))
            })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Fasttext builder.
pub struct FastTextBuilder<'a> {
    path: Option<&'a Path>,
    threshold: Option<f32>,
    device: Device,
}

impl<'a> FastTextBuilder<'a> {
    fn init_fasttextlib(path: &str) -> Result<FastTextLib, Error> {
        let mut ft = FastTextLib::new();
        ft.load_model(path).map_err(Error::FastText)?;
        Ok(ft)
    }

    pub fn build(&self) -> Result<FastTextClassifier, Error> {
        let path = self
            .path
            .ok_or_else(|| Error::Custom("No model path provided".to_string()))?;
        if !path.is_file() {
            return Err(Error::FastText(format!("model file not found: {path:?}")));
        }
        let path_str = path
            .to_str()
            .ok_or_else(|| Error::Custom(format!("Could not parse path: {path:?}")))?;

        if let Device::Accelerator(idx) = self.device {
            warn!("fasttext runs on cpu only, ignoring device cuda:{idx}");
        }

        info!("loading fasttext model {path_str}");
        let inner = Self::init_fasttextlib(path_str)?;

        Ok(FastTextClassifier {
            inner,
            name: path_str.to_string(),
            threshold: self.threshold.unwrap_or(0.0),
        })
    }

    pub fn path<'b>(&'b mut self, path: &'a Path) -> &'b mut FastTextBuilder<'a> {
        self.path = Some(path);
        self
    }

    pub fn threshold<'b>(&'b mut self, threshold: f32) -> &'b mut FastTextBuilder<'a> {
        self.threshold = Some(threshold);
        self
    }

    pub fn device<'b>(&'b mut self, device: Device) -> &'b mut FastTextBuilder<'a> {
        self.device = device;
        self
    }
}

impl<'a> Default for FastTextBuilder<'a> {
    fn default() -> Self {
        Self {
            path: Some(Path::new("emotion.bin")),
            threshold: Some(0.0),
            device: Device::Cpu,
        }
    }
}
