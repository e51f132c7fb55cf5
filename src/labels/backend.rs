//! Backend selection.
use std::{fmt, path::Path, str::FromStr};

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::Error;

use super::{Device, FastTextBuilder, GenerativeBuilder, LabelBackend, Model};

/// Model families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Closed-label classifier, see [super::FastTextClassifier].
    Classifier,
    /// Text-to-text model, see [super::GenerativeClient].
    Generative,
}

impl FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "classifier" | "classification" | "fasttext" => Ok(BackendKind::Classifier),
            "generative" | "text2text" | "t5" => Ok(BackendKind::Generative),
            other => Err(Error::Custom(format!("unknown backend kind: {other}"))),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Classifier => write!(f, "classifier"),
            BackendKind::Generative => write!(f, "generative"),
        }
    }
}

/// Builds a [LabelBackend] from configuration.
///
/// Building loads the model, and is meant to be done once per process.
#[derive(Debug, Clone)]
pub struct BackendBuilder {
    kind: BackendKind,
    model: Option<String>,
    device: Device,
    endpoint: Option<String>,
    strict: bool,
}

impl BackendBuilder {
    pub fn new(kind: BackendKind) -> Self {
        Self {
            kind,
            model: None,
            device: Device::Cpu,
            endpoint: None,
            strict: false,
        }
    }

    /// Model file (classifier) or model name (generative).
    pub fn model(&mut self, model: &str) -> &mut Self {
        self.model = Some(model.to_string());
        self
    }

    pub fn device(&mut self, device: Device) -> &mut Self {
        self.device = device;
        self
    }

    /// Generation server url. Ignored by classifiers.
    pub fn endpoint(&mut self, endpoint: &str) -> &mut Self {
        self.endpoint = Some(endpoint.to_string());
        self
    }

    pub fn strict(&mut self, strict: bool) -> &mut Self {
        self.strict = strict;
        self
    }

    pub fn build(&self) -> Result<LabelBackend, Error> {
        info!("building {} backend on {}", self.kind, self.device);
        let model: Box<dyn Model> = match self.kind {
            BackendKind::Classifier => {
                let mut builder = FastTextBuilder::default();
                if let Some(path) = &self.model {
                    builder.path(Path::new(path));
                }
                Box::new(builder.device(self.device).build()?)
            }
            BackendKind::Generative => {
                let mut builder = GenerativeBuilder::default();
                if let Some(name) = &self.model {
                    builder.model(name);
                }
                if let Some(url) = &self.endpoint {
                    builder.base_url(url);
                }
                Box::new(builder.device(self.device).build()?)
            }
        };

        Ok(LabelBackend::new(model).strict(self.strict))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_from_str() {
        assert_eq!(
            "classifier".parse::<BackendKind>().unwrap(),
            BackendKind::Classifier
        );
        assert_eq!("T5".parse::<BackendKind>().unwrap(), BackendKind::Generative);
        assert!("bert".parse::<BackendKind>().is_err());
    }

    #[test]
    fn missing_classifier_model_fails() {
        let res = BackendBuilder::new(BackendKind::Classifier)
            .model("no/such/model.bin")
            .build();
        assert!(res.is_err());
    }
}
