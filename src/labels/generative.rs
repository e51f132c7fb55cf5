/*! Generative (text-to-text) emotion model

The model is served by a local generation server (`/api/generate`, `/api/tags`).
Each text is sent as `emotion: <text>` and the generated output is capped to a few tokens.

The trimmed output is used as the label as is: nothing guarantees that it is a known emotion
(see [super::LabelBackend::strict]). An output reading `unknown` or `error` is kept as a generated label
and is not counted as a sentinel.
!*/
use std::time::Duration;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::Error;

use super::{Device, Model};

const PROMPT_PREFIX: &str = "emotion: ";

/// Request body for `/api/generate`
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

/// Decoding options.
///
/// `num_gpu` is the number of layers offloaded to accelerators: `0` forces cpu inference.
#[derive(Debug, Clone, PartialEq, Serialize)]
struct GenerateOptions {
    num_predict: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_gpu: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    main_gpu: Option<u32>,
}

impl GenerateOptions {
    fn new(max_tokens: u32, device: Device) -> Self {
        let (num_gpu, main_gpu) = match device {
            Device::Cpu => (Some(0), None),
            Device::Accelerator(idx) => (None, Some(idx)),
        };
        Self {
            num_predict: max_tokens,
            temperature: 0.0,
            num_gpu,
            main_gpu,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

/// HTTP client bound to one model and one device.
pub struct GenerativeClient {
    client: reqwest::blocking::Client,
    base_url: String,
    model: String,
    options: GenerateOptions,
}

impl GenerativeClient {
    fn prompt(text: &str) -> String {
        format!("{PROMPT_PREFIX}{}", text.trim())
    }

    fn request<'a>(&'a self, text: &str) -> GenerateRequest<'a> {
        GenerateRequest {
            model: &self.model,
            prompt: Self::prompt(text),
            stream: false,
            options: self.options.clone(),
        }
    }

    /// Check that the model is served.
    fn is_model_available(&self) -> Result<bool, Error> {
        let url = format!("{}/api/tags", self.base_url);
        let tags: TagsResponse = self.client.get(url).send()?.error_for_status()?.json()?;
        Ok(tags.models.iter().any(|m| m.name.starts_with(&self.model)))
    }
}

impl Model for GenerativeClient {
    fn infer(&self, text: &str) -> Result<String, Error> {
        let url = format!("{}/api/generate", self.base_url);
        let response = self.client.post(url).json(&self.request(text)).send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Error::Backend(format!("status {}: {}", status.as_u16(), body)));
        }

        let generated: GenerateResponse = response.json()?;
        Ok(generated.response.trim().to_string())
    }

    fn name(&self) -> &str {
        &self.model
    }
}

/// Generative client builder.
pub struct GenerativeBuilder {
    base_url: String,
    model: String,
    device: Device,
    max_tokens: u32,
    timeout: Duration,
    verify: bool,
}

impl Default for GenerativeBuilder {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "t5-base-finetuned-emotion".to_string(),
            device: Device::Cpu,
            max_tokens: 5,
            timeout: Duration::from_secs(60),
            verify: true,
        }
    }
}

impl GenerativeBuilder {
    pub fn base_url(&mut self, url: &str) -> &mut Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn model(&mut self, model: &str) -> &mut Self {
        self.model = model.to_string();
        self
    }

    pub fn device(&mut self, device: Device) -> &mut Self {
        self.device = device;
        self
    }

    pub fn max_tokens(&mut self, max_tokens: u32) -> &mut Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = timeout;
        self
    }

    /// Check model availability when building (default: `true`).
    pub fn verify(&mut self, verify: bool) -> &mut Self {
        self.verify = verify;
        self
    }

    pub fn build(&self) -> Result<GenerativeClient, Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?;

        let generator = GenerativeClient {
            client,
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            options: GenerateOptions::new(self.max_tokens, self.device),
        };

        if self.verify {
            if !generator.is_model_available()? {
                return Err(Error::Backend(format!(
                    "model {} is not served at {}",
                    self.model, self.base_url
                )));
            }
            info!("{}: model available at {}", self.model, self.base_url);
        }

        Ok(generator)
    }
}
