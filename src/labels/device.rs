//! Compute device selector.
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Where model inference runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Device {
    #[default]
    Cpu,
    /// Accelerator index (`cuda:0` is `Accelerator(0)`).
    Accelerator(u32),
}

impl FromStr for Device {
    type Err = Error;

    /// Accepts `cpu`, `-1`, `cuda:N`, `gpu:N` and `N`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        if s == "cpu" || s == "-1" {
            return Ok(Device::Cpu);
        }

        let idx = s
            .strip_prefix("cuda:")
            .or_else(|| s.strip_prefix("gpu:"))
            .unwrap_or(&s);

        idx.parse::<u32>()
            .map(Device::Accelerator)
            .map_err(|_| Error::InvalidDevice(s.clone()))
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
            Device::Accelerator(i) => write!(f, "cuda:{i}"),
        }
    }
}
