// In: src/config.rs

//! The single source of truth for buffer I/O configuration.
//!
//! This module defines `IoParams`, which is created once per run by the external
//! driver (in code, or from a JSON document) and then passed by shared reference
//! to every `init_*` and `cleanup_*` call. Buffers never own or mutate it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::KzError;

/// Initial output capacity, in elements, used when nothing else is configured.
pub const DEFAULT_BUFSIZE: usize = 4096;

//==================================================================================
// I. Core Configuration Enums
//==================================================================================

/// The backing store a buffer is bound to.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Device {
    /// **Default:** A real file, read whole at init or written whole at cleanup.
    #[default]
    File,

    /// No backing store. As a source it supplies an endless stream of zeroed
    /// samples; as a destination it discards everything it is given.
    Null,
}

/// How a `File` device encodes its samples.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    /// **Default:** Raw native-endian element arrays. Bits are packed eight per
    /// byte, least significant bit first.
    #[default]
    Binary,

    /// Comma-separated decimal tokens.
    Text,
}

//==================================================================================
// II. The Unified IoParams
//==================================================================================

/// Source and destination configuration for one run of the runtime.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct IoParams {
    #[serde(default)]
    pub source_device: Device,

    /// When `None` with a `File` source, input buffers start empty and report
    /// end-of-data on the first read.
    #[serde(default)]
    pub source_path: Option<PathBuf>,

    #[serde(default)]
    pub source_encoding: Encoding,

    #[serde(default)]
    pub destination_device: Device,

    #[serde(default)]
    pub destination_path: Option<PathBuf>,

    #[serde(default)]
    pub destination_encoding: Encoding,

    /// Initial capacity of output buffers, in elements. Bit buffers count this
    /// in bytes (eight bits each); complex buffers count it in scalars.
    #[serde(default = "default_output_capacity")]
    pub output_capacity: usize,
}

impl Default for IoParams {
    fn default() -> Self {
        Self {
            source_device: Device::default(),
            source_path: None,
            source_encoding: Encoding::default(),
            destination_device: Device::default(),
            destination_path: None,
            destination_encoding: Encoding::default(),
            output_capacity: default_output_capacity(),
        }
    }
}

/// Helper for `serde` to provide a default for `output_capacity`.
fn default_output_capacity() -> usize {
    DEFAULT_BUFSIZE
}

impl IoParams {
    /// Reads the source from `path` using `encoding`.
    pub fn with_source(mut self, path: impl Into<PathBuf>, encoding: Encoding) -> Self {
        self.source_device = Device::File;
        self.source_path = Some(path.into());
        self.source_encoding = encoding;
        self
    }

    /// Writes the destination to `path` using `encoding`.
    pub fn with_destination(mut self, path: impl Into<PathBuf>, encoding: Encoding) -> Self {
        self.destination_device = Device::File;
        self.destination_path = Some(path.into());
        self.destination_encoding = encoding;
        self
    }

    pub fn with_null_source(mut self) -> Self {
        self.source_device = Device::Null;
        self
    }

    pub fn with_null_destination(mut self) -> Self {
        self.destination_device = Device::Null;
        self
    }

    pub fn with_output_capacity(mut self, capacity: usize) -> Self {
        self.output_capacity = capacity;
        self
    }

    /// Parses parameters from a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, KzError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, KzError> {
        let text = std::fs::read_to_string(path).map_err(|e| KzError::file_access(path, e))?;
        Self::from_json_str(&text)
    }
}
