//! CLI argument validation functions
//!
//! This module provides custom validation functions for CLI arguments
//! that go beyond what clap can validate automatically.

use serde_json::Value;
use std::fs;
use std::path::PathBuf;

/// Validate that a file path is accessible (exists and is readable)
pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(format!("Configuration file does not exist: '{}'", path_str));
    }

    if !path.is_file() {
        return Err(format!("Configuration path is not a file: '{}'", path_str));
    }

    match fs::File::open(&path) {
        Ok(_) => Ok(path),
        Err(e) => Err(format!("Cannot read configuration file '{}': {}", path_str, e)),
    }
}

/// Parse an inline JSON document
pub fn validate_json(json_str: &str) -> Result<Value, String> {
    serde_json::from_str(json_str).map_err(|e| format!("Invalid JSON: {}", e))
}

/// Topic ids must be non-empty and free of whitespace
pub fn validate_topic(topic_str: &str) -> Result<String, String> {
    let topic = topic_str.trim();

    if topic.is_empty() {
        return Err("Topic cannot be empty".to_string());
    }

    if topic.chars().any(char::is_whitespace) {
        return Err(format!("Topic cannot contain whitespace: '{}'", topic));
    }

    Ok(topic.to_string())
}

/// Validate an absolute http(s) URL
pub fn validate_url(url_str: &str) -> Result<String, String> {
    let url = url::Url::parse(url_str).map_err(|e| format!("Invalid URL '{}': {}", url_str, e))?;

    match url.scheme() {
        "http" | "https" => Ok(url_str.to_string()),
        other => Err(format!("URL scheme must be http or https, got: '{}'", other)),
    }
}
