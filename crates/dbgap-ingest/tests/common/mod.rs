//! Shared helpers for dbgap-ingest integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use dbgap_common::{DbgapError, Result};
use dbgap_ingest::StudyDownloader;
use std::collections::HashMap;
use std::sync::Mutex;

/// GaPExchange record for phs000123.v4.p5
pub const EXAMPLE_RECORD: &str = include_str!("../fixtures/GapExchange_phs000123.v4.p5.xml");

pub const EXAMPLE_PATH: &str =
    "/dbgap/studies/phs000123/phs000123.v4.p5/GapExchange_phs000123.v4.p5.xml";

/// Serves files and listings from memory and records every requested path
#[derive(Default)]
pub struct InMemoryDownloader {
    files: HashMap<String, String>,
    listings: HashMap<String, Vec<String>>,
    requests: Mutex<Vec<String>>,
}

impl InMemoryDownloader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(path.to_string(), content.to_string());
        self
    }

    pub fn with_listing(mut self, path: &str, names: &[&str]) -> Self {
        self.listings
            .insert(path.to_string(), names.iter().map(|n| n.to_string()).collect());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl StudyDownloader for InMemoryDownloader {
    async fn download(&self, path: &str) -> Result<String> {
        self.requests.lock().unwrap().push(path.to_string());
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| DbgapError::Network(format!("550 {}: No such file", path)))
    }

    async fn list_files(&self, path: &str) -> Result<Vec<String>> {
        self.requests.lock().unwrap().push(path.to_string());
        self.listings
            .get(path)
            .cloned()
            .ok_or_else(|| DbgapError::Network(format!("550 {}: No such directory", path)))
    }

    fn location(&self) -> String {
        "memory://".to_string()
    }
}
