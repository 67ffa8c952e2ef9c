//! Shared helpers for catalog integration tests
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use catalog_sync_lib::domain::{CatalogRecord, PAGE_SIZE};
use catalog_sync_lib::{CatalogError, CatalogSource, PageResponse};
use tokio::sync::Notify;

/// Records `SKU-<start>` .. `SKU-<start+count-1>`
pub fn records(start: usize, count: usize) -> Vec<CatalogRecord> {
    (start..start + count)
        .map(|i| {
            CatalogRecord::new(format!("SKU-{i}"), format!("Producto {i}"), "General")
                .with_images(format!("https://img.example/{i}-a.jpg,https://img.example/{i}-b.jpg"))
        })
        .collect()
}

pub fn page(total_count: u64, start: usize, count: usize) -> PageResponse {
    PageResponse::new(total_count, records(start, count))
}

/// Source replaying a fixed script of responses and remembering requested offsets
pub struct ScriptedSource {
    script: Mutex<VecDeque<Result<PageResponse, CatalogError>>>,
    requested: Mutex<Vec<u64>>,
    page_size: u64,
}

impl ScriptedSource {
    pub fn new(script: Vec<Result<PageResponse, CatalogError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requested: Mutex::new(Vec::new()),
            page_size: PAGE_SIZE,
        }
    }

    /// Feed whose pages hold `page_size` records instead of the standard 1000
    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn push(&self, response: Result<PageResponse, CatalogError>) {
        self.script.lock().unwrap().push_back(response);
    }

    pub fn requested_offsets(&self) -> Vec<u64> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogSource for ScriptedSource {
    async fn fetch_page(&self, offset: u64) -> Result<PageResponse, CatalogError> {
        self.requested.lock().unwrap().push(offset);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CatalogError::transport("script exhausted")))
    }

    fn page_size(&self) -> u64 {
        self.page_size
    }

    fn source_name(&self) -> &str {
        "scripted"
    }
}

/// Source that blocks every fetch until `release` is called
pub struct GatedSource {
    pub entered: Notify,
    gate: Notify,
    response: PageResponse,
}

impl GatedSource {
    pub fn new(response: PageResponse) -> Self {
        Self {
            entered: Notify::new(),
            gate: Notify::new(),
            response,
        }
    }

    pub fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl CatalogSource for GatedSource {
    async fn fetch_page(&self, _offset: u64) -> Result<PageResponse, CatalogError> {
        self.entered.notify_one();
        self.gate.notified().await;
        Ok(self.response.clone())
    }
}
