//! Figma integration.
//!
//! This module provides:
//! - [`DesignSource`] - the seam the pipeline reads design data through
//! - [`FigmaClient`] - HTTP implementation over the Figma REST API
//! - API types for parsing Figma JSON responses

pub mod api_types;
pub mod client;

pub use api_types::{
    DocumentNode, FigmaFile, FigmaImageExport, FigmaNodeWrapper, FigmaNodesResponse, ImageFormat,
    NodeType,
};
pub use client::{FigmaAuth, FigmaClient};

use async_trait::async_trait;

use crate::Result;

/// Source of design documents and rendered previews.
#[async_trait]
pub trait DesignSource: Send + Sync {
    /// Full document tree of a file.
    async fn fetch_file(&self, file_id: &str) -> Result<FigmaFile>;

    /// Sub-documents for a batch of node ids, in one request.
    async fn fetch_nodes(&self, file_id: &str, node_ids: &[String]) -> Result<FigmaNodesResponse>;

    /// Rendered preview URLs for a batch of node ids, in one request.
    async fn fetch_images(&self, file_id: &str, node_ids: &[String]) -> Result<FigmaImageExport>;
}
