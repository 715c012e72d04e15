//! Figma Builder Library
//!
//! Turns the frames and components of a Figma file into React/Tailwind
//! component files: parse a design URL, list the selectable nodes, let the
//! user pick some, send each picked node to an LLM completion service and
//! package the results.
//!
//! # Module Overview
//!
//! - [`reference`] - Figma URL parsing
//! - [`figma`] - Figma API types, client and the [`DesignSource`] seam
//! - [`catalogue`] - flattening the document tree into selectable nodes
//! - [`selection`] - the user's picks
//! - [`thumbnails`] - preview images for the catalogue
//! - [`completion`] - LLM completion client and the [`CodeGenerator`] seam
//! - [`generate`] - the per-node generation loop
//! - [`package`] - zip archive, single-file export and persistence
//! - [`session`] - the state tying the steps together
//!
//! # Example
//!
//! ```no_run
//! use figbuild_lib::{CompletionClient, CompletionConfig, FigmaAuth, FigmaClient, Session};
//! use figbuild_lib::generate::GenerationOptions;
//!
//! # async fn example() -> figbuild_lib::Result<()> {
//! let figma = FigmaClient::new(FigmaAuth::require_from_env()?)?;
//! let llm = CompletionClient::new(CompletionConfig::default())?;
//!
//! let mut session = Session::default();
//! session.set_url("https://www.figma.com/design/AbCdEfGhIjKlMnOpQrStUv/App?node-id=1-2");
//! session.load_file(&figma).await?;
//! session.select_all();
//! session.generate_selected(&figma, &llm, &GenerationOptions::default()).await?;
//! let (file_name, zip_bytes) = session.archive()?;
//! # Ok(())
//! # }
//! ```

pub mod artifact;
pub mod catalogue;
pub mod completion;
pub mod config;
pub mod error;
pub mod figma;
pub mod generate;
pub mod logging;
pub mod models;
pub mod output;
pub mod package;
pub mod progress;
pub mod reference;
pub mod selection;
pub mod session;
pub mod thumbnails;

pub use artifact::{component_file_name, GeneratedArtifact};
pub use catalogue::{build_catalogue, CatalogueEntry};
pub use completion::{CodeGenerator, CompletionClient, CompletionConfig, GenerationRequest};
pub use config::Config;
pub use error::{BuildError, Result};
pub use figma::{DesignSource, DocumentNode, FigmaAuth, FigmaClient, NodeType};
pub use generate::{generate, GenerationOptions, GenerationReport};
pub use output::{BuildOutput, ErrorOutput, OUTPUT_VERSION};
pub use package::{save_artifact, to_archive, to_single_file, ExportedFile};
pub use progress::{PipelineStatus, ProgressCallback};
pub use reference::{normalize_node_id, parse_reference, ParsedReference};
pub use selection::SelectionSet;
pub use session::Session;
pub use thumbnails::{fetch_thumbnails, ThumbnailMap};
