use std::collections::HashSet;
use std::io::Read;
use std::sync::Mutex;

use async_trait::async_trait;
use figbuild_lib::figma::{FigmaFile, FigmaImageExport, FigmaNodesResponse};
use figbuild_lib::{
    save_artifact, BuildError, CodeGenerator, DesignSource, GenerationOptions, GenerationRequest,
    Result, Session,
};
use serde_json::{json, Value};
use zip::ZipArchive;

const URL: &str = "https://www.figma.com/design/AbCdEfGhIjKlMnOpQrStUv/App";

fn frame(id: &str, name: &str, node_type: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "type": node_type,
        "children": [{ "id": format!("{id}-t"), "name": "Label", "type": "TEXT" }]
    })
}

fn design_file() -> Value {
    json!({
        "name": "Design System",
        "document": {
            "id": "0:0",
            "name": "Document",
            "type": "DOCUMENT",
            "children": [{
                "id": "0:1",
                "name": "Page 1",
                "type": "CANVAS",
                "children": [
                    frame("1:1", "Card", "FRAME"),
                    frame("1:2", "Hero", "FRAME"),
                    frame("1:3", "Footer", "COMPONENT"),
                    frame("1:4", "_scratch", "FRAME")
                ]
            }]
        }
    })
}

/// In-memory design source. Node ids in `missing` are left out of batched
/// node responses.
struct FakeSource {
    file: Value,
    missing: HashSet<String>,
    fail_images: bool,
    fail_nodes: bool,
}

impl FakeSource {
    fn new() -> Self {
        Self {
            file: design_file(),
            missing: HashSet::new(),
            fail_images: false,
            fail_nodes: false,
        }
    }
}

#[async_trait]
impl DesignSource for FakeSource {
    async fn fetch_file(&self, _file_id: &str) -> Result<FigmaFile> {
        Ok(serde_json::from_value(self.file.clone())?)
    }

    async fn fetch_nodes(&self, _file_id: &str, node_ids: &[String]) -> Result<FigmaNodesResponse> {
        if self.fail_nodes {
            return Err(BuildError::figma_api(None, "Internal error"));
        }
        let nodes: serde_json::Map<String, Value> = node_ids
            .iter()
            .filter(|id| !self.missing.contains(*id))
            .map(|id| (id.clone(), json!({ "document": { "id": id, "type": "FRAME" } })))
            .collect();
        Ok(serde_json::from_value(json!({ "nodes": nodes }))?)
    }

    async fn fetch_images(&self, _file_id: &str, node_ids: &[String]) -> Result<FigmaImageExport> {
        if self.fail_images {
            return Err(BuildError::figma_api(None, "Render timeout"));
        }
        let images: serde_json::Map<String, Value> = node_ids
            .iter()
            .map(|id| (id.clone(), json!(format!("https://img.example/{id}.svg"))))
            .collect();
        Ok(serde_json::from_value(json!({ "err": null, "images": images }))?)
    }
}

/// Records the component names it was asked for; fails for `fail_on`.
#[derive(Default)]
struct FakeGenerator {
    fail_on: Option<String>,
    requested: Mutex<Vec<String>>,
}

impl FakeGenerator {
    fn requested(&self) -> Vec<String> {
        self.requested.lock().expect("lock").clone()
    }
}

#[async_trait]
impl CodeGenerator for FakeGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        self.requested
            .lock()
            .expect("lock")
            .push(request.component_name.clone());
        if self.fail_on.as_deref() == Some(request.component_name.as_str()) {
            return Err(BuildError::completion(None, "HF API error: Bad Gateway"));
        }
        Ok(format!(
            "export default function {}() {{ return <div />; }}",
            request.component_name
        ))
    }
}

async fn loaded_session(source: &FakeSource, url: &str) -> Session {
    let mut session = Session::default();
    assert!(session.set_url(url).is_some());
    session.load_file(source).await.expect("load file");
    session
}

#[tokio::test]
async fn load_builds_catalogue_and_previews() {
    let source = FakeSource::new();
    let session = loaded_session(&source, URL).await;

    let names: Vec<&str> = session.catalogue().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Card", "Hero", "Footer"]);
    assert_eq!(session.file_name(), Some("Design System"));
    assert_eq!(session.status(), "Loaded 3 components");
    assert_eq!(session.thumbnails().len(), 3);
    assert!(session.selection().is_empty());
}

#[tokio::test]
async fn url_node_id_preselects_that_node() {
    let source = FakeSource::new();
    let session = loaded_session(&source, &format!("{URL}?node-id=1-2")).await;

    assert_eq!(session.selection().ids(), ["1:2".to_string()]);
}

#[tokio::test]
async fn thumbnail_failure_leaves_catalogue_usable() {
    let mut source = FakeSource::new();
    source.fail_images = true;
    let session = loaded_session(&source, URL).await;

    assert!(session.thumbnails().is_empty());
    assert_eq!(session.catalogue().len(), 3);
    assert_eq!(session.status(), "Loaded 3 components");
}

#[tokio::test]
async fn empty_file_reports_no_components() {
    let mut source = FakeSource::new();
    source.file = json!({
        "name": "Empty",
        "document": { "id": "0:0", "type": "DOCUMENT", "children": [
            { "id": "0:1", "type": "CANVAS", "name": "Page", "children": [] }
        ]}
    });
    let mut session = Session::default();
    session.set_url(URL);

    let err = session.load_file(&source).await.unwrap_err();
    assert!(matches!(err, BuildError::EmptyCatalogue));
    assert_eq!(session.status(), "Error: No frames/components found");
}

#[tokio::test]
async fn reload_after_select_all_drops_stale_selection() {
    let source = FakeSource::new();
    let mut session = loaded_session(&source, URL).await;
    session.select_all();
    assert_eq!(session.selection().len(), 3);

    session.set_url(format!("{URL}?node-id=1:3"));
    session.load_file(&source).await.expect("reload");
    assert_eq!(session.selection().ids(), ["1:3".to_string()]);
}

#[tokio::test]
async fn missing_nodes_are_skipped() {
    let mut source = FakeSource::new();
    source.missing.insert("1:2".to_string());
    let generator = FakeGenerator::default();
    let mut session = loaded_session(&source, URL).await;
    session.select_all();

    let artifacts = session
        .generate_selected(&source, &generator, &GenerationOptions::default())
        .await
        .expect("generate");
    let names: Vec<&str> = artifacts.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Card.tsx", "Footer.tsx"]);
    assert_eq!(session.skipped(), ["1:2".to_string()]);
    assert_eq!(session.status(), "Success! 2 components generated");
}

#[tokio::test]
async fn completion_failure_stops_the_run_and_keeps_earlier_output() {
    let source = FakeSource::new();
    let generator = FakeGenerator {
        fail_on: Some("Hero".to_string()),
        ..Default::default()
    };
    let mut session = loaded_session(&source, URL).await;
    session.select_all();

    let err = session
        .generate_selected(&source, &generator, &GenerationOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, BuildError::GenerationFailed { ref component, .. } if component == "Hero"));
    assert_eq!(generator.requested(), vec!["Card", "Hero"]);
    assert_eq!(session.generated().len(), 1);
    assert_eq!(session.generated()[0].name, "Card.tsx");
    assert_eq!(session.status(), "Error: Code generation failed");
    assert_eq!(session.selection().len(), 3);
}

#[tokio::test]
async fn node_fetch_failure_generates_nothing() {
    let mut source = FakeSource::new();
    let generator = FakeGenerator::default();
    let mut session = loaded_session(&source, URL).await;
    session.select_all();
    source.fail_nodes = true;

    let err = session
        .generate_selected(&source, &generator, &GenerationOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, BuildError::FetchNodesFailed(_)));
    assert!(generator.requested().is_empty());
    assert!(session.generated().is_empty());
    assert_eq!(session.status(), "Error: Failed to fetch nodes");
}

#[tokio::test]
async fn generating_without_selection_is_rejected() {
    let source = FakeSource::new();
    let generator = FakeGenerator::default();
    let mut session = loaded_session(&source, URL).await;

    let err = session
        .generate_selected(&source, &generator, &GenerationOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, BuildError::NoSelection(_)));
    assert!(generator.requested().is_empty());
}

#[tokio::test]
async fn cancelled_run_requests_nothing() {
    let source = FakeSource::new();
    let generator = FakeGenerator::default();
    let mut session = loaded_session(&source, URL).await;
    session.select_all();

    let options = GenerationOptions::default();
    options.cancel.cancel();
    let err = session
        .generate_selected(&source, &generator, &options)
        .await
        .unwrap_err();
    assert!(matches!(err, BuildError::Cancelled));
    assert!(generator.requested().is_empty());
}

#[tokio::test]
async fn archive_holds_one_entry_per_component_under_project_folder() {
    let source = FakeSource::new();
    let generator = FakeGenerator::default();
    let mut session = loaded_session(&source, URL).await;
    session.set_project_name("demo-app");
    session.toggle("1:3");
    session.toggle("1:1");
    session
        .generate_selected(&source, &generator, &GenerationOptions::default())
        .await
        .expect("generate");

    let (file_name, bytes) = session.archive().expect("archive");
    assert_eq!(file_name, "demo-app.zip");

    let mut archive = ZipArchive::new(std::io::Cursor::new(bytes)).expect("read zip");
    let mut footer = String::new();
    archive
        .by_name("demo-app/Footer.tsx")
        .expect("footer entry")
        .read_to_string(&mut footer)
        .expect("read footer");
    assert!(footer.contains("function Footer()"));
    assert!(archive.by_name("demo-app/Card.tsx").is_ok());

    let single = session.export_single("Card.tsx").expect("single file");
    assert_eq!(single.content_type, "text/plain");
    assert_eq!(single.bytes, session.generated()[1].code.as_bytes());
}

#[tokio::test]
async fn components_sharing_a_name_are_all_archived_and_saved() {
    let mut source = FakeSource::new();
    source.file = json!({
        "name": "Duplicates",
        "document": { "id": "0:0", "type": "DOCUMENT", "children": [{
            "id": "0:1", "type": "CANVAS", "name": "Page", "children": [
                frame("2:1", "Frame 1", "FRAME"),
                frame("2:2", "Frame 1", "FRAME"),
                frame("2:3", "Frame 1", "COMPONENT")
            ]
        }]}
    });
    let generator = FakeGenerator::default();
    let mut session = loaded_session(&source, URL).await;
    session.set_project_name("dupes");
    session.select_all();
    session
        .generate_selected(&source, &generator, &GenerationOptions::default())
        .await
        .expect("generate");

    let names: Vec<&str> = session.generated().iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Frame1.tsx", "Frame1_2.tsx", "Frame1_3.tsx"]);

    let (_, bytes) = session.archive().expect("archive with repeated names");
    let mut archive = ZipArchive::new(std::io::Cursor::new(bytes)).expect("read zip");
    for name in &names {
        assert!(archive.by_name(&format!("dupes/{name}")).is_ok(), "missing {name}");
    }

    let dir = tempfile::TempDir::new().expect("tempdir");
    for artifact in session.generated() {
        let stem = artifact.name.trim_end_matches(".tsx");
        save_artifact(dir.path(), session.project_name(), stem, &artifact.code).expect("save");
    }
    let saved = std::fs::read_dir(dir.path().join("dupes")).expect("project dir").count();
    assert_eq!(saved, 3);
}

#[tokio::test]
async fn selecting_an_already_seeded_node_keeps_it() {
    let source = FakeSource::new();
    let mut session = loaded_session(&source, &format!("{URL}?node-id=1-2")).await;

    assert!(!session.select("1:2"));
    assert!(session.select("1:3"));
    assert_eq!(
        session.selection().ids(),
        ["1:2".to_string(), "1:3".to_string()]
    );
}
