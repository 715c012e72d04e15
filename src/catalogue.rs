//! Flattening a design tree into the list of nodes a user can pick from.

use serde::{Deserialize, Serialize};

use crate::figma::DocumentNode;

/// Names starting with this prefix are private by convention.
const PRIVATE_PREFIX: char = '_';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogueEntry {
    pub id: String,
    pub name: String,
}

/// Build the catalogue for a file root (a `DOCUMENT` whose children are pages).
///
/// Pages are walked depth-first, pre-order. A node is selectable when it is a
/// frame, component or component set, has children, and is not private.
/// Hidden nodes are skipped together with their whole subtree; every other
/// node is descended into, selectable or not.
pub fn build_catalogue(root: &DocumentNode) -> Vec<CatalogueEntry> {
    let mut entries = Vec::new();
    for page in &root.children {
        collect(page, &mut entries);
    }
    entries
}

fn collect(node: &DocumentNode, out: &mut Vec<CatalogueEntry>) {
    if node.is_hidden() {
        return;
    }
    if is_selectable(node) {
        out.push(CatalogueEntry {
            id: node.id.clone(),
            name: display_name(node),
        });
    }
    for child in &node.children {
        collect(child, out);
    }
}

fn is_selectable(node: &DocumentNode) -> bool {
    node.node_type.is_container_candidate()
        && !node.children.is_empty()
        && !node.name.starts_with(PRIVATE_PREFIX)
}

fn display_name(node: &DocumentNode) -> String {
    if node.name.is_empty() {
        "Unnamed".to_string()
    } else {
        node.name.clone()
    }
}

/// Name of the entry with `id`, if catalogued.
pub fn entry_name<'a>(catalogue: &'a [CatalogueEntry], id: &str) -> Option<&'a str> {
    catalogue
        .iter()
        .find(|entry| entry.id == id)
        .map(|entry| entry.name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figma::NodeType;

    fn node(id: &str, name: &str, node_type: NodeType, children: Vec<DocumentNode>) -> DocumentNode {
        DocumentNode {
            id: id.to_string(),
            name: name.to_string(),
            node_type,
            visible: None,
            children,
        }
    }

    fn leaf(id: &str) -> DocumentNode {
        node(id, "Label", NodeType::Text, vec![])
    }

    fn document(pages: Vec<DocumentNode>) -> DocumentNode {
        node("0:0", "Document", NodeType::Document, pages)
    }

    fn ids(entries: &[CatalogueEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn collects_frames_components_and_sets_in_preorder() {
        let page = node(
            "0:1",
            "Page 1",
            NodeType::Canvas,
            vec![
                node(
                    "1:1",
                    "Card",
                    NodeType::Frame,
                    vec![node("1:2", "Badge", NodeType::Component, vec![leaf("1:3")])],
                ),
                node("2:1", "Buttons", NodeType::ComponentSet, vec![leaf("2:2")]),
            ],
        );
        let entries = build_catalogue(&document(vec![page]));
        assert_eq!(ids(&entries), vec!["1:1", "1:2", "2:1"]);
        assert_eq!(entries[0].name, "Card");
    }

    #[test]
    fn skips_empty_containers_and_other_types() {
        let page = node(
            "0:1",
            "Page",
            NodeType::Canvas,
            vec![
                node("1:1", "Empty", NodeType::Frame, vec![]),
                node("1:2", "Group", NodeType::Group, vec![leaf("1:3")]),
                node("1:4", "Instance", NodeType::Instance, vec![leaf("1:5")]),
            ],
        );
        assert!(build_catalogue(&document(vec![page])).is_empty());
    }

    #[test]
    fn descends_through_non_selectable_containers() {
        let page = node(
            "0:1",
            "Page",
            NodeType::Canvas,
            vec![node(
                "1:1",
                "Wrapper",
                NodeType::Group,
                vec![node(
                    "1:2",
                    "_private",
                    NodeType::Frame,
                    vec![node("1:3", "Deep", NodeType::Frame, vec![leaf("1:4")])],
                )],
            )],
        );
        assert_eq!(ids(&build_catalogue(&document(vec![page]))), vec!["1:3"]);
    }

    #[test]
    fn hidden_subtrees_are_excluded_at_any_depth() {
        let mut hidden = node(
            "1:2",
            "Hidden",
            NodeType::Frame,
            vec![node("1:3", "Inside", NodeType::Component, vec![leaf("1:4")])],
        );
        hidden.visible = Some(false);
        let mut shown = node("1:5", "Shown", NodeType::Frame, vec![leaf("1:6")]);
        shown.visible = Some(true);
        let page = node(
            "0:1",
            "Page",
            NodeType::Canvas,
            vec![node("1:1", "Outer", NodeType::Frame, vec![hidden, shown])],
        );
        assert_eq!(
            ids(&build_catalogue(&document(vec![page]))),
            vec!["1:1", "1:5"]
        );
    }

    #[test]
    fn hidden_page_hides_everything_on_it() {
        let mut page = node(
            "0:1",
            "Page",
            NodeType::Canvas,
            vec![node("1:1", "Card", NodeType::Frame, vec![leaf("1:2")])],
        );
        page.visible = Some(false);
        assert!(build_catalogue(&document(vec![page])).is_empty());
    }

    #[test]
    fn keeps_page_order_across_pages() {
        let first = node(
            "0:1",
            "A",
            NodeType::Canvas,
            vec![node("1:1", "One", NodeType::Frame, vec![leaf("1:2")])],
        );
        let second = node(
            "0:2",
            "B",
            NodeType::Canvas,
            vec![node("2:1", "Two", NodeType::Frame, vec![leaf("2:2")])],
        );
        assert_eq!(
            ids(&build_catalogue(&document(vec![first, second]))),
            vec!["1:1", "2:1"]
        );
    }

    #[test]
    fn unnamed_nodes_get_a_placeholder() {
        let page = node(
            "0:1",
            "Page",
            NodeType::Canvas,
            vec![node("1:1", "", NodeType::Frame, vec![leaf("1:2")])],
        );
        let entries = build_catalogue(&document(vec![page]));
        assert_eq!(entries[0].name, "Unnamed");
        assert_eq!(entry_name(&entries, "1:1"), Some("Unnamed"));
        assert_eq!(entry_name(&entries, "9:9"), None);
    }

    #[test]
    fn deserializes_tree_from_api_json() {
        let json = r#"{
            "id": "0:0", "name": "Document", "type": "DOCUMENT",
            "children": [{
                "id": "0:1", "name": "Page", "type": "CANVAS",
                "children": [
                    {"id": "1:1", "name": "Hero", "type": "FRAME", "absoluteBoundingBox": {"x": 0},
                     "children": [{"id": "1:2", "name": "T", "type": "TEXT", "characters": "hi"}]},
                    {"id": "1:3", "name": "Ghost", "type": "FRAME", "visible": false,
                     "children": [{"id": "1:4", "name": "S", "type": "STAR"}]}
                ]
            }]
        }"#;
        let root: DocumentNode = serde_json::from_str(json).expect("parse tree");
        assert_eq!(ids(&build_catalogue(&root)), vec!["1:1"]);
    }
}
