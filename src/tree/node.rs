use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

/// Stable identity of a folder node inside one forest.
///
/// Ids are never written to preset files. Every load and every deep clone
/// hands out fresh ones, so an id from one forest never matches a node of
/// another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One folder of the desired project layout
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderNode {
    #[serde(skip, default = "NodeId::new")]
    pub id: NodeId,
    /// Label shown to the user
    pub display_name: String,
    /// Project-relative path, `/` separated
    pub path: String,
    #[serde(default)]
    pub children: Vec<FolderNode>,
    /// Normalised extensions (`.png`) whose files belong in this folder
    #[serde(default)]
    pub associated_extensions: BTreeSet<String>,
}

impl FolderNode {
    pub fn new(display_name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            display_name: display_name.into(),
            path: path.into(),
            children: Vec::new(),
            associated_extensions: BTreeSet::new(),
        }
    }

    /// Builder-style child append, used for hard-coded trees
    pub fn with_children(mut self, children: Vec<FolderNode>) -> Self {
        self.children = children;
        self
    }

    /// Builder-style mapping; extensions must already be normalised
    pub fn with_extensions(mut self, extensions: &[&str]) -> Self {
        self.associated_extensions = extensions.iter().map(|e| e.to_string()).collect();
        self
    }

    /// Independent copy of this node and its whole subtree with fresh ids.
    pub fn deep_clone(&self) -> Self {
        Self {
            id: NodeId::new(),
            display_name: self.display_name.clone(),
            path: self.path.clone(),
            children: self.children.iter().map(FolderNode::deep_clone).collect(),
            associated_extensions: self.associated_extensions.clone(),
        }
    }

    pub fn has_extension(&self, extension: &str) -> bool {
        self.associated_extensions.contains(extension)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Structural equality; ids are ignored.
impl PartialEq for FolderNode {
    fn eq(&self, other: &Self) -> bool {
        self.display_name == other.display_name
            && self.path == other.path
            && self.associated_extensions == other.associated_extensions
            && self.children == other.children
    }
}

impl Eq for FolderNode {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> FolderNode {
        FolderNode::new("Art", "Assets/Art").with_children(vec![
            FolderNode::new("Models", "Assets/Art/Models").with_extensions(&[".fbx", ".obj"]),
            FolderNode::new("Materials", "Assets/Art/Materials").with_extensions(&[".mat"]),
        ])
    }

    #[test]
    fn test_deep_clone_is_structurally_equal() {
        let node = sample();
        let copy = node.deep_clone();
        assert_eq!(node, copy);
        assert_ne!(node.id, copy.id);
        assert_ne!(node.children[0].id, copy.children[0].id);
    }

    #[test]
    fn test_deep_clone_is_independent() {
        let node = sample();
        let mut copy = node.deep_clone();

        copy.children[0].associated_extensions.insert(".blend".to_string());
        copy.children[1].children.push(FolderNode::new("Extra", "Assets/Art/Materials/Extra"));
        copy.display_name = "Changed".to_string();

        assert!(!node.children[0].has_extension(".blend"));
        assert!(node.children[1].is_leaf());
        assert_eq!(node.display_name, "Art");
    }

    #[test]
    fn test_deep_clone_empty_extensions_are_fresh() {
        let node = FolderNode::new("Docs", "Assets/Docs");
        let mut copy = node.deep_clone();
        copy.associated_extensions.insert(".md".to_string());
        assert!(node.associated_extensions.is_empty());
    }

    #[test]
    fn test_serialization_uses_camel_case_and_skips_id() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(json.contains("\"displayName\":\"Art\""));
        assert!(json.contains("\"associatedExtensions\":[\".fbx\",\".obj\"]"));
        assert!(!json.contains("\"id\""));
    }

    #[test]
    fn test_deserialization_defaults_missing_lists() {
        let node: FolderNode =
            serde_json::from_str(r#"{"displayName":"Docs","path":"Assets/Docs"}"#).unwrap();
        assert!(node.children.is_empty());
        assert!(node.associated_extensions.is_empty());
    }
}
