//! Folder forest and its operations
//!
//! A [`Forest`] is the ordered list of root folders describing the desired
//! project layout. Every traversal is pre-order, depth-first, left to right,
//! so "first match" always means the same node for a given forest.

use super::error::{TreeError, TreeResult};
use super::extension::normalize_extension;
use super::node::{FolderNode, NodeId};
use crate::file::naming::validate_file_name;
use crate::host::AssetHost;
use crate::util::paths::{join_asset_path, split_parent_leaf};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Comparison key for folder paths; `Assets/` and `Assets` are the same folder.
fn path_key(path: &str) -> &str {
    path.trim_end_matches('/')
}

/// Outcome of materialising a forest on disk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnsureReport {
    /// Folders created by this run
    pub created: Vec<String>,
    /// Folders that were already present
    pub existing: Vec<String>,
    /// Nodes skipped because their path is outside the project root
    pub skipped: Vec<String>,
    /// Folders the host failed to create
    pub failed: Vec<String>,
}

impl EnsureReport {
    /// True when every eligible folder now exists
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty() && self.failed.is_empty()
    }
}

/// Pre-order iterator yielding `(depth, node)`
pub struct Walk<'a> {
    stack: Vec<(usize, &'a FolderNode)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a FolderNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        for child in node.children.iter().rev() {
            self.stack.push((depth + 1, child));
        }
        Some((depth, node))
    }
}

/// Ordered collection of root folder nodes
#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Forest {
    roots: Vec<FolderNode>,
}

impl Forest {
    pub fn new(roots: Vec<FolderNode>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &[FolderNode] {
        &self.roots
    }

    pub fn into_roots(self) -> Vec<FolderNode> {
        self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes at every depth
    pub fn node_count(&self) -> usize {
        self.walk().count()
    }

    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: self.roots.iter().rev().map(|node| (0, node)).collect(),
        }
    }

    /// Independent copy with fresh ids at every level.
    pub fn deep_clone(&self) -> Self {
        Self {
            roots: self.roots.iter().map(FolderNode::deep_clone).collect(),
        }
    }

    pub fn find(&self, id: NodeId) -> Option<&FolderNode> {
        self.walk().map(|(_, node)| node).find(|node| node.id == id)
    }

    pub fn find_mut(&mut self, id: NodeId) -> Option<&mut FolderNode> {
        fn search(nodes: &mut [FolderNode], id: NodeId) -> Option<&mut FolderNode> {
            for node in nodes.iter_mut() {
                if node.id == id {
                    return Some(node);
                }
                if let Some(found) = search(&mut node.children, id) {
                    return Some(found);
                }
            }
            None
        }
        search(&mut self.roots, id)
    }

    /// Looks a node up by path, ignoring a trailing `/`.
    pub fn find_by_path(&self, path: &str) -> Option<&FolderNode> {
        let key = path_key(path);
        self.walk()
            .map(|(_, node)| node)
            .find(|node| path_key(&node.path) == key)
    }

    /// The node whose direct children contain `child`. Roots and unknown ids
    /// have no parent.
    pub fn find_parent(&self, child: NodeId) -> Option<&FolderNode> {
        self.walk()
            .map(|(_, node)| node)
            .find(|node| node.children.iter().any(|c| c.id == child))
    }

    /// Path of the first node (pre-order) mapping `extension`.
    ///
    /// `extension` must already be normalised; matching is exact.
    pub fn find_target_path(&self, extension: &str) -> Option<&str> {
        self.walk()
            .map(|(_, node)| node)
            .find(|node| node.has_extension(extension))
            .map(|node| node.path.as_str())
    }

    /// First node other than `excluded` that already maps `extension`.
    pub fn extension_owner(&self, excluded: NodeId, extension: &str) -> Option<&FolderNode> {
        self.walk()
            .map(|(_, node)| node)
            .find(|node| node.id != excluded && node.has_extension(extension))
    }

    /// Add a child folder called `name` under `parent` and return its id.
    pub fn add_folder(&mut self, parent: NodeId, name: &str) -> TreeResult<NodeId> {
        let name = name.trim();
        validate_file_name(name).map_err(|e| TreeError::invalid_name(name, e.to_string()))?;

        let parent_path = self
            .find(parent)
            .map(|node| node.path.clone())
            .ok_or_else(|| TreeError::NodeNotFound(parent.to_string()))?;

        let path = join_asset_path(&parent_path, name);
        if self.find_by_path(&path).is_some() {
            return Err(TreeError::DuplicatePath(path));
        }

        let child = FolderNode::new(name, path);
        let child_id = child.id;
        tracing::debug!("Adding folder '{}' under '{}'", child.path, parent_path);

        self.find_mut(parent)
            .ok_or_else(|| TreeError::NodeNotFound(parent.to_string()))?
            .children
            .push(child);

        Ok(child_id)
    }

    /// Remove a folder and its subtree.
    ///
    /// The node whose path equals `root_marker` is protected.
    pub fn remove_folder(&mut self, id: NodeId, root_marker: &str) -> TreeResult<FolderNode> {
        let node = self
            .find(id)
            .ok_or_else(|| TreeError::NodeNotFound(id.to_string()))?;

        if path_key(&node.path) == path_key(root_marker) {
            return Err(TreeError::ProtectedRoot(node.path.clone()));
        }

        if let Some(pos) = self.roots.iter().position(|root| root.id == id) {
            return Ok(self.roots.remove(pos));
        }

        let parent_id = self
            .find_parent(id)
            .map(|parent| parent.id)
            .ok_or_else(|| TreeError::NodeNotFound(id.to_string()))?;
        let parent = self
            .find_mut(parent_id)
            .ok_or_else(|| TreeError::NodeNotFound(parent_id.to_string()))?;
        let pos = parent
            .children
            .iter()
            .position(|child| child.id == id)
            .ok_or_else(|| TreeError::NodeNotFound(id.to_string()))?;

        let removed = parent.children.remove(pos);
        tracing::debug!("Removed folder '{}'", removed.path);
        Ok(removed)
    }

    /// Map an extension to `node` and return it in normalised form.
    ///
    /// Re-adding an extension the node already holds changes nothing. An
    /// extension owned by any other node is rejected before mutation.
    pub fn add_mapping(&mut self, node: NodeId, raw_extension: &str) -> TreeResult<String> {
        let extension = normalize_extension(raw_extension)?;

        if let Some(owner) = self.extension_owner(node, &extension) {
            return Err(TreeError::ExtensionConflict {
                extension,
                owner_name: owner.display_name.clone(),
                owner_path: owner.path.clone(),
            });
        }

        let target = self
            .find_mut(node)
            .ok_or_else(|| TreeError::NodeNotFound(node.to_string()))?;
        if target.associated_extensions.insert(extension.clone()) {
            tracing::debug!("Mapped '{}' to '{}'", extension, target.path);
        }
        Ok(extension)
    }

    /// Remove a mapping from `node`; returns whether it was present.
    pub fn remove_mapping(&mut self, node: NodeId, raw_extension: &str) -> TreeResult<bool> {
        let extension = normalize_extension(raw_extension)?;
        let target = self
            .find_mut(node)
            .ok_or_else(|| TreeError::NodeNotFound(node.to_string()))?;
        Ok(target.associated_extensions.remove(&extension))
    }

    /// Check the structural invariants of a forest read from outside.
    ///
    /// Duplicate paths are an error, and so is any extension not stored in
    /// normalised form (`.png`, never `PNG`). An extension mapped twice is
    /// tolerated with a warning; lookups resolve it to the first node.
    pub fn validate(&self) -> TreeResult<()> {
        let mut paths = HashSet::new();
        let mut owners: HashMap<&str, &str> = HashMap::new();

        for (_, node) in self.walk() {
            if !paths.insert(path_key(&node.path)) {
                return Err(TreeError::DuplicatePath(node.path.clone()));
            }
            for extension in &node.associated_extensions {
                let normalised = normalize_extension(extension)?;
                if &normalised != extension {
                    return Err(TreeError::invalid_extension(
                        extension.as_str(),
                        format!("stored in '{}' instead of '{}'", node.path, normalised),
                    ));
                }
                match owners.get(extension.as_str()) {
                    Some(first) => tracing::warn!(
                        "Extension '{}' is mapped to both '{}' and '{}'; '{}' wins",
                        extension,
                        first,
                        node.path,
                        first
                    ),
                    None => {
                        owners.insert(extension.as_str(), node.path.as_str());
                    }
                }
            }
        }
        Ok(())
    }

    /// Make sure every eligible folder exists, creating missing ones
    /// parent-first. Per-node failures are logged and traversal goes on.
    pub fn ensure_folders_exist<H>(&self, host: &mut H, root_prefix: &str) -> EnsureReport
    where
        H: AssetHost + ?Sized,
    {
        let mut report = EnsureReport::default();
        for root in &self.roots {
            ensure_node(root, host, root_prefix, &mut report);
        }
        tracing::info!(
            "Folder structure ensured: {} created, {} existing, {} skipped, {} failed",
            report.created.len(),
            report.existing.len(),
            report.skipped.len(),
            report.failed.len()
        );
        report
    }
}

/// A path is eligible for creation when it lives under `root_prefix` and
/// never steps out with `.` or `..` components.
fn is_creatable(path: &str, root_prefix: &str) -> bool {
    if path.trim().is_empty() {
        return false;
    }
    let with_slash = format!("{}/", path_key(path));
    if !with_slash.starts_with(root_prefix) {
        return false;
    }
    !path_key(path)
        .split('/')
        .any(|part| part.is_empty() || part == "." || part == "..")
}

fn ensure_node<H>(node: &FolderNode, host: &mut H, root_prefix: &str, report: &mut EnsureReport)
where
    H: AssetHost + ?Sized,
{
    if !is_creatable(&node.path, root_prefix) {
        tracing::warn!(
            "Skipping folder '{}': path {:?} is not under '{}'",
            node.display_name,
            node.path,
            root_prefix
        );
        report.skipped.push(node.path.clone());
        return;
    }

    if host.folder_exists(&node.path) {
        report.existing.push(node.path.clone());
    } else {
        let (parent, leaf) = split_parent_leaf(&node.path);
        match host.create_folder(parent, leaf) {
            Some(_) => {
                tracing::info!("Created folder: {}", node.path);
                report.created.push(node.path.clone());
            }
            None => {
                tracing::error!("Failed to create folder '{}' in '{}'", leaf, parent);
                report.failed.push(node.path.clone());
            }
        }
    }

    for child in &node.children {
        ensure_node(child, host, root_prefix, report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn art_forest() -> Forest {
        Forest::new(vec![FolderNode::new("Assets", "Assets/").with_children(vec![
            FolderNode::new("Art", "Assets/Art").with_children(vec![
                FolderNode::new("Models", "Assets/Art/Models").with_extensions(&[".fbx", ".obj"]),
                FolderNode::new("Materials", "Assets/Art/Materials").with_extensions(&[".mat"]),
            ]),
            FolderNode::new("Docs", "Assets/Docs"),
        ])])
    }

    fn id_of(forest: &Forest, path: &str) -> NodeId {
        forest.find_by_path(path).unwrap().id
    }

    #[test]
    fn test_walk_is_preorder() {
        let forest = art_forest();
        let order: Vec<(usize, &str)> = forest
            .walk()
            .map(|(depth, node)| (depth, node.path.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                (0, "Assets/"),
                (1, "Assets/Art"),
                (2, "Assets/Art/Models"),
                (2, "Assets/Art/Materials"),
                (1, "Assets/Docs"),
            ]
        );
        assert_eq!(forest.node_count(), 5);
    }

    #[test]
    fn test_find_target_path() {
        let forest = art_forest();
        assert_eq!(forest.find_target_path(".fbx"), Some("Assets/Art/Models"));
        assert_eq!(forest.find_target_path(".obj"), Some("Assets/Art/Models"));
        assert_eq!(forest.find_target_path(".mat"), Some("Assets/Art/Materials"));
        assert_eq!(forest.find_target_path(".pdf"), None);
        // Lookups expect the normalised form
        assert_eq!(forest.find_target_path(".FBX"), None);
    }

    #[test]
    fn test_find_target_path_first_match_wins() {
        let forest = Forest::new(vec![
            FolderNode::new("A", "Assets/").with_children(vec![
                FolderNode::new("Deep", "Assets/A").with_children(vec![
                    FolderNode::new("Deeper", "Assets/A/B").with_extensions(&[".png"]),
                ]),
                FolderNode::new("Later", "Assets/C").with_extensions(&[".png"]),
            ]),
            FolderNode::new("Second root", "Other/").with_extensions(&[".png"]),
        ]);
        assert_eq!(forest.find_target_path(".png"), Some("Assets/A/B"));
    }

    #[test]
    fn test_find_parent() {
        let forest = art_forest();
        let models = id_of(&forest, "Assets/Art/Models");
        let root = id_of(&forest, "Assets/");

        assert_eq!(forest.find_parent(models).unwrap().path, "Assets/Art");
        assert!(forest.find_parent(root).is_none());
        assert!(forest.find_parent(NodeId::new()).is_none());
    }

    #[test]
    fn test_find_parent_uses_identity_not_structure() {
        let forest = art_forest();
        let copy = forest.deep_clone();
        let copied_models = id_of(&copy, "Assets/Art/Models");
        assert!(forest.find_parent(copied_models).is_none());
    }

    #[test]
    fn test_extension_owner_skips_excluded() {
        let forest = art_forest();
        let models = id_of(&forest, "Assets/Art/Models");
        let docs = id_of(&forest, "Assets/Docs");

        assert!(forest.extension_owner(models, ".fbx").is_none());
        assert_eq!(forest.extension_owner(docs, ".fbx").unwrap().path, "Assets/Art/Models");
        assert!(forest.extension_owner(docs, ".wav").is_none());
    }

    #[test]
    fn test_deep_clone_independent_at_every_depth() {
        let forest = art_forest();
        let mut copy = forest.deep_clone();
        assert_eq!(forest, copy);

        let models = id_of(&copy, "Assets/Art/Models");
        copy.add_mapping(models, ".blend").unwrap();
        let art = id_of(&copy, "Assets/Art");
        copy.add_folder(art, "Textures").unwrap();

        assert_ne!(forest, copy);
        assert!(forest.find_by_path("Assets/Art/Textures").is_none());
        assert!(!forest.find_by_path("Assets/Art/Models").unwrap().has_extension(".blend"));
    }

    #[test]
    fn test_add_folder() {
        let mut forest = art_forest();
        let art = id_of(&forest, "Assets/Art");
        let id = forest.add_folder(art, "Textures").unwrap();

        let node = forest.find(id).unwrap();
        assert_eq!(node.path, "Assets/Art/Textures");
        assert_eq!(node.display_name, "Textures");
        assert_eq!(forest.find_parent(id).unwrap().id, art);
    }

    #[test]
    fn test_add_folder_under_root_with_trailing_slash() {
        let mut forest = art_forest();
        let root = id_of(&forest, "Assets/");
        let id = forest.add_folder(root, "Audio").unwrap();
        assert_eq!(forest.find(id).unwrap().path, "Assets/Audio");
    }

    #[test]
    fn test_add_folder_rejects_duplicates_and_bad_names() {
        let mut forest = art_forest();
        let art = id_of(&forest, "Assets/Art");

        assert_eq!(
            forest.add_folder(art, "Models"),
            Err(TreeError::DuplicatePath("Assets/Art/Models".to_string()))
        );
        assert!(matches!(forest.add_folder(art, "a/b"), Err(TreeError::InvalidName { .. })));
        assert!(matches!(forest.add_folder(art, "  "), Err(TreeError::InvalidName { .. })));
        assert!(matches!(
            forest.add_folder(NodeId::new(), "X"),
            Err(TreeError::NodeNotFound(_))
        ));
    }

    #[test]
    fn test_remove_folder_protects_root() {
        let mut forest = art_forest();
        let root = id_of(&forest, "Assets/");
        assert_eq!(
            forest.remove_folder(root, "Assets/"),
            Err(TreeError::ProtectedRoot("Assets/".to_string()))
        );
        assert_eq!(forest.node_count(), 5);
    }

    #[test]
    fn test_remove_folder_from_parent() {
        let mut forest = art_forest();
        let materials = id_of(&forest, "Assets/Art/Materials");

        let removed = forest.remove_folder(materials, "Assets/").unwrap();
        assert_eq!(removed.path, "Assets/Art/Materials");
        assert!(forest.find(materials).is_none());
        assert!(forest.find_by_path("Assets/Art/Materials").is_none());
        assert_eq!(forest.find_by_path("Assets/Art").unwrap().children.len(), 1);
    }

    #[test]
    fn test_remove_unprotected_root() {
        let mut forest = art_forest();
        let mut roots = std::mem::take(&mut forest).into_roots();
        roots.push(FolderNode::new("Packages", "Packages/"));
        let mut forest = Forest::new(roots);

        let packages = id_of(&forest, "Packages/");
        forest.remove_folder(packages, "Assets/").unwrap();
        assert_eq!(forest.roots().len(), 1);
    }

    #[test]
    fn test_add_mapping_normalises() {
        let mut forest = art_forest();
        let docs = id_of(&forest, "Assets/Docs");
        assert_eq!(forest.add_mapping(docs, "PDF").unwrap(), ".pdf");
        assert_eq!(forest.find_target_path(".pdf"), Some("Assets/Docs"));
    }

    #[test]
    fn test_add_mapping_conflict_leaves_tree_untouched() {
        let mut forest = art_forest();
        let docs = id_of(&forest, "Assets/Docs");

        let err = forest.add_mapping(docs, ".FBX").unwrap_err();
        assert_eq!(
            err,
            TreeError::ExtensionConflict {
                extension: ".fbx".to_string(),
                owner_name: "Models".to_string(),
                owner_path: "Assets/Art/Models".to_string(),
            }
        );
        assert!(forest.find(docs).unwrap().associated_extensions.is_empty());
        assert_eq!(forest.find_target_path(".fbx"), Some("Assets/Art/Models"));
    }

    #[test]
    fn test_add_mapping_to_current_owner_is_noop() {
        let mut forest = art_forest();
        let models = id_of(&forest, "Assets/Art/Models");
        assert_eq!(forest.add_mapping(models, ".fbx").unwrap(), ".fbx");
        assert_eq!(forest.find(models).unwrap().associated_extensions.len(), 2);
    }

    #[test]
    fn test_remove_mapping() {
        let mut forest = art_forest();
        let models = id_of(&forest, "Assets/Art/Models");
        assert!(forest.remove_mapping(models, "OBJ").unwrap());
        assert!(!forest.remove_mapping(models, ".obj").unwrap());
        assert_eq!(forest.find_target_path(".obj"), None);
    }

    #[test]
    fn test_validate_rejects_duplicate_paths() {
        let forest = Forest::new(vec![FolderNode::new("Assets", "Assets/").with_children(vec![
            FolderNode::new("One", "Assets/Art"),
            FolderNode::new("Two", "Assets/Art/"),
        ])]);
        assert_eq!(
            forest.validate(),
            Err(TreeError::DuplicatePath("Assets/Art/".to_string()))
        );
        assert!(art_forest().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unnormalised_extensions() {
        for raw in ["PNG", ".PNG", "png", ". png"] {
            let forest = Forest::new(vec![FolderNode::new("Assets", "Assets/").with_children(vec![
                FolderNode::new("Tex", "Assets/Tex").with_extensions(&[raw]),
                FolderNode::new("Img", "Assets/Img"),
            ])]);
            assert!(
                matches!(forest.validate(), Err(TreeError::InvalidExtension { .. })),
                "{:?} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_ensure_continues_after_failed_folder() {
        struct FailingHost {
            created: Vec<String>,
            fail_leaf: &'static str,
        }

        impl AssetHost for FailingHost {
            fn folder_exists(&self, path: &str) -> bool {
                self.created.iter().any(|p| path_key(p) == path_key(path))
            }

            fn asset_exists(&self, _path: &str) -> bool {
                false
            }

            fn create_folder(&mut self, parent: &str, leaf: &str) -> Option<String> {
                if leaf == self.fail_leaf {
                    return None;
                }
                let path = join_asset_path(parent, leaf);
                self.created.push(path.clone());
                Some(path)
            }

            fn move_asset(&mut self, _from: &str, _to: &str) -> Result<(), String> {
                Err("unsupported".to_string())
            }

            fn refresh(&mut self) {}
        }

        let forest = Forest::new(vec![FolderNode::new("Assets", "Assets/").with_children(vec![
            FolderNode::new("A", "Assets/A")
                .with_children(vec![FolderNode::new("B", "Assets/A/B")]),
            FolderNode::new("C", "Assets/C"),
        ])]);
        let mut host = FailingHost {
            created: Vec::new(),
            fail_leaf: "A",
        };

        let report = forest.ensure_folders_exist(&mut host, "Assets/");

        assert_eq!(report.failed, vec!["Assets/A".to_string()]);
        assert_eq!(
            report.created,
            vec!["Assets/".to_string(), "Assets/A/B".to_string(), "Assets/C".to_string()]
        );
        assert!(report.skipped.is_empty());
        assert!(!report.is_complete());
    }

    #[test]
    fn test_is_creatable() {
        assert!(is_creatable("Assets/", "Assets/"));
        assert!(is_creatable("Assets", "Assets/"));
        assert!(is_creatable("Assets/Art/Models", "Assets/"));
        assert!(!is_creatable("", "Assets/"));
        assert!(!is_creatable("AssetsExtra/Art", "Assets/"));
        assert!(!is_creatable("Packages/Art", "Assets/"));
        assert!(!is_creatable("Assets/../Secrets", "Assets/"));
    }
}
