//! Built-in folder layout and extension catalogue

use super::forest::Forest;
use super::node::FolderNode;

/// Name under which the built-in layout is offered alongside saved presets
pub const DEFAULT_PRESET_NAME: &str = "Default";

/// Path of the protected project root
pub const ROOT_MARKER: &str = "Assets/";

/// The built-in project layout. A new forest is built on every call, so
/// callers can never mutate a shared baseline.
pub fn default_forest() -> Forest {
    Forest::new(vec![FolderNode::new("Assets", ROOT_MARKER).with_children(vec![
        FolderNode::new("Art", "Assets/Art").with_children(vec![
            FolderNode::new("Materials", "Assets/Art/Materials")
                .with_extensions(&[".mat", ".physicmaterial"]),
            FolderNode::new("Models", "Assets/Art/Models")
                .with_extensions(&[".fbx", ".obj", ".blend", ".max", ".ma", ".mb"]),
            FolderNode::new("Textures", "Assets/Art/Textures").with_extensions(&[
                ".png", ".jpg", ".jpeg", ".tga", ".psd", ".tiff", ".bmp", ".gif", ".exr", ".hdr",
            ]),
        ]),
        FolderNode::new("Audio", "Assets/Audio").with_children(vec![
            FolderNode::new("Music", "Assets/Audio/Music").with_extensions(&[".mp3", ".ogg"]),
            FolderNode::new("Sound", "Assets/Audio/Sound").with_extensions(&[".wav", ".aif"]),
        ]),
        FolderNode::new("Code", "Assets/Code").with_children(vec![
            FolderNode::new("Scripts", "Assets/Code/Scripts").with_extensions(&[".cs", ".asmdef"]),
            FolderNode::new("Shaders", "Assets/Code/Shaders")
                .with_extensions(&[".shader", ".cginc", ".hlsl", ".compute"]),
        ]),
        FolderNode::new("Docs", "Assets/Docs").with_extensions(&[".txt", ".md"]),
        FolderNode::new("Level", "Assets/Level").with_children(vec![
            FolderNode::new("Prefabs", "Assets/Level/Prefabs").with_extensions(&[".prefab"]),
            FolderNode::new("Scenes", "Assets/Level/Scenes").with_extensions(&[".unity"]),
            FolderNode::new("UI", "Assets/Level/UI"),
        ]),
    ])])
}

// Extensions offered when adding a mapping
const SUGGESTED_EXTENSIONS: &[&str] = &[
    // Textures
    ".png", ".jpg", ".jpeg", ".tga", ".psd", ".tiff", ".bmp", ".gif", ".exr", ".hdr",
    // Models
    ".fbx", ".obj", ".blend", ".max", ".ma", ".mb",
    // Materials
    ".mat", ".physicmaterial",
    // Audio
    ".wav", ".mp3", ".ogg", ".aif",
    // Code / shaders
    ".cs", ".asmdef", ".shader", ".cginc", ".hlsl", ".compute",
    // Engine assets
    ".prefab", ".unity", ".asset", ".anim", ".controller", ".overridecontroller", ".mask",
    ".rendertexture", ".cubemap", ".preset",
    // Fonts
    ".ttf", ".otf",
    // Data / text
    ".txt", ".json", ".xml", ".csv", ".bytes",
    // Video
    ".mp4", ".mov", ".webm",
];

/// Suggested extensions, sorted
pub fn suggested_extensions() -> Vec<&'static str> {
    let mut extensions = SUGGESTED_EXTENSIONS.to_vec();
    extensions.sort_unstable();
    extensions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::extension::normalize_extension;

    #[test]
    fn test_default_forest_is_valid() {
        let forest = default_forest();
        assert!(forest.validate().is_ok());
        assert_eq!(forest.roots().len(), 1);
        assert_eq!(forest.roots()[0].path, ROOT_MARKER);
    }

    #[test]
    fn test_default_forest_has_no_duplicate_mappings() {
        let forest = default_forest();
        let mut seen = std::collections::HashSet::new();
        for (_, node) in forest.walk() {
            for extension in &node.associated_extensions {
                assert!(seen.insert(extension.clone()), "{} mapped twice", extension);
            }
        }
    }

    #[test]
    fn test_default_forest_is_fresh_each_call() {
        let a = default_forest();
        let b = default_forest();
        assert_eq!(a, b);
        assert_ne!(a.roots()[0].id, b.roots()[0].id);
    }

    #[test]
    fn test_default_lookups() {
        let forest = default_forest();
        assert_eq!(forest.find_target_path(".fbx"), Some("Assets/Art/Models"));
        assert_eq!(forest.find_target_path(".unity"), Some("Assets/Level/Scenes"));
        assert_eq!(forest.find_target_path(".pdf"), None);
    }

    #[test]
    fn test_suggested_extensions_are_normalised_and_sorted() {
        let extensions = suggested_extensions();
        for extension in &extensions {
            assert_eq!(normalize_extension(extension).unwrap(), *extension);
        }
        let mut sorted = extensions.clone();
        sorted.sort();
        assert_eq!(extensions, sorted);
    }
}
