use crate::organiser::{MoveOutcome, PendingMove};
use crate::tree::{EnsureReport, Forest};
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

/// Pad `text` with spaces up to `width` terminal columns
pub fn pad_to_width(text: &str, width: usize) -> String {
    let current = text.width();
    if current >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - current))
    }
}

/// Render a forest as an indented tree with its extensions in a column
pub fn format_tree(forest: &Forest, json: bool) -> String {
    if json {
        return serde_json::to_string_pretty(forest).unwrap_or_else(|_| "[]".to_string());
    }

    if forest.is_empty() {
        return "Empty folder structure.".to_string();
    }

    let labels: Vec<(String, String)> = forest
        .walk()
        .map(|(depth, node)| {
            let label = format!("{}{}", "  ".repeat(depth), node.display_name);
            let extensions = node
                .associated_extensions
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(" ");
            (label, extensions)
        })
        .collect();

    let column = labels.iter().map(|(label, _)| label.width()).max().unwrap_or(0) + 2;

    labels
        .into_iter()
        .map(|(label, extensions)| {
            if extensions.is_empty() {
                label
            } else {
                format!("{}{}", pad_to_width(&label, column), extensions)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the preset list, marking the active one
pub fn format_presets(names: &[String], active: &str, json: bool) -> String {
    if json {
        let presets: Vec<serde_json::Value> = names
            .iter()
            .map(|name| {
                serde_json::json!({
                    "name": name,
                    "active": name == active,
                })
            })
            .collect();
        return serde_json::to_string_pretty(&presets).unwrap_or_else(|_| "[]".to_string());
    }

    names
        .iter()
        .map(|name| {
            let marker = if name == active { "*" } else { " " };
            format!("{} {}", marker, name)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format planned moves
pub fn format_pending(moves: &[PendingMove]) -> String {
    let width = moves.iter().map(|m| m.asset_path.width()).max().unwrap_or(0);
    moves
        .iter()
        .map(|m| format!("{} -> {}", pad_to_width(&m.asset_path, width), m.destination_folder))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format committed moves
pub fn format_outcome(outcome: &MoveOutcome) -> String {
    match outcome {
        MoveOutcome::Moved { from, to } => format!("Moved: {} -> {}", from, to),
        MoveOutcome::AlreadyInPlace { path } => format!("In place: {}", path),
        MoveOutcome::SourceMissing { path } => format!("Missing: {}", path),
        MoveOutcome::Failed { from, to, error } => {
            format!("Failed: {} -> {} ({})", from, to, error)
        }
    }
}

/// Format the result of materialising a forest
pub fn format_report(report: &EnsureReport) -> String {
    let mut output = format!(
        "Folders: {} created, {} existing, {} skipped, {} failed",
        report.created.len(),
        report.existing.len(),
        report.skipped.len(),
        report.failed.len()
    );
    for path in &report.created {
        output.push_str(&format!("\n  + {}", path));
    }
    for path in &report.skipped {
        output.push_str(&format!("\n  ! skipped {}", path));
    }
    for path in &report.failed {
        output.push_str(&format!("\n  x failed {}", path));
    }
    output
}

/// A suggested extension and the folder it currently maps to
#[derive(Debug, Serialize)]
pub struct ExtensionEntry {
    pub extension: String,
    pub folder: Option<String>,
}

pub fn format_extensions(entries: &[ExtensionEntry], json: bool) -> String {
    if json {
        return serde_json::to_string_pretty(entries).unwrap_or_else(|_| "[]".to_string());
    }

    let width = entries.iter().map(|e| e.extension.width()).max().unwrap_or(0) + 2;
    entries
        .iter()
        .map(|entry| match &entry.folder {
            Some(folder) => format!("{}{}", pad_to_width(&entry.extension, width), folder),
            None => format!("{}-", pad_to_width(&entry.extension, width)),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::FolderNode;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pad_to_width_counts_columns() {
        assert_eq!(pad_to_width("ab", 4), "ab  ");
        assert_eq!(pad_to_width("素材", 6), "素材  ");
        assert_eq!(pad_to_width("long", 2), "long");
    }

    #[test]
    fn test_format_tree() {
        let forest = Forest::new(vec![FolderNode::new("Assets", "Assets/").with_children(vec![
            FolderNode::new("Models", "Assets/Models").with_extensions(&[".obj", ".fbx"]),
            FolderNode::new("UI", "Assets/UI"),
        ])]);

        assert_eq!(
            format_tree(&forest, false),
            "Assets\n  Models  .fbx .obj\n  UI"
        );
    }

    #[test]
    fn test_format_presets_marks_active() {
        let names = vec!["Default".to_string(), "Mobile".to_string()];
        assert_eq!(format_presets(&names, "Mobile", false), "  Default\n* Mobile");
    }

    #[test]
    fn test_format_outcome() {
        let outcome = MoveOutcome::Moved {
            from: "Assets/Rock.fbx".into(),
            to: "Assets/Art/Models/Rock.fbx".into(),
        };
        assert_eq!(format_outcome(&outcome), "Moved: Assets/Rock.fbx -> Assets/Art/Models/Rock.fbx");
    }
}
