// src/core/graph_display.rs

use crate::models::{FileEntry, StructureSnapshot};
use colored::Colorize;

/// Controls which details are rendered next to each node.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisplayOptions {
    pub show_paths: bool,
    pub show_files: bool,
}

/// A node of the rendered tree; built from the snapshot, then printed recursively.
struct Node {
    label: String,
    children: Vec<Node>,
}

impl Node {
    fn leaf(label: String) -> Self {
        Self {
            label,
            children: Vec::new(),
        }
    }
}

fn with_path(name: &str, path: &std::path::Path, options: &DisplayOptions) -> String {
    if options.show_paths {
        format!("{} [{}]", name, path.display())
    } else {
        name.to_string()
    }
}

fn file_nodes(files: &[FileEntry], options: &DisplayOptions) -> Vec<Node> {
    if !options.show_files {
        return Vec::new();
    }
    files.iter().map(|f| Node::leaf(f.name.clone())).collect()
}

fn build_nodes(snapshot: &StructureSnapshot, options: &DisplayOptions) -> Vec<Node> {
    let accounts = snapshot
        .accounts
        .iter()
        .map(|account| {
            let mut label = with_path(&account.name, &account.path, options);
            let meta: Vec<String> = [
                account.profile.as_deref().map(|p| format!("profile={}", p)),
                account.region.as_deref().map(|r| format!("region={}", r)),
            ]
            .into_iter()
            .flatten()
            .collect();
            if !meta.is_empty() {
                label = format!("{} ({})", label, meta.join(", "));
            }
            Node {
                label,
                children: account
                    .project_groups
                    .iter()
                    .map(|group| Node {
                        label: with_path(&group.name, &group.path, options),
                        children: group
                            .projects
                            .iter()
                            .map(|project| Node {
                                label: with_path(&project.name, &project.path, options),
                                children: file_nodes(&project.files, options),
                            })
                            .collect(),
                    })
                    .collect(),
            }
        })
        .collect();

    let modules = snapshot
        .modules
        .iter()
        .map(|module| Node {
            label: with_path(&module.name, &module.path, options),
            children: file_nodes(&module.files, options),
        })
        .collect();

    let providers = snapshot
        .providers
        .iter()
        .map(|p| Node::leaf(p.name.clone()))
        .collect();

    vec![
        Node {
            label: "accounts".to_string(),
            children: accounts,
        },
        Node {
            label: "modules".to_string(),
            children: modules,
        },
        Node {
            label: "providers".to_string(),
            children: providers,
        },
    ]
}

/// Renders the snapshot as plain ASCII tree lines, root first.
pub fn render_structure_tree(snapshot: &StructureSnapshot, options: &DisplayOptions) -> Vec<String> {
    let mut lines = vec![snapshot.root_path.display().to_string()];
    let nodes = build_nodes(snapshot, options);
    for (i, node) in nodes.iter().enumerate() {
        render_node(node, "", i == nodes.len() - 1, &mut lines);
    }
    lines
}

/// Recursive function to render a tree node and its descendants.
fn render_node(node: &Node, prefix: &str, is_last: bool, lines: &mut Vec<String>) {
    let connector = if is_last { "└─" } else { "├─" };
    lines.push(format!("{}{}{}", prefix, connector, node.label));

    let child_prefix = format!("{}{}", prefix, if is_last { "   " } else { "│  " });
    for (i, child) in node.children.iter().enumerate() {
        render_node(child, &child_prefix, i == node.children.len() - 1, lines);
    }
}

/// Prints the tree to stdout.
pub fn display_structure_tree(snapshot: &StructureSnapshot, options: &DisplayOptions) {
    let lines = render_structure_tree(snapshot, options);
    let mut iter = lines.into_iter();
    if let Some(root) = iter.next() {
        println!("\n{}", root.yellow().bold());
    }
    for line in iter {
        println!("{}", line);
    }
    if snapshot.accounts.is_empty() {
        println!(
            "\n{}",
            "No accounts found. Run 'tfexplorer init' to create the layout.".dimmed()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, Module, Project, ProjectGroup, Provider};
    use std::path::PathBuf;

    fn sample() -> StructureSnapshot {
        StructureSnapshot {
            root_path: PathBuf::from("/tf"),
            accounts: vec![Account {
                name: "acct1".to_string(),
                path: PathBuf::from("/tf/accounts/acct1"),
                profile: Some("prod".to_string()),
                region: Some("us-east-1".to_string()),
                project_groups: vec![ProjectGroup {
                    name: "network".to_string(),
                    path: PathBuf::from("/tf/accounts/acct1/network"),
                    projects: vec![Project {
                        name: "vpc".to_string(),
                        path: PathBuf::from("/tf/accounts/acct1/network/vpc"),
                        files: vec![FileEntry {
                            name: "main.tf".to_string(),
                            path: PathBuf::from("/tf/accounts/acct1/network/vpc/main.tf"),
                            file_type: ".tf".to_string(),
                        }],
                    }],
                }],
                ..Default::default()
            }],
            modules: vec![Module {
                name: "s3".to_string(),
                path: PathBuf::from("/tf/modules/s3"),
                files: Vec::new(),
            }],
            providers: vec![Provider {
                name: "default".to_string(),
            }],
        }
    }

    #[test]
    fn test_render_default_tree() {
        let lines = render_structure_tree(&sample(), &DisplayOptions::default());
        assert_eq!(
            lines,
            vec![
                "/tf",
                "├─accounts",
                "│  └─acct1 (profile=prod, region=us-east-1)",
                "│     └─network",
                "│        └─vpc",
                "├─modules",
                "│  └─s3",
                "└─providers",
                "   └─default",
            ]
        );
    }

    #[test]
    fn test_render_with_files_and_paths() {
        let options = DisplayOptions {
            show_paths: true,
            show_files: true,
        };
        let lines = render_structure_tree(&sample(), &options);
        assert!(lines.contains(&"│           └─main.tf".to_string()));
        assert!(lines.contains(&"│  └─s3 [/tf/modules/s3]".to_string()));
    }
}
