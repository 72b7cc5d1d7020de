use std::ffi::OsString;
use std::fs;
use std::path::Path;

use clap::ValueEnum;
use snafu::{ResultExt, Snafu};
use tracing::{debug, info, warn};

use super::{DiagramDocument, DiagramLine, IdScheme, NodeId};
use crate::ext::PathExt;

const DEFAULT_EXCLUDED_DIRECTORY: &str = ".git";
const PERMISSION_DENIED_LABEL: &str = "Permission Denied";

/// Order in which sibling directories are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum EntryOrder {
    /// Byte-wise by directory name.
    #[default]
    Name,
    /// Whatever order the directory listing returns.
    Listing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramOptions {
    /// Directory names that are neither rendered nor entered.
    pub excluded: Vec<String>,
    pub order: EntryOrder,
    pub id_scheme: IdScheme,
    /// Levels below the root that are rendered. `None` is unbounded.
    pub max_depth: Option<usize>,
}

impl Default for DiagramOptions {
    fn default() -> Self {
        Self {
            excluded: vec![DEFAULT_EXCLUDED_DIRECTORY.to_string()],
            order: EntryOrder::default(),
            id_scheme: IdScheme::default(),
            max_depth: None,
        }
    }
}

pub struct DiagramGenerator {
    options: DiagramOptions,
}

impl DiagramGenerator {
    pub fn new(options: DiagramOptions) -> Self {
        Self { options }
    }

    /// Renders the diagram for `root`, writes it to `output` and returns the
    /// written text.
    pub fn generate(&self, root: &Path, output: &Path) -> Result<String, GenerateError> {
        let document = self.render(root).to_string();

        debug!("Writing diagram to {}", output.display());
        fs::write(output, &document).context(WriteSnafu {
            path: output.best_effort_path_display(),
        })?;
        info!(
            "Wrote {} bytes to {}",
            document.len(),
            output.best_effort_path_display()
        );

        Ok(document)
    }

    /// Scans `root` depth-first. Directories that cannot be listed become
    /// `Permission Denied` leaves, so this never fails.
    pub fn render(&self, root: &Path) -> DiagramDocument {
        let name = root.display_name();
        let root_id = self.options.id_scheme.node_id(&name, Path::new(""));

        let mut lines = vec![DiagramLine::Node {
            id: root_id.clone(),
            label: name,
        }];
        self.scan(root, Path::new(""), &root_id, 0, &mut lines);

        let document = DiagramDocument::new(lines);
        debug!(
            "Rendered {} nodes and {} edges",
            document.nodes().count(),
            document.edges().count()
        );
        document
    }

    fn scan(
        &self,
        path: &Path,
        relative: &Path,
        id: &NodeId,
        depth: usize,
        lines: &mut Vec<DiagramLine>,
    ) {
        if self.options.max_depth.is_some_and(|max| depth >= max) {
            debug!("Depth limit reached at {}", path.display());
            return;
        }

        debug!("Scanning directory {}", path.display());
        let children = match self.list_subdirectories(path) {
            Ok(children) => children,
            Err(e) => {
                warn!("Cannot list {}: {}", path.display(), e);
                let denied = id.permission_denied();
                lines.push(DiagramLine::Node {
                    id: denied.clone(),
                    label: PERMISSION_DENIED_LABEL.to_string(),
                });
                lines.push(DiagramLine::Edge {
                    from: id.clone(),
                    to: denied,
                });
                return;
            }
        };

        for child in children {
            let name = child.to_string_lossy().into_owned();
            let child_relative = relative.join(&child);
            let child_id = self.options.id_scheme.node_id(&name, &child_relative);

            lines.push(DiagramLine::Node {
                id: child_id.clone(),
                label: name,
            });
            lines.push(DiagramLine::Edge {
                from: id.clone(),
                to: child_id.clone(),
            });

            self.scan(
                &path.join(&child),
                &child_relative,
                &child_id,
                depth + 1,
                lines,
            );
        }
    }

    /// Names of the non-excluded sub-directories of `path`. Symbolic links are
    /// classified by their own type and therefore never followed.
    fn list_subdirectories(&self, path: &Path) -> std::io::Result<Vec<OsString>> {
        let entries = fs::read_dir(path)?.collect::<Result<Vec<_>, _>>()?;

        let mut names = entries
            .into_iter()
            .filter_map(|entry| match entry.file_type() {
                Ok(file_type) if file_type.is_dir() => Some(entry.file_name()),
                Ok(_) => None,
                Err(e) => {
                    warn!("Skipping {}: {}", entry.path().display(), e);
                    None
                }
            })
            .filter(|name| !self.is_excluded(name))
            .collect::<Vec<_>>();

        if self.options.order == EntryOrder::Name {
            names.sort();
        }

        Ok(names)
    }

    fn is_excluded(&self, name: &OsString) -> bool {
        self.options
            .excluded
            .iter()
            .any(|excluded| name == excluded.as_str())
    }
}

#[derive(Debug, Snafu)]
pub enum GenerateError {
    #[snafu(display("Failed to write the diagram to {}", path))]
    WriteError {
        path: String,
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn tree(dirs: &[&str]) -> TempDir {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        for dir in dirs {
            fs::create_dir_all(temp_dir.path().join(dir)).expect("Failed to create directory");
        }
        temp_dir
    }

    fn root_id(temp_dir: &TempDir) -> String {
        NodeId::from_name(&temp_dir.path().display_name()).to_string()
    }

    fn edge_strings(document: &DiagramDocument) -> Vec<(String, String)> {
        document
            .edges()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect()
    }

    #[fixture]
    fn generator() -> DiagramGenerator {
        DiagramGenerator::new(DiagramOptions::default())
    }

    #[rstest]
    fn empty_root_yields_single_node(generator: DiagramGenerator) {
        let temp_dir = tree(&[]);
        fs::write(temp_dir.path().join("file.txt"), "content").expect("Failed to write file");

        let document = generator.render(temp_dir.path());

        let nodes = document.nodes().collect::<Vec<_>>();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].0.to_string(), root_id(&temp_dir));
        assert_eq!(nodes[0].1, temp_dir.path().display_name());
        assert_eq!(document.edges().count(), 0);
    }

    #[rstest]
    fn nested_tree_is_rendered_depth_first(generator: DiagramGenerator) {
        let temp_dir = tree(&["a/x", "a/y", "b"]);
        let root = root_id(&temp_dir);

        let document = generator.render(temp_dir.path());

        let labels = document.nodes().map(|(_, label)| label).collect::<Vec<_>>();
        assert_eq!(labels[1..], ["a", "x", "y", "b"]);
        assert_eq!(
            edge_strings(&document),
            vec![
                (root.clone(), "node_a".to_string()),
                ("node_a".to_string(), "node_x".to_string()),
                ("node_a".to_string(), "node_y".to_string()),
                (root, "node_b".to_string()),
            ]
        );
    }

    #[rstest]
    fn rendering_is_reproducible(generator: DiagramGenerator) {
        let temp_dir = tree(&["a/x", "a/y", "b", "c/d/e"]);

        let first = generator.render(temp_dir.path()).to_string();
        let second = generator.render(temp_dir.path()).to_string();

        assert_eq!(first, second);
    }

    #[rstest]
    fn git_directories_are_skipped_everywhere(generator: DiagramGenerator) {
        let temp_dir = tree(&[".git/objects", "a/.git/refs", "a/b"]);

        let document = generator.render(temp_dir.path());

        let labels = document.nodes().skip(1).map(|(_, label)| label).collect::<Vec<_>>();
        assert_eq!(labels, ["a", "b"]);
        assert!(document.to_string().contains("node_a --> node_b"));
        assert!(!document.to_string().contains("node__git"));
    }

    #[rstest]
    fn every_edge_endpoint_is_declared_first(generator: DiagramGenerator) {
        let temp_dir = tree(&["a/b/c", "a/d", "e/f", "g"]);

        let document = generator.render(temp_dir.path());

        let mut declared = HashSet::new();
        for line in document.lines() {
            match line {
                DiagramLine::Node { id, .. } => {
                    declared.insert(id.clone());
                }
                DiagramLine::Edge { from, to } => {
                    assert!(declared.contains(from), "undeclared source {from}");
                    assert!(declared.contains(to), "undeclared target {to}");
                }
            }
        }
    }

    #[rstest]
    fn root_is_the_only_node_without_incoming_edge(generator: DiagramGenerator) {
        let temp_dir = tree(&["a/b", "c"]);

        let document = generator.render(temp_dir.path());

        let targets = document
            .edges()
            .map(|(_, to)| to.clone())
            .collect::<HashSet<_>>();
        let roots = document
            .nodes()
            .filter(|(id, _)| !targets.contains(*id))
            .map(|(id, _)| id.to_string())
            .collect::<Vec<_>>();
        assert_eq!(roots, vec![root_id(&temp_dir)]);
    }

    #[rstest]
    fn name_order_sorts_siblings(generator: DiagramGenerator) {
        let temp_dir = tree(&["zeta", "alpha", "Mid", "beta"]);

        let document = generator.render(temp_dir.path());

        let labels = document.nodes().map(|(_, label)| label).collect::<Vec<_>>();
        assert_eq!(labels[1..], ["Mid", "alpha", "beta", "zeta"]);
    }

    #[test]
    fn listing_order_renders_every_directory() {
        let temp_dir = tree(&["zeta", "alpha", "beta"]);
        let generator = DiagramGenerator::new(DiagramOptions {
            order: EntryOrder::Listing,
            ..DiagramOptions::default()
        });

        let document = generator.render(temp_dir.path());

        let mut labels = document
            .nodes()
            .skip(1)
            .map(|(_, label)| label.to_string())
            .collect::<Vec<_>>();
        labels.sort();
        assert_eq!(labels, ["alpha", "beta", "zeta"]);
    }

    #[rstest]
    #[case(Some(0), 1)]
    #[case(Some(1), 3)]
    #[case(Some(2), 4)]
    #[case(None, 5)]
    fn max_depth_limits_rendered_levels(#[case] max_depth: Option<usize>, #[case] nodes: usize) {
        let temp_dir = tree(&["a/x/deep", "b"]);
        let generator = DiagramGenerator::new(DiagramOptions {
            max_depth,
            ..DiagramOptions::default()
        });

        let document = generator.render(temp_dir.path());

        assert_eq!(document.nodes().count(), nodes);
    }

    #[test]
    fn custom_exclusions_replace_the_default() {
        let temp_dir = tree(&[".git", "node_modules/pkg", "src"]);
        let generator = DiagramGenerator::new(DiagramOptions {
            excluded: vec!["node_modules".to_string()],
            ..DiagramOptions::default()
        });

        let document = generator.render(temp_dir.path());

        let labels = document.nodes().skip(1).map(|(_, label)| label).collect::<Vec<_>>();
        assert_eq!(labels, [".git", "src"]);
    }

    #[test]
    fn path_ids_keep_equal_names_apart() {
        let temp_dir = tree(&["a/src", "b/src"]);
        let generator = DiagramGenerator::new(DiagramOptions {
            id_scheme: IdScheme::Path,
            ..DiagramOptions::default()
        });

        let document = generator.render(temp_dir.path());

        let src_ids = document
            .nodes()
            .filter(|(_, label)| *label == "src")
            .map(|(id, _)| id.clone())
            .collect::<HashSet<_>>();
        assert_eq!(src_ids.len(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directories_are_not_followed() {
        let temp_dir = tree(&["real/inner"]);
        std::os::unix::fs::symlink(temp_dir.path().join("real"), temp_dir.path().join("link"))
            .expect("Failed to create symlink");

        let document = DiagramGenerator::new(DiagramOptions::default()).render(temp_dir.path());

        let labels = document.nodes().skip(1).map(|(_, label)| label).collect::<Vec<_>>();
        assert_eq!(labels, ["real", "inner"]);
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_directory_becomes_permission_denied_leaf() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tree(&["locked/hidden", "open"]);
        let locked = temp_dir.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000))
            .expect("Failed to change permissions");
        // Privileged users can still list the directory.
        let listable = fs::read_dir(&locked).is_ok();

        let document = DiagramGenerator::new(DiagramOptions::default()).render(temp_dir.path());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755))
            .expect("Failed to restore permissions");
        if listable {
            return;
        }

        let denied = document
            .nodes()
            .filter(|(_, label)| *label == PERMISSION_DENIED_LABEL)
            .map(|(id, _)| id.to_string())
            .collect::<Vec<_>>();
        assert_eq!(denied, vec!["node_locked_perm".to_string()]);
        let incoming = edge_strings(&document)
            .into_iter()
            .filter(|(_, to)| to == "node_locked_perm")
            .collect::<Vec<_>>();
        assert_eq!(
            incoming,
            vec![("node_locked".to_string(), "node_locked_perm".to_string())]
        );
        assert!(document.nodes().any(|(_, label)| label == "open"));
        assert!(!document.nodes().any(|(_, label)| label == "hidden"));
    }

    #[test]
    fn missing_root_renders_permission_denied_under_root() {
        let temp_dir = tree(&[]);
        let missing = temp_dir.path().join("missing");

        let rendered = DiagramGenerator::new(DiagramOptions::default())
            .render(&missing)
            .to_string();

        assert_eq!(
            rendered,
            "```mermaid\ngraph TD\n    node_missing[missing]\n    node_missing_perm[Permission Denied]\n    node_missing --> node_missing_perm\n```"
        );
    }

    #[rstest]
    fn generate_writes_and_returns_the_same_text(generator: DiagramGenerator) {
        let temp_dir = tree(&["a", "b"]);
        let output_dir = TempDir::new().expect("Failed to create temp directory");
        let output = output_dir.path().join("directory_structure.md");

        let returned = generator
            .generate(temp_dir.path(), &output)
            .expect("Failed to generate diagram");

        let written = fs::read_to_string(&output).expect("Failed to read output");
        assert_eq!(returned, written);
        assert!(returned.starts_with("```mermaid\ngraph TD\n"));
        assert!(returned.ends_with("\n```"));
    }

    #[rstest]
    fn generate_overwrites_existing_output(generator: DiagramGenerator) {
        let temp_dir = tree(&[]);
        let output_dir = TempDir::new().expect("Failed to create temp directory");
        let output = output_dir.path().join("out.md");
        fs::write(&output, "stale content that is longer than the diagram itself by far")
            .expect("Failed to write stale output");

        let returned = generator
            .generate(temp_dir.path(), &output)
            .expect("Failed to generate diagram");

        assert_eq!(fs::read_to_string(&output).expect("Failed to read output"), returned);
    }

    #[rstest]
    fn generate_reports_write_failures(generator: DiagramGenerator) {
        let temp_dir = tree(&[]);
        let output = temp_dir.path().join("no/such/dir/out.md");

        let result = generator.generate(temp_dir.path(), &output);

        match result {
            Err(GenerateError::WriteError { path, .. }) => assert!(path.ends_with("out.md")),
            Ok(_) => panic!("Expected WriteError"),
        }
    }
}
