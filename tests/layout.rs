//! Source layout checks matching `rustfmt.toml`.

use std::path::{Path, PathBuf};

const MAX_WIDTH: usize = 100;

fn rust_sources(dir: &Path, out: &mut Vec<PathBuf>) {
    for entry in std::fs::read_dir(dir).expect("failed to read source dir") {
        let path = entry.expect("failed to read dir entry").path();
        if path.is_dir() {
            rust_sources(&path, out);
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            out.push(path);
        }
    }
}

fn sources() -> Vec<(PathBuf, String)> {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let mut paths = Vec::new();
    rust_sources(&root.join("src"), &mut paths);
    rust_sources(&root.join("tests"), &mut paths);
    paths.sort();
    paths
        .into_iter()
        .map(|path| {
            let text = std::fs::read_to_string(&path).expect("failed to read source");
            (path, text)
        })
        .collect()
}

#[test]
fn lines_fit_max_width() {
    let mut wide = Vec::new();
    for (path, text) in sources() {
        for (n, line) in text.lines().enumerate() {
            if line.chars().count() > MAX_WIDTH {
                wide.push(format!("{}:{}", path.display(), n + 1));
            }
        }
    }
    assert!(wide.is_empty(), "lines over {MAX_WIDTH} columns: {wide:?}");
}

#[test]
fn blocks_have_no_edge_blank_lines() {
    let mut found = Vec::new();
    for (path, text) in sources() {
        let lines: Vec<&str> = text.lines().collect();
        for (n, pair) in lines.windows(2).enumerate() {
            let (line, next) = (pair[0].trim(), pair[1].trim());
            let opens_block = line.ends_with('{') && !line.starts_with("//");
            if (opens_block && next.is_empty()) || (line.is_empty() && next.starts_with('}')) {
                found.push(format!("{}:{}", path.display(), n + 2));
            }
        }
    }
    assert!(found.is_empty(), "blank line at a block edge: {found:?}");
}

#[test]
fn rustfmt_config_uses_max_heuristics() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let config =
        std::fs::read_to_string(root.join("rustfmt.toml")).expect("failed to read rustfmt.toml");
    assert!(config.contains("use_small_heuristics = \"Max\""));
}
