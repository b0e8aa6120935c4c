//! Ensures all workspace crates use `version.workspace = true` and that
//! the workspace version is consistent with the library's `VERSION`.

use std::path::Path;

fn workspace_root() -> &'static Path {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
}

/// Read the workspace version from the root Cargo.toml.
fn workspace_version() -> String {
    let root_toml = std::fs::read_to_string(workspace_root().join("Cargo.toml")).unwrap();
    let doc: toml::Value = root_toml.parse().unwrap();
    doc["workspace"]["package"]["version"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Returns `"workspace"` for `version.workspace = true`, else the literal version.
fn crate_version(manifest_dir: &Path) -> String {
    let toml_str = std::fs::read_to_string(manifest_dir.join("Cargo.toml")).unwrap();
    let doc: toml::Value = toml_str.parse().unwrap();

    let version = &doc["package"]["version"];
    if let Some(table) = version.as_table() {
        if table.get("workspace").and_then(|v| v.as_bool()) == Some(true) {
            return "workspace".to_string();
        }
    }
    version
        .as_str()
        .unwrap_or_else(|| panic!("no version in {}", manifest_dir.display()))
        .to_string()
}

#[test]
fn all_crates_use_workspace_version() {
    for krate in ["crates/crew-core", "crates/crew-cli", "crates/ollama-client"] {
        let version = crate_version(&workspace_root().join(krate));
        assert_eq!(
            version, "workspace",
            "{} should use version.workspace = true, got version = {:?}",
            krate, version
        );
    }
}

#[test]
fn workspace_version_matches_library_version() {
    assert_eq!(workspace_version(), crew_core::VERSION);
}
