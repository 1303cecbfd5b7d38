use forgekit::fs::LocalFileSystem;
use forgekit::paths::{output_file_path, resolve_output_file, resolve_template_path};
use std::path::PathBuf;
use tempfile::TempDir;

const DIRECTORIES: [&str; 6] = ["", "/", "out", "out/", "/out//minecraft/", "a///b"];
const FILES: [&str; 5] = ["whitelist.json", "/.env", "//docker-compose.yml", "data/", "x//y"];

#[test]
fn test_resolved_paths_never_contain_double_separators() {
    for directory in DIRECTORIES {
        for file in FILES {
            let template = resolve_template_path(directory, file);
            assert!(!template.to_string_lossy().contains("//"), "{}", template.display());

            let output = output_file_path(Some(directory), file);
            assert!(!output.to_string_lossy().contains("//"), "{}", output.display());
        }
    }
}

#[test]
fn test_resolve_output_file_creates_directory() {
    let temp_dir = TempDir::new().unwrap();
    let directory = format!("{}//servers//myserver/", temp_dir.path().display());

    let path = resolve_output_file(&LocalFileSystem::new(), Some(&directory), "whitelist.json")
        .unwrap();

    assert_eq!(path, temp_dir.path().join("servers/myserver/whitelist.json"));
    assert!(temp_dir.path().join("servers/myserver").is_dir());
    assert!(!path.exists());
}

#[test]
fn test_resolve_output_file_without_directory() {
    let fs = LocalFileSystem::new();

    assert_eq!(resolve_output_file(&fs, None, ".env").unwrap(), PathBuf::from(".env"));
    assert_eq!(resolve_output_file(&fs, Some(""), ".env").unwrap(), PathBuf::from(".env"));
}
