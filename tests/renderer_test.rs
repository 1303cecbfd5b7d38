use forgekit::error::Error;
use forgekit::renderer::{MiniJinjaRenderer, TemplateRenderer};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_minijinja_renderer() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("hello.j2"), "Hello {{ name }}!\nValue: {{ value }}\n").unwrap();

    let engine = MiniJinjaRenderer::new();
    let context = serde_json::json!({
        "name": "test",
        "value": 42
    });

    let result = engine.render(temp_dir.path(), "hello.j2", &context).unwrap();
    assert_eq!(result, "Hello test!\nValue: 42\n");
}

#[test]
fn test_block_tags_leave_no_blank_lines() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("list.j2"),
        "{% for item in items %}\n- {{ item }}\n{% endfor %}\n",
    )
    .unwrap();

    let engine = MiniJinjaRenderer::new();
    let context = serde_json::json!({ "items": ["a", "b"] });

    let result = engine.render(temp_dir.path(), "list.j2", &context).unwrap();
    assert_eq!(result, "- a\n- b\n");
}

#[test]
fn test_dotfile_template() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join(".env.j2"), "PORT={{ port }}\n").unwrap();

    let engine = MiniJinjaRenderer::new();
    let result = engine.render(temp_dir.path(), ".env.j2", &serde_json::json!({ "port": 25565 }));
    assert_eq!(result.unwrap(), "PORT=25565\n");
}

#[test]
fn test_missing_template() {
    let temp_dir = TempDir::new().unwrap();
    let engine = MiniJinjaRenderer::new();

    let result = engine.render(temp_dir.path(), "missing.j2", &serde_json::json!({}));
    match result {
        Err(Error::TemplateNotFound { path }) => assert_eq!(path, temp_dir.path().join("missing.j2")),
        other => panic!("Expected TemplateNotFound, got {other:?}"),
    }
}

#[test]
fn test_undefined_variable_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("strict.j2"), "{{ env_data.missing }}").unwrap();

    let engine = MiniJinjaRenderer::new();
    let result = engine.render(temp_dir.path(), "strict.j2", &serde_json::json!({}));
    assert!(matches!(result, Err(Error::RenderError(_))));
}
