//! Writes the OpenAPI document to `target/generated-snippets/` for the
//! documentation build.

use std::path::PathBuf;

use energycoop_server::api::openapi::ApiDoc;
use utoipa::OpenApi;

fn snippets_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../target/generated-snippets")
}

#[test]
fn test_write_openapi_snippet() {
    let json = ApiDoc::openapi().to_pretty_json().unwrap();

    let dir = snippets_dir();
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("openapi.json");
    std::fs::write(&path, &json).unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written["info"]["title"], "Energy Co-op API");
    assert!(written["paths"]["/api/v1/admin/savings-rate"]["post"].is_object());
    assert_eq!(
        written["components"]["securitySchemes"]["bearer_auth"]["scheme"],
        "bearer"
    );
}
