use std::path::PathBuf;

use rmcp::{
    ServiceExt,
    model::CallToolRequestParams,
    transport::{ConfigureCommandExt, TokioChildProcess},
};
use serde_json::json;

#[tokio::test]
async fn mcp_stdio_info_tools_roundtrip()
-> Result<(), Box<dyn std::error::Error>> {
    let tempdir = tempfile::tempdir()?;

    let bin = textvault_bin()?;
    let transport = TokioChildProcess::new(
        tokio::process::Command::new(bin).configure(|cmd| {
            cmd.arg("mcp")
                .env("TEXTVAULT_DATA_DIR", tempdir.path())
                .env("TEXTVAULT_EMBED_MODEL", "test-model")
                .env("TEXTVAULT_EMBED_DIMENSION", "128");
        }),
    )?;

    let client = ().serve(transport).await?;

    let about = client
        .peer()
        .call_tool(CallToolRequestParams::new("about_textvault"))
        .await?;
    let about_text = about
        .content
        .first()
        .and_then(|c| c.as_text())
        .map(|t| t.text.clone())
        .unwrap_or_default();
    assert!(about_text.contains("text RAG system"));

    let info = client
        .peer()
        .call_tool(CallToolRequestParams::new("get_embedding_model_info"))
        .await?;
    let structured = info.structured_content.expect("structured content");
    assert_eq!(structured.get("model_id"), Some(&json!("test-model")));
    assert_eq!(structured.get("dimension"), Some(&json!(128)));

    client.cancel().await?;
    Ok(())
}

fn textvault_bin() -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Ok(bin) = std::env::var("CARGO_BIN_EXE_textvault") {
        return Ok(PathBuf::from(bin));
    }

    let mut path = std::env::current_exe()?;
    path.pop();
    if path.ends_with("deps") {
        path.pop();
    }
    path.push("textvault");

    if cfg!(windows) {
        path.set_extension("exe");
    }

    Ok(path)
}
