/// Smoke-test for `ChromiumRenderer`.
///
/// Launches a headless Chromium, renders <https://example.com>, and verifies
/// the rendered HTML contains the expected `<h1>`.
///
/// Run with:
///   cargo run --example browser_smoke --features browser
use strata_client::ChromiumRenderer;
use strata_core::traits::Renderer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    let renderer = ChromiumRenderer::new();

    let url = "https://example.com";
    println!("Rendering {url} …");
    let page = renderer.render(url).await?;

    assert!(
        page.html.contains("<h1>Example Domain</h1>"),
        "Expected <h1> not found in rendered HTML"
    );

    println!(
        "OK — got {} bytes, {} scrolls, {} clicks, {} pages",
        page.html.len(),
        page.interactions.scrolls,
        page.interactions.clicks.len(),
        page.interactions.pages.len()
    );
    Ok(())
}
