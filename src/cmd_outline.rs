//! `outline` command: analyze one HTML file and print its outline.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use outline_analyzer::LandmarkExtractor;
use outline_config::Config;
use outline_host::BrowserHost;
use outline_protocols::{AnalyzerRequest, ExtensionHost, OutlineEntry};
use tracing::info;

use crate::cli::OutputFormat;

/// Read an HTML file and derive the URL it is opened under.
pub(crate) fn load_page(file: &Path, url: Option<String>) -> Result<(String, String)> {
    let html = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let url = match url {
        Some(url) => url,
        None => {
            let absolute = std::fs::canonicalize(file)
                .with_context(|| format!("Failed to resolve {}", file.display()))?;
            url::Url::from_file_path(&absolute)
                .map_err(|_| anyhow::anyhow!("Cannot build a file URL for {}", absolute.display()))?
                .to_string()
        }
    };
    Ok((url, html))
}

pub(crate) fn browser(config: &Config) -> Arc<BrowserHost> {
    Arc::new(BrowserHost::from_config(config).with_extractor(Arc::new(LandmarkExtractor::new())))
}

pub(crate) async fn run(
    config: &Config,
    file: &Path,
    format: OutputFormat,
    url: Option<String>,
) -> Result<()> {
    let (url, html) = load_page(file, url)?;
    let host = browser(config);
    let page = host.open_tab(url.clone(), &html);

    host.inject_analyzer(page)
        .await
        .with_context(|| format!("Cannot analyze {}", url))?;
    let response = host.send_message(page, AnalyzerRequest::AnalyzePage).await?;
    if !response.success {
        bail!(
            "Outline generation failed: {}",
            response.error.unwrap_or_else(|| "unknown error".to_string())
        );
    }

    let outline = response.into_outline();
    info!("{} entries in {}", outline.len(), url);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outline)?),
        OutputFormat::Text => print!("{}", format_outline(&outline)),
    }
    Ok(())
}

fn format_outline(outline: &[OutlineEntry]) -> String {
    outline
        .iter()
        .map(|entry| {
            let indent = "  ".repeat(usize::from(entry.level.saturating_sub(1)));
            format!("{}{}\n", indent, entry.title)
        })
        .collect()
}
