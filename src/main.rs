use anyhow::{Context, Result};
use clap::Parser;

use panel_deck::cli::{CliArgs, OutputFormat, StartupConfig};
use panel_deck::config::PanelsConfig;
use panel_deck::dom::{Document, MarkupNode};
use panel_deck::runtime::{bootstrap, run_script, Script};

/// Demo page used when no markup file is given
const DEMO_MARKUP: &str = include_str!("../samples/dashboard.yaml");

/// Panel declarations matching the demo page
const DEMO_CONFIG: &str = include_str!("../samples/panels.yaml");

fn load_document(startup: &StartupConfig) -> Result<Document> {
    let (content, source) = match &startup.markup {
        Some(path) => (
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read markup {}", path.display()))?,
            path.display().to_string(),
        ),
        None => (DEMO_MARKUP.to_string(), "built-in demo".to_string()),
    };
    let nodes: Vec<MarkupNode> = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse markup from {}", source))?;
    Ok(Document::from_markup(&nodes))
}

fn load_config(startup: &StartupConfig) -> Result<PanelsConfig> {
    let config = match &startup.config_path {
        Some(path) => PanelsConfig::load_from(path)?,
        None => PanelsConfig::load(),
    };
    if startup.markup.is_none() && config.panels.is_empty() {
        tracing::info!("No panels configured, using the demo panel set");
        return PanelsConfig::from_yaml(DEMO_CONFIG).context("Failed to parse demo config");
    }
    Ok(config)
}

fn main() -> Result<()> {
    panel_deck::tracing::init();

    let startup = CliArgs::parse()
        .into_config()
        .map_err(|e| anyhow::anyhow!(e))?;

    let config = load_config(&startup)?;
    let document = load_document(&startup)?;
    let mut runtime = bootstrap(document, config);

    if let Some(path) = &startup.script {
        let script = Script::load(path)?;
        run_script(&mut runtime, &script)?;
    }

    let snapshot = runtime.snapshot();
    match startup.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&snapshot)?),
        OutputFormat::Text => print!("{}", snapshot),
    }

    Ok(())
}
