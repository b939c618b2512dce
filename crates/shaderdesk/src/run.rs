use anyhow::Result;
use tracing_subscriber::EnvFilter;

use agsl::ShaderDescriptor;
use preview::{Preview, PreviewConfig};

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

pub fn run() -> Result<()> {
    let descriptor = ShaderDescriptor::default();
    tracing::info!(shader = %descriptor.name, "starting shaderdesk preview");

    let config = PreviewConfig {
        descriptor,
        ..PreviewConfig::default()
    };
    Preview::new(config).run()
}
