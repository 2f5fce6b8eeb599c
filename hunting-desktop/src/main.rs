use hunting_desktop::{WinitRuntime, config, launch};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("=== Hunting Starting ===");

    let settings = config::load_settings()?;
    launch(&mut WinitRuntime::default(), settings)
}
