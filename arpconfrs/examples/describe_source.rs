//! Print what arpconf knows about each configured source.
//!
//! ```text
//! RUST_LOG=arpconf=debug cargo run --example describe_source -- arpconf.toml
//! ```

use arpconf::plugin::{NoCredentials, NoOptions};
use arpconf::{display, variant, ConnectorConfig, PluginConfigBuilder};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => ConnectorConfig::from_file(path)?,
        None => ConnectorConfig::load_default(),
    };

    if config.sources.is_empty() {
        for v in variant::VARIANTS {
            println!("{}", serde_json::to_string_pretty(&display::ui_layout(v))?);
        }
        return Ok(());
    }

    for name in config.source_names() {
        let source = config.source(name)?;
        println!("[{name}] {}", source.variant().source_type.label);
        println!("  values: {}", display::masked_values(source.params()));

        match source.build_plugin_config(
            PluginConfigBuilder::new().with_source_name(name),
            &NoCredentials,
            &NoOptions,
        ) {
            Ok(plugin) => {
                let dialect = plugin.dialect();
                println!("  address: {}", plugin.data_source_factory().spec().address);
                println!(
                    "  dialect: {} (identifiers up to {:?} chars)",
                    dialect.name(),
                    dialect.identifier_length_limit()
                );
                println!(
                    "  fetch size {}, external query {}",
                    plugin.fetch_size(),
                    plugin.allow_external_query()
                );
            }
            Err(e) => println!("  not usable: {e}"),
        }
    }
    Ok(())
}
