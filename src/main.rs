//! tiercache - replay driver
//!
//! Builds a tiered cache from the environment, replays commands read from
//! stdin and writes one JSON result per command to stdout.

use std::io;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tiercache::replay::{write_line, Replayer};
use tiercache::{Config, TieredCache};

/// Main entry point for the replay driver.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging (stderr)
/// 2. Load configuration from environment variables
/// 3. Build the tiered cache
/// 4. Replay stdin until EOF
/// 5. Optionally print the final statistics report
fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tiercache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = Config::from_env();
    let layout: Vec<String> = config.tiers.iter().map(ToString::to_string).collect();
    info!("Configuration loaded: tiers=[{}]", layout.join(", "));

    let cache: TieredCache<String, String> =
        TieredCache::new(&config.tiers).context("failed to build tiered cache")?;
    let replayer = Replayer::new(&cache);

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    let processed = replayer
        .run(stdin.lock(), &mut stdout)
        .context("replay failed")?;

    if config.report_stats {
        write_line(&mut stdout, &replayer.stats()).context("failed to write stats")?;
    }

    info!("Replayed {} commands", processed);
    Ok(())
}
