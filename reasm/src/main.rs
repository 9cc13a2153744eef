use anyhow::Context;
use clap::Parser;
use reasm::config::{self, CliArgs};
use reasm::replay::{Replayer, SegmentScript};
use reasm::telemetry;
use std::io::Write;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let cli = CliArgs::parse();

    if cli.print_default_config {
        return config::print_default_config();
    }

    let config = config::load_config(&cli)?;
    telemetry::init_logging(&config.logging).with_context(|| "failed to initialize logging")?;

    info!(
        capacity = config.stream.capacity,
        drain = ?config.output.drain,
        "Configuration loaded successfully"
    );

    if cli.validate {
        println!("✓ Configuration is valid");
        return Ok(());
    }

    let script_path = cli
        .script
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("Missing segment script path"))?;
    let script = SegmentScript::load(script_path)?;

    info!(
        script = %script_path.display(),
        segments = script.segments.len(),
        "Replaying segment script"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let summary = Replayer::new(&config)
        .run(&script, &mut out)
        .with_context(|| "replay failed")?;
    out.flush().context("Failed to flush stdout")?;

    info!(
        segments = summary.segments_inserted,
        bytes_written = summary.bytes_written,
        bytes_pending = summary.bytes_pending,
        finished = summary.finished,
        "Replay complete"
    );
    Ok(())
}
