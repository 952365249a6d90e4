use std::path::Path;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use springlayout::{
    FormatRegistry, GraphData, LayoutConfig, NodePosition, SimulationDriver, TracingProgress,
};

mod cli;

use cli::{Cli, Commands, OutputArgs};

/// District graph shipped with the binary for `springlayout sample`
const SAMPLE_GRAPH: &str = include_str!("../fixtures/malawi_districts.json");

fn init_tracing() {
    // stdout carries results, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn layout(graph: &GraphData, config: LayoutConfig) -> anyhow::Result<Vec<NodePosition>> {
    let driver = SimulationDriver::new(config)?;
    Ok(driver.run_with_observer(graph, &mut TracingProgress))
}

fn emit(
    registry: &FormatRegistry,
    positions: &[NodePosition],
    args: &OutputArgs,
) -> anyhow::Result<()> {
    let explicit = args.format.map(|f| f.as_str());

    match &args.output {
        Some(path) => {
            let writer = match explicit {
                Some(id) => registry
                    .writer_for_format(id)
                    .with_context(|| format!("no writer registered for {id}"))?,
                None => registry.writer_for_path(path).with_context(|| {
                    format!(
                        "cannot pick an output format for {}; pass --format",
                        path.display()
                    )
                })?,
            };
            writer
                .write(positions, path)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), nodes = positions.len(), "wrote layout");
        }
        None => {
            let writer = registry
                .writer_for_format(explicit.unwrap_or("json"))
                .context("no writer registered")?;
            print!("{}", writer.render(positions)?);
        }
    }

    Ok(())
}

fn read_graph(registry: &FormatRegistry, input: &Path) -> anyhow::Result<GraphData> {
    let reader = registry.reader_for_path(input)?;
    reader
        .read(input)
        .with_context(|| format!("failed to read graph from {}", input.display()))
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let registry = FormatRegistry::with_defaults();

    match cli.command {
        Commands::Layout {
            input,
            output,
            tuning,
        } => {
            let graph = read_graph(&registry, &input)?;
            let config = tuning.resolve(LayoutConfig::default())?;
            let positions = layout(&graph, config)?;
            emit(&registry, &positions, &output)?;
        }
        Commands::Sample { output, tuning } => {
            let graph: GraphData =
                serde_json::from_str(SAMPLE_GRAPH).context("bundled sample graph is invalid")?;
            graph.validate()?;
            let config = tuning.resolve(LayoutConfig::sample())?;
            let positions = layout(&graph, config)?;
            emit(&registry, &positions, &output)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_sample_parses() {
        let graph: GraphData = serde_json::from_str(SAMPLE_GRAPH).unwrap();
        assert_eq!(graph.nodes.len(), 28);
        assert_eq!(graph.edges.len(), 34);
    }

    #[test]
    fn sample_layout_stays_in_unit_square() {
        let graph: GraphData = serde_json::from_str(SAMPLE_GRAPH).unwrap();
        let positions = layout(&graph, LayoutConfig::sample()).unwrap();

        assert_eq!(positions.len(), 28);
        assert_eq!(positions[0].id, "Blantyre");
        for p in &positions {
            assert!((0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y));
        }
    }
}
