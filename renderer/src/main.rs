use clap::Parser;
use probe_timeline_renderer::cli::ProbeDiagramsCli;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = ProbeDiagramsCli::parse();
    probe_timeline_renderer::run::run(&cli)
}
