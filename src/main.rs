use clap::Parser;
use movieheat::cli::Cli;
use movieheat::logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);
    cli.run()
}
