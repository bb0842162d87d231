mod cli;
mod clock;
mod listing;
mod logging;
mod report;
mod runner;
mod util;

fn main() -> anyhow::Result<()> {
    let app = cli::parse();
    logging::init(app.verbose);
    runner::run(app)
}
