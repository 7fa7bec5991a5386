mod platform;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let config = platform::config::Config::parse();
    platform::run_app(config)
}
