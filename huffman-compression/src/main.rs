use clap::Parser;
use env_logger::Env;
use huffman_compression::{config::Config, driver};

fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::parse();
    driver::run(&config)
}
