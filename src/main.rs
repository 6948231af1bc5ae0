use appdrive_lib::{logging, Config};
use clap::Parser;

#[tokio::main]
async fn main() {
    logging::init();
    let config = Config::parse();

    if let Err(e) = appdrive_lib::run(config).await {
        log::error!("appdrive: {}", e);
        std::process::exit(1);
    }
}
