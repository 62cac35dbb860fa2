use clap::Parser;
use swarm_agent::runtime::{boot, cli};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    boot::init_logging();
    let args = cli::Cli::parse();

    let result = match boot::boot(args.config.as_deref()) {
        Ok(dispatcher) => cli::run(&dispatcher, args.command).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(output) => println!("{}", output.trim_end()),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
