use clap::Parser;

fn main() {
    let cli = beacon_cli::Cli::parse();
    std::process::exit(beacon_cli::run(&cli));
}
