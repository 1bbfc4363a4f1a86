use clap::Parser;

fn main() {
    let cli = bestplanctl::Cli::parse();
    if let Err(err) = bestplanctl::run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
