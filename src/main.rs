use tracing_subscriber::EnvFilter;
use yash::Interpreter;
use yash::cli::{self, Invocation};
use yash::{LineSource, Terminal};

fn init_logging() {
    let filter = EnvFilter::try_from_env("YASH_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_terminal() -> anyhow::Result<Box<dyn LineSource>> {
    Ok(Box::new(Terminal::new()?))
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let invocation: Invocation = cli::parse_args(&args);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "yash starting");

    let mut sh = Interpreter::default();
    let code = cli::launch(invocation, &mut sh, open_terminal)?;
    sh.shutdown();
    std::process::exit(code);
}
