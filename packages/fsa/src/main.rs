use clap::Parser;
use fsa_lib::{
    automaton::description::AutomatonDescription,
    config::{GeneralConfig, SessionConfig},
    logger::Logger,
    session::Session,
};

mod shell;

#[derive(Parser, Debug)]
#[command(name = "Finite State Automata Tool")]
#[command(version = "0.1")]
#[command(about = "Determinize, minimize and run finite automata", long_about = None)]
struct Args {
    /// JSON description of the automaton. Asked for interactively if missing.
    file: Option<String>,

    #[arg(short, long)]
    config: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = SessionConfig::from_optional_file(args.config)?;

    tracing_subscriber::fmt()
        .with_max_level(config.logger().get_log_level().to_tracing_level())
        .with_writer(std::io::stderr)
        .init();

    let logger = Logger::from_config(config.logger(), "Session".into())?;

    let mut shell = shell::Shell::new()?;

    let file = match args.file {
        Some(file) => file,
        None => shell.prompt("Automaton file: ")?,
    };

    tracing::debug!("Loading automaton from {}", file);
    let description = AutomatonDescription::<char>::from_file(&file)?;
    let session = Session::from_description(&description, config, logger.as_ref())?;

    shell.run(session)
}
