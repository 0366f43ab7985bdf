use colored::Colorize;
use fsa_lib::{
    automaton::simulation::RunOutcome,
    session::{Determinized, Session},
};
use rustyline::{Config, Editor, error::ReadlineError, history::DefaultHistory};

const HELP_TEXT: &str = r#"
Available commands:
  d                 Determinize the automaton
  m                 Minimize the automaton
  read [word]       Read a word, asks for it if it is not given
  show              Show the automaton
  dot               Print the automaton in graphviz format
  clear             Clear the screen
  help              Show this help
  quit              Exit
"#;

enum Command {
    Continue,
    Quit,
}

pub struct Shell {
    editor: Editor<(), DefaultHistory>,
}

impl Shell {
    pub fn new() -> anyhow::Result<Self> {
        let config = Config::builder()
            .history_ignore_space(true)
            .auto_add_history(true)
            .build();

        Ok(Shell {
            editor: Editor::with_config(config)?,
        })
    }

    pub fn prompt(&mut self, prompt: &str) -> anyhow::Result<String> {
        Ok(self.editor.readline(prompt)?.trim().to_string())
    }

    pub fn run(&mut self, mut session: Session<'_, char>) -> anyhow::Result<()> {
        println!("{}", "Finite automata shell".bold().cyan());
        println!("{}", session.show());
        println!("Type 'help' for available commands.\n");

        loop {
            let prompt = format!("{} ", "fsa>".cyan());
            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    match self.execute(&mut session, line) {
                        Ok(Command::Continue) => {}
                        Ok(Command::Quit) => break,
                        Err(e) => println!("{}: {}\n", "Error".red(), e),
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("^D");
                    break;
                }
                Err(err) => {
                    println!("{}: {:?}", "Error".red(), err);
                    break;
                }
            }
        }

        println!("{}", "Bye.".dimmed());

        Ok(())
    }

    fn execute(
        &mut self,
        session: &mut Session<'_, char>,
        line: &str,
    ) -> anyhow::Result<Command> {
        let (command, argument) = match line.split_once(char::is_whitespace) {
            Some((command, argument)) => (command, Some(argument.trim())),
            None => (line, None),
        };

        match command.to_lowercase().as_str() {
            "d" => {
                match session.determinize() {
                    Determinized::AlreadyDeterministic => {
                        println!("{}\n", "This automaton is already determinized".yellow());
                    }
                    Determinized::Replaced { states } => {
                        println!("{}", format!("Determinized into {states} states").green());
                        println!("{}", session.show());
                    }
                }
            }
            "m" => {
                let report = session.minimize();
                if report.determinized_first {
                    println!(
                        "{}",
                        "This automaton is non-deterministic, determinizing first".yellow()
                    );
                }
                println!(
                    "{}",
                    format!(
                        "Minimized from {} to {} states",
                        report.states_before, report.states_after
                    )
                    .green()
                );
                println!("{}", session.show());
            }
            "read" => {
                let word = match argument {
                    Some(word) => word.to_string(),
                    None => self.prompt("Word to read: ")?,
                };
                let word = word.chars().collect::<Vec<_>>();

                let run = session.read(&word);
                if run.determinized_first() {
                    println!(
                        "{}",
                        "This automaton is non-deterministic, it was determinized before reading"
                            .yellow()
                    );
                }

                if *session.config().get_show_trace() {
                    for line in run.trace(&session.markers()) {
                        println!("    {line}");
                    }
                }

                let outcome = run.outcome().to_string();
                match run.outcome() {
                    RunOutcome::Accepted => println!("{}\n", outcome.bold().green()),
                    RunOutcome::Rejected | RunOutcome::UnrecognizedSymbol { .. } => {
                        println!("{}\n", outcome.bold().red())
                    }
                }
            }
            "show" => println!("{}", session.show()),
            "dot" => println!("{}", session.current().to_graphviz()),
            "clear" => print!("\x1B[2J\x1B[1;1H"),
            "help" | "?" => println!("{HELP_TEXT}"),
            "quit" | "exit" | "q" => return Ok(Command::Quit),
            _ => println!("{}\n", "Command not recognized".red()),
        }

        Ok(Command::Continue)
    }
}
