use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracker::{persist, SessionConfig, State};

const HELP: &str = "\
commands:
  print                               show the current round
  step [duration]                     advance (default 1r)
  in <duration> <description...>      schedule a free-standing effect
  add <name> <hp>                     add an entity
  afflict <name> <duration> <desc...> attach a timed effect to an entity
  dmg <name> <amount>                 damage an entity
  del <name>                          remove an entity
  normalize                           re-base the round counter to 1
  undo                                revert the last change
  quit | exit                         save and leave
durations: <n>r rounds, <n>s seconds (multiple of 10), <n>m, <n>h, <n>d, <n>y";

#[derive(Subcommand)]
enum Cmd {
    /// Interactive session (default)
    Repl,
    /// Apply each argument as one command line, then save
    Exec {
        /// Command lines, e.g. "add goblin 7" "step 2r"
        #[arg(required = true)]
        commands: Vec<String>,
    },
    /// Print the stored state
    Show,
    /// Replace the stored state with a fresh one
    Reset,
}

#[derive(Parser)]
#[command(name = "tracker")]
#[command(about = "Round-by-round encounter tracker")]
struct Cli {
    /// State file (overrides the config file)
    #[arg(long, global = true)]
    state: Option<PathBuf>,
    /// YAML config file (defaults to ./tracker.yaml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Option<Cmd>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = SessionConfig::resolve(cli.config.as_deref())?;
    if let Some(state) = cli.state {
        config.state_file = state;
    }
    debug!(state_file = %config.state_file.display(), autosave = config.autosave, "config resolved");

    match cli.cmd.unwrap_or(Cmd::Repl) {
        Cmd::Repl => {
            let mut state = persist::load_state(&config.state_file)?;
            repl(&mut state, &config)?;
            persist::save_state(&config.state_file, &state, config.pretty)?;
        }
        Cmd::Exec { commands } => {
            let mut state = persist::load_state(&config.state_file)?;
            for line in &commands {
                match state.input(line) {
                    Ok(messages) => print_messages(&messages),
                    Err(e) => bail!("`{}`: {}", line, e),
                }
            }
            persist::save_state(&config.state_file, &state, config.pretty)?;
        }
        Cmd::Show => {
            let state = persist::load_state(&config.state_file)?;
            println!("{}", state);
        }
        Cmd::Reset => {
            persist::save_state(&config.state_file, &State::new(), config.pretty)?;
            println!("state reset");
        }
    }
    Ok(())
}

fn repl(state: &mut State, config: &SessionConfig) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();
    loop {
        write!(stdout, "{}", config.prompt)?;
        stdout.flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line).context("failed to read input")? == 0 {
            println!();
            break;
        }
        let text = line.trim();
        match text {
            "" => continue,
            "quit" | "exit" => break,
            "help" => println!("{}", HELP),
            _ => match state.input(text) {
                Ok(messages) => {
                    print_messages(&messages);
                    if config.autosave {
                        persist::save_state(&config.state_file, state, config.pretty)?;
                    }
                }
                Err(e) => println!("error: {}", e),
            },
        }
    }
    Ok(())
}

fn print_messages(messages: &[String]) {
    for msg in messages {
        println!("{}", msg);
    }
}
