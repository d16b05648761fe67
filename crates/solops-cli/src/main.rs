// solops — terminal front end for the solops engine.
// Loads config from the environment, opens the wallet store, and either
// dispatches a chat line through the action registry or runs one of the
// direct store/balance commands.

use clap::{Parser, Subcommand};
use log::error;
use solops::{dispatch, ActionSpec, EngineConfig, EngineError, EngineState};

#[derive(Parser)]
#[command(name = "solops", version, about = "Conversational Solana operations")]
struct Cli {
    /// Emit results as JSON instead of plain text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Send a chat line through the action dispatcher.
    Chat {
        /// The message, e.g. "create 5 wallets with 0.1 sol".
        text: Vec<String>,
    },
    /// List the wallets in the store.
    Wallets,
    /// Read the on-chain balance of an address.
    Balance { address: String },
    /// Remove every wallet from the store.
    Clear,
    /// Print the action descriptors a host runtime can register.
    Actions,
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let state = match EngineState::new(EngineConfig::from_env()) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("solops: {e}");
            std::process::exit(1);
        }
    };

    let exit = match run(&cli, &state).await {
        Ok(()) => 0,
        Err(EngineError::Validation(msg)) => {
            eprintln!("solops: {msg}");
            2
        }
        Err(e) => {
            // Generic user-facing failure; the detail goes to the log.
            error!("[cli] Command failed: {e}");
            eprintln!("solops: operation failed, please try again");
            1
        }
    };
    std::process::exit(exit);
}

async fn run(cli: &Cli, state: &EngineState) -> solops::EngineResult<()> {
    match &cli.command {
        Command::Chat { text } => {
            let line = text.join(" ");
            if line.trim().is_empty() {
                return Err(EngineError::validation("empty message"));
            }
            let reply = dispatch(state, &line).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&reply)?);
            } else {
                println!("{}", reply.text);
            }
        }
        Command::Wallets => {
            let wallets = state.store.all()?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&wallets)?);
            } else if wallets.is_empty() {
                println!("no wallets");
            } else {
                for wallet in wallets {
                    println!("{}  {} SOL  ({})", wallet.address, wallet.balance_sol, wallet.network);
                }
            }
        }
        Command::Balance { address } => {
            let balance = state.get_balance(address).await?;
            if cli.json {
                println!("{}", serde_json::json!({ "address": address, "balance_sol": balance }));
            } else {
                println!("{balance} SOL");
            }
        }
        Command::Clear => {
            state.store.clear()?;
            println!("wallet store cleared");
        }
        Command::Actions => {
            for action in ActionSpec::all() {
                println!("{} — {}", action.name, action.description);
                for example in action.examples {
                    println!("    e.g. {example}");
                }
            }
        }
    }
    Ok(())
}
