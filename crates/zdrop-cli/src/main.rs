//! ZDROP CLI Application

mod cli;

use clap::Parser as _;
#[cfg(feature = "prove")]
use cli::ClaimCommands;
use cli::{
    Cli, Commands, CommitmentCommands, ConfigCommands, KeyCommands, SetupCommands, StateCommands,
    VerifyCommands,
};
use zdrop_sdk::commands;

fn init_tracing() -> eyre::Result<()> {
    #[cfg(feature = "tokio-console")]
    {
        // tokio-console: layers the console subscriber with fmt
        use tracing_subscriber::prelude::*;
        tracing_subscriber::registry()
            .with(console_subscriber::spawn())
            .with(
                tracing_subscriber::fmt::layer().with_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
                ),
            )
            .try_init()
            .map_err(|e| eyre::eyre!("Failed to initialize tracing: {:?}", e))?;
    }

    #[cfg(not(feature = "tokio-console"))]
    {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .with_timer(tracing_subscriber::fmt::time::uptime())
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| eyre::eyre!("Failed to initialize tracing: {:?}", e))?;
    }

    Ok(())
}

async fn run_state(command: StateCommands) -> eyre::Result<()> {
    match command {
        StateCommands::Publish {
            state,
            config,
            sender,
        } => {
            let root = commands::state_publish(state.db, config, sender).await?;
            print_line(&root.to_string());
        }
        StateCommands::Submit {
            state,
            config,
            proof,
            params,
            sender,
        } => {
            let receipt = commands::state_submit(state.db, config, proof, params, sender).await?;
            print_line(&receipt.balance.to_string());
        }
        StateCommands::Commitment { state } => {
            let root = commands::state_commitment(state.db).await?;
            print_line(&root.map_or_else(|| "none".to_owned(), |root| root.to_string()));
        }
        StateCommands::Nullifier { state, nullifier } => {
            let used = commands::state_nullifier(state.db, nullifier).await?;
            print_line(&used.to_string());
        }
        StateCommands::Balance { state, account } => {
            let balance = commands::state_balance(state.db, account).await?;
            print_line(&balance.to_string());
        }
    }
    Ok(())
}

#[allow(clippy::print_stdout, reason = "Query results go to stdout")]
fn print_line(line: &str) {
    println!("{line}");
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> eyre::Result<()> {
    // Load .env file (fails silently if not found)
    let _ = dotenvy::dotenv();

    init_tracing()?;

    let cli = Cli::parse();

    let res = match cli.command {
        Commands::Key { command } => match command {
            KeyCommands::Generate { out, force } => {
                commands::key_generate(out, force).await.map(|_| ())
            }
            KeyCommands::Show { key } => commands::key_show(key).await.map(|_| ()),
        },
        Commands::Setup { command } => match command {
            SetupCommands::Params { out } => commands::generate_params_file(out).await,
        },
        Commands::Commitment { command } => match command {
            CommitmentCommands::Build { args } => commands::build_commitment(
                args.members,
                args.message,
                args.grant_amount,
                args.authority,
                args.config_out,
            )
            .await
            .map(|_| ()),
        },
        #[cfg(feature = "prove")]
        Commands::Claim { command } => match command {
            ClaimCommands::Prove { args } => commands::claim_prove(
                args.config,
                args.members,
                args.key,
                args.params,
                args.params_mode,
                args.proof_out,
            )
            .await
            .map(|_| ()),
        },
        Commands::Verify { command } => match command {
            VerifyCommands::Proof {
                config,
                proof,
                params,
            } => commands::verify_claim(config, proof, params).await,
        },
        Commands::State { command } => run_state(command).await,
        Commands::Config { command } => match command {
            ConfigCommands::Schema => commands::claim_configuration_schema(),
        },
    };

    if let Err(e) = res {
        tracing::error!("Error: {:?}", e);
        std::process::exit(1);
    }

    Ok(())
}
