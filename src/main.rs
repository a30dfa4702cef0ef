use clap::Parser;
use log::{error, info};

use opencart_api_client::core::{
    analysis::FailureReport,
    cli::{Cli, Command},
    configuration::get_configuration,
    core as commands, logger,
};

const DEFAULT_CONFIGURATION_FILE: &str = "config.toml";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    let conf_path = cli
        .configuration_file
        .clone()
        .unwrap_or_else(|| DEFAULT_CONFIGURATION_FILE.to_string());

    let conf = get_configuration(conf_path).await?;

    let _logger = logger::init(&conf.log, cli.verbosity).map_err(|e| e.to_string())?;

    info!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let res = match cli.command {
        Command::SessionDiagnostic { show_token } => {
            commands::session_diagnostic(&conf, show_token).await
        }
        Command::Cart => commands::show_cart(&conf).await,
        Command::Add {
            product_id,
            quantity,
        } => commands::add_to_cart(&conf, product_id, quantity.unwrap_or(1)).await,
        Command::Remove { cart_id } => commands::remove_from_cart(&conf, cart_id).await,
        Command::Clear => commands::clear_cart(&conf).await,
        Command::Order { order_id } => commands::show_order(&conf, order_id).await,
        Command::Analyze {
            test_name,
            error_type,
            message,
            traceback_file,
        } => {
            let traceback = match traceback_file {
                Some(path) => Some(tokio::fs::read_to_string(path).await?),
                None => None,
            };

            let report = FailureReport {
                test_name,
                error_type,
                error_message: message,
                traceback,
            };

            match commands::analyze_failure(&conf, &report).await {
                Ok(Some(analysis)) => {
                    println!("{}", analysis.render());
                    Ok(())
                }
                Ok(None) => {
                    println!("AI failure analysis disabled");
                    Ok(())
                }
                Err(e) => Err(e),
            }
        }
    };

    if let Err(e) = &res {
        error!("{e}");
    }

    res
}
