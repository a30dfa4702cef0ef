use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
    #[arg(short, long)]
    pub configuration_file: Option<String>,
    #[arg(short, long)]
    pub verbosity: Option<log::LevelFilter>,
}

#[derive(Subcommand)]
pub enum Command {
    /// logs in and reports the session
    SessionDiagnostic {
        /// show the token
        #[arg(long)]
        show_token: bool,
    },
    /// prints the current cart
    Cart,
    /// adds a product to the cart, the quantity is sent as given
    Add {
        product_id: i64,
        #[arg(allow_hyphen_values = true)]
        quantity: Option<i64>,
    },
    /// removes a cart line by its cart_id (see the cart command)
    Remove { cart_id: i64 },
    /// removes every line of the cart
    Clear,
    /// loads an order
    Order { order_id: i64 },
    /// asks the configured model for a failure analysis
    Analyze {
        #[arg(long)]
        test_name: String,
        #[arg(long, default_value = "Exception")]
        error_type: String,
        #[arg(long)]
        message: String,
        /// file holding the full traceback
        #[arg(long)]
        traceback_file: Option<String>,
    },
}
