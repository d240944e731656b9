use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use freelance_ledger::cli::{
    handle_client_command, handle_contract_command, handle_expense_command, handle_goal_command,
    handle_invoice_command, handle_report_command, handle_session_command, ClientCommands,
    ContractCommands, ExpenseCommands, GoalCommands, InvoiceCommands, ReportCommands,
    SessionCommands,
};
use freelance_ledger::config::{LedgerPaths, Settings};
use freelance_ledger::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "freelance",
    version,
    about = "Terminal bookkeeping for freelancers",
    long_about = "Track clients, contracts, billable time, expenses and invoices, \
                  and see normalized monthly revenue and progress toward income \
                  goals from the command line."
)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new ledger
    Init,

    /// Show current configuration and paths
    Config,

    /// Client management commands
    #[command(subcommand)]
    Client(ClientCommands),

    /// Contract management commands
    #[command(subcommand)]
    Contract(ContractCommands),

    /// Time tracking commands
    #[command(subcommand)]
    Session(SessionCommands),

    /// Expense commands
    #[command(subcommand)]
    Expense(ExpenseCommands),

    /// Invoice commands
    #[command(subcommand)]
    Invoice(InvoiceCommands),

    /// Income goal commands
    #[command(subcommand)]
    Goal(GoalCommands),

    /// Dashboard and goal reports
    #[command(subcommand)]
    Report(ReportCommands),
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let paths = LedgerPaths::new()?;

    let Some(command) = cli.command else {
        println!("freelance - terminal bookkeeping for freelancers");
        println!();
        println!("Run 'freelance init' to create a ledger.");
        println!("Run 'freelance --help' for usage information.");
        return Ok(());
    };

    if let Commands::Init = command {
        let created = initialize_storage(&paths)?;
        if created {
            println!("Initialized ledger at: {}", paths.base_dir().display());
        } else {
            println!("Ledger already initialized at: {}", paths.base_dir().display());
        }
        return Ok(());
    }

    if !paths.is_initialized() {
        bail!("No ledger found at {}; run 'freelance init' first", paths.base_dir().display());
    }

    let settings = Settings::load_or_create(&paths)?;
    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match command {
        Commands::Init => {}
        Commands::Config => {
            println!("freelance-ledger Configuration");
            println!("==============================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:              {}", settings.currency_symbol);
            println!("  Date format:                  {}", settings.date_format);
            println!("  Hourly window (days):         {}", settings.hourly_window_days);
            println!("  Fixed-price fallback months:  {}", settings.fixed_price_fallback_months);
            println!("  Payment terms (days):         {}", settings.default_payment_terms_days);
        }
        Commands::Client(cmd) => handle_client_command(&storage, &settings, cmd)?,
        Commands::Contract(cmd) => handle_contract_command(&storage, &settings, cmd)?,
        Commands::Session(cmd) => handle_session_command(&storage, &settings, cmd)?,
        Commands::Expense(cmd) => handle_expense_command(&storage, &settings, cmd)?,
        Commands::Invoice(cmd) => handle_invoice_command(&storage, &settings, cmd)?,
        Commands::Goal(cmd) => handle_goal_command(&storage, &settings, cmd)?,
        Commands::Report(cmd) => handle_report_command(&storage, &settings, cmd)?,
    }

    Ok(())
}
