use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use odx_client::{ClientError, ProxyClient};
use odx_warehouse::{Settings, companies, products, receiving};

#[derive(Parser, Debug)]
#[command(name = "odx-cli")]
#[command(about = "Warehouse operations against an ODX proxy gateway")]
struct Cli {
    /// Settings file (default: ODX_SETTINGS env var or ./odx-settings.json)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show or update connection settings
    Settings(SettingsArgs),
    /// List companies and which are selected
    Companies,
    /// Product catalog
    #[command(subcommand)]
    Products(ProductsCommand),
    /// Stock receiving
    #[command(subcommand)]
    Receive(ReceiveCommand),
}

#[derive(clap::Args, Debug)]
struct SettingsArgs {
    #[arg(long)]
    url: Option<String>,
    #[arg(long)]
    user_id: Option<String>,
    #[arg(long)]
    db: Option<String>,
    #[arg(long)]
    api_key: Option<String>,
    #[arg(long)]
    proxy_api_key: Option<String>,
    #[arg(long)]
    gateway_url: Option<String>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    #[arg(long, value_delimiter = ',')]
    companies: Option<Vec<i64>>,
    #[arg(long)]
    tz: Option<String>,
    /// Print secrets instead of masking them
    #[arg(long, action = ArgAction::SetTrue)]
    reveal: bool,
    /// Print settings as JSON
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum ProductsCommand {
    /// List one page of active products
    List {
        #[arg(long, default_value_t = 0)]
        offset: i64,
    },
    /// Create a product template
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        barcode: String,
        #[arg(long, default_value = "")]
        note: String,
    },
    /// Archive a product template
    Archive { template_id: i64 },
}

#[derive(Subcommand, Debug)]
enum ReceiveCommand {
    /// Find open incoming transfers by PO or picking number
    Find { query: String },
    /// Read the stock moves behind a picking
    Moves {
        #[arg(value_delimiter = ',')]
        move_ids: Vec<i64>,
    },
    /// Validate a fully received picking
    Validate { picking_id: i64 },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, String> {
    let settings_path = settings_path(cli.settings);

    let command = match cli.command {
        Commands::Settings(args) => return settings_command(&settings_path, args),
        other => other,
    };

    let settings = Settings::load(&settings_path).map_err(|error| {
        format!(
            "could not load settings from '{}': {error}. Run `odx-cli settings` first.",
            settings_path.display()
        )
    })?;
    let info = settings.client_info().map_err(|error| error.to_string())?;
    let client = ProxyClient::shared();
    client.configure(info, settings.timeout_secs);

    match execute(client, &settings, command).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(error) => Err(describe(error)),
    }
}

async fn execute(
    client: &ProxyClient,
    settings: &Settings,
    command: Commands,
) -> Result<(), ClientError> {
    let context = settings.execution_context();
    match command {
        Commands::Settings(_) => unreachable!("handled before configuring the client"),
        Commands::Companies => companies_command(client, settings).await,
        Commands::Products(command) => match command {
            ProductsCommand::List { offset } => {
                let items = products::fetch_products(client, context, offset).await?;
                for product in &items {
                    println!(
                        "{:>8}  {:<40}  avail {:>8}  barcode {}",
                        product.id,
                        product.name,
                        product
                            .qty_available
                            .as_ref()
                            .map(|qty| format!("{qty:.2}"))
                            .unwrap_or_else(|| "-".to_string()),
                        product.barcode.as_ref().map(String::as_str).unwrap_or("-"),
                    );
                }
                println!("{} product(s)", items.len());
                Ok(())
            }
            ProductsCommand::Add { name, barcode, note } => {
                let ids = products::create_product(client, context, &name, &barcode, &note).await?;
                println!("created template id(s): {ids:?}");
                Ok(())
            }
            ProductsCommand::Archive { template_id } => {
                let acknowledged = products::archive_product(client, context, template_id).await?;
                println!(
                    "template {template_id} {}",
                    if acknowledged { "archived" } else { "not archived" }
                );
                Ok(())
            }
        },
        Commands::Receive(command) => match command {
            ReceiveCommand::Find { query } => {
                let pickings = receiving::find_pickings(client, context, &query).await?;
                for picking in &pickings {
                    println!(
                        "{:>6}  {:<16}  {:<12}  {}  moves {:?}",
                        picking.id,
                        picking.name,
                        picking.origin.as_ref().map(String::as_str).unwrap_or("-"),
                        picking
                            .partner_id
                            .as_ref()
                            .and_then(|partner| partner.label.as_deref())
                            .unwrap_or("-"),
                        picking.move_ids,
                    );
                }
                println!("{} picking(s)", pickings.len());
                Ok(())
            }
            ReceiveCommand::Moves { move_ids } => {
                let moves = receiving::fetch_moves(client, context, &move_ids).await?;
                for stock_move in &moves {
                    println!(
                        "{:>6}  {:<40}  requested {:>8.2}  delivered {:>8.2}{}",
                        stock_move.id,
                        stock_move.product_id.label.as_deref().unwrap_or("-"),
                        stock_move.product_uom_qty,
                        stock_move.quantity,
                        if stock_move.fully_received() { "" } else { "  (short)" },
                    );
                }
                Ok(())
            }
            ReceiveCommand::Validate { picking_id } => {
                let validated = receiving::validate_picking(client, context, picking_id).await?;
                println!(
                    "picking {picking_id} {}",
                    if validated { "validated" } else { "not validated" }
                );
                Ok(())
            }
        },
    }
}

async fn companies_command(client: &ProxyClient, settings: &Settings) -> Result<(), ClientError> {
    let mut list = companies::list_companies(client, settings.execution_context()).await?;
    companies::apply_selection(&mut list, &settings.selected_companies);
    for company in &list {
        let mark = if company.selected.unwrap_or(false) { "*" } else { " " };
        println!("{mark} {:>4}  {}", company.id, company.name);
    }
    Ok(())
}

fn settings_command(path: &Path, args: SettingsArgs) -> Result<ExitCode, String> {
    let mut settings = Settings::load(path).unwrap_or_default();

    let mut changed = false;
    macro_rules! apply {
        ($field:ident) => {
            if let Some(value) = args.$field {
                settings.$field = value;
                changed = true;
            }
        };
    }
    apply!(url);
    apply!(user_id);
    apply!(db);
    apply!(api_key);
    apply!(proxy_api_key);
    apply!(gateway_url);
    apply!(timeout_secs);
    apply!(tz);
    if let Some(selected) = args.companies {
        settings.selected_companies = selected;
        changed = true;
    }

    if changed {
        settings.save(path).map_err(|error| error.to_string())?;
        println!("saved {}", path.display());
    }

    if args.json {
        let mut printable = settings.clone();
        printable.api_key = mask(&printable.api_key, args.reveal);
        printable.proxy_api_key = mask(&printable.proxy_api_key, args.reveal);
        let json = serde_json::to_string_pretty(&printable).map_err(|error| error.to_string())?;
        println!("{json}");
        return Ok(ExitCode::SUCCESS);
    }

    println!("url: {}", settings.url);
    println!("user_id: {}", settings.user_id);
    println!("db: {}", settings.db);
    println!("api_key: {}", mask(&settings.api_key, args.reveal));
    println!("proxy_api_key: {}", mask(&settings.proxy_api_key, args.reveal));
    println!("gateway_url: {}", settings.gateway_url);
    println!("timeout_secs: {}", settings.timeout_secs);
    println!("selected_companies: {:?}", settings.selected_companies);
    println!("tz: {}", settings.tz);
    Ok(ExitCode::SUCCESS)
}

fn settings_path(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| std::env::var_os("ODX_SETTINGS").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("odx-settings.json"))
}

fn mask(secret: &str, reveal: bool) -> String {
    if reveal {
        secret.to_string()
    } else if secret.is_empty() {
        "<unset>".to_string()
    } else {
        "<set>".to_string()
    }
}

/// Render the error taxonomy for the terminal: a backend rejection shows its
/// code and message, a transport fault or contract drift its own wording.
fn describe(error: ClientError) -> String {
    match error {
        ClientError::Server(server) => {
            format!("backend rejected the call ({}): {}", server.code, server.message)
        }
        other => other.to_string(),
    }
}
