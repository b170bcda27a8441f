// src/main.rs - Command-line front end for the warehouse administration API
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use strum::IntoEnumIterator;
use warehouse_admin::config::{load_config, Config};
use warehouse_admin::controller::ListController;
use warehouse_admin::entities::{Entity, EntityKind};
use warehouse_admin::forms::{CreateForm, DeleteConfirm, NoopListener, UpdateForm, ViewModal};
use warehouse_admin::gateway::{ApiTransport, Gateway, HttpTransport};
use warehouse_admin::models::{
    Account, Area, Batch, Category, Goods, Location, Retailer, StorageCondition, Supplier, UnitMeasure,
};
use warehouse_admin::notify::ConsoleNotifier;
use warehouse_admin::pagination::MAX_PAGE_SIZE;
use warehouse_admin::session::{token_expiry, SessionData, SessionStore};
use warehouse_admin::stats::{collect_dashboard, render_dashboard};
use warehouse_admin::status::EntityStatus;
use warehouse_admin::table::TableView;

// ==================== CLI ====================

#[derive(Parser)]
#[command(name = "warehouse-admin", version, about = "Warehouse inventory administration client")]
struct Cli {
    /// Overrides api.base_url
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List one page of records
    List(ListArgs),
    /// Show a single record
    Show { entity: EntityKind, id: i64 },
    /// Create a record from key=value pairs
    Create {
        entity: EntityKind,
        #[arg(long = "set", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },
    /// Change fields of an existing record
    Update {
        entity: EntityKind,
        id: i64,
        #[arg(long = "set", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },
    /// Delete a record
    Delete {
        entity: EntityKind,
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Record counts per status for every entity
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// Store tokens issued by the backend
    Login {
        #[arg(long, env = "WAREHOUSE_ACCESS_TOKEN")]
        access_token: String,
        #[arg(long)]
        refresh_token: Option<String>,
        /// JSON object describing the signed-in user
        #[arg(long)]
        user_info: Option<String>,
    },
    /// Forget stored tokens
    Logout,
}

#[derive(Args)]
struct ListArgs {
    entity: EntityKind,
    #[arg(long)]
    search: Option<String>,
    #[arg(long, value_parser = parse_status)]
    status: Option<EntityStatus>,
    /// Availability filter (locations only)
    #[arg(long)]
    available: Option<bool>,
    #[arg(long)]
    sort: Option<String>,
    #[arg(long)]
    desc: bool,
    #[arg(long, default_value_t = 1)]
    page: u32,
    #[arg(long)]
    page_size: Option<u32>,
    /// Print CSV instead of an aligned table
    #[arg(long)]
    csv: bool,
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim().to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{}'", raw)),
    }
}

fn parse_status(raw: &str) -> Result<EntityStatus, String> {
    EntityStatus::parse(raw).ok_or_else(|| format!("unknown status '{}' (use active or inactive)", raw))
}

// ==================== APP ====================

struct App {
    config: Config,
    transport: Arc<dyn ApiTransport>,
    notifier: Arc<ConsoleNotifier>,
}

impl App {
    fn gateway<T: Entity>(&self) -> Gateway<T> {
        Gateway::new(Arc::clone(&self.transport))
    }

    fn check_errors(&self) -> Result<()> {
        match self.notifier.error_count() {
            0 => Ok(()),
            n => anyhow::bail!("{} error(s) reported", n),
        }
    }
}

macro_rules! for_entity {
    ($kind:expr, $func:ident($($arg:expr),*)) => {
        match $kind {
            EntityKind::Area => $func::<Area>($($arg),*).await,
            EntityKind::Location => $func::<Location>($($arg),*).await,
            EntityKind::StorageCondition => $func::<StorageCondition>($($arg),*).await,
            EntityKind::Goods => $func::<Goods>($($arg),*).await,
            EntityKind::Category => $func::<Category>($($arg),*).await,
            EntityKind::UnitMeasure => $func::<UnitMeasure>($($arg),*).await,
            EntityKind::Supplier => $func::<Supplier>($($arg),*).await,
            EntityKind::Retailer => $func::<Retailer>($($arg),*).await,
            EntityKind::Batch => $func::<Batch>($($arg),*).await,
            EntityKind::Account => $func::<Account>($($arg),*).await,
        }
    };
}

async fn list_records<T: Entity>(app: &App, args: &ListArgs) -> Result<()> {
    let controller: ListController<T> =
        ListController::new(app.gateway(), app.notifier.clone(), &app.config.list);
    let config = controller.gateway().config().clone();

    if let Some(field) = &args.sort {
        if !config.is_sortable(field) {
            anyhow::bail!("{} lists cannot be sorted by '{}'", T::KIND.label(), field);
        }
    }
    if args.available.is_some() && !config.supports(warehouse_admin::entities::ListFilter::Availability) {
        anyhow::bail!("{} lists cannot be filtered by availability", T::KIND.label());
    }

    controller.update_query(|query| {
        if let Some(size) = args.page_size {
            query.page_size = size.clamp(1, MAX_PAGE_SIZE);
        }
        if let Some(search) = &args.search {
            query.search = search.trim().to_string();
        }
        if let Some(field) = &args.sort {
            query.sort_field = field.clone();
        }
        query.sort_ascending = !args.desc;
        query.filters.status = args.status;
        query.filters.is_available = args.available;
        query.page_number = args.page.max(1);
    });
    controller.fetch().await;
    app.check_errors()?;

    let state = controller.state();
    let table = TableView::build(&config, &state.query, &state.items, state.total_count)?;
    if args.csv {
        print!("{}", table.to_csv()?);
    } else {
        print!("{}", table.render_text());
    }
    Ok(())
}

async fn show_record<T: Entity>(app: &App, id: i64) -> Result<()> {
    let mut view: ViewModal<T> = ViewModal::new(app.gateway(), app.notifier.clone(), Arc::new(NoopListener));
    view.open(id, None).await?;

    let details = view.details();
    let width = details.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    println!("{} #{}", T::KIND.label(), id);
    for (label, value) in details {
        println!("  {:<width$}  {}", label, value, width = width);
    }
    view.close();
    Ok(())
}

async fn create_record<T: Entity>(app: &App, assignments: &[(String, String)]) -> Result<()> {
    let mut form: CreateForm<T> = CreateForm::new(app.gateway(), app.notifier.clone(), Arc::new(NoopListener));
    form.open().await;
    for (key, value) in assignments {
        form.set_input(key, value)?;
    }
    form.submit().await?;
    Ok(())
}

async fn update_record<T: Entity>(app: &App, id: i64, assignments: &[(String, String)]) -> Result<()> {
    if assignments.is_empty() {
        anyhow::bail!("Nothing to update: pass at least one --set key=value");
    }
    let mut form: UpdateForm<T> = UpdateForm::new(app.gateway(), app.notifier.clone(), Arc::new(NoopListener));
    form.open(id, None).await?;
    for (key, value) in assignments {
        form.set_input(key, value)?;
    }
    form.submit().await?;
    Ok(())
}

async fn delete_record<T: Entity>(app: &App, id: i64, yes: bool) -> Result<()> {
    let mut modal: DeleteConfirm<T> = DeleteConfirm::new(app.gateway(), app.notifier.clone(), Arc::new(NoopListener));
    modal.open(id);

    if !yes && !confirm(&modal.prompt())? {
        modal.cancel();
        println!("Cancelled");
        return Ok(());
    }
    modal.confirm().await?;
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer).context("Failed to read confirmation")?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

// ==================== ENTRY POINT ====================

fn setup_logging(config: &Config) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            let level = config.logging.level.as_str();
            tracing_subscriber::EnvFilter::new(level)
        });

    let layer = tracing_subscriber::fmt::layer().with_writer(io::stderr);
    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "compact" {
        registry.with(layer.compact()).init();
    } else {
        registry.with(layer).init();
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config()?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
        config.validate().context("Configuration validation failed")?;
    }

    setup_logging(&config)?;
    config.print_startup_info();

    let session = Arc::new(
        SessionStore::open(&config.session.path)
            .with_context(|| format!("Failed to open session file {}", config.session.path.display()))?,
    );
    let transport: Arc<dyn ApiTransport> = Arc::new(HttpTransport::new(&config.api, Arc::clone(&session))?);
    let app = App {
        config,
        transport,
        notifier: Arc::new(ConsoleNotifier::new()),
    };

    match cli.command {
        Command::List(args) => for_entity!(args.entity, list_records(&app, &args)),
        Command::Show { entity, id } => for_entity!(entity, show_record(&app, id)),
        Command::Create { entity, set } => for_entity!(entity, create_record(&app, &set)),
        Command::Update { entity, id, set } => for_entity!(entity, update_record(&app, id, &set)),
        Command::Delete { entity, id, yes } => for_entity!(entity, delete_record(&app, id, yes)),
        Command::Stats { json } => {
            let kinds: Vec<EntityKind> = EntityKind::iter().collect();
            let stats = collect_dashboard(Arc::clone(&app.transport), &kinds, MAX_PAGE_SIZE).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print!("{}", render_dashboard(&stats));
            }
            Ok(())
        }
        Command::Login { access_token, refresh_token, user_info } => {
            let user_info = user_info
                .map(|raw| serde_json::from_str::<serde_json::Value>(&raw))
                .transpose()
                .context("--user-info must be valid JSON")?;
            if let Some(expiry) = token_expiry(&access_token) {
                log::info!("Access token valid until {}", expiry);
            }
            session.save(SessionData {
                access_token: Some(access_token),
                refresh_token,
                user_info,
            })?;
            println!("Session saved to {}", app.config.session.path.display());
            Ok(())
        }
        Command::Logout => {
            session.clear()?;
            println!("Signed out");
            Ok(())
        }
    }
}
