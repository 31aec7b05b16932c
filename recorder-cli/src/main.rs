//! Recorder CLI
//!
//! Command-line front end for the currency and statement managers.
//! Results are printed to stdout as JSON; logs go to stderr.

mod config;

use std::str::FromStr;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use recorder_engine::{Managers, Repo};
use recorder_types::{
    CreateCurrencyRequest, CreateStatementRequest, CurrencyId, CurrencySortBy, Paging,
    ParseSortError, Repository, RepositoryFactory, Sort, SortDirection, StatementId,
    StatementSortBy, UpdateCurrencyRequest, UpdateStatementRequest, User, UserId,
};

#[derive(Parser)]
#[command(name = "recorder")]
#[command(author, version, about = "Money recorder CLI", long_about = None)]
struct Cli {
    /// Store to operate on: memory://, sqlite:<path> or postgres://...
    ///
    /// Overrides DATABASE_URL. The memory store lives only for one invocation.
    #[arg(long)]
    database_url: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Currency operations
    Currency {
        #[command(subcommand)]
        action: CurrencyCommands,
    },
    /// Statement operations
    Statement {
        #[command(subcommand)]
        action: StatementCommands,
    },
    /// User seeding
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
}

#[derive(Subcommand)]
enum CurrencyCommands {
    /// Create a new currency
    Create {
        /// Currency name
        name: String,
        #[arg(long)]
        symbol: String,
        /// Acting user id
        #[arg(long)]
        by: UserId,
    },
    /// Replace a currency's name and symbol
    Update {
        /// Currency ID (UUID)
        id: CurrencyId,
        #[arg(long)]
        name: String,
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        by: UserId,
    },
    /// Delete a currency
    Delete {
        id: CurrencyId,
    },
    /// Get currency details
    Get {
        id: CurrencyId,
    },
    /// List currencies
    List {
        #[command(flatten)]
        query: ListArgs,
    },
    /// Count currencies
    Count {
        #[arg(long, default_value = "")]
        keyword: String,
    },
}

#[derive(Subcommand)]
enum StatementCommands {
    /// Create a new statement
    Create {
        /// Statement name
        name: String,
        /// Denominating currency ID (UUID)
        #[arg(long)]
        currency: CurrencyId,
        #[arg(long)]
        by: UserId,
    },
    /// Replace a statement's name and currency
    Update {
        /// Statement ID (UUID)
        id: StatementId,
        #[arg(long)]
        name: String,
        #[arg(long)]
        currency: CurrencyId,
        #[arg(long)]
        by: UserId,
    },
    /// Delete a statement
    Delete {
        id: StatementId,
    },
    /// Get statement details, including its currency
    Get {
        id: StatementId,
    },
    /// List statements
    List {
        #[command(flatten)]
        query: ListArgs,
    },
    /// Count statements
    Count {
        #[arg(long, default_value = "")]
        keyword: String,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Add a user that audit fields can refer to
    Add {
        id: UserId,
        name: String,
    },
    /// List users
    List,
}

/// Filter, sort and paging options shared by both list commands.
#[derive(Args)]
struct ListArgs {
    /// Case-sensitive substring of the name
    #[arg(long, default_value = "")]
    keyword: String,
    /// Sort key, e.g. name, created_on, updated_by
    #[arg(long)]
    sort: Option<String>,
    /// Sort direction (asc or desc)
    #[arg(long, default_value = "asc")]
    direction: SortDirection,
    /// 1-indexed page number
    #[arg(long)]
    page: Option<u32>,
    /// Rows per page
    #[arg(long, default_value = "10")]
    page_size: u32,
}

impl ListArgs {
    /// Parses `--sort` into the key enum of the listed entity.
    fn sort<K: FromStr<Err = ParseSortError>>(&self) -> Result<Option<Sort<K>>> {
        let Some(key) = self.sort.as_deref() else {
            return Ok(None);
        };
        Ok(Some(Sort::new(key.parse::<K>()?, self.direction)))
    }

    fn paging(&self) -> Result<Option<Paging>> {
        match self.page {
            Some(page) => Ok(Some(Paging::new(page, self.page_size)?)),
            None => Ok(None),
        }
    }
}

fn init_tracing(log_json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,recorder_engine=debug".into());

    tracing_subscriber::registry()
        .with(filter)
        .with(log_json.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .with((!log_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::Config::from_env()?.with_overrides(cli.database_url, cli.log_json);

    init_tracing(config.log_json);
    tracing::debug!("Using database: {}", config.database_url);

    // Build repository (handles connection and migration)
    let managers = Managers::connect(&config.database_url).await?;

    match cli.command {
        Commands::Currency { action } => run_currency(&managers, action).await?,
        Commands::Statement { action } => run_statement(&managers, action).await?,
        Commands::User { action } => run_user(&managers, action).await?,
    }

    Ok(())
}

async fn run_currency(managers: &Managers<Repo>, action: CurrencyCommands) -> Result<()> {
    let currencies = &managers.currencies;

    match action {
        CurrencyCommands::Create { name, symbol, by } => {
            let id = currencies
                .create_currency(CreateCurrencyRequest {
                    name,
                    symbol,
                    created_by: by,
                })
                .await?;
            print_json(&serde_json::json!({ "id": id }))?;
        }
        CurrencyCommands::Update {
            id,
            name,
            symbol,
            by,
        } => {
            currencies
                .update_currency(UpdateCurrencyRequest {
                    id,
                    name,
                    symbol,
                    updated_by: by,
                })
                .await?;
            println!("✓ Currency {id} updated");
        }
        CurrencyCommands::Delete { id } => {
            currencies.delete_currency(id).await?;
            println!("✓ Currency {id} deleted");
        }
        CurrencyCommands::Get { id } => {
            print_json(&currencies.get_currency(id).await?)?;
        }
        CurrencyCommands::List { query } => {
            let paging = query.paging()?;
            let items = currencies
                .get_currencies(&query.keyword, query.sort::<CurrencySortBy>()?, paging)
                .await?;
            match paging {
                Some(paging) => {
                    let total = currencies.get_currency_count(&query.keyword).await?;
                    print_json(&serde_json::json!({
                        "paging": paging.to_string(),
                        "total": total,
                        "total_pages": paging.total_pages(total),
                        "items": items,
                    }))?;
                }
                None => print_json(&items)?,
            }
        }
        CurrencyCommands::Count { keyword } => {
            println!("{}", currencies.get_currency_count(&keyword).await?);
        }
    }
    Ok(())
}

async fn run_statement(managers: &Managers<Repo>, action: StatementCommands) -> Result<()> {
    let statements = &managers.statements;

    match action {
        StatementCommands::Create { name, currency, by } => {
            let id = statements
                .create_statement(CreateStatementRequest {
                    name,
                    currency_id: currency,
                    created_by: by,
                })
                .await?;
            print_json(&serde_json::json!({ "id": id }))?;
        }
        StatementCommands::Update {
            id,
            name,
            currency,
            by,
        } => {
            statements
                .update_statement(UpdateStatementRequest {
                    id,
                    name,
                    currency_id: currency,
                    updated_by: by,
                })
                .await?;
            println!("✓ Statement {id} updated");
        }
        StatementCommands::Delete { id } => {
            statements.delete_statement(id).await?;
            println!("✓ Statement {id} deleted");
        }
        StatementCommands::Get { id } => {
            print_json(&statements.get_statement(id).await?)?;
        }
        StatementCommands::List { query } => {
            let paging = query.paging()?;
            let items = statements
                .get_statements(&query.keyword, query.sort::<StatementSortBy>()?, paging)
                .await?;
            match paging {
                Some(paging) => {
                    let total = statements.get_statement_count(&query.keyword).await?;
                    print_json(&serde_json::json!({
                        "paging": paging.to_string(),
                        "total": total,
                        "total_pages": paging.total_pages(total),
                        "items": items,
                    }))?;
                }
                None => print_json(&items)?,
            }
        }
        StatementCommands::Count { keyword } => {
            println!("{}", statements.get_statement_count(&keyword).await?);
        }
    }
    Ok(())
}

async fn run_user(managers: &Managers<Repo>, action: UserCommands) -> Result<()> {
    let mut uow = managers.currencies.factory().begin().await?;

    match action {
        UserCommands::Add { id, name } => {
            uow.add_user(&User::new(id, name)).await?;
            uow.commit().await?;
            tracing::info!(%id, "user added");
            println!("✓ User {id} added");
        }
        UserCommands::List => {
            let mut users = uow.list_users().await?;
            users.sort_by_key(|u| u.id);
            print_json(&users)?;
        }
    }
    Ok(())
}
