use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use serde::Serialize;
use serde_json::json;
use tracing::info;

use multimarmore::app::cache::TtlCache;
use multimarmore::app::export::{Sheet, default_file_name};
use multimarmore::app::ports::{DeploymentStore, SpreadsheetExporter};
use multimarmore::app::repository::DEFAULT_CACHE_TTL_SECS;
use multimarmore::app::stock::summarize_stock;
use multimarmore::app::{Repository, RetryOptions, SchemaSafeWriter, WriteReport};
use multimarmore::domain::{Deployment, Filter, Resource, SelectQuery, WritePayload};
use multimarmore::error;
use multimarmore::infra::adapters::{PostgrestClient, TomlDeploymentStore};
use multimarmore::infra::config::{process_env, resolve_deployment};
use multimarmore::infra::export::CsvExporter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Deployment name from deployments.toml
    #[arg(long, global = true)]
    deployment: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print rows of a resource as JSON
    List {
        resource: Resource,
        #[arg(long)]
        limit: Option<usize>,
        /// Equality filter, `column=value`; repeatable
        #[arg(long = "eq", value_parser = parse_filter)]
        filters: Vec<Filter>,
    },
    /// Write a resource to a CSV spreadsheet
    Export {
        resource: Resource,
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,
    },
    /// Insert one row; unknown columns are dropped and retried
    Insert {
        resource: Resource,
        #[arg(long, value_parser = parse_payload)]
        data: WritePayload,
        #[arg(long)]
        max_retries: Option<usize>,
    },
    /// Update one row by id; unknown columns are dropped and retried
    Update {
        resource: Resource,
        id: String,
        #[arg(long, value_parser = parse_payload)]
        data: WritePayload,
        #[arg(long)]
        max_retries: Option<usize>,
    },
    /// Delete one row by id
    Delete { resource: Resource, id: String },
    /// Net stock per product, from movements
    Stock,
    /// List configured deployments
    Deployments,
    /// Add or replace a deployment in deployments.toml
    AddDeployment {
        name: String,
        #[arg(long)]
        url: String,
        #[arg(long)]
        anon_key: String,
        #[arg(long)]
        default: bool,
    },
}

impl Command {
    fn max_retries(&self) -> Option<usize> {
        match self {
            Self::Insert { max_retries, .. } | Self::Update { max_retries, .. } => *max_retries,
            _ => None,
        }
    }
}

fn parse_filter(pair: &str) -> Result<Filter, String> {
    Filter::parse_eq(pair).ok_or_else(|| format!("expected column=value, got '{}'", pair))
}

fn parse_payload(raw: &str) -> Result<WritePayload, String> {
    let value = serde_json::from_str(raw).map_err(|e| format!("invalid JSON: {}", e))?;
    WritePayload::from_json(value).map_err(|e| e.to_string())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", serde_json::to_string_pretty(value)?)?;
    Ok(())
}

fn report_write(report: WriteReport) -> Result<()> {
    let (outcome, removed) = report.into_parts();
    match outcome {
        Ok(rows) => print_json(&json!({
            "rows": rows,
            "removed_columns": removed.as_slice(),
        })),
        Err(failure) => Err(eyre!(
            "{} (removed columns: {:?})",
            failure,
            removed.as_slice()
        )),
    }
}

fn list_deployments(store: &dyn DeploymentStore) -> Result<()> {
    let default = store.default_deployment()?.map(|d| d.name);
    let deployments: Vec<_> = store
        .load_all()?
        .into_iter()
        .map(|d| {
            json!({
                "name": d.name,
                "url": d.url,
                "schema": d.schema,
                "default": default.as_deref() == Some(d.name.as_str()),
            })
        })
        .collect();
    print_json(&deployments)
}

async fn run(command: Command, repo: &Repository) -> Result<()> {
    match command {
        Command::List {
            resource,
            limit,
            filters,
        } => {
            let mut query = filters
                .into_iter()
                .fold(SelectQuery::ordered(resource), SelectQuery::filter);
            if let Some(limit) = limit {
                query = query.limit(limit);
            }
            print_json(&repo.fetch_rows(&query).await?)
        }
        Command::Export {
            resource,
            out,
            columns,
        } => {
            let rows = repo.fetch_rows(&SelectQuery::ordered(resource)).await?;
            let columns = (!columns.is_empty()).then_some(columns);
            let sheet = Sheet::from_rows(&rows, columns.as_deref());
            let path = out.unwrap_or_else(|| PathBuf::from(default_file_name(resource)));
            let summary = CsvExporter::new().export(&sheet, &path)?;
            print_json(&json!({
                "path": summary.path,
                "rows": summary.rows,
            }))
        }
        Command::Insert { resource, data, .. } => {
            report_write(repo.insert(resource, &data).await?)
        }
        Command::Update {
            resource, id, data, ..
        } => report_write(repo.update(resource, &id, &data).await?),
        Command::Delete { resource, id } => print_json(&repo.delete(resource, &id).await?),
        Command::Stock => {
            let products = repo.products().await?;
            let totals = summarize_stock(&repo.movements(None).await?);
            let lines: Vec<_> = totals
                .into_iter()
                .map(|(product_id, balance)| {
                    let name = products
                        .iter()
                        .find(|p| p.id == product_id)
                        .map(|p| p.name.as_str());
                    json!({ "produto_id": product_id, "nome": name, "saldo": balance })
                })
                .collect();
            print_json(&lines)
        }
        Command::Deployments | Command::AddDeployment { .. } => {
            Err(eyre!("deployment commands do not need a backend"))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    error::install_hooks()?;
    error::init_tracing();

    let args = Args::parse();
    let store = TomlDeploymentStore::new()?;

    match args.command {
        Command::Deployments => return list_deployments(&store),
        Command::AddDeployment {
            name,
            url,
            anon_key,
            default,
        } => {
            let deployment = Deployment::new(name, url, anon_key)?;
            store.save(&deployment, default)?;
            info!(
                deployment = %deployment.name,
                path = %store.storage_path().display(),
                "saved deployment"
            );
            return Ok(());
        }
        _ => {}
    }

    let deployment = resolve_deployment(&store, args.deployment.as_deref(), process_env)?;
    info!(
        deployment = %deployment.name,
        url = %deployment.url,
        key = %deployment.masked_key(),
        "using deployment"
    );

    let max_retries = args
        .command
        .max_retries()
        .unwrap_or(deployment.max_retries);
    let client = Arc::new(PostgrestClient::new(&deployment)?);
    let repo = Repository::new(
        client,
        SchemaSafeWriter::new(RetryOptions::with_max_retries(max_retries)),
        TtlCache::new(DEFAULT_CACHE_TTL_SECS),
    );

    run(args.command, &repo).await
}
