use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use listing_engine::{
    badge_label, config::prepare_base_url, confirm_details, format_inr, http_client,
    load_settings, CatalogService, DeleteOutcome, EditDeleteCoordinator, FetchOutcome,
    FormState, HttpCatalog, HttpSellerDirectory, ListController, ListingCreator, ListingEditor,
    StatusFilter, SubmitError, SubmitOutcome,
};
use shared::{
    domain::{Category, ListingId, SellerId, UserId},
    protocol::ListingSummary,
};

#[derive(Parser, Debug)]
struct Cli {
    /// Overrides the base URL from listings.toml and the environment.
    #[arg(long)]
    base_url: Option<String>,
    #[arg(long)]
    token: Option<String>,
    #[arg(long, default_value = "car")]
    category: Category,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    List {
        #[arg(long, default_value = "all")]
        status: String,
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    Show {
        id: i64,
    },
    Create {
        seller_id: i64,
        /// field=value pairs, e.g. --set price=550000
        #[arg(long = "set", value_parser = parse_assignment)]
        fields: Vec<(String, String)>,
    },
    Update {
        id: i64,
        #[arg(long)]
        seller_id: Option<i64>,
        #[arg(long = "set", value_parser = parse_assignment)]
        fields: Vec<(String, String)>,
    },
    Delete {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
    Confirm {
        id: i64,
        user_id: i64,
    },
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(field, value)| (field.trim().to_string(), value.to_string()))
        .ok_or_else(|| format!("expected field=value, got `{raw}`"))
}

fn field_value(value: &str) -> listing_engine::FieldValue {
    match value {
        "true" => true.into(),
        "false" => false.into(),
        other => other.into(),
    }
}

fn print_row(item: &ListingSummary) {
    println!(
        "{:>6}  {:<8}  {:>14}  {}  {}",
        item.id.0,
        badge_label(item.status.as_deref()),
        format_inr(item.price),
        item.title,
        item.subtitle()
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let cli = Cli::parse();

    let settings = load_settings();
    let raw_base_url = cli.base_url.as_deref().unwrap_or(&settings.base_url);
    let base_url = prepare_base_url(raw_base_url).context("invalid catalog base URL")?;
    let http = http_client(&settings).context("failed to build HTTP client")?;

    let mut catalog = HttpCatalog::new(http.clone(), base_url.clone(), cli.category);
    let mut sellers = HttpSellerDirectory::new(http, base_url);
    if let Some(token) = &cli.token {
        catalog = catalog.with_token(token.clone());
        sellers = sellers.with_token(token.clone());
    }
    let catalog: Arc<dyn CatalogService> = Arc::new(catalog);

    match cli.command {
        Command::List { status, pages } => {
            let list = ListController::from_settings(catalog, &settings);
            let mut filter = StatusFilter::default();
            if !filter.select(&status) && !filter.select(&status.to_ascii_uppercase()) {
                bail!("unknown status tab `{status}`");
            }
            if let FetchOutcome::Failed(message) = list.reset_fetch().await {
                bail!("failed to load {}s: {message}", cli.category.noun());
            }
            for _ in 1..pages {
                if !list.has_more().await {
                    break;
                }
                list.append_fetch().await;
            }
            let items = list.items().await;
            for item in filter.apply(&items, |item| item.status.as_deref()) {
                print_row(item);
            }
            if list.has_more().await {
                println!("(more available, pass --pages {})", pages + 1);
            }
        }
        Command::Show { id } => {
            let detail = catalog.get_by_id(ListingId(id)).await?;
            println!("{}", serde_json::to_string_pretty(&detail)?);
        }
        Command::Create { seller_id, fields } => {
            let form = fields
                .iter()
                .fold(FormState::blank(cli.category), |form, (field, value)| {
                    form.with(field, field_value(value))
                });
            match ListingCreator::new(catalog).submit(&form, SellerId(seller_id)).await {
                Ok(SubmitOutcome::Created(created)) => {
                    let id = created.id.map(|id| id.0.to_string()).unwrap_or_default();
                    println!("{} (id={id}, code={})", created.message, created.code);
                }
                Ok(_) => {}
                Err(err) => report_submit_error(err)?,
            }
        }
        Command::Update {
            id,
            seller_id,
            fields,
        } => {
            let editor = ListingEditor::load(catalog, ListingId(id)).await;
            if let Some(message) = editor.load_error().await {
                eprintln!("{message}");
            }
            for (field, value) in &fields {
                editor.set_value(field, field_value(value)).await;
            }
            match editor.submit(seller_id.map(SellerId)).await {
                Ok(SubmitOutcome::Updated { id, fields }) => {
                    let fields: Vec<_> = fields.into_iter().collect();
                    println!("updated {} {}: {}", cli.category.noun(), id.0, fields.join(", "));
                }
                Ok(_) => {}
                Err(err) => report_submit_error(err)?,
            }
        }
        Command::Delete { id, yes } => {
            let list = Arc::new(ListController::from_settings(catalog.clone(), &settings));
            list.reset_fetch().await;
            let item = list
                .items()
                .await
                .into_iter()
                .find(|item| item.id.0 == id)
                .unwrap_or_else(|| ListingSummary::new(ListingId(id), "", None));

            let coordinator = EditDeleteCoordinator::new(catalog, list);
            coordinator.select_for_menu(item).await;
            let Some(prompt) = coordinator.request_delete().await else {
                return Ok(());
            };
            println!("{}: {}", prompt.title, prompt.message);
            if !yes {
                println!("pass --yes to delete listing {}", prompt.id.0);
                return Ok(());
            }
            match coordinator.confirm_delete(&prompt).await {
                Ok(DeleteOutcome::Deleted { notice, .. }) => println!("{notice}"),
                Ok(DeleteOutcome::Ignored) => {}
                Err(err) => bail!("{}", err.user_message()),
            }
        }
        Command::Confirm { id, user_id } => {
            let details =
                confirm_details(catalog.as_ref(), &sellers, ListingId(id), UserId(user_id)).await?;
            println!("price: {}", details.price);
            println!("seller: {}", details.name);
            println!("phone: {}", details.phone_number);
        }
    }

    Ok(())
}

fn report_submit_error(err: SubmitError) -> Result<()> {
    if let SubmitError::Invalid(errors) = &err {
        for (field, message) in errors {
            eprintln!("{field}: {message}");
        }
    }
    bail!("{err}")
}
