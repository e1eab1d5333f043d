//! moviedash - movie dataset explorer CLI.

/// Application configuration (TOML).
mod config;
/// Loaded dataset and API clients.
mod context;
/// `MIN..MAX` range arguments.
mod range;
/// Terminal UI components.
mod tui;

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use moviedash_api::justwatch::Country;
use moviedash_api::omdb::MetadataField;
use moviedash_data::{
    Bounds, MovieCriteria, PeopleView, Profession, filter_by_people, filter_movies,
    similar_movies,
};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{AppConfig, resolve_config_path};
use crate::context::{AppContext, OfferLookup, select_movie};
use crate::range::parse_bounds;

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Override dataset directory.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Show dataset summary.
    Info,
    /// List movies matching attribute filters.
    Movies(MovieArgs),
    /// List movies of selected people.
    People(PeopleArgs),
    /// Show links, metadata and similar movies for one movie.
    Details(DetailsArgs),
    /// Show streaming offers for a title.
    Offers(OffersArgs),
    /// Browse filtered movies in a terminal UI.
    Browse(MovieArgs),
    /// Browse movies by people in a terminal UI.
    BrowsePeople(PeopleArgs),
    /// Print a shell completion script.
    Completions(CompletionsArgs),
}

/// Movie attribute filters, shared by `movies` and `browse`.
#[derive(clap::Args)]
struct MovieArgs {
    /// Release year range (MIN..MAX).
    #[arg(long, value_parser = parse_bounds::<u16>, default_value = "2000..2021")]
    year: Bounds<u16>,

    /// Rating range (MIN..MAX).
    #[arg(long, value_parser = parse_bounds::<f64>, default_value = "7..10")]
    rating: Bounds<f64>,

    /// Vote count range (MIN..MAX).
    #[arg(long, value_parser = parse_bounds::<u64>, default_value = "100000..1000000")]
    votes: Bounds<u64>,

    /// Runtime range in minutes (MIN..MAX).
    #[arg(long, value_parser = parse_bounds::<u32>, default_value = "90..160")]
    runtime: Bounds<u32>,

    /// Genres a movie must all have (comma-separated; empty for any).
    #[arg(long, value_delimiter = ',', default_value = "crime,drama")]
    genres: Vec<String>,
}

impl MovieArgs {
    /// Converts the arguments into filter criteria.
    fn criteria(&self) -> MovieCriteria {
        MovieCriteria {
            year: self.year,
            rating: self.rating,
            votes: self.votes,
            runtime: self.runtime,
            genres: self
                .genres
                .iter()
                .map(|g| g.trim().to_lowercase())
                .filter(|g| !g.is_empty())
                .collect(),
        }
    }
}

/// Arguments for the `people` and `browse-people` subcommands.
#[derive(clap::Args)]
struct PeopleArgs {
    /// Profession categories (comma-separated).
    #[arg(long, value_delimiter = ',', default_value = "director")]
    categories: Vec<Profession>,

    /// Person labels to select; defaults depend on the categories.
    #[arg(long)]
    names: Vec<String>,

    /// Release year range (MIN..MAX).
    #[arg(long, value_parser = parse_bounds::<u16>, default_value = "2000..2021")]
    year: Bounds<u16>,
}

/// Arguments for the `details` subcommand.
#[derive(clap::Args)]
struct DetailsArgs {
    /// Exact movie title.
    #[arg(long, conflicts_with = "id", required_unless_present = "id")]
    title: Option<String>,

    /// IMDb identifier (e.g. tt1375666).
    #[arg(long)]
    id: Option<String>,
}

/// Arguments for the `offers` subcommand.
#[derive(clap::Args)]
struct OffersArgs {
    /// Movie title to search for.
    #[arg(long)]
    title: String,

    /// Country code (defaults to the configured country).
    #[arg(long)]
    country: Option<Country>,
}

/// Arguments for the `completions` subcommand.
#[derive(clap::Args)]
struct CompletionsArgs {
    /// Target shell.
    shell: Shell,
}

/// Loads the config and dataset into an application context.
///
/// # Errors
///
/// Returns an error if the config cannot be read or the dataset fails to load.
#[instrument(skip_all)]
fn load_context(cli: &Cli) -> Result<AppContext> {
    let config_path = resolve_config_path(cli.dir.as_ref())?;
    let config = AppConfig::load(&config_path)?;
    let data_dir = config.data_dir(cli.data_dir.as_ref());
    tracing::debug!(config = %config_path.display(), data = %data_dir.display(), "Resolved paths");
    AppContext::build(&config, &data_dir)
}

/// Runs the `info` subcommand.
#[instrument(skip_all)]
fn run_info(ctx: &AppContext) {
    let dataset = ctx.dataset();

    tracing::info!("Last updated: {}", dataset.last_updated());
    tracing::info!(
        "Movies: {}  People: {}  Genre combinations: {}",
        dataset.movies().len(),
        dataset.people().len(),
        dataset.genres().len()
    );
    tracing::info!("Genres: {}", dataset.genre_options().join(", "));
    tracing::info!(
        "Professions: {}",
        Profession::ALL
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
}

/// Runs the `movies` subcommand.
///
/// # Errors
///
/// Returns an error if a selected genre is unknown.
#[instrument(skip_all)]
fn run_movies(ctx: &AppContext, args: &MovieArgs) -> Result<()> {
    let movies = filter_movies(ctx.dataset(), &args.criteria())?;

    tracing::info!("Title\t\t\tYear\tRating\tVotes\tRuntime\tGenres");
    for movie in &movies {
        tracing::info!(
            "{}\t\t{}\t{:.1}\t{}\t{}\t{}",
            movie.title,
            movie.year,
            movie.rating,
            movie.votes,
            movie
                .runtime
                .map_or_else(|| String::from("-"), |r| r.to_string()),
            movie.genres,
        );
    }
    tracing::info!("Total: {} movies", movies.len());

    Ok(())
}

/// Runs the `people` subcommand.
#[instrument(skip_all)]
fn run_people(ctx: &AppContext, args: &PeopleArgs) {
    let dataset = ctx.dataset();
    let categories: BTreeSet<Profession> = args.categories.iter().copied().collect();
    let view = PeopleView::new(dataset.people(), &categories);

    let selected: BTreeSet<String> = if args.names.is_empty() {
        view.default_selection(ctx.default_people())
            .into_iter()
            .collect()
    } else {
        let choices = view.choices();
        for name in &args.names {
            if !choices.contains(&name.as_str()) {
                tracing::warn!(name = %name, "Not among the people in the selected categories");
            }
        }
        args.names.iter().cloned().collect()
    };

    tracing::info!(
        "Selected: {}",
        selected.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
    );

    let rows = filter_by_people(dataset, &view, &selected, args.year);

    tracing::info!("Person\t\t\tTitle\t\t\tYear\tRating");
    for row in &rows {
        tracing::info!(
            "{}\t\t{}\t\t{}\t{:.1}",
            row.label,
            row.movie.title,
            row.movie.year,
            row.movie.rating,
        );
    }
    tracing::info!("Total: {} movies", rows.len());
}

/// Runs the `details` subcommand.
///
/// # Errors
///
/// Returns an error if the movie cannot be found.
#[instrument(skip_all)]
async fn run_details(ctx: &AppContext, args: &DetailsArgs) -> Result<()> {
    let dataset = ctx.dataset();
    let movie = select_movie(dataset, args.title.as_deref(), args.id.as_deref())?;
    let public_id = dataset.resolve_public_id(movie.code)?;

    tracing::info!(
        "{} ({})  {}  rating {:.1}  votes {}",
        movie.title,
        movie.year,
        public_id,
        movie.rating,
        movie.votes
    );

    let links = ctx.links(movie, ctx.country()).await?;
    for link in links.all() {
        tracing::info!("{}\t{}", link.site, link.url);
    }

    let metadata = ctx.metadata(public_id).await;
    for (field, value) in metadata.iter() {
        if field == MetadataField::Poster {
            tracing::info!("Poster\t{value}");
        } else {
            tracing::info!("{}\t{}", field.label(), value);
        }
    }

    let similar = similar_movies(dataset, movie.code);
    tracing::info!("Similar movies:");
    for s in &similar {
        tracing::info!("{}\t{}\t{:.1}", s.title, s.year, s.rating);
    }
    tracing::info!("Total: {} similar movies", similar.len());

    Ok(())
}

/// Runs the `offers` subcommand.
#[instrument(skip_all)]
async fn run_offers(ctx: &AppContext, args: &OffersArgs) {
    let country = args.country.unwrap_or_else(|| ctx.country());

    match ctx.offers(&args.title, country).await {
        OfferLookup::Found(table) => {
            tracing::info!("{} ({})", table.title, table.country);
            for (label, cells) in table.transposed() {
                tracing::info!("{label}\t{}", cells.join("\t"));
            }
            tracing::info!("Total: {} offers", table.rows().len());
        }
        OfferLookup::NoData(message) => tracing::info!("{message}"),
    }
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if a selected genre is unknown or the TUI fails.
#[instrument(skip_all)]
async fn run_browse(ctx: &AppContext, args: &MovieArgs) -> Result<()> {
    let movies = filter_movies(ctx.dataset(), &args.criteria())?;

    if movies.is_empty() {
        tracing::info!("No movies match the filters.");
        return Ok(());
    }

    tracing::info!("Loaded {} movies. Launching TUI...", movies.len());
    crate::tui::run_movie_browser(ctx, &movies)
        .await
        .context("movie browser TUI failed")
}

/// Runs the `browse-people` subcommand.
///
/// # Errors
///
/// Returns an error if the TUI fails.
#[instrument(skip_all)]
fn run_browse_people(ctx: &AppContext, args: &PeopleArgs) -> Result<()> {
    let categories: BTreeSet<Profession> = args.categories.iter().copied().collect();
    tracing::info!(
        people = ctx.dataset().people().len(),
        "Launching people browser..."
    );
    crate::tui::run_people_browser(ctx, &categories, &args.names, args.year)
        .context("people browser TUI failed")
}

/// Writes a completion script for `shell` to stdout.
fn run_completions(args: &CompletionsArgs) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_owned();
    clap_complete::generate(args.shell, &mut cmd, name, &mut std::io::stdout());
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    if let Commands::Completions(args) = &cli.command {
        run_completions(args);
        return Ok(());
    }

    let ctx = load_context(&cli)?;
    match &cli.command {
        Commands::Info => {
            run_info(&ctx);
            Ok(())
        }
        Commands::Movies(args) => run_movies(&ctx, args),
        Commands::People(args) => {
            run_people(&ctx, args);
            Ok(())
        }
        Commands::Details(args) => run_details(&ctx, args).await,
        Commands::Offers(args) => {
            run_offers(&ctx, args).await;
            Ok(())
        }
        Commands::Browse(args) => run_browse(&ctx, args).await,
        Commands::BrowsePeople(args) => run_browse_people(&ctx, args),
        Commands::Completions(_) => Ok(()),
    }
}
