mod query;

use clap::Parser;
use dirsearch_core::{Config, DirectorySearch, Person, QueryExpression};
use dirsearch_ldap::LdapClientFactory;

#[derive(Parser)]
#[command(name = "dirsearch", about = "Look people up in an LDAP directory")]
struct Cli {
    /// Log at debug level to stderr (RUST_LOG takes precedence).
    #[arg(long)]
    debug: bool,

    /// Print results as a JSON array.
    #[arg(long)]
    json: bool,

    /// Print the compiled filter and exit without connecting.
    #[arg(long)]
    print_filter: bool,

    /// Directory host (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Directory port (overrides config).
    #[arg(long)]
    port: Option<u16>,

    /// Search base DN (overrides config).
    #[arg(long)]
    base: Option<String>,

    /// Maximum number of people to return; 0 = unlimited.
    #[arg(long, short = 'n')]
    limit: Option<u32>,

    /// Query expression as JSON, e.g. '{"equals":{"field":"lastName","value":"Smith"}}'.
    #[arg(long, conflicts_with = "terms")]
    filter_json: Option<String>,

    /// Query terms: field=value, field~value, !field=value. Combined with AND.
    terms: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let mut config = Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "config: falling back to built-in defaults");
        Config::defaults()
    });
    if let Some(host) = cli.host {
        config.directory.host = host;
    }
    if let Some(port) = cli.port {
        config.directory.port = port;
    }
    if let Some(base) = cli.base {
        config.directory.search_base = base;
    }
    let limit = cli.limit.unwrap_or(config.search.size_limit);

    let expr = match cli.filter_json {
        Some(json) => Some(QueryExpression::from_json(&json)?),
        None => query::parse_terms(&cli.terms).map_err(anyhow::Error::msg)?,
    };

    let searcher = DirectorySearch::new(config, LdapClientFactory::default())?;
    if cli.print_filter {
        println!("{}", searcher.compile(expr.as_ref()));
        return Ok(());
    }

    let people = searcher.search(expr, limit).await?;
    print_people(&people, cli.json)
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();
}

fn print_people(people: &[Person], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(people)?);
        return Ok(());
    }
    for person in people {
        println!("{}\t{}\t{}", person.dn, display_name(person), person.emails.join(", "));
    }
    Ok(())
}

fn display_name(person: &Person) -> String {
    if let Some(full) = person.full_name.as_deref() {
        return full.to_string();
    }
    [person.first_name.as_deref(), person.last_name.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
}
