use clap::Parser;
use movie_night::core::ConfigProvider;
use movie_night::utils::{logger, validation::Validate};
use movie_night::{BotConfig, Coordinator, LocalStorage, OmdbClient};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser, Debug)]
#[command(name = "movie-night")]
#[command(about = "Collects movie suggestions and runs the weekly movie-night poll")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "botconfig.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Author name for lines that don't carry one
    #[arg(short, long, env = "USER", default_value = "anonymous")]
    user: String,

    /// Run a single command (e.g. `vote 2`) and exit instead of reading stdin
    #[arg(trailing_var_arg = true)]
    command: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match BotConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    logger::init_cli_logger(args.verbose, config.json_logs());
    tracing::info!("Starting {}", config.bot.name);
    tracing::debug!("Config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    if let Some(guild) = &config.bot.guild {
        tracing::info!("Serving community {}", guild);
    }

    let storage = LocalStorage::new(config.storage.directory.clone());
    let metadata = config.metadata.clone();
    let prefix = config.command_prefix().to_string();

    let mut coordinator = match Coordinator::restore(storage, config).await {
        Ok(coordinator) => coordinator,
        Err(e) => {
            tracing::error!(
                "❌ Failed to restore state: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if let Some(metadata) = metadata {
        match OmdbClient::new(metadata.endpoint.clone(), metadata.api_key.clone(), metadata.timeout()) {
            Ok(client) => coordinator = coordinator.with_metadata(Box::new(client)),
            Err(e) => tracing::warn!("Movie info lookups disabled: {}", e),
        }
    }

    if !args.command.is_empty() {
        let mut line = args.command.join(" ");
        if !line.starts_with(&prefix) {
            line = format!("{}{}", prefix, line);
        }
        if let Some(reply) = coordinator.handle_line(&args.user, &line).await {
            println!("{}", reply);
        }
        return Ok(());
    }

    tracing::info!("Reading commands from stdin, e.g. `alice: {}vote 2`", prefix);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, shutting down");
                break;
            }
        };
        let Some(line) = line else { break };

        let (author, text) = split_author(&line, &prefix, &args.user);
        if let Some(reply) = coordinator.handle_line(author, text).await {
            println!("{}", reply);
        }
    }

    Ok(())
}

/// Splits an `author: message` line. Lines that start with the command
/// prefix or carry no author use `default`.
fn split_author<'a>(line: &'a str, prefix: &str, default: &'a str) -> (&'a str, &'a str) {
    if line.trim_start().starts_with(prefix) {
        return (default, line);
    }
    match line.split_once(':') {
        Some((author, text))
            if !author.trim().is_empty() && !author.trim().contains(char::is_whitespace) =>
        {
            (author.trim(), text)
        }
        _ => (default, line),
    }
}
