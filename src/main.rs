use clap::Parser;
use log::error;
use redreader::cli::{Cli, Invocation};
use redreader::operations::comments::handle_comments_command;
use redreader::operations::posts::handle_posts_command;
use redreader::operations::subreddit::handle_subreddit_command;
use redreader::{AppConfig, RedditClient, RedditClientError};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Configuration error: {}", err);
            eprintln!("\nPlease ensure you have a .env file with the following variables:");
            eprintln!("  REDDIT_CLIENT_ID=your_client_id");
            eprintln!("  REDDIT_CLIENT_SECRET=your_client_secret");
            eprintln!("  REDDIT_USER_AGENT=redreader/0.1 (by /u/your_username)");
            return ExitCode::FAILURE;
        }
    };

    let client = match RedditClient::connect(&config).await {
        Ok(client) => client,
        Err(err) => {
            error!("Failed to authenticate with Reddit API: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let outcome: Result<(), RedditClientError> = match Invocation::from(cli.command) {
        Invocation::Posts(options) => handle_posts_command(options, &client).await,
        Invocation::Comments(options) => handle_comments_command(options, &client).await,
        Invocation::Subreddit(options) => handle_subreddit_command(options, &client).await,
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(RedditClientError::RateLimit {
            retry_after: Some(seconds),
            ..
        }) => {
            eprintln!("Reddit is throttling requests, try again in {} seconds", seconds);
            ExitCode::FAILURE
        }
        Err(_) => ExitCode::FAILURE,
    }
}
