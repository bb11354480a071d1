use crate::client::{
    DEFAULT_LIMIT, DEFAULT_SEARCH_SORT, DEFAULT_SEARCH_TIME_FILTER, DEFAULT_STATS_LIMIT,
    DEFAULT_TOP_TIME_FILTER,
};
use crate::operations::comments::CommentsOptions;
use crate::operations::posts::{PostsOptions, PostsQuery};
use crate::operations::subreddit::SubredditOptions;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "redreader",
    version,
    about = "Read-only access to public subreddit data."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments shared by every post listing command
#[derive(clap::Args, Debug)]
pub struct ListingArgs {
    /// Subreddit name, without r/
    #[arg(help = "Subreddit name", required = true)]
    pub subreddit: String,

    /// The number of posts to retrieve.
    #[arg(long, short, default_value_t = DEFAULT_LIMIT)]
    pub limit: u32,

    /// Display posts in a brief, one-line format.
    #[arg(long, short, help = "Show posts in a brief one-line format")]
    pub brief: bool,

    /// Write the posts to a JSON file.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Fetch hot posts from a subreddit.
    Hot {
        #[command(flatten)]
        listing: ListingArgs,
    },

    /// Fetch the newest posts from a subreddit.
    New {
        #[command(flatten)]
        listing: ListingArgs,
    },

    /// Fetch top posts from a subreddit.
    Top {
        #[command(flatten)]
        listing: ListingArgs,

        /// One of hour, day, week, month, year, all.
        #[arg(long, short, default_value = DEFAULT_TOP_TIME_FILTER)]
        time_filter: String,
    },

    /// Search posts in a subreddit.
    Search {
        #[command(flatten)]
        listing: ListingArgs,

        /// Search query.
        #[arg(long, short, required = true)]
        query: String,

        /// One of relevance, hot, top, new, comments.
        #[arg(long, default_value = DEFAULT_SEARCH_SORT)]
        sort: String,

        /// One of hour, day, week, month, year, all.
        #[arg(long, short, default_value = DEFAULT_SEARCH_TIME_FILTER)]
        time_filter: String,
    },

    /// Fetch the comments of a post as a flat, indented list.
    Comments {
        /// Bare post id (without t3_).
        #[arg(help = "Post ID", required = true)]
        post_id: String,

        /// Maximum number of comments, all if omitted.
        #[arg(long, short)]
        limit: Option<u32>,

        /// Write the comments to a JSON file.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Show subscriber count, description and creation time of a subreddit.
    Info {
        #[arg(help = "Subreddit name", required = true)]
        subreddit: String,

        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Show subreddit information plus statistics over its hot posts.
    Stats {
        #[arg(help = "Subreddit name", required = true)]
        subreddit: String,

        /// Number of hot posts to analyze.
        #[arg(long, short, default_value_t = DEFAULT_STATS_LIMIT)]
        limit: u32,

        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

/// A parsed command, ready to run against a client
#[derive(Debug)]
pub enum Invocation {
    Posts(PostsOptions),
    Comments(CommentsOptions),
    Subreddit(SubredditOptions),
}

impl From<Commands> for Invocation {
    fn from(command: Commands) -> Self {
        match command {
            Commands::Hot { listing } => Invocation::Posts(posts_options(listing, PostsQuery::Hot)),
            Commands::New { listing } => Invocation::Posts(posts_options(listing, PostsQuery::New)),
            Commands::Top {
                listing,
                time_filter,
            } => Invocation::Posts(posts_options(listing, PostsQuery::Top { time_filter })),
            Commands::Search {
                listing,
                query,
                sort,
                time_filter,
            } => Invocation::Posts(posts_options(
                listing,
                PostsQuery::Search {
                    query,
                    sort,
                    time_filter,
                },
            )),
            Commands::Comments {
                post_id,
                limit,
                output,
            } => Invocation::Comments(CommentsOptions {
                post_id,
                limit,
                output,
            }),
            Commands::Info { subreddit, output } => Invocation::Subreddit(SubredditOptions {
                subreddit,
                with_stats: false,
                output,
                ..SubredditOptions::default()
            }),
            Commands::Stats {
                subreddit,
                limit,
                output,
            } => Invocation::Subreddit(SubredditOptions {
                subreddit,
                with_stats: true,
                limit,
                output,
            }),
        }
    }
}

fn posts_options(listing: ListingArgs, query: PostsQuery) -> PostsOptions {
    PostsOptions {
        subreddit: listing.subreddit,
        query,
        limit: listing.limit,
        brief: listing.brief,
        output: listing.output,
    }
}
