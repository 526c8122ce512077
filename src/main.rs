// src/main.rs

use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use notion_blocks::{
    normalize, AppError, Block, BlockNode, ClientConfig, Command, CommandLineInput, NotionClient,
};
use serde::Serialize;
use std::fs;

/// Sets up logging configuration.
///
/// Console output goes to stderr so that stdout carries only results.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("notion_blocks.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stderr_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stderr")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Runs the configured command and prints its result.
async fn execute_command(config: &ClientConfig) -> Result<(), AppError> {
    if let Command::Normalize { url_or_id } = &config.command {
        let id = normalize(url_or_id)?;
        return emit(config, &id, |id| id.to_string());
    }

    let client = NotionClient::from_config(config)?;
    log::info!(
        "Using {} with up to {} concurrent child fetches",
        config.base_url,
        client.concurrency()
    );

    match &config.command {
        Command::Page { url_or_id } => match client.get_page(url_or_id).await? {
            Some(page) => emit(config, &page, |page| describe_block(page.as_block())),
            None => report_unavailable(url_or_id),
        },
        Command::Block { url_or_id } => match client.get_block(url_or_id).await? {
            Some(block) => emit(config, &block, describe_block),
            None => report_unavailable(url_or_id),
        },
        Command::Children { url_or_id } => {
            let children = client.children(url_or_id).await?;
            emit(config, &children, |children| {
                children.iter().map(summarize_block).collect::<Vec<_>>().join("\n")
            })
        }
        Command::ChildrenIds { url_or_id } => {
            let ids = client.children_ids(url_or_id).await?;
            emit(config, &ids, |ids| {
                ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join("\n")
            })
        }
        Command::Tree { url_or_id, depth } => match client.tree(url_or_id, *depth).await? {
            Some(tree) => emit(config, &tree, |tree| {
                let mut lines = Vec::new();
                outline(tree, 0, &mut lines);
                lines.join("\n")
            }),
            None => report_unavailable(url_or_id),
        },
        Command::Collection { url_or_id } => match client.collection_info(url_or_id).await? {
            Some(info) => emit(config, &info, |info| {
                let views: Vec<String> = info.view_ids.iter().map(|id| id.to_string()).collect();
                format!(
                    "collection: {}\ntitle: {}\nviews: {}",
                    info.collection_id
                        .as_ref()
                        .map(|id| id.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    info.title.as_deref().unwrap_or("-"),
                    views.join(", ")
                )
            }),
            None => report_unavailable(url_or_id),
        },
        Command::Whoami { url_or_id } => match client.current_user_id(url_or_id).await? {
            Some(user) => emit(config, &user, |user| user.clone()),
            None => {
                eprintln!("The service did not report a user id for this session.");
                Ok(())
            }
        },
        Command::Normalize { .. } => Ok(()),
    }
}

/// Prints `value` as JSON when requested, otherwise through `plain`.
fn emit<T, F>(config: &ClientConfig, value: &T, plain: F) -> Result<(), AppError>
where
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    if config.json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", plain(value));
    }
    Ok(())
}

fn report_unavailable(url_or_id: &str) -> Result<(), AppError> {
    eprintln!("Block '{}' is unavailable after retrying.", url_or_id);
    Ok(())
}

fn summarize_block(block: &Block) -> String {
    format!(
        "{}  [{}]  {}",
        block.id,
        block.type_name(),
        block.title().unwrap_or("")
    )
}

fn describe_block(block: &Block) -> String {
    let mut lines = vec![
        format!("id: {}", block.id),
        format!("type: {}", block.type_name()),
        format!("title: {}", block.title().unwrap_or("-")),
        format!(
            "parent: {}",
            block
                .parent_id
                .as_ref()
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".to_string())
        ),
        format!("children: {}", block.children.len()),
    ];
    lines.extend(block.children.iter().map(|id| format!("  {}", id)));
    lines.join("\n")
}

fn outline(node: &BlockNode, level: usize, lines: &mut Vec<String>) {
    lines.push(format!("{}{}", "  ".repeat(level), summarize_block(&node.block)));
    for child in &node.children {
        outline(child, level + 1, lines);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose)?;

    let config = ClientConfig::resolve(cli)?;

    execute_command(&config).await?;

    Ok(())
}
