//! Moderation report queue CLI.
//!
//! Fetches comment, post and (for admins) private-message reports, prints
//! them as one feed newest first, and resolves individual reports.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use modqueue::core::normalize::{ReportPayload, UnifiedReportItem};
use modqueue::core::types::{FilterState, ReportKind, TypeFilter, UnreadOrAll};
use modqueue::exit_codes;
use modqueue::io::config::{ModqueueConfig, load_config, write_config};
use modqueue::io::http::HttpReportsApi;
use modqueue::logging;
use modqueue::session::{Session, document_title};
use modqueue::view::{Entry, ReportsView, resolve_form};

#[derive(Parser)]
#[command(
    name = "modqueue",
    version,
    about = "Aggregate and resolve moderation reports"
)]
struct Cli {
    /// Path to the config file.
    #[arg(long, global = true, default_value = ".modqueue/config.toml")]
    config: PathBuf,

    /// Session token (overrides the config file).
    #[arg(long, global = true, env = "MODQUEUE_AUTH", hide_env_values = true)]
    auth: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default config file if missing.
    Init {
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
    /// Print the merged report feed, newest first.
    List {
        /// Include resolved reports.
        #[arg(long)]
        all: bool,
        /// Restrict the feed to one kind.
        #[arg(long = "type", value_enum, default_value_t = TypeArg::All)]
        type_filter: TypeArg,
        /// 1-based page number.
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },
    /// Resolve (or reopen) a single report.
    Resolve {
        #[arg(value_enum)]
        kind: KindArg,
        report_id: i64,
        /// Mark the report unresolved again.
        #[arg(long)]
        unresolve: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum TypeArg {
    All,
    Comments,
    Posts,
    Messages,
}

impl From<TypeArg> for TypeFilter {
    fn from(arg: TypeArg) -> Self {
        match arg {
            TypeArg::All => TypeFilter::All,
            TypeArg::Comments => TypeFilter::Comment,
            TypeArg::Posts => TypeFilter::Post,
            TypeArg::Messages => TypeFilter::PrivateMessage,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum KindArg {
    Comment,
    Post,
    Message,
}

impl From<KindArg> for ReportKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Comment => ReportKind::Comment,
            KindArg::Post => ReportKind::Post,
            KindArg::Message => ReportKind::PrivateMessage,
        }
    }
}

#[tokio::main]
async fn main() {
    logging::init();
    let code = match run().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            exit_codes::INVALID
        }
    };
    std::process::exit(code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Init { force } => cmd_init(&cli.config, force),
        Command::List {
            all,
            type_filter,
            page,
        } => {
            let cfg = load_config(&cli.config)?;
            let session = cfg.caller_session(cli.auth);
            let filters = FilterState {
                unread_or_all: if all {
                    UnreadOrAll::All
                } else {
                    UnreadOrAll::Unread
                },
                type_filter: type_filter.into(),
                page,
            };
            cmd_list(&cfg, &session, filters).await
        }
        Command::Resolve {
            kind,
            report_id,
            unresolve,
        } => {
            let cfg = load_config(&cli.config)?;
            let session = cfg.caller_session(cli.auth);
            cmd_resolve(&cfg, &session, kind.into(), report_id, !unresolve).await
        }
    }
}

fn cmd_init(path: &Path, force: bool) -> Result<i32> {
    if path.exists() && !force {
        println!("{} already exists", path.display());
        return Ok(exit_codes::OK);
    }
    write_config(path, &ModqueueConfig::default())
        .with_context(|| format!("write {}", path.display()))?;
    println!("wrote {}", path.display());
    Ok(exit_codes::OK)
}

async fn cmd_list(cfg: &ModqueueConfig, session: &Session, filters: FilterState) -> Result<i32> {
    if !session.is_authenticated() {
        eprintln!("not logged in: pass --auth or set MODQUEUE_AUTH");
        return Ok(exit_codes::NOT_AUTHENTICATED);
    }
    if filters.type_filter == TypeFilter::PrivateMessage && !session.is_admin() {
        eprintln!("private message reports are only visible to admins");
    }

    let api = HttpReportsApi::from_config(cfg)?;
    let view = ReportsView::with_filters(api, cfg.fetch_limit, filters);
    if view.enter(session).await == Entry::RedirectToLogin {
        return Ok(exit_codes::NOT_AUTHENTICATED);
    }

    let title = document_title(session, cfg.site_name());
    if !title.is_empty() {
        println!("{title}");
    }
    let snapshot = view.snapshot();
    for item in &snapshot.items {
        println!("---");
        println!("{}", summary_line(item));
    }
    println!("--- page {}", snapshot.filters.page);

    if snapshot.partial_failure.is_empty() {
        return Ok(exit_codes::OK);
    }
    let store = view.store_snapshot();
    for kind in &snapshot.partial_failure {
        let message = match kind {
            ReportKind::Comment => store.collections().comments.error(),
            ReportKind::Post => store.collections().posts.error(),
            ReportKind::PrivateMessage => store.collections().messages.error(),
        }
        .map(|err| err.message.as_str())
        .unwrap_or("unknown error");
        eprintln!("warning: {kind} reports failed to load: {message}");
    }
    Ok(exit_codes::PARTIAL)
}

async fn cmd_resolve(
    cfg: &ModqueueConfig,
    session: &Session,
    kind: ReportKind,
    report_id: i64,
    resolved: bool,
) -> Result<i32> {
    if !session.is_authenticated() {
        eprintln!("not logged in: pass --auth or set MODQUEUE_AUTH");
        return Ok(exit_codes::NOT_AUTHENTICATED);
    }
    let api = HttpReportsApi::from_config(cfg)?;
    let view = ReportsView::new(api, cfg.fetch_limit);
    let form = resolve_form(session, report_id, resolved)?;
    let outcome = view.resolve(kind, &form).await?;
    println!("{}", summary_line(&outcome.item));
    Ok(exit_codes::OK)
}

/// One-line description of a feed item.
fn summary_line(item: &UnifiedReportItem) -> String {
    let state = if item.payload.resolved() {
        "resolved"
    } else {
        "open"
    };
    let (reason, subject) = match &item.payload {
        ReportPayload::Comment(view) => (
            &view.comment_report.reason,
            format!("comment by {}", view.comment_creator.name),
        ),
        ReportPayload::Post(view) => (
            &view.post_report.reason,
            format!("post \"{}\"", view.post_report.original_post_name),
        ),
        ReportPayload::PrivateMessage(view) => (
            &view.private_message_report.reason,
            format!("message from {}", view.private_message_creator.name),
        ),
    };
    format!(
        "[{} #{}] {} {} - {}: {}",
        item.kind(),
        item.id,
        item.published,
        state,
        subject,
        reason
    )
}
