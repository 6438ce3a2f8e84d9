use anyhow::{Result, bail};
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use std::env;
use taskvoice::cli::{self, Command};
use taskvoice::config::Config;
use taskvoice::context::{AppContext, StandardContext};
use taskvoice::extract::TranscriptParser;
use taskvoice::extract::dates::local_today;
use taskvoice::model::{TaskDisplay, TaskDraft};
use taskvoice::storage::LocalStore;
use taskvoice::store::{TaskStore, resolve_id};

fn init_logging() {
    let level = match env::var("TASKVOICE_LOG")
        .unwrap_or_default()
        .to_lowercase()
        .as_str()
    {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Warn,
    };
    let _ = TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}

async fn run(command: Command, ctx: &dyn AppContext) -> Result<()> {
    match command {
        Command::Help => cli::print_help("taskvoice"),
        Command::ConfigPath => println!("{}", Config::get_path_string(ctx)?),
        Command::Parse { transcript } => {
            let config = Config::load_or_default(ctx)?;
            let parser = TranscriptParser::from_config(&config);
            let parsed = parser.parse(&transcript).await;
            println!("{}", serde_json::to_string_pretty(&parsed)?);
        }
        Command::Add { transcript } => {
            let config = Config::load_or_default(ctx)?;
            let parser = TranscriptParser::from_config(&config);
            let parsed = parser.parse(&transcript).await;
            let store = LocalStore::open(ctx)?;
            let task = store.create(TaskDraft::from(parsed))?;
            println!("{}", task.to_list_line(local_today()));
        }
        Command::New { draft } => {
            let store = LocalStore::open(ctx)?;
            let task = store.create(draft)?;
            println!("{}", task.to_list_line(local_today()));
        }
        Command::List { filter } => {
            let store = LocalStore::open(ctx)?;
            let today = local_today();
            let tasks = store.list(&filter)?;
            if tasks.is_empty() {
                println!("No tasks.");
            }
            for task in tasks {
                println!("{}", task.to_list_line(today));
            }
        }
        Command::Show { id } => {
            let store = LocalStore::open(ctx)?;
            let id = resolve_id(&store, &id)?;
            if let Some(task) = store.get(&id)? {
                println!("{}", serde_json::to_string_pretty(&task)?);
            }
        }
        Command::Status { id, status } => {
            let store = LocalStore::open(ctx)?;
            let id = resolve_id(&store, &id)?;
            let Some(task) = store.get(&id)? else {
                bail!("Task not found: {}", id);
            };
            let mut draft = task.to_draft();
            draft.status = status;
            if let Some(updated) = store.update(&id, draft)? {
                println!("{}", updated.to_list_line(local_today()));
            }
        }
        Command::Delete { id } => {
            let store = LocalStore::open(ctx)?;
            let id = resolve_id(&store, &id)?;
            if store.delete(&id)? {
                println!("Task deleted successfully");
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let args: Vec<String> = env::args().skip(1).collect();
    let invocation = match cli::parse_args(&args) {
        Ok(inv) => inv,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            std::process::exit(2);
        }
    };

    let ctx = StandardContext::new(invocation.root);
    run(invocation.command, &ctx).await
}
