// File: ./src/cli.rs
//! Command-line parsing and help text.
use crate::extract::dates::parse_iso_date;
use crate::model::{Priority, TaskDraft, TaskStatus};
use crate::store::TaskFilter;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Parse { transcript: String },
    Add { transcript: String },
    New { draft: TaskDraft },
    List { filter: TaskFilter },
    Show { id: String },
    Status { id: String, status: TaskStatus },
    Delete { id: String },
    ConfigPath,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub root: Option<PathBuf>,
    pub command: Command,
}

pub fn parse_args(args: &[String]) -> Result<Invocation, String> {
    let mut root = None;
    let mut rest: Vec<String> = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-r" | "--root" => {
                let path = iter.next().ok_or("--root requires a path")?;
                root = Some(PathBuf::from(path));
            }
            "-h" | "--help" => {
                return Ok(Invocation {
                    root,
                    command: Command::Help,
                });
            }
            _ => rest.push(arg.clone()),
        }
    }

    let Some((name, tail)) = rest.split_first() else {
        return Ok(Invocation {
            root,
            command: Command::Help,
        });
    };

    let command = match name.as_str() {
        "help" => Command::Help,
        "parse" => Command::Parse {
            transcript: transcript_arg(tail)?,
        },
        "add" => Command::Add {
            transcript: transcript_arg(tail)?,
        },
        "new" => Command::New {
            draft: draft_args(tail)?,
        },
        "list" | "ls" => Command::List {
            filter: filter_args(tail)?,
        },
        "show" => Command::Show {
            id: single_id(tail, "show")?,
        },
        "status" => match tail {
            [id, status_words @ ..] if !id.trim().is_empty() && !status_words.is_empty() => {
                Command::Status {
                    id: id.clone(),
                    status: status_words.join(" ").parse()?,
                }
            }
            _ => return Err("usage: status <id> <To Do|In Progress|Done>".to_string()),
        },
        "delete" | "rm" => Command::Delete {
            id: single_id(tail, "delete")?,
        },
        "config" => Command::ConfigPath,
        other => return Err(format!("Unknown command '{}'. Try --help.", other)),
    };

    Ok(Invocation { root, command })
}

fn transcript_arg(words: &[String]) -> Result<String, String> {
    let transcript = words.join(" ");
    if transcript.trim().is_empty() {
        return Err("Transcript is required".to_string());
    }
    Ok(transcript)
}

fn single_id(words: &[String], command: &str) -> Result<String, String> {
    match words {
        [id] if !id.trim().is_empty() => Ok(id.clone()),
        _ => Err(format!("usage: {} <id>", command)),
    }
}

fn flag_value<'a>(
    flag: &str,
    iter: &mut impl Iterator<Item = &'a String>,
) -> Result<&'a String, String> {
    iter.next().ok_or_else(|| format!("{} requires a value", flag))
}

fn draft_args(words: &[String]) -> Result<TaskDraft, String> {
    let mut draft = TaskDraft::default();
    let mut title_words = Vec::new();

    let mut iter = words.iter();
    while let Some(word) = iter.next() {
        match word.as_str() {
            "-p" | "--priority" => draft.priority = flag_value(word, &mut iter)?.parse()?,
            "-s" | "--status" => draft.status = flag_value(word, &mut iter)?.parse()?,
            "-d" | "--due" => {
                let raw = flag_value(word, &mut iter)?;
                draft.due_date = Some(
                    parse_iso_date(raw)
                        .ok_or_else(|| format!("Invalid due date '{}' (use YYYY-MM-DD)", raw))?,
                );
            }
            "--desc" => draft.description = flag_value(word, &mut iter)?.clone(),
            _ => title_words.push(word.as_str()),
        }
    }

    draft.title = title_words.join(" ");
    if draft.title.trim().is_empty() {
        return Err("usage: new <title> [--priority P] [--status S] [--due YYYY-MM-DD] [--desc D]".to_string());
    }
    Ok(draft)
}

fn filter_args(words: &[String]) -> Result<TaskFilter, String> {
    let mut filter = TaskFilter::default();

    let mut iter = words.iter();
    while let Some(word) = iter.next() {
        match word.as_str() {
            "-s" | "--status" => {
                let value = flag_value(word, &mut iter)?;
                if value != "all" {
                    filter.status = Some(value.parse::<TaskStatus>()?);
                }
            }
            "-p" | "--priority" => {
                let value = flag_value(word, &mut iter)?;
                if value != "all" {
                    filter.priority = Some(value.parse::<Priority>()?);
                }
            }
            "-q" | "--search" => filter.search = Some(flag_value(word, &mut iter)?.clone()),
            other => return Err(format!("Unknown list option '{}'", other)),
        }
    }
    Ok(filter)
}

pub fn print_help(binary_name: &str) {
    println!(
        "Taskvoice v{} - personal task tracker with natural-language input",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    {} [--root <path>] <command>", binary_name);
    println!();
    println!("COMMANDS:");
    println!("    parse <transcript...>      Show the task a transcript would create (JSON)");
    println!("    add <transcript...>        Parse a transcript and save the task");
    println!("    new <title> [options]      Create a task by hand");
    println!("        -p, --priority <Low|Medium|High>");
    println!("        -s, --status <todo|in-progress|done>");
    println!("        -d, --due <YYYY-MM-DD>");
    println!("        --desc <text>");
    println!("    list [options]             List tasks, newest first");
    println!("        -s, --status <S|all>   -p, --priority <P|all>   -q, --search <text>");
    println!("    show <id>                  Show one task (JSON)");
    println!("    status <id> <status>       Move a task to To Do / In Progress / Done");
    println!("    delete <id>                Delete a task");
    println!("    config                     Print the config file path");
    println!();
    println!("    Ids may be shortened to any unique prefix.");
    println!();
    println!("OPTIONS:");
    println!("    -r, --root <path>     Use a different directory for config and data.");
    println!("    -h, --help            Show this help message.");
    println!();
    println!("TRANSCRIPTS:");
    println!("    Priority   urgent, critical, high priority, important, asap -> High");
    println!("               low priority, minor, small, whenever -> Low");
    println!("    Due date   today, tomorrow, next week, in N days, <weekday>, next <weekday>");
    println!();
    println!("EXAMPLES:");
    println!("    {} add remind me to call mom tomorrow", binary_name);
    println!("    {} parse \"add task to finish urgent report by friday\"", binary_name);
    println!("    {} list --status todo --search report", binary_name);
    println!();
    println!("ENVIRONMENT:");
    println!("    ANTHROPIC_API_KEY     API key for model-based parsing (overrides config)");
    println!("    TASKVOICE_LOG         Log level: error, warn, info, debug, trace");
}
