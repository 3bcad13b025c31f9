use std::path::PathBuf;
use std::time::{Duration, Instant};

use regex::Regex;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::editor::{LineBuffer, Synchronizer, TextBuffer};
use crate::io::{config_io, document};
use crate::model::config::Config;
use crate::model::status::Status;
use crate::ops::check;
use crate::ops::reminder::{Reminder, ReminderScheduler};

/// Document and config locations after applying `--file` / `--config`
pub struct Paths {
    pub document: PathBuf,
    pub config: PathBuf,
}

impl Paths {
    pub fn from_cli(cli: &Cli) -> Self {
        Paths {
            document: cli
                .file
                .clone()
                .unwrap_or_else(document::default_document_path),
            config: cli
                .config
                .clone()
                .unwrap_or_else(config_io::default_config_path),
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let paths = Paths::from_cli(&cli);

    match cli.command {
        None => Err("no subcommand given (run `tk` without one to open the editor)".into()),
        Some(cmd) => match cmd {
            // Read commands
            Commands::Active => cmd_active(&paths, json),
            Commands::List(args) => cmd_list(&paths, args, json),
            Commands::Check => cmd_check(&paths, json),
            Commands::Remind(args) => cmd_remind(&paths, args, json),

            // Write commands
            Commands::Toggle(args) => cmd_toggle(&paths, args, json),
            Commands::Interval(args) => cmd_interval(&paths, args, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_config(paths: &Paths) -> Result<Config, config_io::ConfigError> {
    let (config, _doc) = config_io::read_config(&paths.config)?;
    Ok(config)
}

/// Load the document into a synchronized buffer
fn load_sync(
    paths: &Paths,
    config: &Config,
) -> Result<Synchronizer<LineBuffer>, document::DocumentError> {
    let text = document::load_document(&paths.document, &config.editor.initial_text)?;
    Ok(Synchronizer::new(LineBuffer::from_text(&text))
        .with_glyph(config.editor.active_glyph.clone())
        .with_policy(config.editor.active_policy()))
}

fn number_width(line_count: usize) -> usize {
    line_count.to_string().len()
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_active(paths: &Paths, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(paths)?;
    let sync = load_sync(paths, &config)?;
    let task = sync.find_active_task();

    if json {
        let out = ActiveJson {
            line: sync.active_lines().first().map(|l| l + 1),
            task,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        match task {
            Some(t) => println!("{}", t),
            None => println!("no active task"),
        }
    }
    Ok(())
}

fn cmd_list(paths: &Paths, args: ListArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(paths)?;
    let sync = load_sync(paths, &config)?;
    let status_filter = args
        .status
        .as_deref()
        .map(parse_status)
        .transpose()
        .map_err(Box::<dyn std::error::Error>::from)?;
    let grep = args
        .grep
        .as_deref()
        .map(|p| Regex::new(&format!("(?i){}", p)))
        .transpose()?;

    let buffer = sync.buffer();
    let matching: Vec<(usize, &str)> = buffer
        .lines()
        .iter()
        .enumerate()
        .filter(|(_, text)| !text.trim().is_empty())
        .filter(|(idx, _)| status_filter.is_none_or(|s| sync.status_of(*idx) == s))
        .filter(|(_, text)| {
            grep.as_ref()
                .is_none_or(|re| re.is_match(crate::parse::strip_marker(text)))
        })
        .map(|(idx, text)| (idx, text.as_str()))
        .collect();

    if json {
        let out: Vec<LineJson> = matching
            .iter()
            .map(|(idx, text)| line_to_json(*idx, text))
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        let width = number_width(buffer.line_count());
        for (idx, text) in matching {
            println!("{}", format_line(idx, text, width));
        }
    }
    Ok(())
}

fn cmd_check(paths: &Paths, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(paths)?;
    let sync = load_sync(paths, &config)?;
    let result = check::check_lines(sync.buffer().lines());

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for line in format_check(&result) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_remind(paths: &Paths, args: RemindArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(paths)?;

    if !args.watch {
        let sync = load_sync(paths, &config)?;
        let reminder = sync
            .find_active_task()
            .and_then(|task| Reminder::for_task(&task, chrono::Local::now().time()));
        if json {
            println!("{}", serde_json::to_string_pretty(&reminder)?);
        } else {
            match reminder {
                Some(r) => print_reminder(&r),
                None => println!("no active task"),
            }
        }
        return Ok(());
    }

    if !config.reminders.enabled {
        return Err("reminders are disabled ([reminders] enabled = false)".into());
    }
    let mut scheduler = ReminderScheduler::new(config.reminders.interval_mins, Instant::now());
    tracing::info!(
        interval_mins = scheduler.interval_mins(),
        path = %paths.document.display(),
        "watching for reminders"
    );
    loop {
        let wait = scheduler.time_until_due(Instant::now());
        std::thread::sleep(wait.max(Duration::from_millis(100)));

        // Re-read each time so edits made elsewhere are picked up
        let sync = load_sync(paths, &config)?;
        let active = sync.find_active_task();
        if let Some(r) = scheduler.tick(Instant::now(), active.as_deref(), chrono::Local::now().time()) {
            if json {
                println!("{}", serde_json::to_string(&r)?);
            } else {
                print_reminder(&r);
                println!();
            }
        }
    }
}

fn print_reminder(r: &Reminder) {
    println!("{}", r.title);
    println!("{}", r.body);
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_toggle(paths: &Paths, args: ToggleArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(paths)?;
    let mut sync = load_sync(paths, &config)?;
    let count = sync.buffer().line_count();

    if args.line == 0 || args.line > count {
        return Err(format!(
            "line {} out of range (document has {} lines)",
            args.line, count
        )
        .into());
    }
    let idx = args.line - 1;
    if sync.status_of(idx) == Status::Comment {
        return Err(format!(
            "line {} is a comment; comments are not part of the task cycle",
            args.line
        )
        .into());
    }

    let status = sync
        .on_gutter_click(idx)
        .ok_or_else(|| format!("line {} could not be toggled", args.line))?;
    document::save_document(&paths.document, &sync.buffer().text())?;

    let text = sync.buffer().line(idx).unwrap_or("").to_string();
    tracing::info!(line = args.line, status = status.name(), "toggled line");
    if json {
        let out = ToggleJson {
            line: args.line,
            status,
            text,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{} \u{2192} {}: {}", args.line, status.name(), text);
    }
    Ok(())
}

fn cmd_interval(
    paths: &Paths,
    args: IntervalArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(paths)?;
    if let Some(mins) = args.minutes {
        config.reminders.interval_mins = config_io::persist_interval(&paths.config, mins)?;
    }

    let interval_mins = config.reminders.interval_mins;
    if json {
        let out = IntervalJson {
            interval_mins,
            enabled: config.reminders.enabled,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if config.reminders.enabled {
        println!("reminders every {} min", interval_mins);
    } else {
        println!("reminders every {} min (disabled)", interval_mins);
    }
    Ok(())
}
