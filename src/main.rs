use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;

use couplet::commands::*;

#[derive(Parser)]
#[command(name = "couplet")]
#[command(about = "Shared household task manager for two", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task title (quoted if it has spaces)
        title: String,
        /// Which partner the task belongs to
        #[arg(short, long)]
        owner: Option<String>,
        /// Free-text note
        #[arg(short, long)]
        note: Option<String>,
        /// Due date (YYYY-MM-DD or RFC 3339)
        #[arg(short, long)]
        due: Option<String>,
        /// Recurrence (daily, weekly, biweekly, monthly, quarterly, yearly)
        #[arg(short, long)]
        recur: Option<String>,
        /// Step multiplier for the recurrence, e.g. 2 for every other week
        #[arg(short, long)]
        every: Option<u32>,
        /// Date after which the recurrence stops (YYYY-MM-DD)
        #[arg(short, long)]
        until: Option<String>,
        /// IANA timezone the schedule is anchored to (default UTC)
        #[arg(long)]
        tz: Option<String>,
    },
    /// List tasks ordered by due date
    List {
        /// Show completed tasks
        #[arg(short, long)]
        all: bool,
    },
    /// Complete the current occurrence of a task
    Complete {
        id: u64,
    },
    /// Remove a task
    Remove {
        id: u64,
    },
    /// Edit a task
    Edit {
        id: u64,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New owner
        #[arg(short, long)]
        owner: Option<String>,
        /// New note
        #[arg(short, long)]
        note: Option<String>,
        /// New due date
        #[arg(short, long)]
        due: Option<String>,
        /// New recurrence pattern
        #[arg(short, long)]
        recur: Option<String>,
        /// Remove the recurrence rule
        #[arg(long, conflicts_with = "recur")]
        no_recur: bool,
        /// New step multiplier
        #[arg(short, long)]
        every: Option<u32>,
        /// New recurrence end date
        #[arg(short, long)]
        until: Option<String>,
        /// New schedule timezone
        #[arg(long)]
        tz: Option<String>,
    },
    /// Reset the database (delete all tasks)
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
}

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Commands::Add { title, owner, note, due, recur, every, until, tz } => {
            cmd_add(title, owner, note, due, recur, every, until, tz, false)
        }
        Commands::List { all } => cmd_list(all),
        Commands::Complete { id } => cmd_complete(id, false),
        Commands::Remove { id } => cmd_remove(id, false),
        Commands::Edit { id, title, owner, note, due, recur, no_recur, every, until, tz } => {
            cmd_edit(id, title, owner, note, due, recur, no_recur, every, until, tz, false)
        }
        Commands::Reset { force } => cmd_reset(force),
        Commands::Completions { shell } => {
            let shell_enum = match shell.as_str() {
                "bash" => Shell::Bash,
                "zsh" => Shell::Zsh,
                "fish" => Shell::Fish,
                "powershell" => Shell::PowerShell,
                "elvish" => Shell::Elvish,
                _ => {
                    eprintln!("Unsupported shell: {}", shell);
                    return;
                }
            };
            let mut cmd = Cli::command();
            generate(shell_enum, &mut cmd, "couplet", &mut io::stdout());
        }
    }
}
