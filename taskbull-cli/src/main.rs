use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, Timelike, Utc};
use clap::{Parser, Subcommand};
use serde_json::json;
use taskbull_core::{
    CandidatePool, DUE_THIS_WEEK_DAYS, RecommendReason, StreakChange, completed_lifetime,
    completed_recently, due_this_week, motivation_score, parse_due_date, recommend,
};
use tracing_subscriber::EnvFilter;

mod config;
mod state;
mod task_cmd;

use crate::config::load_config;
use crate::state::{load_state, save_state};
use crate::task_cmd::{TaskCommand, describe};

#[derive(Parser, Debug)]
#[command(
    name = "taskbull",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TASKBULL_BUILD_SHA"), ")"),
    about = "Task list with a recommended next task, EXP and login streaks"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create, list and update tasks
    Task {
        #[command(subcommand)]
        command: TaskCommand,
    },

    /// Pick the task to work on next
    Recommend {
        /// Override the computed motivation score
        #[arg(long)]
        motivation: Option<f64>,

        /// Evaluate as of this date instead of today
        #[arg(long, value_parser = parse_date_arg)]
        today: Option<NaiveDate>,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Daily login: update the streak and collect EXP
    Checkin {
        #[arg(long, value_parser = parse_date_arg)]
        today: Option<NaiveDate>,
    },

    /// Rank, streak and completion stats
    Stats {
        #[arg(long, value_parser = parse_date_arg)]
        today: Option<NaiveDate>,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Show or change the user name and theme preference
    Profile {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        dark_mode: Option<bool>,
    },

    /// Manage ~/.taskbull/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config if none exists
    Init,
    /// Print the effective config
    Show,
}

fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    parse_due_date(s).map_err(|e| e.to_string())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TASKBULL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Task { command } => task_cmd::run(command)?,
        Command::Recommend {
            motivation,
            today,
            json,
        } => recommend_cmd(motivation, today, json)?,
        Command::Checkin { today } => checkin(today)?,
        Command::Stats { today, json } => stats(today, json)?,
        Command::Profile { name, dark_mode } => profile(name, dark_mode)?,
        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config()?,
        },
    }

    Ok(())
}

fn recommend_cmd(motivation: Option<f64>, today: Option<NaiveDate>, json: bool) -> Result<()> {
    let cfg = load_config()?;
    let tz = cfg.timezone()?;
    let today = cfg.resolve_today(today)?;
    let state = load_state(tz)?;

    let motivation = match motivation {
        Some(m) if m.is_nan() || m < 0.0 => bail!("--motivation must be a non-negative number"),
        Some(m) => m,
        None => f64::from(motivation_score(state.tasks.tasks(), today, tz)),
    };

    let outstanding = state.tasks.outstanding();
    let rec = recommend(&outstanding, motivation, today, &cfg.prioritization)
        .context("cannot recommend a task")?;

    if json {
        let out = match &rec {
            Some(r) => json!({ "task": r.task, "reason": r.reason, "motivation": motivation }),
            None => json!({ "task": null, "motivation": motivation }),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let Some(rec) = rec else {
        println!("No outstanding tasks. Add one with `taskbull task add`.");
        return Ok(());
    };

    println!("Recommended task\n");
    println!("  {}", describe(rec.task, today));
    println!("\n  why: {}", explain(&rec.reason, cfg.prioritization.due_soon_days));
    println!("  motivation: {motivation}");
    Ok(())
}

fn explain(reason: &RecommendReason, window: i64) -> String {
    match reason {
        RecommendReason::OnlyDueSoon { .. } => {
            format!("the only task due within {window} days")
        }
        RecommendReason::MostImportantDueSoon { due_soon, .. } => {
            format!("most important of {due_soon} tasks due within {window} days")
        }
        RecommendReason::HighestScore { score, pool, .. } => {
            let pool = match pool {
                CandidatePool::MediumOrHard => "medium and hard tasks",
                CandidatePool::EasyOrMedium => "easy and medium tasks",
                CandidatePool::AllTasks => "all tasks",
            };
            format!("highest score ({score:.2}) among {pool}")
        }
    }
}

fn checkin(today: Option<NaiveDate>) -> Result<()> {
    let cfg = load_config()?;
    let today = cfg.resolve_today(today)?;
    let mut state = load_state(cfg.timezone()?)?;

    let c = state.progress.daily_check_in(today);
    save_state(&mut state, Utc::now())?;

    match c.change {
        StreakChange::Unchanged => println!("Daily EXP has already been awarded for today."),
        StreakChange::Incremented => println!("Daily EXP award! +{} EXP", c.awarded_exp),
        StreakChange::Reset => println!(
            "Daily EXP award! +{} EXP (streak reset, welcome back)",
            c.awarded_exp
        ),
    }
    println!("Login streak: {}", c.login_streak);
    Ok(())
}

fn greeting(hour: u32) -> &'static str {
    if hour < 12 {
        "Good Morning"
    } else if hour < 18 {
        "Good Afternoon"
    } else {
        "Good Evening"
    }
}

fn stats(today: Option<NaiveDate>, json: bool) -> Result<()> {
    let cfg = load_config()?;
    let tz = cfg.timezone()?;
    let today = cfg.resolve_today(today)?;
    let state = load_state(tz)?;

    let exp = state.progress.user_exp;
    let rank = state.ranks.current(exp);
    let next = state.ranks.next(exp);
    let tasks = state.tasks.tasks();
    let this_week = completed_recently(tasks, today, tz).len();
    let lifetime = completed_lifetime(tasks);
    let motivation = motivation_score(tasks, today, tz);
    let due_soon = due_this_week(tasks, today);

    if json {
        let out = json!({
            "userName": state.user_name,
            "userExp": exp,
            "rank": rank,
            "nextRank": next,
            "progress": state.ranks.progress(exp),
            "expToNextRank": state.ranks.exp_to_next(exp),
            "loginStreak": state.progress.login_streak,
            "completedThisWeek": this_week,
            "completedLifetime": lifetime,
            "motivation": motivation,
            "dueThisWeek": due_soon,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let hour = Utc::now().with_timezone(&tz).hour();
    match state.user_name.trim() {
        "" => println!("{}!\n", greeting(hour)),
        name => println!("{}, {name}!\n", greeting(hour)),
    }

    let title = rank.map(|r| r.title.as_str()).unwrap_or("Unranked");
    println!("Title:                     {title}");
    println!(
        "EXP:                       {exp} ({:.0}% to next rank, {} exp to go)",
        state.ranks.progress(exp) * 100.0,
        state.ranks.exp_to_next(exp)
    );
    println!("Daily login streak:        {}", state.progress.login_streak);
    println!("Tasks completed this week: {this_week}");
    println!("Motivation score:          {motivation}");
    println!("Lifetime tasks completed:  {lifetime}");

    println!("\nDue this week:");
    if due_soon.is_empty() {
        println!("  nothing due in the next {DUE_THIS_WEEK_DAYS} days");
    }
    for t in due_soon {
        println!("  {}", describe(t, today));
    }
    Ok(())
}

fn profile(name: Option<String>, dark_mode: Option<bool>) -> Result<()> {
    let mut state = load_state(load_config()?.timezone()?)?;

    if name.is_none() && dark_mode.is_none() {
        println!("Name:      {}", state.user_name);
        println!("Dark mode: {}", state.dark_mode);
        return Ok(());
    }

    if let Some(name) = name {
        state.user_name = name;
    }
    if let Some(dark_mode) = dark_mode {
        state.dark_mode = dark_mode;
    }
    save_state(&mut state, Utc::now())?;
    println!("Profile updated");
    Ok(())
}
