use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use taskbull_core::{
    Difficulty, Importance, NewTask, SortKey, SortOrder, TASK_COMPLETION_EXP, Task, TaskEdit,
    days_left, parse_due_date, sort_tasks,
};

use crate::config::load_config;
use crate::state::{AppState, load_state, save_state};

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    /// Create a task
    Add {
        title: String,

        /// Due date (YYYY-MM-DD or ISO-8601 date-time)
        #[arg(long)]
        due: String,

        /// easy | medium | hard (or 1-3)
        #[arg(long, default_value = "medium")]
        difficulty: Difficulty,

        /// low | medium | high (or 1-3)
        #[arg(long, default_value = "medium")]
        importance: Importance,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// List outstanding tasks
    List {
        /// Include completed and deleted tasks
        #[arg(long, default_value_t = false)]
        all: bool,

        /// due | importance | difficulty (default: list order)
        #[arg(long)]
        sort: Option<SortKey>,

        /// Sort descending
        #[arg(long, default_value_t = false, requires = "sort")]
        desc: bool,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Show one task
    Show { id: u64 },

    /// Mark a task complete (+10 EXP)
    Complete { id: u64 },

    /// Move a task to the bin
    Delete { id: u64 },

    /// Bring back a completed or deleted task (a completed one gives back its EXP)
    Restore { id: u64 },

    /// Change fields of a task
    Edit {
        id: u64,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        due: Option<String>,

        #[arg(long)]
        difficulty: Option<Difficulty>,

        #[arg(long)]
        importance: Option<Importance>,
    },
}

pub fn run(cmd: TaskCommand) -> Result<()> {
    let cfg = load_config()?;
    let mut state = load_state(cfg.timezone()?)?;

    match cmd {
        TaskCommand::Add {
            title,
            due,
            difficulty,
            importance,
            description,
        } => {
            parse_due_date(&due)?;
            let id = state.tasks.add(NewTask {
                title,
                description,
                due_date: due,
                difficulty,
                importance,
            });
            save_state(&mut state, Utc::now())?;
            println!("Added task #{id}");
        }

        TaskCommand::List {
            all,
            sort,
            desc,
            json,
        } => {
            let order = if desc {
                SortOrder::Descending
            } else {
                SortOrder::Ascending
            };
            let today = cfg.resolve_today(None)?;
            return list(&state, today, all, sort.map(|key| (key, order)), json);
        }

        TaskCommand::Show { id } => {
            let task = state
                .tasks
                .get(id)
                .with_context(|| format!("no task #{id}"))?;
            let today = cfg.resolve_today(None)?;
            println!("{}", describe(task, today));
            if !task.description.is_empty() {
                println!("\n{}", task.description);
            }
        }

        TaskCommand::Complete { id } => {
            if let Some(t) = state.tasks.get(id) {
                if t.completed {
                    bail!("task #{id} is already completed");
                }
                if t.deleted {
                    bail!("task #{id} is deleted; restore it first");
                }
            }
            state.tasks.complete(id, Utc::now())?;
            state.progress.add_exp(TASK_COMPLETION_EXP);
            save_state(&mut state, Utc::now())?;
            println!("Task completed! +{TASK_COMPLETION_EXP} EXP");
        }

        TaskCommand::Delete { id } => {
            state.tasks.delete(id)?;
            save_state(&mut state, Utc::now())?;
            println!("Deleted task #{id}");
        }

        TaskCommand::Restore { id } => {
            let was_completed = state.tasks.get(id).is_some_and(|t| t.completed);
            state.tasks.restore(id)?;
            if was_completed {
                state.progress.subtract_exp(TASK_COMPLETION_EXP);
            }
            save_state(&mut state, Utc::now())?;
            if was_completed {
                println!("Restored task #{id} (-{TASK_COMPLETION_EXP} EXP)");
            } else {
                println!("Restored task #{id}");
            }
        }

        TaskCommand::Edit {
            id,
            title,
            description,
            due,
            difficulty,
            importance,
        } => {
            if let Some(ref d) = due {
                parse_due_date(d)?;
            }
            let edit = TaskEdit {
                title,
                description,
                due_date: due,
                difficulty,
                importance,
            };
            if edit.is_empty() {
                bail!("nothing to change (pass --title, --due, --difficulty, ...)");
            }
            state.tasks.edit(id, edit)?;
            save_state(&mut state, Utc::now())?;
            println!("Updated task #{id}");
        }
    }

    Ok(())
}

fn list(
    state: &AppState,
    today: NaiveDate,
    all: bool,
    sort: Option<(SortKey, SortOrder)>,
    json: bool,
) -> Result<()> {
    let mut tasks: Vec<&Task> = if all {
        state.tasks.tasks().iter().collect()
    } else {
        state.tasks.outstanding()
    };
    if let Some((key, order)) = sort {
        sort_tasks(&mut tasks, key, order);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
        return Ok(());
    }

    if tasks.is_empty() {
        println!("No tasks.");
        return Ok(());
    }

    for t in tasks {
        let mark = match (t.completed, t.deleted) {
            (_, true) => "[-]",
            (true, false) => "[x]",
            (false, false) => "[ ]",
        };
        println!("{mark} {}", describe(t, today));
    }
    Ok(())
}

/// One-line summary: `#3 Essay | due 2026-02-20 (1 day left) | Hard / Low`.
pub fn describe(task: &Task, today: NaiveDate) -> String {
    let due = match days_left(today, &task.due_date) {
        Ok(0) => format!("due {} (today)", task.due_date),
        Ok(1) => format!("due {} (1 day left)", task.due_date),
        Ok(n) if n < 0 => format!("due {} ({} days overdue)", task.due_date, -n),
        Ok(n) => format!("due {} ({n} days left)", task.due_date),
        Err(e) => format!("{e}"),
    };
    format!(
        "#{} {} | {} | {} / {}",
        task.id, task.title, due, task.difficulty, task.importance
    )
}
