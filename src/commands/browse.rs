use std::io::Write;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use tokio::io::{AsyncBufReadExt, BufReader};

use datebook_core::{AppointmentStore, DatebookResult, FetchOutcome, SyncController, YearMonth};

use crate::commands::show::print_month;
use crate::render::{Render, render_appointments};

const HELP: &str = "\
  n, next       next month
  p, prev       previous month
  +N, -N        move N months
  goto YYYY-MM  jump to a month
  day D         appointments on day D
  q, quit       exit";

#[derive(Debug, Clone, PartialEq, Eq)]
enum BrowseCommand {
    Move(i64),
    Goto(YearMonth),
    Day(u32),
    Redraw,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<BrowseCommand, String> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(BrowseCommand::Redraw);
    };
    let arg = words.next();
    if words.next().is_some() {
        return Err(format!("Too many arguments: '{}'", line.trim()));
    }

    match (word, arg) {
        ("n" | "next", None) => Ok(BrowseCommand::Move(1)),
        ("p" | "prev", None) => Ok(BrowseCommand::Move(-1)),
        ("q" | "quit", None) => Ok(BrowseCommand::Quit),
        ("?" | "h" | "help", None) => Ok(BrowseCommand::Help),
        ("goto", Some(month)) => month
            .parse::<YearMonth>()
            .map(BrowseCommand::Goto)
            .map_err(|e| e.to_string()),
        ("day", Some(day)) => day
            .parse::<u32>()
            .map(BrowseCommand::Day)
            .map_err(|_| format!("Not a day: '{day}'")),
        (delta, None) if delta.starts_with(['+', '-']) => delta
            .parse::<i64>()
            .map(BrowseCommand::Move)
            .map_err(|_| format!("Not a month offset: '{delta}'")),
        _ => Err(format!("Unknown command: '{}' (? for help)", line.trim())),
    }
}

pub async fn run<S: AppointmentStore>(controller: &SyncController<S>) -> Result<()> {
    report(controller, controller.load().await).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", ">".dimmed());
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{}", message.red());
                continue;
            }
        };

        match command {
            BrowseCommand::Move(delta) => report(controller, controller.navigate(delta).await).await,
            BrowseCommand::Goto(month) => report(controller, controller.goto(month).await).await,
            BrowseCommand::Day(day) => show_day(controller, day).await,
            BrowseCommand::Redraw => print_month(controller).await,
            BrowseCommand::Help => println!("{HELP}"),
            BrowseCommand::Quit => break,
        }
    }

    Ok(())
}

/// Print the result of a fetch. A failed fetch keeps the previous month on
/// screen.
async fn report<S: AppointmentStore>(
    controller: &SyncController<S>,
    outcome: DatebookResult<FetchOutcome>,
) {
    match outcome {
        Ok(FetchOutcome::Applied(_)) => print_month(controller).await,
        Ok(FetchOutcome::Superseded) => {}
        Err(e) => {
            println!("{} {}", controller.state().await.render(), e.red());
            println!(
                "{}",
                format!("Still showing {}", controller.displayed_month().await).dimmed()
            );
        }
    }
}

async fn show_day<S: AppointmentStore>(controller: &SyncController<S>, day: u32) {
    let month = controller.displayed_month().await;
    let Some(date) = month.day(day) else {
        println!("{}", format!("{month} has no day {day}").red());
        return;
    };

    println!("{}", date.bold());
    let appointments = controller.appointments_on(date).await;
    if appointments.is_empty() {
        println!("{}", render_appointments(&appointments));
    } else {
        println!("{}", controller.labels_on(date).await);
    }
}
