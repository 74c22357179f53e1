//! Line-based runner for the notebook.

use std::io::{BufRead, Write};

use cellflow::Notebook;
use tokio::sync::mpsc;

use crate::errors::Result;
use crate::render;

/// Rows shown by the `data` command.
const PREVIEW_ROWS: usize = 10;

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Increase,
    Decrease,
    Set(i64),
    Stats,
    Report,
    Graph,
    Data,
    Resample,
    Reset,
    Help,
    Quit,
    Empty,
}

pub fn parse_command(input: &str) -> std::result::Result<Command, String> {
    let mut words = input.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(Command::Empty);
    };

    let command = match head {
        "+" | "inc" => Command::Increase,
        "-" | "dec" => Command::Decrease,
        "set" => {
            let value = words.next().ok_or("usage: set N")?;
            Command::Set(parse_size(value)?)
        }
        "s" | "stats" => Command::Stats,
        "r" | "report" => Command::Report,
        "g" | "graph" => Command::Graph,
        "d" | "data" => Command::Data,
        "n" | "resample" => Command::Resample,
        "x" | "reset" => Command::Reset,
        "?" | "h" | "help" => Command::Help,
        "q" | "quit" => Command::Quit,
        other => match other.parse::<i64>() {
            Ok(n) => Command::Set(n),
            Err(_) => return Err(format!("Unknown command: {} (type ? for help)", other)),
        },
    };

    if words.next().is_some() {
        return Err(format!("Too many arguments for '{}'", head));
    }
    Ok(command)
}

fn parse_size(value: &str) -> std::result::Result<i64, String> {
    value
        .parse()
        .map_err(|_| format!("Not a sample size: {}", value))
}

pub async fn run_repl(notebook: &mut Notebook) -> Result<()> {
    print_header(notebook);

    let (input_tx, mut input_rx) = mpsc::channel::<String>(32);
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        let reader = stdin.lock();
        for line in reader.lines() {
            match line {
                Ok(line) => {
                    if input_tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });

    prompt()?;

    loop {
        tokio::select! {
            biased;

            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }

            input = input_rx.recv() => {
                let Some(line) = input else {
                    break;
                };
                match parse_command(&line) {
                    Ok(Command::Quit) => break,
                    Ok(command) => execute(notebook, command),
                    Err(message) => println!("{}", message),
                }
                println!();
                prompt()?;
            }
        }
    }

    Ok(())
}

fn prompt() -> Result<()> {
    print!("> ");
    std::io::stdout().flush()?;
    Ok(())
}

fn execute(notebook: &mut Notebook, command: Command) {
    let config = notebook.config().clone();
    let current = notebook.sample_size().unwrap_or(config.default_sample_size);

    match command {
        Command::Increase => set_snapped(notebook, config.increase(current)),
        Command::Decrease => set_snapped(notebook, config.decrease(current)),
        Command::Set(n) => {
            let target = config.snap(n);
            if target != n {
                println!("Snapped {} to {}", n, target);
            }
            set_snapped(notebook, target);
        }
        Command::Resample => {
            let result = notebook.resample();
            print_outcome(notebook, result);
        }
        Command::Reset => {
            let result = notebook.reset();
            print_outcome(notebook, result);
        }
        Command::Stats => match notebook.statistics() {
            Ok(stats) => render::statistics_lines(&stats)
                .iter()
                .for_each(|line| println!("  {}", line)),
            Err(e) => println!("Error: {}", e),
        },
        Command::Report => match notebook.report() {
            Ok(report) => println!("{}", render::report_text(&report)),
            Err(e) => println!("Error: {}", e),
        },
        Command::Graph => {
            for line in render::graph_lines(notebook.graph()) {
                println!("  {}", line);
            }
        }
        Command::Data => print_preview(notebook),
        Command::Help => print_help(),
        Command::Quit | Command::Empty => {}
    }
}

fn set_snapped(notebook: &mut Notebook, value: i64) {
    let result = notebook.set_input(value);
    print_outcome(notebook, result);
}

fn print_outcome(notebook: &Notebook, result: cellflow::Result<cellflow::PassReport>) {
    match result {
        Ok(pass) => {
            println!("{}", render::pass_line(&pass, notebook.config().show_timings));
            print_summary(notebook);
        }
        Err(e) => {
            println!("Error: {}", e);
            println!("Keeping the previous values.");
        }
    }
}

fn print_summary(notebook: &Notebook) {
    if let Ok(report) = notebook.report() {
        println!(
            "n = {}  r = {}  ({}, {} sample)",
            report.sample_count, report.correlation, report.strength, report.size
        );
    }
}

fn print_preview(notebook: &Notebook) {
    let Ok(data) = notebook.dataset() else {
        println!("No dataset");
        return;
    };
    println!("  {:>8}  {:>8}", "x", "y");
    for point in data.iter().take(PREVIEW_ROWS) {
        println!("  {:>8.2}  {:>8.2}", point.x, point.y);
    }
    if data.len() > PREVIEW_ROWS {
        println!("  ... {} more", data.len() - PREVIEW_ROWS);
    }
}

fn print_header(notebook: &Notebook) {
    let cells: Vec<&str> = notebook.graph().cell_names().collect();
    println!("Cellflow - {} cells: {}\n", cells.len(), cells.join(" -> "));
    print_summary(notebook);
    println!(
        "\n  [+/-] Step  [set N] Size  [s] Stats  [r] Report  [g] Graph  [q] Quit  [?] Help\n"
    );
}

fn print_help() {
    println!("Commands:");
    println!("  +, -      Step the sample size up or down");
    println!("  set N     Set the sample size (snapped to the slider range)");
    println!("  s         Show statistics");
    println!("  r         Show the report");
    println!("  g         Show the dependency graph");
    println!("  d         Preview the dataset");
    println!("  n         Resample with fresh noise");
    println!("  x         Reset to the default sample size");
    println!("  q         Quit");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(parse_command("+"), Ok(Command::Increase));
        assert_eq!(parse_command("  -  "), Ok(Command::Decrease));
        assert_eq!(parse_command("set 120"), Ok(Command::Set(120)));
        assert_eq!(parse_command("70"), Ok(Command::Set(70)));
        assert_eq!(parse_command("stats"), Ok(Command::Stats));
        assert_eq!(parse_command("g"), Ok(Command::Graph));
        assert_eq!(parse_command(""), Ok(Command::Empty));
        assert_eq!(parse_command("q"), Ok(Command::Quit));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_command("set").is_err());
        assert!(parse_command("set many").is_err());
        assert!(parse_command("set 1 2").is_err());
        assert!(parse_command("bogus").is_err());
    }

    #[test]
    fn execute_steps_within_the_slider() {
        let mut notebook = Notebook::with_source(
            cellflow::Config::default(),
            cellflow::test::ConstantSource(0.5),
        )
        .unwrap();

        execute(&mut notebook, Command::Increase);
        assert_eq!(notebook.sample_size().unwrap(), 60);

        execute(&mut notebook, Command::Set(5));
        assert_eq!(notebook.sample_size().unwrap(), 10);

        execute(&mut notebook, Command::Set(1_000));
        assert_eq!(notebook.sample_size().unwrap(), 200);

        execute(&mut notebook, Command::Reset);
        assert_eq!(notebook.sample_size().unwrap(), 50);
    }
}
