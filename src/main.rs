use anyhow::Result;
use bookform::cli::Cli;
use bookform::session::{Flow, Session};
use bookform::{commands, BookingForm, Config, MemoryPage};
use clap::Parser;
use env_logger::Env;
use log::{debug, error, info};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    // Initialize logging with custom format
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            use chrono::Local;
            use std::io::Write;
            writeln!(
                buf,
                "{} [{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();

    if let Ok(path) = dotenvy::dotenv() {
        debug!("Loaded environment from {:?}", path);
    }

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Some(command) => {
            let ok = commands::run(command, &config)?;
            Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        None => {
            run_session(&config)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_session(config: &Config) -> Result<()> {
    info!("Starting booking form session");
    let mut form = BookingForm::from_config(MemoryPage::booking_page(), config)?;
    let wiring = form.initialize();
    debug!("Page wiring: {:?}", wiring);

    let mut session = Session::new(form);
    let mut rl = DefaultEditor::new()?;
    println!("Welcome to bookform! Type 'help' for commands.");

    loop {
        match rl.readline("📅 ") {
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());
                match session.execute_line(&line) {
                    Ok(Flow::Exit) => break,
                    Ok(Flow::Continue) => {}
                    Err(err) => error!("Failed to process command: {:?}", err),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}
