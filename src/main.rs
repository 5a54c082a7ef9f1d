mod app;
mod infra;
mod ui;

use std::process::ExitCode;
use std::sync::Arc;

use brick_review_adapters::{
    present_brick_info, present_capture_detail, present_capture_row, present_point_cloud_info,
    ApiRoutes, HttpReviewBackend, ImageCrateDecoder,
};
use brick_review_application::{
    ListCapturesCommand, ListDatesCommand, ReviewBackend, ReviewService, ShowCaptureCommand,
};
use brick_review_domain::CaptureKey;
use infra::config::AppConfig;
use log::warn;

fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("{error}");
            return ExitCode::from(1);
        }
    };
    infra::logging::init_logging(&config.log_level);

    let args: Vec<String> = std::env::args().collect();
    let command = parse_command(&args);
    match run_command(command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CommandError::Usage(msg)) => {
            eprintln!("{msg}");
            print_usage();
            ExitCode::from(2)
        }
        Err(CommandError::Runtime(msg)) => {
            eprintln!("{msg}");
            ExitCode::from(1)
        }
    }
}

fn build_backend(config: &AppConfig) -> Arc<HttpReviewBackend> {
    Arc::new(HttpReviewBackend::new(ApiRoutes::new(
        &config.api_base_url,
        &config.color_mapping_path,
    )))
}

/// Backend and service for the one-shot commands. The window builds its own.
fn cli_service(config: &AppConfig) -> (Arc<HttpReviewBackend>, ReviewService) {
    let backend = build_backend(config);
    let service = ReviewService::new(backend.clone(), Arc::new(ImageCrateDecoder));
    (backend, service)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Ui,
    Dates,
    Captures { date: String },
    Show { date: String, capture_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum CommandError {
    Usage(String),
    Runtime(String),
}

fn parse_command(args: &[String]) -> Result<Command, CommandError> {
    if args.len() <= 1 {
        return Ok(Command::Ui);
    }

    match args[1].as_str() {
        "ui" => Ok(Command::Ui),
        "dates" => Ok(Command::Dates),
        "captures" => {
            let date = args
                .get(2)
                .ok_or_else(|| CommandError::Usage("missing date".to_string()))?;
            Ok(Command::Captures { date: date.clone() })
        }
        "show" => {
            if args.len() < 4 {
                return Err(CommandError::Usage(
                    "missing date or capture id".to_string(),
                ));
            }
            CaptureKey::new(args[2].as_str(), args[3].as_str())
                .map_err(|error| CommandError::Usage(format!("invalid capture: {error}")))?;
            Ok(Command::Show {
                date: args[2].clone(),
                capture_id: args[3].clone(),
            })
        }
        other => Err(CommandError::Usage(format!("unknown command: {other}"))),
    }
}

fn run_command(
    command: Result<Command, CommandError>,
    config: &AppConfig,
) -> Result<(), CommandError> {
    match command? {
        Command::Ui => ui::app_shell::launch_window(config).map_err(CommandError::Runtime),
        Command::Dates => {
            let (_, service) = cli_service(config);
            let dates = service
                .list_dates(ListDatesCommand)
                .map_err(|error| CommandError::Runtime(format!("dates failed: {error}")))?;
            if dates.is_empty() {
                println!("no capture dates");
            }
            for date in dates {
                println!("{date}");
            }
            Ok(())
        }
        Command::Captures { date } => {
            let (_, service) = cli_service(config);
            let captures = service
                .list_captures(ListCapturesCommand { date: date.clone() })
                .map_err(|error| CommandError::Runtime(format!("captures failed: {error}")))?;
            if captures.is_empty() {
                println!("no captures for {date}");
                return Ok(());
            }
            for capture in captures {
                println!("{}", present_capture_row(&capture));
            }
            Ok(())
        }
        Command::Show { date, capture_id } => {
            let key = CaptureKey::new(date, capture_id)
                .map_err(|error| CommandError::Usage(format!("invalid capture: {error}")))?;
            let (backend, service) = cli_service(config);
            let detail = service
                .show_capture(ShowCaptureCommand { key: key.clone() })
                .map_err(|error| CommandError::Runtime(format!("show failed: {error}")))?;
            println!("{}", present_capture_detail(&detail));

            if detail.point_cloud_exists {
                match backend.point_cloud_info(&key) {
                    Ok(info) => {
                        for line in present_point_cloud_info(&info) {
                            println!("{line}");
                        }
                    }
                    Err(error) => println!("point cloud info unavailable: {error}"),
                }
            }

            match service.brick_info(&key) {
                Ok(info) => println!("{}", present_brick_info(&info)),
                Err(error) => {
                    warn!("brick info for {key} failed: {error}");
                    println!("brick info unavailable: {error}");
                }
            }
            Ok(())
        }
    }
}

fn print_usage() {
    println!("usage:");
    println!("  brick-review ui");
    println!("  brick-review dates");
    println!("  brick-review captures <date>");
    println!("  brick-review show <date> <capture_id>");
}
