use clap::{Arg, ArgAction, Command as ClapCommand};
use log::{error, LevelFilter};
use std::process;

use rastertile::commands::{CommandFactory, RastertileCommandFactory};
use rastertile::utils::logger::Logger;

fn cli() -> ClapCommand {
    ClapCommand::new("rastertile")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Tiled access to multi-directory TIFF/BigTIFF rasters")
        .arg(
            Arg::new("input")
                .help("Input TIFF file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("info")
                .short('i')
                .long("info")
                .help("Summarize directories, levels and read methods (default)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("tile")
                .short('t')
                .long("tile")
                .help("Fetch one tile given as x,y,width,height")
                .value_name("RECT")
                .allow_hyphen_values(true)
                .conflicts_with("scan"),
        )
        .arg(
            Arg::new("scan")
                .short('s')
                .long("scan")
                .help("Read every output tile of a level and count their status")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("level")
                .short('l')
                .long("level")
                .help("Resolution level to read")
                .value_name("LEVEL"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Save the fetched tile as an image (PNG)")
                .value_name("FILE")
                .requires("tile"),
        )
        .arg(
            Arg::new("bands")
                .long("bands")
                .help("Output band order, e.g. 2,1,0")
                .value_name("LIST"),
        )
        .arg(
            Arg::new("no-palette")
                .long("no-palette")
                .help("Read color mapped images as raw indexes")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .help("Engine options file (TOML)")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("state")
                .long("state")
                .help("Open with a saved handler state instead of parsing the tags")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("save-state")
                .long("save-state")
                .help("Write the handler state after opening")
                .value_name("FILE"),
        )
        .arg(
            Arg::new("starting-res-level")
                .long("starting-res-level")
                .help("Level offset when the file is the overview of another image")
                .value_name("LEVEL"),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Also write log output to this file")
                .value_name("FILE"),
        )
}

fn main() {
    let matches = cli().get_matches();

    let level = if matches.get_flag("verbose") { LevelFilter::Debug } else { LevelFilter::Info };

    let logger = match matches.get_one::<String>("log-file") {
        Some(log_file) => {
            if let Err(e) = Logger::init_global_logger(log_file, level) {
                eprintln!("Error setting up global logger: {}", e);
                process::exit(1);
            }
            match Logger::new(log_file, level) {
                Ok(l) => l,
                Err(e) => {
                    eprintln!("Error initializing logger: {}", e);
                    process::exit(1);
                }
            }
        }
        None => {
            env_logger::Builder::new()
                .filter_level(level)
                .parse_default_env()
                .format_target(false)
                .init();
            Logger::console(level)
        }
    };

    let factory = RastertileCommandFactory::new();

    match factory.create_command(&matches, &logger) {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}
