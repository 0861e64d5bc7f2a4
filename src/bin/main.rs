extern crate clap;
extern crate qc_index;
extern crate serde_json;
extern crate tracing;
extern crate tracing_subscriber;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use qc_index::config::Config;
use qc_index::index;
use qc_index::service::{Payload, Response, Service};
use std::fs;
use std::path::Path;
use std::process;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() {
    let study_arg = Arg::with_name("STUDY")
        .required(true)
        .index(1)
        .help("The study of the QC database");
    let pipeline_arg = Arg::with_name("PIPELINE")
        .required(true)
        .index(2)
        .help("The pipeline of the QC database");
    let entity_arg = Arg::with_name("ID")
        .required(true)
        .index(3)
        .help("The id of the entity");

    let init_cmd = SubCommand::with_name("init")
        .about("indexes the image files of one or all configured databases")
        .arg(
            Arg::with_name("DB_NAME")
                .index(1)
                .help("The database (<study>_<pipeline>) to initialize, all if absent"),
        )
        .arg(
            Arg::with_name("reset")
                .long("reset")
                .short("r")
                .help("Removes existing database files before indexing.")
                .takes_value(false),
        );
    let summary_cmd = SubCommand::with_name("summary")
        .about("prints the rating progress of a database")
        .arg(study_arg.clone())
        .arg(pipeline_arg.clone());
    let spreadsheet_cmd = SubCommand::with_name("spreadsheet")
        .about("prints all entities of a database")
        .arg(study_arg.clone())
        .arg(pipeline_arg.clone());
    let entity_cmd = SubCommand::with_name("entity")
        .about("prints a single entity")
        .arg(study_arg.clone())
        .arg(pipeline_arg.clone())
        .arg(entity_arg.clone());
    let view_cmd = SubCommand::with_name("view")
        .about("prints a single entity together with the ratings it can be given")
        .arg(study_arg.clone())
        .arg(pipeline_arg.clone())
        .arg(entity_arg.clone());
    let rate_cmd = SubCommand::with_name("rate")
        .about("updates rating, comment and/or pass/fail state of an entity")
        .arg(study_arg.clone())
        .arg(pipeline_arg.clone())
        .arg(entity_arg.clone())
        .arg(
            Arg::with_name("JSON")
                .required(true)
                .index(4)
                .help("The update, e.g. '{\"rating\": 1, \"comment\": \"\", \"failed\": false}'"),
        );
    let export_cmd = SubCommand::with_name("export")
        .about("exports the QC table of a database as CSV")
        .arg(study_arg)
        .arg(pipeline_arg)
        .arg(
            Arg::with_name("out")
                .long("out")
                .short("o")
                .takes_value(true)
                .help("Writes the table into the given file instead of stdout."),
        );

    let cli = App::new("QC Index")
        .version(env!("CARGO_PKG_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about("Indexes derived imaging files for quality control and tracks their ratings")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("config")
                .long("config")
                .short("c")
                .takes_value(true)
                .help("The configuration file (defaults to the file named by QC_INDEX_CONF)"),
        )
        .subcommand(init_cmd)
        .subcommand(summary_cmd)
        .subcommand(spreadsheet_cmd)
        .subcommand(entity_cmd)
        .subcommand(view_cmd)
        .subcommand(rate_cmd)
        .subcommand(export_cmd)
        .get_matches();

    // Logs go to stderr, stdout is reserved for command output.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::locate(cli.value_of("config").map(Path::new)) {
        Ok(config) => config,
        Err(e) => {
            error!("Could not load configuration: {}", e);
            process::exit(1);
        }
    };

    let success = match cli.subcommand() {
        ("init", Some(cmd_cli)) => init_databases(&config, cmd_cli),
        (query, Some(cmd_cli)) => run_query(Service::new(config), query, cmd_cli),
        _ => false,
    };
    if !success {
        process::exit(1);
    }
}

fn init_databases(config: &Config, cmd_cli: &ArgMatches) -> bool {
    let reset = cmd_cli.is_present("reset");
    let db_names = match cmd_cli.value_of("DB_NAME") {
        Some(db_name) => vec![db_name],
        None => config.database_names(),
    };

    let mut success = true;
    for (db_name, result) in index::initialize_databases(config, &db_names, reset) {
        match result {
            Ok(report) => println!(
                "{}: {} entities ({} images) in {} rows and {} columns",
                db_name, report.entities, report.images, report.rows, report.columns
            ),
            Err(e) => {
                eprintln!("{}: {}", db_name, e);
                success = false;
            }
        }
    }

    success
}

fn run_query(service: Service, query: &str, cmd_cli: &ArgMatches) -> bool {
    let study = cmd_cli.value_of("STUDY").unwrap_or_default();
    let pipeline = cmd_cli.value_of("PIPELINE").unwrap_or_default();
    let entity_id = match cmd_cli.value_of("ID").map(str::parse::<i64>) {
        Some(Ok(id)) => id,
        Some(Err(_)) => {
            eprintln!("Entity ids must be integers");
            return false;
        }
        None => 0,
    };

    let response = match query {
        "summary" => service.summary(study, pipeline),
        "spreadsheet" => service.spreadsheet(study, pipeline),
        "entity" => service.entity(study, pipeline, entity_id),
        "view" => service.view(study, pipeline, entity_id),
        "rate" => {
            let body = cmd_cli.value_of("JSON").unwrap_or_default();
            service.update_rating(study, pipeline, entity_id, body)
        }
        "export" => service.export(study, pipeline),
        _ => return false,
    };

    print_response(response, cmd_cli.value_of("out"))
}

fn print_response(response: Response, out_file: Option<&str>) -> bool {
    let success = response.status.is_success();
    let text = match response.payload {
        Payload::Json(value) => match serde_json::to_string_pretty(&value) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("Could not print response: {}", e);
                return false;
            }
        },
        Payload::Document { content, .. } => content,
    };

    if !success {
        eprintln!("{} {}", response.status.code(), text);
        return false;
    }

    match out_file {
        Some(path) => {
            if let Err(e) = fs::write(path, text + "\n") {
                eprintln!("Could not write {}: {}", path, e);
                return false;
            }
        }
        None => println!("{}", text),
    }
    true
}
