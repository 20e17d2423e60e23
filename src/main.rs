use std::fs::File;
use std::io;
use std::process;

use clap::{Arg, App, ArgMatches};
use log::{error, info};

use qcew::bls::http::UreqClient;
use qcew::bls::qcew::{fetch_with, UrlTemplate};
use qcew::bls::QcewParams;
use qcew::config::QcewConfig;
use qcew::{QcewError, Result};

fn command_usage<'a, 'b>() -> App<'a, 'b> {
    App::new("qcew")
    .author("Matthew Scheffel <matt@dataheck.com>")
    .about("Retrieves Quarterly Census of Employment and Wages slices from the BLS")
    .arg(
        Arg::with_name("method")
            .takes_value(true)
            .required(true)
            .help("Kind of slice to request: area, industry or size (case-insensitive)")
    )
    .arg(
        Arg::with_name("year")
            .short("y")
            .long("year")
            .takes_value(true)
            .help("Four digit year, e.g. 2017")
    )
    .arg(
        Arg::with_name("quarter")
            .short("q")
            .long("quarter")
            .takes_value(true)
            .help("Quarter 1-4, or 'a' for annual averages. Ignored for size requests, which are first quarter only.")
    )
    .arg(
        Arg::with_name("area")
            .short("a")
            .long("area")
            .takes_value(true)
            .help("Area code, e.g. 26000 for Michigan or US000 for the nation")
    )
    .arg(
        Arg::with_name("industry")
            .short("i")
            .long("industry")
            .takes_value(true)
            .help("NAICS based industry code, e.g. 1012")
    )
    .arg(
        Arg::with_name("size")
            .short("s")
            .long("size")
            .takes_value(true)
            .help("Establishment size class code, 0-9")
    )
    .arg(
        Arg::with_name("config")
            .long("config")
            .takes_value(true)
            .default_value("config/qcew.toml")
            .help("Location of fetcher configuration. Missing file means built-in defaults.")
    )
    .arg(
        Arg::with_name("output")
            .short("o")
            .long("output")
            .takes_value(true)
            .help("Write the CSV to this file instead of stdout")
    )
    .arg(
        Arg::with_name("url-only")
            .long("url-only")
            .takes_value(false)
            .help("Print the request URL and exit without fetching")
    )
    .arg(
        Arg::with_name("http-connect-timeout")
            .long("http-connect-timeout")
            .takes_value(true)
            .help("HTTP connection timeout in milliseconds. Overrides the configuration file.")
    )
    .arg(
        Arg::with_name("http-receive-timeout")
            .long("http-receive-timeout")
            .takes_value(true)
            .help("HTTP receive timeout in milliseconds. Overrides the configuration file. National slices are large.")
    )
}

fn params_from(matches: &ArgMatches) -> QcewParams {
    // presence, not emptiness: `--year ""` is still a supplied year
    QcewParams {
        year: matches.value_of("year").map(String::from),
        quarter: matches.value_of("quarter").map(String::from),
        area: matches.value_of("area").map(String::from),
        industry: matches.value_of("industry").map(String::from),
        size: matches.value_of("size").map(String::from),
    }
}

fn timeout_override(matches: &ArgMatches, name: &str) -> Result<Option<u64>> {
    match matches.value_of(name) {
        Some(v) => {
            match v.parse::<u64>() {
                Ok(ms) => { Ok(Some(ms)) },
                Err(_) => { Err(QcewError::InvalidArgument(format!("Invalid {} specified: '{}'", name, v))) }
            }
        },
        None => { Ok(None) }
    }
}

fn run(matches: &ArgMatches) -> Result<()> {
    let mut config = QcewConfig::load(matches.value_of("config").unwrap_or("config/qcew.toml"))?;

    if let Some(ms) = timeout_override(matches, "http-connect-timeout")? {
        config.http_connect_timeout = ms;
    }
    if let Some(ms) = timeout_override(matches, "http-receive-timeout")? {
        config.http_receive_timeout = ms;
    }

    let method = matches.value_of("method").unwrap_or("");
    let params = params_from(matches);

    if matches.is_present("url-only") {
        println!("{}", UrlTemplate::build(&config.api_root, method, &params)?);
        return Ok(());
    }

    let client = UreqClient::from_config(&config);
    let table = fetch_with(&client, &config.api_root, method, &params)?;

    match matches.value_of("output") {
        Some(path) => {
            table.write_csv(File::create(path)?)?;
            info!("Wrote {} rows to {}", table.len(), path);
        },
        None => {
            let stdout = io::stdout();
            table.write_csv(stdout.lock())?;
        }
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = command_usage().get_matches();

    if let Err(e) = run(&matches) {
        // validation diagnostics were already logged by the fetcher
        if !e.is_diagnostic() {
            error!("{}", e);
        }
        eprintln!("{}", e);
        process::exit(1);
    }
}
