use std::error::Error;
use std::io;
use std::path::Path;

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use ndarray::Array2;
use serde::Serialize;

use hic_query::{
    is_cooler, is_hic_file, is_multires_file, is_scool_file, CountType, DenseMatrix, FetchOptions, HicFile,
    MultiResFile, PixelFrame, QueryType, SingleCellFile, Table,
};

type CsvWriter = csv::Writer<io::Stdout>;

// stdout carries the query output, so log records go to stderr
fn setup_logging(verbosity: u64, log_file: Option<&Path>) -> Result<(), fern::InitError> {
    let mut base_config = fern::Dispatch::new();

    base_config = match verbosity {
        0 => base_config.level(log::LevelFilter::Warn),
        1 => base_config.level(log::LevelFilter::Info),
        2 => base_config.level(log::LevelFilter::Debug),
        _ => base_config.level(log::LevelFilter::Trace),
    };

    if let Some(log_file) = log_file {
        let file_config = fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "{}[{}][{}] {}",
                    chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                    record.target(),
                    record.level(),
                    message
                ))
            })
            .chain(fern::log_file(log_file)?);
        base_config = base_config.chain(file_config);
    }

    let stderr_config = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}] {}",
                chrono::Local::now().format("%H:%M"),
                record.target(),
                record.level(),
                message
            ))
        })
        .chain(io::stderr());

    base_config
        .chain(stderr_config)
        .apply()?;

    Ok(())
}

fn tsv_writer(has_headers: bool) -> CsvWriter {
    csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(has_headers)
        .from_writer(io::stdout())
}

fn write_records<I, R>(records: I) -> Result<(), Box<dyn Error>>
    where I: IntoIterator<Item = R>, R: Serialize {
    let mut wtr = tsv_writer(true);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_matrix<N: ToString>(matrix: &Array2<N>) -> Result<(), Box<dyn Error>> {
    let mut wtr = tsv_writer(false);
    for row in matrix.rows() {
        wtr.write_record(row.iter().map(|v| v.to_string()))?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_table(table: &Table) -> Result<(), Box<dyn Error>> {
    match table {
        Table::Int(PixelFrame::Sparse(t)) => write_records(t.records()),
        Table::Int(PixelFrame::Joined(t)) => write_records(t.records()),
        Table::Float(PixelFrame::Sparse(t)) => write_records(t.records()),
        Table::Float(PixelFrame::Joined(t)) => write_records(t.records()),
    }
}

fn fetch_options(matches: &ArgMatches) -> Result<FetchOptions, Box<dyn Error>> {
    let mut options = FetchOptions::new()
        .with_normalization(matches.value_of("normalization").unwrap_or("NONE"))
        .joined(matches.is_present("join"));
    options.range1 = matches.value_of("range1").map(String::from);
    options.range2 = matches.value_of("range2").map(String::from);
    if let Some(count_type) = matches.value_of("count-type") {
        options = options.with_count_type(count_type.parse::<CountType>()?);
    }
    if let Some(query_type) = matches.value_of("query-type") {
        options = options.with_query_type(query_type.parse::<QueryType>()?);
    }
    Ok(options)
}

fn open_file(matches: &ArgMatches) -> Result<HicFile, Box<dyn Error>> {
    let uri = matches.value_of("uri").ok_or("missing URI")?;
    let resolution = match matches.value_of("resolution") {
        Some(res) => Some(res.parse::<i64>()?),
        None => None,
    };
    Ok(HicFile::open(uri, resolution)?)
}

fn uri_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name("uri")
        .value_name("URI")
        .required(true)
        .help("Path to a .cool/.mcool file or a cooler URI (file.mcool::/resolutions/1000).")
}

fn resolution_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name("resolution")
        .short("r")
        .long("resolution")
        .value_name("INT")
        .takes_value(true)
        .help("Resolution to open. Required for multi-resolution files.")
}

fn main() -> Result<(), Box<dyn Error>> {
    let matches = App::new("hic-query")
        .version(hic_query::version())
        .author("Pavel Avdeyev")
        .about("Queries Hi-C contact matrices stored in .cool, .mcool and .scool files.")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .global(true)
                .help("Increases logging verbosity (-v info, -vv debug, -vvv trace).")
        )
        .arg(
            Arg::with_name("log")
                .long("log")
                .value_name("FILE")
                .takes_value(true)
                .global(true)
                .help("Additionally writes log records to this file.")
        )
        .subcommand(
            SubCommand::with_name("dump")
                .about("Writes pixels (or a dense matrix) as TSV to stdout.")
                .arg(uri_arg())
                .arg(resolution_arg())
                .arg(
                    Arg::with_name("range1")
                        .long("range1")
                        .value_name("RANGE")
                        .takes_value(true)
                        .help("First query range (chr1, chr1:0-1000000). Whole genome when omitted.")
                )
                .arg(
                    Arg::with_name("range2")
                        .long("range2")
                        .value_name("RANGE")
                        .takes_value(true)
                        .requires("range1")
                        .help("Second query range. Defaults to range1.")
                )
                .arg(
                    Arg::with_name("normalization")
                        .short("n")
                        .long("normalization")
                        .value_name("NAME")
                        .takes_value(true)
                        .help("Balancing weights to apply (weight, KR, VC, ...). NONE returns raw counts.")
                )
                .arg(
                    Arg::with_name("count-type")
                        .long("count-type")
                        .possible_values(&["int", "float"])
                        .takes_value(true)
                        .help("Count type. Normalized counts are always float.")
                )
                .arg(
                    Arg::with_name("query-type")
                        .long("query-type")
                        .possible_values(&["UCSC", "BED"])
                        .takes_value(true)
                        .help("Syntax of the query ranges.")
                )
                .arg(
                    Arg::with_name("join")
                        .long("join")
                        .conflicts_with("dense")
                        .help("Replaces bin ids with genomic coordinates.")
                )
                .arg(
                    Arg::with_name("dense")
                        .long("dense")
                        .help("Writes a dense matrix instead of sparse pixels.")
                )
        )
        .subcommand(
            SubCommand::with_name("info")
                .about("Lists file attributes.")
                .arg(uri_arg())
                .arg(resolution_arg())
        )
        .subcommand(
            SubCommand::with_name("chroms")
                .about("Lists chromosomes and their sizes.")
                .arg(uri_arg())
                .arg(resolution_arg())
        )
        .subcommand(
            SubCommand::with_name("bins")
                .about("Lists the bin table.")
                .arg(uri_arg())
                .arg(resolution_arg())
        )
        .subcommand(
            SubCommand::with_name("norms")
                .about("Lists available normalizations.")
                .arg(uri_arg())
                .arg(resolution_arg())
        )
        .subcommand(
            SubCommand::with_name("resolutions")
                .about("Lists the resolutions of a .mcool file.")
                .arg(Arg::with_name("path").value_name("FILE").required(true))
        )
        .subcommand(
            SubCommand::with_name("cells")
                .about("Lists the cells of a .scool file.")
                .arg(Arg::with_name("path").value_name("FILE").required(true))
        )
        .subcommand(
            SubCommand::with_name("validate")
                .about("Reports the detected file format.")
                .arg(Arg::with_name("path").value_name("FILE").required(true))
        )
        .get_matches();

    setup_logging(matches.occurrences_of("verbose"), matches.value_of("log").map(Path::new))?;

    match matches.subcommand() {
        ("dump", Some(dump_matches)) => {
            let file = open_file(dump_matches)?;
            let options = fetch_options(dump_matches)?;
            if dump_matches.is_present("dense") {
                match file.fetch_dense(&options)? {
                    DenseMatrix::Int(m) => write_matrix(&m)?,
                    DenseMatrix::Float(m) => write_matrix(&m)?,
                }
            } else {
                write_table(&file.fetch_df(&options)?)?;
            }
        },
        ("info", Some(info_matches)) => {
            let file = open_file(info_matches)?;
            let attrs = file.attributes();
            write_records(attrs.iter().map(|(name, value)| (name, value.to_string())))?;
        },
        ("chroms", Some(chroms_matches)) => {
            write_records(open_file(chroms_matches)?.chromosomes().records())?;
        },
        ("bins", Some(bins_matches)) => {
            write_records(open_file(bins_matches)?.bins().records())?;
        },
        ("norms", Some(norms_matches)) => {
            for norm in open_file(norms_matches)?.avail_normalizations()? {
                println!("{}", norm);
            }
        },
        ("resolutions", Some(res_matches)) => {
            let mcool = MultiResFile::open(res_matches.value_of("path").ok_or("missing path")?)?;
            for res in mcool.resolutions() {
                println!("{}", res);
            }
        },
        ("cells", Some(cells_matches)) => {
            let scool = SingleCellFile::open(cells_matches.value_of("path").ok_or("missing path")?)?;
            for cell in scool.cells() {
                println!("{}", cell);
            }
        },
        ("validate", Some(validate_matches)) => {
            let path = validate_matches.value_of("path").ok_or("missing path")?;
            let format = if is_hic_file(path) {
                "hic"
            } else if is_multires_file(path) {
                "mcool"
            } else if is_scool_file(path) {
                "scool"
            } else if is_cooler(path) {
                "cool"
            } else {
                "unknown"
            };
            println!("{}\t{}", path, format);
        },
        _ => unreachable!(),
    }
    Ok(())
}
