//! A command line interface to the *Vehicle Routing Problem* solver.

mod args;
mod format;

extern crate clap;
use self::args::*;
use self::format::problem::{deserialize_problem, read_problem};
use self::format::solution::{write_error, write_solution};
use clap::ArgMatches;
use rovr_core::prelude::*;
use rovr_core::utils::ErrorKind;
use std::fs::File;
use std::io::{stdin, stdout, BufReader, BufWriter, Read, Write};
use std::process;
use std::sync::Arc;

fn main() {
    let matches = get_arg_matches();

    match run_solve(&matches) {
        Ok(()) => {}
        Err(error) => {
            let code = match error.kind() {
                ErrorKind::Internal => 1,
                ErrorKind::Input => 2,
                ErrorKind::Routing => 3,
            };
            let writer = create_write_buffer(&matches);
            write_error(writer, code, error.message()).unwrap_or_else(|_| {
                eprintln!("cannot report error: '{}'", error.message());
            });
            process::exit(code);
        }
    }
}

fn run_solve(matches: &ArgMatches) -> SolverResult<()> {
    let reader = create_read_buffer(matches)?;
    let api_problem = deserialize_problem(reader)?;

    // routing backend flags are honored, but no backend is linked into this build
    if api_problem.matrix.is_none() {
        let router = matches.value_of(ROUTER_ARG_NAME).unwrap_or("http");
        let address = matches.value_of(ADDRESS_ARG_NAME).unwrap_or("0.0.0.0");
        let port = matches.value_of(PORT_ARG_NAME).unwrap_or("5000");
        let profile = matches.value_of(PROFILE_ARG_NAME).unwrap_or("car");
        return Err(SolverError::routing(format!(
            "cannot reach {router} routing backend for profile '{profile}' at {address}:{port}: \
             no backend is linked, supply a custom matrix instead"
        )));
    }

    let geometry_requested = matches.is_present(GEOMETRY_ARG_NAME)
        || api_problem.options.as_ref().map_or(false, |options| options.geometry);
    if geometry_requested {
        eprintln!("full route geometry requires a routing backend, field is omitted");
    }

    let problem = read_problem(api_problem, None)?;

    if let Some(threads) = matches.value_of(THREADS_ARG_NAME) {
        let threads = threads
            .parse::<usize>()
            .map_err(|_| SolverError::input("cannot parse amount of worker threads"))?;
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .map_err(|error| SolverError::internal(format!("cannot configure thread pool: {error}")))?;
    }

    let max_time = matches
        .value_of(TIME_LIMIT_ARG_NAME)
        .map(|limit| limit.parse::<usize>().map_err(|_| SolverError::input("cannot parse solve time limit")))
        .transpose()?;

    let environment = Arc::new(Environment::new_with_time_quota(max_time));
    let solution = Solver::new(Arc::new(problem), environment).solve()?;

    let writer = create_write_buffer(matches);
    write_solution(writer, &solution)
}

fn create_read_buffer(matches: &ArgMatches) -> SolverResult<BufReader<Box<dyn Read>>> {
    Ok(match matches.value_of(INPUT_ARG_NAME) {
        Some(path) => {
            let file = File::open(path)
                .map_err(|error| SolverError::input(format!("cannot open problem file '{path}': {error}")))?;
            BufReader::new(Box::new(file) as Box<dyn Read>)
        }
        None => BufReader::new(Box::new(stdin()) as Box<dyn Read>),
    })
}

fn create_write_buffer(matches: &ArgMatches) -> BufWriter<Box<dyn Write>> {
    match matches.value_of(OUTPUT_ARG_NAME).map(File::create) {
        Some(Ok(file)) => BufWriter::new(Box::new(file) as Box<dyn Write>),
        _ => BufWriter::new(Box::new(stdout()) as Box<dyn Write>),
    }
}
