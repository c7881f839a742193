extern crate clap;
use clap::{App, Arg, ArgMatches};

pub const INPUT_ARG_NAME: &str = "INPUT";
pub const OUTPUT_ARG_NAME: &str = "output";
pub const ADDRESS_ARG_NAME: &str = "address";
pub const PORT_ARG_NAME: &str = "port";
pub const PROFILE_ARG_NAME: &str = "profile";
pub const ROUTER_ARG_NAME: &str = "router";
pub const GEOMETRY_ARG_NAME: &str = "geometry";
pub const THREADS_ARG_NAME: &str = "threads";
pub const TIME_LIMIT_ARG_NAME: &str = "limit";

pub fn get_arg_matches() -> ArgMatches<'static> {
    App::new("Vehicle Routing Problem Solver")
        .version("0.1")
        .about("Solves capacitated and time window constrained vehicle routing problems")
        .arg(
            Arg::with_name(INPUT_ARG_NAME)
                .help("Sets the problem file to use, reads from stdin when omitted")
                .required(false)
                .index(1),
        )
        .arg(
            Arg::with_name(OUTPUT_ARG_NAME)
                .help("Specifies path to file for output result, writes to stdout when omitted")
                .short("o")
                .long(OUTPUT_ARG_NAME)
                .required(false)
                .takes_value(true),
        )
        .arg(
            Arg::with_name(ADDRESS_ARG_NAME)
                .help("Specifies address of the routing backend")
                .short("a")
                .long(ADDRESS_ARG_NAME)
                .required(false)
                .takes_value(true),
        )
        .arg(
            Arg::with_name(PORT_ARG_NAME)
                .help("Specifies port of the routing backend")
                .short("p")
                .long(PORT_ARG_NAME)
                .required(false)
                .takes_value(true),
        )
        .arg(
            Arg::with_name(PROFILE_ARG_NAME)
                .help("Specifies routing profile of the routing backend")
                .short("m")
                .long(PROFILE_ARG_NAME)
                .required(false)
                .takes_value(true),
        )
        .arg(
            Arg::with_name(ROUTER_ARG_NAME)
                .help("Specifies the routing backend kind")
                .short("r")
                .long(ROUTER_ARG_NAME)
                .possible_values(&["http", "lib"])
                .default_value("http")
                .required(false)
                .takes_value(true),
        )
        .arg(
            Arg::with_name(GEOMETRY_ARG_NAME)
                .help("Requests full route geometry in the output")
                .short("g")
                .long(GEOMETRY_ARG_NAME)
                .required(false),
        )
        .arg(
            Arg::with_name(THREADS_ARG_NAME)
                .help("Specifies amount of worker threads")
                .short("t")
                .long(THREADS_ARG_NAME)
                .required(false)
                .takes_value(true),
        )
        .arg(
            Arg::with_name(TIME_LIMIT_ARG_NAME)
                .help("Specifies explicit solve time limit in seconds")
                .short("l")
                .long(TIME_LIMIT_ARG_NAME)
                .required(false)
                .takes_value(true),
        )
        .get_matches()
}
