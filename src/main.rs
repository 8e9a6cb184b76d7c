use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::*;

use awr_trend::analyze::{self, ChartOptions, ReportMode};
use awr_trend::awr::{self, DirParse, FailurePolicy, ParseOptions};
use awr_trend::error::AwrError;
use awr_trend::make_notes;

///This tool reads a directory of AWR or STATSPACK text reports and draws the
///wait classes, load profile, host CPU, time model, instance activity and top SQL
///of every snapshot into a single HTML page.
///Reports from 11.2.0.4 on are read from their wait class table, older ones are
///summed from foreground wait events.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
struct Args {
	///Directory with the text reports
	directory: PathBuf,

	///Only .txt files whose name contains this text are parsed. Output goes to <FILTER>.html
	filter: String,

	///Which panels to draw
	#[clap(short, long, arg_enum, default_value = "full")]
	mode: ReportMode,

	///Divide everything except the load profile by the snapshot's DB Time
	#[clap(short, long)]
	scale: bool,

	///Skip reports that can't be parsed instead of stopping at the first one
	#[clap(short, long)]
	keep_going: bool,

	///Dump parsed snapshots to this JSON file as well
	#[clap(short, long)]
	json: Option<PathBuf>,

	///Write the chart to this file instead of <FILTER>.html
	#[clap(short, long)]
	outfile: Option<PathBuf>,

	///Open the chart in the default browser
	#[clap(long)]
	open: bool,

	///Should I be quiet? This mode suppresses terminal output but still writes to log file
	#[clap(short, long)]
	quiet: bool,
}

fn report_parse_problems(parsed: &DirParse, logfile: &str, quiet: bool) {
	for warning in &parsed.warnings {
		make_notes!(logfile, quiet, 0, "{} {}\n", "Warning:".yellow(), warning);
	}
	for failure in &parsed.failures {
		make_notes!(logfile, quiet, 0, "{} {}: {}\n", "Skipped".bright_red(), failure.file.bright_magenta(), failure.error);
	}
}

fn print_summary(parsed: &DirParse, logfile: &str, quiet: bool) {
	make_notes!(logfile, quiet, 2, "{}\n", "Wait classes vs DB Time".bright_cyan());
	for s in analyze::wait_class_summary(&parsed.collection) {
		let corr = match s.correlation {
			Some(c) if c.abs() >= 0.5 => format!("{:.2}", c).bright_red().bold(),
			Some(c) => format!("{:.2}", c).normal(),
			None => "-".normal(),
		};
		let avg = s.mean.map(|m| format!("{:.2}", m)).unwrap_or_else(|| "-".to_string());
		make_notes!(logfile, quiet, 0, "{:>16}  mean {:>12} s  correlation {}\n", s.class.to_string(), avg, corr);
	}
}

fn run(args: &Args) -> Result<(), AwrError> {
	let logfile = format!("{}.log", args.filter);
	make_notes!(logfile, args.quiet, 0, "{}{}\n", "AWR-TREND v".bright_yellow(), env!("CARGO_PKG_VERSION").bright_yellow());

	let opts = ParseOptions {
		filter: args.filter.clone(),
		policy: if args.keep_going { FailurePolicy::KeepGoing } else { FailurePolicy::Abort },
		quiet: args.quiet,
	};
	let parsed = awr::parse_awr_dir(&args.directory, &opts)?;
	report_parse_problems(&parsed, &logfile, args.quiet);
	make_notes!(
		logfile,
		args.quiet,
		0,
		"{} snapshot(s) from {} report(s)\n",
		parsed.collection.len(),
		parsed.files_parsed
	);

	if let Some(json_path) = &args.json {
		fs::write(json_path, parsed.collection.to_json()?)
			.map_err(|source| AwrError::Output { path: json_path.clone(), source })?;
		make_notes!(logfile, args.quiet, 0, "Snapshots written to {}\n", json_path.display());
	}

	let html_path = args
		.outfile
		.clone()
		.unwrap_or_else(|| PathBuf::from(format!("{}.html", args.filter)));
	let chart = ChartOptions { mode: args.mode, scale: args.scale };
	analyze::plot_to_file(&parsed.collection, &html_path, chart, &args.filter)?;
	make_notes!(logfile, args.quiet, 0, "Chart written to {}\n", html_path.display().to_string().bright_green());

	if parsed.collection.len() > 1 {
		print_summary(&parsed, &logfile, args.quiet);
	}

	if args.open {
		if let Err(e) = open::that(&html_path) {
			make_notes!(logfile, args.quiet, 0, "{} couldn't open {}: {}\n", "Warning:".yellow(), html_path.display(), e);
		}
	}
	Ok(())
}

fn main() -> ExitCode {
	let args = Args::parse();
	match run(&args) {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			eprintln!("{} {}", "Error".bright_red(), e);
			let logfile = format!("{}.log", args.filter);
			make_notes!(logfile, true, 0, "Error {}\n", e);
			ExitCode::FAILURE
		}
	}
}
