use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal};
use std::process;

use anyhow::Context;
use clap::{arg, command, ArgMatches, Command};
use regrep::Regex;
use yansi::Color::Red;
use yansi::Paint;

const APP_HELP_TEMPLATE: &str = r#"regrep {version}, a regular expression line matcher.

{before-help}{usage-heading}
  {usage}

{all-args}{after-help}
"#;

const EXIT_ERROR: i32 = 1;

fn cli() -> Command {
    command!()
        .about("Match a regular expression against lines of input")
        .help_template(APP_HELP_TEMPLATE)
        .arg(arg!(<PATTERN> "The regular expression to match"))
        .arg(arg!([FILE]... "Files to read line by line; `-` or nothing means standard input"))
        // Keep options sorted alphabetically by their long name.
        .arg(arg!(-d --"dump-graph" "Print the compiled graph before matching"))
        .arg(arg!(-c --"print-captures" "Print the capture ( ) groups of every match"))
        .arg(arg!(-t --trim "Print only the matched portion of each line"))
}

fn main() {
    env_logger::init();

    // Redirected output should not contain ANSI escape codes.
    if !io::stdout().is_terminal() {
        yansi::disable();
    }

    let args = cli().get_matches();

    match run(&args) {
        Ok(exit_code) => process::exit(exit_code),
        Err(err) => {
            eprintln!("{} {:#}", "error:".paint(Red).bold(), err);
            process::exit(EXIT_ERROR);
        }
    }
}

fn run(args: &ArgMatches) -> anyhow::Result<i32> {
    let pattern = args.get_one::<String>("PATTERN").unwrap();

    // A pattern that does not compile prevents any matching attempt.
    let regex = regrep::compile(pattern)
        .with_context(|| format!("can not compile `{pattern}`"))?;

    log::debug!("compiled `{}` into {} states", pattern, regex.state_count());

    if args.get_flag("dump-graph") {
        print!("{regex}");
    }

    let trim = args.get_flag("trim");
    let print_captures = args.get_flag("print-captures");

    let files: Vec<&String> =
        args.get_many::<String>("FILE").map(Iterator::collect).unwrap_or_default();

    if files.is_empty() {
        match_lines(&regex, io::stdin().lock(), trim, print_captures)?;
        return Ok(0);
    }

    let mut exit_code = 0;

    for path in files {
        if path == "-" {
            match_lines(&regex, io::stdin().lock(), trim, print_captures)?;
            continue;
        }
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) => {
                eprintln!(
                    "{} can not open `{}`: {}, skipping",
                    "error:".paint(Red).bold(),
                    path,
                    err
                );
                exit_code = EXIT_ERROR;
                continue;
            }
        };
        match_lines(&regex, BufReader::new(file), trim, print_captures)?;
    }

    Ok(exit_code)
}

/// Matches every line from `reader` against `regex`, printing matching
/// lines and, when requested, their capture groups. Non-matching lines
/// are silently skipped.
fn match_lines(
    regex: &Regex,
    reader: impl BufRead,
    trim: bool,
    print_captures: bool,
) -> anyhow::Result<()> {
    for line in reader.lines() {
        let line = line.context("can not read input")?;
        let Some(captures) = regex.captures(&line)? else {
            continue;
        };
        if trim {
            // capture group 0 is the whole match
            let matched = captures.iter_group(0).next().unwrap_or("");
            println!("{matched}");
        } else {
            println!("{line}");
        }
        if print_captures {
            for group in 1..captures.group_count() {
                print!("    [{group}]");
                for text in captures.iter_group(group) {
                    print!(" {text}");
                }
                println!();
            }
        }
    }
    Ok(())
}
