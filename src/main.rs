use doxy_navtree::{
    config::{ConfigError, NavConfig},
    navtree::{LoadReport, Loader},
    tools::{diagnostics, formatter, printer},
};
use std::{env, path::PathBuf, process::ExitCode};

const USAGE: &str = "Usage: navtree [check|tree|lookup|index|format|json] <navtreedata.js> [target|url] \
[--config <navtree.toml>] [--resolve] [--depth <n>]";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    Check,
    Tree,
    Lookup,
    Index,
    Format,
    Json,
}

impl Command {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "check" => Some(Self::Check),
            "tree" => Some(Self::Tree),
            "lookup" => Some(Self::Lookup),
            "index" => Some(Self::Index),
            "format" => Some(Self::Format),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Invocation {
    command: Command,
    script: PathBuf,
    argument: Option<String>,
    config: Option<PathBuf>,
    resolve: bool,
    depth: Option<usize>,
}

impl Invocation {
    fn parse(args: &[String]) -> Result<Self, String> {
        let mut positional = Vec::new();
        let mut config = None;
        let mut resolve = false;
        let mut depth = None;

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--config" => {
                    let value = iter.next().ok_or("--config needs a path")?;
                    config = Some(PathBuf::from(value));
                }
                "--resolve" => resolve = true,
                "--depth" => {
                    let value = iter.next().ok_or("--depth needs a number")?;
                    let parsed = value
                        .parse::<usize>()
                        .map_err(|_| format!("invalid depth `{value}`"))?;
                    depth = Some(parsed);
                }
                flag if flag.starts_with("--") => return Err(format!("unknown flag `{flag}`")),
                _ => positional.push(arg.clone()),
            }
        }

        let mut positional = positional.into_iter();
        let name = positional.next().ok_or("missing command")?;
        let command =
            Command::parse(&name).ok_or_else(|| format!("Invalid command `{name}`."))?;
        let script = positional.next().ok_or("missing script path")?;
        let argument = positional.next();
        if let Some(extra) = positional.next() {
            return Err(format!("unexpected argument `{extra}`"));
        }

        Ok(Self {
            command,
            script: PathBuf::from(script),
            argument,
            config,
            resolve,
            depth,
        })
    }

    fn load_config(&self) -> Result<NavConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => NavConfig::load(path)?,
            None => NavConfig::discover(&self.script)?,
        };
        if self.resolve {
            config.resolve_deferred = true;
        }
        Ok(config)
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    let invocation = match Invocation::parse(&args) {
        Ok(invocation) => invocation,
        Err(message) => {
            eprintln!("{message}\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    let config = match invocation.load_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let report = match Loader::new(&config).load_path(&invocation.script) {
        Ok(report) => report,
        Err(err) => {
            diagnostics::report_load_error(&err);
            return ExitCode::FAILURE;
        }
    };
    diagnostics::emit_load_issues(&report);

    run(&invocation, &config, &report)
}

fn run(invocation: &Invocation, config: &NavConfig, report: &LoadReport) -> ExitCode {
    let store = &report.store;
    match invocation.command {
        Command::Check => {
            printer::print_summary(store, report.issues.len());
            ExitCode::SUCCESS
        }
        Command::Tree => {
            print!("{}", printer::render_outline(store, invocation.depth));
            ExitCode::SUCCESS
        }
        Command::Lookup => {
            let Some(target) = &invocation.argument else {
                eprintln!("lookup needs a target.\n{USAGE}");
                return ExitCode::from(2);
            };
            match store.find_path(target) {
                Some(path) => {
                    println!("{}", printer::render_path(&path));
                    ExitCode::SUCCESS
                }
                None => {
                    println!("not found");
                    ExitCode::FAILURE
                }
            }
        }
        Command::Index => match &invocation.argument {
            None => {
                print!("{}", printer::render_index(store.index()));
                ExitCode::SUCCESS
            }
            Some(url) => match store.index().chunk_for(url) {
                Some(chunk) if chunk.fallback => {
                    println!(
                        "{} (before first anchor; viewer falls back to {})",
                        chunk.script_name(),
                        store.home_target().unwrap_or("the first page")
                    );
                    ExitCode::SUCCESS
                }
                Some(chunk) => {
                    println!("{}", chunk.script_name());
                    ExitCode::SUCCESS
                }
                None => {
                    println!("index is empty");
                    ExitCode::FAILURE
                }
            },
        },
        Command::Format => {
            print!("{}", formatter::format_script(store, config));
            ExitCode::SUCCESS
        }
        Command::Json => match formatter::to_json(store) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("error: {err}");
                ExitCode::FAILURE
            }
        },
    }
}
