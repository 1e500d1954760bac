use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use reroute::collection::RouteCollection;
use reroute::compiler::{RewriteListCompiler, load_compiled_file};
use reroute::config::parse_routes_file;
use reroute::matcher::match_collection;
use reroute::support::Method;

#[derive(Parser)]
#[command(name = "reroute")]
#[command(
	author,
	version,
	about = "Compile declarative rewrite routes into a reloadable registration artifact"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Compile a routes file into a registration artifact
	Compile {
		/// Path to the routes file
		routes: PathBuf,

		/// Write the artifact here instead of stdout
		#[arg(short, long, value_name = "PATH")]
		output: Option<PathBuf>,
	},
	/// Check a routes file for errors without compiling anything
	Validate {
		/// Path to the routes file
		routes: PathBuf,
	},
	/// Display the routes stored in a compiled artifact
	Show {
		/// Path to the compiled artifact
		artifact: PathBuf,
	},
	/// Match a request path against a compiled artifact
	Match {
		/// Path to the compiled artifact
		artifact: PathBuf,

		/// Request path to match
		#[arg(long)]
		path: String,

		/// HTTP method of the request
		#[arg(long, default_value = "GET")]
		method: String,
	},
}

fn main() -> ExitCode {
	match run() {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn run() -> Result<ExitCode> {
	let cli = Cli::parse();

	match cli.command {
		Commands::Compile { routes, output } => handle_compile(&routes, output.as_deref()),
		Commands::Validate { routes } => handle_validate(&routes),
		Commands::Show { artifact } => handle_show(&artifact),
		Commands::Match {
			artifact,
			path,
			method,
		} => handle_match(&artifact, &path, &method),
	}
}

fn handle_compile(routes_path: &Path, output: Option<&Path>) -> Result<ExitCode> {
	let rewrites = parse_routes_file(routes_path)
		.with_context(|| format!("Failed to load {}", routes_path.display()))?
		.build()
		.context("Failed to build route descriptors")?;

	let artifact = RewriteListCompiler::new(&rewrites)
		.compile()
		.context("Failed to compile routes")?;

	match output {
		Some(path) => {
			std::fs::write(path, &artifact)
				.with_context(|| format!("Failed to write {}", path.display()))?;
			println!("Compiled {} routes to {}", rewrites.len(), path.display());
		}
		None => print!("{artifact}"),
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_validate(routes_path: &Path) -> Result<ExitCode> {
	match parse_routes_file(routes_path).and_then(|file| file.build()) {
		Ok(rewrites) => {
			println!(
				"{} is valid ({} routes)",
				routes_path.display(),
				rewrites.len()
			);
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Routes error: {e}");
			Ok(ExitCode::FAILURE)
		}
	}
}

fn handle_show(artifact_path: &Path) -> Result<ExitCode> {
	let mut collection = RouteCollection::new();
	load_compiled_file(artifact_path, &mut collection)
		.with_context(|| format!("Failed to load {}", artifact_path.display()))?;

	println!("Compiled routes: {}\n", collection.len());

	for (i, route) in collection.iter().enumerate() {
		let methods: Vec<_> = route.methods().iter().map(Method::as_str).collect();

		println!("  Route {}:", i + 1);
		println!("    methods: {}", methods.join(", "));
		if let Some(handler) = route.handler().name() {
			println!("    handler: {handler}");
		}
		if let Some(callback) = route.is_active_callback().and_then(|c| c.name()) {
			println!("    is_active: {callback}");
		}
		for rule in route.rules() {
			println!("    pattern: {}", rule.pattern);
		}
		let query_variables = route.query_variables();
		if !query_variables.is_empty() {
			println!("    query_variables: {}", query_variables.join(", "));
		}
		println!();
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_match(artifact_path: &Path, request_path: &str, method: &str) -> Result<ExitCode> {
	let method =
		Method::parse(method).ok_or_else(|| anyhow::anyhow!("Invalid HTTP method: {method}"))?;

	let mut collection = RouteCollection::new();
	load_compiled_file(artifact_path, &mut collection)
		.with_context(|| format!("Failed to load {}", artifact_path.display()))?;

	let matched = match_collection(&collection, method, request_path)
		.context("Failed to match request path")?;

	match matched {
		Some(matched) => {
			if let Some(handler) = matched.route.handler().name() {
				println!("handler: {handler}");
			}
			for (name, value) in &matched.query_vars {
				println!("{name}={value}");
			}
			Ok(ExitCode::SUCCESS)
		}
		None => {
			eprintln!("No route matched {request_path}");
			Ok(ExitCode::FAILURE)
		}
	}
}
