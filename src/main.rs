use std::path::PathBuf;
use std::sync::Arc;
use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{info, LevelFilter};
use serde::Serialize;
use tokio::runtime::Handle;
use parchment::adapter::{Adapters, NamedAdapter};
use parchment::coord::MavenCoord;
use parchment::pipeline::resolve;
use parchment::resolve::{DependencySpec, LocalMavenRepository};
use parchment::transformer::ParchmentTransformer;
use parchment::tree::MappingTable;
use parchment::writer::MappingSerializer;

mod jar;

#[derive(Debug, Parser)]
#[command(version, about = "Renames local variables of java classes with Parchment mappings")]
struct Cli {
	/// Be more verbose, can be given multiple times.
	#[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
	verbose: u8,

	#[command(subcommand)]
	command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
	/// Renames the local variables of all classes in a jar
	Apply {
		#[command(flatten)]
		mappings: MappingsArgs,
		/// The jar to read the classes from.
		input: PathBuf,
		/// Where to write the jar with renamed classes to.
		output: PathBuf,
	},
	/// Shows what the mappings contain
	Inspect {
		#[command(flatten)]
		mappings: MappingsArgs,
	},
	/// Writes the mappings to a new archive, in the normalized form
	Export {
		#[command(flatten)]
		mappings: MappingsArgs,
		/// Where to write the mapping archive to.
		output: PathBuf,
	},
	/// Prints the key the mappings of a coordinate are known under
	StateKey {
		coord: MavenCoord,
	},
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false, id = "source")]
struct MappingsSource {
	/// A mapping archive on disk.
	#[arg(long)]
	mappings: Option<PathBuf>,
	/// The Maven coordinate of a mapping archive, like `org.parchmentmc.data:parchment-1.20.1:2023.09.03@zip`.
	#[arg(long)]
	coord: Option<MavenCoord>,
}

#[derive(Debug, Args)]
struct MappingsArgs {
	#[command(flatten)]
	source: MappingsSource,
	/// The local Maven repository to look up coordinates in, `~/.m2/repository` by default.
	#[arg(long, requires = "coord")]
	repository: Option<PathBuf>,
	/// The namespace of the names to apply.
	#[arg(long, default_value = "mojmap")]
	namespace: String,
}

impl MappingsArgs {
	fn spec(&self) -> Result<DependencySpec> {
		match (&self.source.mappings, &self.source.coord) {
			(Some(path), None) => Ok(DependencySpec::Path(path.clone())),
			(None, Some(coord)) => Ok(DependencySpec::Maven(coord.clone())),
			_ => Err(anyhow!("exactly one of `--mappings` and `--coord` must be given")),
		}
	}

	fn repository(&self) -> Result<LocalMavenRepository> {
		let root = match &self.repository {
			Some(root) => root.clone(),
			// only coordinates are looked up in the repository
			None if self.source.coord.is_none() => PathBuf::new(),
			None => std::env::var_os("HOME")
				.map(|home| PathBuf::from(home).join(".m2").join("repository"))
				.context("no `--repository` given, and `HOME` isn't set")?,
		};
		Ok(LocalMavenRepository::new(root))
	}

	fn adapters(&self) -> Adapters {
		Adapters {
			named: Arc::new(NamedAdapter { mapped_namespace: self.namespace.clone() }),
			..Adapters::default()
		}
	}

	async fn load(&self) -> Result<ParchmentTransformer> {
		let spec = self.spec()?;
		let repository = self.repository()?;

		resolve(&spec, &repository, self.adapters(), &Handle::current()).await
			.with_context(|| anyhow!("failed to resolve mappings {spec}"))
	}
}

/// What `inspect` prints.
#[derive(Debug, Serialize)]
struct Report<'a> {
	version: String,
	timestamp: Option<&'a str>,
	packages: usize,
	classes: usize,
	fields: usize,
	methods: usize,
	parameters: usize,
}

impl<'a> Report<'a> {
	fn new(table: &'a MappingTable) -> Report<'a> {
		let methods = table.classes.values().flat_map(|class| class.methods.values());
		Report {
			version: table.version.to_string(),
			timestamp: table.timestamp.as_ref().map(|x| x.as_str()),
			packages: table.packages.len(),
			classes: table.classes.len(),
			fields: table.classes.values().map(|class| class.fields.len()).sum(),
			methods: methods.clone().count(),
			parameters: methods.map(|method| method.parameters.len()).sum(),
		}
	}
}

fn setup_logging(verbose: u8) -> Result<()> {
	let level = match verbose {
		0 => LevelFilter::Warn,
		1 => LevelFilter::Info,
		2 => LevelFilter::Debug,
		_ => LevelFilter::Trace,
	};

	fern::Dispatch::new()
		.format(|out, message, record| {
			out.finish(format_args!("[{} {}] {}", record.level(), record.target(), message))
		})
		.level(level)
		.chain(std::io::stderr())
		.apply()?;

	Ok(())
}

async fn run(command: Command) -> Result<()> {
	match command {
		Command::Apply { mappings, input, output } => {
			let transformer = mappings.load().await?;

			let jar = tokio::fs::read(&input).await
				.with_context(|| anyhow!("failed to read jar {input:?}"))?;
			let (jar, summary) = jar::rewrite(&transformer, jar).await
				.with_context(|| anyhow!("failed to rewrite jar {input:?}"))?;
			tokio::fs::write(&output, jar).await
				.with_context(|| anyhow!("failed to write jar {output:?}"))?;

			info!("wrote {output:?}, renamed local variables in {} classes", summary.rewritten);
		},
		Command::Inspect { mappings } => {
			let transformer = mappings.load().await?;

			let report = serde_json::to_string_pretty(&Report::new(transformer.table()))?;
			println!("{report}");
		},
		Command::Export { mappings, output } => {
			let serializer = MappingSerializer::new(mappings.adapters());
			let transformer = mappings.load().await?;

			let document = serializer.to_document(transformer.table())?;
			tokio::task::spawn_blocking(move || parchment::archive::write(output, &document)).await??;
		},
		Command::StateKey { coord } => {
			println!("{}", coord.state_key());
		},
	}
	Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	setup_logging(cli.verbose)?;

	run(cli.command).await
}
