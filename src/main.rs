use anyhow::Context;
use clap::{Parser, Subcommand};
use repo_updater::{
	bitbucket_server::BitbucketServerClient,
	cache::{Cache, FileCache, MemoryCache},
	config::Config,
	descriptor::{RepoKind, RepositoryDescriptor},
	fetcher::{RemoteResourceFetcher, CHANGELOG_FILE},
	host::{LocalInstall, RequestContext},
	logging,
	payload::{FetchResult, ResourceKind},
};
use std::{path::PathBuf, rc::Rc};

static USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Parser)]
#[command(version, about)]
struct Cli {
	/// Json file with credentials, cache duration and private repositories.
	#[arg(long, global = true)]
	config: Option<PathBuf>,
	#[arg(long, global = true, env = "BITBUCKET_USERNAME")]
	username: Option<String>,
	#[arg(long, global = true, env = "BITBUCKET_PASSWORD", hide_env_values = true)]
	password: Option<String>,
	/// Also write the log to this file.
	#[arg(long, global = true)]
	log_file: Option<PathBuf>,
	/// Repeat for more detail.
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	verbose: u8,
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Fetches everything known about a repository and prints it as json.
	Check(CheckArgs),
}

#[derive(clap::Args)]
struct CheckArgs {
	/// Root url of the Bitbucket Server, such as `https://git.example.com`.
	#[arg(long, env = "BITBUCKET_ENTERPRISE")]
	enterprise: String,
	/// Project key which owns the repository.
	owner: String,
	repo: String,
	#[arg(long, default_value = "plugin")]
	kind: RepoKind,
	#[arg(long)]
	branch: Option<String>,
	/// The file carrying the version header. Defaults to `{repo}.php` for plugins and `style.css` for themes.
	#[arg(long)]
	file: Option<String>,
	/// Directory of the installed copy.
	#[arg(long)]
	local_path: Option<PathBuf>,
	#[arg(long, default_value = "0.0.0")]
	local_version: String,
	#[arg(long)]
	private: bool,
	/// Keep fetched resources here between runs instead of in memory.
	#[arg(long)]
	cache_dir: Option<PathBuf>,
	/// Ignore cached resources.
	#[arg(long)]
	refresh: bool,
	/// Download a specific tag instead of the newest one.
	#[arg(long)]
	rollback: Option<String>,
	/// Download the head of this branch.
	#[arg(long)]
	switch_branch: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	let level = match cli.verbose {
		0 => logging::console::LevelFilter::Warn,
		1 => logging::console::LevelFilter::Info,
		2 => logging::console::LevelFilter::Debug,
		_ => logging::console::LevelFilter::Trace,
	};
	logging::console::init(level, cli.log_file.as_deref(), &[])?;

	let mut config = match &cli.config {
		Some(path) => Config::load(path).with_context(|| format!("Failed to load config {}", path.display()))?,
		None => Config::default(),
	};
	if cli.username.is_some() {
		config.credentials.username = cli.username;
	}
	if cli.password.is_some() {
		config.credentials.password = cli.password;
	}

	match cli.command {
		Command::Check(args) => check(config, args).await,
	}
}

async fn check(config: Config, args: CheckArgs) -> anyhow::Result<()> {
	let client = BitbucketServerClient::new(&args.enterprise, USER_AGENT)
		.with_context(|| format!("Invalid enterprise url {:?}", args.enterprise))?;
	let cache: Rc<dyn Cache> = match &args.cache_dir {
		Some(root) => Rc::new(FileCache::new(root)),
		None => Rc::new(MemoryCache::default()),
	};
	let context = RequestContext {
		refresh_cache: args.refresh,
		..Default::default()
	};
	let fetcher = RemoteResourceFetcher::new(client, cache, Rc::new(LocalInstall), Rc::new(config), context);

	let mut repository = RepositoryDescriptor::new(args.kind, &args.owner, &args.repo, &args.enterprise);
	repository.branch = args.branch;
	repository.private = args.private;
	repository.local_version = args.local_version;
	if let Some(local_path) = args.local_path {
		repository.local_path = local_path;
	}
	let file = args.file.unwrap_or_else(|| match args.kind {
		RepoKind::Plugin => format!("{}.php", args.repo),
		RepoKind::Theme => "style.css".to_owned(),
	});

	// The header decides everything else, so a repository without one is not checked further.
	match fetcher.fetch(&ResourceKind::File(file.clone()), &mut repository).await {
		FetchResult::Success(_) => {}
		FetchResult::TransportError(error) => {
			return Err(error).with_context(|| format!("Failed to fetch {file} of {}", repository.repo_ref()));
		}
		other => anyhow::bail!("{} has no usable {file}: {other}", repository.repo_ref()),
	}

	let kinds = [
		ResourceKind::Meta,
		ResourceKind::Tags,
		ResourceKind::Changelog(CHANGELOG_FILE.to_owned()),
		ResourceKind::Readme,
		ResourceKind::Branches,
		ResourceKind::LanguagePacks,
	];
	for kind in &kinds {
		match fetcher.fetch(kind, &mut repository).await {
			FetchResult::Success(_) | FetchResult::Skipped => {}
			result => log::warn!(target: "updater", "{kind}: {result}"),
		}
	}

	let link = fetcher.construct_download_link(&repository, args.rollback.as_deref(), args.switch_branch.as_deref());
	repository.download_link = Some(link);

	println!("{}", serde_json::to_string_pretty(&repository)?);
	Ok(())
}
