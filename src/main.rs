use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use wagner::cli::{run_release, ReleaseArgs, ReleaseContext, ReleaseOutcome};
use wagner::config;
use wagner::dist::create_buildout_dist;
use wagner::eggs::prepare_eggs;
use wagner::git::Git2Repository;
use wagner::remote::{SshRemote, SystemRunner};
use wagner::system::{self, ServiceAction, ServiceSystem};
use wagner::ui::{ConsoleReporter, Reporter};
use wagner::{check_sanity, resolve_version, ReleaseTarget};

#[derive(Parser)]
#[command(
    name = "wagner",
    version,
    about = "Release buildouts and their eggs to remote hosts"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, global = true, help = "Log every command that is run")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check whether the working copy may be released
    Check {
        /// Target environment: prd, acc or any other name
        target: String,

        #[arg(short, long, help = "Tag to release")]
        tag: Option<String>,
    },

    /// Print the version label a release would get
    Version {
        #[arg(short, long, help = "Tag to release")]
        tag: Option<String>,
    },

    /// Pack the buildout into a tar archive
    Dist {
        #[arg(short, long, help = "Tag to pack instead of HEAD")]
        tag: Option<String>,

        #[arg(long, default_value = ".", help = "Buildout repository")]
        path: PathBuf,
    },

    /// Install the configured system packages on the remote host
    Install,

    /// Start, stop or restart the configured services
    Services {
        #[arg(value_enum)]
        action: ActionArg,
    },

    /// Check out the configured eggs for an environment
    PrepareEggs { env: String },

    /// Run the complete release
    Release {
        /// Target environment: prd, acc or any other name
        target: String,

        #[arg(short, long, help = "Tag to release")]
        tag: Option<String>,

        #[arg(long, help = "Only run the checks")]
        dry_run: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ActionArg {
    Start,
    Stop,
    Restart,
}

impl From<ActionArg> for ServiceAction {
    fn from(action: ActionArg) -> Self {
        match action {
            ActionArg::Start => ServiceAction::Start,
            ActionArg::Stop => ServiceAction::Stop,
            ActionArg::Restart => ServiceAction::Restart,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let reporter = ConsoleReporter::default();

    match args.command {
        Command::Check { target, tag } => {
            let target: ReleaseTarget = target.parse()?;
            let repo = Git2Repository::open(".")?;

            if !check_sanity(&repo, &target, tag.as_deref(), &reporter)? {
                std::process::exit(1);
            }
        }
        Command::Version { tag } => {
            let repo = Git2Repository::open(".")?;
            let version = resolve_version(&repo, tag.as_deref(), &reporter)?;
            println!("{}", version);
        }
        Command::Dist { tag, path } => {
            let repo = Git2Repository::open(&path)?;
            let dist = create_buildout_dist(&repo, tag.as_deref(), &reporter)?;
            reporter.success(&format!("Created {}", dist.path.display()));
        }
        Command::Install => {
            let config = config::load_config(args.config.as_deref())?;
            let remote = SshRemote::from_config(&config.remote)?;

            if !system::install_system_requirements(
                &remote,
                &reporter,
                &config.system.requirements,
                &config.system.services,
                &config.system.os,
            )? {
                std::process::exit(1);
            }
        }
        Command::Services { action } => {
            let config = config::load_config(args.config.as_deref())?;
            let remote = SshRemote::from_config(&config.remote)?;

            system::system_services_action(
                &remote,
                &reporter,
                &config.system.services,
                action.into(),
                ServiceSystem::from_name(&config.system.init),
            )?;
        }
        Command::PrepareEggs { env } => {
            let config = config::load_config(args.config.as_deref())?;

            prepare_eggs(
                &reporter,
                &config.deploy.eggs,
                &env,
                &config.deploy.autocheckout_dir,
                &config.deploy.workdir,
            )?;
        }
        Command::Release {
            target,
            tag,
            dry_run,
        } => {
            let config = config::load_config(args.config.as_deref())?;
            let repo = Git2Repository::open(".")?;
            let remote = SshRemote::from_config(&config.remote)?;

            let release_args = ReleaseArgs {
                target: target.parse()?,
                tag,
                dry_run,
            };
            let ctx = ReleaseContext {
                repo: &repo,
                remote: &remote,
                runner: &SystemRunner,
                reporter: &reporter,
            };

            match run_release(&release_args, &config, &ctx)? {
                ReleaseOutcome::Refused => std::process::exit(1),
                ReleaseOutcome::DryRun { version } => {
                    reporter.info(&format!("Dry run: would release {}", version));
                }
                ReleaseOutcome::Released { version } => {
                    reporter.success(&format!("Released {}", version));
                }
            }
        }
    }

    Ok(())
}
