//! docmail - newsletter export to email HTML

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docmail::archive::{extract_archive, latest_file};
use docmail::{Config, DirectoryAssetHost, Result, RunDate};

#[derive(Parser)]
#[command(name = "docmail")]
#[command(version, about = "Convert exported newsletter documents into email HTML", long_about = None)]
#[command(after_help = "EXAMPLES:
    docmail unpack ~/Downloads work/      Unpack the newest export zip
    docmail render work/ -o out.html      Render the newest HTML in work/
    docmail plan work/Newsletter.html     Show planned section images")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render an exported document to newsletter HTML
    Render {
        #[command(flatten)]
        run: RunArgs,

        /// Write the newsletter to FILE instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Directory extracted images are written to
        #[arg(long, env = "DOCMAIL_IMAGES_DIR", default_value = docmail::config::DEFAULT_IMAGES_DIR)]
        images_dir: PathBuf,

        /// Publish images by copying them into DIR
        #[arg(long, value_name = "DIR", requires = "asset_base_url")]
        publish_dir: Option<PathBuf>,

        /// Public URL that serves the publish directory
        #[arg(long, env = "DOCMAIL_ASSET_BASE_URL", value_name = "URL")]
        asset_base_url: Option<String>,

        /// Write the image manifest as JSON to FILE
        #[arg(long, value_name = "FILE")]
        manifest: Option<PathBuf>,
    },

    /// Print the planned main and extra images as JSON
    Plan {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Unpack an exported document archive
    Unpack {
        /// Archive, or a directory whose newest zip is used
        #[arg(env = "IMAGE_ARCHIVE", value_name = "ZIP|DIR")]
        source: PathBuf,

        /// Destination directory
        #[arg(value_name = "DEST")]
        dest: PathBuf,
    },

    /// Print the next delivery date
    Date {
        /// Compute from this date instead of today (YYYY-MM-DD)
        #[arg(long)]
        today: Option<String>,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Exported HTML file, or a directory whose newest HTML file is used
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Delivery date (YYYY-MM-DD); defaults to the next Sunday
    #[arg(long, env = "DOCMAIL_DATE")]
    date: Option<String>,

    /// `src` prefix of images shipped with the export
    #[arg(long, default_value = docmail::config::DEFAULT_LOCAL_PREFIX)]
    local_prefix: String,
}

impl RunArgs {
    fn config(&self) -> Result<Config> {
        let run_date = match &self.date {
            Some(date) => RunDate::parse(date)?,
            None => RunDate::upcoming(),
        };
        Ok(Config::new(run_date).with_local_prefix(self.local_prefix.as_str()))
    }

    fn input_file(&self) -> Result<PathBuf> {
        resolve(&self.input, "html")
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docmail=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render {
            run,
            output,
            images_dir,
            publish_dir,
            asset_base_url,
            manifest,
        } => render(
            &run,
            output.as_deref(),
            images_dir,
            publish_dir.zip(asset_base_url),
            manifest.as_deref(),
        ),
        Commands::Plan { run } => plan(&run),
        Commands::Unpack { source, dest } => unpack(&source, &dest),
        Commands::Date { today } => date(today.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// A file as given, or the newest file with `extension` in a directory.
fn resolve(path: &Path, extension: &str) -> Result<PathBuf> {
    if path.is_dir() {
        latest_file(path, extension)
    } else {
        Ok(path.to_path_buf())
    }
}

fn render(
    run: &RunArgs,
    output: Option<&Path>,
    images_dir: PathBuf,
    publish: Option<(PathBuf, String)>,
    manifest: Option<&Path>,
) -> Result<()> {
    let input = run.input_file()?;
    let config = run.config()?.with_images_dir(images_dir);

    let mut host = publish.map(|(dir, base_url)| DirectoryAssetHost::new(dir, base_url));
    let host = host.as_mut().map(|h| h as &mut dyn docmail::AssetHost);
    let newsletter = docmail::convert_file(&input, &config, host)?;

    if let Some(path) = manifest {
        fs::write(path, newsletter.images.to_json()?)?;
    }

    match output {
        Some(path) => {
            fs::write(path, &newsletter.html)?;
            info!(output = %path.display(), "wrote newsletter");
        }
        None => println!("{}", newsletter.html),
    }
    Ok(())
}

fn plan(run: &RunArgs) -> Result<()> {
    let input = run.input_file()?;
    let plan = docmail::plan_file(&input, &run.config()?)?;
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}

fn unpack(source: &Path, dest: &Path) -> Result<()> {
    let archive = resolve(source, "zip")?;
    let files = extract_archive(&archive, dest)?;
    println!("{}", latest_file(dest, "html").unwrap_or_else(|_| dest.to_path_buf()).display());
    info!(files = files.len(), "unpacked");
    Ok(())
}

fn date(today: Option<&str>) -> Result<()> {
    let run_date = match today {
        Some(today) => RunDate::next_after(RunDate::parse(today)?.date()),
        None => RunDate::upcoming(),
    };
    println!("{run_date}");
    Ok(())
}
