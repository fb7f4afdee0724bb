use anyhow::Result;
use autosleep_etl::config;
use autosleep_etl::core::Transform;
use autosleep_etl::pipeline::Pipeline;
use autosleep_etl::sink::{PrintSink, S3Uploader, SqliteSink};
use autosleep_etl::source::CsvSource;
use autosleep_etl::transform::{DateTimeNormalizer, SchemaMapper, Spo2Filter};
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "autosleep-etl")]
#[command(about = "Clean AutoSleep CSV exports and load them into SQLite or S3")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the cleaned export as a table
    Print {
        /// Export file; prompted for when omitted
        file: Option<PathBuf>,
    },
    /// Append the cleaned export to the yearly SQLite table
    Load {
        /// Export file; prompted for when omitted
        file: Option<PathBuf>,
        /// SQLite database file
        #[arg(long, default_value = config::DEFAULT_DB_PATH)]
        db: PathBuf,
    },
    /// Upload the raw export file to the S3 drop bucket
    Upload {
        #[arg(long, default_value = config::UPLOAD_FILE)]
        file: PathBuf,
    },
}

/// The standalone run takes the file name interactively when it is not
/// given on the command line.
fn resolve_file(file: Option<PathBuf>) -> Result<PathBuf> {
    match file {
        Some(file) => Ok(file),
        None => {
            print!("AutoSleep export file: ");
            std::io::stdout().flush()?;
            let mut line = String::new();
            std::io::stdin().lock().read_line(&mut line)?;
            Ok(PathBuf::from(line.trim()))
        }
    }
}

fn transforms() -> Vec<Box<dyn Transform>> {
    vec![
        Box::new(SchemaMapper::autosleep()),
        Box::new(DateTimeNormalizer),
        Box::new(Spo2Filter),
    ]
}

/// Runs the `load` command and returns its user-facing message. A missing
/// input file short-circuits before any store is opened or created.
async fn run_load(file: &Path, db: &Path, year: i32) -> Result<String> {
    if !file.exists() {
        return Ok("File does not exist!".to_string());
    }
    let pipeline = Pipeline::new(
        Box::new(CsvSource::new(file)),
        transforms(),
        Box::new(SqliteSink::new(db, year)),
    );
    pipeline.run().await?;
    Ok(format!(
        "Database successfully updated with AutoSleep data from {year}!"
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Print { file } => {
            let file = resolve_file(file)?;
            if !file.exists() {
                println!("File does not exist!");
                return Ok(());
            }
            let pipeline = Pipeline::new(
                Box::new(CsvSource::new(&file)),
                transforms(),
                Box::new(PrintSink::new()),
            );
            pipeline.run().await?;
        }
        Command::Load { file, db } => {
            let file = resolve_file(file)?;
            let message = run_load(&file, &db, config::target_year()).await?;
            println!("{message}");
        }
        Command::Upload { file } => {
            let uploader = S3Uploader::from_env().await;
            uploader
                .upload_file(&file, config::S3_KEY, config::S3_BUCKET)
                .await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = "\
toDate,waketime,asleep,efficiency,quality,deep,SpO2Avg
\"31st Jan 2023, 07:15:00\",2023-01-31T07:15:00,7:30,91%,5:45,1:20,96
";

    #[tokio::test]
    async fn missing_input_file_reports_and_touches_no_store() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("sleep.db");

        let message = run_load(&dir.path().join("no-such-export.csv"), &db, 2023)
            .await
            .unwrap();
        assert_eq!(message, "File does not exist!");
        assert!(!db.exists());
    }

    #[tokio::test]
    async fn successful_load_reports_the_target_year() {
        let dir = tempfile::tempdir().unwrap();
        let export = dir.path().join("export.csv");
        std::fs::File::create(&export)
            .unwrap()
            .write_all(EXPORT.as_bytes())
            .unwrap();
        let db = dir.path().join("sleep.db");

        let message = run_load(&export, &db, 2023).await.unwrap();
        assert_eq!(
            message,
            "Database successfully updated with AutoSleep data from 2023!"
        );
        assert!(db.exists());
    }
}
