mod cli;
mod collect;
mod config;
mod logging;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use ingest_engine::{
    content_preview, ensure_output_dir, EngineCapability, FolderIngestor, FsPageStore,
    HtmlEngine, IngestObserver, IngestSettings, LogObserver, UploadRequest, UploadResponse,
    UploadService,
};
use ingest_logging::{ingest_error, ingest_info};
use log::LevelFilter;

use crate::cli::{Cli, Command, LogTarget};
use crate::config::{AppConfig, LogDestination};

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(response) => {
            print_response(&response);
            if response.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(err) => {
            ingest_error!("{:#}", err);
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<UploadResponse> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(target) = cli.log {
        config.log_destination = match target {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File,
            LogTarget::Both => LogDestination::Both,
        };
    }
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        logging::level_filter(config.log_level)
    };
    logging::initialize(config.log_destination, level);

    match cli.command {
        Command::File {
            path,
            target,
            page_name,
            author,
        } => {
            let file = collect::collect_file(&path)?;
            let service = build_service(&config, &target, author, config.include_source_files)?;
            ingest_info!("Uploading {} into {:?}", file.relative_path, target);
            Ok(service.handle(UploadRequest::File { file, page_name }))
        }
        Command::Folder {
            dir,
            target,
            label,
            author,
            include_source,
        } => {
            let files = collect::collect_folder(&dir)?;
            let label = label.unwrap_or_else(|| collect::folder_name(&dir));
            let include_source = include_source || config.include_source_files;
            let service = build_service(&config, &target, author, include_source)?;
            ingest_info!("Uploading {} files from {:?} into {:?}", files.len(), dir, target);
            Ok(service.handle(UploadRequest::Folder { files, label }))
        }
    }
}

fn build_service(
    config: &AppConfig,
    target: &Path,
    author: Option<String>,
    include_source_files: bool,
) -> Result<UploadService> {
    ensure_output_dir(target)
        .with_context(|| format!("target directory {} is not usable", target.display()))?;

    let observer: Arc<dyn IngestObserver> = Arc::new(LogObserver);
    let settings = IngestSettings {
        include_source_files,
        scratch_parent: config.scratch_dir.clone(),
        ..IngestSettings::default()
    };
    let ingestor = FolderIngestor::new(
        Arc::new(FsPageStore::new(target.to_path_buf())),
        EngineCapability::available(HtmlEngine::new()),
        settings,
        observer.clone(),
    );
    let author = author.unwrap_or_else(|| config.author.clone());
    Ok(UploadService::new(ingestor, target.to_path_buf(), author, observer))
}

fn print_response(response: &UploadResponse) {
    println!("{}", response.message);
    for page in &response.created_pages {
        println!(
            "  {} <- {}: {}",
            page.full_page_name,
            page.relative_path,
            content_preview(&page.content)
        );
    }
}
