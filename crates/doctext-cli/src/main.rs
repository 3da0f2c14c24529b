use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use doctext_core::config_file;
use doctext_core::{DocumentRef, Extractor, PdftoppmRasterizer, TesseractOcr};
use doctext_pdf_mupdf::MupdfReader;

/// Extract plain text from a PDF or DOC/DOCX file.
///
/// Scanned PDFs (no text layer) are rasterized with pdftoppm and run
/// through tesseract automatically.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the PDF, DOC, or DOCX file
    file_path: PathBuf,

    /// Write extracted text to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Tesseract language code (e.g. "eng" or "deu+eng")
    #[arg(long)]
    lang: Option<String>,

    /// Rasterization resolution in DPI
    #[arg(long)]
    dpi: Option<u32>,

    /// Deadline in seconds for each external tool invocation
    #[arg(long)]
    timeout_secs: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Resolve configuration: CLI flags > env vars > config file > defaults
    let config = config_file::load_config();
    let raster_cfg = config.raster.unwrap_or_default();
    let ocr_cfg = config.ocr.unwrap_or_default();

    let lang = cli
        .lang
        .or_else(|| std::env::var("DOCTEXT_OCR_LANG").ok())
        .or(ocr_cfg.language)
        .unwrap_or_else(|| "eng".to_string());
    let dpi = cli
        .dpi
        .or_else(|| std::env::var("DOCTEXT_DPI").ok().and_then(|v| v.parse().ok()))
        .or(raster_cfg.dpi)
        .unwrap_or(300);
    let raster_timeout = cli
        .timeout_secs
        .or(raster_cfg.timeout_secs)
        .unwrap_or(120);
    let ocr_timeout = cli.timeout_secs.or(ocr_cfg.timeout_secs).unwrap_or(60);

    let mut rasterizer = PdftoppmRasterizer::new()
        .with_dpi(dpi)
        .with_timeout(Duration::from_secs(raster_timeout));
    if let Some(binary) = raster_cfg.binary {
        rasterizer = rasterizer.with_binary(binary);
    }

    let mut ocr = TesseractOcr::new()
        .with_language(lang)
        .with_timeout(Duration::from_secs(ocr_timeout));
    if let Some(binary) = ocr_cfg.binary {
        ocr = ocr.with_binary(binary);
    }

    let extractor = Extractor::new(
        Arc::new(MupdfReader::new()),
        Arc::new(rasterizer),
        Arc::new(ocr),
    );

    // The input is the user's file, not ours to delete: borrowed ref.
    let doc = DocumentRef::new(&cli.file_path);
    let text = extractor.extract(&doc)?;

    match cli.output {
        Some(path) => std::fs::write(&path, &text)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
        }
    }

    Ok(())
}
