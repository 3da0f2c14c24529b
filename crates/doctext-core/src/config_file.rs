use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub raster: Option<RasterConfig>,
    pub ocr: Option<OcrConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RasterConfig {
    /// Rasterization binary, default `pdftoppm`.
    pub binary: Option<String>,
    /// Render resolution in DPI, default 300.
    pub dpi: Option<u32>,
    /// Deadline for one rasterization run, default 120.
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrConfig {
    /// OCR binary, default `tesseract`.
    pub binary: Option<String>,
    /// Tesseract language code, default `eng`.
    pub language: Option<String>,
    /// Per-page recognition deadline, default 60.
    pub timeout_secs: Option<u64>,
}

/// Platform config directory path: `<config_dir>/doctext/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("doctext").join("config.toml"))
}

/// Load config by cascading CWD `.doctext.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(&PathBuf::from(".doctext.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &PathBuf) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        raster: Some(RasterConfig {
            binary: overlay
                .raster
                .as_ref()
                .and_then(|r| r.binary.clone())
                .or_else(|| base.raster.as_ref().and_then(|r| r.binary.clone())),
            dpi: overlay
                .raster
                .as_ref()
                .and_then(|r| r.dpi)
                .or_else(|| base.raster.as_ref().and_then(|r| r.dpi)),
            timeout_secs: overlay
                .raster
                .as_ref()
                .and_then(|r| r.timeout_secs)
                .or_else(|| base.raster.as_ref().and_then(|r| r.timeout_secs)),
        }),
        ocr: Some(OcrConfig {
            binary: overlay
                .ocr
                .as_ref()
                .and_then(|o| o.binary.clone())
                .or_else(|| base.ocr.as_ref().and_then(|o| o.binary.clone())),
            language: overlay
                .ocr
                .as_ref()
                .and_then(|o| o.language.clone())
                .or_else(|| base.ocr.as_ref().and_then(|o| o.language.clone())),
            timeout_secs: overlay
                .ocr
                .as_ref()
                .and_then(|o| o.timeout_secs)
                .or_else(|| base.ocr.as_ref().and_then(|o| o.timeout_secs)),
        }),
    }
}
