use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use crate::backend::{RasterError, Rasterizer};
use crate::process::{run_with_deadline, CommandError};

/// File-name stem for rasterized page images (`page-1.png`, …).
const PAGE_PREFIX: &str = "page";

/// Rasterizer backed by poppler's `pdftoppm`.
///
/// Invokes `pdftoppm -png -r <dpi> <pdf> <dir>/page`, which writes one
/// `page-N.png` per page into the caller's scratch directory. pdftoppm
/// zero-pads N to the width of the page count, so discovery parses the
/// numeric suffix instead of sorting names lexically.
pub struct PdftoppmRasterizer {
    binary: String,
    dpi: u32,
    timeout: Duration,
}

impl Default for PdftoppmRasterizer {
    fn default() -> Self {
        Self {
            binary: "pdftoppm".to_string(),
            dpi: 300,
            timeout: Duration::from_secs(120),
        }
    }
}

impl PdftoppmRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different binary name or path (e.g. from config).
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Deadline for the whole rasterization run.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Rasterizer for PdftoppmRasterizer {
    fn rasterize(&self, pdf: &Path, dir: &Path) -> Result<Vec<PathBuf>, RasterError> {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("-png")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg(pdf)
            .arg(dir.join(PAGE_PREFIX));

        tracing::debug!(pdf = %pdf.display(), dir = %dir.display(), dpi = self.dpi, "rasterizing");

        let output = run_with_deadline(cmd, self.timeout).map_err(|e| match e {
            CommandError::NotFound { program } => RasterError::ToolMissing { tool: program },
            CommandError::TimedOut { program, secs } => RasterError::TimedOut {
                tool: program,
                secs,
            },
            CommandError::Io { source, .. } => RasterError::Io(source),
        })?;

        if !output.status.success() {
            return Err(RasterError::ToolFailed {
                tool: self.binary.clone(),
                status: output.status.to_string(),
                stderr: output.stderr_line(),
            });
        }

        collect_page_images(dir)
    }
}

/// Discover `page-N.png` files in `dir` and return them ordered by page
/// number, verified dense starting at 1. Ordering comes from the numeric
/// suffix, never from directory enumeration order or modification time.
pub(crate) fn collect_page_images(dir: &Path) -> Result<Vec<PathBuf>, RasterError> {
    let mut numbered: Vec<(u32, PathBuf)> = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if let Some(page) = parse_page_number(name) {
            numbered.push((page, entry.path()));
        }
    }

    if numbered.is_empty() {
        return Err(RasterError::NoPages);
    }

    numbered.sort_by_key(|(page, _)| *page);

    // Hardened page discovery: iterate the exact closed range and treat
    // a missing expected image as an error, not a stopping condition.
    for (idx, (page, _)) in numbered.iter().enumerate() {
        let expected = idx as u32 + 1;
        if *page != expected {
            return Err(RasterError::MissingPage { page: expected });
        }
    }

    Ok(numbered.into_iter().map(|(_, path)| path).collect())
}

/// Parse the page number out of `page-N.png` (N possibly zero-padded).
fn parse_page_number(name: &str) -> Option<u32> {
    let rest = name.strip_prefix(PAGE_PREFIX)?.strip_prefix('-')?;
    let digits = rest.strip_suffix(".png")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"png").unwrap();
    }

    #[test]
    fn images_are_ordered_by_page_number_not_name() {
        let dir = tempfile::tempdir().unwrap();
        // Zero-padded names from a 12-page document, created out of order.
        for name in ["page-10.png", "page-02.png", "page-01.png", "page-12.png"] {
            touch(dir.path(), name);
        }
        for n in 3..=9 {
            touch(dir.path(), &format!("page-{n:02}.png"));
        }
        touch(dir.path(), "page-11.png");

        let images = collect_page_images(dir.path()).unwrap();
        assert_eq!(images.len(), 12);
        assert!(images[0].ends_with("page-01.png"));
        assert!(images[9].ends_with("page-10.png"));
        assert!(images[11].ends_with("page-12.png"));
    }

    #[test]
    fn gap_in_page_numbering_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "page-1.png");
        touch(dir.path(), "page-3.png");

        let err = collect_page_images(dir.path()).unwrap_err();
        assert!(matches!(err, RasterError::MissingPage { page: 2 }));
    }

    #[test]
    fn empty_directory_is_no_pages() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            collect_page_images(dir.path()),
            Err(RasterError::NoPages)
        ));
    }

    #[test]
    fn unrelated_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "page-1.png");
        touch(dir.path(), "page-2.png");
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "page-x.png");

        let images = collect_page_images(dir.path()).unwrap();
        assert_eq!(images.len(), 2);
    }

    #[test]
    fn page_number_parsing_handles_padding() {
        assert_eq!(parse_page_number("page-1.png"), Some(1));
        assert_eq!(parse_page_number("page-007.png"), Some(7));
        assert_eq!(parse_page_number("page-.png"), None);
        assert_eq!(parse_page_number("page-1.jpg"), None);
        assert_eq!(parse_page_number("cover-1.png"), None);
    }

    #[test]
    fn missing_binary_reports_tool_missing() {
        let dir = tempfile::tempdir().unwrap();
        let raster = PdftoppmRasterizer::new().with_binary("doctext-no-such-pdftoppm");
        let err = raster
            .rasterize(Path::new("/tmp/doc.pdf"), dir.path())
            .unwrap_err();
        assert!(matches!(err, RasterError::ToolMissing { .. }));
    }
}
