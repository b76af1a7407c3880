//! Command-line surface: analyze one screenshot and write `<stem>.md` beside it.

use std::path::{Path, PathBuf};

use clap::Parser;
use image::ImageReader;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::backend::ImageAnalyzer;
use crate::error::AnalyzerError;

pub const WORKING_MESSAGE: &str = "正在分析图片，请稍候...";

#[derive(Debug, Parser)]
#[command(name = "design-lens", version, about = "网页设计图分析工具")]
pub struct Cli {
    /// 要分析的图片路径
    pub image_path: PathBuf,
}

/// Why an input file was rejected before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("文件不存在: {}", .0.display())]
    Missing(PathBuf),
    #[error("无效的图片文件: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

/// Everything that can stop the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Analysis(#[from] AnalyzerError),
}

/// Check that `path` exists and fully decodes as an image.
#[instrument(skip(path), fields(path = %path.display()))]
pub fn validate_image_file(path: &Path) -> Result<(), ValidationError> {
    if !path.exists() {
        return Err(ValidationError::Missing(path.to_path_buf()));
    }

    let invalid = |reason: String| ValidationError::Invalid {
        path: path.to_path_buf(),
        reason,
    };

    let reader = ImageReader::open(path)
        .map_err(|e| invalid(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| invalid(e.to_string()))?;
    let format = reader.format();
    let image = reader.decode().map_err(|e| invalid(e.to_string()))?;

    debug!(?format, width = image.width(), height = image.height(), "Image validated");
    Ok(())
}

/// The input path with its extension replaced by `.md`.
pub fn output_path(image_path: &Path) -> PathBuf {
    image_path.with_extension("md")
}

pub fn completion_message(output: &Path) -> String {
    format!("分析完成，输出到{}", output.display())
}

/// Validate, analyze, and write the report. Returns the report path.
///
/// `progress` receives the user-facing status lines.
pub async fn run<A, F>(
    analyzer: &A,
    image_path: &Path,
    mut progress: F,
) -> Result<PathBuf, CliError>
where
    A: ImageAnalyzer + ?Sized,
    F: FnMut(&str),
{
    let owned = image_path.to_path_buf();
    tokio::task::spawn_blocking(move || validate_image_file(&owned))
        .await
        .map_err(|e| ValidationError::Invalid {
            path: image_path.to_path_buf(),
            reason: e.to_string(),
        })??;
    progress(WORKING_MESSAGE);

    let analysis = analyzer.analyze(image_path).await?;

    let output = output_path(image_path);
    tokio::fs::write(&output, analysis.as_bytes())
        .await
        .map_err(AnalyzerError::from)?;
    info!(output = %output.display(), bytes = analysis.len(), "Report written");

    progress(&completion_message(&output));
    Ok(output)
}
