//! Command-line client for a running summarizer server.
//!
//! Uploads one file to `/v1/summarize` or `/v2/summarize` and prints the summary, or the
//! server's `detail` message with a non-zero exit status.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, ValueEnum};
use gemini_summarizer::{
    api::FILE_FIELD,
    summarize::{SummaryResult, TextSummary},
};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

#[derive(Parser)]
#[command(
    name = "summarize-file",
    about = "Upload a file to the summarizer server and print its summary"
)]
struct Cli {
    /// File to summarize.
    path: PathBuf,
    /// Base URL of the summarizer server.
    #[arg(long, default_value = "http://127.0.0.1:8000")]
    server: String,
    /// Endpoint version to call.
    #[arg(long, value_enum, default_value_t = Endpoint::V2)]
    endpoint: Endpoint,
    /// Override the MIME type guessed from the file extension.
    #[arg(long)]
    mime: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Endpoint {
    /// `.txt` only, free-text summary.
    V1,
    /// Text, PDF, or image; structured summary.
    V2,
}

impl Endpoint {
    fn path(self) -> &'static str {
        match self {
            Self::V1 => "/v1/summarize",
            Self::V2 => "/v2/summarize",
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let data = tokio::fs::read(&cli.path)
        .await
        .with_context(|| format!("failed to read {}", cli.path.display()))?;
    let filename = cli
        .path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("path {} has no usable file name", cli.path.display()))?
        .to_string();
    let mime = cli.mime.clone().unwrap_or_else(|| guess_mime(&cli.path));

    let part = Part::bytes(data)
        .file_name(filename)
        .mime_str(&mime)
        .with_context(|| format!("invalid MIME type '{mime}'"))?;
    let form = Form::new().part(FILE_FIELD, part);
    let url = format!("{}{}", cli.server.trim_end_matches('/'), cli.endpoint.path());

    let response = reqwest::Client::new()
        .post(&url)
        .multipart(form)
        .send()
        .await
        .with_context(|| format!("failed to reach {url}"))?;

    let status = response.status();
    let body = response
        .bytes()
        .await
        .context("failed to read server response")?;
    if !status.is_success() {
        let detail = serde_json::from_slice::<ErrorBody>(&body)
            .map(|error| error.detail)
            .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
        bail!("server returned {status}: {detail}");
    }

    match cli.endpoint {
        Endpoint::V1 => {
            let summary: TextSummary =
                serde_json::from_slice(&body).context("failed to parse summary response")?;
            println!("{}", summary.summary);
        }
        Endpoint::V2 => {
            let result: SummaryResult =
                serde_json::from_slice(&body).context("failed to parse summary response")?;
            print!("{}", render_structured(&result));
        }
    }
    Ok(())
}

fn guess_mime(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

fn render_structured(result: &SummaryResult) -> String {
    let mut out = format!("{} ({})\n\n{}\n", result.filename, result.file_type, result.summary);
    if !result.key_points.is_empty() {
        out.push_str("\nKey points:\n");
        for point in &result.key_points {
            out.push_str(&format!("- {point}\n"));
        }
    }
    out.push_str(&format!("\nWord count: {}\n", result.word_count));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_mime_from_extension() {
        assert_eq!(guess_mime(Path::new("notes.TXT")), "text/plain");
        assert_eq!(guess_mime(Path::new("/tmp/scan.jpeg")), "image/jpeg");
        assert_eq!(guess_mime(Path::new("scan.jpe")), "image/jpeg");
        assert_eq!(guess_mime(Path::new("page.htm")), "text/html");
        assert_eq!(guess_mime(Path::new("sticker.webp")), "image/webp");
        assert_eq!(guess_mime(Path::new("paper.pdf")), "application/pdf");
        assert_eq!(guess_mime(Path::new("blob.unknownext")), "application/octet-stream");
    }

    #[test]
    fn renders_key_points_as_bullets() {
        let rendered = render_structured(&SummaryResult {
            filename: "q3.txt".into(),
            file_type: "text/plain".into(),
            summary: "Revenue grew.".into(),
            key_points: vec!["Up 4%".into(), "Costs flat".into()],
            word_count: 120,
        });
        assert!(rendered.starts_with("q3.txt (text/plain)\n\nRevenue grew.\n"));
        assert!(rendered.contains("- Up 4%\n- Costs flat\n"));
        assert!(rendered.ends_with("Word count: 120\n"));
    }
}
