//! PDF export of the persons list.
//!
//! The document is assembled as HTML and handed to a [`PdfRenderer`]. The
//! production renderer pipes it through `wkhtmltopdf`; tests substitute a
//! stub.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use super::error::{ServiceError, ServiceResult};
use crate::api::{PersonField, PersonResponse};

/// Page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    fn as_arg(&self) -> &'static str {
        match self {
            Orientation::Portrait => "Portrait",
            Orientation::Landscape => "Landscape",
        }
    }
}

/// Page setup for a rendered document. Margins are in millimetres.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfOptions {
    pub orientation: Orientation,
    pub margin_top: u32,
    pub margin_right: u32,
    pub margin_bottom: u32,
    pub margin_left: u32,
}

impl PdfOptions {
    /// Landscape with 20 mm margins on every side.
    pub fn persons_list() -> Self {
        Self {
            orientation: Orientation::Landscape,
            margin_top: 20,
            margin_right: 20,
            margin_bottom: 20,
            margin_left: 20,
        }
    }
}

#[async_trait]
pub trait PdfRenderer: Send + Sync {
    async fn render(&self, html: &str, options: &PdfOptions) -> ServiceResult<Vec<u8>>;
}

/// Renders through an external `wkhtmltopdf` executable.
#[derive(Debug, Clone)]
pub struct WkHtmlToPdfRenderer {
    executable: PathBuf,
}

impl WkHtmlToPdfRenderer {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    fn args(options: &PdfOptions) -> Vec<String> {
        vec![
            "--quiet".to_string(),
            "--orientation".to_string(),
            options.orientation.as_arg().to_string(),
            "--margin-top".to_string(),
            format!("{}mm", options.margin_top),
            "--margin-right".to_string(),
            format!("{}mm", options.margin_right),
            "--margin-bottom".to_string(),
            format!("{}mm", options.margin_bottom),
            "--margin-left".to_string(),
            format!("{}mm", options.margin_left),
            "-".to_string(),
            "-".to_string(),
        ]
    }
}

impl Default for WkHtmlToPdfRenderer {
    fn default() -> Self {
        Self::new("wkhtmltopdf")
    }
}

#[async_trait]
impl PdfRenderer for WkHtmlToPdfRenderer {
    async fn render(&self, html: &str, options: &PdfOptions) -> ServiceResult<Vec<u8>> {
        debug!(executable = %self.executable.display(), "Rendering PDF");
        let mut child = Command::new(&self.executable)
            .args(Self::args(options))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                ServiceError::Export(format!(
                    "Failed to start {}: {}",
                    self.executable.display(),
                    e
                ))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(html.as_bytes())
                .await
                .map_err(|e| ServiceError::Export(format!("Failed to write HTML: {}", e)))?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| ServiceError::Export(format!("PDF renderer failed: {}", e)))?;

        if !output.status.success() {
            return Err(ServiceError::Export(format!(
                "PDF renderer exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(output.stdout)
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Build the HTML document for the persons list.
pub fn persons_pdf_html(persons: &[PersonResponse]) -> String {
    let mut html = String::from(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>Persons</title>\
         <style>table{border-collapse:collapse;width:100%}\
         th,td{border:1px solid #999;padding:4px;text-align:left}\
         th{background:#d3d3d3}</style></head><body><h1>Persons</h1><table><thead><tr>",
    );
    for field in PersonField::ALL {
        html.push_str("<th>");
        html.push_str(field.title());
        html.push_str("</th>");
    }
    html.push_str("</tr></thead><tbody>");

    for person in persons {
        let cells = [
            person.person_name.clone().unwrap_or_default(),
            person.email.clone().unwrap_or_default(),
            person
                .date_of_birth
                .map(|d| d.format("%d %b %Y").to_string())
                .unwrap_or_default(),
            person.age.map(|a| a.to_string()).unwrap_or_default(),
            person.gender.clone().unwrap_or_default(),
            person.country.clone().unwrap_or_default(),
            person.address.clone().unwrap_or_default(),
            person.receive_news_letters.to_string(),
        ];
        html.push_str("<tr>");
        for cell in cells {
            html.push_str("<td>");
            html.push_str(&escape_html(&cell));
            html.push_str("</td>");
        }
        html.push_str("</tr>");
    }

    html.push_str("</tbody></table></body></html>");
    html
}
