//! PDF export for rate-card quotes.
//!
//! Renders the rate-card HTML template and converts it with
//! `wkhtmltopdf` when available; otherwise the HTML itself is returned
//! for browser printing. Rates arrive pre-formatted; this module never
//! touches currency rules.

use axum::{
    body::Body,
    http::{header, StatusCode},
    response::Response,
};
use std::process::Stdio;
use tera::{Context, Tera};
use tokio::process::Command;
use tracing::{error, info, warn};

use ratecard_core::domain::quote::QuoteDelivery;

#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    #[error("template error: {0}")]
    Template(String),
    #[error("conversion error: {0}")]
    Conversion(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct PdfGenerator {
    tera: Tera,
    wkhtmltopdf_path: Option<String>,
}

impl PdfGenerator {
    /// Create a generator loading templates from the given directory.
    pub fn new(template_dir: &str) -> Result<Self, PdfError> {
        let tera = Tera::new(&format!("{}/**/*", template_dir))
            .map_err(|e| PdfError::Template(e.to_string()))?;

        Ok(Self { tera, wkhtmltopdf_path: find_wkhtmltopdf() })
    }

    /// Create a generator with the embedded rate-card template, used as
    /// the fallback when filesystem templates are missing and in tests.
    pub fn with_embedded_templates() -> Self {
        let mut tera = Tera::default();
        tera.add_raw_template(
            "rate_card/rate_card.html.tera",
            include_str!("../../../templates/rate_card/rate_card.html.tera"),
        )
        .expect("embedded rate card template must parse");

        Self { tera, wkhtmltopdf_path: find_wkhtmltopdf() }
    }

    #[cfg(test)]
    fn without_wkhtmltopdf(mut self) -> Self {
        self.wkhtmltopdf_path = None;
        self
    }

    pub fn render_html(&self, delivery: &QuoteDelivery) -> Result<String, PdfError> {
        let mut context = Context::new();
        context.insert("team_rate", &delivery.team_rate);
        context.insert("custom_rate", &delivery.custom_rate);
        context.insert("team", &delivery.team_parameters);
        context.insert("custom", &delivery.custom_parameters);
        context.insert(
            "generated_at",
            &chrono::Utc::now().format("%Y-%m-%d %H:%M UTC").to_string(),
        );

        self.tera
            .render("rate_card/rate_card.html.tera", &context)
            .map_err(|e| PdfError::Template(e.to_string()))
    }

    /// Render the rate card and convert to PDF where possible.
    pub async fn generate_rate_card(
        &self,
        delivery: &QuoteDelivery,
    ) -> Result<PdfResult, PdfError> {
        let html = self.render_html(delivery)?;

        if let Some(ref wkhtmltopdf) = self.wkhtmltopdf_path {
            match self.convert_html_to_pdf(&html, wkhtmltopdf).await {
                Ok(pdf_bytes) => Ok(PdfResult::Pdf(pdf_bytes)),
                Err(e) => {
                    warn!(error = %e, "PDF conversion failed, falling back to HTML");
                    Ok(PdfResult::Html(html))
                }
            }
        } else {
            Ok(PdfResult::Html(html))
        }
    }

    async fn convert_html_to_pdf(
        &self,
        html: &str,
        wkhtmltopdf_path: &str,
    ) -> Result<Vec<u8>, PdfError> {
        let temp_dir = std::env::temp_dir();
        let stem = uuid::Uuid::new_v4();
        let html_path = temp_dir.join(format!("rate_card_{stem}.html"));
        let pdf_path = temp_dir.join(format!("rate_card_{stem}.pdf"));

        tokio::fs::write(&html_path, html).await?;

        let output = Command::new(wkhtmltopdf_path)
            .arg("--page-size")
            .arg("A4")
            .arg("--margin-top")
            .arg("10mm")
            .arg("--margin-bottom")
            .arg("10mm")
            .arg("--margin-left")
            .arg("10mm")
            .arg("--margin-right")
            .arg("10mm")
            .arg("--encoding")
            .arg("utf-8")
            .arg(&html_path)
            .arg(&pdf_path)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!(stderr = %stderr, "wkhtmltopdf failed");
            let _ = tokio::fs::remove_file(&html_path).await;
            return Err(PdfError::Conversion(stderr.to_string()));
        }

        let pdf_bytes = tokio::fs::read(&pdf_path).await?;

        let _ = tokio::fs::remove_file(&html_path).await;
        let _ = tokio::fs::remove_file(&pdf_path).await;

        info!(size = pdf_bytes.len(), "rate card PDF generated");

        Ok(pdf_bytes)
    }
}

fn find_wkhtmltopdf() -> Option<String> {
    let path = which::which("wkhtmltopdf").ok().map(|p| p.to_string_lossy().to_string());
    match &path {
        Some(found) => info!(path = %found, "wkhtmltopdf found"),
        None => warn!("wkhtmltopdf not found in PATH - rate card export will return HTML"),
    }
    path
}

/// Result of a rate-card export.
pub enum PdfResult {
    Pdf(Vec<u8>),
    Html(String),
}

impl PdfResult {
    pub fn into_response(self, filename: &str) -> Response {
        match self {
            PdfResult::Pdf(bytes) => Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, "application/pdf")
                .header(
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", filename),
                )
                .body(Body::from(bytes))
                .unwrap(),
            PdfResult::Html(html) => Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
                .body(Body::from(html))
                .unwrap(),
        }
    }
}

#[cfg(test)]
mod tests {
    use ratecard_core::domain::quote::{QuoteDelivery, RateParameters};

    use super::{PdfGenerator, PdfResult};

    fn delivery() -> QuoteDelivery {
        QuoteDelivery {
            team_rate: "$2,312.50".to_string(),
            custom_rate: "$2,502.40".to_string(),
            team_parameters: RateParameters {
                role: "Backend Developer".to_string(),
                region: "Middle East".to_string(),
                seniority: "advanced".to_string(),
                workload: "Full-time".to_string(),
                duration: "4+ months".to_string(),
                currency: "USD".to_string(),
            },
            custom_parameters: RateParameters {
                role: "Frontend Developer".to_string(),
                region: "Europe".to_string(),
                seniority: "expert".to_string(),
                workload: "Full-time".to_string(),
                duration: "1 month".to_string(),
                currency: "USD".to_string(),
            },
        }
    }

    #[test]
    fn renders_both_formatted_rates_and_parameter_sets() {
        let generator = PdfGenerator::with_embedded_templates();
        let html = generator.render_html(&delivery()).expect("render");

        assert!(html.contains("$2,312.50"));
        assert!(html.contains("$2,502.40"));
        assert!(html.contains("Backend Developer"));
        assert!(html.contains("Europe"));
        assert!(html.contains("20% pre-negotiated team discount"));
    }

    #[tokio::test]
    async fn falls_back_to_html_without_wkhtmltopdf() {
        let generator = PdfGenerator::with_embedded_templates().without_wkhtmltopdf();

        match generator.generate_rate_card(&delivery()).await.expect("generate") {
            PdfResult::Html(html) => assert!(html.contains("Rate Card")),
            PdfResult::Pdf(_) => panic!("expected HTML when wkhtmltopdf is unavailable"),
        }
    }
}
