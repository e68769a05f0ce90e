//! Sanction letter rendering
//!
//! The letter is an HTML template rendered with Tera. When wkhtmltopdf
//! is on PATH (or configured explicitly) the HTML is converted to PDF
//! through a temp file; otherwise the HTML bytes are returned for the
//! browser to render, so the download works on machines without the
//! converter installed.

use std::process::Stdio;

use chrono::Local;
use tera::{Context, Tera};
use tokio::process::Command;
use tracing::{error, info, warn};

use loan_officer_core::{format_inr, LoanSession};

use crate::DocumentError;

const TEMPLATE_NAME: &str = "sanction_letter.html.tera";

/// Renders sanction letters for approved sessions
#[derive(Debug, Clone)]
pub struct SanctionRenderer {
    tera: Tera,
    wkhtmltopdf_path: Option<String>,
}

/// Result of rendering: a real PDF or HTML fallback
pub enum DocumentResult {
    Pdf(Vec<u8>),
    Html(String),
}

impl SanctionRenderer {
    /// Create a renderer with the embedded letter template.
    ///
    /// `wkhtmltopdf_path` overrides the PATH lookup when set.
    pub fn new(wkhtmltopdf_path: Option<String>) -> Result<Self, DocumentError> {
        let mut tera = Tera::default();
        tera.add_raw_template(
            TEMPLATE_NAME,
            include_str!("../templates/sanction_letter.html.tera"),
        )
        .map_err(|e| DocumentError::Template(e.to_string()))?;

        let wkhtmltopdf_path = wkhtmltopdf_path.or_else(|| {
            which::which("wkhtmltopdf")
                .ok()
                .map(|p| p.to_string_lossy().to_string())
        });

        if let Some(ref path) = wkhtmltopdf_path {
            info!(path = %path, "wkhtmltopdf found");
        } else {
            warn!("wkhtmltopdf not found in PATH - sanction letters will be served as HTML");
        }

        Ok(Self {
            tera,
            wkhtmltopdf_path,
        })
    }

    /// Render the sanction letter for a session.
    pub async fn render(
        &self,
        session: &LoanSession,
        reference_id: &str,
    ) -> Result<DocumentResult, DocumentError> {
        let html = self.render_html(session, reference_id)?;

        if let Some(ref wkhtmltopdf) = self.wkhtmltopdf_path {
            match self.convert_html_to_pdf(&html, wkhtmltopdf).await {
                Ok(pdf_bytes) => Ok(DocumentResult::Pdf(pdf_bytes)),
                Err(e) => {
                    warn!(error = %e, "PDF conversion failed, falling back to HTML");
                    Ok(DocumentResult::Html(html))
                }
            }
        } else {
            Ok(DocumentResult::Html(html))
        }
    }

    /// Render just the HTML letter body.
    pub fn render_html(
        &self,
        session: &LoanSession,
        reference_id: &str,
    ) -> Result<String, DocumentError> {
        let name = session
            .name
            .as_deref()
            .unwrap_or("Applicant")
            .to_uppercase();

        let mut context = Context::new();
        context.insert("date", &Local::now().format("%d-%m-%Y").to_string());
        context.insert("reference_id", reference_id);
        context.insert("name", &name);
        context.insert(
            "loan_amount",
            &format_inr(session.loan_amount.unwrap_or_default()),
        );
        context.insert("tenure_months", &session.tenure_months.unwrap_or_default());
        context.insert(
            "interest_rate",
            &format!("{:.1}", session.interest_rate.unwrap_or_default()),
        );
        context.insert("emi", &format_inr(session.emi.unwrap_or_default()));
        context.insert(
            "credit_score",
            &session
                .credit_score
                .map(|s| s.to_string())
                .unwrap_or_else(|| "N/A".to_string()),
        );

        self.tera
            .render(TEMPLATE_NAME, &context)
            .map_err(|e| DocumentError::Template(e.to_string()))
    }

    async fn convert_html_to_pdf(
        &self,
        html: &str,
        wkhtmltopdf_path: &str,
    ) -> Result<Vec<u8>, DocumentError> {
        let temp_dir = std::env::temp_dir();
        let stamp = uuid::Uuid::new_v4();
        let html_path = temp_dir.join(format!("sanction_{stamp}.html"));
        let pdf_path = temp_dir.join(format!("sanction_{stamp}.pdf"));

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
            return Err(DocumentError::Conversion(stderr.to_string()));
        }

        let pdf_bytes = tokio::fs::read(&pdf_path).await?;

        let _ = tokio::fs::remove_file(&html_path).await;
        let _ = tokio::fs::remove_file(&pdf_path).await;

        info!(size = pdf_bytes.len(), "sanction letter PDF generated");

        Ok(pdf_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loan_officer_core::ConversationState;

    fn approved_session() -> LoanSession {
        LoanSession {
            state: ConversationState::Approved,
            name: Some("Asha Verma".into()),
            phone: Some("9876543210".into()),
            loan_amount: Some(300_000),
            tenure_months: Some(24),
            interest_rate: Some(14.0),
            emi: Some(14_404),
            salary: Some(50_000),
            pan: Some("ABCDE1234F".into()),
            credit_score: Some(720),
        }
    }

    #[test]
    fn test_letter_carries_session_facts() {
        let renderer = SanctionRenderer::new(None).unwrap();
        let html = renderer
            .render_html(&approved_session(), "LOAN-TEST-001")
            .unwrap();

        assert!(html.contains("ASHA VERMA"));
        assert!(html.contains("LOAN-TEST-001"));
        assert!(html.contains("INR 300,000"));
        assert!(html.contains("24 months"));
        assert!(html.contains("14.0% p.a."));
        assert!(html.contains("INR 14,404"));
        assert!(html.contains("720"));
        assert!(html.contains("Sanction of Personal Loan"));
    }

    #[test]
    fn test_missing_fields_degrade_gracefully() {
        let renderer = SanctionRenderer::new(None).unwrap();
        let html = renderer
            .render_html(&LoanSession::new(), "LOAN-TEST-002")
            .unwrap();

        assert!(html.contains("APPLICANT"));
        assert!(html.contains("N/A"));
    }

    #[tokio::test]
    async fn test_html_fallback_without_converter() {
        let mut renderer = SanctionRenderer::new(None).unwrap();
        renderer.wkhtmltopdf_path = None;

        let result = renderer
            .render(&approved_session(), "LOAN-TEST-003")
            .await
            .unwrap();

        match result {
            DocumentResult::Html(html) => assert!(html.contains("FinTech Fusion Bank")),
            DocumentResult::Pdf(_) => panic!("expected HTML without wkhtmltopdf"),
        }
    }
}
