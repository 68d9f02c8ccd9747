//! Single certificate lookup page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State};
use cert_lookup_core::{CertNumber, CertificateRecord};
use serde::Deserialize;
use tracing::instrument;

use crate::batch::lookup_and_persist;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

/// Single lookup form data.
#[derive(Debug, Deserialize)]
pub struct LookupForm {
    pub cert: String,
}

/// A finished lookup shown in the result panel.
pub struct LookupView {
    pub cert: String,
    pub record: CertificateRecord,
}

/// Lookup page template: both forms, plus the result panel after a lookup.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub lookup: Option<LookupView>,
}

/// Display the empty lookup page.
pub async fn index() -> IndexTemplate {
    IndexTemplate { lookup: None }
}

/// Look up a certificate, append its row, and render the result.
///
/// POST /
///
/// Lookup failures render as the error-shaped record. A failed append
/// aborts the request.
#[instrument(skip_all, fields(cert = %form.cert.trim()))]
pub async fn lookup(
    State(state): State<AppState>,
    Form(form): Form<LookupForm>,
) -> Result<IndexTemplate> {
    let cert = CertNumber::parse(&form.cert).map_err(|e| AppError::BadRequest(e.to_string()))?;
    add_breadcrumb("lookup", "Single certificate lookup", Some(&[("cert", cert.as_str())]));

    let record = lookup_and_persist(state.lookup(), state.sink(), &cert).await?;

    Ok(IndexTemplate {
        lookup: Some(LookupView {
            cert: cert.into_inner(),
            record,
        }),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn render(lookup: Option<LookupView>) -> String {
        IndexTemplate { lookup }.render().unwrap()
    }

    #[test]
    fn test_empty_page_has_both_forms_and_no_result() {
        let html = render(None);
        assert!(html.contains(r#"name="cert""#));
        assert!(html.contains(r#"action="/batch-upload""#));
        assert!(html.contains(r#"enctype="multipart/form-data""#));
        assert!(!html.contains("Result for Cert"));
    }

    #[test]
    fn test_result_panel_lists_fields() {
        let html = render(Some(LookupView {
            cert: "12345678".to_string(),
            record: CertificateRecord {
                card_name: "1998 Pokemon Base Set Charizard".to_string(),
                grade: "GEM MT 10".to_string(),
                set: "1998 Pokemon Base Set #4".to_string(),
                card_number: "4".to_string(),
                population: "312".to_string(),
                image_link: "https://img/x.jpg".to_string(),
            },
        }));
        assert!(html.contains("Result for Cert #12345678"));
        assert!(html.contains("1998 Pokemon Base Set Charizard"));
        assert!(html.contains("GEM MT 10"));
        assert!(html.contains("312"));
        assert!(html.contains("<img"));
        assert!(html.contains("x.jpg"));
    }

    #[test]
    fn test_error_record_renders_inline_without_image() {
        let html = render(Some(LookupView {
            cert: "1".to_string(),
            record: CertificateRecord::lookup_failed("Unexpected HTTP status 404"),
        }));
        assert!(html.contains("Error fetching data"));
        assert!(html.contains("Unexpected HTTP status 404"));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn test_scraped_text_is_escaped() {
        let html = render(Some(LookupView {
            cert: "1".to_string(),
            record: CertificateRecord {
                card_name: "<script>alert(1)</script>".to_string(),
                ..Default::default()
            },
        }));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&#60;script&#62;") || html.contains("&lt;script&gt;"));
    }
}
