//! Download filenames for generated profile documents.
//!
//! Format: `<prefix>_<client>_<vendor>_<Mon>,<Year>.<ext>`, e.g.
//! `GWFMOA_Acme_Okta_Oct,2026.docx`.

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;

pub const DOCUMENT_PREFIX: &str = "GWFMOA";
pub const DOCUMENT_EXTENSION: &str = "docx";

lazy_static! {
    static ref INVALID_CHARS: Regex = Regex::new(r#"[<>:"/\\|?*]"#).unwrap();
    static ref SEPARATOR_RUNS: Regex = Regex::new(r"[\s_]+").unwrap();
}

/// Strip characters that are invalid in filenames and collapse whitespace to `_`.
pub fn sanitize_filename_part(name: &str) -> String {
    let stripped = INVALID_CHARS.replace_all(name, "");
    let collapsed = SEPARATOR_RUNS.replace_all(&stripped, "_");
    collapsed.trim_matches(|c: char| c == '_' || c == ' ').to_string()
}

pub fn profile_filename(client_name: &str, vendor_name: &str, generated_at: DateTime<Utc>) -> String {
    format!(
        "{}_{}_{}_{}.{}",
        DOCUMENT_PREFIX,
        sanitize_filename_part(client_name),
        sanitize_filename_part(vendor_name),
        generated_at.format("%b,%Y"),
        DOCUMENT_EXTENSION
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_month_and_year() {
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        assert_eq!(
            profile_filename("Acme Corp", "Okta, Inc.", at),
            "GWFMOA_Acme_Corp_Okta,_Inc._Oct,2026.docx"
        );
    }

    #[test]
    fn strips_path_characters() {
        assert_eq!(sanitize_filename_part("  a/b\\c:d  "), "abcd");
        assert_eq!(sanitize_filename_part("Big   Vendor__Co"), "Big_Vendor_Co");
    }
}
