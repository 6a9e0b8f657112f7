//! Email draft for manual attachment
//!
//! Only subject and body; the files are never attached here.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailDraft {
    pub subject: String,
    pub body: String,
}

pub fn compose_email_draft(scene_name: &str, file_names: &[String]) -> EmailDraft {
    let mut body = format!(
        "Vitals export for scene \"{}\".\n\nPlease attach the downloaded files before sending:\n",
        scene_name
    );
    for name in file_names {
        body.push_str(&format!("  - {}\n", name));
    }

    EmailDraft {
        subject: format!("Vitals export: {}", scene_name),
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_email_draft() {
        let files = vec!["a-vitals-2024-01-01.csv".to_string(), "a-vitals-2024-01-01.pdf".to_string()];
        let draft = compose_email_draft("Warehouse", &files);
        assert_eq!(draft.subject, "Vitals export: Warehouse");
        assert!(draft.body.contains("attach"));
        assert!(draft.body.contains("  - a-vitals-2024-01-01.csv\n"));
        assert!(draft.body.contains("  - a-vitals-2024-01-01.pdf\n"));
    }
}
