//! Splicing a policy report into a validation report

use crate::core::error::EngineError;

const JOB_CLOSE: &str = "</job>";

/// Insert the root element of `policy_result` into the `<job>` element of
/// `report`, just before it closes.
pub fn insert_policy_report(policy_result: &str, report: &str) -> Result<String, EngineError> {
    let element = strip_prolog(policy_result);
    if !element.starts_with('<') || element.starts_with("<!") || element.starts_with("<?") {
        return Err(EngineError::Malformed(
            "policy result is not an XML element".to_string(),
        ));
    }

    let at = report.rfind(JOB_CLOSE).ok_or_else(|| {
        EngineError::Malformed("validation report has no <job> element".to_string())
    })?;

    let mut merged = String::with_capacity(report.len() + element.len() + 1);
    merged.push_str(&report[..at]);
    merged.push_str(element.trim_end());
    merged.push('\n');
    merged.push_str(&report[at..]);
    Ok(merged)
}

/// Drop a BOM, the XML declaration, a DOCTYPE and any leading whitespace,
/// comments or processing instructions
fn strip_prolog(doc: &str) -> &str {
    let mut rest = doc.trim_start_matches('\u{feff}').trim_start();
    loop {
        let end = if rest.starts_with("<?") {
            rest.find("?>").map(|i| i + 2)
        } else if rest.starts_with("<!--") {
            rest.find("-->").map(|i| i + 3)
        } else if rest.starts_with("<!DOCTYPE") {
            doctype_end(rest)
        } else {
            None
        };
        match end {
            Some(end) => rest = rest[end..].trim_start(),
            None => return rest,
        }
    }
}

/// Byte offset just past a `<!DOCTYPE ...>` declaration, internal subset included
fn doctype_end(decl: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in decl.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '>' if depth == 0 => return Some(i + 1),
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "<?xml version=\"1.0\"?>\n<report><jobs><job><item/>\
                          <validationReport isCompliant=\"true\"/></job></jobs></report>\n";

    #[test]
    fn test_policy_report_lands_inside_job() {
        let policy = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
                      <policyReport passedChecks=\"1\" failedChecks=\"0\"/>\n";
        let merged = insert_policy_report(policy, REPORT).unwrap();

        assert!(merged.starts_with("<?xml version=\"1.0\"?>"));
        assert_eq!(merged.matches("<?xml").count(), 1);
        let policy_at = merged.find("<policyReport").unwrap();
        let validation_at = merged.find("<validationReport").unwrap();
        let job_close = merged.find("</job>").unwrap();
        assert!(validation_at < policy_at && policy_at < job_close);
    }

    #[test]
    fn test_comments_and_bom_are_skipped() {
        let policy = "\u{feff}<?xml version=\"1.0\"?><!-- generated --><policyReport/>";
        let merged = insert_policy_report(policy, REPORT).unwrap();
        assert!(merged.contains("<policyReport/>\n</job>"));
        assert!(!merged.contains("generated"));
    }

    #[test]
    fn test_report_without_job_is_rejected() {
        let err = insert_policy_report("<policyReport/>", "<report/>").unwrap_err();
        assert!(matches!(err, EngineError::Malformed(_)));
    }

    #[test]
    fn test_non_xml_policy_result_is_rejected() {
        let err = insert_policy_report("error: no such policy", REPORT).unwrap_err();
        assert!(matches!(err, EngineError::Malformed(_)));

        let err = insert_policy_report("<?xml version=\"1.0\"?>", REPORT).unwrap_err();
        assert!(matches!(err, EngineError::Malformed(_)));
    }

    #[test]
    fn test_doctype_is_not_copied_into_job() {
        let policy = "<?xml version=\"1.0\"?>\n<!DOCTYPE policyReport>\n<policyReport/>";
        let merged = insert_policy_report(policy, "<report><jobs><job></job></jobs></report>").unwrap();
        assert!(!merged.contains("<!DOCTYPE"));
        assert_eq!(merged, "<report><jobs><job><policyReport/>\n</job></jobs></report>");
    }

    #[test]
    fn test_doctype_with_internal_subset_is_skipped() {
        let policy = "<!DOCTYPE policyReport SYSTEM \"policy.dtd\" [\n\
                      <!ENTITY ok \"passed\">\n<!ELEMENT policyReport ANY>\n]>\n\
                      <policyReport status=\"ok\"/>";
        let merged = insert_policy_report(policy, REPORT).unwrap();
        assert!(!merged.contains("<!ENTITY"));
        assert!(merged.contains("<policyReport status=\"ok\"/>\n</job>"));
    }

    #[test]
    fn test_unterminated_doctype_is_rejected() {
        let err = insert_policy_report("<!DOCTYPE policyReport [", REPORT).unwrap_err();
        assert!(matches!(err, EngineError::Malformed(_)));
    }
}
