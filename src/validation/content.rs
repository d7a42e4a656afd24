//! Custom `garde` rules for content and form payloads.

use std::sync::LazyLock;

use regex::Regex;

static SLUG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").unwrap());

/// Slugs are lowercase ASCII letters, digits and hyphens.
pub fn validate_slug<T: AsRef<str> + ?Sized>(value: &T, _: &()) -> garde::Result {
    if SLUG.is_match(value.as_ref()) {
        Ok(())
    } else {
        Err(garde::Error::new(
            "slug may only contain lowercase letters, numbers and hyphens",
        ))
    }
}

/// Like `validate_slug`, for partial updates.
pub fn validate_optional_slug(value: &Option<String>, ctx: &()) -> garde::Result {
    match value {
        Some(slug) => validate_slug(slug, ctx),
        None => Ok(()),
    }
}

/// The PHI acknowledgement box must be ticked.
pub fn validate_acknowledged(value: &bool, _: &()) -> garde::Result {
    if *value {
        Ok(())
    } else {
        Err(garde::Error::new(
            "you must acknowledge not to include PHI in this form",
        ))
    }
}

/// At least one non-blank service must be selected.
pub fn validate_services(value: &[String], _: &()) -> garde::Result {
    if value.is_empty() {
        return Err(garde::Error::new("select at least one service"));
    }
    if value.iter().any(|s| s.trim().is_empty()) {
        return Err(garde::Error::new("services may not be blank"));
    }
    Ok(())
}

/// Résumé references must point into the résumé upload area.
pub fn validate_resume_path<T: AsRef<str> + ?Sized>(value: &T, _: &()) -> garde::Result {
    let path = value.as_ref();
    if path.starts_with("/uploads/resumes/") && !path.contains("..") {
        Ok(())
    } else {
        Err(garde::Error::new("resume must be an uploaded file"))
    }
}

/// A blank value means "no reference". Anything else must be a UUID.
pub fn validate_optional_reference(value: &Option<String>, _: &()) -> garde::Result {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(()),
        Some(id) => uuid::Uuid::parse_str(id)
            .map(|_| ())
            .map_err(|_| garde::Error::new("must be a valid identifier")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs() {
        assert!(validate_slug("prior-auth-101", &()).is_ok());
        assert!(validate_slug("Prior-Auth", &()).is_err());
        assert!(validate_slug("a b", &()).is_err());
        assert!(validate_slug("", &()).is_err());
        assert!(validate_optional_slug(&None, &()).is_ok());
        assert!(validate_optional_slug(&Some("bad_slug".into()), &()).is_err());
    }

    #[test]
    fn blank_references_are_allowed() {
        assert!(validate_optional_reference(&None, &()).is_ok());
        assert!(validate_optional_reference(&Some(" ".into()), &()).is_ok());
        assert!(
            validate_optional_reference(&Some("3f2b8c1e-9a4d-4e7f-b6a1-0c5d2e8f9a7b".into()), &())
                .is_ok()
        );
        assert!(validate_optional_reference(&Some("42".into()), &()).is_err());
    }

    #[test]
    fn phi_acknowledgement_is_required() {
        assert!(validate_acknowledged(&true, &()).is_ok());
        assert!(validate_acknowledged(&false, &()).is_err());
    }

    #[test]
    fn services_need_one_non_blank_entry() {
        assert!(validate_services(&[], &()).is_err());
        assert!(validate_services(&[" ".to_string()], &()).is_err());
        assert!(validate_services(&["Coding".to_string()], &()).is_ok());
    }

    #[test]
    fn resume_paths_stay_in_the_upload_area() {
        assert!(validate_resume_path("/uploads/resumes/1-ab.pdf", &()).is_ok());
        assert!(validate_resume_path("/uploads/resumes/../../etc/passwd", &()).is_err());
        assert!(validate_resume_path("https://evil.test/cv.pdf", &()).is_err());
    }
}
