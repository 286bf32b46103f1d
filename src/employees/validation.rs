//! Company email rule.

/// True if `email` has a non-empty local part and ends in `@{domain}`.
pub fn is_company_email(email: &str, domain: &str) -> bool {
    match email.rsplit_once('@') {
        Some((local, host)) => !local.is_empty() && host.eq_ignore_ascii_case(domain),
        None => false,
    }
}
