/// Display name prefix applied to every synthesized lead
pub const NAME_PREFIX: &str = "Dr. ";

pub fn display_name(name: &str) -> String {
    format!("{}{}", NAME_PREFIX, name)
}

/// "Sarah Mitchell" -> "sarah.mitchell"
pub fn email_local_part(name: &str) -> String {
    name.to_lowercase().replace(' ', ".")
}

fn company_slug(company: &str) -> String {
    company.to_lowercase().replace(' ', "")
}

/// "Gilead Sciences" -> "gileadsciences.com"
pub fn company_domain(company: &str) -> String {
    format!("{}.com", company_slug(company))
}

/// "Moderna Therapeutics" -> "modernatx.com"
///
/// Funded biotechs get the short corporate forms of common suffixes.
pub fn funded_company_domain(company: &str) -> String {
    let slug = company_slug(company)
        .replace("pharmaceuticals", "pharma")
        .replace("therapeutics", "tx");
    format!("{}.com", slug)
}

/// Synthetic address used as the dedupe key
pub fn email_address(name: &str, domain: &str) -> String {
    format!("{}@{}", email_local_part(name), domain)
}

/// "Sarah Mitchell" -> "linkedin.com/in/sarahmitchell"
pub fn linkedin_handle(name: &str) -> String {
    format!("linkedin.com/in/{}", name.to_lowercase().replace(' ', ""))
}
