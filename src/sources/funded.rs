use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::contact::{display_name, email_address, funded_company_domain, linkedin_handle};
use super::{LeadSource, SourceOutcome};
use crate::leads::LeadRecord;

const ACTIVITY_NOTE: &str = "Recently joined funded company";

/// A recently funded company and the contacts known there.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FundedCompany {
    pub company: String,
    pub funding: String,  // e.g. "Series B funded, $120M"
    pub location: String, // HQ, also used as contact location
    #[serde(default)]
    pub contacts: Vec<Contact>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Contact {
    pub name: String,
    pub title: String,
}

/// Static list of funded companies. Stand-in for a funding database feed.
#[derive(Debug, Clone)]
pub struct FundedCompanySource {
    companies: Vec<FundedCompany>,
}

impl FundedCompanySource {
    pub fn new(companies: Vec<FundedCompany>) -> Self {
        Self { companies }
    }

    /// Load companies from a YAML list of `FundedCompany` entries
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read company dataset at {}", path.display()))?;
        let companies: Vec<FundedCompany> = serde_saphyr::from_str(&content)
            .with_context(|| format!("Failed to parse company dataset in {}", path.display()))?;
        Ok(Self::new(companies))
    }

    /// Built-in demo dataset of funded biotech companies
    pub fn sample() -> Self {
        fn contact(name: &str, title: &str) -> Contact {
            Contact {
                name: name.to_string(),
                title: title.to_string(),
            }
        }
        fn company(
            name: &str,
            funding: &str,
            location: &str,
            contacts: Vec<Contact>,
        ) -> FundedCompany {
            FundedCompany {
                company: name.to_string(),
                funding: funding.to_string(),
                location: location.to_string(),
                contacts,
            }
        }

        Self::new(vec![
            company(
                "Moderna Therapeutics",
                "Series B funded, $120M",
                "Cambridge, MA",
                vec![
                    contact("Sarah Mitchell", "Director of Toxicology & Safety"),
                    contact("John Davis", "Head of Preclinical Safety"),
                ],
            ),
            company(
                "Beam Therapeutics",
                "Series C funded, $150M",
                "Cambridge, MA",
                vec![contact("Maria Gonzalez", "Director of Safety Assessment")],
            ),
            company(
                "Alnylam Pharmaceuticals",
                "Series B, $85M raised",
                "Cambridge, MA",
                vec![contact("Lisa Anderson", "Associate Director, Preclinical Safety")],
            ),
            company(
                "Vertex Pharmaceuticals",
                "Public company",
                "Boston, MA",
                vec![contact("James Chen", "Head of Preclinical Safety Assessment")],
            ),
            company(
                "Regeneron Pharmaceuticals",
                "Public company",
                "Tarrytown, NY",
                vec![contact("Rachel Kim", "Director of In Vitro Toxicology")],
            ),
        ])
    }

    pub fn companies(&self) -> &[FundedCompany] {
        &self.companies
    }

    pub fn leads(&self) -> Vec<LeadRecord> {
        self.companies.iter().flat_map(company_leads).collect()
    }
}

/// One lead per contact at the company
fn company_leads(company: &FundedCompany) -> Vec<LeadRecord> {
    let domain = funded_company_domain(&company.company);
    company
        .contacts
        .iter()
        .map(|contact| LeadRecord {
            name: display_name(&contact.name),
            title: contact.title.clone(),
            company: company.company.clone(),
            location: company.location.clone(),
            headquarters: company.location.clone(),
            contact_identifier: email_address(&contact.name, &domain),
            linkedin: linkedin_handle(&contact.name),
            funding_status: company.funding.clone(),
            uses_relevant_technology: true,
            has_recent_publication: false,
            has_any_publication: true,
            recent_activity_note: ACTIVITY_NOTE.to_string(),
        })
        .collect()
}

#[async_trait]
impl LeadSource for FundedCompanySource {
    fn name(&self) -> &str {
        "funded companies"
    }

    async fn collect(&self) -> SourceOutcome {
        SourceOutcome::from_leads(self.leads())
    }
}
