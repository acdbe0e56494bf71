//! Company profile built during onboarding.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Whether the company is newly formed or already operating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyStatus {
    New,
    Established,
}

impl CompanyStatus {
    /// The fixed choice list offered at the status step, in display order.
    pub const CHOICES: [CompanyStatus; 2] = [CompanyStatus::New, CompanyStatus::Established];

    /// Parse a user's choice. Case-insensitive, surrounding whitespace ignored.
    pub fn parse(input: &str) -> Option<Self> {
        let choice = input.trim();
        if choice.eq_ignore_ascii_case("new") {
            Some(Self::New)
        } else if choice.eq_ignore_ascii_case("established") {
            Some(Self::Established)
        } else {
            None
        }
    }

    /// Human-facing label ("New" / "Established").
    pub fn label(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Established => "Established",
        }
    }
}

impl std::fmt::Display for CompanyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::Established => write!(f, "established"),
        }
    }
}

/// The record the wizard produces for downstream use.
///
/// Fields are filled in step order and are `None` until their step has been
/// answered. `established_date` stays `None` for new companies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<CompanyStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub established_date: Option<NaiveDate>,
}

impl CompanyProfile {
    /// Whether every field required for the profile's status is present.
    pub fn is_complete(&self) -> bool {
        let base = self.company_name.is_some() && self.sector.is_some();
        match self.status {
            Some(CompanyStatus::New) => base,
            Some(CompanyStatus::Established) => base && self.established_date.is_some(),
            None => false,
        }
    }

    /// Render the profile as a markdown section for the chat preamble.
    pub fn to_prompt_section(&self) -> String {
        let mut parts = vec!["# Company Profile".to_string()];

        if let Some(ref name) = self.company_name {
            parts.push(format!("- **Company name:** {}", name));
        }
        if let Some(ref sector) = self.sector {
            parts.push(format!("- **Sector:** {}", sector));
        }
        if let Some(status) = self.status {
            parts.push(format!("- **Status:** {}", status.label()));
        }
        if let Some(date) = self.established_date {
            parts.push(format!("- **Established:** {}", date.format("%Y-%m-%d")));
        }

        parts.join("\n")
    }
}
