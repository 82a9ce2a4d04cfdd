//! Work-modality vocabulary

use std::fmt;

use serde::Serialize;

/// How a position is worked
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Modality {
    /// On-site, as labelled by the scraper
    #[serde(rename = "Presencial")]
    OnSite,
    /// Hybrid, as labelled by the scraper
    #[serde(rename = "Híbrido")]
    Hybrid,
    /// Fully remote, as labelled by the scraper
    #[serde(rename = "Remoto")]
    Remote,
    /// Forced when remote keywords appear in the location text
    #[serde(rename = "Remote/Hybrid")]
    RemoteHybrid,
}

impl Modality {
    pub const ALL: [Modality; 4] = [
        Modality::OnSite,
        Modality::Hybrid,
        Modality::Remote,
        Modality::RemoteHybrid,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Modality::OnSite => "Presencial",
            Modality::Hybrid => "Híbrido",
            Modality::Remote => "Remoto",
            Modality::RemoteHybrid => "Remote/Hybrid",
        }
    }

    /// Parse a label case-insensitively
    ///
    /// The Spanish spelling of the forced label, `Remoto/Híbrido`, is accepted
    /// as well since older merged files carry it.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_lowercase();
        if label == "remoto/híbrido" {
            return Some(Modality::RemoteHybrid);
        }
        Self::ALL
            .into_iter()
            .find(|modality| modality.label().to_lowercase() == label)
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
