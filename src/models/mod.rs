//! Domain models for the job-market dataset
//!
//! Rows move through three shapes: the scraped [`JobPosting`], the merged
//! [`EnrichedPosting`] and the validated [`CleanPosting`].

pub mod clean;
pub mod country;
pub mod economics;
pub mod enriched;
pub mod modality;
pub mod posting;

pub use clean::CleanPosting;
pub use country::{Country, MACRO_COUNTRY_CODES, UnknownCountry};
pub use economics::{CostOfLivingRecord, CountryEconomics, FALLBACK_COST_OF_LIVING, MacroRecord};
pub use enriched::{EnrichedPosting, PostingTable};
pub use modality::Modality;
pub use posting::JobPosting;

/// Title written for postings scraped without one
pub const UNTITLED: &str = "Sin Título";
/// Company written for postings that hide the employer
pub const CONFIDENTIAL_COMPANY: &str = "Empresa Confidencial";
/// City written when nothing usable remains of the location text
pub const UNKNOWN_CITY: &str = "Desconocido";
