//! Joins of the integration stage
//!
//! The two economic sources are outer-joined into one row per country, then
//! every posting is left-joined onto that table and its derived fields filled.

use std::collections::BTreeMap;

use log::warn;

use super::IntegrationReport;
use crate::algorithm::location::{LocationNormalizer, is_remote};
use crate::algorithm::salary::adjusted_salary;
use crate::models::{
    CostOfLivingRecord, Country, CountryEconomics, EnrichedPosting, JobPosting, MacroRecord,
    Modality, PostingTable, UNTITLED,
};
use crate::schema::{Column, ColumnSet};

/// Outer join of macro and cost-of-living records on country
///
/// A country repeated in the cost-of-living table keeps its first row.
#[must_use]
pub fn build_economic_table(
    macro_records: &[MacroRecord],
    cost_of_living: &[CostOfLivingRecord],
) -> BTreeMap<Country, CountryEconomics> {
    let mut table: BTreeMap<Country, CountryEconomics> = BTreeMap::new();

    for record in macro_records {
        table.entry(record.country).or_default().nominal_salary = record.nominal_salary;
    }

    let mut seen = Vec::with_capacity(cost_of_living.len());
    for record in cost_of_living {
        if seen.contains(&record.country) {
            warn!(
                "Duplicate cost-of-living row for {}; keeping the first",
                record.country
            );
            continue;
        }
        seen.push(record.country);

        let entry = table.entry(record.country).or_default();
        entry.cost_of_living_index = record.cost_of_living_index;
        entry.rent_index = record.rent_index;
    }

    table
}

/// Columns of the merged table given the posting columns that were found
#[must_use]
pub fn output_columns(posting_columns: &ColumnSet) -> ColumnSet {
    let mut columns = posting_columns.clone();
    for column in [
        Column::Title,
        Column::Country,
        Column::NominalSalary,
        Column::CostOfLivingIndex,
        Column::RentIndex,
        Column::AdjustedSalary,
    ] {
        columns.insert(column);
    }
    if posting_columns.contains(Column::RawLocation) {
        columns.insert(Column::City);
        columns.insert(Column::Remote);
        columns.insert(Column::Modality);
    }
    columns
}

/// Left join of postings onto the economic table, deriving city, remote flag,
/// modality, description length and adjusted salary
pub fn enrich_postings(
    postings: Vec<JobPosting>,
    posting_columns: &ColumnSet,
    economics: &BTreeMap<Country, CountryEconomics>,
    normalizer: &LocationNormalizer,
    report: &mut IntegrationReport,
) -> PostingTable {
    let has_location = posting_columns.contains(Column::RawLocation);
    let has_desc_length = posting_columns.contains(Column::DescLength);

    let mut rows = Vec::with_capacity(postings.len());
    let mut unknown_modalities = 0usize;

    for posting in postings {
        let Some(country) = posting
            .country
            .as_deref()
            .map(str::trim)
            .and_then(Country::from_code)
        else {
            report.out_of_scope_postings += 1;
            continue;
        };

        let econ = economics.get(&country).copied().unwrap_or_default();
        if econ.nominal_salary.is_none() || econ.cost_of_living_index.is_none() {
            report.postings_without_economics += 1;
        }

        let raw_location = posting.raw_location.as_deref();
        let remote = has_location.then(|| is_remote(raw_location));
        let city = has_location.then(|| normalizer.normalize(raw_location));

        let mut modality = posting.modality.as_deref().and_then(|label| {
            let parsed = Modality::from_label(label);
            if parsed.is_none() {
                unknown_modalities += 1;
            }
            parsed
        });
        if remote == Some(true) {
            modality = Some(Modality::RemoteHybrid);
            report.remote_postings += 1;
        }

        rows.push(EnrichedPosting {
            title: Some(posting.title.unwrap_or_else(|| UNTITLED.to_string())),
            company: posting.company,
            country: Some(country),
            city,
            nominal_salary: econ.nominal_salary,
            cost_of_living_index: econ.cost_of_living_index,
            rent_index: econ.rent_index,
            adjusted_salary: adjusted_salary(econ.nominal_salary, econ.cost_of_living_index),
            modality,
            remote,
            desc_length: has_desc_length.then(|| posting.desc_length.unwrap_or(0.0)),
            raw_location: posting.raw_location,
            url: posting.url,
        });
    }

    if unknown_modalities > 0 {
        let message = format!("{unknown_modalities} postings carry an unrecognised modality label; left empty");
        warn!("{message}");
        report.warnings.push(message);
    }
    if report.out_of_scope_postings > 0 {
        warn!(
            "Dropped {} postings whose country is missing or outside {}",
            report.out_of_scope_postings,
            Country::ALL.map(Country::code).join("/")
        );
    }

    PostingTable::new(output_columns(posting_columns), rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posting(country: &str, location: Option<&str>) -> JobPosting {
        JobPosting {
            title: Some("Data Analyst".to_string()),
            company: Some("Acme".to_string()),
            country: Some(country.to_string()),
            raw_location: location.map(str::to_string),
            modality: Some("Presencial".to_string()),
            desc_length: Some(1_500.0),
            url: None,
        }
    }

    fn economics() -> BTreeMap<Country, CountryEconomics> {
        build_economic_table(
            &[MacroRecord {
                country: Country::Germany,
                nominal_salary: Some(58_000.0),
            }],
            &CostOfLivingRecord::fallback_table(),
        )
    }

    #[test]
    fn test_outer_join_keeps_countries_from_both_sources() {
        let table = economics();
        assert_eq!(table.len(), 5);
        assert_eq!(table[&Country::Germany].nominal_salary, Some(58_000.0));
        assert_eq!(table[&Country::Germany].cost_of_living_index, Some(63.5));
        assert_eq!(table[&Country::France].nominal_salary, None);
    }

    #[test]
    fn test_duplicate_cost_rows_keep_first() {
        let rows = [
            CostOfLivingRecord {
                country: Country::Spain,
                cost_of_living_index: Some(48.7),
                rent_index: None,
            },
            CostOfLivingRecord {
                country: Country::Spain,
                cost_of_living_index: Some(99.0),
                rent_index: None,
            },
        ];
        let table = build_economic_table(&[], &rows);
        assert_eq!(table[&Country::Spain].cost_of_living_index, Some(48.7));
    }

    #[test]
    fn test_remote_location_forces_modality() {
        let columns = ColumnSet::from_names(["titulo", "pais", "ubicacion_raw", "modalidad"]);
        let normalizer = LocationNormalizer::for_integration().unwrap();
        let mut report = IntegrationReport::default();
        let table = enrich_postings(
            vec![posting("DE", Some("Hybrid - Berlin"))],
            &columns,
            &economics(),
            &normalizer,
            &mut report,
        );

        let row = &table.rows[0];
        assert_eq!(row.remote, Some(true));
        assert_eq!(row.modality, Some(Modality::RemoteHybrid));
        assert_eq!(row.city.as_deref(), Some("Berlin"));
        assert_eq!(row.adjusted_salary, Some(91_338.58));
        assert_eq!(report.remote_postings, 1);
    }

    #[test]
    fn test_out_of_scope_postings_are_dropped() {
        let columns = ColumnSet::from_names(["titulo", "pais"]);
        let normalizer = LocationNormalizer::for_integration().unwrap();
        let mut report = IntegrationReport::default();
        let mut missing = posting("ES", None);
        missing.country = None;
        let table = enrich_postings(
            vec![posting(" ES ", None), posting("IT", None), missing],
            &columns,
            &economics(),
            &normalizer,
            &mut report,
        );
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].country, Some(Country::Spain));
        assert_eq!(report.out_of_scope_postings, 2);
        assert_eq!(report.postings_without_economics, 1);
    }

    #[test]
    fn test_defaults_and_absent_columns() {
        let columns = ColumnSet::from_names(["pais", "desc_longitud"]);
        let normalizer = LocationNormalizer::for_integration().unwrap();
        let mut report = IntegrationReport::default();
        let mut row = posting("UK", Some("London"));
        row.title = None;
        row.desc_length = None;
        let table = enrich_postings(vec![row], &columns, &economics(), &normalizer, &mut report);

        assert_eq!(
            table.columns.names(),
            vec![
                "titulo",
                "pais",
                "salario_medio_ppp_2024",
                "indice_coste_vida_2024",
                "indice_alquiler_2024",
                "salario_real_ajustado",
                "desc_longitud",
            ]
        );
        let row = &table.rows[0];
        assert_eq!(row.title.as_deref(), Some(UNTITLED));
        assert_eq!(row.desc_length, Some(0.0));
        assert_eq!(row.remote, None);
        assert_eq!(row.city, None);
        assert_eq!(row.adjusted_salary, None);
    }
}
