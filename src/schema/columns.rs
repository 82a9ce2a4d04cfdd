//! Column definitions for the postings tables
//!
//! Column names are consumed verbatim by the downstream analysis and plotting
//! scripts, so they are defined once here and never spelled out elsewhere.

use std::collections::BTreeSet;
use std::fmt;

use arrow::datatypes::{DataType, Field, Schema};

/// A column of the merged and cleaned postings tables
///
/// Declaration order is the output column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Title,
    Company,
    Country,
    City,
    RawLocation,
    NominalSalary,
    CostOfLivingIndex,
    RentIndex,
    AdjustedSalary,
    Modality,
    Remote,
    DescLength,
    Url,
}

impl Column {
    /// Every column in output order
    pub const ALL: [Column; 13] = [
        Column::Title,
        Column::Company,
        Column::Country,
        Column::City,
        Column::RawLocation,
        Column::NominalSalary,
        Column::CostOfLivingIndex,
        Column::RentIndex,
        Column::AdjustedSalary,
        Column::Modality,
        Column::Remote,
        Column::DescLength,
        Column::Url,
    ];

    /// Columns selected from the scraped postings table
    pub const POSTING_WHITELIST: [Column; 7] = [
        Column::Title,
        Column::Company,
        Column::Country,
        Column::RawLocation,
        Column::Modality,
        Column::DescLength,
        Column::Url,
    ];

    /// Column name as written to CSV
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Column::Title => "titulo",
            Column::Company => "empresa",
            Column::Country => "pais",
            Column::City => "ciudad_limpia",
            Column::RawLocation => "ubicacion_raw",
            Column::NominalSalary => "salario_medio_ppp_2024",
            Column::CostOfLivingIndex => "indice_coste_vida_2024",
            Column::RentIndex => "indice_alquiler_2024",
            Column::AdjustedSalary => "salario_real_ajustado",
            Column::Modality => "modalidad",
            Column::Remote => "es_teletrabajo",
            Column::DescLength => "desc_longitud",
            Column::Url => "url",
        }
    }

    /// Look a column up by its CSV name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Arrow type the column is written with
    #[must_use]
    pub fn data_type(self) -> DataType {
        match self {
            Column::NominalSalary
            | Column::CostOfLivingIndex
            | Column::RentIndex
            | Column::AdjustedSalary
            | Column::DescLength => DataType::Float64,
            Column::Remote => DataType::Boolean,
            _ => DataType::Utf8,
        }
    }

    #[must_use]
    pub fn field(self) -> Field {
        Field::new(self.name(), self.data_type(), true)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The set of columns a table actually carries, iterated in output order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSet(BTreeSet<Column>);

impl ColumnSet {
    /// All thirteen output columns
    #[must_use]
    pub fn all() -> Self {
        Self(Column::ALL.into_iter().collect())
    }

    /// Columns of `names` that are known output columns; unknown names are ignored
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self(names.into_iter().filter_map(Column::from_name).collect())
    }

    pub fn insert(&mut self, column: Column) {
        self.0.insert(column);
    }

    #[must_use]
    pub fn contains(&self, column: Column) -> bool {
        self.0.contains(&column)
    }

    /// Keep only the columns also present in `allowed`
    #[must_use]
    pub fn restricted_to(&self, allowed: &[Column]) -> Self {
        Self(self.0.iter().copied().filter(|c| allowed.contains(c)).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = Column> + '_ {
        self.0.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.iter().map(Column::name).collect()
    }

    /// Arrow schema for these columns in output order
    #[must_use]
    pub fn schema(&self) -> Schema {
        Schema::new(self.iter().map(Column::field).collect::<Vec<_>>())
    }
}

impl FromIterator<Column> for ColumnSet {
    fn from_iter<I: IntoIterator<Item = Column>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
