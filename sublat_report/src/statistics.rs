//! Occurrence statistics for a pattern library over a graph database.

use std::collections::BTreeSet;

use sublat_common::{Config, Contains, CountEmbeddings, GraphMeta};
use sublat_lattice::{CountSummary, Lattice, LatticeError, NodeIdx, brute_force_occurrences};
use tracing::{debug, info};

use crate::{OccurrenceRecord, ReportError};

/// Counting results plus the names used to report them.
///
/// Patterns and database graphs are borrowed; a lattice, once built, is kept
/// and reused by later lattice-based computations.
pub struct Statistics<'a, G> {
    patterns: &'a [G],
    database: &'a [G],
    config: Config,
    names: Vec<String>,
    database_names: Vec<String>,
    lattice: Option<Lattice<&'a G>>,
    occurrences: Option<Vec<BTreeSet<usize>>>,
    embeddings: Option<Vec<usize>>,
    summary: Option<CountSummary>,
}

impl<'a, G> Statistics<'a, G>
where
    G: Contains + GraphMeta + Sync,
{
    /// Prepares statistics for `patterns` over `database` and assigns names.
    ///
    /// Unnamed patterns, or every pattern with `config.override_names`, are
    /// named `"0"`, `"1"`, ... in order. Unnamed database graphs are referred
    /// to as `g<index>`.
    pub fn new(patterns: &'a [G], database: &'a [G], config: Config) -> Self {
        let names = pattern_names(patterns, config.override_names);
        let database_names = database_names(database);
        Self {
            patterns,
            database,
            config,
            names,
            database_names,
            lattice: None,
            occurrences: None,
            embeddings: None,
            summary: None,
        }
    }

    /// Pattern names, in input order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Database graph names, in database order.
    pub fn database_names(&self) -> &[String] {
        &self.database_names
    }

    /// The lattice, if one has been built.
    pub const fn lattice(&self) -> Option<&Lattice<&'a G>> {
        self.lattice.as_ref()
    }

    /// Counters of the last occurrence computation.
    pub const fn summary(&self) -> Option<&CountSummary> {
        self.summary.as_ref()
    }

    /// Occurrence sets of the last computation, in pattern order.
    pub fn occurrences(&self) -> Option<&[BTreeSet<usize>]> {
        self.occurrences.as_deref()
    }

    /// Builds the lattice over the patterns unless it already exists.
    pub fn build_lattice(&mut self) -> Result<&Lattice<&'a G>, ReportError> {
        let lattice: &Lattice<&'a G> = self.lattice_mut()?;
        Ok(lattice)
    }

    fn lattice_mut(&mut self) -> Result<&mut Lattice<&'a G>, ReportError> {
        let lattice = match self.lattice.take() {
            Some(lattice) => lattice,
            None => Lattice::build(self.patterns.iter().collect::<Vec<&'a G>>(), &self.config)?,
        };
        Ok(self.lattice.insert(lattice))
    }

    /// Counts occurrences with the strategy chosen by the configuration.
    pub fn compute(&mut self) -> Result<CountSummary, ReportError> {
        if self.config.strategy.uses_lattice(self.patterns.len()) {
            self.compute_lattice_based()
        } else {
            self.compute_brute_force()
        }
    }

    /// Tests every pattern against every database graph.
    pub fn compute_brute_force(&mut self) -> Result<CountSummary, ReportError> {
        let (occurrences, summary) = brute_force_occurrences(self.patterns, self.database, &self.config)?;
        Ok(self.store(occurrences, summary))
    }

    /// Counts through the lattice, building it first if necessary.
    pub fn compute_lattice_based(&mut self) -> Result<CountSummary, ReportError> {
        let database: Vec<&'a G> = self.database.iter().collect();
        let config = self.config.clone();

        let lattice = self.lattice_mut()?;
        let summary = lattice.count_occurrences(&database, &config)?;
        let occurrences = lattice.occurrence_sets().into_iter().cloned().collect();
        Ok(self.store(occurrences, summary))
    }

    fn store(&mut self, occurrences: Vec<BTreeSet<usize>>, summary: CountSummary) -> CountSummary {
        info!(
            "Computed occurrences of {} patterns: {} containment checks",
            occurrences.len(),
            summary.evaluations
        );
        self.occurrences = Some(occurrences);
        self.embeddings = None;
        self.summary = Some(summary);
        summary
    }

    /// Builds one record per pattern, in input order.
    pub fn records(&self, tag: &str) -> Result<Vec<OccurrenceRecord>, ReportError> {
        let occurrences = self.occurrences.as_ref().ok_or(ReportError::MissingCounts)?;

        let records = self
            .patterns
            .iter()
            .zip(&self.names)
            .zip(occurrences)
            .enumerate()
            .map(|(i, ((pattern, name), found))| OccurrenceRecord {
                name: name.clone(),
                tag: tag.to_owned(),
                embedding_occurrence_count: self.embeddings.as_ref().map_or(0, |counts| counts[i]),
                transaction_occurrence_count: found.len(),
                compression: OccurrenceRecord::compression(found.len(), pattern.size()),
                occurrence_references: found.iter().map(|&g| self.database_names[g].clone()).collect(),
            })
            .collect();
        Ok(records)
    }
}

impl<G: CountEmbeddings> Statistics<'_, G> {
    /// Sums the embedding counts of each pattern over the graphs it occurs in.
    ///
    /// Needs occurrences to be computed first; only containing graphs are
    /// searched.
    pub fn compute_embedding_occurrences(&mut self) -> Result<(), ReportError> {
        let occurrences = self.occurrences.as_ref().ok_or(ReportError::MissingCounts)?;

        let mut counts = Vec::with_capacity(self.patterns.len());
        for (i, (pattern, found)) in self.patterns.iter().zip(occurrences).enumerate() {
            let mut total = 0;
            for &graph in found {
                total += self.database[graph]
                    .count_embeddings(pattern)
                    .map_err(|source| LatticeError::database(graph, NodeIdx::from(i), source))?;
            }
            debug!("{}: {} embeddings", self.names[i], total);
            counts.push(total);
        }

        self.embeddings = Some(counts);
        Ok(())
    }
}

fn pattern_names<G: GraphMeta>(patterns: &[G], override_names: bool) -> Vec<String> {
    let mut counter = 0usize;
    patterns
        .iter()
        .map(|pattern| match pattern.name().filter(|name| !name.is_empty()) {
            Some(name) if !override_names => name.to_owned(),
            _ => {
                let name = counter.to_string();
                counter += 1;
                name
            }
        })
        .collect()
}

fn database_names<G: GraphMeta>(database: &[G]) -> Vec<String> {
    database
        .iter()
        .enumerate()
        .map(|(index, graph)| {
            graph
                .name()
                .filter(|name| !name.is_empty())
                .map_or_else(|| format!("g{index}"), str::to_owned)
        })
        .collect()
}
