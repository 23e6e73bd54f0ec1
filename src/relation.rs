//! Publishing an [`Evaluation`] through the host.
//!
//! The host owns the lifecycle: it calls [`update`] whenever the configuration
//! or a `profiling-endpoint` relation changes. Only the leader writes the
//! relation data, which is shared by all units of the application.

use crate::config::ScrapeTargetOptions;
use crate::scrape::{evaluate, Evaluation};
use crate::status::Status;
use crate::topology::Topology;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info};

pub const RELATION_NAME: &str = "profiling-endpoint";
pub const SCRAPE_JOBS_KEY: &str = "scrape_jobs";
pub const SCRAPE_METADATA_KEY: &str = "scrape_metadata";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelationId(pub usize);

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("unable to serialize `{key}`")]
    Serialize {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// The operations the host exposes to this unit.
pub trait Host {
    fn is_leader(&self) -> bool;

    fn set_status(&mut self, status: &Status);

    /// The ids of all relations established under the endpoint `name`.
    fn relation_ids(&self, name: &str) -> Vec<RelationId>;

    /// Sets `key` in the application data bag of a relation. An empty value
    /// removes the key.
    fn set_app_data(&mut self, relation: RelationId, key: &str, value: String);
}

/// Evaluates the options, reports the status and, on the leader, publishes
/// the scrape jobs to every `profiling-endpoint` relation.
///
/// When there is no job to publish, both keys are cleared so that a previously
/// published job is withdrawn.
pub fn update(
    host: &mut impl Host,
    options: &ScrapeTargetOptions,
    topology: &Topology,
) -> Result<Evaluation, PublishError> {
    let evaluation = evaluate(options);

    let status = evaluation.status();
    host.set_status(&status);

    if !host.is_leader() {
        debug!("Not the leader, leaving relation data untouched");
        return Ok(evaluation);
    }

    let (scrape_jobs, scrape_metadata) = if evaluation.job.is_some() {
        (
            to_json(SCRAPE_JOBS_KEY, evaluation.scrape_jobs())?,
            to_json(SCRAPE_METADATA_KEY, topology)?,
        )
    } else {
        (String::new(), String::new())
    };

    let relations = host.relation_ids(RELATION_NAME);
    info!(
        relations = relations.len(),
        %status,
        "Publishing scrape jobs"
    );

    for relation in relations {
        host.set_app_data(relation, SCRAPE_METADATA_KEY, scrape_metadata.clone());
        host.set_app_data(relation, SCRAPE_JOBS_KEY, scrape_jobs.clone());
    }

    Ok(evaluation)
}

fn to_json<T: serde::Serialize + ?Sized>(
    key: &'static str,
    value: &T,
) -> Result<String, PublishError> {
    serde_json::to_string(value).map_err(|source| PublishError::Serialize { key, source })
}

#[derive(Debug, Clone)]
struct Relation {
    name: String,
    app_data: BTreeMap<String, String>,
}

/// A host that keeps everything in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    leader: bool,
    status: Option<Status>,
    relations: BTreeMap<RelationId, Relation>,
}

impl MemoryHost {
    pub fn new(leader: bool) -> Self {
        Self {
            leader,
            ..Default::default()
        }
    }

    pub fn set_leader(&mut self, leader: bool) {
        self.leader = leader;
    }

    /// Establishes a new relation under the endpoint `name`.
    pub fn add_relation(&mut self, name: impl Into<String>) -> RelationId {
        let id = RelationId(self.relations.len());
        self.relations.insert(
            id,
            Relation {
                name: name.into(),
                app_data: BTreeMap::new(),
            },
        );
        id
    }

    /// The application data bag of a relation, `None` if it does not exist.
    pub fn app_data(&self, relation: RelationId) -> Option<&BTreeMap<String, String>> {
        self.relations.get(&relation).map(|relation| &relation.app_data)
    }

    /// The last status reported, `None` if no status was reported yet.
    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }
}

impl Host for MemoryHost {
    fn is_leader(&self) -> bool {
        self.leader
    }

    fn set_status(&mut self, status: &Status) {
        self.status = Some(status.clone());
    }

    fn relation_ids(&self, name: &str) -> Vec<RelationId> {
        self.relations
            .iter()
            .filter(|(_, relation)| relation.name == name)
            .map(|(id, _)| *id)
            .collect()
    }

    fn set_app_data(&mut self, relation: RelationId, key: &str, value: String) {
        let Some(relation) = self.relations.get_mut(&relation) else {
            return;
        };

        if value.is_empty() {
            relation.app_data.remove(key);
        } else {
            relation.app_data.insert(key.to_string(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn memory_host_removes_empty_values() {
        let mut host = MemoryHost::new(true);
        let relation = host.add_relation(RELATION_NAME);

        host.set_app_data(relation, "key", "value".to_string());
        assert_eq!(
            Some(&"value".to_string()),
            host.app_data(relation).unwrap().get("key")
        );

        host.set_app_data(relation, "key", String::new());
        assert!(host.app_data(relation).unwrap().is_empty());
    }

    #[test]
    fn memory_host_filters_relations_by_name() {
        let mut host = MemoryHost::new(true);
        let first = host.add_relation(RELATION_NAME);
        host.add_relation("tracing");
        let second = host.add_relation(RELATION_NAME);

        assert_eq!(vec![first, second], host.relation_ids(RELATION_NAME));
        assert_eq!(None, host.app_data(RelationId(42)));
    }
}
