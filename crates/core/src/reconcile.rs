//! Orphan file reconciliation planner.
//!
//! A repair utility, not a runtime code path: `project_files.project_id` is
//! a strict foreign key, so orphans only arise from legacy imports where the
//! association was lost. The planner maps each orphan to its customer's
//! first project (ascending creation order, id as tiebreak) and rewrites the
//! stored path into that project's upload folder. First-match-wins: a file
//! is never associated with more than one project in a run, and re-running
//! over already-associated files is a no-op by construction since they no
//! longer appear in the orphan set.

use std::collections::HashMap;

use serde::Serialize;

use crate::naming::project_upload_path;
use crate::types::{DbId, Timestamp};

/// The project fields the planner needs.
#[derive(Debug, Clone)]
pub struct ProjectRef {
    pub id: DbId,
    pub customer_id: DbId,
    pub folder_number: String,
    pub created_at: Timestamp,
}

/// An orphaned file row (`project_id IS NULL`).
#[derive(Debug, Clone)]
pub struct OrphanFile {
    pub id: DbId,
    pub customer_id: DbId,
    pub name: String,
}

/// One planned file-to-project association.
#[derive(Debug, Clone, Serialize)]
pub struct Association {
    pub file_id: DbId,
    pub project_id: DbId,
    pub new_path: String,
}

/// The outcome of a planning pass.
#[derive(Debug, Clone, Serialize)]
pub struct ReconcilePlan {
    pub associations: Vec<Association>,
    /// Files with no project for their customer; left orphaned and reported.
    pub unmatched: Vec<DbId>,
}

impl ReconcilePlan {
    pub fn associated_count(&self) -> usize {
        self.associations.len()
    }
}

/// Plan associations for a set of orphan files.
///
/// For each orphan, the target is the earliest-created project owned by the
/// same customer. Output order follows the input orphan order, so applying
/// the plan is deterministic.
pub fn plan_associations(projects: &[ProjectRef], orphans: &[OrphanFile]) -> ReconcilePlan {
    // Earliest project per customer, by (created_at, id) ascending.
    let mut first_project: HashMap<DbId, &ProjectRef> = HashMap::new();
    for project in projects {
        first_project
            .entry(project.customer_id)
            .and_modify(|current| {
                if (project.created_at, project.id) < (current.created_at, current.id) {
                    *current = project;
                }
            })
            .or_insert(project);
    }

    let mut associations = Vec::new();
    let mut unmatched = Vec::new();

    for file in orphans {
        match first_project.get(&file.customer_id) {
            Some(project) => associations.push(Association {
                file_id: file.id,
                project_id: project.id,
                new_path: project_upload_path(&project.folder_number, &file.name),
            }),
            None => unmatched.push(file.id),
        }
    }

    ReconcilePlan {
        associations,
        unmatched,
    }
}
