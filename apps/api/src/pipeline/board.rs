use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Columns of the application board, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Applied,
    Screening,
    Interview,
    Offer,
    Hired,
    Rejected,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Applied,
        Stage::Screening,
        Stage::Interview,
        Stage::Offer,
        Stage::Hired,
        Stage::Rejected,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub candidate_key: String,
    #[serde(default)]
    pub name: String,
    pub stage: Stage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub stage: Stage,
    pub applications: Vec<Application>,
}

#[derive(Debug, Error, PartialEq)]
pub enum BoardError {
    #[error("No application for candidate '{0}'")]
    NotFound(String),
}

/// One column per stage, empty ones included. Cards keep their input order.
pub fn group_by_stage(applications: &[Application]) -> Vec<Column> {
    Stage::ALL
        .iter()
        .map(|&stage| Column {
            stage,
            applications: applications
                .iter()
                .filter(|a| a.stage == stage)
                .cloned()
                .collect(),
        })
        .collect()
}

/// Drop handler: returns a copy of the board with one card moved to `stage`.
/// Any stage may move to any other; dropping on the same column is a no-op.
pub fn move_application(
    applications: &[Application],
    candidate_key: &str,
    stage: Stage,
) -> Result<Vec<Application>, BoardError> {
    if !applications.iter().any(|a| a.candidate_key == candidate_key) {
        return Err(BoardError::NotFound(candidate_key.to_string()));
    }

    Ok(applications
        .iter()
        .map(|a| {
            if a.candidate_key == candidate_key {
                Application {
                    stage,
                    ..a.clone()
                }
            } else {
                a.clone()
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(key: &str, stage: Stage) -> Application {
        Application {
            candidate_key: key.to_string(),
            name: key.to_uppercase(),
            stage,
        }
    }

    #[test]
    fn test_group_includes_every_stage_in_order() {
        let columns = group_by_stage(&[]);
        let stages: Vec<Stage> = columns.iter().map(|c| c.stage).collect();
        assert_eq!(stages, Stage::ALL.to_vec());
        assert!(columns.iter().all(|c| c.applications.is_empty()));
    }

    #[test]
    fn test_group_preserves_card_order() {
        let apps = vec![
            app("a", Stage::Interview),
            app("b", Stage::Applied),
            app("c", Stage::Interview),
        ];
        let columns = group_by_stage(&apps);
        let interview = &columns[2];
        assert_eq!(interview.stage, Stage::Interview);
        let keys: Vec<&str> = interview
            .applications
            .iter()
            .map(|a| a.candidate_key.as_str())
            .collect();
        assert_eq!(keys, vec!["a", "c"]);
        assert_eq!(columns[0].applications.len(), 1);
    }

    #[test]
    fn test_move_changes_only_target() {
        let apps = vec![app("a", Stage::Applied), app("b", Stage::Applied)];
        let moved = move_application(&apps, "b", Stage::Offer).unwrap();
        assert_eq!(moved[0].stage, Stage::Applied);
        assert_eq!(moved[1].stage, Stage::Offer);
        assert_eq!(moved[1].name, "B");
        // Original untouched.
        assert_eq!(apps[1].stage, Stage::Applied);
    }

    #[test]
    fn test_move_to_same_stage_is_noop() {
        let apps = vec![app("a", Stage::Screening)];
        assert_eq!(move_application(&apps, "a", Stage::Screening).unwrap(), apps);
    }

    #[test]
    fn test_move_out_of_rejected_is_allowed() {
        let apps = vec![app("a", Stage::Rejected)];
        let moved = move_application(&apps, "a", Stage::Screening).unwrap();
        assert_eq!(moved[0].stage, Stage::Screening);
    }

    #[test]
    fn test_move_unknown_key_errors() {
        let apps = vec![app("a", Stage::Applied)];
        assert_eq!(
            move_application(&apps, "zzz", Stage::Hired),
            Err(BoardError::NotFound("zzz".to_string()))
        );
    }
}
