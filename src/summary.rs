use crate::types::{Artifact, ArtifactList, ArtifactSummary, ArtifactsSummary, WorkflowRunSummary};

/// Project a raw artifacts page down to the fields the action reports.
///
/// `total_count` is copied from the response, so it counts every artifact
/// matching the query rather than just the ones on this page.
pub fn summarize_artifacts(list: &ArtifactList) -> ArtifactsSummary {
    ArtifactsSummary {
        total_count: list.total_count,
        artifacts: list.artifacts.iter().map(summarize_artifact).collect(),
    }
}

pub fn summarize_artifact(artifact: &Artifact) -> ArtifactSummary {
    ArtifactSummary {
        id: artifact.id,
        name: artifact.name.clone(),
        size_in_bytes: artifact.size_in_bytes,
        expired: artifact.expired,
        created_at: artifact.created_at,
        expires_at: artifact.expires_at,
        archive_download_url: artifact.archive_download_url.clone(),
        workflow_run: artifact.workflow_run.as_ref().map(|run| WorkflowRunSummary {
            id: run.id,
            head_branch: run.head_branch.clone(),
            head_sha: run.head_sha.clone(),
        }),
    }
}
