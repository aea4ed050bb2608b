//! Wire types for the agent REST API.

use serde::{Deserialize, Serialize};

use hostrun_core::{CommandStatus, InstanceRecord, TargetId, TargetSelector};
use hostrun_dispatch::{BackendError, StatusReply};

/// Body of `POST /v1/instances/query`.
#[derive(Debug, Clone, Serialize)]
pub struct QueryInstancesRequest {
    pub filters: Vec<FilterDto>,
}

impl From<&TargetSelector> for QueryInstancesRequest {
    fn from(selector: &TargetSelector) -> Self {
        Self {
            filters: selector
                .filters
                .iter()
                .map(|f| FilterDto {
                    key: f.key.clone(),
                    value: f.value.clone(),
                })
                .collect(),
        }
    }
}

/// One equality filter on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct FilterDto {
    pub key: String,
    pub value: String,
}

/// Response of `POST /v1/instances/query`.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryInstancesResponse {
    pub instances: Vec<InstanceDto>,
}

/// One instance record on the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct InstanceDto {
    pub id: String,
    pub private_address: String,
    #[serde(default)]
    pub public_address: Option<String>,
}

impl From<InstanceDto> for InstanceRecord {
    fn from(dto: InstanceDto) -> Self {
        Self {
            id: TargetId::new(dto.id),
            private_address: dto.private_address,
            public_address: dto.public_address,
        }
    }
}

/// Body of `POST /v1/commands`.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitCommandRequest<'a> {
    pub target_id: &'a str,
    pub commands: &'a [String],
}

/// Response of `POST /v1/commands`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitCommandResponse {
    pub command_id: String,
}

/// Response of `GET /v1/commands/{command_id}/invocations/{target_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct InvocationDto {
    pub status: String,
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
}

impl InvocationDto {
    /// Convert the wire status into a domain status snapshot.
    pub fn into_reply(self) -> Result<StatusReply, BackendError> {
        let status = parse_status(&self.status)
            .ok_or_else(|| BackendError::Protocol(format!("unknown status '{}'", self.status)))?;
        Ok(StatusReply {
            status,
            stdout: self.stdout,
            stderr: self.stderr,
        })
    }
}

/// Map the agent's status strings onto the domain status set.
///
/// `Delayed` is a pending-equivalent the agent reports while the target is
/// slow to pick the command up.
fn parse_status(status: &str) -> Option<CommandStatus> {
    match status {
        "Pending" | "Delayed" => Some(CommandStatus::Pending),
        "InProgress" => Some(CommandStatus::InProgress),
        "Success" => Some(CommandStatus::Success),
        "Failed" => Some(CommandStatus::Failed),
        "Cancelled" => Some(CommandStatus::Cancelled),
        "TimedOut" => Some(CommandStatus::TimedOut),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_statuses() {
        assert_eq!(parse_status("Pending"), Some(CommandStatus::Pending));
        assert_eq!(parse_status("Delayed"), Some(CommandStatus::Pending));
        assert_eq!(parse_status("InProgress"), Some(CommandStatus::InProgress));
        assert_eq!(parse_status("Success"), Some(CommandStatus::Success));
        assert_eq!(parse_status("TimedOut"), Some(CommandStatus::TimedOut));
        assert_eq!(parse_status("Rebooting"), None);
    }

    #[test]
    fn test_unknown_status_is_protocol_error() {
        let dto = InvocationDto {
            status: "Exploded".to_string(),
            stdout: String::new(),
            stderr: String::new(),
        };
        assert!(matches!(
            dto.into_reply(),
            Err(BackendError::Protocol(_))
        ));
    }

    #[test]
    fn test_invocation_decodes_with_missing_streams() {
        let dto: InvocationDto =
            serde_json::from_str(r#"{"status": "InProgress"}"#).unwrap();
        let reply = dto.into_reply().unwrap();
        assert_eq!(reply.status, CommandStatus::InProgress);
        assert!(reply.stdout.is_empty());
    }

    #[test]
    fn test_query_request_mirrors_selector() {
        let selector = TargetSelector::new()
            .name_tag("alpha")
            .lifecycle_state("running");
        let request = QueryInstancesRequest::from(&selector);

        assert_eq!(request.filters.len(), 2);
        assert_eq!(request.filters[0].key, "tag:Name");
        assert_eq!(request.filters[1].value, "running");
    }
}
