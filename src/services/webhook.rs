//! Webhook delivery verification and decoding.

use hmac::{Hmac, Mac};
use sha1::Sha1;
use subtle::ConstantTimeEq;

use crate::data::types::{IssuePayload, PullRequestPayload};
use crate::data::{HookEvent, HookTarget};
use crate::error::WebhookError;

type HmacSha1 = Hmac<Sha1>;

const SIGNATURE_PREFIX: &str = "sha1=";

/// Check the `X-Hub-Signature` header against the raw body.
///
/// Without a secret every delivery is accepted.
pub fn verify_signature(
    header: Option<&str>,
    body: &[u8],
    secret: Option<&[u8]>,
) -> Result<(), WebhookError> {
    let Some(secret) = secret else {
        return Ok(());
    };

    let header = header.unwrap_or_default();
    let Some(got) = header.strip_prefix(SIGNATURE_PREFIX) else {
        return Err(WebhookError::UnknownAlgorithm(header.to_string()));
    };
    let got = hex::decode(got).map_err(|_| WebhookError::BadSignature)?;

    let mut mac = HmacSha1::new_from_slice(secret).map_err(|_| WebhookError::BadSignature)?;
    mac.update(body);
    let wants = mac.finalize().into_bytes();

    if bool::from(wants.as_slice().ct_eq(&got)) {
        Ok(())
    } else {
        Err(WebhookError::BadSignature)
    }
}

/// Find the issue a delivery of kind `event` (the `X-GitHub-Event` header)
/// refers to.
pub fn extract_target(event: &str, body: &[u8]) -> Result<HookTarget, WebhookError> {
    let kind: HookEvent = event.parse().map_err(WebhookError::UnknownEvent)?;
    let event = kind.to_str();

    match kind {
        HookEvent::IssueComment | HookEvent::Issues => {
            let data: IssuePayload = serde_json::from_slice(body)
                .map_err(|source| WebhookError::Decode { event, source })?;
            let installation = data
                .installation
                .ok_or(WebhookError::MissingField {
                    event,
                    field: "installation",
                })?;
            let repo = data
                .issue
                .repository
                .or(data.repository)
                .ok_or(WebhookError::MissingField {
                    event,
                    field: "repository",
                })?;
            Ok(HookTarget {
                installation: installation.id,
                repo: repo.into(),
                number: data.issue.number,
            })
        }
        HookEvent::PullRequest => {
            let data: PullRequestPayload = serde_json::from_slice(body)
                .map_err(|source| WebhookError::Decode { event, source })?;
            let installation = data
                .installation
                .ok_or(WebhookError::MissingField {
                    event,
                    field: "installation",
                })?;
            let repo = data.repository.ok_or(WebhookError::MissingField {
                event,
                field: "repository",
            })?;
            Ok(HookTarget {
                installation: installation.id,
                repo: repo.into(),
                number: data.pull_request.number,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Repository;

    const BODY: &[u8] = b"The quick brown fox jumps over the lazy dog";
    const SIGNATURE: &str = "sha1=de7c9b85b8b78aa6bc8a7a36f70a90701c9db4d9";

    #[test]
    fn valid_signature_is_accepted() {
        assert!(verify_signature(Some(SIGNATURE), BODY, Some(b"key")).is_ok());
    }

    #[test]
    fn missing_secret_skips_verification() {
        assert!(verify_signature(None, BODY, None).is_ok());
    }

    #[test]
    fn tampered_body_is_rejected() {
        let err = verify_signature(Some(SIGNATURE), b"the quick brown fox", Some(b"key"));
        assert!(matches!(err, Err(WebhookError::BadSignature)));

        let err = verify_signature(Some("sha1=zz"), BODY, Some(b"key"));
        assert!(matches!(err, Err(WebhookError::BadSignature)));
    }

    #[test]
    fn unknown_algorithm_is_rejected() {
        let err = verify_signature(Some("sha256=abcd"), BODY, Some(b"key"));
        assert!(matches!(err, Err(WebhookError::UnknownAlgorithm(_))));

        let err = verify_signature(None, BODY, Some(b"key"));
        assert!(matches!(err, Err(WebhookError::UnknownAlgorithm(_))));
    }

    #[test]
    fn issue_comment_points_at_its_issue() {
        let body = br#"{
            "action": "created",
            "installation": {"id": 99},
            "issue": {"number": 12, "title": "x"},
            "comment": {"body": "deadline 2024/01/01"},
            "repository": {"name": "engine", "owner": {"login": "src-d"}}
        }"#;
        let target = extract_target("issue_comment", body).unwrap();
        assert_eq!(
            target,
            HookTarget {
                installation: 99,
                repo: Repository::new("src-d", "engine"),
                number: 12,
            }
        );
    }

    #[test]
    fn issue_repository_takes_precedence() {
        let body = br#"{
            "installation": {"id": 1},
            "issue": {"number": 3, "repository": {"name": "a", "owner": {"login": "o"}}},
            "repository": {"name": "b", "owner": {"login": "o"}}
        }"#;
        let target = extract_target("issues", body).unwrap();
        assert_eq!(target.repo, Repository::new("o", "a"));
    }

    #[test]
    fn pull_request_uses_the_base_repository() {
        let body = br#"{
            "installation": {"id": 5},
            "number": 8,
            "pull_request": {"number": 8, "head": {"repo": {"name": "fork", "owner": {"login": "me"}}}},
            "repository": {"name": "engine", "owner": {"login": "src-d"}}
        }"#;
        let target = extract_target("pull_request", body).unwrap();
        assert_eq!(target.repo, Repository::new("src-d", "engine"));
        assert_eq!(target.number, 8);
    }

    #[test]
    fn bad_deliveries_are_reported() {
        assert!(matches!(
            extract_target("push", b"{}"),
            Err(WebhookError::UnknownEvent(kind)) if kind == "push"
        ));
        assert!(matches!(
            extract_target("issues", b"not json"),
            Err(WebhookError::Decode { .. })
        ));
        assert!(matches!(
            extract_target("issues", br#"{"issue": {"number": 1}}"#),
            Err(WebhookError::MissingField { field: "installation", .. })
        ));
    }
}
