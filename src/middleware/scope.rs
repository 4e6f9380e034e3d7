//! Scope-based authorization.
//!
//! Coarse-grained capability check: a token's `scopes` claim is matched
//! against the scope a tool requires. The `admin` scope satisfies any
//! requirement.

use crate::middleware::auth::Claims;
use crate::types::{Error, Result};
use serde_json::Value;

/// Scope that bypasses any required-scope check.
pub const ADMIN_SCOPE: &str = "admin";

/// Check a token's scopes against a tool's required scope.
///
/// A scopes claim that is present but not an array of strings is malformed
/// (403). A tool with no required scope admits any verified token.
pub fn check(claims: &Claims, required_scope: Option<&str>) -> Result<()> {
    let scopes = parse_scopes(claims.scopes.as_ref())?;

    let Some(required) = required_scope else {
        return Ok(());
    };

    if scopes.iter().any(|&s| s == ADMIN_SCOPE || s == required) {
        Ok(())
    } else {
        Err(Error::forbidden(format!(
            "Insufficient scope, required: {}, NOT AUTHORIZED",
            required
        )))
    }
}

/// Scopes claim as a string list; absent means no scopes granted.
fn parse_scopes(raw: Option<&Value>) -> Result<Vec<&str>> {
    match raw {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .ok_or_else(|| Error::forbidden("Scope malformed, NOT AUTHORIZED"))
            })
            .collect(),
        Some(_) => Err(Error::forbidden("Scope malformed, NOT AUTHORIZED")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims_with_scopes(scopes: Option<Value>) -> Claims {
        Claims {
            sub: Some("agent-1".to_string()),
            exp: u64::MAX,
            iss: None,
            scopes,
        }
    }

    #[test]
    fn no_required_scope_admits_any_verified_token() {
        let claims = claims_with_scopes(None);
        assert!(check(&claims, None).is_ok());

        let claims = claims_with_scopes(Some(json!(["tool:read"])));
        assert!(check(&claims, None).is_ok());
    }

    #[test]
    fn matching_scope_is_authorized() {
        let claims = claims_with_scopes(Some(json!(["tool:read", "tool:health"])));
        assert!(check(&claims, Some("tool:health")).is_ok());
    }

    #[test]
    fn admin_scope_bypasses_any_requirement() {
        let claims = claims_with_scopes(Some(json!(["admin"])));
        assert!(check(&claims, Some("tool:checkout_order")).is_ok());
    }

    #[test]
    fn missing_scope_is_forbidden() {
        let claims = claims_with_scopes(Some(json!(["tool:x"])));
        let err = check(&claims, Some("tool:y")).unwrap_err();
        assert_eq!(err.status_code(), 403);
        assert!(err.to_string().contains("tool:y"));
    }

    #[test]
    fn absent_scopes_claim_grants_nothing() {
        let claims = claims_with_scopes(None);
        let err = check(&claims, Some("tool:read")).unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[test]
    fn malformed_scopes_claim_is_forbidden() {
        for scopes in [json!("tool:read"), json!(7), json!({"a": 1}), json!(["ok", 3])] {
            let claims = claims_with_scopes(Some(scopes));
            let err = check(&claims, Some("tool:read")).unwrap_err();
            assert_eq!(err.status_code(), 403);
            assert!(err.to_string().contains("malformed"));
        }
    }

    #[test]
    fn malformed_scopes_fail_even_without_a_requirement() {
        let claims = claims_with_scopes(Some(json!("tool:read")));
        assert_eq!(check(&claims, None).unwrap_err().status_code(), 403);
    }
}
