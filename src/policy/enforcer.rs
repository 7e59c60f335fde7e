//! Policy resolution and enforcement.

use std::sync::Arc;

use crate::error::RouterError;
use crate::pipeline::RequestContext;
use crate::policy::Policy;
use crate::registry::Registry;

/// Find `policy` in the registry and make sure it answers to `method`.
pub fn resolve(registry: &Registry, policy: &str, method: &str) -> Result<Arc<dyn Policy>, RouterError> {
    let resolved = registry.resolve_policy(policy)?;
    if !resolved.supports(method) {
        return Err(RouterError::UnknownPolicyMethod {
            policy: policy.to_string(),
            method: method.to_string(),
        });
    }
    Ok(resolved)
}

/// Resolve and evaluate in one go.
///
/// `Ok(false)` is a denial; `Err` means the policy or method does not exist.
pub async fn enforce(
    registry: &Registry,
    policy: &str,
    method: &str,
    ctx: &RequestContext,
) -> Result<bool, RouterError> {
    let resolved = resolve(registry, policy, method)?;
    Ok(resolved.evaluate(method, ctx).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Method, Uri};
    use serde_json::json;
    use crate::http::response::Responder;
    use crate::pipeline::RouteInfo;
    use crate::policy::FnPolicy;

    fn ctx() -> RequestContext {
        let route = Arc::new(RouteInfo {
            method: Method::PUT,
            path: "/posts/{post}".into(),
            name: None,
        });
        RequestContext::new(Method::PUT, Uri::from_static("/posts/1"), route, Arc::new(Responder::default()))
    }

    fn registry() -> Registry {
        Registry::new().policy(
            "post",
            FnPolicy::new()
                .method("update", |ctx| ctx.input("author") == Some(&json!("ada")))
                .method("delete", |_| false),
        )
    }

    #[tokio::test]
    async fn test_allow_and_deny() {
        let registry = registry();
        let mut ctx = ctx();

        assert!(!enforce(&registry, "post", "update", &ctx).await.unwrap());
        ctx.data.insert("author".into(), json!("ada"));
        assert!(enforce(&registry, "post", "update", &ctx).await.unwrap());
        assert!(!enforce(&registry, "post", "delete", &ctx).await.unwrap());
    }

    #[tokio::test]
    async fn test_resolution_errors_are_not_denials() {
        let registry = registry();
        let ctx = ctx();

        assert!(matches!(
            enforce(&registry, "comment", "update", &ctx).await,
            Err(RouterError::Unresolved { kind: "policies", .. })
        ));
        assert!(matches!(
            enforce(&registry, "post", "publish", &ctx).await,
            Err(RouterError::UnknownPolicyMethod { .. })
        ));
    }
}
