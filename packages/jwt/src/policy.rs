//! Declarative authorization policies over verified claims.
//!
//! ```
//! use tollgate_jwt::{CommonConfig, Claims, PolicyBuilder, evaluate};
//!
//! let policy = PolicyBuilder::new()
//!     .base(CommonConfig::new("svc", "api"))
//!     .need_all(["read"])
//!     .roles_any(["admin", "user"])
//!     .where_(|claims| claims.get("tid").is_some())
//!     .build()
//!     .unwrap();
//!
//! let claims = Claims::builder()
//!     .subject("u1")
//!     .permissions(["read", "write"])
//!     .roles(["user"])
//!     .claim("tid", "t-1")
//!     .build();
//!
//! let decision = evaluate(&claims, &policy).unwrap();
//! assert_eq!(decision.subject.as_deref(), Some("u1"));
//! ```

use crate::{
    claims::Claims,
    config::CommonConfig,
    error::{JwtError, JwtResult},
};
use std::{collections::HashSet, fmt, sync::Arc};

/// Side-effect-free check over a verified payload.
pub type Predicate = Arc<dyn Fn(&Claims) -> bool + Send + Sync>;

/// Immutable policy produced by [`PolicyBuilder::build`].
#[derive(Clone, Default)]
pub struct PolicySpec {
    base: Option<CommonConfig>,
    require_all_permissions: Vec<String>,
    require_any_permission: Vec<String>,
    require_roles_all: Vec<String>,
    require_roles_any: Vec<String>,
    predicates: Vec<Predicate>,
}

impl PolicySpec {
    /// Verification settings attached with [`PolicyBuilder::base`]
    #[must_use]
    pub fn base(&self) -> Option<&CommonConfig> {
        self.base.as_ref()
    }

    /// Permissions that must all be present
    #[must_use]
    pub fn require_all_permissions(&self) -> &[String] {
        &self.require_all_permissions
    }

    /// Permissions of which at least one must be present
    #[must_use]
    pub fn require_any_permission(&self) -> &[String] {
        &self.require_any_permission
    }

    /// Roles that must all be present
    #[must_use]
    pub fn require_roles_all(&self) -> &[String] {
        &self.require_roles_all
    }

    /// Roles of which at least one must be present
    #[must_use]
    pub fn require_roles_any(&self) -> &[String] {
        &self.require_roles_any
    }

    /// Number of registered predicates
    #[must_use]
    pub fn predicate_count(&self) -> usize {
        self.predicates.len()
    }
}

impl fmt::Debug for PolicySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolicySpec")
            .field("base", &self.base)
            .field("require_all_permissions", &self.require_all_permissions)
            .field("require_any_permission", &self.require_any_permission)
            .field("require_roles_all", &self.require_roles_all)
            .field("require_roles_any", &self.require_roles_any)
            .field("predicates", &self.predicates.len())
            .finish()
    }
}

/// Accumulates a [`PolicySpec`]. Every method appends; nothing is replaced
/// except the base configuration.
#[derive(Debug, Clone, Default)]
pub struct PolicyBuilder {
    spec: PolicySpec,
}

fn extend<I, S>(target: &mut Vec<String>, items: I)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    target.extend(items.into_iter().map(Into::into));
}

impl PolicyBuilder {
    /// Empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the verification settings used by
    /// [`JwtEngine::check_auth`](crate::JwtEngine::check_auth).
    #[must_use]
    pub fn base(mut self, config: CommonConfig) -> Self {
        self.spec.base = Some(config);
        self
    }

    /// Require every listed permission.
    #[must_use]
    pub fn need_all<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        extend(&mut self.spec.require_all_permissions, permissions);
        self
    }

    /// Require at least one listed permission.
    #[must_use]
    pub fn need_any<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        extend(&mut self.spec.require_any_permission, permissions);
        self
    }

    /// Require every listed role.
    #[must_use]
    pub fn roles_all<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        extend(&mut self.spec.require_roles_all, roles);
        self
    }

    /// Require at least one listed role.
    #[must_use]
    pub fn roles_any<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        extend(&mut self.spec.require_roles_any, roles);
        self
    }

    /// Add a predicate. Predicates run in registration order after the set
    /// checks.
    #[must_use]
    pub fn where_<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Claims) -> bool + Send + Sync + 'static,
    {
        self.spec.predicates.push(Arc::new(predicate));
        self
    }

    /// Finish the policy.
    ///
    /// # Errors
    ///
    /// [`JwtError::InvalidPolicy`] if any permission or role name is empty.
    pub fn build(self) -> JwtResult<PolicySpec> {
        let spec = self.spec;
        for (category, names) in [
            ("need_all", &spec.require_all_permissions),
            ("need_any", &spec.require_any_permission),
            ("roles_all", &spec.require_roles_all),
            ("roles_any", &spec.require_roles_any),
        ] {
            if names.iter().any(|name| name.trim().is_empty()) {
                return Err(JwtError::invalid_policy(&format!("{category} contains an empty name")));
            }
        }
        Ok(spec)
    }
}

/// Successful authorization.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthDecision {
    /// `sub` claim
    pub subject: Option<String>,
    /// `permissions` claim, empty if absent
    pub permissions: Vec<String>,
    /// `roles` claim, empty if absent
    pub roles: Vec<String>,
    /// `jti` claim
    pub jti: Option<String>,
    /// Full verified payload
    pub payload: Claims,
}

fn has_all(held: &HashSet<&str>, required: &[String]) -> bool {
    required.iter().all(|r| held.contains(r.as_str()))
}

// An empty requirement list imposes nothing.
fn has_any(held: &HashSet<&str>, required: &[String]) -> bool {
    required.is_empty() || required.iter().any(|r| held.contains(r.as_str()))
}

/// Evaluate `policy` against a verified payload.
///
/// Categories are conjunctive. Returns `None` on any failure.
#[must_use]
pub fn evaluate(claims: &Claims, policy: &PolicySpec) -> Option<AuthDecision> {
    let permissions = claims.permissions();
    let roles = claims.roles();

    let held_permissions: HashSet<&str> = permissions.iter().map(String::as_str).collect();
    let held_roles: HashSet<&str> = roles.iter().map(String::as_str).collect();

    let sets_pass = has_all(&held_permissions, &policy.require_all_permissions)
        && has_any(&held_permissions, &policy.require_any_permission)
        && has_all(&held_roles, &policy.require_roles_all)
        && has_any(&held_roles, &policy.require_roles_any);
    if !sets_pass {
        tracing::debug!(
            sub = claims.sub().unwrap_or_default(),
            "policy denied: permissions or roles"
        );
        return None;
    }

    if !policy.predicates.iter().all(|predicate| predicate(claims)) {
        tracing::debug!(sub = claims.sub().unwrap_or_default(), "policy denied: predicate");
        return None;
    }

    Some(AuthDecision {
        subject: claims.sub().map(str::to_string),
        jti: claims.jti().map(str::to_string),
        permissions,
        roles,
        payload: claims.clone(),
    })
}
