use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use ts_rs::TS;
use utoipa::ToSchema;

/// Role
///
/// The closed set of personas the dashboard knows how to render. Every downstream
/// component (registry, gate, shell) works on this enumeration; raw claim strings
/// never travel past `resolve_effective_role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum Role {
    Teacher,
    Principal,
    Student,
    Parent,
    Administrator,
    FamilySpace,
}

/// RolePriorityOrder
///
/// Most-privileged first. Oversight roles win over dependent ones when an identity
/// holds several claims (a teacher who is also a parent renders as a teacher).
pub const ROLE_PRIORITY: [Role; 6] = [
    Role::Administrator,
    Role::Principal,
    Role::Teacher,
    Role::Student,
    Role::Parent,
    Role::FamilySpace,
];

/// RoleClaimSet
///
/// Raw, untrusted claim strings exactly as the identity source issued them.
pub type RoleClaimSet = BTreeSet<String>;

impl Role {
    /// Canonical claim name, also the JSON representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Teacher => "teacher",
            Role::Principal => "principal",
            Role::Student => "student",
            Role::Parent => "parent",
            Role::Administrator => "administrator",
            Role::FamilySpace => "familySpace",
        }
    }

    /// Position in `ROLE_PRIORITY`. Also used as a dense table index.
    pub fn rank(&self) -> usize {
        match self {
            Role::Administrator => 0,
            Role::Principal => 1,
            Role::Teacher => 2,
            Role::Student => 3,
            Role::Parent => 4,
            Role::FamilySpace => 5,
        }
    }

    /// from_claim
    ///
    /// Normalizes one claim string into a Role. Accepts the canonical names, the
    /// identity service's establishment roles (`admin_staff`), the identity
    /// provider's realm flag (`ROLE_ADMIN`) and the legacy UI role names.
    /// Returns `None` for anything else; unknown claims are not an error.
    pub fn from_claim(claim: &str) -> Option<Role> {
        match claim.trim() {
            "teacher" | "enseignant" => Some(Role::Teacher),
            "principal" | "admin_staff" | "directeur" => Some(Role::Principal),
            "student" | "eleve" => Some(Role::Student),
            "parent" => Some(Role::Parent),
            "administrator" | "administrateur" | "ROLE_ADMIN" => Some(Role::Administrator),
            "familySpace" | "espaceFamille" => Some(Role::FamilySpace),
            _ => None,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        let is_teacher = *self == Role::Teacher;
        let is_principal = *self == Role::Principal;
        Capabilities {
            can_create_lesson: is_teacher || is_principal,
            can_manage_resources: is_teacher || is_principal,
            is_teacher,
            is_principal,
            is_student: *self == Role::Student,
            is_parent: *self == Role::Parent,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capabilities
///
/// Coarse feature switches derived from the effective role, read by leaf views
/// to show or hide authoring actions. Not used for route authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Capabilities {
    pub can_create_lesson: bool,
    pub can_manage_resources: bool,
    pub is_teacher: bool,
    pub is_principal: bool,
    pub is_student: bool,
    pub is_parent: bool,
}

/// resolve_effective_role
///
/// Picks the single Role that governs rendering: the first entry of
/// `ROLE_PRIORITY` present among the claims. Unknown claims are skipped (and
/// logged); no known claim at all yields `None`.
pub fn resolve_effective_role(claims: &RoleClaimSet) -> Option<Role> {
    let mut known = HashSet::with_capacity(claims.len());
    for claim in claims {
        match Role::from_claim(claim) {
            Some(role) => {
                known.insert(role);
            }
            None => tracing::warn!(claim = %claim, "Ignoring unrecognized role claim"),
        }
    }

    ROLE_PRIORITY.into_iter().find(|role| known.contains(role))
}
