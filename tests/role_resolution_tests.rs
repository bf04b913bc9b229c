use dashboard_gate::role::{ROLE_PRIORITY, Role, RoleClaimSet, resolve_effective_role};

// --- Helpers ---

fn claims(values: &[&str]) -> RoleClaimSet {
    values.iter().map(|v| v.to_string()).collect()
}

// --- Tests ---

#[test]
fn test_priority_order_covers_every_role_once() {
    let all = [
        Role::Teacher,
        Role::Principal,
        Role::Student,
        Role::Parent,
        Role::Administrator,
        Role::FamilySpace,
    ];
    for role in all {
        let occurrences = ROLE_PRIORITY.iter().filter(|r| **r == role).count();
        assert_eq!(occurrences, 1, "{role} must appear exactly once");
    }
    for (index, role) in ROLE_PRIORITY.iter().enumerate() {
        assert_eq!(role.rank(), index);
    }
}

#[test]
fn test_highest_priority_member_wins_for_every_subset() {
    // Every non-empty subset of the known roles (bitmask over ROLE_PRIORITY).
    for mask in 1u32..(1 << ROLE_PRIORITY.len()) {
        let members: Vec<Role> = ROLE_PRIORITY
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, r)| *r)
            .collect();
        let set: RoleClaimSet = members.iter().map(|r| r.as_str().to_string()).collect();

        let expected = members.iter().min_by_key(|r| r.rank()).copied();
        assert_eq!(resolve_effective_role(&set), expected, "mask {mask:#08b}");
    }
}

#[test]
fn test_insertion_order_does_not_matter() {
    let forward = claims(&["parent", "teacher", "student"]);
    let backward = claims(&["student", "teacher", "parent"]);
    assert_eq!(resolve_effective_role(&forward), Some(Role::Teacher));
    assert_eq!(resolve_effective_role(&backward), Some(Role::Teacher));
}

#[test]
fn test_teacher_and_parent_resolve_to_teacher() {
    assert_eq!(
        resolve_effective_role(&claims(&["teacher", "parent"])),
        Some(Role::Teacher)
    );
}

#[test]
fn test_empty_claims_resolve_to_none() {
    assert_eq!(resolve_effective_role(&RoleClaimSet::new()), None);
}

#[test]
fn test_unknown_claims_are_ignored() {
    assert_eq!(resolve_effective_role(&claims(&["unknown-claim"])), None);
    assert_eq!(
        resolve_effective_role(&claims(&["offline_access", "uma_authorization"])),
        None
    );
    assert_eq!(
        resolve_effective_role(&claims(&["unknown-claim", "familySpace"])),
        Some(Role::FamilySpace)
    );
}

#[test]
fn test_resolution_is_idempotent() {
    let set = claims(&["principal", "student", "bogus"]);
    let first = resolve_effective_role(&set);
    let second = resolve_effective_role(&set);
    assert_eq!(first, second);
    assert_eq!(first, Some(Role::Principal));
}

#[test]
fn test_identity_service_and_legacy_aliases() {
    assert_eq!(Role::from_claim("admin_staff"), Some(Role::Principal));
    assert_eq!(Role::from_claim("ROLE_ADMIN"), Some(Role::Administrator));
    assert_eq!(Role::from_claim("enseignant"), Some(Role::Teacher));
    assert_eq!(Role::from_claim("eleve"), Some(Role::Student));
    assert_eq!(Role::from_claim("espaceFamille"), Some(Role::FamilySpace));
    assert_eq!(Role::from_claim(" parent "), Some(Role::Parent));

    // Matching is exact apart from surrounding whitespace.
    assert_eq!(Role::from_claim("Teacher"), None);
    assert_eq!(Role::from_claim("familyspace"), None);
    assert_eq!(Role::from_claim(""), None);
}

#[test]
fn test_realm_admin_flag_outranks_establishment_role() {
    let set = claims(&["teacher", "ROLE_ADMIN"]);
    assert_eq!(resolve_effective_role(&set), Some(Role::Administrator));
}

#[test]
fn test_capabilities_follow_role() {
    let teacher = Role::Teacher.capabilities();
    assert!(teacher.can_create_lesson && teacher.can_manage_resources && teacher.is_teacher);

    let principal = Role::Principal.capabilities();
    assert!(principal.can_create_lesson && principal.is_principal);

    let parent = Role::Parent.capabilities();
    assert!(!parent.can_create_lesson && !parent.can_manage_resources && parent.is_parent);

    let admin = Role::Administrator.capabilities();
    assert!(!admin.can_create_lesson && !admin.is_teacher && !admin.is_student);
}
