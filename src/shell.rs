use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::{
    gate::RenderMode,
    models::UserProfile,
    navigation::{MenuEntry, Registry, RouteMatch, RouteTarget},
    role::Role,
    session::{Identity, Session},
};

// --- Layout pieces ---

/// TopBar
///
/// Persistent header: who is signed in and the navbar subset of the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TopBar {
    pub display_name: String,
    pub initials: String,
    pub avatar_url: String,
    pub navbar: Vec<MenuEntry>,
}

/// SideMenu
///
/// Collapsible menu. `open` is local UI state only: collapsing it never
/// changes which routes are reachable by direct navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SideMenu {
    pub open: bool,
    pub items: Vec<MenuEntry>,
}

impl SideMenu {
    pub fn toggle(&mut self) {
        self.open = !self.open;
    }
}

/// Shell
///
/// The dashboard layout for an authorized session: top bar, side menu and the
/// routed view in the content outlet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Shell {
    pub role: Role,
    pub profile: UserProfile,
    pub top_bar: TopBar,
    pub side_menu: SideMenu,
    pub outlet: RouteMatch,
}

// --- Profile ---

struct Placeholder {
    name: &'static str,
    department: Option<&'static str>,
    specialty: Option<&'static str>,
    status: Option<&'static str>,
}

fn placeholder(role: Role) -> Placeholder {
    match role {
        Role::Teacher => Placeholder {
            name: "Demo Teacher",
            department: Some("Sciences"),
            specialty: Some("Mathematics"),
            status: Some("Tenured"),
        },
        Role::Principal => Placeholder {
            name: "Demo Principal",
            department: Some("Administration"),
            specialty: None,
            status: Some("Principal"),
        },
        Role::Student => Placeholder {
            name: "Demo Student",
            department: None,
            specialty: None,
            status: Some("Enrolled"),
        },
        Role::Parent => Placeholder {
            name: "Demo Parent",
            department: None,
            specialty: None,
            status: None,
        },
        Role::Administrator => Placeholder {
            name: "Demo Administrator",
            department: Some("IT"),
            specialty: None,
            status: Some("System administrator"),
        },
        Role::FamilySpace => Placeholder {
            name: "Demo Family",
            department: None,
            specialty: None,
            status: None,
        },
    }
}

fn initials_of(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// build_profile
///
/// Display record for the shell. Uses whatever the identity provider supplied
/// and fills the rest with deterministic placeholders keyed by role.
pub fn build_profile(role: Role, identity: Option<&Identity>) -> UserProfile {
    let defaults = placeholder(role);
    let identity = identity.cloned().unwrap_or_default();

    let name = match (identity.given_name, identity.family_name) {
        (Some(given), Some(family)) => format!("{} {}", given, family),
        (Some(only), None) | (None, Some(only)) => only,
        (None, None) => defaults.name.to_string(),
    };

    let email = identity
        .email
        .unwrap_or_else(|| format!("{}@demo.school", role.as_str().to_lowercase()));

    // Seed by subject when known so the avatar stays stable across renames.
    let seed = match identity.subject {
        Some(id) => id.simple().to_string(),
        None => initials_of(&name)
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect(),
    };

    UserProfile {
        id: identity.subject,
        name,
        role,
        email,
        phone: String::new(),
        address: String::new(),
        department: defaults.department.map(str::to_string),
        specialty: defaults.specialty.map(str::to_string),
        entry_date: NaiveDate::from_ymd_opt(2023, 9, 1),
        status: defaults.status.map(str::to_string),
        birth_date: None,
        gender: None,
        avatar_url: format!(
            "https://api.dicebear.com/7.x/initials/svg?seed={}&backgroundColor=ff8c00",
            seed
        ),
    }
}

/// compose_shell
///
/// Mounts the layout for an `Authorized` decision that renders a view.
/// Returns `None` for every other mode and for redirects, which happen outside
/// the layout.
pub fn compose_shell(
    mode: &RenderMode,
    session: &Session,
    registry: &Registry,
    menu_open: bool,
) -> Option<Shell> {
    let RenderMode::Authorized { role, route } = mode else {
        return None;
    };
    if !matches!(route.target, RouteTarget::View { .. }) {
        return None;
    }

    let profile = build_profile(*role, session.identity.as_ref());
    let menu = registry.menu_table(*role);

    let top_bar = TopBar {
        display_name: profile.name.clone(),
        initials: initials_of(&profile.name),
        avatar_url: profile.avatar_url.clone(),
        navbar: menu.navbar().cloned().collect(),
    };

    Some(Shell {
        role: *role,
        profile,
        top_bar,
        side_menu: SideMenu {
            open: menu_open,
            items: menu.entries().to_vec(),
        },
        outlet: route.clone(),
    })
}
