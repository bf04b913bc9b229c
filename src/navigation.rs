use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::{
    error::RegistryError,
    path::{PathParams, PathPattern},
    role::{ROLE_PRIORITY, Role},
};

/// The only path an unauthenticated session may render.
pub const LOGIN_PATH: &str = "/login";
/// Landing path of every role.
pub const HOME_PATH: &str = "/";

// --- View & Icon references ---

/// View
///
/// Opaque reference to a leaf screen. The dashboard maps each variant to a
/// component; this crate only decides which one applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum View {
    Login,
    NotFound,
    Home,
    TeacherDashboard,
    StudentDashboard,
    Profile,
    Students,
    Classes,
    GradeBook,
    GradeManagement,
    Evaluations,
    MyGrades,
    Agenda,
    EventEditor,
    Timetable,
    Messages,
    TeacherMessages,
    StudentMessages,
    Resources,
    ResourceArchives,
    ResourceDetail,
    PdiSessions,
    PdiDetail,
    TeacherCourses,
    StudentCourses,
    CourseDetail,
    LessonDetail,
    TeacherAssignments,
    AssignmentEditor,
    TeacherAssignmentDetail,
    StudentAssignments,
    StudentAssignmentDetail,
    RemediationDetail,
    Report,
    Tracking,
    Staff,
    Events,
    Settings,
    Users,
    Statistics,
    Progression,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum Icon {
    Home,
    Users,
    File,
    Chalkboard,
    Calendar,
    Envelope,
    User,
    ChartLine,
    Book,
    ClipboardList,
    Settings,
}

// --- Single source of truth ---

/// One navigable entry of a role. Entries with a `menu` slot are also surfaced
/// in the side menu, so a menu link can never point at an unrouted path.
#[derive(Debug, Clone, Copy)]
pub struct NavEntry {
    pub path: &'static str,
    pub view: View,
    pub menu: Option<MenuSlot>,
}

#[derive(Debug, Clone, Copy)]
pub struct MenuSlot {
    pub label: &'static str,
    pub icon: Icon,
    pub hide_in_navbar: bool,
}

const fn route(path: &'static str, view: View) -> NavEntry {
    NavEntry { path, view, menu: None }
}

const fn menu(path: &'static str, view: View, label: &'static str, icon: Icon) -> NavEntry {
    NavEntry {
        path,
        view,
        menu: Some(MenuSlot { label, icon, hide_in_navbar: false }),
    }
}

// Listed in the side menu and profile drop-down, not in the top navbar.
const fn menu_hidden(path: &'static str, view: View, label: &'static str, icon: Icon) -> NavEntry {
    NavEntry {
        path,
        view,
        menu: Some(MenuSlot { label, icon, hide_in_navbar: true }),
    }
}

const TEACHER: &[NavEntry] = &[
    menu("/", View::TeacherDashboard, "Home", Icon::Home),
    menu("/classes", View::Classes, "Classes", Icon::Users),
    menu("/mes-cours", View::TeacherCourses, "My courses", Icon::Chalkboard),
    menu("/evaluations", View::Evaluations, "Evaluations", Icon::ClipboardList),
    menu("/ressources", View::Resources, "Resources", Icon::Book),
    menu("/calendar", View::Agenda, "Agenda", Icon::Calendar),
    menu_hidden("/messages", View::TeacherMessages, "Messages", Icon::Envelope),
    menu_hidden("/profile", View::Profile, "Profile", Icon::User),
    route("/eleves", View::Students),
    route("/evaluations/notes", View::GradeBook),
    route("/classes/:classId", View::Classes),
    route("/agenda", View::Agenda),
    route("/agenda/create", View::EventEditor),
    route("/agenda/edit/:eventId", View::EventEditor),
    route("/ressources/archives", View::ResourceArchives),
    route("/ressources/:resourceId", View::ResourceDetail),
    route("/emploi-du-temps", View::Timetable),
    route("/pdi", View::PdiSessions),
    route("/pdi/:facilitatorId", View::PdiDetail),
    route("/mes-cours/:courseId", View::CourseDetail),
    route("/lecons/:lessonId", View::LessonDetail),
    route("/gestion-notes", View::GradeManagement),
    route("/devoirs", View::TeacherAssignments),
    route("/devoirs/creer", View::AssignmentEditor),
    route("/devoirs/:devoirId", View::TeacherAssignmentDetail),
    route("/remediations/:remediationId", View::RemediationDetail),
];

const PRINCIPAL: &[NavEntry] = &[
    menu("/", View::Home, "Home", Icon::Home),
    menu("/suivi", View::Tracking, "Tracking", Icon::ChartLine),
    menu("/rapport", View::Report, "Report", Icon::File),
    menu("/personnel", View::Staff, "Staff", Icon::Users),
    menu("/evenements", View::Events, "Events", Icon::Calendar),
    menu("/parametre", View::Settings, "Settings", Icon::Settings),
    menu_hidden("/profile", View::Profile, "Profile", Icon::User),
];

const STUDENT: &[NavEntry] = &[
    menu("/", View::StudentDashboard, "Home", Icon::Home),
    menu("/mes-cours", View::StudentCourses, "My courses", Icon::Chalkboard),
    menu("/mes-notes", View::MyGrades, "My grades", Icon::File),
    menu("/devoirs", View::StudentAssignments, "Assignments", Icon::Chalkboard),
    menu("/calendar", View::Agenda, "Agenda", Icon::Calendar),
    menu_hidden("/messages", View::StudentMessages, "Messages", Icon::Envelope),
    menu_hidden("/profile", View::Profile, "Profile", Icon::User),
    route("/devoirs/:devoirId", View::StudentAssignmentDetail),
    route("/agenda", View::Agenda),
    route("/agenda/create", View::EventEditor),
    route("/agenda/edit/:eventId", View::EventEditor),
    route("/emploi-du-temps", View::Timetable),
    route("/evaluations/notes", View::GradeBook),
    route("/mes-cours/:courseId", View::CourseDetail),
    route("/lecons/:lessonId", View::LessonDetail),
];

const PARENT: &[NavEntry] = &[
    menu("/", View::Home, "Home", Icon::Home),
    menu("/evaluations/notes", View::GradeBook, "Grades", Icon::File),
    menu("/rapport", View::Report, "Report", Icon::File),
    menu("/ressources", View::Resources, "Resources", Icon::Book),
    menu("/calendar", View::Agenda, "Agenda", Icon::Calendar),
    menu_hidden("/messages", View::Messages, "Messages", Icon::Envelope),
    menu_hidden("/profile", View::Profile, "Profile", Icon::User),
    route("/ressources/:resourceId", View::ResourceDetail),
];

const ADMINISTRATOR: &[NavEntry] = &[
    menu("/", View::Home, "Home", Icon::Home),
    menu("/utilisateurs", View::Users, "Users", Icon::Users),
    menu("/evaluations", View::Evaluations, "Evaluations", Icon::File),
    menu("/ressources", View::Resources, "Resources", Icon::Book),
    menu("/classes", View::Classes, "Classes", Icon::Users),
    menu("/statistiques", View::Statistics, "Statistics", Icon::ChartLine),
    menu("/parametre", View::Settings, "Settings", Icon::Settings),
    route("/profile", View::Profile),
];

const FAMILY_SPACE: &[NavEntry] = &[
    menu("/", View::Home, "Home", Icon::Home),
    menu("/progression", View::Progression, "Progression", Icon::ChartLine),
    menu("/ressources", View::Resources, "Resources", Icon::Book),
    menu("/calendar", View::Agenda, "Agenda", Icon::Calendar),
    menu_hidden("/messages", View::Messages, "Messages", Icon::Envelope),
    menu_hidden("/profile", View::Profile, "Profile", Icon::User),
];

/// Navigation source for a role. The match is exhaustive, so a known role
/// without a table does not compile.
pub fn nav_entries(role: Role) -> &'static [NavEntry] {
    match role {
        Role::Teacher => TEACHER,
        Role::Principal => PRINCIPAL,
        Role::Student => STUDENT,
        Role::Parent => PARENT,
        Role::Administrator => ADMINISTRATOR,
        Role::FamilySpace => FAMILY_SPACE,
    }
}

// --- Route projection ---

/// What a matched route does: render a view, or bounce the address bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
#[ts(export)]
pub enum RouteTarget {
    View { view: View },
    Redirect { to: String },
}

#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub pattern: PathPattern,
    pub target: RouteTarget,
}

impl RouteEntry {
    pub fn view(pattern: &str, view: View) -> Result<Self, RegistryError> {
        Ok(Self {
            pattern: PathPattern::parse(pattern)?,
            target: RouteTarget::View { view },
        })
    }

    pub fn redirect(pattern: &str, to: &str) -> Result<Self, RegistryError> {
        Ok(Self {
            pattern: PathPattern::parse(pattern)?,
            target: RouteTarget::Redirect { to: to.to_string() },
        })
    }
}

/// RouteMatch
///
/// Result of resolving a requested path against a route table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RouteMatch {
    pub pattern: String,
    pub target: RouteTarget,
    pub params: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn new(entries: Vec<RouteEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// True when a pattern is declared verbatim.
    pub fn contains(&self, pattern: &str) -> bool {
        self.entries.iter().any(|e| e.pattern.as_str() == pattern)
    }

    /// resolve
    ///
    /// The most specific matching pattern wins (most static segments, earliest
    /// entry on ties). The catch-all is considered only when nothing else
    /// matches. `None` only for a table without a catch-all.
    pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
        let mut best: Option<(usize, &RouteEntry, PathParams)> = None;
        for entry in &self.entries {
            let Some(specificity) = entry.pattern.specificity() else {
                continue;
            };
            if let Some(params) = entry.pattern.matches(path) {
                let better = best.as_ref().is_none_or(|(s, _, _)| specificity > *s);
                if better {
                    best = Some((specificity, entry, params));
                }
            }
        }

        let (entry, params) = match best {
            Some((_, entry, params)) => (entry, params),
            None => {
                let fallback = self.entries.iter().find(|e| e.pattern.is_catch_all())?;
                (fallback, PathParams::new())
            }
        };

        Some(RouteMatch {
            pattern: entry.pattern.as_str().to_string(),
            target: entry.target.clone(),
            params,
        })
    }
}

// --- Menu projection ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MenuEntry {
    pub label: String,
    pub path: String,
    pub icon: Icon,
    pub hide_in_navbar: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MenuTable {
    entries: Vec<MenuEntry>,
}

impl MenuTable {
    pub fn new(entries: Vec<MenuEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    /// Entries shown in the top navigation bar.
    pub fn navbar(&self) -> impl Iterator<Item = &MenuEntry> {
        self.entries.iter().filter(|e| !e.hide_in_navbar)
    }
}

fn project_routes(entries: &[NavEntry]) -> Result<RouteTable, RegistryError> {
    let mut routes = entries
        .iter()
        .map(|e| RouteEntry::view(e.path, e.view))
        .collect::<Result<Vec<_>, _>>()?;
    routes.push(RouteEntry::view(PathPattern::CATCH_ALL, View::NotFound)?);
    Ok(RouteTable::new(routes))
}

fn project_menu(entries: &[NavEntry]) -> MenuTable {
    MenuTable::new(
        entries
            .iter()
            .filter_map(|e| {
                e.menu.map(|slot| MenuEntry {
                    label: slot.label.to_string(),
                    path: e.path.to_string(),
                    icon: slot.icon,
                    hide_in_navbar: slot.hide_in_navbar,
                })
            })
            .collect(),
    )
}

/// validate_tables
///
/// Structural invariants of one role: a `/` landing route, exactly one
/// catch-all in last position, unique patterns, and every menu path routed
/// verbatim. The projections above satisfy these by construction; this check
/// guards hand-edited tables.
pub fn validate_tables(
    role: Role,
    routes: &RouteTable,
    menu: &MenuTable,
) -> Result<(), RegistryError> {
    if !routes.contains(HOME_PATH) {
        return Err(RegistryError::MissingLanding(role));
    }

    let catch_alls = routes
        .entries()
        .iter()
        .filter(|e| e.pattern.is_catch_all())
        .count();
    let last_is_catch_all = routes
        .entries()
        .last()
        .is_some_and(|e| e.pattern.is_catch_all());
    if catch_alls != 1 || !last_is_catch_all {
        return Err(RegistryError::CatchAllPlacement(role));
    }

    let mut seen = HashSet::new();
    for entry in routes.entries() {
        if !seen.insert(entry.pattern.as_str()) {
            return Err(RegistryError::DuplicateRoute {
                role,
                pattern: entry.pattern.as_str().to_string(),
            });
        }
    }

    for item in menu.entries() {
        if item.path == PathPattern::CATCH_ALL {
            return Err(RegistryError::CatchAllInMenu(role));
        }
        if !routes.contains(&item.path) {
            return Err(RegistryError::UnroutedMenuEntry {
                role,
                pattern: item.path.clone(),
            });
        }
    }

    Ok(())
}

// --- Registry ---

#[derive(Debug, Clone)]
struct RoleTables {
    routes: RouteTable,
    menu: MenuTable,
}

/// Registry
///
/// Route and menu projections for every role, plus the minimal table mounted
/// for unauthenticated sessions. Built and validated once at startup.
#[derive(Debug, Clone)]
pub struct Registry {
    // Indexed by `Role::rank`.
    tables: Vec<RoleTables>,
    login: PathPattern,
    login_table: RouteTable,
}

impl Registry {
    pub fn build() -> Result<Self, RegistryError> {
        let mut tables = Vec::with_capacity(ROLE_PRIORITY.len());
        for role in ROLE_PRIORITY {
            let source = nav_entries(role);
            let routes = project_routes(source)?;
            let menu = project_menu(source);
            validate_tables(role, &routes, &menu)?;
            tables.push(RoleTables { routes, menu });
        }

        let login_table = RouteTable::new(vec![
            RouteEntry::view(LOGIN_PATH, View::Login)?,
            RouteEntry::redirect(PathPattern::CATCH_ALL, LOGIN_PATH)?,
        ]);

        Ok(Self {
            tables,
            login: PathPattern::parse(LOGIN_PATH)?,
            login_table,
        })
    }

    pub fn route_table(&self, role: Role) -> &RouteTable {
        &self.tables[role.rank()].routes
    }

    pub fn menu_table(&self, role: Role) -> &MenuTable {
        &self.tables[role.rank()].menu
    }

    /// Table mounted while unauthenticated: the login view, everything else
    /// redirected to it.
    pub fn login_table(&self) -> &RouteTable {
        &self.login_table
    }

    pub fn is_login_path(&self, path: &str) -> bool {
        self.login.matches(path).is_some()
    }
}
